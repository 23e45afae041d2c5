//! Structural validation of raw submission documents.
//!
//! The schema is a small declarative tree of typed nodes. It is built once
//! (see [`Schema::benchmark`]) and shared by every validation in a run.
//! Violations are always hard errors; cross-field and filesystem checks live
//! in [`crate::validation`].

use serde::Serialize;
use serde_json::{Value, json};

use crate::record::parse_timestamp;

/// String formats understood by the schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// Absolute `http://` or `https://` URL.
    Uri,
    /// RFC 3339 date-time with an offset.
    DateTime,
}

impl Format {
    fn name(self) -> &'static str {
        match self {
            Format::Uri => "uri",
            Format::DateTime => "date-time",
        }
    }

    fn matches(self, s: &str) -> bool {
        match self {
            Format::Uri => is_http_url(s),
            Format::DateTime => parse_timestamp(s).is_some(),
        }
    }
}

#[derive(Debug, Clone)]
enum Kind {
    String,
    Number,
    Integer,
    Array(Box<Node>),
    Object(ObjectShape),
    /// String-keyed object whose values all share one node.
    Map(Box<Node>),
}

#[derive(Debug, Clone)]
struct ObjectShape {
    properties: Vec<Property>,
    /// Each group needs at least one member present.
    one_of_required: Vec<Vec<&'static str>>,
    additional_properties: bool,
}

#[derive(Debug, Clone)]
struct Property {
    name: &'static str,
    node: Node,
    required: bool,
}

/// A typed schema node with its constraints.
#[derive(Debug, Clone)]
pub struct Node {
    kind: Kind,
    format: Option<Format>,
    minimum: Option<f64>,
    min_length: Option<usize>,
    min_items: Option<usize>,
}

impl Node {
    fn new(kind: Kind) -> Self {
        Self {
            kind,
            format: None,
            minimum: None,
            min_length: None,
            min_items: None,
        }
    }

    fn string() -> Self {
        Self::new(Kind::String)
    }

    fn number() -> Self {
        Self::new(Kind::Number)
    }

    fn integer() -> Self {
        Self::new(Kind::Integer)
    }

    fn array(items: Node) -> Self {
        Self::new(Kind::Array(Box::new(items)))
    }

    fn map(values: Node) -> Self {
        Self::new(Kind::Map(Box::new(values)))
    }

    fn object(properties: Vec<Property>) -> Self {
        Self::new(Kind::Object(ObjectShape {
            properties,
            one_of_required: Vec::new(),
            additional_properties: true,
        }))
    }

    fn format(mut self, format: Format) -> Self {
        self.format = Some(format);
        self
    }

    fn minimum(mut self, minimum: f64) -> Self {
        self.minimum = Some(minimum);
        self
    }

    fn min_length(mut self, n: usize) -> Self {
        self.min_length = Some(n);
        self
    }

    fn min_items(mut self, n: usize) -> Self {
        self.min_items = Some(n);
        self
    }

    fn closed(mut self) -> Self {
        if let Kind::Object(shape) = &mut self.kind {
            shape.additional_properties = false;
        }
        self
    }

    fn require_one_of(mut self, group: &[&'static str]) -> Self {
        if let Kind::Object(shape) = &mut self.kind {
            shape.one_of_required.push(group.to_vec());
        }
        self
    }
}

fn required(name: &'static str, node: Node) -> Property {
    Property {
        name,
        node,
        required: true,
    }
}

fn optional(name: &'static str, node: Node) -> Property {
    Property {
        name,
        node,
        required: false,
    }
}

/// One structural error.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SchemaViolation {
    /// Dotted path of the offending value, `root` for the document itself.
    pub field: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<Value>,
}

/// A compiled document schema.
#[derive(Debug, Clone)]
pub struct Schema {
    root: Node,
}

impl Schema {
    /// The schema every `benchmark.json` must satisfy.
    pub fn benchmark() -> Self {
        Self::build(true)
    }

    /// Same as [`Schema::benchmark`] but `id` and `timestamp` may be absent;
    /// the index builder fills them in.
    pub fn relaxed_for_drafts() -> Self {
        Self::build(false)
    }

    fn build(require_stamp: bool) -> Self {
        let non_empty = || Node::string().min_length(1);
        let count = || Node::integer().minimum(0.0);
        let stats = || {
            Node::object(vec![
                required("min", Node::number().minimum(0.0)),
                required("median", Node::number().minimum(0.0)),
                required("mean", Node::number().minimum(0.0)),
                required("max", Node::number().minimum(0.0)),
                optional("unit", Node::string()),
            ])
        };
        let stamp = |name, node| {
            if require_stamp {
                required(name, node)
            } else {
                optional(name, node)
            }
        };

        let root = Node::object(vec![
            stamp("id", non_empty()),
            required("algorithmName", non_empty()),
            optional("team", Node::array(non_empty()).min_items(1)),
            optional("contributor", non_empty()),
            required("device", non_empty()),
            required("metricName", non_empty()),
            required("metricValue", Node::number()),
            optional("uncertainty", Node::number().minimum(0.0)),
            optional("paperUrl", Node::string().format(Format::Uri)),
            stamp("timestamp", Node::string().format(Format::DateTime)),
            optional("acceptedDate", Node::string().format(Format::DateTime)),
            optional("description", Node::string()),
            optional("notes", Node::string()),
            optional("methodology", Node::string()),
            optional("qasmFiles", Node::array(non_empty())),
            optional(
                "errorRates",
                Node::object(vec![
                    optional("qubit", stats()),
                    optional("readout", stats()),
                    optional("twoQubitGate", stats()),
                    optional("singleQubitGate", stats()),
                ])
                .closed(),
            ),
            optional("executionTime", stats()),
            optional(
                "quantumSpecific",
                Node::object(vec![
                    optional("qubitCount", count()),
                    optional("gateCount", count()),
                    optional("circuitDepth", count()),
                    optional("singleQubitGateCount", count()),
                    optional("twoQubitGateCount", count()),
                    optional("measurementCount", count()),
                    optional("gateBreakdown", Node::map(count())),
                    optional("circuitVariations", count()),
                    optional("shots", count()),
                ]),
            ),
            optional("benchmarkFolder", Node::string()),
        ])
        .require_one_of(&["team", "contributor"]);

        Self { root }
    }

    /// Check a document, returning every violation found.
    pub fn validate(&self, value: &Value) -> Vec<SchemaViolation> {
        let mut violations = Vec::new();
        check(&self.root, value, "", &mut violations);
        violations
    }
}

fn join(path: &str, key: &str) -> String {
    if path.is_empty() {
        key.to_string()
    } else {
        format!("{path}.{key}")
    }
}

fn violation(path: &str, message: impl Into<String>, params: Option<Value>) -> SchemaViolation {
    SchemaViolation {
        field: if path.is_empty() {
            "root".to_string()
        } else {
            path.to_string()
        },
        message: message.into(),
        params,
    }
}

fn type_error(path: &str, expected: &str) -> SchemaViolation {
    violation(
        path,
        format!("must be {expected}"),
        Some(json!({ "type": expected })),
    )
}

fn check(node: &Node, value: &Value, path: &str, out: &mut Vec<SchemaViolation>) {
    match &node.kind {
        Kind::String => {
            let Some(s) = value.as_str() else {
                out.push(type_error(path, "string"));
                return;
            };
            if let Some(n) = node.min_length {
                if s.chars().count() < n {
                    out.push(violation(
                        path,
                        format!("must NOT have fewer than {n} characters"),
                        Some(json!({ "limit": n })),
                    ));
                }
            }
            if let Some(format) = node.format {
                if !format.matches(s) {
                    out.push(violation(
                        path,
                        format!("must match format \"{}\"", format.name()),
                        Some(json!({ "format": format.name() })),
                    ));
                }
            }
        }
        Kind::Number | Kind::Integer => {
            let is_integer = matches!(node.kind, Kind::Integer);
            // Integer-valued floats such as `5.0` count as integers.
            let ok = if is_integer {
                value.as_f64().is_some_and(|v| v.fract() == 0.0)
            } else {
                value.is_number()
            };
            if !ok {
                out.push(type_error(path, if is_integer { "integer" } else { "number" }));
                return;
            }
            if let (Some(min), Some(v)) = (node.minimum, value.as_f64()) {
                if v < min {
                    out.push(violation(
                        path,
                        format!("must be >= {min}"),
                        Some(json!({ "comparison": ">=", "limit": min })),
                    ));
                }
            }
        }
        Kind::Array(items) => {
            let Some(elements) = value.as_array() else {
                out.push(type_error(path, "array"));
                return;
            };
            if let Some(n) = node.min_items {
                if elements.len() < n {
                    out.push(violation(
                        path,
                        format!("must NOT have fewer than {n} items"),
                        Some(json!({ "limit": n })),
                    ));
                }
            }
            for (i, element) in elements.iter().enumerate() {
                check(items, element, &join(path, &i.to_string()), out);
            }
        }
        Kind::Map(values) => {
            let Some(map) = value.as_object() else {
                out.push(type_error(path, "object"));
                return;
            };
            for (key, v) in map {
                check(values, v, &join(path, key), out);
            }
        }
        Kind::Object(shape) => {
            let Some(map) = value.as_object() else {
                out.push(type_error(path, "object"));
                return;
            };
            for property in &shape.properties {
                let property_path = join(path, property.name);
                match map.get(property.name) {
                    Some(v) => check(&property.node, v, &property_path, out),
                    None if property.required => out.push(violation(
                        &property_path,
                        format!("must have required property '{}'", property.name),
                        Some(json!({ "missingProperty": property.name })),
                    )),
                    None => {}
                }
            }
            for group in &shape.one_of_required {
                if !group.iter().any(|name| map.contains_key(*name)) {
                    let listed: Vec<String> = group.iter().map(|n| format!("'{n}'")).collect();
                    out.push(violation(
                        &join(path, group[0]),
                        format!("must have at least one of {}", listed.join(", ")),
                        Some(json!({ "missingProperty": group })),
                    ));
                }
            }
            if !shape.additional_properties {
                for key in map.keys() {
                    if !shape.properties.iter().any(|p| p.name == key.as_str()) {
                        out.push(violation(
                            &join(path, key),
                            "must NOT have additional properties",
                            Some(json!({ "additionalProperty": key })),
                        ));
                    }
                }
            }
        }
    }
}

/// Minimal absolute http(s) URL check: scheme, non-empty host, no whitespace.
fn is_http_url(s: &str) -> bool {
    let lower = s.to_ascii_lowercase();
    let Some(rest) = lower
        .strip_prefix("https://")
        .or_else(|| lower.strip_prefix("http://"))
    else {
        return false;
    };
    let host = rest.split(['/', '?', '#']).next().unwrap_or("");
    !host.is_empty() && !s.chars().any(char::is_whitespace)
}
