//! Route Schemas
//!
//! A [`RouteSchema`] maps each declared field (path, query or body) to an
//! ordered list of [`Rule`]s. Checking is a pure function of the schema and a
//! [`RequestInput`] snapshot, so the same input always yields the same
//! decision.

use std::borrow::Cow;
use std::collections::BTreeMap;

use serde_json::Value;

use super::report::{Location, ValidationErrors, Violation};
use super::rule::Rule;

/// Declared rules for one field
#[derive(Debug, Clone)]
pub struct FieldSchema {
    pub location: Location,
    pub name: &'static str,
    pub rules: Vec<Rule>,
}

impl FieldSchema {
    pub fn is_required(&self) -> bool {
        self.rules.iter().any(|rule| matches!(rule, Rule::Required))
    }
}

/// Validation schema for one route
#[derive(Debug, Clone)]
pub struct RouteSchema {
    name: &'static str,
    fields: Vec<FieldSchema>,
}

impl RouteSchema {
    /// Create an empty schema; `name` identifies the route in logs
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            fields: Vec::new(),
        }
    }

    pub fn path(self, name: &'static str, rules: impl IntoIterator<Item = Rule>) -> Self {
        self.field(Location::Path, name, rules)
    }

    pub fn query(self, name: &'static str, rules: impl IntoIterator<Item = Rule>) -> Self {
        self.field(Location::Query, name, rules)
    }

    pub fn body(self, name: &'static str, rules: impl IntoIterator<Item = Rule>) -> Self {
        self.field(Location::Body, name, rules)
    }

    /// Append every field of `other` (used to share rule sets between routes)
    pub fn extend(mut self, other: RouteSchema) -> Self {
        self.fields.extend(other.fields);
        self
    }

    fn field(
        mut self,
        location: Location,
        name: &'static str,
        rules: impl IntoIterator<Item = Rule>,
    ) -> Self {
        self.fields.push(FieldSchema {
            location,
            name,
            rules: rules.into_iter().collect(),
        });
        self
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn fields(&self) -> &[FieldSchema] {
        &self.fields
    }

    /// Whether any field is read from `location`
    pub fn expects(&self, location: Location) -> bool {
        self.fields.iter().any(|f| f.location == location)
    }

    /// Check `input` against every declared field
    pub fn check(&self, input: &RequestInput) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let body_ok = !self.expects(Location::Body) || check_body_shape(input, &mut errors);

        for field in &self.fields {
            if field.location == Location::Body && !body_ok {
                continue;
            }

            let value = input.lookup(field.location, field.name);
            match value.as_deref() {
                None | Some(Value::Null) => {
                    if field.is_required() {
                        errors.push(Violation::new(
                            field.location,
                            field.name,
                            Rule::Required.code(),
                            "is required",
                        ));
                    }
                }
                Some(value) => {
                    for rule in &field.rules {
                        if let Err(message) = rule.evaluate(value) {
                            errors.push(Violation::new(
                                field.location,
                                field.name,
                                rule.code(),
                                message,
                            ));
                        }
                    }
                }
            }
        }

        errors.into_result()
    }
}

fn check_body_shape(input: &RequestInput, errors: &mut ValidationErrors) -> bool {
    match &input.body {
        BodyInput::Empty | BodyInput::Json(Value::Object(_)) => true,
        BodyInput::Json(_) => {
            errors.push(Violation::new(
                Location::Body,
                "body",
                "object",
                "must be a JSON object",
            ));
            false
        }
        BodyInput::Malformed(reason) => {
            errors.push(Violation::new(
                Location::Body,
                "body",
                "json",
                format!("must be valid JSON: {reason}"),
            ));
            false
        }
    }
}

// ============================================================================
// Request snapshot
// ============================================================================

/// Body as delivered by the transport
#[derive(Debug, Clone, Default, PartialEq)]
pub enum BodyInput {
    /// No bytes, or only whitespace; treated as `{}`
    #[default]
    Empty,
    Json(Value),
    Malformed(String),
}

/// Read-only view of the raw request parameters
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestInput {
    path: BTreeMap<String, String>,
    query: BTreeMap<String, Vec<String>>,
    body: BodyInput,
}

impl RequestInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_path(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.path.insert(key.into(), value.into());
        self
    }

    /// Add a query value; repeated keys accumulate
    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.entry(key.into()).or_default().push(value.into());
        self
    }

    pub fn with_json_body(mut self, body: Value) -> Self {
        self.body = BodyInput::Json(body);
        self
    }

    /// Interpret raw body bytes
    pub fn with_raw_body(mut self, bytes: &[u8]) -> Self {
        self.body = if bytes.iter().all(u8::is_ascii_whitespace) {
            BodyInput::Empty
        } else {
            match serde_json::from_slice::<Value>(bytes) {
                Ok(value) => BodyInput::Json(value),
                Err(err) => BodyInput::Malformed(err.to_string()),
            }
        };
        self
    }

    pub fn body(&self) -> &BodyInput {
        &self.body
    }

    /// Field value as JSON; query keys given more than once become arrays
    fn lookup(&self, location: Location, name: &str) -> Option<Cow<'_, Value>> {
        match location {
            Location::Path => self
                .path
                .get(name)
                .map(|v| Cow::Owned(Value::String(v.clone()))),
            Location::Query => self.query.get(name).map(|values| match values.as_slice() {
                [single] => Cow::Owned(Value::String(single.clone())),
                many => Cow::Owned(Value::Array(
                    many.iter().cloned().map(Value::String).collect(),
                )),
            }),
            Location::Body => match &self.body {
                BodyInput::Json(Value::Object(map)) => map.get(name).map(Cow::Borrowed),
                _ => None,
            },
        }
    }
}
