//! Field rules enforced by the menu collection itself.
//!
//! Callers hand over raw JSON; the schema casts each known attribute to its
//! declared type, drops unknown ones and reports the first failure using the
//! same wording clients already display.

use serde_json::{Map, Number, Value};

use crate::errors::ServiceError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    String,
    Number,
    Boolean,
}

impl FieldType {
    fn label(self) -> &'static str {
        match self {
            FieldType::String => "string",
            FieldType::Number => "Number",
            FieldType::Boolean => "Boolean",
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub name: &'static str,
    pub ty: FieldType,
    pub required: bool,
    pub min: Option<f64>,
    pub default: Option<fn() -> Value>,
}

impl FieldSpec {
    const fn new(name: &'static str, ty: FieldType) -> Self {
        Self { name, ty, required: false, min: None, default: None }
    }

    const fn required(mut self) -> Self {
        self.required = true;
        self
    }

    const fn min(mut self, min: f64) -> Self {
        self.min = Some(min);
        self
    }

    const fn default_to(mut self, f: fn() -> Value) -> Self {
        self.default = Some(f);
        self
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Schema {
    pub model: &'static str,
    pub fields: &'static [FieldSpec],
}

pub const MENU_ITEM: Schema = Schema {
    model: "MenuItem",
    fields: &[
        FieldSpec::new("name", FieldType::String).required(),
        FieldSpec::new("description", FieldType::String),
        FieldSpec::new("price", FieldType::Number).required().min(0.0),
        FieldSpec::new("category", FieldType::String),
        FieldSpec::new("image", FieldType::String),
        FieldSpec::new("available", FieldType::Boolean).default_to(available_by_default),
    ],
};

fn available_by_default() -> Value {
    Value::Bool(true)
}

impl Schema {
    /// Build a full document from a create body: casts, defaults, required checks.
    pub fn build(&self, body: &Value) -> Result<Map<String, Value>, ServiceError> {
        let input = as_object(body)?;
        let mut out = Map::new();
        let mut problems = Vec::new();

        for spec in self.fields {
            let raw = input.get(spec.name).filter(|v| !v.is_null());
            match raw {
                Some(v) => match self.check(spec, v) {
                    Ok(cast) => {
                        out.insert(spec.name.to_string(), cast);
                    }
                    Err(msg) => problems.push(format!("{}: {msg}", spec.name)),
                },
                None if spec.required => {
                    problems.push(format!("{}: Path `{}` is required.", spec.name, spec.name))
                }
                None => {
                    if let Some(default) = spec.default {
                        out.insert(spec.name.to_string(), default());
                    }
                }
            }
        }

        if problems.is_empty() {
            Ok(out)
        } else {
            Err(ServiceError::Validation(format!(
                "{} validation failed: {}",
                self.model,
                problems.join(", ")
            )))
        }
    }

    /// Cast the attributes present in an update body.
    ///
    /// Only supplied attributes are touched and only their types are
    /// checked; required and minimum rules apply on create alone. `null`
    /// clears the attribute.
    pub fn cast_partial(&self, body: &Value) -> Result<Map<String, Value>, ServiceError> {
        let input = as_object(body)?;
        let mut out = Map::new();
        for spec in self.fields {
            let Some(v) = input.get(spec.name) else { continue };
            if v.is_null() {
                out.insert(spec.name.to_string(), Value::Null);
                continue;
            }
            let cast = cast_field(spec, v)
                .map_err(|msg| ServiceError::Validation(format!("{}: {msg}", spec.name)))?;
            out.insert(spec.name.to_string(), cast);
        }
        Ok(out)
    }

    fn check(&self, spec: &FieldSpec, v: &Value) -> Result<Value, String> {
        let cast = cast_field(spec, v)?;
        if spec.ty == FieldType::String && spec.required && cast.as_str().is_some_and(|s| s.trim().is_empty()) {
            return Err(format!("Path `{}` is required.", spec.name));
        }
        if let (Some(min), Some(n)) = (spec.min, cast.as_f64()) {
            if n < min {
                return Err(format!(
                    "Path `{}` ({n}) is less than minimum allowed value ({min}).",
                    spec.name
                ));
            }
        }
        Ok(cast)
    }
}

fn cast_field(spec: &FieldSpec, v: &Value) -> Result<Value, String> {
    cast(spec.ty, v).ok_or_else(|| {
        format!("Cast to {} failed for value {} at path \"{}\"", spec.ty.label(), v, spec.name)
    })
}

fn as_object(body: &Value) -> Result<&Map<String, Value>, ServiceError> {
    body.as_object()
        .ok_or_else(|| ServiceError::Validation("request body must be a JSON object".into()))
}

fn cast(ty: FieldType, v: &Value) -> Option<Value> {
    match (ty, v) {
        (FieldType::String, Value::String(s)) => Some(Value::String(s.trim().to_string())),
        (FieldType::String, Value::Number(n)) => Some(Value::String(n.to_string())),
        (FieldType::String, Value::Bool(b)) => Some(Value::String(b.to_string())),
        (FieldType::Number, Value::Number(n)) => Some(Value::Number(n.clone())),
        (FieldType::Number, Value::String(s)) => parse_number(s.trim()).map(Value::Number),
        (FieldType::Boolean, Value::Bool(b)) => Some(Value::Bool(*b)),
        (FieldType::Boolean, Value::String(s)) => match s.trim() {
            "true" | "1" | "yes" => Some(Value::Bool(true)),
            "false" | "0" | "no" => Some(Value::Bool(false)),
            _ => None,
        },
        (FieldType::Boolean, Value::Number(n)) => match n.as_f64() {
            Some(x) if x == 1.0 => Some(Value::Bool(true)),
            Some(x) if x == 0.0 => Some(Value::Bool(false)),
            _ => None,
        },
        _ => None,
    }
}

fn parse_number(s: &str) -> Option<Number> {
    if s.is_empty() {
        return None;
    }
    if let Ok(i) = s.parse::<i64>() {
        return Some(Number::from(i));
    }
    s.parse::<f64>().ok().and_then(Number::from_f64)
}
