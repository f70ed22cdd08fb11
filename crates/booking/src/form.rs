use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Field names read first, in this order, before any other named control.
pub const KNOWN_FIELDS: [&str; 7] = ["name", "phone", "email", "date", "time", "guests", "notes"];

/// What the host page hands over when the guest presses submit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormSnapshot {
    /// The form's declared `action` attribute.
    #[serde(default)]
    pub action: Option<String>,
    /// The form's `data-*` attributes, keys without the prefix.
    #[serde(default)]
    pub data: BTreeMap<String, String>,
    #[serde(default)]
    pub elements: Vec<FormElement>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormElement {
    #[serde(default)]
    pub name: String,
    #[serde(flatten)]
    pub kind: ElementKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ElementKind {
    Checkbox {
        #[serde(default)]
        checked: bool,
        #[serde(default = "checkbox_default_value")]
        value: String,
    },
    Field {
        #[serde(default)]
        value: String,
    },
}

fn checkbox_default_value() -> String {
    "on".to_string()
}

impl FormElement {
    pub fn field(name: &str, value: &str) -> Self {
        Self { name: name.to_string(), kind: ElementKind::Field { value: value.to_string() } }
    }

    pub fn checkbox(name: &str, checked: bool) -> Self {
        Self {
            name: name.to_string(),
            kind: ElementKind::Checkbox { checked, value: checkbox_default_value() },
        }
    }

    fn value(&self) -> &str {
        match &self.kind {
            ElementKind::Checkbox { value, .. } | ElementKind::Field { value } => value,
        }
    }
}

impl FormSnapshot {
    pub fn with_elements(elements: Vec<FormElement>) -> Self {
        Self { elements, ..Default::default() }
    }

    fn first_named(&self, name: &str) -> Option<&FormElement> {
        self.elements.iter().find(|el| el.name == name)
    }
}

/// JSON body posted to booking endpoints.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BookingPayload(pub Map<String, Value>);

impl BookingPayload {
    /// String value of `key`, or `""` when missing or not a string.
    pub fn text(&self, key: &str) -> &str {
        self.0.get(key).and_then(Value::as_str).unwrap_or("")
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Collect the booking payload from a form snapshot.
///
/// Known fields take the trimmed value of the first control with that name.
/// Every other named control is then added once: checkboxes as booleans,
/// the rest as trimmed strings. Earlier entries are never overwritten.
pub fn gather(form: &FormSnapshot) -> BookingPayload {
    let mut data = Map::new();

    for name in KNOWN_FIELDS {
        if let Some(el) = form.first_named(name) {
            data.insert(name.to_string(), Value::String(el.value().trim().to_string()));
        }
    }

    for el in &form.elements {
        if el.name.is_empty() || data.contains_key(&el.name) {
            continue;
        }
        let value = match &el.kind {
            ElementKind::Checkbox { checked, .. } => Value::Bool(*checked),
            ElementKind::Field { value } => Value::String(value.trim().to_string()),
        };
        data.insert(el.name.clone(), value);
    }

    BookingPayload(data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn gathers_known_and_extra_fields() {
        let form = FormSnapshot::with_elements(vec![
            FormElement::field("name", "  Ada  "),
            FormElement::field("time", "19:30"),
            FormElement::checkbox("terrace", true),
            FormElement::checkbox("newsletter", false),
            FormElement::field("occasion", " birthday "),
            FormElement::field("", "ignored"),
        ]);
        let payload = gather(&form);
        assert_eq!(
            serde_json::to_value(&payload).unwrap(),
            json!({
                "name": "Ada",
                "time": "19:30",
                "terrace": true,
                "newsletter": false,
                "occasion": "birthday",
            })
        );
    }

    #[test]
    fn known_fields_are_not_overwritten() {
        let form = FormSnapshot::with_elements(vec![
            FormElement::field("extra", "a"),
            FormElement::field("guests", "2"),
            FormElement::field("guests", "9"),
            FormElement::field("extra", "b"),
        ]);
        let payload = gather(&form);
        assert_eq!(payload.text("guests"), "2");
        assert_eq!(payload.text("extra"), "a");
    }

    #[test]
    fn known_checkbox_contributes_its_value() {
        let form = FormSnapshot::with_elements(vec![FormElement::checkbox("notes", false)]);
        assert_eq!(gather(&form).text("notes"), "on");
    }

    #[test]
    fn snapshot_deserializes_tagged_elements() {
        let form: FormSnapshot = serde_json::from_value(json!({
            "action": "/reserve",
            "data": {"max": "4"},
            "elements": [
                {"name": "date", "type": "field", "value": "2026-10-20"},
                {"name": "vip", "type": "checkbox", "checked": true}
            ]
        }))
        .unwrap();
        assert_eq!(form.action.as_deref(), Some("/reserve"));
        assert_eq!(form.elements[1], FormElement::checkbox("vip", true));
    }
}
