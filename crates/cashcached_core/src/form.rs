//! Form schemas and field values

use indexmap::IndexMap;
use serde::Serialize;
use thiserror::Error;

/// Input widget the presentation layer renders for a field
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FieldKind {
    #[default]
    Text,
    Email,
    Date,
    Time,
    TextArea,
}

/// Declaration of one form field
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: String,
    pub label: String,
    pub placeholder: String,
    pub kind: FieldKind,
    pub required: bool,
}

impl FieldSpec {
    pub fn required(name: impl Into<String>) -> Self {
        Self::with_required(name, true)
    }

    pub fn optional(name: impl Into<String>) -> Self {
        Self::with_required(name, false)
    }

    fn with_required(name: impl Into<String>, required: bool) -> Self {
        Self {
            name: name.into(),
            label: String::new(),
            placeholder: String::new(),
            kind: FieldKind::Text,
            required,
        }
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = placeholder.into();
        self
    }

    pub fn kind(mut self, kind: FieldKind) -> Self {
        self.kind = kind;
        self
    }
}

/// Ordered set of fields a form accepts
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FormSchema {
    fields: Vec<FieldSpec>,
}

impl FormSchema {
    pub fn new(fields: impl IntoIterator<Item = FieldSpec>) -> Self {
        Self {
            fields: fields.into_iter().collect(),
        }
    }

    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.field(name).is_some()
    }

    /// Every declared field, present and empty
    pub fn empty_values(&self) -> FormFields {
        FormFields(
            self.fields
                .iter()
                .map(|f| (f.name.clone(), String::new()))
                .collect(),
        )
    }
}

/// Field name to text, in declaration order.
///
/// Serializes as a flat JSON object, which is what template services expect.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FormFields(IndexMap<String, String>);

impl FormFields {
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    pub(crate) fn set(&mut self, name: &str, value: String) -> bool {
        match self.0.get_mut(name) {
            Some(slot) => {
                *slot = value;
                true
            }
            None => false,
        }
    }

    /// Reset every value to empty, keeping the names
    pub(crate) fn clear_values(&mut self) {
        for value in self.0.values_mut() {
            value.clear();
        }
    }

    pub fn is_blank(&self) -> bool {
        self.0.values().all(String::is_empty)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K, V> FromIterator<(K, V)> for FormFields
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FormError {
    #[error("form `{form}` has no field named `{field}`")]
    UnknownField { form: String, field: String },
}
