use chrono::{DateTime, NaiveDate};
use serde_json::{Map, Value};
use std::collections::HashMap;
use validator::{ValidateEmail, ValidateUrl};

use super::{RequestForm, UploadedFile, ValidationErrors, display_name};

/// Whether a field must, may, or may conditionally appear.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presence {
    /// Must be present and non-empty.
    Required,
    /// Validated only when given; when given it must be non-empty.
    Sometimes,
    /// May be absent or null; validated when it carries a value.
    Nullable,
}

/// The type/format constraint applied to a present, non-null value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    Text { max: Option<usize> },
    Email { max: usize },
    Url,
    Date,
    Integer,
    Boolean,
    /// Object of named URLs (`{"github": "https://..."}`), native or JSON-encoded.
    UrlMap,
    /// Array of integers.
    IntegerList,
    /// Ordered list of strings, native or JSON-encoded.
    StringList,
    /// Uploaded image (size cap in KiB) or an already-stored path/URL.
    Image { max_kib: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldRule {
    pub name: &'static str,
    pub presence: Presence,
    pub kind: Kind,
}

impl FieldRule {
    pub const fn required(name: &'static str, kind: Kind) -> Self {
        Self {
            name,
            presence: Presence::Required,
            kind,
        }
    }

    pub const fn sometimes(name: &'static str, kind: Kind) -> Self {
        Self {
            name,
            presence: Presence::Sometimes,
            kind,
        }
    }

    pub const fn nullable(name: &'static str, kind: Kind) -> Self {
        Self {
            name,
            presence: Presence::Nullable,
            kind,
        }
    }

    /// The update-time variant of a create rule: required fields become "sometimes".
    pub const fn relaxed(self) -> Self {
        match self.presence {
            Presence::Required => Self {
                presence: Presence::Sometimes,
                ..self
            },
            _ => self,
        }
    }
}

/// Value substituted for an absent or null field on create.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldDefault {
    False,
    Zero,
    EmptyText,
    EmptyList,
}

impl FieldDefault {
    fn value(self) -> Value {
        match self {
            FieldDefault::False => Value::Bool(false),
            FieldDefault::Zero => Value::from(0),
            FieldDefault::EmptyText => Value::String(String::new()),
            FieldDefault::EmptyList => Value::Array(Vec::new()),
        }
    }
}

/// Fields that passed validation, normalized to canonical JSON values.
///
/// Only allow-listed fields survive. A key that is present with `Value::Null`
/// means the client explicitly cleared it.
#[derive(Debug, Clone, Default)]
pub struct Validated {
    values: Map<String, Value>,
    files: HashMap<String, UploadedFile>,
}

impl Validated {
    pub fn has(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn value(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    pub fn text(&self, name: &str) -> Option<String> {
        self.values.get(name)?.as_str().map(str::to_owned)
    }

    /// `None` when absent, `Some(None)` when explicitly null.
    pub fn nullable_text(&self, name: &str) -> Option<Option<String>> {
        self.values
            .get(name)
            .map(|v| v.as_str().map(str::to_owned))
    }

    pub fn integer(&self, name: &str) -> Option<i64> {
        self.values.get(name)?.as_i64()
    }

    pub fn int32(&self, name: &str) -> Option<i32> {
        self.integer(name).and_then(|v| i32::try_from(v).ok())
    }

    pub fn boolean(&self, name: &str) -> Option<bool> {
        self.values.get(name)?.as_bool()
    }

    pub fn date(&self, name: &str) -> Option<NaiveDate> {
        self.text(name).and_then(|s| parse_date(&s))
    }

    pub fn nullable_date(&self, name: &str) -> Option<Option<NaiveDate>> {
        self.values
            .get(name)
            .map(|v| v.as_str().and_then(parse_date))
    }

    pub fn string_list(&self, name: &str) -> Option<Vec<String>> {
        let items = self.values.get(name)?.as_array()?;
        Some(
            items
                .iter()
                .filter_map(|v| v.as_str().map(str::to_owned))
                .collect(),
        )
    }

    pub fn integer_list(&self, name: &str) -> Option<Vec<i64>> {
        let items = self.values.get(name)?.as_array()?;
        Some(items.iter().filter_map(Value::as_i64).collect())
    }

    pub fn string_map(&self, name: &str) -> Option<Option<std::collections::BTreeMap<String, String>>> {
        self.values.get(name).map(|v| {
            v.as_object().map(|map| {
                map.iter()
                    .filter_map(|(k, v)| v.as_str().map(|s| (k.clone(), s.to_owned())))
                    .collect()
            })
        })
    }

    pub fn take_file(&mut self, name: &str) -> Option<UploadedFile> {
        self.files.remove(name)
    }

    /// Fill absent or null fields with their named defaults.
    pub fn apply_defaults(&mut self, defaults: &[(&str, FieldDefault)]) {
        for (name, default) in defaults {
            let missing = self.values.get(*name).is_none_or(Value::is_null);
            if missing {
                self.values.insert((*name).to_string(), default.value());
            }
        }
    }
}

/// Check `form` against `rules`, dropping every field the rules do not name.
pub fn validate(form: RequestForm, rules: &[FieldRule]) -> Result<Validated, ValidationErrors> {
    let RequestForm { mut fields, mut files } = form;
    let mut errors = ValidationErrors::new();
    let mut validated = Validated::default();

    for rule in rules {
        let label = display_name(rule.name);

        if let Kind::Image { max_kib } = rule.kind {
            if let Some(file) = files.remove(rule.name) {
                if !file.is_image() {
                    errors.add(rule.name, format!("The {label} field must be an image."));
                } else if file.size_kib() > max_kib {
                    errors.add(
                        rule.name,
                        format!("The {label} field must not be greater than {max_kib} kilobytes."),
                    );
                } else {
                    validated.files.insert(rule.name.to_string(), file);
                }
                continue;
            }
        }

        let raw = fields.remove(rule.name).map(empty_to_null);

        match (raw, rule.presence) {
            (None, Presence::Required) | (Some(Value::Null), Presence::Required | Presence::Sometimes) => {
                errors.add(rule.name, format!("The {label} field is required."));
            }
            (None, _) => {}
            (Some(Value::Null), Presence::Nullable) => {
                validated.values.insert(rule.name.to_string(), Value::Null);
            }
            (Some(value), _) => match check_kind(rule.kind, value) {
                Ok(normalized) => {
                    validated.values.insert(rule.name.to_string(), normalized);
                }
                Err(message) => errors.add(rule.name, message.replace(":attribute", &label)),
            },
        }
    }

    if errors.is_empty() {
        Ok(validated)
    } else {
        Err(errors)
    }
}

fn empty_to_null(value: Value) -> Value {
    match value {
        Value::String(s) if s.trim().is_empty() => Value::Null,
        other => other,
    }
}

fn check_kind(kind: Kind, value: Value) -> Result<Value, String> {
    match kind {
        Kind::Text { max } => {
            let text = as_text(value)?;
            if let Some(max) = max {
                if text.chars().count() > max {
                    return Err(format!(
                        "The :attribute field must not be greater than {max} characters."
                    ));
                }
            }
            Ok(Value::String(text))
        }
        Kind::Email { max } => {
            let text = as_text(value)?;
            let text = text.trim().to_string();
            if text.chars().count() > max {
                return Err(format!(
                    "The :attribute field must not be greater than {max} characters."
                ));
            }
            if !text.as_str().validate_email() {
                return Err("The :attribute field must be a valid email address.".to_string());
            }
            Ok(Value::String(text))
        }
        Kind::Url => {
            let text = as_text(value)?;
            let text = text.trim().to_string();
            if !is_web_url(&text) {
                return Err("The :attribute field must be a valid URL.".to_string());
            }
            Ok(Value::String(text))
        }
        Kind::Date => {
            let text = as_text(value)?;
            parse_date(text.trim())
                .map(|d| Value::String(d.format("%Y-%m-%d").to_string()))
                .ok_or_else(|| "The :attribute field must be a valid date.".to_string())
        }
        Kind::Integer => {
            let n = coerce_integer(&value)
                .ok_or_else(|| "The :attribute field must be an integer.".to_string())?;
            i32::try_from(n).map(Value::from).map_err(|_| {
                format!(
                    "The :attribute field must be between {} and {}.",
                    i32::MIN,
                    i32::MAX
                )
            })
        }
        Kind::Boolean => coerce_bool(&value)
            .map(Value::Bool)
            .ok_or_else(|| "The :attribute field must be true or false.".to_string()),
        Kind::UrlMap => {
            let map = match value {
                Value::Object(map) => map,
                Value::String(s) => match serde_json::from_str::<Value>(&s) {
                    Ok(Value::Object(map)) => map,
                    _ => return Err("The :attribute field must be an array.".to_string()),
                },
                _ => return Err("The :attribute field must be an array.".to_string()),
            };

            let mut normalized = Map::new();
            for (key, entry) in map {
                match empty_to_null(entry) {
                    Value::Null => {}
                    Value::String(url) if is_web_url(url.trim()) => {
                        normalized.insert(key, Value::String(url.trim().to_string()));
                    }
                    _ => {
                        return Err(format!(
                            "The :attribute.{key} field must be a valid URL."
                        ));
                    }
                }
            }
            Ok(Value::Object(normalized))
        }
        Kind::IntegerList => {
            let Value::Array(items) = value else {
                return Err("The :attribute field must be an array.".to_string());
            };
            items
                .iter()
                .map(coerce_integer)
                .collect::<Option<Vec<i64>>>()
                .map(|ids| Value::Array(ids.into_iter().map(Value::from).collect()))
                .ok_or_else(|| "Every :attribute entry must be an integer.".to_string())
        }
        Kind::StringList => normalize_string_list(&value)
            .map(|items| Value::Array(items.into_iter().map(Value::String).collect()))
            .ok_or_else(|| "The :attribute field must be a list of strings.".to_string()),
        Kind::Image { .. } => {
            let text = as_text(value)
                .map_err(|_| "The :attribute field must be an image.".to_string())?;
            if text.chars().count() > 2048 {
                return Err("The :attribute field must not be greater than 2048 characters.".to_string());
            }
            Ok(Value::String(text))
        }
    }
}

/// Accept a native list of strings or a string holding a JSON-encoded one.
pub fn normalize_string_list(value: &Value) -> Option<Vec<String>> {
    match value {
        Value::Array(items) => items
            .iter()
            .map(|item| item.as_str().map(str::to_owned))
            .collect(),
        Value::String(encoded) => match serde_json::from_str::<Value>(encoded) {
            Ok(decoded @ Value::Array(_)) => normalize_string_list(&decoded),
            _ => None,
        },
        _ => None,
    }
}

fn as_text(value: Value) -> Result<String, String> {
    match value {
        Value::String(s) => Ok(s),
        _ => Err("The :attribute field must be a string.".to_string()),
    }
}

fn is_web_url(text: &str) -> bool {
    let lower = text.to_ascii_lowercase();
    (lower.starts_with("http://") || lower.starts_with("https://")) && text.validate_url()
}

fn coerce_integer(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn coerce_bool(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::Number(n) => match n.as_i64() {
            Some(0) => Some(false),
            Some(1) => Some(true),
            _ => None,
        },
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "on" | "yes" => Some(true),
            "0" | "false" | "off" | "no" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

/// Accepts `YYYY-MM-DD` or an RFC 3339 timestamp (date part kept).
pub fn parse_date(text: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(text).ok().map(|dt| dt.date_naive()))
}
