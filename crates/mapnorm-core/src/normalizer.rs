//! Normalizer: converts a [`Value`] tree into an ordered JSON mapping.
//!
//! Each field of the input's field set goes through, in order: visibility
//! filtering, date-time canonicalisation, recursion, null filtering, key case
//! conversion, the property callback, and the ignore lists. Objects enumerate
//! their fields; maps and lists enumerate their entries (list index as key).
//! Any other root value normalises to the empty mapping.

use std::borrow::Cow;
use std::collections::HashSet;
use std::sync::Arc;

use chrono::{DateTime, FixedOffset, Utc};
use serde_json::{Map, Number, Value as JsonValue};

use crate::config::{NormalizerConfig, PropertyCallback};
use crate::error::{ConfigError, NormalizeError};
use crate::functions::FunctionRegistry;
use crate::reflect::Reflect;
use crate::types::{Value, Visibility};

/// Normalised output. Keys keep first-insertion order.
pub type Output = Map<String, JsonValue>;

/// Date-times are rendered in UTC with a 12-hour clock and no AM/PM marker,
/// so `15:00` and `03:00` print the same.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %I:%M:%S";

static PUBLIC: Visibility = Visibility::Public;

/// One enumerated `(name, visibility, value)` triple of a field set.
struct Entry<'a> {
    name: Cow<'a, str>,
    visibility: &'a Visibility,
    value: &'a Value,
}

/// Holds a resolved configuration and a function registry; cheap to clone
/// and safe to share between threads.
#[derive(Debug, Clone)]
pub struct Normalizer {
    config: Arc<NormalizerConfig>,
    registry: Arc<FunctionRegistry>,
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new(NormalizerConfig::default())
    }
}

impl Normalizer {
    pub fn new(config: NormalizerConfig) -> Self {
        Self::with_registry(config, FunctionRegistry::default())
    }

    pub fn with_registry(config: NormalizerConfig, registry: FunctionRegistry) -> Self {
        Self {
            config: Arc::new(config),
            registry: Arc::new(registry),
        }
    }

    /// Validate raw option overrides and build a normalizer with the default
    /// registry.
    pub fn from_options(options: JsonValue) -> Result<Self, ConfigError> {
        NormalizerConfig::from_value(options).map(Self::new)
    }

    pub fn config(&self) -> &NormalizerConfig {
        &self.config
    }

    pub fn registry(&self) -> &FunctionRegistry {
        &self.registry
    }

    pub fn normalize(&self, value: &Value) -> Result<Output, NormalizeError> {
        self.normalize_with_ignored(value, std::iter::empty::<&str>())
    }

    /// Like [`normalize`](Self::normalize), additionally dropping
    /// `ignored_keys` from the top level only. Nested mappings are not
    /// affected.
    pub fn normalize_with_ignored<I, S>(
        &self,
        value: &Value,
        ignored_keys: I,
    ) -> Result<Output, NormalizeError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let ignored: HashSet<String> = ignored_keys
            .into_iter()
            .map(|k| k.as_ref().to_string())
            .collect();
        let mut path = HashSet::new();
        self.walk(value, Some(&ignored), &mut path)
    }

    pub fn normalize_reflect<T: Reflect + ?Sized>(&self, value: &T) -> Result<Output, NormalizeError> {
        self.normalize(&value.reflect())
    }

    // -----------------------------------------------------------------------
    // Recursion
    // -----------------------------------------------------------------------

    /// `path` holds the ids of the objects on the current recursion path.
    fn walk(
        &self,
        value: &Value,
        ignored: Option<&HashSet<String>>,
        path: &mut HashSet<usize>,
    ) -> Result<Output, NormalizeError> {
        match value {
            Value::Object(obj) => {
                let id = obj.id();
                if !path.insert(id) {
                    tracing::warn!(type_name = obj.type_name(), "cyclic object graph");
                    return Err(NormalizeError::CyclicStructure {
                        type_name: obj.type_name().to_string(),
                    });
                }
                let fields = obj.fields();
                let entries = fields.iter().map(|f| Entry {
                    name: Cow::Borrowed(f.name.as_str()),
                    visibility: &f.visibility,
                    value: &f.value,
                });
                let result = self.collect(entries, ignored, path);
                drop(fields);
                path.remove(&id);
                result
            }
            Value::Map(items) => {
                let entries = items.iter().map(|(k, v)| Entry {
                    name: Cow::Borrowed(k.as_str()),
                    visibility: &PUBLIC,
                    value: v,
                });
                self.collect(entries, ignored, path)
            }
            Value::List(items) => {
                let entries = items.iter().enumerate().map(|(i, v)| Entry {
                    name: Cow::Owned(i.to_string()),
                    visibility: &PUBLIC,
                    value: v,
                });
                self.collect(entries, ignored, path)
            }
            _ => Ok(Output::new()),
        }
    }

    fn collect<'a>(
        &self,
        entries: impl Iterator<Item = Entry<'a>>,
        ignored: Option<&HashSet<String>>,
        path: &mut HashSet<usize>,
    ) -> Result<Output, NormalizeError> {
        let config = &*self.config;
        let mut out = Output::new();

        for entry in entries {
            if entry.visibility.is_protected() && !config.include_protected_properties() {
                tracing::trace!(field = %entry.name, "skipping protected field");
                continue;
            }

            let value = self.convert(entry.value, path)?;
            if value.is_null() && !config.include_null_values() {
                tracing::trace!(field = %entry.name, "skipping null field");
                continue;
            }

            let mut key = entry.name.into_owned();
            if config.convert_properties_to_snake_case() {
                key = self.registry.call(config.case_converter_function(), &key)?;
            }

            match config.property_callback() {
                Some(PropertyCallback::Named(spec)) => {
                    key = self.registry.call(spec, &key)?;
                }
                Some(PropertyCallback::KeyValue(callback)) => match callback(&key, &value) {
                    Some(renamed) => key = renamed,
                    None => {
                        tracing::trace!(field = %key, "dropped by property callback");
                        continue;
                    }
                },
                None => {}
            }

            if config.ignored_properties().contains(&key)
                || ignored.is_some_and(|keys| keys.contains(&key))
            {
                tracing::trace!(field = %key, "skipping ignored field");
                continue;
            }

            // Overwrites keep the position of the first insertion.
            out.insert(key, value);
        }

        Ok(out)
    }

    fn convert(&self, value: &Value, path: &mut HashSet<usize>) -> Result<JsonValue, NormalizeError> {
        Ok(match value {
            Value::Null => JsonValue::Null,
            Value::Bool(b) => JsonValue::Bool(*b),
            Value::Int(i) => JsonValue::from(*i),
            Value::UInt(u) => JsonValue::from(*u),
            Value::Float(f) => float_to_json(*f),
            Value::String(s) => JsonValue::String(s.clone()),
            Value::DateTime(dt) => JsonValue::String(format_timestamp(dt)),
            Value::List(_) | Value::Map(_) | Value::Object(_) => {
                JsonValue::Object(self.walk(value, None, path)?)
            }
        })
    }
}

/// Render `dt` in UTC with [`TIMESTAMP_FORMAT`].
pub fn format_timestamp(dt: &DateTime<FixedOffset>) -> String {
    dt.with_timezone(&Utc).format(TIMESTAMP_FORMAT).to_string()
}

/// Non-finite floats have no JSON number form and are emitted as strings.
fn float_to_json(f: f64) -> JsonValue {
    match Number::from_f64(f) {
        Some(n) => JsonValue::Number(n),
        None if f.is_nan() => JsonValue::String("NaN".to_string()),
        None if f.is_sign_positive() => JsonValue::String("Infinity".to_string()),
        None => JsonValue::String("-Infinity".to_string()),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
