//! Normalizer configuration.
//!
//! [`NormalizerConfig::from_value`] validates raw option overrides (a JSON
//! mapping) against the closed option set. [`NormalizerConfig::load`] reads
//! the same options from a TOML/YAML/JSON file layered over the built-in
//! defaults and `MAPNORM_*` environment variables. [`NormalizerConfig::builder`]
//! is the typed path, and the only way to install a closure callback.

use std::collections::BTreeSet;
use std::fmt;
use std::path::Path;
use std::sync::Arc;

use serde::Deserialize;
use serde_json::{Map, Value as JsonValue};

use crate::error::ConfigError;
use crate::functions::FunctionSpec;

// ---------------------------------------------------------------------------
// Embedded defaults
// ---------------------------------------------------------------------------

const DEFAULT_OPTIONS: &str = r#"
include_protected_properties      = false
include_null_values               = false
ignored_properties                = []
convert_properties_to_snake_case  = true
case_converter_function           = "safe_snake_case|_"
ignore_sql_behavioural_properties = false
"#;

/// Audit columns dropped when `ignore_sql_behavioural_properties` is set.
pub const SQL_BEHAVIOURAL_PROPERTIES: [&str; 6] = [
    "created_at",
    "created_by",
    "updated_at",
    "updated_by",
    "deleted_at",
    "deleted_by",
];

const ENV_PREFIX: &str = "MAPNORM";

// ---------------------------------------------------------------------------
// Option table
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy)]
enum OptionKind {
    Bool,
    StringList,
    Function,
    OptionalFunction,
}

impl OptionKind {
    fn expected(self) -> &'static str {
        match self {
            OptionKind::Bool => "a boolean",
            OptionKind::StringList => "a list of strings",
            OptionKind::Function => "a function spec string",
            OptionKind::OptionalFunction => "a function spec string or null",
        }
    }

    fn accepts(self, value: &JsonValue) -> bool {
        match self {
            OptionKind::Bool => value.is_boolean(),
            OptionKind::StringList => value
                .as_array()
                .is_some_and(|items| items.iter().all(JsonValue::is_string)),
            OptionKind::Function => value.is_string(),
            OptionKind::OptionalFunction => value.is_string() || value.is_null(),
        }
    }
}

const OPTIONS: &[(&str, OptionKind)] = &[
    ("include_protected_properties", OptionKind::Bool),
    ("include_null_values", OptionKind::Bool),
    ("property_callback", OptionKind::OptionalFunction),
    ("ignored_properties", OptionKind::StringList),
    ("convert_properties_to_snake_case", OptionKind::Bool),
    ("case_converter_function", OptionKind::Function),
    ("ignore_sql_behavioural_properties", OptionKind::Bool),
];

fn option_kind(key: &str) -> Option<OptionKind> {
    OPTIONS.iter().find(|(name, _)| *name == key).map(|(_, kind)| *kind)
}

fn json_kind(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "a boolean",
        JsonValue::Number(_) => "a number",
        JsonValue::String(_) => "a string",
        JsonValue::Array(_) => "a list",
        JsonValue::Object(_) => "a mapping",
    }
}

// ---------------------------------------------------------------------------
// Raw options
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawOptions {
    #[serde(default)]
    include_protected_properties: bool,
    #[serde(default)]
    include_null_values: bool,
    #[serde(default)]
    property_callback: Option<String>,
    #[serde(default)]
    ignored_properties: Vec<String>,
    #[serde(default = "default_convert_properties_to_snake_case")]
    convert_properties_to_snake_case: bool,
    #[serde(default = "default_case_converter_function")]
    case_converter_function: String,
    #[serde(default)]
    ignore_sql_behavioural_properties: bool,
}

fn default_convert_properties_to_snake_case() -> bool { true }
fn default_case_converter_function() -> String { FunctionSpec::default().to_string() }

// ---------------------------------------------------------------------------
// Public config types
// ---------------------------------------------------------------------------

/// Closure callback: `(key, normalised_value) -> Some(new_key)` or `None` to
/// drop the field.
pub type KeyValueFn = Arc<dyn Fn(&str, &JsonValue) -> Option<String> + Send + Sync>;

/// The per-field key callback.
#[derive(Clone)]
pub enum PropertyCallback {
    /// Resolved through the registry and called with the key and extra args.
    Named(FunctionSpec),
    /// Called with the key and the normalised value.
    KeyValue(KeyValueFn),
}

impl fmt::Debug for PropertyCallback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyCallback::Named(spec) => f.debug_tuple("Named").field(spec).finish(),
            PropertyCallback::KeyValue(_) => f.write_str("KeyValue(<closure>)"),
        }
    }
}

/// Resolved, immutable normalizer options.
#[derive(Debug, Clone)]
pub struct NormalizerConfig {
    include_protected_properties: bool,
    include_null_values: bool,
    property_callback: Option<PropertyCallback>,
    ignored_properties: BTreeSet<String>,
    convert_properties_to_snake_case: bool,
    case_converter_function: FunctionSpec,
    ignore_sql_behavioural_properties: bool,
}

impl Default for NormalizerConfig {
    fn default() -> Self {
        Self {
            include_protected_properties: false,
            include_null_values: false,
            property_callback: None,
            ignored_properties: BTreeSet::new(),
            convert_properties_to_snake_case: default_convert_properties_to_snake_case(),
            case_converter_function: FunctionSpec::default(),
            ignore_sql_behavioural_properties: false,
        }
    }
}

impl NormalizerConfig {
    pub fn builder() -> NormalizerConfigBuilder {
        NormalizerConfigBuilder::default()
    }

    /// Validate raw overrides. `null` counts as "no overrides".
    pub fn from_value(overrides: JsonValue) -> Result<Self, ConfigError> {
        let mut raw = match overrides {
            JsonValue::Object(map) => map,
            JsonValue::Null => Map::new(),
            other => {
                return Err(ConfigError::NotAMapping {
                    found: json_kind(&other),
                })
            }
        };

        if let Some(key) = raw.keys().find(|k| option_kind(k).is_none()) {
            return Err(ConfigError::UnknownOption { key: key.clone() });
        }

        if raw.get("ignore_sql_behavioural_properties") == Some(&JsonValue::Bool(true)) {
            merge_sql_behavioural_properties(&mut raw);
        }

        for (key, value) in &raw {
            let Some(kind) = option_kind(key) else { continue };
            if !kind.accepts(value) {
                return Err(ConfigError::InvalidType {
                    key: key.clone(),
                    expected: kind.expected(),
                    found: json_kind(value),
                });
            }
        }

        let options: RawOptions = serde_json::from_value(JsonValue::Object(raw))?;
        Self::from_raw(options)
    }

    /// Load options from `path` (format chosen by extension) layered over the
    /// defaults, then `MAPNORM_*` environment variables.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw: JsonValue = config::Config::builder()
            .add_source(config::File::from_str(DEFAULT_OPTIONS, config::FileFormat::Toml))
            .add_source(config::File::from(path))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("ignored_properties"),
            )
            .build()?
            .try_deserialize()?;
        Self::from_value(raw)
    }

    fn from_raw(options: RawOptions) -> Result<Self, ConfigError> {
        let case_converter_function = parse_spec("case_converter_function", &options.case_converter_function)?;
        let property_callback = options
            .property_callback
            .as_deref()
            .map(|raw| parse_spec("property_callback", raw).map(PropertyCallback::Named))
            .transpose()?;

        let config = Self {
            include_protected_properties: options.include_protected_properties,
            include_null_values: options.include_null_values,
            property_callback,
            ignored_properties: options.ignored_properties.into_iter().collect(),
            convert_properties_to_snake_case: options.convert_properties_to_snake_case,
            case_converter_function,
            ignore_sql_behavioural_properties: options.ignore_sql_behavioural_properties,
        };
        tracing::debug!(
            converter = %config.case_converter_function,
            ignored = config.ignored_properties.len(),
            callback = config.property_callback.is_some(),
            "resolved normalizer options"
        );
        Ok(config)
    }

    pub fn include_protected_properties(&self) -> bool {
        self.include_protected_properties
    }

    pub fn include_null_values(&self) -> bool {
        self.include_null_values
    }

    pub fn property_callback(&self) -> Option<&PropertyCallback> {
        self.property_callback.as_ref()
    }

    pub fn ignored_properties(&self) -> &BTreeSet<String> {
        &self.ignored_properties
    }

    pub fn convert_properties_to_snake_case(&self) -> bool {
        self.convert_properties_to_snake_case
    }

    pub fn case_converter_function(&self) -> &FunctionSpec {
        &self.case_converter_function
    }

    pub fn ignore_sql_behavioural_properties(&self) -> bool {
        self.ignore_sql_behavioural_properties
    }
}

fn merge_sql_behavioural_properties(raw: &mut Map<String, JsonValue>) {
    let entry = raw
        .entry("ignored_properties")
        .or_insert_with(|| JsonValue::Array(Vec::new()));
    // A non-list is left alone and rejected by the type check.
    if let JsonValue::Array(items) = entry {
        for name in SQL_BEHAVIOURAL_PROPERTIES {
            if !items.iter().any(|v| v.as_str() == Some(name)) {
                items.push(JsonValue::String(name.to_string()));
            }
        }
    }
}

fn parse_spec(key: &str, raw: &str) -> Result<FunctionSpec, ConfigError> {
    raw.parse().map_err(|source| ConfigError::InvalidFunctionSpec {
        key: key.to_string(),
        source,
    })
}

// ---------------------------------------------------------------------------
// Builder
// ---------------------------------------------------------------------------

/// Typed construction of a [`NormalizerConfig`].
#[derive(Debug, Clone, Default)]
pub struct NormalizerConfigBuilder {
    config: NormalizerConfig,
}

impl NormalizerConfigBuilder {
    pub fn include_protected_properties(mut self, yes: bool) -> Self {
        self.config.include_protected_properties = yes;
        self
    }

    pub fn include_null_values(mut self, yes: bool) -> Self {
        self.config.include_null_values = yes;
        self
    }

    pub fn ignore_property(mut self, key: impl Into<String>) -> Self {
        self.config.ignored_properties.insert(key.into());
        self
    }

    pub fn ignored_properties<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config
            .ignored_properties
            .extend(keys.into_iter().map(Into::into));
        self
    }

    pub fn convert_properties_to_snake_case(mut self, yes: bool) -> Self {
        self.config.convert_properties_to_snake_case = yes;
        self
    }

    pub fn case_converter(mut self, spec: FunctionSpec) -> Self {
        self.config.case_converter_function = spec;
        self
    }

    /// A named key-only callback.
    pub fn property_callback(mut self, spec: FunctionSpec) -> Self {
        self.config.property_callback = Some(PropertyCallback::Named(spec));
        self
    }

    /// A `(key, value)` closure. Returning `None` drops the field.
    pub fn property_callback_fn<F>(mut self, f: F) -> Self
    where
        F: Fn(&str, &JsonValue) -> Option<String> + Send + Sync + 'static,
    {
        self.config.property_callback = Some(PropertyCallback::KeyValue(Arc::new(f)));
        self
    }

    pub fn ignore_sql_behavioural_properties(mut self, yes: bool) -> Self {
        self.config.ignore_sql_behavioural_properties = yes;
        self
    }

    pub fn build(mut self) -> NormalizerConfig {
        if self.config.ignore_sql_behavioural_properties {
            self.config
                .ignored_properties
                .extend(SQL_BEHAVIOURAL_PROPERTIES.iter().map(|s| s.to_string()));
        }
        self.config
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
