//! Named key functions.
//!
//! Case converters and named property callbacks are referenced from
//! configuration as a [`FunctionSpec`]: an identifier followed by optional
//! pipe-delimited extra arguments (`safe_snake_case|_`). The identifier is
//! looked up in a [`FunctionRegistry`] when a key is converted; the key is
//! passed first, followed by the extra arguments.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::case;
use crate::error::{FunctionSpecError, NormalizeError};

/// A key function: `(key, extra_args) -> new_key`.
pub type KeyFn = Arc<dyn Fn(&str, &[String]) -> String + Send + Sync>;

// ---------------------------------------------------------------------------
// FunctionSpec
// ---------------------------------------------------------------------------

/// A function identifier plus the extra arguments bound after the key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FunctionSpec {
    name: String,
    args: Vec<String>,
}

impl FunctionSpec {
    pub fn new<I, S>(name: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }
}

impl Default for FunctionSpec {
    /// `safe_snake_case|_`
    fn default() -> Self {
        Self::new("safe_snake_case", ["_"])
    }
}

impl FromStr for FunctionSpec {
    type Err = FunctionSpecError;

    /// The name is trimmed; arguments are kept verbatim so whitespace
    /// separators survive.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split('|');
        let name = parts.next().unwrap_or_default().trim();
        if name.is_empty() {
            return Err(FunctionSpecError {
                spec: s.to_string(),
            });
        }
        Ok(Self::new(name, parts))
    }
}

impl fmt::Display for FunctionSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        for arg in &self.args {
            write!(f, "|{arg}")?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// FunctionRegistry
// ---------------------------------------------------------------------------

/// Identifier → [`KeyFn`] table.
///
/// [`FunctionRegistry::default`] carries the built-in converters:
///
/// | Name | Extra args |
/// |------|------------|
/// | `safe_snake_case` | separator (default `_`) |
/// | `snake_case` | separator (default `_`) |
/// | `kebab_case` | – |
/// | `camel_case`, `pascal_case` | – |
/// | `lowercase`, `uppercase` | – |
/// | `prefix`, `suffix` | text to add |
#[derive(Clone)]
pub struct FunctionRegistry {
    functions: HashMap<String, KeyFn>,
}

impl FunctionRegistry {
    /// A registry with no functions at all.
    pub fn empty() -> Self {
        Self {
            functions: HashMap::new(),
        }
    }

    /// Register `f` under `name`, replacing any existing entry.
    pub fn register<F>(&mut self, name: impl Into<String>, f: F) -> &mut Self
    where
        F: Fn(&str, &[String]) -> String + Send + Sync + 'static,
    {
        self.functions.insert(name.into(), Arc::new(f));
        self
    }

    pub fn get(&self, name: &str) -> Option<&KeyFn> {
        self.functions.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.functions.contains_key(name)
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.functions.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Resolve `spec` and apply it to `key`.
    pub fn call(&self, spec: &FunctionSpec, key: &str) -> Result<String, NormalizeError> {
        let f = self
            .get(spec.name())
            .ok_or_else(|| NormalizeError::CallableNotFound {
                name: spec.name().to_string(),
            })?;
        Ok(f(key, spec.args()))
    }
}

impl Default for FunctionRegistry {
    fn default() -> Self {
        let mut registry = Self::empty();
        registry
            .register("safe_snake_case", |key, args| {
                case::safe_snake_case(key, separator(args))
            })
            .register("snake_case", |key, args| case::snake_case(key, separator(args)))
            .register("kebab_case", |key, _| case::safe_snake_case(key, "-"))
            .register("camel_case", |key, _| case::camel_case(key))
            .register("pascal_case", |key, _| case::pascal_case(key))
            .register("lowercase", |key, _| key.to_lowercase())
            .register("uppercase", |key, _| key.to_uppercase())
            .register("prefix", |key, args| format!("{}{key}", args.concat()))
            .register("suffix", |key, args| format!("{key}{}", args.concat()));
        registry
    }
}

impl fmt::Debug for FunctionRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FunctionRegistry")
            .field("functions", &self.names())
            .finish()
    }
}

fn separator(args: &[String]) -> &str {
    args.first().map(String::as_str).unwrap_or("_")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
