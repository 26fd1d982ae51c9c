use thiserror::Error;

/// Raised while resolving options into a [`NormalizerConfig`](crate::NormalizerConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("options must be a mapping, got {found}")]
    NotAMapping { found: &'static str },
    #[error("unknown option `{key}`")]
    UnknownOption { key: String },
    #[error("option `{key}` must be {expected}, got {found}")]
    InvalidType {
        key: String,
        expected: &'static str,
        found: &'static str,
    },
    #[error("option `{key}`: {source}")]
    InvalidFunctionSpec {
        key: String,
        #[source]
        source: FunctionSpecError,
    },
    #[error("invalid options: {0}")]
    Options(#[from] serde_json::Error),
    #[error(transparent)]
    Source(#[from] config::ConfigError),
}

impl ConfigError {
    /// The option key this error is about, when there is one.
    pub fn key(&self) -> Option<&str> {
        match self {
            ConfigError::UnknownOption { key }
            | ConfigError::InvalidType { key, .. }
            | ConfigError::InvalidFunctionSpec { key, .. } => Some(key),
            ConfigError::NotAMapping { .. } | ConfigError::Options(_) | ConfigError::Source(_) => None,
        }
    }
}

/// A `name|arg|...` string with an empty name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("function spec {spec:?} has an empty name")]
pub struct FunctionSpecError {
    pub spec: String,
}

/// Raised by [`Normalizer::normalize`](crate::Normalizer::normalize). Fatal to
/// the whole call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NormalizeError {
    #[error("callable `{name}` not found")]
    CallableNotFound { name: String },
    #[error("cyclic structure: object of type `{type_name}` is its own ancestor")]
    CyclicStructure { type_name: String },
}

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Normalize(#[from] NormalizeError),
}

pub type Result<T> = std::result::Result<T, Error>;
