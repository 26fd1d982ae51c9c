//! mapnorm-core — recursive object-to-mapping normalizer.
//!
//! This crate exposes the value model, the reflection adapter, option
//! resolution and the normalizer itself.
//!
//! # Pipeline
//!
//! ```text
//! Reflect ──► Value ──► Normalizer ──► serde_json::Map
//!                          │
//!          NormalizerConfig + FunctionRegistry
//! ```
//!
//! The normalizer holds no mutable state; one instance can serve any number
//! of threads.

pub mod case;
pub mod config;
pub mod error;
pub mod functions;
pub mod normalizer;
pub mod reflect;
pub mod types;

pub use config::{NormalizerConfig, NormalizerConfigBuilder, PropertyCallback, SQL_BEHAVIOURAL_PROPERTIES};
pub use error::{ConfigError, Error, NormalizeError, Result};
pub use functions::{FunctionRegistry, FunctionSpec};
pub use normalizer::{Normalizer, Output};
pub use reflect::Reflect;
pub use types::{Field, Object, ObjectBuilder, ObjectRef, Value, Visibility};
