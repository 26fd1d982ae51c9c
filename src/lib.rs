//! mapnorm — recursive object-to-mapping normalizer.
//!
//! Converts structured values (records with visibility-tagged fields, lists,
//! mappings, date-times) into plain ordered JSON mappings with renamed keys,
//! filtered fields and canonical timestamps. The core lives in
//! `mapnorm-core` and is re-exported here so integration tests and the CLI
//! import it from one place.
//!
//! # Architecture
//!
//! ```text
//! input ──► Reflect ──► Value ──► Normalizer ──► JSON
//!                                     │
//!                   NormalizerConfig + FunctionRegistry
//! ```

pub mod cli;

pub use mapnorm_core::*;
