//! Schema-driven data synthesis for stressity.
//!
//! This crate turns a feature's KeyMeta vocabulary into concrete records and
//! projects those records onto payload schema trees.
//!
//! # Architecture
//!
//! ```text
//!   KeyMeta ──► Synthesizer ──► SyntheticRecord (one per unit)
//!                   │                   │
//!          GeneratorRegistry            ▼
//!                               project(schema) ──► JSON bytes
//! ```
//!
//! The [`validator`] runs before any of this and rejects configurations the
//! generators cannot serve.
//!
//! # Example
//!
//! ```rust
//! use loadtest_generator::{encode_json, project, rng_for, GeneratorRegistry, Synthesizer};
//! use loadtest_core::{KeyMeta, SchemaMap};
//!
//! let key_meta: KeyMeta = serde_json::from_str(r#"{"id": {"type": "uuid"}}"#).unwrap();
//! let schema: SchemaMap = serde_json::from_str(r#"{"id": {}}"#).unwrap();
//!
//! let registry = GeneratorRegistry::new();
//! let mut synth = Synthesizer::new(&registry, &key_meta, rng_for(Some(42)));
//! let record = synth.synthesize_unit().unwrap();
//! let payload = encode_json(&project(&schema, &record)).unwrap();
//! assert!(payload.starts_with(b"{\"id\":\""));
//! ```

pub mod generators;
pub mod projection;
pub mod registry;
pub mod synthesizer;
pub mod validator;

pub use projection::{encode_batch, encode_json, project, EncodeError};
pub use registry::{GeneratorError, GeneratorKind, GeneratorRegistry};
pub use synthesizer::{referenced_identifiers, rng_for, Synthesizer};
pub use validator::{validate, validate_feature};
