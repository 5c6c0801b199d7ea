//! # tea-policy — Policy Configuration
//!
//! Turns a policy file (JSON or YAML) into the validated, immutable
//! [`PolicyConfig`] a compliance engine is built around.
//!
//! ## Architecture
//!
//! ```text
//! policy.json / policy.yaml
//!        │  parser.rs  (serde_json / serde_yaml, path-bearing errors)
//!        ▼
//!   PolicyDocument       free strings, raw integers
//!        │  config.rs  (eager validation, ConfigurationError)
//!        ▼
//!   PolicyConfig         Period enums, TherapyType keys, unsigned counts
//! ```
//!
//! There is no global policy. Each engine owns one `PolicyConfig`, so several
//! policies can coexist in one process and be tested independently.

pub mod config;
pub mod error;
pub mod parser;

pub use config::{
    AgeBand, FrequencyRule, PolicyConfig, PolicyDocument, PolicySummary, SessionLimits,
};
pub use error::{PolicyError, PolicyResult};
pub use parser::{load_policy, load_policy_document, PolicyFormat};
