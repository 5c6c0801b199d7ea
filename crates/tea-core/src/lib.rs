//! # tea-core — Foundational Types for the TEA Compliance Engine
//!
//! This crate is the leaf of the workspace. It defines the types every other
//! crate shares: strict calendar dates and period buckets, therapy and
//! diagnosis identifiers, the typed request context, read-only session
//! history queries, and the error taxonomy.
//!
//! ## Key Design Principles
//!
//! 1. **Validate once at the boundary.** Requests are turned into a typed
//!    [`RuleContext`] before any rule runs. A missing field or bad date is a
//!    [`ContextError`] or [`DateParseError`] naming the field, never a panic
//!    deep inside a rule.
//!
//! 2. **No clock.** [`CalendarDate`] has no time-of-day or timezone. The
//!    request date supplied by the caller is the only "now".
//!
//! 3. **ISO week-year buckets.** [`Period::Weekly`] keys use the year that
//!    owns the ISO week, not the calendar year of the date.
//!
//! 4. **History is borrowed, never mutated.** [`SessionHistory`] is a view
//!    over the caller's slice.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `tea-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod context;
pub mod digest;
pub mod error;
pub mod history;
pub mod identity;
pub mod temporal;

// Re-export primary types for ergonomic imports.
pub use context::{Beneficiary, Procedure, RequestDocument, RuleContext, SessionRecord};
pub use digest::ContentDigest;
pub use error::{ConfigurationError, ContextError, DateParseError, TeaError};
pub use history::SessionHistory;
pub use identity::{DiagnosisCode, TherapyType};
pub use temporal::{CalendarDate, Period, PeriodKey};
