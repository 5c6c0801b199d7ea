//! # Identity Newtypes
//!
//! Domain-primitive newtypes for the names that flow through policies and
//! requests. A [`TherapyType`] cannot be passed where a [`DiagnosisCode`] is
//! expected, and neither can be empty.
//!
//! Therapy types are free-form names chosen by the policy owner (`ABA`,
//! `Fono`, `Psicologia`, ...). Comparison is exact and case-sensitive.

use std::borrow::Borrow;
use std::fmt;

use serde::{Deserialize, Serialize};

/// The name of a therapy modality, e.g. `ABA` or `Fono`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TherapyType(String);

impl TherapyType {
    /// Create a therapy type, returning `None` if `name` is empty or blank.
    pub fn new(name: impl Into<String>) -> Option<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return None;
        }
        Some(Self(name))
    }

    /// Access the name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

// Lets `BTreeMap<TherapyType, _>` be queried with a plain `&str`.
impl Borrow<str> for TherapyType {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TherapyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A clinical diagnosis code (CID), e.g. `F84.0`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DiagnosisCode(String);

impl DiagnosisCode {
    /// Create a diagnosis code, returning `None` if `code` is empty or blank.
    pub fn new(code: impl Into<String>) -> Option<Self> {
        let code = code.into();
        if code.trim().is_empty() {
            return None;
        }
        Some(Self(code))
    }

    /// Access the code as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The first prefix in `prefixes` that this code starts with, if any.
    pub fn matching_prefix<'a, I>(&self, prefixes: I) -> Option<&'a str>
    where
        I: IntoIterator<Item = &'a String>,
    {
        prefixes
            .into_iter()
            .map(String::as_str)
            .find(|prefix| self.0.starts_with(prefix))
    }
}

impl fmt::Display for DiagnosisCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
