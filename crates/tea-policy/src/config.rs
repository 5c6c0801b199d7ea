//! # Policy Configuration
//!
//! Two layers:
//!
//! - [`PolicyDocument`] mirrors the policy file exactly (field names, free
//!   strings, raw integers). It is what `serde` reads.
//! - [`PolicyConfig`] is the validated, typed model the rules consume:
//!   periods are [`Period`] enums, therapy types are [`TherapyType`]s, counts
//!   are unsigned.
//!
//! The only way to obtain a `PolicyConfig` is through validation, so a rule
//! can never observe an unsupported period or a negative limit. Validation
//! fails on the first violation and no partially valid configuration is ever
//! returned.
//!
//! ## Document Shape
//!
//! ```json
//! {
//!   "elegibilidade": {"idade_maxima": 21},
//!   "cobertura": {"cid_validos": ["F84"], "tipos_terapia": ["ABA", "Fono"]},
//!   "limites_sessoes": {"ABA": {"ate_12": 8, "acima_12": 4}},
//!   "frequencia_maxima": {"ABA": {"periodo": "mensal", "quantidade": 10}},
//!   "intervalo_minimo_dias": {"Fono": 7},
//!   "periodo_repeticao_proibida": {"Avaliacao": 180},
//!   "nao_permitir_mesmo_dia": ["Psicologia"]
//! }
//! ```

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize};
use tea_core::{ConfigurationError, Period, TherapyType};

use crate::error::PolicyResult;

// ---------------------------------------------------------------------------
// Wire document
// ---------------------------------------------------------------------------

/// A policy as written in a JSON or YAML file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolicyDocument {
    #[serde(rename = "elegibilidade")]
    pub eligibility: EligibilitySection,
    #[serde(rename = "cobertura")]
    pub coverage: CoverageSection,
    #[serde(rename = "limites_sessoes", default)]
    pub session_limits: BTreeMap<String, SessionLimitsDocument>,
    #[serde(rename = "frequencia_maxima", default)]
    pub frequency_max: BTreeMap<String, FrequencyDocument>,
    #[serde(rename = "intervalo_minimo_dias", default)]
    pub minimum_interval_days: BTreeMap<String, i64>,
    #[serde(rename = "periodo_repeticao_proibida", default)]
    pub forbidden_repetition_days: BTreeMap<String, i64>,
    #[serde(rename = "nao_permitir_mesmo_dia", default)]
    pub no_same_day: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EligibilitySection {
    #[serde(rename = "idade_maxima")]
    pub max_age: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoverageSection {
    #[serde(rename = "cid_validos", default)]
    pub diagnosis_prefixes: Vec<String>,
    #[serde(rename = "tipos_terapia", default)]
    pub therapy_types: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionLimitsDocument {
    #[serde(rename = "ate_12", default, skip_serializing_if = "Option::is_none")]
    pub up_to_12: Option<i64>,
    #[serde(rename = "acima_12", default, skip_serializing_if = "Option::is_none")]
    pub over_12: Option<i64>,
}

/// A frequency rule before validation.
///
/// `quantity` is kept as a raw JSON value so that a non-integer (`2.5`,
/// `"3"`, `null`) is reported with the exact value the policy carried.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrequencyDocument {
    #[serde(rename = "periodo", default)]
    pub period: String,
    #[serde(rename = "quantidade", default)]
    pub quantity: serde_json::Value,
}

// ---------------------------------------------------------------------------
// Typed model
// ---------------------------------------------------------------------------

/// Age at or below which the `ate_12` session limits apply.
pub const AGE_BAND_SPLIT: u32 = 12;

/// Partition used to select session limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AgeBand {
    /// `age <= 12`.
    #[serde(rename = "ate_12")]
    UpTo12,
    /// `age > 12`.
    #[serde(rename = "acima_12")]
    Over12,
}

impl AgeBand {
    /// Band for a beneficiary age. Age 12 belongs to the lower band.
    pub fn for_age(age: u32) -> Self {
        if age <= AGE_BAND_SPLIT {
            Self::UpTo12
        } else {
            Self::Over12
        }
    }

    /// Policy name of the band.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::UpTo12 => "ate_12",
            Self::Over12 => "acima_12",
        }
    }
}

impl fmt::Display for AgeBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-band session limits for one therapy type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SessionLimits {
    up_to_12: Option<u32>,
    over_12: Option<u32>,
}

impl SessionLimits {
    /// Build limits from optional per-band values.
    pub fn new(up_to_12: Option<u32>, over_12: Option<u32>) -> Self {
        Self { up_to_12, over_12 }
    }

    /// Limit for `band`; a band missing from the policy allows 0 sessions.
    pub fn limit_for(&self, band: AgeBand) -> u32 {
        match band {
            AgeBand::UpTo12 => self.up_to_12,
            AgeBand::Over12 => self.over_12,
        }
        .unwrap_or(0)
    }
}

/// Maximum sessions of one type per period bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrequencyRule {
    /// Bucket granularity.
    pub period: Period,
    /// Maximum sessions per bucket, including the requested ones.
    pub quantity: u32,
}

/// The validated, immutable policy an engine is built around.
///
/// Cheap to share: it is `Send + Sync` and never mutated after construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PolicyConfig {
    max_age: u32,
    diagnosis_prefixes: BTreeSet<String>,
    therapy_types: BTreeSet<TherapyType>,
    session_limits: BTreeMap<TherapyType, SessionLimits>,
    frequency_max: BTreeMap<TherapyType, FrequencyRule>,
    minimum_interval_days: BTreeMap<TherapyType, u32>,
    forbidden_repetition_days: BTreeMap<TherapyType, u32>,
    no_same_day: BTreeSet<TherapyType>,
}

impl PolicyConfig {
    /// Validate a parsed policy document.
    pub fn from_document(doc: PolicyDocument) -> Result<Self, ConfigurationError> {
        let max_age = count("elegibilidade.idade_maxima", doc.eligibility.max_age)?;

        let therapy_types = doc
            .coverage
            .therapy_types
            .into_iter()
            .map(|name| therapy(name, "cobertura.tipos_terapia"))
            .collect::<Result<BTreeSet<_>, _>>()?;

        let mut session_limits = BTreeMap::new();
        for (name, limits) in doc.session_limits {
            let up_to_12 = limits
                .up_to_12
                .map(|v| count(&format!("limites_sessoes.{name}.ate_12"), v))
                .transpose()?;
            let over_12 = limits
                .over_12
                .map(|v| count(&format!("limites_sessoes.{name}.acima_12"), v))
                .transpose()?;
            session_limits.insert(
                therapy(name, "limites_sessoes")?,
                SessionLimits::new(up_to_12, over_12),
            );
        }

        let mut frequency_max = BTreeMap::new();
        for (name, rule) in doc.frequency_max {
            let period =
                Period::from_name(&rule.period).ok_or_else(|| ConfigurationError::UnsupportedPeriod {
                    therapy_type: name.clone(),
                    value: rule.period.clone(),
                })?;
            let quantity = rule
                .quantity
                .as_u64()
                .and_then(|q| u32::try_from(q).ok())
                .ok_or_else(|| ConfigurationError::InvalidQuantity {
                    therapy_type: name.clone(),
                    value: rule.quantity.to_string(),
                })?;
            frequency_max.insert(
                therapy(name, "frequencia_maxima")?,
                FrequencyRule { period, quantity },
            );
        }

        let minimum_interval_days = day_table("intervalo_minimo_dias", doc.minimum_interval_days)?;
        let forbidden_repetition_days =
            day_table("periodo_repeticao_proibida", doc.forbidden_repetition_days)?;

        let no_same_day = doc
            .no_same_day
            .into_iter()
            .map(|name| therapy(name, "nao_permitir_mesmo_dia"))
            .collect::<Result<BTreeSet<_>, _>>()?;

        let config = Self {
            max_age,
            diagnosis_prefixes: doc.coverage.diagnosis_prefixes.into_iter().collect(),
            therapy_types,
            session_limits,
            frequency_max,
            minimum_interval_days,
            forbidden_repetition_days,
            no_same_day,
        };
        config.warn_uncovered_types();
        Ok(config)
    }

    /// Parse and validate a JSON policy.
    pub fn from_json_str(text: &str) -> PolicyResult<Self> {
        let doc: PolicyDocument = serde_json::from_str(text)?;
        Ok(Self::from_document(doc)?)
    }

    /// Parse and validate a JSON policy already held as a value.
    pub fn from_json_value(value: serde_json::Value) -> PolicyResult<Self> {
        let doc: PolicyDocument = serde_json::from_value(value)?;
        Ok(Self::from_document(doc)?)
    }

    /// Parse and validate a YAML policy.
    pub fn from_yaml_str(text: &str) -> PolicyResult<Self> {
        let doc: PolicyDocument = serde_yaml::from_str(text)?;
        Ok(Self::from_document(doc)?)
    }

    /// Types that are tuned by a rule table but not covered at all. Requests
    /// for them will always fail coverage, which usually means a typo.
    fn warn_uncovered_types(&self) {
        let tuned = self
            .session_limits
            .keys()
            .chain(self.frequency_max.keys())
            .chain(self.minimum_interval_days.keys())
            .chain(self.forbidden_repetition_days.keys())
            .chain(self.no_same_day.iter());
        let uncovered: BTreeSet<&TherapyType> =
            tuned.filter(|t| !self.therapy_types.contains(*t)).collect();
        for therapy_type in uncovered {
            tracing::warn!(
                therapy_type = %therapy_type,
                "therapy type is parameterized but not listed in cobertura.tipos_terapia"
            );
        }
    }

    // ---- accessors ----

    /// Maximum eligible age.
    pub fn max_age(&self) -> u32 {
        self.max_age
    }

    /// Diagnosis-code prefixes that qualify for coverage.
    pub fn diagnosis_prefixes(&self) -> &BTreeSet<String> {
        &self.diagnosis_prefixes
    }

    /// Covered therapy types.
    pub fn therapy_types(&self) -> &BTreeSet<TherapyType> {
        &self.therapy_types
    }

    /// Whether `therapy` is covered.
    pub fn covers(&self, therapy: &TherapyType) -> bool {
        self.therapy_types.contains(therapy)
    }

    /// Session limits for `therapy`, if parameterized.
    pub fn session_limits(&self, therapy: &TherapyType) -> Option<&SessionLimits> {
        self.session_limits.get(therapy)
    }

    /// Frequency rule for `therapy`, if configured.
    pub fn frequency_rule(&self, therapy: &TherapyType) -> Option<&FrequencyRule> {
        self.frequency_max.get(therapy)
    }

    /// Minimum days between sessions of `therapy`; 0 when unset.
    pub fn minimum_interval_days(&self, therapy: &TherapyType) -> u32 {
        self.minimum_interval_days.get(therapy).copied().unwrap_or(0)
    }

    /// Forbidden repetition window for `therapy` in days; 0 when unset.
    pub fn forbidden_repetition_days(&self, therapy: &TherapyType) -> u32 {
        self.forbidden_repetition_days.get(therapy).copied().unwrap_or(0)
    }

    /// Whether more than one session of `therapy` per day is forbidden.
    pub fn forbids_same_day(&self, therapy: &TherapyType) -> bool {
        self.no_same_day.contains(therapy)
    }

    /// One-line-per-table summary, used by `tea check-policy`.
    pub fn summary(&self) -> PolicySummary {
        PolicySummary {
            max_age: self.max_age,
            diagnosis_prefixes: self.diagnosis_prefixes.len(),
            therapy_types: self.therapy_types.len(),
            session_limits: self.session_limits.len(),
            frequency_rules: self.frequency_max.len(),
            minimum_intervals: self.minimum_interval_days.len(),
            repetition_windows: self.forbidden_repetition_days.len(),
            same_day_exclusions: self.no_same_day.len(),
        }
    }
}

impl TryFrom<PolicyDocument> for PolicyConfig {
    type Error = ConfigurationError;

    fn try_from(doc: PolicyDocument) -> Result<Self, Self::Error> {
        Self::from_document(doc)
    }
}

/// Table sizes of a validated policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PolicySummary {
    pub max_age: u32,
    pub diagnosis_prefixes: usize,
    pub therapy_types: usize,
    pub session_limits: usize,
    pub frequency_rules: usize,
    pub minimum_intervals: usize,
    pub repetition_windows: usize,
    pub same_day_exclusions: usize,
}

// ---------------------------------------------------------------------------
// Validation helpers
// ---------------------------------------------------------------------------

fn therapy(name: String, field: &str) -> Result<TherapyType, ConfigurationError> {
    TherapyType::new(name).ok_or_else(|| ConfigurationError::InvalidTherapyType {
        field: field.to_string(),
    })
}

fn count(field: &str, value: i64) -> Result<u32, ConfigurationError> {
    u32::try_from(value).map_err(|_| ConfigurationError::OutOfRange {
        field: field.to_string(),
        value,
    })
}

fn day_table(
    section: &str,
    table: BTreeMap<String, i64>,
) -> Result<BTreeMap<TherapyType, u32>, ConfigurationError> {
    table
        .into_iter()
        .map(|(name, days)| {
            let days = count(&format!("{section}.{name}"), days)?;
            Ok((therapy(name, section)?, days))
        })
        .collect()
}
