//! # Request Context
//!
//! The typed [`RuleContext`] every rule evaluates, and the wire documents it
//! is built from.
//!
//! ## Ingestion Boundary
//!
//! Requests arrive as loosely typed JSON harvested by upstream collaborators
//! (document extraction, claim intake). They are validated exactly once, here:
//! every required field is checked, every date is parsed, and the result is a
//! context in which rules can no longer hit a missing or malformed value.
//! A failure names the offending field path, e.g. `procedimento.quantidade`
//! or `historico_sessoes[2].data`.
//!
//! Wire field names follow the request vocabulary:
//!
//! ```json
//! {
//!   "beneficiario": {"ativo": true, "idade": 8, "carencia_dias": 0},
//!   "procedimento": {"cid": "F84.0", "tipo": "ABA", "quantidade": 1,
//!                    "data_solicitacao": "2024-03-10"},
//!   "historico_sessoes": [{"tipo": "ABA", "data": "2024-03-03"}]
//! }
//! ```

use std::num::NonZeroU32;

use serde::{Deserialize, Serialize};

use crate::error::{ContextError, TeaError};
use crate::history::SessionHistory;
use crate::identity::{DiagnosisCode, TherapyType};
use crate::temporal::CalendarDate;

// ---------------------------------------------------------------------------
// Typed context
// ---------------------------------------------------------------------------

/// Insured status of the beneficiary at request time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Beneficiary {
    /// Whether the plan is active.
    pub active: bool,
    /// Age in whole years.
    pub age: u32,
    /// Remaining waiting period (carência); positive means not yet satisfied.
    pub waiting_period_days: i64,
}

/// The session(s) being requested.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Procedure {
    /// Diagnosis code (CID) justifying the request.
    pub diagnosis_code: DiagnosisCode,
    /// Therapy modality.
    pub therapy_type: TherapyType,
    /// Number of sessions requested.
    pub requested_quantity: NonZeroU32,
    /// The request date. This is the only notion of "now" the engine has.
    pub request_date: CalendarDate,
}

/// A past session. Immutable historical fact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionRecord {
    /// Therapy modality of the session.
    pub therapy_type: TherapyType,
    /// Date the session took place.
    pub date: CalendarDate,
}

impl SessionRecord {
    /// Convenience constructor.
    pub fn new(therapy_type: TherapyType, date: CalendarDate) -> Self {
        Self { therapy_type, date }
    }
}

/// Everything a rule may look at for one request.
///
/// Built fresh per request and owned by the caller. The engine only borrows
/// it and never reorders or mutates the history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleContext {
    /// Beneficiary status.
    pub beneficiary: Beneficiary,
    /// Requested procedure.
    pub procedure: Procedure,
    /// Past sessions, in the order supplied.
    pub history: Vec<SessionRecord>,
}

impl RuleContext {
    /// Assemble a context from already-typed parts.
    pub fn new(beneficiary: Beneficiary, procedure: Procedure, history: Vec<SessionRecord>) -> Self {
        Self {
            beneficiary,
            procedure,
            history,
        }
    }

    /// Read-only query view over the session history.
    pub fn sessions(&self) -> SessionHistory<'_> {
        SessionHistory::new(&self.history)
    }

    /// Build a context from a parsed request document.
    pub fn from_document(doc: RequestDocument) -> Result<Self, TeaError> {
        let beneficiary = doc
            .beneficiary
            .ok_or_else(|| ContextError::missing("beneficiario"))?
            .into_beneficiary()?;
        let procedure = doc
            .procedure
            .ok_or_else(|| ContextError::missing("procedimento"))?
            .into_procedure()?;
        let history = doc
            .history
            .into_iter()
            .enumerate()
            .map(|(i, session)| session.into_record(i))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::new(beneficiary, procedure, history))
    }

    /// Build a context from a JSON value.
    pub fn from_json_value(value: &serde_json::Value) -> Result<Self, TeaError> {
        let doc: RequestDocument = serde_path_to_error::deserialize(value).map_err(wire_error)?;
        Self::from_document(doc)
    }

    /// Build a context from JSON text.
    pub fn from_json_str(text: &str) -> Result<Self, TeaError> {
        let mut deserializer = serde_json::Deserializer::from_str(text);
        let doc: RequestDocument =
            serde_path_to_error::deserialize(&mut deserializer).map_err(wire_error)?;
        deserializer.end().map_err(|e| ContextError::Malformed {
            reason: e.to_string(),
        })?;
        Self::from_document(doc)
    }
}

/// A value of the wrong JSON type names its field; anything without a field
/// path (bad syntax, non-object root) is a malformed request.
fn wire_error(err: serde_path_to_error::Error<serde_json::Error>) -> ContextError {
    let field = err.path().to_string();
    let reason = err.into_inner().to_string();
    if field.is_empty() || field == "." {
        ContextError::Malformed { reason }
    } else {
        ContextError::InvalidField { field, reason }
    }
}

// ---------------------------------------------------------------------------
// Wire documents
// ---------------------------------------------------------------------------

/// A request as received at the ingestion boundary.
///
/// Every field is optional at this stage so that absence is reported as a
/// [`ContextError::MissingField`] naming the field rather than as an opaque
/// deserializer message. Unknown fields are ignored.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RequestDocument {
    #[serde(rename = "beneficiario", default)]
    pub beneficiary: Option<BeneficiaryDocument>,
    #[serde(rename = "procedimento", default)]
    pub procedure: Option<ProcedureDocument>,
    /// Missing history means no prior sessions.
    #[serde(rename = "historico_sessoes", default)]
    pub history: Vec<SessionDocument>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BeneficiaryDocument {
    #[serde(rename = "ativo", default)]
    pub active: Option<bool>,
    #[serde(rename = "idade", default)]
    pub age: Option<i64>,
    #[serde(rename = "carencia_dias", default)]
    pub waiting_period_days: Option<i64>,
}

impl BeneficiaryDocument {
    fn into_beneficiary(self) -> Result<Beneficiary, TeaError> {
        let active = self
            .active
            .ok_or_else(|| ContextError::missing("beneficiario.ativo"))?;
        let age = self
            .age
            .ok_or_else(|| ContextError::missing("beneficiario.idade"))?;
        let age = u32::try_from(age).map_err(|_| {
            ContextError::invalid("beneficiario.idade", format!("{age} is not a valid age"))
        })?;
        let waiting_period_days = self
            .waiting_period_days
            .ok_or_else(|| ContextError::missing("beneficiario.carencia_dias"))?;
        Ok(Beneficiary {
            active,
            age,
            waiting_period_days,
        })
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProcedureDocument {
    #[serde(rename = "cid", default)]
    pub diagnosis_code: Option<String>,
    #[serde(rename = "tipo", default)]
    pub therapy_type: Option<String>,
    #[serde(rename = "quantidade", default)]
    pub requested_quantity: Option<i64>,
    #[serde(rename = "data_solicitacao", default)]
    pub request_date: Option<String>,
}

impl ProcedureDocument {
    fn into_procedure(self) -> Result<Procedure, TeaError> {
        let diagnosis_code = self
            .diagnosis_code
            .ok_or_else(|| ContextError::missing("procedimento.cid"))?;
        let diagnosis_code = DiagnosisCode::new(diagnosis_code)
            .ok_or_else(|| ContextError::invalid("procedimento.cid", "must be non-empty"))?;

        let therapy_type = self
            .therapy_type
            .ok_or_else(|| ContextError::missing("procedimento.tipo"))?;
        let therapy_type = TherapyType::new(therapy_type)
            .ok_or_else(|| ContextError::invalid("procedimento.tipo", "must be non-empty"))?;

        let quantity = self
            .requested_quantity
            .ok_or_else(|| ContextError::missing("procedimento.quantidade"))?;
        let requested_quantity = u32::try_from(quantity)
            .ok()
            .and_then(NonZeroU32::new)
            .ok_or_else(|| {
                ContextError::invalid(
                    "procedimento.quantidade",
                    format!("{quantity} is not a positive session count"),
                )
            })?;

        let request_date = self
            .request_date
            .ok_or_else(|| ContextError::missing("procedimento.data_solicitacao"))?;
        let request_date = CalendarDate::parse("procedimento.data_solicitacao", &request_date)?;

        Ok(Procedure {
            diagnosis_code,
            therapy_type,
            requested_quantity,
            request_date,
        })
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionDocument {
    #[serde(rename = "tipo", default)]
    pub therapy_type: Option<String>,
    #[serde(rename = "data", default)]
    pub date: Option<String>,
}

impl SessionDocument {
    fn into_record(self, index: usize) -> Result<SessionRecord, TeaError> {
        let tipo_field = format!("historico_sessoes[{index}].tipo");
        let data_field = format!("historico_sessoes[{index}].data");

        let therapy_type = self
            .therapy_type
            .ok_or_else(|| ContextError::missing(tipo_field.clone()))?;
        let therapy_type = TherapyType::new(therapy_type)
            .ok_or_else(|| ContextError::invalid(tipo_field, "must be non-empty"))?;
        let date = self
            .date
            .ok_or_else(|| ContextError::missing(data_field.clone()))?;
        let date = CalendarDate::parse(&data_field, &date)?;
        Ok(SessionRecord { therapy_type, date })
    }
}
