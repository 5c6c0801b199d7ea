//! Shared fixtures for unit tests.

use std::num::NonZeroU32;

use tea_core::{
    Beneficiary, CalendarDate, DiagnosisCode, Procedure, RuleContext, SessionRecord, TherapyType,
};
use tea_policy::PolicyConfig;

pub(crate) fn policy() -> PolicyConfig {
    PolicyConfig::from_json_value(serde_json::json!({
        "elegibilidade": {"idade_maxima": 21},
        "cobertura": {
            "cid_validos": ["F84", "F88"],
            "tipos_terapia": ["ABA", "Fono", "Psicologia", "TO", "Avaliacao"]
        },
        "limites_sessoes": {
            "ABA": {"ate_12": 8, "acima_12": 4},
            "Fono": {"ate_12": 6},
            "Psicologia": {"ate_12": 4, "acima_12": 4},
            "TO": {"ate_12": 4, "acima_12": 4},
            "Avaliacao": {"ate_12": 1, "acima_12": 1}
        },
        "frequencia_maxima": {
            "ABA": {"periodo": "mensal", "quantidade": 10},
            "Fono": {"periodo": "semanal", "quantidade": 2}
        },
        "intervalo_minimo_dias": {"Fono": 7},
        "periodo_repeticao_proibida": {"Avaliacao": 180},
        "nao_permitir_mesmo_dia": ["Psicologia"]
    }))
    .expect("fixture policy is valid")
}

pub(crate) fn date(s: &str) -> CalendarDate {
    CalendarDate::parse("fixture", s).expect("fixture date is valid")
}

/// Builder for request contexts. Defaults describe an active, 10-year-old
/// beneficiary requesting one ABA session on 2024-03-10 with no history.
pub(crate) struct ContextBuilder {
    active: bool,
    age: u32,
    waiting_period_days: i64,
    cid: String,
    therapy: String,
    quantity: NonZeroU32,
    date: String,
    history: Vec<(String, String)>,
}

impl ContextBuilder {
    pub(crate) fn new() -> Self {
        Self {
            active: true,
            age: 10,
            waiting_period_days: 0,
            cid: "F84.0".into(),
            therapy: "ABA".into(),
            quantity: NonZeroU32::MIN,
            date: "2024-03-10".into(),
            history: Vec::new(),
        }
    }

    pub(crate) fn active(mut self, active: bool) -> Self {
        self.active = active;
        self
    }

    pub(crate) fn age(mut self, age: u32) -> Self {
        self.age = age;
        self
    }

    pub(crate) fn waiting_period(mut self, days: i64) -> Self {
        self.waiting_period_days = days;
        self
    }

    pub(crate) fn cid(mut self, cid: &str) -> Self {
        self.cid = cid.into();
        self
    }

    pub(crate) fn therapy(mut self, therapy: &str) -> Self {
        self.therapy = therapy.into();
        self
    }

    pub(crate) fn quantity(mut self, quantity: u32) -> Self {
        self.quantity = NonZeroU32::new(quantity).expect("requested quantity is at least 1");
        self
    }

    pub(crate) fn on(mut self, date: &str) -> Self {
        self.date = date.into();
        self
    }

    pub(crate) fn session(mut self, therapy: &str, date: &str) -> Self {
        self.history.push((therapy.into(), date.into()));
        self
    }

    pub(crate) fn build(self) -> RuleContext {
        let history = self
            .history
            .iter()
            .map(|(t, d)| SessionRecord::new(TherapyType::new(t.as_str()).unwrap(), date(d)))
            .collect();
        RuleContext::new(
            Beneficiary {
                active: self.active,
                age: self.age,
                waiting_period_days: self.waiting_period_days,
            },
            Procedure {
                diagnosis_code: DiagnosisCode::new(self.cid).unwrap(),
                therapy_type: TherapyType::new(self.therapy).unwrap(),
                requested_quantity: self.quantity,
                request_date: date(&self.date),
            },
            history,
        )
    }
}
