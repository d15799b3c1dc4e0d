use crate::dates::deserialize_optional_datetime;
use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Customer record as served by `/api/clientes`, reduced to what the credit
/// workflows read. Field names follow the API payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerCredit {
    #[serde(default)]
    pub id: u64,
    #[serde(rename = "nome", default)]
    pub name: String,
    #[serde(rename = "controleFiado", default)]
    pub credit_tracking_enabled: bool,
    #[serde(rename = "saldoDevedor", default)]
    pub outstanding_balance: Decimal,
    #[serde(rename = "limiteFiado", default)]
    pub credit_limit: Option<Decimal>,
    #[serde(
        rename = "dataUltimaCompraFiado",
        default,
        deserialize_with = "deserialize_optional_datetime"
    )]
    pub last_credit_purchase: Option<NaiveDateTime>,
    #[serde(rename = "ativo", default = "default_active")]
    pub active: bool,
    #[serde(
        rename = "dataCadastro",
        default,
        deserialize_with = "deserialize_optional_datetime"
    )]
    pub registered_at: Option<NaiveDateTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cpf: Option<String>,
    #[serde(rename = "telefone", default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(rename = "endereco", default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

fn default_active() -> bool {
    true
}

impl Default for CustomerCredit {
    fn default() -> Self {
        Self {
            id: 0,
            name: String::new(),
            credit_tracking_enabled: false,
            outstanding_balance: Decimal::ZERO,
            credit_limit: None,
            last_credit_purchase: None,
            active: true,
            registered_at: None,
            cpf: None,
            phone: None,
            address: None,
        }
    }
}

impl CustomerCredit {
    pub fn is_debtor(&self) -> bool {
        self.outstanding_balance > Decimal::ZERO
    }
}

/// Store-wide credit policy served by `/api/configuracoes`.
///
/// A missing record behaves exactly like `GeneralSettings::default()`: no
/// payment term and no late interest.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GeneralSettings {
    /// Months after the last credit purchase before the balance is due.
    #[serde(rename = "prazoPagamentoFiado", default)]
    pub grace_period_months: Option<i32>,
    /// Percent charged per whole calendar month past the due date.
    #[serde(rename = "taxaJurosAtraso", default)]
    pub late_interest_rate_monthly: Option<Decimal>,
    #[serde(rename = "nomeNegocio", default, skip_serializing_if = "Option::is_none")]
    pub business_name: Option<String>,
    #[serde(
        rename = "dataAtualizacao",
        default,
        deserialize_with = "deserialize_optional_datetime",
        skip_serializing_if = "Option::is_none"
    )]
    pub updated_at: Option<NaiveDateTime>,
}

impl GeneralSettings {
    pub fn new(grace_period_months: Option<i32>, late_interest_rate_monthly: Option<Decimal>) -> Self {
        Self {
            grace_period_months,
            late_interest_rate_monthly,
            ..Self::default()
        }
    }

    /// Grace period in months when a positive term is configured.
    pub fn payment_term(&self) -> Option<u32> {
        self.grace_period_months
            .filter(|months| *months > 0)
            .map(|months| months as u32)
    }

    /// Monthly late-interest percentage when a positive rate is configured.
    pub fn interest_rate(&self) -> Option<Decimal> {
        self.late_interest_rate_monthly
            .filter(|rate| *rate > Decimal::ZERO)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CreditStatus {
    NotApplicable,
    Current,
    DueSoon,
    Overdue,
}

impl CreditStatus {
    pub const fn ordered() -> [Self; 4] {
        [
            Self::NotApplicable,
            Self::Current,
            Self::DueSoon,
            Self::Overdue,
        ]
    }

    pub const fn key(self) -> &'static str {
        match self {
            Self::NotApplicable => "NOT_APPLICABLE",
            Self::Current => "CURRENT",
            Self::DueSoon => "DUE_SOON",
            Self::Overdue => "OVERDUE",
        }
    }
}

/// Outcome of [`evaluate`](super::evaluate) for one customer on one day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreditEvaluation {
    pub status: CreditStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub days_until_due: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount_with_interest: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub months_overdue: Option<u32>,
}

impl CreditEvaluation {
    pub const fn not_applicable() -> Self {
        Self {
            status: CreditStatus::NotApplicable,
            due_date: None,
            days_until_due: None,
            amount_with_interest: None,
            months_overdue: None,
        }
    }

    /// `DUE_SOON` covers both "due today" and any future "due soon" window;
    /// the day count tells them apart.
    pub fn is_due_today(&self) -> bool {
        self.status == CreditStatus::DueSoon && self.days_until_due == Some(0)
    }

    /// Late interest included in `amount_with_interest`, zero when none accrued.
    pub fn accrued_interest(&self, outstanding_balance: Decimal) -> Decimal {
        self.amount_with_interest
            .map(|amount| (amount - outstanding_balance).max(Decimal::ZERO))
            .unwrap_or(Decimal::ZERO)
    }
}
