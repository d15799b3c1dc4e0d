use super::super::display::Locale;
use super::super::domain::CreditStatus;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct StatusCountEntry {
    pub status: CreditStatus,
    pub status_label: &'static str,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct TotalsView {
    pub debtors: usize,
    pub outstanding: Decimal,
    pub with_interest: Decimal,
    pub accrued_interest: Decimal,
    pub outstanding_label: String,
    pub with_interest_label: String,
    pub accrued_interest_label: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct AccountView {
    pub customer_id: u64,
    pub name: String,
    pub status: CreditStatus,
    pub status_label: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub badge_label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date_label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub days_until_due: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub months_overdue: Option<u32>,
    pub outstanding_balance: Decimal,
    pub amount_with_interest: Decimal,
    pub balance_label: String,
    pub amount_with_interest_label: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct CreditReportSummary {
    pub today: NaiveDate,
    pub locale: Locale,
    pub status_counts: Vec<StatusCountEntry>,
    pub totals: TotalsView,
    pub overdue: Vec<AccountView>,
    pub upcoming: Vec<AccountView>,
}
