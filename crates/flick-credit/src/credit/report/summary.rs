use super::super::display::{format_currency, format_date, CreditBadge, Locale};
use super::super::domain::{CreditEvaluation, CreditStatus, CustomerCredit, GeneralSettings};
use super::super::evaluate;
use super::views::{AccountView, CreditReportSummary, StatusCountEntry, TotalsView};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::collections::HashMap;

/// Evaluates a set of customers against one policy on one day.
pub struct CreditPortfolio;

impl CreditPortfolio {
    pub fn evaluate<'a, I>(customers: I, settings: &GeneralSettings, today: NaiveDate) -> CreditReport
    where
        I: IntoIterator<Item = &'a CustomerCredit>,
    {
        let mut report = CreditReport {
            today,
            ..CreditReport::default()
        };

        for customer in customers {
            let evaluation = evaluate(customer, settings, today);
            *report.status_counts.entry(evaluation.status).or_default() += 1;

            if customer.is_debtor() {
                let owed = evaluation
                    .amount_with_interest
                    .unwrap_or(customer.outstanding_balance);
                report.totals.add_debtor(customer.outstanding_balance, owed);
            }

            report.accounts.push(AccountSnapshot {
                customer_id: customer.id,
                name: customer.name.clone(),
                active: customer.active,
                outstanding_balance: customer.outstanding_balance,
                credit_limit: customer.credit_limit,
                evaluation,
            });
        }

        report
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PortfolioTotals {
    pub debtors: usize,
    pub outstanding: Decimal,
    pub with_interest: Decimal,
}

impl PortfolioTotals {
    /// Sums saturate at `Decimal::MAX`, like the per-customer amounts.
    fn add_debtor(&mut self, outstanding: Decimal, with_interest: Decimal) {
        self.debtors += 1;
        self.outstanding = self
            .outstanding
            .checked_add(outstanding)
            .unwrap_or(Decimal::MAX);
        self.with_interest = self
            .with_interest
            .checked_add(with_interest)
            .unwrap_or(Decimal::MAX);
    }

    pub fn accrued_interest(&self) -> Decimal {
        (self.with_interest - self.outstanding).max(Decimal::ZERO)
    }
}

#[derive(Debug, Clone)]
pub struct AccountSnapshot {
    pub customer_id: u64,
    pub name: String,
    pub active: bool,
    pub outstanding_balance: Decimal,
    pub credit_limit: Option<Decimal>,
    pub evaluation: CreditEvaluation,
}

impl AccountSnapshot {
    pub fn to_view(&self, locale: Locale) -> AccountView {
        let evaluation = &self.evaluation;
        let amount_with_interest = evaluation
            .amount_with_interest
            .unwrap_or(self.outstanding_balance);

        AccountView {
            customer_id: self.customer_id,
            name: self.name.clone(),
            status: evaluation.status,
            status_label: evaluation.status.label(locale),
            badge_label: CreditBadge::from_evaluation(evaluation).map(|badge| badge.label(locale)),
            due_date: evaluation.due_date,
            due_date_label: evaluation.due_date.map(|date| format_date(date, locale)),
            days_until_due: evaluation.days_until_due,
            months_overdue: evaluation.months_overdue,
            outstanding_balance: self.outstanding_balance,
            amount_with_interest,
            balance_label: format_currency(self.outstanding_balance, locale),
            amount_with_interest_label: format_currency(amount_with_interest, locale),
        }
    }
}

#[derive(Debug, Default, Clone)]
pub struct CreditReport {
    pub today: NaiveDate,
    pub status_counts: HashMap<CreditStatus, usize>,
    pub totals: PortfolioTotals,
    pub accounts: Vec<AccountSnapshot>,
}

impl CreditReport {
    pub fn count(&self, status: CreditStatus) -> usize {
        self.status_counts.get(&status).copied().unwrap_or(0)
    }

    /// Overdue accounts, longest overdue first.
    pub fn overdue_accounts(&self) -> Vec<&AccountSnapshot> {
        let mut overdue: Vec<&AccountSnapshot> = self
            .accounts
            .iter()
            .filter(|account| account.evaluation.status == CreditStatus::Overdue)
            .collect();
        overdue.sort_by(|a, b| a.evaluation.due_date.cmp(&b.evaluation.due_date));
        overdue
    }

    /// Accounts with a due date today or still ahead, nearest first.
    pub fn upcoming_accounts(&self) -> Vec<&AccountSnapshot> {
        let mut upcoming: Vec<&AccountSnapshot> = self
            .accounts
            .iter()
            .filter(|account| {
                matches!(
                    account.evaluation.status,
                    CreditStatus::DueSoon | CreditStatus::Current
                ) && account.evaluation.due_date.is_some()
            })
            .collect();
        upcoming.sort_by(|a, b| a.evaluation.due_date.cmp(&b.evaluation.due_date));
        upcoming
    }

    pub fn summary(&self, locale: Locale) -> CreditReportSummary {
        let status_counts = CreditStatus::ordered()
            .into_iter()
            .map(|status| StatusCountEntry {
                status,
                status_label: status.label(locale),
                count: self.count(status),
            })
            .collect();

        let totals = TotalsView {
            debtors: self.totals.debtors,
            outstanding: self.totals.outstanding,
            with_interest: self.totals.with_interest,
            accrued_interest: self.totals.accrued_interest(),
            outstanding_label: format_currency(self.totals.outstanding, locale),
            with_interest_label: format_currency(self.totals.with_interest, locale),
            accrued_interest_label: format_currency(self.totals.accrued_interest(), locale),
        };

        CreditReportSummary {
            today: self.today,
            locale,
            status_counts,
            totals,
            overdue: self
                .overdue_accounts()
                .into_iter()
                .map(|account| account.to_view(locale))
                .collect(),
            upcoming: self
                .upcoming_accounts()
                .into_iter()
                .map(|account| account.to_view(locale))
                .collect(),
        }
    }
}
