use super::domain::{CreditEvaluation, CreditStatus, CustomerCredit, GeneralSettings};
use chrono::{Datelike, Months, NaiveDate};
use rust_decimal::Decimal;
use std::cmp::Ordering;

/// Computes the credit standing of `customer` on `today`.
///
/// Total and pure: every input yields a result, nothing is mutated, and the
/// same inputs always produce the same evaluation. Only the calendar day of
/// the last purchase matters; time of day never shifts the classification.
pub fn evaluate(
    customer: &CustomerCredit,
    settings: &GeneralSettings,
    today: NaiveDate,
) -> CreditEvaluation {
    let last_purchase = match customer.last_credit_purchase {
        Some(moment) if customer.credit_tracking_enabled && customer.is_debtor() => moment.date(),
        _ => return CreditEvaluation::not_applicable(),
    };
    let balance = customer.outstanding_balance;

    let Some(term) = settings.payment_term() else {
        return CreditEvaluation {
            status: CreditStatus::Current,
            due_date: None,
            days_until_due: None,
            amount_with_interest: Some(balance),
            months_overdue: None,
        };
    };

    let due_date = due_date_for(last_purchase, term);
    let days_until_due = (due_date - today).num_days();

    let (status, amount, months_overdue) = match days_until_due.cmp(&0) {
        Ordering::Less => {
            let months = calendar_months_between(due_date, today);
            let amount = with_late_interest(balance, settings.interest_rate(), months);
            (CreditStatus::Overdue, amount, Some(months))
        }
        Ordering::Equal => (CreditStatus::DueSoon, balance, None),
        Ordering::Greater => (CreditStatus::Current, balance, None),
    };

    CreditEvaluation {
        status,
        due_date: Some(due_date),
        days_until_due: Some(days_until_due),
        amount_with_interest: Some(amount),
        months_overdue,
    }
}

/// Adds `months` calendar months, clamping to the last day of a shorter month.
pub(crate) fn due_date_for(last_purchase: NaiveDate, months: u32) -> NaiveDate {
    last_purchase
        .checked_add_months(Months::new(months))
        .unwrap_or(NaiveDate::MAX)
}

/// Month boundaries crossed from `from` to `to`, ignoring the day of month.
pub(crate) fn calendar_months_between(from: NaiveDate, to: NaiveDate) -> u32 {
    let from_index = i64::from(from.year()) * 12 + i64::from(from.month0());
    let to_index = i64::from(to.year()) * 12 + i64::from(to.month0());
    u32::try_from((to_index - from_index).max(0)).unwrap_or(u32::MAX)
}

fn with_late_interest(balance: Decimal, rate: Option<Decimal>, months: u32) -> Decimal {
    let Some(rate) = rate else {
        return balance;
    };
    if months == 0 {
        return balance;
    }

    (rate / Decimal::ONE_HUNDRED)
        .checked_mul(balance)
        .and_then(|monthly| monthly.checked_mul(Decimal::from(months)))
        .and_then(|interest| balance.checked_add(interest))
        .unwrap_or(Decimal::MAX)
}
