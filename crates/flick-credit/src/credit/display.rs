//! Presentation of credit evaluations: badges, localized labels and the
//! currency/date formats used on the customer cards.
//!
//! Locale is always an explicit argument; nothing here reads ambient state.

use super::domain::{CreditEvaluation, CreditStatus, CustomerCredit};
use chrono::NaiveDate;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Locale {
    #[default]
    #[serde(rename = "pt-BR", alias = "pt")]
    PtBr,
    #[serde(rename = "en-US", alias = "en")]
    EnUs,
}

impl Locale {
    /// Resolves a language tag by prefix; unknown tags fall back to pt-BR.
    pub fn from_tag(tag: &str) -> Self {
        let tag = tag.trim().to_ascii_lowercase();
        if tag.starts_with("en") {
            Self::EnUs
        } else {
            Self::PtBr
        }
    }

    pub const fn tag(self) -> &'static str {
        match self {
            Self::PtBr => "pt-BR",
            Self::EnUs => "en-US",
        }
    }
}

impl FromStr for Locale {
    type Err = std::convert::Infallible;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Ok(Self::from_tag(value))
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl CreditStatus {
    pub const fn label(self, locale: Locale) -> &'static str {
        match (self, locale) {
            (Self::NotApplicable, Locale::PtBr) => "Não aplicável",
            (Self::NotApplicable, Locale::EnUs) => "Not applicable",
            (Self::Current, Locale::PtBr) => "Em dia",
            (Self::Current, Locale::EnUs) => "Current",
            (Self::DueSoon, Locale::PtBr) => "A vencer",
            (Self::DueSoon, Locale::EnUs) => "Due soon",
            (Self::Overdue, Locale::PtBr) => "Atrasado",
            (Self::Overdue, Locale::EnUs) => "Overdue",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BadgeColor {
    Red,
    Yellow,
    Green,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BadgeVariant {
    Solid,
    Subtle,
}

/// Badge shown next to a customer with an open credit balance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CreditBadge {
    Overdue { days: u64 },
    DueToday,
    DueSoon,
    DueIn { days: u64 },
    OnTime,
}

impl CreditBadge {
    pub fn from_evaluation(evaluation: &CreditEvaluation) -> Option<Self> {
        let days = evaluation.days_until_due;
        match evaluation.status {
            CreditStatus::NotApplicable => None,
            CreditStatus::Overdue => Some(Self::Overdue {
                days: days.map(i64::unsigned_abs).unwrap_or(0),
            }),
            CreditStatus::DueSoon if days == Some(0) => Some(Self::DueToday),
            CreditStatus::DueSoon => Some(Self::DueSoon),
            CreditStatus::Current => match days {
                Some(days) if days > 0 => Some(Self::DueIn {
                    days: days.unsigned_abs(),
                }),
                _ => Some(Self::OnTime),
            },
        }
    }

    pub const fn color(self) -> BadgeColor {
        match self {
            Self::Overdue { .. } => BadgeColor::Red,
            Self::DueToday | Self::DueSoon => BadgeColor::Yellow,
            Self::DueIn { .. } | Self::OnTime => BadgeColor::Green,
        }
    }

    pub const fn variant(self) -> BadgeVariant {
        match self {
            Self::Overdue { .. } => BadgeVariant::Solid,
            _ => BadgeVariant::Subtle,
        }
    }

    pub fn label(self, locale: Locale) -> String {
        match (self, locale) {
            (Self::Overdue { days: 1 }, Locale::PtBr) => "Atrasado há 1 dia".to_string(),
            (Self::Overdue { days }, Locale::PtBr) => format!("Atrasado há {days} dias"),
            (Self::Overdue { days: 1 }, Locale::EnUs) => "Overdue by 1 day".to_string(),
            (Self::Overdue { days }, Locale::EnUs) => format!("Overdue by {days} days"),
            (Self::DueToday, Locale::PtBr) => "Vence hoje".to_string(),
            (Self::DueToday, Locale::EnUs) => "Due today".to_string(),
            (Self::DueSoon, Locale::PtBr) => "A vencer".to_string(),
            (Self::DueSoon, Locale::EnUs) => "Due soon".to_string(),
            (Self::DueIn { days: 1 }, Locale::PtBr) => "Vence em 1 dia".to_string(),
            (Self::DueIn { days }, Locale::PtBr) => format!("Vence em {days} dias"),
            (Self::DueIn { days: 1 }, Locale::EnUs) => "Due in 1 day".to_string(),
            (Self::DueIn { days }, Locale::EnUs) => format!("Due in {days} days"),
            (Self::OnTime, Locale::PtBr) => "Em dia".to_string(),
            (Self::OnTime, Locale::EnUs) => "On time".to_string(),
        }
    }

    pub fn view(self, locale: Locale) -> BadgeView {
        BadgeView {
            badge: self,
            label: self.label(locale),
            color: self.color(),
            variant: self.variant(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BadgeView {
    #[serde(flatten)]
    pub badge: CreditBadge,
    pub label: String,
    pub color: BadgeColor,
    pub variant: BadgeVariant,
}

/// Formats a BRL amount with the separators of `locale`, rounded half away
/// from zero to cents.
pub fn format_currency(amount: Decimal, locale: Locale) -> String {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    let digits = format!("{:.2}", rounded.abs());
    let (whole, cents) = digits.split_once('.').unwrap_or((digits.as_str(), "00"));

    let (group_sep, decimal_sep, prefix) = match locale {
        Locale::PtBr => ('.', ',', "R$\u{a0}"),
        Locale::EnUs => (',', '.', "R$"),
    };

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (index, digit) in whole.chars().enumerate() {
        if index > 0 && (whole.len() - index) % 3 == 0 {
            grouped.push(group_sep);
        }
        grouped.push(digit);
    }

    format!("{sign}{prefix}{grouped}{decimal_sep}{cents}")
}

pub fn format_date(date: NaiveDate, locale: Locale) -> String {
    match locale {
        Locale::PtBr => date.format("%d/%m/%Y").to_string(),
        Locale::EnUs => date.format("%m/%d/%Y").to_string(),
    }
}

fn active_label(active: bool, locale: Locale) -> &'static str {
    match (active, locale) {
        (true, Locale::PtBr) => "Ativo",
        (false, Locale::PtBr) => "Inativo",
        (true, Locale::EnUs) => "Active",
        (false, Locale::EnUs) => "Inactive",
    }
}

fn not_set_label(locale: Locale) -> &'static str {
    match locale {
        Locale::PtBr => "Não definido",
        Locale::EnUs => "Not set",
    }
}

/// Everything the customer card renders about a customer's credit.
#[derive(Debug, Clone, Serialize)]
pub struct CustomerCreditCard {
    pub customer_id: u64,
    pub name: String,
    pub active_label: &'static str,
    pub status: CreditStatus,
    pub status_label: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub badge: Option<BadgeView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub balance: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount_with_interest: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub credit_limit: Option<String>,
}

impl CustomerCreditCard {
    pub fn build(customer: &CustomerCredit, evaluation: &CreditEvaluation, locale: Locale) -> Self {
        let tracked = customer.credit_tracking_enabled;
        let balance = customer.outstanding_balance;

        let amount_with_interest = match evaluation.amount_with_interest {
            Some(amount) if evaluation.status == CreditStatus::Overdue && amount > balance => {
                Some(format_currency(amount, locale))
            }
            _ => None,
        };

        Self {
            customer_id: customer.id,
            name: customer.name.clone(),
            active_label: active_label(customer.active, locale),
            status: evaluation.status,
            status_label: evaluation.status.label(locale),
            badge: CreditBadge::from_evaluation(evaluation).map(|badge| badge.view(locale)),
            balance: tracked.then(|| format_currency(balance, locale)),
            amount_with_interest,
            due_date: evaluation.due_date.map(|date| format_date(date, locale)),
            credit_limit: tracked.then(|| match customer.credit_limit {
                Some(limit) if limit > Decimal::ZERO => format_currency(limit, locale),
                _ => not_set_label(locale).to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn evaluation(status: CreditStatus, days: Option<i64>) -> CreditEvaluation {
        CreditEvaluation {
            status,
            due_date: None,
            days_until_due: days,
            amount_with_interest: Some(dec!(100)),
            months_overdue: None,
        }
    }

    #[test]
    fn due_today_gets_its_own_badge() {
        let today = CreditBadge::from_evaluation(&evaluation(CreditStatus::DueSoon, Some(0)));
        assert_eq!(today, Some(CreditBadge::DueToday));
        let soon = CreditBadge::from_evaluation(&evaluation(CreditStatus::DueSoon, Some(3)));
        assert_eq!(soon, Some(CreditBadge::DueSoon));
    }

    #[test]
    fn overdue_badge_counts_elapsed_days() {
        let badge = CreditBadge::from_evaluation(&evaluation(CreditStatus::Overdue, Some(-12)))
            .expect("overdue badge");
        assert_eq!(badge, CreditBadge::Overdue { days: 12 });
        assert_eq!(badge.color(), BadgeColor::Red);
        assert_eq!(badge.variant(), BadgeVariant::Solid);
        assert_eq!(badge.label(Locale::PtBr), "Atrasado há 12 dias");
        assert_eq!(badge.label(Locale::EnUs), "Overdue by 12 days");
    }

    #[test]
    fn current_badges_distinguish_term_from_no_term() {
        let with_term = CreditBadge::from_evaluation(&evaluation(CreditStatus::Current, Some(1)));
        assert_eq!(with_term, Some(CreditBadge::DueIn { days: 1 }));
        assert_eq!(
            with_term.map(|badge| badge.label(Locale::EnUs)).as_deref(),
            Some("Due in 1 day")
        );

        let no_term = CreditBadge::from_evaluation(&evaluation(CreditStatus::Current, None));
        assert_eq!(no_term, Some(CreditBadge::OnTime));
        assert!(CreditBadge::from_evaluation(&CreditEvaluation::not_applicable()).is_none());
    }

    #[test]
    fn currency_uses_locale_separators() {
        assert_eq!(format_currency(dec!(1234.5), Locale::PtBr), "R$\u{a0}1.234,50");
        assert_eq!(format_currency(dec!(1234.5), Locale::EnUs), "R$1,234.50");
        assert_eq!(format_currency(dec!(1234567.891), Locale::EnUs), "R$1,234,567.89");
        assert_eq!(format_currency(dec!(0.005), Locale::PtBr), "R$\u{a0}0,01");
        assert_eq!(format_currency(dec!(-42), Locale::EnUs), "-R$42.00");
        assert_eq!(format_currency(dec!(999), Locale::PtBr), "R$\u{a0}999,00");
    }

    #[test]
    fn dates_follow_locale_order() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 5).expect("valid date");
        assert_eq!(format_date(date, Locale::PtBr), "05/03/2024");
        assert_eq!(format_date(date, Locale::EnUs), "03/05/2024");
    }

    #[test]
    fn locale_tags_resolve_by_prefix() {
        assert_eq!(Locale::from_tag("en"), Locale::EnUs);
        assert_eq!(Locale::from_tag("EN-gb"), Locale::EnUs);
        assert_eq!(Locale::from_tag("pt-BR"), Locale::PtBr);
        assert_eq!(Locale::from_tag("fr"), Locale::PtBr);
    }

    #[test]
    fn card_shows_interest_only_when_it_accrued() {
        let customer = CustomerCredit {
            id: 3,
            name: "João".to_string(),
            credit_tracking_enabled: true,
            outstanding_balance: dec!(100),
            credit_limit: None,
            ..CustomerCredit::default()
        };
        let mut overdue = evaluation(CreditStatus::Overdue, Some(-40));
        overdue.amount_with_interest = Some(dec!(105));
        overdue.due_date = NaiveDate::from_ymd_opt(2024, 2, 15);

        let card = CustomerCreditCard::build(&customer, &overdue, Locale::EnUs);
        assert_eq!(card.amount_with_interest.as_deref(), Some("R$105.00"));
        assert_eq!(card.balance.as_deref(), Some("R$100.00"));
        assert_eq!(card.due_date.as_deref(), Some("02/15/2024"));
        assert_eq!(card.credit_limit.as_deref(), Some("Not set"));
        assert_eq!(card.active_label, "Active");

        let current = evaluation(CreditStatus::Current, Some(5));
        let card = CustomerCreditCard::build(&customer, &current, Locale::PtBr);
        assert!(card.amount_with_interest.is_none());
        assert_eq!(
            card.badge.map(|badge| badge.label).as_deref(),
            Some("Vence em 5 dias")
        );
    }
}
