use super::domain::CustomerCredit;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String")]
pub enum CustomerOrder {
    #[serde(rename = "nomeAsc")]
    NameAsc,
    #[serde(rename = "nomeDesc")]
    NameDesc,
    #[serde(rename = "saldoDesc")]
    BalanceDesc,
    #[serde(rename = "saldoAsc")]
    BalanceAsc,
    #[default]
    #[serde(rename = "cadastroRecente")]
    RecentlyRegistered,
    #[serde(rename = "cadastroAntigo")]
    OldestRegistered,
}

impl CustomerOrder {
    pub const fn key(self) -> &'static str {
        match self {
            Self::NameAsc => "nomeAsc",
            Self::NameDesc => "nomeDesc",
            Self::BalanceDesc => "saldoDesc",
            Self::BalanceAsc => "saldoAsc",
            Self::RecentlyRegistered => "cadastroRecente",
            Self::OldestRegistered => "cadastroAntigo",
        }
    }

    /// Unknown keys sort by most recent registration, like an absent key.
    pub fn from_key(key: &str) -> Self {
        match key.trim() {
            "nomeAsc" => Self::NameAsc,
            "nomeDesc" => Self::NameDesc,
            "saldoDesc" => Self::BalanceDesc,
            "saldoAsc" => Self::BalanceAsc,
            "cadastroAntigo" => Self::OldestRegistered,
            _ => Self::RecentlyRegistered,
        }
    }

    fn compare(self, a: &CustomerCredit, b: &CustomerCredit) -> Ordering {
        match self {
            Self::NameAsc => compare_names(a, b),
            Self::NameDesc => compare_names(b, a),
            Self::BalanceDesc => b.outstanding_balance.cmp(&a.outstanding_balance),
            Self::BalanceAsc => a.outstanding_balance.cmp(&b.outstanding_balance),
            Self::RecentlyRegistered => b.registered_at.cmp(&a.registered_at),
            Self::OldestRegistered => a.registered_at.cmp(&b.registered_at),
        }
    }
}

impl FromStr for CustomerOrder {
    type Err = std::convert::Infallible;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Ok(Self::from_key(value))
    }
}

impl From<String> for CustomerOrder {
    fn from(key: String) -> Self {
        Self::from_key(&key)
    }
}

fn compare_names(a: &CustomerCredit, b: &CustomerCredit) -> Ordering {
    a.name.to_lowercase().cmp(&b.name.to_lowercase())
}

/// Filters of the customer listing. `None` leaves a dimension unfiltered.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerQuery {
    #[serde(rename = "apenasAtivos", default)]
    pub active: Option<bool>,
    #[serde(rename = "devedores", default)]
    pub debtors: Option<bool>,
    #[serde(rename = "nomeContains", default)]
    pub name_contains: Option<String>,
    #[serde(rename = "orderBy", default)]
    pub order_by: Option<CustomerOrder>,
}

impl CustomerQuery {
    pub fn matches(&self, customer: &CustomerCredit) -> bool {
        if let Some(active) = self.active {
            if customer.active != active {
                return false;
            }
        }
        if let Some(debtors) = self.debtors {
            if customer.is_debtor() != debtors {
                return false;
            }
        }
        match self.name_filter() {
            Some(needle) => customer.name.to_lowercase().contains(&needle),
            None => true,
        }
    }

    pub fn apply<'a>(&self, customers: &'a [CustomerCredit]) -> Vec<&'a CustomerCredit> {
        let order = self.order_by.unwrap_or_default();
        let mut selected: Vec<&CustomerCredit> = customers
            .iter()
            .filter(|customer| self.matches(customer))
            .collect();
        selected.sort_by(|a, b| order.compare(a, b));
        selected
    }

    fn name_filter(&self) -> Option<String> {
        self.name_contains
            .as_deref()
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(str::to_lowercase)
    }
}
