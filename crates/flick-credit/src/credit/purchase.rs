use super::domain::CustomerCredit;
use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::Serialize;

/// Accepted credit sale: the balance and purchase date the customer ends up with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreditPurchase {
    pub customer_id: u64,
    pub amount: Decimal,
    pub new_balance: Decimal,
    pub last_credit_purchase: NaiveDateTime,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CreditPurchaseError {
    #[error("customer {0} is inactive")]
    InactiveCustomer(u64),
    #[error("customer {0} is not enabled for credit purchases")]
    CreditNotEnabled(u64),
    #[error("purchase amount must be positive, got {0}")]
    InvalidAmount(Decimal),
    #[error("credit limit of {limit} exceeded: balance after purchase would be {balance_after}")]
    LimitExceeded {
        limit: Decimal,
        balance_after: Decimal,
    },
}

/// Checks whether `customer` may buy `amount` on credit at `purchased_at`.
pub fn authorize_credit_purchase(
    customer: &CustomerCredit,
    amount: Decimal,
    purchased_at: NaiveDateTime,
) -> Result<CreditPurchase, CreditPurchaseError> {
    if !customer.active {
        return Err(CreditPurchaseError::InactiveCustomer(customer.id));
    }
    if !customer.credit_tracking_enabled {
        return Err(CreditPurchaseError::CreditNotEnabled(customer.id));
    }
    if amount <= Decimal::ZERO {
        return Err(CreditPurchaseError::InvalidAmount(amount));
    }

    let balance_after = customer
        .outstanding_balance
        .checked_add(amount)
        .unwrap_or(Decimal::MAX);

    if let Some(limit) = customer.credit_limit {
        if balance_after > limit {
            return Err(CreditPurchaseError::LimitExceeded {
                limit,
                balance_after,
            });
        }
    }

    Ok(CreditPurchase {
        customer_id: customer.id,
        amount,
        new_balance: balance_after,
        last_credit_purchase: purchased_at,
    })
}

impl CustomerCredit {
    /// Headroom left under the credit limit, if one is set.
    pub fn available_credit(&self) -> Option<Decimal> {
        self.credit_limit
            .map(|limit| (limit - self.outstanding_balance).max(Decimal::ZERO))
    }

    pub fn apply_purchase(&mut self, purchase: &CreditPurchase) {
        self.outstanding_balance = purchase.new_balance;
        self.last_credit_purchase = Some(purchase.last_credit_purchase);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 4, 2)
            .and_then(|date| date.and_hms_opt(16, 45, 0))
            .expect("valid timestamp")
    }

    fn customer(balance: Decimal, limit: Option<Decimal>) -> CustomerCredit {
        CustomerCredit {
            id: 11,
            name: "Ana Lima".to_string(),
            credit_tracking_enabled: true,
            outstanding_balance: balance,
            credit_limit: limit,
            ..CustomerCredit::default()
        }
    }

    #[test]
    fn purchase_within_limit_updates_balance_and_date() {
        let mut customer = customer(dec!(120), Some(dec!(200)));
        let purchase =
            authorize_credit_purchase(&customer, dec!(80), now()).expect("within limit");
        assert_eq!(purchase.new_balance, dec!(200));

        customer.apply_purchase(&purchase);
        assert_eq!(customer.outstanding_balance, dec!(200));
        assert_eq!(customer.last_credit_purchase, Some(now()));
        assert_eq!(customer.available_credit(), Some(dec!(0)));
    }

    #[test]
    fn purchase_over_limit_is_refused() {
        let customer = customer(dec!(150), Some(dec!(200)));
        match authorize_credit_purchase(&customer, dec!(50.01), now()) {
            Err(CreditPurchaseError::LimitExceeded {
                limit,
                balance_after,
            }) => {
                assert_eq!(limit, dec!(200));
                assert_eq!(balance_after, dec!(200.01));
            }
            other => panic!("expected limit exceeded, got {other:?}"),
        }
    }

    #[test]
    fn purchase_without_limit_is_unbounded() {
        let customer = customer(dec!(10_000), None);
        assert!(authorize_credit_purchase(&customer, dec!(5_000), now()).is_ok());
        assert_eq!(customer.available_credit(), None);
    }

    #[test]
    fn ineligible_customers_are_refused() {
        let mut inactive = customer(dec!(0), None);
        inactive.active = false;
        assert_eq!(
            authorize_credit_purchase(&inactive, dec!(1), now()),
            Err(CreditPurchaseError::InactiveCustomer(11))
        );

        let mut untracked = customer(dec!(0), None);
        untracked.credit_tracking_enabled = false;
        assert_eq!(
            authorize_credit_purchase(&untracked, dec!(1), now()),
            Err(CreditPurchaseError::CreditNotEnabled(11))
        );

        assert_eq!(
            authorize_credit_purchase(&customer(dec!(0), None), dec!(0), now()),
            Err(CreditPurchaseError::InvalidAmount(dec!(0)))
        );
    }
}
