//! Store-credit ("fiado") standing of customers: evaluation, presentation,
//! purchase authorization, listing filters and portfolio reporting.

mod display;
pub mod domain;
mod evaluator;
pub mod purchase;
pub mod query;
pub mod report;

pub use display::{
    format_currency, format_date, BadgeColor, BadgeVariant, BadgeView, CreditBadge,
    CustomerCreditCard, Locale,
};
pub use domain::{CreditEvaluation, CreditStatus, CustomerCredit, GeneralSettings};
pub use evaluator::evaluate;
pub use purchase::{authorize_credit_purchase, CreditPurchase, CreditPurchaseError};
pub use query::{CustomerOrder, CustomerQuery};
pub use report::{CreditPortfolio, CreditReport};
