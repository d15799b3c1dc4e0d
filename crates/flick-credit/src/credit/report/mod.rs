mod summary;
pub mod views;

pub use summary::{AccountSnapshot, CreditPortfolio, CreditReport, PortfolioTotals};
