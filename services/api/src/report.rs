use chrono::{Local, NaiveDate, NaiveTime};
use clap::Args;
use flick_credit::config::AppConfig;
use flick_credit::credit::report::views::CreditReportSummary;
use flick_credit::credit::{
    evaluate, format_currency, format_date, CreditBadge, CreditPortfolio, CustomerCredit,
    CustomerOrder, CustomerQuery, GeneralSettings, Locale,
};
use flick_credit::error::AppError;
use flick_credit::import::CustomerImporter;
use flick_credit::remote::RemoteCatalog;
use flick_credit::telemetry;
use rust_decimal::Decimal;
use std::path::PathBuf;

#[derive(Args, Debug, Default)]
pub(crate) struct CreditReportArgs {
    /// CSV export of the customer listing
    #[arg(long, conflicts_with = "api_url")]
    pub(crate) customers_csv: Option<PathBuf>,
    /// Base URL of the customer API (defaults to FLICK_API_URL)
    #[arg(long)]
    pub(crate) api_url: Option<String>,
    /// Payment term in months after the last credit purchase
    #[arg(long, allow_negative_numbers = true)]
    pub(crate) grace_months: Option<i32>,
    /// Monthly late interest, in percent
    #[arg(long)]
    pub(crate) interest_rate: Option<Decimal>,
    /// Evaluation date (YYYY-MM-DD). Defaults to today.
    #[arg(long, value_parser = flick_credit::dates::parse_date)]
    pub(crate) today: Option<NaiveDate>,
    /// Output language tag (pt-BR or en-US)
    #[arg(long)]
    pub(crate) locale: Option<String>,
    /// Only customers with (true) or without (false) an open balance
    #[arg(long)]
    pub(crate) debtors: Option<bool>,
    /// Only active (true) or inactive (false) customers
    #[arg(long)]
    pub(crate) active: Option<bool>,
    /// Case-insensitive name filter
    #[arg(long)]
    pub(crate) name: Option<String>,
    /// Sort key: nomeAsc, nomeDesc, saldoDesc, saldoAsc, cadastroRecente, cadastroAntigo
    #[arg(long)]
    pub(crate) order_by: Option<String>,
}

#[derive(Args, Debug)]
pub(crate) struct CreditEvaluateArgs {
    /// Outstanding balance
    #[arg(long)]
    pub(crate) balance: Decimal,
    /// Date of the last credit purchase (YYYY-MM-DD)
    #[arg(long, value_parser = flick_credit::dates::parse_date)]
    pub(crate) last_purchase: NaiveDate,
    /// Payment term in months after the last credit purchase
    #[arg(long, allow_negative_numbers = true)]
    pub(crate) grace_months: Option<i32>,
    /// Monthly late interest, in percent
    #[arg(long)]
    pub(crate) interest_rate: Option<Decimal>,
    /// Evaluation date (YYYY-MM-DD). Defaults to today.
    #[arg(long, value_parser = flick_credit::dates::parse_date)]
    pub(crate) today: Option<NaiveDate>,
    /// Output language tag (pt-BR or en-US)
    #[arg(long)]
    pub(crate) locale: Option<String>,
}

impl CreditReportArgs {
    fn query(&self) -> CustomerQuery {
        CustomerQuery {
            active: self.active,
            debtors: self.debtors,
            name_contains: self.name.clone(),
            order_by: self.order_by.as_deref().map(CustomerOrder::from_key),
        }
    }
}

/// Command-line flags win over the environment, which wins over the settings
/// stored behind the API.
fn merge_settings(
    grace_months: Option<i32>,
    interest_rate: Option<Decimal>,
    configured: &GeneralSettings,
    stored: GeneralSettings,
) -> GeneralSettings {
    GeneralSettings {
        grace_period_months: grace_months
            .or(configured.grace_period_months)
            .or(stored.grace_period_months),
        late_interest_rate_monthly: interest_rate
            .or(configured.late_interest_rate_monthly)
            .or(stored.late_interest_rate_monthly),
        ..stored
    }
}

/// Configuration for a one-shot command, with logging installed on stderr.
fn command_config() -> Result<AppConfig, AppError> {
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;
    Ok(config)
}

pub(crate) async fn run_credit_report(args: CreditReportArgs) -> Result<(), AppError> {
    let config = command_config()?;
    let configured = config.credit.default_settings();
    let query = args.query();

    let (customers, stored, source) = if let Some(path) = args.customers_csv.as_ref() {
        let customers = CustomerImporter::from_path(path)?;
        (
            customers,
            GeneralSettings::default(),
            format!("CSV export {}", path.display()),
        )
    } else {
        let api_url = args
            .api_url
            .clone()
            .or_else(|| config.credit.api_url.clone())
            .ok_or_else(|| {
                AppError::InvalidInput(
                    "no customer source: pass --customers-csv or --api-url, or set FLICK_API_URL"
                        .to_string(),
                )
            })?;
        let catalog = RemoteCatalog::new(&api_url)?;
        let customers = catalog.customers(&query).await?;
        let stored = catalog.settings().await?;
        (customers, stored, format!("customer API {}", catalog.base_url()))
    };

    let settings = merge_settings(args.grace_months, args.interest_rate, &configured, stored);
    let today = args.today.unwrap_or_else(|| Local::now().date_naive());
    let locale = args.locale.as_deref().map(Locale::from_tag).unwrap_or_default();

    let selected = query.apply(&customers);
    let report = CreditPortfolio::evaluate(selected, &settings, today);
    render_credit_report(&report.summary(locale), &settings, &source);

    Ok(())
}

pub(crate) fn run_credit_evaluate(args: CreditEvaluateArgs) -> Result<(), AppError> {
    let CreditEvaluateArgs {
        balance,
        last_purchase,
        grace_months,
        interest_rate,
        today,
        locale,
    } = args;

    let config = command_config()?;
    let settings = merge_settings(
        grace_months,
        interest_rate,
        &config.credit.default_settings(),
        GeneralSettings::default(),
    );
    let today = today.unwrap_or_else(|| Local::now().date_naive());
    let locale = locale.as_deref().map(Locale::from_tag).unwrap_or_default();

    let customer = CustomerCredit {
        credit_tracking_enabled: true,
        outstanding_balance: balance,
        last_credit_purchase: Some(last_purchase.and_time(NaiveTime::default())),
        ..CustomerCredit::default()
    };
    let evaluation = evaluate(&customer, &settings, today);

    println!("Credit evaluation as of {}", format_date(today, locale));
    println!("- Status: {}", evaluation.status.label(locale));
    if let Some(badge) = CreditBadge::from_evaluation(&evaluation) {
        println!("- Badge: {}", badge.label(locale));
    }
    println!("- Balance: {}", format_currency(balance, locale));
    if let Some(due_date) = evaluation.due_date {
        println!("- Due date: {}", format_date(due_date, locale));
    }
    if let Some(months) = evaluation.months_overdue {
        println!("- Months overdue: {months}");
    }
    if let Some(amount) = evaluation.amount_with_interest {
        println!(
            "- Amount with interest: {} (interest {})",
            format_currency(amount, locale),
            format_currency(evaluation.accrued_interest(balance), locale)
        );
    }

    Ok(())
}

fn render_credit_report(summary: &CreditReportSummary, settings: &GeneralSettings, source: &str) {
    println!("Credit portfolio report");
    println!("Evaluated on {} ({})", summary.today, summary.locale);
    println!("Data source: {source}");
    match settings.payment_term() {
        Some(months) => println!("Payment term: {months} month(s)"),
        None => println!("Payment term: none (balances never fall due)"),
    }
    match settings.interest_rate() {
        Some(rate) => println!("Late interest: {rate}% per month"),
        None => println!("Late interest: none"),
    }

    println!("\nStatus counts");
    for entry in &summary.status_counts {
        println!("- {}: {}", entry.status_label, entry.count);
    }

    let totals = &summary.totals;
    println!("\nTotals");
    println!(
        "- {} debtors | outstanding {} | with interest {} | accrued interest {}",
        totals.debtors,
        totals.outstanding_label,
        totals.with_interest_label,
        totals.accrued_interest_label
    );

    if summary.overdue.is_empty() {
        println!("\nOverdue accounts: none");
    } else {
        println!("\nOverdue accounts");
        for account in &summary.overdue {
            println!(
                "- #{} {} | {} | due {} | balance {} | with interest {}",
                account.customer_id,
                account.name,
                account.badge_label.as_deref().unwrap_or(account.status_label),
                account.due_date_label.as_deref().unwrap_or("-"),
                account.balance_label,
                account.amount_with_interest_label
            );
        }
    }

    if summary.upcoming.is_empty() {
        println!("\nUpcoming due dates: none");
    } else {
        println!("\nUpcoming due dates");
        for account in &summary.upcoming {
            println!(
                "- #{} {} | {} | due {} | balance {}",
                account.customer_id,
                account.name,
                account.badge_label.as_deref().unwrap_or(account.status_label),
                account.due_date_label.as_deref().unwrap_or("-"),
                account.balance_label
            );
        }
    }
}
