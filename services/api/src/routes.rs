use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use chrono::{Local, NaiveDate, NaiveDateTime};
use flick_credit::credit::report::views::CreditReportSummary;
use flick_credit::credit::{
    authorize_credit_purchase, evaluate, CreditBadge, CreditEvaluation, CreditPortfolio,
    CreditPurchase, CustomerCredit, CustomerCreditCard, CustomerQuery, GeneralSettings, Locale,
};
use flick_credit::dates::{deserialize_optional_date, deserialize_optional_datetime};
use flick_credit::error::AppError;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, info};

#[derive(Debug, Deserialize)]
pub(crate) struct EvaluateRequest {
    pub(crate) customer: CustomerCredit,
    #[serde(default)]
    pub(crate) settings: Option<GeneralSettings>,
    #[serde(default, deserialize_with = "deserialize_optional_date")]
    pub(crate) today: Option<NaiveDate>,
    #[serde(default)]
    pub(crate) locale: Option<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct EvaluateResponse {
    pub(crate) today: NaiveDate,
    pub(crate) evaluation: CreditEvaluation,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) badge: Option<CreditBadge>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) badge_label: Option<String>,
    pub(crate) card: CustomerCreditCard,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ReportRequest {
    pub(crate) customers: Vec<CustomerCredit>,
    #[serde(default)]
    pub(crate) settings: Option<GeneralSettings>,
    #[serde(default, deserialize_with = "deserialize_optional_date")]
    pub(crate) today: Option<NaiveDate>,
    #[serde(default)]
    pub(crate) locale: Option<String>,
    #[serde(default)]
    pub(crate) query: Option<CustomerQuery>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct PurchaseRequest {
    pub(crate) customer: CustomerCredit,
    pub(crate) amount: Decimal,
    #[serde(default, deserialize_with = "deserialize_optional_datetime")]
    pub(crate) purchased_at: Option<NaiveDateTime>,
}

#[derive(Debug, Serialize)]
pub(crate) struct PurchaseResponse {
    pub(crate) purchase: CreditPurchase,
    pub(crate) customer: CustomerCredit,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) available_credit: Option<Decimal>,
}

pub(crate) fn credit_routes() -> axum::Router {
    axum::Router::new()
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
        .route(
            "/api/v1/credit/evaluate",
            axum::routing::post(evaluate_endpoint),
        )
        .route("/api/v1/credit/report", axum::routing::post(report_endpoint))
        .route(
            "/api/v1/credit/purchases",
            axum::routing::post(purchase_endpoint),
        )
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

fn resolve_locale(tag: Option<&str>) -> Locale {
    tag.map(Locale::from_tag).unwrap_or_default()
}

pub(crate) async fn evaluate_endpoint(
    Extension(state): Extension<AppState>,
    Json(payload): Json<EvaluateRequest>,
) -> Result<Json<EvaluateResponse>, AppError> {
    let EvaluateRequest {
        customer,
        settings,
        today,
        locale,
    } = payload;

    let settings = state.settings_or_default(settings);
    let today = today.unwrap_or_else(|| Local::now().date_naive());
    let locale = resolve_locale(locale.as_deref());

    let evaluation = evaluate(&customer, &settings, today);
    debug!(customer_id = customer.id, status = evaluation.status.key(), "credit evaluated");

    let badge = CreditBadge::from_evaluation(&evaluation);
    let card = CustomerCreditCard::build(&customer, &evaluation, locale);

    Ok(Json(EvaluateResponse {
        today,
        badge_label: badge.map(|badge| badge.label(locale)),
        badge,
        evaluation,
        card,
    }))
}

pub(crate) async fn report_endpoint(
    Extension(state): Extension<AppState>,
    Json(payload): Json<ReportRequest>,
) -> Result<Json<CreditReportSummary>, AppError> {
    let ReportRequest {
        customers,
        settings,
        today,
        locale,
        query,
    } = payload;

    let settings = state.settings_or_default(settings);
    let today = today.unwrap_or_else(|| Local::now().date_naive());
    let locale = resolve_locale(locale.as_deref());
    let query = query.unwrap_or_default();

    let selected = query.apply(&customers);
    let report = CreditPortfolio::evaluate(selected, &settings, today);
    info!(
        customers = customers.len(),
        evaluated = report.accounts.len(),
        debtors = report.totals.debtors,
        "credit report built"
    );

    Ok(Json(report.summary(locale)))
}

pub(crate) async fn purchase_endpoint(
    Json(payload): Json<PurchaseRequest>,
) -> Result<Json<PurchaseResponse>, AppError> {
    let PurchaseRequest {
        mut customer,
        amount,
        purchased_at,
    } = payload;

    let purchased_at = purchased_at.unwrap_or_else(|| Local::now().naive_local());
    let purchase = authorize_credit_purchase(&customer, amount, purchased_at)?;
    customer.apply_purchase(&purchase);
    info!(
        customer_id = purchase.customer_id,
        %amount,
        new_balance = %purchase.new_balance,
        "credit purchase authorized"
    );

    Ok(Json(PurchaseResponse {
        available_credit: customer.available_credit(),
        purchase,
        customer,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::test_state;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use flick_credit::credit::CreditStatus;
    use rust_decimal_macros::dec;
    use tower::ServiceExt;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    fn maria() -> CustomerCredit {
        CustomerCredit {
            id: 1,
            name: "Maria Souza".to_string(),
            credit_tracking_enabled: true,
            outstanding_balance: dec!(100),
            credit_limit: Some(dec!(150)),
            last_credit_purchase: date(2024, 1, 15).and_hms_opt(10, 30, 0),
            ..CustomerCredit::default()
        }
    }

    async fn post_json(
        app: axum::Router,
        uri: &str,
        body: serde_json::Value,
    ) -> (StatusCode, serde_json::Value) {
        let request = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .expect("request builds");
        let response = app.oneshot(request).await.expect("router responds");
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body reads");
        let value = serde_json::from_slice(&bytes).expect("json body");
        (status, value)
    }

    #[tokio::test]
    async fn evaluate_endpoint_applies_late_interest() {
        let request = EvaluateRequest {
            customer: maria(),
            settings: Some(GeneralSettings::new(Some(1), Some(dec!(5)))),
            today: Some(date(2024, 4, 15)),
            locale: Some("en-US".to_string()),
        };

        let Json(body) = evaluate_endpoint(
            Extension(test_state(GeneralSettings::default())),
            Json(request),
        )
        .await
        .expect("evaluation succeeds");

        assert_eq!(body.evaluation.status, CreditStatus::Overdue);
        assert_eq!(body.evaluation.amount_with_interest, Some(dec!(110)));
        assert_eq!(body.badge, Some(CreditBadge::Overdue { days: 60 }));
        assert_eq!(body.badge_label.as_deref(), Some("Overdue by 60 days"));
        assert_eq!(body.card.amount_with_interest.as_deref(), Some("R$110.00"));
    }

    #[tokio::test]
    async fn evaluate_endpoint_falls_back_to_configured_settings() {
        let request = EvaluateRequest {
            customer: maria(),
            settings: None,
            today: Some(date(2024, 3, 15)),
            locale: None,
        };

        let Json(body) = evaluate_endpoint(
            Extension(test_state(GeneralSettings::new(Some(2), None))),
            Json(request),
        )
        .await
        .expect("evaluation succeeds");

        assert_eq!(body.evaluation.status, CreditStatus::DueSoon);
        assert_eq!(body.badge, Some(CreditBadge::DueToday));
        assert_eq!(body.badge_label.as_deref(), Some("Vence hoje"));
    }

    #[tokio::test]
    async fn report_endpoint_scopes_customers_by_query() {
        let mut settled = maria();
        settled.id = 2;
        settled.name = "Carla Nunes".to_string();
        settled.outstanding_balance = Decimal::ZERO;

        let request = ReportRequest {
            customers: vec![maria(), settled],
            settings: Some(GeneralSettings::new(Some(1), Some(dec!(5)))),
            today: Some(date(2024, 4, 15)),
            locale: Some("pt-BR".to_string()),
            query: Some(CustomerQuery {
                debtors: Some(true),
                ..CustomerQuery::default()
            }),
        };

        let Json(summary) = report_endpoint(
            Extension(test_state(GeneralSettings::default())),
            Json(request),
        )
        .await
        .expect("report builds");

        assert_eq!(summary.totals.debtors, 1);
        assert_eq!(summary.overdue.len(), 1);
        assert_eq!(summary.overdue[0].customer_id, 1);
        assert_eq!(summary.totals.with_interest_label, "R$\u{a0}110,00");
    }

    #[tokio::test]
    async fn purchase_endpoint_updates_balance() {
        let request = PurchaseRequest {
            customer: maria(),
            amount: dec!(30),
            purchased_at: date(2024, 5, 2).and_hms_opt(9, 0, 0),
        };

        let Json(body) = purchase_endpoint(Json(request))
            .await
            .expect("purchase authorized");

        assert_eq!(body.purchase.new_balance, dec!(130));
        assert_eq!(body.customer.outstanding_balance, dec!(130));
        assert_eq!(
            body.customer.last_credit_purchase,
            date(2024, 5, 2).and_hms_opt(9, 0, 0)
        );
        assert_eq!(body.available_credit, Some(dec!(20)));
    }

    #[tokio::test]
    async fn router_serves_health() {
        let app = credit_routes().layer(Extension(test_state(GeneralSettings::default())));
        let request = Request::builder()
            .uri("/health")
            .body(Body::empty())
            .expect("request builds");

        let response = app.oneshot(request).await.expect("router responds");
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn router_evaluates_api_payloads() {
        let app = credit_routes().layer(Extension(test_state(GeneralSettings::default())));
        let body = json!({
            "customer": {
                "id": 7,
                "nome": "João Pereira",
                "controleFiado": true,
                "saldoDevedor": 250.0,
                "limiteFiado": null,
                "dataUltimaCompraFiado": "2024-03-01T18:05:12",
                "ativo": true
            },
            "settings": { "prazoPagamentoFiado": 1, "taxaJurosAtraso": 2.5 },
            "today": "2024-03-15",
            "locale": "en"
        });

        let (status, value) = post_json(app, "/api/v1/credit/evaluate", body).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(value["evaluation"]["status"], "CURRENT");
        assert_eq!(value["evaluation"]["dueDate"], "2024-04-01");
        assert_eq!(value["evaluation"]["daysUntilDue"], 17);
        assert_eq!(value["badge_label"], "Due in 17 days");
        assert_eq!(value["card"]["credit_limit"], "Not set");
    }

    #[tokio::test]
    async fn router_refuses_purchases_over_the_limit() {
        let app = credit_routes().layer(Extension(test_state(GeneralSettings::default())));
        let body = json!({
            "customer": {
                "id": 1,
                "nome": "Maria Souza",
                "controleFiado": true,
                "saldoDevedor": 100,
                "limiteFiado": 150,
                "ativo": true
            },
            "amount": 80
        });

        let (status, value) = post_json(app, "/api/v1/credit/purchases", body).await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        let message = value["error"].as_str().expect("error message");
        assert!(message.contains("credit limit of 150 exceeded"));
    }
}
