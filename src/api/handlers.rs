//! HTTP request handlers for the HRMS engine API.
//!
//! This module contains the handler functions for all API endpoints.

use std::time::Instant;

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use chrono::Local;
use rust_decimal::Decimal;
use tracing::{info, warn};
use uuid::Uuid;

use crate::attendance::{check_file_type, ImportSummary};
use crate::calculation::{calculate_payroll, compare_regimes};
use crate::error::EngineError;
use crate::models::{
    AttendanceRecord, MAX_AMOUNT, PayrollCalculation, PayrollProfile, SalaryInput, TaxComparison,
};

use super::request::{
    AttendanceQuery, ImportRequest, PayrollProfileRequest, PunchRequest, TaxCompareRequest,
};
use super::response::{ApiErrorResponse, HealthResponse, ProfileCalculationResponse};
use super::state::AppState;

type ApiResult<T> = Result<T, ApiErrorResponse>;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/payroll/calculate", post(calculate_handler))
        .route("/tax/compare", post(tax_compare_handler))
        .route("/payroll", get(list_profiles_handler))
        .route(
            "/payroll/:employee_id",
            get(get_profile_handler).put(put_profile_handler),
        )
        .route("/attendance/check-in", post(check_in_handler))
        .route("/attendance/check-out", post(check_out_handler))
        .route("/attendance/import", post(import_handler))
        .route("/attendance/:employee_id", get(list_attendance_handler))
        .with_state(state)
}

/// Unwraps a JSON body, logging and mapping a rejection to a 400.
fn json_body<T>(
    payload: Result<Json<T>, JsonRejection>,
    correlation_id: Uuid,
) -> ApiResult<T> {
    payload.map(|Json(body)| body).map_err(|rejection| {
        warn!(
            correlation_id = %correlation_id,
            error = %rejection.body_text(),
            "Rejected request body"
        );
        rejection.into()
    })
}

/// Logs an engine error and converts it to a response.
fn engine_error(error: EngineError, correlation_id: Uuid) -> ApiErrorResponse {
    warn!(correlation_id = %correlation_id, error = %error, "Request failed");
    error.into()
}

async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Handler for POST /payroll/calculate.
async fn calculate_handler(
    State(state): State<AppState>,
    payload: Result<Json<SalaryInput>, JsonRejection>,
) -> ApiResult<Json<PayrollCalculation>> {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing payroll calculation");

    let input = json_body(payload, correlation_id)?;
    input
        .validate()
        .map_err(|e| engine_error(e, correlation_id))?;

    let start_time = Instant::now();
    let result = calculate_payroll(&input, state.config().config())
        .map_err(|e| engine_error(e, correlation_id))?;
    info!(
        correlation_id = %correlation_id,
        ctc = %input.ctc,
        recommended_regime = %result.recommendation.recommended_regime,
        net_annual_salary = %result.net_annual_salary,
        duration_us = start_time.elapsed().as_micros(),
        "Payroll calculation completed"
    );
    Ok(Json(result))
}

/// Handler for POST /tax/compare.
async fn tax_compare_handler(
    State(state): State<AppState>,
    payload: Result<Json<TaxCompareRequest>, JsonRejection>,
) -> ApiResult<Json<TaxComparison>> {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing tax comparison");

    let request = json_body(payload, correlation_id)?;
    if request.taxable_income < Decimal::ZERO {
        return Err(engine_error(
            EngineError::validation("taxable_income", "must not be negative"),
            correlation_id,
        ));
    }
    if request.taxable_income > MAX_AMOUNT {
        return Err(engine_error(
            EngineError::validation("taxable_income", format!("must not exceed {}", MAX_AMOUNT)),
            correlation_id,
        ));
    }

    let (comparison, _) = compare_regimes(request.taxable_income, state.config().config(), 1);
    info!(
        correlation_id = %correlation_id,
        taxable_income = %comparison.taxable_income,
        recommended_regime = %comparison.recommendation.recommended_regime,
        "Tax comparison completed"
    );
    Ok(Json(comparison))
}

/// Handler for GET /payroll.
async fn list_profiles_handler(State(state): State<AppState>) -> Json<Vec<PayrollProfile>> {
    Json(state.payroll().list().await)
}

/// Handler for PUT /payroll/{employee_id}.
///
/// Returns 201 when the profile is new and 200 when it replaced one.
async fn put_profile_handler(
    State(state): State<AppState>,
    Path(employee_id): Path<String>,
    payload: Result<Json<PayrollProfileRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<PayrollProfile>)> {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, employee_id = %employee_id, "Storing payroll profile");

    let request = json_body(payload, correlation_id)?;
    let written = state
        .payroll()
        .upsert(request.into_profile(employee_id))
        .await
        .map_err(|e| engine_error(e, correlation_id))?;

    let status = if written.created {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    info!(
        correlation_id = %correlation_id,
        employee_id = %written.profile.employee_id,
        created = written.created,
        "Payroll profile stored"
    );
    Ok((status, Json(written.profile)))
}

/// Handler for GET /payroll/{employee_id}.
///
/// The calculation is rerun on every read from the stored inputs.
async fn get_profile_handler(
    State(state): State<AppState>,
    Path(employee_id): Path<String>,
) -> ApiResult<Json<ProfileCalculationResponse>> {
    let correlation_id = Uuid::new_v4();

    let profile = state
        .payroll()
        .get(&employee_id)
        .await
        .map_err(|e| engine_error(e, correlation_id))?;
    let calculation = calculate_payroll(&profile.salary_input(), state.config().config())
        .map_err(|e| engine_error(e, correlation_id))?;

    info!(
        correlation_id = %correlation_id,
        employee_id = %employee_id,
        net_monthly_salary = %calculation.net_monthly_salary,
        "Payroll profile calculated"
    );
    Ok(Json(ProfileCalculationResponse {
        profile,
        calculation,
    }))
}

/// Handler for POST /attendance/check-in.
async fn check_in_handler(
    State(state): State<AppState>,
    payload: Result<Json<PunchRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<AttendanceRecord>)> {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing check-in");

    let punch = json_body(payload, correlation_id)?
        .into_punch(Local::now().naive_local())
        .map_err(|e| engine_error(e, correlation_id))?;
    let record = state
        .attendance()
        .check_in(punch)
        .await
        .map_err(|e| engine_error(e, correlation_id))?;

    info!(
        correlation_id = %correlation_id,
        employee_id = %record.employee_id,
        date = %record.date,
        "Checked in"
    );
    Ok((StatusCode::CREATED, Json(record)))
}

/// Handler for POST /attendance/check-out.
async fn check_out_handler(
    State(state): State<AppState>,
    payload: Result<Json<PunchRequest>, JsonRejection>,
) -> ApiResult<Json<AttendanceRecord>> {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing check-out");

    let punch = json_body(payload, correlation_id)?
        .into_punch(Local::now().naive_local())
        .map_err(|e| engine_error(e, correlation_id))?;
    let record = state
        .attendance()
        .check_out(punch)
        .await
        .map_err(|e| engine_error(e, correlation_id))?;

    info!(
        correlation_id = %correlation_id,
        employee_id = %record.employee_id,
        worked_minutes = ?record.worked_minutes,
        "Checked out"
    );
    Ok(Json(record))
}

/// Handler for GET /attendance/{employee_id}.
async fn list_attendance_handler(
    State(state): State<AppState>,
    Path(employee_id): Path<String>,
    query: Result<Query<AttendanceQuery>, QueryRejection>,
) -> ApiResult<Json<Vec<AttendanceRecord>>> {
    let Query(query) = query.map_err(ApiErrorResponse::from)?;
    Ok(Json(state.attendance().list(&employee_id, query.date).await))
}

/// Handler for POST /attendance/import.
async fn import_handler(
    State(state): State<AppState>,
    payload: Result<Json<ImportRequest>, JsonRejection>,
) -> ApiResult<Json<ImportSummary>> {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing attendance import");

    let request = json_body(payload, correlation_id)?;
    if let Some(file_name) = &request.source_file {
        check_file_type(file_name).map_err(|e| engine_error(e, correlation_id))?;
    }

    let summary = state.attendance().import(&request.rows).await;
    info!(
        correlation_id = %correlation_id,
        rows = request.rows.len(),
        created = summary.created,
        updated = summary.updated,
        rejected = summary.errors.len(),
        "Attendance import completed"
    );
    Ok(Json(summary))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ApiError;
    use crate::config::ConfigLoader;
    use axum::{
        body::Body,
        http::{Request, Response},
    };
    use tower::ServiceExt;

    fn create_test_state() -> AppState {
        let loader = ConfigLoader::load("./config/in_payroll").expect("Failed to load config");
        AppState::new(loader).expect("Failed to build state")
    }

    fn json_request(method: &str, uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn read_json<T: serde::de::DeserializeOwned>(response: Response<Body>) -> T {
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn test_health_returns_version() {
        let router = create_router(create_test_state());

        let response = router
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let health: HealthResponse = read_json(response).await;
        assert_eq!(health.status, "ok");
        assert_eq!(health.version, env!("CARGO_PKG_VERSION"));
    }

    #[tokio::test]
    async fn test_calculate_returns_200() {
        let router = create_router(create_test_state());

        let response = router
            .oneshot(json_request(
                "POST",
                "/payroll/calculate",
                r#"{ "ctc": "1000000", "city": "Mumbai" }"#,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let content_type = response.headers().get("content-type").unwrap();
        assert_eq!(content_type, "application/json");

        let result: PayrollCalculation = read_json(response).await;
        assert_eq!(result.breakdown.taxable_income, Decimal::from(755_200));
    }

    #[tokio::test]
    async fn test_malformed_json_returns_400() {
        let router = create_router(create_test_state());

        let response = router
            .oneshot(json_request("POST", "/payroll/calculate", "{invalid json"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let error: ApiError = read_json(response).await;
        assert_eq!(error.code, "MALFORMED_JSON");
    }

    #[tokio::test]
    async fn test_missing_ctc_returns_400() {
        let router = create_router(create_test_state());

        let response = router
            .oneshot(json_request(
                "POST",
                "/payroll/calculate",
                r#"{ "city": "Mumbai" }"#,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let error: ApiError = read_json(response).await;
        assert_eq!(error.code, "VALIDATION_ERROR");
        assert!(error.message.contains("ctc"));
    }

    #[tokio::test]
    async fn test_zero_ctc_returns_400() {
        let router = create_router(create_test_state());

        let response = router
            .oneshot(json_request(
                "POST",
                "/payroll/calculate",
                r#"{ "ctc": 0, "city": "Mumbai" }"#,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let error: ApiError = read_json(response).await;
        assert_eq!(error.code, "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_amounts_beyond_decimal_range_return_400() {
        let router = create_router(create_test_state());

        let response = router
            .oneshot(json_request(
                "POST",
                "/payroll/calculate",
                r#"{ "ctc": "79228162514264337593543950335", "joining_bonus": "79228162514264337593543950335", "city": "Mumbai" }"#,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let error: ApiError = read_json(response).await;
        assert_eq!(error.code, "VALIDATION_ERROR");
        assert!(error.message.contains("ctc"));
    }

    #[tokio::test]
    async fn test_tax_compare_above_max_amount_returns_400() {
        let router = create_router(create_test_state());

        let response = router
            .oneshot(json_request(
                "POST",
                "/tax/compare",
                r#"{ "taxable_income": "1000000000000001" }"#,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let error: ApiError = read_json(response).await;
        assert_eq!(error.code, "VALIDATION_ERROR");
        assert!(error.message.contains("taxable_income"));
    }

    #[tokio::test]
    async fn test_missing_content_type_returns_400() {
        let router = create_router(create_test_state());

        let response = router
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/tax/compare")
                    .body(Body::from(r#"{ "taxable_income": 600000 }"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let error: ApiError = read_json(response).await;
        assert_eq!(error.code, "MISSING_CONTENT_TYPE");
    }

    #[tokio::test]
    async fn test_negative_taxable_income_returns_400() {
        let router = create_router(create_test_state());

        let response = router
            .oneshot(json_request(
                "POST",
                "/tax/compare",
                r#"{ "taxable_income": -1 }"#,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_unknown_profile_returns_404() {
        let router = create_router(create_test_state());

        let response = router
            .oneshot(
                Request::builder()
                    .uri("/payroll/EMP404")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let error: ApiError = read_json(response).await;
        assert_eq!(error.code, "PROFILE_NOT_FOUND");
    }

    #[tokio::test]
    async fn test_bad_attendance_date_query_returns_400() {
        let router = create_router(create_test_state());

        let response = router
            .oneshot(
                Request::builder()
                    .uri("/attendance/EMP001?date=yesterday")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let error: ApiError = read_json(response).await;
        assert_eq!(error.code, "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_import_rejects_unsupported_file() {
        let router = create_router(create_test_state());

        let response = router
            .oneshot(json_request(
                "POST",
                "/attendance/import",
                r#"{ "source_file": "march.pdf", "rows": [] }"#,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let error: ApiError = read_json(response).await;
        assert_eq!(error.code, "UNSUPPORTED_FILE_TYPE");
    }
}
