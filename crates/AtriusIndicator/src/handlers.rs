//! Request handlers for the indicator expression server.
//!
//! Thin HTTP adapters over the engine: extract the request, run the
//! corresponding engine operation against the snapshot loaded at startup,
//! shape the response. All domain decisions live in the engine modules.

use axum::{
    Json,
    extract::State,
    response::{IntoResponse, Response},
};
use serde_json::json;
use std::sync::Arc;
use tracing::{debug, info};

use crate::arithmetic;
use crate::engine::IndicatorEngine;
use crate::error::ExpressionError;
use crate::models::{
    DescribeResponse, EvaluateRequest, EvaluateResponse, ExplodeResponse, ExpressionRequest,
    ValidateResponse,
};
use atrius_indicator_support::IndicatorExpression;

/// Shared server state: the engine over the startup snapshot.
#[derive(Clone)]
pub struct AppState {
    /// Engine bound to the loaded metadata snapshot.
    pub engine: IndicatorEngine,
}

/// Handler for `POST /api/expressions/validate`.
///
/// Validation failures are an expected outcome, not an HTTP error: the
/// response is always 200 with a `VALID`/`ERROR` status, so bulk clients
/// can post freely-authored formulas without tripping error handling.
pub async fn validate_expression(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ExpressionRequest>,
) -> Result<Response, ExpressionError> {
    info!("Handling expression validation request");

    let response = match state.engine.validate(&request.expression) {
        Ok(()) => {
            // A valid formula always describes cleanly; description
            // failure here means the snapshot changed mid-request.
            let description = state.engine.describe(&request.expression)?;
            ValidateResponse::valid(description)
        }
        Err(violation) => {
            debug!(violation = %violation, "expression failed validation");
            ValidateResponse::invalid(&violation)
        }
    };

    Ok(Json(response).into_response())
}

/// Handler for `POST /api/expressions/description`.
pub async fn describe_expression(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ExpressionRequest>,
) -> Result<Response, ExpressionError> {
    info!("Handling expression description request");

    let description = state.engine.describe(&request.expression)?;
    Ok(Json(DescribeResponse { description }).into_response())
}

/// Handler for `POST /api/expressions/explode`.
pub async fn explode_expression(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ExpressionRequest>,
) -> Result<Response, ExpressionError> {
    info!("Handling expression explode request");

    let exploded = state.engine.explode(&request.expression)?;
    Ok(Json(ExplodeResponse { exploded }).into_response())
}

/// Handler for `POST /api/expressions/evaluate`.
///
/// Expands totals, seeds constants and group counts from the snapshot,
/// substitutes the posted values and evaluates. A policy skip and an
/// evaluator "no result" are both successful responses - the caller
/// learns there is no value for this context and moves on.
pub async fn evaluate_expression(
    State(state): State<Arc<AppState>>,
    Json(request): Json<EvaluateRequest>,
) -> Result<Response, ExpressionError> {
    info!("Handling expression evaluation request");

    let exploded = state.engine.explode(&request.expression)?;
    let expression = IndicatorExpression::new(request.expression, request.missing_value_policy)
        .with_exploded(exploded);

    let mut context = request.context.into_context();
    state
        .engine
        .seed_context(expression.evaluation_text(), &mut context);

    let response = match state.engine.generate(&expression, &context) {
        None => EvaluateResponse {
            value: None,
            generated: None,
            skipped: true,
        },
        Some(generated) => {
            let value = match arithmetic::evaluate(&generated) {
                Ok(value) => Some(value),
                Err(err) => {
                    debug!(error = %err, generated = generated.as_str(), "no result for this context");
                    None
                }
            };
            EvaluateResponse {
                value,
                generated: Some(generated),
                skipped: false,
            }
        }
    };

    Ok(Json(response).into_response())
}

/// Handler for the health check endpoint.
pub async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "service": "indicator-server",
        "version": env!("CARGO_PKG_VERSION")
    }))
}
