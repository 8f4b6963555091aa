//! HTTP entry point.
//!
//! Dispatch is done by hand in a single fallback handler rather than with
//! per-route handlers: the method is checked first (405), then a POST body
//! is parsed (400 on any path), and only then is the path matched (404).

use crate::adapters::rules_client::HttpRuleEvaluator;
use crate::config::ServiceConfig;
use crate::core::flow::FlowOrchestrator;
use crate::core::pricing::PricingOrchestrator;
use crate::domain::model::{parse_parts, Part};
use crate::domain::ports::RuleEvaluator;
use crate::utils::diagnostics::Diagnostics;
use crate::utils::error::{PricingError, Result};
use axum::body::Bytes;
use axum::extract::{DefaultBodyLimit, State};
use axum::http::{header, Method, Uri};
use axum::response::{IntoResponse, Response};
use axum::{Json, Router};
use std::path::PathBuf;
use std::sync::Arc;

/// Immutable per-process state shared by every request.
pub struct AppState {
    pub pricing: PricingOrchestrator,
    pub flow: FlowOrchestrator,
    pub diagnostics: Diagnostics,
    pub static_file: PathBuf,
}

impl AppState {
    pub fn new(config: &ServiceConfig, evaluator: Arc<dyn RuleEvaluator>) -> Self {
        let rules = config.rule_set();
        Self {
            pricing: PricingOrchestrator::new(evaluator.clone(), rules.clone()),
            flow: FlowOrchestrator::new(evaluator, rules),
            diagnostics: Diagnostics::new(config.log_success),
            static_file: PathBuf::from(&config.static_file),
        }
    }

    pub fn from_config(config: &ServiceConfig) -> Self {
        let evaluator = Arc::new(HttpRuleEvaluator::new(config.remote_settings()));
        Self::new(config, evaluator)
    }
}

/// Build the axum router (separated for testing).
///
/// Bodies are buffered without a size cap so that method and path errors are
/// reported as 405/404 whatever the upload size.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .fallback(dispatch)
        .layer(DefaultBodyLimit::disable())
        .with_state(state)
}

pub async fn serve(config: ServiceConfig) -> anyhow::Result<()> {
    let addr = config.listen_addr();
    let app = router(Arc::new(AppState::from_config(&config)));

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("🚀 Listening on {}", listener.local_addr()?);
    axum::serve(listener, app).await?;
    Ok(())
}

async fn dispatch(
    State(state): State<Arc<AppState>>,
    method: Method,
    uri: Uri,
    body: Bytes,
) -> Response {
    let path = uri.path();

    if method == Method::GET {
        return match path {
            "/" => serve_index(&state).await,
            _ => PricingError::NotFound.into_response(),
        };
    }

    if method != Method::POST {
        return PricingError::MethodNotAllowed.into_response();
    }

    let parts = match parse_parts(&body) {
        Ok(parts) => parts,
        Err(e) => {
            state.diagnostics.log_error::<Part>(path, &[], &e);
            return e.into_response();
        }
    };

    let outcome = match path {
        "/rules" => price_parts(&state, &parts).await,
        "/flow" => run_flow(&state, &parts, batch_requested(&uri)).await,
        _ => Err(PricingError::NotFound),
    };

    match outcome {
        Ok(response) => response,
        Err(e) => {
            state.diagnostics.log_error(path, &parts, &e);
            e.into_response()
        }
    }
}

async fn price_parts(state: &AppState, parts: &[Part]) -> Result<Response> {
    let priced = state.pricing.price_parts(parts).await?;
    state.diagnostics.log_success("/rules", parts, &priced);
    Ok(Json(priced).into_response())
}

async fn run_flow(state: &AppState, parts: &[Part], batch: bool) -> Result<Response> {
    let merged = state.flow.run(parts, batch).await?;
    state.diagnostics.log_success("/flow", parts, merged.as_slice());
    Ok(Json(merged).into_response())
}

async fn serve_index(state: &AppState) -> Response {
    match tokio::fs::read(&state.static_file).await {
        Ok(html) => ([(header::CONTENT_TYPE, "text/html; charset=utf-8")], html).into_response(),
        Err(source) => {
            let e = PricingError::AssetMissing {
                path: state.static_file.display().to_string(),
                source,
            };
            state.diagnostics.log_error::<Part>("/", &[], &e);
            e.into_response()
        }
    }
}

/// `batch=true` selects batch mode; any other value or absence does not.
pub fn batch_requested(uri: &Uri) -> bool {
    uri.query()
        .map(|query| {
            url::form_urlencoded::parse(query.as_bytes())
                .any(|(key, value)| key == "batch" && value == "true")
        })
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_batch_flag_parsing() {
        let uri = |s: &str| s.parse::<Uri>().unwrap();
        assert!(batch_requested(&uri("/flow?batch=true")));
        assert!(batch_requested(&uri("/flow?debug=1&batch=true")));
        assert!(!batch_requested(&uri("/flow")));
        assert!(!batch_requested(&uri("/flow?batch=TRUE")));
        assert!(!batch_requested(&uri("/flow?batch=1")));
    }
}
