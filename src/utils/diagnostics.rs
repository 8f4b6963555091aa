use crate::utils::error::PricingError;
use serde::Serialize;
use std::error::Error as _;
use std::fmt::Debug;

const SAMPLE_SIZE: usize = 3;

/// Request-scoped logging of outcomes.
///
/// Input batches are summarised by count and the first few items so that a
/// large batch never lands in the logs whole.
#[derive(Debug, Clone, Copy, Default)]
pub struct Diagnostics {
    log_success: bool,
}

impl Diagnostics {
    pub fn new(log_success: bool) -> Self {
        Self { log_success }
    }

    pub fn log_error<T: Serialize + Debug>(&self, path: &str, inputs: &[T], error: &PricingError) {
        let timestamp = chrono::Utc::now().to_rfc3339();
        let sample = sample_inputs(inputs);
        let causes = cause_chain(error);

        if error.is_system_fault() {
            tracing::error!(
                timestamp = %timestamp,
                path = %path,
                input_count = inputs.len(),
                input_sample = %sample,
                category = ?error.category(),
                remote_status = ?error.remote_status(),
                causes = %causes,
                "❌ Request failed: {}",
                error
            );
            tracing::debug!("Error detail: {:?}", error);
        } else {
            tracing::warn!(
                timestamp = %timestamp,
                path = %path,
                input_count = inputs.len(),
                category = ?error.category(),
                "Rejected request: {}",
                error
            );
        }
    }

    pub fn log_success<T: Serialize + Debug, R: Serialize + Debug>(
        &self,
        path: &str,
        inputs: &[T],
        results: &[R],
    ) {
        if !self.log_success {
            return;
        }

        tracing::info!(
            timestamp = %chrono::Utc::now().to_rfc3339(),
            path = %path,
            input_count = inputs.len(),
            input_sample = %sample_inputs(inputs),
            result_count = results.len(),
            result_sample = %sample_inputs(results),
            "✅ Request succeeded"
        );
    }
}

/// The first few items as JSON, or their debug form when they do not serialize.
pub fn sample_inputs<T: Serialize + Debug>(inputs: &[T]) -> String {
    let head = &inputs[..inputs.len().min(SAMPLE_SIZE)];
    serde_json::to_string(head).unwrap_or_else(|_| format!("{:?}", head))
}

/// The error's source chain, innermost last.
pub fn cause_chain(error: &PricingError) -> String {
    let mut causes = Vec::new();
    let mut source = error.source();
    while let Some(cause) = source {
        causes.push(cause.to_string());
        source = cause.source();
    }
    causes.join(" <- ")
}
