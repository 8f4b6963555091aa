use crate::domain::model::EvaluationKind;
use crate::utils::error::Result;
use async_trait::async_trait;
use serde_json::Value;

/// The remote decision-evaluation capability.
#[async_trait]
pub trait RuleEvaluator: Send + Sync {
    async fn evaluate(
        &self,
        kind: EvaluationKind,
        identifier: &str,
        version: &str,
        payload: Value,
    ) -> Result<Value>;
}
