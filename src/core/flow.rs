use crate::config::RuleSet;
use crate::core::merge::{merge_batch, merge_per_part, Merged};
use crate::domain::model::{EvaluationKind, Part};
use crate::domain::ports::RuleEvaluator;
use crate::utils::error::Result;
use futures::future::try_join_all;
use serde_json::{json, Value};
use std::sync::Arc;

/// Runs parts through the remote pricing flow, one call per part or one call
/// for the whole batch.
pub struct FlowOrchestrator {
    evaluator: Arc<dyn RuleEvaluator>,
    rules: RuleSet,
}

impl FlowOrchestrator {
    pub fn new(evaluator: Arc<dyn RuleEvaluator>, rules: RuleSet) -> Self {
        Self { evaluator, rules }
    }

    pub async fn run(&self, parts: &[Part], batch: bool) -> Result<Merged> {
        if parts.is_empty() {
            return Ok(Merged::Many(Vec::new()));
        }

        let inputs: Vec<Value> = parts.iter().map(Part::to_value).collect();

        if batch {
            let payload = Value::Array(inputs.iter().map(|input| json!({ "input": input })).collect());
            let response = self.evaluate_flow(payload).await?;
            Ok(merge_batch(inputs, response))
        } else {
            let responses = try_join_all(
                inputs
                    .iter()
                    .map(|input| self.evaluate_flow(json!({ "input": input }))),
            )
            .await?;
            Ok(merge_per_part(inputs, responses))
        }
    }

    async fn evaluate_flow(&self, payload: Value) -> Result<Value> {
        self.evaluator
            .evaluate(
                EvaluationKind::Flow,
                &self.rules.pricing_flow,
                &self.rules.version,
                payload,
            )
            .await
    }
}
