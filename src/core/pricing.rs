use crate::config::RuleSet;
use crate::core::extract::summarize;
use crate::domain::model::{EvaluationKind, Part, PricedPart};
use crate::domain::ports::RuleEvaluator;
use crate::utils::error::Result;
use futures::future::try_join_all;
use serde_json::Value;
use std::sync::Arc;

/// Prices parts by evaluating the markup, discount and manufacturability
/// rules for every part at once.
pub struct PricingOrchestrator {
    evaluator: Arc<dyn RuleEvaluator>,
    rules: RuleSet,
}

impl PricingOrchestrator {
    pub fn new(evaluator: Arc<dyn RuleEvaluator>, rules: RuleSet) -> Self {
        Self { evaluator, rules }
    }

    /// Output order matches `parts`. The first failed call aborts the batch
    /// and drops the calls still in flight.
    pub async fn price_parts(&self, parts: &[Part]) -> Result<Vec<PricedPart>> {
        try_join_all(parts.iter().map(|part| self.price_part(part))).await
    }

    pub async fn price_part(&self, part: &Part) -> Result<PricedPart> {
        let input = part.to_value();

        let (markup_result, discount_result, manufacturability_result) = tokio::try_join!(
            self.evaluate_rule(&self.rules.markup, &input),
            self.evaluate_rule(&self.rules.discount, &input),
            self.evaluate_rule(&self.rules.manufacturability, &input),
        )?;

        let summary = summarize(
            part,
            &markup_result,
            &discount_result,
            &manufacturability_result,
        );

        Ok(PricedPart {
            input,
            markup_result,
            discount_result,
            manufacturability_result,
            summary,
        })
    }

    async fn evaluate_rule(&self, identifier: &str, input: &Value) -> Result<Value> {
        self.evaluator
            .evaluate(
                EvaluationKind::Rule,
                identifier,
                &self.rules.version,
                input.clone(),
            )
            .await
    }
}
