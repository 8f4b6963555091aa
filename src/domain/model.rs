use crate::utils::error::{PricingError, Result};
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Number, Value};

/// A manufacturable item submitted for pricing.
///
/// Numeric fields keep their JSON representation so that echoing a part back
/// reproduces the caller's exact value (`100` stays `100`, not `100.0`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Part {
    pub base_price: Number,
    pub method: String,
    pub material: String,
    pub quantity: Number,
    pub customer_tier: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Part {
    pub fn base_price(&self) -> f64 {
        self.base_price.as_f64().unwrap_or(0.0)
    }

    /// The part as the JSON object the caller sent.
    pub fn to_value(&self) -> Value {
        let mut object = self.extra.clone();
        object.insert("basePrice".to_string(), Value::Number(self.base_price.clone()));
        object.insert("method".to_string(), Value::String(self.method.clone()));
        object.insert("material".to_string(), Value::String(self.material.clone()));
        object.insert("quantity".to_string(), Value::Number(self.quantity.clone()));
        object.insert(
            "customerTier".to_string(),
            Value::String(self.customer_tier.clone()),
        );
        Value::Object(object)
    }
}

/// Parse a request body that must be a JSON array of parts.
pub fn parse_parts(body: &[u8]) -> Result<Vec<Part>> {
    let value: Value = serde_json::from_slice(body).map_err(PricingError::InvalidJson)?;

    let Value::Array(items) = value else {
        return Err(PricingError::NotAnArray);
    };

    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| {
            serde_json::from_value(item).map_err(|source| PricingError::InvalidPart { index, source })
        })
        .collect()
}

/// Whether a call targets a single decision rule or a composite flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EvaluationKind {
    Rule,
    Flow,
}

impl EvaluationKind {
    pub fn path_segment(&self) -> &'static str {
        match self {
            EvaluationKind::Rule => "rules",
            EvaluationKind::Flow => "flows",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PricingSummary {
    #[serde(serialize_with = "serialize_amount")]
    pub markup_amount: f64,
    #[serde(serialize_with = "serialize_amount")]
    pub discount_amount: f64,
    #[serde(serialize_with = "serialize_amount")]
    pub final_price: f64,
    pub manufacturable: bool,
}

/// Largest magnitude below which every integral `f64` is exactly an `i64`.
const EXACT_INTEGER_LIMIT: f64 = 9_007_199_254_740_992.0;

/// Whole amounts are written as integers (`105`, not `105.0`).
fn serialize_amount<S: Serializer>(
    amount: &f64,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    if amount.fract() == 0.0 && amount.abs() < EXACT_INTEGER_LIMIT {
        serializer.serialize_i64(*amount as i64)
    } else {
        serializer.serialize_f64(*amount)
    }
}

/// One `/rules` response element.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PricedPart {
    pub input: Value,
    pub markup_result: Value,
    pub discount_result: Value,
    pub manufacturability_result: Value,
    #[serde(flatten)]
    pub summary: PricingSummary,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_parts_keeps_extra_fields() {
        let body = br#"[{"basePrice":100,"method":"CNC","material":"Aluminum","quantity":50,"customerTier":"Gold","finish":"anodized","tolerance":{"mm":0.05}}]"#;

        let parts = parse_parts(body).unwrap();

        assert_eq!(parts.len(), 1);
        assert_eq!(parts[0].base_price(), 100.0);
        assert_eq!(parts[0].extra.get("finish"), Some(&json!("anodized")));
        assert_eq!(
            parts[0].to_value(),
            json!({
                "basePrice": 100,
                "method": "CNC",
                "material": "Aluminum",
                "quantity": 50,
                "customerTier": "Gold",
                "finish": "anodized",
                "tolerance": {"mm": 0.05}
            })
        );
    }

    #[test]
    fn test_parse_parts_rejects_invalid_json() {
        let err = parse_parts(b"[{").unwrap_err();
        assert!(matches!(err, PricingError::InvalidJson(_)));
    }

    #[test]
    fn test_parse_parts_rejects_non_array() {
        let err = parse_parts(br#"{"basePrice":1}"#).unwrap_err();
        assert!(matches!(err, PricingError::NotAnArray));
    }

    #[test]
    fn test_parse_parts_reports_failing_index() {
        let body = br#"[
            {"basePrice":1,"method":"CNC","material":"Steel","quantity":1,"customerTier":"Gold"},
            {"basePrice":"cheap","method":"CNC","material":"Steel","quantity":1,"customerTier":"Gold"}
        ]"#;

        match parse_parts(body).unwrap_err() {
            PricingError::InvalidPart { index, .. } => assert_eq!(index, 1),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_priced_part_flattens_summary() {
        let priced = PricedPart {
            input: json!({"basePrice": 100}),
            markup_result: json!({"markupAmount": 10}),
            discount_result: json!({"discountAmount": 5}),
            manufacturability_result: json!({"isFeasible": true}),
            summary: PricingSummary {
                markup_amount: 10.0,
                discount_amount: 5.0,
                final_price: 105.0,
                manufacturable: true,
            },
        };

        let value = serde_json::to_value(&priced).unwrap();
        assert_eq!(value["finalPrice"], json!(105));
        assert_eq!(value["manufacturable"], json!(true));
        assert_eq!(value["markupResult"], json!({"markupAmount": 10}));

        let text = serde_json::to_string(&priced).unwrap();
        assert!(text.contains(r#""markupAmount":10,"discountAmount":5,"finalPrice":105,"#));
    }

    #[test]
    fn test_summary_keeps_fractions_and_signs() {
        let summary = PricingSummary {
            markup_amount: 1.5,
            discount_amount: 0.0,
            final_price: -8.0,
            manufacturable: false,
        };

        assert_eq!(
            serde_json::to_string(&summary).unwrap(),
            r#"{"markupAmount":1.5,"discountAmount":0,"finalPrice":-8,"manufacturable":false}"#
        );
    }
}
