use crate::domain::model::{Part, PricingSummary};
use serde_json::Value;

const MARKUP_KEYS: &[&str] = &["markupAmount", "markup"];
const DISCOUNT_KEYS: &[&str] = &["discountAmount", "discountValue", "discount"];
const FEASIBILITY_KEY: &str = "isFeasible";

/// Numbers, and strings holding a finite number. Anything else is not a number.
pub fn coerce_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
        _ => None,
    }
}

/// Truthiness of a JSON value: `null`, `false`, zero and the empty string
/// are false. Every other value, including `"false"`, `{}` and `[]`, is true.
pub fn coerce_flag(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// First of `keys` that holds a coercible number, or 0.
pub fn read_amount(result: &Value, keys: &[&str]) -> f64 {
    keys.iter()
        .filter_map(|key| result.get(*key))
        .find_map(coerce_number)
        .unwrap_or(0.0)
}

pub fn read_flag(result: &Value, key: &str) -> bool {
    result.get(key).is_some_and(coerce_flag)
}

pub fn summarize(
    part: &Part,
    markup_result: &Value,
    discount_result: &Value,
    manufacturability_result: &Value,
) -> PricingSummary {
    let markup_amount = read_amount(markup_result, MARKUP_KEYS);
    let discount_amount = read_amount(discount_result, DISCOUNT_KEYS);

    PricingSummary {
        markup_amount,
        discount_amount,
        final_price: part.base_price() + markup_amount - discount_amount,
        manufacturable: read_flag(manufacturability_result, FEASIBILITY_KEY),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn part(base_price: f64) -> Part {
        serde_json::from_value(json!({
            "basePrice": base_price,
            "method": "CNC",
            "material": "Aluminum",
            "quantity": 50,
            "customerTier": "Gold"
        }))
        .unwrap()
    }

    #[test]
    fn test_summarize_example_part() {
        let summary = summarize(
            &part(100.0),
            &json!({"markupAmount": 10}),
            &json!({"discountValue": 5}),
            &json!({"isFeasible": true}),
        );

        assert_eq!(summary.markup_amount, 10.0);
        assert_eq!(summary.discount_amount, 5.0);
        assert_eq!(summary.final_price, 105.0);
        assert!(summary.manufacturable);
    }

    #[test]
    fn test_missing_fields_default_to_zero_and_false() {
        let summary = summarize(&part(80.0), &json!({}), &json!(null), &json!({"note": "n/a"}));

        assert_eq!(summary.markup_amount, 0.0);
        assert_eq!(summary.discount_amount, 0.0);
        assert_eq!(summary.final_price, 80.0);
        assert!(!summary.manufacturable);
    }

    #[test]
    fn test_final_price_may_go_negative() {
        let summary = summarize(
            &part(10.0),
            &json!({"markup": 1.5}),
            &json!({"discount": 20}),
            &json!({"isFeasible": false}),
        );

        assert_eq!(summary.final_price, -8.5);
    }

    #[test]
    fn test_read_amount_prefers_first_coercible_key() {
        assert_eq!(read_amount(&json!({"markupAmount": "12.5"}), MARKUP_KEYS), 12.5);
        assert_eq!(
            read_amount(&json!({"markupAmount": "lots", "markup": 3}), MARKUP_KEYS),
            3.0
        );
        assert_eq!(
            read_amount(&json!({"markupAmount": 7, "markup": 3}), MARKUP_KEYS),
            7.0
        );
        assert_eq!(read_amount(&json!({"markup": true}), MARKUP_KEYS), 0.0);
        assert_eq!(read_amount(&json!([1, 2]), MARKUP_KEYS), 0.0);
    }

    #[test]
    fn test_coerce_flag() {
        assert!(coerce_flag(&json!(true)));
        assert!(coerce_flag(&json!(1)));
        assert!(coerce_flag(&json!(-0.5)));
        assert!(coerce_flag(&json!("yes")));
        assert!(coerce_flag(&json!("false")));
        assert!(coerce_flag(&json!(" ")));
        assert!(coerce_flag(&json!({})));
        assert!(coerce_flag(&json!([0])));
        assert!(!coerce_flag(&json!(false)));
        assert!(!coerce_flag(&json!(0)));
        assert!(!coerce_flag(&json!(0.0)));
        assert!(!coerce_flag(&json!("")));
        assert!(!coerce_flag(&json!(null)));
    }

    #[test]
    fn test_read_flag_follows_truthiness() {
        assert!(read_flag(&json!({"isFeasible": "yes"}), FEASIBILITY_KEY));
        assert!(read_flag(&json!({"isFeasible": "false"}), FEASIBILITY_KEY));
        assert!(read_flag(&json!({"isFeasible": {}}), FEASIBILITY_KEY));
        assert!(read_flag(&json!({"isFeasible": [1]}), FEASIBILITY_KEY));
        assert!(!read_flag(&json!({"isFeasible": ""}), FEASIBILITY_KEY));
        assert!(!read_flag(&json!({"feasible": true}), FEASIBILITY_KEY));
        assert!(!read_flag(&json!("isFeasible"), FEASIBILITY_KEY));
    }
}
