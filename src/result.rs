// Result Model - total normalization of the analysis service response
//
// The service payload is untrusted: any key may be missing or carry the
// wrong type. Everything downstream reads `ResultModel` only.

use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Credit score shown when the service did not send one.
pub const UNKNOWN_CREDIT_SCORE: &str = "unknown";

/// The only credit score rendered in the positive category.
pub const POSITIVE_CREDIT_SCORE: &str = "High";

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Advice {
    pub en: String,
    /// Other language keys, kept as sent.
    #[serde(flatten)]
    pub other: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultModel {
    pub revenue: f64,
    pub expense: f64,
    pub profit: f64,
    pub tax_est: f64,
    pub forecast: f64,
    pub margin: f64,
    pub credit_score: String,
    pub health: Option<String>,
    pub advice: Advice,
    pub security: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreditCategory {
    Positive,
    Negative,
}

impl ResultModel {
    pub fn credit_category(&self) -> CreditCategory {
        credit_category(&self.credit_score)
    }
}

pub fn credit_category(score: &str) -> CreditCategory {
    if score == POSITIVE_CREDIT_SCORE {
        CreditCategory::Positive
    } else {
        CreditCategory::Negative
    }
}

/// Normalize a raw response. Never fails; non-object input yields all defaults.
pub fn normalize(raw: &Value) -> ResultModel {
    let empty = Map::new();
    let obj = raw.as_object().unwrap_or(&empty);

    ResultModel {
        revenue: number(obj, "revenue"),
        expense: number(obj, "expense"),
        profit: number(obj, "profit"),
        tax_est: number(obj, "tax_est"),
        forecast: number(obj, "forecast"),
        margin: number(obj, "margin"),
        credit_score: string(obj, "credit_score")
            .unwrap_or_else(|| UNKNOWN_CREDIT_SCORE.to_string()),
        health: string(obj, "health"),
        advice: advice(obj.get("advice")),
        security: string(obj, "security"),
    }
}

fn number(obj: &Map<String, Value>, key: &str) -> f64 {
    obj.get(key)
        .and_then(Value::as_f64)
        .filter(|v| v.is_finite())
        .unwrap_or(0.0)
}

fn string(obj: &Map<String, Value>, key: &str) -> Option<String> {
    obj.get(key).and_then(Value::as_str).map(str::to_string)
}

fn advice(raw: Option<&Value>) -> Advice {
    let Some(map) = raw.and_then(Value::as_object) else {
        return Advice::default();
    };

    let mut advice = Advice::default();
    for (lang, text) in map {
        let Some(text) = text.as_str() else { continue };
        if lang == "en" {
            advice.en = text.to_string();
        } else {
            advice.other.insert(lang.clone(), text.to_string());
        }
    }
    advice
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_empty_object_defaults() {
        let model = normalize(&json!({}));
        assert_eq!(model.revenue, 0.0);
        assert_eq!(model.expense, 0.0);
        assert_eq!(model.profit, 0.0);
        assert_eq!(model.tax_est, 0.0);
        assert_eq!(model.forecast, 0.0);
        assert_eq!(model.margin, 0.0);
        assert_eq!(model.credit_score, "unknown");
        assert_eq!(model.advice.en, "");
        assert!(model.security.is_none());
        assert!(model.health.is_none());
    }

    #[test]
    fn test_non_object_inputs_are_total() {
        for raw in [json!(null), json!([1, 2, 3]), json!("revenue"), json!(42)] {
            let model = normalize(&raw);
            assert_eq!(model, normalize(&json!({})));
        }
    }

    #[test]
    fn test_full_payload_passes_through() {
        let model = normalize(&json!({
            "revenue": 100000, "expense": 40000, "profit": 60000,
            "tax_est": 5000, "forecast": 70000, "margin": 60.0,
            "credit_score": "High", "health": "Excellent",
            "security": "AES-256 Active",
            "advice": {"en": "Good", "hi": "अच्छा"}
        }));

        assert_eq!(model.revenue, 100000.0);
        assert_eq!(model.expense, 40000.0);
        assert_eq!(model.profit, 60000.0);
        assert_eq!(model.tax_est, 5000.0);
        assert_eq!(model.forecast, 70000.0);
        assert_eq!(model.margin, 60.0);
        assert_eq!(model.credit_score, "High");
        assert_eq!(model.health.as_deref(), Some("Excellent"));
        assert_eq!(model.security.as_deref(), Some("AES-256 Active"));
        assert_eq!(model.advice.en, "Good");
        assert_eq!(model.advice.other.get("hi").map(String::as_str), Some("अच्छा"));
    }

    #[test]
    fn test_wrong_types_default() {
        let model = normalize(&json!({
            "revenue": "100000",
            "expense": null,
            "profit": true,
            "tax_est": {"value": 1},
            "credit_score": 7,
            "advice": "Good",
            "security": false
        }));

        assert_eq!(model.revenue, 0.0);
        assert_eq!(model.expense, 0.0);
        assert_eq!(model.profit, 0.0);
        assert_eq!(model.tax_est, 0.0);
        assert_eq!(model.credit_score, UNKNOWN_CREDIT_SCORE);
        assert_eq!(model.advice.en, "");
        assert!(model.security.is_none());
    }

    #[test]
    fn test_negative_and_fractional_numbers_kept() {
        let model = normalize(&json!({"profit": -1250.75, "tax_est": 0.5}));
        assert_eq!(model.profit, -1250.75);
        assert_eq!(model.tax_est, 0.5);
    }

    #[test]
    fn test_advice_without_en() {
        let model = normalize(&json!({"advice": {"hi": "text", "en": 3}}));
        assert_eq!(model.advice.en, "");
        assert_eq!(model.advice.other.len(), 1);
    }

    #[test]
    fn test_credit_category() {
        assert_eq!(credit_category("High"), CreditCategory::Positive);
        assert_eq!(credit_category("Low"), CreditCategory::Negative);
        assert_eq!(credit_category("high"), CreditCategory::Negative);
        assert_eq!(credit_category(""), CreditCategory::Negative);
        assert_eq!(
            normalize(&json!({})).credit_category(),
            CreditCategory::Negative
        );
    }
}
