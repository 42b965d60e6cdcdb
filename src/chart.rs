// Chart Data Mapper - fixed three-bar cash flow series

use crate::result::ResultModel;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SeriesName {
    Revenue,
    Expense,
    Profit,
}

impl SeriesName {
    pub fn as_str(&self) -> &'static str {
        match self {
            SeriesName::Revenue => "Revenue",
            SeriesName::Expense => "Expense",
            SeriesName::Profit => "Profit",
        }
    }
}

/// An sRGB accent, kept independent of any drawing backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Hue {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Hue {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Hue { r, g, b }
    }
}

pub const REVENUE_HUE: Hue = Hue::rgb(0x3b, 0x82, 0xf6);
pub const EXPENSE_HUE: Hue = Hue::rgb(0xef, 0x44, 0x44);
pub const PROFIT_HUE: Hue = Hue::rgb(0x10, 0xb9, 0x81);

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSeriesEntry {
    pub name: SeriesName,
    pub value: f64,
}

/// Always `[Revenue, Expense, Profit]`, values taken verbatim from the model.
pub fn to_series(model: &ResultModel) -> [ChartSeriesEntry; 3] {
    [
        ChartSeriesEntry { name: SeriesName::Revenue, value: model.revenue },
        ChartSeriesEntry { name: SeriesName::Expense, value: model.expense },
        ChartSeriesEntry { name: SeriesName::Profit, value: model.profit },
    ]
}

/// Bar color by position only.
pub fn hue_for_index(index: usize) -> Hue {
    match index {
        0 => REVENUE_HUE,
        1 => EXPENSE_HUE,
        _ => PROFIT_HUE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::result::normalize;
    use serde_json::json;

    #[test]
    fn test_series_order_and_values() {
        let model = normalize(&json!({"revenue": 100000, "expense": 40000, "profit": 60000}));
        let series = to_series(&model);

        let names: Vec<&str> = series.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["Revenue", "Expense", "Profit"]);

        let values: Vec<f64> = series.iter().map(|e| e.value).collect();
        assert_eq!(values, vec![100000.0, 40000.0, 60000.0]);
    }

    #[test]
    fn test_series_from_empty_model() {
        let series = to_series(&normalize(&json!({})));
        assert_eq!(series.len(), 3);
        assert!(series.iter().all(|e| e.value == 0.0));
    }

    #[test]
    fn test_series_order_is_not_sorted_by_value() {
        let model = normalize(&json!({"revenue": 1, "expense": 500, "profit": -499}));
        let series = to_series(&model);
        assert_eq!(series[0].name, SeriesName::Revenue);
        assert_eq!(series[1].name, SeriesName::Expense);
        assert_eq!(series[2].name, SeriesName::Profit);
        assert_eq!(series[2].value, -499.0);
    }

    #[test]
    fn test_hue_is_positional() {
        assert_eq!(hue_for_index(0), REVENUE_HUE);
        assert_eq!(hue_for_index(1), EXPENSE_HUE);
        assert_eq!(hue_for_index(2), PROFIT_HUE);
        assert_eq!(REVENUE_HUE, Hue { r: 0x3b, g: 0x82, b: 0xf6 });
        assert_eq!(EXPENSE_HUE, Hue { r: 0xef, g: 0x44, b: 0x44 });
        assert_eq!(PROFIT_HUE, Hue { r: 0x10, g: 0xb9, b: 0x81 });
    }
}
