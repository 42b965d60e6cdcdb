// Dashboard Renderer - pure mapping from the current result to a view tree
//
// Backends (terminal, text report) draw `DashboardView`; they never read
// `ResultModel` directly.

use crate::chart::{hue_for_index, to_series, Hue};
use crate::result::{CreditCategory, ResultModel};
use serde::Serialize;

pub const REVENUE_ACCENT: Hue = Hue::rgb(0x3b, 0x82, 0xf6);
pub const PROFIT_ACCENT: Hue = Hue::rgb(0x10, 0xb9, 0x81);
pub const TAX_ACCENT: Hue = Hue::rgb(0xf5, 0x9e, 0x0b);
pub const CREDIT_POSITIVE_ACCENT: Hue = Hue::rgb(0x05, 0x96, 0x69);
pub const CREDIT_NEGATIVE_ACCENT: Hue = Hue::rgb(0xdc, 0x26, 0x26);

pub const CHART_TITLE: &str = "Cash Flow Breakdown";
pub const ADVICE_TITLE: &str = "Virtual CFO Insights";

const CURRENCY: &str = "₹";
const TEXT_BAR_WIDTH: f64 = 30.0;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum CardValue {
    Amount(f64),
    Rating(String),
}

impl CardValue {
    pub fn display(&self) -> String {
        match self {
            CardValue::Amount(v) => format_amount(*v),
            CardValue::Rating(r) => r.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricCard {
    pub title: &'static str,
    pub value: CardValue,
    pub accent: Hue,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartBar {
    pub label: &'static str,
    pub value: f64,
    pub hue: Hue,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AdvicePanel {
    pub advice: String,
    pub health: Option<String>,
    pub forecast: f64,
    pub security: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardView {
    pub cards: [MetricCard; 4],
    pub chart: Vec<ChartBar>,
    pub advice: AdvicePanel,
}

/// `None` in, `None` out: without a result only the input controls are shown.
pub fn build_dashboard(result: Option<&ResultModel>) -> Option<DashboardView> {
    let model = result?;

    let credit_accent = match model.credit_category() {
        CreditCategory::Positive => CREDIT_POSITIVE_ACCENT,
        CreditCategory::Negative => CREDIT_NEGATIVE_ACCENT,
    };

    let cards = [
        MetricCard {
            title: "Total Revenue",
            value: CardValue::Amount(model.revenue),
            accent: REVENUE_ACCENT,
        },
        MetricCard {
            title: "Net Profit",
            value: CardValue::Amount(model.profit),
            accent: PROFIT_ACCENT,
        },
        MetricCard {
            title: "Tax Liability",
            value: CardValue::Amount(model.tax_est),
            accent: TAX_ACCENT,
        },
        MetricCard {
            title: "Credit Score",
            value: CardValue::Rating(model.credit_score.clone()),
            accent: credit_accent,
        },
    ];

    let chart = to_series(model)
        .iter()
        .enumerate()
        .map(|(i, entry)| ChartBar {
            label: entry.name.as_str(),
            value: entry.value,
            hue: hue_for_index(i),
        })
        .collect();

    let advice = AdvicePanel {
        advice: model.advice.en.clone(),
        health: model.health.clone(),
        forecast: model.forecast,
        security: model.security.clone().unwrap_or_default(),
    };

    Some(DashboardView { cards, chart, advice })
}

/// `₹` plus a comma-grouped amount with at most two fraction digits.
pub fn format_amount(value: f64) -> String {
    let value = if value.is_finite() { value } else { 0.0 };
    // Decimal formatting keeps every integer digit, however large the value.
    let fixed = format!("{:.2}", value.abs());
    let (digits, frac) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let is_zero = fixed.bytes().all(|b| b == b'0' || b == b'.');
    let sign = if value < 0.0 && !is_zero { "-" } else { "" };
    let fraction = match frac.trim_end_matches('0') {
        "" => String::new(),
        f => format!(".{}", f),
    };

    format!("{}{}{}{}", CURRENCY, sign, grouped, fraction)
}

pub fn forecast_line(panel: &AdvicePanel) -> String {
    format!("Projected 6-Month Revenue: {}", format_amount(panel.forecast))
}

pub fn security_line(panel: &AdvicePanel) -> String {
    format!("Security: {} | Storage: Cloud DB", panel.security)
}

/// Plain-text rendering, used by the headless mode and report export.
pub fn render_text(view: &DashboardView) -> String {
    let mut out = String::new();

    for card in &view.cards {
        out.push_str(&format!(
            "{:<16} {}\n",
            card.title.to_uppercase(),
            card.value.display()
        ));
    }

    out.push('\n');
    out.push_str(CHART_TITLE);
    out.push('\n');

    let max = view
        .chart
        .iter()
        .map(|b| b.value.max(0.0))
        .fold(0.0_f64, f64::max);
    for bar in &view.chart {
        let len = if max > 0.0 {
            (bar.value.max(0.0) / max * TEXT_BAR_WIDTH).round() as usize
        } else {
            0
        };
        out.push_str(&format!(
            "  {:<8} {} {}\n",
            bar.label,
            "█".repeat(len),
            format_amount(bar.value)
        ));
    }

    out.push('\n');
    out.push_str(ADVICE_TITLE);
    out.push('\n');
    if !view.advice.advice.is_empty() {
        out.push_str(&format!("  {}\n", view.advice.advice));
    }
    if let Some(health) = &view.advice.health {
        out.push_str(&format!("  Health: {}\n", health));
    }
    out.push_str(&format!("  {}\n", forecast_line(&view.advice)));
    out.push_str(&format!("  {}\n", security_line(&view.advice)));

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::result::normalize;
    use serde_json::json;

    fn sample() -> ResultModel {
        normalize(&json!({
            "revenue": 100000, "expense": 40000, "profit": 60000,
            "tax_est": 5000, "credit_score": "High",
            "advice": {"en": "Good"}, "forecast": 70000
        }))
    }

    #[test]
    fn test_absent_result_renders_nothing() {
        assert!(build_dashboard(None).is_none());
    }

    #[test]
    fn test_cards_in_order() {
        let view = build_dashboard(Some(&sample())).unwrap();
        let titles: Vec<&str> = view.cards.iter().map(|c| c.title).collect();
        assert_eq!(titles, vec!["Total Revenue", "Net Profit", "Tax Liability", "Credit Score"]);

        assert_eq!(view.cards[0].value, CardValue::Amount(100000.0));
        assert_eq!(view.cards[1].value, CardValue::Amount(60000.0));
        assert_eq!(view.cards[2].value, CardValue::Amount(5000.0));
        assert_eq!(view.cards[3].value, CardValue::Rating("High".to_string()));
        assert_eq!(view.cards[3].accent, CREDIT_POSITIVE_ACCENT);
    }

    #[test]
    fn test_chart_and_advice() {
        let view = build_dashboard(Some(&sample())).unwrap();
        let values: Vec<f64> = view.chart.iter().map(|b| b.value).collect();
        assert_eq!(values, vec![100000.0, 40000.0, 60000.0]);
        assert_eq!(view.advice.advice, "Good");
        assert_eq!(view.advice.forecast, 70000.0);
        assert_eq!(forecast_line(&view.advice), "Projected 6-Month Revenue: ₹70,000");
    }

    #[test]
    fn test_empty_result_dashboard() {
        let model = normalize(&json!({}));
        let view = build_dashboard(Some(&model)).unwrap();

        assert_eq!(view.cards[0].value.display(), "₹0");
        assert_eq!(view.cards[1].value.display(), "₹0");
        assert_eq!(view.cards[2].value.display(), "₹0");
        assert_eq!(view.cards[3].value.display(), "unknown");
        assert_eq!(view.cards[3].accent, CREDIT_NEGATIVE_ACCENT);
        assert!(view.chart.iter().all(|b| b.value == 0.0));
        assert_eq!(view.advice.advice, "");
        assert_eq!(view.advice.security, "");
    }

    #[test]
    fn test_non_high_scores_are_negative() {
        for score in ["Low", "Medium", "HIGH", "unknown"] {
            let model = normalize(&json!({"credit_score": score}));
            let view = build_dashboard(Some(&model)).unwrap();
            assert_eq!(view.cards[3].accent, CREDIT_NEGATIVE_ACCENT, "score {}", score);
        }
    }

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(0.0), "₹0");
        assert_eq!(format_amount(999.0), "₹999");
        assert_eq!(format_amount(1000.0), "₹1,000");
        assert_eq!(format_amount(100000.0), "₹100,000");
        assert_eq!(format_amount(1234567.891), "₹1,234,567.89");
        assert_eq!(format_amount(1234.5), "₹1,234.5");
        assert_eq!(format_amount(-1250.75), "₹-1,250.75");
        assert_eq!(format_amount(-0.001), "₹0");
    }

    #[test]
    fn test_format_amount_beyond_integer_range() {
        assert_eq!(format_amount(1e18), "₹1,000,000,000,000,000,000");

        let shown = format_amount(1e40);
        let digits: String = shown.chars().filter(char::is_ascii_digit).collect();
        assert_eq!(digits.len(), 41);
        assert!(digits.starts_with("1000000000000000"));
        assert!(!shown.contains('.'));

        assert_eq!(format_amount(-1e20), "₹-100,000,000,000,000,000,000");
    }

    #[test]
    fn test_render_text() {
        let view = build_dashboard(Some(&sample())).unwrap();
        let text = render_text(&view);

        assert!(text.contains("TOTAL REVENUE    ₹100,000"));
        assert!(text.contains("CREDIT SCORE     High"));
        assert!(text.contains("Cash Flow Breakdown"));
        assert!(text.contains("Revenue  ██████████████████████████████ ₹100,000"));
        assert!(text.contains("  Good\n"));
        assert!(text.contains("Projected 6-Month Revenue: ₹70,000"));
    }

    #[test]
    fn test_render_text_zero_chart() {
        let view = build_dashboard(Some(&normalize(&json!({})))).unwrap();
        let text = render_text(&view);
        assert!(text.contains("  Revenue   ₹0\n"));
        assert!(!text.contains('█'));
    }
}
