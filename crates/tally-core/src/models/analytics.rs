use crate::preferences::YearMonth;
use serde::{Deserialize, Serialize};

/// Totals for one month
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardSummary {
    pub month: String,
    pub total_spend: f64,
    pub top_category: Option<String>,
    pub top_category_spend: f64,
    pub avg_confidence: Option<f64>,
}

impl DashboardSummary {
    /// Zero-valued summary for `month`, used when the dashboard fetch fails
    pub fn zeroed(month: &str) -> Self {
        Self {
            month: month.to_string(),
            total_spend: 0.0,
            top_category: None,
            top_category_spend: 0.0,
            avg_confidence: None,
        }
    }

    /// Average confidence as a whole percentage
    pub fn confidence_percent(&self) -> Option<u32> {
        self.avg_confidence.map(|c| (c * 100.0).round() as u32)
    }

    /// Parsed month, if the server echoed a well-formed one
    pub fn year_month(&self) -> Option<YearMonth> {
        self.month.parse().ok()
    }
}

/// Spend for one month of the trend series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendPoint {
    pub month: String,
    pub total_spend: f64,
}

impl TrendPoint {
    /// Short axis label (`MM`)
    pub fn label(&self) -> &str {
        self.month.get(5..).unwrap_or(&self.month)
    }
}

/// A transaction flagged as unusually large for its month
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnomalyPoint {
    pub date: String,
    pub amount: f64,
    pub description: String,
    pub zscore: f64,
}
