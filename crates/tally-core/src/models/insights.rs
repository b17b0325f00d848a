use serde::{Deserialize, Serialize};

/// Total spend for one category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryTotal {
    pub category: String,
    pub total: f64,
}

/// A category's fraction of the whole, used for pie charts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryShare {
    pub category: String,
    pub total: f64,
    /// Fraction in `[0, 1]`; shares of a report sum to roughly 1
    pub pct: f64,
}

impl CategoryShare {
    /// Derive shares from category totals as `total / sum(total)`.
    ///
    /// Empty input, or input whose totals sum to zero or less, yields no
    /// shares.
    pub fn from_totals(totals: &[CategoryTotal]) -> Vec<Self> {
        let sum: f64 = totals.iter().map(|t| t.total).sum();
        if sum <= 0.0 {
            return Vec::new();
        }
        totals
            .iter()
            .map(|t| Self {
                category: t.category.clone(),
                total: t.total,
                pct: t.total / sum,
            })
            .collect()
    }
}

/// AI-generated monthly summary (`GET /insights/summary`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InsightsReport {
    pub month: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub breakdown: Vec<CategoryTotal>,
}

impl InsightsReport {
    /// Category shares of the breakdown
    pub fn shares(&self) -> Vec<CategoryShare> {
        CategoryShare::from_totals(&self.breakdown)
    }
}

/// Extended insight report (`GET /insights/advanced`).
///
/// Fields beyond the known ones are kept verbatim in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdvancedInsights {
    #[serde(default)]
    pub month: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub breakdown: Vec<CategoryTotal>,
    #[serde(default)]
    pub budget_inr: Option<f64>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl AdvancedInsights {
    /// Category shares of the breakdown
    pub fn shares(&self) -> Vec<CategoryShare> {
        CategoryShare::from_totals(&self.breakdown)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn total(category: &str, total: f64) -> CategoryTotal {
        CategoryTotal {
            category: category.to_string(),
            total,
        }
    }

    #[test]
    fn test_shares_sum_close_to_one() {
        let shares =
            CategoryShare::from_totals(&[total("Food", 300.0), total("Rent", 600.0), total("Fun", 100.0)]);
        assert_eq!(shares.len(), 3);
        assert!((shares[1].pct - 0.6).abs() < 1e-9);
        let sum: f64 = shares.iter().map(|s| s.pct).sum();
        assert!((sum - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_zero_totals_yield_no_shares() {
        assert!(CategoryShare::from_totals(&[]).is_empty());
        assert!(CategoryShare::from_totals(&[total("Food", 0.0)]).is_empty());
    }

    #[test]
    fn test_advanced_keeps_unknown_fields() {
        let json = r#"{"month":"2026-01","summary":"ok","breakdown":[],"overspend":true}"#;
        let report: AdvancedInsights = serde_json::from_str(json).unwrap();
        assert_eq!(report.summary.as_deref(), Some("ok"));
        assert_eq!(report.extra.get("overspend"), Some(&serde_json::json!(true)));
    }
}
