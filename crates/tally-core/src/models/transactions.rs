use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One categorized transaction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionRecord {
    pub id: String,
    /// ISO-8601 timestamp as sent by the server
    pub date: String,
    pub description: String,
    pub amount: f64,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub confidence: Option<f64>,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub explanation: Option<String>,
}

impl TransactionRecord {
    /// Calendar date part (`YYYY-MM-DD`)
    pub fn day(&self) -> &str {
        self.date.get(..10).unwrap_or(&self.date)
    }

    /// Categorization confidence as a whole percentage
    pub fn confidence_percent(&self) -> Option<u32> {
        self.confidence.map(|c| (c * 100.0).round() as u32)
    }
}

/// Result of a CSV upload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadResponse {
    pub inserted: u64,
    /// Most recent month present in the uploaded data (`YYYY-MM`)
    #[serde(default)]
    pub latest_month: Option<String>,
}

/// Category suggestion for a single description
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategorizeResponse {
    pub category: String,
    pub confidence: f64,
    pub source: String,
    pub explanation: String,
}

/// Per-category totals for one month
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthSummary {
    pub month: String,
    pub total_spend: f64,
    pub by_category: BTreeMap<String, f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transaction_optional_fields() {
        let json = r#"{"id":"t1","date":"2026-01-14T09:30:00","description":"Walmart groceries","amount":120.5}"#;
        let record: TransactionRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.day(), "2026-01-14");
        assert_eq!(record.category, None);
        assert_eq!(record.confidence_percent(), None);
    }

    #[test]
    fn test_upload_response_without_hint() {
        let response: UploadResponse = serde_json::from_str(r#"{"inserted": 3}"#).unwrap();
        assert_eq!(response.inserted, 3);
        assert_eq!(response.latest_month, None);
    }
}
