//! Pure numeric transforms from aggregates to chart ratios

use crate::models::{CategoryShare, CategoryTotal, TrendPoint};

/// One labelled value to be drawn as a bar
#[derive(Debug, Clone, PartialEq)]
pub struct BarInput {
    pub label: String,
    pub value: f64,
}

impl BarInput {
    pub fn new(label: impl Into<String>, value: f64) -> Self {
        Self {
            label: label.into(),
            value,
        }
    }
}

impl From<&CategoryTotal> for BarInput {
    fn from(total: &CategoryTotal) -> Self {
        Self::new(total.category.clone(), total.total)
    }
}

impl From<&TrendPoint> for BarInput {
    fn from(point: &TrendPoint) -> Self {
        Self::new(point.label(), point.total_spend)
    }
}

/// A bar's value relative to the largest value of its series
#[derive(Debug, Clone, PartialEq)]
pub struct BarRatio {
    pub label: String,
    pub value: f64,
    pub ratio: f64,
}

/// Ratios for a whole bar series
#[derive(Debug, Clone, PartialEq)]
pub struct BarSeries {
    /// `max(1, largest value)`
    pub max_value: f64,
    pub bars: Vec<BarRatio>,
}

/// Divide every value by `max(1, max(values))`
pub fn bar_ratios(inputs: &[BarInput]) -> BarSeries {
    let max_value = inputs
        .iter()
        .map(|input| input.value)
        .fold(1.0_f64, f64::max);

    let bars = inputs
        .iter()
        .map(|input| BarRatio {
            label: input.label.clone(),
            value: input.value,
            ratio: input.value / max_value,
        })
        .collect();

    BarSeries { max_value, bars }
}

/// One pie segment as fractions of the full circle
#[derive(Debug, Clone, PartialEq)]
pub struct PieSpan {
    pub index: usize,
    pub category: String,
    pub pct: f64,
    pub start: f64,
    pub end: f64,
}

/// Lay segments end to end in input order.
///
/// The running sum is not normalised: if the fractions drift from 1.0 the
/// last segment ends wherever the sum lands.
pub fn pie_spans(shares: &[CategoryShare]) -> Vec<PieSpan> {
    let mut start = 0.0;
    shares
        .iter()
        .enumerate()
        .map(|(index, share)| {
            let span = PieSpan {
                index,
                category: share.category.clone(),
                pct: share.pct,
                start,
                end: start + share.pct,
            };
            start = span.end;
            span
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn share(category: &str, pct: f64) -> CategoryShare {
        CategoryShare {
            category: category.to_string(),
            total: 0.0,
            pct,
        }
    }

    #[test]
    fn test_bar_ratios_relative_to_max() {
        let series = bar_ratios(&[BarInput::new("Food", 100.0), BarInput::new("Rent", 50.0)]);
        assert_eq!(series.max_value, 100.0);
        assert_eq!(series.bars[0].ratio, 1.0);
        assert_eq!(series.bars[1].ratio, 0.5);
    }

    #[test]
    fn test_all_zero_values_do_not_divide_by_zero() {
        let series = bar_ratios(&[BarInput::new("A", 0.0), BarInput::new("B", 0.0)]);
        assert_eq!(series.max_value, 1.0);
        assert!(series.bars.iter().all(|b| b.ratio == 0.0));
    }

    #[test]
    fn test_small_values_scale_against_one() {
        let series = bar_ratios(&[BarInput::new("A", 0.5)]);
        assert_eq!(series.max_value, 1.0);
        assert_eq!(series.bars[0].ratio, 0.5);
    }

    #[test]
    fn test_empty_series() {
        let series = bar_ratios(&[]);
        assert_eq!(series.max_value, 1.0);
        assert!(series.bars.is_empty());
    }

    #[test]
    fn test_trend_points_use_month_label() {
        let point = TrendPoint {
            month: "2026-03".to_string(),
            total_spend: 12.0,
        };
        assert_eq!(BarInput::from(&point).label, "03");
    }

    #[test]
    fn test_pie_spans_are_contiguous() {
        let spans = pie_spans(&[share("A", 0.6), share("B", 0.4)]);
        assert_eq!(spans.len(), 2);
        assert_eq!((spans[0].start, spans[0].end), (0.0, 0.6));
        assert_eq!(spans[1].start, 0.6);
        assert!((spans[1].end - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_pie_drift_is_not_corrected() {
        let spans = pie_spans(&[share("A", 0.5), share("B", 0.3), share("C", 0.1)]);
        let last = spans.last().unwrap();
        assert!((last.end - 0.9).abs() < 1e-12);
    }
}
