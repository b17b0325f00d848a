//! Persisted cross-view preferences
//!
//! Every view reads preferences through [`PreferenceStore`], which consults
//! the backing store on each call. A write is visible to the next read from
//! any view without any notification wiring.
//!
//! Changing the selected month does not invalidate cached data by itself;
//! callers go through [`crate::pipeline::select_month`], which writes the
//! preference and then invalidates the month-scoped namespaces.

mod month;
mod storage;

pub use month::YearMonth;
pub use storage::{FilePreferenceBackend, MemoryPreferenceBackend, PreferenceBackend};

use crate::error::{TallyError, TallyResult};
use std::sync::Arc;
use tracing::warn;

/// Preference key for the month shown by month-scoped views
pub const SELECTED_MONTH: &str = "selected_month";

/// Preference key for the monthly budget (INR, numeric string)
pub const MONTHLY_BUDGET: &str = "monthly_budget_inr";

/// Shared handle to the preference backend
#[derive(Clone)]
pub struct PreferenceStore {
    backend: Arc<dyn PreferenceBackend>,
}

impl PreferenceStore {
    /// Create a store over `backend`
    pub fn new(backend: Arc<dyn PreferenceBackend>) -> Self {
        Self { backend }
    }

    /// Store that lives only in memory
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryPreferenceBackend::new()))
    }

    /// Read `name`, returning `fallback` when unset or unreadable
    pub fn get(&self, name: &str, fallback: &str) -> String {
        match self.backend.get(name) {
            Ok(Some(value)) => value,
            Ok(None) => fallback.to_string(),
            Err(e) => {
                warn!(name, error = %e, "preference read failed, using fallback");
                fallback.to_string()
            }
        }
    }

    /// Write `name`
    pub fn set(&self, name: &str, value: &str) -> TallyResult<()> {
        self.backend.set(name, value)
    }

    /// Selected month; the current calendar month when unset or malformed
    pub fn selected_month(&self) -> YearMonth {
        let raw = self.get(SELECTED_MONTH, "");
        if raw.is_empty() {
            return YearMonth::current();
        }
        raw.parse().unwrap_or_else(|_| {
            warn!(value = %raw, "ignoring malformed selected_month preference");
            YearMonth::current()
        })
    }

    /// Write the selected month
    pub fn set_selected_month(&self, month: YearMonth) -> TallyResult<()> {
        self.set(SELECTED_MONTH, &month.to_string())
    }

    /// Budget exactly as stored; empty when unset
    pub fn monthly_budget_raw(&self) -> String {
        self.get(MONTHLY_BUDGET, "")
    }

    /// Budget as a number, `None` when unset or not numeric
    pub fn monthly_budget(&self) -> Option<f64> {
        let raw = self.monthly_budget_raw();
        let raw = raw.trim();
        if raw.is_empty() {
            return None;
        }
        match raw.parse::<f64>() {
            Ok(value) if value.is_finite() && value >= 0.0 => Some(value),
            _ => {
                warn!(value = %raw, "ignoring non-numeric monthly budget preference");
                None
            }
        }
    }

    /// Write the budget after trimming; an empty value clears it
    pub fn set_monthly_budget(&self, value: &str) -> TallyResult<()> {
        let value = value.trim();
        if !value.is_empty() {
            let parsed: f64 = value.parse().map_err(|_| {
                TallyError::validation_field("Budget must be a number", MONTHLY_BUDGET)
            })?;
            if !parsed.is_finite() || parsed < 0.0 {
                return Err(TallyError::validation_field(
                    "Budget must be zero or positive",
                    MONTHLY_BUDGET,
                ));
            }
        }
        self.set(MONTHLY_BUDGET, value)
    }
}

impl std::fmt::Debug for PreferenceStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PreferenceStore").finish_non_exhaustive()
    }
}
