use crate::cache::{CacheManager, Namespace};
use crate::error::TallyResult;
use crate::preferences::{PreferenceStore, YearMonth};
use tracing::info;

/// Namespaces whose keys depend on the selected month
pub const MONTH_SCOPED: [Namespace; 4] = [
    Namespace::Dashboard,
    Namespace::Insights,
    Namespace::Anomalies,
    Namespace::MonthSummary,
];

/// Change the selected month: write the preference, then invalidate the
/// month-scoped namespaces.
///
/// The cache is left alone if the preference cannot be written.
pub fn select_month(
    preferences: &PreferenceStore,
    cache: &CacheManager,
    month: YearMonth,
) -> TallyResult<()> {
    preferences.set_selected_month(month)?;
    cache.invalidate_many(&MONTH_SCOPED);
    info!(month = %month, "selected month changed");
    Ok(())
}
