use std::collections::HashSet;

use crate::catalog::DateSource;
use crate::error::SyncError;
use crate::manifest::ObservationDate;

/// Dates present in the remote list but absent from the local list, in the
/// remote list's original order.
pub fn missing_dates(
    remote: &[ObservationDate],
    local: &[ObservationDate],
) -> Vec<ObservationDate> {
    let known: HashSet<&str> = local.iter().map(|d| d.date.as_str()).collect();
    remote
        .iter()
        .filter(|d| !known.contains(d.date.as_str()))
        .cloned()
        .collect()
}

/// Fetch both date lists and reconcile them.
pub async fn fetch_missing(
    remote: &impl DateSource,
    local: &impl DateSource,
) -> Result<Vec<ObservationDate>, SyncError> {
    let remote_dates = remote.available_dates().await?;
    let local_dates = local.available_dates().await?;
    Ok(missing_dates(&remote_dates, &local_dates))
}
