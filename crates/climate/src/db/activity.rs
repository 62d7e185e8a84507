use itertools::Itertools;

use super::StationActivity;

/// Picks the station with the most observations.
/// Equal counts resolve to the lowest station id so the answer does not depend on row order.
pub fn most_active(activity: Vec<StationActivity>) -> Option<StationActivity> {
    activity
        .into_iter()
        .sorted_by(|a, b| {
            b.observations
                .cmp(&a.observations)
                .then_with(|| a.station_id.cmp(&b.station_id))
        })
        .next()
}
