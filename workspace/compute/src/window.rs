use tracing::debug;

use crate::dates::DateRange;
use crate::forecast::{ForecastPoint, ForecastSequence};

/// Points of `sequence` dated inside `range`, both ends inclusive.
///
/// Inverted ranges and ranges outside the horizon yield an empty window.
pub fn filter_window(sequence: &ForecastSequence, range: &DateRange) -> Vec<ForecastPoint> {
    let window: Vec<ForecastPoint> = sequence
        .points
        .iter()
        .filter(|p| range.contains(p.date))
        .copied()
        .collect();

    debug!(
        "Window {} to {} keeps {} of {} points",
        range.start,
        range.end,
        window.len(),
        sequence.len()
    );
    window
}
