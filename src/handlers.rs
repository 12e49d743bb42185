pub mod chart;
pub mod forecast;
pub mod health;
pub mod index;

use crate::error::AppError;

/// Pair up optional range bounds; blank values count as missing.
///
/// Returns `None` when neither bound is given and an error when only one is.
pub(crate) fn date_pair<'a>(
    start: Option<&'a str>,
    end: Option<&'a str>,
) -> Result<Option<(&'a str, &'a str)>, AppError> {
    let start = start.map(str::trim).filter(|s| !s.is_empty());
    let end = end.map(str::trim).filter(|s| !s.is_empty());
    match (start, end) {
        (Some(start), Some(end)) => Ok(Some((start, end))),
        (None, None) => Ok(None),
        (Some(_), None) => Err(AppError::MissingParameter("end_date")),
        (None, Some(_)) => Err(AppError::MissingParameter("start_date")),
    }
}
