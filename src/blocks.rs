//! Block decomposition of weekly hours.
//!
//! Turns a weekly-hour requirement into contiguous session durations,
//! preferring few long sessions over many short ones. Small values use a
//! fixed table (4 → two double periods rather than 3 + 1). Larger values
//! are reduced greedily by 3 until at most 4 hours remain, and the tail is
//! split by the same table, so no requirement ends in a stray single hour
//! when two doubles would do.

use crate::error::{Result, TimetableError};

/// Longest block the decomposer emits.
pub const MAX_BLOCK_HOURS: u32 = 3;

/// Splits `hours` into block durations summing to `hours`.
///
/// ```
/// use u_timetable::blocks::decompose;
/// assert_eq!(decompose(4), vec![2, 2]);
/// assert_eq!(decompose(7), vec![3, 2, 2]);
/// ```
pub fn decompose(hours: u32) -> Vec<u32> {
    match hours {
        0 => Vec::new(),
        1 => vec![1],
        2 => vec![2],
        3 => vec![3],
        4 => vec![2, 2],
        _ => {
            let mut blocks = Vec::new();
            let mut remaining = hours;
            while remaining > 4 {
                blocks.push(MAX_BLOCK_HOURS);
                remaining -= MAX_BLOCK_HOURS;
            }
            blocks.extend(decompose(remaining));
            blocks
        }
    }
}

/// [`decompose`] for signed input, rejecting negative hours and values
/// that do not fit in `u32`.
pub fn try_decompose(hours: i64) -> Result<Vec<u32>> {
    if hours < 0 {
        return Err(TimetableError::NegativeHours(hours));
    }
    let hours = u32::try_from(hours).map_err(|_| TimetableError::HoursOutOfRange(hours))?;
    Ok(decompose(hours))
}
