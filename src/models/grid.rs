//! Weekly scheduling horizon: working days × daily time slots.
//!
//! # Time Model
//! Slots are half-open minute intervals `[start, end)` from midnight,
//! totally ordered within a day. Days and slots are addressed by index
//! throughout the engine; labels are only resolved for reporting.
//!
//! # Contiguity
//! A multi-hour block may only span slots where each slot ends exactly
//! when the next begins. A lunch gap therefore splits the day.

use serde::{Deserialize, Serialize};

use crate::error::{Result, TimetableError};

/// One teaching period within the daily window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSlot {
    /// Period start (minutes from midnight, inclusive).
    pub start_minute: u32,
    /// Period end (minutes from midnight, exclusive).
    pub end_minute: u32,
}

impl TimeSlot {
    /// Creates a slot from minute bounds.
    pub fn new(start_minute: u32, end_minute: u32) -> Self {
        Self {
            start_minute,
            end_minute,
        }
    }

    /// Creates a one-hour slot starting at `hour:00`.
    pub fn hour(hour: u32) -> Self {
        Self::new(hour * 60, (hour + 1) * 60)
    }

    /// Parses `"HH:MM-HH:MM"`; either side may carry an `AM`/`PM` suffix.
    pub fn parse_range(text: &str) -> Result<Self> {
        let (start, end) = text
            .split_once('-')
            .ok_or_else(|| TimetableError::InvalidTimeSlot(text.to_string()))?;
        Self::from_bounds(start, end)
    }

    /// Parses a slot from separate start and end labels.
    pub fn from_bounds(start: &str, end: &str) -> Result<Self> {
        let start_minute = parse_clock(start)?;
        let end_minute = parse_clock(end)?;
        if end_minute <= start_minute {
            return Err(TimetableError::InvalidTimeSlot(format!("{start}-{end}")));
        }
        Ok(Self::new(start_minute, end_minute))
    }

    /// Length in minutes.
    #[inline]
    pub fn duration_minutes(&self) -> u32 {
        self.end_minute - self.start_minute
    }

    /// Whether two slots overlap.
    pub fn overlaps(&self, other: &Self) -> bool {
        self.start_minute < other.end_minute && other.start_minute < self.end_minute
    }

    /// `HH:MM-HH:MM` rendering.
    pub fn label(&self) -> String {
        format!("{}-{}", clock(self.start_minute), clock(self.end_minute))
    }
}

fn clock(minute: u32) -> String {
    format!("{:02}:{:02}", minute / 60, minute % 60)
}

fn parse_clock(text: &str) -> Result<u32> {
    let invalid = || TimetableError::InvalidTimeSlot(text.to_string());
    let upper = text.trim().to_ascii_uppercase();
    let (body, meridiem) = if let Some(rest) = upper.strip_suffix("AM") {
        (rest.trim(), Some(false))
    } else if let Some(rest) = upper.strip_suffix("PM") {
        (rest.trim(), Some(true))
    } else {
        (upper.as_str(), None)
    };

    let (h, m) = body.split_once(':').ok_or_else(invalid)?;
    let mut hour: u32 = h.trim().parse().map_err(|_| invalid())?;
    let minute: u32 = m.trim().parse().map_err(|_| invalid())?;
    if minute >= 60 {
        return Err(invalid());
    }
    match meridiem {
        Some(pm) => {
            if hour == 0 || hour > 12 {
                return Err(invalid());
            }
            hour %= 12;
            if pm {
                hour += 12;
            }
        }
        None if hour > 24 => return Err(invalid()),
        None => {}
    }
    Ok(hour * 60 + minute)
}

/// The scheduling horizon: ordered working days and ordered daily slots.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeekGrid {
    /// Working day names, in order.
    pub days: Vec<String>,
    /// Daily slots, in order.
    pub slots: Vec<TimeSlot>,
}

impl WeekGrid {
    /// Creates a grid.
    pub fn new(days: Vec<String>, slots: Vec<TimeSlot>) -> Self {
        Self { days, slots }
    }

    /// Monday–Friday, nine one-hour slots from 08:00 to 17:00.
    pub fn standard() -> Self {
        let days = ["Monday", "Tuesday", "Wednesday", "Thursday", "Friday"]
            .iter()
            .map(|d| d.to_string())
            .collect();
        let slots = (8..17).map(TimeSlot::hour).collect();
        Self { days, slots }
    }

    /// Number of working days.
    pub fn day_count(&self) -> usize {
        self.days.len()
    }

    /// Number of slots per day.
    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    /// Whether the grid has no (day, slot) cell at all.
    pub fn is_empty(&self) -> bool {
        self.days.is_empty() || self.slots.is_empty()
    }

    /// Whether `duration` slots starting at `start` exist and are back-to-back.
    pub fn is_contiguous(&self, start: usize, duration: u32) -> bool {
        let duration = duration as usize;
        if duration == 0 || start + duration > self.slots.len() {
            return false;
        }
        self.slots[start..start + duration]
            .windows(2)
            .all(|w| w[0].end_minute == w[1].start_minute)
    }

    /// Start indices at which a block of `duration` fits contiguously.
    pub fn block_starts(&self, duration: u32) -> Vec<usize> {
        (0..self.slots.len())
            .filter(|&s| self.is_contiguous(s, duration))
            .collect()
    }

    /// Day name, or `"?"` for an out-of-range index.
    pub fn day_name(&self, day: usize) -> &str {
        self.days.get(day).map(String::as_str).unwrap_or("?")
    }

    /// Label spanning `duration` slots from `start` (e.g. `09:00-11:00`).
    pub fn span_label(&self, start: usize, duration: u32) -> String {
        let last = start + (duration.max(1) as usize) - 1;
        match (self.slots.get(start), self.slots.get(last)) {
            (Some(a), Some(b)) => format!("{}-{}", clock(a.start_minute), clock(b.end_minute)),
            _ => "?".to_string(),
        }
    }
}

impl Default for WeekGrid {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_grid() {
        let g = WeekGrid::standard();
        assert_eq!(g.day_count(), 5);
        assert_eq!(g.slot_count(), 9);
        assert_eq!(g.slots[0].label(), "08:00-09:00");
        assert_eq!(g.slots[8].label(), "16:00-17:00");
        assert_eq!(g.day_name(4), "Friday");
        assert_eq!(g.day_name(7), "?");
    }

    #[test]
    fn test_parse_range() {
        let s = TimeSlot::parse_range("09:00-10:30").unwrap();
        assert_eq!(s.start_minute, 540);
        assert_eq!(s.duration_minutes(), 90);

        let pm = TimeSlot::from_bounds("12:00 PM", "01:00 PM").unwrap();
        assert_eq!(pm.label(), "12:00-13:00");

        let am = TimeSlot::from_bounds("12:30 AM", "01:00 AM").unwrap();
        assert_eq!(am.start_minute, 30);
    }

    #[test]
    fn test_parse_invalid() {
        assert!(TimeSlot::parse_range("0900").is_err());
        assert!(TimeSlot::parse_range("10:00-09:00").is_err());
        assert!(TimeSlot::parse_range("xx:00-09:00").is_err());
        assert!(TimeSlot::from_bounds("13:00 PM", "02:00 PM").is_err());
    }

    #[test]
    fn test_contiguity_with_gap() {
        // 08-09, 09-10, 11-12: lunch-style gap after the second slot
        let g = WeekGrid::new(
            vec!["Mon".into()],
            vec![TimeSlot::hour(8), TimeSlot::hour(9), TimeSlot::hour(11)],
        );
        assert!(g.is_contiguous(0, 2));
        assert!(!g.is_contiguous(1, 2));
        assert!(!g.is_contiguous(0, 3));
        assert!(!g.is_contiguous(2, 2));
        assert!(!g.is_contiguous(0, 0));
        assert_eq!(g.block_starts(1), vec![0, 1, 2]);
        assert_eq!(g.block_starts(2), vec![0]);
    }

    #[test]
    fn test_span_label() {
        let g = WeekGrid::standard();
        assert_eq!(g.span_label(1, 2), "09:00-11:00");
        assert_eq!(g.span_label(8, 2), "?");
    }

    #[test]
    fn test_overlaps() {
        let a = TimeSlot::new(0, 60);
        let b = TimeSlot::new(30, 90);
        let c = TimeSlot::new(60, 120);
        assert!(a.overlaps(&b));
        assert!(!a.overlaps(&c));
    }
}
