//! Time-windowed schedule entries and the resolver that decides which of them
//! apply to a given hour.
//!
//! Three kinds of schedule modify a simulation run: maintenance outages,
//! phased commissioning of new capacity, and output-limit (curtailment)
//! ceilings. Entries are held in sets keyed by a stable [`ScheduleId`]
//! assigned at creation, so callers can update or delete entries without
//! matching on field values.
//!
//! Dates are carried as `YYYY-MM-DD` strings and parsed when the resolver
//! needs them; an entry with an unparsable date is simply never active.
use crate::calendar::datetime_for_hour;
use chrono::NaiveDate;
use indexmap::IndexMap;
use serde::Deserialize;
use serde_string_enum::DeserializeLabeledStringEnum;
use std::fmt;

/// Stable identifier for a schedule entry, unique within one set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScheduleId(u32);

impl fmt::Display for ScheduleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The quantity a maintenance or commissioning entry acts on
#[derive(Debug, Clone, Copy, PartialEq, Eq, DeserializeLabeledStringEnum)]
pub enum EffectType {
    /// Basic electric load of the park
    #[string = "electric_load"]
    ElectricLoad,
    /// Peak-unit output taken out by maintenance (max reduced, min rescaled)
    #[string = "peak_unit_output"]
    PeakUnitOutput,
    /// PV fleet output being commissioned
    #[string = "pv_output"]
    PvOutput,
    /// Wind fleet output being commissioned
    #[string = "wind_output"]
    WindOutput,
    /// Peak-unit maximum output being commissioned
    #[string = "peak_unit_max"]
    PeakUnitMax,
    /// Peak-unit summer minimum-output floor being commissioned
    #[string = "peak_unit_min_summer"]
    PeakUnitMinSummer,
    /// Peak-unit winter minimum-output floor being commissioned
    #[string = "peak_unit_min_winter"]
    PeakUnitMinWinter,
    /// Peak-unit minimum-output floor for both seasons (legacy form)
    #[string = "peak_unit_min"]
    PeakUnitMin,
}

/// The generation source an output-limit entry applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq, DeserializeLabeledStringEnum)]
pub enum OutputLimitType {
    /// Ceiling on total PV output
    #[string = "pv_max"]
    PvMax,
    /// Ceiling on total wind output
    #[string = "wind_max"]
    WindMax,
}

/// A maintenance or commissioning record with an inclusive date window
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ScheduleEntry {
    /// Display name for the entry
    pub name: String,
    /// The quantity this entry acts on
    pub effect: EffectType,
    /// Magnitude of the effect (kW)
    pub power_size: f64,
    /// First day of the window, `YYYY-MM-DD`
    pub start_date: String,
    /// Last day of the window (inclusive), `YYYY-MM-DD`
    pub end_date: String,
}

/// An output-limit record with an inclusive date window
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct OutputLimitEntry {
    /// Display name for the entry
    pub name: String,
    /// The generation source this ceiling applies to
    pub limit_type: OutputLimitType,
    /// The output ceiling (kW)
    pub power_size: f64,
    /// First day of the window, `YYYY-MM-DD`
    pub start_date: String,
    /// Last day of the window (inclusive), `YYYY-MM-DD`
    pub end_date: String,
}

/// Parse a `YYYY-MM-DD` date string, returning `None` if malformed
fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()
}

/// Whether the date of `hour` falls within the inclusive window.
///
/// Malformed dates make the window empty.
pub fn is_date_in_range(hour: usize, start_date: &str, end_date: &str) -> bool {
    let (Some(start), Some(end)) = (parse_date(start_date), parse_date(end_date)) else {
        return false;
    };
    let date = datetime_for_hour(hour).date();

    start <= date && date <= end
}

/// Fraction of the ramp window completed at the given hour.
///
/// Returns 0 before the window, 1 after it, and the elapsed share of whole
/// days otherwise. A zero-length window counts as complete. Malformed dates
/// yield 0.
pub fn interpolation_factor(hour: usize, start_date: &str, end_date: &str) -> f64 {
    let (Some(start), Some(end)) = (parse_date(start_date), parse_date(end_date)) else {
        return 0.0;
    };
    let current = datetime_for_hour(hour);
    let start = start.and_hms_opt(0, 0, 0).expect("valid midnight");
    let end = end.and_hms_opt(0, 0, 0).expect("valid midnight");

    if current < start {
        return 0.0;
    }
    if current > end {
        return 1.0;
    }

    let total_days = (end - start).num_days();
    if total_days == 0 {
        return 1.0;
    }
    let elapsed_days = (current - start).num_days();

    elapsed_days as f64 / total_days as f64
}

impl ScheduleEntry {
    /// Whether this entry applies at the given hour (day-granular, inclusive)
    pub fn is_active(&self, hour: usize) -> bool {
        is_date_in_range(hour, &self.start_date, &self.end_date)
    }

    /// Whether this entry applies at the given hour under commissioning rules.
    ///
    /// Commissioning entries are also active before their start date, so the
    /// calculator can apply the full pre-commissioning impact.
    pub fn is_active_with_lead_in(&self, hour: usize) -> bool {
        match parse_date(&self.start_date) {
            Some(start) => {
                let start = start.and_hms_opt(0, 0, 0).expect("valid midnight");
                datetime_for_hour(hour) <= start || self.is_active(hour)
            }
            None => self.is_active(hour),
        }
    }

    /// Fraction of this entry's ramp completed at the given hour
    pub fn interpolation_factor(&self, hour: usize) -> f64 {
        interpolation_factor(hour, &self.start_date, &self.end_date)
    }

    /// The residual impact of a commissioning entry at the given hour.
    ///
    /// Full magnitude before the window, zero after it, linear in between.
    pub fn residual_impact(&self, hour: usize) -> f64 {
        self.power_size * (1.0 - self.interpolation_factor(hour))
    }
}

impl OutputLimitEntry {
    /// Whether this entry applies at the given hour (day-granular, inclusive)
    pub fn is_active(&self, hour: usize) -> bool {
        is_date_in_range(hour, &self.start_date, &self.end_date)
    }
}

/// An ordered collection of schedule entries keyed by stable ID.
///
/// IDs are assigned when an entry is added and are never reused within the
/// set, so lookups stay unambiguous even when two entries share every field
/// value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScheduleSet<T> {
    next_id: u32,
    entries: IndexMap<ScheduleId, T>,
}

impl<T> ScheduleSet<T> {
    /// An empty set
    pub fn new() -> Self {
        ScheduleSet {
            next_id: 0,
            entries: IndexMap::new(),
        }
    }

    /// Add an entry, returning its newly assigned ID
    pub fn add(&mut self, entry: T) -> ScheduleId {
        let id = ScheduleId(self.next_id);
        self.next_id += 1;
        self.entries.insert(id, entry);

        id
    }

    /// Look up an entry by ID
    pub fn get(&self, id: ScheduleId) -> Option<&T> {
        self.entries.get(&id)
    }

    /// Replace the entry with the given ID, returning the previous value
    pub fn update(&mut self, id: ScheduleId, entry: T) -> Option<T> {
        if !self.entries.contains_key(&id) {
            return None;
        }

        self.entries.insert(id, entry)
    }

    /// Remove the entry with the given ID, preserving the order of the rest
    pub fn remove(&mut self, id: ScheduleId) -> Option<T> {
        self.entries.shift_remove(&id)
    }

    /// The number of entries in the set
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the set contains no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over entries in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.entries.values()
    }
}

impl<T> FromIterator<T> for ScheduleSet<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut set = ScheduleSet::new();
        for entry in iter {
            set.add(entry);
        }

        set
    }
}

impl ScheduleSet<ScheduleEntry> {
    /// Iterate over entries active at the given hour under maintenance rules
    pub fn active_at(&self, hour: usize) -> impl Iterator<Item = &ScheduleEntry> {
        self.iter().filter(move |entry| entry.is_active(hour))
    }

    /// Iterate over entries active at the given hour under commissioning rules
    pub fn active_with_lead_in_at(&self, hour: usize) -> impl Iterator<Item = &ScheduleEntry> {
        self.iter()
            .filter(move |entry| entry.is_active_with_lead_in(hour))
    }
}

impl ScheduleSet<OutputLimitEntry> {
    /// The effective output ceiling for a source at the given hour.
    ///
    /// When several limits of the same type overlap, the most restrictive
    /// (smallest) one wins. Returns `None` when no limit is active.
    pub fn effective_limit(&self, hour: usize, limit_type: OutputLimitType) -> Option<f64> {
        self.iter()
            .filter(|entry| entry.limit_type == limit_type && entry.is_active(hour))
            .map(|entry| entry.power_size)
            .fold(None, |acc, size| {
                Some(acc.map_or(size, |current: f64| current.min(size)))
            })
    }
}
