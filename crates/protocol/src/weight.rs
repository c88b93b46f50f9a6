use serde::{Deserialize, Serialize};

/// The denominators a weight mode may divide by.
///
/// Supplied by the enclosing view, one per flame graph: the event count of
/// the whole report, of the owning process, and of the owning thread.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventTotals {
    pub all_processes: u64,
    pub process: u64,
    pub thread: u64,
}

/// How an event count is turned into a display string.
///
/// Selecting a mode is a pure state change in the owning view; counts are
/// never mutated, only re-resolved. `ClockMs` is only meaningful for
/// clock-based events (task-clock / cpu-clock), where one event is one
/// nanosecond — offering it for other events is a caller error that
/// [`WeightMode::options`] prevents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WeightMode {
    /// Percentage of the event count of all processes.
    PercentToAll,
    /// Percentage of the event count of the current process.
    PercentToProcess,
    /// Percentage of the event count of the current thread.
    PercentToThread,
    /// The raw event count.
    RawCount,
    /// Event count as milliseconds (clock events only).
    ClockMs,
}

impl WeightMode {
    /// The modes a selector may offer, in menu order.
    pub fn options(clock_event: bool) -> Vec<WeightMode> {
        let mut modes = vec![
            WeightMode::PercentToAll,
            WeightMode::PercentToProcess,
            WeightMode::PercentToThread,
            WeightMode::RawCount,
        ];
        if clock_event {
            modes.push(WeightMode::ClockMs);
        }
        modes
    }

    /// Menu label for this mode.
    pub fn label(&self) -> &'static str {
        match self {
            WeightMode::PercentToAll => {
                "Show percentage of event count relative to all processes"
            }
            WeightMode::PercentToProcess => {
                "Show percentage of event count relative to the current process"
            }
            WeightMode::PercentToThread => {
                "Show percentage of event count relative to the current thread"
            }
            WeightMode::RawCount => "Show event count",
            WeightMode::ClockMs => "Show event count in milliseconds",
        }
    }

    /// Resolve an event count to its display string under this mode.
    ///
    /// Pure function of its inputs: switching modes only requires
    /// re-resolving strings for already-computed geometry.
    pub fn resolve(&self, event_count: u64, totals: &EventTotals) -> String {
        match self {
            WeightMode::PercentToAll => percent_of(event_count, totals.all_processes),
            WeightMode::PercentToProcess => percent_of(event_count, totals.process),
            WeightMode::PercentToThread => percent_of(event_count, totals.thread),
            WeightMode::RawCount => event_count.to_string(),
            WeightMode::ClockMs => {
                format!("{:.3} ms", event_count as f64 / 1_000_000.0)
            }
        }
    }
}

impl Default for WeightMode {
    fn default() -> Self {
        WeightMode::PercentToAll
    }
}

fn percent_of(event_count: u64, denominator: u64) -> String {
    if denominator == 0 {
        return "0.00%".to_string();
    }
    format!("{:.2}%", event_count as f64 * 100.0 / denominator as f64)
}
