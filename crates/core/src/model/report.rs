use serde::{Deserialize, Serialize};
use thiserror::Error;

use emberscope_protocol::{EventTotals, WeightMode};

use crate::model::CallNode;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ReportError {
    #[error("weight mode ClockMs is not available for event {0:?}")]
    ClockModeUnavailable(String),
}

/// Samples of one thread: the thread's call graph and its reverse (caller)
/// graph. Both roots are synthetic whole-thread frames; their children are
/// the actual sampled entry frames.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThreadSample {
    pub tid: u32,
    pub sample_count: u64,
    pub event_count: u64,
    pub call_graph: CallNode,
    pub reverse_graph: CallNode,
}

/// Samples of one process, grouped by thread.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessSample {
    pub pid: u32,
    pub event_count: u64,
    /// Threads ordered by descending event count, as produced by the
    /// report generator. The scheduler materializes them in this order.
    pub threads: Vec<ThreadSample>,
}

/// Everything sampled for one event type (e.g. `cpu-cycles`, `task-clock`).
///
/// This is the forest the flame-graph engine works on: one call tree per
/// (process, thread) pair. The tree data is read-only for the engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventReport {
    pub event_name: String,
    pub event_count: u64,
    pub processes: Vec<ProcessSample>,
}

impl EventReport {
    /// Whether one event represents one clock tick (a nanosecond), which is
    /// what makes the millisecond weight mode meaningful.
    pub fn is_clock_event(&self) -> bool {
        self.event_name.contains("task-clock") || self.event_name.contains("cpu-clock")
    }

    /// Validate a requested weight mode against this event type.
    pub fn select_weight_mode(&self, mode: WeightMode) -> Result<WeightMode, ReportError> {
        if mode == WeightMode::ClockMs && !self.is_clock_event() {
            return Err(ReportError::ClockModeUnavailable(self.event_name.clone()));
        }
        Ok(mode)
    }

    /// The weight modes a selector may offer for this event type.
    pub fn weight_modes(&self) -> Vec<WeightMode> {
        WeightMode::options(self.is_clock_event())
    }

    /// Denominators for a flame graph of the given thread.
    pub fn totals_for(&self, process: &ProcessSample, thread: &ThreadSample) -> EventTotals {
        EventTotals {
            all_processes: self.event_count,
            process: process.event_count,
            thread: thread.event_count,
        }
    }

    /// All (process index, thread index) pairs in enumeration order.
    pub fn thread_pairs(&self) -> Vec<(usize, usize)> {
        let mut pairs = Vec::new();
        for (pi, process) in self.processes.iter().enumerate() {
            for ti in 0..process.threads.len() {
                pairs.push((pi, ti));
            }
        }
        pairs
    }

    /// Look up a pair returned by [`EventReport::thread_pairs`].
    pub fn thread_at(&self, pair: (usize, usize)) -> Option<(&ProcessSample, &ThreadSample)> {
        let process = self.processes.get(pair.0)?;
        let thread = process.threads.get(pair.1)?;
        Some((process, thread))
    }
}
