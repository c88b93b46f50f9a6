use std::collections::VecDeque;
use std::ops::Range;

use serde::{Deserialize, Serialize};

use emberscope_protocol::{EventTotals, LayoutRect, WeightMode};

use crate::model::{EventReport, FunctionTable};
use crate::views::flame::{FlameLayout, layout_thread};
use crate::views::label::frame_titles;
use crate::views::search::matching_frames;
use crate::views::zoom::ZoomStack;

/// How many (process, thread) flame graphs one batch materializes.
pub const DEFAULT_BATCH_SIZE: usize = 10;

/// Scheduler progress as reported to the host after each quantum.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Progress {
    /// Fraction of total work completed, in [0, 100]. Non-decreasing.
    pub percent: f64,
    /// Whether further batches remain beyond what has been enqueued.
    pub more_pending: bool,
}

/// Everything a scheduling quantum needs besides the scheduler's own state.
///
/// Passed per call rather than stored so a mode change between quanta takes
/// effect on the next detail pass without touching the queue.
#[derive(Debug, Clone, Copy)]
pub struct RenderContext<'a> {
    pub report: &'a EventReport,
    pub functions: &'a FunctionTable,
    pub mode: WeightMode,
}

/// One materialized flame graph together with its per-view state.
///
/// Views own their zoom stack individually, so many flame graphs coexist
/// without interfering with each other.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlameGraphView {
    pub pid: u32,
    pub tid: u32,
    pub sample_count: u64,
    pub totals: EventTotals,
    pub layout: FlameLayout,
    /// Tooltip titles parallel to `layout.rects`; empty until the detail
    /// pass for this graph has run.
    pub titles: Vec<String>,
    pub zoom: ZoomStack,
    detail_done: bool,
}

impl FlameGraphView {
    /// The rects visible under this view's current zoom state.
    pub fn visible_rects(&self) -> Vec<LayoutRect> {
        self.zoom.project(&self.layout.rects)
    }

    /// Rect indices whose title contains `term`. Requires the detail pass.
    pub fn search(&self, term: &str) -> Vec<usize> {
        matching_frames(&self.titles, term)
    }

    /// Whether the detail pass has run for this graph. Distinguishes
    /// "detail ran, zero rects" from "detail not yet run".
    pub fn has_detail(&self) -> bool {
        self.detail_done
    }
}

/// Cooperative scheduler materializing one flame graph per (process,
/// thread) pair without blocking the host for the whole forest.
///
/// Work is an explicit task queue consumed one quantum per [`poll`]: per
/// batch, one cheap skeleton quantum (aggregation + layout for every pair
/// in the batch) followed by one detail quantum per pair (weight strings
/// and tooltip titles). The host yields between quanta and shows the
/// reported progress; when a batch finishes with pairs still unscheduled,
/// it offers a "more" trigger that maps to [`request_more`].
///
/// [`poll`]: RenderScheduler::poll
/// [`request_more`]: RenderScheduler::request_more
#[derive(Debug)]
pub struct RenderScheduler {
    batch_size: usize,
    pairs: Vec<(usize, usize)>,
    /// Pairs enqueued so far; pairs beyond this are "more".
    enqueued: usize,
    queue: VecDeque<Task>,
    /// Completed work units out of `2 * pairs.len()` (skeleton + detail
    /// per pair).
    completed_units: usize,
    graphs: Vec<FlameGraphView>,
}

#[derive(Debug)]
enum Task {
    /// Aggregate + layout for a contiguous run of pairs. One quantum.
    Skeleton { pairs: Range<usize> },
    /// Build titles for one already-laid-out graph. One quantum each.
    Detail { graph: usize },
}

impl RenderScheduler {
    /// Enumerates the report's pairs and enqueues the first batch. An empty
    /// forest starts (and stays) at 100% with nothing pending.
    pub fn new(report: &EventReport, batch_size: usize) -> Self {
        let pairs = report.thread_pairs();
        log::debug!(
            "scheduling {} flame graphs in batches of {batch_size}",
            pairs.len()
        );
        let mut scheduler = Self {
            batch_size: batch_size.max(1),
            pairs,
            enqueued: 0,
            queue: VecDeque::new(),
            completed_units: 0,
            graphs: Vec::new(),
        };
        scheduler.request_more();
        scheduler
    }

    /// The flame graphs materialized so far, in enumeration order.
    pub fn graphs(&self) -> &[FlameGraphView] {
        &self.graphs
    }

    /// Mutable access for zoom interactions on individual views.
    pub fn graphs_mut(&mut self) -> &mut [FlameGraphView] {
        &mut self.graphs
    }

    /// Whether pairs remain beyond the enqueued batches.
    pub fn more_pending(&self) -> bool {
        self.enqueued < self.pairs.len()
    }

    /// Whether all enqueued work has been consumed.
    pub fn is_idle(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn progress(&self) -> Progress {
        let total_units = self.pairs.len() * 2;
        let percent = if total_units == 0 {
            100.0
        } else {
            self.completed_units as f64 * 100.0 / total_units as f64
        };
        Progress {
            percent,
            more_pending: self.more_pending(),
        }
    }

    /// Enqueue the next batch. Returns false when every pair is already
    /// enqueued — the continuation is retired.
    pub fn request_more(&mut self) -> bool {
        if !self.more_pending() {
            return false;
        }
        let start = self.enqueued;
        let end = (start + self.batch_size).min(self.pairs.len());
        self.queue.push_back(Task::Skeleton { pairs: start..end });
        for graph in start..end {
            self.queue.push_back(Task::Detail { graph });
        }
        self.enqueued = end;
        log::debug!("enqueued batch of pairs {start}..{end}");
        true
    }

    /// Run one quantum and report progress. A no-op when idle.
    pub fn poll(&mut self, cx: &RenderContext<'_>) -> Progress {
        match self.queue.pop_front() {
            Some(Task::Skeleton { pairs }) => {
                for index in pairs {
                    self.build_skeleton(index, cx);
                    self.completed_units += 1;
                }
            }
            Some(Task::Detail { graph }) => {
                self.build_detail(graph, cx);
                self.completed_units += 1;
            }
            None => {}
        }
        self.progress()
    }

    /// Drive quanta until the enqueued batch is exhausted.
    ///
    /// Hosts that interleave other work call [`poll`] themselves; this is
    /// the convenience driver for those that only want batch granularity.
    ///
    /// [`poll`]: RenderScheduler::poll
    pub fn run_batch(&mut self, cx: &RenderContext<'_>) -> Progress {
        while !self.queue.is_empty() {
            self.poll(cx);
        }
        self.progress()
    }

    /// Rebuild detail strings for every materialized graph under a new
    /// weight mode. Skeleton geometry is untouched; titles are recomputed
    /// from scratch rather than edited in place.
    pub fn refresh_details(&mut self, cx: &RenderContext<'_>) {
        for graph in &mut self.graphs {
            if graph.has_detail() {
                graph.titles = frame_titles(&graph.layout, cx.functions, cx.mode, &graph.totals);
            }
        }
    }

    fn build_skeleton(&mut self, index: usize, cx: &RenderContext<'_>) {
        let Some(&pair) = self.pairs.get(index) else {
            return;
        };
        let Some((process, thread)) = cx.report.thread_at(pair) else {
            return;
        };
        self.graphs.push(FlameGraphView {
            pid: process.pid,
            tid: thread.tid,
            sample_count: thread.sample_count,
            totals: cx.report.totals_for(process, thread),
            layout: layout_thread(thread),
            titles: Vec::new(),
            zoom: ZoomStack::new(),
            detail_done: false,
        });
    }

    fn build_detail(&mut self, index: usize, cx: &RenderContext<'_>) {
        let Some(graph) = self.graphs.get_mut(index) else {
            return;
        };
        graph.titles = frame_titles(&graph.layout, cx.functions, cx.mode, &graph.totals);
        graph.detail_done = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CallNode, ProcessSample, ThreadSample};

    fn thread(tid: u32, events: u64) -> ThreadSample {
        ThreadSample {
            tid,
            sample_count: events / 10,
            event_count: events,
            call_graph: CallNode::new(0, 0, vec![CallNode::leaf(1, events)]),
            reverse_graph: CallNode::new(0, 0, vec![CallNode::leaf(1, events)]),
        }
    }

    fn report_with_threads(thread_count: usize) -> EventReport {
        let threads: Vec<ThreadSample> = (0..thread_count)
            .map(|i| thread(1000 + i as u32, 100))
            .collect();
        EventReport {
            event_name: "cpu-cycles".into(),
            event_count: 100 * thread_count as u64,
            processes: vec![ProcessSample {
                pid: 1,
                event_count: 100 * thread_count as u64,
                threads,
            }],
        }
    }

    fn context<'a>(report: &'a EventReport, functions: &'a FunctionTable) -> RenderContext<'a> {
        RenderContext {
            report,
            functions,
            mode: WeightMode::PercentToAll,
        }
    }

    #[test]
    fn empty_forest_completes_immediately() {
        let report = report_with_threads(0);
        let scheduler = RenderScheduler::new(&report, DEFAULT_BATCH_SIZE);
        let progress = scheduler.progress();
        assert_eq!(progress.percent, 100.0);
        assert!(!progress.more_pending);
        assert!(scheduler.is_idle());
    }

    #[test]
    fn twenty_five_pairs_take_three_batches() {
        let report = report_with_threads(25);
        let functions = FunctionTable::default();
        let cx = context(&report, &functions);
        let mut scheduler = RenderScheduler::new(&report, DEFAULT_BATCH_SIZE);

        let p1 = scheduler.run_batch(&cx);
        assert!(p1.more_pending);
        assert!((p1.percent - 40.0).abs() < 1e-9);
        assert_eq!(scheduler.graphs().len(), 10);

        assert!(scheduler.request_more());
        let p2 = scheduler.run_batch(&cx);
        assert!(p2.more_pending);
        assert!((p2.percent - 80.0).abs() < 1e-9);
        assert_eq!(scheduler.graphs().len(), 20);

        assert!(scheduler.request_more());
        let p3 = scheduler.run_batch(&cx);
        assert!(!p3.more_pending);
        assert_eq!(p3.percent, 100.0);
        assert_eq!(scheduler.graphs().len(), 25);

        // Continuation retired.
        assert!(!scheduler.request_more());
    }

    #[test]
    fn progress_is_monotonic_per_quantum() {
        let report = report_with_threads(25);
        let functions = FunctionTable::default();
        let cx = context(&report, &functions);
        let mut scheduler = RenderScheduler::new(&report, DEFAULT_BATCH_SIZE);

        let mut last = 0.0;
        loop {
            while !scheduler.is_idle() {
                let p = scheduler.poll(&cx);
                assert!(p.percent >= last, "{} fell below {last}", p.percent);
                last = p.percent;
            }
            if !scheduler.request_more() {
                break;
            }
        }
        assert_eq!(last, 100.0);
    }

    #[test]
    fn skeletons_precede_details_within_a_batch() {
        let report = report_with_threads(3);
        let functions = FunctionTable::default();
        let cx = context(&report, &functions);
        let mut scheduler = RenderScheduler::new(&report, 10);

        // First quantum: all three skeletons, no titles yet.
        scheduler.poll(&cx);
        assert_eq!(scheduler.graphs().len(), 3);
        assert!(scheduler.graphs().iter().all(|g| g.titles.is_empty()));
        assert!(scheduler.graphs().iter().all(|g| !g.layout.rects.is_empty()));

        // Detail quanta fill titles one graph at a time.
        scheduler.poll(&cx);
        assert!(scheduler.graphs()[0].has_detail());
        assert!(!scheduler.graphs()[1].has_detail());
        scheduler.run_batch(&cx);
        assert!(scheduler.graphs().iter().all(FlameGraphView::has_detail));
    }

    #[test]
    fn uninvoked_continuation_halts_progress() {
        let report = report_with_threads(15);
        let functions = FunctionTable::default();
        let cx = context(&report, &functions);
        let mut scheduler = RenderScheduler::new(&report, 10);

        let p = scheduler.run_batch(&cx);
        assert!(p.more_pending);
        // Polling without requesting more does nothing.
        let again = scheduler.poll(&cx);
        assert_eq!(again, p);
        assert_eq!(scheduler.graphs().len(), 10);
    }

    #[test]
    fn mode_change_rebuilds_titles_without_touching_layout() {
        let report = report_with_threads(1);
        let functions = FunctionTable::default();
        let mut scheduler = RenderScheduler::new(&report, 10);
        scheduler.run_batch(&context(&report, &functions));

        let before_rects = scheduler.graphs()[0].layout.rects.clone();
        let before_titles = scheduler.graphs()[0].titles.clone();
        assert!(before_titles[0].ends_with("%)"));

        let cx = RenderContext {
            report: &report,
            functions: &functions,
            mode: WeightMode::RawCount,
        };
        scheduler.refresh_details(&cx);
        assert_eq!(scheduler.graphs()[0].layout.rects, before_rects);
        assert_ne!(scheduler.graphs()[0].titles, before_titles);
        assert!(scheduler.graphs()[0].titles[0].ends_with("100)"));
    }

    #[test]
    fn views_zoom_independently() {
        let report = report_with_threads(2);
        let functions = FunctionTable::default();
        let mut scheduler = RenderScheduler::new(&report, 10);
        scheduler.run_batch(&context(&report, &functions));

        let rect = scheduler.graphs()[0].layout.rects[0];
        scheduler.graphs_mut()[0].zoom.zoom_in(&rect);
        assert!(scheduler.graphs()[0].zoom.is_zoomed());
        assert!(!scheduler.graphs()[1].zoom.is_zoomed());
    }
}
