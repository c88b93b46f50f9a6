pub mod model;
pub mod schedule;
pub mod views;

pub use model::{CallNode, EventReport, FunctionTable, ProcessSample, ReportError, ThreadSample};
pub use schedule::{FlameGraphView, Progress, RenderContext, RenderScheduler};
