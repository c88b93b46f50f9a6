pub mod call_tree;
pub mod function_table;
pub mod report;

pub use call_tree::CallNode;
pub use function_table::{FunctionEntry, FunctionTable};
pub use report::{EventReport, ProcessSample, ReportError, ThreadSample};
