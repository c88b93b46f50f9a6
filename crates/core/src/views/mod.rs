pub mod bucket;
pub mod flame;
pub mod label;
pub mod search;
pub mod zoom;

pub use bucket::{VisualBucket, merge_siblings};
pub use flame::{FlameLayout, MIN_WIDTH_PERCENT, layout_forest, layout_function, layout_thread};
pub use label::{fit_label, frame_titles};
pub use search::matching_frames;
pub use zoom::{ZoomFrame, ZoomStack};
