pub mod heat;
pub mod types;
pub mod weight;

pub use heat::HeatColor;
pub use types::{LayoutRect, Orientation};
pub use weight::{EventTotals, WeightMode};
