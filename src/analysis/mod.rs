//! Analysis modules.
//!
//! Pure computations over the run snapshot: the insight aggregator,
//! hotspot grouping and peak window selection.

pub mod aggregator;
pub mod hotspots;
pub mod peak;

pub use aggregator::*;
pub use hotspots::{build_hotspots, hotspot_preview};
pub use peak::peak_banner;
