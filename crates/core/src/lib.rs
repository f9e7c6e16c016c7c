//! Slot allocation engine for team sheets. Keep this crate free of IO and
//! platform concerns.

pub mod config;
pub mod events;
pub mod group;
pub mod lineup;
pub mod picker;
pub mod pool;
pub mod rng;
pub mod sequence;
pub mod sheet;
pub mod view;

pub use config::*;
pub use events::*;
pub use group::*;
pub use lineup::*;
pub use picker::*;
pub use pool::*;
pub use rng::*;
pub use sequence::*;
pub use sheet::*;
pub use view::*;
