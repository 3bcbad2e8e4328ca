mod bridges;
mod build;
mod clusters;
mod coordinator;
mod events;
mod filter;
mod model;
mod selection;

pub use bridges::bridge_indicators;
pub use coordinator::{GraphCoordinator, GraphStatus};
pub use events::{EventSink, GraphEvent};
pub use filter::FilterState;
pub use model::GraphModel;

#[cfg(test)]
pub(crate) use coordinator::testing;
#[cfg(test)]
pub(crate) use model::fixtures;
#[cfg(test)]
pub(crate) use selection::HOP_UNREACHED;
