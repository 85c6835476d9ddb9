//! Snapshot provider abstraction.
//!
//! The monitor never talks to a concrete feed directly; it pulls through the
//! [`SnapshotProvider`] trait so file polling, push channels, or an API
//! client can be swapped without touching the tick logic.

mod channel;
mod file;
mod snapshot;

pub use channel::ChannelProvider;
pub use file::FileProvider;
pub use snapshot::{FleetSnapshot, Position, UnitSnapshot, UNASSIGNED_DRIVER};

use std::fmt::Debug;

use thiserror::Error;

/// Errors a snapshot load can produce.
///
/// The monitor treats both variants the same way: log, skip the tick body,
/// retry naturally on the next scheduled tick.
#[derive(Debug, Error)]
pub enum SourceError {
    /// The feed could not be reached or read.
    #[error("snapshot source unavailable: {0}")]
    Unavailable(String),

    /// The feed was readable but its content could not be parsed.
    #[error("snapshot source malformed: {0}")]
    Malformed(String),
}

/// Trait for loading fleet snapshots from a backing feed.
///
/// # Example
///
/// ```
/// use fleetwatch::source::{FileProvider, SnapshotProvider};
///
/// let mut provider = FileProvider::new("unidades.json");
/// match provider.load() {
///     Ok(snapshot) => println!("{} units", snapshot.len()),
///     Err(e) => eprintln!("skipping tick: {e}"),
/// }
/// ```
pub trait SnapshotProvider: Send + Debug {
    /// Load the current snapshot.
    ///
    /// This should be cheap enough to call once per tick.
    fn load(&mut self) -> Result<FleetSnapshot, SourceError>;

    /// Returns a human-readable description of the provider.
    fn description(&self) -> &str;
}
