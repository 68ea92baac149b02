//! Visualization session abstraction.
//!
//! A [`Session`] is the sink a segment's data points are streamed into.
//! Every segment opens its own session through a [`SessionFactory`];
//! sessions are never shared between workers.

mod viewer;

pub use viewer::{RerunSession, RerunSessionFactory};

use crate::error::Result;
use crate::layout::Layout;
use crate::route::Segment;

/// Calls into a visualization tool.
pub trait Session {
    /// Declare as much of the dashboard layout as the tool supports.
    /// Called once, before any data.
    fn declare_layout(&mut self, layout: &Layout) -> Result<()>;

    /// Move the timeline cursor; subsequent points are stamped with `nanos`.
    fn set_time_nanos(&mut self, nanos: i64);

    /// Log one named scalar at the current cursor.
    fn log_scalar(&mut self, path: &str, value: f64) -> Result<()>;

    /// Log one encoded image (JPEG, PNG, ...) at the current cursor.
    fn log_image(&mut self, path: &str, contents: Vec<u8>) -> Result<()>;

    /// Flush anything still buffered.
    fn finish(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Opens one [`Session`] per segment.
pub trait SessionFactory: Sync {
    type Session: Session;

    fn open(&self, segment: &Segment) -> Result<Self::Session>;
}
