//! # route-rerun
//!
//! Stream recorded openpilot routes into the Rerun viewer for interactive
//! inspection.
//!
//! ## Architecture
//!
//! ```text
//!  ┌──────────┐    ┌──────────┐    ┌───────────┐    ┌──────────┐
//!  │  route   │───▶│  driver  │───▶│   walk /  │───▶│ session  │───▶ Rerun viewer
//!  │ (reader) │    │  (pool)  │    │ thumbnail │    │          │
//!  └──────────┘    └────┬─────┘    └───────────┘    └──────────┘
//!                       │
//!  ┌──────────┐    ┌────┴─────┐
//!  │ services │───▶│  layout  │
//!  └──────────┘    └──────────┘
//! ```
//!
//! - **[`route`]**: route/segment names, the local [`LogReader`], and
//!   decoded [`LogMessage`]s
//! - **[`walk`]**: turns a message tree into named scalars
//! - **[`thumbnail`]**: pulls encoded images out of thumbnail messages
//! - **[`services`]** and **[`layout`]**: the known topics and the static
//!   dashboard built from them
//! - **[`session`]**: the [`Session`] trait and its Rerun implementation
//! - **[`driver`]**: runs segments across a worker pool
//!
//! ## Usage
//!
//! ```bash
//! # Install the viewer
//! route-rerun --install
//!
//! # Plot the demo route
//! route-rerun --demo
//!
//! # Plot segments 2 and 3 of a route
//! route-rerun "a2a0ccea32023010|2023-07-27--13-01-19/2:4"
//! ```
//!
//! ### As a library
//!
//! ```no_run
//! use route_rerun::{driver, Layout, LogReader, RerunSessionFactory, ServiceRegistry};
//!
//! # fn main() -> route_rerun::Result<()> {
//! let reader = LogReader::open("a2a0ccea32023010|2023-07-27--13-01-19", "realdata".as_ref())?;
//! let layout = Layout::build(&ServiceRegistry::builtin());
//! let factory = RerunSessionFactory::new("rerun_test", reader.route().canonical_name(), "TIMELINE");
//! let stats = driver::run_across_segments(&factory, &layout, reader.segments(), 4)?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod driver;
pub mod error;
pub mod install;
pub mod layout;
pub mod route;
pub mod services;
pub mod session;
pub mod thumbnail;
pub mod walk;

pub use config::Settings;
pub use driver::SegmentStats;
pub use error::{Error, Result};
pub use layout::{Layout, Panel};
pub use route::{LogMessage, LogReader, Route, Segment, SegmentSelector};
pub use services::ServiceRegistry;
pub use session::{RerunSession, RerunSessionFactory, Session, SessionFactory};
