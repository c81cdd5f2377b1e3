//! case-trends: headless engine behind a regional case-trend explorer.
//!
//! The crate turns raw per-region daily counts into a hierarchical dataset
//! with derived weekly slopes, keeps selection and playback state for an
//! interactive chart, projects that state into a declarative chart
//! description, and mirrors it into a shareable query string.
//!
//! Drawing is delegated to a host-provided [`render::ChartSurface`].

pub mod api;
pub mod core;
pub mod error;
pub mod extensions;
pub mod interaction;
pub mod render;
pub mod telemetry;

pub use api::{TrendsEngine, TrendsEngineConfig};
pub use error::{TrendsError, TrendsResult};
