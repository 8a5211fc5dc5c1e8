//! Aggregate statistics behind ML dashboard charts.
//!
//! Every function in [`metrics`] is pure: it reads caller-owned slices and
//! returns freshly computed values. Degenerate arithmetic (empty inputs, zero
//! support) surfaces as NaN rather than an error; only malformed shapes are
//! rejected with [`MetricsError`].

pub mod config;
pub mod error;
pub mod history;
pub mod metrics;
pub mod model;

pub use config::EngineConfig;
pub use error::{MetricsError, Result};
pub use history::ActionHistory;
