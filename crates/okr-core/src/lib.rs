//! okr-core library.
//!
//! Dataset model, the selection store, and the pure projections the
//! dashboard renders from.
//!
//! - [`dataset`] loads and validates the static OKR document.
//! - [`store`] owns selection state; every mutation is a named operation.
//! - [`derive`] and [`chart`] compute what to draw from the current state.
//!
//! # Conventions
//!
//! - **Errors**: [`error::OkrError`] at load boundaries; `anyhow::Result` for config plumbing.
//! - **Logging**: Use `tracing` macros (`info!`, `warn!`, `debug!`).

pub mod chart;
pub mod config;
pub mod dataset;
pub mod derive;
pub mod error;
pub mod event;
pub mod format;
pub mod model;
pub mod store;

pub use dataset::Dataset;
pub use error::{ErrorCode, OkrError};
pub use event::{EventKind, UiEvent};
pub use store::{AppState, Drawer};
