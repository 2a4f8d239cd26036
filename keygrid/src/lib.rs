// Copyright 2025 the Keygrid Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Keygrid: move and click the pointer by typing grid codes.
//!
//! This crate wires the pure components of the workspace to a display:
//!
//! - [`App`] owns all runtime state and runs the event loop. Each key press
//!   goes to the chord detector first and, while the overlay is focused, to the
//!   navigator; the navigator's effects are carried out in order.
//! - [`Platform`] is the seam to the windowing system. [`X11Platform`] is the
//!   production implementation; tests drive [`App`] with a recording fake.
//! - [`Config`] resolves the command line ([`Args`]).
//!
//! ## Example
//!
//! ```rust
//! use std::time::Duration;
//! use keygrid::{Args, Config};
//!
//! let args = Args { timeout: Some("5".into()) };
//! assert_eq!(Config::from_args(&args).idle_timeout, Duration::from_secs(5));
//!
//! // Unusable values fall back to the default.
//! let args = Args { timeout: Some("-1".into()) };
//! assert_eq!(Config::from_args(&args), Config::default());
//! ```

mod app;
mod config;
mod error;
mod platform;
mod x11;

pub use app::{App, IDLE_POLL};
pub use config::{Args, Config, DEFAULT_IDLE_TIMEOUT, parse_timeout};
pub use error::{Error, Result};
pub use platform::{Platform, PlatformEvent};
pub use x11::{OVERLAY_OPACITY, X11Platform};
