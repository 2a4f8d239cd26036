// Copyright 2025 the Keygrid Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Fatal errors.

use x11rb::errors::{ConnectError, ConnectionError, ReplyError, ReplyOrIdError};

/// Errors that stop the overlay.
///
/// Degraded resources (a colour that cannot be allocated, a key grab that
/// fails, a warp or click the server rejects) are logged and never surface
/// here.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The display could not be opened.
    #[error("cannot open display: {0}")]
    Connect(#[from] ConnectError),

    /// The connection to the display server broke.
    #[error("display connection failed: {0}")]
    Connection(#[from] ConnectionError),

    /// The display server rejected a request.
    #[error("display request failed: {0}")]
    Reply(#[from] ReplyError),

    /// A resource id could not be allocated or the request failed.
    #[error("display resource allocation failed: {0}")]
    ReplyOrId(#[from] ReplyOrIdError),

    /// The display reported no screen with the given number.
    #[error("display has no screen {0}")]
    NoScreen(usize),

    /// A required server extension is not available.
    #[error("display lacks the {0} extension")]
    MissingExtension(&'static str),

    /// A termination signal handler could not be installed.
    #[error("cannot install signal handler: {0}")]
    Signal(#[source] std::io::Error),
}

/// Result alias used throughout the crate.
pub type Result<T, E = Error> = core::result::Result<T, E>;
