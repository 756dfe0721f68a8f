#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]
//! `gsping` provides status query implementations for multiplayer game
//! servers. It can be used to query servers and collect information such as
//! the host name, game mode, player counts and whether a password is set.
//!
//! Two server families are supported: SA-MP servers, which answer a small
//! binary query over UDP, and RAGE-style servers, which publish their status
//! as JSON documents over HTTP on the game port plus one.
//!
//! The main API surface is [`tokio::get_status`].

pub mod address;
pub mod rage;
pub mod samp;
pub mod tokio;

pub use rage::{Rage, RageInfo, RageResponse};
pub use samp::{Samp, SampResponse};

/// Errors that can occur when querying a server.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("an invalid address was provided")]
    InvalidAddress,
    #[error("DNS lookup for the host provided failed")]
    DnsLookupFailed,
    #[error("the status port for game port {0} is out of range")]
    InvalidPort(u16),
    #[error("an I/O error occurred: {0}")]
    IoError(#[from] std::io::Error),
    #[error("an HTTP error occurred: {0}")]
    Http(#[from] reqwest::Error),
    #[error("the server did not answer in time")]
    TimedOut,
    #[error("the response did not start with the query magic")]
    InvalidMagic,
    #[error("the response ended before all fields were read")]
    Truncated,
    #[error("the server answered with HTTP status {0}")]
    BadStatus(u16),
    #[error("the server answered with content-type `{0}` instead of JSON")]
    NotJson(String),
    #[error("a JSON error occurred: {0}")]
    JsonErr(#[from] serde_json::Error),
}

impl Error {
    /// Whether this error means the host never resolved to an address, as
    /// opposed to the server failing to answer.
    #[must_use]
    pub const fn is_resolution(&self) -> bool {
        matches!(self, Self::InvalidAddress | Self::DnsLookupFailed)
    }
}
