//! Implementation of the HTTP status endpoints of RAGE-style servers.
//!
//! These servers publish `/info.json` and `/players.json` on their game port
//! plus one.

use std::net::Ipv4Addr;

use serde::{Deserialize, Deserializer};

use crate::Error;

/// The default game port of a RAGE-style server.
pub const DEFAULT_PORT: u16 = 22005;

pub const INFO_PATH: &str = "/info.json";
pub const PLAYERS_PATH: &str = "/players.json";

const NOT_AVAILABLE: &str = "N/A";

/// Configuration for querying a RAGE-style server.
///
/// # Examples
///
/// ```
/// use gsping::Rage;
/// use std::net::Ipv4Addr;
///
/// let rage_config = Rage::new(reqwest::Client::new(), Ipv4Addr::LOCALHOST, 22005);
/// assert_eq!(rage_config.status_port().unwrap(), 22006);
/// ```
#[derive(Debug, Clone)]
pub struct Rage {
    /// The client both documents are fetched with. Its timeouts bound the query.
    pub client: reqwest::Client,
    /// The already resolved server address.
    pub address: Ipv4Addr,
    /// The game port. The documents are served one port above it.
    pub port: u16,
}

impl Rage {
    #[must_use]
    pub const fn new(client: reqwest::Client, address: Ipv4Addr, port: u16) -> Self {
        Self {
            client,
            address,
            port,
        }
    }

    /// The port the status documents are served on.
    ///
    /// # Errors
    /// [`Error::InvalidPort`] when the game port is the last port there is.
    pub fn status_port(&self) -> Result<u16, Error> {
        self.port.checked_add(1).ok_or(Error::InvalidPort(self.port))
    }

    pub(crate) fn url(&self, path: &str) -> Result<String, Error> {
        Ok(format!("http://{}:{}{path}", self.address, self.status_port()?))
    }
}

/// The `/info.json` document.
#[derive(Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct RageInfo {
    pub name: String,
    pub maxplayers: u32,
    pub gamemode: String,
    pub language: Option<String>,
    pub version: Option<String>,
    /// Some servers send `0`/`1` rather than a boolean.
    #[serde(default, deserialize_with = "truthy")]
    pub password: bool,
}

/// Reads any JSON value as a flag: `false`, `null`, `0` and `""` are unset.
fn truthy<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    Ok(match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::Null => false,
        serde_json::Value::Bool(flag) => flag,
        serde_json::Value::Number(number) => number.as_f64().is_some_and(|n| n != 0.0),
        serde_json::Value::String(text) => !text.is_empty(),
        serde_json::Value::Array(_) | serde_json::Value::Object(_) => true,
    })
}

/// Combined view of both status documents.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RageResponse {
    pub hostname: String,
    /// The number of entries in `/players.json`.
    pub players: u32,
    pub max_players: u32,
    pub gamemode: String,
    /// `"N/A"` if the server does not advertise one.
    pub language: String,
    /// `"N/A"` if the server does not advertise one.
    pub version: String,
    pub password: bool,
}

impl RageResponse {
    /// Joins the info document with the player list.
    ///
    /// A player list that is not an array counts as nobody online.
    #[must_use]
    pub fn extract(info: RageInfo, players: &serde_json::Value) -> Self {
        let players = players
            .as_array()
            .map_or(0, |list| u32::try_from(list.len()).unwrap_or(u32::MAX));
        Self {
            hostname: info.name,
            players,
            max_players: info.maxplayers,
            gamemode: info.gamemode,
            language: or_not_available(info.language),
            version: or_not_available(info.version),
            password: info.password,
        }
    }
}

fn or_not_available(value: Option<String>) -> String {
    value
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

/// Accepts a document only if it came with a success status and a JSON
/// content-type.
pub(crate) fn ensure_json(status: u16, content_type: Option<&str>) -> Result<(), Error> {
    if !(200..300).contains(&status) {
        return Err(Error::BadStatus(status));
    }
    match content_type {
        Some(ctype) if ctype.contains("application/json") => Ok(()),
        other => Err(Error::NotJson(other.unwrap_or_default().to_string())),
    }
}
