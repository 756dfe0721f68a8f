//! Implementation of the SA-MP server query protocol.
//! [Query Mechanism](https://sampwiki.blast.hk/wiki/Query_Mechanism)

use std::{
    io::{self, Cursor},
    net::Ipv4Addr,
    time::Duration,
};

use byteorder::{LittleEndian, ReadBytesExt};

use crate::Error;

/// The default port of a SA-MP server.
pub const DEFAULT_PORT: u16 = 7777;

/// How long to wait for the reply datagram.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(5000);

/// Every query packet, and every reply, starts with these bytes.
pub const QUERY_MAGIC: &[u8; 4] = b"SAMP";

/// Opcode of the "server information" query.
pub const INFO_OPCODE: u8 = b'i';

/// Magic, address, port and opcode. Servers echo it back in front of the reply.
pub const HEADER_LEN: usize = 11;

/// The info query carries no version, so every answer is attributed to this one.
pub const REPORTED_VERSION: &str = "0.3.7";

/// Configuration for querying a SA-MP server.
///
/// # Examples
///
/// ```
/// use gsping::Samp;
/// use std::net::Ipv4Addr;
///
/// let samp_config = Samp::new(Ipv4Addr::new(51, 178, 138, 254), 7777);
/// assert_eq!(samp_config.probe()[..4], *b"SAMP");
/// ```
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct Samp {
    /// The already resolved server address.
    pub address: Ipv4Addr,
    /// The game port, which SA-MP also answers queries on.
    pub port: u16,
    /// The time to wait for a reply after the probe has been sent.
    pub timeout: Duration,
}

impl Samp {
    #[must_use]
    pub const fn new(address: Ipv4Addr, port: u16) -> Self {
        Self {
            address,
            port,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Builds the 11 byte info query for this server.
    #[must_use]
    pub fn probe(&self) -> [u8; HEADER_LEN] {
        let mut packet = [0u8; HEADER_LEN];
        packet[..4].copy_from_slice(QUERY_MAGIC);
        packet[4..8].copy_from_slice(&self.address.octets());
        packet[8..10].copy_from_slice(&self.port.to_le_bytes());
        packet[10] = INFO_OPCODE;
        packet
    }
}

/// SA-MP info query reply.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct SampResponse {
    /// Whether joining requires a password.
    pub password: bool,
    /// The number of players online.
    pub players: u16,
    /// The maximum number of players that could be online at once.
    pub max_players: u16,
    pub hostname: String,
    pub gamemode: String,
    /// The language the server advertises, free-form (ex: "English").
    pub language: String,
    /// Always [`REPORTED_VERSION`].
    pub version: String,
}

impl SampResponse {
    /// Decodes an info reply datagram.
    ///
    /// Layout after the echoed header:
    ///
    /// Password flag (u8, nonzero when set)
    /// Players (u16 LE)
    /// Max players (u16 LE)
    /// Hostname (u32 LE length, then bytes)
    /// Gamemode (u32 LE length, then bytes)
    /// Language (u32 LE length, then bytes)
    pub(crate) fn extract(datagram: &[u8]) -> Result<Self, Error> {
        if !datagram.starts_with(QUERY_MAGIC) {
            return Err(Error::InvalidMagic);
        }
        let payload = datagram.get(HEADER_LEN..).ok_or(Error::Truncated)?;
        let mut cursor = Cursor::new(payload);

        let password = cursor.read_u8().map_err(truncated)? != 0;
        let players = cursor.read_u16::<LittleEndian>().map_err(truncated)?;
        let max_players = cursor.read_u16::<LittleEndian>().map_err(truncated)?;
        let hostname = read_string(&mut cursor)?;
        let gamemode = read_string(&mut cursor)?;
        let language = read_string(&mut cursor)?;

        Ok(Self {
            password,
            players,
            max_players,
            hostname,
            gamemode,
            language,
            version: REPORTED_VERSION.to_string(),
        })
    }
}

#[allow(clippy::needless_pass_by_value)]
fn truncated(_: io::Error) -> Error {
    Error::Truncated
}

/// Reads a u32 length-prefixed string, one char per byte.
fn read_string(cursor: &mut Cursor<&[u8]>) -> Result<String, Error> {
    let len = cursor.read_u32::<LittleEndian>().map_err(truncated)?;
    let len = usize::try_from(len).map_err(|_| Error::Truncated)?;
    let start = usize::try_from(cursor.position()).map_err(|_| Error::Truncated)?;
    let end = start.checked_add(len).ok_or(Error::Truncated)?;
    let bytes = cursor.get_ref().get(start..end).ok_or(Error::Truncated)?;
    cursor.set_position(end as u64);
    Ok(bytes.iter().copied().map(char::from).collect())
}
