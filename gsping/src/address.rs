//! Recognition of numeric IPv4 hosts.
//!
//! Hosts written as a dotted quad are used as-is and never go through DNS.
//! Anything else is treated as a name and resolved by
//! [`resolve_ipv4`](crate::tokio::resolve_ipv4).

use std::net::Ipv4Addr;

use crate::Error;

/// Checks whether `host` is four groups of one to three ASCII digits
/// separated by dots.
///
/// This is a purely lexical check: `999.1.1.1` matches even though it is
/// not a valid address.
#[must_use]
pub fn is_dotted_quad(host: &str) -> bool {
    let mut groups = 0;
    for group in host.split('.') {
        groups += 1;
        if groups > 4 || group.is_empty() || group.len() > 3 {
            return false;
        }
        if !group.bytes().all(|b| b.is_ascii_digit()) {
            return false;
        }
    }
    groups == 4
}

/// Parses a dotted-quad host into its four octets, most significant first.
///
/// Returns `Ok(None)` when `host` is not a dotted quad at all, so the caller
/// should resolve it as a name instead.
///
/// # Errors
/// [`Error::InvalidAddress`] if the host is a dotted quad but an octet is
/// larger than 255.
pub fn parse_dotted_quad(host: &str) -> Result<Option<Ipv4Addr>, Error> {
    if !is_dotted_quad(host) {
        return Ok(None);
    }
    let mut octets = [0u8; 4];
    for (octet, group) in octets.iter_mut().zip(host.split('.')) {
        *octet = group.parse().map_err(|_| Error::InvalidAddress)?;
    }
    Ok(Some(Ipv4Addr::from(octets)))
}
