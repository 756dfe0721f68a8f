mod rage;
mod samp;

use std::net::Ipv4Addr;

pub use hickory_resolver::TokioAsyncResolver;
use hickory_resolver::config::{ResolverConfig, ResolverOpts};
use tracing::debug;

use crate::{Error, address::parse_dotted_quad};

/// Represents a pingable entity.
pub trait AsyncPingable {
    /// The type of response that is expected in reply to the ping.
    type Response;

    /// Ping the entity, gathering the latency and response.
    fn ping(self)
    -> impl std::future::Future<Output = Result<(u64, Self::Response), Error>> + Send;
}

/// Retrieve the status of a given game server using a `AsyncPingable` configuration.
///
///
/// Returns `(latency_ms, response)` where response is a response type of the
/// `AsyncPingable` configuration.
///
/// # Examples
///
/// Query a SA-MP server, waiting the default five seconds for a reply:
///
/// ```no_run
/// # async {
/// use std::net::Ipv4Addr;
///
/// let (latency, response) =
///     gsping::tokio::get_status(gsping::Samp::new(Ipv4Addr::new(51, 178, 138, 254), 7777)).await?;
/// # Ok::<(), gsping::Error>(())
/// # };
/// ```
///
/// Query a RAGE-style server through its status documents:
///
/// ```no_run
/// # async {
/// use std::net::Ipv4Addr;
///
/// let client = reqwest::Client::new();
/// let rage = gsping::Rage::new(client, Ipv4Addr::new(5, 2, 79, 12), 22005);
/// let (_, response) = gsping::tokio::get_status(rage).await?;
/// # Ok::<(), gsping::Error>(())
/// # };
/// ```
///
/// # Errors
/// If the server status cannot be received
pub async fn get_status<P: AsyncPingable + Send>(pingable: P) -> Result<(u64, P::Response), Error> {
    pingable.ping().await
}

/// Forward lookup of the A records of a host name.
pub trait ResolveIpv4 {
    /// Looks `host` up once, returning every IPv4 address in answer order.
    fn lookup_ipv4(
        &self,
        host: &str,
    ) -> impl std::future::Future<Output = Result<Vec<Ipv4Addr>, Error>> + Send;
}

impl ResolveIpv4 for TokioAsyncResolver {
    async fn lookup_ipv4(&self, host: &str) -> Result<Vec<Ipv4Addr>, Error> {
        let lookup = self.ipv4_lookup(host).await.map_err(|error| {
            debug!(host, %error, "DNS lookup failed");
            Error::DnsLookupFailed
        })?;
        Ok(lookup.iter().map(|record| record.0).collect())
    }
}

/// Turns a user supplied host into the address to query.
///
/// Dotted quads are returned without touching the resolver. Names are looked
/// up exactly once and the first A record wins.
///
/// # Errors
/// [`Error::InvalidAddress`] for a dotted quad with an octet above 255,
/// [`Error::DnsLookupFailed`] if the lookup fails or has no records.
pub async fn resolve_ipv4<R: ResolveIpv4 + Sync>(
    resolver: &R,
    host: &str,
) -> Result<Ipv4Addr, Error> {
    if let Some(address) = parse_dotted_quad(host)? {
        return Ok(address);
    }
    let address = resolver
        .lookup_ipv4(host)
        .await?
        .first()
        .copied()
        .ok_or(Error::DnsLookupFailed)?;
    debug!(host, %address, "Resolved host");
    Ok(address)
}

/// Builds an uncached resolver that gives up after a single attempt.
#[must_use]
pub fn new_resolver() -> TokioAsyncResolver {
    let config = ResolverConfig::cloudflare();
    let mut opts = ResolverOpts::default();
    opts.cache_size = 0;
    opts.attempts = 0;
    TokioAsyncResolver::tokio(config, opts)
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    struct CountingResolver {
        answer: Vec<Ipv4Addr>,
        fail: bool,
        calls: AtomicUsize,
    }

    impl CountingResolver {
        fn new(answer: Vec<Ipv4Addr>) -> Self {
            Self {
                answer,
                fail: false,
                calls: AtomicUsize::new(0),
            }
        }
    }

    impl ResolveIpv4 for CountingResolver {
        async fn lookup_ipv4(&self, _host: &str) -> Result<Vec<Ipv4Addr>, Error> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(Error::DnsLookupFailed);
            }
            Ok(self.answer.clone())
        }
    }

    #[tokio::test]
    async fn test_literal_skips_lookup() {
        let resolver = CountingResolver::new(vec![Ipv4Addr::new(9, 9, 9, 9)]);
        for host in ["192.168.1.1", "8.8.8.8", "0.0.0.0", "255.255.255.255"] {
            let address = resolve_ipv4(&resolver, host).await.unwrap();
            assert_eq!(address.to_string(), host);
        }
        assert_eq!(resolver.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_bad_literal_skips_lookup() {
        let resolver = CountingResolver::new(vec![Ipv4Addr::new(9, 9, 9, 9)]);
        let result = resolve_ipv4(&resolver, "300.1.1.1").await;
        assert!(matches!(result, Err(Error::InvalidAddress)));
        assert_eq!(resolver.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_name_takes_first_record() {
        let resolver = CountingResolver::new(vec![
            Ipv4Addr::new(1, 2, 3, 4),
            Ipv4Addr::new(5, 6, 7, 8),
        ]);
        let address = resolve_ipv4(&resolver, "samp.example.com").await.unwrap();
        assert_eq!(address, Ipv4Addr::new(1, 2, 3, 4));
        assert_eq!(resolver.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_name_without_records() {
        let resolver = CountingResolver::new(Vec::new());
        let result = resolve_ipv4(&resolver, "empty.example.com").await;
        assert!(matches!(result, Err(Error::DnsLookupFailed)));
        assert_eq!(resolver.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_name_lookup_error() {
        let mut resolver = CountingResolver::new(Vec::new());
        resolver.fail = true;
        let result = resolve_ipv4(&resolver, "nxdomain.example.com").await;
        assert!(result.unwrap_err().is_resolution());
        assert_eq!(resolver.calls.load(Ordering::SeqCst), 1);
    }
}
