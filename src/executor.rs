use gsping::{
    tokio::{get_status, resolve_ipv4, ResolveIpv4, TokioAsyncResolver},
    Rage, Samp,
};
use reqwest::Client;

use crate::structures::ServerStatus;

/// The server families that can be queried.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Protocol {
    /// Binary UDP query on the game port.
    Samp,
    /// JSON status documents on the game port plus one.
    Rage,
}

impl Protocol {
    /// The game port assumed when the caller does not give one.
    #[must_use]
    pub const fn default_port(self) -> u16 {
        match self {
            Self::Samp => gsping::samp::DEFAULT_PORT,
            Self::Rage => gsping::rage::DEFAULT_PORT,
        }
    }
}

/// The host did not resolve to any IPv4 address, so nothing was queried.
#[derive(thiserror::Error, Debug)]
#[error("could not resolve host `{host}`")]
pub struct Unresolvable {
    pub host: String,
    pub port: u16,
    #[source]
    pub source: gsping::Error,
}

/// Single entry point for status queries.
///
/// Holds no per-query state: every call resolves, opens its own socket or
/// requests, and drops them before returning.
#[derive(Debug, Clone)]
pub struct Pinger<R = TokioAsyncResolver> {
    resolver: R,
    http: Client,
}

impl<R: ResolveIpv4 + Sync> Pinger<R> {
    pub const fn new(resolver: R, http: Client) -> Self {
        Self { resolver, http }
    }

    /// Queries `host`, keeping resolution failures apart from servers that
    /// did not answer.
    ///
    /// # Errors
    /// [`Unresolvable`] if the host has no IPv4 address. Every other failure
    /// yields [`ServerStatus::offline`].
    pub async fn try_query(
        &self,
        host: &str,
        port: Option<u16>,
        protocol: Protocol,
    ) -> Result<ServerStatus, Unresolvable> {
        let port = port.unwrap_or_else(|| protocol.default_port());
        let address = match resolve_ipv4(&self.resolver, host).await {
            Ok(address) => address,
            Err(source) => {
                info!(host, error = %source, "Could not resolve host");
                return Err(Unresolvable {
                    host: host.to_string(),
                    port,
                    source,
                });
            }
        };

        let status = match protocol {
            Protocol::Samp => get_status(Samp::new(address, port))
                .await
                .map(|(latency, response)| ServerStatus::from_samp(host, port, latency, response)),
            Protocol::Rage => get_status(Rage::new(self.http.clone(), address, port))
                .await
                .map(|(_, response)| ServerStatus::from_rage(host, port, response)),
        };
        Ok(status.unwrap_or_else(|error| {
            debug!(host, %address, port, ?protocol, %error, "Server is offline");
            ServerStatus::offline(host, port)
        }))
    }

    /// Queries `host`. Never fails: anything that goes wrong, including an
    /// unresolvable host, yields [`ServerStatus::offline`].
    pub async fn query(&self, host: &str, port: Option<u16>, protocol: Protocol) -> ServerStatus {
        match self.try_query(host, port, protocol).await {
            Ok(status) => status,
            Err(unresolvable) => ServerStatus::offline(host, unresolvable.port),
        }
    }
}
