use std::{
    net::{Ipv4Addr, SocketAddrV4},
    time::Instant,
};

use tokio::net::UdpSocket;
use tracing::{debug, trace};

use super::AsyncPingable;
use crate::{Error, Samp, SampResponse};

/// Large enough for any info reply; longer datagrams are cut and fail to parse.
const MAX_DATAGRAM: usize = 4096;

impl AsyncPingable for Samp {
    type Response = SampResponse;

    async fn ping(self) -> Result<(u64, Self::Response), Error> {
        let target = SocketAddrV4::new(self.address, self.port);
        let socket = UdpSocket::bind((Ipv4Addr::UNSPECIFIED, 0)).await?;
        socket.connect(target).await?;

        let start = Instant::now();
        socket.send(&self.probe()).await?;
        trace!(%target, "Sent info query");

        let mut buf = [0u8; MAX_DATAGRAM];
        #[allow(clippy::redundant_pub_crate)]
        let len = tokio::select! {
            received = socket.recv(&mut buf) => received?,
            () = tokio::time::sleep(self.timeout) => {
                debug!(%target, timeout = ?self.timeout, "Query timed out");
                return Err(Error::TimedOut);
            }
        };
        let latency = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);
        trace!(%target, len, latency, "Received reply");

        let response = SampResponse::extract(&buf[..len])?;
        Ok((latency, response))
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::tokio::get_status;

    async fn fake_server() -> (UdpSocket, u16) {
        let socket = UdpSocket::bind((Ipv4Addr::LOCALHOST, 0)).await.unwrap();
        let port = socket.local_addr().unwrap().port();
        (socket, port)
    }

    fn info_payload() -> Vec<u8> {
        let mut payload = vec![1];
        payload.extend_from_slice(&12u16.to_le_bytes());
        payload.extend_from_slice(&50u16.to_le_bytes());
        for text in ["Loopback RP", "Roleplay", "Romana"] {
            payload.extend_from_slice(&u32::try_from(text.len()).unwrap().to_le_bytes());
            payload.extend_from_slice(text.as_bytes());
        }
        payload
    }

    #[tokio::test]
    async fn test_ping_answering_server() {
        let (server, port) = fake_server().await;
        let expected_probe = Samp::new(Ipv4Addr::LOCALHOST, port).probe();
        tokio::spawn(async move {
            let mut buf = [0u8; 64];
            let (len, peer) = server.recv_from(&mut buf).await.unwrap();
            assert_eq!(&buf[..len], &expected_probe);
            let mut reply = buf[..len].to_vec();
            reply.extend(info_payload());
            server.send_to(&reply, peer).await.unwrap();
        });

        let (latency, response) = get_status(Samp::new(Ipv4Addr::LOCALHOST, port))
            .await
            .unwrap();
        assert!(latency < 5000);
        assert!(response.password);
        assert_eq!(response.players, 12);
        assert_eq!(response.max_players, 50);
        assert_eq!(response.hostname, "Loopback RP");
        assert_eq!(response.gamemode, "Roleplay");
        assert_eq!(response.language, "Romana");
        assert_eq!(response.version, "0.3.7");
    }

    #[tokio::test]
    async fn test_ping_malformed_reply() {
        let (server, port) = fake_server().await;
        tokio::spawn(async move {
            let mut buf = [0u8; 64];
            let (_, peer) = server.recv_from(&mut buf).await.unwrap();
            server.send_to(b"NOPE", peer).await.unwrap();
        });

        let result = get_status(Samp::new(Ipv4Addr::LOCALHOST, port)).await;
        assert!(matches!(result, Err(Error::InvalidMagic)));
    }

    #[tokio::test]
    async fn test_ping_short_timeout() {
        let (_server, port) = fake_server().await;
        let mut samp = Samp::new(Ipv4Addr::LOCALHOST, port);
        samp.timeout = Duration::from_millis(200);

        let start = Instant::now();
        let result = get_status(samp).await;
        assert!(matches!(result, Err(Error::TimedOut)));
        assert!(start.elapsed() >= Duration::from_millis(200));
    }
}
