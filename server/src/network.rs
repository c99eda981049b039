//! UDP network layer answering legacy discovery queries.

use log::{debug, error, info, warn};
use protocol::envelope::{
    self, Envelope, ProtocolError, GET_BIG_SERVER_INFO, GET_SMALL_SERVER_INFO, LOGOUT,
};
use protocol::{build_long_info, build_short_info, ProtocolRevision, ServerDescriptor};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::UdpSocket;

/// Receive buffer size; discovery queries are a few dozen bytes at most.
const BUFFER_SIZE: usize = 1024;

/// UDP responder for the legacy discovery protocol.
///
/// The socket is shared between the receive loop and per-datagram reply
/// tasks; the codec underneath is stateless, so datagrams can be handled
/// in any order and fully concurrently.
pub struct DiscoveryServer {
    socket: Arc<UdpSocket>,
    descriptor: Arc<ServerDescriptor>,
    revision: ProtocolRevision,
}

impl DiscoveryServer {
    /// Binds the UDP socket and prepares the responder.
    pub async fn bind(
        addr: &str,
        descriptor: ServerDescriptor,
        revision: ProtocolRevision,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        let socket = Arc::new(UdpSocket::bind(addr).await?);
        info!(
            "Server '{}' listening on {}, advertising port {}",
            descriptor.name,
            socket.local_addr()?,
            descriptor.port
        );

        Ok(DiscoveryServer {
            socket,
            descriptor: Arc::new(descriptor),
            revision,
        })
    }

    /// Local address of the bound socket.
    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.socket.local_addr()
    }

    /// Runs the receive loop, spawning a handler task per datagram.
    pub async fn run(&self) -> Result<(), Box<dyn std::error::Error>> {
        let mut buffer = [0u8; BUFFER_SIZE];

        loop {
            match self.socket.recv_from(&mut buffer).await {
                Ok((len, addr)) => {
                    debug!("received {} bytes from {}", len, addr);

                    let socket = Arc::clone(&self.socket);
                    let descriptor = Arc::clone(&self.descriptor);
                    let revision = self.revision;
                    let data = buffer[..len].to_vec();

                    tokio::spawn(async move {
                        handle_datagram(&socket, &descriptor, revision, &data, addr).await;
                    });
                }
                Err(e) => {
                    error!("Error receiving datagram: {}", e);
                    tokio::time::sleep(Duration::from_millis(10)).await;
                }
            }
        }
    }
}

/// Decodes one datagram, dispatches on its descriptor and sends the reply
/// when one is due. A bad datagram is logged and dropped; it never takes
/// the server down.
async fn handle_datagram(
    socket: &UdpSocket,
    descriptor: &ServerDescriptor,
    revision: ProtocolRevision,
    data: &[u8],
    addr: SocketAddr,
) {
    let envelope = match Envelope::decode(data) {
        Ok(envelope) => envelope,
        Err(ProtocolError::MalformedEnvelope { len }) => {
            warn!("dropping malformed datagram from {} ({} bytes)", addr, len);
            return;
        }
        Err(e) => {
            warn!("dropping datagram from {}: {}", addr, e);
            return;
        }
    };

    match envelope.descriptor_id {
        GET_SMALL_SERVER_INFO => {
            debug!("GetSmallServerInfo request from {}", addr);
            let payload = build_short_info(descriptor.port, &descriptor.hostname);
            send_reply(socket, envelope::SMALL_SERVER_INFO, &payload, addr).await;
        }
        GET_BIG_SERVER_INFO => {
            debug!("GetBigServerInfo request from {}", addr);
            let payload = build_long_info(descriptor, revision);
            send_reply(socket, envelope::BIG_SERVER_INFO, &payload, addr).await;
        }
        LOGOUT => {
            // Graceful disconnect, nothing to answer.
            debug!("logout from {}", addr);
        }
        other => {
            debug!("unknown descriptor {} from {}", other, addr);
        }
    }
}

async fn send_reply(socket: &UdpSocket, descriptor_id: u16, payload: &[u8], addr: SocketAddr) {
    let packet = Envelope::encode(descriptor_id, payload);
    if let Err(e) = socket.send_to(&packet, addr).await {
        error!("Failed to send reply {} to {}: {}", descriptor_id, addr, e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn test_server() -> DiscoveryServer {
        DiscoveryServer::bind(
            "127.0.0.1:0",
            ServerDescriptor::new("Test Server", "", 4534),
            ProtocolRevision::default(),
        )
        .await
        .expect("Failed to bind test server")
    }

    #[tokio::test]
    async fn test_bind_ephemeral_port() {
        let server = test_server().await;
        let addr = server.local_addr().unwrap();
        assert!(addr.port() != 0);
    }

    #[tokio::test]
    async fn test_small_info_request_gets_reply() {
        let server = test_server().await;
        let server_addr = server.local_addr().unwrap();
        tokio::spawn(async move {
            let _ = server.run().await;
        });

        let client = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        let request = Envelope::encode(GET_SMALL_SERVER_INFO, &[]);
        client.send_to(&request, server_addr).await.unwrap();

        let mut buf = [0u8; BUFFER_SIZE];
        let (len, from) =
            tokio::time::timeout(Duration::from_secs(1), client.recv_from(&mut buf))
                .await
                .expect("timed out waiting for reply")
                .unwrap();

        assert_eq!(from, server_addr);
        let reply = Envelope::decode(&buf[..len]).unwrap();
        assert_eq!(reply.descriptor_id, envelope::SMALL_SERVER_INFO);
        assert_eq!(reply.message_id, 0);
        // payload starts with the word-swapped advertised port
        assert_eq!(reply.payload[0..4], [0x11, 0xB6, 0x00, 0x00]);
    }

    #[tokio::test]
    async fn test_big_info_request_gets_reply() {
        let server = test_server().await;
        let server_addr = server.local_addr().unwrap();
        tokio::spawn(async move {
            let _ = server.run().await;
        });

        let client = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        let request = Envelope::encode(GET_BIG_SERVER_INFO, &[]);
        client.send_to(&request, server_addr).await.unwrap();

        let mut buf = [0u8; BUFFER_SIZE];
        let (len, _) = tokio::time::timeout(Duration::from_secs(1), client.recv_from(&mut buf))
            .await
            .expect("timed out waiting for reply")
            .unwrap();

        let reply = Envelope::decode(&buf[..len]).unwrap();
        assert_eq!(reply.descriptor_id, envelope::BIG_SERVER_INFO);
    }

    #[tokio::test]
    async fn test_malformed_and_unknown_get_no_reply() {
        let server = test_server().await;
        let server_addr = server.local_addr().unwrap();
        tokio::spawn(async move {
            let _ = server.run().await;
        });

        let client = UdpSocket::bind("127.0.0.1:0").await.unwrap();

        // Too short for the header, then an unrecognized descriptor, then
        // a logout; none of them may produce a reply.
        client.send_to(&[1, 2, 3], server_addr).await.unwrap();
        let unknown = Envelope::encode(999, &[]);
        client.send_to(&unknown, server_addr).await.unwrap();
        let logout = Envelope::encode(LOGOUT, &[]);
        client.send_to(&logout, server_addr).await.unwrap();

        let mut buf = [0u8; BUFFER_SIZE];
        let result =
            tokio::time::timeout(Duration::from_millis(200), client.recv_from(&mut buf)).await;
        assert!(result.is_err(), "server must stay silent");
    }
}
