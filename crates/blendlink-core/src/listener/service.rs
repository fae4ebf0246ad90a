//! Framework-agnostic blendshape listener service.
//!
//! Uses SO_REUSEPORT to allow concurrent operation with other listeners.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Duration;

use chrono::{DateTime, Local};
use socket2::{Domain, Protocol, Socket, Type};
use tokio::net::UdpSocket;
use tokio::time::timeout;

use crate::error::ListenError;
use crate::types::ReceivedDatagram;

/// Default UDP listen port for the blendshape debug pipe
pub const DEFAULT_LISTEN_PORT: u16 = 8883;

/// Idle window after which a heartbeat event is reported
pub const DEFAULT_IDLE_TIMEOUT: Duration = Duration::from_secs(5);

/// Receive buffer capacity; larger payloads are truncated by the transport
pub const DEFAULT_RECV_BUFFER: usize = 4096;

/// Create a UDP socket with SO_REUSEPORT for concurrent operation.
pub fn create_reusable_socket(addr: SocketAddr) -> Result<std::net::UdpSocket, std::io::Error> {
    let socket = Socket::new(Domain::for_address(addr), Type::DGRAM, Some(Protocol::UDP))?;

    socket.set_reuse_address(true)?;

    #[cfg(unix)]
    socket.set_reuse_port(true)?;

    socket.bind(&addr.into())?;

    socket.set_nonblocking(true)?;

    Ok(socket.into())
}

/// Listener configuration; defaults match the desktop app's debug pipe.
#[derive(Debug, Clone)]
pub struct ListenerConfig {
    /// Address to bind
    pub host: IpAddr,
    /// UDP port to listen on
    pub port: u16,
    /// Idle window with no traffic before an [`ListenerEvent::Idle`] is reported
    pub idle_timeout: Duration,
    /// Receive buffer capacity in bytes
    pub recv_buffer: usize,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: DEFAULT_LISTEN_PORT,
            idle_timeout: DEFAULT_IDLE_TIMEOUT,
            recv_buffer: DEFAULT_RECV_BUFFER,
        }
    }
}

/// One observable event from the listener.
#[derive(Debug)]
pub enum ListenerEvent {
    /// A datagram arrived.
    Datagram(ReceivedDatagram),
    /// No datagram arrived within the idle window.
    Idle { at: DateTime<Local> },
}

/// Framework-agnostic listener service.
///
/// Owns the socket and the receive counter; the socket is released when
/// the service is dropped.
pub struct ListenerService {
    socket: UdpSocket,
    idle_timeout: Duration,
    buf: Vec<u8>,
    received: u64,
}

impl ListenerService {
    /// Bind a new listener service.
    pub async fn bind(config: &ListenerConfig) -> Result<Self, ListenError> {
        let addr = SocketAddr::new(config.host, config.port);
        let std_socket =
            create_reusable_socket(addr).map_err(|source| ListenError::Bind { addr, source })?;
        let socket = UdpSocket::from_std(std_socket)?;

        Ok(Self {
            socket,
            idle_timeout: config.idle_timeout,
            buf: vec![0u8; config.recv_buffer],
            received: 0,
        })
    }

    /// Local address the service is bound to.
    pub fn local_addr(&self) -> Result<SocketAddr, ListenError> {
        Ok(self.socket.local_addr()?)
    }

    /// Number of datagrams received so far.
    pub fn received(&self) -> u64 {
        self.received
    }

    /// Wait for the next event: a datagram, or an idle notice once the
    /// configured window elapses without traffic.
    pub async fn next_event(&mut self) -> Result<ListenerEvent, ListenError> {
        match timeout(self.idle_timeout, self.socket.recv_from(&mut self.buf)).await {
            Ok(Ok((len, addr))) => {
                self.received += 1;
                Ok(ListenerEvent::Datagram(ReceivedDatagram {
                    seq: self.received,
                    received_at: Local::now(),
                    source: addr,
                    payload: self.buf[..len].to_vec(),
                }))
            }
            Ok(Err(e)) => Err(e.into()),
            Err(_) => Ok(ListenerEvent::Idle { at: Local::now() }),
        }
    }
}
