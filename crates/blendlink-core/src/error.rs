//! Error types for BlendLink core.

use std::net::SocketAddr;

use thiserror::Error;

/// Listener service errors.
///
/// A bind failure is fatal to the listener; it is reported once and never
/// retried.
#[derive(Debug, Error)]
pub enum ListenError {
    #[error("Failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    #[error("Socket error: {0}")]
    Io(#[from] std::io::Error),
}

/// Frame probe errors
#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("Failed to encode frame: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("Socket error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bind_error_names_the_address() {
        let err = ListenError::Bind {
            addr: "127.0.0.1:8883".parse().unwrap(),
            source: std::io::Error::new(std::io::ErrorKind::AddrInUse, "address in use"),
        };
        assert!(format!("{}", err).contains("127.0.0.1:8883"));
        assert!(format!("{}", err).contains("address in use"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::ConnectionReset, "reset");
        let err: ListenError = io.into();
        assert!(matches!(err, ListenError::Io(_)));
    }
}
