//! BlendLink core library.
//!
//! Framework-agnostic building blocks for blendshape stream diagnostics:
//! the UDP listener service, payload summarization, and the synthetic
//! frame probe.

pub mod error;
pub mod listener;
pub mod probe;
pub mod types;

pub use listener::{ListenerConfig, ListenerEvent, ListenerService};
pub use types::ReceivedDatagram;
