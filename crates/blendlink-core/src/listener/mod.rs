//! UDP blendshape listener module.
//!
//! Provides payload summarization and a framework-agnostic listener service.

pub mod service;
pub mod summary;

pub use service::{ListenerConfig, ListenerEvent, ListenerService};
pub use summary::{summarize, KeyFilter, PayloadSummary, RawPreview};
