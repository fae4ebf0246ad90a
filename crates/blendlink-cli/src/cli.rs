//! CLI argument definitions using clap.

use std::net::{IpAddr, SocketAddr};

use clap::{Args, Parser, Subcommand};

/// BlendLink CLI - diagnostics for blendshape UDP streams
#[derive(Parser, Debug)]
#[command(name = "blendlink-cli")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output as newline-delimited JSON (NDJSON)
    #[arg(long, global = true)]
    pub ndjson: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Listen for blendshape packets and summarize each one
    Listen(ListenArgs),

    /// Send synthetic blendshape frames
    Send(SendArgs),
}

// ==================== Listen ====================

#[derive(Args, Debug)]
pub struct ListenArgs {
    /// Address to bind
    #[arg(long, default_value = "127.0.0.1")]
    pub host: IpAddr,

    /// UDP port to listen on
    #[arg(short, long, default_value = "8883", env = "BLENDLINK_PORT")]
    pub port: u16,

    /// Idle window in seconds before printing a heartbeat notice
    #[arg(long, default_value = "5")]
    pub idle_timeout: u64,

    /// Receive buffer size in bytes; larger payloads are truncated
    #[arg(long, default_value = "4096")]
    pub buffer_size: usize,

    /// Blendshape key to sample (glob-style, e.g. "mouth*"; repeatable)
    #[arg(short, long)]
    pub key: Vec<String>,
}

// ==================== Send ====================

#[derive(Args, Debug)]
pub struct SendArgs {
    /// Target address
    #[arg(long, default_value = "127.0.0.1:8883")]
    pub target: SocketAddr,

    /// Number of frames to send (0 = until interrupted)
    #[arg(short, long, default_value = "50")]
    pub count: u64,

    /// Delay between frames in milliseconds
    #[arg(short, long, default_value = "100")]
    pub interval: u64,
}
