//! Send command implementation.

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use tokio::net::UdpSocket;
use tokio::signal;
use tokio::time::sleep;

use blendlink_core::probe::{send_frame, synthetic_frame};

use crate::cli::SendArgs;
use crate::error::CliError;

/// Run the send command
pub async fn run_send(args: SendArgs, ndjson: bool) -> Result<(), CliError> {
    let bind_addr = if args.target.is_ipv4() {
        "0.0.0.0:0"
    } else {
        "[::]:0"
    };
    let socket = UdpSocket::bind(bind_addr).await?;

    let pb = if ndjson || args.count == 0 {
        None
    } else {
        let pb = ProgressBar::new(args.count);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} frames")
                .unwrap()
                .progress_chars("#>-"),
        );
        Some(pb)
    };

    let mut sent = 0u64;

    loop {
        let frame = synthetic_frame(sent);
        send_frame(&socket, args.target, &frame).await?;
        sent += 1;

        if let Some(pb) = &pb {
            pb.inc(1);
        }

        if args.count > 0 && sent >= args.count {
            break;
        }

        tokio::select! {
            _ = signal::ctrl_c() => break,
            _ = sleep(Duration::from_millis(args.interval)) => {}
        }
    }

    if let Some(pb) = &pb {
        pb.finish_and_clear();
    }

    if ndjson {
        let output = serde_json::json!({
            "event": "sent",
            "frames": sent,
            "target": args.target.to_string()
        });
        println!("{}", serde_json::to_string(&output).unwrap());
    } else {
        println!("Sent {} frame(s) to {}", sent, args.target);
    }

    Ok(())
}
