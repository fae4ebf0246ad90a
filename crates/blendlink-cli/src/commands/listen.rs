//! Listen command implementation.

use std::collections::BTreeMap;
use std::io::{self, Write};
use std::time::Duration;

use chrono::{DateTime, Local, SecondsFormat};
use colored::*;
use serde_json::Value;
use tokio::signal;

use blendlink_core::listener::{
    summarize, KeyFilter, ListenerConfig, ListenerEvent, ListenerService, PayloadSummary,
};
use blendlink_core::types::ReceivedDatagram;

use crate::cli::ListenArgs;
use crate::error::CliError;

/// Run the listen command
pub async fn run_listen(args: ListenArgs, ndjson: bool) -> Result<(), CliError> {
    let keys = if args.key.is_empty() {
        KeyFilter::default()
    } else {
        KeyFilter::new(&args.key)
            .map_err(|e| CliError::InvalidArgument(format!("Invalid key pattern: {}", e)))?
    };

    let config = ListenerConfig {
        host: args.host,
        port: args.port,
        idle_timeout: Duration::from_secs(args.idle_timeout),
        recv_buffer: args.buffer_size,
    };

    let mut service = ListenerService::bind(&config).await?;

    if !ndjson {
        println!(
            "Listening for blendshape packets on {} (idle notice after {}s)",
            service.local_addr()?,
            args.idle_timeout
        );
        println!("Press Ctrl+C to stop.\n");
    }

    loop {
        tokio::select! {
            _ = signal::ctrl_c() => break,
            event = service.next_event() => match event? {
                ListenerEvent::Datagram(dgram) => {
                    print_datagram(&dgram, &keys, ndjson);
                    io::stdout().flush().ok();
                }
                ListenerEvent::Idle { at } => {
                    print_idle(at, args.idle_timeout, ndjson);
                }
            }
        }
    }

    if ndjson {
        let output = serde_json::json!({
            "event": "shutdown",
            "received": service.received()
        });
        println!("{}", serde_json::to_string(&output).unwrap());
    } else {
        println!("\nShutting down listener...");
    }

    Ok(())
}

fn print_datagram(dgram: &ReceivedDatagram, keys: &KeyFilter, ndjson: bool) {
    let summary = summarize(&dgram.payload, keys);

    if ndjson {
        let output = datagram_json(dgram, &summary);
        println!("{}", serde_json::to_string(&output).unwrap());
        return;
    }

    println!(
        "{} {} from {} ({} bytes)",
        format!("[{}]", dgram.received_at.format("%H:%M:%S%.3f")).dimmed(),
        format!("#{}", dgram.seq).bold(),
        dgram.source,
        dgram.payload.len()
    );

    match summary {
        PayloadSummary::Frame { sampled, total } => {
            println!("  sample: {}", render_sample(&sampled));
            println!("  blendshapes: {}", total);
        }
        PayloadSummary::Malformed { error, preview } => {
            println!("  {} {}", "parse error:".red(), error);
            let raw = String::from_utf8_lossy(&preview.bytes);
            if preview.truncated {
                println!("  raw: {}...", raw);
            } else {
                println!("  raw: {}", raw);
            }
        }
    }
}

fn print_idle(at: DateTime<Local>, window_secs: u64, ndjson: bool) {
    if ndjson {
        let output = serde_json::json!({
            "event": "idle",
            "ts": at.to_rfc3339_opts(SecondsFormat::Secs, false),
            "window_secs": window_secs
        });
        println!("{}", serde_json::to_string(&output).unwrap());
        return;
    }

    println!(
        "{} {}",
        format!("[{}]", at.format("%H:%M:%S")).dimmed(),
        format!("no data received for {} seconds...", window_secs).yellow()
    );
}

fn render_sample(sampled: &BTreeMap<String, Value>) -> String {
    serde_json::to_string(sampled).unwrap_or_else(|_| "{}".to_string())
}

fn datagram_json(dgram: &ReceivedDatagram, summary: &PayloadSummary) -> Value {
    let mut output = serde_json::json!({
        "seq": dgram.seq,
        "ts": dgram.received_at.to_rfc3339_opts(SecondsFormat::Millis, false),
        "from": dgram.source.to_string(),
        "size": dgram.payload.len()
    });

    match summary {
        PayloadSummary::Frame { sampled, total } => {
            output["sample"] = serde_json::to_value(sampled).unwrap_or_default();
            output["total"] = (*total).into();
        }
        PayloadSummary::Malformed { error, preview } => {
            output["error"] = error.as_str().into();
            output["raw"] = String::from_utf8_lossy(&preview.bytes).into_owned().into();
            output["truncated"] = preview.truncated.into();
        }
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::SocketAddr;

    fn make_datagram(payload: &[u8]) -> ReceivedDatagram {
        ReceivedDatagram {
            seq: 1,
            received_at: Local::now(),
            source: "127.0.0.1:9999".parse::<SocketAddr>().unwrap(),
            payload: payload.to_vec(),
        }
    }

    #[test]
    fn test_datagram_json_frame() {
        let dgram = make_datagram(br#"{"data":{"jawOpen":0.5,"eyeBlinkLeft":0.2}}"#);
        let summary = summarize(&dgram.payload, &KeyFilter::default());
        let json = datagram_json(&dgram, &summary);

        assert_eq!(json["seq"], 1);
        assert_eq!(json["total"], 2);
        assert_eq!(json["sample"]["jawOpen"], 0.5);
        assert!(json["sample"].get("eyeBlinkLeft").is_none());
    }

    #[test]
    fn test_datagram_json_malformed() {
        let dgram = make_datagram(b"{not json");
        let summary = summarize(&dgram.payload, &KeyFilter::default());
        let json = datagram_json(&dgram, &summary);

        assert!(json["error"].as_str().unwrap().contains("invalid JSON"));
        assert_eq!(json["raw"], "{not json");
        assert_eq!(json["truncated"], false);
    }

    #[test]
    fn test_render_sample_is_compact_json() {
        let mut sampled = BTreeMap::new();
        sampled.insert("jawOpen".to_string(), Value::from(0.5));
        assert_eq!(render_sample(&sampled), r#"{"jawOpen":0.5}"#);
    }
}
