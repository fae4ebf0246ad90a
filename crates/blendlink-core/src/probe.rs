//! Synthetic blendshape traffic for exercising the listener.

use std::collections::HashMap;
use std::net::SocketAddr;

use serde::{Deserialize, Serialize};
use tokio::net::UdpSocket;

use crate::error::ProbeError;

/// The 52 standard ARKit blendshape names, as produced by face trackers.
pub const ARKIT_BLENDSHAPES: &[&str] = &[
    "browDownLeft",
    "browDownRight",
    "browInnerUp",
    "browOuterUpLeft",
    "browOuterUpRight",
    "cheekPuff",
    "cheekSquintLeft",
    "cheekSquintRight",
    "eyeBlinkLeft",
    "eyeBlinkRight",
    "eyeLookDownLeft",
    "eyeLookDownRight",
    "eyeLookInLeft",
    "eyeLookInRight",
    "eyeLookOutLeft",
    "eyeLookOutRight",
    "eyeLookUpLeft",
    "eyeLookUpRight",
    "eyeSquintLeft",
    "eyeSquintRight",
    "eyeWideLeft",
    "eyeWideRight",
    "jawForward",
    "jawLeft",
    "jawOpen",
    "jawRight",
    "mouthClose",
    "mouthDimpleLeft",
    "mouthDimpleRight",
    "mouthFrownLeft",
    "mouthFrownRight",
    "mouthFunnel",
    "mouthLeft",
    "mouthLowerDownLeft",
    "mouthLowerDownRight",
    "mouthPressLeft",
    "mouthPressRight",
    "mouthPucker",
    "mouthRight",
    "mouthRollLower",
    "mouthRollUpper",
    "mouthShrugLower",
    "mouthShrugUpper",
    "mouthSmileLeft",
    "mouthSmileRight",
    "mouthStretchLeft",
    "mouthStretchRight",
    "mouthUpperUpLeft",
    "mouthUpperUpRight",
    "noseSneerLeft",
    "noseSneerRight",
    "tongueOut",
];

/// One blendshape frame in the wire shape `{"data": {...}}`.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct BlendshapeFrame {
    pub data: HashMap<String, f32>,
}

/// Build a deterministic frame covering every ARKit blendshape.
///
/// Values trace a per-key phase-shifted wave in [0, 1] so successive
/// frames animate when watched live.
pub fn synthetic_frame(tick: u64) -> BlendshapeFrame {
    let data = ARKIT_BLENDSHAPES
        .iter()
        .enumerate()
        .map(|(i, name)| {
            let phase = tick as f32 * 0.1 + i as f32 * 0.37;
            (name.to_string(), (phase.sin() * 0.5 + 0.5).clamp(0.0, 1.0))
        })
        .collect();

    BlendshapeFrame { data }
}

/// Encode and send one frame; returns the encoded byte length.
pub async fn send_frame(
    socket: &UdpSocket,
    target: SocketAddr,
    frame: &BlendshapeFrame,
) -> Result<usize, ProbeError> {
    let payload = serde_json::to_vec(frame)?;
    let sent = socket.send_to(&payload, target).await?;
    Ok(sent)
}
