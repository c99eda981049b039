//! Builders for the two info-reply payloads.
//!
//! Both payloads are parsed positionally by legacy clients with no
//! self-description, so field order and width here are load-bearing.

use std::str::FromStr;

use crate::envelope::ProtocolError;
use crate::scalar::{encode_real, encode_string, encode_u32};

/// Physics settings advertised in the long info reply.
#[derive(Debug, Clone, PartialEq)]
pub struct PhysicsSettings {
    pub cycle_delay: f32,
    pub acceleration: f32,
    pub rubber_wall_hump: f32,
    pub rubber_hit_wall_ratio: f32,
    pub walls_length: f32,
}

impl Default for PhysicsSettings {
    fn default() -> Self {
        PhysicsSettings {
            cycle_delay: 0.1,
            acceleration: 0.5,
            rubber_wall_hump: 0.0,
            rubber_hit_wall_ratio: 1.0,
            walls_length: 10.0,
        }
    }
}

/// Read-only identity of the running server.
///
/// An empty `hostname` is a sentinel telling clients to fall back to the
/// sender IP of the reply datagram.
#[derive(Debug, Clone, PartialEq)]
pub struct ServerDescriptor {
    pub name: String,
    pub hostname: String,
    pub port: u16,
    pub protocol_min: u32,
    pub protocol_max: u32,
    pub release: String,
    pub max_players: u32,
    pub physics: PhysicsSettings,
}

impl ServerDescriptor {
    /// Creates a descriptor with the historical deployment defaults for
    /// everything except the caller-supplied identity.
    pub fn new(name: &str, hostname: &str, port: u16) -> Self {
        ServerDescriptor {
            name: name.to_string(),
            hostname: hostname.to_string(),
            port,
            protocol_min: 1,
            protocol_max: 25,
            release: "0.2.9.2.3".to_string(),
            max_players: 16,
            physics: PhysicsSettings::default(),
        }
    }
}

/// Wire revision of the long info payload.
///
/// The settings-digest section changed shape between client generations:
/// the older layout carries a 16-bit flags word and nothing else, the newer
/// one a 32-bit flags word followed by three minimum-play-time integers.
/// The two are mutually incompatible and a running server must commit to
/// one for its client population.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProtocolRevision {
    /// 0.2.8-era digest: u16 settings flags, no play-time fields.
    V0228,
    /// 0.2.9-era digest: u32 settings flags plus three play-time fields.
    #[default]
    V0229,
}

impl FromStr for ProtocolRevision {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "0.2.8" => Ok(ProtocolRevision::V0228),
            "0.2.9" => Ok(ProtocolRevision::V0229),
            other => Err(ProtocolError::UnknownRevision(other.to_string())),
        }
    }
}

/// Builds the short info payload: advertised port, hostname and a zero
/// transaction id (this server never acts as a tracking master).
pub fn build_short_info(port: u16, hostname: &str) -> Vec<u8> {
    let mut payload = Vec::new();
    payload.extend_from_slice(&encode_u32(port as u32));
    payload.extend_from_slice(&encode_string(hostname));
    payload.extend_from_slice(&encode_u32(0));
    payload
}

/// Builds the long info payload from the full server descriptor.
///
/// The empty string after the port is the sender-IP-override sentinel; the
/// four empty strings after max players are usernames, options, URL and
/// global ids, unused by a minimal responder.
pub fn build_long_info(descriptor: &ServerDescriptor, revision: ProtocolRevision) -> Vec<u8> {
    let mut payload = Vec::new();

    payload.extend_from_slice(&encode_u32(descriptor.port as u32));
    payload.extend_from_slice(&encode_string(""));
    payload.extend_from_slice(&encode_string(&descriptor.name));
    payload.extend_from_slice(&encode_u32(0)); // user count
    payload.extend_from_slice(&encode_u32(descriptor.protocol_min));
    payload.extend_from_slice(&encode_u32(descriptor.protocol_max));
    payload.extend_from_slice(&encode_string(&descriptor.release));
    payload.extend_from_slice(&encode_u32(descriptor.max_players));
    payload.extend_from_slice(&encode_string("")); // usernames
    payload.extend_from_slice(&encode_string("")); // options
    payload.extend_from_slice(&encode_string("")); // URL
    payload.extend_from_slice(&encode_string("")); // user global ids

    // Settings digest; the one section that differs between revisions.
    match revision {
        ProtocolRevision::V0228 => {
            payload.extend_from_slice(&0u16.to_be_bytes()); // settings flags
        }
        ProtocolRevision::V0229 => {
            payload.extend_from_slice(&encode_u32(0)); // settings flags
            payload.extend_from_slice(&encode_u32(0)); // min play time, total
            payload.extend_from_slice(&encode_u32(0)); // min play time, online
            payload.extend_from_slice(&encode_u32(0)); // min play time, team
        }
    }

    let physics = &descriptor.physics;
    payload.extend_from_slice(&encode_real(physics.cycle_delay));
    payload.extend_from_slice(&encode_real(physics.acceleration));
    payload.extend_from_slice(&encode_real(physics.rubber_wall_hump));
    payload.extend_from_slice(&encode_real(physics.rubber_hit_wall_ratio));
    payload.extend_from_slice(&encode_real(physics.walls_length));

    payload
}
