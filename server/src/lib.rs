//! # Discovery Server Library
//!
//! Runtime shell around the `protocol` codec: a tokio UDP responder that
//! answers legacy server-discovery queries with the short or long info
//! reply and stays silent for everything else.
//!
//! ## Architecture
//!
//! A single receive loop owns the socket and spawns one task per inbound
//! datagram. The codec is stateless and the server's identity is read-only
//! after startup, so handlers share nothing but `Arc`s and need no
//! synchronization. A malformed datagram is logged and dropped without
//! affecting any other datagram in flight.
//!
//! ## Module Organization
//!
//! ### Network Module (`network`)
//! Socket lifecycle and dispatch:
//! - UDP bind and the receive loop with per-datagram task spawning
//! - Envelope decode and descriptor dispatch (info requests, logout,
//!   unknown opcodes)
//! - Reply encoding and transmission over the shared socket

pub mod network;
