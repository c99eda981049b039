//! # Legacy Discovery Protocol
//!
//! Pure codec for the legacy server-discovery wire format shared by the
//! responder and its tests. The format is fixed by two decades of deployed
//! clients, so every encoding here is bit-exact rather than idiomatic:
//!
//! - **Envelope framing** (`envelope`): a 6-byte big-endian header
//!   (descriptor, message id, payload word count), the payload, a zero pad
//!   byte for odd payload lengths and a 2-byte sender id trailer.
//! - **Scalar encodings** (`scalar`): 32-bit integers as two big-endian
//!   words in low-then-high order, strings packed two sign-extended bytes
//!   per 16-bit word, and floats in a custom 1/6/25-bit "REAL" layout.
//! - **Reply payloads** (`reply`): the short and long info replies,
//!   positionally parsed by clients, with the long-form settings digest
//!   selected by [`reply::ProtocolRevision`].
//!
//! Everything in this crate is a pure function from scalars and byte
//! buffers to byte buffers: no I/O, no shared state, safe to call from any
//! number of concurrent tasks. Decoding can fail only with
//! [`envelope::ProtocolError::MalformedEnvelope`]; every encoder is total
//! and saturates rather than rejects extreme inputs, so a reply can always
//! be produced for a well-formed request.

pub mod envelope;
pub mod reply;
pub mod scalar;

pub use envelope::{Envelope, ProtocolError};
pub use reply::{
    build_long_info, build_short_info, PhysicsSettings, ProtocolRevision, ServerDescriptor,
};
pub use scalar::{encode_real, encode_string, encode_u32};
