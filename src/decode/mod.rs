//! Packet decoding.
//!
//! Turns the raw bytes of a captured packet into addressing, layer presence,
//! and the application payload, via `etherparse`.

mod layers;
mod packet;

pub use layers::{known_layers, layer};
pub use packet::DecodedPacket;
