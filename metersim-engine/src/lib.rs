//! Protocol engine contract for the meter fleet simulator
//!
//! The wire-level DLMS stack (framing, PDU codecs, ciphering) is an external
//! collaborator. This crate defines the narrow contract the simulator
//! consumes it through: the [`ServerEvents`] callback trait one meter bridge
//! implements, the request types the engine passes through it, and the
//! [`TcpEngine`] listener host that owns port binding, the accept loop, and
//! prompt shutdown.

pub mod events;
pub mod listener;

pub use events::{
    AttributeRequest, AuthOutcome, ConnectionInfo, ObjectRef, ServerEvents,
};
pub use listener::TcpEngine;
