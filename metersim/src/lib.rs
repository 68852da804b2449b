//! DLMS meter fleet simulator
//!
//! Simulates a fleet of smart-metering devices, each one an independent
//! TCP endpoint with its own addressable object directory, value store,
//! and association views, for use as a test double against real protocol
//! clients and collectors.
//!
//! # Architecture
//! - [`meter`]: one simulated device's identity, credentials, and value store
//! - [`directory`]: the fixed addressable object set, built once per meter
//! - [`access`]: the attribute access policy, a pure permission table
//! - [`bridge`]: adapts the engine's per-request callbacks to meter state
//! - [`instance`]: lifecycle of one meter server (port binding, stop)
//! - [`fleet`]: builds and orchestrates N instances as a group

pub mod access;
pub mod bridge;
pub mod config;
pub mod directory;
pub mod fleet;
pub mod instance;
pub mod meter;

pub use bridge::MeterBridge;
pub use config::FleetConfig;
pub use directory::builder::DirectoryBuilder;
pub use directory::ObjectDirectory;
pub use fleet::{FleetManager, StartOutcome};
pub use instance::{InstanceState, MeterServerInstance};
pub use meter::{Credentials, Meter, ValueStore};
