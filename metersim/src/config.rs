//! Fleet configuration
//!
//! A flat set of named options; the only interdependent validation is that
//! the meter count is positive and the resulting port range stays inside
//! the valid TCP range.

use metersim_core::{SimError, SimResult};
use serde::{Deserialize, Serialize};

/// Configuration for one fleet of simulated meters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FleetConfig {
    /// Number of meters to simulate
    pub meter_count: u16,
    /// First TCP port; instance `i` listens on `base_port + i`
    pub base_port: u16,
    /// Client address shared by every meter
    pub client_address: u16,
    /// First server address; instance `i` uses `server_address_start + i`
    pub server_address_start: u16,
    /// Logical device name template shared by every meter
    pub logical_name: String,
}

impl Default for FleetConfig {
    fn default() -> Self {
        Self {
            meter_count: 150,
            base_port: 4059,
            client_address: 16,
            server_address_start: 1,
            logical_name: "1.0.0.0.0.255".to_string(),
        }
    }
}

impl FleetConfig {
    /// Validate before any instance is built
    pub fn validate(&self) -> SimResult<()> {
        if self.meter_count == 0 {
            return Err(SimError::Config(
                "meter count must be positive".to_string(),
            ));
        }
        if self.base_port == 0 {
            return Err(SimError::Config("base port must be non-zero".to_string()));
        }
        let last_port = u32::from(self.base_port) + u32::from(self.meter_count) - 1;
        if last_port > u32::from(u16::MAX) {
            return Err(SimError::Config(format!(
                "port range {}..={} exceeds the valid TCP range",
                self.base_port, last_port
            )));
        }
        let last_address =
            u32::from(self.server_address_start) + u32::from(self.meter_count) - 1;
        if last_address > u32::from(u16::MAX) {
            return Err(SimError::Config(format!(
                "server address range {}..={} overflows",
                self.server_address_start, last_address
            )));
        }
        Ok(())
    }
}
