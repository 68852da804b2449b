//! Fleet manager
//!
//! Builds one meter plus one server instance per configured index and
//! starts/stops them as a group. Instances are independent — distinct
//! ports, distinct state — so startup proceeds concurrently and one
//! instance's bind failure never blocks or aborts its siblings.

use crate::config::FleetConfig;
use crate::directory::builder::DirectoryBuilder;
use crate::instance::MeterServerInstance;
use crate::meter::{AddressIdentity, Credentials, Meter};
use futures::future::join_all;
use metersim_core::{SimError, SimResult};
use std::sync::Arc;

/// Per-instance result of a fleet-wide start
#[derive(Debug)]
pub struct StartOutcome {
    pub meter_id: String,
    pub port: u16,
    pub result: SimResult<()>,
}

/// Orchestrates N independent meter server instances
pub struct FleetManager {
    config: FleetConfig,
    instances: Vec<Arc<MeterServerInstance>>,
}

impl FleetManager {
    /// Validate the configuration and build every meter and instance
    ///
    /// Instance `i` gets port `base_port + i`, server address
    /// `server_address_start + i`, and id `MTR{i+1:05}`.
    pub fn new(config: FleetConfig) -> SimResult<Self> {
        config.validate()?;

        let mut instances = Vec::with_capacity(usize::from(config.meter_count));
        for i in 0..config.meter_count {
            let credentials = Credentials::default();
            let built = DirectoryBuilder::new(&credentials).build()?;
            let meter = Meter::new(
                format!("MTR{:05}", i + 1),
                AddressIdentity {
                    logical_name: config.logical_name.clone(),
                    client_address: config.client_address,
                    server_address: config.server_address_start + i,
                },
                credentials,
                built.seed_values,
            );
            let port = config.base_port + i;
            instances.push(Arc::new(MeterServerInstance::new(
                meter,
                built.directory,
                port,
            )));
        }

        Ok(Self { config, instances })
    }

    pub fn config(&self) -> &FleetConfig {
        &self.config
    }

    pub fn instances(&self) -> &[Arc<MeterServerInstance>] {
        &self.instances
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    /// Start every instance concurrently
    ///
    /// Best effort: an individual failure is logged, that instance is
    /// skipped, and the rest proceed. Returns the per-instance outcomes in
    /// fleet order.
    pub async fn start_all(&self) -> Vec<StartOutcome> {
        let starts = self.instances.iter().map(|instance| async move {
            let result = instance.start().await;
            if let Err(ref e) = result {
                log::error!("Meter {} failed to start: {}", instance.meter().id(), e);
            }
            StartOutcome {
                meter_id: instance.meter().id().to_string(),
                port: instance.port(),
                result,
            }
        });
        let outcomes = join_all(starts).await;

        let started = outcomes.iter().filter(|o| o.result.is_ok()).count();
        log::info!("Started {}/{} meters", started, outcomes.len());
        outcomes
    }

    /// Stop every instance unconditionally
    ///
    /// Covers instances that never started; stop is idempotent, so calling
    /// this twice is a no-op the second time.
    pub async fn stop_all(&self) {
        join_all(self.instances.iter().map(|instance| instance.stop())).await;
        log::info!("All meters stopped");
    }
}

/// Convenience check that a start was fully successful
pub fn all_started(outcomes: &[StartOutcome]) -> bool {
    outcomes.iter().all(|o| o.result.is_ok())
}

/// First failure in a batch of outcomes, if any
pub fn first_failure(outcomes: &[StartOutcome]) -> Option<(&str, &SimError)> {
    outcomes.iter().find_map(|o| match &o.result {
        Err(e) => Some((o.meter_id.as_str(), e)),
        Ok(()) => None,
    })
}
