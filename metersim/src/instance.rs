//! Meter server instance lifecycle
//!
//! One instance owns one meter, one object directory, one bridge, and one
//! TCP listener, and shares none of them with its siblings. The state
//! machine is `Created → Running → Stopped`; instances are not restartable
//! after `Stopped`, a new instance must be constructed.

use crate::bridge::MeterBridge;
use crate::directory::ObjectDirectory;
use crate::meter::Meter;
use metersim_core::{SimError, SimResult};
use metersim_engine::TcpEngine;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Lifecycle state of one instance
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstanceState {
    /// Built and wired; listener not yet bound
    Created,
    /// Listener bound, accepting connections
    Running,
    /// Listener closed; terminal state
    Stopped,
}

/// One independently startable/stoppable meter server
pub struct MeterServerInstance {
    meter: Arc<Meter>,
    directory: Arc<ObjectDirectory>,
    bridge: Arc<MeterBridge>,
    port: u16,
    state: RwLock<InstanceState>,
    engine: RwLock<Option<TcpEngine>>,
}

impl MeterServerInstance {
    /// Wire meter, directory, and bridge; the listener stays unbound until
    /// [`MeterServerInstance::start`]
    pub fn new(meter: Meter, directory: ObjectDirectory, port: u16) -> Self {
        let meter = Arc::new(meter);
        let directory = Arc::new(directory);
        let bridge = Arc::new(MeterBridge::new(meter.clone(), directory.clone()));
        Self {
            meter,
            directory,
            bridge,
            port,
            state: RwLock::new(InstanceState::Created),
            engine: RwLock::new(None),
        }
    }

    pub fn meter(&self) -> &Arc<Meter> {
        &self.meter
    }

    pub fn directory(&self) -> &Arc<ObjectDirectory> {
        &self.directory
    }

    pub fn bridge(&self) -> &Arc<MeterBridge> {
        &self.bridge
    }

    /// Configured port (0 requests an ephemeral port)
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Effective bound port while running
    pub async fn bound_port(&self) -> Option<u16> {
        self.engine
            .read()
            .await
            .as_ref()
            .map(|engine| engine.local_addr().port())
    }

    pub async fn state(&self) -> InstanceState {
        *self.state.read().await
    }

    /// Bind the listener and register the bridge callbacks
    ///
    /// # Errors
    /// [`SimError::Bind`] when the port is in use — the instance stays in
    /// `Created` and the failure is per-instance, never fleet-wide.
    /// [`SimError::InvalidState`] when called on a running or stopped
    /// instance.
    pub async fn start(&self) -> SimResult<()> {
        let mut state = self.state.write().await;
        match *state {
            InstanceState::Created => {}
            InstanceState::Running => {
                return Err(SimError::InvalidState(format!(
                    "{} is already running",
                    self.meter.id()
                )));
            }
            InstanceState::Stopped => {
                return Err(SimError::InvalidState(format!(
                    "{} is stopped and cannot be restarted",
                    self.meter.id()
                )));
            }
        }

        let events: Arc<dyn metersim_engine::ServerEvents> = self.bridge.clone();
        let engine = TcpEngine::bind(self.port, events).await?;
        log::info!(
            "Meter {} listening on port {}",
            self.meter.id(),
            engine.local_addr().port()
        );
        *self.engine.write().await = Some(engine);
        *state = InstanceState::Running;
        Ok(())
    }

    /// Close the listener
    ///
    /// Idempotent: stopping an already-stopped (or never-started) instance
    /// is a no-op. Returns promptly even with a connection mid-request —
    /// the engine's own close semantics drop in-flight work.
    pub async fn stop(&self) {
        let mut state = self.state.write().await;
        if *state == InstanceState::Stopped {
            return;
        }
        if let Some(engine) = self.engine.write().await.take() {
            engine.shutdown().await;
        }
        *state = InstanceState::Stopped;
    }
}
