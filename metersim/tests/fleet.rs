//! Fleet-level integration tests
//!
//! These exercise real TCP listeners: binding the configured port range,
//! per-instance failure isolation, and idempotent group shutdown.

use metersim::fleet::{all_started, first_failure};
use metersim::{FleetConfig, FleetManager, InstanceState};
use metersim_core::SimError;
use tokio::net::TcpStream;

fn fleet_config(meter_count: u16, base_port: u16) -> FleetConfig {
    FleetConfig {
        meter_count,
        base_port,
        ..FleetConfig::default()
    }
}

async fn assert_accepts(port: u16) {
    let stream = TcpStream::connect(("127.0.0.1", port)).await;
    assert!(stream.is_ok(), "port {} should accept connections", port);
}

async fn assert_refuses(port: u16) {
    let stream = TcpStream::connect(("127.0.0.1", port)).await;
    assert!(stream.is_err(), "port {} should refuse connections", port);
}

#[tokio::test]
async fn test_three_meter_fleet_binds_sequential_ports() {
    let fleet = FleetManager::new(fleet_config(3, 4059)).unwrap();
    let outcomes = fleet.start_all().await;
    assert!(all_started(&outcomes), "failure: {:?}", first_failure(&outcomes));

    let ports: Vec<u16> = outcomes.iter().map(|o| o.port).collect();
    assert_eq!(ports, vec![4059, 4060, 4061]);

    for port in ports {
        assert_accepts(port).await;
    }
    for instance in fleet.instances() {
        assert_eq!(instance.state().await, InstanceState::Running);
    }

    fleet.stop_all().await;
}

#[tokio::test]
async fn test_stopping_one_instance_leaves_siblings_running() {
    let fleet = FleetManager::new(fleet_config(3, 24059)).unwrap();
    let outcomes = fleet.start_all().await;
    assert!(all_started(&outcomes));

    fleet.instances()[1].stop().await;

    assert_eq!(fleet.instances()[0].state().await, InstanceState::Running);
    assert_eq!(fleet.instances()[1].state().await, InstanceState::Stopped);
    assert_eq!(fleet.instances()[2].state().await, InstanceState::Running);

    assert_accepts(24059).await;
    assert_refuses(24060).await;
    assert_accepts(24061).await;

    fleet.stop_all().await;
}

#[tokio::test]
async fn test_stop_all_is_idempotent() {
    let fleet = FleetManager::new(fleet_config(2, 25059)).unwrap();
    let outcomes = fleet.start_all().await;
    assert!(all_started(&outcomes));

    fleet.stop_all().await;
    for instance in fleet.instances() {
        assert_eq!(instance.state().await, InstanceState::Stopped);
    }

    // Second call observes the same end state and raises nothing.
    fleet.stop_all().await;
    for instance in fleet.instances() {
        assert_eq!(instance.state().await, InstanceState::Stopped);
    }
}

#[tokio::test]
async fn test_bind_conflict_is_isolated_to_one_instance() {
    // Occupy the port the second instance of the fleet will want.
    let blocker = tokio::net::TcpListener::bind("0.0.0.0:26060").await.unwrap();

    let fleet = FleetManager::new(fleet_config(3, 26059)).unwrap();
    let outcomes = fleet.start_all().await;

    assert!(outcomes[0].result.is_ok());
    assert!(matches!(
        outcomes[1].result,
        Err(SimError::Bind { port: 26060, .. })
    ));
    assert!(outcomes[2].result.is_ok());

    assert_eq!(fleet.instances()[0].state().await, InstanceState::Running);
    assert_eq!(fleet.instances()[1].state().await, InstanceState::Created);
    assert_eq!(fleet.instances()[2].state().await, InstanceState::Running);

    // Stop covers the never-started instance too.
    fleet.stop_all().await;
    for instance in fleet.instances() {
        assert_eq!(instance.state().await, InstanceState::Stopped);
    }
    drop(blocker);
}

#[tokio::test]
async fn test_fleet_rejects_invalid_configuration_up_front() {
    assert!(matches!(
        FleetManager::new(fleet_config(0, 4059)),
        Err(SimError::Config(_))
    ));
    let overflow = FleetConfig {
        meter_count: 10,
        base_port: 65530,
        ..FleetConfig::default()
    };
    assert!(matches!(
        FleetManager::new(overflow),
        Err(SimError::Config(_))
    ));
}
