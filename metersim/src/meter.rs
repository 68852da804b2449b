//! Simulated meter: identity, security material, and the value store
//!
//! A [`Meter`] is created once by the fleet manager and owns the only
//! mutable "real" data in the simulator: the map from OBIS code to current
//! reading. Everything else (directory, policy) is fixed at construction.

use metersim_core::{DataValue, ObisCode};
use std::collections::HashMap;
use tokio::sync::RwLock;

/// Fixed test security material for one meter
///
/// These are deliberately constant, well-known values: the simulator is a
/// test double, not a secure device.
#[derive(Debug, Clone)]
pub struct Credentials {
    system_title: [u8; 8],
    block_cipher_key: [u8; 16],
    authentication_key: [u8; 16],
    association_secret: Vec<u8>,
    lls_password: String,
}

impl Credentials {
    pub fn system_title(&self) -> &[u8; 8] {
        &self.system_title
    }

    pub fn block_cipher_key(&self) -> &[u8; 16] {
        &self.block_cipher_key
    }

    pub fn authentication_key(&self) -> &[u8; 16] {
        &self.authentication_key
    }

    /// Secret the privileged association authenticates with
    pub fn association_secret(&self) -> &[u8] {
        &self.association_secret
    }

    /// Password for the low-level-security mechanism
    pub fn lls_password(&self) -> &str {
        &self.lls_password
    }
}

impl Default for Credentials {
    fn default() -> Self {
        Self {
            system_title: *b"SIMULATR",
            block_cipher_key: *b"AAAAAAAAAAAAAAAA",
            authentication_key: *b"AAAAAAAAAAAAAAAA",
            association_secret: b"AAAAAAAAAAAAAAAA".to_vec(),
            lls_password: "12345678".to_string(),
        }
    }
}

/// Logical address information the engine routes inbound requests by
#[derive(Debug, Clone)]
pub struct AddressIdentity {
    /// Logical device name, shared template across the fleet
    pub logical_name: String,
    /// Client address the collector uses
    pub client_address: u16,
    /// Server address, unique per meter
    pub server_address: u16,
}

/// Per-meter key/value map from OBIS code to current reading
///
/// `set` overwrites or inserts unconditionally and never fails. `get`
/// returns `None` for a key never set — a valid result distinct from a
/// stored [`DataValue::Null`], which the bridge propagates as "not
/// handled" rather than as an error. Guarded by a single lock so engine
/// callbacks and a test harness mutating readings directly stay safe.
#[derive(Debug, Default)]
pub struct ValueStore {
    slots: RwLock<HashMap<ObisCode, DataValue>>,
}

impl ValueStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with the builder's seed values
    pub fn with_values(values: HashMap<ObisCode, DataValue>) -> Self {
        Self {
            slots: RwLock::new(values),
        }
    }

    /// Overwrite or insert a reading
    pub async fn set(&self, key: ObisCode, value: DataValue) {
        self.slots.write().await.insert(key, value);
    }

    /// Current reading, or `None` when the key was never set
    pub async fn get(&self, key: &ObisCode) -> Option<DataValue> {
        self.slots.read().await.get(key).cloned()
    }

    /// Number of stored readings
    pub async fn len(&self) -> usize {
        self.slots.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.slots.read().await.is_empty()
    }
}

/// One simulated metering device
///
/// Identity and security material are immutable; only the value store
/// mutates during the meter's run. Destroyed with the fleet, nothing is
/// persisted.
#[derive(Debug)]
pub struct Meter {
    id: String,
    address: AddressIdentity,
    credentials: Credentials,
    values: ValueStore,
}

impl Meter {
    pub fn new(
        id: impl Into<String>,
        address: AddressIdentity,
        credentials: Credentials,
        seed_values: HashMap<ObisCode, DataValue>,
    ) -> Self {
        Self {
            id: id.into(),
            address,
            credentials,
            values: ValueStore::with_values(seed_values),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn address(&self) -> &AddressIdentity {
        &self.address
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    pub fn values(&self) -> &ValueStore {
        &self.values
    }

    /// Overwrite or insert a reading
    pub async fn set_value(&self, key: ObisCode, value: DataValue) {
        self.values.set(key, value).await;
    }

    /// Current reading, or `None` when the key was never set
    pub async fn get_value(&self, key: &ObisCode) -> Option<DataValue> {
        self.values.get(key).await
    }
}
