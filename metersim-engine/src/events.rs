//! Server-side callback contract
//!
//! The engine decodes inbound PDUs and invokes these callbacks synchronously
//! per request batch; there is no ambient event bus. A bridge implementation
//! resolves each request against its meter's state and marks it handled, or
//! leaves it untouched so the engine applies its own default resolution
//! (typically a protocol-level error reply).

use async_trait::async_trait;
use metersim_core::{AccessMode, AssociationLevel, AuthMechanism, DataValue, MethodAccess, ObisCode, ObjectKind};
use std::net::SocketAddr;

/// Reference to one addressable object, as the engine identifies it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ObjectRef {
    /// Interface-class kind of the object
    pub kind: ObjectKind,
    /// Logical name (OBIS code)
    pub logical_name: ObisCode,
}

impl ObjectRef {
    pub fn new(kind: ObjectKind, logical_name: ObisCode) -> Self {
        Self { kind, logical_name }
    }
}

/// One attribute read or write request inside a batch
///
/// Mirrors the engine's value-event argument: the target object, the
/// attribute index, the association the request arrived under, an optional
/// value slot, and the handled flag. For reads the bridge fills `value`;
/// for writes the engine fills it and the bridge consumes it.
#[derive(Debug, Clone)]
pub struct AttributeRequest {
    /// Target object
    pub target: ObjectRef,
    /// Attribute index (1 is always the logical name)
    pub attribute: u8,
    /// Association the request arrived under
    pub level: AssociationLevel,
    /// Value slot: read result, or value to write
    pub value: Option<DataValue>,
    /// Set by the bridge when it resolved the request itself
    pub handled: bool,
}

impl AttributeRequest {
    /// Build a read request for one attribute
    pub fn read(target: ObjectRef, attribute: u8, level: AssociationLevel) -> Self {
        Self {
            target,
            attribute,
            level,
            value: None,
            handled: false,
        }
    }

    /// Build a write request carrying the value to store
    pub fn write(
        target: ObjectRef,
        attribute: u8,
        level: AssociationLevel,
        value: DataValue,
    ) -> Self {
        Self {
            target,
            attribute,
            level,
            value: Some(value),
            handled: false,
        }
    }

    /// Mark the request resolved with the given value
    pub fn complete(&mut self, value: DataValue) {
        self.value = Some(value);
        self.handled = true;
    }
}

/// Outcome of an authentication attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthOutcome {
    /// Association accepted
    Accepted,
    /// Association rejected with an authentication-failure diagnostic
    AuthenticationFailure,
}

/// Transport-level information about one client connection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConnectionInfo {
    /// Peer socket address
    pub peer: SocketAddr,
}

/// Callbacks one running meter exposes to the protocol engine
///
/// One implementation per meter server instance; the engine delivers
/// callbacks for a given instance from at most one logical connection
/// context at a time.
#[async_trait]
pub trait ServerEvents: Send + Sync {
    /// Resolve an object by kind and address; `None` when the meter does
    /// not expose it
    async fn find_object(
        &self,
        kind: ObjectKind,
        short_name: u16,
        logical_name: Option<ObisCode>,
    ) -> Option<ObjectRef>;

    /// Intercept a batch of attribute reads before the engine's own
    /// resolution
    async fn pre_read(&self, requests: &mut [AttributeRequest]);

    /// Intercept a batch of attribute writes before the engine's own
    /// resolution
    async fn pre_write(&self, requests: &mut [AttributeRequest]);

    /// Gate an association on the presented mechanism and secret
    ///
    /// For the high-security mechanism the cryptographic proof is verified
    /// by the engine before this fires; the callback gates on mechanism
    /// identity only.
    async fn validate_authentication(
        &self,
        mechanism: AuthMechanism,
        secret: &[u8],
    ) -> AuthOutcome;

    /// A transport connection was accepted
    async fn connected(&self, info: &ConnectionInfo);

    /// A transport connection closed
    async fn disconnected(&self, info: &ConnectionInfo);

    /// Whether this instance is the target of the addressed pair
    fn is_target(&self, server_address: u16, client_address: u16) -> bool;

    /// Attribute access mode for the given object kind and association
    fn attribute_access(
        &self,
        kind: ObjectKind,
        attribute: u8,
        level: AssociationLevel,
    ) -> AccessMode;

    /// Method access mode for the given object kind
    fn method_access(&self, kind: ObjectKind, method: u8) -> MethodAccess;
}
