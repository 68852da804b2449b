//! Object and access enumerations shared between the engine contract and
//! the simulator core.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of addressable object a meter exposes
///
/// The simulator supports a fixed demonstration set of COSEM interface
/// classes; the kind drives both directory lookup and the access policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObjectKind {
    /// Energy/power register (class 3)
    Register,
    /// Real-time clock (class 8)
    Clock,
    /// Plain data point (class 1), used for the invocation counters
    Data,
    /// Load-profile buffer (class 7)
    ProfileBuffer,
    /// Security setup carrying the meter's key material (class 64)
    SecuritySetup,
    /// Association view (class 15)
    AssociationView,
}

impl ObjectKind {
    /// COSEM interface class id for this kind
    pub fn class_id(&self) -> u16 {
        match self {
            ObjectKind::Data => 1,
            ObjectKind::Register => 3,
            ObjectKind::ProfileBuffer => 7,
            ObjectKind::Clock => 8,
            ObjectKind::AssociationView => 15,
            ObjectKind::SecuritySetup => 64,
        }
    }
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ObjectKind::Register => "Register",
            ObjectKind::Clock => "Clock",
            ObjectKind::Data => "Data",
            ObjectKind::ProfileBuffer => "ProfileBuffer",
            ObjectKind::SecuritySetup => "SecuritySetup",
            ObjectKind::AssociationView => "AssociationView",
        };
        write!(f, "{}", name)
    }
}

/// Attribute access permission
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AccessMode {
    /// No access
    NoAccess,
    /// Read only
    Read,
    /// Read and write
    ReadWrite,
}

impl AccessMode {
    /// Whether this mode permits reading
    pub fn allows_read(&self) -> bool {
        matches!(self, AccessMode::Read | AccessMode::ReadWrite)
    }

    /// Whether this mode permits writing
    pub fn allows_write(&self) -> bool {
        matches!(self, AccessMode::ReadWrite)
    }
}

/// Method access permission
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MethodAccess {
    /// Invocation denied
    Denied,
    /// Invocation allowed
    Allowed,
}

/// Association under which a request arrives
///
/// Every meter exposes exactly two association views: a permissive one for
/// discovery and a privileged one with write access to designated objects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssociationLevel {
    /// Public / no-authentication association
    Public,
    /// Authenticated association
    Privileged,
}

/// Authentication mechanism presented by a client
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AuthMechanism {
    /// No authentication (lowest level)
    None,
    /// Low-level security (password)
    Low,
    /// High-level security (challenge/response, crypto verified by the engine)
    High,
}
