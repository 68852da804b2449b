//! Object directory: the fixed addressable object set of one meter
//!
//! The directory is built once per meter by [`builder::DirectoryBuilder`]
//! and is immutable afterwards. Association views hold identifier
//! references into the directory, never ownership edges, so a view listing
//! itself is just another `(kind, logical name)` pair.

pub mod builder;

use metersim_core::{AccessMode, AssociationLevel, AuthMechanism, ObisCode, ObjectKind, SimError, SimResult};
use std::collections::HashMap;

/// Well-known OBIS codes of the demonstration object set
pub mod codes {
    use metersim_core::ObisCode;

    pub const CLOCK: ObisCode = ObisCode::new(0, 0, 1, 0, 0, 255);
    pub const IMPORT_ACTIVE_ENERGY: ObisCode = ObisCode::new(1, 0, 1, 8, 0, 255);
    pub const IMPORT_APPARENT_ENERGY: ObisCode = ObisCode::new(1, 0, 9, 8, 0, 255);
    pub const EXPORT_ACTIVE_ENERGY: ObisCode = ObisCode::new(1, 0, 2, 8, 0, 255);
    pub const EXPORT_APPARENT_ENERGY: ObisCode = ObisCode::new(1, 0, 10, 8, 0, 255);
    /// Writable invocation counter, access-counter attribute of the
    /// privileged association
    pub const INVOCATION_COUNTER: ObisCode = ObisCode::new(0, 0, 43, 1, 3, 255);
    /// Shadow data point backing the writable invocation counter
    pub const INVOCATION_COUNTER_SHADOW: ObisCode = ObisCode::new(0, 0, 43, 1, 0, 255);
    pub const LOAD_PROFILE: ObisCode = ObisCode::new(1, 0, 99, 2, 0, 255);
    pub const SECURITY_SETUP: ObisCode = ObisCode::new(0, 0, 43, 0, 0, 255);
    pub const PUBLIC_ASSOCIATION: ObisCode = ObisCode::new(0, 0, 40, 0, 1, 255);
    pub const PRIVILEGED_ASSOCIATION: ObisCode = ObisCode::new(0, 0, 40, 0, 0, 255);
}

/// Semantic type backing one attribute
///
/// Declared by the builder for every attribute it emits; `Undeclared` is
/// only ever observable as a construction-time failure, never at request
/// time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SemanticType {
    /// Not yet declared; the builder rejects directories containing this
    Undeclared,
    /// 6-byte logical name
    LogicalName,
    /// 32-bit unsigned reading
    DoubleLongUnsigned,
    /// Date and time
    DateTime,
    /// Ordered heterogeneous fields
    Structure,
    /// Homogeneous list (profile buffers, object lists)
    Array,
    /// Raw bytes (titles, keys)
    OctetString,
    /// Enumerated value
    Enum,
}

/// Descriptor of one attribute of one directory entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttributeDescriptor {
    /// Attribute index; 1 is always the logical name
    pub index: u8,
    /// Backing semantic type
    pub semantic: SemanticType,
    /// Default access before the policy table is consulted
    pub default_access: AccessMode,
}

impl AttributeDescriptor {
    pub fn new(index: u8, semantic: SemanticType, default_access: AccessMode) -> Self {
        Self {
            index,
            semantic,
            default_access,
        }
    }

    /// Descriptor with no declared semantic; construction-time poison
    pub fn undeclared(index: u8) -> Self {
        Self {
            index,
            semantic: SemanticType::Undeclared,
            default_access: AccessMode::NoAccess,
        }
    }
}

/// One addressable object instance
#[derive(Debug, Clone)]
pub struct DirectoryEntry {
    pub kind: ObjectKind,
    pub logical_name: ObisCode,
    pub class_version: u8,
    pub attributes: Vec<AttributeDescriptor>,
}

impl DirectoryEntry {
    pub fn new(
        kind: ObjectKind,
        logical_name: ObisCode,
        class_version: u8,
        attributes: Vec<AttributeDescriptor>,
    ) -> Self {
        Self {
            kind,
            logical_name,
            class_version,
            attributes,
        }
    }
}

/// A named access context with its own authentication requirement
///
/// Every meter has exactly two: the permissive public view and the
/// privileged authenticated view. `object_list` references every directory
/// entry by identifier, including both views themselves.
#[derive(Debug, Clone)]
pub struct AssociationView {
    pub logical_name: ObisCode,
    pub level: AssociationLevel,
    pub required_auth: AuthMechanism,
    pub client_sap: u16,
    /// Advisory PDU size cap handed to the engine
    pub max_pdu_size: u16,
    /// Secret this view authenticates with, when it requires one
    pub secret: Option<Vec<u8>>,
    pub object_list: Vec<(ObjectKind, ObisCode)>,
}

/// Key material the security-setup object carries
#[derive(Debug, Clone)]
pub struct SecurityMaterial {
    pub server_system_title: [u8; 8],
    pub block_cipher_key: [u8; 16],
    pub authentication_key: [u8; 16],
}

/// Immutable directory of one meter's addressable objects
///
/// Lookup is by `(kind, logical name)`; enumeration preserves insertion
/// order. Built only through [`builder::DirectoryBuilder`], which validates
/// eagerly so request handling never sees an unknown attribute type.
#[derive(Debug)]
pub struct ObjectDirectory {
    entries: Vec<DirectoryEntry>,
    index: HashMap<(ObjectKind, ObisCode), usize>,
    public_view: AssociationView,
    privileged_view: AssociationView,
    security: SecurityMaterial,
}

impl ObjectDirectory {
    pub(crate) fn assemble(
        entries: Vec<DirectoryEntry>,
        public_view: AssociationView,
        privileged_view: AssociationView,
        security: SecurityMaterial,
    ) -> SimResult<Self> {
        let mut index = HashMap::with_capacity(entries.len());
        for (i, entry) in entries.iter().enumerate() {
            if index.insert((entry.kind, entry.logical_name), i).is_some() {
                return Err(SimError::Directory(format!(
                    "Duplicate directory entry: {} {}",
                    entry.kind, entry.logical_name
                )));
            }
        }
        Ok(Self {
            entries,
            index,
            public_view,
            privileged_view,
            security,
        })
    }

    /// All entries in insertion order
    pub fn entries(&self) -> &[DirectoryEntry] {
        &self.entries
    }

    /// Look up an entry by kind and logical name
    pub fn find(&self, kind: ObjectKind, logical_name: &ObisCode) -> Option<&DirectoryEntry> {
        self.index
            .get(&(kind, *logical_name))
            .map(|&i| &self.entries[i])
    }

    /// Look up an entry by logical name alone
    pub fn find_by_logical_name(&self, logical_name: &ObisCode) -> Option<&DirectoryEntry> {
        self.entries
            .iter()
            .find(|e| e.logical_name == *logical_name)
    }

    /// Whether an entry exists for the pair
    pub fn contains(&self, kind: ObjectKind, logical_name: &ObisCode) -> bool {
        self.index.contains_key(&(kind, *logical_name))
    }

    /// The permissive discovery view
    pub fn public_view(&self) -> &AssociationView {
        &self.public_view
    }

    /// The authenticated read-write view
    pub fn privileged_view(&self) -> &AssociationView {
        &self.privileged_view
    }

    /// View for the given association level
    pub fn view(&self, level: AssociationLevel) -> &AssociationView {
        match level {
            AssociationLevel::Public => &self.public_view,
            AssociationLevel::Privileged => &self.privileged_view,
        }
    }

    /// Key material carried by the security-setup object
    pub fn security_material(&self) -> &SecurityMaterial {
        &self.security
    }
}
