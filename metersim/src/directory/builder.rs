//! Directory builder
//!
//! Produces, deterministically, the fixed object set of one meter: the
//! energy registers, the clock, the invocation-counter pair, the seeded
//! daily load profile, the security setup carrying the meter's keys, and
//! the two association views. Construction runs as ordered steps (objects,
//! then security, then associations) and returns an immutable directory
//! plus the seed readings for the meter's value store; nothing mutates the
//! directory afterwards.
//!
//! Validation is eager: an attribute with an undeclared semantic type or a
//! duplicate `(kind, logical name)` pair fails `build`, so request handling
//! never hits an unknown-type condition.

use super::{
    codes, AssociationView, AttributeDescriptor, DirectoryEntry, ObjectDirectory, SecurityMaterial,
    SemanticType,
};
use crate::meter::Credentials;
use chrono::{DateTime, Duration, Utc};
use metersim_core::{AccessMode, AssociationLevel, AuthMechanism, DataValue, ObisCode, ObjectKind, SimError, SimResult};
use std::collections::HashMap;

/// Number of pre-seeded daily load-profile entries
pub const PROFILE_DAYS: usize = 10;
/// Capture period of the daily profile, in seconds
pub const CAPTURE_PERIOD_SECONDS: u32 = 86_400;
/// Advisory PDU size cap for both association views
pub const MAX_PDU_SIZE: u16 = 0xFFFF;
/// Client SAP of the public association
pub const PUBLIC_CLIENT_SAP: u16 = 16;
/// Client SAP of the privileged association
pub const PRIVILEGED_CLIENT_SAP: u16 = 48;

/// Per-day linear step of every profile register column
const PROFILE_STEP: u32 = 10;
/// Base values for the four register columns, in capture order
const PROFILE_BASES: [u32; 4] = [1000, 2000, 300, 150];
/// Initial reading of every register and of the invocation counters
const SEED_READING: u32 = 1;

/// Result of a successful build: the immutable directory and the seed
/// readings the meter's value store starts from
#[derive(Debug)]
pub struct BuiltDirectory {
    pub directory: ObjectDirectory,
    pub seed_values: HashMap<ObisCode, DataValue>,
}

/// Builds the fixed object set for one meter
///
/// The build instant defaults to `Utc::now()`; tests pin it for
/// reproducible profile timestamps.
pub struct DirectoryBuilder<'a> {
    credentials: &'a Credentials,
    built_at: DateTime<Utc>,
}

impl<'a> DirectoryBuilder<'a> {
    pub fn new(credentials: &'a Credentials) -> Self {
        Self {
            credentials,
            built_at: Utc::now(),
        }
    }

    /// Pin the build instant (clock seed and profile timestamps)
    pub fn built_at(mut self, built_at: DateTime<Utc>) -> Self {
        self.built_at = built_at;
        self
    }

    pub fn build(self) -> SimResult<BuiltDirectory> {
        let mut entries = Vec::new();
        let mut seed_values = HashMap::new();

        self.push_core_objects(&mut entries, &mut seed_values);
        self.push_security_setup(&mut entries);
        let (public_view, privileged_view) = self.push_associations(&mut entries);

        for entry in &entries {
            validate_entry(entry)?;
        }

        let security = SecurityMaterial {
            server_system_title: *self.credentials.system_title(),
            block_cipher_key: *self.credentials.block_cipher_key(),
            authentication_key: *self.credentials.authentication_key(),
        };

        let directory = ObjectDirectory::assemble(entries, public_view, privileged_view, security)?;
        Ok(BuiltDirectory {
            directory,
            seed_values,
        })
    }

    fn push_core_objects(
        &self,
        entries: &mut Vec<DirectoryEntry>,
        seed_values: &mut HashMap<ObisCode, DataValue>,
    ) {
        entries.push(DirectoryEntry::new(
            ObjectKind::Clock,
            codes::CLOCK,
            0,
            clock_attributes(),
        ));
        seed_values.insert(codes::CLOCK, DataValue::DateTime(self.built_at));

        for obis in [
            codes::IMPORT_ACTIVE_ENERGY,
            codes::IMPORT_APPARENT_ENERGY,
            codes::EXPORT_ACTIVE_ENERGY,
            codes::EXPORT_APPARENT_ENERGY,
        ] {
            entries.push(DirectoryEntry::new(
                ObjectKind::Register,
                obis,
                0,
                register_attributes(),
            ));
            seed_values.insert(obis, DataValue::Unsigned32(SEED_READING));
        }

        for obis in [codes::INVOCATION_COUNTER, codes::INVOCATION_COUNTER_SHADOW] {
            entries.push(DirectoryEntry::new(
                ObjectKind::Data,
                obis,
                0,
                data_attributes(),
            ));
            seed_values.insert(obis, DataValue::Unsigned32(SEED_READING));
        }

        entries.push(DirectoryEntry::new(
            ObjectKind::ProfileBuffer,
            codes::LOAD_PROFILE,
            1,
            profile_attributes(),
        ));
        seed_values.insert(codes::LOAD_PROFILE, self.seed_profile_buffer());
    }

    /// Synthetic daily readings: one entry per day counting back
    /// [`PROFILE_DAYS`] days from the build instant, each register column
    /// increasing linearly by [`PROFILE_STEP`] per day. Deterministic for a
    /// given build instant.
    fn seed_profile_buffer(&self) -> DataValue {
        let start = self.built_at - Duration::days(PROFILE_DAYS as i64);
        let mut buffer = Vec::with_capacity(PROFILE_DAYS);
        for day in 0..PROFILE_DAYS {
            let mut fields = Vec::with_capacity(1 + PROFILE_BASES.len());
            fields.push(DataValue::DateTime(start + Duration::days(day as i64)));
            for base in PROFILE_BASES {
                fields.push(DataValue::Unsigned32(base + PROFILE_STEP * day as u32));
            }
            buffer.push(DataValue::Structure(fields));
        }
        DataValue::Array(buffer)
    }

    fn push_security_setup(&self, entries: &mut Vec<DirectoryEntry>) {
        entries.push(DirectoryEntry::new(
            ObjectKind::SecuritySetup,
            codes::SECURITY_SETUP,
            2,
            security_setup_attributes(),
        ));
    }

    fn push_associations(
        &self,
        entries: &mut Vec<DirectoryEntry>,
    ) -> (AssociationView, AssociationView) {
        entries.push(DirectoryEntry::new(
            ObjectKind::AssociationView,
            codes::PUBLIC_ASSOCIATION,
            2,
            association_attributes(),
        ));
        entries.push(DirectoryEntry::new(
            ObjectKind::AssociationView,
            codes::PRIVILEGED_ASSOCIATION,
            2,
            association_attributes(),
        ));

        // Both views enumerate the full directory, themselves included.
        // Identifier references only; the directory owns the entries.
        let object_list: Vec<(ObjectKind, ObisCode)> = entries
            .iter()
            .map(|e| (e.kind, e.logical_name))
            .collect();

        let public_view = AssociationView {
            logical_name: codes::PUBLIC_ASSOCIATION,
            level: AssociationLevel::Public,
            required_auth: AuthMechanism::None,
            client_sap: PUBLIC_CLIENT_SAP,
            max_pdu_size: MAX_PDU_SIZE,
            secret: None,
            object_list: object_list.clone(),
        };
        let privileged_view = AssociationView {
            logical_name: codes::PRIVILEGED_ASSOCIATION,
            level: AssociationLevel::Privileged,
            required_auth: AuthMechanism::High,
            client_sap: PRIVILEGED_CLIENT_SAP,
            max_pdu_size: MAX_PDU_SIZE,
            secret: Some(self.credentials.association_secret().to_vec()),
            object_list,
        };
        (public_view, privileged_view)
    }
}

/// Eager structural validation of one entry
///
/// Rejects undeclared attribute semantics, a missing or misplaced
/// logical-name attribute, and non-ascending attribute indexes.
pub(crate) fn validate_entry(entry: &DirectoryEntry) -> SimResult<()> {
    let first = entry.attributes.first().ok_or_else(|| {
        SimError::Directory(format!(
            "{} {} declares no attributes",
            entry.kind, entry.logical_name
        ))
    })?;
    if first.index != 1 || first.semantic != SemanticType::LogicalName {
        return Err(SimError::Directory(format!(
            "{} {}: attribute 1 must be the logical name",
            entry.kind, entry.logical_name
        )));
    }

    let mut previous = 0u8;
    for attribute in &entry.attributes {
        if attribute.semantic == SemanticType::Undeclared {
            return Err(SimError::Directory(format!(
                "{} {} attribute {} has no declared semantic type",
                entry.kind, entry.logical_name, attribute.index
            )));
        }
        if attribute.index <= previous {
            return Err(SimError::Directory(format!(
                "{} {}: attribute indexes must be strictly ascending",
                entry.kind, entry.logical_name
            )));
        }
        previous = attribute.index;
    }
    Ok(())
}

fn logical_name_attribute() -> AttributeDescriptor {
    AttributeDescriptor::new(1, SemanticType::LogicalName, AccessMode::Read)
}

fn register_attributes() -> Vec<AttributeDescriptor> {
    vec![
        logical_name_attribute(),
        AttributeDescriptor::new(2, SemanticType::DoubleLongUnsigned, AccessMode::Read),
        // scaler_unit
        AttributeDescriptor::new(3, SemanticType::Structure, AccessMode::NoAccess),
    ]
}

fn clock_attributes() -> Vec<AttributeDescriptor> {
    vec![
        logical_name_attribute(),
        AttributeDescriptor::new(2, SemanticType::DateTime, AccessMode::Read),
    ]
}

fn data_attributes() -> Vec<AttributeDescriptor> {
    vec![
        logical_name_attribute(),
        AttributeDescriptor::new(2, SemanticType::DoubleLongUnsigned, AccessMode::Read),
    ]
}

fn profile_attributes() -> Vec<AttributeDescriptor> {
    vec![
        logical_name_attribute(),
        // buffer
        AttributeDescriptor::new(2, SemanticType::Array, AccessMode::Read),
        // capture_objects
        AttributeDescriptor::new(3, SemanticType::Array, AccessMode::NoAccess),
        // capture_period
        AttributeDescriptor::new(4, SemanticType::DoubleLongUnsigned, AccessMode::NoAccess),
    ]
}

fn security_setup_attributes() -> Vec<AttributeDescriptor> {
    vec![
        logical_name_attribute(),
        // security_policy
        AttributeDescriptor::new(2, SemanticType::Enum, AccessMode::NoAccess),
        // security_suite
        AttributeDescriptor::new(3, SemanticType::Enum, AccessMode::NoAccess),
        // client_system_title
        AttributeDescriptor::new(4, SemanticType::OctetString, AccessMode::NoAccess),
        // server_system_title
        AttributeDescriptor::new(5, SemanticType::OctetString, AccessMode::NoAccess),
    ]
}

fn association_attributes() -> Vec<AttributeDescriptor> {
    vec![
        logical_name_attribute(),
        // object_list
        AttributeDescriptor::new(2, SemanticType::Array, AccessMode::Read),
    ]
}
