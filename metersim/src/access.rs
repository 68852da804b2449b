//! Attribute access policy
//!
//! A pure permission table consulted by the bridge for every request. The
//! match is exhaustive over every object kind the directory builder emits,
//! so no `(kind, attribute)` pair the builder produces can fall through by
//! omission; unmatched attributes are an explicit `NoAccess`.

use metersim_core::{AccessMode, AssociationLevel, MethodAccess, ObjectKind};

/// Attribute index that always holds the logical name
pub const LOGICAL_NAME_ATTRIBUTE: u8 = 1;
/// Attribute index that holds the value/buffer/object-list payload for
/// every kind in the demonstration set
pub const VALUE_ATTRIBUTE: u8 = 2;

/// Permission for one attribute under one association
///
/// Rules, first match wins:
/// 1. Register and Clock value attributes are read-only regardless of
///    association.
/// 2. Data points (the invocation counters) read for the public
///    association, read-write for the privileged one.
/// 3. The association view's own object-list attribute is read-only.
/// 4. The profile buffer's buffer attribute is read-only.
/// 5. The logical-name attribute is readable on every kind.
/// 6. Anything else is explicitly NoAccess.
pub fn attribute_access(
    kind: ObjectKind,
    attribute: u8,
    level: AssociationLevel,
) -> AccessMode {
    match (kind, attribute) {
        (ObjectKind::Register, VALUE_ATTRIBUTE) => AccessMode::Read,
        (ObjectKind::Clock, VALUE_ATTRIBUTE) => AccessMode::Read,
        (ObjectKind::Data, VALUE_ATTRIBUTE) => match level {
            AssociationLevel::Public => AccessMode::Read,
            AssociationLevel::Privileged => AccessMode::ReadWrite,
        },
        (ObjectKind::AssociationView, VALUE_ATTRIBUTE) => AccessMode::Read,
        (ObjectKind::ProfileBuffer, VALUE_ATTRIBUTE) => AccessMode::Read,
        (_, LOGICAL_NAME_ATTRIBUTE) => AccessMode::Read,
        (ObjectKind::Register, _)
        | (ObjectKind::Clock, _)
        | (ObjectKind::Data, _)
        | (ObjectKind::ProfileBuffer, _)
        | (ObjectKind::SecuritySetup, _)
        | (ObjectKind::AssociationView, _) => AccessMode::NoAccess,
    }
}

/// Method permission; the demonstration object set exposes no destructive
/// methods, so invocation is always granted
pub fn method_access(_kind: ObjectKind, _method: u8) -> MethodAccess {
    MethodAccess::Allowed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::directory::builder::DirectoryBuilder;
    use crate::meter::Credentials;

    const LEVELS: [AssociationLevel; 2] =
        [AssociationLevel::Public, AssociationLevel::Privileged];

    #[test]
    fn test_register_and_clock_values_read_only() {
        for level in LEVELS {
            assert_eq!(
                attribute_access(ObjectKind::Register, 2, level),
                AccessMode::Read
            );
            assert_eq!(
                attribute_access(ObjectKind::Clock, 2, level),
                AccessMode::Read
            );
        }
    }

    #[test]
    fn test_counter_writable_only_for_privileged() {
        assert_eq!(
            attribute_access(ObjectKind::Data, 2, AssociationLevel::Public),
            AccessMode::Read
        );
        assert_eq!(
            attribute_access(ObjectKind::Data, 2, AssociationLevel::Privileged),
            AccessMode::ReadWrite
        );
    }

    #[test]
    fn test_structural_attributes_read_only() {
        for level in LEVELS {
            assert_eq!(
                attribute_access(ObjectKind::AssociationView, 2, level),
                AccessMode::Read
            );
            assert_eq!(
                attribute_access(ObjectKind::ProfileBuffer, 2, level),
                AccessMode::Read
            );
        }
    }

    #[test]
    fn test_logical_name_readable_everywhere() {
        for kind in [
            ObjectKind::Register,
            ObjectKind::Clock,
            ObjectKind::Data,
            ObjectKind::ProfileBuffer,
            ObjectKind::SecuritySetup,
            ObjectKind::AssociationView,
        ] {
            for level in LEVELS {
                assert_eq!(attribute_access(kind, 1, level), AccessMode::Read);
            }
        }
    }

    #[test]
    fn test_unmatched_attributes_denied() {
        for level in LEVELS {
            assert_eq!(
                attribute_access(ObjectKind::Register, 3, level),
                AccessMode::NoAccess
            );
            assert_eq!(
                attribute_access(ObjectKind::SecuritySetup, 2, level),
                AccessMode::NoAccess
            );
        }
    }

    /// The table is total over every attribute the builder actually emits,
    /// and the privileged permission set is a superset of the public one.
    #[test]
    fn test_policy_total_over_built_directory() {
        let credentials = Credentials::default();
        let built = DirectoryBuilder::new(&credentials).build().unwrap();

        for entry in built.directory.entries() {
            for attribute in &entry.attributes {
                let public = attribute_access(
                    entry.kind,
                    attribute.index,
                    AssociationLevel::Public,
                );
                let privileged = attribute_access(
                    entry.kind,
                    attribute.index,
                    AssociationLevel::Privileged,
                );
                if public.allows_read() {
                    assert!(
                        privileged.allows_read(),
                        "{} attr {} readable publicly but not privileged",
                        entry.kind,
                        attribute.index
                    );
                }
                if public.allows_write() {
                    assert!(privileged.allows_write());
                }
                // Every declared-readable attribute must not silently fall
                // through to NoAccess.
                if attribute.default_access.allows_read() {
                    assert!(
                        public.allows_read() || privileged.allows_read(),
                        "{} attr {} dropped by the policy table",
                        entry.kind,
                        attribute.index
                    );
                }
            }
        }
    }

    #[test]
    fn test_methods_always_allowed() {
        assert_eq!(
            method_access(ObjectKind::ProfileBuffer, 1),
            MethodAccess::Allowed
        );
        assert_eq!(method_access(ObjectKind::Clock, 2), MethodAccess::Allowed);
    }
}
