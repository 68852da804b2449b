//! Core types and utilities for the DLMS meter fleet simulator
//!
//! This crate provides the vocabulary shared by every layer of the
//! simulator: error handling, OBIS codes, the tagged reading value,
//! and the object/access enumerations.

pub mod access;
pub mod error;
pub mod obis_code;
pub mod datatypes;

pub use access::{AccessMode, AssociationLevel, AuthMechanism, MethodAccess, ObjectKind};
pub use error::{SimError, SimResult};
pub use obis_code::ObisCode;
pub use datatypes::DataValue;
