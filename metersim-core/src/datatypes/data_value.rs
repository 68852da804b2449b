//! Tagged value type for meter readings
//!
//! Every reading a meter stores or serves is one of these variants. An
//! absent value is expressed as `Option::<DataValue>::None` at the store
//! boundary, never as `DataValue::Null`; the two are distinct results.

use chrono::{DateTime, Utc};

/// A single typed reading
#[derive(Debug, Clone, PartialEq)]
pub enum DataValue {
    /// Null data (a stored null, not an absent slot)
    Null,
    /// Boolean value
    Boolean(bool),
    /// Unsigned integer 8-bit
    Unsigned8(u8),
    /// Unsigned integer 16-bit
    Unsigned16(u16),
    /// Unsigned integer 32-bit
    Unsigned32(u32),
    /// Unsigned integer 64-bit
    Unsigned64(u64),
    /// Integer 32-bit
    Integer32(i32),
    /// Octet string
    OctetString(Vec<u8>),
    /// Visible string
    VisibleString(String),
    /// Date and time
    DateTime(DateTime<Utc>),
    /// Ordered list of values of one type
    Array(Vec<DataValue>),
    /// Ordered list of heterogeneous fields
    Structure(Vec<DataValue>),
}

impl DataValue {
    /// Interpret the value as an unsigned 64-bit integer, if numeric
    pub fn as_u64(&self) -> Option<u64> {
        match self {
            DataValue::Unsigned8(v) => Some(u64::from(*v)),
            DataValue::Unsigned16(v) => Some(u64::from(*v)),
            DataValue::Unsigned32(v) => Some(u64::from(*v)),
            DataValue::Unsigned64(v) => Some(*v),
            DataValue::Integer32(v) => u64::try_from(*v).ok(),
            _ => None,
        }
    }

    /// Interpret the value as a timestamp
    pub fn as_date_time(&self) -> Option<DateTime<Utc>> {
        match self {
            DataValue::DateTime(t) => Some(*t),
            _ => None,
        }
    }

    /// Whether this is the stored null variant
    pub fn is_null(&self) -> bool {
        matches!(self, DataValue::Null)
    }
}

impl From<u32> for DataValue {
    fn from(v: u32) -> Self {
        DataValue::Unsigned32(v)
    }
}

impl From<DateTime<Utc>> for DataValue {
    fn from(t: DateTime<Utc>) -> Self {
        DataValue::DateTime(t)
    }
}
