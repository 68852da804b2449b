use crate::error::{SimError, SimResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// OBIS (Object Identification System) code for identifying COSEM objects
///
/// OBIS codes are 6-byte identifiers used in DLMS/COSEM to uniquely identify
/// objects in a logical device. The simulator uses them as the keys of the
/// object directory and of every meter's value store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ObisCode {
    bytes: [u8; 6],
}

impl ObisCode {
    /// Create a new OBIS code from individual bytes
    pub const fn new(a: u8, b: u8, c: u8, d: u8, e: u8, f: u8) -> Self {
        Self {
            bytes: [a, b, c, d, e, f],
        }
    }

    /// Parse an OBIS code from dotted string format, e.g. "1.0.1.8.0.255"
    pub fn from_string(s: &str) -> SimResult<Self> {
        let parts: Vec<&str> = s.split('.').collect();
        if parts.len() != 6 {
            return Err(SimError::InvalidData(format!(
                "Invalid OBIS code format: {}",
                s
            )));
        }

        let mut bytes = [0u8; 6];
        for (i, part) in parts.iter().enumerate() {
            bytes[i] = part
                .parse::<u8>()
                .map_err(|_| SimError::InvalidData(format!("Invalid OBIS byte value: {}", part)))?;
        }

        Ok(Self { bytes })
    }

    /// Create an OBIS code from a 6-byte slice
    pub fn from_bytes(data: &[u8]) -> SimResult<Self> {
        if data.len() != 6 {
            return Err(SimError::InvalidData(format!(
                "OBIS code must be 6 bytes, got {}",
                data.len()
            )));
        }
        let mut bytes = [0u8; 6];
        bytes.copy_from_slice(data);
        Ok(Self { bytes })
    }

    /// Get the OBIS code as a byte array
    pub fn as_bytes(&self) -> &[u8; 6] {
        &self.bytes
    }
}

impl FromStr for ObisCode {
    type Err = SimError;

    fn from_str(s: &str) -> SimResult<Self> {
        Self::from_string(s)
    }
}

impl fmt::Display for ObisCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{}.{}.{}.{}.{}",
            self.bytes[0], self.bytes[1], self.bytes[2], self.bytes[3], self.bytes[4],
            self.bytes[5]
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_obis_code_new() {
        let code = ObisCode::new(1, 0, 1, 8, 0, 255);
        assert_eq!(code.as_bytes(), &[1, 0, 1, 8, 0, 255]);
    }

    #[test]
    fn test_obis_code_from_string() {
        let code = ObisCode::from_string("0.0.43.1.3.255").unwrap();
        assert_eq!(code, ObisCode::new(0, 0, 43, 1, 3, 255));
    }

    #[test]
    fn test_obis_code_from_string_rejects_bad_input() {
        assert!(ObisCode::from_string("1.2.3").is_err());
        assert!(ObisCode::from_string("1.2.3.4.5.999").is_err());
        assert!(ObisCode::from_string("a.b.c.d.e.f").is_err());
    }

    #[test]
    fn test_obis_code_display_round_trip() {
        let code = ObisCode::new(1, 0, 99, 2, 0, 255);
        assert_eq!(format!("{}", code), "1.0.99.2.0.255");
        assert_eq!(ObisCode::from_string(&code.to_string()).unwrap(), code);
    }

    #[test]
    fn test_obis_code_from_bytes() {
        let code = ObisCode::from_bytes(&[0, 0, 1, 0, 0, 255]).unwrap();
        assert_eq!(code, ObisCode::new(0, 0, 1, 0, 0, 255));
        assert!(ObisCode::from_bytes(&[1, 2, 3]).is_err());
    }
}
