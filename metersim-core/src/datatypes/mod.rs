//! Data types used in meter readings

pub mod data_value;

pub use data_value::DataValue;
