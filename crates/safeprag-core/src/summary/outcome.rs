use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Devices of one type sharing a status, before range compression.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusEntry {
    pub name: String,
    pub count: u32,
    pub devices: Vec<u32>,
}

/// Saved devices aggregated by type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceGroup {
    #[serde(rename = "type")]
    pub device_type: String,
    /// Total devices of this type, with or without a status.
    pub quantity: u32,
    pub status: Vec<StatusEntry>,
    /// Every device number (or id) of this type, in save order.
    pub list: Vec<String>,
}

/// A status line of the report's device table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusSummary {
    pub name: String,
    pub count: u32,
    /// Compressed device numbers, e.g. "1-3, 5".
    pub devices: String,
    /// Share of all devices of this type, one decimal place.
    pub percentage: Decimal,
}

/// One row of the report's device table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceSummaryRow {
    #[serde(rename = "type")]
    pub device_type: String,
    pub quantity: u32,
    /// Statuses sorted by name.
    pub status: Vec<StatusSummary>,
    /// Compressed list of all device numbers.
    pub list: String,
}
