//! Service-order lifecycle.
//!
//! Orders move `pending -> in_progress -> completed -> approved`. A visit
//! that could not happen goes `pending -> cancelled` directly, and an order
//! abandoned mid-visit may go `in_progress -> cancelled`.

use crate::error::SafepragError;
use crate::model::{Client, DevicePestCount, Schedule, ServiceListItem, Signatures};
use crate::summary::DeviceGroup;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use time::OffsetDateTime;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    #[default]
    Pending,
    InProgress,
    Completed,
    Cancelled,
    Approved,
}

impl OrderStatus {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
            Self::Approved => "approved",
        }
    }

    #[must_use]
    pub const fn can_transition_to(&self, next: OrderStatus) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::InProgress)
                | (Self::Pending, Self::Cancelled)
                | (Self::InProgress, Self::Completed)
                | (Self::InProgress, Self::Cancelled)
                | (Self::Completed, Self::Approved)
        )
    }

    /// No transition leaves a terminal status.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Cancelled | Self::Approved)
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = SafepragError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "in_progress" => Ok(Self::InProgress),
            "completed" => Ok(Self::Completed),
            "cancelled" => Ok(Self::Cancelled),
            "approved" => Ok(Self::Approved),
            _ => Err(SafepragError::UnknownEntry {
                kind: "order status",
                value: s.to_string(),
            }),
        }
    }
}

/// Date and times supplied for a visit registered after the fact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RetroactiveVisit {
    pub date: String,
    pub start_time: String,
    #[serde(default)]
    pub end_time: String,
}

/// How an order is started.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StartMode {
    /// Starts now and clears the previous order's working data.
    Live,
    /// Registers a past visit; working data is kept.
    Retroactive(RetroactiveVisit),
}

impl StartMode {
    pub fn is_retroactive(&self) -> bool {
        matches!(self, StartMode::Retroactive(_))
    }
}

/// Data attached to an order when it is finished.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Completion {
    pub client: Option<Client>,
    pub services: Vec<ServiceListItem>,
    pub devices: Vec<DeviceGroup>,
    pub pest_counts: Vec<DevicePestCount>,
    pub observations: String,
    pub signatures: Signatures,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceOrder {
    pub id: String,
    pub order_number: u64,
    pub schedule_id: String,
    pub client_id: String,
    pub client_name: String,
    #[serde(default)]
    pub client_address: String,
    pub service_type: String,
    pub date: String,
    #[serde(default)]
    pub start_time: String,
    #[serde(default)]
    pub end_time: String,
    pub status: OrderStatus,
    #[serde(default)]
    pub retroactive: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub no_service_reason: Option<String>,
    #[serde(default)]
    pub client: Option<Client>,
    #[serde(default)]
    pub services: Vec<ServiceListItem>,
    #[serde(default)]
    pub devices: Vec<DeviceGroup>,
    #[serde(default)]
    pub pest_counts: Vec<DevicePestCount>,
    #[serde(default)]
    pub observations: String,
    #[serde(default)]
    pub signatures: Signatures,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl ServiceOrder {
    /// A pending order carrying a snapshot of the schedule.
    pub fn from_schedule(schedule: &Schedule, order_number: u64, at: OffsetDateTime) -> Self {
        ServiceOrder {
            id: uuid::Uuid::new_v4().to_string(),
            order_number,
            schedule_id: schedule.id.clone(),
            client_id: schedule.client_id.clone(),
            client_name: schedule.client_name.clone(),
            client_address: schedule.client_address.clone(),
            service_type: schedule.service_type.clone(),
            date: schedule.date.clone(),
            start_time: String::new(),
            end_time: String::new(),
            status: OrderStatus::Pending,
            retroactive: false,
            no_service_reason: None,
            client: None,
            services: Vec::new(),
            devices: Vec::new(),
            pest_counts: Vec::new(),
            observations: String::new(),
            signatures: Signatures::default(),
            created_at: at,
            updated_at: at,
        }
    }

    /// Move to `next`, or fail leaving the order untouched.
    pub fn transition(&mut self, next: OrderStatus, at: OffsetDateTime) -> Result<(), SafepragError> {
        if !self.status.can_transition_to(next) {
            return Err(SafepragError::InvalidTransition {
                from: self.status.to_string(),
                to: next.to_string(),
            });
        }
        self.status = next;
        self.updated_at = at;
        Ok(())
    }
}

/// Wall-clock time of day as `HH:MM:SS`.
pub fn clock_time(at: OffsetDateTime) -> String {
    format!("{:02}:{:02}:{:02}", at.hour(), at.minute(), at.second())
}
