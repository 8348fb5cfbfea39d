use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum SafepragError {
    #[error("quantity {quantity} is out of range (allowed: 0 to {max})")]
    QuantityOutOfRange { quantity: i64, max: u32 },

    #[error("{quantity} devices starting at {start} run past the largest device number")]
    StartNumberOutOfRange { start: u32, quantity: u32 },

    #[error("no devices to save. Select a device type and quantity first")]
    NoDevicesToSave,

    #[error("select-all is only available with status '{expected}' (selected: '{status}')")]
    SelectAllRequiresDefault { status: String, expected: String },

    #[error("status '{status}' is not available for device type '{device_type}'")]
    StatusNotAllowed { status: String, device_type: String },

    #[error("device {number} is not in the current selection")]
    DeviceNotFound { number: u32 },

    #[error("a product is required for service type '{service_type}'")]
    MissingTreatmentProduct { service_type: String },

    #[error("missing required field: {0}")]
    MissingRequiredField(&'static str),

    #[error("{kind} '{value}' already exists")]
    DuplicateEntry { kind: &'static str, value: String },

    #[error("{kind} must not be empty")]
    EmptyEntry { kind: &'static str },

    #[error("unknown {kind} '{value}'")]
    UnknownEntry { kind: &'static str, value: String },

    #[error("service order {order_id} is already in progress. Finish it before starting another")]
    OrderAlreadyInProgress { order_id: String },

    #[error("invalid service order transition: {from} -> {to}")]
    InvalidTransition { from: String, to: String },

    #[error("service order not found: {0}")]
    OrderNotFound(String),

    #[error("schedule not found: {0}")]
    ScheduleNotFound(String),

    #[error("no service order is in progress")]
    NoActiveOrder,

    #[error("failed to load catalog from {path}: {reason}")]
    CatalogLoad { path: PathBuf, reason: String },

    #[error("invalid catalog: {0}")]
    CatalogInvalid(String),

    #[error("storage error for key '{key}': {reason}")]
    Store { key: String, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
