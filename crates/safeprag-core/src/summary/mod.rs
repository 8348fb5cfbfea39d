pub mod grouper;
pub mod outcome;
pub mod range;

pub use grouper::{group, percentage, summarize};
pub use outcome::{DeviceGroup, DeviceSummaryRow, StatusEntry, StatusSummary};
pub use range::{compress, expand};
