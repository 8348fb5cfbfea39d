pub mod catalog;
pub mod devices;
pub mod error;
pub mod model;
pub mod order;
pub mod pests;
pub mod report;
pub mod store;
pub mod summary;

use model::{Company, SavedDevice};
use order::ServiceOrder;
use report::schema::ServiceReport;
use summary::DeviceSummaryRow;

/// Group saved devices by type and compress their numbers into ranges,
/// ready for the report's device table.
pub fn summarize_devices(saved: &[SavedDevice]) -> Vec<DeviceSummaryRow> {
    summary::summarize(&summary::group(saved))
}

/// Assemble the service report of a finished (or approved) order.
pub fn report_for_order(order: &ServiceOrder, company: Option<&Company>) -> ServiceReport {
    report::assemble(&order::report_input(order, company))
}
