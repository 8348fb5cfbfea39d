use crate::model::Schedule;
use crate::order::state::ServiceOrder;
use crate::report::schema::ServiceReport;
use tracing::info;

/// Receives lifecycle notifications from an [`Activity`](crate::order::Activity).
///
/// Every method defaults to a no-op so observers implement only what they need.
pub trait OrderObserver {
    fn on_order_started(&mut self, _order: &ServiceOrder) {}

    fn on_order_finished(&mut self, _order: &ServiceOrder, _report: &ServiceReport) {}

    fn on_schedule_updated(&mut self, _schedule: &Schedule) {}
}

/// Logs every notification at info level.
#[derive(Debug, Default)]
pub struct TracingObserver;

impl OrderObserver for TracingObserver {
    fn on_order_started(&mut self, order: &ServiceOrder) {
        info!(
            order_id = %order.id,
            order_number = order.order_number,
            retroactive = order.retroactive,
            "service order started"
        );
    }

    fn on_order_finished(&mut self, order: &ServiceOrder, report: &ServiceReport) {
        info!(
            order_id = %order.id,
            file_name = %report.file_name,
            "service order finished"
        );
    }

    fn on_schedule_updated(&mut self, schedule: &Schedule) {
        info!(schedule_id = %schedule.id, status = %schedule.status, "schedule updated");
    }
}
