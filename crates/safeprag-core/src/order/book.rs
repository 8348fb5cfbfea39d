use crate::error::SafepragError;
use crate::model::{Schedule, ScheduleStatus, ServiceCategory, ServiceListItem};
use crate::order::counter::OrderCounter;
use crate::order::state::{clock_time, Completion, OrderStatus, ServiceOrder, StartMode};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use tracing::{info, warn};

/// Check that an order of `service_type` may be finished with `completion`.
///
/// - every treatment entry carries a product
/// - with a service list, at least one entry names its service type and target pest
/// - without one, a treatment order fails for lack of a product
/// - a monitoring-only order has saved devices
pub fn validate_completion(service_type: &str, completion: &Completion) -> Result<(), SafepragError> {
    let services = &completion.services;
    if services.is_empty() {
        if ServiceCategory::from_str_loose(service_type).requires_product() {
            return Err(SafepragError::MissingTreatmentProduct {
                service_type: service_type.to_string(),
            });
        }
    } else {
        if let Some(item) = services
            .iter()
            .find(|s| s.category().requires_product() && s.product.is_none())
        {
            return Err(SafepragError::MissingTreatmentProduct {
                service_type: item.service_type.clone(),
            });
        }
        if !services.iter().any(ServiceListItem::is_complete) {
            return Err(SafepragError::MissingRequiredField(
                "service type and target pest",
            ));
        }
    }

    let monitoring_only = if services.is_empty() {
        ServiceCategory::from_str_loose(service_type) == ServiceCategory::Monitoring
    } else {
        services
            .iter()
            .all(|s| s.category() == ServiceCategory::Monitoring)
    };
    if monitoring_only && completion.devices.is_empty() {
        return Err(SafepragError::MissingRequiredField("devices"));
    }
    Ok(())
}

/// Every schedule and service order, with the order-number sequence.
///
/// At most one order is `in_progress` at any time: [`OrderBook::start`]
/// checks and claims under `&mut self`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderBook {
    #[serde(default)]
    schedules: Vec<Schedule>,
    #[serde(default)]
    orders: Vec<ServiceOrder>,
    #[serde(default)]
    counter: OrderCounter,
}

impl OrderBook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_parts(schedules: Vec<Schedule>, orders: Vec<ServiceOrder>, counter: OrderCounter) -> Self {
        OrderBook {
            schedules,
            orders,
            counter,
        }
    }

    pub fn schedules(&self) -> &[Schedule] {
        &self.schedules
    }

    pub fn orders(&self) -> &[ServiceOrder] {
        &self.orders
    }

    pub fn counter(&self) -> OrderCounter {
        self.counter
    }

    pub fn schedule(&self, id: &str) -> Option<&Schedule> {
        self.schedules.iter().find(|s| s.id == id)
    }

    pub fn order(&self, id: &str) -> Option<&ServiceOrder> {
        self.orders.iter().find(|o| o.id == id)
    }

    /// The order currently in progress, if any.
    pub fn active_order(&self) -> Option<&ServiceOrder> {
        self.orders
            .iter()
            .find(|o| o.status == OrderStatus::InProgress)
    }

    pub fn add_schedule(&mut self, schedule: Schedule) -> Result<&Schedule, SafepragError> {
        if schedule.id.trim().is_empty() {
            return Err(SafepragError::MissingRequiredField("schedule id"));
        }
        if schedule.client_name.trim().is_empty() {
            return Err(SafepragError::MissingRequiredField("client name"));
        }
        if self.schedule(&schedule.id).is_some() {
            return Err(SafepragError::DuplicateEntry {
                kind: "schedule",
                value: schedule.id,
            });
        }
        self.schedules.push(schedule);
        Ok(&self.schedules[self.schedules.len() - 1])
    }

    fn pending_schedule_index(&self, schedule_id: &str, to: OrderStatus) -> Result<usize, SafepragError> {
        let idx = self
            .schedules
            .iter()
            .position(|s| s.id == schedule_id)
            .ok_or_else(|| SafepragError::ScheduleNotFound(schedule_id.to_string()))?;
        let status = self.schedules[idx].status;
        if status != ScheduleStatus::Pending {
            return Err(SafepragError::InvalidTransition {
                from: status.to_string(),
                to: to.to_string(),
            });
        }
        Ok(idx)
    }

    fn order_index(&self, order_id: &str) -> Result<usize, SafepragError> {
        self.orders
            .iter()
            .position(|o| o.id == order_id)
            .ok_or_else(|| SafepragError::OrderNotFound(order_id.to_string()))
    }

    fn set_schedule_status(&mut self, schedule_id: &str, status: ScheduleStatus) {
        match self.schedules.iter_mut().find(|s| s.id == schedule_id) {
            Some(schedule) => schedule.status = status,
            None => warn!(schedule_id, "order refers to a missing schedule"),
        }
    }

    /// Start an order for a pending schedule.
    ///
    /// Fails with `OrderAlreadyInProgress` while another order is active.
    pub fn start(
        &mut self,
        schedule_id: &str,
        mode: StartMode,
        at: OffsetDateTime,
    ) -> Result<&ServiceOrder, SafepragError> {
        if let Some(active) = self.active_order() {
            return Err(SafepragError::OrderAlreadyInProgress {
                order_id: active.id.clone(),
            });
        }
        let idx = self.pending_schedule_index(schedule_id, OrderStatus::InProgress)?;

        let number = self.counter.next();
        let mut order = ServiceOrder::from_schedule(&self.schedules[idx], number, at);
        order.transition(OrderStatus::InProgress, at)?;
        match mode {
            StartMode::Live => order.start_time = clock_time(at),
            StartMode::Retroactive(visit) => {
                order.retroactive = true;
                order.date = visit.date;
                order.start_time = visit.start_time;
                order.end_time = visit.end_time;
            }
        }

        self.schedules[idx].status = ScheduleStatus::InProgress;
        info!(
            order_id = %order.id,
            order_number = number,
            schedule_id,
            retroactive = order.retroactive,
            "claimed service order"
        );
        self.orders.push(order);
        Ok(&self.orders[self.orders.len() - 1])
    }

    /// Record that a scheduled visit could not happen.
    pub fn register_no_service(
        &mut self,
        schedule_id: &str,
        reason: &str,
        at: OffsetDateTime,
    ) -> Result<&ServiceOrder, SafepragError> {
        let reason = reason.trim();
        if reason.is_empty() {
            return Err(SafepragError::MissingRequiredField("no-service reason"));
        }
        let idx = self.pending_schedule_index(schedule_id, OrderStatus::Cancelled)?;

        let number = self.counter.next();
        let mut order = ServiceOrder::from_schedule(&self.schedules[idx], number, at);
        order.transition(OrderStatus::Cancelled, at)?;
        order.no_service_reason = Some(reason.to_string());
        order.start_time = clock_time(at);
        order.end_time = order.start_time.clone();

        self.schedules[idx].status = ScheduleStatus::Cancelled;
        info!(order_id = %order.id, schedule_id, "registered visit without service");
        self.orders.push(order);
        Ok(&self.orders[self.orders.len() - 1])
    }

    /// Complete an in-progress order with the data gathered during the visit.
    ///
    /// A failed validation leaves the order in progress and unchanged.
    pub fn finish(
        &mut self,
        order_id: &str,
        completion: Completion,
        at: OffsetDateTime,
    ) -> Result<&ServiceOrder, SafepragError> {
        let idx = self.order_index(order_id)?;
        let order = &self.orders[idx];
        if !order.status.can_transition_to(OrderStatus::Completed) {
            return Err(SafepragError::InvalidTransition {
                from: order.status.to_string(),
                to: OrderStatus::Completed.to_string(),
            });
        }
        if let Err(e) = validate_completion(&order.service_type, &completion) {
            warn!(order_id, error = %e, "service order cannot be finished");
            return Err(e);
        }

        let order = &mut self.orders[idx];
        order.transition(OrderStatus::Completed, at)?;
        order.client = completion.client;
        order.services = completion.services;
        order.devices = completion.devices;
        order.pest_counts = completion.pest_counts;
        order.observations = completion.observations;
        order.signatures = completion.signatures;
        if order.end_time.is_empty() {
            order.end_time = clock_time(at);
        }
        let schedule_id = order.schedule_id.clone();

        self.set_schedule_status(&schedule_id, ScheduleStatus::Completed);
        info!(order_id, "service order completed");
        Ok(&self.orders[idx])
    }

    /// Approve a completed order.
    pub fn approve(&mut self, order_id: &str, at: OffsetDateTime) -> Result<&ServiceOrder, SafepragError> {
        let idx = self.order_index(order_id)?;
        self.orders[idx].transition(OrderStatus::Approved, at)?;
        info!(order_id, "service order approved");
        Ok(&self.orders[idx])
    }

    /// Abandon an in-progress order.
    pub fn cancel(
        &mut self,
        order_id: &str,
        reason: &str,
        at: OffsetDateTime,
    ) -> Result<&ServiceOrder, SafepragError> {
        let idx = self.order_index(order_id)?;
        let order = &mut self.orders[idx];
        if order.status != OrderStatus::InProgress {
            return Err(SafepragError::InvalidTransition {
                from: order.status.to_string(),
                to: OrderStatus::Cancelled.to_string(),
            });
        }
        order.transition(OrderStatus::Cancelled, at)?;
        let reason = reason.trim();
        if !reason.is_empty() {
            order.no_service_reason = Some(reason.to_string());
        }
        let schedule_id = order.schedule_id.clone();

        self.set_schedule_status(&schedule_id, ScheduleStatus::Cancelled);
        info!(order_id, "service order cancelled");
        Ok(&self.orders[idx])
    }
}
