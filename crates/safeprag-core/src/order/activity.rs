use crate::catalog::dynamic::{DynamicCatalog, EntryKind};
use crate::catalog::schema::CatalogDef;
use crate::catalog::available_statuses;
use crate::devices::DeviceSession;
use crate::error::SafepragError;
use crate::model::{
    Client, Company, DeviceInstance, DevicePestCount, Pest, ServiceListItem, Signatures,
};
use crate::order::book::OrderBook;
use crate::order::events::OrderObserver;
use crate::order::state::{Completion, ServiceOrder, StartMode};
use crate::pests::PestCounter;
use crate::report::assemble;
use crate::report::schema::{ReportInput, ReportService, ServiceReport};
use crate::summary::group;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use tracing::{debug, info};

/// Data gathered while a visit is under way.
///
/// Cleared by a live start; a retroactive start keeps it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkingState {
    pub devices: DeviceSession,
    pub pests: PestCounter,
    pub statuses: DynamicCatalog,
    pub pest_names: DynamicCatalog,
    pub service_types: DynamicCatalog,
    #[serde(default)]
    pub services: Vec<ServiceListItem>,
    #[serde(default)]
    pub observations: String,
    #[serde(default)]
    pub signatures: Signatures,
}

impl WorkingState {
    pub fn new(catalog: &CatalogDef) -> Self {
        WorkingState {
            devices: DeviceSession::new(),
            pests: PestCounter::new(),
            statuses: DynamicCatalog::new(EntryKind::Status, catalog.all_statuses()),
            pest_names: DynamicCatalog::new(EntryKind::Pest, catalog.pests.clone()),
            service_types: DynamicCatalog::new(
                EntryKind::ServiceType,
                catalog.service_type_names(),
            ),
            services: Vec::new(),
            observations: String::new(),
            signatures: Signatures::default(),
        }
    }

    pub fn reset(&mut self) {
        self.devices.reset();
        self.pests.reset();
        self.statuses.reset();
        self.pest_names.reset();
        self.service_types.reset();
        self.services.clear();
        self.observations.clear();
        self.signatures = Signatures::default();
    }
}

/// Build the report input for an order.
///
/// Falls back to the order's client snapshot when no full client record
/// was attached.
pub fn report_input(order: &ServiceOrder, company: Option<&Company>) -> ReportInput {
    let client = order.client.clone().unwrap_or_else(|| Client {
        code: order.client_id.clone(),
        name: order.client_name.clone(),
        address: order.client_address.clone(),
        ..Default::default()
    });
    ReportInput {
        order_number: order.order_number.to_string(),
        date: order.date.clone(),
        start_time: order.start_time.clone(),
        end_time: order.end_time.clone(),
        company: company.cloned(),
        client,
        services: order.services.iter().map(ReportService::from).collect(),
        service: None,
        product: None,
        devices: order.devices.clone(),
        pest_counts: order.pest_counts.clone(),
        observations: order.observations.clone(),
        signatures: order.signatures.clone(),
    }
}

/// Drives a visit: starts orders, collects devices, pests and services,
/// and finishes with an assembled report.
pub struct Activity {
    catalog: CatalogDef,
    book: OrderBook,
    working: WorkingState,
    observers: Vec<Box<dyn OrderObserver>>,
}

impl Activity {
    pub fn new(catalog: CatalogDef, book: OrderBook) -> Self {
        let working = WorkingState::new(&catalog);
        Self::with_working(catalog, book, working)
    }

    pub fn with_working(catalog: CatalogDef, book: OrderBook, working: WorkingState) -> Self {
        Activity {
            catalog,
            book,
            working,
            observers: Vec::new(),
        }
    }

    pub fn add_observer(&mut self, observer: Box<dyn OrderObserver>) {
        self.observers.push(observer);
    }

    pub fn catalog(&self) -> &CatalogDef {
        &self.catalog
    }

    pub fn book(&self) -> &OrderBook {
        &self.book
    }

    pub fn book_mut(&mut self) -> &mut OrderBook {
        &mut self.book
    }

    pub fn working(&self) -> &WorkingState {
        &self.working
    }

    fn notify_schedule(&mut self, schedule_id: &str) {
        if let Some(schedule) = self.book.schedule(schedule_id) {
            for observer in &mut self.observers {
                observer.on_schedule_updated(schedule);
            }
        }
    }

    pub fn start(
        &mut self,
        schedule_id: &str,
        mode: StartMode,
        at: OffsetDateTime,
    ) -> Result<ServiceOrder, SafepragError> {
        let retroactive = mode.is_retroactive();
        let order = self.book.start(schedule_id, mode, at)?.clone();
        if !retroactive {
            self.working.reset();
            debug!(order_id = %order.id, "cleared working state for live start");
        }
        for observer in &mut self.observers {
            observer.on_order_started(&order);
        }
        self.notify_schedule(schedule_id);
        Ok(order)
    }

    pub fn register_no_service(
        &mut self,
        schedule_id: &str,
        reason: &str,
        at: OffsetDateTime,
    ) -> Result<ServiceOrder, SafepragError> {
        let order = self.book.register_no_service(schedule_id, reason, at)?.clone();
        self.notify_schedule(schedule_id);
        Ok(order)
    }

    // Devices

    /// Statuses offered for the selected device type, custom ones included.
    pub fn statuses(&self) -> Vec<String> {
        available_statuses(
            &self.catalog,
            self.working.devices.selected_type(),
            self.working.statuses.added(),
        )
    }

    pub fn add_status(&mut self, status: &str) -> Result<String, SafepragError> {
        self.working.statuses.add(status).map(str::to_string)
    }

    /// Remove a custom status, dropping it as the selected status too.
    pub fn remove_status(&mut self, status: &str) -> Result<(), SafepragError> {
        let mut selection = self.working.devices.selected_status().to_string();
        self.working.statuses.remove(status, &mut selection)?;
        if selection.is_empty() {
            self.working.devices.clear_status();
        }
        Ok(())
    }

    pub fn select_devices(
        &mut self,
        device_type: &str,
        quantity: i64,
        start_number: u32,
    ) -> Result<&[DeviceInstance], SafepragError> {
        self.working.devices.select(device_type, quantity, start_number)
    }

    pub fn set_status(&mut self, status: &str) -> Result<(), SafepragError> {
        self.working
            .devices
            .set_status(&self.catalog, status, self.working.statuses.added())
    }

    pub fn tap(&mut self, number: u32) -> Result<&DeviceInstance, SafepragError> {
        self.working.devices.tap(&self.catalog, number)
    }

    pub fn select_all(&mut self) -> Result<(), SafepragError> {
        self.working.devices.select_all(&self.catalog)
    }

    pub fn save_devices(&mut self) -> Result<usize, SafepragError> {
        self.working.devices.save()
    }

    // Pests

    pub fn add_pest(&mut self, name: &str) -> Result<String, SafepragError> {
        self.working.pest_names.add(name).map(str::to_string)
    }

    fn known_pest(&self, name: &str) -> Result<(), SafepragError> {
        if self.working.pest_names.contains(name) {
            Ok(())
        } else {
            Err(SafepragError::UnknownEntry {
                kind: EntryKind::Pest.as_str(),
                value: name.to_string(),
            })
        }
    }

    pub fn record_pest(
        &mut self,
        device_type: &str,
        device_number: u32,
        pest: &str,
        delta: i64,
    ) -> Result<&[Pest], SafepragError> {
        self.known_pest(pest)?;
        Ok(self
            .working
            .pests
            .record_count(device_type, device_number, pest, delta))
    }

    pub fn set_pest_count(
        &mut self,
        device_type: &str,
        device_number: u32,
        pest: &str,
        raw: &str,
    ) -> Result<&[Pest], SafepragError> {
        self.known_pest(pest)?;
        Ok(self
            .working
            .pests
            .set_count(device_type, device_number, pest, raw))
    }

    pub fn commit_pests(&mut self, device_type: &str, device_number: u32) -> Option<DevicePestCount> {
        self.working.pests.commit(device_type, device_number)
    }

    // Services

    pub fn add_service_type(&mut self, name: &str) -> Result<String, SafepragError> {
        self.working.service_types.add(name).map(str::to_string)
    }

    /// Append a service entry. The product is looked up in the catalog and
    /// dropped for service types that do not carry one.
    pub fn add_service(
        &mut self,
        service_type: &str,
        target_pest: &str,
        location: &str,
        product_id: Option<&str>,
        amount: &str,
    ) -> Result<&ServiceListItem, SafepragError> {
        if !self.working.service_types.contains(service_type) {
            return Err(SafepragError::UnknownEntry {
                kind: EntryKind::ServiceType.as_str(),
                value: service_type.to_string(),
            });
        }
        let product = match product_id {
            Some(id) => Some(self.catalog.product(id).cloned().ok_or_else(|| {
                SafepragError::UnknownEntry {
                    kind: "product",
                    value: id.to_string(),
                }
            })?),
            None => None,
        };
        let mut item = ServiceListItem::new(service_type.trim()).with_product(product, amount.trim());
        item.target_pest = target_pest.trim().to_string();
        item.location = location.trim().to_string();
        debug!(service_type, category = %item.category(), "added service entry");
        self.working.services.push(item);
        Ok(&self.working.services[self.working.services.len() - 1])
    }

    pub fn remove_service(&mut self, id: &str) -> Result<(), SafepragError> {
        let idx = self
            .working
            .services
            .iter()
            .position(|s| s.id == id)
            .ok_or_else(|| SafepragError::UnknownEntry {
                kind: "service entry",
                value: id.to_string(),
            })?;
        self.working.services.remove(idx);
        Ok(())
    }

    pub fn set_observations(&mut self, text: &str) {
        self.working.observations = text.to_string();
    }

    pub fn set_signatures(&mut self, signatures: Signatures) {
        self.working.signatures = signatures;
    }

    /// Everything gathered so far, shaped for [`OrderBook::finish`].
    pub fn completion(&self, client: Option<Client>) -> Completion {
        Completion {
            client,
            services: self.working.services.clone(),
            devices: group(self.working.devices.saved()),
            pest_counts: self.working.pests.committed().to_vec(),
            observations: self.working.observations.clone(),
            signatures: self.working.signatures.clone(),
        }
    }

    /// Finish the active order and assemble its report.
    pub fn finish(
        &mut self,
        company: Option<&Company>,
        client: Option<Client>,
        at: OffsetDateTime,
    ) -> Result<(ServiceOrder, ServiceReport), SafepragError> {
        let order_id = self
            .book
            .active_order()
            .map(|o| o.id.clone())
            .ok_or(SafepragError::NoActiveOrder)?;
        let completion = self.completion(client);
        let order = self.book.finish(&order_id, completion, at)?.clone();

        let report = assemble(&report_input(&order, company));
        info!(order_id = %order.id, sections = report.sections.len(), "report ready");
        for observer in &mut self.observers {
            observer.on_order_finished(&order, &report);
        }
        self.notify_schedule(&order.schedule_id);
        Ok((order, report))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::builtin::default_catalog;
    use crate::model::{Schedule, ScheduleStatus};
    use crate::order::state::{OrderStatus, RetroactiveVisit};
    use std::cell::RefCell;
    use std::rc::Rc;
    use time::macros::datetime;

    fn schedule(id: &str, service_type: &str) -> Schedule {
        Schedule {
            id: id.into(),
            client_id: "c9".into(),
            client_name: "Mercado Bom Preço".into(),
            client_address: "Av. Brasil, 500".into(),
            client_contact: String::new(),
            client_phone: String::new(),
            date: "2024-03-15".into(),
            start_time: String::new(),
            end_time: String::new(),
            service_type: service_type.into(),
            status: ScheduleStatus::Pending,
            notes: String::new(),
        }
    }

    fn activity() -> Activity {
        let mut book = OrderBook::new();
        book.add_schedule(schedule("s1", "Inspeção")).unwrap();
        book.add_schedule(schedule("s2", "Monitoramento")).unwrap();
        book.add_schedule(schedule("s3", "Pulverização")).unwrap();
        Activity::new(default_catalog().unwrap(), book)
    }

    fn at() -> OffsetDateTime {
        datetime!(2024-03-15 08:00 UTC)
    }

    #[derive(Default)]
    struct Recorder {
        events: Rc<RefCell<Vec<String>>>,
    }

    impl OrderObserver for Recorder {
        fn on_order_started(&mut self, order: &ServiceOrder) {
            self.events.borrow_mut().push(format!("started {}", order.order_number));
        }

        fn on_order_finished(&mut self, _order: &ServiceOrder, report: &ServiceReport) {
            self.events.borrow_mut().push(format!("finished {}", report.file_name));
        }

        fn on_schedule_updated(&mut self, schedule: &Schedule) {
            self.events
                .borrow_mut()
                .push(format!("schedule {} {}", schedule.id, schedule.status));
        }
    }

    #[test]
    fn test_live_start_clears_working_state() {
        let mut activity = activity();
        activity.add_pest("Lacraias").unwrap();
        activity.select_devices("Porta isca", 2, 1).unwrap();
        activity.save_devices().unwrap();

        activity.start("s1", StartMode::Live, at()).unwrap();
        assert!(activity.working().devices.saved().is_empty());
        assert!(activity.working().pest_names.added().is_empty());
    }

    #[test]
    fn test_retroactive_start_keeps_working_state() {
        let mut activity = activity();
        activity.select_devices("Porta isca", 2, 1).unwrap();
        activity.save_devices().unwrap();
        let visit = RetroactiveVisit {
            date: "2024-03-01".into(),
            start_time: "14:00".into(),
            end_time: "15:30".into(),
        };
        activity
            .start("s1", StartMode::Retroactive(visit), at())
            .unwrap();
        assert_eq!(activity.working().devices.saved().len(), 2);
    }

    #[test]
    fn test_custom_status_can_be_selected_and_removed() {
        let mut activity = activity();
        activity.select_devices("Porta isca", 3, 1).unwrap();
        activity.add_status("Removida pelo cliente").unwrap();
        assert!(activity
            .statuses()
            .contains(&"Removida pelo cliente".to_string()));
        activity.set_status("Removida pelo cliente").unwrap();

        activity.remove_status("Removida pelo cliente").unwrap();
        assert_eq!(activity.working().devices.selected_status(), "");
        let tapped = activity.tap(1).unwrap();
        assert_eq!(tapped.status.as_deref(), Some("Conforme"));
    }

    #[test]
    fn test_unknown_pest_rejected() {
        let mut activity = activity();
        assert!(matches!(
            activity.record_pest("Porta isca", 1, "Dragões", 1),
            Err(SafepragError::UnknownEntry { .. })
        ));
        activity.add_pest("Lacraias").unwrap();
        assert!(activity.record_pest("Porta isca", 1, "lacraias", 1).is_ok());
    }

    #[test]
    fn test_inspection_service_drops_product() {
        let mut catalog = default_catalog().unwrap();
        catalog.products.push(crate::model::Product {
            id: "p1".into(),
            name: "Gel X".into(),
            active_ingredient: "Fipronil".into(),
            chemical_group: "Fenilpirazol".into(),
            registration: "999".into(),
            batch: "B2".into(),
            expiration_date: "2025-06-30".into(),
            measure: crate::model::Measure::G,
            diluent: String::new(),
        });
        let mut activity = Activity::new(catalog, OrderBook::new());
        let item = activity
            .add_service("Inspeção", "Baratas", "Cozinha", Some("p1"), "10")
            .unwrap();
        assert!(item.product.is_none());
        assert!(matches!(
            activity.add_service("Inspeção", "Baratas", "Cozinha", Some("nope"), ""),
            Err(SafepragError::UnknownEntry { .. })
        ));
        assert!(matches!(
            activity.add_service("Desratização", "Ratos", "", None, ""),
            Err(SafepragError::UnknownEntry { .. })
        ));
    }

    #[test]
    fn test_finish_without_active_order() {
        let mut activity = activity();
        assert!(matches!(
            activity.finish(None, None, at()),
            Err(SafepragError::NoActiveOrder)
        ));
    }

    #[test]
    fn test_treatment_without_product_keeps_order_in_progress() {
        let mut activity = activity();
        let order = activity.start("s3", StartMode::Live, at()).unwrap();
        activity
            .add_service("Pulverização", "Baratas", "Depósito", None, "")
            .unwrap();
        assert!(matches!(
            activity.finish(None, None, at()),
            Err(SafepragError::MissingTreatmentProduct { .. })
        ));
        assert_eq!(
            activity.book().order(&order.id).unwrap().status,
            OrderStatus::InProgress
        );
    }

    #[test]
    fn test_finish_attaches_groups_and_notifies() {
        let events = Rc::new(RefCell::new(Vec::new()));
        let mut activity = activity();
        activity.add_observer(Box::new(Recorder {
            events: Rc::clone(&events),
        }));

        activity.start("s2", StartMode::Live, at()).unwrap();
        activity.select_devices("Porta isca", 3, 1).unwrap();
        activity.select_all().unwrap();
        activity.save_devices().unwrap();
        activity.record_pest("Porta isca", 2, "Baratas", 3).unwrap();
        activity.commit_pests("Porta isca", 2);
        activity
            .add_service("Monitoramento", "Roedores", "Área externa", None, "")
            .unwrap();

        let (order, report) = activity
            .finish(None, None, datetime!(2024-03-15 09:10 UTC))
            .unwrap();
        assert_eq!(order.status, OrderStatus::Completed);
        assert_eq!(order.devices[0].quantity, 3);
        assert_eq!(order.pest_counts.len(), 1);
        assert!(report.section("devices").is_some());
        assert!(report.section("pest_counts").is_some());
        assert_eq!(report.file_name, "ordem-servico-1.pdf");

        assert_eq!(
            *events.borrow(),
            vec![
                "started 1".to_string(),
                "schedule s2 in_progress".to_string(),
                "finished ordem-servico-1.pdf".to_string(),
                "schedule s2 completed".to_string(),
            ]
        );
    }
}
