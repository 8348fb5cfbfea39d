//! Typed load/save of the order book and the working state.

use crate::catalog::dynamic::DynamicCatalog;
use crate::catalog::schema::CatalogDef;
use crate::devices::DeviceSession;
use crate::error::SafepragError;
use crate::model::{Client, Company, Product, Schedule, ServiceListItem, Signatures};
use crate::order::{Activity, OrderBook, OrderCounter, ServiceOrder, WorkingState};
use crate::pests::PestCounter;
use crate::store::{load_json, save_json, KeyValueStore, StorageKey};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// User additions to the dynamic catalogs, plus the free-text observations.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ActivityRecord {
    #[serde(default)]
    statuses: Vec<String>,
    #[serde(default)]
    pests: Vec<String>,
    #[serde(default)]
    service_types: Vec<String>,
    #[serde(default)]
    observations: String,
}

pub fn load_book(store: &dyn KeyValueStore) -> Result<OrderBook, SafepragError> {
    let schedules: Vec<Schedule> = load_json(store, StorageKey::Schedules)?;
    let orders: Vec<ServiceOrder> = load_json(store, StorageKey::ServiceOrders)?;
    let counter: OrderCounter = load_json(store, StorageKey::OrderCounter)?;
    Ok(OrderBook::from_parts(schedules, orders, counter))
}

pub fn save_book(store: &mut dyn KeyValueStore, book: &OrderBook) -> Result<(), SafepragError> {
    save_json(store, StorageKey::Schedules, book.schedules())?;
    save_json(store, StorageKey::ServiceOrders, book.orders())?;
    save_json(store, StorageKey::OrderCounter, &book.counter())
}

fn restore_added(catalog: &mut DynamicCatalog, added: &[String]) {
    for value in added {
        if let Err(e) = catalog.add(value) {
            warn!(kind = %catalog.kind(), value = %value, error = %e, "dropping stored catalog entry");
        }
    }
}

/// Rebuild the working state on top of the current catalog's defaults.
pub fn load_working(store: &dyn KeyValueStore, catalog: &CatalogDef) -> Result<WorkingState, SafepragError> {
    let mut working = WorkingState::new(catalog);
    working.devices = load_json::<DeviceSession>(store, StorageKey::Devices)?;
    working.pests = load_json::<PestCounter>(store, StorageKey::PestCounts)?;
    working.services = load_json::<Vec<ServiceListItem>>(store, StorageKey::ServiceList)?;
    working.signatures = load_json::<Signatures>(store, StorageKey::ClientSignature)?;

    let record: ActivityRecord = load_json(store, StorageKey::ActivityState)?;
    restore_added(&mut working.statuses, &record.statuses);
    restore_added(&mut working.pest_names, &record.pests);
    restore_added(&mut working.service_types, &record.service_types);
    working.observations = record.observations;
    Ok(working)
}

pub fn save_working(store: &mut dyn KeyValueStore, working: &WorkingState) -> Result<(), SafepragError> {
    save_json(store, StorageKey::Devices, &working.devices)?;
    save_json(store, StorageKey::PestCounts, &working.pests)?;
    save_json(store, StorageKey::ServiceList, &working.services)?;
    save_json(store, StorageKey::ClientSignature, &working.signatures)?;
    let record = ActivityRecord {
        statuses: working.statuses.added().to_vec(),
        pests: working.pest_names.added().to_vec(),
        service_types: working.service_types.added().to_vec(),
        observations: working.observations.clone(),
    };
    save_json(store, StorageKey::ActivityState, &record)
}

/// The catalog with stored products appended (catalog products win on id clashes).
pub fn with_stored_products(
    mut catalog: CatalogDef,
    store: &dyn KeyValueStore,
) -> Result<CatalogDef, SafepragError> {
    let stored: Vec<Product> = load_json(store, StorageKey::Products)?;
    for product in stored {
        if catalog.product(&product.id).is_none() {
            catalog.products.push(product);
        }
    }
    Ok(catalog)
}

/// Load everything an activity needs. Any backend read failure aborts the
/// load, so a caller never saves defaults over data it could not read.
pub fn load_activity(store: &dyn KeyValueStore, catalog: CatalogDef) -> Result<Activity, SafepragError> {
    let catalog = with_stored_products(catalog, store)?;
    let book = load_book(store)?;
    let working = load_working(store, &catalog)?;
    debug!(
        backend = store.backend_name(),
        orders = book.orders().len(),
        schedules = book.schedules().len(),
        "loaded activity"
    );
    Ok(Activity::with_working(catalog, book, working))
}

pub fn save_activity(store: &mut dyn KeyValueStore, activity: &Activity) -> Result<(), SafepragError> {
    save_book(store, activity.book())?;
    save_working(store, activity.working())
}

pub fn load_company(store: &dyn KeyValueStore) -> Result<Option<Company>, SafepragError> {
    load_json(store, StorageKey::Company)
}

pub fn load_clients(store: &dyn KeyValueStore) -> Result<Vec<Client>, SafepragError> {
    load_json(store, StorageKey::Clients)
}

/// The client record referenced by `code`, if stored.
pub fn find_client(store: &dyn KeyValueStore, code: &str) -> Result<Option<Client>, SafepragError> {
    Ok(load_clients(store)?.into_iter().find(|c| c.code == code))
}
