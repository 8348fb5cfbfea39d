use crate::catalog::dynamic::same_entry;
use crate::catalog::schema::CatalogDef;

/// Trailing option that opens the "add a new status" input.
pub const ADD_NEW_SENTINEL: &str = "+ Adicionar novo status";

/// Whether `status` may be assigned to devices of `device_type`.
///
/// Pure function of the catalog's exclusion table. Unknown device types
/// exclude nothing.
pub fn is_status_allowed(catalog: &CatalogDef, device_type: &str, status: &str) -> bool {
    match catalog.device_type(device_type) {
        Some(dt) => !dt.excluded_statuses.iter().any(|s| s == status),
        None => true,
    }
}

/// Statuses offered for a device type, in display order.
///
/// Base statuses plus the type's extras, minus its exclusions, then the
/// user-added statuses, then [`ADD_NEW_SENTINEL`].
pub fn available_statuses(
    catalog: &CatalogDef,
    device_type: &str,
    dynamically_added: &[String],
) -> Vec<String> {
    let mut statuses: Vec<String> = catalog.base_statuses.clone();
    if let Some(dt) = catalog.device_type(device_type) {
        statuses.extend(dt.extra_statuses.iter().cloned());
    }
    statuses.retain(|s| is_status_allowed(catalog, device_type, s));

    for added in dynamically_added {
        if !statuses.iter().any(|s| same_entry(s, added)) {
            statuses.push(added.clone());
        }
    }

    statuses.push(ADD_NEW_SENTINEL.to_string());
    statuses
}
