pub mod builtin;
pub mod dynamic;
pub mod schema;
pub mod status;

use crate::error::SafepragError;
use schema::CatalogDef;
use std::collections::HashSet;
use std::path::Path;

pub use dynamic::{DynamicCatalog, EntryKind};
pub use status::{available_statuses, is_status_allowed, ADD_NEW_SENTINEL};

/// Load a catalog from a JSON file.
pub fn load_catalog(path: &Path) -> Result<CatalogDef, SafepragError> {
    let content = std::fs::read_to_string(path).map_err(|e| SafepragError::CatalogLoad {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    parse_catalog(&content, path)
}

/// Parse a catalog from a JSON string.
pub fn parse_catalog(json: &str, source: &Path) -> Result<CatalogDef, SafepragError> {
    let catalog: CatalogDef =
        serde_json::from_str(json).map_err(|e| SafepragError::CatalogLoad {
            path: source.to_path_buf(),
            reason: e.to_string(),
        })?;
    validate_catalog(&catalog)?;
    Ok(catalog)
}

/// Parse a catalog from a JSON string (no file path context).
pub fn parse_catalog_str(json: &str) -> Result<CatalogDef, SafepragError> {
    let catalog: CatalogDef = serde_json::from_str(json).map_err(SafepragError::Json)?;
    validate_catalog(&catalog)?;
    Ok(catalog)
}

/// Validate that a catalog is well-formed.
pub fn validate_catalog(catalog: &CatalogDef) -> Result<(), SafepragError> {
    if catalog.base_statuses.is_empty() {
        return Err(SafepragError::CatalogInvalid(
            "base_statuses must not be empty".into(),
        ));
    }

    if !catalog.base_statuses.contains(&catalog.default_status) {
        return Err(SafepragError::CatalogInvalid(format!(
            "default_status '{}' is not one of base_statuses",
            catalog.default_status
        )));
    }

    ensure_unique("status", catalog.base_statuses.iter())?;
    ensure_unique("pest", catalog.pests.iter())?;
    ensure_unique("service type", catalog.service_types.iter().map(|s| &s.name))?;
    ensure_unique("device type", catalog.device_types.iter().map(|d| &d.name))?;
    ensure_unique("product id", catalog.products.iter().map(|p| &p.id))?;

    for dt in &catalog.device_types {
        for excluded in &dt.excluded_statuses {
            if !catalog.base_statuses.contains(excluded) {
                return Err(SafepragError::CatalogInvalid(format!(
                    "device type '{}' excludes unknown status '{}'",
                    dt.name, excluded
                )));
            }
        }
        for extra in &dt.extra_statuses {
            if extra.trim().is_empty() {
                return Err(SafepragError::CatalogInvalid(format!(
                    "device type '{}' has an empty extra status",
                    dt.name
                )));
            }
        }
        if dt.excluded_statuses.contains(&catalog.default_status) {
            return Err(SafepragError::CatalogInvalid(format!(
                "device type '{}' must not exclude the default status '{}'",
                dt.name, catalog.default_status
            )));
        }
    }

    Ok(())
}

/// Names must be non-empty and unique ignoring case.
fn ensure_unique<'a>(
    kind: &str,
    names: impl Iterator<Item = &'a String>,
) -> Result<(), SafepragError> {
    let mut seen = HashSet::new();
    for name in names {
        if name.trim().is_empty() {
            return Err(SafepragError::CatalogInvalid(format!(
                "{kind} name must not be empty"
            )));
        }
        if !seen.insert(name.to_lowercase()) {
            return Err(SafepragError::CatalogInvalid(format!(
                "duplicate {kind} '{name}'"
            )));
        }
    }
    Ok(())
}
