use crate::catalog::schema::CatalogDef;
use crate::error::SafepragError;

const DEFAULT_CATALOG_JSON: &str = include_str!("../../catalog/safeprag-default.json");

/// Available predefined catalogs.
pub const PRESETS: &[&str] = &["default"];

/// Load a predefined catalog by name.
pub fn load_preset(name: &str) -> Result<CatalogDef, SafepragError> {
    match name {
        "default" => {
            let catalog: CatalogDef = serde_json::from_str(DEFAULT_CATALOG_JSON)?;
            Ok(catalog)
        }
        _ => Err(SafepragError::CatalogInvalid(format!(
            "unknown preset '{}'. Available: {}",
            name,
            PRESETS.join(", ")
        ))),
    }
}

/// The catalog used when no custom file is given.
pub fn default_catalog() -> Result<CatalogDef, SafepragError> {
    load_preset("default")
}
