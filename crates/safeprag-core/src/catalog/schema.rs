use crate::model::{service_key, Product, ServiceCategory};
use serde::{Deserialize, Serialize};

/// A catalog of device types, statuses, pests, service types and products.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogDef {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub version: String,
    /// Status assigned when a device is tapped with no status selected.
    pub default_status: String,
    /// Statuses offered for every device type unless excluded.
    pub base_statuses: Vec<String>,
    #[serde(default)]
    pub device_types: Vec<DeviceTypeDef>,
    #[serde(default)]
    pub pests: Vec<String>,
    #[serde(default)]
    pub service_types: Vec<ServiceTypeDef>,
    #[serde(default)]
    pub products: Vec<Product>,
}

impl CatalogDef {
    pub fn device_type(&self, name: &str) -> Option<&DeviceTypeDef> {
        self.device_types.iter().find(|d| d.name == name)
    }

    pub fn product(&self, id: &str) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    /// Every status the catalog knows: base statuses followed by device-type extras.
    pub fn all_statuses(&self) -> Vec<String> {
        let mut all = self.base_statuses.clone();
        for dt in &self.device_types {
            for extra in &dt.extra_statuses {
                if !all.contains(extra) {
                    all.push(extra.clone());
                }
            }
        }
        all
    }

    pub fn service_type_names(&self) -> Vec<String> {
        self.service_types.iter().map(|s| s.name.clone()).collect()
    }

    /// Category of a service type, preferring the catalog's declaration.
    pub fn service_category(&self, service_type: &str) -> ServiceCategory {
        let key = service_key(service_type);
        self.service_types
            .iter()
            .find(|s| service_key(&s.name) == key)
            .and_then(|s| s.category)
            .unwrap_or_else(|| ServiceCategory::from_str_loose(service_type))
    }
}

/// Status rules for one device type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeviceTypeDef {
    pub name: String,
    #[serde(default)]
    pub excluded_statuses: Vec<String>,
    /// Statuses offered only for this device type (e.g. a burnt bulb on a light trap).
    #[serde(default)]
    pub extra_statuses: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceTypeDef {
    pub name: String,
    #[serde(default)]
    pub category: Option<ServiceCategory>,
}
