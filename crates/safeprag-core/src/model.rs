use serde::{Deserialize, Serialize};
use std::fmt;

/// A numbered device in the working set of the active service order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceInstance {
    pub id: u32,
    #[serde(rename = "type")]
    pub device_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number: Option<u32>,
    #[serde(default)]
    pub status: Option<String>,
}

impl DeviceInstance {
    /// The number shown on reports: the device number, or the id when the number is absent.
    pub fn label(&self) -> u32 {
        self.number.unwrap_or(self.id)
    }

    pub fn has_status(&self) -> bool {
        self.status.as_deref().is_some_and(|s| !s.is_empty())
    }
}

/// A device promoted to the saved set. An unassigned status is stored as "".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedDevice {
    pub id: u32,
    #[serde(rename = "type")]
    pub device_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number: Option<u32>,
    #[serde(default)]
    pub status: String,
}

impl From<DeviceInstance> for SavedDevice {
    fn from(device: DeviceInstance) -> Self {
        SavedDevice {
            id: device.id,
            device_type: device.device_type,
            number: device.number,
            status: device.status.unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pest {
    pub name: String,
    pub count: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DevicePestCount {
    pub device_type: String,
    pub device_number: u32,
    pub pests: Vec<Pest>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Measure {
    #[default]
    Ml,
    G,
}

impl fmt::Display for Measure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Measure::Ml => write!(f, "ml"),
            Measure::G => write!(f, "g"),
        }
    }
}

/// A chemical product from the static catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: String,
    pub name: String,
    pub active_ingredient: String,
    pub chemical_group: String,
    pub registration: String,
    pub batch: String,
    pub expiration_date: String,
    pub measure: Measure,
    #[serde(default)]
    pub diluent: String,
}

/// Service categories that drive product and device requirements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceCategory {
    Inspection,
    Monitoring,
    Treatment,
    Other,
}

impl ServiceCategory {
    /// Resolve a category from a service-type label, ignoring case, accents and separators.
    ///
    /// "Pulverização", "pulverizacao" and "PULVERIZACAO" all resolve to `Treatment`;
    /// "Iscagem com gel" and "iscagem_gel" are the same treatment.
    pub fn from_str_loose(s: &str) -> ServiceCategory {
        let key = service_key(s);
        match key.as_str() {
            "pulverizacao" | "atomizacao" | "termonebulizacao" | "polvilhamento"
            | "iscagem_com_gel" | "iscagem_gel" => ServiceCategory::Treatment,
            "monitoramento" => ServiceCategory::Monitoring,
            "inspecao" => ServiceCategory::Inspection,
            _ => ServiceCategory::Other,
        }
    }

    pub fn requires_product(&self) -> bool {
        matches!(self, ServiceCategory::Treatment)
    }

    /// Monitoring entries carry a product too, but it is optional.
    pub fn uses_product(&self) -> bool {
        matches!(self, ServiceCategory::Treatment | ServiceCategory::Monitoring)
    }
}

impl fmt::Display for ServiceCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServiceCategory::Inspection => write!(f, "inspection"),
            ServiceCategory::Monitoring => write!(f, "monitoring"),
            ServiceCategory::Treatment => write!(f, "treatment"),
            ServiceCategory::Other => write!(f, "other"),
        }
    }
}

/// Lowercase, strip Portuguese diacritics, collapse separators into single underscores.
pub fn service_key(raw: &str) -> String {
    let mut key = String::with_capacity(raw.len());
    let mut prev_underscore = true;
    for c in raw.trim().to_lowercase().chars() {
        let mapped = match c {
            'á' | 'à' | 'â' | 'ã' | 'ä' => 'a',
            'é' | 'è' | 'ê' | 'ë' => 'e',
            'í' | 'ì' | 'î' | 'ï' => 'i',
            'ó' | 'ò' | 'ô' | 'õ' | 'ö' => 'o',
            'ú' | 'ù' | 'û' | 'ü' => 'u',
            'ç' => 'c',
            c if c.is_alphanumeric() => c,
            _ => '_',
        };
        if mapped == '_' {
            if !prev_underscore {
                key.push('_');
            }
            prev_underscore = true;
        } else {
            key.push(mapped);
            prev_underscore = false;
        }
    }
    if key.ends_with('_') {
        key.pop();
    }
    key
}

/// One service entry within an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceListItem {
    pub id: String,
    pub service_type: String,
    #[serde(default)]
    pub target_pest: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub product: Option<Product>,
    #[serde(default)]
    pub product_amount: String,
}

impl ServiceListItem {
    pub fn new(service_type: impl Into<String>) -> Self {
        ServiceListItem {
            id: uuid::Uuid::new_v4().to_string(),
            service_type: service_type.into(),
            target_pest: String::new(),
            location: String::new(),
            product: None,
            product_amount: String::new(),
        }
    }

    pub fn category(&self) -> ServiceCategory {
        ServiceCategory::from_str_loose(&self.service_type)
    }

    /// Attach a product, dropping it when this service type does not carry one.
    pub fn with_product(mut self, product: Option<Product>, amount: impl Into<String>) -> Self {
        if self.category().uses_product() {
            self.product = product;
            self.product_amount = amount.into();
        } else {
            self.product = None;
            self.product_amount = String::new();
        }
        self
    }

    /// Service type and target pest are filled, and a treatment carries its product.
    pub fn is_complete(&self) -> bool {
        !self.service_type.trim().is_empty()
            && !self.target_pest.trim().is_empty()
            && (!self.category().requires_product() || self.product.is_some())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScheduleStatus {
    #[default]
    Pending,
    InProgress,
    Completed,
    Cancelled,
}

impl fmt::Display for ScheduleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScheduleStatus::Pending => write!(f, "pending"),
            ScheduleStatus::InProgress => write!(f, "in_progress"),
            ScheduleStatus::Completed => write!(f, "completed"),
            ScheduleStatus::Cancelled => write!(f, "cancelled"),
        }
    }
}

/// A planned visit. Orders are started from schedules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Schedule {
    pub id: String,
    pub client_id: String,
    pub client_name: String,
    #[serde(default)]
    pub client_address: String,
    #[serde(default)]
    pub client_contact: String,
    #[serde(default)]
    pub client_phone: String,
    pub date: String,
    #[serde(default)]
    pub start_time: String,
    #[serde(default)]
    pub end_time: String,
    pub service_type: String,
    #[serde(default)]
    pub status: ScheduleStatus,
    #[serde(default)]
    pub notes: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct License {
    #[serde(default)]
    pub number: Option<String>,
    /// Validity date, ISO or DD/MM/YYYY.
    #[serde(default, alias = "expiry_date")]
    pub date: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Company {
    pub name: String,
    pub cnpj: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub logo_url: Option<String>,
    #[serde(default)]
    pub environmental_license: Option<License>,
    #[serde(default)]
    pub sanitary_permit: Option<License>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Client {
    pub code: String,
    #[serde(default)]
    pub branch: String,
    pub name: String,
    #[serde(default)]
    pub document: String,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub contact: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub email: String,
}

/// Signature images, usually data URLs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signatures {
    #[serde(default)]
    pub controller: String,
    #[serde(default)]
    pub technician: String,
    #[serde(default)]
    pub client: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_service_key_strips_accents() {
        assert_eq!(service_key("Pulverização"), "pulverizacao");
        assert_eq!(service_key("  Iscagem com gel "), "iscagem_com_gel");
        assert_eq!(service_key("Termonebulização"), "termonebulizacao");
    }

    #[test]
    fn test_treatment_categories() {
        for name in [
            "Pulverização",
            "atomizacao",
            "Termonebulização",
            "Polvilhamento",
            "Iscagem com gel",
            "iscagem_gel",
        ] {
            assert_eq!(ServiceCategory::from_str_loose(name), ServiceCategory::Treatment);
        }
    }

    #[test]
    fn test_monitoring_uses_but_does_not_require_product() {
        let cat = ServiceCategory::from_str_loose("Monitoramento");
        assert_eq!(cat, ServiceCategory::Monitoring);
        assert!(cat.uses_product());
        assert!(!cat.requires_product());
    }

    #[test]
    fn test_inspection_drops_product() {
        let product = Product {
            id: "p1".into(),
            name: "Gel X".into(),
            active_ingredient: "Fipronil".into(),
            chemical_group: "Pirazol".into(),
            registration: "123".into(),
            batch: "L1".into(),
            expiration_date: "2027-01-01".into(),
            measure: Measure::G,
            diluent: String::new(),
        };
        let item = ServiceListItem::new("Inspeção").with_product(Some(product), "10");
        assert!(item.product.is_none());
        assert!(item.product_amount.is_empty());
    }

    #[test]
    fn test_label_falls_back_to_id() {
        let device = DeviceInstance {
            id: 42,
            device_type: "Porta isca".into(),
            number: None,
            status: None,
        };
        assert_eq!(device.label(), 42);
        assert!(!device.has_status());
    }

    #[test]
    fn test_saved_device_coerces_null_status() {
        let device = DeviceInstance {
            id: 1,
            device_type: "Porta isca".into(),
            number: Some(1),
            status: None,
        };
        let saved: SavedDevice = device.into();
        assert_eq!(saved.status, "");
    }
}
