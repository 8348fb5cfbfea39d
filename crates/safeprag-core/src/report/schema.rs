use crate::model::{Client, Company, DevicePestCount, ServiceListItem, Signatures};
use crate::summary::{DeviceGroup, DeviceSummaryRow};
use serde::{Deserialize, Serialize};

/// Product details as printed on a report.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportProduct {
    pub name: String,
    #[serde(default)]
    pub active_ingredient: String,
    #[serde(default)]
    pub chemical_group: String,
    #[serde(default)]
    pub registration: String,
    #[serde(default)]
    pub batch: String,
    #[serde(default)]
    pub validity: String,
    #[serde(default)]
    pub quantity: String,
    #[serde(default)]
    pub dilution: String,
}

/// One service performed during the visit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportService {
    #[serde(rename = "type")]
    pub service_type: String,
    #[serde(default)]
    pub target: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub product: Option<ReportProduct>,
}

impl From<&ServiceListItem> for ReportService {
    fn from(item: &ServiceListItem) -> Self {
        let product = item.product.as_ref().map(|p| ReportProduct {
            name: p.name.clone(),
            active_ingredient: p.active_ingredient.clone(),
            chemical_group: p.chemical_group.clone(),
            registration: p.registration.clone(),
            batch: p.batch.clone(),
            validity: p.expiration_date.clone(),
            quantity: if item.product_amount.trim().is_empty() {
                String::new()
            } else {
                format!("{} {}", item.product_amount.trim(), p.measure)
            },
            dilution: p.diluent.clone(),
        });
        ReportService {
            service_type: item.service_type.clone(),
            target: item.target_pest.clone(),
            location: item.location.clone(),
            product,
        }
    }
}

/// Everything needed to assemble a service report.
///
/// Accepts the multi-service shape (`services`) and the legacy single
/// `service`/`product` pair.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportInput {
    pub order_number: String,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub start_time: String,
    #[serde(default)]
    pub end_time: String,
    #[serde(default)]
    pub company: Option<Company>,
    #[serde(default)]
    pub client: Client,
    #[serde(default)]
    pub services: Vec<ReportService>,
    #[serde(default)]
    pub service: Option<ReportService>,
    #[serde(default)]
    pub product: Option<ReportProduct>,
    #[serde(default)]
    pub devices: Vec<DeviceGroup>,
    #[serde(default)]
    pub pest_counts: Vec<DevicePestCount>,
    #[serde(default)]
    pub observations: String,
    #[serde(default)]
    pub signatures: Signatures,
}

impl ReportInput {
    /// Services in report order: `services` when present, otherwise the
    /// legacy `service` with the legacy `product` attached, otherwise none.
    pub fn normalized_services(&self) -> Vec<ReportService> {
        if !self.services.is_empty() {
            return self.services.clone();
        }
        match &self.service {
            Some(service) => {
                let mut service = service.clone();
                if service.product.is_none() {
                    service.product = self.product.clone();
                }
                vec![service]
            }
            None => Vec::new(),
        }
    }

    /// The legacy product, when no service entry carries it.
    pub(crate) fn orphan_product(&self) -> Option<&ReportProduct> {
        if self.services.is_empty() && self.service.is_none() {
            self.product.as_ref()
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LicenseLine {
    pub label: String,
    pub number: String,
    pub validity: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceRow {
    pub service_type: String,
    pub target_pest: String,
    pub location: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductRow {
    pub service_type: String,
    pub name: String,
    pub active_ingredient: String,
    pub chemical_group: String,
    pub registration: String,
    pub batch: String,
    pub validity: String,
    pub quantity: String,
    pub dilution: String,
}

/// A pest table row. The device cells are only present on the first row of
/// each device, spanning `row_span` rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PestCountRow {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device: Option<PestDeviceCell>,
    pub pest: String,
    pub count: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PestDeviceCell {
    pub device_type: String,
    pub device_number: u32,
    pub row_span: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "section", rename_all = "snake_case")]
pub enum ReportSection {
    Header {
        company_name: String,
        company_cnpj: String,
        company_address: String,
        company_phone: String,
        company_email: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        logo_url: Option<String>,
        order_number: String,
        date: String,
        start_time: String,
        end_time: String,
    },
    Licenses {
        lines: Vec<LicenseLine>,
    },
    Client {
        code: String,
        branch: String,
        name: String,
        document: String,
        city: String,
        address: String,
        contact: String,
        phone: String,
        email: String,
    },
    Services {
        rows: Vec<ServiceRow>,
    },
    Products {
        rows: Vec<ProductRow>,
    },
    Devices {
        rows: Vec<DeviceSummaryRow>,
    },
    PestCounts {
        rows: Vec<PestCountRow>,
    },
    Observations {
        text: String,
    },
    Signatures {
        controller: String,
        technician: String,
        client: String,
    },
}

impl ReportSection {
    pub fn name(&self) -> &'static str {
        match self {
            ReportSection::Header { .. } => "header",
            ReportSection::Licenses { .. } => "licenses",
            ReportSection::Client { .. } => "client",
            ReportSection::Services { .. } => "services",
            ReportSection::Products { .. } => "products",
            ReportSection::Devices { .. } => "devices",
            ReportSection::PestCounts { .. } => "pest_counts",
            ReportSection::Observations { .. } => "observations",
            ReportSection::Signatures { .. } => "signatures",
        }
    }
}

/// The structured document handed to a renderer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceReport {
    pub order_number: String,
    pub file_name: String,
    pub sections: Vec<ReportSection>,
}

impl ServiceReport {
    pub fn section(&self, name: &str) -> Option<&ReportSection> {
        self.sections.iter().find(|s| s.name() == name)
    }

    pub fn section_names(&self) -> Vec<&'static str> {
        self.sections.iter().map(ReportSection::name).collect()
    }
}
