pub mod date;
pub mod schema;

use crate::model::{DevicePestCount, License};
use crate::summary::summarize;
use schema::{
    LicenseLine, PestCountRow, PestDeviceCell, ProductRow, ReportInput, ReportSection,
    ServiceReport, ServiceRow,
};
use tracing::debug;

pub use date::format_date;

/// Placeholder printed when a license number is missing.
const MISSING_LICENSE_NUMBER: &str = "000000";

/// Device type printed when a pest count carries none.
const DEFAULT_PEST_DEVICE_TYPE: &str = "Armadilha";

/// File name of the rendered report for an order number.
pub fn artifact_file_name(order_number: &str) -> String {
    format!("ordem-servico-{order_number}.pdf")
}

/// Footer text for a page, e.g. "2/5".
pub fn page_footer(page: usize, total: usize) -> String {
    format!("{page}/{total}")
}

/// Assemble the ordered section list of a service report.
///
/// Device and pest tables are only emitted when they have rows; the service
/// table is always present, empty when the input has no services.
pub fn assemble(input: &ReportInput) -> ServiceReport {
    let mut sections = vec![header(input), licenses(input), client(input)];

    let services = input.normalized_services();
    sections.push(ReportSection::Services {
        rows: services
            .iter()
            .map(|s| ServiceRow {
                service_type: s.service_type.clone(),
                target_pest: s.target.clone(),
                location: s.location.clone(),
            })
            .collect(),
    });

    let mut product_rows: Vec<ProductRow> = services
        .iter()
        .filter_map(|s| s.product.as_ref().map(|p| product_row(&s.service_type, p)))
        .collect();
    if let Some(p) = input.orphan_product() {
        product_rows.push(product_row("", p));
    }
    if !product_rows.is_empty() {
        sections.push(ReportSection::Products { rows: product_rows });
    }

    if !input.devices.is_empty() {
        sections.push(ReportSection::Devices {
            rows: summarize(&input.devices),
        });
    }

    let pest_rows = pest_count_rows(&input.pest_counts);
    if !pest_rows.is_empty() {
        sections.push(ReportSection::PestCounts { rows: pest_rows });
    }

    sections.push(ReportSection::Observations {
        text: input.observations.clone(),
    });
    sections.push(ReportSection::Signatures {
        controller: input.signatures.controller.clone(),
        technician: input.signatures.technician.clone(),
        client: input.signatures.client.clone(),
    });

    debug!(
        order_number = %input.order_number,
        sections = sections.len(),
        "assembled service report"
    );

    ServiceReport {
        order_number: input.order_number.clone(),
        file_name: artifact_file_name(&input.order_number),
        sections,
    }
}

fn header(input: &ReportInput) -> ReportSection {
    let company = input.company.clone().unwrap_or_default();
    ReportSection::Header {
        company_name: company.name,
        company_cnpj: company.cnpj,
        company_address: company.address.unwrap_or_default(),
        company_phone: company.phone.unwrap_or_default(),
        company_email: company.email.unwrap_or_default(),
        logo_url: company.logo_url,
        order_number: input.order_number.clone(),
        date: format_date(&input.date),
        start_time: input.start_time.clone(),
        end_time: input.end_time.clone(),
    }
}

fn license_line(label: &str, license: Option<&License>) -> LicenseLine {
    let number = license
        .and_then(|l| l.number.clone())
        .filter(|n| !n.trim().is_empty())
        .unwrap_or_else(|| MISSING_LICENSE_NUMBER.to_string());
    let validity = license
        .and_then(|l| l.date.as_deref())
        .map(format_date)
        .unwrap_or_default();
    LicenseLine {
        label: label.to_string(),
        number,
        validity,
    }
}

fn licenses(input: &ReportInput) -> ReportSection {
    let company = input.company.as_ref();
    ReportSection::Licenses {
        lines: vec![
            license_line(
                "Licença Ambiental",
                company.and_then(|c| c.environmental_license.as_ref()),
            ),
            license_line(
                "Alvará Sanitário",
                company.and_then(|c| c.sanitary_permit.as_ref()),
            ),
        ],
    }
}

fn client(input: &ReportInput) -> ReportSection {
    let c = &input.client;
    ReportSection::Client {
        code: c.code.clone(),
        branch: c.branch.clone(),
        name: c.name.clone(),
        document: c.document.clone(),
        city: c.city.clone().unwrap_or_default(),
        address: c.address.clone(),
        contact: c.contact.clone(),
        phone: c.phone.clone(),
        email: c.email.clone(),
    }
}

fn product_row(service_type: &str, p: &schema::ReportProduct) -> ProductRow {
    ProductRow {
        service_type: service_type.to_string(),
        name: p.name.clone(),
        active_ingredient: p.active_ingredient.clone(),
        chemical_group: p.chemical_group.clone(),
        registration: p.registration.clone(),
        batch: p.batch.clone(),
        validity: format_date(&p.validity),
        quantity: p.quantity.clone(),
        dilution: p.dilution.clone(),
    }
}

/// One row per positive pest, grouped by device in input order.
fn pest_count_rows(counts: &[DevicePestCount]) -> Vec<PestCountRow> {
    let mut rows = Vec::new();
    for device in counts {
        let positive: Vec<_> = device.pests.iter().filter(|p| p.count > 0).collect();
        let span = positive.len() as u32;
        for (i, pest) in positive.into_iter().enumerate() {
            let cell = (i == 0).then(|| PestDeviceCell {
                device_type: if device.device_type.is_empty() {
                    DEFAULT_PEST_DEVICE_TYPE.to_string()
                } else {
                    device.device_type.clone()
                },
                device_number: device.device_number,
                row_span: span,
            });
            rows.push(PestCountRow {
                device: cell,
                pest: pest.name.clone(),
                count: pest.count,
            });
        }
    }
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Company, Pest};
    use crate::summary::{DeviceGroup, StatusEntry};
    use schema::{ReportProduct, ReportService};

    fn input() -> ReportInput {
        ReportInput {
            order_number: "17".into(),
            date: "2024-03-15".into(),
            ..Default::default()
        }
    }

    fn service(service_type: &str, product: Option<&str>) -> ReportService {
        ReportService {
            service_type: service_type.into(),
            target: "Baratas".into(),
            location: "Cozinha".into(),
            product: product.map(|name| ReportProduct {
                name: name.into(),
                validity: "2026-12-31".into(),
                ..Default::default()
            }),
        }
    }

    #[test]
    fn test_minimal_report_sections() {
        let report = assemble(&input());
        assert_eq!(
            report.section_names(),
            vec!["header", "licenses", "client", "services", "observations", "signatures"]
        );
        assert_eq!(report.file_name, "ordem-servico-17.pdf");
        match report.section("services") {
            Some(ReportSection::Services { rows }) => assert!(rows.is_empty()),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_header_date_is_localized() {
        let report = assemble(&input());
        match report.section("header") {
            Some(ReportSection::Header { date, .. }) => assert_eq!(date, "15/03/2024"),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_missing_licenses_use_placeholder() {
        let mut data = input();
        data.company = Some(Company {
            name: "SafePrag".into(),
            cnpj: "00.000.000/0001-00".into(),
            ..Default::default()
        });
        match assemble(&data).section("licenses") {
            Some(ReportSection::Licenses { lines }) => {
                assert_eq!(lines[0].number, "000000");
                assert_eq!(lines[1].label, "Alvará Sanitário");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_multi_service_products() {
        let mut data = input();
        data.services = vec![
            service("Inspeção", None),
            service("Pulverização", Some("Produto A")),
            service("Iscagem com gel", Some("Gel B")),
        ];
        let report = assemble(&data);
        match report.section("services") {
            Some(ReportSection::Services { rows }) => assert_eq!(rows.len(), 3),
            other => panic!("unexpected {other:?}"),
        }
        match report.section("products") {
            Some(ReportSection::Products { rows }) => {
                assert_eq!(rows.len(), 2);
                assert_eq!(rows[0].service_type, "Pulverização");
                assert_eq!(rows[0].validity, "31/12/2026");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_legacy_single_service() {
        let mut data = input();
        data.service = Some(service("Pulverização", None));
        data.product = Some(ReportProduct {
            name: "Legado".into(),
            ..Default::default()
        });
        let report = assemble(&data);
        match report.section("products") {
            Some(ReportSection::Products { rows }) => {
                assert_eq!(rows.len(), 1);
                assert_eq!(rows[0].name, "Legado");
                assert_eq!(rows[0].service_type, "Pulverização");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_services_win_over_legacy() {
        let mut data = input();
        data.services = vec![service("Inspeção", None)];
        data.service = Some(service("Pulverização", Some("X")));
        assert_eq!(data.normalized_services().len(), 1);
        assert_eq!(data.normalized_services()[0].service_type, "Inspeção");
    }

    #[test]
    fn test_device_table_compresses_ranges() {
        let mut data = input();
        data.devices = vec![DeviceGroup {
            device_type: "Porta isca".into(),
            quantity: 4,
            status: vec![StatusEntry {
                name: "Conforme".into(),
                count: 3,
                devices: vec![3, 1, 2],
            }],
            list: vec!["1".into(), "2".into(), "3".into(), "4".into()],
        }];
        match assemble(&data).section("devices") {
            Some(ReportSection::Devices { rows }) => {
                assert_eq!(rows[0].list, "1-4");
                assert_eq!(rows[0].status[0].devices, "1-3");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_all_zero_pest_counts_emit_no_section() {
        let mut data = input();
        data.pest_counts = vec![DevicePestCount {
            device_type: "Porta isca".into(),
            device_number: 1,
            pests: vec![Pest {
                name: "Baratas".into(),
                count: 0,
            }],
        }];
        assert!(assemble(&data).section("pest_counts").is_none());
    }

    #[test]
    fn test_pest_rows_span_per_device() {
        let mut data = input();
        data.pest_counts = vec![
            DevicePestCount {
                device_type: "Porta isca".into(),
                device_number: 2,
                pests: vec![
                    Pest { name: "Baratas".into(), count: 3 },
                    Pest { name: "Moscas".into(), count: 0 },
                    Pest { name: "Formigas".into(), count: 1 },
                ],
            },
            DevicePestCount {
                device_type: String::new(),
                device_number: 5,
                pests: vec![Pest { name: "Roedores".into(), count: 2 }],
            },
        ];
        match assemble(&data).section("pest_counts") {
            Some(ReportSection::PestCounts { rows }) => {
                assert_eq!(rows.len(), 3);
                assert_eq!(rows[0].device.as_ref().map(|d| d.row_span), Some(2));
                assert!(rows[1].device.is_none());
                assert_eq!(rows[1].pest, "Formigas");
                assert_eq!(
                    rows[2].device.as_ref().map(|d| d.device_type.as_str()),
                    Some("Armadilha")
                );
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_page_footer() {
        assert_eq!(page_footer(2, 5), "2/5");
    }
}
