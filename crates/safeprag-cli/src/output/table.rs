use safeprag_core::devices::DeviceSession;
use safeprag_core::model::{Pest, Schedule, ServiceListItem};
use safeprag_core::order::ServiceOrder;
use safeprag_core::report::schema::{ReportSection, ServiceReport};
use safeprag_core::summary::DeviceSummaryRow;
use std::fmt::Write;

fn column_width<'a>(values: impl Iterator<Item = &'a str>, min: usize) -> usize {
    values.map(|v| v.chars().count()).max().unwrap_or(0).max(min)
}

pub fn format_statuses(device_type: &str, statuses: &[String]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Statuses for '{device_type}':\n");
    for status in statuses {
        let _ = writeln!(out, "  {status}");
    }
    out
}

pub fn format_summary(rows: &[DeviceSummaryRow]) -> String {
    let mut out = String::new();
    for row in rows {
        let _ = writeln!(out, "{} ({}): {}", row.device_type, row.quantity, row.list);
        let width = column_width(row.status.iter().map(|s| s.name.as_str()), 6);
        for status in &row.status {
            let _ = writeln!(
                out,
                "  {:<width$}  {:>4}  {:>5}%  {}",
                status.name, status.count, status.percentage, status.devices
            );
        }
        out.push('\n');
    }
    out
}

pub fn format_session(session: &DeviceSession) -> String {
    let mut out = String::new();
    if session.working().is_empty() {
        out.push_str("No devices selected.\n");
    } else {
        let _ = writeln!(
            out,
            "Selected: {} ({} devices), status: {}",
            session.selected_type(),
            session.working().len(),
            if session.selected_status().is_empty() {
                "(default)"
            } else {
                session.selected_status()
            }
        );
        for device in session.working() {
            let _ = writeln!(
                out,
                "  {:>5}  {}",
                device.label(),
                device.status.as_deref().unwrap_or("-")
            );
        }
    }
    let _ = writeln!(out, "\nSaved devices: {}", session.saved().len());
    out
}

pub fn format_pests(device_type: &str, device_number: u32, pests: &[Pest]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{device_type} #{device_number}");
    let width = column_width(pests.iter().map(|p| p.name.as_str()), 6);
    for pest in pests {
        let _ = writeln!(out, "  {:<width$}  {}", pest.name, pest.count);
    }
    out
}

pub fn format_schedules(schedules: &[Schedule]) -> String {
    if schedules.is_empty() {
        return "No schedules.\n".into();
    }
    let id_width = column_width(schedules.iter().map(|s| s.id.as_str()), 2);
    let name_width = column_width(schedules.iter().map(|s| s.client_name.as_str()), 6);
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<id_width$}  {:<10}  {:<name_width$}  {:<20}  Status",
        "Id", "Date", "Client", "Service"
    );
    for s in schedules {
        let _ = writeln!(
            out,
            "{:<id_width$}  {:<10}  {:<name_width$}  {:<20}  {}",
            s.id, s.date, s.client_name, s.service_type, s.status
        );
    }
    out
}

pub fn format_orders(orders: &[ServiceOrder]) -> String {
    if orders.is_empty() {
        return "No service orders.\n".into();
    }
    let mut out = String::new();
    for o in orders {
        let _ = writeln!(
            out,
            "#{:<5} {:<12} {:<10} {:<24} {}  ({})",
            o.order_number, o.status, o.date, o.client_name, o.service_type, o.id
        );
    }
    out
}

pub fn format_order(order: &ServiceOrder) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Service order #{} ({})", order.order_number, order.id);
    let _ = writeln!(out, "  Status:   {}", order.status);
    let _ = writeln!(out, "  Client:   {}", order.client_name);
    let _ = writeln!(out, "  Service:  {}", order.service_type);
    let _ = writeln!(
        out,
        "  Date:     {} {}-{}{}",
        order.date,
        order.start_time,
        order.end_time,
        if order.retroactive { " (retroactive)" } else { "" }
    );
    if let Some(reason) = &order.no_service_reason {
        let _ = writeln!(out, "  Reason:   {reason}");
    }
    if !order.services.is_empty() {
        out.push('\n');
        out.push_str(&format_services(&order.services));
    }
    out
}

pub fn format_services(services: &[ServiceListItem]) -> String {
    if services.is_empty() {
        return "No services.\n".into();
    }
    let mut out = String::new();
    for s in services {
        let product = s
            .product
            .as_ref()
            .map(|p| format!(" [{} {}]", p.name, s.product_amount))
            .unwrap_or_default();
        let _ = writeln!(
            out,
            "  {} / {} / {}{}  ({})",
            s.service_type, s.target_pest, s.location, product, s.id
        );
    }
    out
}

pub fn format_report(report: &ServiceReport) -> String {
    let mut out = String::new();
    for section in &report.sections {
        match section {
            ReportSection::Header {
                company_name,
                company_cnpj,
                order_number,
                date,
                start_time,
                end_time,
                ..
            } => {
                let _ = writeln!(out, "{company_name}  CNPJ {company_cnpj}");
                let _ = writeln!(
                    out,
                    "Ordem de serviço {order_number}  {date}  {start_time}-{end_time}\n"
                );
            }
            ReportSection::Licenses { lines } => {
                for line in lines {
                    let _ = writeln!(out, "{}: {} {}", line.label, line.number, line.validity);
                }
                out.push('\n');
            }
            ReportSection::Client {
                code,
                name,
                address,
                city,
                ..
            } => {
                let _ = writeln!(out, "Cliente {code}: {name}");
                let _ = writeln!(out, "  {address} {city}\n");
            }
            ReportSection::Services { rows } => {
                out.push_str("Serviços\n");
                for row in rows {
                    let _ = writeln!(
                        out,
                        "  {} / {} / {}",
                        row.service_type, row.target_pest, row.location
                    );
                }
                out.push('\n');
            }
            ReportSection::Products { rows } => {
                out.push_str("Produtos\n");
                for row in rows {
                    let _ = writeln!(
                        out,
                        "  {}  {} ({})  lote {}  validade {}  {}",
                        row.name,
                        row.active_ingredient,
                        row.chemical_group,
                        row.batch,
                        row.validity,
                        row.quantity
                    );
                }
                out.push('\n');
            }
            ReportSection::Devices { rows } => {
                out.push_str("Dispositivos\n");
                out.push_str(&format_summary(rows));
            }
            ReportSection::PestCounts { rows } => {
                out.push_str("Contagem de pragas\n");
                for row in rows {
                    let device = row
                        .device
                        .as_ref()
                        .map(|d| format!("{} {}", d.device_type, d.device_number))
                        .unwrap_or_default();
                    let _ = writeln!(out, "  {:<24} {:<20} {}", device, row.pest, row.count);
                }
                out.push('\n');
            }
            ReportSection::Observations { text } => {
                if !text.is_empty() {
                    let _ = writeln!(out, "Observações\n  {text}\n");
                }
            }
            ReportSection::Signatures { .. } => {}
        }
    }
    let _ = writeln!(out, "-> {}", report.file_name);
    out
}
