use safeprag_core::error::SafepragError;
use safeprag_core::order::OrderStatus;
use safeprag_core::report::assemble;
use safeprag_core::report::schema::ReportInput;
use safeprag_core::report_for_order;
use safeprag_core::store::state::{load_book, load_company};
use std::path::{Path, PathBuf};

use crate::commands::Context;
use crate::output::{self, Format};

/// Assemble the report of a stored order, or of a report-input JSON file.
pub fn run(
    ctx: &Context,
    order_id: Option<&str>,
    input: Option<&Path>,
    format: Format,
    out: Option<PathBuf>,
) -> Result<(), SafepragError> {
    let report = match (order_id, input) {
        (_, Some(path)) => {
            let content = std::fs::read_to_string(path)?;
            let input: ReportInput = serde_json::from_str(&content)?;
            assemble(&input)
        }
        (Some(id), None) => {
            let store = ctx.store()?;
            let book = load_book(&store)?;
            let order = book
                .order(id)
                .ok_or_else(|| SafepragError::OrderNotFound(id.to_string()))?;
            if !matches!(order.status, OrderStatus::Completed | OrderStatus::Approved) {
                tracing::warn!(order_id = id, status = %order.status, "order is not finished");
            }
            report_for_order(order, load_company(&store)?.as_ref())
        }
        (None, None) => return Err(SafepragError::MissingRequiredField("order id or --input")),
    };

    if let Some(path) = out {
        std::fs::write(&path, serde_json::to_string_pretty(&report)?)?;
        eprintln!("Report written to {}", path.display());
    }
    match format {
        Format::Json => output::json::print(&report),
        Format::Table => {
            print!("{}", output::table::format_report(&report));
            Ok(())
        }
    }
}
