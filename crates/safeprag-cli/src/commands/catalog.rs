use safeprag_core::catalog::{self, available_statuses, builtin, ADD_NEW_SENTINEL};
use safeprag_core::error::SafepragError;
use std::path::Path;

use crate::commands::Context;
use crate::output::{self, Format};

pub fn list() -> Result<(), SafepragError> {
    println!("Available catalog presets:\n");
    for name in builtin::PRESETS {
        let def = builtin::load_preset(name)?;
        println!("  {:<8} {} (v{})", name, def.name, def.version);
        if let Some(ref desc) = def.description {
            println!("           {}", desc);
        }
        println!(
            "           {} device types, {} statuses, {} pests, {} service types",
            def.device_types.len(),
            def.all_statuses().len(),
            def.pests.len(),
            def.service_types.len()
        );
        println!();
    }
    Ok(())
}

pub fn validate(file: &Path) -> Result<(), SafepragError> {
    let def = catalog::load_catalog(file)?;
    println!(
        "Valid catalog: {} (v{}), {} device types, {} products",
        def.name,
        def.version,
        def.device_types.len(),
        def.products.len()
    );
    Ok(())
}

pub fn schema() -> Result<(), SafepragError> {
    println!("Catalog JSON schema\n");
    println!("  name             string    Display name");
    println!("  description      string?   Free text");
    println!("  version          string    Catalog version");
    println!("  default_status   string    Status applied when none is selected; must be in base_statuses");
    println!("  base_statuses    [string]  Statuses offered for every device type");
    println!("  device_types     [object]  {{ name, excluded_statuses: [string], extra_statuses: [string] }}");
    println!("  pests            [string]  Pests offered for counting");
    println!("  service_types    [object]  {{ name, category?: inspection | monitoring | treatment | other }}");
    println!("  products         [object]  {{ id, name, activeIngredient, chemicalGroup, registration,");
    println!("                              batch, expirationDate, measure: ml | g, diluent }}");
    println!();
    println!("Example:\n");
    let def = builtin::default_catalog()?;
    println!("{}", serde_json::to_string_pretty(&def)?);
    Ok(())
}

/// Statuses offered for a device type, with any custom additions.
pub fn statuses(
    ctx: &Context,
    device_type: &str,
    added: &[String],
    format: Format,
) -> Result<(), SafepragError> {
    let def = ctx.catalog()?;
    let statuses = available_statuses(&def, device_type, added);
    if def.device_type(device_type).is_none() {
        tracing::warn!(device_type, "unknown device type, showing every status");
    }
    match format {
        Format::Json => {
            let offered: Vec<&String> = statuses.iter().filter(|s| *s != ADD_NEW_SENTINEL).collect();
            output::json::print(&offered)
        }
        Format::Table => {
            print!("{}", output::table::format_statuses(device_type, &statuses));
            Ok(())
        }
    }
}
