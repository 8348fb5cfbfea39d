use safeprag_core::error::SafepragError;

use crate::commands::Context;
use crate::output::{self, Format};

pub struct NewService {
    pub service_type: String,
    pub target: String,
    pub location: String,
    pub product: Option<String>,
    pub amount: String,
}

pub fn add(ctx: &Context, new: NewService) -> Result<(), SafepragError> {
    let item = ctx.with_activity(|activity| {
        activity
            .add_service(
                &new.service_type,
                &new.target,
                &new.location,
                new.product.as_deref(),
                &new.amount,
            )
            .cloned()
    })?;
    if new.product.is_some() && item.product.is_none() {
        eprintln!(
            "  note: '{}' does not carry a product, the product was dropped",
            item.service_type
        );
    }
    println!("Added service {} ({})", item.service_type, item.id);
    Ok(())
}

pub fn remove(ctx: &Context, id: &str) -> Result<(), SafepragError> {
    ctx.with_activity(|activity| activity.remove_service(id))?;
    println!("Removed service {id}");
    Ok(())
}

pub fn add_type(ctx: &Context, name: &str) -> Result<(), SafepragError> {
    let name = ctx.with_activity(|activity| activity.add_service_type(name))?;
    println!("Added service type '{name}'");
    Ok(())
}

pub fn show(ctx: &Context, format: Format) -> Result<(), SafepragError> {
    let activity = ctx.activity()?;
    let services = &activity.working().services;
    match format {
        Format::Json => output::json::print(services),
        Format::Table => {
            print!("{}", output::table::format_services(services));
            Ok(())
        }
    }
}
