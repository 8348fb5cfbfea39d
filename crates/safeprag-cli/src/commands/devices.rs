use safeprag_core::error::SafepragError;
use safeprag_core::summarize_devices;

use crate::commands::Context;
use crate::output::{self, Format};

pub fn select(ctx: &Context, device_type: &str, quantity: i64, start: u32) -> Result<(), SafepragError> {
    let count = ctx.with_activity(|activity| {
        activity
            .select_devices(device_type, quantity, start)
            .map(|devices| devices.len())
    })?;
    println!("Selected {count} x {device_type}");
    Ok(())
}

pub fn status(ctx: &Context, status: &str, add: bool) -> Result<(), SafepragError> {
    let selected = ctx.with_activity(|activity| {
        if add {
            activity.add_status(status)?;
        }
        activity.set_status(status)?;
        Ok(activity.working().devices.selected_status().to_string())
    })?;
    if selected.is_empty() {
        println!("Taps now apply the default status");
    } else {
        println!("Taps now apply '{selected}'");
    }
    Ok(())
}

pub fn tap(ctx: &Context, numbers: &[u32]) -> Result<(), SafepragError> {
    let lines = ctx.with_activity(|activity| {
        let mut lines = Vec::new();
        for &number in numbers {
            let device = activity.tap(number)?;
            lines.push(format!(
                "  {:>5}  {}",
                device.label(),
                device.status.as_deref().unwrap_or("-")
            ));
        }
        Ok(lines)
    })?;
    for line in lines {
        println!("{line}");
    }
    Ok(())
}

pub fn select_all(ctx: &Context) -> Result<(), SafepragError> {
    ctx.with_activity(|activity| activity.select_all())?;
    println!("Marked every unassigned device");
    Ok(())
}

pub fn save(ctx: &Context) -> Result<(), SafepragError> {
    let count = ctx.with_activity(|activity| activity.save_devices())?;
    println!("Saved {count} devices");
    Ok(())
}

/// Working selection and the grouped summary of saved devices.
pub fn show(ctx: &Context, format: Format) -> Result<(), SafepragError> {
    let activity = ctx.activity()?;
    let session = &activity.working().devices;
    let rows = summarize_devices(session.saved());
    match format {
        Format::Json => output::json::print(&rows),
        Format::Table => {
            print!("{}", output::table::format_session(session));
            if !rows.is_empty() {
                println!();
                print!("{}", output::table::format_summary(&rows));
            }
            Ok(())
        }
    }
}
