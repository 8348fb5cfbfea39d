use safeprag_core::error::SafepragError;

use crate::commands::Context;
use crate::output;

pub fn record(
    ctx: &Context,
    device_type: &str,
    number: u32,
    pest: &str,
    delta: i64,
) -> Result<(), SafepragError> {
    let pests = ctx.with_activity(|activity| {
        activity
            .record_pest(device_type, number, pest, delta)
            .map(<[_]>::to_vec)
    })?;
    print!("{}", output::table::format_pests(device_type, number, &pests));
    Ok(())
}

pub fn set(ctx: &Context, device_type: &str, number: u32, pest: &str, value: &str) -> Result<(), SafepragError> {
    let pests = ctx.with_activity(|activity| {
        activity
            .set_pest_count(device_type, number, pest, value)
            .map(<[_]>::to_vec)
    })?;
    print!("{}", output::table::format_pests(device_type, number, &pests));
    Ok(())
}

pub fn commit(ctx: &Context, device_type: &str, number: u32) -> Result<(), SafepragError> {
    let entry = ctx.with_activity(|activity| Ok(activity.commit_pests(device_type, number)))?;
    match entry {
        Some(entry) => print!(
            "{}",
            output::table::format_pests(&entry.device_type, entry.device_number, &entry.pests)
        ),
        None => println!("No pests counted on {device_type} #{number}"),
    }
    Ok(())
}

pub fn add(ctx: &Context, name: &str) -> Result<(), SafepragError> {
    let name = ctx.with_activity(|activity| activity.add_pest(name))?;
    println!("Added pest '{name}'");
    Ok(())
}
