use safeprag_core::error::SafepragError;
use safeprag_core::order::{RetroactiveVisit, StartMode};
use safeprag_core::store::state::{find_client, load_book, load_company, save_book};
use std::path::PathBuf;
use time::OffsetDateTime;

use crate::commands::Context;
use crate::output::{self, Format};

pub fn start(
    ctx: &Context,
    schedule_id: &str,
    date: Option<String>,
    start_time: Option<String>,
    end_time: Option<String>,
) -> Result<(), SafepragError> {
    let mode = match date {
        Some(date) => StartMode::Retroactive(RetroactiveVisit {
            date,
            start_time: start_time.ok_or(SafepragError::MissingRequiredField("start time"))?,
            end_time: end_time.unwrap_or_default(),
        }),
        None => StartMode::Live,
    };
    let order = ctx.with_activity(|activity| activity.start(schedule_id, mode, OffsetDateTime::now_utc()))?;
    println!(
        "Started service order #{} ({}) for {}",
        order.order_number, order.id, order.client_name
    );
    Ok(())
}

pub fn no_service(ctx: &Context, schedule_id: &str, reason: &str) -> Result<(), SafepragError> {
    let order = ctx.with_activity(|activity| {
        activity.register_no_service(schedule_id, reason, OffsetDateTime::now_utc())
    })?;
    println!("Registered visit without service as order #{}", order.order_number);
    Ok(())
}

pub fn finish(
    ctx: &Context,
    observations: Option<String>,
    format: Format,
    out: Option<PathBuf>,
) -> Result<(), SafepragError> {
    let store = ctx.store()?;
    let company = load_company(&store)?;
    let (order, report) = ctx.with_activity(|activity| {
        if let Some(text) = observations.as_deref() {
            activity.set_observations(text);
        }
        let client = match activity.book().active_order() {
            Some(order) => find_client(&store, &order.client_id)?,
            None => None,
        };
        activity.finish(company.as_ref(), client, OffsetDateTime::now_utc())
    })?;

    if let Some(path) = out {
        std::fs::write(&path, serde_json::to_string_pretty(&report)?)?;
        eprintln!("Report for order #{} written to {}", order.order_number, path.display());
    }
    match format {
        Format::Json => output::json::print(&report),
        Format::Table => {
            print!("{}", output::table::format_report(&report));
            Ok(())
        }
    }
}

pub fn approve(ctx: &Context, order_id: &str) -> Result<(), SafepragError> {
    let mut store = ctx.store()?;
    let mut book = load_book(&store)?;
    let number = book.approve(order_id, OffsetDateTime::now_utc())?.order_number;
    save_book(&mut store, &book)?;
    println!("Approved service order #{number}");
    Ok(())
}

pub fn cancel(ctx: &Context, order_id: &str, reason: &str) -> Result<(), SafepragError> {
    let mut store = ctx.store()?;
    let mut book = load_book(&store)?;
    let number = book
        .cancel(order_id, reason, OffsetDateTime::now_utc())?
        .order_number;
    save_book(&mut store, &book)?;
    println!("Cancelled service order #{number}");
    Ok(())
}

/// Show one order, or every order when no id is given.
pub fn show(ctx: &Context, order_id: Option<&str>, format: Format) -> Result<(), SafepragError> {
    let store = ctx.store()?;
    let book = load_book(&store)?;
    match order_id {
        Some(id) => {
            let order = book
                .order(id)
                .ok_or_else(|| SafepragError::OrderNotFound(id.to_string()))?;
            match format {
                Format::Json => output::json::print(order),
                Format::Table => {
                    print!("{}", output::table::format_order(order));
                    Ok(())
                }
            }
        }
        None => match format {
            Format::Json => output::json::print(book.orders()),
            Format::Table => {
                print!("{}", output::table::format_orders(book.orders()));
                Ok(())
            }
        },
    }
}
