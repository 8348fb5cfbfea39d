use safeprag_core::error::SafepragError;
use safeprag_core::model::{Schedule, ScheduleStatus};
use safeprag_core::store::state::{load_book, save_book};

use crate::commands::Context;
use crate::output::{self, Format};

pub struct NewSchedule {
    pub id: Option<String>,
    pub client_id: String,
    pub client_name: String,
    pub client_address: String,
    pub date: String,
    pub start_time: String,
    pub end_time: String,
    pub service_type: String,
    pub notes: String,
}

pub fn add(ctx: &Context, new: NewSchedule) -> Result<(), SafepragError> {
    let mut store = ctx.store()?;
    let mut book = load_book(&store)?;
    let schedule = Schedule {
        id: new
            .id
            .unwrap_or_else(|| uuid::Uuid::new_v4().to_string()),
        client_id: new.client_id,
        client_name: new.client_name,
        client_address: new.client_address,
        client_contact: String::new(),
        client_phone: String::new(),
        date: new.date,
        start_time: new.start_time,
        end_time: new.end_time,
        service_type: new.service_type,
        status: ScheduleStatus::Pending,
        notes: new.notes,
    };
    let id = book.add_schedule(schedule)?.id.clone();
    save_book(&mut store, &book)?;
    println!("Added schedule {id}");
    Ok(())
}

pub fn list(ctx: &Context, format: Format) -> Result<(), SafepragError> {
    let store = ctx.store()?;
    let book = load_book(&store)?;
    match format {
        Format::Json => output::json::print(book.schedules()),
        Format::Table => {
            print!("{}", output::table::format_schedules(book.schedules()));
            Ok(())
        }
    }
}
