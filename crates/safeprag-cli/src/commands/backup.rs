use safeprag_core::error::SafepragError;
use safeprag_core::store::{backup, restore, Backup};
use std::path::Path;
use time::OffsetDateTime;

use crate::commands::Context;

pub fn create(ctx: &Context, file: &Path) -> Result<(), SafepragError> {
    let store = ctx.store()?;
    let dump = backup(&store, OffsetDateTime::now_utc())?;
    std::fs::write(file, serde_json::to_string_pretty(&dump)?)?;
    println!("Backed up {} keys to {}", dump.data.len(), file.display());
    Ok(())
}

pub fn load(ctx: &Context, file: &Path) -> Result<(), SafepragError> {
    let content = std::fs::read_to_string(file)?;
    let dump: Backup = serde_json::from_str(&content)?;
    let mut store = ctx.store()?;
    let restored = restore(&mut store, &dump)?;
    println!("Restored {restored} keys from {}", file.display());
    Ok(())
}
