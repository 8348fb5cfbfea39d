use safeprag_core::error::SafepragError;
use serde::Serialize;

pub fn print<T: Serialize + ?Sized>(value: &T) -> Result<(), SafepragError> {
    let json = serde_json::to_string_pretty(value)?;
    println!("{json}");
    Ok(())
}
