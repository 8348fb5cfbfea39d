use safeprag_core::error::SafepragError;
use safeprag_core::summary::{compress, expand};

/// Compress numbers into ranges, or expand a range text back to numbers.
pub fn run(numbers: &[u32], expand_text: Option<&str>) -> Result<(), SafepragError> {
    match expand_text {
        Some(text) => {
            let numbers: Vec<String> = expand(text).iter().map(u32::to_string).collect();
            println!("{}", numbers.join(" "));
        }
        None => println!("{}", compress(numbers)),
    }
    Ok(())
}
