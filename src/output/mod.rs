//! Output formatting for CLI results

pub mod formatters;
pub mod json;
pub mod table;

use serde::Serialize;

use crate::error::Result;

/// Print data as a JSON document with metadata
pub fn print_json<T: Serialize + ?Sized>(data: &T) -> Result<()> {
    println!("{}", json::format_json(data)?);
    Ok(())
}
