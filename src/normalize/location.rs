use super::address::AddressParser;
use crate::types::StructuredAddress;
use tracing::warn;

/// Tokenize the location group into tagged address components.
///
/// Missing or whitespace-only input is `None` without reaching the parser.
/// Tokenizer failures are logged and also come back as `None`; a bad
/// address never stops the record from being built.
pub fn parse_location(raw_text: Option<&str>, parser: &dyn AddressParser) -> Option<StructuredAddress> {
    let raw_text = raw_text.filter(|t| !t.trim().is_empty())?;
    match parser.parse(raw_text) {
        Ok(address) => Some(address),
        Err(e) => {
            warn!("Error parsing location '{}': {}", raw_text.escape_debug(), e);
            None
        }
    }
}
