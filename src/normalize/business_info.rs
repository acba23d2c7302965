use crate::constants::{
    DIGIT_KEYS, LOWERCASE_KEYS, OWNERSHIP_TEXT_KEY, OWNER_AFRICAN_AMERICAN_KEY, OWNER_ASIAN_KEY,
    OWNER_FEMALE_KEY, OWNER_HISPANIC_KEY, OWNER_VETERAN_KEY,
};
use crate::types::{FieldValue, OwnershipFlags};
use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::Regex;

static BLANK_LINES: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n{2,}").expect("valid regex"));
static OWNERSHIP: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"This is an? (.+)-Owned Business").expect("valid regex"));

fn normalize_value(key: &str, value: &str) -> FieldValue {
    if value.is_empty() || value == "None" {
        FieldValue::Absent
    } else if LOWERCASE_KEYS.contains(&key) {
        FieldValue::Text(value.to_lowercase())
    } else if DIGIT_KEYS.contains(&key) {
        FieldValue::Text(value.chars().filter(char::is_ascii_digit).collect())
    } else {
        FieldValue::Text(value.to_string())
    }
}

/// Find the "This is a(n) X-Owned Business" sentence.
pub fn parse_ownership(raw_text: &str) -> Option<OwnershipFlags> {
    OWNERSHIP
        .captures(raw_text)
        .and_then(|caps| caps.get(1))
        .map(|m| OwnershipFlags::from_text(m.as_str()))
}

/// Split the business information group into its `Key: value` fields.
///
/// Only lines containing `": "` are kept; the first occurrence separates key
/// from value. The key is the text before the separator with surrounding
/// whitespace trimmed, not taken verbatim, so source indentation around
/// `<br>` never ends up in a field name. Values are kept as written.
/// Ownership fields are appended when the ownership sentence is present and
/// omitted entirely otherwise.
pub fn parse_business_info(raw_text: &str) -> IndexMap<String, FieldValue> {
    let collapsed = BLANK_LINES.replace_all(raw_text, "\n");
    let mut fields = IndexMap::new();

    for line in collapsed.split('\n') {
        if let Some((key, value)) = line.split_once(": ") {
            let key = key.trim();
            fields.insert(key.to_string(), normalize_value(key, value));
        }
    }

    if let Some(ownership) = parse_ownership(raw_text) {
        fields.insert(OWNERSHIP_TEXT_KEY.to_string(), FieldValue::Text(ownership.text));
        fields.insert(
            OWNER_AFRICAN_AMERICAN_KEY.to_string(),
            FieldValue::Flag(ownership.african_american),
        );
        fields.insert(OWNER_HISPANIC_KEY.to_string(), FieldValue::Flag(ownership.hispanic));
        fields.insert(OWNER_ASIAN_KEY.to_string(), FieldValue::Flag(ownership.asian));
        fields.insert(OWNER_VETERAN_KEY.to_string(), FieldValue::Flag(ownership.veteran));
        fields.insert(OWNER_FEMALE_KEY.to_string(), FieldValue::Flag(ownership.female));
    }

    fields
}
