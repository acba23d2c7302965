use crate::constants::{CERTIFICATIONS_KEY, LOCATION_KEY};
use crate::normalize::{parse_certifications, parse_location, AddressParser};
use crate::types::{FieldValue, NormalizedRecord, RawRecord};

/// Field label to output key: whitespace becomes `_`, then lower-case.
pub fn normalize_key(key: &str) -> String {
    key.chars()
        .map(|c| if c.is_whitespace() { '_' } else { c })
        .collect::<String>()
        .to_lowercase()
}

/// Build the output record from a scraped one.
///
/// Certifications and location are parsed from their raw text (values that
/// are already structured pass through), keys are renamed, and absent values
/// are dropped. Running it on its own output changes nothing.
pub fn finalize(record: RawRecord, addresses: &dyn AddressParser) -> NormalizedRecord {
    let mut out = NormalizedRecord::with_capacity(record.len() + 1);

    for (key, value) in record {
        let key = normalize_key(&key);
        let value = match (key.as_str(), value) {
            (CERTIFICATIONS_KEY, FieldValue::Text(text)) => {
                FieldValue::Certifications(parse_certifications(Some(&text)))
            }
            (CERTIFICATIONS_KEY, FieldValue::Absent) => FieldValue::Certifications(Vec::new()),
            (LOCATION_KEY, FieldValue::Text(text)) => parse_location(Some(&text), addresses)
                .map(FieldValue::Location)
                .unwrap_or(FieldValue::Absent),
            (_, value) => value,
        };
        if value.is_absent() {
            out.shift_remove(&key);
        } else {
            out.insert(key, value);
        }
    }

    if !out.contains_key(CERTIFICATIONS_KEY) {
        out.insert(CERTIFICATIONS_KEY.to_string(), FieldValue::Certifications(Vec::new()));
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::UsAddressParser;
    use crate::types::AddressLabel;

    fn raw() -> RawRecord {
        let mut record = RawRecord::new();
        record.insert("Company".into(), FieldValue::Text("Acme Supply".into()));
        record.insert("Notes".into(), FieldValue::Absent);
        record.insert("Owner Asian".into(), FieldValue::Flag(false));
        record.insert("Location".into(), FieldValue::Text("\n100 Main St\nPeoria, IL 61602".into()));
        record.insert(
            "Certification Information".into(),
            FieldValue::Text("\nCity of Peoria - MBE expiring on 1/1/2025\nstray".into()),
        );
        record
    }

    #[test]
    fn test_keys_are_renamed() {
        assert_eq!(normalize_key("Owner African American"), "owner_african_american");
        assert_eq!(normalize_key("Certification\tInformation"), "certification_information");
        assert_eq!(normalize_key("page_id"), "page_id");
    }

    #[test]
    fn test_absent_values_dropped_falsy_kept() {
        let record = finalize(raw(), &UsAddressParser);
        assert!(!record.contains_key("notes"));
        assert_eq!(record["owner_asian"], FieldValue::Flag(false));
        assert_eq!(record["company"], FieldValue::Text("Acme Supply".into()));
    }

    #[test]
    fn test_certifications_and_location_are_structured() {
        let record = finalize(raw(), &UsAddressParser);
        match &record[CERTIFICATIONS_KEY] {
            FieldValue::Certifications(entries) => {
                assert_eq!(entries.len(), 1);
                assert_eq!(entries[0].name, "MBE");
            }
            other => panic!("unexpected certifications value: {:?}", other),
        }
        match &record[LOCATION_KEY] {
            FieldValue::Location(address) => {
                assert_eq!(address.get(AddressLabel::StreetName).as_deref(), Some("Main"));
            }
            other => panic!("unexpected location value: {:?}", other),
        }
    }

    #[test]
    fn test_missing_certifications_become_empty_list() {
        let mut record = RawRecord::new();
        record.insert("Company".into(), FieldValue::Text("Acme".into()));
        let record = finalize(record, &UsAddressParser);
        assert_eq!(record[CERTIFICATIONS_KEY], FieldValue::Certifications(Vec::new()));
    }

    #[test]
    fn test_empty_location_is_dropped() {
        let mut record = RawRecord::new();
        record.insert("Location".into(), FieldValue::Text(String::new()));
        let record = finalize(record, &UsAddressParser);
        assert!(!record.contains_key(LOCATION_KEY));
    }

    #[test]
    fn test_finalize_is_idempotent() {
        let once = finalize(raw(), &UsAddressParser);
        let twice = finalize(once.clone(), &UsAddressParser);
        assert_eq!(once, twice);
    }
}
