use crate::constants::BUSINESS_INFORMATION_LEGEND;
use crate::normalize::parse_business_info;
use crate::types::{FieldValue, RawRecord, TableRow};
use tracing::debug;

/// Flatten the fieldset rows of one detail page into a single record.
///
/// The business information group contributes each of its fields at the top
/// level; every other group becomes one entry keyed by its legend. A legend
/// seen twice keeps the value of the later group.
pub fn parse_detail_table(rows: &[TableRow]) -> RawRecord {
    let mut record = RawRecord::new();

    for row in rows {
        if row.legend == BUSINESS_INFORMATION_LEGEND {
            let fields = parse_business_info(row.body());
            debug!("Business information fields: {}", fields.len());
            record.extend(fields);
        } else {
            if record.contains_key(&row.legend) {
                debug!("Duplicate group '{}', keeping the later one", row.legend);
            }
            record.insert(row.legend.clone(), FieldValue::Text(row.body().to_string()));
        }
    }

    record
}
