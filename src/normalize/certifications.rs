use crate::types::CertificationEntry;
use tracing::debug;

fn parse_line(line: &str) -> Option<CertificationEntry> {
    let (location, rest) = line.split_once(" - ")?;
    let (name, expiration) = rest.split_once(" expiring on ")?;
    Some(CertificationEntry {
        location: location.to_string(),
        name: name.to_string(),
        expiration: expiration.to_string(),
    })
}

/// Parse newline-separated `<location> - <name> expiring on <date>` lines.
///
/// Lines that do not have that shape are dropped.
pub fn parse_certifications(raw_text: Option<&str>) -> Vec<CertificationEntry> {
    let Some(raw_text) = raw_text.filter(|t| !t.is_empty()) else {
        return Vec::new();
    };

    raw_text
        .split('\n')
        .filter_map(|line| {
            let entry = parse_line(line);
            if entry.is_none() && !line.trim().is_empty() {
                debug!("Dropping certification line '{}'", line);
            }
            entry
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_and_missing_input() {
        assert!(parse_certifications(None).is_empty());
        assert!(parse_certifications(Some("")).is_empty());
    }

    #[test]
    fn test_malformed_lines_are_dropped() {
        let certs = parse_certifications(Some(
            "A - B expiring on C\nmalformed\nD - E expiring on F\nG - no expiry",
        ));
        assert_eq!(certs.len(), 2);
        assert_eq!(certs[0].to_line(), "A - B expiring on C");
        assert_eq!(certs[1].location, "D");
        assert_eq!(certs[1].name, "E");
        assert_eq!(certs[1].expiration, "F");
    }

    #[test]
    fn test_split_on_first_separator_only() {
        let certs = parse_certifications(Some(
            "City of Peoria - Minority Business - Tier 1 expiring on 12/31/2024",
        ));
        assert_eq!(certs.len(), 1);
        assert_eq!(certs[0].location, "City of Peoria");
        assert_eq!(certs[0].name, "Minority Business - Tier 1");
        assert_eq!(certs[0].expiration, "12/31/2024");
    }

    #[test]
    fn test_well_formed_lines_keep_order_and_duplicates() {
        let lines = ["X - MBE expiring on 1/1/2025", "Y - WBE expiring on 2/2/2025", "X - MBE expiring on 1/1/2025"];
        let certs = parse_certifications(Some(&lines.join("\n")));
        assert_eq!(certs.len(), lines.len());
        for (cert, line) in certs.iter().zip(lines) {
            assert_eq!(cert.to_line(), line);
        }
    }
}
