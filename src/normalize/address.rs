use crate::error::AddressParseError;
use crate::types::{AddressComponent, AddressLabel, StructuredAddress};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;

/// Free-form postal address tokenizer.
pub trait AddressParser {
    fn parse(&self, text: &str) -> Result<StructuredAddress, AddressParseError>;
}

static ZIP: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{5}(-\d{4})?$").expect("valid regex"));
static ADDRESS_NUMBER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d+[A-Za-z]?(-\d+[A-Za-z]?)?$").expect("valid regex"));

const STREET_TYPES: &[&str] = &[
    "aly", "alley", "ave", "av", "avenue", "blvd", "boulevard", "cir", "circle", "ct", "court",
    "crossing", "dr", "drive", "expy", "expressway", "hwy", "highway", "ln", "lane", "loop",
    "pike", "pkwy", "parkway", "pl", "place", "plz", "plaza", "pt", "point", "rd", "road", "ridge",
    "row", "run", "sq", "square", "st", "street", "ter", "terrace", "trl", "trail", "way", "xing",
];

const DIRECTIONALS: &[&str] = &[
    "n", "s", "e", "w", "ne", "nw", "se", "sw", "north", "south", "east", "west", "northeast",
    "northwest", "southeast", "southwest",
];

const OCCUPANCY_TYPES: &[&str] = &[
    "apt", "apartment", "bldg", "building", "dept", "fl", "floor", "lot", "rm", "room", "ste",
    "suite", "unit", "#",
];

const STATE_ABBREVIATIONS: &[&str] = &[
    "AL", "AK", "AZ", "AR", "CA", "CO", "CT", "DE", "DC", "FL", "GA", "HI", "ID", "IL", "IN", "IA",
    "KS", "KY", "LA", "ME", "MD", "MA", "MI", "MN", "MS", "MO", "MT", "NE", "NV", "NH", "NJ", "NM",
    "NY", "NC", "ND", "OH", "OK", "OR", "PA", "PR", "RI", "SC", "SD", "TN", "TX", "UT", "VT", "VA",
    "WA", "WV", "WI", "WY",
];

const STATE_NAMES: &[&str] = &[
    "alabama", "alaska", "arizona", "arkansas", "california", "colorado", "connecticut",
    "delaware", "florida", "georgia", "hawaii", "idaho", "illinois", "indiana", "iowa", "kansas",
    "kentucky", "louisiana", "maine", "maryland", "massachusetts", "michigan", "minnesota",
    "mississippi", "missouri", "montana", "nebraska", "nevada", "new hampshire", "new jersey",
    "new mexico", "new york", "north carolina", "north dakota", "ohio", "oklahoma", "oregon",
    "pennsylvania", "rhode island", "south carolina", "south dakota", "tennessee", "texas", "utah",
    "vermont", "virginia", "washington", "west virginia", "wisconsin", "wyoming",
];

struct Token {
    text: String,
    segment: usize,
}

impl Token {
    fn key(&self) -> String {
        self.text.trim_end_matches('.').to_lowercase()
    }

    fn is_street_type(&self) -> bool {
        STREET_TYPES.contains(&self.key().as_str())
    }

    fn is_directional(&self) -> bool {
        DIRECTIONALS.contains(&self.key().replace('.', "").as_str())
    }

    fn is_occupancy(&self) -> bool {
        OCCUPANCY_TYPES.contains(&self.key().as_str()) || self.text.starts_with('#')
    }
}

/// Split on newlines and commas into segments, then on whitespace into tokens.
fn tokenize(text: &str) -> Vec<Token> {
    text.split(|c: char| c == '\n' || c == ',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .enumerate()
        .flat_map(|(segment, part)| {
            part.split_whitespace().map(move |word| Token {
                text: word.to_string(),
                segment,
            })
        })
        .collect()
}

/// Number of trailing tokens naming the United States, if any.
fn country_len(tokens: &[Token]) -> usize {
    let keys: Vec<String> = tokens
        .iter()
        .rev()
        .take(4)
        .map(|t| t.key().replace('.', ""))
        .collect();
    match keys.iter().map(String::as_str).collect::<Vec<_>>().as_slice() {
        ["america", "of", "states", "united", ..] => 4,
        ["states", "united", ..] => 2,
        ["usa", ..] | ["us", ..] => 1,
        _ => 0,
    }
}

fn is_state(text: &str, has_zip: bool) -> bool {
    let bare = text.trim_end_matches('.');
    if STATE_NAMES.contains(&bare.to_lowercase().as_str()) {
        return true;
    }
    // Two-letter codes collide with street types ("Ct"), so mixed case only counts before a zip.
    let upper = bare.to_uppercase();
    STATE_ABBREVIATIONS.contains(&upper.as_str()) && (has_zip || bare == upper)
}

/// Rule-based US address tokenizer.
///
/// Works from both ends: country, zip and state from the tail, house number or PO box
/// from the head, then splits the middle into street, occupancy and place.
#[derive(Debug, Default, Clone, Copy)]
pub struct UsAddressParser;

impl UsAddressParser {
    pub fn new() -> Self {
        Self
    }

    /// Index just past the street and occupancy of a one-segment address.
    fn single_segment_city_start(tokens: &[Token], start: usize, end: usize) -> usize {
        let Some(street_type) = (start + 1..end).rev().find(|&i| tokens[i].is_street_type()) else {
            return end;
        };
        let mut next = street_type + 1;
        if next < end && tokens[next].is_directional() {
            next += 1;
        }
        if next < end && tokens[next].is_occupancy() {
            next += if tokens[next].text.len() > 1 && tokens[next].text.starts_with('#') { 1 } else { 2 };
        }
        next.min(end)
    }

    fn label_street(tokens: &[Token], labels: &mut [Option<AddressLabel>], start: usize, end: usize) {
        if start >= end {
            return;
        }
        let mut name_start = start;
        if end - start > 1 && tokens[start].is_directional() {
            labels[start] = Some(AddressLabel::StreetNamePreDirectional);
            name_start += 1;
        }

        match (name_start + 1..end).rev().find(|&i| tokens[i].is_street_type()) {
            Some(street_type) => {
                for label in &mut labels[name_start..street_type] {
                    *label = Some(AddressLabel::StreetName);
                }
                labels[street_type] = Some(AddressLabel::StreetNamePostType);
                for i in street_type + 1..end {
                    labels[i] = Some(if i == street_type + 1 && tokens[i].is_directional() {
                        AddressLabel::StreetNamePostDirectional
                    } else {
                        AddressLabel::StreetName
                    });
                }
            }
            None => {
                let mut name_end = end;
                if end - name_start > 1 && tokens[end - 1].is_directional() {
                    labels[end - 1] = Some(AddressLabel::StreetNamePostDirectional);
                    name_end -= 1;
                }
                for label in &mut labels[name_start..name_end] {
                    *label = Some(AddressLabel::StreetName);
                }
            }
        }
    }
}

impl AddressParser for UsAddressParser {
    fn parse(&self, text: &str) -> Result<StructuredAddress, AddressParseError> {
        let tokens = tokenize(text);
        if tokens.is_empty() {
            return Err(AddressParseError::Empty);
        }
        let mut labels: Vec<Option<AddressLabel>> = vec![None; tokens.len()];
        let mut end = tokens.len();

        let country = country_len(&tokens);
        for label in &mut labels[end - country..end] {
            *label = Some(AddressLabel::CountryName);
        }
        end -= country;

        let has_zip = end >= 1 && ZIP.is_match(&tokens[end - 1].text);
        if has_zip {
            labels[end - 1] = Some(AddressLabel::ZipCode);
            end -= 1;
        }

        let mut has_state = false;
        if end >= 2 && is_state(&format!("{} {}", tokens[end - 2].text, tokens[end - 1].text), has_zip) {
            labels[end - 2] = Some(AddressLabel::StateName);
            labels[end - 1] = Some(AddressLabel::StateName);
            end -= 2;
            has_state = true;
        } else if end >= 1 && is_state(&tokens[end - 1].text, has_zip) {
            labels[end - 1] = Some(AddressLabel::StateName);
            end -= 1;
            has_state = true;
        }

        let mut start = 0;
        let is_po_box = end >= 2
            && matches!(tokens[0].key().replace('.', "").as_str(), "po" | "post")
            && tokens[1].key() == "box";
        if is_po_box {
            labels[0] = Some(AddressLabel::UspsBoxType);
            labels[1] = Some(AddressLabel::UspsBoxType);
            start = 2;
            if start < end {
                labels[start] = Some(AddressLabel::UspsBoxId);
                start += 1;
            }
        } else if end >= 2 && ADDRESS_NUMBER.is_match(&tokens[0].text) {
            labels[0] = Some(AddressLabel::AddressNumber);
            start = 1;
        }

        let mut city_start = end;
        if start < end {
            let street_segment = tokens[start].segment;
            let last_segment = tokens[end - 1].segment;
            if last_segment != street_segment {
                let first_of_last = (start..end)
                    .find(|&i| tokens[i].segment == last_segment)
                    .unwrap_or(end);
                if !tokens[first_of_last].is_occupancy() {
                    city_start = first_of_last;
                }
            } else if has_state && !is_po_box {
                city_start = Self::single_segment_city_start(&tokens, start, end);
            } else if is_po_box {
                city_start = start;
            }
        }
        for label in &mut labels[city_start..end] {
            *label = Some(AddressLabel::PlaceName);
        }

        let occupancy = (start..city_start).find(|&i| tokens[i].is_occupancy());
        let street_end = occupancy.unwrap_or(city_start);
        if let Some(index) = occupancy {
            let inline_id = tokens[index].text.len() > 1 && tokens[index].text.starts_with('#');
            labels[index] = Some(if inline_id {
                AddressLabel::OccupancyIdentifier
            } else {
                AddressLabel::OccupancyType
            });
            for label in &mut labels[index + 1..city_start] {
                *label = Some(AddressLabel::OccupancyIdentifier);
            }
        }
        Self::label_street(&tokens, &mut labels, start, street_end);

        let mut components = Vec::with_capacity(tokens.len());
        let mut seen = HashSet::new();
        let mut previous = None;
        for (token, label) in tokens.into_iter().zip(labels) {
            let label = label.unwrap_or(AddressLabel::StreetName);
            if previous != Some(label) {
                if !seen.insert(label) {
                    return Err(AddressParseError::RepeatedLabel {
                        label: label.as_str().to_string(),
                        token: token.text,
                    });
                }
                previous = Some(label);
            }
            components.push(AddressComponent(token.text, label));
        }

        Ok(StructuredAddress { components })
    }
}
