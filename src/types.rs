use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Flattened fields scraped from one detail page, in document order.
pub type RawRecord = IndexMap<String, FieldValue>;

/// A record after field cleanup, key renaming and removal of absent values.
pub type NormalizedRecord = IndexMap<String, FieldValue>;

/// Value of a single record field.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    Flag(bool),
    Certifications(Vec<CertificationEntry>),
    Location(StructuredAddress),
    Absent,
}

impl FieldValue {
    pub fn is_absent(&self) -> bool {
        matches!(self, FieldValue::Absent)
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_flag(&self) -> Option<bool> {
        match self {
            FieldValue::Flag(flag) => Some(*flag),
            _ => None,
        }
    }

    /// Render the value as a single CSV cell.
    pub fn to_cell(&self) -> String {
        match self {
            FieldValue::Text(text) => text.clone(),
            FieldValue::Flag(flag) => flag.to_string(),
            FieldValue::Certifications(entries) => entries
                .iter()
                .map(CertificationEntry::to_line)
                .collect::<Vec<_>>()
                .join("\n"),
            FieldValue::Location(address) => address.to_line(),
            FieldValue::Absent => String::new(),
        }
    }
}

/// One line of a certification list: `<location> - <name> expiring on <expiration>`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CertificationEntry {
    pub location: String,
    pub name: String,
    pub expiration: String,
}

impl CertificationEntry {
    pub fn to_line(&self) -> String {
        format!("{} - {} expiring on {}", self.location, self.name, self.expiration)
    }
}

/// Component tags produced by the address tokenizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AddressLabel {
    AddressNumber,
    StreetNamePreDirectional,
    StreetName,
    StreetNamePostType,
    StreetNamePostDirectional,
    OccupancyType,
    OccupancyIdentifier,
    #[serde(rename = "USPSBoxType")]
    UspsBoxType,
    #[serde(rename = "USPSBoxID")]
    UspsBoxId,
    PlaceName,
    StateName,
    ZipCode,
    CountryName,
}

impl AddressLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            AddressLabel::AddressNumber => "AddressNumber",
            AddressLabel::StreetNamePreDirectional => "StreetNamePreDirectional",
            AddressLabel::StreetName => "StreetName",
            AddressLabel::StreetNamePostType => "StreetNamePostType",
            AddressLabel::StreetNamePostDirectional => "StreetNamePostDirectional",
            AddressLabel::OccupancyType => "OccupancyType",
            AddressLabel::OccupancyIdentifier => "OccupancyIdentifier",
            AddressLabel::UspsBoxType => "USPSBoxType",
            AddressLabel::UspsBoxId => "USPSBoxID",
            AddressLabel::PlaceName => "PlaceName",
            AddressLabel::StateName => "StateName",
            AddressLabel::ZipCode => "ZipCode",
            AddressLabel::CountryName => "CountryName",
        }
    }
}

/// A tagged address token, serialized as `[token, label]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressComponent(pub String, pub AddressLabel);

/// Tokenized postal address in input order.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StructuredAddress {
    pub components: Vec<AddressComponent>,
}

impl StructuredAddress {
    /// Tokens carrying `label`, joined by a space.
    pub fn get(&self, label: AddressLabel) -> Option<String> {
        let tokens: Vec<&str> = self
            .components
            .iter()
            .filter(|c| c.1 == label)
            .map(|c| c.0.as_str())
            .collect();
        if tokens.is_empty() {
            None
        } else {
            Some(tokens.join(" "))
        }
    }

    pub fn to_line(&self) -> String {
        self.components
            .iter()
            .map(|c| c.0.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Ownership categories read from the "This is a(n) X-Owned Business" sentence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OwnershipFlags {
    pub text: String,
    pub african_american: bool,
    pub hispanic: bool,
    pub asian: bool,
    pub veteran: bool,
    pub female: bool,
}

impl OwnershipFlags {
    pub fn from_text(text: &str) -> Self {
        Self {
            text: text.to_string(),
            african_american: text.contains("African American"),
            hispanic: text.contains("Hispanic"),
            asian: text.contains("Asian"),
            veteran: text.contains("Veteran"),
            female: text.contains("Female"),
        }
    }
}

/// One row of a detail page table after HTML extraction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRow {
    pub legend: String,
    /// Full fieldset text, legend included, with `<br>` turned into `\n`.
    pub text: String,
}

impl TableRow {
    pub fn new(legend: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            legend: legend.into(),
            text: text.into(),
        }
    }

    /// Fieldset text without the leading legend.
    pub fn body(&self) -> &str {
        self.text
            .trim_start()
            .strip_prefix(self.legend.as_str())
            .unwrap_or(&self.text)
    }
}
