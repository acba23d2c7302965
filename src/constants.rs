//! Selector and label constants for the certification directory pages.

/// Directory listing of certified businesses.
pub const DEFAULT_LISTING_URL: &str = "https://www.eprismsoft.com/business/showCert?id=140";

// Listing page: the outer directory table
pub const LISTING_TABLE_SELECTOR: &str = "table.sftable_b";

// Detail page: one fieldset per row
pub const DETAIL_TABLE_SELECTOR: &str = "table.sftable";

/// Legend of the only group that carries several `Key: value` fields.
pub const BUSINESS_INFORMATION_LEGEND: &str = "Business Information";

/// Query parameter identifying a detail page; doubles as its cache key.
pub const PAGE_ID_PARAM: &str = "seq";

// Field keys after renaming
pub const CERTIFICATIONS_KEY: &str = "certification_information";
pub const LOCATION_KEY: &str = "location";
pub const PAGE_ID_KEY: &str = "page_id";
pub const URL_KEY: &str = "url";

// Ownership fields emitted from the business information group
pub const OWNERSHIP_TEXT_KEY: &str = "Ownership Text";
pub const OWNER_AFRICAN_AMERICAN_KEY: &str = "Owner African American";
pub const OWNER_HISPANIC_KEY: &str = "Owner Hispanic";
pub const OWNER_ASIAN_KEY: &str = "Owner Asian";
pub const OWNER_VETERAN_KEY: &str = "Owner Veteran";
pub const OWNER_FEMALE_KEY: &str = "Owner Female";

/// Business info keys whose values are lower-cased.
pub const LOWERCASE_KEYS: [&str; 2] = ["Email", "Website"];

/// Business info keys reduced to their digits.
pub const DIGIT_KEYS: [&str; 2] = ["Fax", "Phone"];
