//! Field-level cleanup of scraped detail page text.

pub mod address;
pub mod business_info;
pub mod certifications;
pub mod location;

pub use address::{AddressParser, UsAddressParser};
pub use business_info::parse_business_info;
pub use certifications::parse_certifications;
pub use location::parse_location;
