pub mod assembler;
pub mod config;
pub mod constants;
pub mod detail;
pub mod error;
pub mod fetch;
pub mod html;
pub mod listing;
pub mod logging;
pub mod metrics;
pub mod normalize;
pub mod output;
pub mod pipeline;
pub mod types;

pub use assembler::finalize;
pub use detail::parse_detail_table;
pub use error::{Result, ScraperError};
pub use listing::extract_links;
pub use normalize::{parse_business_info, parse_certifications, parse_location};
pub use pipeline::{Pipeline, PipelineResult};
