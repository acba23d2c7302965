use crate::assembler::finalize;
use crate::constants::{PAGE_ID_KEY, URL_KEY};
use crate::detail::parse_detail_table;
use crate::error::Result;
use crate::fetch::{page_id, PageSource};
use crate::html::extract_table_rows;
use crate::listing::extract_links;
use crate::metrics::{PAGES_FAILED, PAGES_PROCESSED};
use crate::normalize::AddressParser;
use crate::types::{FieldValue, NormalizedRecord};
use ::metrics::counter;
use tracing::{debug, info, instrument, warn};

/// Result of a complete scrape run
#[derive(Debug, Default)]
pub struct PipelineResult {
    pub total_links: usize,
    pub processed: usize,
    pub failed: usize,
    pub errors: Vec<String>,
    pub records: Vec<NormalizedRecord>,
}

pub struct Pipeline<'a> {
    pages: &'a dyn PageSource,
    listing: &'a dyn PageSource,
    addresses: &'a dyn AddressParser,
}

impl<'a> Pipeline<'a> {
    /// `listing` serves the directory page, `pages` the detail pages
    /// (usually behind a cache).
    pub fn new(
        listing: &'a dyn PageSource,
        pages: &'a dyn PageSource,
        addresses: &'a dyn AddressParser,
    ) -> Self {
        Self {
            pages,
            listing,
            addresses,
        }
    }

    /// Turn one detail page into its final record.
    pub fn process_page(&self, url: &str, html: &str) -> Result<NormalizedRecord> {
        let rows = extract_table_rows(html)?;
        let mut record = parse_detail_table(&rows);
        record.insert(PAGE_ID_KEY.to_string(), FieldValue::Text(page_id(url)));
        record.insert(URL_KEY.to_string(), FieldValue::Text(url.to_string()));
        Ok(finalize(record, self.addresses))
    }

    #[instrument(skip(self))]
    fn scrape_page(&self, url: &str) -> Result<NormalizedRecord> {
        let html = self.pages.fetch(url)?;
        self.process_page(url, &html)
    }

    /// Detail page URLs listed on the directory page.
    pub fn discover(&self, listing_url: &str) -> Result<Vec<String>> {
        info!("Reading listing {}", listing_url);
        let listing_html = self.listing.fetch(listing_url)?;
        extract_links(&listing_html, listing_url)
    }

    /// Scrape every business linked from the listing.
    ///
    /// Failing to read the listing is an error. A page that cannot be fetched
    /// or parsed is logged and skipped, and the run carries on.
    pub fn run(&self, listing_url: &str) -> Result<PipelineResult> {
        let links = self.discover(listing_url)?;
        let mut result = PipelineResult {
            total_links: links.len(),
            ..Default::default()
        };

        for (i, url) in links.iter().enumerate() {
            match self.scrape_page(url) {
                Ok(record) => {
                    debug!("Processed {}/{}: {}", i + 1, links.len(), url);
                    counter!(PAGES_PROCESSED).increment(1);
                    result.processed += 1;
                    result.records.push(record);
                }
                Err(e) => {
                    warn!("Skipping {}: {}", url, e);
                    counter!(PAGES_FAILED).increment(1);
                    result.failed += 1;
                    result.errors.push(format!("{}: {}", url, e));
                }
            }
        }

        info!(
            "Scrape finished: {} links, {} processed, {} failed",
            result.total_links, result.processed, result.failed
        );
        Ok(result)
    }
}
