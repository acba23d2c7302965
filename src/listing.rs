use crate::constants::LISTING_TABLE_SELECTOR;
use crate::error::Result;
use crate::html::selector;
use scraper::Html;
use std::collections::HashSet;
use tracing::{debug, info, warn};
use url::Url;

/// Scheme, host and port of `url`, used as the base for relative links.
fn origin(base_url: &str) -> Result<Url> {
    let mut base = Url::parse(base_url)?;
    base.set_path("/");
    base.set_query(None);
    base.set_fragment(None);
    Ok(base)
}

/// Collect detail page URLs from the directory listing, in document order.
///
/// Every row under the listing table is visited, including rows of tables
/// nested inside it. The first row is the header and is skipped, as is any
/// row whose first cell has no link. A link reached through both an outer
/// row and its nested row is kept once, at its first position. A page
/// without the listing table yields an empty list; only a bad `base_url` is
/// an error.
pub fn extract_links(listing_html: &str, base_url: &str) -> Result<Vec<String>> {
    let base = origin(base_url)?;
    let document = Html::parse_document(listing_html);
    let table_sel = selector(LISTING_TABLE_SELECTOR)?;
    let tr_sel = selector("tr")?;
    let td_sel = selector("td")?;
    let anchor_sel = selector("a")?;

    let Some(table) = document.select(&table_sel).next() else {
        warn!("No {} found on listing page", LISTING_TABLE_SELECTOR);
        return Ok(Vec::new());
    };

    let mut links = Vec::new();
    let mut seen = HashSet::new();
    for (index, row) in table.select(&tr_sel).enumerate().skip(1) {
        let Some(cell) = row.select(&td_sel).next() else {
            debug!("Listing row {} has no cell", index);
            continue;
        };
        let Some(anchor) = cell.select(&anchor_sel).next() else {
            debug!("Listing row {} has no link", index);
            continue;
        };
        let Some(href) = anchor.value().attr("href") else {
            debug!("Listing row {} link has no href", index);
            continue;
        };
        match base.join(href.trim()) {
            Ok(url) => {
                let url = url.to_string();
                if seen.insert(url.clone()) {
                    links.push(url);
                } else {
                    debug!("Listing row {} repeats {}", index, url);
                }
            }
            Err(e) => warn!("Skipping unresolvable link '{}': {}", href, e),
        }
    }

    info!("Found {} detail links", links.len());
    Ok(links)
}

#[cfg(test)]
mod tests {
    use super::*;

    const LISTING: &str = r#"<html><body>
        <table class="sftable_b">
            <tr><th>Business</th><th>City</th></tr>
            <tr><td><a href="/business/showBusiness?seq=101">Acme Supply</a></td><td>Peoria</td></tr>
            <tr><td>Construction</td><td></td></tr>
        </table>
    </body></html>"#;

    #[test]
    fn test_rows_without_links_are_skipped() {
        let links = extract_links(LISTING, "https://www.example.com/business/showCert?id=140").unwrap();
        assert_eq!(links, vec!["https://www.example.com/business/showBusiness?seq=101"]);
    }

    #[test]
    fn test_header_row_is_skipped_even_with_link() {
        let html = r#"<table class="sftable_b">
            <tr><td><a href="/header">Header</a></td></tr>
            <tr><td><a href="/business/showBusiness?seq=7">Seven</a></td></tr>
        </table>"#;
        let links = extract_links(html, "http://host.test:8080/listing").unwrap();
        assert_eq!(links, vec!["http://host.test:8080/business/showBusiness?seq=7"]);
    }

    #[test]
    fn test_rows_of_nested_tables_are_walked() {
        let html = r#"<table class="sftable_b">
            <tr><th>Business</th></tr>
            <tr><td><table>
                <tr><td><a href="/business/showBusiness?seq=1">One</a></td></tr>
                <tr><td><a href="/business/showBusiness?seq=2">Two</a></td></tr>
            </table></td></tr>
        </table>"#;
        let links = extract_links(html, "https://www.example.com/business/showCert?id=140").unwrap();
        assert_eq!(
            links,
            vec![
                "https://www.example.com/business/showBusiness?seq=1",
                "https://www.example.com/business/showBusiness?seq=2",
            ]
        );
    }

    #[test]
    fn test_missing_table_yields_empty_list() {
        let links = extract_links("<html></html>", "https://www.example.com/").unwrap();
        assert!(links.is_empty());
    }

    #[test]
    fn test_bad_base_url_is_an_error() {
        assert!(extract_links(LISTING, "not a url").is_err());
    }
}
