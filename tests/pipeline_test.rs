#[cfg(test)]
mod tests {
    use metrics_exporter_prometheus::PrometheusBuilder;
    use peoria_dei_scraper::fetch::{CachedPageSource, PageCache, PageSource};
    use peoria_dei_scraper::normalize::UsAddressParser;
    use peoria_dei_scraper::output::write_output;
    use peoria_dei_scraper::{Pipeline, Result, ScraperError};
    use std::collections::HashMap;
    use std::fs;
    use tempfile::TempDir;

    const LISTING_URL: &str = "https://www.example.com/business/showCert?id=140";
    const DETAIL_PAGE: &str = include_str!("fixtures/detail_page.html");

    const LISTING: &str = r#"<html><body>
        <table class="sftable_b">
            <tr><th>Business</th></tr>
            <tr><td><a href="/business/showBusiness?seq=1">Acme Supply</a></td></tr>
            <tr><td>Section: Construction</td></tr>
            <tr><td><a href="/business/showBusiness?seq=2">Broken Page</a></td></tr>
            <tr><td><a href="/business/showBusiness?seq=3">Gone</a></td></tr>
        </table>
    </body></html>"#;

    struct StubSource {
        pages: HashMap<String, String>,
    }

    impl StubSource {
        fn new() -> Self {
            let mut pages = HashMap::new();
            pages.insert(LISTING_URL.to_string(), LISTING.to_string());
            pages.insert(
                "https://www.example.com/business/showBusiness?seq=1".to_string(),
                DETAIL_PAGE.to_string(),
            );
            pages.insert(
                "https://www.example.com/business/showBusiness?seq=2".to_string(),
                "<html><body>Record not found</body></html>".to_string(),
            );
            Self { pages }
        }
    }

    impl PageSource for StubSource {
        fn fetch(&self, url: &str) -> Result<String> {
            self.pages.get(url).cloned().ok_or_else(|| ScraperError::Fetch {
                url: url.to_string(),
                message: "404 Not Found".to_string(),
            })
        }
    }

    #[test]
    fn test_batch_continues_past_failed_pages() {
        let source = StubSource::new();
        let addresses = UsAddressParser::new();
        let pipeline = Pipeline::new(&source, &source, &addresses);

        let result = pipeline.run(LISTING_URL).unwrap();
        assert_eq!(result.total_links, 3);
        assert_eq!(result.processed, 1);
        assert_eq!(result.failed, 2);
        assert_eq!(result.errors.len(), 2);
        assert!(result.errors[0].contains("seq=2"));
        assert!(result.errors[1].contains("404"));
        assert_eq!(result.records[0]["page_id"].as_text(), Some("1"));
    }

    #[test]
    fn test_page_counters_reach_the_recorder() {
        let source = StubSource::new();
        let addresses = UsAddressParser::new();
        let pipeline = Pipeline::new(&source, &source, &addresses);
        let recorder = PrometheusBuilder::new().build_recorder();
        let handle = recorder.handle();

        metrics::with_local_recorder(&recorder, || pipeline.run(LISTING_URL)).unwrap();

        let rendered = handle.render();
        assert!(rendered.contains("dei_pages_processed_total 1"));
        assert!(rendered.contains("dei_pages_failed_total 2"));
    }

    #[test]
    fn test_listing_failure_is_an_error() {
        let source = StubSource::new();
        let addresses = UsAddressParser::new();
        let pipeline = Pipeline::new(&source, &source, &addresses);
        assert!(pipeline.run("https://www.example.com/missing").is_err());
    }

    #[test]
    fn test_detail_pages_are_cached() {
        let dir = TempDir::new().unwrap();
        let source = StubSource::new();
        let cached = CachedPageSource::new(StubSource::new(), PageCache::new(dir.path().join("pages")));
        let addresses = UsAddressParser::new();
        let pipeline = Pipeline::new(&source, &cached, &addresses);

        pipeline.run(LISTING_URL).unwrap();
        assert!(dir.path().join("pages/1.html").is_file());
        assert!(dir.path().join("pages/2.html").is_file());
        assert!(!dir.path().join("pages/3.html").exists());
    }

    #[test]
    fn test_run_writes_csv_and_json() {
        let dir = TempDir::new().unwrap();
        let source = StubSource::new();
        let addresses = UsAddressParser::new();
        let pipeline = Pipeline::new(&source, &source, &addresses);
        let result = pipeline.run(LISTING_URL).unwrap();

        let csv_path = dir.path().join("out/records.csv");
        let json_path = dir.path().join("out/records.json");
        write_output(&result.records, &csv_path, &json_path).unwrap();

        let csv = fs::read_to_string(&csv_path).unwrap();
        let header = csv.lines().next().unwrap();
        assert!(header.starts_with("company,contact,phone,email,website,ownership_text"));
        assert!(header.contains("certification_information"));
        assert!(header.ends_with("page_id,url"));

        let json: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&json_path).unwrap()).unwrap();
        let records = json.as_array().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0]["company"], serde_json::json!("Acme Supply Co."));
        assert_eq!(records[0]["owner_asian"], serde_json::json!(false));
    }
}
