use crate::constants::DETAIL_TABLE_SELECTOR;
use crate::error::{Result, ScraperError};
use crate::types::TableRow;
use scraper::{ElementRef, Html, Node, Selector};
use tracing::debug;

pub(crate) fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|_| ScraperError::Selector(css.to_string()))
}

/// Text content of `element` with every `<br>` rendered as a newline.
///
/// Free-text fields on the detail pages separate their entries with line
/// breaks, so these have to survive text extraction.
pub fn text_with_breaks(element: ElementRef) -> String {
    let mut out = String::new();
    for node in element.descendants() {
        match node.value() {
            Node::Text(text) => out.push_str(text),
            Node::Element(el) if el.name() == "br" => out.push('\n'),
            _ => {}
        }
    }
    out
}

/// Rows of `table` itself, skipping rows that belong to nested tables.
pub(crate) fn own_rows<'a>(table: ElementRef<'a>, tr: &Selector) -> Vec<ElementRef<'a>> {
    table
        .select(tr)
        .filter(|row| {
            row.ancestors()
                .filter_map(ElementRef::wrap)
                .find(|el| el.value().name() == "table")
                .map(|el| el.id() == table.id())
                .unwrap_or(false)
        })
        .collect()
}

/// Extract the fieldset rows of a detail page.
///
/// Every row must hold `td > fieldset > legend`; anything else means the page
/// is not a detail page we understand.
pub fn extract_table_rows(html: &str) -> Result<Vec<TableRow>> {
    let document = Html::parse_document(html);
    let table_sel = selector(DETAIL_TABLE_SELECTOR)?;
    let tr_sel = selector("tr")?;
    let td_sel = selector("td")?;
    let fieldset_sel = selector("fieldset")?;
    let legend_sel = selector("legend")?;

    let table = document
        .select(&table_sel)
        .next()
        .ok_or_else(|| ScraperError::Structure(format!("no {} found", DETAIL_TABLE_SELECTOR)))?;

    let mut rows = Vec::new();
    for (index, row) in own_rows(table, &tr_sel).into_iter().enumerate() {
        let cell = row
            .select(&td_sel)
            .next()
            .ok_or_else(|| ScraperError::Structure(format!("row {} has no cell", index)))?;
        let fieldset = cell
            .select(&fieldset_sel)
            .next()
            .ok_or_else(|| ScraperError::Structure(format!("row {} has no fieldset", index)))?;
        let legend = fieldset
            .select(&legend_sel)
            .next()
            .ok_or_else(|| ScraperError::Structure(format!("row {} has no legend", index)))?;

        let legend_text = text_with_breaks(legend).trim().to_string();
        debug!("Row {}: legend='{}'", index, legend_text);
        rows.push(TableRow::new(legend_text, text_with_breaks(fieldset)));
    }

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_breaks_become_newlines() {
        let html = r#"<table class="sftable"><tr><td><fieldset><legend>Location</legend>100 Main St<br>Peoria, IL 61602</fieldset></td></tr></table>"#;
        let rows = extract_table_rows(html).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].legend, "Location");
        assert_eq!(rows[0].text, "Location100 Main St\nPeoria, IL 61602");
        assert_eq!(rows[0].body(), "100 Main St\nPeoria, IL 61602");
    }

    #[test]
    fn test_missing_table_is_structural_failure() {
        let err = extract_table_rows("<html><body><p>Not found</p></body></html>").unwrap_err();
        assert!(matches!(err, ScraperError::Structure(_)));
    }

    #[test]
    fn test_row_without_fieldset_is_structural_failure() {
        let html = r#"<table class="sftable"><tr><td>plain cell</td></tr></table>"#;
        let err = extract_table_rows(html).unwrap_err();
        assert!(matches!(err, ScraperError::Structure(_)));
    }

    #[test]
    fn test_nested_table_rows_are_ignored() {
        let html = r#"<table class="sftable">
            <tr><td><fieldset><legend>Products</legend>
                <table><tr><td>Widgets</td></tr></table>
            </fieldset></td></tr>
        </table>"#;
        let rows = extract_table_rows(html).unwrap();
        assert_eq!(rows.len(), 1);
        assert!(rows[0].body().contains("Widgets"));
    }
}
