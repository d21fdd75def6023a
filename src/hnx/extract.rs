use scraper::{ElementRef, Html, Selector};

use crate::core::{FeedError, RawRow, normalize::collapse_whitespace};

/// Reads the rows of the rendered HNX table.
///
/// Each matched row becomes one [`RawRow`] holding the visible text of its
/// direct `td` children, in column order. Short rows are kept here and dropped
/// by the normalizer.
///
/// # Errors
///
/// Returns [`FeedError::Config`] if `row_selector` is not valid CSS.
pub fn extract_rows(html: &str, row_selector: &str) -> Result<Vec<RawRow>, FeedError> {
    let rows = Selector::parse(row_selector)
        .map_err(|e| FeedError::Config(format!("invalid selector `{row_selector}`: {e}")))?;
    let doc = Html::parse_document(html);

    Ok(doc
        .select(&rows)
        .map(|tr| RawRow {
            cells: tr
                .children()
                .filter_map(ElementRef::wrap)
                .filter(|el| el.value().name().eq_ignore_ascii_case("td"))
                .map(|td| collapse_whitespace(&td.text().collect::<String>()))
                .collect(),
        })
        .collect())
}
