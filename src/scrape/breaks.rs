//! Break lookup: the break's own page and the free-text search payload.

use markup5ever_rcdom::Handle;

use crate::htmlutil::{self, find_first, with_attribute, with_id_equal};
use crate::model::{Break, BreakSearchResult, ScrapeError};

const ID_DROP_FORM_CONTROL_NAV: &str = "dropformcont-nav";
const ID_COUNTRY: &str = "country_id";
const ID_LOCATION_FILENAME_PART: &str = "location_filename_part";

const ATTRIBUTE_SELECTED: &str = "selected";

const SEARCH_RESULT_WIDTH: usize = 3;

fn selected_option_text(select: &Handle, what: &str) -> Result<String, ScrapeError> {
    let option = find_first(select, &[with_attribute(ATTRIBUTE_SELECTED)])
        .ok_or_else(|| ScrapeError::not_found(format!("{} node", what)))?;
    let text = htmlutil::text_content(&option).trim().to_string();
    if text.is_empty() {
        return Err(ScrapeError::not_found(format!("{} text node", what)));
    }
    Ok(text)
}

/// Read the break and country names selected in the page's navigation form.
pub fn scrape_break(document: &Handle) -> Result<Break, ScrapeError> {
    let nav = find_first(document, &[with_id_equal(ID_DROP_FORM_CONTROL_NAV)])
        .ok_or_else(|| ScrapeError::not_found("navigation node"))?;

    let country = find_first(&nav, &[with_id_equal(ID_COUNTRY)])
        .ok_or_else(|| ScrapeError::not_found("country node"))?;
    let country_name = selected_option_text(&country, "country name")?;

    let location = find_first(&nav, &[with_id_equal(ID_LOCATION_FILENAME_PART)])
        .ok_or_else(|| ScrapeError::not_found("break node"))?;
    let name = selected_option_text(&location, "break name")?;

    Ok(Break { name, country_name })
}

/// Parse the search endpoint's body.
///
/// The body is a 2-D array of strings written with single quotes, e.g.
/// `[['1234','Cherating','Malaysia']]`. The first element of each entry is
/// an opaque identifier and is ignored.
pub fn parse_search_results(body: &str) -> Result<Vec<BreakSearchResult>, ScrapeError> {
    let normalized = body.replace('\'', "\"");
    let raw: Vec<Vec<String>> = serde_json::from_str(&normalized)
        .map_err(|e| ScrapeError::malformed("search payload", body, e.to_string()))?;

    raw.into_iter()
        .enumerate()
        .map(|(i, entry)| {
            if entry.len() != SEARCH_RESULT_WIDTH {
                return Err(ScrapeError::malformed(
                    "search result",
                    format!("{:?}", entry),
                    format!("expected {} elements", SEARCH_RESULT_WIDTH),
                )
                .within(format!("entry {}", i)));
            }
            let mut fields = entry.into_iter().skip(1);
            Ok(BreakSearchResult {
                name: fields.next().unwrap_or_default(),
                country_name: fields.next().unwrap_or_default(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::htmlutil::parse_html;
    use crate::model::ErrorKind;

    const BREAK_PAGE: &str = r#"<html><body>
        <form id="dropformcont-nav">
          <select id="country_id">
            <option value="1">Indonesia</option>
            <option value="2" selected="selected">Malaysia</option>
          </select>
          <select id="location_filename_part">
            <option value="Batu-Burok">Batu Burok</option>
            <option value="Cherating" selected>Cherating</option>
          </select>
        </form>
    </body></html>"#;

    #[test]
    fn test_scrape_break_reads_selected_options() {
        let dom = parse_html(BREAK_PAGE.as_bytes()).unwrap();
        let brk = scrape_break(&dom.document).unwrap();
        assert_eq!(
            brk,
            Break {
                name: "Cherating".to_string(),
                country_name: "Malaysia".to_string(),
            }
        );
    }

    #[test]
    fn test_scrape_break_without_nav_is_not_found() {
        let dom = parse_html(b"<html><body><p>gone</p></body></html>").unwrap();
        let err = scrape_break(&dom.document).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn test_parse_search_results() {
        let results =
            parse_search_results("[['a1','Cherating','Malaysia'],['b2','Chicama','Peru']]").unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].name, "Cherating");
        assert_eq!(results[1].country_name, "Peru");
    }

    #[test]
    fn test_parse_search_results_empty() {
        assert!(parse_search_results("[]").unwrap().is_empty());
    }

    #[test]
    fn test_parse_search_results_rejects_wrong_width() {
        let err = parse_search_results("[['a1','Cherating']]").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Malformed);
        assert!(parse_search_results("<html>").is_err());
    }
}
