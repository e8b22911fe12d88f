//! Landing-page extraction: direct file URL and display title.
//!
//! The gateway's landing page carries its download controls inside a
//! `div#buttons` container. Two extraction strategies are tried in order:
//! plain buttons, then anchors inside a nested list (older mirror markup).
//! The file URL lives in an inline `onclick` handler as a
//! `location.href = '...'` assignment; the title sits in `div#citation`,
//! preferring the italicized journal-style title when present.
//!
//! Nothing here errors out: a page that matches neither strategy is simply
//! "not indexed by the gateway", and malformed markup degrades to the same
//! outcome with a logged warning.

use std::sync::LazyLock;

use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, instrument, warn};

#[allow(clippy::unwrap_used)] // static pattern, exercised by tests
static LOCATION_HREF_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"location\.href\s*=\s*'(.*?)'").unwrap());

/// Extraction strategies in priority order: name plus CSS selector for the
/// download-control elements.
const STRATEGIES: &[(&str, &str)] = &[
    ("buttons", "div#buttons button"),
    ("button-list", "div#buttons ul li a"),
];

const CITATION_TITLE_SELECTOR: &str = "div#citation i";
const CITATION_SELECTOR: &str = "div#citation";

/// A resolved landing page: the direct file URL (as found in the markup,
/// possibly scheme-relative) and the display title.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Landing {
    pub file_url: String,
    pub title: String,
}

/// Outcome of landing-page extraction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractOutcome {
    /// A download control and citation were found.
    Resolved(Landing),
    /// The gateway has not indexed this article (or the page is malformed).
    NotIndexed,
}

/// Extracts the direct-download URL and display title from landing-page HTML.
///
/// Never panics and never returns an error: every failure mode collapses to
/// [`ExtractOutcome::NotIndexed`].
#[must_use]
#[instrument(skip(html), fields(bytes = html.len()))]
pub fn extract_landing(html: &str) -> ExtractOutcome {
    let doc = Html::parse_document(html);

    let Some((strategy, controls)) = download_controls(&doc) else {
        debug!("no download controls found, article not indexed by gateway");
        return ExtractOutcome::NotIndexed;
    };

    let Some(onclick) = controls
        .iter()
        .find_map(|el| el.value().attr("onclick"))
    else {
        warn!(strategy, "download controls carry no onclick handler");
        return ExtractOutcome::NotIndexed;
    };

    let Some(file_url) = LOCATION_HREF_RE
        .captures(onclick)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
    else {
        warn!(strategy, onclick, "onclick handler has no location.href target");
        return ExtractOutcome::NotIndexed;
    };

    let Some(title) = citation_title(&doc) else {
        warn!(strategy, "landing page has no citation text");
        return ExtractOutcome::NotIndexed;
    };

    debug!(strategy, file_url = %file_url, "landing page resolved");
    ExtractOutcome::Resolved(Landing { file_url, title })
}

/// Runs the strategies in order; the first one matching any element wins.
fn download_controls<'a>(doc: &'a Html) -> Option<(&'static str, Vec<ElementRef<'a>>)> {
    for &(name, css) in STRATEGIES {
        let matches: Vec<ElementRef<'a>> = doc.select(&selector(css)?).collect();
        if !matches.is_empty() {
            return Some((name, matches));
        }
    }
    None
}

/// Title from the italic child of the citation container, falling back to the
/// container's own (direct) text content.
fn citation_title(doc: &Html) -> Option<String> {
    if let Some(italic) = doc.select(&selector(CITATION_TITLE_SELECTOR)?).next() {
        let text: String = italic.text().collect();
        let text = text.trim();
        if !text.is_empty() {
            return Some(text.to_string());
        }
    }

    let citation = doc.select(&selector(CITATION_SELECTOR)?).next()?;
    let own_text: String = citation
        .children()
        .filter_map(|node| node.value().as_text().map(|t| t.to_string()))
        .collect();
    let own_text = own_text.trim();
    (!own_text.is_empty()).then(|| own_text.to_string())
}

fn selector(css: &str) -> Option<Selector> {
    match Selector::parse(css) {
        Ok(sel) => Some(sel),
        Err(e) => {
            warn!(css, error = %e, "invalid selector");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn landing_page(buttons: &str, citation: &str) -> String {
        format!(
            "<html><body><div id=\"menu\"></div>\
             <div id=\"buttons\">{buttons}</div>\
             <div id=\"citation\">{citation}</div></body></html>"
        )
    }

    #[test]
    fn test_extracts_button_onclick_and_italic_title() {
        let html = landing_page(
            "<button onclick=\"location.href='//mirror/file.pdf'\">save</button>",
            "<i>Example Title</i>. Journal of Examples, 2024.",
        );
        let outcome = extract_landing(&html);
        assert_eq!(
            outcome,
            ExtractOutcome::Resolved(Landing {
                file_url: "//mirror/file.pdf".to_string(),
                title: "Example Title".to_string(),
            })
        );
    }

    #[test]
    fn test_falls_back_to_anchor_list_strategy() {
        let html = landing_page(
            "<ul><li><a href=\"#\" onclick=\"location.href='//mirror/alt.pdf'\">open</a></li></ul>",
            "<i>Alt Title</i>",
        );
        match extract_landing(&html) {
            ExtractOutcome::Resolved(landing) => {
                assert_eq!(landing.file_url, "//mirror/alt.pdf");
                assert_eq!(landing.title, "Alt Title");
            }
            ExtractOutcome::NotIndexed => panic!("anchor strategy should match"),
        }
    }

    #[test]
    fn test_first_onclick_carrying_element_wins() {
        let html = landing_page(
            "<button>no handler</button>\
             <button onclick=\"location.href='//mirror/first.pdf'\">a</button>\
             <button onclick=\"location.href='//mirror/second.pdf'\">b</button>",
            "<i>T</i>",
        );
        match extract_landing(&html) {
            ExtractOutcome::Resolved(landing) => {
                assert_eq!(landing.file_url, "//mirror/first.pdf");
            }
            ExtractOutcome::NotIndexed => panic!("expected a resolution"),
        }
    }

    #[test]
    fn test_no_controls_is_not_indexed() {
        let html = landing_page("", "<i>Title</i>");
        assert_eq!(extract_landing(&html), ExtractOutcome::NotIndexed);
    }

    #[test]
    fn test_missing_buttons_container_is_not_indexed() {
        let html = "<html><body><p>article unknown</p></body></html>";
        assert_eq!(extract_landing(html), ExtractOutcome::NotIndexed);
    }

    #[test]
    fn test_onclick_without_location_href_is_not_indexed() {
        let html = landing_page(
            "<button onclick=\"alert('nope')\">save</button>",
            "<i>Title</i>",
        );
        assert_eq!(extract_landing(&html), ExtractOutcome::NotIndexed);
    }

    #[test]
    fn test_citation_text_fallback_when_no_italic() {
        let html = landing_page(
            "<button onclick=\"location.href='//m/f.pdf'\">save</button>",
            "Example Title",
        );
        match extract_landing(&html) {
            ExtractOutcome::Resolved(landing) => assert_eq!(landing.title, "Example Title"),
            ExtractOutcome::NotIndexed => panic!("expected fallback title"),
        }
    }

    #[test]
    fn test_missing_citation_entirely_is_not_indexed() {
        let html = "<html><body><div id=\"buttons\">\
             <button onclick=\"location.href='//m/f.pdf'\">save</button>\
             </div></body></html>";
        assert_eq!(extract_landing(html), ExtractOutcome::NotIndexed);
    }

    #[test]
    fn test_garbage_input_never_panics() {
        assert_eq!(extract_landing(""), ExtractOutcome::NotIndexed);
        assert_eq!(extract_landing("<<<>>>&&&"), ExtractOutcome::NotIndexed);
        assert_eq!(
            extract_landing("\u{0}\u{1}<div id=buttons>"),
            ExtractOutcome::NotIndexed
        );
    }

    #[test]
    fn test_location_href_regex_tolerates_spacing() {
        let html = landing_page(
            "<button onclick=\"location.href = '//mirror/spaced.pdf' \">save</button>",
            "<i>T</i>",
        );
        match extract_landing(&html) {
            ExtractOutcome::Resolved(landing) => {
                assert_eq!(landing.file_url, "//mirror/spaced.pdf");
            }
            ExtractOutcome::NotIndexed => panic!("spacing variants must parse"),
        }
    }
}
