//! HTML extraction for the proceedings listing and paper detail pages.

use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use std::sync::OnceLock;

/// One raw listing item, before deduplication and ordinal assignment.
/// `None` entries in [`ListingParser::parse_listing`] output mark fragments
/// that could not be parsed; their position is kept so ordinals stay stable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingEntry {
    pub title: String,
    pub authors: Vec<String>,
    pub pdf_link: String,
    pub supp_link: String,
    pub paper_url: Option<String>,
}

fn entry_selector() -> &'static Selector {
    static SEL: OnceLock<Selector> = OnceLock::new();
    SEL.get_or_init(|| Selector::parse("dt.ptitle").expect("valid selector"))
}

fn anchor_selector() -> &'static Selector {
    static SEL: OnceLock<Selector> = OnceLock::new();
    SEL.get_or_init(|| Selector::parse("a").expect("valid selector"))
}

fn author_input_selector() -> &'static Selector {
    static SEL: OnceLock<Selector> = OnceLock::new();
    SEL.get_or_init(|| {
        Selector::parse("form.authsearch input[name=\"query_author\"]").expect("valid selector")
    })
}

fn link_selector() -> &'static Selector {
    static SEL: OnceLock<Selector> = OnceLock::new();
    SEL.get_or_init(|| Selector::parse("a[href]").expect("valid selector"))
}

fn abstract_div_selector() -> &'static Selector {
    static SEL: OnceLock<Selector> = OnceLock::new();
    SEL.get_or_init(|| Selector::parse("div#abstract").expect("valid selector"))
}

fn div_selector() -> &'static Selector {
    static SEL: OnceLock<Selector> = OnceLock::new();
    SEL.get_or_init(|| Selector::parse("div").expect("valid selector"))
}

fn heading_selector() -> &'static Selector {
    static SEL: OnceLock<Selector> = OnceLock::new();
    SEL.get_or_init(|| Selector::parse("h2, h3, h4, strong, b").expect("valid selector"))
}

fn pdf_href_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"/papers/.*\.pdf").expect("valid regex"))
}

fn supp_href_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"/supplemental/.*\.pdf").expect("valid regex"))
}

/// Parser for the proceedings index layout: each paper is a `dt.ptitle`
/// holding the title anchor, followed by `dd` siblings holding the author
/// search forms and the PDF / supplementary links.
#[derive(Debug, Clone)]
pub struct ListingParser {
    base_url: String,
}

impl ListingParser {
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }

    /// Parse the listing page into per-entry results, in source order.
    ///
    /// A fragment without a usable title anchor yields `None` at its
    /// position; one malformed fragment never aborts the rest.
    #[must_use]
    pub fn parse_listing(&self, html: &str) -> Vec<Option<ListingEntry>> {
        let document = Html::parse_document(html);

        document
            .select(entry_selector())
            .map(|entry| self.parse_entry(&entry))
            .collect()
    }

    fn parse_entry(&self, entry: &ElementRef) -> Option<ListingEntry> {
        let title_link = entry.select(anchor_selector()).next()?;
        let title = normalize_text(&title_link.text().collect::<String>());
        if title.is_empty() {
            return None;
        }

        let paper_url = title_link
            .value()
            .attr("href")
            .filter(|href| !href.is_empty())
            .map(|href| self.join_url(href));

        let mut authors = Vec::new();
        let mut pdf_link = String::new();
        let mut supp_link = String::new();

        // The dt's metadata lives in the dd siblings that follow it, up to
        // the next dt.
        for sibling in entry.next_siblings().filter_map(ElementRef::wrap) {
            match sibling.value().name() {
                "dt" => break,
                "dd" => {
                    for input in sibling.select(author_input_selector()) {
                        if let Some(value) = input.value().attr("value") {
                            if !value.is_empty() {
                                authors.push(value.to_string());
                            }
                        }
                    }

                    for link in sibling.select(link_selector()) {
                        let href = link.value().attr("href").unwrap_or_default();
                        if pdf_link.is_empty() && pdf_href_regex().is_match(href) {
                            pdf_link = self.join_url(href);
                        } else if supp_link.is_empty() && supp_href_regex().is_match(href) {
                            supp_link = self.join_url(href);
                        }
                    }
                }
                _ => {}
            }
        }

        Some(ListingEntry {
            title,
            authors,
            pdf_link,
            supp_link,
            paper_url,
        })
    }

    fn join_url(&self, href: &str) -> String {
        if href.starts_with("http") {
            href.to_string()
        } else {
            format!(
                "{}/{}",
                self.base_url.trim_end_matches('/'),
                href.trim_start_matches('/')
            )
        }
    }
}

/// Best-effort abstract extraction from a paper detail page.
///
/// Returns the empty string when no abstract is found; that is not an
/// error. Tries `div#abstract`, then any div whose id or class mentions
/// "abstract", then a heading titled "Abstract" followed by a paragraph.
#[must_use]
pub fn parse_detail(html: &str) -> String {
    let document = Html::parse_document(html);

    if let Some(div) = document.select(abstract_div_selector()).next() {
        return normalize_text(&div.text().collect::<String>());
    }

    for div in document.select(div_selector()) {
        let id = div.value().attr("id").unwrap_or_default().to_lowercase();
        let class = div.value().attr("class").unwrap_or_default().to_lowercase();
        if id.contains("abstract") || class.contains("abstract") {
            return normalize_text(&div.text().collect::<String>());
        }
    }

    for heading in document.select(heading_selector()) {
        let label = normalize_text(&heading.text().collect::<String>());
        if label.eq_ignore_ascii_case("abstract") {
            let following = heading
                .next_siblings()
                .filter_map(ElementRef::wrap)
                .find(|el| matches!(el.value().name(), "p" | "div"));
            if let Some(el) = following {
                return normalize_text(&el.text().collect::<String>());
            }
        }
    }

    String::new()
}

fn normalize_text(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
