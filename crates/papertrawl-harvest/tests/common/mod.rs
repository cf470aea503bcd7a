//! Shared helpers for the harvest integration tests: a scripted in-memory
//! fetcher and fixture builders for listing and detail pages.

// Each integration test target compiles this module separately and uses a
// different subset of it.
#![allow(dead_code)]

use async_trait::async_trait;
use papertrawl_core::HarvestSection;
use papertrawl_harvest::{FetchError, FetchResult, Fetcher};
use std::collections::hash_map::DefaultHasher;
use std::collections::{HashMap, HashSet};
use std::hash::{Hash, Hasher};
use std::path::PathBuf;
use std::time::Duration;

pub const LISTING_URL: &str = "https://example.com/listing";
pub const BASE_URL: &str = "https://example.com";

/// In-memory fetcher scripted per URL: bodies, failures, and artificial
/// delays to shuffle completion order.
#[derive(Default)]
pub struct ScriptedFetcher {
    pages: HashMap<String, String>,
    failing: HashSet<String>,
    delays: HashMap<String, u64>,
    jitter_seed: Option<u64>,
}

impl ScriptedFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(mut self, url: impl Into<String>, body: impl Into<String>) -> Self {
        self.pages.insert(url.into(), body.into());
        self
    }

    pub fn failing(mut self, url: impl Into<String>) -> Self {
        self.failing.insert(url.into());
        self
    }

    pub fn delay_ms(mut self, url: impl Into<String>, ms: u64) -> Self {
        self.delays.insert(url.into(), ms);
        self
    }

    /// Give every URL a pseudo-random delay derived from the seed, so
    /// completion order varies between runs without being flaky.
    pub fn with_jitter(mut self, seed: u64) -> Self {
        self.jitter_seed = Some(seed);
        self
    }
}

#[async_trait]
impl Fetcher for ScriptedFetcher {
    async fn fetch(&self, url: &str) -> FetchResult<String> {
        let delay = self.delays.get(url).copied().or_else(|| {
            self.jitter_seed.map(|seed| {
                let mut hasher = DefaultHasher::new();
                url.hash(&mut hasher);
                seed.hash(&mut hasher);
                hasher.finish() % 23
            })
        });
        if let Some(ms) = delay {
            tokio::time::sleep(Duration::from_millis(ms)).await;
        }

        if self.failing.contains(url) {
            return Err(FetchError::Network(format!("scripted failure: {url}")));
        }

        self.pages
            .get(url)
            .cloned()
            .ok_or_else(|| FetchError::HttpStatus {
                url: url.to_string(),
                status: 404,
            })
    }
}

fn slug(title: &str) -> String {
    title.replace(' ', "_")
}

pub fn detail_url(title: &str) -> String {
    format!("{BASE_URL}/html/{}.html", slug(title))
}

/// Build a listing page fragment for the given titles, each with a title
/// anchor, one author form, and a PDF link.
pub fn listing_html(titles: &[&str]) -> String {
    titles
        .iter()
        .map(|title| {
            format!(
                "<dt class=\"ptitle\"><a href=\"/html/{s}.html\">{title}</a></dt>\n\
                 <dd><form class=\"authsearch\">\
                 <input name=\"query_author\" value=\"Author of {title}\"></form></dd>\n\
                 <dd><a href=\"/papers/{s}.pdf\">pdf</a></dd>",
                s = slug(title),
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn detail_html(abstract_text: &str) -> String {
    format!("<html><body><div id=\"abstract\">{abstract_text}</div></body></html>")
}

/// A fetcher pre-scripted with a listing for `titles` and a detail page per
/// title whose abstract is "Abstract of <title>".
pub fn scripted_harvest(titles: &[&str]) -> ScriptedFetcher {
    let mut fetcher = ScriptedFetcher::new().page(LISTING_URL, listing_html(titles));
    for title in titles {
        fetcher = fetcher.page(
            detail_url(title),
            detail_html(&format!("Abstract of {title}")),
        );
    }
    fetcher
}

pub fn section(workers: usize) -> HarvestSection {
    HarvestSection {
        listing_url: LISTING_URL.to_string(),
        base_url: BASE_URL.to_string(),
        workers,
        output: PathBuf::from("unused.csv"),
    }
}
