//! End-to-end harvest behavior against a scripted fetcher and a real
//! on-disk store.

mod common;

use common::{detail_url, listing_html, scripted_harvest, section, ScriptedFetcher};
use papertrawl_harvest::{HarvestError, HarvestOrchestrator};
use papertrawl_store::{Record, RecordStore};
use std::sync::Arc;

fn store_in(dir: &tempfile::TempDir) -> RecordStore {
    RecordStore::new(dir.path().join("papers.csv"))
}

fn read_rows(store: &RecordStore) -> Vec<Record> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_path(store.path())
        .expect("open store for reading");
    reader
        .deserialize()
        .collect::<Result<_, _>>()
        .expect("deserialize store rows")
}

#[tokio::test]
async fn test_full_run_persists_every_entry() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let store = store_in(&dir);
    let fetcher = Arc::new(scripted_harvest(&["Alpha", "Beta", "Gamma"]));

    let orchestrator = HarvestOrchestrator::new(fetcher, store.clone(), &section(4));
    let summary = orchestrator.run().await.expect("harvest succeeds");

    assert_eq!(summary.listed, 3);
    assert_eq!(summary.enumerated, 3);
    assert_eq!(summary.skipped, 0);
    assert_eq!(summary.parse_dropped, 0);
    assert_eq!(summary.enrichment_failed, 0);
    assert_eq!(summary.persisted, 3);

    let rows = read_rows(&store);
    assert_eq!(rows.len(), 3);
    let alpha = rows
        .iter()
        .find(|r| r.title == "Alpha")
        .expect("Alpha persisted");
    assert_eq!(alpha.abstract_text, "Abstract of Alpha");
    assert_eq!(alpha.authors, "Author of Alpha");
    assert_eq!(alpha.author_count, 1);
    assert_eq!(alpha.paper_url, detail_url("Alpha"));
}

#[tokio::test]
async fn test_preloaded_key_is_skipped() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let store = store_in(&dir);

    // Pre-load the store with key "Alpha" from an earlier run
    store
        .append(&[Record {
            title: "Alpha".to_string(),
            authors: "Author of Alpha".to_string(),
            author_count: 1,
            abstract_text: "Old abstract".to_string(),
            pdf_link: String::new(),
            supp_link: String::new(),
            paper_url: String::new(),
        }])
        .expect("preload store");

    let fetcher = Arc::new(scripted_harvest(&["Alpha", "Beta", "Gamma"]));
    let orchestrator = HarvestOrchestrator::new(fetcher, store.clone(), &section(4));
    let summary = orchestrator.run().await.expect("harvest succeeds");

    assert_eq!(summary.enumerated, 2);
    assert_eq!(summary.skipped, 1);
    assert_eq!(summary.persisted, 2);

    let keys: Vec<String> = read_rows(&store).into_iter().map(|r| r.title).collect();
    assert_eq!(keys.len(), 3);
    // The pre-loaded row was not rewritten
    assert_eq!(keys.iter().filter(|k| *k == "Alpha").count(), 1);
}

#[tokio::test]
async fn test_rerun_is_idempotent() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let store = store_in(&dir);
    let titles = ["Alpha", "Beta", "Gamma"];

    let first = HarvestOrchestrator::new(
        Arc::new(scripted_harvest(&titles)),
        store.clone(),
        &section(4),
    );
    first.run().await.expect("first run succeeds");
    let after_first = std::fs::read_to_string(store.path()).expect("read store");

    let second = HarvestOrchestrator::new(
        Arc::new(scripted_harvest(&titles)),
        store.clone(),
        &section(4),
    );
    let summary = second.run().await.expect("second run succeeds");

    assert_eq!(summary.enumerated, 0);
    assert_eq!(summary.skipped, 3);
    assert_eq!(summary.persisted, 0);
    assert!(summary.records.is_empty());

    // Same final store contents as running once
    let after_second = std::fs::read_to_string(store.path()).expect("read store");
    assert_eq!(after_first, after_second);
}

#[tokio::test]
async fn test_detail_failure_degrades_to_empty_abstract() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let store = store_in(&dir);

    let fetcher = Arc::new(scripted_harvest(&["Alpha", "Beta", "Gamma"]).failing(detail_url("Beta")));
    let orchestrator = HarvestOrchestrator::new(fetcher, store.clone(), &section(4));
    let summary = orchestrator.run().await.expect("harvest succeeds");

    assert_eq!(summary.enrichment_failed, 1);
    assert_eq!(summary.persisted, 3);

    let rows = read_rows(&store);
    assert_eq!(rows.len(), 3);
    let beta = rows
        .iter()
        .find(|r| r.title == "Beta")
        .expect("Beta persisted despite fetch failure");
    assert!(beta.abstract_text.is_empty());
    // Siblings are unaffected
    let gamma = rows.iter().find(|r| r.title == "Gamma").expect("Gamma row");
    assert_eq!(gamma.abstract_text, "Abstract of Gamma");
}

#[tokio::test]
async fn test_summary_order_survives_reversed_completion() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let store = store_in(&dir);

    // First listed entry finishes last, last finishes first
    let fetcher = Arc::new(
        scripted_harvest(&["Alpha", "Beta", "Gamma"])
            .delay_ms(detail_url("Alpha"), 60)
            .delay_ms(detail_url("Beta"), 30)
            .delay_ms(detail_url("Gamma"), 0),
    );
    let orchestrator = HarvestOrchestrator::new(fetcher, store.clone(), &section(3));
    let summary = orchestrator.run().await.expect("harvest succeeds");

    let titles: Vec<&str> = summary.records.iter().map(|r| r.title.as_str()).collect();
    assert_eq!(titles, vec!["Alpha", "Beta", "Gamma"]);

    // On-disk order is completion order, not listing order
    let disk_titles: Vec<String> = read_rows(&store).into_iter().map(|r| r.title).collect();
    assert_eq!(disk_titles, vec!["Gamma", "Beta", "Alpha"]);
}

#[tokio::test]
async fn test_listing_fetch_failure_is_fatal() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let store = store_in(&dir);

    // No listing page scripted at all
    let fetcher = Arc::new(ScriptedFetcher::new());
    let orchestrator = HarvestOrchestrator::new(fetcher, store, &section(4));

    let result = orchestrator.run().await;
    assert!(matches!(result, Err(HarvestError::ListingFetch { .. })));
}

#[tokio::test]
async fn test_unreadable_store_is_fatal() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let path = dir.path().join("papers.csv");
    std::fs::write(&path, "title,authors\n\"unterminated").expect("write malformed store");

    let fetcher = Arc::new(scripted_harvest(&["Alpha"]));
    let orchestrator = HarvestOrchestrator::new(fetcher, RecordStore::new(&path), &section(4));

    let result = orchestrator.run().await;
    assert!(matches!(result, Err(HarvestError::Store(_))));
}

#[tokio::test]
async fn test_entry_without_locator_persists_without_fetching() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let store = store_in(&dir);

    // Title anchor without an href: no locator, so no detail fetch happens
    let listing = format!(
        "{}\n<dt class=\"ptitle\"><a>Unlinked Paper</a></dt>",
        listing_html(&["Alpha"]),
    );
    let fetcher = Arc::new(
        ScriptedFetcher::new()
            .page(common::LISTING_URL, listing)
            .page(
                detail_url("Alpha"),
                common::detail_html("Abstract of Alpha"),
            ),
    );

    let orchestrator = HarvestOrchestrator::new(fetcher, store.clone(), &section(4));
    let summary = orchestrator.run().await.expect("harvest succeeds");

    // A 404 on a fetch would have counted as an enrichment failure
    assert_eq!(summary.enrichment_failed, 0);
    assert_eq!(summary.persisted, 2);

    let rows = read_rows(&store);
    let unlinked = rows
        .iter()
        .find(|r| r.title == "Unlinked Paper")
        .expect("unlinked entry persisted");
    assert!(unlinked.abstract_text.is_empty());
    assert!(unlinked.paper_url.is_empty());
}

#[tokio::test]
async fn test_malformed_fragment_is_counted_not_fatal() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let store = store_in(&dir);

    let listing = format!(
        "<dt class=\"ptitle\"><span>broken fragment</span></dt>\n{}",
        listing_html(&["Alpha"]),
    );
    let fetcher = Arc::new(
        ScriptedFetcher::new()
            .page(common::LISTING_URL, listing)
            .page(
                detail_url("Alpha"),
                common::detail_html("Abstract of Alpha"),
            ),
    );

    let orchestrator = HarvestOrchestrator::new(fetcher, store.clone(), &section(4));
    let summary = orchestrator.run().await.expect("harvest succeeds");

    assert_eq!(summary.listed, 2);
    assert_eq!(summary.parse_dropped, 1);
    assert_eq!(summary.persisted, 1);
    assert_eq!(read_rows(&store).len(), 1);
}
