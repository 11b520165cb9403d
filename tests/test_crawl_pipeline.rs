use mockito::{Matcher, Mock, Server, ServerGuard};
use recipe_indexer::{crawl_and_index, IndexerConfig, LinkOutcome};
use serde_json::json;

const DETAIL: &str = include_str!("fixtures/salad_detail.html");
const LISTING: &str = include_str!("fixtures/salad_listing.html");

const SEARCH_HITS: &str = r#"{
    "took": 2,
    "timed_out": false,
    "hits": {
        "total": 1,
        "max_score": 1.0,
        "hits": [
            {"_index": "recipes", "_type": "salads", "_id": "k2Jx", "_score": 1.0, "_source": {"title": "Strawberry Spinach Salad I"}}
        ]
    }
}"#;

fn config_for(site: &ServerGuard, backend: &ServerGuard) -> IndexerConfig {
    let mut config = IndexerConfig::default();
    config.crawl.listing_url = format!("{}/recipes/96/salad/", site.url());
    config.crawl.pace_ms = 0;
    config.backend.url = backend.url();
    config
}

async fn serve_site(site: &mut ServerGuard) -> Vec<Mock> {
    vec![
        site.mock("GET", "/recipes/96/salad/")
            .with_status(200)
            .with_header("content-type", "text/html")
            .with_body(LISTING)
            .create_async()
            .await,
        site.mock("GET", "/recipe/14276/strawberry-spinach-salad-i/")
            .match_header("pragma", "no-cache")
            .with_status(200)
            .with_header("content-type", "text/html")
            .with_body(DETAIL)
            .expect(1)
            .create_async()
            .await,
        site.mock("GET", "/recipe/14469/jamies-cranberry-spinach-salad/")
            .with_status(404)
            .with_body("<html><body>Not Found</body></html>")
            .expect(1)
            .create_async()
            .await,
    ]
}

async fn probe(backend: &mut ServerGuard, hits: usize) -> Mock {
    backend
        .mock("GET", "/")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"cluster_name": "elasticsearch", "version": {"number": "6.8.23"}}"#)
        .expect(hits)
        .create_async()
        .await
}

async fn search(backend: &mut ServerGuard) -> Mock {
    backend
        .mock("POST", "/recipes/_search")
        .match_body(Matcher::PartialJson(json!({
            "query": {"range": {"calories": {"gte": 20}}}
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(SEARCH_HITS)
        .expect(1)
        .create_async()
        .await
}

#[tokio::test]
async fn test_missing_detail_page_is_soft_failure() {
    let mut site = Server::new_async().await;
    let mut backend = Server::new_async().await;
    let site_mocks = serve_site(&mut site).await;

    let ping = probe(&mut backend, 2).await;
    let _head = backend
        .mock("HEAD", "/recipes")
        .with_status(404)
        .create_async()
        .await;
    let create = backend
        .mock("PUT", "/recipes")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"acknowledged": true}"#)
        .expect(1)
        .create_async()
        .await;
    let store = backend
        .mock("POST", "/recipes/salads")
        .match_body(Matcher::PartialJson(json!({
            "title": "Strawberry Spinach Salad I",
            "submitter": "Jamie Hensley",
            "calories": 320
        })))
        .with_status(201)
        .with_header("content-type", "application/json")
        .with_body(r#"{"_id": "k2Jx", "result": "created"}"#)
        .expect(1)
        .create_async()
        .await;
    let search = search(&mut backend).await;

    let report = crawl_and_index(config_for(&site, &backend)).await.unwrap();

    assert_eq!(report.links, 2);
    assert_eq!(report.stored, 1);
    assert_eq!(report.failures, 1);
    assert!(report.index_created);

    let outcomes: Vec<_> = report.outcomes.iter().map(|o| &o.outcome).collect();
    assert_eq!(
        outcomes,
        vec![
            &LinkOutcome::Stored {
                id: "k2Jx".to_string()
            },
            &LinkOutcome::Unavailable { status: 404 },
        ]
    );
    assert_eq!(
        report.outcomes[0].url,
        format!("{}/recipe/14276/strawberry-spinach-salad-i/", site.url())
    );
    assert_eq!(
        report.outcomes[1].url,
        format!("{}/recipe/14469/jamies-cranberry-spinach-salad/", site.url())
    );

    let payload = report.search.expect("query should run");
    assert_eq!(
        payload["hits"]["hits"][0]["_source"]["title"],
        "Strawberry Spinach Salad I"
    );

    for mock in &site_mocks {
        mock.assert_async().await;
    }
    ping.assert_async().await;
    create.assert_async().await;
    store.assert_async().await;
    search.assert_async().await;
}

#[tokio::test]
async fn test_unavailable_page_stored_as_defaults_when_enabled() {
    let mut site = Server::new_async().await;
    let mut backend = Server::new_async().await;
    let _site_mocks = serve_site(&mut site).await;

    let _ping = probe(&mut backend, 2).await;
    let _head = backend
        .mock("HEAD", "/recipes")
        .with_status(200)
        .create_async()
        .await;
    let full = backend
        .mock("POST", "/recipes/salads")
        .match_body(Matcher::PartialJson(json!({"title": "Strawberry Spinach Salad I"})))
        .with_status(201)
        .with_body(r#"{"_id": "a1", "result": "created"}"#)
        .expect(1)
        .create_async()
        .await;
    let defaults = backend
        .mock("POST", "/recipes/salads")
        .match_body(Matcher::Json(json!({
            "title": "-",
            "submitter": "-",
            "description": "-",
            "calories": 0,
            "ingredients": []
        })))
        .with_status(201)
        .with_body(r#"{"_id": "a2", "result": "created"}"#)
        .expect(1)
        .create_async()
        .await;
    let _search = search(&mut backend).await;

    let mut config = config_for(&site, &backend);
    config.crawl.store_unavailable_pages = true;
    let report = crawl_and_index(config).await.unwrap();

    assert_eq!(report.stored, 2);
    assert_eq!(report.failures, 0);
    assert!(!report.index_created);
    assert_eq!(
        report.outcomes[1].outcome,
        LinkOutcome::Stored {
            id: "a2".to_string()
        }
    );
    full.assert_async().await;
    defaults.assert_async().await;
}

#[tokio::test]
async fn test_listing_failure_still_queries() {
    let mut site = Server::new_async().await;
    let mut backend = Server::new_async().await;

    let _listing = site
        .mock("GET", "/recipes/96/salad/")
        .with_status(503)
        .create_async()
        .await;

    // Only the final query connects; nothing is created or stored.
    let ping = probe(&mut backend, 1).await;
    let head = backend
        .mock("HEAD", "/recipes")
        .expect(0)
        .create_async()
        .await;
    let search = search(&mut backend).await;

    let report = crawl_and_index(config_for(&site, &backend)).await.unwrap();

    assert_eq!(report.links, 0);
    assert_eq!(report.stored, 0);
    assert!(report.outcomes.is_empty());
    assert!(report.search.is_some());
    ping.assert_async().await;
    head.assert_async().await;
    search.assert_async().await;
}

#[tokio::test]
async fn test_backend_down_skips_indexing() {
    let mut site = Server::new_async().await;
    let mut backend = Server::new_async().await;
    let _site_mocks = serve_site(&mut site).await;

    let _ping = backend
        .mock("GET", "/")
        .with_status(503)
        .create_async()
        .await;
    let store = backend
        .mock("POST", "/recipes/salads")
        .expect(0)
        .create_async()
        .await;

    let report = crawl_and_index(config_for(&site, &backend)).await.unwrap();

    assert_eq!(report.links, 2);
    assert_eq!(report.stored, 0);
    assert_eq!(report.failures, 2);
    assert_eq!(report.outcomes[0].outcome, LinkOutcome::NoBackend);
    assert_eq!(
        report.outcomes[1].outcome,
        LinkOutcome::Unavailable { status: 404 }
    );
    assert!(report.search.is_none());
    store.assert_async().await;
}
