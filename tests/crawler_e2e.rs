//! End-to-end crawl tests against a mock gateway.

use std::time::Duration;

use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use scifetch_core::{Crawler, FetchConfig, UrlCache, parse_ref_list};

/// A config pointed at the mock server: plain http, no politeness delay.
fn config_for(server: &MockServer) -> FetchConfig {
    FetchConfig {
        gateway_host: server.address().to_string(),
        use_https: false,
        host_interval: Duration::ZERO,
        ..FetchConfig::default()
    }
}

fn landing_html(file_url: &str, title: &str) -> String {
    format!(
        "<html><body>\
         <div id=\"buttons\"><button onclick=\"location.href='{file_url}'\">save</button></div>\
         <div id=\"citation\"><i>{title}</i>. Journal, 2024.</div>\
         </body></html>"
    )
}

async fn mount_robots(server: &MockServer, body: &str) {
    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_full_run_downloads_pdf_and_records_cache() {
    let server = MockServer::start().await;
    mount_robots(&server, "User-agent: *\nDisallow: /private/\n").await;

    let file_url = format!("{}/dl/file.pdf", server.uri());
    Mock::given(method("GET"))
        .and(path("/10.1234/abc"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string(landing_html(&file_url, "Example Title")),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/dl/file.pdf"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"%PDF-1.4 payload".to_vec()))
        .expect(1)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let out = dir.path().join("papers");
    let mut cache = UrlCache::load(dir.path().join("cache.json"));
    let refs = parse_ref_list("10.1234/abc Q2\n");

    let config = config_for(&server);
    let landing_url = config.landing_url("10.1234/abc");
    let crawler = Crawler::new(config).unwrap();
    let stats = crawler.run(&refs, &out, &mut cache).await.unwrap();

    assert_eq!(stats.attempted, 1);
    assert_eq!(stats.succeeded, 1);
    assert_eq!(stats.blocked, 0);
    assert_eq!(stats.failed, 0);

    let saved = out.join("Q2").join("Example_Title.pdf");
    assert_eq!(std::fs::read(&saved).unwrap(), b"%PDF-1.4 payload");

    // The resolved file URL is recorded under the landing URL, and survives
    // a reload from disk.
    assert_eq!(cache.lookup(&landing_url), Some(file_url.as_str()));
    let reloaded = UrlCache::load(cache.path());
    assert_eq!(reloaded.lookup(&landing_url), Some(file_url.as_str()));
}

#[tokio::test]
async fn test_robots_disallow_blocks_without_fetching_landing() {
    let server = MockServer::start().await;
    mount_robots(&server, "User-agent: *\nDisallow: /\n").await;

    Mock::given(method("GET"))
        .and(path("/10.1234/abc"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let mut cache = UrlCache::load(dir.path().join("cache.json"));
    let refs = parse_ref_list("10.1234/abc Q1\n");

    let crawler = Crawler::new(config_for(&server)).unwrap();
    let stats = crawler
        .run(&refs, &dir.path().join("papers"), &mut cache)
        .await
        .unwrap();

    assert_eq!(stats.blocked, 1);
    assert_eq!(stats.succeeded, 0);
    assert_eq!(stats.failed, 0);
    assert!(cache.is_empty());
}

#[tokio::test]
async fn test_cache_hit_skips_all_network_traffic_for_identifier() {
    let server = MockServer::start().await;
    mount_robots(&server, "").await;

    Mock::given(method("GET"))
        .and(path("/10.1234/abc"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let mut cache = UrlCache::load(dir.path().join("cache.json"));

    let config = config_for(&server);
    let landing_url = config.landing_url("10.1234/abc");
    cache
        .store(&landing_url, "https://mirror.example/dl/file.pdf")
        .unwrap();

    let refs = parse_ref_list("10.1234/abc Q3\n");
    let crawler = Crawler::new(config).unwrap();
    let stats = crawler
        .run(&refs, &dir.path().join("papers"), &mut cache)
        .await
        .unwrap();

    // Cached identifiers count as successes
    assert_eq!(stats.succeeded, 1);
    assert_eq!(stats.failed, 0);
}

#[tokio::test]
async fn test_unloadable_robots_blocks_unless_overridden() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/10.1234/abc"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let mut cache = UrlCache::load(dir.path().join("cache.json"));
    let refs = parse_ref_list("10.1234/abc Q1\n");

    let crawler = Crawler::new(config_for(&server)).unwrap();
    let stats = crawler
        .run(&refs, &dir.path().join("papers"), &mut cache)
        .await
        .unwrap();

    assert_eq!(stats.blocked, 1);
    assert_eq!(stats.succeeded, 0);
}

#[tokio::test]
async fn test_ignore_robots_skips_policy_entirely() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&server)
        .await;

    let file_url = format!("{}/dl/file.pdf", server.uri());
    Mock::given(method("GET"))
        .and(path("/10.1234/abc"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string(landing_html(&file_url, "Another Title")),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/dl/file.pdf"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"%PDF-1.4".to_vec()))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let mut cache = UrlCache::load(dir.path().join("cache.json"));
    let refs = parse_ref_list("10.1234/abc Q4\n");

    let config = FetchConfig {
        ignore_robots: true,
        ..config_for(&server)
    };
    let crawler = Crawler::new(config).unwrap();
    let stats = crawler
        .run(&refs, &dir.path().join("papers"), &mut cache)
        .await
        .unwrap();

    assert_eq!(stats.succeeded, 1);
    assert!(dir
        .path()
        .join("papers")
        .join("Q4")
        .join("Another_Title.pdf")
        .exists());
}

#[tokio::test]
async fn test_failed_cache_write_still_counts_success() {
    let server = MockServer::start().await;
    mount_robots(&server, "").await;

    let file_url = format!("{}/dl/file.pdf", server.uri());
    Mock::given(method("GET"))
        .and(path("/10.1234/abc"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string(landing_html(&file_url, "Example Title")),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/dl/file.pdf"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"%PDF-1.4".to_vec()))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let cache_dir = dir.path().join("cache-dir");
    std::fs::create_dir(&cache_dir).unwrap();
    let mut cache = UrlCache::load(cache_dir.join("cache.json"));
    // Every persist from here on fails: the backing file's directory is gone
    std::fs::remove_dir_all(&cache_dir).unwrap();

    let refs = parse_ref_list("10.1234/abc Q1\n");
    let config = config_for(&server);
    let landing_url = config.landing_url("10.1234/abc");
    let crawler = Crawler::new(config).unwrap();
    let stats = crawler
        .run(&refs, &dir.path().join("papers"), &mut cache)
        .await
        .unwrap();

    assert_eq!(stats.succeeded, 1);
    assert_eq!(stats.failed, 0);
    assert!(dir
        .path()
        .join("papers")
        .join("Q1")
        .join("Example_Title.pdf")
        .exists());
    // The entry is kept in memory even though the disk write failed
    assert_eq!(cache.lookup(&landing_url), Some(file_url.as_str()));
    assert!(!cache_dir.join("cache.json").exists());
}

#[tokio::test]
async fn test_pdf_download_follows_landing_fetch_without_politeness_stall() {
    let server = MockServer::start().await;
    mount_robots(&server, "").await;

    let file_url = format!("{}/dl/file.pdf", server.uri());
    Mock::given(method("GET"))
        .and(path("/10.1234/abc"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string(landing_html(&file_url, "Example Title")),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/dl/file.pdf"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"%PDF-1.4".to_vec()))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let mut cache = UrlCache::load(dir.path().join("cache.json"));
    let refs = parse_ref_list("10.1234/abc Q1\n");

    // Landing page and file share a host; the wait is taken once, before the
    // landing fetch (a first request, so it does not block), and the file
    // download must not wait out another interval.
    let config = FetchConfig {
        host_interval: Duration::from_secs(3),
        ..config_for(&server)
    };
    let crawler = Crawler::new(config).unwrap();
    let start = std::time::Instant::now();
    let stats = crawler
        .run(&refs, &dir.path().join("papers"), &mut cache)
        .await
        .unwrap();

    assert_eq!(stats.succeeded, 1);
    assert!(
        start.elapsed() < Duration::from_secs(3),
        "run stalled for a politeness interval: {:?}",
        start.elapsed()
    );
}

#[tokio::test]
async fn test_not_indexed_landing_counts_as_failed() {
    let server = MockServer::start().await;
    mount_robots(&server, "").await;

    Mock::given(method("GET"))
        .and(path("/10.9999/missing"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("<html><body><p>article not found</p></body></html>"),
        )
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let mut cache = UrlCache::load(dir.path().join("cache.json"));
    let refs = parse_ref_list("10.9999/missing Q1\n");

    let crawler = Crawler::new(config_for(&server)).unwrap();
    let stats = crawler
        .run(&refs, &dir.path().join("papers"), &mut cache)
        .await
        .unwrap();

    assert_eq!(stats.failed, 1);
    assert_eq!(stats.succeeded, 0);
    assert!(cache.is_empty());
}

#[tokio::test]
async fn test_mixed_run_processes_in_order_and_tallies_each_bucket() {
    let server = MockServer::start().await;
    mount_robots(&server, "User-agent: *\nDisallow: /10.3/\n").await;

    let file_url = format!("{}/dl/good.pdf", server.uri());
    Mock::given(method("GET"))
        .and(path("/10.1/good"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string(landing_html(&file_url, "Good Paper")),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/dl/good.pdf"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"%PDF-1.4".to_vec()))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/10.2/gone"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let mut cache = UrlCache::load(dir.path().join("cache.json"));
    let refs = parse_ref_list("10.1/good Q1\n10.2/gone Q2\n10.3/blocked Q3\n");

    let crawler = Crawler::new(config_for(&server)).unwrap();
    let stats = crawler
        .run(&refs, &dir.path().join("papers"), &mut cache)
        .await
        .unwrap();

    assert_eq!(stats.attempted, 3);
    assert_eq!(stats.succeeded, 1);
    assert_eq!(stats.failed, 1);
    assert_eq!(stats.blocked, 1);
    assert_eq!(cache.len(), 1);
}
