//! End-to-end pipeline test: rule → schedule → orchestrated fetch →
//! artifacts, exercised through the public API with a mock provider and
//! a stub assembler.

use std::sync::Arc;
use std::time::Duration;

use axum::routing::get;
use axum::Router;
use chrono::{Datelike, FixedOffset, TimeZone, Weekday};
use tempfile::TempDir;
use tokio::sync::{broadcast, mpsc};

use airshift_core::testing::{MockProvider, StubAssembler};
use airshift_core::{
    next_schedules, BulkDownloader, DownloaderConfig, FetchOrchestrator, FetchRequest,
    FetcherConfig, Rule, StationId,
};

fn jst() -> FixedOffset {
    FixedOffset::east_opt(9 * 3600).unwrap()
}

/// The reference scenario: station LFR, Tuesday 01:00, two hours,
/// archive available six hours after broadcast start.
fn lfr_rule() -> Rule {
    Rule {
        name: "late night".to_string(),
        station_id: StationId::from("LFR"),
        weekday: Weekday::Tue,
        start_hour: 1,
        start_minute: 0,
        duration: chrono::Duration::hours(2),
        fetch_offset: chrono::Duration::hours(6),
    }
}

async fn serve_chunks() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let router = Router::new().route(
        "/chunks/{name}",
        get(|axum::extract::Path(name): axum::extract::Path<String>| async move {
            format!("[{name}]")
        }),
    );
    tokio::spawn(async move {
        let _ = axum::serve(listener, router).await;
    });
    format!("http://{addr}")
}

#[tokio::test]
async fn rule_evaluates_to_next_tuesday_with_offset_fetch_time() {
    // Sunday 2023-10-01 12:00 JST: the next Tuesday 01:00 is 2023-10-03.
    let now = jst().with_ymd_and_hms(2023, 10, 1, 12, 0, 0).unwrap();
    let schedules = next_schedules(&lfr_rule(), 1, now);

    assert_eq!(schedules.len(), 1);
    let schedule = &schedules[0];
    assert_eq!(schedule.start_time.weekday(), Weekday::Tue);
    assert_eq!(
        schedule.start_time,
        jst().with_ymd_and_hms(2023, 10, 3, 1, 0, 0).unwrap()
    );
    assert_eq!(
        schedule.fetch_time,
        jst().with_ymd_and_hms(2023, 10, 3, 7, 0, 0).unwrap()
    );
}

#[tokio::test]
async fn schedule_through_orchestrator_yields_sidecar_and_media() {
    let base_url = serve_chunks().await;
    let out = TempDir::new().unwrap();
    let work = TempDir::new().unwrap();

    let chunk_urls: Vec<String> = (1..=3)
        .map(|i| format!("{base_url}/chunks/chunk_{i:04}.aac"))
        .collect();

    let orchestrator = Arc::new(FetchOrchestrator::new(
        FetcherConfig {
            out_dir: out.path().to_path_buf(),
            work_dir: work.path().to_path_buf(),
            job_timeout_secs: 30,
            media_extension: "aac".to_string(),
        },
        Arc::new(MockProvider::new(chunk_urls)),
        Arc::new(StubAssembler::new()),
        BulkDownloader::new(DownloaderConfig::default()),
    ));

    let now = jst().with_ymd_and_hms(2023, 10, 1, 12, 0, 0).unwrap();
    let schedule = next_schedules(&lfr_rule(), 1, now).remove(0);

    let (shutdown_tx, _) = broadcast::channel(1);
    let (request_tx, request_rx) = mpsc::channel(1);
    let handle = orchestrator.spawn(request_rx, shutdown_tx.subscribe());

    let (request, done) = FetchRequest::with_completion(schedule);
    request_tx.send(request).await.unwrap();
    drop(request_tx);

    tokio::time::timeout(Duration::from_secs(10), done)
        .await
        .expect("job did not finish")
        .unwrap()
        .unwrap();
    handle.await.unwrap();

    // Artifacts named from (start time, station, title).
    let sidecar = out.path().join("20231003010000_LFR_Mock Program.json");
    let media = out.path().join("20231003010000_LFR_Mock Program.aac");
    assert!(sidecar.exists());
    assert!(media.exists());

    let joined = std::fs::read_to_string(&media).unwrap();
    assert_eq!(
        joined,
        "[chunk_0001.aac][chunk_0002.aac][chunk_0003.aac]"
    );

    // Scratch space is gone.
    assert!(std::fs::read_dir(work.path()).unwrap().next().is_none());
}
