use axum::routing::get;
use axum::{Json, Router};
use captioner_core::StorageConfig;
use captioner_pipeline::{
    run_batch, Pipeline, PipelineError, PipelineOutcome, ReportStatus, Stage,
};
use captioner_publish::FilePublisher;
use captioner_source::HttpTranscriptSource;
use std::sync::Arc;

async fn serve(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}/raw/upload")
}

fn transcript_router() -> Router {
    Router::new()
        .route(
            "/raw/upload/lecture.transcript",
            get(|| async {
                Json(serde_json::json!([
                    {"transcript": "Hi", "words": [{"start_time": 0, "end_time": 1}]},
                    {"transcript": "", "words": []},
                    {"transcript": "  There  ", "confidence": 0.87,
                     "words": [{"start_time": 1.5, "end_time": 1.9}, {"start_time": 2.0, "end_time": 2.25}]}
                ]))
            }),
        )
        .route(
            "/raw/upload/nullword.transcript",
            get(|| async { Json(serde_json::json!([{"transcript": "Bad", "words": [null]}])) }),
        )
        .route(
            "/raw/upload/broken.transcript",
            get(|| async {
                Json(serde_json::json!([
                    {"transcript": "Bad", "words": [{"start_time": "zero", "end_time": 1}]}
                ]))
            }),
        )
}

fn pipeline(base: &str, out: &std::path::Path) -> Arc<Pipeline> {
    let storage = StorageConfig {
        transcript_base_url: Some(base.to_string()),
        ..StorageConfig::default()
    };
    let source = HttpTranscriptSource::new(&storage).unwrap();
    Arc::new(Pipeline::new(Arc::new(source), Arc::new(FilePublisher::new(out))))
}

#[tokio::test]
async fn test_end_to_end_publishes_vtt_file() {
    let base = serve(transcript_router()).await;
    let out = tempfile::tempdir().unwrap();

    let outcome = pipeline(&base, out.path()).run("lecture").await.unwrap();
    match outcome {
        PipelineOutcome::Done {
            artifact,
            cues,
            skipped,
        } => {
            assert_eq!(artifact.artifact_id, "lecture_en.vtt");
            assert_eq!(cues, 2);
            assert_eq!(skipped, 1);
        }
        other => panic!("expected Done, got {other:?}"),
    }

    let vtt = std::fs::read_to_string(out.path().join("lecture_en.vtt")).unwrap();
    assert_eq!(
        vtt,
        "WEBVTT\n\n1\n00:00:00.000 --> 00:00:01.000\nHi\n\n2\n00:00:01.500 --> 00:00:02.250\nThere\n\n"
    );
}

#[tokio::test]
async fn test_not_ready_publishes_nothing() {
    let base = serve(transcript_router()).await;
    let out = tempfile::tempdir().unwrap();

    let outcome = pipeline(&base, out.path()).run("unprocessed").await.unwrap();
    assert_eq!(outcome, PipelineOutcome::NotReady { status: 404 });
    assert!(!out.path().join("unprocessed_en.vtt").exists());
}

#[tokio::test]
async fn test_malformed_transcript_publishes_nothing() {
    let base = serve(transcript_router()).await;
    let out = tempfile::tempdir().unwrap();

    let err = pipeline(&base, out.path()).run("broken").await.unwrap_err();
    assert!(matches!(err, PipelineError::Convert(_)));
    assert!(!out.path().join("broken_en.vtt").exists());
}

#[tokio::test]
async fn test_non_object_word_fails_at_conversion() {
    let base = serve(transcript_router()).await;
    let out = tempfile::tempdir().unwrap();

    let err = pipeline(&base, out.path()).run("nullword").await.unwrap_err();
    assert_eq!(err.stage(), Stage::Converting);
    assert!(matches!(err, PipelineError::Convert(_)));
    assert!(!out.path().join("nullword_en.vtt").exists());
}

#[tokio::test]
async fn test_rerun_overwrites_published_captions() {
    let base = serve(transcript_router()).await;
    let out = tempfile::tempdir().unwrap();
    std::fs::write(out.path().join("lecture_en.vtt"), "stale").unwrap();

    let p = pipeline(&base, out.path());
    p.run("lecture").await.unwrap();
    let first = std::fs::read_to_string(out.path().join("lecture_en.vtt")).unwrap();
    p.run("lecture").await.unwrap();
    let second = std::fs::read_to_string(out.path().join("lecture_en.vtt")).unwrap();

    assert!(first.starts_with("WEBVTT\n\n"));
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_batch_over_http() {
    let base = serve(transcript_router()).await;
    let out = tempfile::tempdir().unwrap();

    let reports = run_batch(
        pipeline(&base, out.path()),
        vec!["lecture".to_string(), "unprocessed".to_string(), "broken".to_string()],
        2,
    )
    .await;

    assert!(matches!(reports[0].status, ReportStatus::Done { cues: 2, skipped: 1, .. }));
    assert_eq!(reports[1].status, ReportStatus::NotReady { status: 404 });
    assert!(reports[2].is_failure());
}
