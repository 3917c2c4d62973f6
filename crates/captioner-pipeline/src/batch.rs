use crate::pipeline::{Pipeline, ReportStatus, RunReport};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

/// Run one independent pipeline per media id, at most `concurrency` at a time.
///
/// Reports come back in the order of `media_ids`. A failing id does not stop
/// the others.
pub async fn run_batch(
    pipeline: Arc<Pipeline>,
    media_ids: Vec<String>,
    concurrency: usize,
) -> Vec<RunReport> {
    let permits = Arc::new(Semaphore::new(concurrency.max(1)));
    let mut tasks = JoinSet::new();

    for (position, media_id) in media_ids.iter().cloned().enumerate() {
        let pipeline = Arc::clone(&pipeline);
        let permits = Arc::clone(&permits);
        tasks.spawn(async move {
            // The semaphore is never closed, so acquiring only waits.
            let _permit = permits.acquire_owned().await;
            let result = pipeline.run(&media_id).await;
            (position, RunReport::new(media_id, result))
        });
    }

    let mut slots: Vec<Option<RunReport>> = vec![None; media_ids.len()];
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok((position, report)) => slots[position] = Some(report),
            Err(e) => tracing::error!("pipeline task aborted: {e}"),
        }
    }

    slots
        .into_iter()
        .zip(media_ids)
        .map(|(slot, media_id)| {
            slot.unwrap_or_else(|| RunReport {
                media_id,
                status: ReportStatus::Failed {
                    reason: "pipeline task aborted".to_string(),
                },
            })
        })
        .collect()
}
