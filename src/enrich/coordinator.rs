use futures::stream::{self, StreamExt};

use crate::config::EnrichConfig;
use crate::enrich::Fetcher;

pub async fn enrich_all<S>(fetcher: &Fetcher, handles: &[S], config: &EnrichConfig) -> Vec<Option<u32>>
where
    S: AsRef<str> + Sync,
{
    let total = handles.len();
    let mut results: Vec<Option<u32>> = vec![None; total];
    if total == 0 {
        return results;
    }

    let workers = config.worker_count();
    tracing::info!(handles = total, workers, "Starting solved count enrichment");

    let mut pending = stream::iter(handles.iter().enumerate())
        .map(|(index, handle)| async move { (index, fetcher.fetch(handle.as_ref()).await) })
        .buffer_unordered(workers);

    let mut completed = 0usize;
    let collect = async {
        while let Some((index, count)) = pending.next().await {
            results[index] = count;
            completed += 1;
        }
    };

    match config.deadline {
        Some(deadline) => {
            let timed_out = tokio::time::timeout(deadline, collect).await.is_err();
            if timed_out {
                tracing::warn!(
                    deadline = ?deadline,
                    completed,
                    abandoned = total - completed,
                    "Enrichment deadline reached, leaving unresolved handles absent"
                );
            }
        }
        None => collect.await,
    }

    let resolved = results.iter().filter(|slot| slot.is_some()).count();
    tracing::info!(
        handles = total,
        resolved,
        absent = total - resolved,
        "Finished solved count enrichment"
    );

    results
}
