//! Background persistence of queued click events.

use crate::domain::click_event::ClickEvent;
use crate::domain::entities::NewClick;
use crate::domain::repositories::ClickRepository;
use crate::error::AppError;
use crate::infrastructure::geo::GeoLookup;
use std::sync::Arc;
use tokio::sync::{Semaphore, mpsc};
use tokio_retry::RetryIf;
use tokio_retry::strategy::{ExponentialBackoff, jitter};
use tracing::{debug, warn};

const MAX_INSERT_ATTEMPTS: usize = 3;

/// Drains the click queue until every sender is dropped.
///
/// Up to `concurrency` events are processed at once. Each event is
/// geolocated (failures leave the location empty) and inserted with
/// exponential backoff on storage errors. Events that still fail are logged
/// and dropped. Returns once in-flight events have finished.
pub async fn run_click_worker(
    mut rx: mpsc::Receiver<ClickEvent>,
    clicks: Arc<dyn ClickRepository>,
    geo: Arc<dyn GeoLookup>,
    concurrency: usize,
) {
    let concurrency = concurrency.max(1);
    let permits = Arc::new(Semaphore::new(concurrency));

    while let Some(event) = rx.recv().await {
        let Ok(permit) = permits.clone().acquire_owned().await else {
            break;
        };
        let clicks = clicks.clone();
        let geo = geo.clone();

        tokio::spawn(async move {
            process_event(event, clicks.as_ref(), geo.as_ref()).await;
            drop(permit);
        });
    }

    // Wait for in-flight events.
    let _ = permits.acquire_many(concurrency as u32).await;
    debug!("Click worker stopped");
}

async fn process_event(event: ClickEvent, clicks: &dyn ClickRepository, geo: &dyn GeoLookup) {
    let location = match event.ip.as_deref() {
        Some(ip) => geo.lookup(ip).await.and_then(|info| info.display()),
        None => None,
    };

    let new_click = NewClick {
        short_url_id: event.short_url_id,
        click_time: event.clicked_at,
        ip: event.ip,
        user_agent: event.user_agent,
        referrer: event.referrer,
        location,
    };

    let strategy = ExponentialBackoff::from_millis(50)
        .map(jitter)
        .take(MAX_INSERT_ATTEMPTS - 1);

    let result = RetryIf::spawn(
        strategy,
        || clicks.insert(new_click.clone()),
        |e: &AppError| matches!(e, AppError::Internal { .. }),
    )
    .await;

    match result {
        Ok(click) => debug!(
            click_id = click.id,
            short_code = %event.short_code,
            "Click recorded"
        ),
        Err(e) => warn!(
            short_code = %event.short_code,
            error = %e,
            "Dropping click event after failed insert"
        ),
    }
}
