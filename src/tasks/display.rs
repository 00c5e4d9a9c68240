use anyhow::Result;
use tokio::select;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::events::CarouselSnapshot;

/// Headless stand-in for a rendering layer: logs whatever the carousel
/// currently shows. A real front end would subscribe to the same watch
/// channel and drive the command channel from its controls.
pub async fn run(
    mut snapshots: watch::Receiver<CarouselSnapshot>,
    cancel: CancellationToken,
) -> Result<()> {
    loop {
        select! {
            _ = cancel.cancelled() => break,
            changed = snapshots.changed() => {
                if changed.is_err() {
                    // Publisher dropped; nothing further will arrive.
                    break;
                }
                let snapshot = snapshots.borrow_and_update().clone();
                show(&snapshot);
            }
        }
    }
    Ok(())
}

fn show(snapshot: &CarouselSnapshot) {
    let Some(photo) = snapshot.current() else {
        info!(playing = snapshot.is_playing, "no photos to display");
        return;
    };
    // current() is Some, so current_index is too.
    let position = snapshot.current_index.unwrap_or(0) + 1;
    info!(
        position,
        total = snapshot.items.len(),
        id = %photo.id,
        author = photo.author_name.as_deref().unwrap_or("unknown"),
        caption = photo.caption().unwrap_or("untitled"),
        playing = snapshot.is_playing,
        url = %photo.image_url,
        "showing photo"
    );
}
