use std::time::Duration;

use photo_carousel::events::{CarouselCommand, CarouselSnapshot, ImagesLoaded};
use photo_carousel::model::ImageItem;
use photo_carousel::tasks::carousel;
use tokio::sync::{mpsc, watch};
use tokio_util::sync::CancellationToken;

fn item(id: &str) -> ImageItem {
    ImageItem {
        id: id.to_owned(),
        image_url: format!("https://images.test/{id}"),
        alt_text: None,
        description: None,
        author_name: None,
    }
}

fn page(count: usize) -> Vec<ImageItem> {
    (0..count).map(|i| item(&format!("photo-{i}"))).collect()
}

struct Harness {
    loaded_tx: mpsc::Sender<ImagesLoaded>,
    command_tx: mpsc::Sender<CarouselCommand>,
    snapshots: watch::Receiver<CarouselSnapshot>,
    cancel: CancellationToken,
    handle: tokio::task::JoinHandle<anyhow::Result<()>>,
}

fn spawn_carousel(period: Duration) -> Harness {
    let (loaded_tx, loaded_rx) = mpsc::channel::<ImagesLoaded>(1);
    let (command_tx, command_rx) = mpsc::channel::<CarouselCommand>(16);
    let (snapshot_tx, snapshots) = watch::channel(CarouselSnapshot::default());
    let cancel = CancellationToken::new();

    let handle = tokio::spawn(carousel::run(
        loaded_rx,
        command_rx,
        snapshot_tx,
        period,
        cancel.clone(),
    ));

    Harness {
        loaded_tx,
        command_tx,
        snapshots,
        cancel,
        handle,
    }
}

async fn next_snapshot(rx: &mut watch::Receiver<CarouselSnapshot>) -> CarouselSnapshot {
    tokio::time::timeout(Duration::from_secs(2), rx.changed())
        .await
        .expect("timeout waiting for snapshot")
        .expect("carousel task dropped its publisher");
    rx.borrow_and_update().clone()
}

async fn wait_for_index(
    rx: &mut watch::Receiver<CarouselSnapshot>,
    want: usize,
) -> CarouselSnapshot {
    loop {
        let snapshot = next_snapshot(rx).await;
        if snapshot.current_index == Some(want) {
            return snapshot;
        }
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn timer_advances_and_toggle_pauses_then_resumes() {
    let mut h = spawn_carousel(Duration::from_millis(100));

    h.loaded_tx.send(ImagesLoaded(page(10))).await.unwrap();
    let loaded = wait_for_index(&mut h.snapshots, 0).await;
    assert_eq!(loaded.items.len(), 10);
    assert!(loaded.is_playing);

    // One interval elapses: 0 -> 1.
    wait_for_index(&mut h.snapshots, 1).await;

    h.command_tx.send(CarouselCommand::TogglePlay).await.unwrap();
    let paused = loop {
        let snapshot = next_snapshot(&mut h.snapshots).await;
        if !snapshot.is_playing {
            break snapshot;
        }
    };
    let frozen_at = paused.current_index.expect("items are loaded");

    // Several intervals pass; a paused carousel must not move.
    tokio::time::sleep(Duration::from_millis(300)).await;
    assert_eq!(h.snapshots.borrow().current_index, Some(frozen_at));
    assert!(!h.snapshots.borrow().is_playing);

    // Resume picks up from the same index, then advances again.
    h.command_tx.send(CarouselCommand::TogglePlay).await.unwrap();
    let resumed = loop {
        let snapshot = next_snapshot(&mut h.snapshots).await;
        if snapshot.is_playing {
            break snapshot;
        }
    };
    assert_eq!(resumed.current_index, Some(frozen_at));
    wait_for_index(&mut h.snapshots, (frozen_at + 1) % 10).await;

    h.cancel.cancel();
    let _ = h.handle.await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn empty_load_stays_blank_and_never_ticks() {
    let mut h = spawn_carousel(Duration::from_millis(50));

    h.loaded_tx.send(ImagesLoaded(Vec::new())).await.unwrap();
    let snapshot = loop {
        let snapshot = next_snapshot(&mut h.snapshots).await;
        if snapshot.items.is_empty() && snapshot.is_playing {
            break snapshot;
        }
    };
    assert_eq!(snapshot.current_index, None);

    // Play defaults to true, but with nothing to rotate no tick may fire.
    tokio::time::sleep(Duration::from_millis(300)).await;
    assert_eq!(h.snapshots.borrow().current_index, None);

    // Navigation on the empty list is a published no-op, not a fault.
    h.command_tx.send(CarouselCommand::Next).await.unwrap();
    let after_next = next_snapshot(&mut h.snapshots).await;
    assert_eq!(after_next.current_index, None);
    h.command_tx.send(CarouselCommand::Previous).await.unwrap();
    let after_prev = next_snapshot(&mut h.snapshots).await;
    assert_eq!(after_prev.current_index, None);

    h.cancel.cancel();
    let _ = h.handle.await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn manual_navigation_wraps_both_ways() {
    // Long period so the timer cannot interfere with manual steps.
    let mut h = spawn_carousel(Duration::from_secs(60));

    h.loaded_tx.send(ImagesLoaded(page(3))).await.unwrap();
    wait_for_index(&mut h.snapshots, 0).await;

    h.command_tx.send(CarouselCommand::Previous).await.unwrap();
    wait_for_index(&mut h.snapshots, 2).await;

    h.command_tx.send(CarouselCommand::Next).await.unwrap();
    wait_for_index(&mut h.snapshots, 0).await;

    h.cancel.cancel();
    let _ = h.handle.await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn shrinking_reload_clamps_the_cursor() {
    let mut h = spawn_carousel(Duration::from_secs(60));

    h.loaded_tx.send(ImagesLoaded(page(5))).await.unwrap();
    wait_for_index(&mut h.snapshots, 0).await;
    for _ in 0..4 {
        h.command_tx.send(CarouselCommand::Next).await.unwrap();
    }
    wait_for_index(&mut h.snapshots, 4).await;

    h.loaded_tx.send(ImagesLoaded(page(2))).await.unwrap();
    let reloaded = loop {
        let snapshot = next_snapshot(&mut h.snapshots).await;
        if snapshot.items.len() == 2 {
            break snapshot;
        }
    };
    assert_eq!(reloaded.current_index, Some(1));

    h.cancel.cancel();
    let _ = h.handle.await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn cancellation_releases_the_timer() {
    let mut h = spawn_carousel(Duration::from_millis(50));

    h.loaded_tx.send(ImagesLoaded(page(3))).await.unwrap();
    wait_for_index(&mut h.snapshots, 1).await;

    h.cancel.cancel();
    let _ = h.handle.await;

    // Torn down while playing: further intervals produce no advances.
    let at_teardown = h.snapshots.borrow().current_index;
    tokio::time::sleep(Duration::from_millis(300)).await;
    assert_eq!(h.snapshots.borrow().current_index, at_teardown);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn late_load_arms_the_timer_without_a_toggle() {
    let mut h = spawn_carousel(Duration::from_millis(50));

    // Nothing loaded yet; the carousel idles in its initial playing state.
    tokio::time::sleep(Duration::from_millis(150)).await;
    assert_eq!(h.snapshots.borrow().current_index, None);

    h.loaded_tx.send(ImagesLoaded(page(4))).await.unwrap();
    wait_for_index(&mut h.snapshots, 0).await;
    wait_for_index(&mut h.snapshots, 1).await;

    h.cancel.cancel();
    let _ = h.handle.await;
}
