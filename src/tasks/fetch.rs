use anyhow::{Context, Result, ensure};
use serde::Deserialize;
use tokio::select;
use tokio::sync::mpsc::Sender;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::config::Configuration;
use crate::events::ImagesLoaded;
use crate::model::ImageItem;

// Provider page entry; only the fields the carousel consumes. Anything
// outside this shape fails the whole page.
#[derive(Debug, Deserialize)]
struct ApiPhoto {
    id: String,
    urls: ApiUrls,
    #[serde(default)]
    alt_description: Option<String>,
    #[serde(default)]
    description: Option<String>,
    user: ApiUser,
}

#[derive(Debug, Deserialize)]
struct ApiUrls {
    regular: String,
}

#[derive(Debug, Deserialize)]
struct ApiUser {
    #[serde(default)]
    name: Option<String>,
}

fn parse_page(body: &str) -> Result<Vec<ImageItem>> {
    let page: Vec<ApiPhoto> = serde_json::from_str(body).context("decoding photo page")?;
    Ok(page
        .into_iter()
        .map(|photo| ImageItem {
            id: photo.id,
            image_url: photo.urls.regular,
            alt_text: photo.alt_description,
            description: photo.description,
            author_name: photo.user.name,
        })
        .collect())
}

async fn fetch_page(cfg: &Configuration, api_key: &str) -> Result<Vec<ImageItem>> {
    let client = reqwest::Client::builder()
        .user_agent(concat!("photo-carousel/", env!("CARGO_PKG_VERSION")))
        .build()
        .context("building http client")?;

    debug!(endpoint = %cfg.endpoint_url, per_page = cfg.page_size, "requesting photo page");
    let response = client
        .get(&cfg.endpoint_url)
        .query(&[
            ("client_id", api_key.to_owned()),
            ("per_page", cfg.page_size.to_string()),
        ])
        .send()
        .await
        .context("requesting photo page")?;

    ensure!(
        response.status().is_success(),
        "photo provider returned {}",
        response.status()
    );

    let body = response.text().await.context("reading photo page body")?;
    parse_page(&body)
}

/// One-shot loader: fetches a single page of photos and hands the mapped
/// list to the carousel. Every failure is downgraded to an empty delivery,
/// so the show simply stays blank; there is no retry.
pub async fn run(
    cfg: Configuration,
    api_key: Option<String>,
    to_carousel: Sender<ImagesLoaded>,
    cancel: CancellationToken,
) -> Result<()> {
    let items = match api_key {
        Some(key) => select! {
            _ = cancel.cancelled() => return Ok(()),
            fetched = fetch_page(&cfg, &key) => match fetched {
                Ok(items) => {
                    info!(count = items.len(), "photo page fetched");
                    items
                }
                Err(err) => {
                    warn!("photo fetch failed: {err:#}");
                    Vec::new()
                }
            },
        },
        None => {
            warn!("no API key configured; starting with an empty carousel");
            Vec::new()
        }
    };

    let _ = to_carousel.send(ImagesLoaded(items)).await;
    Ok(())
}
