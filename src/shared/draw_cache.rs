use crate::model::lottery::{DrawError, DrawInfo};
use crate::shared::lotto_api::DrawInfoProvider;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

#[derive(Clone, Debug)]
struct CachedDraw {
    draw: DrawInfo,
    fetched_at: Instant,
}

/// Holds the most recently published draw. Entries older than `ttl` are
/// refetched on the next read, and failed fetches are never stored.
pub struct LatestDrawCache {
    provider: Arc<dyn DrawInfoProvider>,
    ttl: Duration,
    entry: RwLock<Option<CachedDraw>>,
}

impl LatestDrawCache {
    pub fn new(provider: Arc<dyn DrawInfoProvider>, ttl: Duration) -> Self {
        LatestDrawCache {
            provider,
            ttl,
            entry: RwLock::new(None),
        }
    }

    pub async fn latest_draw(&self) -> Result<DrawInfo, DrawError> {
        if let Some(cached) = self.entry.read().await.as_ref() {
            if cached.fetched_at.elapsed() < self.ttl {
                return Ok(cached.draw.clone());
            }
        }

        let latest_draw_no = self
            .provider
            .fetch_latest_draw_no()
            .await?
            .ok_or(DrawError::NoLatestDraw)?;
        let draw = self
            .provider
            .fetch_draw(latest_draw_no)
            .await?
            .ok_or(DrawError::DrawNotFound(latest_draw_no))?;

        tracing::info!("Cached latest draw {}.", draw.draw_no);
        *self.entry.write().await = Some(CachedDraw {
            draw: draw.clone(),
            fetched_at: Instant::now(),
        });
        Ok(draw)
    }

    /// Latest published draw number, or `None` when the provider cannot be
    /// reached or knows no draw at all.
    pub async fn latest_draw_no(&self) -> Option<u32> {
        match self.latest_draw().await {
            Ok(draw) => Some(draw.draw_no),
            Err(e) => {
                tracing::warn!("Failed to resolve the latest draw number: {}", e);
                None
            }
        }
    }

    pub async fn draw(&self, draw_no: u32) -> Result<DrawInfo, DrawError> {
        if let Some(cached) = self.entry.read().await.as_ref() {
            if cached.draw.draw_no == draw_no {
                return Ok(cached.draw.clone());
            }
        }

        self.provider
            .fetch_draw(draw_no)
            .await?
            .ok_or(DrawError::DrawNotFound(draw_no))
    }

    pub async fn invalidate(&self) {
        *self.entry.write().await = None;
    }
}
