use crate::db::{create_schema, initialize_db};
use crate::model::app_state::{AppState, AuthSettings, CouponCodeSettings};
use crate::model::lottery::{DrawError, DrawInfo};
use crate::shared::credentials::StaticCredentials;
use crate::shared::draw_cache::LatestDrawCache;
use crate::shared::lotto_api::DrawInfoProvider;
use async_trait::async_trait;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

pub const TEST_JWT_SECRET: &str = "test-secret";
pub const TEST_ADMIN_USER: &str = "admin";
pub const TEST_ADMIN_PASSWORD: &str = "password";

/// Every connection to `sqlite::memory:` opens its own database, so the pool
/// is pinned to a single connection that is never recycled.
pub async fn memory_pool() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None::<Duration>)
        .max_lifetime(None::<Duration>)
        .connect("sqlite::memory:")
        .await
        .unwrap();
    create_schema(&pool).await.unwrap();
    pool
}

/// A pool over a fresh database file, for tests that need several connections.
pub async fn file_pool() -> (SqlitePool, PathBuf) {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    let path = std::env::temp_dir().join(format!(
        "lotto-coupon-{}-{}.db",
        std::process::id(),
        nanos
    ));
    let pool = initialize_db(&format!("sqlite://{}", path.display()))
        .await
        .unwrap();
    (pool, path)
}

pub async fn remove_file_pool(pool: SqlitePool, path: PathBuf) {
    pool.close().await;
    for suffix in ["", "-wal", "-shm"] {
        let mut file = path.clone().into_os_string();
        file.push(suffix);
        let _ = std::fs::remove_file(file);
    }
}

pub fn sample_draw(draw_no: u32) -> DrawInfo {
    DrawInfo {
        draw_no,
        draw_date: "2024-11-30".to_string(),
        draw_numbers: vec![6, 11, 17, 19, 40, 43],
        bonus_number: 28,
        prize_1st: 2_035_742_000,
        prize_1st_winners: 13,
    }
}

pub struct StubDrawProvider {
    latest: Option<u32>,
    unavailable: bool,
    latest_calls: AtomicUsize,
    draw_calls: AtomicUsize,
}

impl StubDrawProvider {
    pub fn with_latest(latest: u32) -> Self {
        Self::new(Some(latest), false)
    }

    pub fn empty() -> Self {
        Self::new(None, false)
    }

    pub fn unavailable() -> Self {
        Self::new(None, true)
    }

    fn new(latest: Option<u32>, unavailable: bool) -> Self {
        StubDrawProvider {
            latest,
            unavailable,
            latest_calls: AtomicUsize::new(0),
            draw_calls: AtomicUsize::new(0),
        }
    }

    pub fn latest_calls(&self) -> usize {
        self.latest_calls.load(Ordering::SeqCst)
    }

    pub fn draw_calls(&self) -> usize {
        self.draw_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DrawInfoProvider for StubDrawProvider {
    async fn fetch_latest_draw_no(&self) -> Result<Option<u32>, DrawError> {
        self.latest_calls.fetch_add(1, Ordering::SeqCst);
        if self.unavailable {
            return Err(DrawError::UpstreamUnavailable("connection refused".into()));
        }
        Ok(self.latest)
    }

    async fn fetch_draw(&self, draw_no: u32) -> Result<Option<DrawInfo>, DrawError> {
        self.draw_calls.fetch_add(1, Ordering::SeqCst);
        if self.unavailable {
            return Err(DrawError::UpstreamUnavailable("connection refused".into()));
        }
        match self.latest {
            Some(latest) if draw_no >= 1 && draw_no <= latest => Ok(Some(sample_draw(draw_no))),
            _ => Ok(None),
        }
    }
}

pub async fn test_state(provider: StubDrawProvider) -> AppState {
    test_state_with(Arc::new(provider)).await
}

/// Like [`test_state`], keeping a handle on the provider for call counting.
pub async fn test_state_with(provider: Arc<StubDrawProvider>) -> AppState {
    AppState {
        pool: memory_pool().await,
        draws: Arc::new(LatestDrawCache::new(provider, Duration::from_secs(3600))),
        coupon_codes: CouponCodeSettings {
            prefix: None,
            length: 12,
        },
        auth: AuthSettings {
            jwt_secret: TEST_JWT_SECRET.to_string(),
            token_lifetime_hours: 1,
            verifier: Arc::new(StaticCredentials::new(TEST_ADMIN_USER, TEST_ADMIN_PASSWORD)),
        },
    }
}
