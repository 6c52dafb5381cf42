use crate::model::lottery::{DrawError, DrawInfo, DrawPayload};
use crate::shared::draw_calendar::estimate_latest_draw_no;
use crate::shared::HTTP_CLIENT;
use async_trait::async_trait;
use time::OffsetDateTime;

/// How many draws below the calendar estimate are probed before giving up.
const MAX_LATEST_DRAW_PROBES: u32 = 8;

/// Source of official draw results.
#[async_trait]
pub trait DrawInfoProvider: Send + Sync {
    async fn fetch_latest_draw_no(&self) -> Result<Option<u32>, DrawError>;

    async fn fetch_draw(&self, draw_no: u32) -> Result<Option<DrawInfo>, DrawError>;
}

pub struct DhLotteryClient {
    api_url: String,
}

impl DhLotteryClient {
    pub fn new<S: Into<String>>(api_url: S) -> Self {
        DhLotteryClient {
            api_url: api_url.into(),
        }
    }

    async fn fetch_payload(&self, draw_no: u32) -> Result<DrawPayload, DrawError> {
        let payload = HTTP_CLIENT
            .get(format!("{}{}", &self.api_url, draw_no))
            .send()
            .await?
            .error_for_status()?
            .json::<DrawPayload>()
            .await?;
        Ok(payload)
    }
}

#[async_trait]
impl DrawInfoProvider for DhLotteryClient {
    async fn fetch_latest_draw_no(&self) -> Result<Option<u32>, DrawError> {
        let today = OffsetDateTime::now_utc().date();
        let mut candidate = estimate_latest_draw_no(today);
        let mut probes = 0;

        while candidate > 0 && probes < MAX_LATEST_DRAW_PROBES {
            if self.fetch_payload(candidate).await?.is_success() {
                return Ok(Some(candidate));
            }
            tracing::debug!("Draw {} has not been published yet.", candidate);
            candidate -= 1;
            probes += 1;
        }

        Ok(None)
    }

    async fn fetch_draw(&self, draw_no: u32) -> Result<Option<DrawInfo>, DrawError> {
        let payload = self.fetch_payload(draw_no).await?;
        Ok(payload.into_draw_info())
    }
}
