use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DrawError {
    #[error("Draw {0} could not be found.")]
    DrawNotFound(u32),
    #[error("The latest draw could not be found.")]
    NoLatestDraw,
    #[error("Failed to reach the lottery result service: {0}")]
    UpstreamUnavailable(String),
}

impl From<reqwest::Error> for DrawError {
    fn from(value: reqwest::Error) -> Self {
        DrawError::UpstreamUnavailable(value.to_string())
    }
}

/// Official result of a single weekly draw.
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq, Eq)]
pub struct DrawInfo {
    pub draw_no: u32,
    pub draw_date: String,
    pub draw_numbers: Vec<u8>,
    pub bonus_number: u8,
    pub prize_1st: u64,
    pub prize_1st_winners: u64,
}

/// Raw payload of the official result API. Only `returnValue` is present when
/// the requested draw has not happened yet.
#[derive(Deserialize, Serialize, Clone, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct DrawPayload {
    pub return_value: String,
    pub drw_no: Option<u32>,
    pub drw_no_date: Option<String>,
    pub drwt_no1: Option<u8>,
    pub drwt_no2: Option<u8>,
    pub drwt_no3: Option<u8>,
    pub drwt_no4: Option<u8>,
    pub drwt_no5: Option<u8>,
    pub drwt_no6: Option<u8>,
    pub bnus_no: Option<u8>,
    pub first_winamnt: Option<u64>,
    pub first_przwner_co: Option<u64>,
}

impl DrawPayload {
    pub fn is_success(&self) -> bool {
        self.return_value.as_str() == "success"
    }

    pub fn into_draw_info(self) -> Option<DrawInfo> {
        if !self.is_success() {
            return None;
        }

        let draw_numbers = [
            self.drwt_no1,
            self.drwt_no2,
            self.drwt_no3,
            self.drwt_no4,
            self.drwt_no5,
            self.drwt_no6,
        ]
        .into_iter()
        .collect::<Option<Vec<_>>>()?;

        Some(DrawInfo {
            draw_no: self.drw_no?,
            draw_date: self.drw_no_date?,
            draw_numbers,
            bonus_number: self.bnus_no?,
            prize_1st: self.first_winamnt.unwrap_or_default(),
            prize_1st_winners: self.first_przwner_co.unwrap_or_default(),
        })
    }
}

#[derive(Deserialize, Serialize, Clone, Debug)]
pub struct DrawResponse {
    pub success: bool,
    pub data: DrawInfo,
}

#[derive(Deserialize, Serialize, Clone, Debug, Default)]
pub struct CheckNumbersRequest {
    #[serde(default)]
    pub selected_numbers: Vec<i64>,
}

#[derive(Deserialize, Serialize, Clone, Debug)]
pub struct CheckNumbersResponse {
    pub success: bool,
    pub latest_draw_no: u32,
    pub matched_numbers: Vec<u8>,
    pub bonus_matched: bool,
}
