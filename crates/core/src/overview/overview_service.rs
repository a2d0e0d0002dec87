use std::sync::Arc;

use chrono::Utc;
use log::debug;

use crate::gateway::{ApiResponse, FinanceApiTrait};
use crate::overview::OverviewData;

pub struct OverviewService {
    api: Arc<dyn FinanceApiTrait>,
}

impl OverviewService {
    pub fn new(api: Arc<dyn FinanceApiTrait>) -> Self {
        Self { api }
    }

    /// Fetches the server aggregate and coerces it. A failed call keeps its
    /// message and carries no data.
    pub async fn fetch_overview(&self) -> ApiResponse<OverviewData> {
        let response = self.api.get_overview().await;
        if !response.success {
            debug!("Overview fetch failed: {}", response.message);
            return ApiResponse::failed(response.message);
        }

        let now = Utc::now();
        let data = response
            .data
            .as_ref()
            .map(|raw| OverviewData::from_raw(raw, now))
            .unwrap_or_else(|| OverviewData::from_raw(&serde_json::Value::Null, now));

        ApiResponse {
            success: true,
            message: response.message,
            data: Some(data),
        }
    }
}
