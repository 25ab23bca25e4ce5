use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, warn};
use uuid::Uuid;

use crate::adapter::BidAdapter;
use crate::api::AppState;
use crate::error::AdapterError;
use crate::logging::auction_log::AuctionLog;
use crate::model::bid::{NormalizedBid, TimeoutInfo};
use crate::model::context::PageContext;
use crate::model::imps::ImpressionCache;
use crate::model::slot::SlotRequest;

/// 一次竞价周期的输入：广告位列表 + 页面上下文
///
/// 广告位保持原始 JSON，逐个解析，单个格式错误的广告位不影响其它广告位。
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct AuctionRequest {
    #[serde(default)]
    pub slots: Vec<Value>,
    #[serde(default)]
    pub context: PageContext,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct AuctionResponse {
    pub auction_id: String,
    pub bids: Vec<NormalizedBid>,
}

/// 逐个解析广告位，无法解析的记录日志后跳过
pub fn parse_slots(auction_id: &str, raw: &[Value]) -> Vec<SlotRequest> {
    raw.iter()
        .enumerate()
        .filter_map(|(index, value)| match SlotRequest::deserialize(value) {
            Ok(slot) => Some(slot),
            Err(e) => {
                warn!("auction {}: slot #{} skipped, malformed: {}", auction_id, index, e);
                None
            }
        })
        .collect()
}

/// **执行一次竞价周期**
///
/// 校验、构建请求、发送、解析响应。impression 缓存只在本次调用内有效。
pub async fn handle_auction(
    State(state): State<Arc<AppState>>,
    Json(auction): Json<AuctionRequest>,
) -> (StatusCode, Json<AuctionResponse>) {
    let adapter = &state.adapter;
    let auction_id = Uuid::new_v4().to_string();
    let mut auction_log = AuctionLog::new(&auction_id, auction.slots.len());

    let slots = parse_slots(&auction_id, &auction.slots);
    let mut imps = ImpressionCache::new();
    let requests = adapter.build_requests(&slots, &auction.context, &mut imps);
    info!(
        "auction {}: {} of {} slots produced requests",
        auction_id,
        requests.len(),
        auction.slots.len()
    );

    let outcomes = state.dispatcher.send_all(requests).await;

    let mut bids = Vec::new();
    let mut timeouts = Vec::new();
    for outcome in &outcomes {
        let interpreted = match &outcome.result {
            Ok(Some(response)) => adapter.interpret_response(response, &outcome.request, &imps),
            Ok(None) => Vec::new(),
            Err(AdapterError::Timeout(_)) => {
                timeouts.push(TimeoutInfo {
                    bidder: adapter.code().to_string(),
                    bid_id: outcome.request.bid_id.clone(),
                    timeout_ms: adapter.config().request_timeout_ms,
                });
                Vec::new()
            }
            Err(e) => {
                warn!("auction {}: request {} failed: {}", auction_id, outcome.request.bid_id, e);
                Vec::new()
            }
        };
        auction_log.add_outbound(
            &outcome.request.bid_id,
            &outcome.request.url,
            outcome.status(),
            outcome.elapsed_ms,
            interpreted.len(),
        );
        bids.extend(interpreted);
    }

    if !timeouts.is_empty() {
        adapter.on_timeout(&timeouts);
    }
    auction_log.emit();

    let status = if bids.is_empty() {
        StatusCode::NO_CONTENT // 无广告可填充
    } else {
        StatusCode::OK
    };
    (status, Json(AuctionResponse { auction_id, bids }))
}
