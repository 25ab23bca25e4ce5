// src/adapter/interpreter.rs

use tracing::{debug, error, warn};

use crate::adapter::partners::handler;
use crate::config::AdapterConfig;
use crate::model::bid::{NormalizedBid, OutboundRequest};
use crate::model::imps::ImpressionCache;
use crate::openrtb::request::BidRequest;
use crate::openrtb::response::BidResponse;

/// 把 exads 响应转换为统一格式的竞价结果
///
/// 媒体类型以原始请求中对应 impression 的子对象为准；
/// impression 不在缓存中的 bid 会被丢弃。任何情况下都不会失败。
pub fn interpret_response(
    config: &AdapterConfig,
    response: &BidResponse,
    request: &OutboundRequest,
    imps: &ImpressionCache,
) -> Vec<NormalizedBid> {
    if response.bids().next().is_none() {
        debug!("response {} carries no bids (nbr={:?})", response.id, response.nbr);
        return Vec::new();
    }

    let original: BidRequest = match serde_json::from_str(&request.data) {
        Ok(original) => original,
        Err(e) => {
            error!("original request {} unreadable: {}", request.bid_id, e);
            return Vec::new();
        }
    };

    response
        .bids()
        .filter_map(|bid| {
            let Some(entry) = imps.get(&bid.impid) else {
                warn!("bid {} dropped: impression {} not in cache", bid.id, bid.impid);
                return None;
            };
            handler(entry.partner).interpret_bid(config, bid, response, &original, entry)
        })
        .collect()
}
