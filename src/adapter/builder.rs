// src/adapter/builder.rs

use tracing::{error, warn};

use crate::adapter::partners::handler;
use crate::adapter::validator::validate;
use crate::config::AdapterConfig;
use crate::model::bid::OutboundRequest;
use crate::model::context::PageContext;
use crate::model::imps::ImpressionCache;
use crate::model::slot::SlotRequest;

/// 每个有效广告位生成一个 POST 请求，无效广告位跳过
///
/// 副作用：生成的每个 impression id 都会记录到 `imps`。
pub fn build_requests(
    config: &AdapterConfig,
    slots: &[SlotRequest],
    ctx: &PageContext,
    imps: &mut ImpressionCache,
) -> Vec<OutboundRequest> {
    let mut requests = Vec::with_capacity(slots.len());
    for slot in slots {
        let validated = match validate(config, slot) {
            Ok(validated) => validated,
            Err(e) => {
                warn!("slot {} skipped: {}", slot.bid_id, e);
                continue;
            }
        };
        match handler(validated.partner).build_request(config, &validated, ctx, imps) {
            Ok(request) => requests.push(request),
            Err(e) => error!("slot {} request build failed: {}", slot.bid_id, e),
        }
    }
    requests
}
