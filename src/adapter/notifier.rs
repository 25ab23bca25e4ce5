// src/adapter/notifier.rs

use tracing::{info, warn};

use crate::adapter::partners::handler;
use crate::model::bid::{NormalizedBid, TimeoutInfo, WinNotification};
use crate::model::imps::ImpressionCache;

/// 竞价获胜回调：缺少获胜通知所需数据时什么也不做
pub fn on_bid_won(bid: &NormalizedBid, imps: &ImpressionCache) -> Option<WinNotification> {
    if bid.nurl.as_deref().map_or(true, str::is_empty) {
        warn!("bid won without win url, nothing to notify");
        return None;
    }
    let Some(partner) = imps.partner(&bid.impression_id) else {
        warn!("bid won for unknown impression {}", bid.impression_id);
        return None;
    };
    let notice = handler(partner).win_notification(bid)?;
    info!(
        "bid won: request_id={}, impression_id={}, cpm={} {}",
        bid.request_id, bid.impression_id, bid.cpm, bid.currency
    );
    Some(notice)
}

/// 竞价超时回调，只记录日志
pub fn on_timeout(timeouts: &[TimeoutInfo]) {
    for timeout in timeouts {
        warn!(
            "bid timed out: bidder={}, bid_id={}, timeout_ms={}",
            timeout.bidder, timeout.bid_id, timeout.timeout_ms
        );
    }
}
