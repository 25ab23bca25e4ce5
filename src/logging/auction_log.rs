use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::info;

/// **单次竞价周期日志**
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct AuctionLog {
    pub timestamp: String,      // 记录时间
    pub log_type: String,       // 日志类型，固定为 "exads_auction"
    pub auction_id: String,     // 竞价周期 ID
    pub slot_count: usize,      // 收到的广告位数
    pub request_count: usize,   // 实际发出的请求数
    pub bid_count: usize,       // 解析出的 bid 数
    pub status: String,         // "filled" or "no_fill"
    pub outbound_log: Vec<OutboundLog>,
}

/// **单个出站请求日志**
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct OutboundLog {
    pub bid_id: String,
    pub url: String,
    pub status: String,         // "success", "timeout", "no_bid", "error"
    pub elapsed_ms: u128,
    pub bids: usize,
}

impl AuctionLog {
    pub fn new(auction_id: &str, slot_count: usize) -> Self {
        Self {
            timestamp: Utc::now().to_rfc3339(),
            log_type: "exads_auction".to_string(),
            auction_id: auction_id.to_string(),
            slot_count,
            request_count: 0,
            bid_count: 0,
            status: "no_fill".to_string(),
            outbound_log: Vec::new(),
        }
    }

    pub fn add_outbound(&mut self, bid_id: &str, url: &str, status: &str, elapsed_ms: u128, bids: usize) {
        self.outbound_log.push(OutboundLog {
            bid_id: bid_id.to_string(),
            url: url.to_string(),
            status: status.to_string(),
            elapsed_ms,
            bids,
        });
        self.request_count += 1;
        self.bid_count += bids;
        if self.bid_count > 0 {
            self.status = "filled".to_string();
        }
    }

    /// 以一行 JSON 写入 `auction` target
    pub fn emit(&self) {
        match serde_json::to_string(self) {
            Ok(line) => info!(target: "auction", "{}", line),
            Err(e) => info!(target: "auction", "auction log serialize failed: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outbound_entries_update_totals() {
        let mut log = AuctionLog::new("auction-1", 2);
        log.add_outbound("a", "https://rtb.example.com", "no_bid", 12, 0);
        assert_eq!(log.status, "no_fill");

        log.add_outbound("b", "https://rtb.example.com", "success", 30, 2);
        assert_eq!(log.request_count, 2);
        assert_eq!(log.bid_count, 2);
        assert_eq!(log.status, "filled");
    }
}
