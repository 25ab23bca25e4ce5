// src/adapter/partners/mod.rs

mod rtb_2_4;

pub use rtb_2_4::Rtb24Handler;

use crate::adapter::validator::ValidatedSlot;
use crate::config::AdapterConfig;
use crate::error::Result;
use crate::model::bid::{NormalizedBid, OutboundRequest, WinNotification};
use crate::model::context::PageContext;
use crate::model::imps::{ImpressionCache, ImpressionEntry};
use crate::model::partner::Partner;
use crate::openrtb::request::BidRequest;
use crate::openrtb::response::{Bid, BidResponse};

/// 每个合作方协议的请求构建、响应解析与获胜通知
pub trait PartnerHandler: Send + Sync {
    fn partner(&self) -> Partner;

    /// 构建出站请求，并把生成的 impression id 写入缓存
    fn build_request(
        &self,
        config: &AdapterConfig,
        slot: &ValidatedSlot,
        ctx: &PageContext,
        imps: &mut ImpressionCache,
    ) -> Result<OutboundRequest>;

    /// 把单个响应 bid 转换为统一格式，无法使用时返回 `None`
    fn interpret_bid(
        &self,
        config: &AdapterConfig,
        bid: &Bid,
        response: &BidResponse,
        original: &BidRequest,
        entry: &ImpressionEntry,
    ) -> Option<NormalizedBid>;

    fn win_notification(&self, bid: &NormalizedBid) -> Option<WinNotification>;
}

/// 合作方 → 处理器
pub fn handler(partner: Partner) -> &'static dyn PartnerHandler {
    match partner {
        Partner::Rtb2_4 => &Rtb24Handler,
    }
}
