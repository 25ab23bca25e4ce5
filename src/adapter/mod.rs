// src/adapter/mod.rs

pub mod builder;
pub mod interpreter;
pub mod notifier;
pub mod partners;
pub mod validator;

use crate::config::AdapterConfig;
use crate::error::ValidationError;
use crate::model::bid::{MediaType, NormalizedBid, OutboundRequest, TimeoutInfo, WinNotification};
use crate::model::context::PageContext;
use crate::model::imps::ImpressionCache;
use crate::model::slot::SlotRequest;
use crate::openrtb::response::BidResponse;

pub use validator::{SlotMedia, ValidatedSlot};

/// 竞价框架调用的适配器接口
pub trait BidAdapter: Send + Sync {
    fn code(&self) -> &str;

    fn supported_media_types(&self) -> &[MediaType];

    fn is_bid_request_valid(&self, slot: &SlotRequest) -> bool;

    fn build_requests(
        &self,
        slots: &[SlotRequest],
        ctx: &PageContext,
        imps: &mut ImpressionCache,
    ) -> Vec<OutboundRequest>;

    fn interpret_response(
        &self,
        response: &BidResponse,
        request: &OutboundRequest,
        imps: &ImpressionCache,
    ) -> Vec<NormalizedBid>;

    fn on_bid_won(&self, bid: &NormalizedBid, imps: &ImpressionCache) -> Option<WinNotification>;

    fn on_timeout(&self, timeouts: &[TimeoutInfo]);
}

const SUPPORTED_MEDIA_TYPES: [MediaType; 3] = [MediaType::Banner, MediaType::Native, MediaType::Video];

/// exads 广告服务器适配器
#[derive(Debug, Clone, Default)]
pub struct ExadsAdapter {
    config: AdapterConfig,
}

impl ExadsAdapter {
    pub fn new(config: AdapterConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AdapterConfig {
        &self.config
    }

    /// 与 `is_bid_request_valid` 相同，但返回失败原因
    pub fn validate(&self, slot: &SlotRequest) -> Result<ValidatedSlot, ValidationError> {
        validator::validate(&self.config, slot)
    }
}

impl BidAdapter for ExadsAdapter {
    fn code(&self) -> &str {
        &self.config.bidder_code
    }

    fn supported_media_types(&self) -> &[MediaType] {
        &SUPPORTED_MEDIA_TYPES
    }

    fn is_bid_request_valid(&self, slot: &SlotRequest) -> bool {
        self.validate(slot).is_ok()
    }

    fn build_requests(
        &self,
        slots: &[SlotRequest],
        ctx: &PageContext,
        imps: &mut ImpressionCache,
    ) -> Vec<OutboundRequest> {
        builder::build_requests(&self.config, slots, ctx, imps)
    }

    fn interpret_response(
        &self,
        response: &BidResponse,
        request: &OutboundRequest,
        imps: &ImpressionCache,
    ) -> Vec<NormalizedBid> {
        interpreter::interpret_response(&self.config, response, request, imps)
    }

    fn on_bid_won(&self, bid: &NormalizedBid, imps: &ImpressionCache) -> Option<WinNotification> {
        notifier::on_bid_won(bid, imps)
    }

    fn on_timeout(&self, timeouts: &[TimeoutInfo]) {
        notifier::on_timeout(timeouts)
    }
}
