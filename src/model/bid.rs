// src/model/bid.rs

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Banner,
    Native,
    Video,
}

impl MediaType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaType::Banner => "banner",
            MediaType::Native => "native",
            MediaType::Video => "video",
        }
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 统一格式的竞价结果，每个响应 bid 构造一次，之后不再修改
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedBid {
    /// 出站请求的 `id`（即 slot 的 bid id）
    pub request_id: String,
    pub impression_id: String,
    pub media_type: Option<MediaType>,
    pub cpm: f64,
    pub currency: String,
    pub width: u32,
    pub height: u32,
    /// 创意内容原样透传：HTML 片段、Native JSON 或 VAST XML
    pub markup: String,
    pub creative_id: Option<String>,
    pub campaign_id: Option<String>,
    pub advertiser_domains: Vec<String>,
    /// 竞价获胜通知地址
    pub nurl: Option<String>,
    pub net_revenue: bool,
    pub ttl: u32,
}

/// 构建器产出的 HTTP 请求描述，由外部调用方负责发送
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct OutboundRequest {
    pub method: String,
    pub url: String,
    /// JSON 字符串形式的 WireBidRequest
    pub data: String,
    pub bid_id: String,
}

/// 获胜通知（对 nurl 发起 GET）
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct WinNotification {
    pub method: String,
    pub url: String,
}

/// 竞价超时时由外部框架上报的信息
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TimeoutInfo {
    pub bidder: String,
    pub bid_id: String,
    #[serde(default)]
    pub timeout_ms: u64,
}
