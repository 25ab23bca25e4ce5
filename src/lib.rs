//! exads 广告服务器的 OpenRTB 2.4 竞价适配器。
//!
//! 把媒体方的广告位请求转换为 exads 的竞价请求，再把 exads 的竞价响应
//! 转换为统一格式的 [`NormalizedBid`]。传输由调用方负责，
//! `bidding`、`api`、`mock_server` 只服务于演示网关。

pub mod adapter;
pub mod api;
pub mod bidding;
pub mod config;
pub mod error;
pub mod logging;
pub mod mock_server;
pub mod model;
pub mod openrtb;

pub use adapter::{BidAdapter, ExadsAdapter};
pub use config::AdapterConfig;
pub use error::{AdapterError, ValidationError};
pub use model::bid::{MediaType, NormalizedBid, OutboundRequest, TimeoutInfo, WinNotification};
pub use model::context::PageContext;
pub use model::imps::ImpressionCache;
pub use model::slot::SlotRequest;
