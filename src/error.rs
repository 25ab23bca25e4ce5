// src/error.rs

use thiserror::Error;

/// 适配器内部错误
///
/// 适配器的公开操作（校验、构建、解析、通知）按约定在内部吸收错误，
/// 这里的错误只会从传输层和配置加载中向上抛出。
#[derive(Debug, Error)]
pub enum AdapterError {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("response body decode failed: {0}")]
    Decode(#[from] simd_json::Error),
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("request to {0} timed out")]
    Timeout(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// 广告位请求校验失败的原因
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("bidder code `{0}` does not belong to this adapter")]
    WrongBidder(String),
    #[error("parameter bag is empty")]
    EmptyParams,
    #[error("missing mandatory parameter `{0}`")]
    MissingParam(&'static str),
    #[error("unknown partner `{0}`")]
    UnknownPartner(String),
    #[error("no supported media type declared")]
    NoMediaType,
    #[error("{0} media type is missing `{1}`")]
    IncompleteMediaType(&'static str, &'static str),
}

pub type Result<T> = std::result::Result<T, AdapterError>;
