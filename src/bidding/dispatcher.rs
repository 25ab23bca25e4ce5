// src/bidding/dispatcher.rs

use std::time::Instant;

use futures::future::join_all;
use reqwest::{Client, StatusCode};
use tokio::time::{timeout, Duration};
use tracing::debug;

use crate::error::{AdapterError, Result};
use crate::model::bid::OutboundRequest;
use crate::openrtb::response::BidResponse;

/// 单个出站请求的发送结果
pub struct DispatchOutcome {
    pub request: OutboundRequest,
    /// `Ok(None)` 表示 204 或空响应体
    pub result: Result<Option<BidResponse>>,
    pub elapsed_ms: u128,
}

impl DispatchOutcome {
    pub fn status(&self) -> &'static str {
        match &self.result {
            Ok(Some(response)) if response.bids().next().is_some() => "success",
            Ok(_) => "no_bid",
            Err(AdapterError::Timeout(_)) => "timeout",
            Err(_) => "error",
        }
    }
}

/// 把构建好的请求发往广告服务器（演示用的调用方，适配器本身不做传输）
pub struct Dispatcher {
    client: Client,
    timeout: Duration,
}

/// 缺少 scheme 的 endpoint 默认使用 https
fn normalize_url(url: &str) -> String {
    if url.starts_with("http://") || url.starts_with("https://") {
        url.to_string()
    } else {
        format!("https://{}", url)
    }
}

impl Dispatcher {
    pub fn new(timeout_ms: u64) -> Self {
        Self {
            client: Client::new(),
            timeout: Duration::from_millis(timeout_ms),
        }
    }

    /// 并发发送全部请求，结果顺序与输入一致
    pub async fn send_all(&self, requests: Vec<OutboundRequest>) -> Vec<DispatchOutcome> {
        join_all(requests.into_iter().map(|request| self.send_one(request))).await
    }

    async fn send_one(&self, request: OutboundRequest) -> DispatchOutcome {
        let start = Instant::now();
        // 整个请求（发送 + 读取响应体）共用一个超时
        let result = timeout(self.timeout, self.fetch(&request))
            .await
            .unwrap_or_else(|_| Err(AdapterError::Timeout(normalize_url(&request.url))));
        let elapsed_ms = start.elapsed().as_millis();
        debug!("{} {} finished in {} ms", request.method, request.url, elapsed_ms);
        DispatchOutcome {
            request,
            result,
            elapsed_ms,
        }
    }

    async fn fetch(&self, request: &OutboundRequest) -> Result<Option<BidResponse>> {
        let url = normalize_url(&request.url);
        let send = self
            .client
            .post(&url)
            .header("Content-Type", "application/json")
            .body(request.data.clone())
            .send();
        let response = send.await?;

        if response.status() == StatusCode::NO_CONTENT {
            return Ok(None);
        }
        let response = response.error_for_status()?;
        let mut body = response.bytes().await?.to_vec();
        if body.is_empty() {
            return Ok(None);
        }
        let bid_response: BidResponse = simd_json::serde::from_slice(&mut body)?;
        Ok(Some(bid_response))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_without_scheme_defaults_to_https() {
        assert_eq!(normalize_url("test.com"), "https://test.com");
        assert_eq!(normalize_url("http://127.0.0.1:9001/rtb"), "http://127.0.0.1:9001/rtb");
    }

    #[test]
    fn simd_decoding_handles_wire_response() {
        let mut body = br#"{"id":"r1","seatbid":[{"bid":[{"id":"b1","impid":"i1","price":0.5,"adm":"<div/>","w":300,"h":250}]}],"cur":"USD"}"#.to_vec();
        let response: BidResponse = simd_json::serde::from_slice(&mut body).unwrap();
        assert_eq!(response.bids().count(), 1);
        assert_eq!(response.cur.as_deref(), Some("USD"));
    }
}
