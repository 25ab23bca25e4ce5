// src/config/config_manager.rs

use std::fs;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::Result;
use crate::model::partner::Partner;

/// 适配器注册的 bidder code
pub const BIDDER_CODE: &str = "exadsadserver";
/// IAB TCF 全球供应商 ID
pub const GVL_ID: u32 = 1084;

/// 适配器运行配置
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct AdapterConfig {
    pub bidder_code: String,
    pub gvl_id: u32,
    /// 已知的广告合作方协议
    pub partners: Vec<Partner>,
    /// 竞价缓存时间（秒）
    pub ttl: u32,
    pub net_revenue: bool,
    /// 响应里缺少 `cur` 时使用的币种
    pub default_currency: String,
    pub native_version: String,
    /// 出站请求超时（毫秒）
    pub request_timeout_ms: u64,
}

impl Default for AdapterConfig {
    fn default() -> Self {
        Self {
            bidder_code: BIDDER_CODE.to_string(),
            gvl_id: GVL_ID,
            partners: vec![Partner::Rtb2_4],
            ttl: 360,
            net_revenue: true,
            default_currency: "USD".to_string(),
            native_version: "1.2".to_string(),
            request_timeout_ms: 1000,
        }
    }
}

impl AdapterConfig {
    pub fn is_known_partner(&self, partner: Partner) -> bool {
        self.partners.contains(&partner)
    }
}

/// 配置来源
pub trait ConfigAdapter: Send + Sync {
    fn load(&self) -> AdapterConfig;
}

/// 从 JSON 文件读取配置，文件缺失或格式错误时退回默认配置
pub struct FileConfigAdapter {
    pub path: String,
}

impl FileConfigAdapter {
    pub fn new(path: &str) -> Self {
        Self {
            path: path.to_string(),
        }
    }

    /// 读取并解析配置文件，错误原样返回
    pub fn try_load(&self) -> Result<AdapterConfig> {
        let content = fs::read_to_string(&self.path)?;
        Ok(serde_json::from_str(&content)?)
    }
}

impl ConfigAdapter for FileConfigAdapter {
    fn load(&self) -> AdapterConfig {
        self.try_load().unwrap_or_else(|e| {
            warn!("config file {} unusable ({}), using defaults", self.path, e);
            AdapterConfig::default()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AdapterError;

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let adapter = FileConfigAdapter::new("/nonexistent/exads.json");
        assert!(matches!(adapter.try_load(), Err(AdapterError::Io(_))));
        assert_eq!(adapter.load(), AdapterConfig::default());
    }

    #[test]
    fn partial_file_keeps_remaining_defaults() {
        let path = std::env::temp_dir().join(format!("exads-config-{}.json", uuid::Uuid::new_v4()));
        fs::write(&path, r#"{ "ttl": 60, "default_currency": "EUR" }"#).unwrap();

        let config = FileConfigAdapter::new(path.to_str().unwrap()).load();
        assert_eq!(config.ttl, 60);
        assert_eq!(config.default_currency, "EUR");
        assert_eq!(config.bidder_code, BIDDER_CODE);
        assert!(config.is_known_partner(Partner::Rtb2_4));

        fs::remove_file(path).ok();
    }

    #[test]
    fn broken_file_falls_back_to_defaults() {
        let path = std::env::temp_dir().join(format!("exads-config-{}.json", uuid::Uuid::new_v4()));
        fs::write(&path, "{ not json").unwrap();

        let adapter = FileConfigAdapter::new(path.to_str().unwrap());
        assert!(matches!(adapter.try_load(), Err(AdapterError::Json(_))));
        assert_eq!(adapter.load(), AdapterConfig::default());

        fs::remove_file(path).ok();
    }
}
