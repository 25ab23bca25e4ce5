// src/model/context.rs

use serde::{Deserialize, Serialize};

/// 一次竞价周期内所有广告位共享的浏览器/页面上下文
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct PageContext {
    pub user_agent: String,
    /// 当前页面地址
    pub page: String,
    /// 页面域名，为空时从 `page` 推导
    pub domain: String,
    /// 浏览器语言，例如 `en`
    pub language: String,
    /// Accept-Language，例如 `en-GB`
    pub accept_language: String,
    pub os_name: String,
    pub gdpr_consent: Option<GdprConsent>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GdprConsent {
    pub gdpr_applies: bool,
    #[serde(default)]
    pub consent_string: String,
}

impl PageContext {
    /// 页面域名：优先使用显式设置的 `domain`
    pub fn resolved_domain(&self) -> String {
        if !self.domain.is_empty() {
            return self.domain.clone();
        }
        let rest = self
            .page
            .split_once("://")
            .map(|(_, rest)| rest)
            .unwrap_or(&self.page);
        let host = rest.split(['/', '?', '#']).next().unwrap_or("");
        // 去掉端口
        host.split(':').next().unwrap_or("").to_string()
    }

    /// 仅在 GDPR 适用时返回 consent 字符串
    pub fn consent(&self) -> Option<&str> {
        self.gdpr_consent
            .as_ref()
            .filter(|c| c.gdpr_applies)
            .map(|c| c.consent_string.as_str())
    }
}
