use std::collections::HashMap;

use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::model::bid::MediaType;
use crate::model::slot::NativeAsset;

/// exads OpenRTB 2.4 BidRequest
///
/// 只对适配器读写的字段做强类型建模，其余字段通过 `extra` 原样保留。
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct BidRequest {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub at: Option<i32>,
    #[serde(default)]
    pub imp: Vec<Imp>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub site: Option<Site>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device: Option<Device>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<User>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ext: Option<Value>,
    #[serde(default, flatten)]
    pub extra: HashMap<String, Value>,
}

impl BidRequest {
    pub fn find_imp(&self, imp_id: &str) -> Option<&Imp> {
        self.imp.iter().find(|imp| imp.id == imp_id)
    }
}

/// 广告展示机会，banner / native / video 三者只出现其一
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct Imp {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bidfloor: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bidfloorcur: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub banner: Option<Banner>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub native: Option<Native>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video: Option<Video>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ext: Option<Value>,
    #[serde(default, flatten)]
    pub extra: HashMap<String, Value>,
}

impl Imp {
    /// 根据出现的子对象判断媒体类型
    pub fn media_type(&self) -> Option<MediaType> {
        if self.banner.is_some() {
            Some(MediaType::Banner)
        } else if self.native.is_some() {
            Some(MediaType::Native)
        } else if self.video.is_some() {
            Some(MediaType::Video)
        } else {
            None
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct Banner {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub w: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub h: Option<u32>,
}

/// native 对象：`request` 是序列化后的 Native 请求 JSON 字符串
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct Native {
    pub request: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ver: Option<String>,
    /// `request` 字符串延迟解析的缓存
    #[serde(skip)]
    pub request_detail: OnceCell<Option<NativeRequestDetail>>,
}

/// Native 1.2 请求体
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct NativeRequestDetail {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ver: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contextsubtype: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plcmttype: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plcmtcnt: Option<u32>,
    #[serde(default)]
    pub assets: Vec<NativeAsset>,
}

impl NativeRequestDetail {
    /// 第一个图片资产的尺寸，`w/h` 缺失时用 `wmin/hmin`
    pub fn image_size(&self) -> Option<(u32, u32)> {
        self.assets.iter().filter_map(|a| a.img.as_ref()).find_map(|img| {
            match (img.w.or(img.wmin), img.h.or(img.hmin)) {
                (Some(w), Some(h)) => Some((w, h)),
                _ => None,
            }
        })
    }
}

impl Native {
    pub fn new(detail: &NativeRequestDetail, ver: &str) -> serde_json::Result<Self> {
        let request = serde_json::to_string(&serde_json::json!({ "native": detail }))?;
        Ok(Self {
            request,
            ver: Some(ver.to_string()),
            request_detail: OnceCell::new(),
        })
    }

    /// 解析 `request` 字符串，兼容 `{"native": {...}}` 包裹与裸对象两种写法
    pub fn get_request_detail(&self) -> Option<&NativeRequestDetail> {
        self.request_detail
            .get_or_init(|| {
                let value: Value = serde_json::from_str(&self.request).ok()?;
                let inner = value.get("native").unwrap_or(&value);
                NativeRequestDetail::deserialize(inner).ok()
            })
            .as_ref()
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct Video {
    #[serde(default)]
    pub mimes: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub protocols: Vec<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub w: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub h: Option<u32>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct Site {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub cat: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keywords: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct Device {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ua: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ip: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub geo: Option<Geo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub os: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub js: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ext: Option<DeviceExt>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct Geo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct DeviceExt {
    #[serde(default)]
    pub remote_addr: String,
    #[serde(default)]
    pub x_forwarded_for: String,
    #[serde(default)]
    pub accept_language: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct User {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ext: Option<Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn native_request_detail_is_parsed_lazily() {
        let imp: Imp = serde_json::from_value(json!({
            "id": "270544423272657",
            "native": {
                "request": "{\"native\":{\"ver\":\"1.2\",\"plcmtcnt\":4,\"assets\":[{\"id\":1,\"required\":1,\"title\":{\"len\":124}},{\"id\":3,\"required\":1,\"img\":{\"type\":3,\"w\":300,\"h\":250,\"wmin\":300,\"hmin\":250}}]}}",
                "ver": "1.2"
            }
        }))
        .unwrap();

        assert_eq!(imp.media_type(), Some(MediaType::Native));
        let native = imp.native.as_ref().unwrap();
        assert!(native.request_detail.get().is_none());

        let detail = native.get_request_detail().unwrap();
        assert_eq!(detail.plcmtcnt, Some(4));
        assert_eq!(detail.image_size(), Some((300, 250)));
        assert!(native.request_detail.get().is_some());
    }

    #[test]
    fn broken_native_request_yields_none() {
        let native = Native {
            request: "not json".to_string(),
            ..Default::default()
        };
        assert!(native.get_request_detail().is_none());
    }

    #[test]
    fn unknown_imp_fields_are_kept() {
        let imp: Imp = serde_json::from_value(json!({
            "id": "1",
            "video": { "mimes": ["video/mp4"] },
            "protocols": [3, 6],
            "ext": { "video_cta": 0 }
        }))
        .unwrap();

        assert_eq!(imp.media_type(), Some(MediaType::Video));
        assert_eq!(imp.extra.get("protocols"), Some(&json!([3, 6])));

        let back = serde_json::to_value(&imp).unwrap();
        assert_eq!(back["protocols"], json!([3, 6]));
        assert_eq!(back["ext"]["video_cta"], json!(0));
    }
}
