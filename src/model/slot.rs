// src/model/slot.rs

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// 媒体方（publisher）提交的单个广告位竞价请求
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SlotRequest {
    pub bidder: String,
    /// 框架分配的竞价 ID，为空时由构建器生成
    #[serde(default)]
    pub bid_id: String,
    #[serde(default)]
    pub media_types: MediaTypes,
    #[serde(default)]
    pub params: SlotParams,
}

/// 广告位声明的媒体类型，可同时声明多种
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct MediaTypes {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub banner: Option<BannerMediaType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub native: Option<NativeMediaType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video: Option<VideoMediaType>,
}

impl MediaTypes {
    pub fn is_empty(&self) -> bool {
        self.banner.is_none() && self.native.is_none() && self.video.is_none()
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct BannerMediaType {
    #[serde(default)]
    pub sizes: Sizes,
}

/// 尺寸既可以是 `[w, h]`，也可以是 `[[w, h], ...]`
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum Sizes {
    Single(Vec<u32>),
    Multi(Vec<Vec<u32>>),
}

impl Default for Sizes {
    fn default() -> Self {
        Sizes::Single(Vec::new())
    }
}

impl Sizes {
    /// 取第一个完整的宽高
    pub fn primary(&self) -> Option<(u32, u32)> {
        let pair = match self {
            Sizes::Single(pair) => pair.as_slice(),
            Sizes::Multi(list) => list.first().map(|p| p.as_slice()).unwrap_or(&[]),
        };
        match pair {
            [w, h, ..] => Some((*w, *h)),
            _ => None,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct NativeMediaType {
    #[serde(default)]
    pub ortb: NativeOrtb,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct NativeOrtb {
    #[serde(default)]
    pub assets: Vec<NativeAsset>,
}

/// OpenRTB Native 1.2 资产请求
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct NativeAsset {
    #[serde(default)]
    pub id: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub img: Option<NativeImage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video: Option<Value>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct NativeImage {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub img_type: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub w: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub h: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wmin: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hmin: Option<u32>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct VideoMediaType {
    #[serde(default)]
    pub mimes: Vec<String>,
    #[serde(default)]
    pub protocols: Vec<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub player_size: Option<Sizes>,
}

/// 广告位参数包，所有字段在类型层面都是可选的，空对象 `{}` 也能解析
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SlotParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zone_id: Option<u64>,
    /// format id
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fid: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub partner: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub site_id: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub cat_iab: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_ip: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub impression_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keywords: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bidfloor: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bidfloorcur: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub mimes: Vec<String>,
    #[serde(rename = "image_output", skip_serializing_if = "Option::is_none")]
    pub image_output: Option<String>,
    #[serde(rename = "video_output", skip_serializing_if = "Option::is_none")]
    pub video_output: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub native: Option<NativeParams>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stream: Option<StreamParams>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
    /// 未识别的参数原样保留
    #[serde(default, flatten)]
    pub extra: HashMap<String, Value>,
}

impl SlotParams {
    pub fn is_empty(&self) -> bool {
        *self == SlotParams::default()
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct NativeParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plcmtcnt: Option<u32>,
}

/// 视频流参数
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct StreamParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video: Option<StreamVideo>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub protocols: Vec<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ext: Option<Value>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct StreamVideo {
    #[serde(default)]
    pub mimes: Vec<String>,
}
