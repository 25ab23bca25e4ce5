// src/adapter/validator.rs

use serde_json::Value;

use crate::config::AdapterConfig;
use crate::error::ValidationError;
use crate::model::bid::MediaType;
use crate::model::partner::Partner;
use crate::model::slot::{NativeAsset, SlotParams, SlotRequest};

/// 校验通过的广告位
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedSlot {
    pub bid_id: String,
    pub partner: Partner,
    pub zone_id: u64,
    pub fid: String,
    pub impression_id: String,
    pub endpoint: String,
    /// 至少包含一种媒体类型，顺序固定为 banner、native、video
    pub media: Vec<SlotMedia>,
    pub params: SlotParams,
}

/// 广告位媒体类型及其所需字段
#[derive(Debug, Clone, PartialEq)]
pub enum SlotMedia {
    Banner(BannerSpec),
    Native(NativeSpec),
    Video(VideoSpec),
}

impl SlotMedia {
    pub fn media_type(&self) -> MediaType {
        match self {
            SlotMedia::Banner(_) => MediaType::Banner,
            SlotMedia::Native(_) => MediaType::Native,
            SlotMedia::Video(_) => MediaType::Video,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BannerSpec {
    pub w: u32,
    pub h: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NativeSpec {
    pub assets: Vec<NativeAsset>,
    pub plcmtcnt: Option<u32>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VideoSpec {
    pub mimes: Vec<String>,
    pub protocols: Vec<u8>,
    pub w: Option<u32>,
    pub h: Option<u32>,
    pub ext: Option<Value>,
}

fn required<'a>(value: Option<&'a str>, name: &'static str) -> Result<&'a str, ValidationError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(ValidationError::MissingParam(name)),
    }
}

/// 校验广告位请求，返回构建请求所需的强类型结果
pub fn validate(config: &AdapterConfig, slot: &SlotRequest) -> Result<ValidatedSlot, ValidationError> {
    if slot.bidder != config.bidder_code {
        return Err(ValidationError::WrongBidder(slot.bidder.clone()));
    }
    let params = &slot.params;
    if params.is_empty() {
        return Err(ValidationError::EmptyParams);
    }

    let partner_name = required(params.partner.as_deref(), "partner")?;
    let zone_id = params.zone_id.ok_or(ValidationError::MissingParam("zoneId"))?;
    let fid = required(params.fid.as_deref(), "fid")?;

    let partner = partner_name
        .parse::<Partner>()
        .ok()
        .filter(|p| config.is_known_partner(*p))
        .ok_or_else(|| ValidationError::UnknownPartner(partner_name.to_string()))?;

    let impression_id = required(params.impression_id.as_deref(), "impressionId")?;
    let endpoint = required(params.endpoint.as_deref(), "endpoint")?;

    let media = collect_media(slot)?;

    Ok(ValidatedSlot {
        bid_id: slot.bid_id.clone(),
        partner,
        zone_id,
        fid: fid.to_string(),
        impression_id: impression_id.to_string(),
        endpoint: endpoint.to_string(),
        media,
        params: params.clone(),
    })
}

fn collect_media(slot: &SlotRequest) -> Result<Vec<SlotMedia>, ValidationError> {
    let media_types = &slot.media_types;
    if media_types.is_empty() {
        return Err(ValidationError::NoMediaType);
    }
    let params = &slot.params;
    let mut media = Vec::new();

    if let Some(banner) = &media_types.banner {
        let (w, h) = banner
            .sizes
            .primary()
            .ok_or(ValidationError::IncompleteMediaType("banner", "sizes"))?;
        media.push(SlotMedia::Banner(BannerSpec { w, h }));
    }

    if let Some(native) = &media_types.native {
        if native.ortb.assets.is_empty() {
            return Err(ValidationError::IncompleteMediaType("native", "assets"));
        }
        media.push(SlotMedia::Native(NativeSpec {
            assets: native.ortb.assets.clone(),
            plcmtcnt: params.native.as_ref().and_then(|n| n.plcmtcnt),
        }));
    }

    if let Some(video) = &media_types.video {
        let stream = params.stream.as_ref();
        let mimes = if !video.mimes.is_empty() {
            video.mimes.clone()
        } else {
            stream
                .and_then(|s| s.video.as_ref())
                .map(|v| v.mimes.clone())
                .unwrap_or_default()
        };
        if mimes.is_empty() {
            return Err(ValidationError::IncompleteMediaType("video", "mimes"));
        }
        let protocols = if !video.protocols.is_empty() {
            video.protocols.clone()
        } else {
            stream.map(|s| s.protocols.clone()).unwrap_or_default()
        };
        let size = video.player_size.as_ref().and_then(|s| s.primary());
        media.push(SlotMedia::Video(VideoSpec {
            mimes,
            protocols,
            w: size.map(|(w, _)| w),
            h: size.map(|(_, h)| h),
            ext: stream.and_then(|s| s.ext.clone()),
        }));
    }

    Ok(media)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn slot(value: Value) -> SlotRequest {
        serde_json::from_value(value).unwrap()
    }

    fn banner_slot() -> Value {
        json!({
            "bidder": "exadsadserver",
            "bidId": "2d2a496527398e",
            "mediaTypes": { "banner": { "sizes": [300, 250] } },
            "params": {
                "zoneId": 5147485,
                "fid": "829a896f011475d505a0d89cfdd1af8d9cdb07ff",
                "partner": "rtb_2_4",
                "impressionId": "123456",
                "endpoint": "test.com"
            }
        })
    }

    #[test]
    fn banner_slot_is_validated() {
        let validated = validate(&AdapterConfig::default(), &slot(banner_slot())).unwrap();
        assert_eq!(validated.partner, Partner::Rtb2_4);
        assert_eq!(validated.zone_id, 5147485);
        assert_eq!(validated.media, vec![SlotMedia::Banner(BannerSpec { w: 300, h: 250 })]);
    }

    #[test]
    fn missing_mandatory_params_are_reported() {
        let config = AdapterConfig::default();
        for (field, expected) in [
            ("partner", "partner"),
            ("zoneId", "zoneId"),
            ("fid", "fid"),
            ("impressionId", "impressionId"),
            ("endpoint", "endpoint"),
        ] {
            let mut value = banner_slot();
            value["params"].as_object_mut().unwrap().remove(field);
            assert_eq!(
                validate(&config, &slot(value)),
                Err(ValidationError::MissingParam(expected)),
                "field {}",
                field
            );
        }
    }

    #[test]
    fn partner_outside_config_is_unknown() {
        let config = AdapterConfig {
            partners: Vec::new(),
            ..Default::default()
        };
        assert_eq!(
            validate(&config, &slot(banner_slot())),
            Err(ValidationError::UnknownPartner("rtb_2_4".to_string()))
        );
    }

    #[test]
    fn media_type_shapes_are_checked() {
        let config = AdapterConfig::default();

        let mut value = banner_slot();
        value["mediaTypes"] = json!({});
        assert_eq!(validate(&config, &slot(value)), Err(ValidationError::NoMediaType));

        let mut value = banner_slot();
        value["mediaTypes"] = json!({ "banner": { "sizes": [] } });
        assert_eq!(
            validate(&config, &slot(value)),
            Err(ValidationError::IncompleteMediaType("banner", "sizes"))
        );

        let mut value = banner_slot();
        value["mediaTypes"] = json!({ "native": { "ortb": { "assets": [] } } });
        assert_eq!(
            validate(&config, &slot(value)),
            Err(ValidationError::IncompleteMediaType("native", "assets"))
        );

        let mut value = banner_slot();
        value["mediaTypes"] = json!({ "video": { "protocols": [3, 6] } });
        assert_eq!(
            validate(&config, &slot(value)),
            Err(ValidationError::IncompleteMediaType("video", "mimes"))
        );
    }

    #[test]
    fn video_falls_back_to_stream_params() {
        let mut value = banner_slot();
        value["mediaTypes"] = json!({ "video": { "playerSize": [[640, 480]] } });
        value["params"]["stream"] = json!({
            "video": { "mimes": ["video/mp4"] },
            "protocols": [3, 6],
            "ext": { "video_cta": 0 }
        });

        let validated = validate(&AdapterConfig::default(), &slot(value)).unwrap();
        match &validated.media[0] {
            SlotMedia::Video(video) => {
                assert_eq!(video.mimes, vec!["video/mp4".to_string()]);
                assert_eq!(video.protocols, vec![3, 6]);
                assert_eq!((video.w, video.h), (Some(640), Some(480)));
                assert_eq!(video.ext, Some(json!({ "video_cta": 0 })));
            }
            other => panic!("expected video, got {:?}", other),
        }
    }

    #[test]
    fn several_media_types_keep_fixed_order() {
        let mut value = banner_slot();
        value["mediaTypes"]["video"] = json!({ "mimes": ["video/mp4"] });
        value["mediaTypes"]["native"] = json!({ "ortb": { "assets": [{ "id": 1, "title": { "len": 90 } }] } });

        let validated = validate(&AdapterConfig::default(), &slot(value)).unwrap();
        let kinds: Vec<MediaType> = validated.media.iter().map(|m| m.media_type()).collect();
        assert_eq!(kinds, vec![MediaType::Banner, MediaType::Native, MediaType::Video]);
    }
}
