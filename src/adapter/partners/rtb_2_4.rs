// src/adapter/partners/rtb_2_4.rs

use serde_json::{json, Value};
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::PartnerHandler;
use crate::adapter::validator::{SlotMedia, ValidatedSlot};
use crate::config::AdapterConfig;
use crate::error::Result;
use crate::model::bid::{MediaType, NormalizedBid, OutboundRequest, WinNotification};
use crate::model::context::PageContext;
use crate::model::imps::{ImpressionCache, ImpressionEntry};
use crate::model::partner::Partner;
use crate::model::slot::NativeAsset;
use crate::openrtb::request::{
    Banner, BidRequest, Device, DeviceExt, Geo, Imp, Native, NativeRequestDetail, Site, User, Video,
};
use crate::openrtb::response::{Bid, BidResponse};

/// 获胜价格宏
const AUCTION_PRICE_MACRO: &str = "${AUCTION_PRICE}";

/// exads OpenRTB 2.4 协议
pub struct Rtb24Handler;

fn non_empty(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

/// 图片资产缺少最小尺寸时，以 `w/h` 作为 `wmin/hmin`
fn with_image_minimums(assets: &[NativeAsset]) -> Vec<NativeAsset> {
    assets
        .iter()
        .cloned()
        .map(|mut asset| {
            if let Some(img) = asset.img.as_mut() {
                img.wmin = img.wmin.or(img.w);
                img.hmin = img.hmin.or(img.h);
            }
            asset
        })
        .collect()
}

/// 在 ext 对象上追加一个字符串字段
fn ext_with(ext: Option<Value>, key: &str, value: Option<&String>) -> Option<Value> {
    let Some(value) = value else {
        return ext;
    };
    let mut ext = ext.unwrap_or_else(|| json!({}));
    if let Value::Object(ref mut map) = ext {
        map.insert(key.to_string(), Value::String(value.clone()));
    }
    Some(ext)
}

impl Rtb24Handler {
    fn build_imp(&self, config: &AdapterConfig, slot: &ValidatedSlot, imp_id: String, media: &SlotMedia) -> Result<Imp> {
        let params = &slot.params;
        let imp = match media {
            SlotMedia::Banner(banner) => Imp {
                id: imp_id,
                bidfloor: params.bidfloor,
                bidfloorcur: params.bidfloorcur.clone(),
                banner: Some(Banner {
                    w: Some(banner.w),
                    h: Some(banner.h),
                }),
                ext: ext_with(None, "image_output", params.image_output.as_ref()),
                ..Default::default()
            },
            SlotMedia::Native(native) => {
                let detail = NativeRequestDetail {
                    ver: Some(config.native_version.clone()),
                    context: Some(1),
                    contextsubtype: Some(10),
                    plcmttype: Some(4),
                    plcmtcnt: native.plcmtcnt,
                    assets: with_image_minimums(&native.assets),
                };
                Imp {
                    id: imp_id,
                    bidfloor: params.bidfloor,
                    bidfloorcur: params.bidfloorcur.clone(),
                    native: Some(Native::new(&detail, &config.native_version)?),
                    ..Default::default()
                }
            }
            SlotMedia::Video(video) => Imp {
                id: imp_id,
                video: Some(Video {
                    mimes: video.mimes.clone(),
                    protocols: video.protocols.clone(),
                    w: video.w,
                    h: video.h,
                }),
                ext: ext_with(video.ext.clone(), "video_output", params.video_output.as_ref()),
                ..Default::default()
            },
        };
        Ok(imp)
    }
}

impl PartnerHandler for Rtb24Handler {
    fn partner(&self) -> Partner {
        Partner::Rtb2_4
    }

    fn build_request(
        &self,
        config: &AdapterConfig,
        slot: &ValidatedSlot,
        ctx: &PageContext,
        imps: &mut ImpressionCache,
    ) -> Result<OutboundRequest> {
        let params = &slot.params;
        let request_id = if slot.bid_id.is_empty() {
            Uuid::new_v4().to_string()
        } else {
            slot.bid_id.clone()
        };

        let mut imp_list = Vec::with_capacity(slot.media.len());
        for (index, media) in slot.media.iter().enumerate() {
            // 第一个 impression 沿用 impressionId，其余按媒体类型加后缀
            let imp_id = if index == 0 {
                slot.impression_id.clone()
            } else {
                format!("{}_{}", slot.impression_id, media.media_type())
            };
            imp_list.push(self.build_imp(config, slot, imp_id, media)?);
        }

        let bid_request = BidRequest {
            id: request_id.clone(),
            at: Some(1),
            imp: imp_list,
            site: Some(Site {
                id: params.site_id.clone(),
                domain: non_empty(&ctx.resolved_domain()),
                cat: params.cat_iab.clone(),
                page: non_empty(&ctx.page),
                keywords: params.keywords.clone(),
            }),
            device: Some(Device {
                ua: non_empty(&ctx.user_agent),
                ip: params.user_ip.clone(),
                geo: params.country.clone().map(|country| Geo {
                    country: Some(country),
                }),
                language: non_empty(&ctx.language),
                os: non_empty(&ctx.os_name),
                js: Some(0),
                ext: Some(DeviceExt {
                    remote_addr: String::new(),
                    x_forwarded_for: String::new(),
                    accept_language: ctx.accept_language.clone(),
                }),
            }),
            user: Some(User {
                id: Some(params.user_id.clone().unwrap_or_default()),
                ext: ctx.consent().map(|consent| json!({ "consent": consent })),
            }),
            ext: Some(json!({ "sub": 0 })),
            ..Default::default()
        };
        let data = serde_json::to_string(&bid_request)?;

        // 请求体生成成功后才写缓存
        for (imp, media) in bid_request.imp.iter().zip(slot.media.iter()) {
            imps.record(&imp.id, self.partner(), media.media_type());
        }

        info!(
            "rtb_2_4 request built: id={}, endpoint={}, imp_count={}",
            request_id,
            slot.endpoint,
            bid_request.imp.len()
        );

        Ok(OutboundRequest {
            method: "POST".to_string(),
            url: slot.endpoint.clone(),
            data,
            bid_id: request_id,
        })
    }

    fn interpret_bid(
        &self,
        config: &AdapterConfig,
        bid: &Bid,
        response: &BidResponse,
        original: &BidRequest,
        entry: &ImpressionEntry,
    ) -> Option<NormalizedBid> {
        if bid.price <= 0.0 {
            debug!("bid {} dropped: non-positive price {}", bid.id, bid.price);
            return None;
        }
        let Some(markup) = bid.adm.clone() else {
            warn!("bid {} dropped: no ad markup", bid.id);
            return None;
        };

        let imp = original.find_imp(&bid.impid);
        let imp_media = imp.and_then(|imp| imp.media_type());
        if let (Some(from_imp), Some(cached)) = (imp_media, entry.media_type) {
            if from_imp != cached {
                warn!(
                    "impression {} cached as {} but request carries {}",
                    bid.impid, cached, from_imp
                );
            }
        }
        let Some(media_type) = imp_media.or(entry.media_type) else {
            warn!("bid {} dropped: media type of impression {} unknown", bid.id, bid.impid);
            return None;
        };

        let bid_size = (bid.w.unwrap_or(0), bid.h.unwrap_or(0));
        let (width, height) = match media_type {
            MediaType::Banner => bid_size,
            MediaType::Native => imp
                .and_then(|imp| imp.native.as_ref())
                .and_then(|native| native.get_request_detail())
                .and_then(|detail| detail.image_size())
                .unwrap_or(bid_size),
            MediaType::Video => match imp.and_then(|imp| imp.video.as_ref()) {
                Some(Video {
                    w: Some(w),
                    h: Some(h),
                    ..
                }) => (*w, *h),
                _ => bid_size,
            },
        };

        Some(NormalizedBid {
            request_id: original.id.clone(),
            impression_id: bid.impid.clone(),
            media_type: Some(media_type),
            cpm: bid.price,
            currency: response
                .cur
                .clone()
                .unwrap_or_else(|| config.default_currency.clone()),
            width,
            height,
            markup,
            creative_id: bid.crid.clone(),
            campaign_id: bid.cid.clone(),
            advertiser_domains: bid.adomain.clone(),
            nurl: bid.nurl.clone(),
            net_revenue: config.net_revenue,
            ttl: config.ttl,
        })
    }

    fn win_notification(&self, bid: &NormalizedBid) -> Option<WinNotification> {
        let nurl = bid.nurl.as_deref().filter(|url| !url.is_empty())?;
        let url = nurl.replace(AUCTION_PRICE_MACRO, &bid.cpm.to_string());
        Some(WinNotification {
            method: "GET".to_string(),
            url,
        })
    }
}
