// src/model/imps.rs

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::model::bid::MediaType;
use crate::model::partner::Partner;

/// 构建请求时为每个 impression 记录的信息
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImpressionEntry {
    pub partner: Partner,
    pub media_type: Option<MediaType>,
}

/// impression id → 合作方 的映射
///
/// 响应中不会回传合作方，因此由请求构建器写入、响应解析器读取。
/// 由调用方按竞价周期持有，不是进程级单例。
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct ImpressionCache {
    entries: HashMap<String, ImpressionEntry>,
}

impl ImpressionCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// 记录 impression 及其媒体类型，重复的 id 以最后一次为准，返回被覆盖的旧值
    pub fn record(&mut self, imp_id: &str, partner: Partner, media_type: MediaType) -> Option<ImpressionEntry> {
        let previous = self.entries.insert(
            imp_id.to_string(),
            ImpressionEntry {
                partner,
                media_type: Some(media_type),
            },
        );
        if let Some(old) = &previous {
            warn!(
                "impression {} overwritten in cache: {}/{:?} -> {}/{}",
                imp_id, old.partner, old.media_type, partner, media_type
            );
        }
        previous
    }

    /// 只记录合作方，媒体类型留给解析器从原始请求中判断
    pub fn register_partner(&mut self, imp_id: &str, partner: Partner) {
        self.entries.insert(
            imp_id.to_string(),
            ImpressionEntry {
                partner,
                media_type: None,
            },
        );
    }

    pub fn get(&self, imp_id: &str) -> Option<&ImpressionEntry> {
        self.entries.get(imp_id)
    }

    pub fn partner(&self, imp_id: &str) -> Option<Partner> {
        self.entries.get(imp_id).map(|e| e.partner)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn later_record_overwrites_earlier() {
        let mut cache = ImpressionCache::new();
        cache.register_partner("270544423272657", Partner::Rtb2_4);
        assert_eq!(cache.get("270544423272657").unwrap().media_type, None);

        let previous = cache.record("270544423272657", Partner::Rtb2_4, MediaType::Video);
        assert_eq!(previous.map(|e| e.media_type), Some(None));
        assert_eq!(cache.len(), 1);
        assert_eq!(
            cache.get("270544423272657").unwrap().media_type,
            Some(MediaType::Video)
        );
    }

    #[test]
    fn suffixed_id_colliding_with_plain_id_reports_overwrite() {
        let mut cache = ImpressionCache::new();
        // slot A 的第二个 impression 与 slot B 的 impressionId 相同
        assert!(cache.record("123456_video", Partner::Rtb2_4, MediaType::Video).is_none());
        let previous = cache.record("123456_video", Partner::Rtb2_4, MediaType::Banner).unwrap();
        assert_eq!(previous.media_type, Some(MediaType::Video));
        assert_eq!(cache.get("123456_video").unwrap().media_type, Some(MediaType::Banner));
    }

    #[test]
    fn unknown_impression_has_no_partner() {
        let cache = ImpressionCache::new();
        assert!(cache.is_empty());
        assert_eq!(cache.partner("missing"), None);
    }
}
