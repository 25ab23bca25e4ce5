use exads_adapter::{BidAdapter, ExadsAdapter, SlotRequest};
use proptest::prelude::*;
use serde_json::json;

fn slot(media_types: serde_json::Value) -> SlotRequest {
    serde_json::from_value(json!({
        "bidder": "exadsadserver",
        "mediaTypes": media_types,
        "params": {
            "zoneId": 5147485,
            "fid": "829a896f011475d505a0d89cfdd1af8d9cdb07ff",
            "partner": "rtb_2_4",
            "impressionId": "123456",
            "endpoint": "test.com"
        }
    }))
    .unwrap()
}

fn media_types() -> impl Strategy<Value = serde_json::Value> {
    prop_oneof![
        (1u32..2000, 1u32..2000).prop_map(|(w, h)| json!({ "banner": { "sizes": [w, h] } })),
        (1u32..20).prop_map(|id| json!({ "native": { "ortb": { "assets": [{ "id": id, "title": { "len": 90 } }] } } })),
        prop::sample::select(vec!["video/mp4", "video/webm", "application/javascript"])
            .prop_map(|mime| json!({ "video": { "mimes": [mime], "protocols": [3, 6] } })),
    ]
}

proptest! {
    #[test]
    fn complete_slots_are_valid(media in media_types()) {
        prop_assert!(ExadsAdapter::default().is_bid_request_valid(&slot(media)));
    }

    #[test]
    fn foreign_bidder_codes_are_rejected(media in media_types(), bidder in "[a-z_]{1,20}") {
        prop_assume!(bidder != "exadsadserver");
        let mut slot = slot(media);
        slot.bidder = bidder;
        prop_assert!(!ExadsAdapter::default().is_bid_request_valid(&slot));
    }

    #[test]
    fn unknown_partners_are_rejected(media in media_types(), partner in "[a-z0-9_]{1,20}") {
        prop_assume!(partner != "rtb_2_4");
        let mut slot = slot(media);
        slot.params.partner = Some(partner);
        prop_assert!(!ExadsAdapter::default().is_bid_request_valid(&slot));
    }

    #[test]
    fn every_built_request_is_post(media in media_types()) {
        let adapter = ExadsAdapter::default();
        let mut imps = exads_adapter::ImpressionCache::new();
        let requests = adapter.build_requests(&[slot(media)], &Default::default(), &mut imps);
        prop_assert_eq!(requests.len(), 1);
        for request in requests {
            prop_assert_eq!(request.method.as_str(), "POST");
        }
    }
}
