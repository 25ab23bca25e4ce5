use std::sync::Arc;
use std::time::Duration;

use axum::{routing::post, serve, Router};
use exads_adapter::api::handlers::{handle_auction, AuctionRequest};
use exads_adapter::api::AppState;
use exads_adapter::bidding::dispatcher::Dispatcher;
use exads_adapter::{mock_server, BidAdapter, ExadsAdapter, ImpressionCache, MediaType, PageContext, SlotRequest};
use serde_json::json;
use tokio::net::TcpListener;

async fn spawn_mock() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        serve(listener, mock_server::router()).await.unwrap();
    });
    format!("http://{}/rtb", addr)
}

fn slot(bid_id: &str, impression_id: &str, endpoint: &str, media_types: serde_json::Value) -> SlotRequest {
    serde_json::from_value(json!({
        "bidder": "exadsadserver",
        "bidId": bid_id,
        "mediaTypes": media_types,
        "params": {
            "zoneId": 5147485,
            "fid": "829a896f011475d505a0d89cfdd1af8d9cdb07ff",
            "partner": "rtb_2_4",
            "impressionId": impression_id,
            "bidfloor": 0.5,
            "bidfloorcur": "EUR",
            "endpoint": endpoint
        }
    }))
    .unwrap()
}

#[tokio::test]
async fn dispatched_requests_come_back_as_normalized_bids() {
    let endpoint = spawn_mock().await;
    let adapter = ExadsAdapter::default();
    let slots = vec![
        slot("a", "imp-a", &endpoint, json!({ "banner": { "sizes": [[300, 250]] } })),
        slot("b", "imp-b", &endpoint, json!({ "video": { "mimes": ["video/mp4"], "playerSize": [640, 480] } })),
    ];

    let mut imps = ImpressionCache::new();
    let requests = adapter.build_requests(&slots, &PageContext::default(), &mut imps);
    let outcomes = Dispatcher::new(2000).send_all(requests).await;
    assert_eq!(outcomes.len(), 2);

    let mut bids = Vec::new();
    for outcome in &outcomes {
        assert_eq!(outcome.status(), "success");
        let response = outcome.result.as_ref().unwrap().as_ref().unwrap();
        bids.extend(adapter.interpret_response(response, &outcome.request, &imps));
    }

    assert_eq!(bids.len(), 2);
    let banner = bids.iter().find(|b| b.impression_id == "imp-a").unwrap();
    assert_eq!(banner.media_type, Some(MediaType::Banner));
    assert_eq!((banner.width, banner.height), (300, 250));
    assert!(banner.cpm >= 0.5);

    let video = bids.iter().find(|b| b.impression_id == "imp-b").unwrap();
    assert_eq!(video.media_type, Some(MediaType::Video));
    assert_eq!((video.width, video.height), (640, 480));
    assert!(video.markup.contains("<VAST"));

    let notice = adapter.on_bid_won(banner, &imps).unwrap();
    assert!(notice.url.contains(&format!("price={}", banner.cpm)));
}

#[tokio::test]
async fn unreachable_endpoint_is_reported_not_raised() {
    let adapter = ExadsAdapter::default();
    let slots = vec![slot("a", "imp-a", "http://127.0.0.1:1/rtb", json!({ "banner": { "sizes": [300, 250] } }))];

    let mut imps = ImpressionCache::new();
    let requests = adapter.build_requests(&slots, &PageContext::default(), &mut imps);
    let outcomes = Dispatcher::new(500).send_all(requests).await;

    assert_eq!(outcomes.len(), 1);
    assert!(outcomes[0].result.is_err());
    assert_ne!(outcomes[0].status(), "success");
}

/// 响应头和响应体各自延迟 150ms
async fn slow_rtb() -> axum::response::Response {
    tokio::time::sleep(Duration::from_millis(150)).await;
    let body = futures::stream::once(async {
        tokio::time::sleep(Duration::from_millis(150)).await;
        Ok::<_, std::io::Error>(r#"{"id":"slow","seatbid":[]}"#.to_string())
    });
    axum::response::Response::new(axum::body::Body::from_stream(body))
}

#[tokio::test]
async fn timeout_covers_headers_and_body_together() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        serve(listener, Router::new().route("/rtb", post(slow_rtb))).await.unwrap();
    });
    let endpoint = format!("http://{}/rtb", addr);

    let adapter = ExadsAdapter::default();
    let slots = vec![slot("a", "imp-a", &endpoint, json!({ "banner": { "sizes": [300, 250] } }))];
    let mut imps = ImpressionCache::new();
    let requests = adapter.build_requests(&slots, &PageContext::default(), &mut imps);
    let outcomes = Dispatcher::new(200).send_all(requests).await;

    assert_eq!(outcomes[0].status(), "timeout");
    assert!(outcomes[0].elapsed_ms < 300);
}

#[tokio::test]
async fn auction_handler_runs_one_cycle() {
    let endpoint = spawn_mock().await;
    let state = Arc::new(AppState {
        adapter: Arc::new(ExadsAdapter::default()),
        dispatcher: Arc::new(Dispatcher::new(2000)),
    });
    let auction = AuctionRequest {
        slots: vec![
            serde_json::to_value(slot("a", "imp-a", &endpoint, json!({ "banner": { "sizes": [300, 250] } }))).unwrap(),
            serde_json::to_value(slot("b", "imp-b", &endpoint, json!({}))).unwrap(),
            json!({ "bidder": "exadsadserver", "params": { "zoneId": "5147485" } }),
        ],
        context: PageContext::default(),
    };

    let (status, axum::Json(response)) =
        handle_auction(axum::extract::State(state), axum::Json(auction)).await;

    assert_eq!(status, axum::http::StatusCode::OK);
    assert_eq!(response.bids.len(), 1);
    assert_eq!(response.bids[0].impression_id, "imp-a");
}
