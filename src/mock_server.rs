use axum::response::{IntoResponse, Response};
use axum::{http::StatusCode, routing::post, serve, Json, Router};
use rand::Rng;
use tokio::net::TcpListener;
use tokio::time::{sleep, Duration};
use tracing::info;

use crate::model::bid::MediaType;
use crate::openrtb::request::{BidRequest, Imp};
use crate::openrtb::response::{Bid, BidResponse, SeatBid};

/// 根据 impression 类型生成模拟创意
fn mock_markup(media_type: MediaType, bid_id: &str) -> String {
    match media_type {
        MediaType::Banner => format!(
            "<html><body>Mock exads Banner Ad<br/><a href=\"http://ad-tracker.local/click?bid={bid_id}\" target=\"_blank\">Click Here</a><img src=\"http://ad-tracker.local/impression?bid={bid_id}\" style=\"display:none;\" /></body></html>",
            bid_id = bid_id
        ),
        MediaType::Native => format!(
            r#"{{"native":{{"link":{{"url":"http://ad-tracker.local/click?bid={bid_id}"}},"eventtrackers":[{{"event":1,"method":1,"url":"http://ad-tracker.local/impression?bid={bid_id}"}}],"assets":[{{"id":1,"title":{{"text":"Mock Native Ad"}}}},{{"id":3,"img":{{"url":"http://example.com/native.jpg"}}}}]}}}}"#,
            bid_id = bid_id
        ),
        MediaType::Video => format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<VAST version="3.0">
  <Ad id="{bid_id}">
    <InLine>
      <AdSystem>Mock exads</AdSystem>
      <AdTitle>Mock Video Ad</AdTitle>
      <Impression><![CDATA[http://ad-tracker.local/impression?bid={bid_id}]]></Impression>
      <Creatives>
        <Creative>
          <Linear>
            <Duration>00:00:20</Duration>
            <MediaFiles>
              <MediaFile delivery="progressive" type="video/mp4"><![CDATA[http://example.com/video.mp4]]></MediaFile>
            </MediaFiles>
          </Linear>
        </Creative>
      </Creatives>
    </InLine>
  </Ad>
</VAST>"#,
            bid_id = bid_id
        ),
    }
}

fn mock_bid(imp: &Imp) -> Option<Bid> {
    let media_type = imp.media_type()?;
    let bid_id = format!("bid-{}", imp.id);
    let mut rng = rand::thread_rng();
    // 底价太低时按固定区间出价
    let floor = imp.bidfloor.unwrap_or(0.0).max(0.001);
    let price = floor * rng.gen_range(1.0..3.0);
    let (w, h) = match (media_type, imp.banner.as_ref()) {
        (MediaType::Banner, Some(banner)) => (banner.w, banner.h),
        _ => (Some(0), Some(0)),
    };
    Some(Bid {
        id: bid_id.clone(),
        impid: imp.id.clone(),
        price,
        adm: Some(mock_markup(media_type, &bid_id)),
        nurl: Some(format!("http://ad-tracker.local/win?bid={}&price=${{AUCTION_PRICE}}", bid_id)),
        cid: Some("6260389".to_string()),
        crid: Some(format!("cr-{}", imp.id)),
        adomain: vec!["example.com".to_string()],
        w,
        h,
        ..Default::default()
    })
}

/// 模拟 exads 竞价接口，每个带媒体类型的 impression 出一个价
async fn handle_rtb(Json(request): Json<BidRequest>) -> Response {
    info!(
        "Mock exads received BidRequest: id={}, imp_count={}",
        request.id,
        request.imp.len()
    );

    // 模拟处理延迟（20 ~ 80 毫秒）
    let delay_ms = rand::thread_rng().gen_range(20..80);
    sleep(Duration::from_millis(delay_ms)).await;

    let bids: Vec<Bid> = request.imp.iter().filter_map(mock_bid).collect();
    if bids.is_empty() {
        return StatusCode::NO_CONTENT.into_response();
    }

    Json(BidResponse {
        id: request.id.clone(),
        seatbid: vec![SeatBid {
            bid: bids,
            seat: Some("mock_seat".to_string()),
        }],
        cur: Some("USD".to_string()),
        ..Default::default()
    })
    .into_response()
}

pub fn router() -> Router {
    Router::new().route("/rtb", post(handle_rtb))
}

/// 启动模拟广告服务器，路由为 `/rtb`
pub async fn start_mock_server(port: u16) -> std::io::Result<()> {
    let addr = format!("0.0.0.0:{}", port);
    info!("Mock exads running at http://{}", addr);

    let listener = TcpListener::bind(&addr).await?;
    serve(listener, router()).await
}
