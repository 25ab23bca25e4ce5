use serde::{Deserialize, Serialize};
use serde_json::Value;

/// exads OpenRTB Bid Response
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct BidResponse {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub seatbid: Vec<SeatBid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bidid: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cur: Option<String>,
    /// no-bid reason
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nbr: Option<i32>,
}

impl BidResponse {
    pub fn bids(&self) -> impl Iterator<Item = &Bid> {
        self.seatbid.iter().flat_map(|seatbid| seatbid.bid.iter())
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct SeatBid {
    #[serde(default)]
    pub bid: Vec<Bid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seat: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct Bid {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub impid: String,
    #[serde(default)]
    pub price: f64,
    /// 创意内容：HTML、Native JSON 或 VAST XML
    #[serde(skip_serializing_if = "Option::is_none")]
    pub adm: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nurl: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cid: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub crid: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub adomain: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub w: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub h: Option<u32>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attr: Vec<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ext: Option<Value>,
}
