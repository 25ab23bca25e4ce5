// src/model/partner.rs

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// 广告服务器支持的对接协议（合作方）
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Partner {
    #[serde(rename = "rtb_2_4")]
    Rtb2_4,
}

impl Partner {
    pub fn as_str(&self) -> &'static str {
        match self {
            Partner::Rtb2_4 => "rtb_2_4",
        }
    }
}

impl FromStr for Partner {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "rtb_2_4" => Ok(Partner::Rtb2_4),
            _ => Err(format!("Invalid value for Partner: {}", value)),
        }
    }
}

impl fmt::Display for Partner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
