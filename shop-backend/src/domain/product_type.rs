// shop-backend/src/domain/product_type.rs

use serde::{Deserialize, Serialize};
use std::fmt;

/// 商品種別
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProductType {
    Physical,
    Digital,
}

impl ProductType {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "PHYSICAL" => Some(Self::Physical),
            "DIGITAL" => Some(Self::Digital),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Physical => "PHYSICAL",
            Self::Digital => "DIGITAL",
        }
    }

    /// 在庫管理の対象かどうか（デジタル商品は在庫を消費しない）
    pub fn tracks_stock(&self) -> bool {
        matches!(self, Self::Physical)
    }
}

impl Default for ProductType {
    fn default() -> Self {
        Self::Physical
    }
}

impl fmt::Display for ProductType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
