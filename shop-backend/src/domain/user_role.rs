// shop-backend/src/domain/user_role.rs

use serde::{Deserialize, Serialize};
use std::fmt;

/// ユーザーのロール
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserRole {
    Admin,
    Provider,
    Customer,
}

impl UserRole {
    /// 文字列からUserRoleに変換（大文字小文字・前後空白は無視）
    ///
    /// 不正な値は `None` を返す。検索条件では「フィルタ省略」として扱われる。
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "ADMIN" => Some(Self::Admin),
            "PROVIDER" => Some(Self::Provider),
            "CUSTOMER" => Some(Self::Customer),
            _ => None,
        }
    }

    /// DBに保存する文字列表現
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "ADMIN",
            Self::Provider => "PROVIDER",
            Self::Customer => "CUSTOMER",
        }
    }

    pub fn all() -> Vec<Self> {
        vec![Self::Admin, Self::Provider, Self::Customer]
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, Self::Admin)
    }
}

impl Default for UserRole {
    fn default() -> Self {
        Self::Customer
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| {
            format!(
                "Invalid role: '{}'. Valid roles are: {}",
                s,
                Self::all()
                    .iter()
                    .map(|r| r.as_str())
                    .collect::<Vec<_>>()
                    .join(", ")
            )
        })
    }
}
