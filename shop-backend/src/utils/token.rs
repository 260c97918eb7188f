// shop-backend/src/utils/token.rs

use rand::Rng;
use sha2::{Digest, Sha256};

/// 32バイトのランダム値を16進文字列のトークンとして生成
pub fn generate_token() -> String {
    let bytes: [u8; 32] = rand::thread_rng().gen();
    hex::encode(bytes)
}

/// 保存用にトークンをSHA-256でハッシュ化
pub fn hash_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    hex::encode(hasher.finalize())
}
