//! Youdao `v3` request signing

use sha2::{Digest, Sha256};

/// Signature scheme sent as `signType`
pub const SIGN_TYPE: &str = "v3";

/// Content longer than this is folded before hashing
const FOLD_THRESHOLD: usize = 20;

/// Characters kept from each end of folded content
const FOLD_KEEP: usize = 10;

/// Fold long content into `first10 + length + last10`
///
/// Only the signature input is folded; the full text is still translated.
/// Length and ends are counted in Unicode scalar values, so characters
/// outside the BMP (emoji) count once rather than as two UTF-16 units.
pub fn content_for_sign(content: &str) -> String {
    let chars: Vec<char> = content.chars().collect();
    if chars.len() <= FOLD_THRESHOLD {
        return content.to_string();
    }

    let head: String = chars[..FOLD_KEEP].iter().collect();
    let tail: String = chars[chars.len() - FOLD_KEEP..].iter().collect();
    format!("{}{}{}", head, chars.len(), tail)
}

/// Lowercase hex SHA-256 of `appKey + folded content + salt + curtime + appSecret`
pub fn sign(content: &str, salt: &str, curtime: i64, app_key: &str, app_secret: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(app_key.as_bytes());
    hasher.update(content_for_sign(content).as_bytes());
    hasher.update(salt.as_bytes());
    hasher.update(curtime.to_string().as_bytes());
    hasher.update(app_secret.as_bytes());
    hex::encode(hasher.finalize())
}

/// Authentication parameters of one request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedRequest {
    pub content: String,
    pub app_key: String,
    pub salt: String,
    pub curtime: i64,
    pub signature: String,
}

impl SignedRequest {
    /// Sign `content` with a fresh salt and the current time
    pub fn new(content: &str, app_key: &str, app_secret: &str) -> Self {
        let salt = uuid::Uuid::new_v4().to_string();
        let curtime = chrono::Utc::now().timestamp();
        Self::with_parts(content, &salt, curtime, app_key, app_secret)
    }

    /// Sign with a given salt and timestamp
    pub fn with_parts(
        content: &str,
        salt: &str,
        curtime: i64,
        app_key: &str,
        app_secret: &str,
    ) -> Self {
        Self {
            content: content.to_string(),
            app_key: app_key.to_string(),
            salt: salt.to_string(),
            curtime,
            signature: sign(content, salt, curtime, app_key, app_secret),
        }
    }

    /// Form body for the translation endpoint
    pub fn form_params(&self, from: &str, to: &str) -> Vec<(&'static str, String)> {
        vec![
            ("q", self.content.clone()),
            ("from", from.to_string()),
            ("to", to.to_string()),
            ("appKey", self.app_key.clone()),
            ("salt", self.salt.clone()),
            ("sign", self.signature.clone()),
            ("signType", SIGN_TYPE.to_string()),
            ("curtime", self.curtime.to_string()),
        ]
    }
}
