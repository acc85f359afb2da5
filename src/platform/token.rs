//! Server-side token signing
//!
//! The chat platform authenticates server requests with an HS256 JWT whose
//! payload is `{"server": true}`, signed with the API secret.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

const JWT_HEADER: &str = r#"{"alg":"HS256","typ":"JWT"}"#;
const SERVER_CLAIMS: &str = r#"{"server":true}"#;

/// Create the server token for the given API secret
pub fn server_token(api_secret: &str) -> Result<String, String> {
    let signing_input = format!(
        "{}.{}",
        URL_SAFE_NO_PAD.encode(JWT_HEADER),
        URL_SAFE_NO_PAD.encode(SERVER_CLAIMS)
    );

    let mut mac = HmacSha256::new_from_slice(api_secret.as_bytes()).map_err(|e| e.to_string())?;
    mac.update(signing_input.as_bytes());
    let signature = URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes());

    Ok(format!("{}.{}", signing_input, signature))
}
