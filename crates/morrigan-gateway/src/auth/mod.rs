//! Identity attachment
//!
//! Validates bearer tokens and attaches the resulting [`AuthenticatedIdentity`]
//! to the request. Authorization itself is the security gate's job: this layer
//! never rejects, it only attaches or doesn't.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::Response,
};
use hmac::{Hmac, Mac};
use morrigan_core::{AuthSettings, AuthenticatedIdentity};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use tracing::{debug, warn};

type HmacSha256 = Hmac<Sha256>;

/// Claims carried by an identity token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IdentityClaims {
    pub sub: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub functions: Option<Vec<String>>,
    pub iat: i64,
    pub exp: i64,
}

impl From<IdentityClaims> for AuthenticatedIdentity {
    fn from(claims: IdentityClaims) -> Self {
        AuthenticatedIdentity {
            subject: claims.sub,
            functions: claims.functions,
        }
    }
}

/// Create a signed identity token valid for `expires_in` seconds.
pub fn create_identity_token(
    identity: &AuthenticatedIdentity,
    expires_in: i64,
    secret: &[u8],
) -> anyhow::Result<String> {
    let now = chrono::Utc::now().timestamp();
    let claims = IdentityClaims {
        sub: identity.subject.clone(),
        functions: identity.functions.clone(),
        iat: now,
        exp: now.saturating_add(expires_in),
    };

    sign_token(&serde_json::to_string(&claims)?, secret)
}

/// Validate a token and extract its claims.
///
/// Token format: `base64url(payload).base64url(signature)`
pub fn validate_identity_token(token: &str, secret: &[u8]) -> Option<IdentityClaims> {
    let (payload_b64, signature_b64) = match token.split_once('.') {
        Some((payload, signature)) if !signature.contains('.') => (payload, signature),
        _ => {
            debug!("[Auth] Invalid token format");
            return None;
        }
    };

    let mut mac = HmacSha256::new_from_slice(secret).ok()?;
    mac.update(payload_b64.as_bytes());

    let signature = base64_url_decode(signature_b64)?;
    if mac.verify_slice(&signature).is_err() {
        debug!("[Auth] Invalid token signature");
        return None;
    }

    let payload = base64_url_decode(payload_b64)?;
    let claims: IdentityClaims = serde_json::from_slice(&payload).ok()?;

    let now = chrono::Utc::now().timestamp();
    if now > claims.exp {
        debug!("[Auth] Token expired at {}, now is {}", claims.exp, now);
        return None;
    }

    Some(claims)
}

fn sign_token(payload: &str, secret: &[u8]) -> anyhow::Result<String> {
    let payload_b64 = base64_url_encode(payload.as_bytes());

    let mut mac = HmacSha256::new_from_slice(secret)?;
    mac.update(payload_b64.as_bytes());
    let signature = mac.finalize().into_bytes();

    Ok(format!("{}.{}", payload_b64, base64_url_encode(&signature)))
}

/// Base64 URL-safe encoding (no padding)
fn base64_url_encode(data: &[u8]) -> String {
    use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
    URL_SAFE_NO_PAD.encode(data)
}

fn base64_url_decode(s: &str) -> Option<Vec<u8>> {
    use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
    URL_SAFE_NO_PAD.decode(s).ok()
}

/// Turns request headers into an identity.
#[derive(Clone)]
pub struct IdentityVerifier {
    secret: Option<Vec<u8>>,
}

impl IdentityVerifier {
    pub fn new(secret: Option<Vec<u8>>) -> Self {
        Self { secret }
    }

    pub fn from_settings(settings: &AuthSettings) -> Self {
        if settings.token_secret.is_none() {
            warn!("[Auth] No token secret configured - no request will carry an identity");
        }
        Self::new(
            settings
                .token_secret
                .as_ref()
                .map(|secret| secret.as_bytes().to_vec()),
        )
    }

    pub fn is_enabled(&self) -> bool {
        self.secret.is_some()
    }

    /// Identity from `Authorization: Bearer <token>`, if present and valid.
    pub fn identify(&self, headers: &HeaderMap) -> Option<AuthenticatedIdentity> {
        let secret = self.secret.as_deref()?;
        let token = headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))?;

        validate_identity_token(token.trim(), secret).map(AuthenticatedIdentity::from)
    }
}

/// Attach an [`AuthenticatedIdentity`] when the request carries a valid token.
pub async fn identity_middleware(
    State(verifier): State<Arc<IdentityVerifier>>,
    mut request: Request,
    next: Next,
) -> Response {
    if let Some(identity) = verifier.identify(request.headers()) {
        debug!("[Auth] Request identified as '{}'", identity.subject);
        request.extensions_mut().insert(identity);
    }
    next.run(request).await
}
