//! Verification of identity assertions issued by the external auth service.
//!
//! Token layout: `v1.{user_id}.{role}.{issued_at_unix}.{hex(hmac_sha256)}`,
//! where the MAC covers everything before the last dot.

use chrono::{DateTime, Duration, TimeZone, Utc};
use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, SecretString};
use sha2::Sha256;
use thiserror::Error;

use crate::domain::user::{Identity, UserId, UserRole};

type HmacSha256 = Hmac<Sha256>;

pub const TOKEN_VERSION: &str = "v1";

/// Tolerated clock drift between the issuer and this service.
const MAX_CLOCK_SKEW_SECS: i64 = 60;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum IdentityError {
    #[error("missing identity token")]
    Missing,
    #[error("malformed identity token")]
    Malformed,
    #[error("unsupported identity token version `{0}`")]
    UnsupportedVersion(String),
    #[error("unknown role `{0}`")]
    UnknownRole(String),
    #[error("identity token signature mismatch")]
    BadSignature,
    #[error("identity token expired")]
    Expired,
    #[error("identity token issued in the future")]
    IssuedInFuture,
}

#[derive(Clone, Debug)]
pub struct IdentitySigner {
    secret: SecretString,
}

impl IdentitySigner {
    pub fn new(secret: SecretString) -> Self {
        Self { secret }
    }

    pub fn issue(&self, identity: Identity, issued_at: DateTime<Utc>) -> String {
        let claims = format!(
            "{TOKEN_VERSION}.{}.{}.{}",
            identity.user_id.0,
            identity.role.as_str(),
            issued_at.timestamp()
        );
        let signature = encode_hex(&sign(&self.secret, claims.as_bytes()));
        format!("{claims}.{signature}")
    }
}

#[derive(Clone, Debug)]
pub struct IdentityVerifier {
    secret: SecretString,
    max_age: Duration,
}

impl IdentityVerifier {
    pub fn new(secret: SecretString, max_age_secs: u64) -> Self {
        let seconds = i64::try_from(max_age_secs).unwrap_or(i64::MAX).min(i64::MAX / 1000);
        let max_age = Duration::seconds(seconds);
        Self { secret, max_age }
    }

    pub fn verify_now(&self, token: &str) -> Result<Identity, IdentityError> {
        self.verify(token, Utc::now())
    }

    pub fn verify(&self, token: &str, now: DateTime<Utc>) -> Result<Identity, IdentityError> {
        let token = token.trim();
        if token.is_empty() {
            return Err(IdentityError::Missing);
        }

        let (claims, signature) = token.rsplit_once('.').ok_or(IdentityError::Malformed)?;
        let parts: Vec<&str> = claims.split('.').collect();
        let [version, user_id, role, issued_at] = parts.as_slice() else {
            return Err(IdentityError::Malformed);
        };

        if *version != TOKEN_VERSION {
            return Err(IdentityError::UnsupportedVersion((*version).to_string()));
        }

        let signature = decode_hex(signature).ok_or(IdentityError::Malformed)?;
        let mut mac = HmacSha256::new_from_slice(self.secret.expose_secret().as_bytes())
            .map_err(|_| IdentityError::BadSignature)?;
        mac.update(claims.as_bytes());
        mac.verify_slice(&signature).map_err(|_| IdentityError::BadSignature)?;

        let user_id = user_id.parse::<i64>().map_err(|_| IdentityError::Malformed)?;
        let role = role.parse::<UserRole>()?;
        let issued_at = issued_at
            .parse::<i64>()
            .ok()
            .and_then(|seconds| Utc.timestamp_opt(seconds, 0).single())
            .ok_or(IdentityError::Malformed)?;

        if issued_at - now > Duration::seconds(MAX_CLOCK_SKEW_SECS) {
            return Err(IdentityError::IssuedInFuture);
        }
        if now - issued_at > self.max_age {
            return Err(IdentityError::Expired);
        }

        Ok(Identity::new(UserId(user_id), role))
    }
}

fn sign(secret: &SecretString, payload: &[u8]) -> Vec<u8> {
    // HMAC accepts keys of any length, so construction cannot fail here.
    let mut mac = match HmacSha256::new_from_slice(secret.expose_secret().as_bytes()) {
        Ok(mac) => mac,
        Err(_) => return Vec::new(),
    };
    mac.update(payload);
    mac.finalize().into_bytes().to_vec()
}

fn encode_hex(bytes: &[u8]) -> String {
    let mut output = String::with_capacity(bytes.len() * 2);
    for byte in bytes {
        output.push_str(&format!("{byte:02x}"));
    }
    output
}

fn decode_hex(value: &str) -> Option<Vec<u8>> {
    if value.len() % 2 != 0 || !value.is_ascii() {
        return None;
    }
    (0..value.len())
        .step_by(2)
        .map(|index| u8::from_str_radix(&value[index..index + 2], 16).ok())
        .collect()
}
