//! Bearer tokens.
//!
//! A token reads `bs_v1_<token uuid>.<secret hex>`. Only a SHA-256 verifier of the secret, bound
//! to the token and its owner, is stored.

use std::{
    fmt::{self, Display, Formatter},
    str::FromStr,
};

use rand::{RngCore, rngs::OsRng};
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;
use thiserror::Error;
use uuid::Uuid;
use zeroize::Zeroizing;

use crate::domain::users::records::UserUuid;

const PREFIX: &str = "bs";
const SECRET_BYTES: usize = 32;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiTokenVersion {
    V1,
}

impl ApiTokenVersion {
    #[must_use]
    pub const fn as_i16(self) -> i16 {
        match self {
            Self::V1 => 1,
        }
    }
}

impl TryFrom<i16> for ApiTokenVersion {
    type Error = ApiTokenError;

    fn try_from(value: i16) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::V1),
            _ => Err(ApiTokenError::UnsupportedVersion),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ApiTokenError {
    #[error("api token format is invalid")]
    InvalidFormat,

    #[error("api token uses an unsupported version")]
    UnsupportedVersion,

    #[error("api token secret encoding is invalid")]
    InvalidSecretEncoding,
}

/// A bearer token as handed to, and presented by, a client.
#[derive(Clone)]
pub struct BearerToken {
    pub token_uuid: Uuid,
    pub version: ApiTokenVersion,
    secret: Zeroizing<[u8; SECRET_BYTES]>,
}

impl BearerToken {
    /// A fresh token with a random secret.
    #[must_use]
    pub fn generate(token_uuid: Uuid) -> Self {
        let mut secret = Zeroizing::new([0_u8; SECRET_BYTES]);

        OsRng.fill_bytes(secret.as_mut_slice());

        Self {
            token_uuid,
            version: ApiTokenVersion::V1,
            secret,
        }
    }

    /// Hex SHA-256 over the token id, version, owner and secret.
    #[must_use]
    pub fn verifier(&self, owner: UserUuid) -> String {
        let mut hasher = Sha256::new();

        hasher.update(self.token_uuid.as_bytes());
        hasher.update(self.version.as_i16().to_be_bytes());
        hasher.update(owner.into_uuid().as_bytes());
        hasher.update(self.secret.as_slice());

        hex(&hasher.finalize())
    }

    /// Check `stored` against this token's verifier without exiting early on a mismatch.
    #[must_use]
    pub fn matches(&self, owner: UserUuid, stored: &str) -> bool {
        self.verifier(owner)
            .as_bytes()
            .ct_eq(stored.as_bytes())
            .into()
    }
}

impl fmt::Debug for BearerToken {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("BearerToken")
            .field("token_uuid", &self.token_uuid)
            .field("version", &self.version)
            .finish_non_exhaustive()
    }
}

impl Display for BearerToken {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let version = match self.version {
            ApiTokenVersion::V1 => "v1",
        };

        write!(
            f,
            "{PREFIX}_{version}_{}.{}",
            self.token_uuid.simple(),
            hex(self.secret.as_slice())
        )
    }
}

impl FromStr for BearerToken {
    type Err = ApiTokenError;

    fn from_str(token: &str) -> Result<Self, Self::Err> {
        let (id, secret) = token.split_once('.').ok_or(ApiTokenError::InvalidFormat)?;

        let Some((PREFIX, rest)) = id.split_once('_') else {
            return Err(ApiTokenError::InvalidFormat);
        };

        let (version, token_uuid) = rest.split_once('_').ok_or(ApiTokenError::InvalidFormat)?;

        let version = match version {
            "v1" => ApiTokenVersion::V1,
            _ => return Err(ApiTokenError::UnsupportedVersion),
        };

        let token_uuid = Uuid::try_parse(token_uuid).map_err(|_error| ApiTokenError::InvalidFormat)?;

        Ok(Self {
            token_uuid,
            version,
            secret: unhex(secret).ok_or(ApiTokenError::InvalidSecretEncoding)?,
        })
    }
}

fn hex(bytes: &[u8]) -> String {
    bytes.iter().map(|byte| format!("{byte:02x}")).collect()
}

fn unhex(text: &str) -> Option<Zeroizing<[u8; SECRET_BYTES]>> {
    if text.len() != SECRET_BYTES * 2 {
        return None;
    }

    let mut bytes = Zeroizing::new([0_u8; SECRET_BYTES]);

    for (byte, pair) in bytes.iter_mut().zip(text.as_bytes().chunks_exact(2)) {
        let high = char::from(*pair.first()?).to_digit(16)?;
        let low = char::from(*pair.get(1)?).to_digit(16)?;

        *byte = u8::try_from(high * 16 + low).ok()?;
    }

    Some(bytes)
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn generated_token_parses_back() -> TestResult {
        let token = BearerToken::generate(Uuid::now_v7());
        let text = token.to_string();

        assert!(text.starts_with("bs_v1_"), "unexpected token shape: {text}");

        let parsed: BearerToken = text.parse()?;
        let owner = UserUuid::new();

        assert_eq!(parsed.token_uuid, token.token_uuid);
        assert!(parsed.matches(owner, &token.verifier(owner)), "secret must survive parsing");

        Ok(())
    }

    #[test]
    fn debug_hides_secret() {
        let token = BearerToken::generate(Uuid::nil());

        let secret = hex(token.secret.as_slice());

        assert!(!format!("{token:?}").contains(&secret), "secret leaked into debug output");
    }

    #[test]
    fn malformed_tokens_are_rejected() {
        let uuid = Uuid::nil().simple();

        assert_eq!(
            format!("nope_v1_{uuid}.{}", "00".repeat(32)).parse::<BearerToken>().err(),
            Some(ApiTokenError::InvalidFormat)
        );
        assert_eq!(
            format!("bs_v9_{uuid}.{}", "00".repeat(32)).parse::<BearerToken>().err(),
            Some(ApiTokenError::UnsupportedVersion)
        );
        assert_eq!(
            format!("bs_v1_{uuid}.abcd").parse::<BearerToken>().err(),
            Some(ApiTokenError::InvalidSecretEncoding)
        );
        assert_eq!(
            format!("bs_v1_{uuid}.{}", "zz".repeat(32)).parse::<BearerToken>().err(),
            Some(ApiTokenError::InvalidSecretEncoding)
        );
    }

    #[test]
    fn verifier_is_bound_to_owner() {
        let token = BearerToken::generate(Uuid::now_v7());
        let owner = UserUuid::new();

        let verifier = token.verifier(owner);

        assert_eq!(verifier.len(), 64);
        assert!(token.matches(owner, &verifier), "owner's verifier must match");
        assert!(!token.matches(UserUuid::new(), &verifier), "other users must not match");
        assert!(
            !token.matches(owner, verifier.get(..63).unwrap_or_default()),
            "a truncated verifier must not match"
        );
    }
}
