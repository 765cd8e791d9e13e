/// Email verification codes
///
/// Codes are six decimal digits, zero-padded, drawn from the OS RNG and valid
/// for 24 hours after issuance. A code is single-use: it is deleted once an
/// account is verified with it.
use chrono::{DateTime, Duration, Utc};
use rand::{rngs::OsRng, RngCore};

use crate::error::{ServiceError, ServiceResult};

/// Number of digits in a verification code
pub const CODE_LENGTH: usize = 6;

const CODE_SPACE: u32 = 1_000_000;

/// How long a freshly issued code stays valid
pub fn code_ttl() -> Duration {
    Duration::hours(24)
}

/// Generates a 6-digit, zero-padded verification code
///
/// Three random bytes from the OS RNG, reduced modulo 1,000,000.
pub fn generate_code() -> String {
    let mut bytes = [0u8; 3];
    OsRng.fill_bytes(&mut bytes);
    code_from_bytes(bytes)
}

fn code_from_bytes(bytes: [u8; 3]) -> String {
    let value = u32::from_be_bytes([0, bytes[0], bytes[1], bytes[2]]) % CODE_SPACE;
    format!("{:06}", value)
}

/// Absolute expiry for a code issued at `issued_at`
pub fn code_expiry(issued_at: DateTime<Utc>) -> DateTime<Utc> {
    issued_at + code_ttl()
}

/// Rejects a code whose expiry is at or before `now`
pub fn check_not_expired(expires_at: DateTime<Utc>, now: DateTime<Utc>) -> ServiceResult<()> {
    if now >= expires_at {
        return Err(ServiceError::ExpiredCode);
    }
    Ok(())
}

/// Whether `code` has the shape of a verification code
pub fn is_well_formed(code: &str) -> bool {
    code.len() == CODE_LENGTH && code.bytes().all(|b| b.is_ascii_digit())
}
