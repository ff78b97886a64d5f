use digest::Digest;
use memchr::memchr;
use sha1::Sha1;
use sha2::Sha256;

use crate::error::{Error, Result};

/// Authentication plugins understood by the authentication engine (C6, §4.4).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum AuthPlugin {
    MySqlNativePassword,
    Sha256Password,
    CachingSha2Password,
}

impl AuthPlugin {
    pub(crate) fn from_name(name: &str) -> Result<Self> {
        match name {
            "mysql_native_password" => Ok(AuthPlugin::MySqlNativePassword),
            "sha256_password" => Ok(AuthPlugin::Sha256Password),
            "caching_sha2_password" => Ok(AuthPlugin::CachingSha2Password),
            other => Err(Error::protocol(format!(
                "unsupported authentication plugin: {other}"
            ))),
        }
    }

    pub(crate) fn name(self) -> &'static str {
        match self {
            AuthPlugin::MySqlNativePassword => "mysql_native_password",
            AuthPlugin::Sha256Password => "sha256_password",
            AuthPlugin::CachingSha2Password => "caching_sha2_password",
        }
    }

    /// The initial-handshake scramble response for this plugin, or an empty
    /// response for an empty password (both sha256 variants send a single
    /// NUL byte for an empty password, handled by the caller).
    pub(crate) fn scramble(self, password: &str, nonce: &[u8]) -> Vec<u8> {
        match self {
            AuthPlugin::MySqlNativePassword => {
                // the nonce handed to mysql_native_password is (optionally) nul terminated
                let end = memchr(0, nonce).unwrap_or(nonce.len());
                scramble_sha1(password, &nonce[..end]).to_vec()
            }
            AuthPlugin::Sha256Password | AuthPlugin::CachingSha2Password => {
                scramble_sha256(password, nonce).to_vec()
            }
        }
    }
}

/// `SHA1(password) XOR SHA1(nonce || SHA1(SHA1(password)))` (§4.4).
fn scramble_sha1(password: &str, nonce: &[u8]) -> [u8; 20] {
    let pw_hash = Sha1::digest(password.as_bytes());
    let pw_hash_hash = Sha1::digest(pw_hash);

    let mut ctx = Sha1::new();
    ctx.update(nonce);
    ctx.update(pw_hash_hash);
    let nonce_hash = ctx.finalize();

    let mut out = [0u8; 20];
    for i in 0..20 {
        out[i] = pw_hash[i] ^ nonce_hash[i];
    }
    out
}

/// `SHA256(password) XOR SHA256(SHA256(SHA256(password)) || nonce)` (§4.4),
/// shared by `sha256_password` and `caching_sha2_password`'s first round.
fn scramble_sha256(password: &str, nonce: &[u8]) -> [u8; 32] {
    let pw_hash = Sha256::digest(password.as_bytes());
    let pw_hash_hash = Sha256::digest(pw_hash);

    let mut ctx = Sha256::new();
    ctx.update(pw_hash_hash);
    ctx.update(nonce);
    let nonce_hash = ctx.finalize();

    let mut out = [0u8; 32];
    for i in 0..32 {
        out[i] = pw_hash[i] ^ nonce_hash[i];
    }
    out
}

/// XORs `password` (plus a trailing NUL) against the scramble, repeated as
/// needed, for the RSA-encrypted full-auth path (§4.4).
pub(crate) fn xor_password_with_scramble(password: &str, scramble: &[u8]) -> Vec<u8> {
    let mut bytes: Vec<u8> = password.bytes().chain(std::iter::once(0)).collect();
    for (i, b) in bytes.iter_mut().enumerate() {
        *b ^= scramble[i % scramble.len()];
    }
    bytes
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_plugin_names() {
        assert_eq!(
            AuthPlugin::from_name("mysql_native_password").unwrap(),
            AuthPlugin::MySqlNativePassword
        );
        assert_eq!(
            AuthPlugin::from_name("caching_sha2_password").unwrap(),
            AuthPlugin::CachingSha2Password
        );
        assert!(AuthPlugin::from_name("something_else").is_err());
    }

    #[test]
    fn sha1_scramble_is_deterministic_and_reversible() {
        let nonce = b"01234567890123456789";
        let a = scramble_sha1("hunter2", nonce);
        let b = scramble_sha1("hunter2", nonce);
        assert_eq!(a, b);
        assert_ne!(a, scramble_sha1("hunter3", nonce));
    }

    #[test]
    fn xor_password_repeats_scramble() {
        let scramble = [0xAAu8, 0xBB];
        let xored = xor_password_with_scramble("ab", &scramble);
        // "ab\0" XOR "AABBAA"[..3]
        assert_eq!(xored.len(), 3);
        assert_eq!(xored[0], b'a' ^ 0xAA);
        assert_eq!(xored[1], b'b' ^ 0xBB);
        assert_eq!(xored[2], 0 ^ 0xAA);
    }
}
