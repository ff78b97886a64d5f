//! Authentication plugin orchestration (C6, §4.4): the multi-round exchange
//! that follows the initial handshake, covering plugin switches, the
//! `caching_sha2_password` fast/full-auth cue, and RSA public-key retrieval
//! for `sha256_password`/`caching_sha2_password` over a plaintext channel.

use rsa::pkcs8::DecodePublicKey;
use rsa::{Oaep, RsaPublicKey};
use sha1::Sha1;
use tokio::io::{AsyncRead, AsyncWrite};

use crate::error::{Error, Result};
use crate::protocol::{
    AuthPlugin, AuthSwitchRequest, AuthSwitchResponse, Capabilities, ErrPacket, OkPacket,
    PacketCodec,
};

/// The auth-response bytes to embed in `HandshakeResponse41` for a freshly
/// selected plugin and nonce (§4.4). `sha256_password` with a non-empty
/// password and no TLS can't produce a useful initial response without a
/// round trip, so it asks for the server's public key instead (`0x01`); the
/// main loop completes authentication once that key arrives.
pub(crate) fn initial_response(plugin: AuthPlugin, password: &str, nonce: &[u8], is_tls: bool) -> Vec<u8> {
    if password.is_empty() {
        return Vec::new();
    }

    match plugin {
        AuthPlugin::MySqlNativePassword | AuthPlugin::CachingSha2Password => {
            plugin.scramble(password, nonce)
        }
        AuthPlugin::Sha256Password => {
            if is_tls {
                let mut bytes = password.as_bytes().to_vec();
                bytes.push(0);
                bytes
            } else {
                vec![0x01]
            }
        }
    }
}

/// Drives the authentication loop to completion after `HandshakeResponse41`
/// has been sent, returning the server's final `OK` packet.
pub(crate) async fn complete<S>(
    codec: &mut PacketCodec<S>,
    capabilities: Capabilities,
    password: &str,
    is_tls: bool,
    allow_public_key_retrieval: bool,
    mut plugin: AuthPlugin,
    mut nonce: Vec<u8>,
) -> Result<OkPacket>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    loop {
        let payload = codec.read().await?;

        match payload.first().copied() {
            Some(0x00) => return OkPacket::read(&payload),
            Some(0xFF) => return Err(Error::from(ErrPacket::read(&payload)?)),

            Some(0xFE) => {
                let switch = AuthSwitchRequest::read(&payload)?;
                plugin = switch.auth_plugin;
                nonce = switch.auth_plugin_data;

                let response = initial_plugin_response(plugin, password, &nonce, is_tls);
                codec.write(&AuthSwitchResponse(&response), capabilities)?;
                codec.flush().await?;
            }

            Some(0x01) if payload.len() == 2 && matches!(payload[1], 0x03 | 0x04) => {
                if payload[1] == 0x04 {
                    full_auth(
                        codec,
                        capabilities,
                        password,
                        is_tls,
                        allow_public_key_retrieval,
                        &nonce,
                    )
                    .await?;
                }
                // 0x03 (fast_auth_success): the next packet is the final OK.
            }

            Some(0x01) => {
                // unsolicited public key delivery (sha256_password's reply
                // to the `0x01` request embedded in the initial response).
                if !is_tls && !allow_public_key_retrieval {
                    return Err(Error::auth(
                        "full authentication requires TLS or allow_public_key_retrieval=true",
                    ));
                }
                let public_key_pem = std::str::from_utf8(&payload[1..])
                    .map_err(|e| Error::protocol(format!("invalid public key encoding: {e}")))?;
                let encrypted = encrypt_password_with_public_key(password, &nonce, public_key_pem)?;
                codec.write(&&encrypted[..], capabilities)?;
                codec.flush().await?;
            }

            _ => return Err(Error::protocol("unexpected packet during authentication")),
        }
    }
}

/// As [`initial_response`], but used mid-auth-switch where there is no
/// `HandshakeResponse41` to embed the bytes in; they are sent as a standalone
/// `AuthSwitchResponse` instead.
fn initial_plugin_response(plugin: AuthPlugin, password: &str, nonce: &[u8], is_tls: bool) -> Vec<u8> {
    initial_response(plugin, password, nonce, is_tls)
}

/// Performs the `perform_full_authentication (0x04)` continuation shared by
/// `sha256_password` and `caching_sha2_password` (§4.4): cleartext password
/// over TLS, or RSA-OAEP-encrypted scrambled password over plaintext.
async fn full_auth<S>(
    codec: &mut PacketCodec<S>,
    capabilities: Capabilities,
    password: &str,
    is_tls: bool,
    allow_public_key_retrieval: bool,
    nonce: &[u8],
) -> Result<()>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    if password.is_empty() {
        codec.write(&&[0u8][..], capabilities)?;
        codec.flush().await?;
        return Ok(());
    }

    if is_tls {
        let mut bytes = password.as_bytes().to_vec();
        bytes.push(0);
        codec.write(&&bytes[..], capabilities)?;
        codec.flush().await?;
        return Ok(());
    }

    if !allow_public_key_retrieval {
        return Err(Error::auth(
            "full authentication requires TLS or allow_public_key_retrieval=true",
        ));
    }

    // request the server's public key
    codec.write(&&[0x02u8][..], capabilities)?;
    codec.flush().await?;

    let payload = codec.read().await?;
    if payload.first().copied() != Some(0x01) {
        return Err(Error::protocol("expected public key in AuthMoreData"));
    }
    let public_key_pem = std::str::from_utf8(&payload[1..])
        .map_err(|e| Error::protocol(format!("invalid public key encoding: {e}")))?;

    let encrypted = encrypt_password_with_public_key(password, nonce, public_key_pem)?;
    codec.write(&&encrypted[..], capabilities)?;
    codec.flush().await?;

    Ok(())
}

fn encrypt_password_with_public_key(password: &str, nonce: &[u8], pem: &str) -> Result<Vec<u8>> {
    let public_key = RsaPublicKey::from_public_key_pem(pem)
        .map_err(|e| Error::auth(format!("invalid server public key: {e}")))?;

    let xored = crate::protocol::xor_password_with_scramble(password, nonce);

    let mut rng = rand::thread_rng();
    public_key
        .encrypt(&mut rng, Oaep::new::<Sha1>(), &xored)
        .map_err(|e| Error::auth(format!("RSA encryption of password failed: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_password_sends_no_initial_response() {
        assert!(initial_response(AuthPlugin::MySqlNativePassword, "", b"nonce", false).is_empty());
    }

    #[test]
    fn sha256_without_tls_requests_the_public_key() {
        let response = initial_response(AuthPlugin::Sha256Password, "secret", b"nonce", false);
        assert_eq!(response, vec![0x01]);
    }

    #[test]
    fn sha256_over_tls_sends_cleartext_password() {
        let response = initial_response(AuthPlugin::Sha256Password, "secret", b"nonce", true);
        assert_eq!(response, b"secret\0");
    }

    #[test]
    fn caching_sha2_always_sends_the_scramble() {
        let response = initial_response(AuthPlugin::CachingSha2Password, "secret", b"01234567890123456789", false);
        assert_eq!(response.len(), 32);
    }
}
