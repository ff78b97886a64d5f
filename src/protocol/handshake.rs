use crate::error::{Error, Result};
use crate::io::Buf;

use super::auth_plugin::AuthPlugin;
use super::capabilities::Capabilities;
use super::status::Status;

/// The server's initial handshake packet (protocol version 10), §4.3.
#[derive(Debug)]
pub(crate) struct Handshake {
    pub(crate) protocol_version: u8,
    pub(crate) server_version: String,
    pub(crate) connection_id: u32,
    pub(crate) server_capabilities: Capabilities,
    pub(crate) server_default_collation: u8,
    pub(crate) status: Status,
    pub(crate) auth_plugin: AuthPlugin,
    pub(crate) auth_plugin_data: Vec<u8>,
}

impl Handshake {
    pub(crate) fn read(mut buf: &[u8]) -> Result<Self> {
        let protocol_version = buf.get_u8()?;
        if protocol_version != 10 {
            return Err(Error::protocol(format!(
                "unsupported handshake protocol version {protocol_version}"
            )));
        }

        let server_version = buf.get_str_nul()?.to_owned();
        let connection_id = buf.get_u32_le()?;

        let mut scramble = buf.get_bytes(8)?.to_vec();
        buf.advance(1); // filler

        let capabilities_lo = buf.get_u16_le()?;
        let char_set = buf.get_u8()?;
        let status = Status::from_bits_truncate(buf.get_u16_le()?);
        let capabilities_hi = buf.get_u16_le()?;

        let mut capabilities = Capabilities::from_bits_truncate(
            capabilities_lo as u32 | (capabilities_hi as u32) << 16,
        );

        let auth_plugin_data_len = if capabilities.contains(Capabilities::PLUGIN_AUTH) {
            buf.get_u8()?
        } else {
            buf.advance(1);
            0
        };

        buf.advance(10); // reserved

        if capabilities.contains(Capabilities::SECURE_CONNECTION) {
            let len = (auth_plugin_data_len as isize - 8).max(13) as usize;
            scramble.extend_from_slice(buf.get_bytes(len)?);
            // the second part is NUL-terminated in practice; trim it
            if scramble.last() == Some(&0) {
                scramble.pop();
            }
        }

        let auth_plugin = if capabilities.contains(Capabilities::PLUGIN_AUTH) {
            AuthPlugin::from_name(buf.get_str_nul()?)?
        } else {
            AuthPlugin::MySqlNativePassword
        };

        // not reflected by the server but required on our side regardless
        capabilities |= Capabilities::empty();

        Ok(Self {
            protocol_version,
            server_version,
            connection_id,
            server_capabilities: capabilities,
            server_default_collation: char_set,
            status,
            auth_plugin,
            auth_plugin_data: scramble,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HANDSHAKE_MYSQL_8_0_18: &[u8] = b"\n8.0.18\x00\x19\x00\x00\x00\x114aB0c\x06g\x00\xff\xff\xff\x02\x00\xff\xc7\x15\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00tL\x03s\x0f[4\rl4. \x00caching_sha2_password\x00";

    #[test]
    fn reads_mysql_8_0_18_handshake() {
        let p = Handshake::read(HANDSHAKE_MYSQL_8_0_18).unwrap();

        assert_eq!(p.protocol_version, 10);
        assert_eq!(&p.server_version, "8.0.18");
        assert_eq!(p.connection_id, 0x19);
        assert_eq!(p.auth_plugin, AuthPlugin::CachingSha2Password);
        assert!(p.status.contains(Status::SERVER_STATUS_AUTOCOMMIT));
        assert_eq!(p.auth_plugin_data.len(), 20);
    }
}
