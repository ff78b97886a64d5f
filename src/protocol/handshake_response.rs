use crate::io::BufMut;

use super::auth_plugin::AuthPlugin;
use super::capabilities::Capabilities;
use super::encode::Encode;

/// `HandshakeResponse41`, the client's reply to the server's handshake
/// (§4.3). Always encoded with `PROTOCOL_41` negotiated — the connection
/// fails before this point otherwise.
#[derive(Debug)]
pub(crate) struct HandshakeResponse<'a> {
    pub(crate) max_packet_size: u32,
    pub(crate) client_collation: u8,
    pub(crate) username: &'a str,
    pub(crate) database: Option<&'a str>,
    pub(crate) auth_plugin: AuthPlugin,
    pub(crate) auth_response: &'a [u8],
}

impl Encode for HandshakeResponse<'_> {
    fn encode(&self, buf: &mut Vec<u8>, capabilities: Capabilities) {
        buf.put_u32_le(capabilities.bits());
        buf.put_u32_le(self.max_packet_size);
        buf.put_u8(self.client_collation);
        buf.extend_from_slice(&[0u8; 23]); // reserved

        buf.extend_from_slice(self.username.as_bytes());
        buf.push(0);

        if capabilities.contains(Capabilities::PLUGIN_AUTH_LENENC_CLIENT_DATA) {
            buf.put_bytes_lenenc(self.auth_response);
        } else if capabilities.contains(Capabilities::SECURE_CONNECTION) {
            buf.put_u8(self.auth_response.len() as u8);
            buf.extend_from_slice(self.auth_response);
        } else {
            buf.put_u8(0);
        }

        if capabilities.contains(Capabilities::CONNECT_WITH_DB) {
            if let Some(database) = self.database {
                buf.put_str_nul(database);
            }
        }

        if capabilities.contains(Capabilities::PLUGIN_AUTH) {
            buf.put_str_nul(self.auth_plugin.name());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_username_and_auth_response() {
        let mut buf = Vec::new();
        let response = HandshakeResponse {
            max_packet_size: 16_777_215,
            client_collation: 45,
            username: "root",
            database: None,
            auth_plugin: AuthPlugin::MySqlNativePassword,
            auth_response: &[1, 2, 3],
        };

        response.encode(
            &mut buf,
            Capabilities::PROTOCOL_41
                | Capabilities::SECURE_CONNECTION
                | Capabilities::PLUGIN_AUTH,
        );

        assert!(buf.windows(4).any(|w| w == b"root"));
        assert!(buf
            .windows(b"mysql_native_password".len())
            .any(|w| w == b"mysql_native_password"));
    }
}
