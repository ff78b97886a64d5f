use crate::io::BufMut;

use super::auth_plugin::AuthPlugin;
use super::capabilities::Capabilities;
use super::encode::Encode;

/// `COM_CHANGE_USER` (0x11): re-authenticates the session as a different
/// user (or the same user with new credentials) without reconnecting the
/// socket (§4.4 "Change-user"). Shaped like a miniature
/// `HandshakeResponse41`; the server replies with a fresh `AuthSwitchRequest`
/// and restarts the plugin negotiation.
#[derive(Debug)]
pub(crate) struct ComChangeUser<'a> {
    pub(crate) username: &'a str,
    pub(crate) database: Option<&'a str>,
    pub(crate) client_collation: u8,
    pub(crate) auth_plugin: AuthPlugin,
    pub(crate) auth_response: &'a [u8],
}

impl Encode for ComChangeUser<'_> {
    fn encode(&self, buf: &mut Vec<u8>, capabilities: Capabilities) {
        buf.put_u8(0x11);
        buf.put_str_nul(self.username);

        if capabilities.contains(Capabilities::SECURE_CONNECTION) {
            buf.put_u8(self.auth_response.len() as u8);
            buf.extend_from_slice(self.auth_response);
        } else {
            buf.put_bytes_nul(self.auth_response);
        }

        buf.put_str_nul(self.database.unwrap_or(""));
        buf.put_u16_le(self.client_collation as u16);

        if capabilities.contains(Capabilities::PLUGIN_AUTH) {
            buf.put_str_nul(self.auth_plugin.name());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_username_auth_response_and_database() {
        let mut buf = Vec::new();
        ComChangeUser {
            username: "bob",
            database: Some("mydb"),
            client_collation: 45,
            auth_plugin: AuthPlugin::MySqlNativePassword,
            auth_response: &[1, 2, 3],
        }
        .encode(
            &mut buf,
            Capabilities::SECURE_CONNECTION | Capabilities::PLUGIN_AUTH,
        );

        assert_eq!(buf[0], 0x11);
        assert!(buf.windows(4).any(|w| w == b"bob\0"));
        assert!(buf.windows(5).any(|w| w == b"mydb\0"));
    }
}
