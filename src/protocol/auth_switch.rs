use crate::error::{Error, Result};
use crate::io::Buf;

use super::auth_plugin::AuthPlugin;
use super::capabilities::Capabilities;
use super::encode::Encode;

/// `AuthSwitchRequest`: the server asks the client to restart authentication
/// with a different plugin (§4.4).
#[derive(Debug)]
pub(crate) struct AuthSwitchRequest {
    pub(crate) auth_plugin: AuthPlugin,
    pub(crate) auth_plugin_data: Vec<u8>,
}

impl AuthSwitchRequest {
    pub(crate) fn read(mut buf: &[u8]) -> Result<Self> {
        let header = buf.get_u8()?;
        if header != 0xFE {
            return Err(Error::protocol(format!(
                "expected auth switch request (0xFE); received 0x{header:02X}"
            )));
        }

        let auth_plugin = AuthPlugin::from_name(buf.get_str_nul()?)?;
        let mut auth_plugin_data = buf.get_bytes(buf.len())?.to_vec();
        if auth_plugin_data.last() == Some(&0) {
            auth_plugin_data.pop();
        }

        Ok(Self {
            auth_plugin,
            auth_plugin_data,
        })
    }
}

/// `AuthSwitchResponse`: the client's re-scrambled credential for the
/// plugin named by `AuthSwitchRequest`.
#[derive(Debug)]
pub(crate) struct AuthSwitchResponse<'a>(pub(crate) &'a [u8]);

impl Encode for AuthSwitchResponse<'_> {
    fn encode(&self, buf: &mut Vec<u8>, _: Capabilities) {
        buf.extend_from_slice(self.0);
    }
}
