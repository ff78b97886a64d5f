bitflags::bitflags! {
    /// Client/server capability flags (§4.3), negotiated at handshake.
    ///
    /// The wire representation splits this into a 2-byte `capability_flags_1`
    /// and a 2-byte `capability_flags_2` (handshake v10 has no flags_3 word);
    /// this type holds the full 32-bit union so callers never juggle halves.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub(crate) struct Capabilities: u32 {
        const LONG_PASSWORD                  = 0x0000_0001;
        const FOUND_ROWS                     = 0x0000_0002;
        const LONG_FLAG                      = 0x0000_0004;
        const CONNECT_WITH_DB                = 0x0000_0008;
        const NO_SCHEMA                      = 0x0000_0010;
        const COMPRESS                       = 0x0000_0020;
        const ODBC                           = 0x0000_0040;
        const LOCAL_FILES                    = 0x0000_0080;
        const IGNORE_SPACE                   = 0x0000_0100;
        const PROTOCOL_41                    = 0x0000_0200;
        const INTERACTIVE                    = 0x0000_0400;
        const SSL                            = 0x0000_0800;
        const IGNORE_SIGPIPE                 = 0x0000_1000;
        const TRANSACTIONS                   = 0x0000_2000;
        const RESERVED                       = 0x0000_4000;
        const SECURE_CONNECTION              = 0x0000_8000;
        const MULTI_STATEMENTS               = 0x0001_0000;
        const MULTI_RESULTS                  = 0x0002_0000;
        const PS_MULTI_RESULTS               = 0x0004_0000;
        const PLUGIN_AUTH                    = 0x0008_0000;
        const CONNECT_ATTRS                  = 0x0010_0000;
        const PLUGIN_AUTH_LENENC_CLIENT_DATA = 0x0020_0000;
        const CAN_HANDLE_EXPIRED_PASSWORDS   = 0x0040_0000;
        const SESSION_TRACK                  = 0x0080_0000;
        const DEPRECATE_EOF                  = 0x0100_0000;
        const SSL_VERIFY_SERVER_CERT         = 0x4000_0000;
        const REMEMBER_OPTIONS                = 0x8000_0000;
    }
}

impl Capabilities {
    /// Flags the client always requests in `HandshakeResponse41`, regardless
    /// of what the server offers (§4.3). `MULTI_STATEMENTS` is deliberately
    /// absent: a query string with unescaped `;`-separated statements must
    /// be rejected by the server when this is unset.
    pub(crate) const CLIENT_REQUIRED: Capabilities = Capabilities::PROTOCOL_41
        .union(Capabilities::SECURE_CONNECTION)
        .union(Capabilities::PLUGIN_AUTH)
        .union(Capabilities::PLUGIN_AUTH_LENENC_CLIENT_DATA)
        .union(Capabilities::MULTI_RESULTS)
        .union(Capabilities::PS_MULTI_RESULTS)
        .union(Capabilities::TRANSACTIONS);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_only_advertises_the_intersection() {
        let server = Capabilities::PROTOCOL_41
            | Capabilities::SECURE_CONNECTION
            | Capabilities::PLUGIN_AUTH
            | Capabilities::TRANSACTIONS
            | Capabilities::COMPRESS;

        let negotiated = (server & Capabilities::all()) | Capabilities::CLIENT_REQUIRED;

        assert!(!negotiated.contains(Capabilities::MULTI_STATEMENTS));
        assert!(negotiated.contains(Capabilities::PROTOCOL_41));
    }
}
