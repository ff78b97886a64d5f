//! Connection bootstrap (C7, §4.2, §4.3): TCP connect, the handshake read,
//! the optional in-place TLS upgrade, `HandshakeResponse41`, and the
//! authentication loop.

use tokio::net::TcpStream;

use crate::error::{Error, Result};
use crate::net::{upgrade, MaybeTlsStream};
use crate::options::{MySqlConnectOptions, MySqlSslMode};
use crate::protocol::{
    Capabilities, Handshake, HandshakeResponse, OkPacket, PacketCodec, SslRequest,
};

use super::auth;

/// The outcome of a successful handshake: the ready-to-use packet codec plus
/// the negotiated capabilities and the server's last `OK` (carries the
/// initial status flags, e.g. autocommit).
pub(crate) struct Established {
    pub(crate) codec: PacketCodec<MaybeTlsStream>,
    pub(crate) capabilities: Capabilities,
    pub(crate) server_status: crate::protocol::Status,
    pub(crate) connection_id: u32,
    pub(crate) auth_plugin: crate::protocol::AuthPlugin,
    pub(crate) nonce: Vec<u8>,
    pub(crate) server_version: String,
}

pub(crate) async fn connect(options: &MySqlConnectOptions) -> Result<Established> {
    let tcp = TcpStream::connect((options.host.as_str(), options.port)).await?;
    options.socket_options.apply(&tcp)?;

    let mut codec = PacketCodec::new(MaybeTlsStream::Plain(tcp), options.max_allowed_packet);

    let handshake_payload = codec.read().await?;
    let handshake = Handshake::read(&handshake_payload)?;

    let mut capabilities = (handshake.server_capabilities & client_offered_capabilities(options))
        | Capabilities::CLIENT_REQUIRED;

    let wants_tls = !matches!(options.ssl_mode, MySqlSslMode::None);
    if wants_tls {
        if !handshake.server_capabilities.contains(Capabilities::SSL) {
            return Err(Error::config(
                "ssl_mode requires TLS but the server did not advertise SSL support",
            ));
        }
        capabilities |= Capabilities::SSL;
    }

    if wants_tls {
        codec.write(
            &SslRequest {
                max_packet_size: options.max_allowed_packet,
                client_collation: crate::protocol::UTF8MB4_GENERAL_CI,
            },
            capabilities,
        )?;
        codec.flush().await?;

        let seq_no = codec.seq_no();
        let tcp = match codec.into_inner() {
            MaybeTlsStream::Plain(tcp) => tcp,
            MaybeTlsStream::Tls(_) => unreachable!("connection is plaintext before SSLRequest"),
        };
        let tls_stream = upgrade(tcp, &options.host, options.ssl_ca.as_deref()).await?;

        codec = PacketCodec::new(tls_stream, options.max_allowed_packet);
        codec.set_seq_no(seq_no);
    }

    let is_tls = wants_tls;
    let password = options.password.as_deref().unwrap_or("");
    let initial_auth_plugin = handshake.auth_plugin;
    let initial_nonce = handshake.auth_plugin_data.clone();
    let initial_auth_response =
        auth::initial_response(handshake.auth_plugin, password, &handshake.auth_plugin_data, is_tls);

    codec.write(
        &HandshakeResponse {
            max_packet_size: options.max_allowed_packet,
            client_collation: crate::protocol::UTF8MB4_GENERAL_CI,
            username: &options.username,
            database: options.database.as_deref(),
            auth_plugin: handshake.auth_plugin,
            auth_response: &initial_auth_response,
        },
        capabilities,
    )?;
    codec.flush().await?;

    let ok: OkPacket = auth::complete(
        &mut codec,
        capabilities,
        password,
        is_tls,
        options.allow_public_key_retrieval,
        handshake.auth_plugin,
        handshake.auth_plugin_data,
    )
    .await?;

    Ok(Established {
        codec,
        capabilities,
        server_status: ok.status,
        connection_id: handshake.connection_id,
        auth_plugin: initial_auth_plugin,
        nonce: initial_nonce,
        server_version: handshake.server_version,
    })
}

fn client_offered_capabilities(options: &MySqlConnectOptions) -> Capabilities {
    let mut caps = Capabilities::all()
        - Capabilities::SSL
        - Capabilities::COMPRESS
        - Capabilities::MULTI_STATEMENTS
        - Capabilities::CONNECT_WITH_DB;
    if options.database.is_some() {
        caps |= Capabilities::CONNECT_WITH_DB;
    }
    caps
}
