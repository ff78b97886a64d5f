//! The MySQL client/server wire protocol (C1, C2): packet framing, the
//! handshake/authentication packets, and the command/response packets used
//! by the connection state machine and result-set engine.

mod auth_plugin;
mod auth_switch;
mod binary;
mod capabilities;
mod charset;
mod column_count;
mod column_def;
mod column_flags;
mod com_change_user;
mod com_init_db;
mod com_ping;
mod com_quit;
mod com_reset_connection;
mod com_statistics;
mod encode;
mod eof;
mod err;
mod handshake;
mod handshake_response;
mod ok;
mod packet;
mod ssl_request;
mod status;
mod text;
mod type_id;

pub(crate) use auth_plugin::{xor_password_with_scramble, AuthPlugin};
pub(crate) use auth_switch::{AuthSwitchRequest, AuthSwitchResponse};
pub(crate) use binary::{
    BinaryRow, ComStmtClose, ComStmtExecute, ComStmtFetch, ComStmtPrepare, ComStmtPrepareOk,
    ComStmtReset, Cursor, ParamType,
};
pub(crate) use capabilities::Capabilities;
pub(crate) use charset::{is_binary_collation, BINARY, UTF8MB4_GENERAL_CI, UTF8MB4_UNICODE_CI};
pub(crate) use column_count::ColumnCount;
pub(crate) use column_def::ColumnDefinition;
pub(crate) use column_flags::ColumnFlags;
pub(crate) use com_change_user::ComChangeUser;
pub(crate) use com_init_db::ComInitDb;
pub(crate) use com_ping::ComPing;
pub(crate) use com_quit::ComQuit;
pub(crate) use com_reset_connection::ComResetConnection;
pub(crate) use com_statistics::ComStatistics;
pub(crate) use encode::Encode;
pub(crate) use eof::EofPacket;
pub(crate) use err::ErrPacket;
pub(crate) use handshake::Handshake;
pub(crate) use handshake_response::HandshakeResponse;
pub(crate) use ok::OkPacket;
pub(crate) use packet::PacketCodec;
pub(crate) use ssl_request::SslRequest;
pub(crate) use status::Status;
pub(crate) use text::{ComQuery, TextRow};
pub(crate) use type_id::TypeId;

/// A decoded generic response to a command: any of the three packets a
/// server may send where a result-set header or an `OK`/`ERR` is expected
/// (§4.5). Distinguished by the first byte of the payload.
#[derive(Debug)]
pub(crate) enum Response {
    Ok(OkPacket),
    Err(ErrPacket),
    ResultSet(ColumnCount),
}

impl Response {
    pub(crate) fn read(buf: &[u8]) -> crate::error::Result<Self> {
        match buf.first().copied() {
            Some(0x00) => Ok(Response::Ok(OkPacket::read(buf)?)),
            Some(0xFF) => Ok(Response::Err(ErrPacket::read(buf)?)),
            Some(_) => Ok(Response::ResultSet(ColumnCount::read(buf)?)),
            None => Err(crate::error::Error::protocol("empty response packet")),
        }
    }
}
