use crate::io::BufMut;

use crate::protocol::capabilities::Capabilities;
use crate::protocol::encode::Encode;
use crate::protocol::type_id::TypeId;

bitflags::bitflags! {
    /// Cursor behavior requested for a `COM_STMT_EXECUTE` (§4.6, §4.8).
    ///
    /// Only `READ_ONLY` is ever sent by this driver: a result set is
    /// streamed one row at a time via `COM_STMT_FETCH` when the caller asks
    /// for `use_cursor_fetch`, and buffered in full otherwise. `FOR_UPDATE`
    /// and `SCROLLABLE` are accepted by the wire format but this driver has
    /// no caller-facing API that requests them (§9 REDESIGN FLAGS: no
    /// scrollable/updatable result sets).
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub(crate) struct Cursor: u8 {
        const NO_CURSOR = 0x00;
        const READ_ONLY = 0x01;
        const FOR_UPDATE = 0x02;
        const SCROLLABLE = 0x04;
    }
}

/// One bound parameter's wire type tag and unsigned-ness, sent alongside
/// its value the first time a statement executes with new parameter types
/// (§4.6).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ParamType {
    pub(crate) type_id: TypeId,
    pub(crate) unsigned: bool,
}

/// `COM_STMT_EXECUTE` (0x17): runs a previously prepared statement.
///
/// `null_bitmap` and `params` are pre-encoded by the argument binder (C8):
/// `null_bitmap` is `ceil(param_count / 8)` bytes, one bit per parameter in
/// declaration order, and `params` is the binary-encoded values of every
/// non-null parameter back to back, in the encoding described in §4.6's
/// parameter table. `new_params_bound` is set by the caller the first time a
/// statement executes and whenever a parameter's bound Rust type changes
/// (§4.7 `ServerPreparedStatement`); the type tag list is only sent in that
/// case, but the null bitmap and values are always sent when there are any
/// parameters at all.
#[derive(Debug)]
pub(crate) struct ComStmtExecute<'a> {
    pub(crate) statement_id: u32,
    pub(crate) cursor: Cursor,
    pub(crate) new_params_bound: bool,
    pub(crate) param_types: &'a [ParamType],
    pub(crate) null_bitmap: &'a [u8],
    pub(crate) params: &'a [u8],
}

impl Encode for ComStmtExecute<'_> {
    fn encode(&self, buf: &mut Vec<u8>, _: Capabilities) {
        buf.put_u8(0x17);
        buf.put_u32_le(self.statement_id);
        buf.put_u8(self.cursor.bits());
        buf.put_u32_le(1); // iteration-count, always 1

        if !self.null_bitmap.is_empty() {
            buf.extend_from_slice(self.null_bitmap);
            buf.put_u8(self.new_params_bound as u8);

            if self.new_params_bound {
                for ty in self.param_types {
                    buf.put_u8(ty.type_id.0);
                    buf.put_u8(if ty.unsigned { 0x80 } else { 0x00 });
                }
            }

            buf.extend_from_slice(self.params);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_header_with_no_params() {
        let mut buf = Vec::new();
        ComStmtExecute {
            statement_id: 7,
            cursor: Cursor::NO_CURSOR,
            new_params_bound: true,
            param_types: &[],
            null_bitmap: &[],
            params: &[],
        }
        .encode(&mut buf, Capabilities::empty());

        assert_eq!(&buf[..], &[0x17, 7, 0, 0, 0, 0, 1, 0, 0, 0]);
    }

    #[test]
    fn omits_type_tags_when_params_already_bound() {
        let mut buf = Vec::new();
        ComStmtExecute {
            statement_id: 1,
            cursor: Cursor::NO_CURSOR,
            new_params_bound: false,
            param_types: &[ParamType {
                type_id: TypeId::LONG,
                unsigned: false,
            }],
            null_bitmap: &[0x00],
            params: &42i32.to_le_bytes(),
        }
        .encode(&mut buf, Capabilities::empty());

        // header(10) + null_bitmap(1) + new_params_bound(1) + params(4), no type tags
        assert_eq!(buf.len(), 10 + 1 + 1 + 4);
        assert_eq!(buf[10], 0x00); // null bitmap
        assert_eq!(buf[11], 0x00); // new_params_bound = false
        assert_eq!(&buf[12..], &42i32.to_le_bytes());
    }
}
