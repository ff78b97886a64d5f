//! The parameter codec (C8): binds Rust values to prepared-statement
//! placeholders, encoding either a `COM_STMT_EXECUTE` binary payload or a
//! client-substituted SQL literal, per §4.6.

use bigdecimal::BigDecimal;
use bit_vec::BitVec;
use byteorder::{ByteOrder, LittleEndian};
use time::{Date, PrimitiveDateTime, Time};

use crate::error::{Error, Result};
use crate::protocol::{ParamType, TypeId};

/// A single bound parameter, tagged with enough of its MySQL wire type to
/// encode itself either way (§4.6's "Parameter" data model entry).
#[derive(Debug, Clone)]
#[non_exhaustive]
pub enum MySqlArgumentValue {
    Null,
    Tiny(i8),
    UnsignedTiny(u8),
    Short(i16),
    UnsignedShort(u16),
    Long(i32),
    UnsignedLong(u32),
    LongLong(i64),
    UnsignedLongLong(u64),
    Float(f32),
    Double(f64),
    /// A length-encoded byte string: `VARCHAR`/`TEXT`/`BLOB`/`JSON`/`SET`,
    /// `DECIMAL` rendered as ASCII text, `BIT` as its big-endian bytes.
    Bytes(Vec<u8>),
    Date {
        year: i32,
        month: u8,
        day: u8,
    },
    DateTime {
        year: i32,
        month: u8,
        day: u8,
        hour: u8,
        minute: u8,
        second: u8,
        micros: u32,
    },
    Time {
        is_negative: bool,
        days: u32,
        hour: u8,
        minute: u8,
        second: u8,
        micros: u32,
    },
    /// Verbatim SQL text, injected without quoting (e.g. `CURRENT_TIMESTAMP`).
    /// Only meaningful for client-prepared literal substitution; binding a
    /// raw value to a server-prepared statement is a programming error.
    Raw(String),
}

/// Binds a Rust value into a tagged [`MySqlArgumentValue`] (§4.6's per-type
/// binary/text encodings). Implemented for every type [`crate::types`]
/// decodes, plus `&str`/`&[u8]` borrow forms, and for any caller type that
/// can map itself onto one of [`MySqlArgumentValue`]'s variants.
pub trait MySqlBind {
    fn bind(self) -> MySqlArgumentValue;
}

impl MySqlBind for MySqlArgumentValue {
    fn bind(self) -> MySqlArgumentValue {
        self
    }
}

impl<T: MySqlBind> MySqlBind for Option<T> {
    fn bind(self) -> MySqlArgumentValue {
        match self {
            Some(v) => v.bind(),
            None => MySqlArgumentValue::Null,
        }
    }
}

macro_rules! impl_bind_int {
    ($ty:ty, $variant:ident) => {
        impl MySqlBind for $ty {
            fn bind(self) -> MySqlArgumentValue {
                MySqlArgumentValue::$variant(self)
            }
        }
    };
}

impl_bind_int!(i8, Tiny);
impl_bind_int!(u8, UnsignedTiny);
impl_bind_int!(i16, Short);
impl_bind_int!(u16, UnsignedShort);
impl_bind_int!(i32, Long);
impl_bind_int!(u32, UnsignedLong);
impl_bind_int!(i64, LongLong);
impl_bind_int!(u64, UnsignedLongLong);
impl_bind_int!(f32, Float);
impl_bind_int!(f64, Double);

impl MySqlBind for bool {
    fn bind(self) -> MySqlArgumentValue {
        MySqlArgumentValue::Tiny(self as i8)
    }
}

impl MySqlBind for String {
    fn bind(self) -> MySqlArgumentValue {
        MySqlArgumentValue::Bytes(self.into_bytes())
    }
}

impl MySqlBind for &'_ str {
    fn bind(self) -> MySqlArgumentValue {
        MySqlArgumentValue::Bytes(self.as_bytes().to_vec())
    }
}

impl MySqlBind for Vec<u8> {
    fn bind(self) -> MySqlArgumentValue {
        MySqlArgumentValue::Bytes(self)
    }
}

impl MySqlBind for &'_ [u8] {
    fn bind(self) -> MySqlArgumentValue {
        MySqlArgumentValue::Bytes(self.to_vec())
    }
}

impl MySqlBind for BigDecimal {
    fn bind(self) -> MySqlArgumentValue {
        MySqlArgumentValue::Bytes(self.to_string().into_bytes())
    }
}

impl MySqlBind for serde_json::Value {
    fn bind(self) -> MySqlArgumentValue {
        MySqlArgumentValue::Bytes(self.to_string().into_bytes())
    }
}

impl MySqlBind for BitVec {
    fn bind(self) -> MySqlArgumentValue {
        MySqlArgumentValue::Bytes(self.to_bytes())
    }
}

impl MySqlBind for Date {
    fn bind(self) -> MySqlArgumentValue {
        MySqlArgumentValue::Date {
            year: self.year(),
            month: self.month() as u8,
            day: self.day(),
        }
    }
}

impl MySqlBind for Time {
    fn bind(self) -> MySqlArgumentValue {
        MySqlArgumentValue::Time {
            is_negative: false,
            days: 0,
            hour: self.hour(),
            minute: self.minute(),
            second: self.second(),
            micros: self.microsecond(),
        }
    }
}

impl MySqlBind for PrimitiveDateTime {
    fn bind(self) -> MySqlArgumentValue {
        MySqlArgumentValue::DateTime {
            year: self.year(),
            month: self.month() as u8,
            day: self.day(),
            hour: self.hour(),
            minute: self.minute(),
            second: self.second(),
            micros: self.microsecond(),
        }
    }
}

impl MySqlArgumentValue {
    /// The `(type-code, unsigned-flag)` pair sent in the type-tag list the
    /// first time a server-prepared statement executes with this value
    /// bound (§4.6). `NULL` has no determinate type, so it claims `VAR_STRING`
    /// as MySQL servers do for untyped parameters.
    fn param_type(&self) -> ParamType {
        let (type_id, unsigned) = match self {
            MySqlArgumentValue::Null => (TypeId::VAR_STRING, false),
            MySqlArgumentValue::Tiny(_) => (TypeId::TINY, false),
            MySqlArgumentValue::UnsignedTiny(_) => (TypeId::TINY, true),
            MySqlArgumentValue::Short(_) => (TypeId::SHORT, false),
            MySqlArgumentValue::UnsignedShort(_) => (TypeId::SHORT, true),
            MySqlArgumentValue::Long(_) => (TypeId::LONG, false),
            MySqlArgumentValue::UnsignedLong(_) => (TypeId::LONG, true),
            MySqlArgumentValue::LongLong(_) => (TypeId::LONGLONG, false),
            MySqlArgumentValue::UnsignedLongLong(_) => (TypeId::LONGLONG, true),
            MySqlArgumentValue::Float(_) => (TypeId::FLOAT, false),
            MySqlArgumentValue::Double(_) => (TypeId::DOUBLE, false),
            MySqlArgumentValue::Bytes(_) | MySqlArgumentValue::Raw(_) => (TypeId::VAR_STRING, false),
            MySqlArgumentValue::Date { .. } => (TypeId::DATE, false),
            MySqlArgumentValue::DateTime { .. } => (TypeId::DATETIME, false),
            MySqlArgumentValue::Time { .. } => (TypeId::TIME, false),
        };
        ParamType { type_id, unsigned }
    }

    fn is_null(&self) -> bool {
        matches!(self, MySqlArgumentValue::Null)
    }

    /// Appends this value's `COM_STMT_EXECUTE` binary encoding (§4.6's
    /// per-type table) to `buf`. Must not be called for `Null` (the null
    /// bitmap already says not to) or `Raw` (text-substitution only).
    fn encode_binary(&self, buf: &mut Vec<u8>) {
        match *self {
            MySqlArgumentValue::Null => {}
            MySqlArgumentValue::Tiny(v) => buf.push(v as u8),
            MySqlArgumentValue::UnsignedTiny(v) => buf.push(v),
            MySqlArgumentValue::Short(v) => buf.extend_from_slice(&v.to_le_bytes()),
            MySqlArgumentValue::UnsignedShort(v) => buf.extend_from_slice(&v.to_le_bytes()),
            MySqlArgumentValue::Long(v) => buf.extend_from_slice(&v.to_le_bytes()),
            MySqlArgumentValue::UnsignedLong(v) => buf.extend_from_slice(&v.to_le_bytes()),
            MySqlArgumentValue::LongLong(v) => buf.extend_from_slice(&v.to_le_bytes()),
            MySqlArgumentValue::UnsignedLongLong(v) => buf.extend_from_slice(&v.to_le_bytes()),
            MySqlArgumentValue::Float(v) => buf.extend_from_slice(&v.to_le_bytes()),
            MySqlArgumentValue::Double(v) => buf.extend_from_slice(&v.to_le_bytes()),
            MySqlArgumentValue::Bytes(ref bytes) => put_lenenc_bytes(buf, bytes),
            MySqlArgumentValue::Raw(_) => unreachable!("raw parameters are text-substitution only"),
            MySqlArgumentValue::Date { year, month, day } => {
                if year == 0 && month == 0 && day == 0 {
                    buf.push(0);
                    return;
                }
                buf.push(4);
                buf.extend_from_slice(&(year as u16).to_le_bytes());
                buf.push(month);
                buf.push(day);
            }
            MySqlArgumentValue::DateTime {
                year,
                month,
                day,
                hour,
                minute,
                second,
                micros,
            } => {
                if year == 0 && month == 0 && day == 0 && hour == 0 && minute == 0 && second == 0 && micros == 0
                {
                    buf.push(0);
                    return;
                }
                buf.push(if micros == 0 { 7 } else { 11 });
                buf.extend_from_slice(&(year as u16).to_le_bytes());
                buf.push(month);
                buf.push(day);
                buf.push(hour);
                buf.push(minute);
                buf.push(second);
                if micros != 0 {
                    buf.extend_from_slice(&micros.to_le_bytes());
                }
            }
            MySqlArgumentValue::Time {
                is_negative,
                days,
                hour,
                minute,
                second,
                micros,
            } => {
                if days == 0 && hour == 0 && minute == 0 && second == 0 && micros == 0 {
                    buf.push(0);
                    return;
                }
                buf.push(if micros == 0 { 8 } else { 12 });
                buf.push(is_negative as u8);
                buf.extend_from_slice(&days.to_le_bytes());
                buf.push(hour);
                buf.push(minute);
                buf.push(second);
                if micros != 0 {
                    buf.extend_from_slice(&micros.to_le_bytes());
                }
            }
        }
    }

    /// Renders this value as a SQL literal for client-prepared text
    /// substitution (§4.6.2).
    fn encode_literal(&self, out: &mut String) {
        match self {
            MySqlArgumentValue::Null => out.push_str("NULL"),
            MySqlArgumentValue::Tiny(v) => out.push_str(&v.to_string()),
            MySqlArgumentValue::UnsignedTiny(v) => out.push_str(&v.to_string()),
            MySqlArgumentValue::Short(v) => out.push_str(&v.to_string()),
            MySqlArgumentValue::UnsignedShort(v) => out.push_str(&v.to_string()),
            MySqlArgumentValue::Long(v) => out.push_str(&v.to_string()),
            MySqlArgumentValue::UnsignedLong(v) => out.push_str(&v.to_string()),
            MySqlArgumentValue::LongLong(v) => out.push_str(&v.to_string()),
            MySqlArgumentValue::UnsignedLongLong(v) => out.push_str(&v.to_string()),
            MySqlArgumentValue::Float(v) => out.push_str(&v.to_string()),
            MySqlArgumentValue::Double(v) => out.push_str(&v.to_string()),
            MySqlArgumentValue::Bytes(bytes) => encode_bytes_literal(bytes, out),
            MySqlArgumentValue::Raw(text) => out.push_str(text),
            MySqlArgumentValue::Date { year, month, day } => {
                out.push('\'');
                out.push_str(&format!("{year:04}-{month:02}-{day:02}"));
                out.push('\'');
            }
            MySqlArgumentValue::DateTime {
                year,
                month,
                day,
                hour,
                minute,
                second,
                micros,
            } => {
                out.push('\'');
                out.push_str(&format!("{year:04}-{month:02}-{day:02} {hour:02}:{minute:02}:{second:02}"));
                if *micros != 0 {
                    out.push_str(&format!(".{micros:06}"));
                }
                out.push('\'');
            }
            MySqlArgumentValue::Time {
                is_negative,
                days,
                hour,
                minute,
                second,
                micros,
            } => {
                out.push('\'');
                if *is_negative {
                    out.push('-');
                }
                let total_hours = days * 24 + *hour as u32;
                out.push_str(&format!("{total_hours:02}:{minute:02}:{second:02}"));
                if *micros != 0 {
                    out.push_str(&format!(".{micros:06}"));
                }
                out.push('\'');
            }
        }
    }
}

/// Renders a byte string as `'...'` with quotes/backslashes escaped, or as a
/// `0x`-prefixed hex literal when it isn't valid UTF-8 (§4.6.2).
fn encode_bytes_literal(bytes: &[u8], out: &mut String) {
    match std::str::from_utf8(bytes) {
        Ok(s) if !s.bytes().any(|b| b == 0) => {
            out.push('\'');
            for c in s.chars() {
                match c {
                    '\'' => out.push_str("''"),
                    '\\' => out.push_str("\\\\"),
                    _ => out.push(c),
                }
            }
            out.push('\'');
        }
        _ => {
            out.push_str("0x");
            for b in bytes {
                out.push_str(&format!("{b:02x}"));
            }
        }
    }
}

fn put_lenenc_bytes(buf: &mut Vec<u8>, bytes: &[u8]) {
    let len = bytes.len() as u64;
    if len < 251 {
        buf.push(len as u8);
    } else if len < 0x1_0000 {
        buf.push(0xFC);
        buf.extend_from_slice(&(len as u16).to_le_bytes());
    } else if len < 0x100_0000 {
        buf.push(0xFD);
        let mut tmp = [0u8; 4];
        LittleEndian::write_u32(&mut tmp, len as u32);
        buf.extend_from_slice(&tmp[..3]);
    } else {
        buf.push(0xFE);
        buf.extend_from_slice(&len.to_le_bytes());
    }
    buf.extend_from_slice(bytes);
}

/// The full set of parameters bound to one statement invocation (§4.6).
///
/// Built up with [`MySqlArguments::add`] in placeholder order, then either
/// [`encode_binary`](Self::encode_binary) for `COM_STMT_EXECUTE` or
/// [`substitute`](Self::substitute) for client-prepared text substitution.
#[derive(Debug, Clone, Default)]
pub(crate) struct MySqlArguments {
    values: Vec<MySqlArgumentValue>,
}

impl MySqlArguments {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn add<T: MySqlBind>(&mut self, value: T) {
        self.values.push(value.bind());
    }

    /// Injects a verbatim, unquoted SQL expression as the next parameter
    /// (§4.6.2's "Raw parameter form"), e.g. `CURRENT_TIMESTAMP`.
    pub(crate) fn add_raw(&mut self, sql: impl Into<String>) {
        self.values.push(MySqlArgumentValue::Raw(sql.into()));
    }

    pub(crate) fn len(&self) -> usize {
        self.values.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// The wire type tag each bound value would send in a
    /// `COM_STMT_EXECUTE` type-tag list, without encoding the values
    /// themselves. Used by [`crate::statement::MySqlServerPreparedStatement`]
    /// to decide whether re-execution needs `new_params_bound = 1` (§4.6,
    /// §4.8).
    pub(crate) fn param_types(&self) -> Vec<ParamType> {
        self.values.iter().map(MySqlArgumentValue::param_type).collect()
    }

    /// Encodes the null bitmap, type-tag list, and binary parameter values
    /// for a `COM_STMT_EXECUTE` (§4.6). Returns `(null_bitmap, param_types,
    /// params)`.
    pub(crate) fn encode_binary(&self) -> (Vec<u8>, Vec<ParamType>, Vec<u8>) {
        let mut null_bitmap = vec![0u8; self.values.len().div_ceil(8)];
        let mut param_types = Vec::with_capacity(self.values.len());
        let mut params = Vec::new();

        for (i, value) in self.values.iter().enumerate() {
            param_types.push(value.param_type());
            if value.is_null() {
                null_bitmap[i / 8] |= 1 << (i % 8);
            } else {
                value.encode_binary(&mut params);
            }
        }

        (null_bitmap, param_types, params)
    }

    /// Splits `sql` on unquoted `?` placeholders and substitutes each bound
    /// value's SQL literal rendering (§4.6.2). Fails if the placeholder
    /// count doesn't match the bound parameter count.
    pub(crate) fn substitute(&self, sql: &str) -> Result<String> {
        let positions = unquoted_placeholder_positions(sql);

        if positions.len() != self.values.len() {
            return Err(Error::invalid_argument(format!(
                "statement has {} placeholder(s) but {} parameter(s) were bound",
                positions.len(),
                self.values.len()
            )));
        }

        let mut out = String::with_capacity(sql.len() + self.values.len() * 8);
        let mut last = 0;

        for (segment_end, value) in positions.into_iter().zip(&self.values) {
            out.push_str(&sql[last..segment_end]);
            value.encode_literal(&mut out);
            last = segment_end + 1; // skip the `?`
        }
        out.push_str(&sql[last..]);

        Ok(out)
    }
}

/// As [`MySqlArgumentValue::encode_literal`], exposed for
/// [`crate::statement::MySqlCallableStatement`], which mixes literal IN
/// arguments with raw `@session_variable` placeholders in the same `CALL`
/// statement (§4.8).
pub(crate) fn render_literal(value: &MySqlArgumentValue) -> String {
    let mut out = String::new();
    value.encode_literal(&mut out);
    out
}

/// Finds the byte offset of every `?` in `sql` that isn't inside a quoted
/// string or a backtick-quoted identifier.
pub(crate) fn unquoted_placeholder_positions(sql: &str) -> Vec<usize> {
    let mut positions = Vec::new();
    let mut quote: Option<char> = None;
    let bytes = sql.as_bytes();
    let mut i = 0;

    while i < bytes.len() {
        let c = bytes[i] as char;
        match quote {
            Some(q) => {
                if c == '\\' {
                    i += 1; // skip escaped character
                } else if c == q {
                    quote = None;
                }
            }
            None => match c {
                '\'' | '"' | '`' => quote = Some(c),
                '?' => positions.push(i),
                _ => {}
            },
        }
        i += 1;
    }

    positions
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_null_bitmap_and_values() {
        let mut args = MySqlArguments::new();
        args.add(42i32);
        args.add(Option::<i32>::None);
        args.add("hi");

        let (null_bitmap, types, params) = args.encode_binary();
        assert_eq!(null_bitmap, vec![0b0000_0010]);
        assert_eq!(types.len(), 3);
        assert_eq!(params, {
            let mut v = 42i32.to_le_bytes().to_vec();
            v.push(2);
            v.extend_from_slice(b"hi");
            v
        });
    }

    #[test]
    fn substitutes_placeholders_with_quoting() {
        let mut args = MySqlArguments::new();
        args.add(1i32);
        args.add("O'Brien");
        args.add(Option::<i32>::None);

        let sql = args.substitute("INSERT INTO t VALUES (?, ?, ?)").unwrap();
        assert_eq!(sql, "INSERT INTO t VALUES (1, 'O''Brien', NULL)");
    }

    #[test]
    fn ignores_question_marks_inside_string_literals() {
        let mut args = MySqlArguments::new();
        args.add(1i32);

        let sql = args.substitute("SELECT ? FROM t WHERE name = 'what?'").unwrap();
        assert_eq!(sql, "SELECT 1 FROM t WHERE name = 'what?'");
    }

    #[test]
    fn mismatched_placeholder_count_is_an_error() {
        let mut args = MySqlArguments::new();
        args.add(1i32);
        assert!(args.substitute("SELECT ?, ?").is_err());
    }

    #[test]
    fn binary_blob_renders_as_hex_literal() {
        let mut args = MySqlArguments::new();
        args.add(vec![0xDEu8, 0xAD, 0xBE, 0xEF]);

        let sql = args.substitute("SELECT ?").unwrap();
        assert_eq!(sql, "SELECT 0xdeadbeef");
    }

    #[test]
    fn raw_parameter_is_injected_verbatim() {
        let mut args = MySqlArguments::new();
        args.add_raw("CURRENT_TIMESTAMP");

        let sql = args.substitute("INSERT INTO t VALUES (?)").unwrap();
        assert_eq!(sql, "INSERT INTO t VALUES (CURRENT_TIMESTAMP)");
    }
}
