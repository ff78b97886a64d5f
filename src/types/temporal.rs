use byteorder::{ByteOrder, LittleEndian};
use time::{Date, Month, PrimitiveDateTime, Time};

use super::MySqlType;
use crate::error::{Error, Result};
use crate::protocol::TypeId;
use crate::type_info::MySqlTypeInfo;

/// Marker for a `'0000-00-00'`-style zero value (§4.7): the column had a
/// value, but not one `time` can represent. `Error::ZeroDate` is distinct
/// from `InvalidArgument` so a nullable column can decode it as `None`
/// rather than erroring (§4.7's "null if nullable else error" default); see
/// [`crate::row::MySqlRow::try_get`].
pub(crate) fn zero_date_error(kind: &'static str) -> Error {
    Error::ZeroDate(kind)
}

fn month_from_number(n: u8) -> Result<Month> {
    Month::try_from(n).map_err(|_| Error::protocol(format!("invalid month {n} in temporal value")))
}

impl MySqlType for Date {
    fn compatible(ty: &MySqlTypeInfo) -> bool {
        ty.type_id() == TypeId::DATE
    }

    fn decode_text(bytes: &[u8]) -> Result<Self> {
        let s = std::str::from_utf8(bytes)
            .map_err(|e| Error::protocol(format!("invalid utf-8 in DATE value: {e}")))?;
        parse_date_text(s)
    }

    fn decode_binary(bytes: &[u8]) -> Result<Self> {
        if bytes.is_empty() {
            return Err(zero_date_error("date"));
        }
        if bytes.len() < 4 {
            return Err(Error::protocol("expected 4 bytes for DATE"));
        }
        decode_date_binary(bytes)
    }
}

fn decode_date_binary(bytes: &[u8]) -> Result<Date> {
    let year = LittleEndian::read_u16(bytes) as i32;
    let month = bytes[2];
    let day = bytes[3];
    if year == 0 && month == 0 && day == 0 {
        return Err(zero_date_error("date"));
    }
    Date::from_calendar_date(year, month_from_number(month)?, day)
        .map_err(|e| Error::invalid_argument(format!("invalid DATE value: {e}")))
}

fn parse_date_text(s: &str) -> Result<Date> {
    let s = s.trim();
    if s == "0000-00-00" {
        return Err(zero_date_error("date"));
    }
    let mut parts = s.splitn(3, '-');
    let (Some(y), Some(m), Some(d)) = (parts.next(), parts.next(), parts.next()) else {
        return Err(Error::invalid_argument(format!("invalid DATE text {s:?}")));
    };
    let year: i32 = y
        .parse()
        .map_err(|_| Error::invalid_argument(format!("invalid DATE text {s:?}")))?;
    let month: u8 = m
        .parse()
        .map_err(|_| Error::invalid_argument(format!("invalid DATE text {s:?}")))?;
    let day: u8 = d
        .parse()
        .map_err(|_| Error::invalid_argument(format!("invalid DATE text {s:?}")))?;
    Date::from_calendar_date(year, month_from_number(month)?, day)
        .map_err(|e| Error::invalid_argument(format!("invalid DATE value {s:?}: {e}")))
}

/// Parses `HH:MM:SS[.ffffff]`, ignoring a leading sign and day-count (the
/// `TIME` wire format supports a duration beyond 24h; this driver's typed
/// `Time` getter only supports the time-of-day subset, consistent with the
/// `time` crate's own `Time` type, see DESIGN.md).
fn parse_time_text(s: &str) -> Result<Time> {
    let s = s.trim().trim_start_matches('-');
    let mut parts = s.splitn(3, ':');
    let (Some(h), Some(m), Some(rest)) = (parts.next(), parts.next(), parts.next()) else {
        return Err(Error::invalid_argument(format!("invalid TIME text {s:?}")));
    };
    let hour: u8 = h
        .parse::<u32>()
        .map_err(|_| Error::invalid_argument(format!("invalid TIME text {s:?}")))?
        .rem_euclid(24) as u8;
    let minute: u8 = m
        .parse()
        .map_err(|_| Error::invalid_argument(format!("invalid TIME text {s:?}")))?;
    let (sec_str, micro_str) = rest.split_once('.').unwrap_or((rest, "0"));
    let second: u8 = sec_str
        .parse()
        .map_err(|_| Error::invalid_argument(format!("invalid TIME text {s:?}")))?;
    let micros: u32 = format!("{micro_str:0<6}")[..6]
        .parse()
        .map_err(|_| Error::invalid_argument(format!("invalid TIME text {s:?}")))?;

    Time::from_hms_micro(hour, minute, second, micros)
        .map_err(|e| Error::invalid_argument(format!("invalid TIME value {s:?}: {e}")))
}

impl MySqlType for Time {
    fn compatible(ty: &MySqlTypeInfo) -> bool {
        ty.type_id() == TypeId::TIME
    }

    fn decode_text(bytes: &[u8]) -> Result<Self> {
        let s = std::str::from_utf8(bytes)
            .map_err(|e| Error::protocol(format!("invalid utf-8 in TIME value: {e}")))?;
        parse_time_text(s)
    }

    fn decode_binary(bytes: &[u8]) -> Result<Self> {
        if bytes.is_empty() {
            return Time::from_hms(0, 0, 0).map_err(|e| Error::invalid_argument(e.to_string()));
        }
        if bytes.len() < 8 {
            return Err(Error::protocol("expected at least 8 bytes for TIME"));
        }
        let hour = bytes[5];
        let minute = bytes[6];
        let second = bytes[7];
        let micros = if bytes.len() >= 12 {
            LittleEndian::read_u32(&bytes[8..12])
        } else {
            0
        };
        Time::from_hms_micro(hour, minute, second, micros)
            .map_err(|e| Error::invalid_argument(format!("invalid TIME value: {e}")))
    }
}

fn parse_datetime_text(s: &str) -> Result<PrimitiveDateTime> {
    let s = s.trim();
    if s.starts_with("0000-00-00") {
        return Err(zero_date_error("datetime"));
    }
    let (date_part, time_part) = s.split_once(' ').unwrap_or((s, "00:00:00"));
    let date = parse_date_text(date_part)?;
    let time = parse_time_text(time_part)?;
    Ok(PrimitiveDateTime::new(date, time))
}

impl MySqlType for PrimitiveDateTime {
    fn compatible(ty: &MySqlTypeInfo) -> bool {
        matches!(ty.type_id(), TypeId::DATETIME | TypeId::TIMESTAMP)
    }

    fn decode_text(bytes: &[u8]) -> Result<Self> {
        let s = std::str::from_utf8(bytes)
            .map_err(|e| Error::protocol(format!("invalid utf-8 in DATETIME value: {e}")))?;
        parse_datetime_text(s)
    }

    fn decode_binary(bytes: &[u8]) -> Result<Self> {
        if bytes.is_empty() {
            return Err(zero_date_error("datetime"));
        }
        if bytes.len() < 4 {
            return Err(Error::protocol("expected at least 4 bytes for DATETIME"));
        }
        let date = decode_date_binary(&bytes[..4])?;

        let (hour, minute, second, micros) = if bytes.len() >= 7 {
            let micros = if bytes.len() >= 11 {
                LittleEndian::read_u32(&bytes[7..11])
            } else {
                0
            };
            (bytes[4], bytes[5], bytes[6], micros)
        } else {
            (0, 0, 0, 0)
        };

        let time = Time::from_hms_micro(hour, minute, second, micros)
            .map_err(|e| Error::invalid_argument(format!("invalid DATETIME value: {e}")))?;

        Ok(PrimitiveDateTime::new(date, time))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_date_text() {
        let d = Date::decode_text(b"2020-01-01").unwrap();
        assert_eq!(d.year(), 2020);
        assert_eq!(d.month(), Month::January);
        assert_eq!(d.day(), 1);
    }

    #[test]
    fn parses_time_text_with_microseconds() {
        let t = Time::decode_text(b"12:34:56.5").unwrap();
        assert_eq!((t.hour(), t.minute(), t.second()), (12, 34, 56));
        assert_eq!(t.microsecond(), 500_000);
    }

    #[test]
    fn parses_datetime_text_space_separated() {
        let dt = PrimitiveDateTime::decode_text(b"2020-01-01 12:34:56").unwrap();
        assert_eq!(dt.date().year(), 2020);
        assert_eq!(dt.time().hour(), 12);
    }

    #[test]
    fn zero_date_is_an_error() {
        assert!(Date::decode_text(b"0000-00-00").is_err());
        assert!(Date::decode_binary(&[]).is_err());
    }
}
