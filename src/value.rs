use crate::error::{Error, Result};
use crate::type_info::MySqlTypeInfo;
use crate::types::MySqlType;

/// Whether a value's raw bytes are encoded per the text protocol or the
/// binary protocol (§4.6) — the two use different wire encodings for the
/// same logical value and a codec must know which it's looking at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum MySqlValueFormat {
    Text,
    Binary,
}

/// A borrowed reference to one column's raw wire bytes plus enough type
/// information to decode them (§3 "Row" / §4.7). Never owns its bytes: the
/// row it was built from outlives every `MySqlValueRef` handed out of it.
#[derive(Debug, Clone, Copy)]
pub struct MySqlValueRef<'r> {
    pub(crate) type_info: MySqlTypeInfo,
    pub(crate) format: MySqlValueFormat,
    pub(crate) data: Option<&'r [u8]>,
}

impl<'r> MySqlValueRef<'r> {
    pub(crate) fn new(type_info: MySqlTypeInfo, format: MySqlValueFormat, data: Option<&'r [u8]>) -> Self {
        Self {
            type_info,
            format,
            data,
        }
    }

    pub fn type_info(&self) -> &MySqlTypeInfo {
        &self.type_info
    }

    pub fn is_null(&self) -> bool {
        self.data.is_none()
    }

    /// Decodes this value as `T`, per §4.9's typed-getter contract: returns
    /// `Err` for a type mismatch, `Ok(None)` only via the `Option<T>`
    /// blanket decode below.
    pub fn try_decode<T: MySqlType>(self) -> Result<T> {
        let bytes = self
            .data
            .ok_or_else(|| Error::invalid_argument("column value is NULL"))?;

        if !T::compatible(&self.type_info) {
            return Err(Error::invalid_argument(format!(
                "cannot decode column of type {} as {}",
                self.type_info.name(),
                std::any::type_name::<T>()
            )));
        }

        match self.format {
            MySqlValueFormat::Text => T::decode_text(bytes),
            MySqlValueFormat::Binary => T::decode_binary(bytes),
        }
    }
}
