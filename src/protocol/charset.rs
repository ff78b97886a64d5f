//! The small slice of the server's collation table this driver cares about
//! (C4): only the collations it sends in the handshake response or relies
//! on to classify a column as binary vs. text. Not an exhaustive copy of
//! MySQL's ~300-entry `information_schema.collations`.
//!
//! Kept as plain `const`s rather than a runtime-populated map: the set is
//! fixed for the lifetime of the process (§9 REDESIGN FLAGS, immutable
//! global collation table).

/// `utf8mb4_general_ci`, this driver's default connection collation.
pub(crate) const UTF8MB4_GENERAL_CI: u8 = 45;

/// `utf8mb4_unicode_ci`, used for its stricter Unicode collation ordering.
pub(crate) const UTF8MB4_UNICODE_CI: u8 = 224;

/// `binary`, the collation MySQL reports for `BLOB`/`VARBINARY`/`BINARY`
/// columns and for every binary-protocol parameter this driver sends.
pub(crate) const BINARY: u8 = 63;

/// Whether a column's collation id marks it as a binary string rather than
/// a text string sharing the same `TypeId` (§3 "Column definition" —
/// MySQL's wire format does not have a separate byte-string column type).
pub(crate) fn is_binary_collation(collation: u8) -> bool {
    collation == BINARY
}
