bitflags::bitflags! {
    /// Column definition flags (§3 "Column definition", grounded in the
    /// teacher's `FieldFlags`).
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub(crate) struct ColumnFlags: u16 {
        const NOT_NULL        = 0x0001;
        const PRI_KEY         = 0x0002;
        const UNIQUE_KEY      = 0x0004;
        const MULTIPLE_KEY    = 0x0008;
        const BLOB            = 0x0010;
        const UNSIGNED        = 0x0020;
        const ZEROFILL        = 0x0040;
        const BINARY          = 0x0080;
        const ENUM            = 0x0100;
        const AUTO_INCREMENT  = 0x0200;
        const TIMESTAMP       = 0x0400;
        const SET             = 0x0800;
        const NO_DEFAULT_VALUE = 0x1000;
        const ON_UPDATE_NOW   = 0x2000;
        const NUM             = 0x8000;
    }
}
