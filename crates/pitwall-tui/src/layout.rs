//! Layout constants for pitwall-tui.

/// Main layout constants.
pub mod main {
    /// Header panel height in rows (includes tab bar).
    pub const HEADER_HEIGHT: u16 = 3;

    /// Status bar height in rows.
    pub const STATUS_BAR_HEIGHT: u16 = 3;

    /// Event poll interval. Also bounds how late a debounced search fires.
    pub const TICK_RATE_MS: u64 = 50;
}

/// Tables tab.
pub mod tables {
    /// Table list sidebar width.
    pub const SIDEBAR_WIDTH: u16 = 28;

    /// Page summary line height (bordered).
    pub const SUMMARY_HEIGHT: u16 = 3;

    /// Search input height (bordered).
    pub const SEARCH_HEIGHT: u16 = 3;

    /// POS column width.
    pub const POS_WIDTH: u16 = 6;

    /// Minimum width of a data column.
    pub const COLUMN_MIN_WIDTH: u16 = 12;
}

/// Stat tabs.
pub mod stats {
    /// Rank column width.
    pub const RANK_WIDTH: u16 = 5;

    /// Driver ID input height (bordered).
    pub const INPUT_HEIGHT: u16 = 3;
}
