pub mod languages;
pub mod types;

/// Hard cap on locally stored watch-history entries.
pub const MAX_HISTORY_ITEMS: usize = 100;

/// Keystroke debounce applied by live-search UIs, in milliseconds.
pub const SEARCH_DEBOUNCE_MS: u64 = 300;

/// Queries shorter than this (after trimming) are not sent to the backend.
pub const MIN_SEARCH_QUERY_LEN: usize = 2;
