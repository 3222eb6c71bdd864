/// Phrases shorter than this (in characters) never reach a search source.
pub const MIN_SEARCH_PHRASE_LEN: usize = 3;

/// Quiet period a phrase must survive before an aggregate search is issued.
pub const SEARCH_QUIET_PERIOD_MS: u64 = 250;

/// Default number of rows per page in node/stream lists.
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Number of mnemonic words in a node title.
pub const NODE_TITLE_WORDS: usize = 3;

/// Separator used in composite location ids (`"{longitude}|{latitude}"`).
pub const LOCATION_ID_SEPARATOR: char = '|';
