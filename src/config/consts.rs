// src/config/consts.rs

// Measure configs
pub const CONFIG_DIR: &str = "configs";
pub const DEFAULT_CONFIG: &str = "default.json";
pub const CONFIG_EXT: &str = "json";

// Output
pub const KEYS_DIR: &str = "keys";
pub const KEY_EXT: &str = "tsv";
pub const KEY_SEP: char = '\t';
pub const ITEM_COLUMN: &str = "item";
pub const ID_COLUMN: &str = "ipip_id";

// Logging
pub const LOG_NAME: &str = "keyscrape.log";
pub const LOG_FILE: &str = "keys/keyscrape.log";

// Lookup tables (all TSV with one header row)
pub const TABLE_SEP: char = '\t';
pub const DEFAULT_IPIP_TABLE: &str = "data/ipip_items.tsv";
pub const DEFAULT_REMAP_TABLE: &str = "data/remap_items.tsv";
pub const DEFAULT_SPLIT_TABLE: &str = "data/split_items.tsv";

// Attach IPIP ids to key rows
pub const CROSS_REFERENCE: bool = false;

// Net
pub const USER_AGENT: &str = concat!("keyscrape/", env!("CARGO_PKG_VERSION"));
pub const HTTP_TIMEOUT_SECS: u64 = 30;
