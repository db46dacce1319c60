//! Fixed values shared across the store and the renderers.

/// Zone used when an event time carries no zone, and for offset-less timestamps.
pub const DEFAULT_TIME_ZONE: &str = "Asia/Tokyo";

/// Initialization vector used when the deployment does not override it.
pub const DEFAULT_IV_HEX: &str = "b995ee5e4149975a575973f180192b1c";

/// The only cipher records are written with.
pub const DEFAULT_CIPHER: &str = "AES-256-CBC";

/// Physical line budget for folded content lines, in UTF-8 bytes.
pub const FOLD_WIDTH: usize = 72;

/// Continuation indent for folded lines.
pub const FOLD_INDENT: &str = "\t";

/// Attendees listed in a DESCRIPTION before the overflow marker.
pub const DEFAULT_MAX_ATTENDEES: usize = 5;

pub const PRODUCT_ID: &str = "-//schedule-host//schedule-host v1.0//JP";

/// Extension of record files inside the store directory.
pub const RECORD_EXTENSION: &str = "json";
