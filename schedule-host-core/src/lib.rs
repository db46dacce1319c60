//! Core of schedule-host.
//!
//! - `store`: an encrypted, owner-checked record store on a directory
//! - `ics`: iCalendar rendering of schedule documents
//! - `host`: the load → render flow a request handler calls into

pub mod config;
pub mod constants;
pub mod error;
pub mod host;
pub mod ics;
pub mod render;
pub mod schedule;
pub mod store;

pub use error::{HostError, HostResult};
pub use host::ScheduleHost;
pub use render::{OutputFormat, RenderOptions, Rendered};
pub use schedule::Schedule;
pub use store::{Access, Store, StoreConfig};
