pub mod config;
pub mod get;
pub mod init;
pub mod ls;
pub mod put;
pub mod rm;

use anyhow::{Result, bail};
use schedule_host_core::Access;

/// Turn a non-granted outcome into a command failure.
pub fn require<T>(access: Access<T>, name: &str) -> Result<T> {
    match access {
        Access::Granted(value) => Ok(value),
        Access::Unauthenticated => bail!("Access denied to '{}'", name),
        Access::NotFound => bail!("'{}' not found", name),
    }
}
