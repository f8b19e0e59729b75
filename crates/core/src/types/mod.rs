//! Data model: installations, versions, and host platform

mod installation;
mod platform;
mod version;

pub use installation::{Bitness, Edition, Installation, ToolHome};
pub use platform::HostPlatform;
pub use version::ToolVersion;
