pub mod descriptor;
pub mod plugin;

pub use descriptor::{DESCRIPTOR, PluginDescriptor};
pub use plugin::TmdbHookPlugin;
