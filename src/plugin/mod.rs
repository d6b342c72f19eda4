pub mod install_config;
pub mod installer;
pub mod locator;
pub mod signature;

pub use install_config::InstallConfig;
pub use installer::{MirrorInstaller, PluginInstaller};
pub use locator::{FsLocator, PluginLocator};
pub use signature::SignatureChecker;
