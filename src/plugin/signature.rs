use crate::plugin::install_config::InstallConfig;

/// Sources under this prefix are verified with the key bundled with lintplug.
const BUILTIN_KEY_PREFIX: &str = "github.com/lintplug/";

/// Decides whether a release can be checked against a signing key.
#[derive(Debug, Clone, Copy)]
pub struct SignatureChecker<'a> {
    install: &'a InstallConfig,
}

impl<'a> SignatureChecker<'a> {
    pub fn new(install: &'a InstallConfig) -> Self {
        Self { install }
    }

    pub fn has_signing_key(&self) -> bool {
        self.install.signing_key.is_some() || self.has_builtin_key()
    }

    fn has_builtin_key(&self) -> bool {
        self.install.source.starts_with(BUILTIN_KEY_PREFIX)
    }
}
