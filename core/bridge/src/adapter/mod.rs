pub(crate) mod config;
pub(crate) mod sigint_checker;

pub(crate) use config::{resolve_file_config, resolve_settings, BridgeSettings};
pub(crate) use sigint_checker::{NoopInterruptChecker, SigintChecker};
