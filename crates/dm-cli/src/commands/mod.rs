//! CLI command implementations

pub(crate) mod common;
pub(crate) mod down;
pub(crate) mod init;
pub(crate) mod new;
pub(crate) mod reset;
pub(crate) mod status;
pub(crate) mod up;
pub(crate) mod update;
pub(crate) mod version;
