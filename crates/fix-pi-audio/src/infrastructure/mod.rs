//! Infrastructure layer for fix-pi-audio.
//!
//! Contains OS-facing adapters: the boot config on disk, the settings file,
//! the wall clock, the terminal, the reboot command, and the tracing
//! subscriber.
//!
//! **Dependency rule**: this layer may depend on `application` and
//! `bootcfg_core`, but MUST NOT be imported by the `application` or domain
//! layers outside of tests.

pub mod clock;
pub mod logging;
pub mod reboot;
pub mod settings;
pub mod storage;
pub mod terminal;
