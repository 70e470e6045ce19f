//! Storage infrastructure: the boot config and its backups.
//!
//! - **`fs_store`** – [`FsConfigStore`], the real file system.  Config
//!   replacement goes through a temporary file in the same directory followed
//!   by a rename, so a crash mid-write never leaves a half-written config.
//! - **`memory`** – [`MemoryConfigStore`], an in-memory map used by tests.
//!   It can be told to fail individual operations.
//!
//! Both implement [`ConfigStore`](crate::application::overlay_manager::ConfigStore).

pub mod fs_store;
pub mod memory;

pub use fs_store::FsConfigStore;
pub use memory::MemoryConfigStore;
