//! Application layer use cases for fix-pi-audio.
//!
//! # What is the "application" layer? (for beginners)
//!
//! In Clean Architecture the *application* layer sits between the domain
//! (pure rules in `bootcfg-core`) and the infrastructure (files, terminal,
//! processes).
//!
//! Use cases in this layer:
//!
//! - **Orchestrate** domain objects to fulfil an operator goal (e.g., "switch
//!   the boot config to the FKMS overlay, keeping a backup").
//! - **Depend on abstractions** (traits such as [`ConfigStore`],
//!   [`Prompter`], [`Rebooter`]) rather than concrete implementations, so tests
//!   can run against an in-memory file and a scripted operator.
//! - **Contain no direct OS calls**.
//!
//! # Sub-modules
//!
//! - **`overlay_manager`** – The `ConfigOverlayManager`: fix, list backups,
//!   restore, and status.  Every mutation of the boot config goes through it.
//!
//! - **`session`** – The interactive menu state machine.  It asks the
//!   operator for decisions and hands the answers to the manager; it never
//!   touches the file itself.
//!
//! [`ConfigStore`]: overlay_manager::ConfigStore
//! [`Prompter`]: session::Prompter
//! [`Rebooter`]: session::Rebooter

pub mod overlay_manager;
pub mod session;
