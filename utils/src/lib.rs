//! Shared infrastructure utilities for FitSyn.
//!
//! Things several crates need that don't belong in the IO-free
//! `fitsyn-types` crate:
//!
//! - **`atomic_write`**: crash-safe file persistence (temp + rename)

pub mod atomic_write;

pub use atomic_write::{
    AtomicWriteOptions, FileSyncPolicy, PersistMode, atomic_write, atomic_write_with_options,
    recover_bak_file,
};
