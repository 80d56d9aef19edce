//! polydisk core
//!
//! The disk contract, the derived operations built on top of it, and the
//! file handle shared by every storage medium.

pub mod common;
pub mod disk;
pub mod error;
pub mod file;
pub mod metadata;
pub mod path;

#[cfg(test)]
mod testing;

pub use common::DiskExt;
pub use disk::{ByteStream, Disk, DiskRef};
pub use error::{DiskError, DiskResult};
pub use file::File;
pub use metadata::{Attributes, Permissions, Visibility};
