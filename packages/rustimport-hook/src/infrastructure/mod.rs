//! Host-side structures: the meta path and a reference import machinery.

pub mod import_system;
pub mod meta_path;

pub use import_system::ImportSystem;
pub use meta_path::MetaPath;
