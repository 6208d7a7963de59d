mod file_store;
mod snapshot_format;


pub use file_store::*;
pub use snapshot_format::*;
