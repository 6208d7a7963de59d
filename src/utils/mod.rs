pub(crate) mod file_io;

pub mod time;
