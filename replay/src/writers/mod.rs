pub mod json_writer;
pub mod traits;

pub use json_writer::JsonDirWriter;
pub use traits::GameWriter;
