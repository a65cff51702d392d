mod file_handler;
mod public_handler;

pub use file_handler::*;
pub use public_handler::*;
