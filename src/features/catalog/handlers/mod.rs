mod catalog_handler;
mod settings_handler;

pub use catalog_handler::*;
pub use settings_handler::*;
