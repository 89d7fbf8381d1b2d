pub mod json;
pub mod json_compact;

pub use json::JsonFormatter;
pub use json_compact::JsonCompactFormatter;
