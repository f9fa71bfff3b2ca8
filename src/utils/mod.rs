pub mod console;
pub mod logging;
pub mod menu;

pub use logging::{init_log_file, log_startup, print_transfer_summary, truncate_text, unpublished_note};
