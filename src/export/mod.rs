pub mod dir_saver;
pub mod format;
pub mod saver;

pub use dir_saver::{DirectorySaver, check_file_name};
pub use format::{load_log, to_pretty_json};
pub use saver::FileSaver;
