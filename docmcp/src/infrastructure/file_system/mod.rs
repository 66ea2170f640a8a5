pub mod discovery;
pub mod reader;

pub use discovery::{discover_files_with_extensions, discover_markdown_files};
pub use reader::{file_info, friendly_size, read_file_content, FileInfo};
