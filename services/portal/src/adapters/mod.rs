pub mod http_directory;
pub mod memory_directory;

pub use http_directory::HttpVisitorDirectory;
pub use memory_directory::InMemoryVisitorDirectory;
