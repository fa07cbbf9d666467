pub mod file;
pub mod seed;

pub use file::{parse_projects, JsonFileStorage, MemoryStorage, Storage};
pub use seed::sample_projects;
