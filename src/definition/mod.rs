pub mod loader;
pub mod scenario;
pub mod tour;
