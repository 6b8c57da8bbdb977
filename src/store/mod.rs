pub mod persist;
pub mod session;
