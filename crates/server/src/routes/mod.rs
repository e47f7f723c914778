pub mod route;
pub mod system;
