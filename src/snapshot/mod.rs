pub mod loader;
pub mod states;
