pub mod bounds;
pub mod state;
pub mod trail;
