pub mod color;
pub mod replay_vis;
