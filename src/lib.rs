pub mod error;
pub mod playback;
pub mod snapshot;
pub mod visualization;

pub use error::ReplayError;

pub use snapshot::loader::{discover_snapshot_files, load_snapshots};
pub use snapshot::states::{Dim, NVec3, Particle, Snapshot};

pub use playback::bounds::{compute_bounds, AxisRange, ReplayBounds};
pub use playback::state::Playback;
pub use playback::trail::TrailSet;

pub use visualization::replay_vis::run_replay;
