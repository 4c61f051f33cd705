use nbody_replay::{
    compute_bounds, discover_snapshot_files, load_snapshots, AxisRange, Dim, Particle, Playback,
    ReplayError, Snapshot, TrailSet,
};

use std::fs;
use std::path::{Path, PathBuf};

/// Build a particle from plain arrays
pub fn particle(x: [f64; 3], v: [f64; 3], m: f64) -> Particle {
    Particle {
        x: x.into(),
        v: v.into(),
        m,
    }
}

/// Build a snapshot at time `t` (speeds are derived by the constructor)
pub fn snapshot(t: f64, particles: Vec<Particle>) -> Snapshot {
    Snapshot::new(t, particles)
}

/// Fresh per-test directory under the system temp dir
pub fn temp_run_dir(tag: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!(
        "nbody-replay-test-{tag}-{}",
        std::process::id()
    ));
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(&dir).expect("failed to create temp dir");
    dir
}

pub fn write_file(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, contents).expect("failed to write test snapshot");
    path
}

/// A two-particle 2D snapshot file in the producer's column order
pub fn two_particle_2d_csv(t: f64, offset: f64) -> String {
    format!(
        "t,x0,x1,v0,v1,m\n\
         {t},{offset},0.0,1.0,0.0,1.0\n\
         {t},{x1},1.0,0.0,1.0,2.0\n",
        x1 = offset + 1.0
    )
}

// ==================================================================================
// Velocity magnitude tests
// ==================================================================================

#[test]
fn speed_is_euclidean_norm_2d() {
    let snap = snapshot(
        0.0,
        vec![
            particle([0.0, 0.0, 0.0], [3.0, 4.0, 0.0], 1.0),
            particle([1.0, 1.0, 0.0], [0.0, 0.0, 0.0], 1.0),
        ],
    );
    assert!((snap.speeds[0] - 5.0).abs() < 1e-12);
    assert_eq!(snap.speeds[1], 0.0);
}

#[test]
fn speed_is_euclidean_norm_3d() {
    let snap = snapshot(0.0, vec![particle([0.0; 3], [1.0, 2.0, 2.0], 1.0)]);
    assert!((snap.speeds[0] - 3.0).abs() < 1e-12);
}

// ==================================================================================
// Bounds pass tests
// ==================================================================================

#[test]
fn bounds_cover_all_samples_tightly() {
    let snaps = vec![
        snapshot(
            0.0,
            vec![
                particle([-1.0, 0.0, 0.0], [0.0, 1.0, 0.0], 1.0),
                particle([2.0, -3.0, 0.0], [0.0, 0.0, 0.0], 1.0),
            ],
        ),
        snapshot(
            1.0,
            vec![
                particle([0.5, 4.0, 0.0], [6.0, 8.0, 0.0], 1.0),
                particle([0.0, 0.0, 0.0], [0.0, 2.0, 0.0], 1.0),
            ],
        ),
    ];

    let bounds = compute_bounds(&snaps).expect("bounds should exist");

    // Tight at both ends: achieved by an actual sample
    assert_eq!(bounds.axis[0].min, -1.0);
    assert_eq!(bounds.axis[0].max, 2.0);
    assert_eq!(bounds.axis[1].min, -3.0);
    assert_eq!(bounds.axis[1].max, 4.0);
    assert_eq!(bounds.speed.min, 0.0);
    assert_eq!(bounds.speed.max, 10.0);

    // Every observed coordinate and speed falls inside
    for snap in &snaps {
        for (p, &s) in snap.particles.iter().zip(&snap.speeds) {
            for a in 0..3 {
                assert!(bounds.axis[a].min <= p.x[a] && p.x[a] <= bounds.axis[a].max);
            }
            assert!(bounds.speed.min <= s && s <= bounds.speed.max);
        }
    }
}

#[test]
fn bounds_reject_empty_sequence() {
    let err = compute_bounds(&[]).unwrap_err();
    assert!(matches!(err, ReplayError::EmptyData));
}

#[test]
fn bounds_reject_zero_particle_snapshots() {
    let err = compute_bounds(&[snapshot(0.0, vec![])]).unwrap_err();
    assert!(matches!(err, ReplayError::EmptyData));
}

#[test]
fn normalization_is_linear_and_clamped() {
    let range = AxisRange { min: 1.0, max: 3.0 };
    assert_eq!(range.normalize(1.0), 0.0);
    assert_eq!(range.normalize(2.0), 0.5);
    assert_eq!(range.normalize(3.0), 1.0);
    assert_eq!(range.normalize(-5.0), 0.0);
    assert_eq!(range.normalize(9.0), 1.0);
}

#[test]
fn degenerate_speed_range_normalizes_to_zero() {
    let range = AxisRange { min: 2.0, max: 2.0 };
    assert_eq!(range.normalize(2.0), 0.0);
}

// ==================================================================================
// Trajectory trail tests
// ==================================================================================

#[test]
fn trail_never_exceeds_capacity() {
    let mut trails = TrailSet::new(1, 5);
    for f in 0..30 {
        trails.record(&snapshot(
            f as f64,
            vec![particle([f as f64, 0.0, 0.0], [0.0; 3], 1.0)],
        ));
        assert!(trails.len(0) <= 5, "trail overflowed at frame {f}");
    }
}

#[test]
fn trail_keeps_most_recent_positions_oldest_first() {
    let mut trails = TrailSet::new(1, 3);
    for f in 0..10 {
        trails.record(&snapshot(
            f as f64,
            vec![particle([f as f64, 0.0, 0.0], [0.0; 3], 1.0)],
        ));
    }
    let xs: Vec<f64> = trails.particle(0).map(|p| p.x).collect();
    assert_eq!(xs, vec![7.0, 8.0, 9.0]);
}

#[test]
fn trail_clear_resets_history() {
    let mut trails = TrailSet::new(2, 4);
    trails.record(&snapshot(
        0.0,
        vec![
            particle([1.0, 0.0, 0.0], [0.0; 3], 1.0),
            particle([2.0, 0.0, 0.0], [0.0; 3], 1.0),
        ],
    ));
    assert_eq!(trails.len(0), 1);
    trails.clear();
    assert_eq!(trails.len(0), 0);
    assert_eq!(trails.len(1), 0);
}

// ==================================================================================
// Frame advance tests
// ==================================================================================

#[test]
fn playback_walks_frames_then_goes_terminal() {
    let snaps: Vec<Snapshot> = (0..3)
        .map(|f| snapshot(f as f64, vec![particle([f as f64, 0.0, 0.0], [0.0; 3], 1.0)]))
        .collect();

    let mut playback = Playback::new(3, 1, TrailSet::DEFAULT_LENGTH);
    assert_eq!(playback.current(), None);
    assert!(!playback.finished());

    assert_eq!(playback.advance(&snaps), Some(0));
    assert_eq!(playback.advance(&snaps), Some(1));
    assert_eq!(playback.advance(&snaps), Some(2));
    assert!(playback.finished());

    // Terminal state is sticky: the last frame stays current
    assert_eq!(playback.advance(&snaps), None);
    assert_eq!(playback.advance(&snaps), None);
    assert_eq!(playback.current(), Some(2));
}

#[test]
fn playback_records_each_frame_into_trails() {
    let snaps: Vec<Snapshot> = (0..5)
        .map(|f| snapshot(f as f64, vec![particle([f as f64, 0.0, 0.0], [0.0; 3], 1.0)]))
        .collect();

    let mut playback = Playback::new(5, 1, 3);
    while playback.advance(&snaps).is_some() {}

    let xs: Vec<f64> = playback.trails().particle(0).map(|p| p.x).collect();
    assert_eq!(xs, vec![2.0, 3.0, 4.0]);
}

// ==================================================================================
// Loader tests
// ==================================================================================

#[test]
fn loader_detects_2d_run_from_columns() {
    let dir = temp_run_dir("detect-2d");
    write_file(&dir, "nbody-00000.csv", &two_particle_2d_csv(0.0, 0.0));

    let files = discover_snapshot_files(&dir, "nbody-").unwrap();
    let (snaps, dim) = load_snapshots(&files).unwrap();

    assert_eq!(dim, Dim::TwoD);
    assert_eq!(snaps[0].len(), 2);
    // 2D rows land in the shared 3-component type with z = 0
    assert_eq!(snaps[0].particles[0].x.z, 0.0);
    assert_eq!(snaps[0].particles[0].v.z, 0.0);
}

#[test]
fn loader_detects_3d_run_from_columns() {
    let dir = temp_run_dir("detect-3d");
    write_file(
        &dir,
        "nbody-00000.csv",
        "t,x0,x1,x2,v0,v1,v2,m\n0.0,1.0,2.0,3.0,0.0,0.0,4.0,1.0\n",
    );

    let files = discover_snapshot_files(&dir, "nbody-").unwrap();
    let (snaps, dim) = load_snapshots(&files).unwrap();

    assert_eq!(dim, Dim::ThreeD);
    assert_eq!(snaps[0].particles[0].x.z, 3.0);
    assert_eq!(snaps[0].speeds[0], 4.0);
}

#[test]
fn loader_orders_files_lexically() {
    let dir = temp_run_dir("ordering");
    // Written out of order on purpose
    write_file(&dir, "nbody-00002.csv", &two_particle_2d_csv(2.0, 0.0));
    write_file(&dir, "nbody-00000.csv", &two_particle_2d_csv(0.0, 0.0));
    write_file(&dir, "nbody-00001.csv", &two_particle_2d_csv(1.0, 0.0));

    let files = discover_snapshot_files(&dir, "nbody-").unwrap();
    let (snaps, _) = load_snapshots(&files).unwrap();

    let times: Vec<f64> = snaps.iter().map(|s| s.t).collect();
    assert_eq!(times, vec![0.0, 1.0, 2.0]);
}

#[test]
fn discovery_ignores_files_outside_the_contract() {
    let dir = temp_run_dir("filtering");
    write_file(&dir, "nbody-00000.csv", &two_particle_2d_csv(0.0, 0.0));
    write_file(&dir, "other-00000.csv", &two_particle_2d_csv(0.0, 0.0));
    write_file(&dir, "nbody-00000.txt", "not a snapshot");

    let files = discover_snapshot_files(&dir, "nbody-").unwrap();
    assert_eq!(files.len(), 1);
    assert!(files[0].ends_with("nbody-00000.csv"));
}

#[test]
fn loader_fails_on_missing_mass_column() {
    let dir = temp_run_dir("missing-mass");
    write_file(
        &dir,
        "nbody-00000.csv",
        "t,x0,x1,v0,v1\n0.0,1.0,2.0,0.0,0.0\n",
    );

    let files = discover_snapshot_files(&dir, "nbody-").unwrap();
    let err = load_snapshots(&files).unwrap_err();
    assert!(matches!(err, ReplayError::MissingColumn { column: "m", .. }));
}

#[test]
fn loader_requires_both_third_components_for_3d() {
    let dir = temp_run_dir("missing-v2");
    write_file(
        &dir,
        "nbody-00000.csv",
        "t,x0,x1,x2,v0,v1,m\n0.0,1.0,2.0,3.0,0.0,0.0,1.0\n",
    );

    let files = discover_snapshot_files(&dir, "nbody-").unwrap();
    let err = load_snapshots(&files).unwrap_err();
    assert!(matches!(err, ReplayError::MissingColumn { column: "v2", .. }));
}

#[test]
fn loader_rejects_particle_count_changes() {
    let dir = temp_run_dir("count-mismatch");
    write_file(&dir, "nbody-00000.csv", &two_particle_2d_csv(0.0, 0.0));
    write_file(
        &dir,
        "nbody-00001.csv",
        "t,x0,x1,v0,v1,m\n1.0,0.0,0.0,0.0,0.0,1.0\n",
    );

    let files = discover_snapshot_files(&dir, "nbody-").unwrap();
    let err = load_snapshots(&files).unwrap_err();
    assert!(matches!(
        err,
        ReplayError::ParticleCountMismatch {
            expected: 2,
            got: 1,
            ..
        }
    ));
}

#[test]
fn loader_rejects_dimensionality_changes() {
    let dir = temp_run_dir("dim-mismatch");
    write_file(&dir, "nbody-00000.csv", &two_particle_2d_csv(0.0, 0.0));
    write_file(
        &dir,
        "nbody-00001.csv",
        "t,x0,x1,x2,v0,v1,v2,m\n1.0,0.0,0.0,0.0,0.0,0.0,0.0,1.0\n1.0,0.0,0.0,0.0,0.0,0.0,0.0,1.0\n",
    );

    let files = discover_snapshot_files(&dir, "nbody-").unwrap();
    let err = load_snapshots(&files).unwrap_err();
    assert!(matches!(err, ReplayError::DimensionMismatch { .. }));
}

// ==================================================================================
// End-to-end scenarios
// ==================================================================================

/// A 3-file, 2-particle 2D run plays through every frame, trails stay within
/// the run length, and the final frame index is 2.
#[test]
fn short_2d_run_plays_to_the_last_frame() {
    let dir = temp_run_dir("playthrough");
    for step in 0..3 {
        write_file(
            &dir,
            &format!("nbody-0000{step}.csv"),
            &two_particle_2d_csv(step as f64, step as f64 * 0.5),
        );
    }

    let files = discover_snapshot_files(&dir, "nbody-").unwrap();
    assert_eq!(files.len(), 3);
    let (snapshots, dim) = load_snapshots(&files).unwrap();
    assert_eq!(dim, Dim::TwoD);

    let mut playback = Playback::new(snapshots.len(), snapshots[0].len(), TrailSet::DEFAULT_LENGTH);
    while playback.advance(&snapshots).is_some() {
        for i in 0..snapshots[0].len() {
            assert!(playback.trails().len(i) <= 3);
        }
    }

    assert_eq!(playback.current(), Some(2));
    assert!(playback.finished());
    assert_eq!(snapshots[2].t, 2.0);
}

/// A directory with no matching files is a graceful no-op, not an error.
#[test]
fn empty_directory_yields_no_files_without_error() {
    let dir = temp_run_dir("no-files");
    let files = discover_snapshot_files(&dir, "nbody-").unwrap();
    assert!(files.is_empty());
}

/// A missing input directory fails before anything is read.
#[test]
fn missing_directory_fails_up_front() {
    let dir = std::env::temp_dir().join("nbody-replay-test-does-not-exist");
    let _ = fs::remove_dir_all(&dir);
    let err = discover_snapshot_files(&dir, "nbody-").unwrap_err();
    assert!(matches!(err, ReplayError::PathNotFound(_)));
}
