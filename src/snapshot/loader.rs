//! Snapshot discovery and CSV parsing.
//!
//! The producer writes one CSV per timestep with a zero-padded step index in
//! the file name, so lexical order of the discovered files is temporal order.
//! The column contract is `t,x0,x1,v0,v1,m` for 2D runs and
//! `t,x0,x1,x2,v0,v1,v2,m` for 3D runs; column order is irrelevant and extra
//! columns are ignored.
//!
//! Loading is fail-fast: the first unreadable or malformed file aborts the
//! whole run. There is no partial-sequence recovery.

use std::fs::{self, File};
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::ReplayError;
use crate::snapshot::states::{Dim, NVec3, Particle, Snapshot};

/// Columns every snapshot must carry, regardless of dimensionality.
const BASE_COLUMNS: [&str; 6] = ["t", "x0", "x1", "v0", "v1", "m"];

/// One CSV row. The third spatial/velocity components are absent in 2D files.
#[derive(Debug, Deserialize)]
struct SnapshotRow {
    t: f64,
    x0: f64,
    x1: f64,
    x2: Option<f64>,
    v0: f64,
    v1: f64,
    v2: Option<f64>,
    m: f64,
}

/// List the snapshot files of a run: every regular file in `dir` named
/// `{prefix}*.csv`, sorted lexically by file name.
///
/// An absent directory is an error; an empty result is not — the caller
/// decides whether "nothing to show" is worth a window.
pub fn discover_snapshot_files(dir: &Path, prefix: &str) -> Result<Vec<PathBuf>, ReplayError> {
    if !dir.is_dir() {
        return Err(ReplayError::PathNotFound(dir.to_owned()));
    }

    let entries = fs::read_dir(dir).map_err(|source| ReplayError::Io {
        path: dir.to_owned(),
        source,
    })?;

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|source| ReplayError::Io {
            path: dir.to_owned(),
            source,
        })?;
        let path = entry.path();
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if path.is_file() && name.starts_with(prefix) && name.ends_with(".csv") {
            files.push(path);
        }
    }

    // Producer zero-pads step indices, so this is temporal order.
    files.sort();
    Ok(files)
}

/// Load an ordered file list into an equally ordered snapshot sequence.
///
/// Dimensionality is decided once, from the first file's header, and every
/// later file must agree with it and with the first file's particle count.
pub fn load_snapshots(files: &[PathBuf]) -> Result<(Vec<Snapshot>, Dim), ReplayError> {
    log::info!("loading {} N-body snapshots...", files.len());

    let mut run_dim: Option<Dim> = None;
    let mut particle_count: Option<usize> = None;
    let mut snapshots = Vec::with_capacity(files.len());

    for path in files {
        snapshots.push(load_one(path, &mut run_dim, &mut particle_count)?);
    }

    let dim = run_dim.ok_or(ReplayError::EmptyData)?;
    log::info!(
        "loaded {} snapshots ({} particles, {})",
        snapshots.len(),
        particle_count.unwrap_or(0),
        dim
    );
    Ok((snapshots, dim))
}

fn load_one(
    path: &Path,
    run_dim: &mut Option<Dim>,
    particle_count: &mut Option<usize>,
) -> Result<Snapshot, ReplayError> {
    let file = File::open(path).map_err(|source| ReplayError::Io {
        path: path.to_owned(),
        source,
    })?;
    let mut reader = csv::Reader::from_reader(file);

    let headers = reader
        .headers()
        .map_err(|source| ReplayError::Parse {
            path: path.to_owned(),
            source,
        })?
        .clone();

    let dim = detect_dim(&headers);
    check_columns(path, &headers, dim)?;
    match run_dim {
        None => *run_dim = Some(dim),
        Some(expected) if *expected != dim => {
            return Err(ReplayError::DimensionMismatch {
                path: path.to_owned(),
                expected: *expected,
                got: dim,
            })
        }
        Some(_) => {}
    }

    let mut particles = Vec::new();
    let mut t = 0.0;
    for row in reader.deserialize::<SnapshotRow>() {
        let row = row.map_err(|source| ReplayError::Parse {
            path: path.to_owned(),
            source,
        })?;
        // Every row of a snapshot carries the same time stamp.
        t = row.t;
        particles.push(Particle {
            x: NVec3::new(row.x0, row.x1, row.x2.unwrap_or(0.0)),
            v: NVec3::new(row.v0, row.v1, row.v2.unwrap_or(0.0)),
            m: row.m,
        });
    }

    match particle_count {
        None => *particle_count = Some(particles.len()),
        Some(expected) if *expected != particles.len() => {
            return Err(ReplayError::ParticleCountMismatch {
                path: path.to_owned(),
                expected: *expected,
                got: particles.len(),
            })
        }
        Some(_) => {}
    }

    Ok(Snapshot::new(t, particles))
}

/// A third spatial or velocity column marks a 3D run.
fn detect_dim(headers: &csv::StringRecord) -> Dim {
    if headers.iter().any(|h| h == "x2" || h == "v2") {
        Dim::ThreeD
    } else {
        Dim::TwoD
    }
}

fn check_columns(
    path: &Path,
    headers: &csv::StringRecord,
    dim: Dim,
) -> Result<(), ReplayError> {
    let extra: &[&'static str] = match dim {
        Dim::TwoD => &[],
        Dim::ThreeD => &["x2", "v2"],
    };
    for &column in BASE_COLUMNS.iter().chain(extra) {
        if !headers.iter().any(|h| h == column) {
            return Err(ReplayError::MissingColumn {
                path: path.to_owned(),
                column,
            });
        }
    }
    Ok(())
}
