//! Folder hierarchy enumeration and materialization.
//!
//! Output documents are stored per advisor and per document type. The
//! hierarchy is described as an ordered sequence of levels (level 0
//! outermost), each level a list of directory names, and materialized as
//! the full cartesian product of all levels under
//! `<root>/<top_level_dir>/`.
//!
//! Creation is idempotent: existing directories are not an error, and
//! `create_dir_all` keeps concurrent creation of a shared advisor
//! directory safe. There is no rollback on partial failure; directories
//! created before the failing one remain (documented limitation).

use std::fs;
use std::path::{Path, PathBuf};

use itertools::Itertools;

use crate::error::Result;

/// Enumerate the cartesian product of all levels as relative paths.
///
/// Each produced path has exactly one component per level, level 0
/// outermost, in the order the level entries were given.
///
/// # Arguments
/// * `levels` - Ordered directory levels, outermost first
///
/// # Returns
/// One relative `PathBuf` per combination; empty input yields no paths.
#[must_use]
pub fn enumerate_paths(levels: &[Vec<String>]) -> Vec<PathBuf> {
    if levels.is_empty() {
        return Vec::new();
    }

    levels
        .iter()
        .map(|level| level.iter())
        .multi_cartesian_product()
        .map(|parts| parts.into_iter().collect::<PathBuf>())
        .collect()
}

/// Create the full hierarchy under `root/top_level_dir`.
///
/// # Arguments
/// * `root` - Existing directory the hierarchy is rooted in
/// * `top_level_dir` - Name of the directory holding all output
/// * `levels` - Ordered directory levels, outermost first
///
/// # Returns
/// The absolute paths of all leaf directories, in enumeration order.
///
/// # Errors
/// Returns an IO error if a directory cannot be created. Directories
/// created before the failure are left in place.
pub fn materialize(root: &Path, top_level_dir: &str, levels: &[Vec<String>]) -> Result<Vec<PathBuf>> {
    let base = root.join(top_level_dir);

    let paths: Vec<PathBuf> = enumerate_paths(levels)
        .into_iter()
        .map(|relative| base.join(relative))
        .collect();

    log::info!(
        "materializing {} directories under {}",
        paths.len(),
        base.display()
    );

    for path in &paths {
        fs::create_dir_all(path)?;
    }

    Ok(paths)
}
