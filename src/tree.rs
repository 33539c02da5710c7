//! Stubbing a directory of compiled classes
//!
//! Every `.class` file under the input directory is stubbed into the same
//! relative path under the output directory. Classes are independent, so they
//! are sharded across a rayon pool. One broken class does not stop the rest;
//! its error is collected in [`TreeReport::failures`].

use std::fs;
use std::path::{Path, PathBuf};

use rayon::prelude::*;
use walkdir::WalkDir;

use crate::config::StubConfig;
use crate::consts::CLASS_FILE_EXTENSION;
use crate::error::{Error, Result};

#[derive(Debug, Default)]
pub struct TreeReport {
    /// Relative paths of the stubs written
    pub stubbed: Vec<PathBuf>,
    /// Classes that could not be stubbed, each wrapped in [`Error::File`]
    pub failures: Vec<Error>,
}

impl TreeReport {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Stub every class under `input_dir` into `output_dir`
///
/// Errors returned directly are the ones that prevent the walk itself:
/// an unreadable input directory or a thread pool that cannot start.
pub fn stub_tree(input_dir: &Path, output_dir: &Path, config: &StubConfig) -> Result<TreeReport> {
    let classes = collect_classes(input_dir)?;
    log::info!("stubbing {} classes from {}", classes.len(), input_dir.display());

    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(threads) = config.threads {
        builder = builder.num_threads(threads);
    }
    let pool = builder.build()?;

    let results: Vec<(PathBuf, Result<()>)> = pool.install(|| {
        classes
            .par_iter()
            .map(|relative| {
                let result = stub_file(&input_dir.join(relative), &output_dir.join(relative), config);
                (relative.clone(), result)
            })
            .collect()
    });

    let mut report = TreeReport::default();
    for (relative, result) in results {
        match result {
            Ok(()) => report.stubbed.push(relative),
            Err(e) => {
                log::warn!("failed to stub {}: {}", relative.display(), e);
                report.failures.push(e.in_file(relative));
            }
        }
    }
    log::info!("stubbed {} classes, {} failed", report.stubbed.len(), report.failures.len());
    Ok(report)
}

/// Relative paths of all class files below `root`, in walk order
fn collect_classes(root: &Path) -> Result<Vec<PathBuf>> {
    let mut classes = Vec::new();
    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        if path.extension().map_or(false, |ext| ext == CLASS_FILE_EXTENSION) {
            if let Ok(relative) = path.strip_prefix(root) {
                classes.push(relative.to_path_buf());
            }
        }
    }
    Ok(classes)
}

fn stub_file(input: &Path, output: &Path, config: &StubConfig) -> Result<()> {
    let bytes = fs::read(input)?;
    let stub = crate::stub_bytes(&bytes, config)?;
    if let Some(parent) = output.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(output, stub)?;
    log::debug!("wrote {}", output.display());
    Ok(())
}
