//! Runs washes over many files: gathering inputs, choosing output names that
//! never overwrite anything, and summarising the outcomes.

use std::{
    collections::HashSet,
    ffi::OsString,
    fs,
    path::{Path, PathBuf},
};

use log::info;
use rand::{SeedableRng, rngs::StdRng};
use rayon::prelude::*;
use walkdir::WalkDir;

use crate::{WashResult, Washer, error::Result, image_utils::display_name, processing::WashFormat};

/// Expands files and directories (recursively) into the supported images
/// they contain. Order follows the arguments; duplicates are dropped.
pub fn collect_images<P: AsRef<Path>>(paths: &[P]) -> Vec<PathBuf> {
    let mut seen = HashSet::new();
    let mut images = Vec::new();

    for path in paths {
        let path = path.as_ref();

        let candidates: Vec<PathBuf> = if path.is_dir() {
            WalkDir::new(path)
                .sort_by_file_name()
                .into_iter()
                .filter_map(|entry| entry.ok())
                .filter(|entry| entry.file_type().is_file())
                .map(|entry| entry.into_path())
                .collect()
        } else {
            vec![path.to_path_buf()]
        };

        for candidate in candidates {
            if WashFormat::is_supported(&candidate) && seen.insert(candidate.clone()) {
                images.push(candidate);
            }
        }
    }

    images
}

/// Picks `dir/name.ext`, or the first free `dir/name (copy N).ext`. A path
/// is free when it does not exist on disk and is not in `claimed`.
pub fn resolve_output_path(output_dir: &Path, input: &Path, claimed: &HashSet<PathBuf>) -> PathBuf {
    let is_free = |candidate: &Path| !candidate.exists() && !claimed.contains(candidate);

    let file_name = input
        .file_name()
        .map(OsString::from)
        .unwrap_or_else(|| OsString::from("image"));
    let candidate = output_dir.join(&file_name);
    if is_free(&candidate) {
        return candidate;
    }

    let stem = Path::new(&file_name)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let extension = Path::new(&file_name)
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_default();

    let mut count = 1u32;
    loop {
        let candidate = output_dir.join(format!("{stem} (copy {count}){extension}"));
        if is_free(&candidate) {
            return candidate;
        }
        count += 1;
    }
}

#[derive(Debug)]
pub struct BatchEntry {
    pub input: PathBuf,
    pub output: PathBuf,
    pub result: WashResult,
}

#[derive(Debug, Default)]
pub struct BatchSummary {
    pub entries: Vec<BatchEntry>,
}

impl BatchSummary {
    pub fn total(&self) -> usize {
        self.entries.len()
    }

    pub fn succeeded(&self) -> usize {
        self.entries.iter().filter(|e| e.result.is_success()).count()
    }

    pub fn failed(&self) -> usize {
        self.total() - self.succeeded()
    }
}

impl Washer {
    /// Washes every input into `output_dir`, creating it when missing.
    ///
    /// Output names are all resolved before any washing starts. With `seed`
    /// set, file `i` uses a generator seeded with `seed + i`, so results do
    /// not depend on scheduling.
    pub fn wash_batch(&self, inputs: &[PathBuf], output_dir: &Path, seed: Option<u64>) -> Result<BatchSummary> {
        fs::create_dir_all(output_dir)?;

        let mut claimed = HashSet::new();
        let plans = inputs
            .iter()
            .map(|input| {
                let output = resolve_output_path(output_dir, input, &claimed);
                claimed.insert(output.clone());
                (input.clone(), output)
            })
            .collect::<Vec<_>>();

        let total = plans.len();
        info!("Washing {} file(s) into {}", total, output_dir.display());

        let wash_one = |(index, (input, output)): (usize, (PathBuf, PathBuf))| {
            info!("({}/{}) Processing: {}", index + 1, total, display_name(&input));
            let result = match seed {
                Some(seed) => {
                    let mut rng = StdRng::seed_from_u64(seed.wrapping_add(index as u64));
                    self.wash_with_rng(&input, &output, &mut rng)
                }
                None => self.wash(&input, &output),
            };
            BatchEntry { input, output, result }
        };

        let entries: Vec<BatchEntry> = if self.config().parallel {
            plans.into_par_iter().enumerate().map(wash_one).collect()
        } else {
            plans.into_iter().enumerate().map(wash_one).collect()
        };

        let summary = BatchSummary { entries };
        info!(
            "Finished: {} of {} file(s) washed, {} failed",
            summary.succeeded(),
            summary.total(),
            summary.failed()
        );

        Ok(summary)
    }
}
