//! Sets of inputs to compare
use std::path::Path;

use log::{debug, info};
use serde::Serialize;
use thiserror::Error;

use crate::catalog::{discover_with, Skipped};
use crate::compression::COMPRESSION_SUFFIXES;
use crate::config::RunConfig;
use crate::object::PlotObject;
use crate::traits::Container;

const CONTAINER_SUFFIXES: [&str; 3] = [".root", ".yaml", ".yml"];

#[derive(Debug, Clone, Eq, PartialEq, Error)]
pub enum ConfigError {
    #[error("No input files")]
    NoInputs,
    #[error("Got {labels} labels for {inputs} input files")]
    LabelCount { labels: usize, inputs: usize },
}

/// An object together with the label of the input it came from
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Labelled {
    pub label: String,
    /// Factor by which the object was rescaled
    pub scale: f64,
    pub object: PlotObject,
}

/// Label for an input file derived from its name
///
/// Leading directories are removed, followed by a compression suffix
/// and a container suffix. `/data/run_a.yaml.gz` becomes `run_a`.
pub fn derive_label<P: AsRef<Path>>(path: P) -> String {
    let path = path.as_ref();
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy())
        .unwrap_or_else(|| path.to_string_lossy());
    let mut label: &str = &name;
    if let Some(stripped) = COMPRESSION_SUFFIXES
        .iter()
        .find_map(|suffix| label.strip_suffix(suffix))
    {
        label = stripped;
    }
    if let Some(stripped) = CONTAINER_SUFFIXES
        .iter()
        .find_map(|suffix| label.strip_suffix(suffix))
    {
        label = stripped;
    }
    label.to_owned()
}

/// Labels for the given input files
///
/// Explicit labels have to match the number of files. Otherwise
/// labels are derived from the file names.
pub fn labels_for<P: AsRef<Path>>(
    files: &[P],
    explicit: Option<Vec<String>>,
) -> Result<Vec<String>, ConfigError> {
    match explicit {
        Some(labels) if labels.len() != files.len() => Err(ConfigError::LabelCount {
            labels: labels.len(),
            inputs: files.len(),
        }),
        Some(labels) => Ok(labels),
        None => Ok(files.iter().map(derive_label).collect()),
    }
}

/// Containers to compare, with the first one as reference
#[derive(Clone, Debug)]
pub struct ComparisonSet<C> {
    containers: Vec<C>,
    labels: Vec<String>,
    paths: Vec<String>,
    skipped: Vec<Skipped>,
}

impl<C: Container> ComparisonSet<C> {
    /// Set up a comparison and discover the objects to compare
    ///
    /// Objects are searched in the reference container only.
    pub fn new(
        containers: Vec<C>,
        labels: Vec<String>,
        config: &RunConfig,
    ) -> Result<Self, ConfigError> {
        if containers.is_empty() {
            return Err(ConfigError::NoInputs);
        }
        if labels.len() != containers.len() {
            return Err(ConfigError::LabelCount {
                labels: labels.len(),
                inputs: containers.len(),
            });
        }
        let discovery = discover_with(&containers[0], config);
        info!(
            "Found {} objects to compare in `{}`",
            discovery.paths.len(),
            labels[0]
        );
        for skipped in &discovery.skipped {
            debug!("Skipping {}: {}", skipped.path, skipped.reason);
        }
        Ok(Self {
            containers,
            labels,
            paths: discovery.paths,
            skipped: discovery.skipped,
        })
    }
}

impl<C> ComparisonSet<C> {
    pub fn len(&self) -> usize {
        self.containers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.containers.is_empty()
    }

    pub fn reference(&self) -> &C {
        &self.containers[0]
    }

    pub fn containers(&self) -> &[C] {
        &self.containers
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Full paths of the objects to compare
    pub fn paths(&self) -> &[String] {
        &self.paths
    }

    /// Entries left out while searching the reference
    pub fn skipped(&self) -> &[Skipped] {
        &self.skipped
    }
}
