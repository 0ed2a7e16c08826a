//! Discovery of comparable objects
use std::collections::HashSet;
use std::fmt::{self, Display};

use log::{debug, trace};

use crate::config::{NamePattern, RunConfig};
use crate::container::{is_directory_tag, LookupError};
use crate::object::is_three_dimensional;
use crate::traits::Container;

/// Why an entry was not included in the list of objects
#[derive(Clone, Debug, PartialEq)]
pub enum SkipReason {
    /// Directory is in the exclusion list
    Excluded,
    /// Directory is deeper than the maximum search depth
    TooDeep,
    /// Three-dimensional objects cannot be compared
    ThreeDimensional,
    /// Neither a directory nor a plottable object
    NotPlottable(String),
    /// Path does not match the include pattern
    NoMatch,
    /// Sub-directory could not be read
    Unreadable(LookupError),
}

impl Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use SkipReason::*;
        match self {
            Excluded => write!(f, "excluded"),
            TooDeep => write!(f, "maximum depth exceeded"),
            ThreeDimensional => write!(f, "three-dimensional object"),
            NotPlottable(tag) => write!(f, "type {tag} cannot be compared"),
            NoMatch => write!(f, "does not match the include pattern"),
            Unreadable(err) => write!(f, "{err}"),
        }
    }
}

/// An entry that was left out during discovery
#[derive(Clone, Debug, PartialEq)]
pub struct Skipped {
    pub path: String,
    pub reason: SkipReason,
}

/// Result of a search for comparable objects
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Discovery {
    /// Full paths of all objects to compare, in discovery order
    pub paths: Vec<String>,
    pub skipped: Vec<Skipped>,
}

/// Classification of a container key by its type tag
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
enum KeyClass {
    Directory,
    Plottable,
    ThreeDimensional,
    Other,
}

fn classify(type_tag: &str) -> KeyClass {
    if is_directory_tag(type_tag) {
        KeyClass::Directory
    } else if is_three_dimensional(type_tag) {
        KeyClass::ThreeDimensional
    } else if type_tag.starts_with("TH")
        || type_tag.starts_with("TProfile")
        || type_tag.contains("Graph")
    {
        KeyClass::Plottable
    } else {
        KeyClass::Other
    }
}

/// Find all plottable objects in `container`
///
/// The search is depth-first, with objects listed in the order in
/// which they are encountered. Sub-containers deeper than `max_depth`
/// or with a name in `excluded` are not searched. If `include` is
/// given, only paths matching it completely are kept.
///
/// Nothing in here is fatal: everything that is left out is listed
/// in [Discovery::skipped] with the reason.
pub fn discover<C: Container>(
    container: &C,
    excluded: &HashSet<String>,
    max_depth: usize,
    include: Option<&NamePattern>,
) -> Discovery {
    let mut discovery = Discovery::default();
    collect(container, "", 0, excluded, max_depth, &mut discovery);
    debug!("Found {} plottable objects", discovery.paths.len());
    if let Some(include) = include {
        let (keep, rejected): (Vec<_>, Vec<_>) = std::mem::take(&mut discovery.paths)
            .into_iter()
            .partition(|p| include.is_match(p));
        debug!(
            "{} objects match `{include}`, {} do not",
            keep.len(),
            rejected.len()
        );
        discovery.paths = keep;
        discovery.skipped.extend(rejected.into_iter().map(|path| Skipped {
            path,
            reason: SkipReason::NoMatch,
        }));
    }
    discovery
}

/// [discover] with the settings from a [RunConfig]
pub fn discover_with<C: Container>(container: &C, config: &RunConfig) -> Discovery {
    discover(
        container,
        &config.excluded,
        config.max_depth,
        config.include.as_ref(),
    )
}

fn collect<C: Container>(
    container: &C,
    prefix: &str,
    depth: usize,
    excluded: &HashSet<String>,
    max_depth: usize,
    discovery: &mut Discovery,
) {
    for key in container.keys() {
        let path = if prefix.is_empty() {
            key.name.clone()
        } else {
            format!("{prefix}/{}", key.name)
        };
        let reason = match classify(&key.type_tag) {
            KeyClass::Plottable => {
                trace!("Found {path} of type {}", key.type_tag);
                discovery.paths.push(path);
                continue;
            }
            KeyClass::Directory if excluded.contains(&key.name) => {
                debug!("Skipping excluded directory {path}");
                SkipReason::Excluded
            }
            KeyClass::Directory if depth >= max_depth => {
                debug!("Not descending into {path}: maximum depth reached");
                SkipReason::TooDeep
            }
            KeyClass::Directory => match container.get_directory(&key.name) {
                Ok(sub) => {
                    collect(sub, &path, depth + 1, excluded, max_depth, discovery);
                    continue;
                }
                Err(err) => {
                    debug!("Failed to read directory {path}: {err}");
                    SkipReason::Unreadable(err)
                }
            },
            KeyClass::ThreeDimensional => SkipReason::ThreeDimensional,
            KeyClass::Other => SkipReason::NotPlottable(key.type_tag.clone()),
        };
        discovery.skipped.push(Skipped { path, reason });
    }
}
