//! `histcmp` compares histograms and graphs across multiple files
//!
//! All plottable objects in a reference file are compared to the
//! objects with the same path in any number of other files. Objects
//! are rescaled to a common normalisation and optionally divided by
//! the reference, with uncertainties propagated to the ratio.
//!
//! # How to use
//!
//! The `histcmp` binary covers the most common use case. For use as a
//! library, open the inputs with [file::open], collect them in a
//! [comparison::ComparisonSet], and pass it to a
//! [driver::ComparisonDriver] together with a [traits::Sink] such as a
//! `Vec` or a [writer::ArchiveWriter].
//!
//! ## Most relevant modules
//!
//! - [prelude] exports a list of the most relevant classes and objects
//! - [catalog] finds the objects to compare
//! - [normalize] for rescaling
//! - [ratio] for ratios with uncertainties
//! - [driver] ties everything together
//!

/// Discovery of comparable objects
pub mod catalog;
/// Sets of inputs to compare
pub mod comparison;
/// Output compression
pub mod compression;
/// Run settings
pub mod config;
/// In-memory containers
pub mod container;
/// Comparison of objects across all inputs
pub mod driver;
/// Reading containers from files
pub mod file;
/// Rescaling to a common normalisation
pub mod normalize;
/// Histograms, profiles, and graphs
pub mod object;
/// Most important exports
pub mod prelude;
/// Progress bar
pub mod progress_bar;
/// Ratios with uncertainties
pub mod ratio;
/// Common traits
pub mod traits;
/// Output archive
pub mod writer;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const GIT_REV: Option<&str> = option_env!("VERGEN_GIT_SHA");
pub const GIT_BRANCH: Option<&str> = option_env!("VERGEN_GIT_BRANCH");
