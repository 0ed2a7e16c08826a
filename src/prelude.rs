pub use crate::{
    comparison::{ComparisonSet, Labelled},
    config::{AxisName, AxisRanges, NamePattern, RunConfig},
    container::Directory,
    driver::{Comparison, ComparisonDriver, RunSummary},
    object::{PlotKind, PlotObject},
    traits::{Container, Sink},
    writer::{Archive, ArchiveWriter},
};
