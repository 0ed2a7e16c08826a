use std::collections::HashSet;
use std::fmt::{self, Display};

use log::warn;
use regex::Regex;
use serde::Serialize;
use strum::Display;
use typed_builder::TypedBuilder;

/// Default maximum depth for the directory search
pub const DEFAULT_MAX_DEPTH: usize = 10;

/// Display range of ratio views if not configured otherwise
pub const DEFAULT_RATIO_RANGE: Range = Range { low: -4., high: 4. };

/// A regular expression that has to match a whole object path
#[derive(Clone, Debug)]
pub struct NamePattern {
    pattern: String,
    re: Regex,
}

impl NamePattern {
    pub fn new(pattern: &str) -> Result<Self, regex::Error> {
        let re = Regex::new(&format!("^(?:{pattern})$"))?;
        Ok(Self {
            pattern: pattern.to_owned(),
            re,
        })
    }

    pub fn is_match(&self, path: &str) -> bool {
        self.re.is_match(path)
    }

    pub fn as_str(&self) -> &str {
        &self.pattern
    }
}

impl Display for NamePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.pattern)
    }
}

/// An axis
#[derive(Copy, Clone, Debug, Display, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[strum(serialize_all = "lowercase")]
pub enum AxisName {
    X,
    Y,
    Z,
    Ratio,
}

/// An interval `[low, high]` with `low < high`
#[derive(Copy, Clone, Debug, PartialEq, PartialOrd, Serialize)]
pub struct Range {
    pub low: f64,
    pub high: f64,
}

impl Range {
    /// Accept a user-specified range for the given axis
    ///
    /// Returns `None` with a warning unless `high > low`.
    pub fn checked(axis: AxisName, low: f64, high: f64) -> Option<Self> {
        if high > low {
            Some(Self { low, high })
        } else {
            warn!("Ignoring invalid {axis} range [{low}, {high}]: upper limit has to exceed lower limit");
            None
        }
    }
}

impl Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.low, self.high)
    }
}

/// Optional axis range overrides
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize)]
pub struct AxisRanges {
    pub x: Option<Range>,
    pub y: Option<Range>,
    pub z: Option<Range>,
    pub ratio: Option<Range>,
}

impl AxisRanges {
    /// Set the range for an axis, ignoring invalid ranges
    pub fn set(&mut self, axis: AxisName, low: f64, high: f64) -> &mut Self {
        let range = Range::checked(axis, low, high);
        if range.is_some() {
            match axis {
                AxisName::X => self.x = range,
                AxisName::Y => self.y = range,
                AxisName::Z => self.z = range,
                AxisName::Ratio => self.ratio = range,
            }
        }
        self
    }

    /// The display range of ratio views
    pub fn ratio_or_default(&self) -> Range {
        self.ratio.unwrap_or(DEFAULT_RATIO_RANGE)
    }
}

/// Settings for a comparison run
///
/// This is constructed once and then only passed around by reference.
#[derive(Clone, Debug, TypedBuilder)]
pub struct RunConfig {
    /// Names of directories that are not searched
    #[builder(default, setter(into))]
    pub excluded: HashSet<String>,
    /// Maximum depth of the directory search
    #[builder(default = DEFAULT_MAX_DEPTH)]
    pub max_depth: usize,
    /// Only compare objects whose full path matches this pattern
    #[builder(default, setter(strip_option))]
    pub include: Option<NamePattern>,
    /// Rescale histograms to the integral of the reference
    #[builder(default = true)]
    pub rescale: bool,
    /// Compute ratios to the reference
    #[builder(default)]
    pub ratio: bool,
    /// Also emit objects without any content
    #[builder(default)]
    pub keep_empty: bool,
    /// Treat collections with different numbers of members as an error
    #[builder(default)]
    pub strict_collections: bool,
    /// Require identical bin edges for histogram ratios
    #[builder(default = true)]
    pub require_equal_edges: bool,
    #[builder(default)]
    pub ranges: AxisRanges,
    /// Draw a reference line at one in ratio views
    #[builder(default = true)]
    pub reference_line: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}
