//! Ratios with propagated uncertainties
//!
//! All ratios are computed element by element. The uncertainty of
//! `y / y_ref` is obtained by first-order propagation, treating
//! numerator and denominator as independent:
//!
//! δ(y / y_ref) = sqrt( (δy / y_ref)² + (δy_ref · y / y_ref²)² )
//!
//! For graphs with asymmetric errors, lower and upper errors are
//! propagated separately.
//!
//! Division by zero is not guarded: a vanishing denominator yields
//! infinite or NaN values in the result, following IEEE 754. Use
//! [has_zero_divisor] to check beforehand. Collections are the
//! exception: members with a vanishing denominator are dropped from
//! the result.
use itertools::izip;
use log::warn;
use serde::Serialize;
use thiserror::Error;

use crate::comparison::Labelled;
use crate::config::{Range, RunConfig};
use crate::object::{Collection, Graph, Hist1D, Hist2D, PlotKind, PlotObject, Point};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum RatioError {
    #[error("Different number of {what}: {numerator} in numerator, {denominator} in denominator")]
    ShapeMismatch {
        what: &'static str,
        numerator: usize,
        denominator: usize,
    },
    #[error("Bin edges differ between numerator and denominator")]
    BinningMismatch,
    #[error("Cannot divide {0} by {1}")]
    KindMismatch(PlotKind, PlotKind),
}

/// Settings for ratio computation
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct RatioOptions {
    /// Require identical bin edges, not just the same number of bins
    pub require_equal_edges: bool,
    /// Fail on collections with different numbers of members
    ///
    /// Otherwise, only the leading members are divided.
    pub strict_collections: bool,
}

impl Default for RatioOptions {
    fn default() -> Self {
        Self {
            require_equal_edges: true,
            strict_collections: false,
        }
    }
}

impl From<&RunConfig> for RatioOptions {
    fn from(config: &RunConfig) -> Self {
        Self {
            require_equal_edges: config.require_equal_edges,
            strict_collections: config.strict_collections,
        }
    }
}

/// Ratio `y / y_ref` and its uncertainty
pub fn quotient(y: f64, err: f64, y_ref: f64, err_ref: f64) -> (f64, f64) {
    let ratio = y / y_ref;
    let err = (err / y_ref).hypot(err_ref * y / (y_ref * y_ref));
    (ratio, err)
}

/// Element-wise division
pub trait Divide: Sized {
    /// Divide `self` by `denominator`
    ///
    /// Neither input is modified. On success, the result has the
    /// shape of `self`.
    fn divide(&self, denominator: &Self, opts: &RatioOptions) -> Result<Self, RatioError>;

    /// Whether any element would be a vanishing divisor
    fn has_zero(&self) -> bool;
}

fn check_count(what: &'static str, numerator: usize, denominator: usize) -> Result<(), RatioError> {
    if numerator == denominator {
        Ok(())
    } else {
        Err(RatioError::ShapeMismatch {
            what,
            numerator,
            denominator,
        })
    }
}

fn divide_elements(
    contents: &mut [f64],
    errors: &mut [f64],
    ref_contents: &[f64],
    ref_errors: &[f64],
) {
    for (y, err, &y_ref, &err_ref) in izip!(contents, errors, ref_contents, ref_errors) {
        (*y, *err) = quotient(*y, *err, y_ref, err_ref);
    }
}

impl Divide for Graph {
    fn divide(&self, denominator: &Self, _opts: &RatioOptions) -> Result<Self, RatioError> {
        divide_points(self, denominator)
    }

    fn has_zero(&self) -> bool {
        self.points().iter().any(|p| p.y == 0.)
    }
}

/// Divide the y values of two graphs point by point
///
/// The x values and errors are taken from the numerator.
pub fn divide_points(numerator: &Graph, denominator: &Graph) -> Result<Graph, RatioError> {
    check_count("points", numerator.len(), denominator.len())?;
    let points = numerator
        .points()
        .iter()
        .zip(denominator.points())
        .map(|(p, p_ref)| {
            let (y, ey_low) = quotient(p.y, p.ey_low, p_ref.y, p_ref.ey_low);
            let (_, ey_high) = quotient(p.y, p.ey_high, p_ref.y, p_ref.ey_high);
            Point {
                y,
                ey_low,
                ey_high,
                ..*p
            }
        })
        .collect();
    let mut ratio = Graph::new(points);
    ratio.title = numerator.title.clone();
    Ok(ratio)
}

impl Divide for Hist1D {
    fn divide(&self, denominator: &Self, opts: &RatioOptions) -> Result<Self, RatioError> {
        check_count("bins", self.nbins(), denominator.nbins())?;
        if opts.require_equal_edges && !self.axis().same_binning(denominator.axis()) {
            return Err(RatioError::BinningMismatch);
        }
        let mut ratio = self.clone();
        let (contents, errors) = ratio.contents_and_errors_mut();
        divide_elements(contents, errors, denominator.contents(), denominator.errors());
        Ok(ratio)
    }

    fn has_zero(&self) -> bool {
        self.contents().iter().any(|&c| c == 0.)
    }
}

impl Divide for Hist2D {
    fn divide(&self, denominator: &Self, opts: &RatioOptions) -> Result<Self, RatioError> {
        check_count("bins", self.nbins(), denominator.nbins())?;
        if opts.require_equal_edges
            && !(self.x_axis().same_binning(denominator.x_axis())
                && self.y_axis().same_binning(denominator.y_axis()))
        {
            return Err(RatioError::BinningMismatch);
        }
        let mut ratio = self.clone();
        let (contents, errors) = ratio.contents_and_errors_mut();
        divide_elements(contents, errors, denominator.contents(), denominator.errors());
        Ok(ratio)
    }

    fn has_zero(&self) -> bool {
        self.contents().iter().any(|&c| c == 0.)
    }
}

impl Divide for Collection {
    fn divide(&self, denominator: &Self, opts: &RatioOptions) -> Result<Self, RatioError> {
        divide_collections(self, denominator, opts)
    }

    fn has_zero(&self) -> bool {
        self.members().iter().any(has_zero_divisor)
    }
}

/// Divide two collections member by member
///
/// Members whose denominator has a vanishing element, or whose
/// division fails, are dropped from the result with a warning.
pub fn divide_collections(
    numerator: &Collection,
    denominator: &Collection,
    opts: &RatioOptions,
) -> Result<Collection, RatioError> {
    if numerator.len() != denominator.len() {
        if opts.strict_collections {
            check_count("members", numerator.len(), denominator.len())?;
        }
        warn!(
            "Dividing collections with different number of members: {} and {}",
            numerator.len(),
            denominator.len()
        );
    }
    let mut members = Vec::with_capacity(numerator.len());
    for (n, (num, den)) in numerator.members().iter().zip(denominator.members()).enumerate() {
        if has_zero_divisor(den) {
            warn!("Dropping collection member {n} from ratio: division by zero");
            continue;
        }
        match divide(num, den, opts) {
            Ok(ratio) => members.push(ratio),
            Err(err) => warn!("Dropping collection member {n} from ratio: {err}"),
        }
    }
    Ok(numerator.with_members(members))
}

/// Divide two objects of compatible kinds
///
/// Graphs can be divided by graphs of any kind. The result has the
/// kind of the numerator.
pub fn divide(
    numerator: &PlotObject,
    denominator: &PlotObject,
    opts: &RatioOptions,
) -> Result<PlotObject, RatioError> {
    use PlotObject::*;
    let ratio = match (numerator, denominator) {
        (Histogram1D(n), Histogram1D(d)) => Histogram1D(n.divide(d, opts)?),
        (Profile1D(n), Profile1D(d)) => Profile1D(n.divide(d, opts)?),
        (Histogram2D(n), Histogram2D(d)) => Histogram2D(n.divide(d, opts)?),
        (Profile2D(n), Profile2D(d)) => Profile2D(n.divide(d, opts)?),
        (Curve(n), Curve(d) | CurveSymmetric(d) | CurveAsymmetric(d)) => {
            Curve(n.divide(d, opts)?)
        }
        (CurveSymmetric(n), Curve(d) | CurveSymmetric(d) | CurveAsymmetric(d)) => {
            CurveSymmetric(n.divide(d, opts)?)
        }
        (CurveAsymmetric(n), Curve(d) | CurveSymmetric(d) | CurveAsymmetric(d)) => {
            CurveAsymmetric(n.divide(d, opts)?)
        }
        (CurveCollection(n), CurveCollection(d)) => CurveCollection(n.divide(d, opts)?),
        (HistogramStack(n), HistogramStack(d)) => HistogramStack(n.divide(d, opts)?),
        _ => {
            return Err(RatioError::KindMismatch(
                numerator.kind(),
                denominator.kind(),
            ))
        }
    };
    Ok(ratio)
}

/// Whether dividing by `obj` would divide by zero anywhere
pub fn has_zero_divisor(obj: &PlotObject) -> bool {
    use PlotObject::*;
    match obj {
        Histogram1D(h) | Profile1D(h) => h.has_zero(),
        Histogram2D(h) | Profile2D(h) => h.has_zero(),
        Curve(g) | CurveSymmetric(g) | CurveAsymmetric(g) => g.has_zero(),
        CurveCollection(c) | HistogramStack(c) => c.has_zero(),
    }
}

/// Ratios of all inputs to the reference, ready for display
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RatioView {
    /// Label of the reference input
    pub reference: String,
    /// Display range of the ratio axis
    pub range: Range,
    /// Whether to draw a line at one
    pub reference_line: bool,
    pub members: Vec<Labelled>,
}
