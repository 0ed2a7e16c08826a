use std::ops::Add;

use serde::{Deserialize, Serialize};
use strum::Display;
use thiserror::Error;

/// The kind of a plottable object
#[derive(Copy, Clone, Debug, Display, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize)]
pub enum PlotKind {
    Histogram1D,
    Histogram2D,
    Profile1D,
    Profile2D,
    /// Graph without errors
    ///
    /// Error columns given for such a graph are ignored.
    Curve,
    /// Graph with symmetric errors
    CurveSymmetric,
    /// Graph with independent lower and upper errors
    CurveAsymmetric,
    /// Named collection of graphs (a multi-graph)
    CurveCollection,
    /// Named collection of histograms
    HistogramStack,
}

impl PlotKind {
    /// Determine the kind from a type tag like `TH1D` or `TGraphErrors`
    ///
    /// Returns `None` for everything that we cannot compare,
    /// including all three-dimensional objects.
    pub fn from_type_tag(tag: &str) -> Option<Self> {
        use PlotKind::*;
        if is_three_dimensional(tag) {
            return None;
        }
        let kind = if tag.starts_with("TProfile2D") {
            Profile2D
        } else if tag.starts_with("TProfile") {
            Profile1D
        } else if tag.starts_with("THStack") {
            HistogramStack
        } else if tag.starts_with("TH1") {
            Histogram1D
        } else if tag.starts_with("TH2") {
            Histogram2D
        } else if tag.starts_with("TMultiGraph") {
            CurveCollection
        } else if tag.starts_with("TGraphAsymmErrors") {
            CurveAsymmetric
        } else if tag.starts_with("TGraphErrors") {
            CurveSymmetric
        } else if tag == "TGraph" {
            Curve
        } else {
            return None;
        };
        Some(kind)
    }

    /// The canonical type tag used when writing objects of this kind
    pub fn type_tag(&self) -> &'static str {
        use PlotKind::*;
        match self {
            Histogram1D => "TH1D",
            Histogram2D => "TH2D",
            Profile1D => "TProfile",
            Profile2D => "TProfile2D",
            Curve => "TGraph",
            CurveSymmetric => "TGraphErrors",
            CurveAsymmetric => "TGraphAsymmErrors",
            CurveCollection => "TMultiGraph",
            HistogramStack => "THStack",
        }
    }

    /// Whether bins hold averages instead of counts
    pub fn is_average(&self) -> bool {
        matches!(self, PlotKind::Profile1D | PlotKind::Profile2D)
    }

    pub fn is_curve(&self) -> bool {
        use PlotKind::*;
        matches!(self, Curve | CurveSymmetric | CurveAsymmetric)
    }

    pub fn is_binned(&self) -> bool {
        use PlotKind::*;
        matches!(self, Histogram1D | Histogram2D | Profile1D | Profile2D)
    }

    pub fn is_collection(&self) -> bool {
        matches!(self, PlotKind::CurveCollection | PlotKind::HistogramStack)
    }

    /// Whether objects of the two kinds can be overlaid and divided
    ///
    /// Graphs are compatible with each other regardless of their errors,
    /// all other kinds only with themselves.
    pub fn is_compatible(&self, other: &PlotKind) -> bool {
        self == other || (self.is_curve() && other.is_curve())
    }
}

/// Whether the type tag belongs to a three-dimensional object
pub fn is_three_dimensional(tag: &str) -> bool {
    tag.contains("TH3") || tag.contains("3D") || tag.contains("Graph2D")
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ShapeError {
    #[error("An axis needs at least two edges, got {0}")]
    TooFewEdges(usize),
    #[error("Axis edges are not strictly increasing at index {0}")]
    NonIncreasingEdges(usize),
    #[error("Number of {what} ({found}) does not match the number of bins ({expected})")]
    BinCount {
        what: &'static str,
        found: usize,
        expected: usize,
    },
    #[error("Number of {what} ({found}) does not match the number of points ({expected})")]
    PointCount {
        what: &'static str,
        found: usize,
        expected: usize,
    },
    #[error("Collection member of kind {0} is not allowed in a {1}")]
    Member(PlotKind, PlotKind),
}

/// A binned axis
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "AxisRecord")]
pub struct Axis {
    edges: Vec<f64>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum AxisRecord {
    Edges { edges: Vec<f64> },
    Uniform { bins: usize, low: f64, high: f64 },
}

impl TryFrom<AxisRecord> for Axis {
    type Error = ShapeError;

    fn try_from(record: AxisRecord) -> Result<Self, Self::Error> {
        match record {
            AxisRecord::Edges { edges } => Axis::new(edges),
            AxisRecord::Uniform { bins, low, high } => {
                Axis::uniform(bins, low, high)
            }
        }
    }
}

impl Axis {
    /// Axis with the given bin edges
    pub fn new(edges: Vec<f64>) -> Result<Self, ShapeError> {
        if edges.len() < 2 {
            return Err(ShapeError::TooFewEdges(edges.len()));
        }
        if let Some(pos) = edges.windows(2).position(|w| !(w[0] < w[1])) {
            return Err(ShapeError::NonIncreasingEdges(pos + 1));
        }
        Ok(Self { edges })
    }

    /// Axis with `bins` bins of equal width between `low` and `high`
    pub fn uniform(bins: usize, low: f64, high: f64) -> Result<Self, ShapeError> {
        let width = (high - low) / bins as f64;
        let edges = (0..=bins).map(|i| low + i as f64 * width).collect();
        Self::new(edges)
    }

    pub fn nbins(&self) -> usize {
        self.edges.len() - 1
    }

    pub fn edges(&self) -> &[f64] {
        &self.edges
    }

    pub fn width(&self, bin: usize) -> f64 {
        self.edges[bin + 1] - self.edges[bin]
    }

    pub fn center(&self, bin: usize) -> f64 {
        0.5 * (self.edges[bin] + self.edges[bin + 1])
    }

    /// Whether both axes have the same bin edges
    ///
    /// Edges are compared with a relative tolerance of `1e-9`.
    pub fn same_binning(&self, other: &Axis) -> bool {
        const TOLERANCE: f64 = 1e-9;
        self.edges.len() == other.edges.len()
            && self.edges.iter().zip(&other.edges).all(|(a, b)| {
                (a - b).abs() <= TOLERANCE * a.abs().max(b.abs()).max(1.)
            })
    }
}

/// A one-dimensional histogram or profile
///
/// For profiles, `contents` holds the mean value in each bin and
/// `errors` the corresponding uncertainty.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Hist1DRecord")]
pub struct Hist1D {
    pub title: String,
    axis: Axis,
    contents: Vec<f64>,
    errors: Vec<f64>,
    pub entries: f64,
}

#[derive(Deserialize)]
struct Hist1DRecord {
    #[serde(default)]
    title: String,
    axis: Axis,
    contents: Vec<f64>,
    #[serde(default)]
    errors: Option<Vec<f64>>,
    #[serde(default)]
    entries: Option<f64>,
}

impl TryFrom<Hist1DRecord> for Hist1D {
    type Error = ShapeError;

    fn try_from(r: Hist1DRecord) -> Result<Self, Self::Error> {
        let mut hist = Hist1D::new(r.axis, r.contents, r.errors)?;
        hist.title = r.title;
        if let Some(entries) = r.entries {
            hist.entries = entries;
        }
        Ok(hist)
    }
}

impl Hist1D {
    /// Construct a histogram
    ///
    /// Without explicit `errors`, the error in each bin is the square
    /// root of its content. The number of entries is initialised to
    /// the sum of contents.
    pub fn new(
        axis: Axis,
        contents: Vec<f64>,
        errors: Option<Vec<f64>>,
    ) -> Result<Self, ShapeError> {
        let expected = axis.nbins();
        check_len("contents", contents.len(), expected)?;
        let errors = match errors {
            Some(errors) => {
                check_len("errors", errors.len(), expected)?;
                errors
            }
            None => poisson_errors(&contents),
        };
        let entries = contents.iter().sum();
        Ok(Self {
            title: String::new(),
            axis,
            contents,
            errors,
            entries,
        })
    }

    pub fn axis(&self) -> &Axis {
        &self.axis
    }

    pub fn nbins(&self) -> usize {
        self.contents.len()
    }

    pub fn contents(&self) -> &[f64] {
        &self.contents
    }

    pub fn errors(&self) -> &[f64] {
        &self.errors
    }

    pub(crate) fn contents_and_errors_mut(&mut self) -> (&mut [f64], &mut [f64]) {
        (&mut self.contents, &mut self.errors)
    }

    /// Sum of bin contents times bin widths
    pub fn integral_width(&self) -> f64 {
        self.contents
            .iter()
            .enumerate()
            .map(|(i, c)| c * self.axis.width(i))
            .sum()
    }

    pub fn statistics(&self) -> Statistics {
        let weighted = self
            .contents
            .iter()
            .enumerate()
            .map(|(i, &c)| (self.axis.center(i), c));
        moments(self.entries, weighted, self.errors.iter().map(|e| e * e).sum())
    }
}

/// A two-dimensional histogram or profile
///
/// Contents and errors are stored row by row, i.e. the bin `(ix, iy)`
/// is at index `iy * nx + ix`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Hist2DRecord")]
pub struct Hist2D {
    pub title: String,
    x_axis: Axis,
    y_axis: Axis,
    contents: Vec<f64>,
    errors: Vec<f64>,
    pub entries: f64,
}

#[derive(Deserialize)]
struct Hist2DRecord {
    #[serde(default)]
    title: String,
    x_axis: Axis,
    y_axis: Axis,
    contents: Vec<f64>,
    #[serde(default)]
    errors: Option<Vec<f64>>,
    #[serde(default)]
    entries: Option<f64>,
}

impl TryFrom<Hist2DRecord> for Hist2D {
    type Error = ShapeError;

    fn try_from(r: Hist2DRecord) -> Result<Self, Self::Error> {
        let mut hist = Hist2D::new(r.x_axis, r.y_axis, r.contents, r.errors)?;
        hist.title = r.title;
        if let Some(entries) = r.entries {
            hist.entries = entries;
        }
        Ok(hist)
    }
}

impl Hist2D {
    pub fn new(
        x_axis: Axis,
        y_axis: Axis,
        contents: Vec<f64>,
        errors: Option<Vec<f64>>,
    ) -> Result<Self, ShapeError> {
        let expected = x_axis.nbins() * y_axis.nbins();
        check_len("contents", contents.len(), expected)?;
        let errors = match errors {
            Some(errors) => {
                check_len("errors", errors.len(), expected)?;
                errors
            }
            None => poisson_errors(&contents),
        };
        let entries = contents.iter().sum();
        Ok(Self {
            title: String::new(),
            x_axis,
            y_axis,
            contents,
            errors,
            entries,
        })
    }

    pub fn x_axis(&self) -> &Axis {
        &self.x_axis
    }

    pub fn y_axis(&self) -> &Axis {
        &self.y_axis
    }

    pub fn nbins(&self) -> usize {
        self.contents.len()
    }

    pub fn contents(&self) -> &[f64] {
        &self.contents
    }

    pub fn errors(&self) -> &[f64] {
        &self.errors
    }

    pub(crate) fn contents_and_errors_mut(&mut self) -> (&mut [f64], &mut [f64]) {
        (&mut self.contents, &mut self.errors)
    }

    /// Sum of bin contents times bin areas
    pub fn integral_width(&self) -> f64 {
        let nx = self.x_axis.nbins();
        self.contents
            .iter()
            .enumerate()
            .map(|(i, c)| {
                c * self.x_axis.width(i % nx) * self.y_axis.width(i / nx)
            })
            .sum()
    }

    /// Statistics of the projection onto the x axis
    pub fn statistics(&self) -> Statistics {
        let nx = self.x_axis.nbins();
        let weighted = self
            .contents
            .iter()
            .enumerate()
            .map(|(i, &c)| (self.x_axis.center(i % nx), c));
        moments(self.entries, weighted, self.errors.iter().map(|e| e * e).sum())
    }
}

/// A graph point
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub ex_low: f64,
    #[serde(default)]
    pub ex_high: f64,
    #[serde(default)]
    pub ey_low: f64,
    #[serde(default)]
    pub ey_high: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y, ..Default::default() }
    }

    pub fn with_y_errors(mut self, ey_low: f64, ey_high: f64) -> Self {
        self.ey_low = ey_low;
        self.ey_high = ey_high;
        self
    }

    pub fn with_x_errors(mut self, ex_low: f64, ex_high: f64) -> Self {
        self.ex_low = ex_low;
        self.ex_high = ex_high;
        self
    }
}

/// An ordered sequence of points
///
/// Whether errors are absent, symmetric, or asymmetric is decided by
/// the [PlotObject] variant wrapping the graph.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "GraphRecord")]
pub struct Graph {
    pub title: String,
    points: Vec<Point>,
}

/// Column-wise graph description
///
/// Symmetric errors are given as `ex`, `ey`, asymmetric ones as
/// `ex_low`, `ex_high`, `ey_low`, `ey_high`.
#[derive(Deserialize)]
struct GraphRecord {
    #[serde(default)]
    title: String,
    x: Vec<f64>,
    y: Vec<f64>,
    #[serde(default)]
    ex: Option<Vec<f64>>,
    #[serde(default)]
    ey: Option<Vec<f64>>,
    #[serde(default)]
    ex_low: Option<Vec<f64>>,
    #[serde(default)]
    ex_high: Option<Vec<f64>>,
    #[serde(default)]
    ey_low: Option<Vec<f64>>,
    #[serde(default)]
    ey_high: Option<Vec<f64>>,
}

impl TryFrom<GraphRecord> for Graph {
    type Error = ShapeError;

    fn try_from(r: GraphRecord) -> Result<Self, Self::Error> {
        let n = r.x.len();
        let column = |what, col: Option<Vec<f64>>| -> Result<Vec<f64>, ShapeError> {
            match col {
                Some(col) if col.len() != n => Err(ShapeError::PointCount {
                    what,
                    found: col.len(),
                    expected: n,
                }),
                Some(col) => Ok(col),
                None => Ok(vec![0.; n]),
            }
        };
        let y = column("y values", Some(r.y))?;
        let ex = r.ex;
        let ey = r.ey;
        let ex_low = column("lower x errors", r.ex_low.or_else(|| ex.clone()))?;
        let ex_high = column("upper x errors", r.ex_high.or(ex))?;
        let ey_low = column("lower y errors", r.ey_low.or_else(|| ey.clone()))?;
        let ey_high = column("upper y errors", r.ey_high.or(ey))?;
        let points = (0..n)
            .map(|i| Point {
                x: r.x[i],
                y: y[i],
                ex_low: ex_low[i],
                ex_high: ex_high[i],
                ey_low: ey_low[i],
                ey_high: ey_high[i],
            })
            .collect();
        Ok(Graph {
            title: r.title,
            points,
        })
    }
}

impl Graph {
    pub fn new(points: Vec<Point>) -> Self {
        Self {
            title: String::new(),
            points,
        }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub(crate) fn points_mut(&mut self) -> &mut [Point] {
        &mut self.points
    }

    /// The same graph with all errors set to zero
    pub fn without_errors(mut self) -> Self {
        for p in &mut self.points {
            *p = Point { x: p.x, y: p.y, ..Default::default() };
        }
        self
    }

    /// Sum of all y values
    ///
    /// Each point counts as a bin of unit width.
    pub fn integral_width(&self) -> f64 {
        self.points.iter().map(|p| p.y).sum()
    }

    /// Number of points, mean of x values and its standard error
    pub fn statistics(&self) -> Statistics {
        let n = self.points.len();
        if n == 0 {
            return Statistics::default();
        }
        let nf = n as f64;
        let mean = self.points.iter().map(|p| p.x).sum::<f64>() / nf;
        let var = self
            .points
            .iter()
            .map(|p| (p.x - mean).powi(2))
            .sum::<f64>()
            / nf;
        Statistics {
            entries: nf,
            mean,
            mean_error: (var / nf).sqrt(),
        }
    }
}

/// An ordered collection of objects sharing a name scope
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Collection {
    pub title: String,
    members: Vec<PlotObject>,
}

impl Collection {
    /// Collection of graphs
    pub fn curves(members: Vec<PlotObject>) -> Result<Self, ShapeError> {
        Self::checked(members, PlotKind::CurveCollection, PlotKind::is_curve)
    }

    /// Stack of histograms or profiles
    pub fn histograms(members: Vec<PlotObject>) -> Result<Self, ShapeError> {
        Self::checked(members, PlotKind::HistogramStack, PlotKind::is_binned)
    }

    fn checked(
        members: Vec<PlotObject>,
        kind: PlotKind,
        allowed: fn(&PlotKind) -> bool,
    ) -> Result<Self, ShapeError> {
        if let Some(m) = members.iter().find(|m| !allowed(&m.kind())) {
            return Err(ShapeError::Member(m.kind(), kind));
        }
        Ok(Self {
            title: String::new(),
            members,
        })
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn members(&self) -> &[PlotObject] {
        &self.members
    }

    pub(crate) fn members_mut(&mut self) -> &mut [PlotObject] {
        &mut self.members
    }

    pub(crate) fn with_members(&self, members: Vec<PlotObject>) -> Self {
        Self {
            title: self.title.clone(),
            members,
        }
    }

    /// Sum of the integrals of all members that hold counts
    pub fn integral_width(&self) -> f64 {
        self.members
            .iter()
            .filter(|m| !m.kind().is_average())
            .map(PlotObject::integral_width)
            .sum()
    }

    pub fn statistics(&self) -> Statistics {
        self.members
            .iter()
            .map(PlotObject::statistics)
            .fold(Statistics::default(), |acc, s| acc + s)
    }
}

/// A plottable object
#[derive(Clone, Debug, PartialEq, Serialize)]
pub enum PlotObject {
    Histogram1D(Hist1D),
    Histogram2D(Hist2D),
    Profile1D(Hist1D),
    Profile2D(Hist2D),
    Curve(Graph),
    CurveSymmetric(Graph),
    CurveAsymmetric(Graph),
    CurveCollection(Collection),
    HistogramStack(Collection),
}

impl PlotObject {
    pub fn kind(&self) -> PlotKind {
        use PlotObject::*;
        match self {
            Histogram1D(_) => PlotKind::Histogram1D,
            Histogram2D(_) => PlotKind::Histogram2D,
            Profile1D(_) => PlotKind::Profile1D,
            Profile2D(_) => PlotKind::Profile2D,
            Curve(_) => PlotKind::Curve,
            CurveSymmetric(_) => PlotKind::CurveSymmetric,
            CurveAsymmetric(_) => PlotKind::CurveAsymmetric,
            CurveCollection(_) => PlotKind::CurveCollection,
            HistogramStack(_) => PlotKind::HistogramStack,
        }
    }

    pub fn title(&self) -> &str {
        use PlotObject::*;
        match self {
            Histogram1D(h) | Profile1D(h) => &h.title,
            Histogram2D(h) | Profile2D(h) => &h.title,
            Curve(g) | CurveSymmetric(g) | CurveAsymmetric(g) => &g.title,
            CurveCollection(c) | HistogramStack(c) => &c.title,
        }
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        use PlotObject::*;
        let title = title.into();
        match self {
            Histogram1D(h) | Profile1D(h) => h.title = title,
            Histogram2D(h) | Profile2D(h) => h.title = title,
            Curve(g) | CurveSymmetric(g) | CurveAsymmetric(g) => g.title = title,
            CurveCollection(c) | HistogramStack(c) => c.title = title,
        }
    }

    /// Integrated content, weighting each bin by its width or area
    pub fn integral_width(&self) -> f64 {
        use PlotObject::*;
        match self {
            Histogram1D(h) | Profile1D(h) => h.integral_width(),
            Histogram2D(h) | Profile2D(h) => h.integral_width(),
            Curve(g) | CurveSymmetric(g) | CurveAsymmetric(g) => g.integral_width(),
            CurveCollection(c) | HistogramStack(c) => c.integral_width(),
        }
    }

    pub fn statistics(&self) -> Statistics {
        use PlotObject::*;
        match self {
            Histogram1D(h) | Profile1D(h) => h.statistics(),
            Histogram2D(h) | Profile2D(h) => h.statistics(),
            Curve(g) | CurveSymmetric(g) | CurveAsymmetric(g) => g.statistics(),
            CurveCollection(c) | HistogramStack(c) => c.statistics(),
        }
    }
}

/// Summary statistics used to decide whether an object is empty
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize)]
pub struct Statistics {
    pub entries: f64,
    pub mean: f64,
    pub mean_error: f64,
}

impl Statistics {
    pub fn is_zero(&self) -> bool {
        self.entries == 0. && self.mean == 0. && self.mean_error == 0.
    }
}

impl Add for Statistics {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self {
            entries: self.entries + rhs.entries,
            mean: self.mean + rhs.mean,
            mean_error: self.mean_error + rhs.mean_error,
        }
    }
}

fn moments(
    entries: f64,
    weighted: impl Iterator<Item = (f64, f64)>,
    sum_err_sqr: f64,
) -> Statistics {
    let (mut sumw, mut sumwx, mut sumwx2) = (0., 0., 0.);
    for (x, w) in weighted {
        sumw += w;
        sumwx += w * x;
        sumwx2 += w * x * x;
    }
    if sumw == 0. {
        return Statistics {
            entries,
            ..Default::default()
        };
    }
    let mean = sumwx / sumw;
    let var = (sumwx2 / sumw - mean * mean).max(0.);
    let neff = sumw * sumw / sum_err_sqr;
    let mean_error = if neff > 0. { (var / neff).sqrt() } else { 0. };
    Statistics {
        entries,
        mean,
        mean_error,
    }
}

fn poisson_errors(contents: &[f64]) -> Vec<f64> {
    contents.iter().map(|c| c.abs().sqrt()).collect()
}

fn check_len(
    what: &'static str,
    found: usize,
    expected: usize,
) -> Result<(), ShapeError> {
    if found == expected {
        Ok(())
    } else {
        Err(ShapeError::BinCount {
            what,
            found,
            expected,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn type_tags() {
        use PlotKind::*;
        assert_eq!(PlotKind::from_type_tag("TH1F"), Some(Histogram1D));
        assert_eq!(PlotKind::from_type_tag("TH2D"), Some(Histogram2D));
        assert_eq!(PlotKind::from_type_tag("TProfile"), Some(Profile1D));
        assert_eq!(PlotKind::from_type_tag("TProfile2D"), Some(Profile2D));
        assert_eq!(PlotKind::from_type_tag("TGraph"), Some(Curve));
        assert_eq!(PlotKind::from_type_tag("TGraphErrors"), Some(CurveSymmetric));
        assert_eq!(
            PlotKind::from_type_tag("TGraphAsymmErrors"),
            Some(CurveAsymmetric)
        );
        assert_eq!(PlotKind::from_type_tag("TMultiGraph"), Some(CurveCollection));
        assert_eq!(PlotKind::from_type_tag("THStack"), Some(HistogramStack));
        assert_eq!(PlotKind::from_type_tag("TH3D"), None);
        assert_eq!(PlotKind::from_type_tag("TProfile3D"), None);
        assert_eq!(PlotKind::from_type_tag("TGraph2D"), None);
        assert_eq!(PlotKind::from_type_tag("TTree"), None);
    }

    #[test]
    fn axis() {
        assert_eq!(Axis::new(vec![0.]), Err(ShapeError::TooFewEdges(1)));
        assert_eq!(
            Axis::new(vec![0., 1., 1.]),
            Err(ShapeError::NonIncreasingEdges(2))
        );
        let axis = Axis::uniform(4, 0., 2.).unwrap();
        assert_eq!(axis.nbins(), 4);
        assert_eq!(axis.width(1), 0.5);
        assert_eq!(axis.center(0), 0.25);
        assert!(axis.same_binning(&Axis::new(vec![0., 0.5, 1., 1.5, 2.]).unwrap()));
        assert!(!axis.same_binning(&Axis::new(vec![0., 0.4, 1., 1.5, 2.]).unwrap()));
    }

    #[test]
    fn hist_defaults() {
        let axis = Axis::uniform(3, 0., 3.).unwrap();
        let hist = Hist1D::new(axis.clone(), vec![4., 0., 9.], None).unwrap();
        assert_eq!(hist.errors(), &[2., 0., 3.]);
        assert_eq!(hist.entries, 13.);
        assert_eq!(hist.integral_width(), 13.);
        assert!(Hist1D::new(axis, vec![1.], None).is_err());
    }

    #[test]
    fn hist2d_integral() {
        let x = Axis::new(vec![0., 1., 3.]).unwrap();
        let y = Axis::new(vec![0., 2.]).unwrap();
        let hist = Hist2D::new(x, y, vec![1., 1.], None).unwrap();
        assert_eq!(hist.contents()[1], 1.);
        assert_eq!(hist.integral_width(), 1. * 2. + 2. * 2.);
    }

    #[test]
    fn statistics() {
        let axis = Axis::uniform(2, 0., 2.).unwrap();
        let hist = Hist1D::new(axis, vec![1., 1.], None).unwrap();
        let stats = hist.statistics();
        assert_eq!(stats.entries, 2.);
        assert!((stats.mean - 1.).abs() < 1e-12);
        assert!((stats.mean_error - 0.5 / 2f64.sqrt()).abs() < 1e-12);

        let empty = Hist1D::new(Axis::uniform(2, 0., 2.).unwrap(), vec![0., 0.], None)
            .unwrap();
        assert!(empty.statistics().is_zero());
        assert!(Graph::default().statistics().is_zero());
    }

    #[test]
    fn collection_members() {
        let curve = PlotObject::Curve(Graph::new(vec![Point::new(0., 1.)]));
        let hist = PlotObject::Histogram1D(
            Hist1D::new(Axis::uniform(1, 0., 1.).unwrap(), vec![1.], None).unwrap(),
        );
        assert!(Collection::curves(vec![curve.clone()]).is_ok());
        assert_eq!(
            Collection::curves(vec![hist.clone()]),
            Err(ShapeError::Member(PlotKind::Histogram1D, PlotKind::CurveCollection))
        );
        assert!(Collection::histograms(vec![hist]).is_ok());
        assert!(Collection::histograms(vec![curve]).is_err());
    }

    #[test]
    fn graph_from_yaml() {
        let graph: Graph = serde_yaml::from_str(
            "x: [1, 2]\ny: [3, 4]\ney: [0.5, 0.5]\n",
        )
        .unwrap();
        assert_eq!(graph.len(), 2);
        assert_eq!(graph.points()[1].ey_high, 0.5);
        assert_eq!(graph.points()[1].ex_low, 0.);
        let bad: Result<Graph, _> = serde_yaml::from_str("x: [1, 2]\ny: [3]\n");
        assert!(bad.is_err());

        let bare = graph.without_errors();
        assert_eq!(bare.points()[1], Point::new(2., 4.));
    }

    #[test]
    fn compatible_kinds() {
        use PlotKind::*;
        assert!(Curve.is_compatible(&CurveAsymmetric));
        assert!(CurveSymmetric.is_compatible(&Curve));
        assert!(Histogram1D.is_compatible(&Histogram1D));
        assert!(!Histogram1D.is_compatible(&Profile1D));
        assert!(!Curve.is_compatible(&CurveCollection));
    }
}
