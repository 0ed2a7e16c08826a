//! Comparison of objects across all inputs
use std::fmt::{self, Display};

use log::{debug, info, trace, warn};
use serde::Serialize;

use crate::catalog::Skipped;
use crate::comparison::{ComparisonSet, Labelled};
use crate::config::{AxisRanges, RunConfig};
use crate::container::LookupError;
use crate::normalize::Normalizer;
use crate::object::{PlotKind, PlotObject};
use crate::progress_bar::{Progress, ProgressBar};
use crate::ratio::{divide, has_zero_divisor, RatioError, RatioOptions, RatioView};
use crate::traits::{Container, Sink};

/// The comparison of one object across all inputs
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Comparison {
    /// Full path of the object
    pub path: String,
    pub kind: PlotKind,
    /// The reference object first, followed by the other inputs
    pub overlay: Vec<Labelled>,
    pub ratio: Option<RatioView>,
    /// Axis range overrides for display
    pub ranges: AxisRanges,
}

/// Why (part of) a comparison was not produced
#[derive(Clone, Debug, PartialEq)]
pub enum Omission {
    /// The reference object could not be loaded, so nothing was compared
    MissingReference(LookupError),
    /// An input has no usable object under this path
    MissingObject { label: String, reason: LookupError },
    /// An input has an object of a different kind under this path
    KindMismatch {
        label: String,
        expected: PlotKind,
        found: PlotKind,
    },
    /// All objects are empty
    Empty,
    /// The ratio of one input to the reference failed
    Ratio { label: String, reason: RatioError },
}

impl Display for Omission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use Omission::*;
        match self {
            MissingReference(err) => write!(f, "reference: {err}"),
            MissingObject { label, reason } => write!(f, "{label}: {reason}"),
            KindMismatch {
                label,
                expected,
                found,
            } => write!(f, "{label}: expected {expected}, found {found}"),
            Empty => write!(f, "all objects are empty"),
            Ratio { label, reason } => write!(f, "ratio for {label}: {reason}"),
        }
    }
}

/// An omission for the object at `path`
#[derive(Clone, Debug, PartialEq)]
pub struct Omitted {
    pub path: String,
    pub reason: Omission,
}

/// What happened during a run
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RunSummary {
    /// Paths of all emitted comparisons
    pub emitted: Vec<String>,
    /// Objects or parts of objects that were left out
    pub omitted: Vec<Omitted>,
    /// Entries left out while searching the reference
    pub not_discovered: Vec<Skipped>,
}

impl RunSummary {
    fn omit(&mut self, path: &str, reason: Omission) {
        debug!("{path}: omitting {reason}");
        self.omitted.push(Omitted {
            path: path.to_owned(),
            reason,
        });
    }
}

/// Compares the objects in a [ComparisonSet]
///
/// For each object path, the object is loaded from every input. Objects
/// of the other inputs are rescaled to the reference and divided by it
/// if ratios are requested. The results are passed on to a [Sink].
#[derive(Debug)]
pub struct ComparisonDriver<'a> {
    config: &'a RunConfig,
    normalizer: Normalizer,
    ratio_opts: RatioOptions,
    progress: bool,
}

impl<'a> ComparisonDriver<'a> {
    pub fn new(config: &'a RunConfig) -> Self {
        Self {
            config,
            normalizer: Normalizer::new(config.rescale),
            ratio_opts: RatioOptions::from(config),
            progress: false,
        }
    }

    /// Whether to show a progress bar
    pub fn with_progress(mut self, progress: bool) -> Self {
        self.progress = progress;
        self
    }

    /// Compare all objects and emit the results to `sink`
    ///
    /// Only failures of the sink are fatal. Everything else is recorded
    /// in the returned [RunSummary].
    pub fn run<C, S>(
        &self,
        set: &ComparisonSet<C>,
        sink: &mut S,
    ) -> Result<RunSummary, S::Error>
    where
        C: Container,
        S: Sink<Comparison>,
    {
        let mut summary = RunSummary {
            not_discovered: set.skipped().to_vec(),
            ..Default::default()
        };
        if self.config.ratio && set.len() < 2 {
            warn!("Need at least two inputs for ratios, not computing any");
        }
        let progress = if self.progress {
            ProgressBar::new(set.paths().len() as u64, "Comparing:")
        } else {
            ProgressBar::hidden()
        };
        for path in set.paths() {
            let comparison = self.compare(set, path, &mut summary);
            progress.inc(1);
            if let Some(comparison) = comparison {
                sink.emit(comparison)?;
                summary.emitted.push(path.clone());
            }
        }
        progress.finish();
        info!(
            "Compared {} objects, {} omissions",
            summary.emitted.len(),
            summary.omitted.len()
        );
        Ok(summary)
    }

    /// Compare the object at `path` across all inputs
    pub fn compare<C: Container>(
        &self,
        set: &ComparisonSet<C>,
        path: &str,
        summary: &mut RunSummary,
    ) -> Option<Comparison> {
        trace!("Comparing {path}");
        let labels = set.labels();
        let reference = match set.reference().get(path) {
            Ok(obj) => obj,
            Err(err) => {
                summary.omit(path, Omission::MissingReference(err));
                return None;
            }
        };
        let kind = reference.kind();

        let mut candidates = Vec::with_capacity(set.len() - 1);
        for (container, label) in set.containers().iter().zip(labels).skip(1) {
            match container.get(path) {
                Ok(obj) if obj.kind().is_compatible(&kind) => candidates.push((label, obj)),
                Ok(obj) => summary.omit(
                    path,
                    Omission::KindMismatch {
                        label: label.clone(),
                        expected: kind,
                        found: obj.kind(),
                    },
                ),
                Err(reason) => summary.omit(
                    path,
                    Omission::MissingObject {
                        label: label.clone(),
                        reason,
                    },
                ),
            }
        }

        if !self.config.keep_empty {
            let total = candidates
                .iter()
                .fold(reference.statistics(), |acc, (_, obj)| acc + obj.statistics());
            if total.is_zero() {
                summary.omit(path, Omission::Empty);
                return None;
            }
        }

        let mut overlay = Vec::with_capacity(candidates.len() + 1);
        overlay.push(Labelled {
            label: labels[0].clone(),
            scale: 1.,
            object: reference.clone(),
        });
        for (label, mut obj) in candidates {
            let scale = self.normalizer.normalize(&reference, &mut obj);
            trace!("{path}: scaled {label} by {scale}");
            overlay.push(Labelled {
                label: label.clone(),
                scale,
                object: obj,
            });
        }

        let ratio = if self.config.ratio && set.len() > 1 {
            Some(self.ratio_view(path, &labels[0], &reference, &overlay[1..], summary))
        } else {
            None
        };

        Some(Comparison {
            path: path.to_owned(),
            kind,
            overlay,
            ratio,
            ranges: self.config.ranges,
        })
    }

    fn ratio_view(
        &self,
        path: &str,
        reference_label: &str,
        reference: &PlotObject,
        others: &[Labelled],
        summary: &mut RunSummary,
    ) -> RatioView {
        if !reference.kind().is_collection() && has_zero_divisor(reference) {
            debug!("{path}: reference contains zeros, ratio has non-finite values");
        }
        let mut members = Vec::with_capacity(others.len());
        for other in others {
            match divide(&other.object, reference, &self.ratio_opts) {
                Ok(object) => members.push(Labelled {
                    label: other.label.clone(),
                    scale: other.scale,
                    object,
                }),
                Err(reason) => {
                    warn!("{path}: no ratio for {}: {reason}", other.label);
                    summary.omit(
                        path,
                        Omission::Ratio {
                            label: other.label.clone(),
                            reason,
                        },
                    )
                }
            }
        }
        RatioView {
            reference: reference_label.to_owned(),
            range: self.config.ranges.ratio_or_default(),
            reference_line: self.config.reference_line,
            members,
        }
    }
}

/// Compare all objects in `set` with the given settings
///
/// See [ComparisonDriver::run].
pub fn run<C, S>(
    set: &ComparisonSet<C>,
    config: &RunConfig,
    sink: &mut S,
) -> Result<RunSummary, S::Error>
where
    C: Container,
    S: Sink<Comparison>,
{
    ComparisonDriver::new(config).run(set, sink)
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::config::{AxisName, Range};
    use crate::container::Directory;
    use crate::object::{Axis, Collection, Graph, Hist1D, Point};

    fn log_init() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn hist(contents: &[f64]) -> PlotObject {
        let axis = Axis::uniform(contents.len(), 0., 1.).unwrap();
        PlotObject::Histogram1D(Hist1D::new(axis, contents.to_vec(), None).unwrap())
    }

    fn labels(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("file{i}")).collect()
    }

    fn ratio_config() -> RunConfig {
        RunConfig::builder().max_depth(5).ratio(true).build()
    }

    fn compare_all(
        dirs: Vec<Directory>,
        config: &RunConfig,
    ) -> (Vec<Comparison>, RunSummary) {
        let n = dirs.len();
        let set = ComparisonSet::new(dirs, labels(n), config).unwrap();
        let mut out = Vec::new();
        let summary = run(&set, config, &mut out).unwrap();
        (out, summary)
    }

    #[test]
    fn three_files() {
        log_init();
        let reference = Directory::new()
            .with_object("h1", hist(&[1., 2.]))
            .with_object("h2", hist(&[3., 4.]))
            .with_directory("dir", Directory::new().with_object("h3", hist(&[5., 6.])));
        let other = Directory::new()
            .with_object("h1", hist(&[2., 4.]))
            .with_object("h2", hist(&[3., 4.]))
            .with_directory("dir", Directory::new());
        let config = ratio_config();
        let set = ComparisonSet::new(
            vec![reference.clone(), reference, other],
            labels(3),
            &config,
        )
        .unwrap();
        assert_eq!(set.paths(), ["h1", "h2", "dir/h3"]);

        let mut out = Vec::new();
        let summary = run(&set, &config, &mut out).unwrap();
        assert_eq!(summary.emitted, ["h1", "h2", "dir/h3"]);
        assert_eq!(out.len(), 3);

        let h3 = &out[2];
        assert_eq!(h3.path, "dir/h3");
        let labels: Vec<_> = h3.overlay.iter().map(|l| l.label.as_str()).collect();
        assert_eq!(labels, ["file0", "file1"]);
        let ratio = h3.ratio.as_ref().unwrap();
        assert_eq!(ratio.reference, "file0");
        assert_eq!(ratio.members.len(), 1);
        assert_eq!(ratio.members[0].label, "file1");
        let PlotObject::Histogram1D(r) = &ratio.members[0].object else {
            panic!("wrong ratio kind")
        };
        assert_eq!(r.contents(), &[1., 1.]);

        assert_eq!(summary.omitted.len(), 1);
        assert_eq!(summary.omitted[0].path, "dir/h3");
        assert!(matches!(
            summary.omitted[0].reason,
            Omission::MissingObject { ref label, .. } if label == "file2"
        ));

        // h1 of file2 has twice the integral and is rescaled
        let h1 = &out[0];
        assert_eq!(h1.overlay.len(), 3);
        assert_eq!(h1.overlay[2].scale, 0.5);
        let PlotObject::Histogram1D(scaled) = &h1.overlay[2].object else {
            panic!("wrong overlay kind")
        };
        assert_eq!(scaled.contents(), &[1., 2.]);
    }

    #[test]
    fn no_ratio_for_single_input() {
        log_init();
        let dir = Directory::new().with_object("h", hist(&[1.]));
        let (out, _) = compare_all(vec![dir], &ratio_config());
        assert_eq!(out.len(), 1);
        assert!(out[0].ratio.is_none());
    }

    #[test]
    fn ratio_disabled() {
        log_init();
        let dir = Directory::new().with_object("h", hist(&[1.]));
        let (out, _) = compare_all(vec![dir.clone(), dir], &RunConfig::default());
        assert!(out[0].ratio.is_none());
        assert_eq!(out[0].overlay.len(), 2);
    }

    #[test]
    fn kind_mismatch() {
        log_init();
        let reference = Directory::new().with_object("x", hist(&[1.]));
        let other = Directory::new().with_object("x", PlotObject::Curve(Graph::default()));
        let (out, summary) = compare_all(vec![reference, other], &ratio_config());
        assert_eq!(out[0].overlay.len(), 1);
        assert!(out[0].ratio.as_ref().unwrap().members.is_empty());
        assert_eq!(
            summary.omitted[0].reason,
            Omission::KindMismatch {
                label: "file1".into(),
                expected: PlotKind::Histogram1D,
                found: PlotKind::Curve
            }
        );
    }

    #[test]
    fn mixed_curve_kinds() {
        log_init();
        let points = vec![Point::new(0., 1.), Point::new(1., 2.)];
        let reference =
            Directory::new().with_object("g", PlotObject::Curve(Graph::new(points.clone())));
        let with_errors = points
            .into_iter()
            .map(|p| Point::new(p.x, 2. * p.y).with_y_errors(0.1, 0.1))
            .collect();
        let other = Directory::new()
            .with_object("g", PlotObject::CurveSymmetric(Graph::new(with_errors)));
        let config = RunConfig::builder().ratio(true).rescale(false).build();
        let (out, summary) = compare_all(vec![reference, other], &config);
        assert!(summary.omitted.is_empty());
        assert_eq!(out[0].kind, PlotKind::Curve);
        assert_eq!(out[0].overlay.len(), 2);
        assert_eq!(out[0].overlay[1].object.kind(), PlotKind::CurveSymmetric);
        let members = &out[0].ratio.as_ref().unwrap().members;
        assert_eq!(members.len(), 1);
        let PlotObject::CurveSymmetric(r) = &members[0].object else {
            panic!("wrong ratio kind")
        };
        assert!(r.points().iter().all(|p| p.y == 2.));
        assert_eq!(r.points()[1].ey_low, 0.05);
    }

    #[test]
    fn empty_objects() {
        log_init();
        let dir = Directory::new()
            .with_object("empty", hist(&[0., 0.]))
            .with_object("full", hist(&[0., 1.]));
        let config = RunConfig::default();
        let (out, summary) = compare_all(vec![dir.clone(), dir.clone()], &config);
        assert_eq!(summary.emitted, ["full"]);
        assert_eq!(out.len(), 1);
        assert_eq!(
            summary.omitted,
            [Omitted {
                path: "empty".into(),
                reason: Omission::Empty
            }]
        );

        let config = RunConfig::builder().keep_empty(true).build();
        let (out, _) = compare_all(vec![dir.clone(), dir], &config);
        assert_eq!(out.len(), 2);
    }

    #[test]
    fn empty_only_in_reference() {
        log_init();
        let reference = Directory::new().with_object("h", hist(&[0., 0.]));
        let other = Directory::new().with_object("h", hist(&[1., 1.]));
        let (out, _) = compare_all(vec![reference, other], &RunConfig::default());
        assert_eq!(out.len(), 1);
        // candidate is scaled to the vanishing reference integral
        assert_eq!(out[0].overlay[1].scale, 0.);
    }

    #[test]
    fn ratio_failure_is_not_fatal() {
        log_init();
        let reference = Directory::new()
            .with_object("h", hist(&[1., 2.]))
            .with_object("g", hist(&[1.]));
        let other = Directory::new()
            .with_object("h", hist(&[1., 2., 3.]))
            .with_object("g", hist(&[2.]));
        let (out, summary) = compare_all(vec![reference, other], &ratio_config());
        assert_eq!(out.len(), 2);
        assert!(out[0].ratio.as_ref().unwrap().members.is_empty());
        assert_eq!(out[1].ratio.as_ref().unwrap().members.len(), 1);
        assert!(matches!(
            summary.omitted[0].reason,
            Omission::Ratio {
                reason: RatioError::ShapeMismatch { .. },
                ..
            }
        ));
    }

    #[test]
    fn missing_reference() {
        log_init();
        let reference = Directory::new().with_object("h", hist(&[1.]));
        let set =
            ComparisonSet::new(vec![reference], labels(1), &RunConfig::default()).unwrap();
        let config = RunConfig::default();
        let driver = ComparisonDriver::new(&config);
        let mut summary = RunSummary::default();
        assert!(driver.compare(&set, "none", &mut summary).is_none());
        assert!(matches!(
            summary.omitted[0].reason,
            Omission::MissingReference(LookupError::Missing(_))
        ));
    }

    #[test]
    fn ratio_view_settings() {
        log_init();
        let dir = Directory::new().with_object("h", hist(&[1.]));
        let mut config = RunConfig::builder().ratio(true).reference_line(false).build();
        config.ranges.set(AxisName::Ratio, 0.5, 1.5);
        config.ranges.set(AxisName::X, 1., 0.);
        let (out, _) = compare_all(vec![dir.clone(), dir], &config);
        let ratio = out[0].ratio.as_ref().unwrap();
        assert_eq!(ratio.range, Range { low: 0.5, high: 1.5 });
        assert!(!ratio.reference_line);
        assert_eq!(out[0].ranges.x, None);
    }

    #[test]
    fn collections() {
        log_init();
        let graph = |ys: &[f64]| {
            PlotObject::Curve(Graph::new(
                ys.iter()
                    .enumerate()
                    .map(|(x, &y)| Point::new(x as f64, y))
                    .collect(),
            ))
        };
        let mg = |members| PlotObject::CurveCollection(Collection::curves(members).unwrap());
        let reference = Directory::new()
            .with_object("mg", mg(vec![graph(&[1., 1.]), graph(&[0., 1.])]));
        let other = Directory::new()
            .with_object("mg", mg(vec![graph(&[2., 2.]), graph(&[2., 2.])]));
        let config = RunConfig::builder().ratio(true).rescale(false).build();
        let (out, _) = compare_all(vec![reference, other], &config);
        let ratio = out[0].ratio.as_ref().unwrap();
        let PlotObject::CurveCollection(c) = &ratio.members[0].object else {
            panic!("wrong ratio kind")
        };
        assert_eq!(c.len(), 1);
    }

    #[test]
    fn histogram_stacks() {
        log_init();
        let stack = |members| PlotObject::HistogramStack(Collection::histograms(members).unwrap());
        let reference = Directory::new()
            .with_object("s", stack(vec![hist(&[1., 0.]), hist(&[2., 4.])]));
        let other = Directory::new()
            .with_object("s", stack(vec![hist(&[1., 1.]), hist(&[4., 8.])]));
        let config = RunConfig::builder().ratio(true).rescale(false).build();
        let (out, summary) = compare_all(vec![reference, other], &config);
        assert!(summary.omitted.is_empty());
        assert_eq!(out[0].overlay.len(), 2);
        let ratio = out[0].ratio.as_ref().unwrap();
        let PlotObject::HistogramStack(s) = &ratio.members[0].object else {
            panic!("wrong ratio kind")
        };
        assert_eq!(s.len(), 1);
        let PlotObject::Histogram1D(h) = &s.members()[0] else {
            panic!("wrong member kind")
        };
        assert_eq!(h.contents(), &[2., 2.]);
    }
}
