use log::debug;

use crate::object::PlotObject;

/// Rescale objects to the integral of a reference
///
/// Profiles hold averages rather than counts and are never rescaled.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct Normalizer {
    enabled: bool,
}

impl Default for Normalizer {
    fn default() -> Self {
        Self { enabled: true }
    }
}

impl Normalizer {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    /// Factor that brings `candidate` to the integral of `reference`
    ///
    /// This is one if rescaling is disabled, the candidate is a
    /// profile, or the candidate has vanishing integral.
    pub fn scale_factor(&self, reference: &PlotObject, candidate: &PlotObject) -> f64 {
        scale_factor(reference, candidate, self.enabled)
    }

    /// Rescale `candidate` in place and return the factor used
    pub fn normalize(&self, reference: &PlotObject, candidate: &mut PlotObject) -> f64 {
        let factor = self.scale_factor(reference, candidate);
        if factor != 1. {
            scale(candidate, factor);
        }
        factor
    }
}

/// See [Normalizer::scale_factor]
pub fn scale_factor(reference: &PlotObject, candidate: &PlotObject, enabled: bool) -> f64 {
    if !enabled || candidate.kind().is_average() {
        return 1.;
    }
    let total = candidate.integral_width();
    if total == 0. {
        debug!("Not rescaling object with vanishing integral");
        return 1.;
    }
    reference.integral_width() / total
}

/// Multiply all contents and their errors by `factor`
///
/// Profiles, including profiles inside stacks, are left untouched.
pub fn scale(obj: &mut PlotObject, factor: f64) {
    use PlotObject::*;
    let err_factor = factor.abs();
    match obj {
        Histogram1D(h) => {
            let (contents, errors) = h.contents_and_errors_mut();
            scale_binned(contents, errors, factor, err_factor)
        }
        Histogram2D(h) => {
            let (contents, errors) = h.contents_and_errors_mut();
            scale_binned(contents, errors, factor, err_factor)
        }
        Profile1D(_) | Profile2D(_) => {}
        Curve(g) | CurveSymmetric(g) | CurveAsymmetric(g) => {
            for p in g.points_mut() {
                p.y *= factor;
                p.ey_low *= err_factor;
                p.ey_high *= err_factor;
            }
        }
        CurveCollection(c) | HistogramStack(c) => {
            for member in c.members_mut() {
                scale(member, factor)
            }
        }
    }
}

fn scale_binned(contents: &mut [f64], errors: &mut [f64], factor: f64, err_factor: f64) {
    for c in contents {
        *c *= factor;
    }
    for e in errors {
        *e *= err_factor;
    }
}
