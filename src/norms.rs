use core::fmt;

use faer_core::{zipped, Mat, MatRef};

use crate::Float;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Norm {
    L1,
    L2,
    Max,
}

impl fmt::Display for Norm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Norm::L1 => f.write_str("L1"),
            Norm::L2 => f.write_str("L2"),
            Norm::Max => f.write_str("max"),
        }
    }
}

/// Samples over which error norms are accumulated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NormWindow {
    /// Every physical sample except the last two, which sit next to the right boundary.
    /// Reproduces the reference error tables.
    #[default]
    Reference,
    /// Every physical sample.
    Full,
}

impl NormWindow {
    /// Fewest physical samples leaving a non-empty window.
    pub fn min_samples(self) -> usize {
        match self {
            NormWindow::Reference => 3,
            NormWindow::Full => 1,
        }
    }

    fn len(self, samples: usize) -> usize {
        match self {
            NormWindow::Reference => samples.saturating_sub(2),
            NormWindow::Full => samples,
        }
    }
}

/// Discretization error at the end of one solve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ErrorReport {
    pub cells: usize,
    /// Time actually reached, possibly past the requested final time.
    pub time: Float,
    pub steps: usize,
    pub linf: Float,
    pub l1: Float,
    pub l2: Float,
}

impl ErrorReport {
    pub fn get(&self, norm: Norm) -> Float {
        match norm {
            Norm::L1 => self.l1,
            Norm::L2 => self.l2,
            Norm::Max => self.linf,
        }
    }
}

/// Pointwise `|numerical - exact|`.
pub fn pointwise_error(numerical: MatRef<'_, Float>, exact: MatRef<'_, Float>) -> Mat<Float> {
    let mut err = Mat::zeros(numerical.nrows(), 1);
    zipped!(err.as_mut(), numerical, exact)
        .for_each(|mut e, u, ue| e.write((u.read() - ue.read()).abs()));
    err
}

/// `(L∞, L1, L2)` of `err` on a grid of spacing `h`, restricted to `window`.
pub fn error_norms(err: MatRef<'_, Float>, h: Float, window: NormWindow) -> (Float, Float, Float) {
    let len = window.len(err.nrows());
    let samples = (0..len).map(|i| err.read(i, 0));

    let (linf, sum, sum_sq) = samples.fold((0.0 as Float, 0.0, 0.0), |(m, s, s2), e| {
        (m.max(e), s + e, s2 + e * e)
    });

    (linf, h * sum, (h * sum_sq).sqrt())
}
