use crate::{method::Method, Float};

/// First-order upwind (forward-time, backward-space), stable for `0 <= ν <= 1`.
#[derive(Debug, Default, Clone, Copy)]
pub struct Upwind;

impl Method for Upwind {
    #[inline]
    fn point(&self, courant: Float, um: Float, u: Float, _up: Float) -> Float {
        (1.0 - courant) * u + courant * um
    }

    fn right_reach(&self) -> usize {
        0
    }

    fn order(&self) -> usize {
        1
    }

    fn name(&self) -> &'static str {
        "First-order upwind"
    }
}

/// Second-order Lax-Wendroff, stable for `0 <= ν <= 1`.
#[derive(Debug, Default, Clone, Copy)]
pub struct LaxWendroff;

impl Method for LaxWendroff {
    #[inline]
    fn point(&self, courant: Float, um: Float, u: Float, up: Float) -> Float {
        u - 0.5 * courant * (up - um) + 0.5 * courant * courant * (um - 2.0 * u + up)
    }

    fn right_reach(&self) -> usize {
        1
    }

    fn order(&self) -> usize {
        2
    }

    fn name(&self) -> &'static str {
        "Lax-Wendroff"
    }
}
