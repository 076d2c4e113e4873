use core::fmt;
use std::str::FromStr;

use crate::{driver::SimError, methods, Float};

/// A two-level explicit scheme for `u_t + a u_x = 0` with `a > 0`, written as a
/// three-point update `U^{n+1}_j = S(ν; U^n_{j-1}, U^n_j, U^n_{j+1})`.
///
/// Where the stencil is swept, and what happens at the ends of the storage, is
/// decided by the grid variant (see [`crate::bc`]).
pub trait Method {
    fn point(&self, courant: Float, um: Float, u: Float, up: Float) -> Float;

    /// Number of downwind neighbours read by [`Method::point`].
    fn right_reach(&self) -> usize;

    /// Theoretical order of accuracy for smooth solutions.
    fn order(&self) -> usize;

    fn name(&self) -> &'static str;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Scheme {
    #[default]
    Upwind,
    LaxWendroff,
}

impl Scheme {
    pub fn method(self) -> &'static dyn Method {
        match self {
            Scheme::Upwind => &methods::Upwind,
            Scheme::LaxWendroff => &methods::LaxWendroff,
        }
    }

    pub fn order(self) -> usize {
        self.method().order()
    }
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scheme::Upwind => f.write_str("upwind"),
            Scheme::LaxWendroff => f.write_str("lax-wendroff"),
        }
    }
}

impl FromStr for Scheme {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "upwind" | "ftbs" => Ok(Scheme::Upwind),
            "lax-wendroff" | "laxwendroff" | "lw" => Ok(Scheme::LaxWendroff),
            _ => Err(SimError::InvalidScheme(s.to_string())),
        }
    }
}
