use core::fmt;
use std::str::FromStr;

use faer_core::{Mat, MatMut, MatRef};

use crate::{
    driver::SimError,
    mesh::Layout,
    method::Method,
    methods::{LaxWendroff, Upwind},
    Ctx, Float,
};

/// Grid variant: a storage [`Layout`] together with the way its boundary values are
/// produced and the indices a stencil sweep updates on it.
pub trait BoundaryCondition {
    fn layout(&self) -> Layout;

    /// Fills the ghost (or duplicated) entries of `u` ahead of the stencil sweep at `ctx.t`.
    fn apply(&self, ctx: Ctx<'_>, u: MatMut<'_, Float>);

    /// Writes the next time level of `u` into `v`. `u` is only read.
    fn advance(
        &self,
        method: &dyn Method,
        courant: Float,
        u: MatRef<'_, Float>,
        v: MatMut<'_, Float>,
    );

    fn name(&self) -> &'static str;
}

/// Periodic boundary on the nodal layout: `u[N]` duplicates `u[0]` and index `-1` wraps
/// to `N - 1`.
#[derive(Debug, Default, Clone, Copy)]
pub struct Periodic;

impl BoundaryCondition for Periodic {
    fn layout(&self) -> Layout {
        Layout::Nodal
    }

    fn apply(&self, _ctx: Ctx<'_>, mut u: MatMut<'_, Float>) {
        let last = u.nrows() - 1;
        let first = u.read(0, 0);
        u.write(last, 0, first);
    }

    fn advance(
        &self,
        method: &dyn Method,
        courant: Float,
        u: MatRef<'_, Float>,
        mut v: MatMut<'_, Float>,
    ) {
        let cells = u.nrows() - 1;
        for j in 0..cells {
            let um = u.read((j + cells - 1) % cells, 0);
            let up = u.read((j + 1) % cells, 0);
            v.write(j, 0, method.point(courant, um, u.read(j, 0), up));
        }
        let first = v.read(0, 0);
        v.write(cells, 0, first);
    }

    fn name(&self) -> &'static str {
        "periodic"
    }
}

/// Order of the extrapolation filling the outflow ghost cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Extrapolation {
    /// Copy of the last interior value.
    #[default]
    First,
    /// Linear through the last two interior values.
    Second,
}

impl Extrapolation {
    pub fn order(self) -> usize {
        match self {
            Extrapolation::First => 1,
            Extrapolation::Second => 2,
        }
    }
}

impl TryFrom<usize> for Extrapolation {
    type Error = SimError;

    fn try_from(order: usize) -> Result<Self, Self::Error> {
        match order {
            1 => Ok(Extrapolation::First),
            2 => Ok(Extrapolation::Second),
            _ => Err(SimError::InvalidExtrapolationOrder(order)),
        }
    }
}

impl fmt::Display for Extrapolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.order())
    }
}

impl FromStr for Extrapolation {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "first" => Ok(Extrapolation::First),
            "second" => Ok(Extrapolation::Second),
            other => match other.parse::<usize>() {
                Ok(order) => Extrapolation::try_from(order),
                Err(_) => Err(SimError::InvalidExtrapolation(s.to_string())),
            },
        }
    }
}

/// Inflow/outflow boundary on the cell-centered layout: the left ghost receives the exact
/// inflow data, the right ghost is extrapolated from the interior.
#[derive(Debug, Default, Clone, Copy)]
pub struct Dirichlet {
    pub extrapolation: Extrapolation,
}

impl Dirichlet {
    pub fn new(extrapolation: Extrapolation) -> Self {
        Self { extrapolation }
    }
}

impl BoundaryCondition for Dirichlet {
    fn layout(&self) -> Layout {
        Layout::CellCentered
    }

    fn apply(&self, ctx: Ctx<'_>, mut u: MatMut<'_, Float>) {
        u.write(0, 0, ctx.problem().inflow(ctx.time(), ctx.grid().delta()));

        let last = u.nrows() - 1;
        let ghost = match self.extrapolation {
            Extrapolation::First => u.read(last - 1, 0),
            Extrapolation::Second => 2.0 * u.read(last - 1, 0) - u.read(last - 2, 0),
        };
        u.write(last, 0, ghost);
    }

    fn advance(
        &self,
        method: &dyn Method,
        courant: Float,
        u: MatRef<'_, Float>,
        mut v: MatMut<'_, Float>,
    ) {
        let last = u.nrows() - 1;
        for j in 1..last {
            let up = u.read(j + method.right_reach(), 0);
            v.write(j, 0, method.point(courant, u.read(j - 1, 0), u.read(j, 0), up));
        }
        // ghosts are placeholders until the next `apply`
        v.write(0, 0, u.read(0, 0));
        let inner = v.read(last - 1, 0);
        v.write(last, 0, inner);
    }

    fn name(&self) -> &'static str {
        match self.extrapolation {
            Extrapolation::First => "inflow/outflow (1st order extrapolation)",
            Extrapolation::Second => "inflow/outflow (2nd order extrapolation)",
        }
    }
}

/// Selector of the grid variant used by a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BoundaryMode {
    #[default]
    Periodic,
    Bounded(Extrapolation),
}

impl BoundaryMode {
    pub fn strategy(self) -> Box<dyn BoundaryCondition> {
        match self {
            BoundaryMode::Periodic => Box::new(Periodic),
            BoundaryMode::Bounded(extrapolation) => Box::new(Dirichlet::new(extrapolation)),
        }
    }

    pub fn layout(self) -> Layout {
        match self {
            BoundaryMode::Periodic => Layout::Nodal,
            BoundaryMode::Bounded(_) => Layout::CellCentered,
        }
    }
}

impl fmt::Display for BoundaryMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoundaryMode::Periodic => f.write_str("periodic"),
            BoundaryMode::Bounded(e) => write!(f, "bounded (rbc={e})"),
        }
    }
}

impl FromStr for BoundaryMode {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "periodic" => Ok(BoundaryMode::Periodic),
            "bounded" | "dirichlet" => Ok(BoundaryMode::Bounded(Extrapolation::First)),
            _ => Err(SimError::InvalidBoundary(s.to_string())),
        }
    }
}

fn update(
    method: &dyn Method,
    courant: Float,
    u: MatRef<'_, Float>,
    bc: &dyn BoundaryCondition,
) -> Mat<Float> {
    let mut v = Mat::zeros(u.nrows(), 1);
    bc.advance(method, courant, u, v.as_mut());
    v
}

/// One upwind step of `u` on the grid variant `bc`, into a fresh state.
pub fn update_ftbs(
    courant: Float,
    u: MatRef<'_, Float>,
    bc: &dyn BoundaryCondition,
) -> Mat<Float> {
    update(&Upwind, courant, u, bc)
}

/// One Lax-Wendroff step of `u` on the grid variant `bc`, into a fresh state.
pub fn update_lw(
    courant: Float,
    u: MatRef<'_, Float>,
    bc: &dyn BoundaryCondition,
) -> Mat<Float> {
    update(&LaxWendroff, courant, u, bc)
}
