use core::fmt;
use std::{f64::consts::PI, str::FromStr};

use faer_core::{zipped, Mat, MatMut, MatRef};

use crate::{driver::SimError, Float};

/// Initial profiles of the advected quantity, both periodic with period 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InitialCondition {
    /// `sin(2πx)`
    #[default]
    Smooth,
    /// Top-hat of width 0.5 centered at 0.5, evaluated on `x - floor(x)`.
    Hat,
}

impl InitialCondition {
    pub fn eval(self, x: Float) -> Float {
        match self {
            InitialCondition::Smooth => (2.0 * PI * x).sin(),
            InitialCondition::Hat => {
                let folded = x - x.floor();
                if (folded - 0.5).abs() < 0.25 {
                    1.0
                } else {
                    0.0
                }
            }
        }
    }

    pub fn eval_into(self, x: MatRef<'_, Float>, u: MatMut<'_, Float>) {
        zipped!(u, x).for_each(|mut u, x| u.write(self.eval(x.read())));
    }

    pub fn sample(self, x: MatRef<'_, Float>) -> Mat<Float> {
        let mut u = Mat::zeros(x.nrows(), x.ncols());
        self.eval_into(x, u.as_mut());
        u
    }

    pub fn name(self) -> &'static str {
        match self {
            InitialCondition::Smooth => "smooth",
            InitialCondition::Hat => "hat",
        }
    }
}

impl fmt::Display for InitialCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for InitialCondition {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "smooth" | "sine" => Ok(InitialCondition::Smooth),
            "hat" => Ok(InitialCondition::Hat),
            _ => Err(SimError::InvalidInitialCondition(s.to_string())),
        }
    }
}

/// Linear advection `u_t + a u_x = 0` on `[space.0, space.1]` up to `final_time`.
#[derive(Debug, Clone, PartialEq)]
pub struct Problem {
    pub(crate) name: String,
    pub(crate) speed: Float,
    pub(crate) space: (Float, Float),
    pub(crate) final_time: Float,
    pub(crate) u0: InitialCondition,
}

impl Problem {
    pub fn new(u0: InitialCondition, final_time: Float) -> Self {
        Self {
            name: format!("advection of {} profile", u0),
            speed: 1.0,
            space: (0.0, 1.0),
            final_time,
            u0,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Exact solution `u0(x - a t)`.
    pub fn exact(&self, x: Float, t: Float) -> Float {
        self.u0.eval(x - self.speed * t)
    }

    /// Exact data entering through the left boundary, traced along the characteristic
    /// through the left ghost center half a cell upstream of `space.0`.
    pub fn inflow(&self, t: Float, h: Float) -> Float {
        let a = self.speed;
        self.u0.eval(self.space.0 - a * (t + h / (2.0 * a)))
    }
}
