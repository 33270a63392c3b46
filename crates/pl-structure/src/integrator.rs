//! Fixed-step RK4 in radius.

use crate::error::StructureResult;

/// A system of ODEs in radius.
///
/// `rhs` takes `&mut self` so a model can record what it saw while the
/// integrator samples it (for example, that a stage left the physical
/// domain).
pub trait RadialModel {
    type State: Clone;

    /// dx/dr at radius `r`.
    fn rhs(&mut self, r: f64, x: &Self::State) -> StructureResult<Self::State>;

    /// `a + b`, component-wise.
    fn add(&self, a: &Self::State, b: &Self::State) -> Self::State;

    /// `factor * a`.
    fn scale(&self, a: &Self::State, factor: f64) -> Self::State;
}

/// Classical fourth-order Runge-Kutta step in radius.
#[derive(Clone, Copy, Debug, Default)]
pub struct RK4;

impl RK4 {
    /// Advance `x` from `r` to `r + h`.
    ///
    /// The four stages are evaluated in order, so an error from any stage
    /// aborts the step before later stages run.
    pub fn step<M: RadialModel>(
        &self,
        model: &mut M,
        r: f64,
        x: &M::State,
        h: f64,
    ) -> StructureResult<M::State> {
        let half = 0.5 * h;
        let k1 = model.rhs(r, x)?;
        let k2 = {
            let mid = model.add(x, &model.scale(&k1, half));
            model.rhs(r + half, &mid)?
        };
        let k3 = {
            let mid = model.add(x, &model.scale(&k2, half));
            model.rhs(r + half, &mid)?
        };
        let k4 = {
            let end = model.add(x, &model.scale(&k3, h));
            model.rhs(r + h, &end)?
        };

        let inner = model.add(&k2, &k3);
        let outer = model.add(&k1, &k4);
        let slope = model.add(&outer, &model.scale(&inner, 2.0));
        Ok(model.add(x, &model.scale(&slope, h / 6.0)))
    }
}
