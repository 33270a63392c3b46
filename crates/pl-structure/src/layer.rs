//! Layer boundaries and the crossings recorded while integrating through them.

use pl_eos::Eos;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// Material class of a layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LayerKind {
    Core,
    Mantle,
    Ice,
    Envelope,
    Other,
}

impl fmt::Display for LayerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LayerKind::Core => "core",
            LayerKind::Mantle => "mantle",
            LayerKind::Ice => "ice",
            LayerKind::Envelope => "envelope",
            LayerKind::Other => "other",
        };
        f.write_str(name)
    }
}

/// An EOS waiting to take over once pressure falls to `threshold`.
#[derive(Clone, Copy)]
pub struct LayerBoundary<'a> {
    /// Pressure at which the layer becomes active (Pa)
    pub threshold: f64,
    pub kind: LayerKind,
    pub eos: &'a dyn Eos,
    /// Insertion order, used to break threshold ties.
    pub(crate) seq: u64,
}

impl<'a> LayerBoundary<'a> {
    pub(crate) fn new(threshold: f64, kind: LayerKind, eos: &'a dyn Eos, seq: u64) -> Self {
        Self {
            threshold,
            kind,
            eos,
            seq,
        }
    }
}

impl fmt::Debug for LayerBoundary<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LayerBoundary")
            .field("threshold", &self.threshold)
            .field("kind", &self.kind)
            .field("eos", &self.eos.name())
            .field("seq", &self.seq)
            .finish()
    }
}

/// Max-heap order: a higher threshold is greater, so it sits on top of a
/// `BinaryHeap`. Pressure falls outward, which makes the highest remaining
/// threshold the next one crossed. Among equal thresholds the earlier
/// insertion is greater.
impl Ord for LayerBoundary<'_> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.threshold
            .total_cmp(&other.threshold)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for LayerBoundary<'_> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for LayerBoundary<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for LayerBoundary<'_> {}

/// State at the radius where one layer handed over to the next.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoundaryCrossing {
    /// Radius (m)
    pub radius: f64,
    /// Enclosed mass (kg)
    pub mass: f64,
    /// Pressure at the crossing (Pa)
    pub pressure: f64,
    /// Temperature at the crossing (K)
    pub temperature: f64,
    /// Density on the outer side, re-derived from the entered EOS (kg/m³)
    pub density: f64,
    pub left: LayerKind,
    pub entered: LayerKind,
    /// Name of the entered EOS.
    pub eos: String,
}
