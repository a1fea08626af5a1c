//! Branch-and-cut tree types.

use crate::model::Bounds;

/// Side of a branching split.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BranchDirection {
    /// `x <= floor(v)`.
    Down,
    /// `x >= ceil(v)`.
    Up,
}

/// One open subproblem: the model under tightened variable bounds.
///
/// The driver owns every node through its explicit stack; `parent` is an
/// id kept for provenance in logs only.
#[derive(Debug, Clone)]
pub struct BranchNode {
    /// Creation-order id (the root is 0).
    pub id: usize,
    /// Id of the node this one was branched from.
    pub parent: Option<usize>,
    /// Depth in the tree (the root is 0).
    pub depth: usize,
    /// Bounds of every model variable at this node.
    pub bounds: Vec<Bounds>,
    /// Parent's LP relaxation objective in minimization form
    /// (`-inf` for the root). A valid lower bound for this subtree.
    pub lp_bound: f64,
    /// Branch that created the node (`None` for the root).
    pub direction: Option<BranchDirection>,
}

impl BranchNode {
    /// Root node over the model's declared bounds.
    pub fn root(bounds: Vec<Bounds>) -> Self {
        Self {
            id: 0,
            parent: None,
            depth: 0,
            bounds,
            lp_bound: f64::NEG_INFINITY,
            direction: None,
        }
    }

    /// Child node restricting variable `var` to one side of `value`.
    ///
    /// Returns `None` when the restricted domain is empty.
    pub fn child(
        &self,
        id: usize,
        var: usize,
        value: f64,
        direction: BranchDirection,
        lp_bound: f64,
    ) -> Option<Self> {
        let mut bounds = self.bounds.clone();
        let b = bounds.get_mut(var)?;
        match direction {
            BranchDirection::Down => b.upper = b.upper.min(value.floor()),
            BranchDirection::Up => b.lower = b.lower.max(value.ceil()),
        }
        if b.lower > b.upper {
            return None;
        }
        Some(Self {
            id,
            parent: Some(self.id),
            depth: self.depth + 1,
            bounds,
            lp_bound,
            direction: Some(direction),
        })
    }
}

/// How a node was closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeOutcome {
    /// Propagation or the LP relaxation proved the node empty.
    Infeasible,
    /// Its bound cannot beat the incumbent.
    PrunedByBound,
    /// The relaxation is integral; it may have become the incumbent.
    Integral,
    /// Split into children.
    Branched,
    /// The relaxation hit the pivot budget; the subtree is left unexplored.
    Abandoned,
}
