//! Sentinel values shared by the cost matrix, the assembler and the solvers.

/// Cost of a cell that must never be selected. Forbidden cells carry this value in place of
/// their progressive score, so no allowed cell can ever look more expensive. Progressive sums
/// stop one below it.
pub const PROHIBITIVE_COST: i32 = i32::MAX;

/// Cost attached to a placeholder match: the pair was never evaluated.
pub const UNASSIGNED_SCORE: i32 = -1;

/// Index used by [`HungarianSolver`](crate::core::solver::HungarianSolver) for a row or a
/// column left without counterpart.
pub const UNASSIGNED_INDEX: usize = usize::MAX;
