// Core algorithm exports
pub mod assembler;
pub mod cost_matrix;
pub mod criteria;
pub mod error;
pub mod forbidden;
pub mod sentinel;
pub mod solver;

pub use assembler::MatchAssembler;
pub use cost_matrix::CostMatrix;
pub use criteria::{
    logical_not_a_or_b, necessary, progressive, set_distance, CriteriaConfiguration,
    NecessaryCriterion, ProgressiveCriterion, SharedNecessaryCriterion, SharedProgressiveCriterion,
};
pub use error::MatchError;
pub use forbidden::{ForbiddenMatchTarget, ForbiddenMatches};
pub use sentinel::{PROHIBITIVE_COST, UNASSIGNED_INDEX, UNASSIGNED_SCORE};
pub use solver::{HungarianSolver, Solver, SolverError, SolverResult};
