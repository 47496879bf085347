//! Mentor Match - optimal mentee/mentor pairing
//!
//! Builds a cost matrix from pluggable scoring rules and hard exclusions, hands it to an
//! assignment solver and turns the solution back into typed matches. Operators can forbid
//! matches by hand, and a thread-safe coordinator assembles everything from asynchronously
//! produced inputs.

pub mod config;
pub mod core;
pub mod models;
pub mod services;

// Re-export commonly used types
pub use core::{
    CostMatrix, CriteriaConfiguration, ForbiddenMatches, HungarianSolver, MatchAssembler,
    MatchError, Solver, PROHIBITIVE_COST, UNASSIGNED_SCORE,
};
pub use models::{Match, Matches, Person};
pub use services::{CoordinatorError, MatchAssemblerCoordinator, Supplier, SupplierError};
