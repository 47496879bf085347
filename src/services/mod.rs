// Service exports
pub mod coordinator;
pub mod supplier;

pub use coordinator::{CoordinatorError, MatchAssemblerCoordinator};
pub use supplier::{Completer, Supplier, SupplierError};
