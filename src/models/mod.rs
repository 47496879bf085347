// Model exports
pub mod domain;
pub mod person;

pub use domain::{Match, Matches};
pub use person::Person;
