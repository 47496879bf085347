//! Thread-safe front door assembling a [`MatchAssembler`] from asynchronously produced inputs.
//!
//! Setters may be called from any thread at any time and always overwrite the previous supplier.
//! [`MatchAssemblerCoordinator::get`] copies the current suppliers under the lock the moment it is
//! called, then waits for them without holding the lock: a setter racing with a pending `get`
//! never blocks, never alters the result of that `get`, and takes effect on the next one.

use std::future::Future;
use std::hash::Hash;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use thiserror::Error;

use crate::config::CoordinatorSettings;
use crate::core::{CriteriaConfiguration, ForbiddenMatches, MatchAssembler, MatchError, Solver};
use crate::services::supplier::{Supplier, SupplierError};

/// Errors raised by [`MatchAssemblerCoordinator`].
#[derive(Debug, Error)]
pub enum CoordinatorError {
    #[error("Missing suppliers: {}", .0.join(", "))]
    MissingSuppliers(Vec<&'static str>),

    #[error("Placeholder suppliers must be set or cleared together")]
    InconsistentPlaceholders,

    #[error("Supplier of {name} failed: {source}")]
    Supplier {
        name: &'static str,
        #[source]
        source: SupplierError,
    },

    #[error("Suppliers did not resolve within {0:?}")]
    Timeout(Duration),

    #[error(transparent)]
    Match(#[from] MatchError),
}

struct Suppliers<Mentee, Mentor> {
    mentees: Option<Supplier<Vec<Mentee>>>,
    mentors: Option<Supplier<Vec<Mentor>>>,
    criteria: Option<Supplier<CriteriaConfiguration<Mentee, Mentor>>>,
    placeholders: Option<(Supplier<Mentee>, Supplier<Mentor>)>,
    forbidden: Option<Arc<ForbiddenMatches<Mentee, Mentor>>>,
}

/// Everything one `get` works from, copied under the lock.
struct Snapshot<Mentee, Mentor> {
    mentees: Supplier<Vec<Mentee>>,
    mentors: Supplier<Vec<Mentor>>,
    criteria: Supplier<CriteriaConfiguration<Mentee, Mentor>>,
    placeholders: Option<(Supplier<Mentee>, Supplier<Mentor>)>,
    /// Pairs forbidden at snapshot time, detached from the live registry.
    forbidden: Option<ForbiddenMatches<Mentee, Mentor>>,
    solver: Option<(Arc<dyn Solver>, usize)>,
    resolve_timeout: Option<Duration>,
}

pub struct MatchAssemblerCoordinator<Mentee, Mentor> {
    suppliers: Mutex<Suppliers<Mentee, Mentor>>,
    solver: Option<(Arc<dyn Solver>, usize)>,
    resolve_timeout: Option<Duration>,
}

impl<Mentee, Mentor> MatchAssemblerCoordinator<Mentee, Mentor>
where
    Mentee: Eq + Hash + Clone + Send + Sync + 'static,
    Mentor: Eq + Hash + Clone + Send + Sync + 'static,
{
    pub fn new() -> Self {
        Self {
            suppliers: Mutex::new(Suppliers {
                mentees: None,
                mentors: None,
                criteria: None,
                placeholders: None,
                forbidden: None,
            }),
            solver: None,
            resolve_timeout: None,
        }
    }

    pub fn from_settings(settings: &CoordinatorSettings) -> Self {
        Self::new().with_resolve_timeout(settings.resolve_timeout())
    }

    /// Solver handed to every produced assembler, with the index it uses for "unassigned".
    pub fn with_solver(mut self, solver: Arc<dyn Solver>, unassigned_index: usize) -> Self {
        self.solver = Some((solver, unassigned_index));
        self
    }

    /// Upper bound on the time `get` waits for its suppliers.
    pub fn with_resolve_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.resolve_timeout = timeout;
        self
    }

    pub fn set_mentees_supplier(&self, supplier: Supplier<Vec<Mentee>>) {
        self.lock().mentees = Some(supplier);
    }

    pub fn set_mentors_supplier(&self, supplier: Supplier<Vec<Mentor>>) {
        self.lock().mentors = Some(supplier);
    }

    pub fn set_criteria_supplier(&self, supplier: Supplier<CriteriaConfiguration<Mentee, Mentor>>) {
        self.lock().criteria = Some(supplier);
    }

    /// Set both placeholder suppliers, or clear both with `(None, None)`.
    ///
    /// # Errors
    /// [`CoordinatorError::InconsistentPlaceholders`] when only one is given; the previous
    /// placeholders are kept.
    pub fn set_placeholder_suppliers(
        &self,
        mentee: Option<Supplier<Mentee>>,
        mentor: Option<Supplier<Mentor>>,
    ) -> Result<(), CoordinatorError> {
        let placeholders = match (mentee, mentor) {
            (Some(mentee), Some(mentor)) => Some((mentee, mentor)),
            (None, None) => None,
            _ => return Err(CoordinatorError::InconsistentPlaceholders),
        };
        self.lock().placeholders = placeholders;
        Ok(())
    }

    /// Registry applied to every assembler produced from now on, or `None` to stop applying one.
    ///
    /// Its content is copied along with the suppliers when `get` is called: later forbids and
    /// allows wait for the next `get`.
    pub fn set_forbidden_matches(&self, forbidden: Option<Arc<ForbiddenMatches<Mentee, Mentor>>>) {
        self.lock().forbidden = forbidden;
    }

    /// Whether every mandatory supplier is set.
    pub fn is_ready(&self) -> bool {
        let suppliers = self.lock();
        suppliers.mentees.is_some() && suppliers.mentors.is_some() && suppliers.criteria.is_some()
    }

    /// Assemble a [`MatchAssembler`] from the suppliers set at the time of this call.
    ///
    /// The snapshot is taken before this method returns, so the future may be awaited later or
    /// spawned on another task. Either every supplier resolves and a complete assembler comes
    /// out, or the whole call fails.
    pub fn get(
        &self,
    ) -> impl Future<Output = Result<MatchAssembler<Mentee, Mentor>, CoordinatorError>> + Send + 'static
    {
        let snapshot = self.snapshot();
        async move {
            let snapshot = snapshot?;
            match snapshot.resolve_timeout {
                Some(limit) => tokio::time::timeout(limit, assemble(snapshot))
                    .await
                    .map_err(|_| CoordinatorError::Timeout(limit))?,
                None => assemble(snapshot).await,
            }
        }
    }

    fn snapshot(&self) -> Result<Snapshot<Mentee, Mentor>, CoordinatorError> {
        let suppliers = self.lock();
        match (&suppliers.mentees, &suppliers.mentors, &suppliers.criteria) {
            (Some(mentees), Some(mentors), Some(criteria)) => {
                tracing::trace!(
                    placeholders = suppliers.placeholders.is_some(),
                    forbidden = suppliers.forbidden.is_some(),
                    "Suppliers snapshot taken"
                );
                Ok(Snapshot {
                    mentees: mentees.clone(),
                    mentors: mentors.clone(),
                    criteria: criteria.clone(),
                    placeholders: suppliers.placeholders.clone(),
                    forbidden: suppliers
                        .forbidden
                        .as_ref()
                        .map(|forbidden| forbidden.forbidden_pairs().into_iter().collect()),
                    solver: self.solver.clone(),
                    resolve_timeout: self.resolve_timeout,
                })
            }
            (mentees, mentors, criteria) => {
                let missing = [
                    ("mentees", mentees.is_none()),
                    ("mentors", mentors.is_none()),
                    ("criteria", criteria.is_none()),
                ]
                .into_iter()
                .filter_map(|(name, missing)| missing.then_some(name))
                .collect();
                Err(CoordinatorError::MissingSuppliers(missing))
            }
        }
    }

    fn lock(&self) -> MutexGuard<'_, Suppliers<Mentee, Mentor>> {
        self.suppliers
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl<Mentee, Mentor> Default for MatchAssemblerCoordinator<Mentee, Mentor>
where
    Mentee: Eq + Hash + Clone + Send + Sync + 'static,
    Mentor: Eq + Hash + Clone + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

async fn assemble<Mentee, Mentor>(
    snapshot: Snapshot<Mentee, Mentor>,
) -> Result<MatchAssembler<Mentee, Mentor>, CoordinatorError>
where
    Mentee: Eq + Hash + Clone + Send + Sync + 'static,
    Mentor: Eq + Hash + Clone + Send + Sync + 'static,
{
    let (mentees, mentors, criteria) = tokio::try_join!(
        resolve("mentees", &snapshot.mentees),
        resolve("mentors", &snapshot.mentors),
        resolve("criteria", &snapshot.criteria),
    )?;
    let placeholders = match &snapshot.placeholders {
        Some((mentee, mentor)) => {
            let (mentee, mentor) = tokio::try_join!(
                resolve("placeholder mentee", mentee),
                resolve("placeholder mentor", mentor),
            )?;
            Some((Mentee::clone(&mentee), Mentor::clone(&mentor)))
        }
        None => None,
    };

    let mut assembler = MatchAssembler::new(mentees, mentors, criteria.progressive_criteria())?
        .with_necessary_criteria(criteria.necessary_criteria());
    if let Some((solver, unassigned_index)) = snapshot.solver {
        assembler = assembler.with_solver(solver, unassigned_index);
    }
    if let Some((mentee, mentor)) = placeholders {
        assembler = assembler.with_placeholder_persons(mentee, mentor);
    }
    if let Some(forbidden) = &snapshot.forbidden {
        assembler.apply_forbidden(forbidden)?;
    }
    tracing::debug!(criteria = criteria.name(), "Match assembler ready");
    Ok(assembler)
}

async fn resolve<T>(name: &'static str, supplier: &Supplier<T>) -> Result<Arc<T>, CoordinatorError>
where
    T: Send + Sync + 'static,
{
    supplier
        .resolve()
        .await
        .map_err(|source| CoordinatorError::Supplier { name, source })
}
