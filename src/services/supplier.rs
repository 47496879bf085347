use std::fmt;
use std::future::Future;
use std::sync::Arc;

use thiserror::Error;
use tokio::sync::watch;

/// Errors delivered by a [`Supplier`]. Cloned to every waiter.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SupplierError {
    #[error("Producer failed: {0}")]
    Failed(String),

    #[error("Producer went away without a value")]
    Abandoned,
}

type Slot<T> = Option<Result<Arc<T>, SupplierError>>;

/// Handle on a value produced asynchronously, possibly not yet available.
///
/// Cloning is cheap and every clone observes the same outcome. A supplier can be awaited any
/// number of times; the producer runs once.
pub struct Supplier<T> {
    receiver: watch::Receiver<Slot<T>>,
}

/// Write side of [`Supplier::channel`]. Dropping it without completing abandons the supplier.
pub struct Completer<T> {
    sender: watch::Sender<Slot<T>>,
}

impl<T> Supplier<T>
where
    T: Send + Sync + 'static,
{
    /// A supplier whose value is already known.
    pub fn ready(value: T) -> Self {
        Self::from_arc(Arc::new(value))
    }

    pub fn from_arc(value: Arc<T>) -> Self {
        let (_, receiver) = watch::channel(Some(Ok(value)));
        Self { receiver }
    }

    /// A supplier that already failed.
    pub fn failed(message: impl Into<String>) -> Self {
        let (_, receiver) = watch::channel(Some(Err(SupplierError::Failed(message.into()))));
        Self { receiver }
    }

    /// A supplier completed by hand through the returned [`Completer`].
    pub fn channel() -> (Completer<T>, Self) {
        let (sender, receiver) = watch::channel(None);
        (Completer { sender }, Self { receiver })
    }

    /// Run `producer` on the tokio runtime and supply its output.
    ///
    /// Must be called from within a runtime. A producer that panics abandons the supplier.
    pub fn spawn<F, E>(producer: F) -> Self
    where
        F: Future<Output = Result<T, E>> + Send + 'static,
        E: fmt::Display,
    {
        let (completer, supplier) = Self::channel();
        tokio::spawn(async move {
            completer.settle(producer.await);
        });
        supplier
    }

    /// Run a blocking `producer` on the runtime's blocking pool and supply its output.
    pub fn spawn_blocking<F, E>(producer: F) -> Self
    where
        F: FnOnce() -> Result<T, E> + Send + 'static,
        E: fmt::Display,
    {
        let (completer, supplier) = Self::channel();
        tokio::task::spawn_blocking(move || {
            completer.settle(producer());
        });
        supplier
    }

    /// Wait for the value.
    ///
    /// # Errors
    /// [`SupplierError::Failed`] if the producer failed, [`SupplierError::Abandoned`] if it went
    /// away without a value.
    pub async fn resolve(&self) -> Result<Arc<T>, SupplierError> {
        let mut receiver = self.receiver.clone();
        let slot = receiver
            .wait_for(Option::is_some)
            .await
            .map_err(|_| SupplierError::Abandoned)?;
        match &*slot {
            Some(outcome) => outcome.clone(),
            None => Err(SupplierError::Abandoned),
        }
    }

    /// Whether the producer has delivered, successfully or not.
    pub fn is_settled(&self) -> bool {
        self.receiver.borrow().is_some()
    }
}

impl<T> Clone for Supplier<T> {
    fn clone(&self) -> Self {
        Self {
            receiver: self.receiver.clone(),
        }
    }
}

impl<T> fmt::Debug for Supplier<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let settled = self.receiver.borrow().is_some();
        f.debug_struct("Supplier")
            .field("settled", &settled)
            .finish()
    }
}

impl<T> Completer<T> {
    pub fn complete(self, value: T) {
        self.send(Ok(Arc::new(value)));
    }

    pub fn fail(self, message: impl Into<String>) {
        self.send(Err(SupplierError::Failed(message.into())));
    }

    fn settle<E: fmt::Display>(self, outcome: Result<T, E>) {
        match outcome {
            Ok(value) => self.complete(value),
            Err(e) => self.fail(e.to_string()),
        }
    }

    fn send(self, outcome: Result<Arc<T>, SupplierError>) {
        // succeeds even when every receiver is gone
        self.sender.send_replace(Some(outcome));
    }
}
