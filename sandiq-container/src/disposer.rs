//! Ordered, once-only teardown of disposable singletons.

use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::debug;

use crate::component::Dispose;
use crate::key::TypeKey;

struct Tracked {
    implementation: TypeKey,
    instance: Arc<dyn Dispose>,
}

/// Append-only ledger of the disposable instances one container owns.
///
/// Instances are disposed in reverse order of tracking, which is the
/// reverse of their construction order: a singleton is tracked only after
/// its dependencies were built, so dependents go first.
#[derive(Default)]
pub struct Disposer {
    tracked: Mutex<Vec<Tracked>>,
}

impl Disposer {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn track(&self, implementation: TypeKey, instance: Arc<dyn Dispose>) {
        debug!(implementation = %implementation, "Tracking disposable singleton");
        self.tracked.lock().push(Tracked {
            implementation,
            instance,
        });
    }

    /// Number of instances waiting for disposal.
    pub fn len(&self) -> usize {
        self.tracked.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracked.lock().is_empty()
    }

    /// Disposes every tracked instance, last tracked first, and empties the
    /// ledger. Returns how many instances were disposed.
    pub(crate) fn dispose_all(&self) -> usize {
        // Taken out of the lock so a dispose hook may touch the container.
        let drained = std::mem::take(&mut *self.tracked.lock());
        let count = drained.len();

        for tracked in drained.into_iter().rev() {
            debug!(implementation = %tracked.implementation, "Disposing");
            tracked.instance.dispose();
        }

        count
    }
}

impl fmt::Debug for Disposer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Disposer").field("tracked", &self.len()).finish()
    }
}
