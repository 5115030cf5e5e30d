// ABOUTME: Single-slot build event source shared by the build subsystem and one active run.
// ABOUTME: Registration is refused while occupied and released idempotently, also on drop.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use parking_lot::Mutex;

use super::outcome::BuildError;

/// Per-project completion notice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectConfigDone {
    /// Project path as reported by the build subsystem.
    pub project: String,
    pub project_config: String,
    pub platform: String,
    pub solution_config: String,
    pub success: bool,
    /// Build output for a failed project. Empty when the source has none.
    pub output: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildScope {
    Solution,
    Batch,
    Project,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildAction {
    Build,
    RebuildAll,
    Clean,
    Deploy,
}

/// Receiver of build notifications. Both calls are fire-and-forget.
pub trait BuildEventHandler: Send + Sync {
    fn on_project_config_done(&self, event: &ProjectConfigDone);
    fn on_build_done(&self, scope: BuildScope, action: BuildAction);
}

struct Subscriber {
    id: u64,
    handler: Arc<dyn BuildEventHandler>,
}

/// The build subsystem's event source, holding at most one subscriber.
#[derive(Default)]
pub struct BuildEvents {
    slot: Mutex<Option<Subscriber>>,
    next_id: AtomicU64,
}

impl std::fmt::Debug for BuildEvents {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BuildEvents")
            .field("registered", &self.is_registered())
            .finish()
    }
}

impl BuildEvents {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Attach a handler built by `make_handler`, which receives the handle it
    /// can use to detach itself.
    ///
    /// Fails with [`BuildError::AlreadyRegistered`] while another handler is attached.
    pub fn register<F>(self: &Arc<Self>, make_handler: F) -> Result<Registration, BuildError>
    where
        F: FnOnce(SubscriptionHandle) -> Arc<dyn BuildEventHandler>,
    {
        if self.is_registered() {
            return Err(BuildError::AlreadyRegistered);
        }

        let id = self.next_id.fetch_add(1, Ordering::Relaxed) + 1;
        let handle = SubscriptionHandle {
            events: Arc::downgrade(self),
            id,
        };
        let handler = make_handler(handle.clone());

        let mut slot = self.slot.lock();
        if slot.is_some() {
            return Err(BuildError::AlreadyRegistered);
        }
        *slot = Some(Subscriber { id, handler });
        tracing::debug!(id, "build event callbacks registered");

        Ok(Registration { handle })
    }

    pub fn is_registered(&self) -> bool {
        self.slot.lock().is_some()
    }

    /// Emit a per-project completion event.
    pub fn project_config_done(&self, event: ProjectConfigDone) {
        match self.current() {
            Some(handler) => handler.on_project_config_done(&event),
            None => tracing::debug!(project = %event.project, "project event with no subscriber"),
        }
    }

    /// Emit the overall build-done event.
    pub fn build_done(&self, scope: BuildScope, action: BuildAction) {
        match self.current() {
            Some(handler) => handler.on_build_done(scope, action),
            None => tracing::debug!("build-done event with no subscriber"),
        }
    }

    // Handlers run outside the lock so they may deregister themselves.
    fn current(&self) -> Option<Arc<dyn BuildEventHandler>> {
        self.slot.lock().as_ref().map(|s| Arc::clone(&s.handler))
    }

    fn deregister(&self, id: u64) -> bool {
        let mut slot = self.slot.lock();
        match slot.as_ref() {
            Some(subscriber) if subscriber.id == id => {
                *slot = None;
                tracing::debug!(id, "build event callbacks deregistered");
                true
            }
            _ => false,
        }
    }
}

/// Detaches one specific registration. Cloneable and idempotent.
#[derive(Clone)]
pub struct SubscriptionHandle {
    events: Weak<BuildEvents>,
    id: u64,
}

impl std::fmt::Debug for SubscriptionHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SubscriptionHandle")
            .field("id", &self.id)
            .finish()
    }
}

impl SubscriptionHandle {
    /// Detach the handler. Returns true only for the call that actually detached it;
    /// never touches a later registration.
    pub fn release(&self) -> bool {
        self.events
            .upgrade()
            .is_some_and(|events| events.deregister(self.id))
    }

    pub fn is_active(&self) -> bool {
        self.events.upgrade().is_some_and(|events| {
            events
                .slot
                .lock()
                .as_ref()
                .is_some_and(|s| s.id == self.id)
        })
    }
}

/// An attached handler, detached when released or dropped.
#[derive(Debug)]
#[must_use = "dropping a registration detaches the handler immediately"]
pub struct Registration {
    handle: SubscriptionHandle,
}

impl Registration {
    pub fn release(&self) -> bool {
        self.handle.release()
    }

    pub fn is_active(&self) -> bool {
        self.handle.is_active()
    }

    pub fn handle(&self) -> SubscriptionHandle {
        self.handle.clone()
    }
}

impl Drop for Registration {
    fn drop(&mut self) {
        self.handle.release();
    }
}
