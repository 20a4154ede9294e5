//! Ordered collection of tickable handlers
//!
//! A `TickRegistry` drives every registered handler once per dispatch pass.
//! Handlers may register or deregister other handlers (or themselves) while
//! a pass is in progress:
//!
//! - New registrations land in a pending list and are promoted after the
//!   pass, so they are first ticked on the *next* pass.
//! - Active handlers are visited in reverse index order. Removing a handler
//!   below the cursor shifts the cursor down, so every not-yet-visited
//!   handler is still ticked exactly once.
//!
//! Handlers are held weakly. The registration itself is owned by the
//! `TickHandle` returned from `register`; dropping the handle deregisters.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

use super::TickKind;

/// Something the registry can drive once per dispatch pass.
///
/// `tick` takes `&self` because handlers are shared between their owner and
/// the registry; state lives behind interior mutability.
pub trait TickHandler {
    fn tick(&self, delta: f64);
}

/// Identity of one registration. Registering the same handler twice yields
/// two distinct ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HandlerId(u64);

struct Entry {
    id: HandlerId,
    handler: Weak<dyn TickHandler>,
}

#[derive(Default)]
struct Lists {
    active: Vec<Entry>,
    pending: Vec<Entry>,
    /// Index of the handler currently being ticked; `None` outside a pass
    cursor: Option<usize>,
}

/// Deferred-add, removal-safe dispatch list.
pub struct TickRegistry {
    kind: TickKind,
    lists: RefCell<Lists>,
    next_id: Cell<u64>,
}

impl TickRegistry {
    pub fn new(kind: TickKind) -> Rc<Self> {
        Rc::new(Self {
            kind,
            lists: RefCell::new(Lists::default()),
            next_id: Cell::new(0),
        })
    }

    pub fn kind(&self) -> TickKind {
        self.kind
    }

    /// Queue `handler` for dispatch starting with the next pass.
    ///
    /// The returned handle owns the registration.
    pub fn register<H>(self: &Rc<Self>, handler: &Rc<H>) -> TickHandle
    where
        H: TickHandler + 'static,
    {
        let weak: Weak<dyn TickHandler> = Rc::downgrade(handler) as Weak<dyn TickHandler>;
        self.register_weak(weak)
    }

    pub fn register_weak(self: &Rc<Self>, handler: Weak<dyn TickHandler>) -> TickHandle {
        let id = HandlerId(self.next_id.get());
        self.next_id.set(id.0 + 1);

        self.lists.borrow_mut().pending.push(Entry { id, handler });
        tracing::trace!(kind = ?self.kind, id = id.0, "handler queued");

        TickHandle {
            registry: Rc::downgrade(self),
            id: Some(id),
        }
    }

    /// Remove a registration from the active or pending list.
    ///
    /// Returns false if `id` is not registered. Safe to call mid-dispatch,
    /// including from the handler being ticked.
    pub fn deregister(&self, id: HandlerId) -> bool {
        let mut lists = self.lists.borrow_mut();

        if let Some(index) = lists.active.iter().position(|e| e.id == id) {
            lists.active.remove(index);
            if let Some(cursor) = lists.cursor {
                // Everything below the cursor is still unvisited and just
                // shifted down by one.
                if index < cursor {
                    lists.cursor = Some(cursor - 1);
                }
            }
            tracing::trace!(kind = ?self.kind, id = id.0, "handler removed");
            return true;
        }

        if let Some(index) = lists.pending.iter().position(|e| e.id == id) {
            lists.pending.remove(index);
            tracing::trace!(kind = ?self.kind, id = id.0, "pending handler removed");
            return true;
        }

        false
    }

    /// Tick every active handler once, newest first, then promote the
    /// handlers registered since the previous pass.
    pub fn dispatch(&self, delta: f64) {
        {
            let mut lists = self.lists.borrow_mut();
            if lists.cursor.is_some() {
                tracing::warn!(kind = ?self.kind, "reentrant dispatch ignored");
                return;
            }
            let len = lists.active.len();
            lists.cursor = Some(len);
        }

        // Ends the pass even if a handler unwinds.
        let _pass = PassGuard { lists: &self.lists };

        loop {
            let handler = {
                let mut lists = self.lists.borrow_mut();
                let cursor = match lists.cursor {
                    Some(0) | None => break,
                    Some(cursor) => cursor - 1,
                };
                lists.cursor = Some(cursor);
                lists.active[cursor].handler.upgrade()
            };

            // The list borrow is released here so the handler can register
            // and deregister freely.
            if let Some(handler) = handler {
                handler.tick(delta);
            }
        }
    }

    /// Number of handlers visited by the next pass (excludes pending).
    pub fn len(&self) -> usize {
        self.lists.borrow().active.len()
    }

    pub fn pending_len(&self) -> usize {
        self.lists.borrow().pending.len()
    }

    pub fn is_empty(&self) -> bool {
        let lists = self.lists.borrow();
        lists.active.is_empty() && lists.pending.is_empty()
    }

    pub fn is_dispatching(&self) -> bool {
        self.lists.borrow().cursor.is_some()
    }

    pub fn contains(&self, id: HandlerId) -> bool {
        let lists = self.lists.borrow();
        lists.active.iter().chain(lists.pending.iter()).any(|e| e.id == id)
    }
}

/// Closes a dispatch pass: clears the cursor and promotes pending handlers.
struct PassGuard<'a> {
    lists: &'a RefCell<Lists>,
}

impl Drop for PassGuard<'_> {
    fn drop(&mut self) {
        let Ok(mut lists) = self.lists.try_borrow_mut() else {
            return;
        };
        lists.cursor = None;
        let pending = std::mem::take(&mut lists.pending);
        lists.active.extend(pending);
    }
}

impl fmt::Debug for TickRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let lists = self.lists.borrow();
        f.debug_struct("TickRegistry")
            .field("kind", &self.kind)
            .field("active", &lists.active.len())
            .field("pending", &lists.pending.len())
            .field("dispatching", &lists.cursor.is_some())
            .finish()
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Scoped registration
// ═══════════════════════════════════════════════════════════════════════════

/// Owned registration in a `TickRegistry`.
///
/// Dropping the handle deregisters the handler, so cleanup happens at a
/// deterministic point rather than whenever the handler itself is freed.
#[must_use = "dropping a TickHandle deregisters the handler immediately"]
pub struct TickHandle {
    registry: Weak<TickRegistry>,
    id: Option<HandlerId>,
}

impl TickHandle {
    pub fn id(&self) -> Option<HandlerId> {
        self.id
    }

    /// Whether the registration is still held by a live registry.
    pub fn is_registered(&self) -> bool {
        match (self.id, self.registry.upgrade()) {
            (Some(id), Some(registry)) => registry.contains(id),
            _ => false,
        }
    }

    /// Deregister now. Returns false if already released or the registry
    /// is gone.
    pub fn release(&mut self) -> bool {
        let Some(id) = self.id.take() else {
            return false;
        };
        match self.registry.upgrade() {
            Some(registry) => registry.deregister(id),
            None => false,
        }
    }
}

impl Drop for TickHandle {
    fn drop(&mut self) {
        self.release();
    }
}

impl fmt::Debug for TickHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TickHandle").field("id", &self.id).finish()
    }
}
