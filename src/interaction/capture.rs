use std::cell::RefCell;
use std::collections::BTreeSet;
use std::fmt;
use std::rc::{Rc, Weak};

use super::PointerEvent;

type Listener = Box<dyn FnMut(&PointerEvent)>;

#[derive(Default)]
struct HubInner {
    listeners: Vec<(u64, Listener)>,
    next_id: u64,
    /// Ids detached while their listener was checked out for a dispatch.
    detached: BTreeSet<u64>,
}

/// Global pointer listener registry, shared by cloning.
///
/// The host forwards every pointer event it sees to [`PointerHub::dispatch`];
/// whichever gestures hold a [`PointerCapture`] receive it even when the
/// pointer has left their window.
#[derive(Clone, Default)]
pub struct PointerHub {
    inner: Rc<RefCell<HubInner>>,
}

impl fmt::Debug for PointerHub {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PointerHub")
            .field("listeners", &self.listener_count())
            .finish()
    }
}

impl PointerHub {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn attach<F>(&self, listener: F) -> PointerCapture
    where
        F: FnMut(&PointerEvent) + 'static,
    {
        let mut inner = self.inner.borrow_mut();
        let id = inner.next_id;
        inner.next_id = inner.next_id.wrapping_add(1);
        inner.listeners.push((id, Box::new(listener)));
        tracing::trace!(capture = id, "pointer capture attached");
        PointerCapture {
            id,
            hub: Rc::downgrade(&self.inner),
        }
    }

    /// Deliver `event` to every attached listener. Listeners may attach or
    /// detach captures while being called.
    pub fn dispatch(&self, event: &PointerEvent) -> usize {
        let mut active = std::mem::take(&mut self.inner.borrow_mut().listeners);
        for (_, listener) in active.iter_mut() {
            listener(event);
        }
        let delivered = active.len();
        let mut inner = self.inner.borrow_mut();
        let attached_meanwhile = std::mem::take(&mut inner.listeners);
        let detached = std::mem::take(&mut inner.detached);
        active.retain(|(id, _)| !detached.contains(id));
        active.extend(attached_meanwhile);
        inner.listeners = active;
        delivered
    }

    pub fn listener_count(&self) -> usize {
        self.inner.borrow().listeners.len()
    }

    pub fn is_captured(&self) -> bool {
        self.listener_count() > 0
    }
}

/// Guard for one attached listener; dropping it detaches the listener.
pub struct PointerCapture {
    id: u64,
    hub: Weak<RefCell<HubInner>>,
}

impl PointerCapture {
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn is_attached(&self) -> bool {
        let Some(inner) = self.hub.upgrade() else {
            return false;
        };
        let Ok(inner) = inner.try_borrow() else {
            return true;
        };
        inner.listeners.iter().any(|(id, _)| *id == self.id) && !inner.detached.contains(&self.id)
    }
}

impl fmt::Debug for PointerCapture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PointerCapture").field("id", &self.id).finish()
    }
}

impl Drop for PointerCapture {
    fn drop(&mut self) {
        let Some(inner) = self.hub.upgrade() else {
            return;
        };
        let Ok(mut inner) = inner.try_borrow_mut() else {
            return;
        };
        let before = inner.listeners.len();
        inner.listeners.retain(|(id, _)| *id != self.id);
        if inner.listeners.len() == before {
            // Checked out by an in-flight dispatch.
            inner.detached.insert(self.id);
        }
        tracing::trace!(capture = self.id, "pointer capture detached");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn drop_detaches() {
        let hub = PointerHub::new();
        let hits = Rc::new(Cell::new(0));
        let counter = Rc::clone(&hits);
        let capture = hub.attach(move |_| counter.set(counter.get() + 1));
        assert!(capture.is_attached());
        assert_eq!(hub.dispatch(&PointerEvent::moved(1, 1)), 1);
        drop(capture);
        assert_eq!(hub.listener_count(), 0);
        assert_eq!(hub.dispatch(&PointerEvent::moved(2, 2)), 0);
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn listener_can_drop_its_own_capture() {
        let hub = PointerHub::new();
        let slot: Rc<RefCell<Option<PointerCapture>>> = Rc::default();
        let inner_slot = Rc::clone(&slot);
        let capture = hub.attach(move |event| {
            if event.kind == super::super::PointerKind::Release {
                inner_slot.borrow_mut().take();
            }
        });
        *slot.borrow_mut() = Some(capture);
        hub.dispatch(&PointerEvent::moved(0, 0));
        assert_eq!(hub.listener_count(), 1);
        hub.dispatch(&PointerEvent::release(0, 0));
        assert_eq!(hub.listener_count(), 0);
    }

    #[test]
    fn capture_outliving_hub_is_harmless() {
        let hub = PointerHub::new();
        let capture = hub.attach(|_| {});
        drop(hub);
        assert!(!capture.is_attached());
        drop(capture);
    }
}
