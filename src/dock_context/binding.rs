use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

type Listener<T> = Rc<dyn Fn(&T)>;

struct Shared<T> {
    value: RefCell<T>,
    listeners: RefCell<Vec<(u64, Listener<T>)>>,
    next_listener: Cell<u64>,
}

/// A single-threaded observable value.
///
/// Used for the live, two-way synchronization between a piece of content and its
/// [`super::Dockable`] (title, tab customization). Setting a value equal to the current one is a
/// no-op, which is what terminates the ping-pong of a two-way binding.
pub struct Observable<T> {
    shared: Rc<Shared<T>>,
}

impl<T> Clone for Observable<T> {
    fn clone(&self) -> Self {
        Self {
            shared: Rc::clone(&self.shared),
        }
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for Observable<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Observable")
            .field(&*self.shared.value.borrow())
            .finish()
    }
}

impl<T: Default + Clone + PartialEq + 'static> Default for Observable<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: Clone + PartialEq + 'static> Observable<T> {
    pub fn new(value: T) -> Self {
        Self {
            shared: Rc::new(Shared {
                value: RefCell::new(value),
                listeners: RefCell::new(Vec::new()),
                next_listener: Cell::new(1),
            }),
        }
    }

    pub fn get(&self) -> T {
        self.shared.value.borrow().clone()
    }

    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.shared.value.borrow())
    }

    /// Store `value` and notify listeners. Returns `false` (and notifies nobody) if unchanged.
    pub fn set(&self, value: T) -> bool {
        {
            let mut current = self.shared.value.borrow_mut();
            if *current == value {
                return false;
            }
            *current = value.clone();
        }

        // Listeners may set other observables (or this one) re-entrantly: call a snapshot.
        let listeners: Vec<Listener<T>> = self
            .shared
            .listeners
            .borrow()
            .iter()
            .map(|(_, listener)| Rc::clone(listener))
            .collect();
        for listener in listeners {
            listener(&value);
        }
        true
    }

    /// Call `f` on every change until the returned [`Subscription`] is dropped.
    #[must_use = "dropping the subscription unsubscribes immediately"]
    pub fn subscribe(&self, f: impl Fn(&T) + 'static) -> Subscription {
        let id = self.shared.next_listener.get();
        self.shared.next_listener.set(id.wrapping_add(1));
        self.shared.listeners.borrow_mut().push((id, Rc::new(f)));

        let shared: Weak<Shared<T>> = Rc::downgrade(&self.shared);
        Subscription::new(move || {
            if let Some(shared) = shared.upgrade() {
                shared.listeners.borrow_mut().retain(|(lid, _)| *lid != id);
            }
        })
    }

    /// One-way binding: push every change of `self` into `target`.
    ///
    /// The binding holds `target` weakly, so it never keeps the target alive.
    #[must_use = "dropping the subscription unbinds immediately"]
    pub fn bind_to(&self, target: &Self) -> Subscription {
        let target = Rc::downgrade(&target.shared);
        self.subscribe(move |value| {
            if let Some(shared) = target.upgrade() {
                Self { shared }.set(value.clone());
            }
        })
    }

    /// Two-way binding: `target` adopts the current value of `self`, then both follow each other.
    #[must_use = "dropping the subscriptions unbinds immediately"]
    pub fn bind_two_way(&self, target: &Self) -> [Subscription; 2] {
        target.set(self.get());
        [self.bind_to(target), target.bind_to(self)]
    }

    pub fn listener_count(&self) -> usize {
        self.shared.listeners.borrow().len()
    }
}

/// A cancellable registration. Cancelled on drop.
pub struct Subscription {
    cancel: Option<Box<dyn FnOnce()>>,
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.cancel.is_some())
            .finish()
    }
}

impl Subscription {
    fn new(cancel: impl FnOnce() + 'static) -> Self {
        Self {
            cancel: Some(Box::new(cancel)),
        }
    }

    pub fn cancel(mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_notifies_only_on_change() {
        let value = Observable::new(1);
        let seen = Rc::new(RefCell::new(Vec::new()));
        let seen_in_listener = Rc::clone(&seen);
        let _sub = value.subscribe(move |v| seen_in_listener.borrow_mut().push(*v));

        assert!(value.set(2));
        assert!(!value.set(2));
        assert!(value.set(3));
        assert_eq!(*seen.borrow(), vec![2, 3]);
    }

    #[test]
    fn two_way_binding_follows_both_sides_without_looping() {
        let content = Observable::new("Console".to_owned());
        let dockable = Observable::new(String::new());
        let _subs = content.bind_two_way(&dockable);

        assert_eq!(dockable.get(), "Console");

        content.set("Console (3)".to_owned());
        assert_eq!(dockable.get(), "Console (3)");

        dockable.set("Renamed".to_owned());
        assert_eq!(content.get(), "Renamed");
    }

    #[test]
    fn dropping_subscriptions_unbinds() {
        let content = Observable::new(0);
        let dockable = Observable::new(0);
        let subs = content.bind_two_way(&dockable);
        assert_eq!(content.listener_count(), 1);
        assert_eq!(dockable.listener_count(), 1);

        drop(subs);
        assert_eq!(content.listener_count(), 0);
        assert_eq!(dockable.listener_count(), 0);

        content.set(5);
        assert_eq!(dockable.get(), 0);
    }

    #[test]
    fn binding_does_not_keep_target_alive() {
        let source = Observable::new(0);
        let target = Observable::new(0);
        let _sub = source.bind_to(&target);
        drop(target);

        // Target is gone; setting the source must simply do nothing for it.
        assert!(source.set(1));
    }
}
