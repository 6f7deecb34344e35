use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::rc::Rc;

use log::trace;

pub type Callback<T> = Rc<dyn Fn(&T)>;
pub type SubscriptionId = u64;

struct Listeners<T> {
    callbacks: RefCell<BTreeMap<SubscriptionId, Callback<T>>>,
    next_id: Cell<SubscriptionId>,
}

/// Single-threaded broadcast channel. Listeners run synchronously, in
/// subscription order, on the emitting thread.
pub struct Channel<T: std::fmt::Debug> {
    listeners: Rc<Listeners<T>>,
}

impl<T: std::fmt::Debug> Clone for Channel<T> {
    fn clone(&self) -> Self {
        Self {
            listeners: Rc::clone(&self.listeners),
        }
    }
}

/// Sending half of a [`Channel`]
pub struct EventEmitter<T: std::fmt::Debug> {
    channel: Channel<T>,
}

impl<T: std::fmt::Debug> Clone for EventEmitter<T> {
    fn clone(&self) -> Self {
        Self {
            channel: self.channel.clone(),
        }
    }
}

/// Receiving half of a [`Channel`]
pub struct EventObserver<T: std::fmt::Debug> {
    channel: Channel<T>,
}

impl<T: std::fmt::Debug> Clone for EventObserver<T> {
    fn clone(&self) -> Self {
        Self {
            channel: self.channel.clone(),
        }
    }
}

impl<T: std::fmt::Debug> Channel<T> {
    #[allow(clippy::new_ret_no_self)]
    pub fn new() -> (EventEmitter<T>, EventObserver<T>) {
        let channel = Channel {
            listeners: Rc::new(Listeners {
                callbacks: RefCell::new(BTreeMap::new()),
                next_id: Cell::new(0),
            }),
        };
        (
            EventEmitter {
                channel: channel.clone(),
            },
            EventObserver { channel },
        )
    }

    fn subscribe<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&T) + 'static,
    {
        let id = self.listeners.next_id.get();
        self.listeners.next_id.set(id + 1);
        self.listeners
            .callbacks
            .borrow_mut()
            .insert(id, Rc::new(callback));
        id
    }

    fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.listeners.callbacks.borrow_mut().remove(&id).is_some()
    }

    fn emit(&self, data: &T) {
        // snapshot so listeners may subscribe or unsubscribe while being notified
        let callbacks: Vec<Callback<T>> =
            self.listeners.callbacks.borrow().values().cloned().collect();
        trace!(target: "events", "Emitting event to {} listeners: {:?}", callbacks.len(), data);
        for callback in callbacks {
            callback(data);
        }
    }
}

impl<T: std::fmt::Debug> EventEmitter<T> {
    pub fn emit(&self, data: T) {
        self.channel.emit(&data);
    }
}

impl<T: std::fmt::Debug> EventObserver<T> {
    pub fn subscribe<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&T) + 'static,
    {
        self.channel.subscribe(callback)
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.channel.unsubscribe(id)
    }
}
