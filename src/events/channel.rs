use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::rc::Rc;

use log::trace;

pub type Callback<T> = Rc<dyn Fn(&T)>;
pub type SubscriptionId = u64;

type Listeners<T> = Rc<RefCell<BTreeMap<SubscriptionId, Callback<T>>>>;

pub struct Channel<T: std::fmt::Debug> {
    listeners: Listeners<T>,
    next_id: Rc<Cell<SubscriptionId>>,
}

impl<T: std::fmt::Debug> Clone for Channel<T> {
    fn clone(&self) -> Self {
        Self {
            listeners: Rc::clone(&self.listeners),
            next_id: Rc::clone(&self.next_id),
        }
    }
}

/// Sending half of a [`Channel`].
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

/// Receiving half of a [`Channel`].
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

/// Handle returned by `subscribe`; dropping it does not unsubscribe.
pub struct Unsubscriber<T: std::fmt::Debug> {
    channel: Channel<T>,
    id: SubscriptionId,
}

impl<T: std::fmt::Debug> Unsubscriber<T> {
    pub fn unsubscribe(self) -> bool {
        self.channel.unsubscribe(self.id)
    }
}

impl<T: std::fmt::Debug> Channel<T> {
    pub fn new() -> (EventEmitter<T>, EventObserver<T>) {
        let channel = Channel {
            listeners: Rc::new(RefCell::new(BTreeMap::new())),
            next_id: Rc::new(Cell::new(0)),
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
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        self.listeners.borrow_mut().insert(id, Rc::new(callback));
        id
    }

    fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.listeners.borrow_mut().remove(&id).is_some()
    }

    fn emit(&self, data: &T) {
        // Listeners may emit or subscribe re-entrantly, so release the borrow before calling out.
        let listeners: Vec<Callback<T>> = self.listeners.borrow().values().cloned().collect();
        trace!(target: "events", "Emitting event to {} listeners: {:?}", listeners.len(), data);
        for listener in listeners {
            listener(data);
        }
    }
}

impl<T: std::fmt::Debug> EventEmitter<T> {
    pub fn emit(&self, data: T) {
        self.channel.emit(&data);
    }
}

impl<T: std::fmt::Debug> EventObserver<T> {
    pub fn subscribe<F>(&self, callback: F) -> Unsubscriber<T>
    where
        F: Fn(&T) + 'static,
    {
        let id = self.channel.subscribe(callback);
        Unsubscriber {
            channel: self.channel.clone(),
            id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::GameEngineCommand;

    #[test]
    fn test_subscriber_receives_commands() {
        let (emitter, observer) = Channel::<GameEngineCommand>::new();
        let received = Rc::new(RefCell::new(Vec::new()));
        let received_clone = received.clone();

        observer.subscribe(move |command: &GameEngineCommand| {
            received_clone.borrow_mut().push(command.clone());
        });

        emitter.emit(GameEngineCommand::RevealTile(3));
        emitter.emit(GameEngineCommand::Tick);
        assert_eq!(
            *received.borrow(),
            vec![GameEngineCommand::RevealTile(3), GameEngineCommand::Tick]
        );
    }

    #[test]
    fn test_listeners_are_called_in_subscription_order() {
        let (emitter, observer) = Channel::<u32>::new();
        let order = Rc::new(RefCell::new(Vec::new()));
        for tag in 0..3 {
            let order = order.clone();
            observer.subscribe(move |_| order.borrow_mut().push(tag));
        }

        emitter.emit(7);
        assert_eq!(*order.borrow(), vec![0, 1, 2]);
    }

    #[test]
    fn test_cloned_halves_share_listeners() {
        let (emitter1, observer1) = Channel::<i32>::new();
        let emitter2 = emitter1.clone();
        let observer2 = observer1.clone();
        let counter = Rc::new(Cell::new(0));

        let counter_clone = counter.clone();
        observer1.subscribe(move |_| counter_clone.set(counter_clone.get() + 1));
        emitter2.emit(42);
        assert_eq!(counter.get(), 1);

        let counter_clone = counter.clone();
        observer2.subscribe(move |_| counter_clone.set(counter_clone.get() + 1));
        emitter1.emit(42);
        assert_eq!(counter.get(), 3);
    }

    #[test]
    fn test_unsubscribe() {
        let (emitter, observer) = Channel::<i32>::new();
        let counter = Rc::new(Cell::new(0));
        let counter_clone = counter.clone();

        let handle = observer.subscribe(move |_| counter_clone.set(counter_clone.get() + 1));

        emitter.emit(1);
        assert!(handle.unsubscribe());
        emitter.emit(1);

        assert_eq!(counter.get(), 1);
    }

    #[test]
    fn test_listener_may_emit_reentrantly() {
        let (emitter, observer) = Channel::<u32>::new();
        let seen = Rc::new(RefCell::new(Vec::new()));

        let seen_clone = seen.clone();
        let inner_emitter = emitter.clone();
        observer.subscribe(move |value: &u32| {
            seen_clone.borrow_mut().push(*value);
            if *value == 0 {
                inner_emitter.emit(1);
            }
        });

        emitter.emit(0);
        assert_eq!(*seen.borrow(), vec![0, 1]);
    }
}
