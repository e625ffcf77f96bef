//=========================================================================
// Signal
//=========================================================================
//
// Typed multi-subscriber event channel (signals and slots).
//
// Architecture:
//   connect(f) ──> slots: BTreeMap<SlotRef, Rc<dyn Fn(&A)>>
//                              │
//   emit(&args) ──snapshot──> for each (ref, slot) in ascending order
//                              ├─ still in live table?  → slot(&args)
//                              └─ disconnected meanwhile → skip
//
// Handles come from a counter that only ever moves forward, so a handle
// that was disconnected is never handed to a later subscriber.
//
// All methods take `&self`. Subscribers may connect, disconnect or emit
// on the very signal that is invoking them; no borrow of the table is
// held while a subscriber runs.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::fmt;
use std::rc::{Rc, Weak};

use log::trace;
use thiserror::Error;

//=== SlotRef =============================================================

/// Opaque handle identifying one connected subscriber.
///
/// Returned by every `connect*` call and accepted by
/// [`Signal::disconnect`]. Handles are unique for the lifetime of the
/// signal that issued them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SlotRef(u64);

impl SlotRef {
    /// Raw numeric value of the handle.
    pub fn id(self) -> u64 {
        self.0
    }
}

impl fmt::Display for SlotRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "slot#{}", self.0)
    }
}

//=== SignalError =========================================================

/// Errors reported while connecting subscribers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SignalError {
    /// The receiver a method was to be bound to has already been dropped.
    #[error("cannot bind a slot to a receiver that has already been dropped")]
    ExpiredReceiver,
}

//=== Signal ==============================================================

type Slot<A> = Rc<dyn Fn(&A)>;

/// A typed broadcast channel.
///
/// `A` is the argument type handed to every subscriber by reference. Use
/// `()` for signals without a payload and a tuple or struct for several
/// values. Unsized payloads such as `dyn Trait` are supported.
///
/// # Examples
///
/// ```
/// use std::cell::Cell;
/// use std::rc::Rc;
/// use beacon_engine::core::signal::Signal;
///
/// let score_changed = Signal::<u32>::new();
/// let last = Rc::new(Cell::new(0));
///
/// let seen = last.clone();
/// let slot = score_changed.connect(move |score| seen.set(*score));
///
/// score_changed.emit(&42);
/// assert_eq!(last.get(), 42);
///
/// score_changed.disconnect(slot);
/// score_changed.emit(&7);
/// assert_eq!(last.get(), 42);
/// ```
pub struct Signal<A: ?Sized> {
    slots: RefCell<BTreeMap<SlotRef, Slot<A>>>,
    next_slot_ref: Cell<u64>,
}

impl<A: ?Sized + 'static> Signal<A> {
    /// Creates a signal with no subscribers and the handle counter at zero.
    pub fn new() -> Self {
        Self {
            slots: RefCell::new(BTreeMap::new()),
            next_slot_ref: Cell::new(0),
        }
    }

    //--- Connection -------------------------------------------------------

    /// Connects a subscriber and returns its handle.
    ///
    /// The subscriber is invoked on every subsequent [`emit`](Self::emit)
    /// until it is disconnected. A subscriber connected while the signal is
    /// emitting first fires on the next emit.
    pub fn connect<F>(&self, slot: F) -> SlotRef
    where
        F: Fn(&A) + 'static,
    {
        let slot_ref = SlotRef(self.next_slot_ref.get());
        self.next_slot_ref.set(slot_ref.0 + 1);

        self.slots.borrow_mut().insert(slot_ref, Rc::new(slot));
        trace!(target: "signal", "Connected {}", slot_ref);

        slot_ref
    }

    /// Connects a method of `object`, keeping `object` alive while connected.
    ///
    /// ```
    /// # use std::cell::Cell;
    /// # use std::rc::Rc;
    /// # use beacon_engine::core::signal::Signal;
    /// struct Counter { hits: Cell<u32> }
    ///
    /// impl Counter {
    ///     fn on_tick(&self, _: &()) { self.hits.set(self.hits.get() + 1); }
    /// }
    ///
    /// let tick = Signal::<()>::new();
    /// let counter = Rc::new(Counter { hits: Cell::new(0) });
    /// tick.connect_method(&counter, Counter::on_tick);
    /// tick.emit(&());
    /// assert_eq!(counter.hits.get(), 1);
    /// ```
    pub fn connect_method<T>(&self, object: &Rc<T>, method: fn(&T, &A)) -> SlotRef
    where
        T: 'static,
    {
        let object = Rc::clone(object);
        self.connect(move |args| method(&object, args))
    }

    /// Connects a method of `object` without keeping `object` alive.
    ///
    /// The subscriber fires only while some other `Rc` to `object` exists.
    /// Once the last one is dropped the subscriber is silently skipped on
    /// every emit; its handle stays registered until disconnected.
    pub fn connect_weak<T>(&self, object: &Rc<T>, method: fn(&T, &A)) -> SlotRef
    where
        T: 'static,
    {
        self.bind_weak(Rc::downgrade(object), method)
    }

    /// Like [`connect_weak`](Self::connect_weak) but starting from a
    /// `Weak`, failing if its target is already gone.
    pub fn try_connect_weak<T>(
        &self,
        object: &Weak<T>,
        method: fn(&T, &A),
    ) -> Result<SlotRef, SignalError>
    where
        T: 'static,
    {
        if object.strong_count() == 0 {
            return Err(SignalError::ExpiredReceiver);
        }

        Ok(self.bind_weak(Weak::clone(object), method))
    }

    fn bind_weak<T>(&self, object: Weak<T>, method: fn(&T, &A)) -> SlotRef
    where
        T: 'static,
    {
        self.connect(move |args| {
            if let Some(object) = object.upgrade() {
                method(&object, args);
            }
        })
    }

    //--- Disconnection ----------------------------------------------------

    /// Removes the subscriber with the given handle.
    ///
    /// Unknown or already removed handles are ignored. Returns whether a
    /// subscriber was actually removed.
    pub fn disconnect(&self, slot_ref: SlotRef) -> bool {
        let removed = self.slots.borrow_mut().remove(&slot_ref).is_some();
        if removed {
            trace!(target: "signal", "Disconnected {}", slot_ref);
        }
        removed
    }

    /// Removes every subscriber. The handle counter keeps its value.
    pub fn disconnect_all(&self) {
        // Drop the closures after the borrow ends; their destructors may
        // touch this signal.
        let dropped = std::mem::take(&mut *self.slots.borrow_mut());
        trace!(target: "signal", "Disconnected all ({} slots)", dropped.len());
        drop(dropped);
    }

    //--- Queries ----------------------------------------------------------

    /// Returns true if `slot_ref` is currently connected.
    pub fn is_connected(&self, slot_ref: SlotRef) -> bool {
        self.slots.borrow().contains_key(&slot_ref)
    }

    /// Number of connected subscribers.
    pub fn len(&self) -> usize {
        self.slots.borrow().len()
    }

    /// Returns true if nothing is connected.
    pub fn is_empty(&self) -> bool {
        self.slots.borrow().is_empty()
    }

    //--- Emission ---------------------------------------------------------

    /// Invokes every connected subscriber once, in ascending handle order.
    ///
    /// Only subscribers connected when the call starts are considered.
    /// Each one is re-checked against the live table right before it runs,
    /// so a subscriber disconnected earlier in the same emit is skipped.
    ///
    /// Re-entrant emits run to completion independently. Nothing bounds
    /// the recursion depth; subscribers that re-emit must stop themselves.
    pub fn emit(&self, args: &A) {
        let snapshot: Vec<(SlotRef, Slot<A>)> = self
            .slots
            .borrow()
            .iter()
            .map(|(slot_ref, slot)| (*slot_ref, Rc::clone(slot)))
            .collect();

        for (slot_ref, slot) in snapshot {
            if self.is_connected(slot_ref) {
                slot(args);
            }
        }
    }

    //--- Ownership Transfer -----------------------------------------------

    /// Moves all subscribers and the handle counter into a new signal.
    ///
    /// `self` is left empty with its counter reset to zero and remains
    /// usable.
    pub fn take(&self) -> Self {
        let slots = std::mem::take(&mut *self.slots.borrow_mut());
        let next_slot_ref = self.next_slot_ref.replace(0);

        Self {
            slots: RefCell::new(slots),
            next_slot_ref: Cell::new(next_slot_ref),
        }
    }
}

//--- Trait Implementations -----------------------------------------------

impl<A: ?Sized + 'static> Default for Signal<A> {
    fn default() -> Self {
        Self::new()
    }
}

/// Copies the subscriber table and handle counter.
///
/// Subscriber closures are shared between the two signals, but each table
/// is mutated independently afterwards.
impl<A: ?Sized> Clone for Signal<A> {
    fn clone(&self) -> Self {
        Self {
            slots: RefCell::new(self.slots.borrow().clone()),
            next_slot_ref: Cell::new(self.next_slot_ref.get()),
        }
    }
}

impl<A: ?Sized> fmt::Debug for Signal<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Signal")
            .field("slots", &self.slots.borrow().len())
            .field("next_slot_ref", &self.next_slot_ref.get())
            .finish()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    //--- Test Helpers -----------------------------------------------------

    type Log = Rc<RefCell<Vec<String>>>;

    fn new_log() -> Log {
        Rc::new(RefCell::new(Vec::new()))
    }

    fn record(log: &Log, label: &'static str) -> impl Fn(&i32) + 'static {
        let log = log.clone();
        move |value| log.borrow_mut().push(format!("{}:{}", label, value))
    }

    //=====================================================================
    // Connection Tests
    //=====================================================================

    #[test]
    fn new_signal_is_empty() {
        let signal = Signal::<i32>::new();
        assert!(signal.is_empty());
        assert_eq!(signal.len(), 0);
    }

    #[test]
    fn handles_strictly_increase() {
        let signal = Signal::<i32>::new();
        let handles: Vec<SlotRef> = (0..5).map(|_| signal.connect(|_| {})).collect();

        for pair in handles.windows(2) {
            assert!(pair[0] < pair[1], "Handles must be strictly increasing");
        }
        assert_eq!(handles[0].id(), 0);
        assert_eq!(signal.len(), 5);
    }

    #[test]
    fn handles_never_reused_after_disconnect() {
        let signal = Signal::<i32>::new();
        let first = signal.connect(|_| {});
        let second = signal.connect(|_| {});

        signal.disconnect(second);
        signal.disconnect(first);
        signal.disconnect_all();

        let third = signal.connect(|_| {});
        assert!(third > second, "Disconnected handles must not be reassigned");
    }

    #[test]
    fn connect_method_keeps_receiver_alive() {
        struct Receiver {
            total: Cell<i32>,
        }
        impl Receiver {
            fn add(&self, value: &i32) {
                self.total.set(self.total.get() + value);
            }
        }

        let signal = Signal::<i32>::new();
        let receiver = Rc::new(Receiver { total: Cell::new(0) });
        signal.connect_method(&receiver, Receiver::add);

        let weak = Rc::downgrade(&receiver);
        drop(receiver);

        signal.emit(&5);
        let receiver = weak.upgrade().expect("signal should own the receiver");
        assert_eq!(receiver.total.get(), 5);
    }

    //=====================================================================
    // Disconnection Tests
    //=====================================================================

    #[test]
    fn disconnect_unknown_handle_is_noop() {
        let signal = Signal::<i32>::new();
        let log = new_log();
        signal.connect(record(&log, "a"));

        assert!(!signal.disconnect(SlotRef(99)));
        signal.emit(&1);

        assert_eq!(*log.borrow(), vec!["a:1"]);
    }

    #[test]
    fn disconnect_twice_is_noop() {
        let signal = Signal::<i32>::new();
        let slot = signal.connect(|_| {});

        assert!(signal.disconnect(slot));
        assert!(!signal.disconnect(slot));
        assert!(signal.is_empty());
    }

    #[test]
    fn disconnect_all_silences_signal() {
        let signal = Signal::<i32>::new();
        let log = new_log();
        signal.connect(record(&log, "a"));
        signal.connect(record(&log, "b"));

        signal.disconnect_all();
        signal.emit(&1);

        assert!(log.borrow().is_empty());
        assert!(signal.is_empty());
    }

    //=====================================================================
    // Emission Tests
    //=====================================================================

    #[test]
    fn emit_calls_each_slot_once_in_handle_order() {
        let signal = Signal::<i32>::new();
        let log = new_log();
        signal.connect(record(&log, "a"));
        signal.connect(record(&log, "b"));
        signal.connect(record(&log, "c"));

        signal.emit(&7);

        assert_eq!(*log.borrow(), vec!["a:7", "b:7", "c:7"]);
    }

    #[test]
    fn emit_without_subscribers_is_noop() {
        let signal = Signal::<i32>::new();
        signal.emit(&1);
    }

    #[test]
    fn unsized_payload_is_supported() {
        let signal = Signal::<str>::new();
        let seen = Rc::new(RefCell::new(String::new()));

        let sink = seen.clone();
        signal.connect(move |text| sink.borrow_mut().push_str(text));
        signal.emit("hello");

        assert_eq!(*seen.borrow(), "hello");
    }

    #[test]
    fn slot_connected_during_emit_fires_next_time() {
        let signal = Rc::new(Signal::<i32>::new());
        let log = new_log();

        let inner_signal = Rc::downgrade(&signal);
        let inner_log = log.clone();
        let connected = Rc::new(Cell::new(false));
        let flag = connected.clone();
        signal.connect(move |_| {
            if flag.replace(true) {
                return;
            }
            if let Some(signal) = inner_signal.upgrade() {
                signal.connect(record(&inner_log, "late"));
            }
        });

        signal.emit(&1);
        assert!(log.borrow().is_empty(), "Late slot must not fire in the same emit");

        signal.emit(&2);
        assert_eq!(*log.borrow(), vec!["late:2"]);
    }

    #[test]
    fn slot_disconnected_during_emit_is_skipped() {
        let signal = Rc::new(Signal::<i32>::new());
        let log = new_log();

        // Handle 1 is known before it is connected.
        let victim = SlotRef(1);
        let inner_signal = Rc::downgrade(&signal);
        signal.connect(move |_| {
            if let Some(signal) = inner_signal.upgrade() {
                signal.disconnect(victim);
            }
        });
        let connected = signal.connect(record(&log, "victim"));
        assert_eq!(connected, victim);
        signal.connect(record(&log, "survivor"));

        signal.emit(&3);

        assert_eq!(*log.borrow(), vec!["survivor:3"]);
        assert!(!signal.is_connected(victim));
    }

    #[test]
    fn slot_may_disconnect_itself() {
        let signal = Rc::new(Signal::<i32>::new());
        let calls = Rc::new(Cell::new(0));

        let inner_signal = Rc::downgrade(&signal);
        let counter = calls.clone();
        signal.connect(move |_| {
            counter.set(counter.get() + 1);
            if let Some(signal) = inner_signal.upgrade() {
                signal.disconnect(SlotRef(0));
            }
        });

        signal.emit(&0);
        signal.emit(&0);

        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn reentrant_emit_runs_to_completion() {
        let signal = Rc::new(Signal::<i32>::new());
        let log = new_log();

        let inner_signal = Rc::downgrade(&signal);
        signal.connect(move |depth| {
            if *depth < 2 {
                if let Some(signal) = inner_signal.upgrade() {
                    signal.emit(&(depth + 1));
                }
            }
        });
        signal.connect(record(&log, "tail"));

        signal.emit(&0);

        assert_eq!(*log.borrow(), vec!["tail:2", "tail:1", "tail:0"]);
    }

    //=====================================================================
    // Weak Binding Tests
    //=====================================================================

    struct Listener {
        hits: Cell<u32>,
    }

    impl Listener {
        fn on_event(&self, _: &i32) {
            self.hits.set(self.hits.get() + 1);
        }
    }

    #[test]
    fn weak_slot_fires_while_owner_alive() {
        let signal = Signal::<i32>::new();
        let listener = Rc::new(Listener { hits: Cell::new(0) });
        signal.connect_weak(&listener, Listener::on_event);

        signal.emit(&0);
        signal.emit(&0);

        assert_eq!(listener.hits.get(), 2);
        assert_eq!(Rc::strong_count(&listener), 1, "Weak slot must not own the listener");
    }

    #[test]
    fn weak_slot_skipped_after_owner_dropped() {
        let signal = Signal::<i32>::new();
        let listener = Rc::new(Listener { hits: Cell::new(0) });
        let slot = signal.connect_weak(&listener, Listener::on_event);
        let probe = Rc::downgrade(&listener);

        drop(listener);
        signal.emit(&0);

        assert!(probe.upgrade().is_none());
        assert!(signal.is_connected(slot), "Dead weak slots are skipped, not pruned");
    }

    #[test]
    fn try_connect_weak_rejects_expired_receiver() {
        let signal = Signal::<i32>::new();
        let weak = Rc::downgrade(&Rc::new(Listener { hits: Cell::new(0) }));

        let result = signal.try_connect_weak(&weak, Listener::on_event);

        assert_eq!(result, Err(SignalError::ExpiredReceiver));
        assert!(signal.is_empty());

        let next = signal.connect(|_| {});
        assert_eq!(next.id(), 0, "A rejected connect must not consume a handle");
    }

    #[test]
    fn try_connect_weak_accepts_live_receiver() {
        let signal = Signal::<i32>::new();
        let listener = Rc::new(Listener { hits: Cell::new(0) });

        let slot = signal
            .try_connect_weak(&Rc::downgrade(&listener), Listener::on_event)
            .expect("live receiver should bind");
        signal.emit(&0);

        assert!(signal.is_connected(slot));
        assert_eq!(listener.hits.get(), 1);
    }

    //=====================================================================
    // Copy / Move Tests
    //=====================================================================

    #[test]
    fn clone_is_independent() {
        let original = Signal::<i32>::new();
        let log = new_log();
        let a = original.connect(record(&log, "a"));
        original.connect(record(&log, "b"));

        let copy = original.clone();
        copy.disconnect(a);

        original.emit(&1);
        assert_eq!(*log.borrow(), vec!["a:1", "b:1"]);

        log.borrow_mut().clear();
        copy.emit(&2);
        assert_eq!(*log.borrow(), vec!["b:2"]);
    }

    #[test]
    fn clone_preserves_counter() {
        let original = Signal::<i32>::new();
        original.connect(|_| {});
        original.connect(|_| {});

        let copy = original.clone();
        assert_eq!(copy.connect(|_| {}).id(), 2);
        assert_eq!(original.connect(|_| {}).id(), 2);
    }

    #[test]
    fn take_moves_slots_and_resets_source() {
        let source = Signal::<i32>::new();
        let log = new_log();
        source.connect(record(&log, "a"));
        source.connect(record(&log, "b"));

        let destination = source.take();

        source.emit(&1);
        assert!(log.borrow().is_empty(), "Source must be empty after take");
        assert_eq!(source.connect(|_| {}).id(), 0, "Source counter must reset");

        destination.emit(&2);
        assert_eq!(*log.borrow(), vec!["a:2", "b:2"]);
        assert_eq!(destination.connect(|_| {}).id(), 2);
    }

    #[test]
    fn debug_shows_counts() {
        let signal = Signal::<i32>::new();
        signal.connect(|_| {});
        let text = format!("{:?}", signal);
        assert!(text.contains("slots: 1"));
        assert!(text.contains("next_slot_ref: 1"));
    }
}
