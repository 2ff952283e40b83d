//! Place State Store - canonical rod state plus change notification.
//!
//! The store owns one reactive `Signal<PlaceStateMap>`. Every mutation builds a
//! new map and swaps it into the signal, so readers never observe a half
//! applied change.
//!
//! # Controlled vs. interactive updates
//!
//! Two kinds of update reach the store:
//!
//! - **External** (`sync_external`): a parent pushes the value it wants shown.
//!   This never notifies `on_value_change` handlers.
//! - **Interactive** (`toggle_*`, `set_digit`, `apply_direction`): the user
//!   moved a bead. Handlers are notified exactly once per change.
//!
//! The store remembers the last external value and the last value it produced
//! itself. When a parent echoes an interactive value straight back, the echo
//! matches the remembered internal value and is absorbed without rebuilding.
//!
//! # Example
//!
//! ```ignore
//! use soroban::state::PlaceStateStore;
//! use soroban::types::BeadId;
//!
//! let store = PlaceStateStore::new(2);
//! let cleanup = store.on_value_change(|value| println!("now {}", value));
//!
//! store.toggle_heaven(0)?; // prints "now 5"
//! cleanup();
//! ```

use std::cell::RefCell;
use std::rc::Rc;

use spark_signals::{Derived, Signal, derived, signal};

use super::place_state::{PlaceState, PlaceStateMap};
use crate::codec::{AbacusValue, decode, encode};
use crate::error::{AbacusError, Result};
use crate::types::{BeadConfig, BeadId, BeadType, Direction, PlaceValue};

// =============================================================================
// HANDLER TYPES
// =============================================================================

/// Handler fired with the new value after an interactive change.
pub type ValueChangeHandler = Rc<dyn Fn(&AbacusValue)>;

/// Unregisters a handler when called.
pub type Cleanup = Box<dyn FnOnce()>;

#[derive(Default)]
struct HandlerRegistry {
    handlers: Vec<(usize, ValueChangeHandler)>,
    next_id: usize,
}

impl HandlerRegistry {
    fn next_id(&mut self) -> usize {
        let id = self.next_id;
        self.next_id += 1;
        id
    }
}

// =============================================================================
// STORE
// =============================================================================

/// Owns the per-rod state of one abacus instance.
pub struct PlaceStateStore {
    states: Signal<PlaceStateMap>,
    last_external: RefCell<Option<AbacusValue>>,
    last_internal: RefCell<Option<AbacusValue>>,
    registry: Rc<RefCell<HandlerRegistry>>,
}

impl PlaceStateStore {
    /// A store of `max_place + 1` rods showing zero.
    pub fn new(max_place: PlaceValue) -> Self {
        Self {
            states: signal(PlaceStateMap::zeroed(max_place)),
            last_external: RefCell::new(None),
            last_internal: RefCell::new(None),
            registry: Rc::new(RefCell::new(HandlerRegistry::default())),
        }
    }

    /// A store initialised from an externally supplied value.
    pub fn with_value(value: &AbacusValue, max_place: PlaceValue) -> Result<Self> {
        let store = Self::new(max_place);
        store.sync_external(value)?;
        Ok(store)
    }

    // -------------------------------------------------------------------------
    // Reads
    // -------------------------------------------------------------------------

    /// Current rod map (reactive read).
    pub fn states(&self) -> PlaceStateMap {
        self.states.get()
    }

    /// The underlying signal, for building deriveds.
    pub fn states_signal(&self) -> Signal<PlaceStateMap> {
        self.states.clone()
    }

    pub fn max_place(&self) -> PlaceValue {
        self.states.get().max_place()
    }

    pub fn rod_count(&self) -> usize {
        self.states.get().rod_count()
    }

    /// State of one rod. Fails fast for places beyond the current rods.
    pub fn get(&self, place: PlaceValue) -> Result<PlaceState> {
        self.states.get().get(place)
    }

    /// Current value shown on the abacus.
    pub fn value(&self) -> AbacusValue {
        decode(&self.states.get())
    }

    // -------------------------------------------------------------------------
    // External (controlled) updates
    // -------------------------------------------------------------------------

    /// Show an externally supplied value. Never notifies handlers.
    ///
    /// Returns `true` if the rods were rebuilt, `false` if the value was
    /// already shown (repeat or echo of an interactive change).
    ///
    /// A value with more digits than there are rods is always an error, even
    /// when it repeats the last external value.
    pub fn sync_external(&self, value: &AbacusValue) -> Result<bool> {
        let rods = self.rod_count();
        if value.digit_count() > rods {
            return Err(AbacusError::ValueTooLarge {
                digits: value.digit_count(),
                rods,
            });
        }
        if self.last_external.borrow().as_ref() == Some(value) {
            return Ok(false);
        }

        let echoed = self.last_internal.borrow().as_ref() == Some(value);
        if echoed && self.value() == *value {
            *self.last_external.borrow_mut() = Some(value.clone());
            return Ok(false);
        }

        let next = encode(value, self.max_place())?;
        log::debug!("external value {} synced onto {} rods", value, next.rod_count());
        self.states.set(next);
        *self.last_external.borrow_mut() = Some(value.clone());
        *self.last_internal.borrow_mut() = Some(value.clone());
        Ok(true)
    }

    /// Change the number of rods.
    ///
    /// Places above the new maximum are dropped and new places start at zero.
    /// Digits of places that remain are untouched. Not an interactive change,
    /// so handlers are not notified. The remembered external value is
    /// forgotten, so the next `sync_external` always reapplies.
    pub fn resize(&self, max_place: PlaceValue) {
        let current = self.states.get();
        if current.max_place() == max_place {
            return;
        }
        let next = current.resized(max_place);
        log::debug!(
            "rod count changed from {} to {}",
            current.rod_count(),
            next.rod_count()
        );
        *self.last_internal.borrow_mut() = Some(decode(&next));
        *self.last_external.borrow_mut() = None;
        self.states.set(next);
    }

    // -------------------------------------------------------------------------
    // Interactive updates
    // -------------------------------------------------------------------------

    /// Flip the heaven bead of a rod.
    pub fn toggle_heaven(&self, place: PlaceValue) -> Result<AbacusValue> {
        let current = self.states.get();
        let state = current.get(place)?;
        let next = current.with_state(state.with_heaven_toggled())?;
        Ok(self.commit(next))
    }

    /// Toggle an earth bead, cascading neighbours to keep the block contiguous.
    pub fn toggle_earth(&self, bead: &BeadConfig) -> Result<AbacusValue> {
        let current = self.states.get();
        let state = current.get(bead.place_value)?;
        let next = current.with_state(state.with_earth_toggled(bead.position)?)?;
        Ok(self.commit(next))
    }

    /// Toggle whichever bead `bead` names.
    pub fn toggle_bead(&self, bead: &BeadConfig) -> Result<AbacusValue> {
        match bead.bead_type {
            BeadType::Heaven => self.toggle_heaven(bead.place_value),
            BeadType::Earth => self.toggle_earth(bead),
        }
    }

    /// Overwrite one rod with a digit from keyboard entry.
    ///
    /// Digits above 9 are rejected as a no-op (`Ok(None)`); so is a digit the
    /// rod already shows. Out-of-range places are an error.
    pub fn set_digit(&self, place: PlaceValue, digit: u8) -> Result<Option<AbacusValue>> {
        let current = self.states.get();
        let state = current.get(place)?;
        let Some(next_state) = PlaceState::from_digit(place, digit) else {
            log::debug!("ignoring digit {} for place {}", digit, place);
            return Ok(None);
        };
        if next_state == state {
            return Ok(None);
        }
        let next = current.with_state(next_state)?;
        Ok(Some(self.commit(next)))
    }

    /// Move a bead toward (`Activate`) or away from (`Deactivate`) the bar.
    ///
    /// Returns `Ok(None)` when the bead already sits where it was asked to go.
    pub fn apply_direction(&self, bead: BeadId, direction: Direction) -> Result<Option<AbacusValue>> {
        let current = self.states.get();
        let state = current.get(bead.place_value)?;
        let next_state = state.with_direction(bead.bead_type, bead.slot(), direction)?;
        if next_state == state {
            return Ok(None);
        }
        let next = current.with_state(next_state)?;
        Ok(Some(self.commit(next)))
    }

    /// Swap in a new map, remember the value we produced, then notify.
    fn commit(&self, next: PlaceStateMap) -> AbacusValue {
        let value = decode(&next);
        log::debug!("value changed to {} by interaction", value);
        self.states.set(next);
        *self.last_internal.borrow_mut() = Some(value.clone());

        // Clone handlers out so a handler may register or echo without a
        // RefCell double borrow.
        let handlers: Vec<ValueChangeHandler> = self
            .registry
            .borrow()
            .handlers
            .iter()
            .map(|(_, handler)| handler.clone())
            .collect();
        for handler in handlers {
            handler(&value);
        }
        value
    }

    // -------------------------------------------------------------------------
    // Handlers
    // -------------------------------------------------------------------------

    /// Register a value-change handler. Returns a cleanup that unregisters it.
    pub fn on_value_change<F>(&self, handler: F) -> Cleanup
    where
        F: Fn(&AbacusValue) + 'static,
    {
        let id = {
            let mut registry = self.registry.borrow_mut();
            let id = registry.next_id();
            registry.handlers.push((id, Rc::new(handler)));
            id
        };

        let registry = Rc::clone(&self.registry);
        Box::new(move || {
            registry
                .borrow_mut()
                .handlers
                .retain(|(handler_id, _)| *handler_id != id);
        })
    }
}

/// Ensure a map covers exactly `rod_count` rods before it reaches layout.
///
/// The store always synthesises missing rods, so a mismatch here means a
/// caller handed layout a stale map.
pub fn check_rod_coverage(map: &PlaceStateMap, rod_count: usize) -> Result<()> {
    if rod_count == 0 {
        return Err(AbacusError::InvalidRodCount(0));
    }
    if map.rod_count() < rod_count {
        return Err(AbacusError::MissingPlaceState {
            place: map.rod_count() as PlaceValue,
            rod_count,
            available: map.rod_count(),
        });
    }
    if map.rod_count() > rod_count {
        return Err(AbacusError::RodCountMismatch {
            rod_count,
            available: map.rod_count(),
        });
    }
    Ok(())
}

/// Create a derived that recomputes the shown value whenever the rods change.
pub fn create_value_derived(
    states: Signal<PlaceStateMap>,
) -> Derived<AbacusValue> {
    derived(move || decode(&states.get()))
}

// =============================================================================
// Tests
// =============================================================================
