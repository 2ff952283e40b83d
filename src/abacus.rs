//! Abacus - one interactive counting frame.
//!
//! Ties the pieces together for a host UI:
//!
//! ```text
//!   set_value ──► PlaceStateStore ──► compute_layout ──► render(styler)
//!                      ▲                                      │
//!   click / drag ──────┘ (GestureStateMachine per bead)       ▼
//!                      │                          beads + step status + content
//!                      └──► on_value_change handlers
//! ```
//!
//! Every instance owns its own store, gesture machines and highlight index.
//! Nothing is shared between instances.
//!
//! # Example
//!
//! ```ignore
//! use soroban::{Abacus, AbacusConfig, BeadId};
//!
//! let mut abacus = Abacus::new(AbacusConfig::default())?;
//! let cleanup = abacus.on_value_change(|value| println!("user set {}", value));
//!
//! abacus.set_value(42u64)?;                             // silent
//! abacus.click(BeadId::heaven(0), Instant::now())?;     // prints "user set 47"
//! cleanup();
//! ```

use std::collections::HashMap;
use std::time::Instant;

use spark_signals::{Derived, Signal, derived, signal};

use crate::codec::{AbacusValue, encode, rods_for};
use crate::config::{AbacusConfig, RodCount};
use crate::error::{AbacusError, Result};
use crate::highlight::{BeadStepStatus, StepHighlight, StepHighlightIndex, diff_states};
use crate::layout::{AbacusLayout, BeadPlacement, NumeralLabel, compute_layout, place_to_column};
use crate::state::{
    Cleanup, DisabledBeads, GesturePhase, GestureStateMachine, PlaceStateMap, PlaceStateStore,
};
use crate::style::{BeadContext, BeadStyler, BeadTone};
use crate::types::{BeadConfig, BeadId, BeadType, PlaceValue};

// =============================================================================
// Render output
// =============================================================================

/// One bead as a renderer should draw it.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedBead<C> {
    pub placement: BeadPlacement,
    pub status: BeadStepStatus,
    pub disabled: bool,
    /// Whatever the styler produced for this bead.
    pub content: C,
}

impl<C> RenderedBead<C> {
    pub fn id(&self) -> BeadId {
        self.placement.id()
    }
}

/// A numeral label with its tint, `None` meaning plain ink.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderedNumeral {
    pub label: NumeralLabel,
    pub tone: Option<BeadTone>,
}

// =============================================================================
// Abacus
// =============================================================================

pub struct Abacus {
    config: Signal<AbacusConfig>,
    store: PlaceStateStore,
    disabled: DisabledBeads,
    gestures: HashMap<BeadId, GestureStateMachine>,
    highlights: StepHighlightIndex,
    current_step: usize,
}

impl Abacus {
    /// An abacus showing zero.
    pub fn new(config: AbacusConfig) -> Result<Self> {
        let rods = config.rods.resolve(&AbacusValue::zero(), 1)?;
        Ok(Self {
            config: signal(config),
            store: PlaceStateStore::new(max_place_for(rods)),
            disabled: DisabledBeads::new(),
            gestures: HashMap::new(),
            highlights: StepHighlightIndex::default(),
            current_step: 0,
        })
    }

    /// An abacus showing `value`.
    pub fn with_value(config: AbacusConfig, value: impl Into<AbacusValue>) -> Result<Self> {
        let mut abacus = Self::new(config)?;
        abacus.set_value(value)?;
        Ok(abacus)
    }

    // -------------------------------------------------------------------------
    // Configuration
    // -------------------------------------------------------------------------

    pub fn config(&self) -> AbacusConfig {
        self.config.get()
    }

    /// The config signal, for building deriveds.
    pub fn config_signal(&self) -> Signal<AbacusConfig> {
        self.config.clone()
    }

    /// Replace the configuration, resizing the rods if the rod setting changed.
    ///
    /// Drags in progress are dropped since their thresholds may be stale.
    pub fn set_config(&mut self, config: AbacusConfig) -> Result<()> {
        let rods = config.rods.resolve(&self.store.value(), self.store.rod_count())?;
        self.config.set(config);
        self.gestures.clear();
        self.resize_to(rods);
        Ok(())
    }

    /// Pin the abacus to `rods` rods.
    ///
    /// Shrinking drops the highest places; growing adds zero rods.
    pub fn set_rod_count(&mut self, rods: usize) -> Result<()> {
        if rods == 0 {
            return Err(AbacusError::InvalidRodCount(0));
        }
        let mut config = self.config.get();
        config.rods = RodCount::Fixed(rods);
        self.config.set(config);
        self.resize_to(rods);
        Ok(())
    }

    fn resize_to(&mut self, rods: usize) {
        let max_place = max_place_for(rods);
        self.store.resize(max_place);
        self.gestures.retain(|bead, _| bead.place_value <= max_place);
    }

    // -------------------------------------------------------------------------
    // State
    // -------------------------------------------------------------------------

    /// Show an externally controlled value. Never notifies handlers.
    ///
    /// With `RodCount::Auto` the abacus grows to fit. Returns whether the rods
    /// were rebuilt.
    pub fn set_value(&mut self, value: impl Into<AbacusValue>) -> Result<bool> {
        let value = value.into();
        let rods = self.config.get().rods.resolve(&value, self.store.rod_count())?;
        if rods != self.store.rod_count() {
            self.resize_to(rods);
        }
        self.store.sync_external(&value)
    }

    pub fn value(&self) -> AbacusValue {
        self.store.value()
    }

    pub fn states(&self) -> PlaceStateMap {
        self.store.states()
    }

    /// The rod-state signal, for building deriveds.
    pub fn states_signal(&self) -> Signal<PlaceStateMap> {
        self.store.states_signal()
    }

    pub fn rod_count(&self) -> usize {
        self.store.rod_count()
    }

    /// Register a handler for user-driven value changes.
    pub fn on_value_change<F>(&self, handler: F) -> Cleanup
    where
        F: Fn(&AbacusValue) + 'static,
    {
        self.store.on_value_change(handler)
    }

    // -------------------------------------------------------------------------
    // Disabled beads
    // -------------------------------------------------------------------------

    pub fn disabled(&self) -> &DisabledBeads {
        &self.disabled
    }

    pub fn disabled_mut(&mut self) -> &mut DisabledBeads {
        &mut self.disabled
    }

    pub fn set_disabled(&mut self, disabled: DisabledBeads) {
        self.disabled = disabled;
    }

    // -------------------------------------------------------------------------
    // Interaction
    // -------------------------------------------------------------------------

    /// Toggle a bead by click.
    ///
    /// Ignored (`Ok(None)`) when clicks are off, the bead is disabled, or the
    /// click trails a drag on the same bead. Unknown places are an error.
    pub fn click(&mut self, bead: BeadId, now: Instant) -> Result<Option<AbacusValue>> {
        let state = self.store.get(bead.place_value)?;
        let active = state.is_bead_active(bead.bead_type, bead.slot())?;

        if !self.config.get().click_enabled {
            return Ok(None);
        }
        if self.disabled.is_bead_disabled(bead) {
            log::warn!("click on disabled bead {} ignored", bead);
            return Ok(None);
        }
        if let Some(machine) = self.gestures.get_mut(&bead) {
            if !machine.accept_click(now) {
                log::warn!("click on {} suppressed after drag", bead);
                return Ok(None);
            }
        }

        let target = match bead.bead_type {
            BeadType::Heaven => BeadConfig::heaven(bead.place_value, active),
            BeadType::Earth => BeadConfig::earth(bead.place_value, bead.slot(), active),
        };
        self.store.toggle_bead(&target).map(Some)
    }

    /// Pointer pressed on a bead at screen Y `y`.
    pub fn drag_start(&mut self, bead: BeadId, y: f32) -> Result<()> {
        self.store.get(bead.place_value)?.is_bead_active(bead.bead_type, bead.slot())?;

        let config = self.config.get();
        if !config.gestures_enabled {
            return Ok(());
        }
        if self.disabled.is_bead_disabled(bead) {
            log::warn!("drag on disabled bead {} ignored", bead);
            return Ok(());
        }

        let bead_size = config.layout.bead_size * config.scale_factor;
        self.gestures
            .entry(bead)
            .or_insert_with(|| GestureStateMachine::new(bead.bead_type, bead_size, &config.gesture))
            .start(y);
        Ok(())
    }

    /// Pointer moved while dragging a bead. Applies any resulting intent.
    pub fn drag_move(&mut self, bead: BeadId, y: f32) -> Result<Option<AbacusValue>> {
        let Some(machine) = self.gestures.get_mut(&bead) else {
            return Ok(None);
        };
        match machine.move_to(y) {
            Some(direction) => self.store.apply_direction(bead, direction),
            None => Ok(None),
        }
    }

    /// Pointer released.
    pub fn drag_end(&mut self, bead: BeadId, now: Instant) {
        if let Some(machine) = self.gestures.get_mut(&bead) {
            machine.end(now);
        }
    }

    /// Drag aborted by the host (pointer lost, window blurred).
    pub fn drag_cancel(&mut self, bead: BeadId) {
        self.gestures.remove(&bead);
    }

    /// Expire finished click guards and forget idle machines.
    pub fn settle(&mut self, now: Instant) {
        self.gestures.retain(|_, machine| {
            machine.settle(now);
            machine.phase() != GesturePhase::Idle
        });
    }

    /// Keyboard digit entry on one rod.
    ///
    /// Digits above 9 and fully disabled rods are ignored.
    pub fn press_digit(&mut self, place: PlaceValue, digit: u8) -> Result<Option<AbacusValue>> {
        self.store.get(place)?;
        if self.disabled.is_rod_disabled(place) {
            log::warn!("digit entry on disabled rod {} ignored", place);
            return Ok(None);
        }
        self.store.set_digit(place, digit)
    }

    // -------------------------------------------------------------------------
    // Tutorial highlights
    // -------------------------------------------------------------------------

    pub fn set_highlights(&mut self, highlights: &[StepHighlight]) {
        self.highlights = StepHighlightIndex::new(highlights);
    }

    pub fn clear_highlights(&mut self) {
        self.highlights = StepHighlightIndex::default();
    }

    pub fn set_current_step(&mut self, step: usize) {
        self.current_step = step;
    }

    pub fn current_step(&self) -> usize {
        self.current_step
    }

    pub fn step_count(&self) -> usize {
        self.highlights.step_count()
    }

    pub fn step_status(&self, bead: BeadId) -> BeadStepStatus {
        self.highlights.status(bead, self.current_step)
    }

    /// Highlights of the current step, in movement order.
    pub fn current_step_highlights(&self) -> Vec<StepHighlight> {
        self.highlights.step(self.current_step)
    }

    /// Bead moves that would take the current state to `target`.
    pub fn diff_to(&self, target: &AbacusValue, step_index: usize) -> Result<Vec<StepHighlight>> {
        let rods = rods_for(target).max(self.store.rod_count());
        let to = encode(target, max_place_for(rods))?;
        diff_states(&self.store.states(), &to, step_index)
    }

    // -------------------------------------------------------------------------
    // Output
    // -------------------------------------------------------------------------

    pub fn layout(&self) -> Result<AbacusLayout> {
        let config = self.config.get();
        compute_layout(
            &self.store.states(),
            self.store.rod_count(),
            &config.layout_options(),
            &config.layout,
        )
    }

    /// The visible bead under a point.
    pub fn bead_at(&self, x: f32, y: f32) -> Result<Option<BeadId>> {
        Ok(self.layout()?.hit_test(x, y))
    }

    /// Every bead with coordinates, step status and styler content.
    pub fn render<S: BeadStyler>(&self, styler: &S) -> Result<Vec<RenderedBead<S::Content>>> {
        let layout = self.layout()?;
        let rod_count = layout.dimensions.rod_count;

        layout
            .beads
            .into_iter()
            .map(|placement| -> Result<RenderedBead<S::Content>> {
                let id = placement.id();
                let context = BeadContext {
                    bead: placement.bead,
                    column: place_to_column(id.place_value, rod_count)?,
                    rod_count,
                    status: self.step_status(id),
                    disabled: self.disabled.is_bead_disabled(id),
                };
                Ok(RenderedBead {
                    placement,
                    status: context.status,
                    disabled: context.disabled,
                    content: styler.style(&context),
                })
            })
            .collect()
    }

    /// `render` with the configured colour scheme.
    pub fn beads(&self) -> Result<Vec<RenderedBead<BeadTone>>> {
        self.render(&self.config.get().color_scheme)
    }

    /// Numeral labels, tinted by the colour scheme when `colored_numerals` is on.
    ///
    /// Empty unless numerals are shown.
    pub fn numerals(&self) -> Result<Vec<RenderedNumeral>> {
        let config = self.config.get();
        let layout = self.layout()?;
        let rod_count = layout.dimensions.rod_count;

        layout
            .numerals
            .into_iter()
            .map(|label| {
                let tone = if config.colored_numerals {
                    let column = place_to_column(label.place_value, rod_count)?;
                    config.color_scheme.numeral_tone(label.place_value, column)
                } else {
                    None
                };
                Ok(RenderedNumeral { label, tone })
            })
            .collect()
    }
}

fn max_place_for(rods: usize) -> PlaceValue {
    rods.saturating_sub(1) as PlaceValue
}

/// Create a derived that re-lays out the abacus when beads or config change.
///
/// Yields `None` (with an error logged) only if the rod map is inconsistent.
pub fn create_layout_derived(
    states: Signal<PlaceStateMap>,
    config: Signal<AbacusConfig>,
) -> Derived<Option<AbacusLayout>> {
    derived(move || {
        let states = states.get();
        let config = config.get();
        match compute_layout(&states, states.rod_count(), &config.layout_options(), &config.layout) {
            Ok(layout) => Some(layout),
            Err(err) => {
                log::error!("layout failed: {}", err);
                None
            }
        }
    })
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::BeadMask;
    use crate::style::ColorScheme;
    use crate::types::Direction;
    use std::cell::RefCell;
    use std::rc::Rc;
    use std::time::Duration;

    fn fixed(rods: usize) -> AbacusConfig {
        AbacusConfig {
            rods: RodCount::Fixed(rods),
            ..AbacusConfig::default()
        }
    }

    fn recorder(abacus: &Abacus) -> (Rc<RefCell<Vec<AbacusValue>>>, Cleanup) {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let seen_clone = seen.clone();
        let cleanup = abacus.on_value_change(move |value| seen_clone.borrow_mut().push(value.clone()));
        (seen, cleanup)
    }

    #[test]
    fn test_click_toggles_and_notifies() {
        let mut abacus = Abacus::new(fixed(2)).unwrap();
        let (seen, _cleanup) = recorder(&abacus);

        let now = Instant::now();
        assert_eq!(abacus.click(BeadId::heaven(1), now).unwrap(), Some(AbacusValue::from(50u64)));
        assert_eq!(abacus.click(BeadId::earth(0, 2), now).unwrap(), Some(AbacusValue::from(53u64)));
        assert_eq!(*seen.borrow(), vec![AbacusValue::from(50u64), AbacusValue::from(53u64)]);
    }

    #[test]
    fn test_set_value_is_silent() {
        let mut abacus = Abacus::new(fixed(3)).unwrap();
        let (seen, _cleanup) = recorder(&abacus);

        assert!(abacus.set_value(123u64).unwrap());
        assert!(!abacus.set_value(123u64).unwrap());
        assert!(seen.borrow().is_empty());
        assert_eq!(abacus.value(), AbacusValue::from(123u64));
    }

    #[test]
    fn test_click_out_of_range_fails() {
        let mut abacus = Abacus::new(fixed(2)).unwrap();
        assert!(matches!(
            abacus.click(BeadId::heaven(5), Instant::now()),
            Err(AbacusError::PlaceOutOfRange { place: 5, .. })
        ));
    }

    #[test]
    fn test_click_disabled() {
        let mut abacus = Abacus::new(AbacusConfig {
            click_enabled: false,
            ..fixed(1)
        })
        .unwrap();
        assert_eq!(abacus.click(BeadId::heaven(0), Instant::now()).unwrap(), None);
        assert!(abacus.value().is_zero());
    }

    #[test]
    fn test_disabled_bead_ignored() {
        let mut abacus = Abacus::new(fixed(2)).unwrap();
        abacus.disabled_mut().disable_bead(BeadId::heaven(0));

        let now = Instant::now();
        assert_eq!(abacus.click(BeadId::heaven(0), now).unwrap(), None);
        assert!(abacus.click(BeadId::earth(0, 0), now).unwrap().is_some());
        assert_eq!(abacus.press_digit(0, 7).unwrap(), Some(AbacusValue::from(7u64)));

        abacus.disabled_mut().disable(1, BeadMask::ROD);
        assert_eq!(abacus.press_digit(1, 3).unwrap(), None);
    }

    #[test]
    fn test_drag_then_click_suppressed() {
        let mut abacus = Abacus::new(fixed(1)).unwrap();
        let (seen, _cleanup) = recorder(&abacus);
        let bead = BeadId::earth(0, 0);
        let now = Instant::now();

        abacus.drag_start(bead, 60.0).unwrap();
        assert_eq!(abacus.drag_move(bead, 50.0).unwrap(), Some(AbacusValue::from(1u64)));
        abacus.drag_end(bead, now);

        // Synthetic click right after pointer-up.
        assert_eq!(abacus.click(bead, now + Duration::from_millis(10)).unwrap(), None);
        // A real click later goes through.
        assert_eq!(
            abacus.click(bead, now + Duration::from_millis(500)).unwrap(),
            Some(AbacusValue::zero())
        );
        assert_eq!(seen.borrow().len(), 2);
    }

    #[test]
    fn test_drag_reversal() {
        let mut abacus = Abacus::new(fixed(1)).unwrap();
        let bead = BeadId::heaven(0);

        abacus.drag_start(bead, 10.0).unwrap();
        assert_eq!(abacus.drag_move(bead, 20.0).unwrap(), Some(AbacusValue::from(5u64)));
        assert_eq!(abacus.drag_move(bead, 25.0).unwrap(), None);
        assert_eq!(abacus.drag_move(bead, 15.0).unwrap(), Some(AbacusValue::zero()));
        abacus.drag_cancel(bead);
        assert_eq!(abacus.drag_move(bead, 40.0).unwrap(), None);
    }

    #[test]
    fn test_gestures_disabled() {
        let mut abacus = Abacus::new(AbacusConfig {
            gestures_enabled: false,
            ..fixed(1)
        })
        .unwrap();
        let bead = BeadId::heaven(0);
        abacus.drag_start(bead, 0.0).unwrap();
        assert_eq!(abacus.drag_move(bead, 30.0).unwrap(), None);
    }

    #[test]
    fn test_settle_forgets_idle_machines() {
        let mut abacus = Abacus::new(fixed(1)).unwrap();
        let bead = BeadId::heaven(0);
        let now = Instant::now();
        abacus.drag_start(bead, 0.0).unwrap();
        abacus.drag_move(bead, 30.0).unwrap();
        abacus.drag_end(bead, now);

        abacus.settle(now + Duration::from_secs(1));
        assert!(abacus.gestures.is_empty());
    }

    #[test]
    fn test_auto_rods_grow() {
        let mut abacus = Abacus::new(AbacusConfig::default()).unwrap();
        assert_eq!(abacus.rod_count(), 1);

        abacus.set_value(12345u64).unwrap();
        assert_eq!(abacus.rod_count(), 5);

        abacus.set_value(7u64).unwrap();
        assert_eq!(abacus.rod_count(), 5);
        assert_eq!(abacus.value(), AbacusValue::from(7u64));
    }

    #[test]
    fn test_fixed_rods_too_small() {
        let mut abacus = Abacus::new(fixed(2)).unwrap();
        assert!(matches!(
            abacus.set_value(123u64),
            Err(AbacusError::ValueTooLarge { digits: 3, rods: 2 })
        ));
    }

    #[test]
    fn test_set_rod_count_shrinks() {
        let mut abacus = Abacus::with_value(fixed(5), 12345u64).unwrap();
        abacus.set_rod_count(3).unwrap();
        assert_eq!(abacus.value(), AbacusValue::from(345u64));
        assert_eq!(abacus.config().rods, RodCount::Fixed(3));
        assert!(abacus.set_rod_count(0).is_err());
    }

    #[test]
    fn test_set_value_too_large_after_shrink() {
        let mut abacus = Abacus::with_value(fixed(5), 12345u64).unwrap();
        abacus.set_rod_count(3).unwrap();

        assert!(matches!(
            abacus.set_value(12345u64),
            Err(AbacusError::ValueTooLarge { digits: 5, rods: 3 })
        ));
        assert_eq!(abacus.value(), AbacusValue::from(345u64));
    }

    #[test]
    fn test_render_statuses_and_tones() {
        let mut abacus = Abacus::with_value(
            AbacusConfig {
                color_scheme: ColorScheme::HeavenEarth,
                ..fixed(2)
            },
            3u64,
        )
        .unwrap();
        let moves = abacus.diff_to(&AbacusValue::from(8u64), 0).unwrap();
        abacus.set_highlights(&moves);

        let beads = abacus.beads().unwrap();
        assert_eq!(beads.len(), 10);

        let heaven = beads.iter().find(|b| b.id() == BeadId::heaven(0)).unwrap();
        assert_eq!(heaven.content, BeadTone::Heaven);
        assert_eq!(heaven.status.direction(), Some(Direction::Activate));

        let earth = beads.iter().find(|b| b.id() == BeadId::earth(1, 0)).unwrap();
        assert_eq!(earth.content, BeadTone::Earth);
        assert_eq!(earth.status, BeadStepStatus::Uninvolved);

        abacus.set_current_step(1);
        assert!(matches!(
            abacus.step_status(BeadId::heaven(0)),
            BeadStepStatus::Completed { step_index: 0 }
        ));
    }

    #[test]
    fn test_colored_numerals() {
        let config = AbacusConfig {
            show_numerals: true,
            color_scheme: ColorScheme::PlaceValue,
            ..fixed(2)
        };
        let mut abacus = Abacus::with_value(config.clone(), 38u64).unwrap();

        let plain: Vec<Option<BeadTone>> = abacus.numerals().unwrap().iter().map(|n| n.tone).collect();
        assert_eq!(plain, vec![None, None]);

        abacus
            .set_config(AbacusConfig {
                colored_numerals: true,
                ..config
            })
            .unwrap();
        let numerals = abacus.numerals().unwrap();
        let digits: Vec<u8> = numerals.iter().map(|n| n.label.digit).collect();
        let tones: Vec<Option<BeadTone>> = numerals.iter().map(|n| n.tone).collect();
        assert_eq!(digits, vec![3, 8]);
        assert_eq!(tones, vec![Some(BeadTone::Place(1)), Some(BeadTone::Place(0))]);
    }

    #[test]
    fn test_empty_columns_hidden() {
        let abacus = Abacus::with_value(
            AbacusConfig {
                show_empty_columns: false,
                show_numerals: true,
                ..fixed(4)
            },
            7u64,
        )
        .unwrap();

        let beads = abacus.beads().unwrap();
        assert!(beads.iter().filter(|b| b.id().place_value > 0).all(|b| !b.placement.visible));
        assert_eq!(abacus.numerals().unwrap().len(), 1);

        // Hidden rods cannot be hit.
        let hidden = abacus.layout().unwrap().bead(BeadId::heaven(3)).copied().unwrap();
        assert_eq!(abacus.bead_at(hidden.x, hidden.y).unwrap(), None);
    }

    #[test]
    fn test_bead_at() {
        let abacus = Abacus::with_value(fixed(1), 5u64).unwrap();
        let layout = abacus.layout().unwrap();
        let heaven = layout.bead(BeadId::heaven(0)).unwrap();
        assert_eq!(abacus.bead_at(heaven.x, heaven.y).unwrap(), Some(BeadId::heaven(0)));
        assert_eq!(abacus.bead_at(-10.0, -10.0).unwrap(), None);
    }

    #[test]
    fn test_layout_derived_tracks_changes() {
        let mut abacus = Abacus::new(fixed(1)).unwrap();
        let layout = create_layout_derived(abacus.states_signal(), abacus.config_signal());

        let before = layout.get().unwrap();
        assert!(!before.bead(BeadId::heaven(0)).unwrap().bead.active);

        abacus.click(BeadId::heaven(0), Instant::now()).unwrap();
        let after = layout.get().unwrap();
        assert!(after.bead(BeadId::heaven(0)).unwrap().bead.active);

        abacus.set_rod_count(3).unwrap();
        assert_eq!(layout.get().unwrap().beads.len(), 15);
    }
}
