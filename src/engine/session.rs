// Navigation session: one frame step per rendered frame.
//
// Per frame:
//   1. InputState is snapshotted (mouse delta consumed)
//   2. mouse delta → yaw/pitch
//   3. held keys + yaw → clamped position
//   4. position → dwell timers → maybe a transition
//   5. the room controller applies it and an event is queued
//
// Input handlers only touch InputState. The pose has one writer: step().

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use winit::event::{DeviceEvent, WindowEvent};

use super::camera::apply_look;
use super::config::{SessionConfig, Tuning};
use super::dwell::{self, Millis, TriggerFire};
use super::error::ConfigurationError;
use super::input::{InputSnapshot, InputState};
use super::movement::integrate;
use super::pick::pick_clickable;
use super::room::{NavigationEvent, NavigationState, RoomController, RoomState};
use super::zone::{PoiId, PointOfInterest, Pose, Transition, Zone, ZoneId, ZoneRegistry};

// ============================================================================
// PURE FRAME STEP
// ============================================================================

#[derive(Debug, Clone)]
pub struct StepOutcome {
    pub state: NavigationState,
    pub fired: Option<TriggerFire>,
}

/// Advance the navigation state by one frame inside `zone`.
/// Needs no window, camera or clock: `now` is supplied by the host.
pub fn step(
    mut state: NavigationState,
    input: &InputSnapshot,
    zone: &Zone,
    now: Millis,
    tuning: &Tuning,
) -> StepOutcome {
    apply_look(&mut state.pose, input.mouse_delta, tuning.look_sensitivity, zone.clamp_pitch);

    state.pose.position = integrate(
        state.pose.position,
        state.pose.yaw,
        input,
        &zone.boundary,
        tuning.move_speed,
    );

    let fired = dwell::update(
        state.pose.position,
        &zone.pois,
        &zone.trigger_policy,
        &mut state.dwell,
        now,
    );

    StepOutcome { state, fired }
}

// ============================================================================
// LISTENER SCOPE
// ============================================================================

/// Which zones currently have input listeners attached.
/// A healthy session has exactly one while a 3D zone is up, none afterwards.
#[derive(Debug, Clone, Default)]
pub struct ListenerRegistry {
    bound: Rc<RefCell<Vec<ZoneId>>>,
}

impl ListenerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach listeners for `zone`. They stay attached until the guard drops.
    pub fn bind(&self, zone: ZoneId) -> ListenerGuard {
        self.bound.borrow_mut().push(zone);
        log::debug!("input listeners attached for {:?}", zone);
        ListenerGuard {
            bound: Rc::clone(&self.bound),
            zone,
        }
    }

    pub fn bound(&self) -> Vec<ZoneId> {
        self.bound.borrow().clone()
    }

    pub fn count(&self) -> usize {
        self.bound.borrow().len()
    }
}

/// Detaches its zone's listeners on drop, whichever way the session ends.
#[derive(Debug)]
pub struct ListenerGuard {
    bound: Rc<RefCell<Vec<ZoneId>>>,
    zone: ZoneId,
}

impl ListenerGuard {
    pub fn zone(&self) -> ZoneId {
        self.zone
    }
}

impl Drop for ListenerGuard {
    fn drop(&mut self) {
        let mut bound = self.bound.borrow_mut();
        if let Some(i) = bound.iter().position(|z| *z == self.zone) {
            bound.remove(i);
        }
        log::debug!("input listeners detached for {:?}", self.zone);
    }
}

// ============================================================================
// SESSION
// ============================================================================

/// Dwell progress towards the point currently being approached.
#[derive(Debug, Clone, PartialEq)]
pub struct DwellStatus {
    pub poi: PoiId,
    pub transition: Transition,
    /// In [0, 1].
    pub progress: f32,
}

pub struct NavigationSession {
    rooms: RoomController,
    nav: NavigationState,
    input: InputState,
    tuning: Tuning,
    listeners: ListenerRegistry,
    binding: Option<ListenerGuard>,
    events: VecDeque<NavigationEvent>,
    frames: u64,
}

impl NavigationSession {
    pub fn new(config: &SessionConfig) -> Result<Self, ConfigurationError> {
        Self::with_registry(config.registry()?, config.tuning)
    }

    pub fn with_registry(zones: ZoneRegistry, tuning: Tuning) -> Result<Self, ConfigurationError> {
        Self::with_listeners(zones, tuning, ListenerRegistry::new())
    }

    /// Like [`with_registry`](Self::with_registry) but attaching listeners to
    /// a registry the caller can observe.
    pub fn with_listeners(
        zones: ZoneRegistry,
        tuning: Tuning,
        listeners: ListenerRegistry,
    ) -> Result<Self, ConfigurationError> {
        tuning.validate()?;
        let rooms = RoomController::new(zones)?;
        let nav = rooms.initial_state();
        let binding = rooms.state().zone().map(|zone| listeners.bind(zone));
        log::info!("navigation session started in {:?}", rooms.state());
        Ok(Self {
            rooms,
            nav,
            input: InputState::new(),
            tuning,
            listeners,
            binding,
            events: VecDeque::new(),
            frames: 0,
        })
    }

    // ------------------------------------------------------------------
    // Input (routed only while listeners are attached)
    // ------------------------------------------------------------------

    /// Input state, if the active zone is listening.
    pub fn input_mut(&mut self) -> Option<&mut InputState> {
        self.binding.as_ref()?;
        Some(&mut self.input)
    }

    pub fn input(&self) -> &InputState {
        &self.input
    }

    pub fn on_key_change(&mut self, key: &str, is_down: bool) {
        if let Some(input) = self.input_mut() {
            input.on_key_change(key, is_down);
        }
    }

    pub fn on_mouse_move(&mut self, dx: f32, dy: f32) {
        if let Some(input) = self.input_mut() {
            input.on_mouse_move(dx, dy);
        }
    }

    pub fn handle_window_event(&mut self, event: &WindowEvent) {
        if let Some(input) = self.input_mut() {
            input.process_window_event(event);
        }
    }

    pub fn handle_device_event(&mut self, event: &DeviceEvent) {
        if let Some(input) = self.input_mut() {
            input.process_device_event(event);
        }
    }

    /// True once per click that should engage pointer capture.
    pub fn take_capture_request(&mut self) -> bool {
        self.input_mut().is_some_and(|input| input.take_capture_request())
    }

    pub fn set_pointer_captured(&mut self, captured: bool) {
        self.input.set_pointer_captured(captured);
    }

    // ------------------------------------------------------------------
    // Frame
    // ------------------------------------------------------------------

    /// Run one frame. Returns the event caused by this frame, if any.
    pub fn frame(&mut self, now: Millis) -> Option<NavigationEvent> {
        let zone = self.rooms.active_zone()?;
        let snapshot = self.input.snapshot();
        let nav = std::mem::take(&mut self.nav);
        let outcome = step(nav, &snapshot, zone, now, &self.tuning);
        self.nav = outcome.state;
        self.frames += 1;

        let fire = outcome.fired?;
        log::debug!("dwelt {} ms at {}", fire.elapsed, fire.poi);
        self.apply(fire.transition)
    }

    /// Click on whatever door the player is looking at.
    pub fn click(&mut self) -> Option<NavigationEvent> {
        let zone = self.rooms.active_zone()?;
        let transition = pick_clickable(&self.nav.pose, &zone.pois)?.transition;
        self.apply(transition)
    }

    /// Apply a transition from outside the frame loop (e.g. a UI button).
    pub fn apply(&mut self, transition: Transition) -> Option<NavigationEvent> {
        let event = self.rooms.apply(transition, &mut self.nav)?;

        // Old zone's listeners go before the new zone's are attached.
        self.binding = None;
        self.binding = self.rooms.state().zone().map(|zone| self.listeners.bind(zone));

        if self.rooms.state().is_terminal() {
            // Leaving the 3D experience: hand the mouse back.
            self.input.release_capture();
            self.input.clear_keys();
        }

        self.events.push_back(event);
        Some(event)
    }

    pub fn drain_events(&mut self) -> Vec<NavigationEvent> {
        self.events.drain(..).collect()
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    pub fn pose(&self) -> &Pose {
        &self.nav.pose
    }

    pub fn navigation(&self) -> &NavigationState {
        &self.nav
    }

    pub fn state(&self) -> RoomState {
        self.rooms.state()
    }

    pub fn active_zone(&self) -> Option<&Zone> {
        self.rooms.active_zone()
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn listeners(&self) -> &ListenerRegistry {
        &self.listeners
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Progress towards the point the zone's trigger policy is dwelling at,
    /// i.e. the one that will fire.
    pub fn dwell_status(&self, now: Millis) -> Option<DwellStatus> {
        let zone = self.rooms.active_zone()?;
        let (poi, _) = dwell::candidate(self.nav.pose.position, &zone.pois, &zone.trigger_policy)?;
        self.nav.dwell.started(&poi.id)?;
        Some(DwellStatus {
            poi: poi.id.clone(),
            transition: poi.transition,
            progress: self.nav.dwell.progress(&poi.id, now, poi.dwell_ms),
        })
    }

    /// The door a click would enter right now, for hover highlighting.
    pub fn hovered_door(&self) -> Option<&PointOfInterest> {
        let zone = self.rooms.active_zone()?;
        pick_clickable(&self.nav.pose, &zone.pois)
    }
}
