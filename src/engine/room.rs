// Room state machine.
//
//   Corridor ──door──▶ OriginsRoom ──exit──▶ Corridor
//            ──door──▶ TravelsGallery ──exit──▶ Corridor
//            ──door──▶ FinalGift ──gift──▶ LetterRevealed (terminal)
//
// Doors fire by click or by a 1 s dwell, room exits by a 2 s dwell, the gift
// by a 1 s dwell. Entering a 3D zone teleports the player to its spawn pose
// and forgets every dwell timer.

use super::dwell::DwellTracker;
use super::error::ConfigurationError;
use super::zone::{Pose, Transition, Zone, ZoneId, ZoneRegistry};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RoomState {
    Corridor,
    OriginsRoom,
    TravelsGallery,
    FinalGift,
    LetterRevealed,
}

impl RoomState {
    /// The 3D zone shown in this state, `None` once the letter is up.
    pub fn zone(self) -> Option<ZoneId> {
        match self {
            RoomState::Corridor => Some(ZoneId::Corridor),
            RoomState::OriginsRoom => Some(ZoneId::Origins),
            RoomState::TravelsGallery => Some(ZoneId::Travels),
            RoomState::FinalGift => Some(ZoneId::FinalGift),
            RoomState::LetterRevealed => None,
        }
    }

    pub fn for_zone(zone: ZoneId) -> Self {
        match zone {
            ZoneId::Corridor => RoomState::Corridor,
            ZoneId::Origins => RoomState::OriginsRoom,
            ZoneId::Travels => RoomState::TravelsGallery,
            ZoneId::FinalGift => RoomState::FinalGift,
        }
    }

    pub fn is_terminal(self) -> bool {
        self == RoomState::LetterRevealed
    }
}

/// Emitted to the surrounding application when the state changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationEvent {
    EnterZone(ZoneId),
    ExitToParent,
    RevealContent,
}

/// Per-zone mutable state: where the player is and what they're dwelling at.
#[derive(Debug, Clone, Default)]
pub struct NavigationState {
    pub pose: Pose,
    pub dwell: DwellTracker,
}

impl NavigationState {
    pub fn new(pose: Pose) -> Self {
        Self {
            pose,
            dwell: DwellTracker::new(),
        }
    }

    /// Teleport and forget all dwell progress.
    pub fn reset(&mut self, pose: Pose) {
        self.pose = pose;
        self.dwell.clear();
    }
}

pub struct RoomController {
    zones: ZoneRegistry,
    state: RoomState,
}

impl RoomController {
    /// Start in the corridor. Every zone the state machine can reach must be
    /// registered.
    pub fn new(zones: ZoneRegistry) -> Result<Self, ConfigurationError> {
        for id in ZoneId::ALL {
            zones.require(id)?;
        }
        Ok(Self {
            zones,
            state: RoomState::Corridor,
        })
    }

    pub fn state(&self) -> RoomState {
        self.state
    }

    pub fn zones(&self) -> &ZoneRegistry {
        &self.zones
    }

    /// The zone currently being walked, `None` after the letter is revealed.
    pub fn active_zone(&self) -> Option<&Zone> {
        self.state.zone().and_then(|id| self.zones.get(id))
    }

    /// Fresh navigation state for the start of a session.
    pub fn initial_state(&self) -> NavigationState {
        let pose = self
            .active_zone()
            .map(|zone| zone.entry_pose(false))
            .unwrap_or_default();
        NavigationState::new(pose)
    }

    /// Where a transition from the current state leads, if it is defined.
    fn target(&self, transition: Transition) -> Option<RoomState> {
        use RoomState::*;
        match (self.state, transition) {
            (Corridor, Transition::EnterZone(zone)) => Some(RoomState::for_zone(zone)),
            (OriginsRoom | TravelsGallery, Transition::ExitToParent) => Some(Corridor),
            (OriginsRoom | TravelsGallery, Transition::EnterZone(ZoneId::Corridor)) => Some(Corridor),
            (FinalGift, Transition::RevealContent) => Some(LetterRevealed),
            _ => None,
        }
    }

    /// Apply a transition. Redundant or undefined transitions are ignored,
    /// except re-entering the corridor from the corridor, which re-spawns.
    pub fn apply(&mut self, transition: Transition, nav: &mut NavigationState) -> Option<NavigationEvent> {
        let Some(next) = self.target(transition) else {
            log::debug!("ignoring {:?} in {:?}", transition, self.state);
            return None;
        };

        if next == self.state {
            // Only the corridor can be "entered" from itself.
            if let Some(zone) = self.zones.get(ZoneId::Corridor) {
                nav.reset(zone.entry_pose(true));
                log::debug!("corridor re-entered from itself, pose reset");
            }
            return None;
        }

        let from = self.state;
        self.state = next;

        let event = match transition {
            Transition::EnterZone(zone) => NavigationEvent::EnterZone(zone),
            Transition::ExitToParent => NavigationEvent::ExitToParent,
            Transition::RevealContent => NavigationEvent::RevealContent,
        };

        match self.state.zone().and_then(|id| self.zones.get(id)) {
            Some(zone) => {
                let reentry = next == RoomState::Corridor;
                nav.reset(zone.entry_pose(reentry));
            }
            None => nav.dwell.clear(),
        }

        log::info!("{:?} -> {:?}", from, next);
        Some(event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::layout;
    use glam::Vec3;

    fn controller() -> (RoomController, NavigationState) {
        let zones = ZoneRegistry::from_zones(layout::museum()).unwrap();
        let rooms = RoomController::new(zones).unwrap();
        let nav = rooms.initial_state();
        (rooms, nav)
    }

    #[test]
    fn starts_in_the_corridor_at_its_spawn() {
        let (rooms, nav) = controller();
        assert_eq!(rooms.state(), RoomState::Corridor);
        assert_eq!(nav.pose.position, Vec3::new(0.0, 1.6, -20.0));
    }

    #[test]
    fn entering_a_room_resets_pose_and_timers() {
        let (mut rooms, mut nav) = controller();
        nav.dwell.begin(&"origins".into(), 0);
        nav.pose.yaw = 2.0;

        let event = rooms.apply(Transition::EnterZone(ZoneId::Origins), &mut nav);
        assert_eq!(event, Some(NavigationEvent::EnterZone(ZoneId::Origins)));
        assert_eq!(rooms.state(), RoomState::OriginsRoom);
        assert_eq!(nav.pose, rooms.active_zone().unwrap().spawn);
        assert!(nav.dwell.is_empty());
    }

    #[test]
    fn leaving_a_room_uses_the_corridor_reentry_spawn() {
        let (mut rooms, mut nav) = controller();
        rooms.apply(Transition::EnterZone(ZoneId::Travels), &mut nav);
        let event = rooms.apply(Transition::ExitToParent, &mut nav);
        assert_eq!(event, Some(NavigationEvent::ExitToParent));
        assert_eq!(rooms.state(), RoomState::Corridor);
        assert_eq!(nav.pose.position, Vec3::new(0.0, 1.6, -10.0));
    }

    #[test]
    fn repeated_transitions_are_ignored() {
        let (mut rooms, mut nav) = controller();
        rooms.apply(Transition::EnterZone(ZoneId::Origins), &mut nav);
        nav.pose.position.x = 2.0;
        assert_eq!(rooms.apply(Transition::EnterZone(ZoneId::Origins), &mut nav), None);
        assert_eq!(nav.pose.position.x, 2.0);
    }

    #[test]
    fn corridor_self_entry_still_resets_pose() {
        let (mut rooms, mut nav) = controller();
        nav.pose.position = Vec3::new(3.0, 1.6, -40.0);
        nav.dwell.begin(&"final".into(), 0);
        assert_eq!(rooms.apply(Transition::EnterZone(ZoneId::Corridor), &mut nav), None);
        assert_eq!(nav.pose.position, Vec3::new(0.0, 1.6, -10.0));
        assert!(nav.dwell.is_empty());
    }

    #[test]
    fn gift_reveals_the_letter_and_nothing_follows() {
        let (mut rooms, mut nav) = controller();
        rooms.apply(Transition::EnterZone(ZoneId::FinalGift), &mut nav);
        assert_eq!(rooms.apply(Transition::ExitToParent, &mut nav), None);
        assert_eq!(
            rooms.apply(Transition::RevealContent, &mut nav),
            Some(NavigationEvent::RevealContent)
        );
        assert!(rooms.state().is_terminal());
        assert!(rooms.active_zone().is_none());
        assert_eq!(rooms.apply(Transition::EnterZone(ZoneId::Corridor), &mut nav), None);
        assert_eq!(rooms.state(), RoomState::LetterRevealed);
    }

    #[test]
    fn undefined_transitions_do_nothing() {
        let (mut rooms, mut nav) = controller();
        assert_eq!(rooms.apply(Transition::ExitToParent, &mut nav), None);
        assert_eq!(rooms.apply(Transition::RevealContent, &mut nav), None);
        assert_eq!(rooms.state(), RoomState::Corridor);
    }

    #[test]
    fn missing_zone_is_a_configuration_error() {
        let zones = ZoneRegistry::from_zones(
            layout::museum()
                .into_iter()
                .filter(|z| z.id == ZoneId::Origins),
        );
        // Origins alone has no EnterZone targets, so the registry is fine...
        let zones = zones.unwrap();
        // ...but the controller needs all four.
        assert!(matches!(
            RoomController::new(zones),
            Err(ConfigurationError::MissingZone(ZoneId::Corridor))
        ));
    }
}
