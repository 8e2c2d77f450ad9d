// Proximity dwell timers.
//
// Standing inside a point of interest's radius starts a timer; staying there
// for its dwell threshold fires the point's transition. Walking out of range
// throws the progress away, so re-entering starts from zero.
//
// There is no "already fired" latch: while the player stays in range the
// transition fires again every frame. The room controller ignores repeats.

use std::collections::HashMap;

use glam::Vec3;

use super::zone::{PoiId, PointOfInterest, Transition, TriggerPolicy};

/// Host timestamp in milliseconds.
pub type Millis = u64;

/// Start times of continuous proximity, keyed by point of interest.
/// No entry means "not currently dwelling".
#[derive(Debug, Clone, Default)]
pub struct DwellTracker {
    started: HashMap<PoiId, Millis>,
}

impl DwellTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn started(&self, id: &PoiId) -> Option<Millis> {
        self.started.get(id).copied()
    }

    /// Start a timer for `id` unless one is running. Returns the start time.
    pub fn begin(&mut self, id: &PoiId, now: Millis) -> Millis {
        *self.started.entry(id.clone()).or_insert(now)
    }

    pub fn elapsed(&self, id: &PoiId, now: Millis) -> Option<Millis> {
        self.started(id).map(|t| now.saturating_sub(t))
    }

    /// Fraction of `threshold` dwelt so far, in [0, 1]. 0 when not dwelling.
    pub fn progress(&self, id: &PoiId, now: Millis, threshold: Millis) -> f32 {
        match self.elapsed(id, now) {
            Some(_) if threshold == 0 => 1.0,
            Some(elapsed) => (elapsed as f32 / threshold as f32).min(1.0),
            None => 0.0,
        }
    }

    pub fn remove(&mut self, id: &PoiId) {
        self.started.remove(id);
    }

    pub fn retain(&mut self, mut keep: impl FnMut(&PoiId) -> bool) {
        self.started.retain(|id, _| keep(id));
    }

    pub fn clear(&mut self) {
        self.started.clear();
    }

    pub fn len(&self) -> usize {
        self.started.len()
    }

    pub fn is_empty(&self) -> bool {
        self.started.is_empty()
    }
}

/// A dwell threshold was reached this frame.
#[derive(Debug, Clone, PartialEq)]
pub struct TriggerFire {
    pub poi: PoiId,
    pub transition: Transition,
    pub elapsed: Millis,
}

/// Candidate chosen by the zone's policy together with its distance.
pub fn candidate<'a>(
    position: Vec3,
    pois: &'a [PointOfInterest],
    policy: &TriggerPolicy,
) -> Option<(&'a PointOfInterest, f32)> {
    match policy {
        TriggerPolicy::Nearest => pois
            .iter()
            .map(|poi| (poi, poi.horizontal_distance(position)))
            .min_by(|a, b| a.1.total_cmp(&b.1)),
        TriggerPolicy::Designated(id) => pois
            .iter()
            .find(|poi| &poi.id == id)
            .map(|poi| (poi, poi.horizontal_distance(position))),
    }
}

/// Run the dwell check for one frame.
///
/// Returns the fired transition, if the chosen point has been dwelt at for at
/// least its threshold. Leaves `tracker` holding entries only for points the
/// player is currently inside.
pub fn update(
    position: Vec3,
    pois: &[PointOfInterest],
    policy: &TriggerPolicy,
    tracker: &mut DwellTracker,
    now: Millis,
) -> Option<TriggerFire> {
    let Some((poi, distance)) = candidate(position, pois, policy) else {
        tracker.clear();
        return None;
    };

    if distance >= poi.radius {
        tracker.clear();
        return None;
    }

    // Anything we've walked out of loses its progress.
    tracker.retain(|id| {
        pois.iter()
            .find(|p| &p.id == id)
            .is_some_and(|p| p.horizontal_distance(position) < p.radius)
    });

    let started = tracker.begin(&poi.id, now);
    let elapsed = now.saturating_sub(started);
    if elapsed >= poi.dwell_ms {
        Some(TriggerFire {
            poi: poi.id.clone(),
            transition: poi.transition,
            elapsed,
        })
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::zone::ZoneId;
    use glam::Vec2;

    fn door(id: &str, x: f32, z: f32, room: ZoneId) -> PointOfInterest {
        PointOfInterest {
            id: id.into(),
            position: Vec2::new(x, z),
            radius: 2.0,
            dwell_ms: 1000,
            transition: Transition::EnterZone(room),
            clickable: true,
        }
    }

    fn doors() -> Vec<PointOfInterest> {
        vec![
            door("origins", -5.5, -27.0, ZoneId::Origins),
            door("travels", 5.5, -27.0, ZoneId::Travels),
            door("final", 0.0, -54.0, ZoneId::FinalGift),
        ]
    }

    fn at(x: f32, z: f32) -> Vec3 {
        Vec3::new(x, 1.6, z)
    }

    #[test]
    fn first_frame_in_range_starts_the_timer() {
        let pois = doors();
        let mut tracker = DwellTracker::new();
        assert_eq!(update(at(4.5, -27.0), &pois, &TriggerPolicy::Nearest, &mut tracker, 500), None);
        assert_eq!(tracker.started(&"travels".into()), Some(500));
        assert_eq!(tracker.len(), 1);
    }

    #[test]
    fn threshold_fires_and_keeps_firing() {
        let pois = doors();
        let mut tracker = DwellTracker::new();
        let policy = TriggerPolicy::Nearest;
        update(at(4.5, -27.0), &pois, &policy, &mut tracker, 0);
        assert_eq!(update(at(4.5, -27.0), &pois, &policy, &mut tracker, 999), None);

        let fire = update(at(4.5, -27.0), &pois, &policy, &mut tracker, 1000);
        assert_eq!(
            fire.map(|f| f.transition),
            Some(Transition::EnterZone(ZoneId::Travels))
        );
        let again = update(at(4.5, -27.0), &pois, &policy, &mut tracker, 1016);
        assert!(again.is_some());
    }

    #[test]
    fn leaving_range_clears_every_timer() {
        let pois = doors();
        let mut tracker = DwellTracker::new();
        let policy = TriggerPolicy::Nearest;
        update(at(-4.5, -27.0), &pois, &policy, &mut tracker, 0);
        assert_eq!(tracker.len(), 1);
        update(at(0.0, -27.0), &pois, &policy, &mut tracker, 100);
        assert!(tracker.is_empty());
    }

    #[test]
    fn only_the_nearest_point_counts() {
        let mut pois = doors();
        // Two overlapping points; the player is nearer to the second.
        pois.push(door("close", 3.0, -27.0, ZoneId::FinalGift));
        let mut tracker = DwellTracker::new();
        update(at(3.2, -27.0), &pois, &TriggerPolicy::Nearest, &mut tracker, 0);
        assert_eq!(tracker.started(&"close".into()), Some(0));
        assert_eq!(tracker.started(&"travels".into()), None);
    }

    #[test]
    fn designated_point_ignores_others() {
        let pois = doors();
        let policy = TriggerPolicy::Designated("final".into());
        let mut tracker = DwellTracker::new();
        // Right next to the travels door, but only "final" is watched.
        update(at(5.0, -27.0), &pois, &policy, &mut tracker, 0);
        assert!(tracker.is_empty());
        update(at(0.0, -53.0), &pois, &policy, &mut tracker, 0);
        assert_eq!(tracker.started(&"final".into()), Some(0));
    }

    #[test]
    fn switching_between_overlapping_points_drops_the_old_timer() {
        let mut pois = doors();
        pois.push(door("near_travels", 3.0, -27.0, ZoneId::Origins));
        let mut tracker = DwellTracker::new();
        let policy = TriggerPolicy::Nearest;
        update(at(5.0, -27.0), &pois, &policy, &mut tracker, 0);
        assert!(tracker.started(&"travels".into()).is_some());
        // Now nearest is "near_travels" and "travels" is out of its radius.
        update(at(2.0, -27.0), &pois, &policy, &mut tracker, 10);
        assert_eq!(tracker.started(&"travels".into()), None);
        assert_eq!(tracker.started(&"near_travels".into()), Some(10));
    }

    #[test]
    fn progress_is_clamped() {
        let mut tracker = DwellTracker::new();
        let id: PoiId = "gift".into();
        assert_eq!(tracker.progress(&id, 0, 1000), 0.0);
        tracker.begin(&id, 100);
        assert_eq!(tracker.progress(&id, 600, 1000), 0.5);
        assert_eq!(tracker.progress(&id, 5000, 1000), 1.0);
    }
}
