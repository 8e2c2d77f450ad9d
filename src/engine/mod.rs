// Engine module - navigation core for the museum walk
// Frame step, zone configuration, dwell triggers and the room state machine.
// hud is the only part that knows about rendering.

pub mod camera;
pub mod config;
pub mod dwell;
pub mod error;
pub mod hud;
pub mod input;
pub mod layout;
pub mod movement;
pub mod pick;
pub mod room;
pub mod session;
pub mod zone;

// Re-export commonly used items
pub use camera::FirstPersonCamera;
pub use config::{SessionConfig, Tuning};
pub use dwell::{DwellTracker, Millis, TriggerFire};
pub use error::ConfigurationError;
pub use hud::{DebugStats, Hud, HudResponse, HudView};
pub use input::{InputSnapshot, InputState, MoveKey};
pub use room::{NavigationEvent, NavigationState, RoomController, RoomState};
pub use session::{step, DwellStatus, ListenerRegistry, NavigationSession, StepOutcome};
pub use zone::{
    CircularExclusion, PoiId, PointOfInterest, Pose, Transition, TriggerPolicy, Zone, ZoneBoundary,
    ZoneId, ZoneRegistry,
};
