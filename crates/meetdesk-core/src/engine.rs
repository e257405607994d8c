//! The opaque conferencing engine surface.
//!
//! The real SDK is closed source and callback driven. This module models
//! exactly the calls the orchestration layer uses, so the rest of the crate
//! (and its tests) never touch the vendor API directly.

use tokio::sync::mpsc::UnboundedSender;

/// Engine initialization parameters.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub web_domain: String,
    /// Ask the engine to skip its built-in meeting UI so the host window
    /// draws its own chrome around the rendered video region.
    pub custom_ui: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            web_domain: "https://zoom.us".to_string(),
            custom_ui: true,
        }
    }
}

/// Status code returned by every synchronous engine call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineStatus {
    Success,
    NotInitialized,
    AuthFailed,
    DeviceUnavailable,
    Failed,
}

/// A camera, microphone or speaker endpoint exposed by the engine.
///
/// Immutable once enumerated. Equality is by id: the engine may report the
/// same physical device under a refreshed display name.
#[derive(Debug, Clone)]
pub struct DeviceDescriptor {
    pub id: String,
    pub name: String,
}

impl PartialEq for DeviceDescriptor {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for DeviceDescriptor {}

/// Native handle of the host window the engine renders into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowHandle(pub isize);

/// Engine-owned handle of one participant's rendering surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RenderHandle(pub u64);

/// A rectangle in host window pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WindowRegion {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl WindowRegion {
    pub fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    pub fn width(&self) -> i32 {
        self.right - self.left
    }

    pub fn height(&self) -> i32 {
        self.bottom - self.top
    }
}

/// Payload of a participant-joined callback.
#[derive(Debug, Clone)]
pub struct ParticipantInfo {
    pub user_id: u64,
    pub name: String,
    pub is_self: bool,
}

/// High-level meeting status reported by the engine's status callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MeetingStatus {
    Connecting,
    InMeeting,
    Disconnecting,
    Ended,
    Failed,
}

/// Callback delivered by the engine, marshalled onto a channel.
///
/// The engine invokes its callbacks on its own threads; the sink moves them
/// onto the session event loop without blocking the engine.
#[derive(Debug, Clone)]
pub enum EngineEvent {
    /// Terminal result of an `authenticate` request.
    AuthReturn(bool),
    MeetingStatus(MeetingStatus),
    ParticipantsJoined(Vec<ParticipantInfo>),
    ParticipantsLeft(Vec<u64>),
}

pub type EngineEventSink = UnboundedSender<EngineEvent>;

/// The calls the orchestration layer makes into the opaque SDK.
///
/// All methods are synchronous hand-offs; async-style results arrive later
/// through the sink registered with [`ConferenceEngine::register_callbacks`].
/// Registering a new sink replaces the previous one.
pub trait ConferenceEngine: Send + Sync {
    fn initialize(&self, config: &EngineConfig) -> EngineStatus;
    fn register_callbacks(&self, sink: EngineEventSink);
    fn authenticate(&self, app_key: &str, app_secret: &str) -> EngineStatus;
    fn join_meeting(&self, user_name: &str, meeting_number: u64, password: &str) -> EngineStatus;
    fn leave_meeting(&self) -> EngineStatus;
    fn cleanup(&self);

    fn camera_list(&self) -> Vec<DeviceDescriptor>;
    fn mic_list(&self) -> Vec<DeviceDescriptor>;
    fn speaker_list(&self) -> Vec<DeviceDescriptor>;
    fn select_camera(&self, device_id: &str) -> bool;
    fn select_mic(&self, device_id: &str, device_name: &str) -> bool;
    fn select_speaker(&self, device_id: &str, device_name: &str) -> bool;

    fn create_video_container(&self, parent: WindowHandle, region: WindowRegion) -> EngineStatus;
    fn resize_video_container(&self, region: WindowRegion) -> EngineStatus;
    fn destroy_video_container(&self);
    fn create_video_tile(&self) -> Option<RenderHandle>;
    fn subscribe_tile(&self, tile: RenderHandle, user_id: u64) -> EngineStatus;
    fn unsubscribe_tile(&self, tile: RenderHandle) -> EngineStatus;
    fn set_tile_position(&self, tile: RenderHandle, rect: WindowRegion) -> EngineStatus;
    fn show_tile(&self, tile: RenderHandle);
    fn hide_tile(&self, tile: RenderHandle);
    fn destroy_video_tile(&self, tile: RenderHandle);
}
