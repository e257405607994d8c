//! Meetdesk core: session orchestration for an opaque conferencing SDK.
//!
//! Pure Rust crate with no UI dependencies. The vendor SDK is reached only
//! through the [`ConferenceEngine`] trait; desktop shells wire a concrete
//! engine in and drive the session through [`SessionManager`].

pub mod adapter;
pub mod credentials;
pub mod devices;
pub mod engine;
pub mod errors;
pub mod events;
pub mod host;
pub mod pending;
pub mod session;
pub mod settings;
pub mod tiles;

pub use adapter::EngineAdapter;
pub use credentials::{CredentialsProvider, StaticCredentials};
pub use devices::DeviceRegistry;
pub use engine::{
    ConferenceEngine, DeviceDescriptor, EngineConfig, EngineEvent, EngineEventSink, EngineStatus,
    MeetingStatus, ParticipantInfo, RenderHandle, WindowHandle, WindowRegion,
};
pub use errors::{EngineError, SessionError};
pub use events::{EventEmitter, SessionEvent, SessionEventListener, SessionStatus};
pub use host::HostBridge;
pub use pending::PendingOp;
pub use session::{SessionManager, SessionTimeouts};
pub use settings::{Settings, SettingsStore};
pub use tiles::{TileManager, VideoTile, tile_rect};
