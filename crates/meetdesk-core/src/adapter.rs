//! Thin request/response wrapper over the opaque engine.
//!
//! Translates the engine's status codes into [`EngineError`] and tolerates
//! being called before initialization. Owns no session state.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::mpsc;

use crate::engine::{
    ConferenceEngine, DeviceDescriptor, EngineConfig, EngineEvent, EngineStatus, RenderHandle,
    WindowHandle, WindowRegion,
};
use crate::errors::EngineError;

pub struct EngineAdapter {
    engine: Arc<dyn ConferenceEngine>,
    initialized: AtomicBool,
}

impl EngineAdapter {
    pub fn new(engine: Arc<dyn ConferenceEngine>) -> Self {
        Self {
            engine,
            initialized: AtomicBool::new(false),
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized.load(Ordering::SeqCst)
    }

    /// Register a fresh callback sink with the engine and return its
    /// receiving end. A previous subscription is replaced.
    pub fn subscribe(&self) -> mpsc::UnboundedReceiver<EngineEvent> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.engine.register_callbacks(tx);
        rx
    }

    pub fn initialize(&self, config: &EngineConfig) -> Result<(), EngineError> {
        let status = self.engine.initialize(config);
        tracing::info!(?status, domain = %config.web_domain, "engine initialize");
        let result = Self::check(status);
        self.initialized.store(result.is_ok(), Ordering::SeqCst);
        result
    }

    /// Issue an authentication request. The terminal result arrives later
    /// as [`EngineEvent::AuthReturn`].
    pub fn authenticate(&self, app_key: &str, app_secret: &str) -> Result<(), EngineError> {
        self.require_initialized()?;
        let status = self.engine.authenticate(app_key, app_secret);
        tracing::info!(?status, "engine authenticate issued");
        Self::check(status)
    }

    /// Issue a join request. Progress arrives as meeting status callbacks.
    pub fn join_meeting(
        &self,
        user_name: &str,
        meeting_number: u64,
        password: &str,
    ) -> Result<(), EngineError> {
        self.require_initialized()?;
        let status = self.engine.join_meeting(user_name, meeting_number, password);
        tracing::info!(?status, meeting_number, "engine join issued");
        Self::check(status)
    }

    pub fn leave_meeting(&self) {
        if !self.is_initialized() {
            return;
        }
        let status = self.engine.leave_meeting();
        tracing::info!(?status, "engine leave");
    }

    pub fn cleanup(&self) {
        if self.initialized.swap(false, Ordering::SeqCst) {
            self.engine.cleanup();
            tracing::info!("engine cleanup");
        }
    }

    pub fn camera_list(&self) -> Vec<DeviceDescriptor> {
        if !self.is_initialized() {
            return Vec::new();
        }
        self.engine.camera_list()
    }

    pub fn mic_list(&self) -> Vec<DeviceDescriptor> {
        if !self.is_initialized() {
            return Vec::new();
        }
        self.engine.mic_list()
    }

    pub fn speaker_list(&self) -> Vec<DeviceDescriptor> {
        if !self.is_initialized() {
            return Vec::new();
        }
        self.engine.speaker_list()
    }

    pub fn select_camera(&self, device_id: &str) -> bool {
        self.is_initialized() && self.engine.select_camera(device_id)
    }

    pub fn select_mic(&self, device_id: &str, device_name: &str) -> bool {
        self.is_initialized() && self.engine.select_mic(device_id, device_name)
    }

    pub fn select_speaker(&self, device_id: &str, device_name: &str) -> bool {
        self.is_initialized() && self.engine.select_speaker(device_id, device_name)
    }

    pub fn create_video_container(
        &self,
        parent: WindowHandle,
        region: WindowRegion,
    ) -> Result<(), EngineError> {
        self.require_initialized()?;
        Self::check(self.engine.create_video_container(parent, region))
    }

    pub fn resize_video_container(&self, region: WindowRegion) -> Result<(), EngineError> {
        self.require_initialized()?;
        Self::check(self.engine.resize_video_container(region))
    }

    pub fn destroy_video_container(&self) {
        if self.is_initialized() {
            self.engine.destroy_video_container();
        }
    }

    pub fn create_video_tile(&self) -> Result<RenderHandle, EngineError> {
        self.require_initialized()?;
        self.engine.create_video_tile().ok_or(EngineError::Unknown)
    }

    pub fn subscribe_tile(&self, tile: RenderHandle, user_id: u64) -> Result<(), EngineError> {
        self.require_initialized()?;
        Self::check(self.engine.subscribe_tile(tile, user_id))
    }

    pub fn unsubscribe_tile(&self, tile: RenderHandle) -> Result<(), EngineError> {
        self.require_initialized()?;
        Self::check(self.engine.unsubscribe_tile(tile))
    }

    pub fn set_tile_position(&self, tile: RenderHandle, rect: WindowRegion) -> Result<(), EngineError> {
        self.require_initialized()?;
        Self::check(self.engine.set_tile_position(tile, rect))
    }

    pub fn show_tile(&self, tile: RenderHandle) {
        if self.is_initialized() {
            self.engine.show_tile(tile);
        }
    }

    pub fn hide_tile(&self, tile: RenderHandle) {
        if self.is_initialized() {
            self.engine.hide_tile(tile);
        }
    }

    pub fn destroy_video_tile(&self, tile: RenderHandle) {
        if self.is_initialized() {
            self.engine.destroy_video_tile(tile);
        }
    }

    fn require_initialized(&self) -> Result<(), EngineError> {
        if self.is_initialized() {
            Ok(())
        } else {
            Err(EngineError::NotInitialized)
        }
    }

    fn check(status: EngineStatus) -> Result<(), EngineError> {
        match status {
            EngineStatus::Success => Ok(()),
            EngineStatus::NotInitialized => Err(EngineError::NotInitialized),
            EngineStatus::AuthFailed => Err(EngineError::AuthFailed),
            EngineStatus::DeviceUnavailable => Err(EngineError::DeviceUnavailable),
            EngineStatus::Failed => Err(EngineError::Unknown),
        }
    }
}
