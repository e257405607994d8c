//! Camera, microphone and speaker selection.
//!
//! Selection failure is a user-facing condition: it is reported, never
//! retried automatically.

use std::sync::Arc;

use crate::adapter::EngineAdapter;
use crate::engine::DeviceDescriptor;
use crate::errors::{EngineError, SessionError};
use crate::settings::Settings;

pub struct DeviceRegistry {
    adapter: Arc<EngineAdapter>,
}

impl DeviceRegistry {
    pub fn new(adapter: Arc<EngineAdapter>) -> Self {
        Self { adapter }
    }

    pub fn cameras(&self) -> Vec<DeviceDescriptor> {
        self.adapter.camera_list()
    }

    pub fn microphones(&self) -> Vec<DeviceDescriptor> {
        self.adapter.mic_list()
    }

    pub fn speakers(&self) -> Vec<DeviceDescriptor> {
        self.adapter.speaker_list()
    }

    pub fn select_camera(&self, device_id: &str) -> Result<(), SessionError> {
        self.require_engine()?;
        let device = Self::find(self.cameras(), device_id)?;
        if self.adapter.select_camera(&device.id) {
            tracing::info!(id = %device.id, name = %device.name, "camera selected");
            Ok(())
        } else {
            Err(SessionError::DeviceSelectionFailed(device_id.to_string()))
        }
    }

    /// Audio selection also passes the display name, required by the
    /// engine's call signature.
    pub fn select_microphone(&self, device_id: &str) -> Result<(), SessionError> {
        self.require_engine()?;
        let device = Self::find(self.microphones(), device_id)?;
        if self.adapter.select_mic(&device.id, &device.name) {
            tracing::info!(id = %device.id, name = %device.name, "microphone selected");
            Ok(())
        } else {
            Err(SessionError::DeviceSelectionFailed(device_id.to_string()))
        }
    }

    pub fn select_speaker(&self, device_id: &str) -> Result<(), SessionError> {
        self.require_engine()?;
        let device = Self::find(self.speakers(), device_id)?;
        if self.adapter.select_speaker(&device.id, &device.name) {
            tracing::info!(id = %device.id, name = %device.name, "speaker selected");
            Ok(())
        } else {
            Err(SessionError::DeviceSelectionFailed(device_id.to_string()))
        }
    }

    /// Re-apply persisted device choices after authentication. A saved id
    /// that is no longer enumerated is skipped with a warning.
    pub fn apply_saved(&self, settings: &Settings) {
        if let Some(id) = &settings.camera_id {
            if let Err(e) = self.select_camera(id) {
                tracing::warn!(id = %id, error = %e, "saved camera not applied");
            }
        }
        if let Some(id) = &settings.mic_id {
            if let Err(e) = self.select_microphone(id) {
                tracing::warn!(id = %id, error = %e, "saved microphone not applied");
            }
        }
        if let Some(id) = &settings.speaker_id {
            if let Err(e) = self.select_speaker(id) {
                tracing::warn!(id = %id, error = %e, "saved speaker not applied");
            }
        }
    }

    fn require_engine(&self) -> Result<(), SessionError> {
        if self.adapter.is_initialized() {
            Ok(())
        } else {
            Err(SessionError::EngineNotReady(EngineError::NotInitialized))
        }
    }

    fn find(
        devices: Vec<DeviceDescriptor>,
        device_id: &str,
    ) -> Result<DeviceDescriptor, SessionError> {
        devices
            .into_iter()
            .find(|d| d.id == device_id)
            .ok_or_else(|| SessionError::DeviceSelectionFailed(device_id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use crate::engine::{
        ConferenceEngine, EngineConfig, EngineEventSink, EngineStatus, RenderHandle, WindowHandle,
        WindowRegion,
    };

    struct DeviceEngine {
        reject_mic: bool,
        selected: Mutex<Vec<(String, String)>>,
    }

    impl DeviceEngine {
        fn new(reject_mic: bool) -> Self {
            Self {
                reject_mic,
                selected: Mutex::new(Vec::new()),
            }
        }
    }

    impl ConferenceEngine for DeviceEngine {
        fn initialize(&self, _config: &EngineConfig) -> EngineStatus {
            EngineStatus::Success
        }
        fn register_callbacks(&self, _sink: EngineEventSink) {}
        fn authenticate(&self, _key: &str, _secret: &str) -> EngineStatus {
            EngineStatus::Success
        }
        fn join_meeting(&self, _user: &str, _number: u64, _pwd: &str) -> EngineStatus {
            EngineStatus::Success
        }
        fn leave_meeting(&self) -> EngineStatus {
            EngineStatus::Success
        }
        fn cleanup(&self) {}
        fn camera_list(&self) -> Vec<DeviceDescriptor> {
            vec![DeviceDescriptor {
                id: "cam-1".into(),
                name: "Webcam".into(),
            }]
        }
        fn mic_list(&self) -> Vec<DeviceDescriptor> {
            vec![DeviceDescriptor {
                id: "mic-1".into(),
                name: "Headset Microphone".into(),
            }]
        }
        fn speaker_list(&self) -> Vec<DeviceDescriptor> {
            vec![DeviceDescriptor {
                id: "spk-1".into(),
                name: "Speakers".into(),
            }]
        }
        fn select_camera(&self, id: &str) -> bool {
            self.selected.lock().unwrap().push((id.into(), String::new()));
            true
        }
        fn select_mic(&self, id: &str, name: &str) -> bool {
            if self.reject_mic {
                return false;
            }
            self.selected.lock().unwrap().push((id.into(), name.into()));
            true
        }
        fn select_speaker(&self, id: &str, name: &str) -> bool {
            self.selected.lock().unwrap().push((id.into(), name.into()));
            true
        }
        fn create_video_container(&self, _p: WindowHandle, _r: WindowRegion) -> EngineStatus {
            EngineStatus::Success
        }
        fn resize_video_container(&self, _r: WindowRegion) -> EngineStatus {
            EngineStatus::Success
        }
        fn destroy_video_container(&self) {}
        fn create_video_tile(&self) -> Option<RenderHandle> {
            None
        }
        fn subscribe_tile(&self, _t: RenderHandle, _u: u64) -> EngineStatus {
            EngineStatus::Success
        }
        fn unsubscribe_tile(&self, _t: RenderHandle) -> EngineStatus {
            EngineStatus::Success
        }
        fn set_tile_position(&self, _t: RenderHandle, _r: WindowRegion) -> EngineStatus {
            EngineStatus::Success
        }
        fn show_tile(&self, _t: RenderHandle) {}
        fn hide_tile(&self, _t: RenderHandle) {}
        fn destroy_video_tile(&self, _t: RenderHandle) {}
    }

    fn make_registry(reject_mic: bool) -> (Arc<DeviceEngine>, DeviceRegistry) {
        let engine = Arc::new(DeviceEngine::new(reject_mic));
        let adapter = Arc::new(EngineAdapter::new(engine.clone()));
        adapter.initialize(&EngineConfig::default()).unwrap();
        (engine, DeviceRegistry::new(adapter))
    }

    #[test]
    fn select_by_id_passes_name_for_audio() {
        let (engine, registry) = make_registry(false);
        registry.select_microphone("mic-1").unwrap();
        let selected = engine.selected.lock().unwrap();
        assert_eq!(
            selected[0],
            ("mic-1".to_string(), "Headset Microphone".to_string())
        );
    }

    #[test]
    fn unknown_id_is_a_selection_failure() {
        let (_engine, registry) = make_registry(false);
        assert!(matches!(
            registry.select_camera("no-such-device"),
            Err(SessionError::DeviceSelectionFailed(_))
        ));
    }

    #[test]
    fn engine_rejection_is_a_selection_failure() {
        let (_engine, registry) = make_registry(true);
        assert!(matches!(
            registry.select_microphone("mic-1"),
            Err(SessionError::DeviceSelectionFailed(_))
        ));
    }

    #[test]
    fn selection_before_initialization_reports_engine_not_ready() {
        let engine = Arc::new(DeviceEngine::new(false));
        let adapter = Arc::new(EngineAdapter::new(engine));
        let registry = DeviceRegistry::new(adapter);
        assert!(matches!(
            registry.select_camera("cam-1"),
            Err(SessionError::EngineNotReady(_))
        ));
    }

    #[test]
    fn apply_saved_skips_missing_devices() {
        let (engine, registry) = make_registry(false);
        let settings = Settings {
            camera_id: Some("cam-1".into()),
            mic_id: Some("gone".into()),
            speaker_id: Some("spk-1".into()),
            ..Default::default()
        };
        registry.apply_saved(&settings);
        let selected = engine.selected.lock().unwrap();
        assert_eq!(selected.len(), 2);
    }
}
