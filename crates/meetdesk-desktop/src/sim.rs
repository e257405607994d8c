//! In-process engine simulator for headless smoke runs.
//!
//! Delivers scripted callbacks from its own threads, the way the real SDK
//! does. Packaging against the vendor SDK replaces this with a real
//! [`ConferenceEngine`] implementation.

use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::thread;
use std::time::Duration;

use meetdesk_core::{
    ConferenceEngine, DeviceDescriptor, EngineConfig, EngineEvent, EngineEventSink, EngineStatus,
    MeetingStatus, ParticipantInfo, RenderHandle, WindowHandle, WindowRegion,
};

pub struct SimulatedEngine {
    sink: Mutex<Option<EngineEventSink>>,
    next_handle: AtomicU64,
}

impl SimulatedEngine {
    pub fn new() -> Self {
        Self {
            sink: Mutex::new(None),
            next_handle: AtomicU64::new(1),
        }
    }

    fn sink(&self) -> Option<EngineEventSink> {
        self.sink.lock().unwrap().clone()
    }
}

impl Default for SimulatedEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl ConferenceEngine for SimulatedEngine {
    fn initialize(&self, config: &EngineConfig) -> EngineStatus {
        tracing::debug!(domain = %config.web_domain, custom_ui = config.custom_ui, "simulated init");
        EngineStatus::Success
    }

    fn register_callbacks(&self, sink: EngineEventSink) {
        *self.sink.lock().unwrap() = Some(sink);
    }

    fn authenticate(&self, _app_key: &str, _app_secret: &str) -> EngineStatus {
        if let Some(sink) = self.sink() {
            thread::spawn(move || {
                thread::sleep(Duration::from_millis(200));
                let _ = sink.send(EngineEvent::AuthReturn(true));
            });
        }
        EngineStatus::Success
    }

    fn join_meeting(&self, user_name: &str, meeting_number: u64, _password: &str) -> EngineStatus {
        let user_name = user_name.to_string();
        if let Some(sink) = self.sink() {
            thread::spawn(move || {
                thread::sleep(Duration::from_millis(100));
                let _ = sink.send(EngineEvent::MeetingStatus(MeetingStatus::Connecting));
                thread::sleep(Duration::from_millis(300));
                let _ = sink.send(EngineEvent::ParticipantsJoined(vec![
                    ParticipantInfo {
                        user_id: 1,
                        name: user_name,
                        is_self: true,
                    },
                    ParticipantInfo {
                        user_id: 2,
                        name: format!("host-of-{meeting_number}"),
                        is_self: false,
                    },
                ]));
                let _ = sink.send(EngineEvent::MeetingStatus(MeetingStatus::InMeeting));
            });
        }
        EngineStatus::Success
    }

    fn leave_meeting(&self) -> EngineStatus {
        if let Some(sink) = self.sink() {
            let _ = sink.send(EngineEvent::MeetingStatus(MeetingStatus::Ended));
        }
        EngineStatus::Success
    }

    fn cleanup(&self) {
        self.sink.lock().unwrap().take();
    }

    fn camera_list(&self) -> Vec<DeviceDescriptor> {
        vec![DeviceDescriptor {
            id: "sim-cam-0".into(),
            name: "Simulated Camera".into(),
        }]
    }

    fn mic_list(&self) -> Vec<DeviceDescriptor> {
        vec![DeviceDescriptor {
            id: "sim-mic-0".into(),
            name: "Simulated Microphone".into(),
        }]
    }

    fn speaker_list(&self) -> Vec<DeviceDescriptor> {
        vec![DeviceDescriptor {
            id: "sim-spk-0".into(),
            name: "Simulated Speakers".into(),
        }]
    }

    fn select_camera(&self, device_id: &str) -> bool {
        device_id == "sim-cam-0"
    }

    fn select_mic(&self, device_id: &str, _device_name: &str) -> bool {
        device_id == "sim-mic-0"
    }

    fn select_speaker(&self, device_id: &str, _device_name: &str) -> bool {
        device_id == "sim-spk-0"
    }

    fn create_video_container(&self, parent: WindowHandle, region: WindowRegion) -> EngineStatus {
        tracing::debug!(parent = parent.0, ?region, "simulated container created");
        EngineStatus::Success
    }

    fn resize_video_container(&self, region: WindowRegion) -> EngineStatus {
        tracing::debug!(?region, "simulated container resized");
        EngineStatus::Success
    }

    fn destroy_video_container(&self) {
        tracing::debug!("simulated container destroyed");
    }

    fn create_video_tile(&self) -> Option<RenderHandle> {
        Some(RenderHandle(self.next_handle.fetch_add(1, Ordering::SeqCst)))
    }

    fn subscribe_tile(&self, tile: RenderHandle, user_id: u64) -> EngineStatus {
        tracing::debug!(tile = tile.0, user_id, "simulated tile subscribed");
        EngineStatus::Success
    }

    fn unsubscribe_tile(&self, tile: RenderHandle) -> EngineStatus {
        tracing::debug!(tile = tile.0, "simulated tile unsubscribed");
        EngineStatus::Success
    }

    fn set_tile_position(&self, tile: RenderHandle, rect: WindowRegion) -> EngineStatus {
        tracing::debug!(tile = tile.0, ?rect, "simulated tile positioned");
        EngineStatus::Success
    }

    fn show_tile(&self, _tile: RenderHandle) {}

    fn hide_tile(&self, _tile: RenderHandle) {}

    fn destroy_video_tile(&self, tile: RenderHandle) {
        tracing::debug!(tile = tile.0, "simulated tile destroyed");
    }
}
