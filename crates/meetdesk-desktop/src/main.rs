//! Headless desktop shell.
//!
//! Wires the session core against the simulated engine and runs one full
//! meeting lifecycle. A real deployment swaps [`sim::SimulatedEngine`] for
//! the vendor SDK binding and feeds real window handles and geometry from
//! the UI toolkit.

mod sim;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;

use meetdesk_core::{
    EngineAdapter, HostBridge, SessionEvent, SessionEventListener, SessionManager, SettingsStore,
    StaticCredentials, TileManager, WindowHandle, WindowRegion,
};

struct ConsoleListener;

impl SessionEventListener for ConsoleListener {
    fn on_event(&self, event: SessionEvent) {
        match event {
            SessionEvent::StatusChanged(status) => tracing::info!(%status, "status changed"),
            SessionEvent::InitializedChanged(ok) => tracing::info!(ok, "initialized changed"),
            SessionEvent::ParticipantJoined(info) => {
                tracing::info!(user_id = info.user_id, name = %info.name, is_self = info.is_self, "joined")
            }
            SessionEvent::ParticipantLeft(user_id) => tracing::info!(user_id, "left"),
        }
    }
}

fn data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("meetdesk")
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let dir = data_dir();
    let settings = SettingsStore::new(dir.to_str().unwrap_or("."));

    let app_key = std::env::var("MEETDESK_APP_KEY").unwrap_or_else(|_| "demo-key".into());
    let app_secret = std::env::var("MEETDESK_APP_SECRET").unwrap_or_else(|_| "demo-secret".into());

    let engine = Arc::new(sim::SimulatedEngine::new());
    let adapter = Arc::new(EngineAdapter::new(engine));
    let tiles = Arc::new(Mutex::new(TileManager::new(adapter.clone())));
    let bridge = HostBridge::new(tiles.clone());
    let session = SessionManager::new(
        adapter,
        tiles,
        Arc::new(StaticCredentials::new(app_key, app_secret)),
    )
    .with_saved_devices(settings.get());
    session.add_listener(Arc::new(ConsoleListener));

    // Stand-in for the UI shell's window-loaded and size-changed events.
    bridge.set_window_handle(WindowHandle(0x1)).await;
    bridge
        .set_video_region(WindowRegion::new(0, 0, 1280, 720))
        .await;

    match session.initialize().await {
        Ok(true) => {}
        Ok(false) => {
            tracing::error!("initialization failed");
            return;
        }
        Err(e) => {
            tracing::error!(error = %e, "initialization rejected");
            return;
        }
    }

    let user = settings
        .get()
        .display_name
        .unwrap_or_else(|| "meetdesk".to_string());
    match session.join(&user, 123_456_789, "").await {
        Ok(true) => tracing::info!("in meeting"),
        Ok(false) => {
            tracing::error!("join failed");
            return;
        }
        Err(e) => {
            tracing::error!(error = %e, "join rejected");
            return;
        }
    }

    // Simulate a window resize mid-meeting.
    bridge
        .set_video_region(WindowRegion::new(0, 0, 1024, 576))
        .await;

    tokio::time::sleep(Duration::from_secs(2)).await;
    session.leave().await;
    session.cleanup().await;
}
