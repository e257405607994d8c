//! Session lifecycle state machine.
//!
//! Turns the engine's one-shot callbacks into awaitable, timeout-bounded
//! operations. The engine gives no client-visible guarantee that every
//! request produces a callback (network loss, revoked credentials, a host
//! that never starts the meeting), so liveness comes from this layer, not
//! from the engine.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::sync::mpsc;

use crate::adapter::EngineAdapter;
use crate::credentials::CredentialsProvider;
use crate::devices::DeviceRegistry;
use crate::engine::{EngineConfig, EngineEvent, MeetingStatus};
use crate::errors::SessionError;
use crate::events::{EventEmitter, SessionEvent, SessionEventListener, SessionStatus};
use crate::pending::PendingOp;
use crate::settings::Settings;
use crate::tiles::TileManager;

/// Liveness bounds for the awaited operations. Authentication answers fast
/// or not at all; a join legitimately waits on the remote host starting the
/// meeting.
#[derive(Debug, Clone, Copy)]
pub struct SessionTimeouts {
    pub auth: Duration,
    pub join: Duration,
}

impl Default for SessionTimeouts {
    fn default() -> Self {
        Self {
            auth: Duration::from_secs(10),
            join: Duration::from_secs(60),
        }
    }
}

/// Drives exactly one meeting session per process.
pub struct SessionManager {
    adapter: Arc<EngineAdapter>,
    emitter: EventEmitter,
    status: Arc<Mutex<SessionStatus>>,
    tiles: Arc<Mutex<TileManager>>,
    pending_auth: Arc<PendingOp>,
    pending_join: Arc<PendingOp>,
    credentials: Arc<dyn CredentialsProvider>,
    config: EngineConfig,
    timeouts: SessionTimeouts,
    saved_devices: Option<Settings>,
}

impl SessionManager {
    pub fn new(
        adapter: Arc<EngineAdapter>,
        tiles: Arc<Mutex<TileManager>>,
        credentials: Arc<dyn CredentialsProvider>,
    ) -> Self {
        Self {
            adapter,
            emitter: EventEmitter::new(),
            status: Arc::new(Mutex::new(SessionStatus::Uninitialized)),
            tiles,
            pending_auth: Arc::new(PendingOp::new("auth")),
            pending_join: Arc::new(PendingOp::new("join")),
            credentials,
            config: EngineConfig::default(),
            timeouts: SessionTimeouts::default(),
            saved_devices: None,
        }
    }

    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_timeouts(mut self, timeouts: SessionTimeouts) -> Self {
        self.timeouts = timeouts;
        self
    }

    /// Persisted device choices to re-apply once authenticated.
    pub fn with_saved_devices(mut self, settings: Settings) -> Self {
        self.saved_devices = Some(settings);
        self
    }

    /// Register a listener for session events.
    pub fn add_listener(&self, listener: Arc<dyn SessionEventListener>) {
        self.emitter.add_listener(listener);
    }

    pub async fn status(&self) -> SessionStatus {
        *self.status.lock().await
    }

    /// Initialize the engine and authenticate. Resolves `true` once the
    /// session is ready to join meetings, `false` on engine failure,
    /// negative auth callback, or timeout.
    pub async fn initialize(&self) -> Result<bool, SessionError> {
        let current = self.status().await;
        if !matches!(
            current,
            SessionStatus::Uninitialized | SessionStatus::Failed | SessionStatus::Ended
        ) {
            return Err(SessionError::InvalidState {
                op: "initialize",
                status: current,
            });
        }

        self.set_status(SessionStatus::Initializing).await;
        let events = self.adapter.subscribe();
        if let Err(e) = self.adapter.initialize(&self.config) {
            tracing::error!(error = %e, "engine initialization failed");
            return Ok(self.finish_initialization(false).await);
        }
        self.spawn_event_loop(events);

        self.set_status(SessionStatus::Authenticating).await;
        let rx = self.pending_auth.arm()?;
        let key = self.credentials.app_key();
        let secret = self.credentials.app_secret();
        if let Err(e) = self.adapter.authenticate(&key, &secret) {
            self.pending_auth.cancel();
            tracing::error!(error = %e, "authentication request failed");
            return Ok(self.finish_initialization(false).await);
        }

        let ok = self.pending_auth.wait(rx, self.timeouts.auth).await;
        if ok {
            if let Some(saved) = &self.saved_devices {
                DeviceRegistry::new(self.adapter.clone()).apply_saved(saved);
            }
        }
        Ok(self.finish_initialization(ok).await)
    }

    /// Join a meeting. Resolves `true` when the engine reports in-meeting,
    /// `false` on failure status or timeout.
    pub async fn join(
        &self,
        user_name: &str,
        meeting_number: u64,
        password: &str,
    ) -> Result<bool, SessionError> {
        let current = self.status().await;
        if current != SessionStatus::Ready {
            return Err(SessionError::InvalidState {
                op: "join",
                status: current,
            });
        }

        self.set_status(SessionStatus::Joining).await;
        let rx = self.pending_join.arm()?;
        if let Err(e) = self.adapter.join_meeting(user_name, meeting_number, password) {
            self.pending_join.cancel();
            tracing::error!(error = %e, "join request failed");
            self.set_status(SessionStatus::Failed).await;
            return Ok(false);
        }

        let ok = self.pending_join.wait(rx, self.timeouts.join).await;
        // The event loop may already have driven the status elsewhere
        // (spontaneous disconnect); only transition from Joining.
        if self.status().await == SessionStatus::Joining {
            self.set_status(if ok {
                SessionStatus::InMeeting
            } else {
                SessionStatus::Failed
            })
            .await;
        }
        Ok(ok)
    }

    /// Leave the current meeting, releasing every tile and the container.
    pub async fn leave(&self) {
        let current = self.status().await;
        if !matches!(current, SessionStatus::Joining | SessionStatus::InMeeting) {
            tracing::debug!(status = %current, "leave requested outside a meeting, ignoring");
            return;
        }
        self.set_status(SessionStatus::Disconnecting).await;
        self.pending_join.cancel();
        self.tiles.lock().await.teardown();
        self.adapter.leave_meeting();
        self.set_status(SessionStatus::Ended).await;
    }

    /// Leave any active meeting and shut the engine down.
    pub async fn cleanup(&self) {
        self.leave().await;
        self.adapter.cleanup();
        self.set_status(SessionStatus::Uninitialized).await;
    }

    async fn finish_initialization(&self, ok: bool) -> bool {
        // Transition only if nothing else moved the status meanwhile.
        let current = self.status().await;
        if matches!(
            current,
            SessionStatus::Initializing | SessionStatus::Authenticating
        ) {
            self.set_status(if ok {
                SessionStatus::Ready
            } else {
                SessionStatus::Failed
            })
            .await;
        }
        self.emitter.emit(SessionEvent::InitializedChanged(ok));
        ok
    }

    async fn set_status(&self, next: SessionStatus) {
        store_status(&self.status, &self.emitter, next).await;
    }

    fn spawn_event_loop(&self, events: mpsc::UnboundedReceiver<EngineEvent>) {
        let adapter = self.adapter.clone();
        let emitter = self.emitter.clone();
        let status = self.status.clone();
        let tiles = self.tiles.clone();
        let pending_auth = self.pending_auth.clone();
        let pending_join = self.pending_join.clone();

        tokio::spawn(async move {
            Self::event_loop(
                events,
                adapter,
                emitter,
                status,
                tiles,
                pending_auth,
                pending_join,
            )
            .await;
        });
    }

    async fn event_loop(
        mut events: mpsc::UnboundedReceiver<EngineEvent>,
        adapter: Arc<EngineAdapter>,
        emitter: EventEmitter,
        status: Arc<Mutex<SessionStatus>>,
        tiles: Arc<Mutex<TileManager>>,
        pending_auth: Arc<PendingOp>,
        pending_join: Arc<PendingOp>,
    ) {
        while let Some(event) = events.recv().await {
            match event {
                EngineEvent::AuthReturn(ok) => {
                    if !pending_auth.resolve(ok) {
                        tracing::warn!(ok, "late auth callback ignored");
                    }
                }

                EngineEvent::MeetingStatus(MeetingStatus::Connecting) => {
                    let mut tm = tiles.lock().await;
                    if let Err(e) = tm.prepare_container() {
                        tracing::warn!(error = %e, "video container creation failed");
                    }
                }

                EngineEvent::MeetingStatus(MeetingStatus::InMeeting) => {
                    if !pending_join.resolve(true) {
                        tracing::warn!("late in-meeting callback ignored");
                    }
                }

                EngineEvent::MeetingStatus(MeetingStatus::Failed) => {
                    if !pending_join.resolve(false) {
                        tracing::warn!("late join-failure callback ignored");
                    }
                }

                EngineEvent::MeetingStatus(MeetingStatus::Disconnecting) => {
                    tracing::info!("engine reported disconnect, leaving meeting");
                    // An engine-initiated leave converges on the same
                    // cleanup path as a caller-initiated one.
                    pending_join.resolve(false);
                    store_status(&status, &emitter, SessionStatus::Disconnecting).await;
                    tiles.lock().await.teardown();
                    adapter.leave_meeting();
                    store_status(&status, &emitter, SessionStatus::Ended).await;
                }

                EngineEvent::MeetingStatus(MeetingStatus::Ended) => {
                    tracing::debug!("engine reported meeting ended");
                }

                EngineEvent::ParticipantsJoined(batch) => {
                    tiles.lock().await.add_participants(&batch);
                    for info in batch {
                        emitter.emit(SessionEvent::ParticipantJoined(info));
                    }
                }

                EngineEvent::ParticipantsLeft(ids) => {
                    tiles.lock().await.remove_participants(&ids);
                    for id in ids {
                        emitter.emit(SessionEvent::ParticipantLeft(id));
                    }
                }
            }
        }
        tracing::info!("engine event loop ended");
    }
}

async fn store_status(
    status: &Arc<Mutex<SessionStatus>>,
    emitter: &EventEmitter,
    next: SessionStatus,
) {
    *status.lock().await = next;
    tracing::info!(status = %next, "session status");
    emitter.emit(SessionEvent::StatusChanged(next));
}
