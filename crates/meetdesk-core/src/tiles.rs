//! Per-participant video tiles and their grid layout.
//!
//! The manager exclusively owns every live render handle. A handle is
//! released exactly once: on the participant-left callback, or on bulk
//! teardown when leaving the meeting.

use std::sync::Arc;

use crate::adapter::EngineAdapter;
use crate::engine::{ParticipantInfo, RenderHandle, WindowHandle, WindowRegion};
use crate::errors::EngineError;

/// One participant's rendering surface.
#[derive(Debug, Clone, Copy)]
pub struct VideoTile {
    pub user_id: u64,
    pub handle: RenderHandle,
}

pub struct TileManager {
    adapter: Arc<EngineAdapter>,
    tiles: Vec<VideoTile>,
    has_container: bool,
    region: WindowRegion,
    parent: Option<WindowHandle>,
}

impl TileManager {
    pub fn new(adapter: Arc<EngineAdapter>) -> Self {
        Self {
            adapter,
            tiles: Vec::new(),
            has_container: false,
            region: WindowRegion::default(),
            parent: None,
        }
    }

    pub fn set_parent(&mut self, handle: WindowHandle) {
        self.parent = Some(handle);
    }

    /// Replicate a window-region change and relayout the live tiles.
    pub fn set_region(&mut self, region: WindowRegion) {
        self.region = region;
        if self.has_container {
            if let Err(e) = self.adapter.resize_video_container(region) {
                tracing::warn!(error = %e, "video container resize failed");
            }
            self.relayout();
        }
    }

    pub fn region(&self) -> WindowRegion {
        self.region
    }

    /// Create a fresh video container for a meeting that is connecting,
    /// destroying any stale one first.
    pub fn prepare_container(&mut self) -> Result<(), EngineError> {
        if self.has_container {
            self.teardown();
        }
        let parent = self.parent.ok_or(EngineError::NotInitialized)?;
        self.adapter.create_video_container(parent, self.region)?;
        self.has_container = true;
        Ok(())
    }

    /// Handle a batch of participant-join callbacks.
    pub fn add_participants(&mut self, batch: &[ParticipantInfo]) {
        for info in batch {
            tracing::info!(
                user_id = info.user_id,
                name = %info.name,
                is_self = info.is_self,
                "participant joined"
            );
            let handle = match self.adapter.create_video_tile() {
                Ok(handle) => handle,
                Err(e) => {
                    tracing::warn!(user_id = info.user_id, error = %e, "video tile creation failed");
                    continue;
                }
            };
            if let Err(e) = self.adapter.subscribe_tile(handle, info.user_id) {
                tracing::warn!(user_id = info.user_id, error = %e, "tile subscription failed");
                self.adapter.destroy_video_tile(handle);
                continue;
            }
            self.adapter.show_tile(handle);
            self.tiles.push(VideoTile {
                user_id: info.user_id,
                handle,
            });
        }
        self.relayout();
    }

    /// Handle a batch of participant-left callbacks. Every matching handle
    /// is unsubscribed, hidden, and destroyed before removal.
    pub fn remove_participants(&mut self, user_ids: &[u64]) {
        let adapter = self.adapter.clone();
        self.tiles.retain(|tile| {
            if user_ids.contains(&tile.user_id) {
                tracing::info!(user_id = tile.user_id, "participant left, releasing tile");
                Self::release(&adapter, tile);
                false
            } else {
                true
            }
        });
        self.relayout();
    }

    /// Reposition every tile according to the grid layout.
    pub fn relayout(&mut self) {
        for (i, tile) in self.tiles.iter().enumerate() {
            let rect = tile_rect(i, self.region);
            if let Err(e) = self.adapter.set_tile_position(tile.handle, rect) {
                tracing::warn!(user_id = tile.user_id, error = %e, "tile positioning failed");
            }
        }
    }

    /// Release all tiles and destroy the video container.
    pub fn teardown(&mut self) {
        let adapter = self.adapter.clone();
        for tile in self.tiles.drain(..) {
            Self::release(&adapter, &tile);
        }
        if self.has_container {
            self.adapter.destroy_video_container();
            self.has_container = false;
        }
    }

    pub fn tiles(&self) -> &[VideoTile] {
        &self.tiles
    }

    pub fn tile_count(&self) -> usize {
        self.tiles.len()
    }

    pub fn has_container(&self) -> bool {
        self.has_container
    }

    fn release(adapter: &EngineAdapter, tile: &VideoTile) {
        if let Err(e) = adapter.unsubscribe_tile(tile.handle) {
            tracing::warn!(user_id = tile.user_id, error = %e, "tile unsubscribe failed");
        }
        adapter.hide_tile(tile.handle);
        adapter.destroy_video_tile(tile.handle);
    }
}

/// Fixed 2-column grid: tile `i` occupies column `i % 2`, row `i / 2`, with
/// half-width, half-height cells. Deterministic by index and container size.
pub fn tile_rect(index: usize, region: WindowRegion) -> WindowRegion {
    let col = (index % 2) as i32;
    let row = (index / 2) as i32;
    let w = region.width() / 2;
    let h = region.height() / 2;
    WindowRegion {
        left: col * w,
        top: row * h,
        right: (col + 1) * w,
        bottom: (row + 1) * h,
    }
}
