//! Bridge between the UI shell's window and the tile manager.

use std::sync::Arc;

use tokio::sync::Mutex;

use crate::engine::{WindowHandle, WindowRegion};
use crate::tiles::TileManager;

/// Receives window-handle-ready and region-changed notifications from the
/// shell and replicates them into the tile manager.
pub struct HostBridge {
    tiles: Arc<Mutex<TileManager>>,
    last_region: Mutex<Option<WindowRegion>>,
}

impl HostBridge {
    pub fn new(tiles: Arc<Mutex<TileManager>>) -> Self {
        Self {
            tiles,
            last_region: Mutex::new(None),
        }
    }

    /// Store the native window handle; it is used at video-container
    /// creation time.
    pub async fn set_window_handle(&self, handle: WindowHandle) {
        tracing::debug!(handle = handle.0, "window handle ready");
        self.tiles.lock().await.set_parent(handle);
    }

    /// Forward a region change, skipping relayout when the geometry is
    /// unchanged. Resize-event floods are common, and each forwarded change
    /// costs engine calls.
    pub async fn set_video_region(&self, region: WindowRegion) {
        let mut last = self.last_region.lock().await;
        if *last == Some(region) {
            return;
        }
        *last = Some(region);
        drop(last);
        tracing::debug!(?region, "video region changed");
        self.tiles.lock().await.set_region(region);
    }
}
