//! Catalog synchronizer: the shared, point-in-time view of the backend.
//!
//! [`Catalog`] is the one state object the renderer and the controller
//! share. The renderer polls [`Catalog::snapshot`] clones; only the
//! controller mutates, and only after the backend has acknowledged.

use std::collections::HashSet;

use tokio::sync::RwLock;

use vulink_client::{ApiError, LinkApi};
use vulink_core::types::{Image, Link};

/// Point-in-time copy of all links and images known to the backend.
///
/// Valid until the next full reload, which must follow every create,
/// delete, or content update. Only the `enabled` flag is ever patched in
/// place between reloads.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CatalogSnapshot {
    pub links: Vec<Link>,
    pub images: Vec<Image>,
}

/// What the renderer should show for the current snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogStatus {
    /// At least one of the two lists is empty; the renderer shows an
    /// explicit empty-catalog card instead of rendering nothing.
    Empty,
    /// Both lists carry entries.
    Populated,
}

impl CatalogSnapshot {
    pub fn status(&self) -> CatalogStatus {
        if self.links.is_empty() || self.images.is_empty() {
            CatalogStatus::Empty
        } else {
            CatalogStatus::Populated
        }
    }

    /// Look up a link by its file id.
    pub fn link(&self, file: &str) -> Option<&Link> {
        self.links.iter().find(|link| link.file == file)
    }
}

/// Lifecycle position of a single link as seen from the console.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkState {
    /// Never seen in a listing.
    Unknown,
    /// Present in the snapshot. Transitional: the listing carries the
    /// enabled flag, so a listed link resolves immediately to
    /// [`LinkState::Enabled`] or [`LinkState::Disabled`].
    Listed,
    Enabled,
    Disabled,
    /// Retracted from the snapshot after a successful delete. Reported
    /// until a refresh lists the file again.
    Deleted,
}

/// Shared catalog state. Interior `RwLock`; designed to be wrapped in
/// `Arc` and shared between the controller and the renderer.
///
/// The lock is held only for the synchronous apply step of each mutation,
/// never across a network await, so operations on distinct entities stay
/// independent.
#[derive(Debug, Default)]
pub struct Catalog {
    snapshot: RwLock<CatalogSnapshot>,
    /// Files retracted this session. They report [`LinkState::Deleted`]
    /// until the backend lists them again.
    deleted: RwLock<HashSet<String>>,
}

impl Catalog {
    /// Create a new, empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch both lists and replace the snapshot atomically.
    ///
    /// The only way new entities enter the catalog. The two lists are
    /// fetched concurrently; if either fetch fails the previous snapshot
    /// stays in place untouched.
    pub async fn refresh(&self, api: &LinkApi) -> Result<CatalogStatus, ApiError> {
        let (links, images) = tokio::try_join!(api.list_links(), api.list_images())?;

        tracing::debug!(
            links = links.len(),
            images = images.len(),
            "Catalog refreshed"
        );

        {
            let mut deleted = self.deleted.write().await;
            for link in &links {
                deleted.remove(&link.file);
            }
        }

        let mut snapshot = self.snapshot.write().await;
        snapshot.links = links;
        snapshot.images = images;
        Ok(snapshot.status())
    }

    /// Point-in-time clone for the renderer.
    pub async fn snapshot(&self) -> CatalogSnapshot {
        self.snapshot.read().await.clone()
    }

    /// Fast-path flip of one link's enabled flag, applied in place without
    /// a reload. Returns `false` when the link is not in the snapshot.
    pub async fn set_enabled(&self, file: &str, enabled: bool) -> bool {
        let mut snapshot = self.snapshot.write().await;
        match snapshot.links.iter_mut().find(|link| link.file == file) {
            Some(link) => {
                link.enabled = enabled;
                true
            }
            None => false,
        }
    }

    /// Retract exactly one link by file id, leaving all others unchanged.
    pub async fn remove_link(&self, file: &str) -> bool {
        let mut snapshot = self.snapshot.write().await;
        let before = snapshot.links.len();
        snapshot.links.retain(|link| link.file != file);
        let removed = snapshot.links.len() < before;
        drop(snapshot);

        if removed {
            self.deleted.write().await.insert(file.to_string());
        }
        removed
    }

    /// Retract exactly one image by file id.
    pub async fn remove_image(&self, file: &str) -> bool {
        let mut snapshot = self.snapshot.write().await;
        let before = snapshot.images.len();
        snapshot.images.retain(|image| image.file != file);
        snapshot.images.len() < before
    }

    /// Derive the lifecycle state of one link.
    pub async fn link_state(&self, file: &str) -> LinkState {
        if self.deleted.read().await.contains(file) {
            return LinkState::Deleted;
        }

        match self.snapshot.read().await.link(file) {
            Some(link) if link.enabled => LinkState::Enabled,
            Some(_) => LinkState::Disabled,
            None => LinkState::Unknown,
        }
    }
}
