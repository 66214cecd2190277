//! Lifecycle controller: carries one user intent end to end.
//!
//! Each entry point validates its input, calls the backend through
//! [`LinkApi`], and applies the result to the shared [`Catalog`] — only
//! after the backend acknowledged. On any failure the snapshot is left
//! exactly as it was and the failure is logged, so a caller can always
//! tell a failed mutation from a successful one by the returned variant.

use std::sync::Arc;

use vulink_client::{ApiError, LinkApi};
use vulink_core::validate::{self, ValidationError, CREATE_CONTENT_MIN_LEN, NAME_MIN_LEN};

use crate::catalog::{Catalog, CatalogStatus};

/// A user intent raised by the (out-of-scope) renderer.
#[derive(Debug, Clone, PartialEq)]
pub enum Intent {
    CreateLink { name: String, content: String },
    UpdateLink { file: String, content: String },
    ToggleLink { file: String, enabled: bool },
    DeleteLink { file: String, confirm: Confirmation },
    DeleteImage { file: String, confirm: Confirmation },
    UploadImage { name: String, bytes: Vec<u8> },
    ReloadLinks,
}

/// Explicit yes/no gate for destructive intents. The renderer collects it
/// from the user before the intent is handled; a denied gate issues no
/// network call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confirmation {
    Granted,
    Denied,
}

/// What happened to a successfully handled intent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Structural mutation applied; the snapshot has been fully reloaded.
    Refreshed(CatalogStatus),
    /// Fast path: one enabled flag flipped in place, no reload.
    Toggled { enabled: bool },
    /// The user declined the confirmation gate; nothing was sent.
    Cancelled,
}

/// Failure taxonomy for console operations. All three classes are
/// recovered here; none propagate as a panic.
#[derive(Debug, thiserror::Error)]
pub enum ConsoleError {
    /// Field-scoped local rejection; never reaches the network.
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// The backend answered with a non-`ok` envelope.
    #[error("backend rejected request (status `{status}`)")]
    Backend {
        status: String,
        message: Option<String>,
    },

    /// Network, timeout, or malformed-response failure. Schema mismatches
    /// fail closed into this class.
    #[error("transport failure: {0}")]
    Transport(String),
}

impl From<ApiError> for ConsoleError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::Rejected { status, message } => Self::Backend { status, message },
            ApiError::InvalidName(e) => Self::Validation(e),
            ApiError::Transport(e) => Self::Transport(e.to_string()),
            ApiError::Decode(e) => Self::Transport(e.to_string()),
        }
    }
}

/// Administers the link catalog: validates input, drives the backend, and
/// keeps the shared snapshot in sync.
///
/// Entry points take `&self`, so nothing stops two in-flight mutations on
/// the same entity; the last response to resolve overwrites local state
/// unconditionally. See DESIGN.md for why no sequence check is applied.
pub struct LinkConsole {
    api: LinkApi,
    catalog: Arc<Catalog>,
}

impl LinkConsole {
    /// Create a console with a fresh, empty catalog.
    pub fn new(api: LinkApi) -> Self {
        Self::with_catalog(api, Arc::new(Catalog::new()))
    }

    /// Create a console around an injected catalog, e.g. one already
    /// shared with a renderer.
    pub fn with_catalog(api: LinkApi, catalog: Arc<Catalog>) -> Self {
        Self { api, catalog }
    }

    /// Shared catalog handle for the renderer.
    pub fn catalog(&self) -> Arc<Catalog> {
        Arc::clone(&self.catalog)
    }

    /// Dispatch one intent to its entry point.
    pub async fn handle(&self, intent: Intent) -> Result<Outcome, ConsoleError> {
        match intent {
            Intent::CreateLink { name, content } => self.create_link(&name, &content).await,
            Intent::UpdateLink { file, content } => self.update_link(&file, &content).await,
            Intent::ToggleLink { file, enabled } => self.set_link_enabled(&file, enabled).await,
            Intent::DeleteLink { file, confirm } => self.delete_link(&file, confirm).await,
            Intent::DeleteImage { file, confirm } => self.delete_image(&file, confirm).await,
            Intent::UploadImage { name, bytes } => self.upload_image(&name, bytes).await,
            Intent::ReloadLinks => self.reload_links().await,
        }
    }

    /// Full reload of the snapshot from the backend.
    pub async fn refresh(&self) -> Result<CatalogStatus, ConsoleError> {
        self.catalog
            .refresh(&self.api)
            .await
            .map_err(|e| Self::report("refresh", e))
    }

    /// Create a new link definition.
    ///
    /// Both name and content must validate before anything is sent. The
    /// content minimum applies to creation only.
    pub async fn create_link(&self, name: &str, content: &str) -> Result<Outcome, ConsoleError> {
        validate::validate_name(name, NAME_MIN_LEN, true)
            .map_err(|e| Self::reject("create link", e))?;
        validate::validate_content(content, CREATE_CONTENT_MIN_LEN)
            .map_err(|e| Self::reject("create link", e))?;

        self.api
            .write_link(name, content)
            .await
            .map_err(|e| Self::report("create link", e))?;

        tracing::info!(file = name, "Link created");
        self.refreshed().await
    }

    /// Overwrite an existing link definition.
    ///
    /// Content length is enforced on creation only; an update may shrink a
    /// definition below the create minimum.
    pub async fn update_link(&self, file: &str, content: &str) -> Result<Outcome, ConsoleError> {
        validate::validate_name(file, NAME_MIN_LEN, true)
            .map_err(|e| Self::reject("update link", e))?;

        self.api
            .update_link(file, content)
            .await
            .map_err(|e| Self::report("update link", e))?;

        tracing::info!(file, "Link updated");
        self.refreshed().await
    }

    /// Flip one link's enabled flag. No validation: flag-only mutation.
    ///
    /// The local flag flips only after the backend acknowledged, and it is
    /// applied unconditionally: a slower earlier request that resolves
    /// later overwrites this one (last response wins).
    pub async fn set_link_enabled(
        &self,
        file: &str,
        enabled: bool,
    ) -> Result<Outcome, ConsoleError> {
        self.api
            .set_link_enabled(file, enabled)
            .await
            .map_err(|e| Self::report("toggle link", e))?;

        self.catalog.set_enabled(file, enabled).await;
        tracing::info!(file, enabled, "Link toggled");
        Ok(Outcome::Toggled { enabled })
    }

    /// Delete one link definition. Irreversible once issued.
    pub async fn delete_link(
        &self,
        file: &str,
        confirm: Confirmation,
    ) -> Result<Outcome, ConsoleError> {
        if confirm == Confirmation::Denied {
            tracing::debug!(file, "Link delete cancelled at the confirmation gate");
            return Ok(Outcome::Cancelled);
        }

        self.api
            .delete_link(file)
            .await
            .map_err(|e| Self::report("delete link", e))?;

        self.catalog.remove_link(file).await;
        tracing::info!(file, "Link deleted");
        self.refreshed().await
    }

    /// Delete one uploaded image. Irreversible once issued.
    pub async fn delete_image(
        &self,
        file: &str,
        confirm: Confirmation,
    ) -> Result<Outcome, ConsoleError> {
        if confirm == Confirmation::Denied {
            tracing::debug!(file, "Image delete cancelled at the confirmation gate");
            return Ok(Outcome::Cancelled);
        }

        self.api
            .delete_image(file)
            .await
            .map_err(|e| Self::report("delete image", e))?;

        self.catalog.remove_image(file).await;
        tracing::info!(file, "Image deleted");
        self.refreshed().await
    }

    /// Upload a PNG image. The name must validate before any bytes move.
    pub async fn upload_image(&self, name: &str, bytes: Vec<u8>) -> Result<Outcome, ConsoleError> {
        validate::validate_name(name, NAME_MIN_LEN, false)
            .map_err(|e| Self::reject("upload image", e))?;

        self.api
            .upload_image(name, bytes)
            .await
            .map_err(|e| Self::report("upload image", e))?;

        tracing::info!(name, "Image uploaded");
        self.refreshed().await
    }

    /// Ask the backend to re-scan its link definitions, then reload.
    pub async fn reload_links(&self) -> Result<Outcome, ConsoleError> {
        self.api
            .reload_links()
            .await
            .map_err(|e| Self::report("reload links", e))?;

        tracing::info!("Backend link rescan requested");
        self.refreshed().await
    }

    /// Read the raw textual definition of one link, e.g. to feed an edit
    /// form. `structured` selects the configuration-language form.
    pub async fn read_link_content(
        &self,
        file: &str,
        structured: bool,
    ) -> Result<String, ConsoleError> {
        self.api
            .read_link_content(file, structured)
            .await
            .map_err(|e| Self::report("read link", e))
    }

    // ---- private helpers ----

    /// Reload after a structural mutation and wrap the result.
    async fn refreshed(&self) -> Result<Outcome, ConsoleError> {
        Ok(Outcome::Refreshed(self.refresh().await?))
    }

    /// Record a field-scoped rejection. The action is blocked before any
    /// network traffic.
    fn reject(op: &'static str, err: ValidationError) -> ConsoleError {
        tracing::warn!(op, field = ?err.field(), error = %err, "Input rejected");
        ConsoleError::Validation(err)
    }

    /// Convert a wire failure into the console taxonomy and report it.
    fn report(op: &'static str, err: ApiError) -> ConsoleError {
        let err = ConsoleError::from(err);
        tracing::error!(op, error = %err, "Backend call failed");
        err
    }
}
