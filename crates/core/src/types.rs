//! Entity records exchanged with the apilink backend.
//!
//! The backend sends links as nested `{info, api}` documents; this module
//! decodes them through explicit wire structs and flattens them into the
//! [`Link`] view record consumed by the console. Decoding fails closed: a
//! document missing a required field is a decode error, never a partially
//! populated record.

use serde::{Deserialize, Serialize};

/// A named integration definition with an enabled flag, display metadata,
/// and a refresh period.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Link {
    /// Unique identifier and filename. Immutable for the entity's lifetime
    /// and the sole join key to [`Image::file`].
    pub file: String,
    /// Display name.
    pub name: String,
    /// Free-text description.
    pub description: String,
    /// Reference to an [`Image`] by file id. Absent when the link has no
    /// image assigned.
    pub image: Option<String>,
    /// Whether the backend refreshes this link.
    pub enabled: bool,
    /// Seconds between backend refresh cycles. Read-only in the console.
    pub update_period: u64,
    /// Ordered transformation chain applied to fetched values. Display-only.
    pub value_modifiers: Vec<ValueModifier>,
}

/// A named transformation applied to a link's fetched data. Opaque to the
/// console beyond its function name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValueModifier {
    /// Name of the modifier function. The backend serialises this under the
    /// short key `fn`; older link definitions spell it out as `function`.
    #[serde(rename = "fn", alias = "function")]
    pub function: String,
}

/// A named uploaded asset referenced by links for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Image {
    /// Unique identifier and filename.
    pub file: String,
    /// Display name.
    pub name: String,
    /// Whether the image is available for assignment.
    pub enabled: bool,
}

impl Image {
    /// Build an image record from the bare filename the list endpoint
    /// returns. The wire carries no display name or enabled flag, so the
    /// name mirrors the file id and the image is considered enabled.
    pub fn from_file(file: String) -> Self {
        Self {
            name: file.clone(),
            file,
            enabled: true,
        }
    }
}

// ---------------------------------------------------------------------------
// Wire records
// ---------------------------------------------------------------------------

/// One link document as the backend lists it: an `info` section with the
/// identity and display fields and an `api` section with refresh settings.
#[derive(Debug, Deserialize)]
pub struct LinkRecord {
    pub info: LinkInfoSection,
    pub api: LinkApiSection,
}

/// The `info` section of a link document.
#[derive(Debug, Deserialize)]
pub struct LinkInfoSection {
    pub file: String,
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

/// The `api` section of a link document. Fields irrelevant to the console
/// (endpoint URL, item path) are ignored.
#[derive(Debug, Deserialize)]
pub struct LinkApiSection {
    pub update_period: u64,
    #[serde(default)]
    pub value_modifiers: Vec<ValueModifier>,
}

/// Link definitions default to enabled when the flag is omitted.
fn default_enabled() -> bool {
    true
}

impl From<LinkRecord> for Link {
    fn from(record: LinkRecord) -> Self {
        Self {
            file: record.info.file,
            name: record.info.name,
            description: record.info.description,
            image: record.info.image,
            enabled: record.info.enabled,
            update_period: record.api.update_period,
            value_modifiers: record.api.value_modifiers,
        }
    }
}
