//! Decoding of inline attachment payloads into short-lived openable handles
//!
//! Data URLs can be arbitrarily large and some viewers refuse to open them
//! directly, so a view wanting to open one asks a [`PreviewStore`] for a
//! [`PreviewHandle`]: the decoded bytes stay registered under a `blob:` URL
//! for as long as the view holds the handle, and are released when the handle
//! is closed or dropped.

use std::{collections::HashMap, fmt, sync::Arc};

use parking_lot::Mutex;
use percent_encoding::percent_decode_str;
use uuid::Uuid;

use crate::attachment::starts_with_ignore_case;

const HANDLE_PREFIX: &str = "blob:colloquy/";

#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum PreviewError {
    #[error("locator is not an inline payload")]
    NotInline,

    #[error("inline payload has no comma between header and data")]
    MissingComma,

    #[error("inline payload is not valid base64: {0}")]
    Base64(#[from] base64::DecodeError),
}

/// The decoded contents of a `data:` URL
#[derive(Clone, Eq, PartialEq)]
pub struct InlinePayload {
    /// Lowercased, `text/plain` when the header names none
    pub media_type: String,
    pub data: Vec<u8>,
}

impl fmt::Debug for InlinePayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InlinePayload")
            .field("media_type", &self.media_type)
            .field("len", &self.data.len())
            .finish()
    }
}

impl InlinePayload {
    pub fn parse(locator: &str) -> Result<InlinePayload, PreviewError> {
        let locator = locator.trim();
        if !starts_with_ignore_case(locator, "data:") {
            return Err(PreviewError::NotInline);
        }
        let (header, data) = locator["data:".len()..]
            .split_once(',')
            .ok_or(PreviewError::MissingComma)?;
        let mut params = header.split(';');
        let media_type = params.next().map(str::trim).unwrap_or("");
        let is_base64 = params.any(|p| p.trim().eq_ignore_ascii_case("base64"));
        let media_type = match media_type.is_empty() {
            true => String::from("text/plain"),
            false => media_type.to_ascii_lowercase(),
        };
        let data = match is_base64 {
            true => decode_base64(data)?,
            false => percent_decode_str(data).collect(),
        };
        Ok(InlinePayload { media_type, data })
    }
}

// Producers disagree on padding and alphabet, and some wrap long payloads.
fn decode_base64(data: &str) -> Result<Vec<u8>, base64::DecodeError> {
    let compact = percent_decode_str(data)
        .decode_utf8_lossy()
        .chars()
        .filter(|c| !c.is_ascii_whitespace())
        .collect::<String>();
    let compact = compact.trim_end_matches('=');
    base64::decode_config(compact, base64::STANDARD_NO_PAD)
        .or_else(|e| base64::decode_config(compact, base64::URL_SAFE_NO_PAD).map_err(|_| e))
}

/// Registry of the decoded previews currently held open by views
///
/// Cloning shares the registry.
#[derive(Clone, Default)]
pub struct PreviewStore {
    blobs: Arc<Mutex<HashMap<Uuid, Arc<InlinePayload>>>>,
}

impl fmt::Debug for PreviewStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PreviewStore")
            .field("live", &self.live())
            .finish()
    }
}

impl PreviewStore {
    pub fn new() -> PreviewStore {
        PreviewStore::default()
    }

    /// Decodes an inline payload and registers it until the returned handle
    /// is released
    pub fn open(&self, locator: &str) -> Result<PreviewHandle, PreviewError> {
        let payload = InlinePayload::parse(locator)?;
        let id = Uuid::new_v4();
        tracing::trace!(%id, media_type = %payload.media_type, len = payload.data.len(), "opening preview");
        self.blobs.lock().insert(id, Arc::new(payload));
        Ok(PreviewHandle {
            store: self.clone(),
            id,
            url: format!("{HANDLE_PREFIX}{id}"),
            released: false,
        })
    }

    /// Returns something the caller can hand to a viewer
    ///
    /// Inline `data:` payloads are decoded into a handle that the caller must
    /// close once the view goes away. Anything else, including payloads that
    /// fail to decode, comes back unchanged.
    pub fn to_openable_url(&self, locator: &str) -> OpenableUrl {
        if !starts_with_ignore_case(locator.trim(), "data:") {
            return OpenableUrl::Plain(locator.to_string());
        }
        match self.open(locator) {
            Ok(handle) => OpenableUrl::Handle(handle),
            Err(err) => {
                tracing::warn!(%err, "failed decoding inline preview, opening it as-is");
                OpenableUrl::Plain(locator.to_string())
            }
        }
    }

    /// Dereferences a handle URL produced by this store, if still open
    pub fn fetch(&self, url: &str) -> Option<Arc<InlinePayload>> {
        let id = Uuid::parse_str(url.strip_prefix(HANDLE_PREFIX)?).ok()?;
        self.blobs.lock().get(&id).cloned()
    }

    /// Number of handles not released yet
    pub fn live(&self) -> usize {
        self.blobs.lock().len()
    }

    fn release(&self, id: &Uuid) {
        if self.blobs.lock().remove(id).is_none() {
            tracing::error!(%id, "released a preview handle that was not registered");
        }
    }
}

/// An open decoded preview, released exactly once on close or drop
pub struct PreviewHandle {
    store: PreviewStore,
    id: Uuid,
    url: String,
    released: bool,
}

impl fmt::Debug for PreviewHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PreviewHandle")
            .field("url", &self.url)
            .field("released", &self.released)
            .finish()
    }
}

impl PreviewHandle {
    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn payload(&self) -> Option<Arc<InlinePayload>> {
        self.store.fetch(&self.url)
    }

    pub fn close(mut self) {
        self.release();
    }

    fn release(&mut self) {
        if !self.released {
            self.released = true;
            self.store.release(&self.id);
        }
    }
}

impl Drop for PreviewHandle {
    fn drop(&mut self) {
        self.release();
    }
}

/// Result of [`PreviewStore::to_openable_url`]
#[derive(Debug)]
pub enum OpenableUrl {
    Plain(String),
    Handle(PreviewHandle),
}

impl OpenableUrl {
    pub fn as_str(&self) -> &str {
        match self {
            OpenableUrl::Plain(url) => url,
            OpenableUrl::Handle(h) => h.url(),
        }
    }

    pub fn is_handle(&self) -> bool {
        matches!(self, OpenableUrl::Handle(_))
    }

    pub fn close(self) {
        if let OpenableUrl::Handle(h) = self {
            h.close();
        }
    }
}
