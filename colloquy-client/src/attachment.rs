use crate::api::Attachment;

const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "webp", "bmp", "svg"];
const DOCUMENT_EXTENSIONS: &[&str] = &["pdf"];

const INLINE_IMAGE_MARKER: &str = "data:image/";
const INLINE_PDF_MARKER: &str = "data:application/pdf";

/// How an attachment can be rendered
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum AttachmentKind {
    Image,
    /// A document the browser can display inline (PDF)
    ViewableDocument,
    /// No inline preview, rendered as a generic file link
    Opaque,
}

impl AttachmentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AttachmentKind::Image => "image",
            AttachmentKind::ViewableDocument => "document",
            AttachmentKind::Opaque => "file",
        }
    }
}

pub(crate) fn starts_with_ignore_case(s: &str, prefix: &str) -> bool {
    s.get(..prefix.len())
        .map_or(false, |p| p.eq_ignore_ascii_case(prefix))
}

fn extension_kind(ext: &str) -> Option<AttachmentKind> {
    if IMAGE_EXTENSIONS.iter().any(|e| e.eq_ignore_ascii_case(ext)) {
        Some(AttachmentKind::Image)
    } else if DOCUMENT_EXTENSIONS.iter().any(|e| e.eq_ignore_ascii_case(ext)) {
        Some(AttachmentKind::ViewableDocument)
    } else {
        None
    }
}

fn content_type_kind(content_type: &str) -> Option<AttachmentKind> {
    let content_type = content_type.trim().to_ascii_lowercase();
    if content_type.starts_with("image/") {
        Some(AttachmentKind::Image)
    } else if content_type.contains("pdf") {
        Some(AttachmentKind::ViewableDocument)
    } else {
        None
    }
}

fn file_name_kind(name: &str) -> Option<AttachmentKind> {
    let (_, ext) = name.trim().rsplit_once('.')?;
    extension_kind(ext)
}

/// Strips the query and fragment off a URL-ish string
pub(crate) fn locator_path(locator: &str) -> &str {
    locator
        .split(|c| c == '?' || c == '#')
        .next()
        .unwrap_or(locator)
}

fn locator_kind(locator: &str) -> Option<AttachmentKind> {
    let locator = locator.trim();
    if locator.is_empty() {
        return None;
    }
    if starts_with_ignore_case(locator, INLINE_IMAGE_MARKER) {
        return Some(AttachmentKind::Image);
    }
    if starts_with_ignore_case(locator, INLINE_PDF_MARKER) {
        return Some(AttachmentKind::ViewableDocument);
    }
    let last_segment = locator_path(locator).rsplit('/').next().unwrap_or("");
    file_name_kind(last_segment)
}

/// Decides how to render an attachment, trusting the most explicit signal
/// first: declared content type, then file name extension, then the shape of
/// the preview locator and storage key
pub fn classify(
    declared_content_type: Option<&str>,
    file_name: &str,
    preview_locator: &str,
    storage_key: &str,
) -> AttachmentKind {
    declared_content_type
        .and_then(content_type_kind)
        .or_else(|| file_name_kind(file_name))
        .or_else(|| locator_kind(preview_locator))
        .or_else(|| locator_kind(storage_key))
        .unwrap_or(AttachmentKind::Opaque)
}

/// Whether `s` embeds its own bytes or already is a browser-held handle
pub(crate) fn is_inline(s: &str) -> bool {
    starts_with_ignore_case(s, "data:") || starts_with_ignore_case(s, "blob:")
}

fn is_self_sufficient(key: &str) -> bool {
    is_inline(key)
        || starts_with_ignore_case(key, "http://")
        || starts_with_ignore_case(key, "https://")
        || key.starts_with('/')
        || key.starts_with("./")
        || key.starts_with("../")
}

/// Turns attachment references into locators the presentation layer can
/// dereference
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Resolver {
    /// Prefix for storage keys that are bare relative asset paths, always
    /// ending with `/`
    asset_root: String,
}

impl Default for Resolver {
    fn default() -> Resolver {
        Resolver {
            asset_root: String::from("/"),
        }
    }
}

impl Resolver {
    pub fn new(asset_root: &str) -> Resolver {
        let asset_root = asset_root.trim();
        let asset_root = match asset_root.ends_with('/') {
            true => asset_root.to_string(),
            false => format!("{asset_root}/"),
        };
        Resolver { asset_root }
    }

    pub fn asset_root(&self) -> &str {
        &self.asset_root
    }

    /// Returns a dereferenceable locator, or an empty string when none can be
    /// derived safely and the caller should fall back to the opaque rendering
    pub fn resolve_locator(&self, preview_locator: &str, storage_key: &str) -> String {
        if !preview_locator.trim().is_empty() {
            return preview_locator.to_string();
        }
        let key = storage_key.trim();
        if key.is_empty() {
            return String::new();
        }
        if is_self_sufficient(key) {
            return storage_key.to_string();
        }
        if key.contains('/') && !key.contains(char::is_whitespace) {
            return format!("{}{}", self.asset_root, key);
        }
        String::new()
    }

    pub fn resolve<'a>(&self, attachment: &'a Attachment) -> ResolvedAttachment<'a> {
        let preview = attachment.preview_locator();
        ResolvedAttachment {
            attachment,
            kind: classify(
                attachment.declared_content_type.as_deref(),
                &attachment.file_name,
                preview,
                &attachment.storage_key,
            ),
            locator: self.resolve_locator(preview, &attachment.storage_key),
            display_name: display_name(attachment),
        }
    }
}

/// [`Resolver::resolve_locator`] with assets served from the site root
pub fn resolve_locator(preview_locator: &str, storage_key: &str) -> String {
    Resolver::default().resolve_locator(preview_locator, storage_key)
}

fn display_name(a: &Attachment) -> String {
    let name = a.file_name.trim();
    if !name.is_empty() {
        return name.to_string();
    }
    let key = a.storage_key.trim();
    if !is_inline(key) {
        if let Some(segment) = locator_path(key).rsplit('/').find(|s| !s.is_empty()) {
            return segment.to_string();
        }
    }
    String::from("attachment")
}

/// An attachment with everything the presentation layer needs to show it
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ResolvedAttachment<'a> {
    pub attachment: &'a Attachment,
    pub kind: AttachmentKind,
    /// Empty when there is no safe locator
    pub locator: String,
    pub display_name: String,
}

impl<'a> ResolvedAttachment<'a> {
    /// Whether an inline preview should be attempted
    pub fn is_previewable(&self) -> bool {
        self.kind != AttachmentKind::Opaque && !self.locator.is_empty()
    }
}
