use crate::Error;

/// A file attached to a comment, as delivered by whichever producer stored it
///
/// Freshly staged uploads usually only carry an `inline_preview`, stored
/// comments carry a `storage_key`, and legacy records may carry any mix of
/// the four fields, with a `declared_content_type` that cannot be trusted.
#[derive(Clone, Debug, Default, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Attachment {
    #[serde(default)]
    pub file_name: String,

    /// Opaque reference: may be a data/blob/http(s) URL, an absolute path or a
    /// bare relative key
    #[serde(default)]
    pub storage_key: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub declared_content_type: Option<String>,

    /// Embedded preview payload, independent of `storage_key`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inline_preview: Option<String>,
}

impl Attachment {
    pub fn stored(file_name: String, storage_key: String, content_type: Option<String>) -> Attachment {
        Attachment {
            file_name,
            storage_key,
            declared_content_type: content_type,
            inline_preview: None,
        }
    }

    /// A local upload that has not reached storage yet, previewed from its data URL
    pub fn staged(file_name: String, content_type: Option<String>, data_url: String) -> Attachment {
        Attachment {
            file_name,
            storage_key: String::new(),
            declared_content_type: content_type,
            inline_preview: Some(data_url),
        }
    }

    pub fn preview_locator(&self) -> &str {
        self.inline_preview.as_deref().unwrap_or("")
    }

    pub fn validate(&self) -> Result<(), Error> {
        crate::validate_string(&self.file_name)?;
        crate::validate_string(&self.storage_key)?;
        if let Some(t) = &self.declared_content_type {
            crate::validate_string(t)?;
        }
        Ok(())
    }
}
