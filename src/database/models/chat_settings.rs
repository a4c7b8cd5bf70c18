//! Per-chat farewell customization.

use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

use crate::events::EventKind;

/// One customization row, keyed by (chat, kind).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatSettings {
    /// MongoDB document ID
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,

    /// Telegram chat ID
    pub chat_id: i64,

    /// Which farewell this row customizes
    pub kind: EventKind,

    /// HTML template with a `{username}` placeholder
    #[serde(default)]
    pub template: Option<String>,

    /// Path of a locally stored image
    #[serde(default)]
    pub image_ref: Option<String>,

    /// Unix timestamp of the first write
    #[serde(default)]
    pub created_at: i64,

    /// Unix timestamp of the latest write
    #[serde(default)]
    pub updated_at: i64,
}

impl ChatSettings {
    pub fn new(chat_id: i64, kind: EventKind) -> Self {
        let now = chrono::Utc::now().timestamp();
        Self {
            id: None,
            chat_id,
            kind,
            template: None,
            image_ref: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Overwrite the fields the patch carries, keep the others.
    pub fn apply(&mut self, patch: SettingsPatch) {
        if let Some(template) = patch.template {
            self.template = Some(template);
        }
        if let Some(image_ref) = patch.image_ref {
            self.image_ref = Some(image_ref);
        }
        self.updated_at = chrono::Utc::now().timestamp();
    }

    pub fn customization(&self) -> Customization {
        Customization {
            template: self.template.clone(),
            image_ref: self.image_ref.clone(),
        }
    }
}

/// What a chat customized for one kind; `None` fields fall back to defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Customization {
    pub template: Option<String>,
    pub image_ref: Option<String>,
}

impl Customization {
    /// The custom template, or the built-in one for `kind`.
    pub fn template_or_default(&self, kind: EventKind) -> &str {
        self.template
            .as_deref()
            .unwrap_or_else(|| kind.default_template())
    }
}

/// Partial update for [`ChatSettings`]. `None` means "leave as stored".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SettingsPatch {
    pub template: Option<String>,
    pub image_ref: Option<String>,
}

impl SettingsPatch {
    pub fn template(template: impl Into<String>) -> Self {
        Self {
            template: Some(template.into()),
            image_ref: None,
        }
    }

    pub fn image(image_ref: impl Into<String>) -> Self {
        Self {
            template: None,
            image_ref: Some(image_ref.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn apply_keeps_fields_the_patch_omits() {
        let mut row = ChatSettings::new(1, EventKind::Kick);
        row.apply(SettingsPatch::image("images/kick_1_a.jpg"));
        row.apply(SettingsPatch::template("Bye {username}"));

        assert_eq!(row.template.as_deref(), Some("Bye {username}"));
        assert_eq!(row.image_ref.as_deref(), Some("images/kick_1_a.jpg"));
    }

    #[test]
    fn default_template_applies_when_absent() {
        let custom = Customization::default();
        assert_eq!(
            custom.template_or_default(EventKind::Ban),
            EventKind::Ban.default_template()
        );

        let custom = Customization {
            template: Some("X".into()),
            image_ref: None,
        };
        assert_eq!(custom.template_or_default(EventKind::Ban), "X");
    }
}
