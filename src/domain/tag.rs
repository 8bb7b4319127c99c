//! User-defined categories and their colors.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::common::{Displayable, Identifiable, NamedEntity, Owned};
use crate::errors::{CoreError, CoreResult};

pub const MAX_TAG_NAME_LEN: usize = 30;

/// Luminance above which dark text reads better than light text.
const LUMINANCE_THRESHOLD: f64 = 0.4;

/// Six-digit RGB background color, stored as `#rrggbb`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TagColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl TagColor {
    pub const DEFAULT: TagColor = TagColor {
        r: 0x29,
        g: 0x80,
        b: 0xb9,
    };

    /// Parses `#RRGGBB` (the leading `#` is optional).
    pub fn parse(input: &str) -> CoreResult<Self> {
        let trimmed = input.trim();
        let hex = trimmed.strip_prefix('#').unwrap_or(trimmed);
        if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(CoreError::invalid(format!(
                "`{input}` is not a color in #RRGGBB format"
            )));
        }
        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&hex[range], 16)
                .map_err(|_| CoreError::invalid(format!("`{input}` has an invalid channel")))
        };
        Ok(Self {
            r: channel(0..2)?,
            g: channel(2..4)?,
            b: channel(4..6)?,
        })
    }

    /// WCAG relative luminance in `0.0..=1.0`.
    pub fn relative_luminance(&self) -> f64 {
        fn linear(channel: u8) -> f64 {
            let c = channel as f64 / 255.0;
            if c <= 0.03928 {
                c / 12.92
            } else {
                ((c + 0.055) / 1.055).powf(2.4)
            }
        }
        0.2126 * linear(self.r) + 0.7152 * linear(self.g) + 0.0722 * linear(self.b)
    }

    pub fn contrasting_text(&self) -> TextColor {
        if self.relative_luminance() > LUMINANCE_THRESHOLD {
            TextColor::Black
        } else {
            TextColor::White
        }
    }
}

impl Default for TagColor {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl fmt::Display for TagColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl TryFrom<String> for TagColor {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        TagColor::parse(&value)
    }
}

impl From<TagColor> for String {
    fn from(color: TagColor) -> Self {
        color.to_string()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextColor {
    Black,
    White,
}

impl TextColor {
    pub fn hex(self) -> &'static str {
        match self {
            TextColor::Black => "#000000",
            TextColor::White => "#ffffff",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Tag {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub background: TagColor,
    pub text_color: TextColor,
}

impl Tag {
    pub fn from_draft(id: Uuid, user_id: Uuid, draft: TagDraft) -> Self {
        Self {
            id,
            user_id,
            text_color: draft.background.contrasting_text(),
            name: draft.name,
            background: draft.background,
        }
    }

    /// Renames and recolors the tag, re-deriving its text color.
    pub fn apply(&mut self, draft: TagDraft) {
        self.text_color = draft.background.contrasting_text();
        self.name = draft.name;
        self.background = draft.background;
    }
}

impl Identifiable for Tag {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl Owned for Tag {
    fn user_id(&self) -> Uuid {
        self.user_id
    }
}

impl NamedEntity for Tag {
    fn name(&self) -> &str {
        &self.name
    }
}

impl Displayable for Tag {
    fn display_label(&self) -> String {
        format!("{} ({})", self.name, self.background)
    }
}

/// Validated name and color for creating or editing a tag.
#[derive(Debug, Clone, PartialEq)]
pub struct TagDraft {
    pub name: String,
    pub background: TagColor,
}

impl TagDraft {
    pub fn new(name: &str, color: &str) -> CoreResult<Self> {
        let name = name.trim();
        if name.is_empty() {
            return Err(CoreError::invalid("tag name must not be empty"));
        }
        if name.chars().count() > MAX_TAG_NAME_LEN {
            return Err(CoreError::invalid(format!(
                "tag name must be at most {MAX_TAG_NAME_LEN} characters"
            )));
        }
        Ok(Self {
            name: name.to_string(),
            background: TagColor::parse(color)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_accepts_missing_hash_and_mixed_case() {
        let color = TagColor::parse("2980B9").unwrap();
        assert_eq!(color, TagColor::DEFAULT);
        assert_eq!(color.to_string(), "#2980b9");
    }

    #[test]
    fn parse_rejects_short_and_non_hex() {
        assert!(TagColor::parse("#fff").is_err());
        assert!(TagColor::parse("#12345g").is_err());
        assert!(TagColor::parse("#1234567").is_err());
    }

    #[test]
    fn light_backgrounds_get_black_text() {
        assert_eq!(TagColor::parse("#ffffff").unwrap().contrasting_text(), TextColor::Black);
        assert_eq!(TagColor::parse("#f1c40f").unwrap().contrasting_text(), TextColor::Black);
    }

    #[test]
    fn dark_backgrounds_get_white_text() {
        assert_eq!(TagColor::parse("#000000").unwrap().contrasting_text(), TextColor::White);
        assert_eq!(TagColor::DEFAULT.contrasting_text(), TextColor::White);
        assert_eq!(TagColor::parse("#e74c3c").unwrap().contrasting_text(), TextColor::White);
    }

    #[test]
    fn draft_enforces_name_rules() {
        assert!(TagDraft::new("   ", "#000000").is_err());
        assert!(TagDraft::new(&"x".repeat(31), "#000000").is_err());
        let draft = TagDraft::new(&"é".repeat(30), "#000000").unwrap();
        assert_eq!(draft.name.chars().count(), 30);
    }

    #[test]
    fn color_serializes_as_hex_string() {
        let json = serde_json::to_string(&TagColor::parse("#27AE60").unwrap()).unwrap();
        assert_eq!(json, "\"#27ae60\"");
        let back: TagColor = serde_json::from_str(&json).unwrap();
        assert_eq!(back.to_string(), "#27ae60");
    }
}
