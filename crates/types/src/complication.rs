//! Complication data model.
//!
//! Content is a sum type keyed by [`ContentType`]; each variant carries only
//! the fields that make sense for it. Payloads arrive already resolved from
//! external providers and are replaced wholesale on every update.

use crate::image::ImageRef;
use crate::text::ComplicationText;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Stable identifier of a complication slot
pub type SlotId = u32;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ContentType {
    Empty,
    NoData,
    ShortText,
    LongText,
    RangedValue,
    Icon,
    SmallImage,
    LargeImage,
    NoPermission,
}

impl ContentType {
    /// Placeholder types every slot accepts
    pub fn is_placeholder(&self) -> bool {
        matches!(
            self,
            ContentType::Empty | ContentType::NoData | ContentType::NoPermission
        )
    }
}

/// Where on the face a slot lives
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum SlotRole {
    Top,
    Left,
    Right,
    Bottom,
    Background,
}

/// Fixed slot definition of a layout variant
#[derive(Debug, Clone, PartialEq)]
pub struct ComplicationSlot {
    pub id: SlotId,
    pub role: SlotRole,
    supported_types: Vec<ContentType>,
}

impl ComplicationSlot {
    pub fn new(id: SlotId, role: SlotRole, supported_types: &[ContentType]) -> Self {
        Self {
            id,
            role,
            supported_types: supported_types.to_vec(),
        }
    }

    pub fn supported_types(&self) -> &[ContentType] {
        &self.supported_types
    }

    pub fn supports(&self, content_type: ContentType) -> bool {
        content_type.is_placeholder() || self.supported_types.contains(&content_type)
    }
}

/// Opaque action handed back to the host when a complication is tapped
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct TapAction(pub String);

impl TapAction {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

/// Icon with an optional variant safe for burn-in protected displays
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IconSet {
    pub icon: ImageRef,
    #[serde(default)]
    pub burn_in_protection: Option<ImageRef>,
}

impl IconSet {
    pub fn new(icon: ImageRef) -> Self {
        Self {
            icon,
            burn_in_protection: None,
        }
    }

    pub fn with_burn_in(mut self, icon: ImageRef) -> Self {
        self.burn_in_protection = Some(icon);
        self
    }

    /// Icon to draw, honoring the burn-in variant when requested and present
    pub fn pick(&self, prefer_burn_in: bool) -> &ImageRef {
        match (&self.burn_in_protection, prefer_burn_in) {
            (Some(safe), true) => safe,
            _ => &self.icon,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum ImageStyle {
    /// Cropped to a disc filling the slot
    #[default]
    Photo,
    /// Small centred glyph, drawn as is
    Icon,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StyledImage {
    pub image: ImageRef,
    #[serde(default)]
    pub style: ImageStyle,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ComplicationContent {
    Empty,
    NoData,
    ShortText {
        #[serde(default)]
        title: Option<ComplicationText>,
        text: ComplicationText,
        #[serde(default)]
        icon: Option<IconSet>,
        #[serde(default)]
        tap_action: Option<TapAction>,
    },
    LongText {
        #[serde(default)]
        title: Option<ComplicationText>,
        text: ComplicationText,
        #[serde(default)]
        icon: Option<IconSet>,
        #[serde(default)]
        small_image: Option<StyledImage>,
        #[serde(default)]
        tap_action: Option<TapAction>,
    },
    /// `value` is not required to lie within `[min, max]`
    RangedValue {
        min: f64,
        max: f64,
        value: f64,
        #[serde(default)]
        icon: Option<IconSet>,
        #[serde(default)]
        text: Option<ComplicationText>,
        #[serde(default)]
        title: Option<ComplicationText>,
        #[serde(default)]
        tap_action: Option<TapAction>,
    },
    Icon {
        icon: IconSet,
        #[serde(default)]
        tap_action: Option<TapAction>,
    },
    SmallImage {
        image: StyledImage,
        #[serde(default)]
        tap_action: Option<TapAction>,
    },
    LargeImage {
        image: ImageRef,
        #[serde(default)]
        tap_action: Option<TapAction>,
    },
    /// Provider lacks permission; tapping asks the host to request it
    NoPermission {
        #[serde(default)]
        text: Option<ComplicationText>,
        #[serde(default)]
        title: Option<ComplicationText>,
        #[serde(default)]
        icon: Option<IconSet>,
    },
}

impl IconSet {
    fn images(&self) -> impl Iterator<Item = &ImageRef> {
        std::iter::once(&self.icon).chain(self.burn_in_protection.as_ref())
    }
}

impl ComplicationContent {
    /// Every image this content refers to, for loaders to fulfil
    pub fn images(&self) -> Vec<&ImageRef> {
        let mut images = Vec::new();
        match self {
            Self::ShortText { icon, .. }
            | Self::RangedValue { icon, .. }
            | Self::NoPermission { icon, .. } => images.extend(icon.iter().flat_map(IconSet::images)),
            Self::LongText {
                icon, small_image, ..
            } => {
                images.extend(icon.iter().flat_map(IconSet::images));
                images.extend(small_image.iter().map(|styled| &styled.image));
            }
            Self::Icon { icon, .. } => images.extend(icon.images()),
            Self::SmallImage { image, .. } => images.push(&image.image),
            Self::LargeImage { image, .. } => images.push(image),
            Self::Empty | Self::NoData => {}
        }
        images
    }

    pub fn content_type(&self) -> ContentType {
        match self {
            Self::Empty => ContentType::Empty,
            Self::NoData => ContentType::NoData,
            Self::ShortText { .. } => ContentType::ShortText,
            Self::LongText { .. } => ContentType::LongText,
            Self::RangedValue { .. } => ContentType::RangedValue,
            Self::Icon { .. } => ContentType::Icon,
            Self::SmallImage { .. } => ContentType::SmallImage,
            Self::LargeImage { .. } => ContentType::LargeImage,
            Self::NoPermission { .. } => ContentType::NoPermission,
        }
    }

    pub fn tap_action(&self) -> Option<&TapAction> {
        match self {
            Self::ShortText { tap_action, .. }
            | Self::LongText { tap_action, .. }
            | Self::RangedValue { tap_action, .. }
            | Self::Icon { tap_action, .. }
            | Self::SmallImage { tap_action, .. }
            | Self::LargeImage { tap_action, .. } => tap_action.as_ref(),
            Self::Empty | Self::NoData | Self::NoPermission { .. } => None,
        }
    }
}

/// Half-open `[start, end)` window in Unix epoch milliseconds
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct ValidityWindow {
    #[serde(default)]
    pub start_millis: Option<i64>,
    #[serde(default)]
    pub end_millis: Option<i64>,
}

impl ValidityWindow {
    pub const ALWAYS: ValidityWindow = ValidityWindow {
        start_millis: None,
        end_millis: None,
    };

    pub fn between(start_millis: i64, end_millis: i64) -> Self {
        Self {
            start_millis: Some(start_millis),
            end_millis: Some(end_millis),
        }
    }

    pub fn is_active(&self, now_millis: i64) -> bool {
        self.start_millis.map_or(true, |start| start <= now_millis)
            && self.end_millis.map_or(true, |end| now_millis < end)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ComplicationData {
    pub content: ComplicationContent,
    #[serde(default)]
    pub validity: ValidityWindow,
}

impl ComplicationData {
    pub fn new(content: ComplicationContent) -> Self {
        Self {
            content,
            validity: ValidityWindow::ALWAYS,
        }
    }

    pub fn with_validity(mut self, validity: ValidityWindow) -> Self {
        self.validity = validity;
        self
    }

    pub fn content_type(&self) -> ContentType {
        self.content.content_type()
    }

    pub fn is_active(&self, now_millis: i64) -> bool {
        self.validity.is_active(now_millis)
    }
}

/// What the host is asked to do after a tap
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WatchFaceAction {
    Tap { slot: SlotId, action: TapAction },
    RequestPermission { slot: SlotId },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ActionError {
    #[error("action {0:?} is no longer valid")]
    Stale(String),
    #[error("host rejected action: {0}")]
    Rejected(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_images_lists_icon_variants() {
        let content = ComplicationContent::LongText {
            title: None,
            text: ComplicationText::plain("x"),
            icon: Some(IconSet::new(ImageRef::pending("a")).with_burn_in(ImageRef::pending("b"))),
            small_image: Some(StyledImage {
                image: ImageRef::pending("c"),
                style: ImageStyle::Photo,
            }),
            tap_action: None,
        };
        let keys: Vec<_> = content.images().iter().map(|i| i.key()).collect();
        assert_eq!(keys, vec!["a", "b", "c"]);
        assert!(ComplicationContent::NoData.images().is_empty());
    }

    #[test]
    fn test_validity_window_is_half_open() {
        let window = ValidityWindow::between(100, 200);
        assert!(!window.is_active(99));
        assert!(window.is_active(100));
        assert!(window.is_active(199));
        assert!(!window.is_active(200));
        assert!(ValidityWindow::ALWAYS.is_active(i64::MIN));

        let open_ended = ValidityWindow {
            start_millis: Some(50),
            end_millis: None,
        };
        assert!(open_ended.is_active(i64::MAX));
        assert!(!open_ended.is_active(49));
    }

    #[test]
    fn test_placeholders_accepted_everywhere() {
        let slot = ComplicationSlot::new(4, SlotRole::Background, &[ContentType::LargeImage]);
        assert!(slot.supports(ContentType::LargeImage));
        assert!(slot.supports(ContentType::NoPermission));
        assert!(slot.supports(ContentType::Empty));
        assert!(!slot.supports(ContentType::ShortText));
    }

    #[test]
    fn test_icon_set_prefers_burn_in_variant() {
        let set = IconSet::new(ImageRef::pending("steps"))
            .with_burn_in(ImageRef::pending("steps_outline"));
        assert_eq!(set.pick(false).key(), "steps");
        assert_eq!(set.pick(true).key(), "steps_outline");

        let plain = IconSet::new(ImageRef::pending("heart"));
        assert_eq!(plain.pick(true).key(), "heart");
    }

    #[test]
    fn test_tap_action_lookup() {
        let content = ComplicationContent::ShortText {
            title: None,
            text: ComplicationText::plain("5"),
            icon: None,
            tap_action: Some(TapAction::new("open_steps")),
        };
        assert_eq!(content.tap_action(), Some(&TapAction::new("open_steps")));

        let denied = ComplicationContent::NoPermission {
            text: None,
            title: None,
            icon: None,
        };
        assert_eq!(denied.tap_action(), None);
        assert_eq!(denied.content_type(), ContentType::NoPermission);
    }

    #[test]
    fn test_content_from_json() {
        let json = r#"{
            "content": {
                "type": "ranged_value",
                "min": 0.0, "max": 100.0, "value": 25.0,
                "tap_action": "battery"
            },
            "validity": { "end_millis": 1000 }
        }"#;
        let data: ComplicationData = serde_json::from_str(json).unwrap();
        assert_eq!(data.content_type(), ContentType::RangedValue);
        assert!(data.is_active(999));
        assert!(!data.is_active(1000));
        assert_eq!(data.content.tap_action(), Some(&TapAction::new("battery")));
    }
}
