//! AWTRIX custom-app payload.
//!
//! Field names follow the AWTRIX 3 custom app JSON. Unset optional fields
//! are omitted so the device keeps its own defaults.

use serde::Serialize;

/// How the icon moves relative to scrolling text (`pushIcon`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(into = "u8")]
pub enum IconMotion {
    /// Icon stays in place.
    #[default]
    Fixed,
    /// Icon slides out with the text once.
    Slide,
    /// Icon moves with the text and comes back every scroll.
    Bounce,
}

impl From<IconMotion> for u8 {
    fn from(motion: IconMotion) -> u8 {
        match motion {
            IconMotion::Fixed => 0,
            IconMotion::Slide => 1,
            IconMotion::Bounce => 2,
        }
    }
}

/// One declarative custom-app screen.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomPayload {
    pub text: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,

    /// Text color as `#RRGGBB`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,

    /// Two-color text gradient.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gradient: Option<[String; 2]>,

    /// Cycle text through the color wheel.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub rainbow: bool,

    /// Progress bar fill, 0-100.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub progress: Option<u8>,

    #[serde(rename = "progressC", skip_serializing_if = "Option::is_none")]
    pub progress_color: Option<String>,

    #[serde(rename = "progressBC", skip_serializing_if = "Option::is_none")]
    pub progress_background: Option<String>,

    pub push_icon: IconMotion,

    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub no_scroll: bool,

    /// Seconds before the device drops the app if it is not refreshed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lifetime: Option<u32>,

    /// Seconds the app stays on screen per loop.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<u32>,
}

impl CustomPayload {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Default::default()
        }
    }

    pub fn icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    pub fn color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    pub fn gradient(mut self, from: impl Into<String>, to: impl Into<String>) -> Self {
        self.gradient = Some([from.into(), to.into()]);
        self
    }

    pub fn rainbow(mut self) -> Self {
        self.rainbow = true;
        self
    }

    pub fn progress(mut self, percent: u8, color: impl Into<String>, background: impl Into<String>) -> Self {
        self.progress = Some(percent.min(100));
        self.progress_color = Some(color.into());
        self.progress_background = Some(background.into());
        self
    }

    pub fn push_icon(mut self, motion: IconMotion) -> Self {
        self.push_icon = motion;
        self
    }

    pub fn no_scroll(mut self) -> Self {
        self.no_scroll = true;
        self
    }

    pub fn lifetime(mut self, seconds: u32) -> Self {
        self.lifetime = Some(seconds);
        self
    }

    pub fn duration(mut self, seconds: u32) -> Self {
        self.duration = Some(seconds);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_minimal_payload_omits_unset_fields() {
        let value = serde_json::to_value(CustomPayload::new("0.5NM")).unwrap();
        assert_eq!(value, json!({ "text": "0.5NM", "pushIcon": 0 }));
    }

    #[test]
    fn test_awtrix_field_names() {
        let payload = CustomPayload::new("PDX-SEA")
            .icon("globe")
            .gradient("#00C8FF", "#C800FF")
            .progress(57, "#FF3B30", "#202020")
            .push_icon(IconMotion::Slide)
            .no_scroll()
            .lifetime(30);

        let value = serde_json::to_value(&payload).unwrap();
        assert_eq!(value["gradient"], json!(["#00C8FF", "#C800FF"]));
        assert_eq!(value["progress"], 57);
        assert_eq!(value["progressC"], "#FF3B30");
        assert_eq!(value["progressBC"], "#202020");
        assert_eq!(value["pushIcon"], 1);
        assert_eq!(value["noScroll"], true);
        assert_eq!(value["lifetime"], 30);
        assert!(value.get("rainbow").is_none());
    }

    #[test]
    fn test_progress_clamped() {
        let payload = CustomPayload::new("x").progress(140, "#FFFFFF", "#000000");
        assert_eq!(payload.progress, Some(100));
    }
}
