use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;
use strum::{Display, EnumString};

pub const DEFAULT_ICON_BACKGROUND_COLOR: &str = "#8BC34A";
pub const DEFAULT_BACKGROUND_COLOR: &str = "#2E7D32";
pub const DEFAULT_TEXT_COLOR: &str = "#FFFFFF";
pub const DEFAULT_SHADOW_COLOR: &str = "rgba(0,0,0,0.3)";
pub const DEFAULT_DURATION_MS: u64 = 5000;

/// Where a floating badge sits on the host page.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Display, EnumString, Serialize, Deserialize)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum Position {
    #[default]
    Top,
    Middle,
    Bottom,
}

/// Identifies a single achievement, derived from the timestamp the host attached to it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AchievementId(i64);

impl AchievementId {
    pub fn from_timestamp(timestamp: i64) -> Self {
        Self(timestamp)
    }

    pub fn timestamp(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for AchievementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "achievement_{}", self.0)
    }
}

impl FromStr for AchievementId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let timestamp = s.strip_prefix("achievement_").unwrap_or(s);
        timestamp.parse().map(Self)
    }
}

/// The four colors a badge is painted with.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Palette {
    pub icon_background: String,
    pub background: String,
    pub text: String,
    pub shadow: String,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            icon_background: DEFAULT_ICON_BACKGROUND_COLOR.into(),
            background: DEFAULT_BACKGROUND_COLOR.into(),
            text: DEFAULT_TEXT_COLOR.into(),
            shadow: DEFAULT_SHADOW_COLOR.into(),
        }
    }
}

/// A request to display an achievement, with every default already resolved.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DisplayRequest {
    pub title: String,
    pub description: String,
    /// The points as sent by the host. `None` when missing, null or empty.
    pub points: Option<i64>,
    pub icon_text: String,
    pub duration_ms: u64,
    pub palette: Palette,
    pub auto_width: bool,
    pub floating: bool,
    pub position: Position,
    pub timestamp: i64,
}

impl DisplayRequest {
    /// Construct a request with every optional parameter at its default.
    pub fn new(timestamp: i64) -> Self {
        Self {
            title: String::new(),
            description: String::new(),
            points: None,
            icon_text: String::new(),
            duration_ms: DEFAULT_DURATION_MS,
            palette: Palette::default(),
            auto_width: true,
            floating: false,
            position: Position::default(),
            timestamp,
        }
    }

    pub fn id(&self) -> AchievementId {
        AchievementId::from_timestamp(self.timestamp)
    }

    /// The text of the points pill, if it should be shown at all.
    pub fn points_label(&self) -> Option<String> {
        match self.points {
            Some(points) if points > 0 => Some(format!("{points}P")),
            _ => None,
        }
    }
}

/// The raw argument object delivered with a render event.
///
/// Every field is optional: the very first render event carries nothing, and the host may omit
/// any parameter it wants defaulted. Fields are kept as raw JSON and coerced the way a browser
/// would, so a title sent as a number still renders.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct RenderArgs {
    pub title: Value,
    pub description: Value,
    pub points: Value,
    pub icon_text: Value,
    pub duration: Value,
    pub icon_background_color: Value,
    pub background_color: Value,
    pub text_color: Value,
    pub shadow_color: Value,
    pub auto_width: Value,
    pub floating: Value,
    pub position: Value,
    pub timestamp: Value,
}

impl RenderArgs {
    /// Resolve these arguments into a request.
    ///
    /// Returns `None` when there's no usable timestamp, which is how the initial render event looks.
    pub fn into_request(self) -> Option<DisplayRequest> {
        let timestamp = integer(&self.timestamp)?;
        let duration_ms = match integer(&self.duration) {
            Some(duration) if duration > 0 => duration as u64,
            _ => DEFAULT_DURATION_MS,
        };
        let position = text(&self.position)
            .and_then(|position| Position::from_str(position.trim()).ok())
            .unwrap_or_default();
        let palette = Palette {
            icon_background: color_or(&self.icon_background_color, DEFAULT_ICON_BACKGROUND_COLOR),
            background: color_or(&self.background_color, DEFAULT_BACKGROUND_COLOR),
            text: color_or(&self.text_color, DEFAULT_TEXT_COLOR),
            shadow: color_or(&self.shadow_color, DEFAULT_SHADOW_COLOR),
        };
        Some(DisplayRequest {
            title: text(&self.title).unwrap_or_default(),
            description: text(&self.description).unwrap_or_default(),
            points: integer(&self.points),
            icon_text: text(&self.icon_text).unwrap_or_default(),
            duration_ms,
            palette,
            // Only an explicit `false` turns auto width off.
            auto_width: self.auto_width != Value::Bool(false),
            floating: truthy(&self.floating),
            position,
            timestamp,
        })
    }
}

fn color_or(color: &Value, default: &str) -> String {
    match text(color) {
        Some(color) if !color.trim().is_empty() => color,
        _ => default.to_string(),
    }
}

fn text(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        _ => None,
    }
}

fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().is_some_and(|n| n != 0.0 && !n.is_nan()),
        Value::String(text) => !text.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

// Python hands us ints, floats or occasionally strings depending on how the value was built.
fn integer(value: &Value) -> Option<i64> {
    match value {
        Value::Number(number) => number.as_i64().or_else(|| finite(number.as_f64())),
        Value::String(text) => {
            let text = text.trim();
            text.parse::<i64>().ok().or_else(|| finite(text.parse::<f64>().ok()))
        }
        _ => None,
    }
}

fn finite(number: Option<f64>) -> Option<i64> {
    number.filter(|n| n.is_finite()).map(|n| n as i64)
}
