use super::animations::{Frame, Placement, get_animation, transition_declaration};
use super::request::{AchievementId, DisplayRequest, Position};
use std::fmt::Write;
use std::time::Duration;

/// Class carried by every badge container.
pub const CONTAINER_CLASS: &str = "streamlit-achievement";

/// Attribute tagging a badge container with its achievement id.
pub const ID_ATTRIBUTE: &str = "data-achievement-id";

/// Id of the keyframes stylesheet, injected at most once per document.
pub const STYLESHEET_ID: &str = "streamlit-achievement-animations";

/// Keyframes referenced by the badge markup.
pub const KEYFRAMES: &str = "\
@keyframes expandBackground {
  0% { transform: scaleX(0); }
  100% { transform: scaleX(1); }
}
@keyframes iconPulse {
  0%, 100% { transform: scale(1); }
  50% { transform: scale(1.15); }
}
@keyframes fadeInText {
  to { opacity: 1; }
}
";

const FONT_FAMILY: &str = "'Segoe UI', Tahoma, Geneva, Verdana, sans-serif";

/// A fully resolved achievement badge, ready to be materialized in a document.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Badge {
    request: DisplayRequest,
    placement: Placement,
    transition: Duration,
}

impl Badge {
    pub fn new(request: &DisplayRequest, placement: Placement, transition: Duration) -> Self {
        Self { request: request.clone(), placement, transition }
    }

    pub fn id(&self) -> AchievementId {
        self.request.id()
    }

    pub fn request(&self) -> &DisplayRequest {
        &self.request
    }

    pub fn placement(&self) -> Placement {
        self.placement
    }

    pub fn transition(&self) -> Duration {
        self.transition
    }

    pub fn points_label(&self) -> Option<String> {
        self.request.points_label()
    }

    /// The CSS properties that move the container into `frame`.
    pub fn frame_style(&self, frame: Frame) -> [(&'static str, String); 2] {
        let animation = get_animation(self.placement);
        [("transform", animation.transform(frame).to_string()), ("opacity", animation.opacity(frame).to_string())]
    }

    /// Every CSS property the container is mounted with, starting off screen.
    pub fn container_style(&self) -> Vec<(&'static str, String)> {
        let mut style = match self.placement {
            Placement::Inline => {
                let width = if self.request.auto_width { "100%" } else { "400px" };
                vec![
                    ("position", "relative".to_string()),
                    ("width", width.to_string()),
                    ("max-width", "100%".to_string()),
                    ("height", "80px".to_string()),
                    ("margin", "10px auto".to_string()),
                ]
            }
            Placement::Floating(position) => {
                let mut style = vec![
                    ("position", "fixed".to_string()),
                    ("z-index", "10000".to_string()),
                    ("left", "50%".to_string()),
                    ("width", "400px".to_string()),
                    ("max-width", "calc(100vw - 40px)".to_string()),
                    ("min-width", "300px".to_string()),
                    ("height", "80px".to_string()),
                    ("margin", "0".to_string()),
                    ("pointer-events", "none".to_string()),
                ];
                match position {
                    Position::Top => style.push(("top", "20px".to_string())),
                    Position::Middle => style.push(("top", "50%".to_string())),
                    Position::Bottom => style.push(("bottom", "20px".to_string())),
                }
                style
            }
        };
        style.push(("font-family", FONT_FAMILY.to_string()));
        style.push(("transition", transition_declaration(self.transition)));
        style.extend(self.frame_style(Frame::OffScreen));
        style
    }

    /// The container's `style` attribute for the mounted, off-screen state.
    pub fn container_style_attribute(&self) -> String {
        style_attribute(self.container_style())
    }

    /// The markup placed inside the container.
    pub fn inner_html(&self) -> String {
        let DisplayRequest { title, description, icon_text, palette, .. } = &self.request;
        let colors = [&palette.icon_background, &palette.background, &palette.text, &palette.shadow];
        let [icon_background, background, text, shadow] = colors.map(|color| css_value(color));
        let text_shadow = format!("0 1px 2px {shadow}");
        let box_shadow = format!("0 8px 32px {shadow}");
        let icon_shadow = format!("0 1px 3px {shadow}");
        let border = format!("2px solid {background}");
        let icon_border = format!("3px solid {background}");
        let points_label = self.points_label();

        let notification = open_div(
            "achievement-notification",
            [
                ("position", "relative"),
                ("width", "100%"),
                ("height", "100%"),
                ("background", icon_background.as_str()),
                ("border-radius", "40px"),
                ("display", "flex"),
                ("align-items", "center"),
                ("overflow", "hidden"),
                ("box-shadow", box_shadow.as_str()),
                ("border", border.as_str()),
            ],
        );
        let sweep = open_div(
            "achievement-background",
            [
                ("position", "absolute"),
                ("top", "0"),
                ("left", "0"),
                ("width", "100%"),
                ("height", "100%"),
                ("background", background.as_str()),
                ("border-radius", "38px"),
                ("transform", "scaleX(0)"),
                ("transform-origin", "left center"),
                ("animation", "expandBackground 2.5s ease-out 0.8s forwards"),
            ],
        );
        let icon = open_div(
            "achievement-icon",
            [
                ("position", "relative"),
                ("width", "60px"),
                ("height", "60px"),
                ("background", icon_background.as_str()),
                ("border-radius", "50%"),
                ("margin", "10px"),
                ("display", "flex"),
                ("align-items", "center"),
                ("justify-content", "center"),
                ("font-size", "24px"),
                ("font-weight", "bold"),
                ("color", text.as_str()),
                ("text-shadow", icon_shadow.as_str()),
                ("border", icon_border.as_str()),
                ("z-index", "2"),
                ("animation", "iconPulse 0.8s ease-out 1.2s"),
            ],
        );
        let content = open_div(
            "achievement-content",
            [
                ("position", "relative"),
                ("flex", "1"),
                ("padding", "10px 20px 10px 0"),
                ("z-index", "2"),
                ("color", text.as_str()),
            ],
        );
        let title_line = open_div(
            "achievement-title",
            [
                ("font-size", "14px"),
                ("font-weight", "600"),
                ("margin", "0 0 4px 0"),
                ("text-shadow", text_shadow.as_str()),
                ("opacity", "0"),
                ("animation", "fadeInText 0.6s ease-out 1.5s forwards"),
                ("display", display(!title.is_empty())),
            ],
        );
        let description_line = open_div(
            "achievement-description",
            [
                ("font-size", "18px"),
                ("font-weight", "bold"),
                ("margin", "0"),
                ("text-shadow", text_shadow.as_str()),
                ("opacity", "0"),
                ("animation", "fadeInText 0.6s ease-out 1.8s forwards"),
                ("display", display(!description.is_empty())),
            ],
        );
        let points = open_div(
            "achievement-points",
            [
                ("position", "absolute"),
                ("top", "50%"),
                ("right", "20px"),
                ("transform", "translateY(-50%)"),
                ("background", "rgba(255, 255, 255, 0.2)"),
                ("border-radius", "15px"),
                ("padding", "4px 12px"),
                ("font-size", "12px"),
                ("font-weight", "bold"),
                ("color", text.as_str()),
                ("text-shadow", text_shadow.as_str()),
                ("z-index", "2"),
                ("opacity", "0"),
                ("animation", "fadeInText 0.6s ease-out 2.1s forwards"),
                ("display", display(points_label.is_some())),
            ],
        );

        [
            notification,
            format!("{sweep}</div>"),
            format!("{icon}{}</div>", escape_html(icon_text)),
            content,
            format!("{title_line}{}</div>", escape_html(title)),
            format!("{description_line}{}</div>", escape_html(description)),
            "</div>".to_string(),
            format!("{points}{}</div>", points_label.as_deref().map(escape_html).unwrap_or_default()),
            "</div>".to_string(),
        ]
        .join("\n")
    }
}

fn open_div<'a>(class: &str, style: impl IntoIterator<Item = (&'a str, &'a str)>) -> String {
    format!(r#"<div class="{class}" style="{}">"#, style_attribute(style))
}

fn style_attribute<P: AsRef<str>, V: AsRef<str>>(properties: impl IntoIterator<Item = (P, V)>) -> String {
    properties.into_iter().fold(String::new(), |mut output, (property, value)| {
        let _ = write!(output, "{}: {}; ", property.as_ref(), value.as_ref());
        output
    })
}

fn display(visible: bool) -> &'static str {
    if visible { "block" } else { "none" }
}

/// A host supplied value made safe to place inside a `style` attribute: it can't end its own
/// declaration or open a new block, and it's HTML-escaped for the attribute.
pub(crate) fn css_value(value: &str) -> String {
    let value: String = value.chars().filter(|c| !matches!(c, ';' | '{' | '}' | '\\')).collect();
    escape_html(&value)
}

pub(crate) fn escape_html(text: &str) -> String {
    let mut output = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => output.push_str("&amp;"),
            '<' => output.push_str("&lt;"),
            '>' => output.push_str("&gt;"),
            '"' => output.push_str("&quot;"),
            '\'' => output.push_str("&#39;"),
            _ => output.push(c),
        }
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn badge(request: &DisplayRequest) -> Badge {
        Badge::new(request, Placement::Inline, Duration::from_millis(800))
    }

    #[rstest]
    #[case::zero(Some(0), None)]
    #[case::five(Some(5), Some("5P"))]
    #[case::missing(None, None)]
    fn points_pill(#[case] points: Option<i64>, #[case] expected: Option<&str>) {
        let mut request = DisplayRequest::new(1);
        request.points = points;
        let badge = badge(&request);
        assert_eq!(badge.points_label().as_deref(), expected);

        let html = badge.inner_html();
        let pill = html.lines().find(|line| line.contains("achievement-points")).expect("no pill");
        match expected {
            Some(label) => {
                assert!(pill.contains("display: block"));
                assert!(pill.contains(&format!(">{label}</div>")));
            }
            None => assert!(pill.contains("display: none")),
        }
    }

    #[test]
    fn title_and_description() {
        let mut request = DisplayRequest::new(1000);
        request.title = "First Win".into();
        let html = badge(&request).inner_html();
        let title = html.lines().find(|line| line.contains("achievement-title")).expect("no title");
        assert!(title.contains("display: block"));
        assert!(title.contains(">First Win</div>"));
        let description = html.lines().find(|line| line.contains("achievement-description")).expect("no description");
        assert!(description.contains("display: none"));
    }

    #[test]
    fn text_is_escaped() {
        let mut request = DisplayRequest::new(1);
        request.title = "<b>bold</b> & \"quoted\"".into();
        let html = badge(&request).inner_html();
        assert!(html.contains("&lt;b&gt;bold&lt;/b&gt; &amp; &quot;quoted&quot;"));
        assert!(!html.contains("<b>"));
    }

    #[test]
    fn colors_flow_into_markup() {
        let mut request = DisplayRequest::new(1);
        request.palette.background = "#123456".into();
        let html = badge(&request).inner_html();
        assert!(html.contains("background: #123456"));
        assert!(html.contains("#8BC34A"));
    }

    #[rstest]
    #[case::extra_declaration("red; position: fixed", "background: red position: fixed;")]
    #[case::block("red} body { display: none", "background: red body  display: none;")]
    #[case::attribute_break("red\" onclick=\"x", "background: red&quot; onclick=&quot;x;")]
    #[case::escape("red\\3b", "background: red3b;")]
    fn colors_stay_inside_their_declaration(#[case] color: &str, #[case] expected: &str) {
        let mut request = DisplayRequest::new(1);
        request.palette.background = color.into();
        let html = badge(&request).inner_html();
        let sweep = html.lines().find(|line| line.contains("achievement-background")).expect("no background");
        assert!(sweep.contains(expected), "{sweep}");
        assert!(!html.contains("; position: fixed"));
    }

    #[test]
    fn markup_is_balanced() {
        let mut request = DisplayRequest::new(1);
        request.points = Some(3);
        let html = badge(&request).inner_html();
        assert_eq!(html.matches("<div").count(), html.matches("</div>").count());
        assert!(html.starts_with(r#"<div class="achievement-notification""#));
        assert!(html.ends_with("</div>"));
    }

    #[rstest]
    #[case(true, "100%")]
    #[case(false, "400px")]
    fn inline_width(#[case] auto_width: bool, #[case] expected: &str) {
        let mut request = DisplayRequest::new(1);
        request.auto_width = auto_width;
        let style = badge(&request).container_style();
        assert!(style.contains(&("width", expected.to_string())));
    }

    #[rstest]
    #[case(Position::Top, "top", "20px")]
    #[case(Position::Middle, "top", "50%")]
    #[case(Position::Bottom, "bottom", "20px")]
    fn floating_anchor(#[case] position: Position, #[case] property: &str, #[case] value: &str) {
        let badge = Badge::new(&DisplayRequest::new(1), Placement::Floating(position), Duration::from_millis(800));
        let style = badge.container_style();
        assert!(style.contains(&("position", "fixed".to_string())));
        assert!(style.iter().any(|(p, v)| *p == property && v == value));
    }

    #[test]
    fn mounted_off_screen_with_declared_transition() {
        let badge = Badge::new(&DisplayRequest::new(1), Placement::Inline, Duration::from_millis(650));
        let attribute = badge.container_style_attribute();
        assert!(attribute.contains("transition: all 650ms ease-out;"));
        assert!(attribute.contains("opacity: 0;"));
        assert!(attribute.contains("transform: translateX(-100%);"));
    }
}
