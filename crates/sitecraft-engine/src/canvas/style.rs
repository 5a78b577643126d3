use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Display {
    #[default]
    Block,
    Flex,
    Grid,
    Inline,
    InlineBlock,
    None,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Overflow {
    Visible,
    Hidden,
    Scroll,
    Auto,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Position {
    Static,
    Relative,
    Absolute,
    Fixed,
    Sticky,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TextAlign {
    Left,
    Center,
    Right,
    Justify,
}

macro_rules! css_keyword {
    ($($ty:ident { $($variant:ident => $css:literal),+ $(,)? })+) => {
        $(
            impl $ty {
                pub fn as_css(self) -> &'static str {
                    match self {
                        $($ty::$variant => $css,)+
                    }
                }
            }
        )+
    };
}

css_keyword! {
    Display { Block => "block", Flex => "flex", Grid => "grid", Inline => "inline", InlineBlock => "inline-block", None => "none" }
    Overflow { Visible => "visible", Hidden => "hidden", Scroll => "scroll", Auto => "auto" }
    Position { Static => "static", Relative => "relative", Absolute => "absolute", Fixed => "fixed", Sticky => "sticky" }
    TextAlign { Left => "left", Center => "center", Right => "right", Justify => "justify" }
}

/// Sparse presentation overrides for one node.
///
/// `None` means "inherit the default". Lengths in pixels are plain numbers;
/// sizes such as `width` take any CSS length string.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct StyleOverride {
    pub display: Option<Display>,

    pub margin_top: Option<i32>,
    pub margin_right: Option<i32>,
    pub margin_bottom: Option<i32>,
    pub margin_left: Option<i32>,
    pub padding_top: Option<u32>,
    pub padding_right: Option<u32>,
    pub padding_bottom: Option<u32>,
    pub padding_left: Option<u32>,

    pub width: Option<String>,
    pub height: Option<String>,
    pub min_width: Option<String>,
    pub min_height: Option<String>,
    pub max_width: Option<String>,
    pub max_height: Option<String>,

    pub overflow: Option<Overflow>,
    pub position: Option<Position>,

    pub font_family: Option<String>,
    pub font_size: Option<u32>,
    pub font_weight: Option<u16>,
    pub line_height: Option<String>,
    pub letter_spacing: Option<String>,
    pub text_align: Option<TextAlign>,
    pub color: Option<String>,
    pub background_color: Option<String>,

    pub border_width: Option<u32>,
    pub border_style: Option<String>,
    pub border_color: Option<String>,
    pub border_radius: Option<u32>,

    pub opacity: Option<f32>,
    pub mix_blend_mode: Option<String>,
    pub cursor: Option<String>,
}

impl StyleOverride {
    /// Overlays every property set in `other`; unset properties are kept.
    pub fn merge(&mut self, other: StyleOverride) {
        macro_rules! overlay {
            ($($field:ident),+ $(,)?) => {
                $(
                    if other.$field.is_some() {
                        self.$field = other.$field;
                    }
                )+
            };
        }
        overlay!(
            display, margin_top, margin_right, margin_bottom, margin_left,
            padding_top, padding_right, padding_bottom, padding_left,
            width, height, min_width, min_height, max_width, max_height,
            overflow, position,
            font_family, font_size, font_weight, line_height, letter_spacing, text_align,
            color, background_color,
            border_width, border_style, border_color, border_radius,
            opacity, mix_blend_mode, cursor,
        );
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// The effective style: this override on top of the defaults.
    pub fn resolve(&self) -> ResolvedStyle {
        ResolvedStyle {
            display: self.display.unwrap_or_default(),
            margin: [
                self.margin_top.unwrap_or(0),
                self.margin_right.unwrap_or(0),
                self.margin_bottom.unwrap_or(0),
                self.margin_left.unwrap_or(0),
            ],
            padding: [
                self.padding_top.unwrap_or(0),
                self.padding_right.unwrap_or(0),
                self.padding_bottom.unwrap_or(0),
                self.padding_left.unwrap_or(0),
            ],
            width: self.width.clone().unwrap_or_else(|| AUTO.to_string()),
            height: self.height.clone().unwrap_or_else(|| AUTO.to_string()),
            min_width: self.min_width.clone().unwrap_or_else(|| MIN_NONE.to_string()),
            min_height: self.min_height.clone().unwrap_or_else(|| MIN_NONE.to_string()),
            max_width: self.max_width.clone().unwrap_or_else(|| MAX_NONE.to_string()),
            max_height: self.max_height.clone().unwrap_or_else(|| MAX_NONE.to_string()),
            extra: self.clone(),
        }
    }
}

const AUTO: &str = "auto";
const MIN_NONE: &str = "0";
const MAX_NONE: &str = "none";

const EDGES: [&str; 4] = ["top", "right", "bottom", "left"];

/// Box properties with defaults filled in; the remaining properties stay
/// optional in `extra`.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedStyle {
    pub display: Display,
    /// Top, right, bottom, left.
    pub margin: [i32; 4],
    pub padding: [u32; 4],
    pub width: String,
    pub height: String,
    pub min_width: String,
    pub min_height: String,
    pub max_width: String,
    pub max_height: String,
    extra: StyleOverride,
}

impl ResolvedStyle {
    /// CSS declarations for this style, omitting values equal to the default
    /// apart from `display`.
    pub fn css_declarations(&self) -> Vec<(String, String)> {
        let mut out = vec![("display".to_string(), self.display.as_css().to_string())];
        let mut push = |name: &str, value: String| out.push((name.to_string(), value));

        for (edge, value) in EDGES.iter().zip(self.margin) {
            if value != 0 {
                push(&format!("margin-{edge}"), format!("{value}px"));
            }
        }
        for (edge, value) in EDGES.iter().zip(self.padding) {
            if value != 0 {
                push(&format!("padding-{edge}"), format!("{value}px"));
            }
        }

        let sizes = [
            ("width", &self.width, AUTO),
            ("height", &self.height, AUTO),
            ("min-width", &self.min_width, MIN_NONE),
            ("min-height", &self.min_height, MIN_NONE),
            ("max-width", &self.max_width, MAX_NONE),
            ("max-height", &self.max_height, MAX_NONE),
        ];
        for (name, value, default) in sizes {
            if value != default {
                push(name, value.clone());
            }
        }

        let e = &self.extra;
        if let Some(v) = e.overflow {
            push("overflow", v.as_css().to_string());
        }
        if let Some(v) = e.position {
            push("position", v.as_css().to_string());
        }
        if let Some(v) = &e.font_family {
            push("font-family", v.clone());
        }
        if let Some(v) = e.font_size {
            push("font-size", format!("{v}px"));
        }
        if let Some(v) = e.font_weight {
            push("font-weight", v.to_string());
        }
        if let Some(v) = &e.line_height {
            push("line-height", v.clone());
        }
        if let Some(v) = &e.letter_spacing {
            push("letter-spacing", v.clone());
        }
        if let Some(v) = e.text_align {
            push("text-align", v.as_css().to_string());
        }
        if let Some(v) = &e.color {
            push("color", v.clone());
        }
        if let Some(v) = &e.background_color {
            push("background-color", v.clone());
        }
        if let Some(v) = e.border_width {
            push("border-width", format!("{v}px"));
        }
        if let Some(v) = &e.border_style {
            push("border-style", v.clone());
        }
        if let Some(v) = &e.border_color {
            push("border-color", v.clone());
        }
        if let Some(v) = e.border_radius {
            push("border-radius", format!("{v}px"));
        }
        if let Some(v) = e.opacity {
            push("opacity", v.to_string());
        }
        if let Some(v) = &e.mix_blend_mode {
            push("mix-blend-mode", v.clone());
        }
        if let Some(v) = &e.cursor {
            push("cursor", v.clone());
        }

        out
    }
}
