//! Declarative attributes: building a ribbon from a layout's `name = value` pairs.

use std::time::Duration;

use tracing::warn;

use crate::{
    error::{Error, Result},
    render::Rgba,
    ui::{
        Colors,
        config::{AnimationType, BarStyle, Margin, RibbonConfig, SizeUnit, TextPosition},
    },
};

/// Ordered attribute list as written in a layout.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attributes {
    entries: Vec<(String, String)>,
}

impl Attributes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: &str, value: &str) -> Self {
        self.entries.push((name.to_string(), value.to_string()));
        self
    }

    /// Parses one `name = value` pair per line. Blank lines and lines starting
    /// with `//` are skipped.
    pub fn parse(source: &str) -> Result<Self> {
        let mut attrs = Self::new();
        for line in source.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with("//") {
                continue;
            }
            let (name, value) = line
                .split_once('=')
                .ok_or_else(|| Error::attribute(line, "", "a `name = value` pair"))?;
            attrs = attrs.with(name.trim(), value.trim());
        }
        Ok(attrs)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<'a> FromIterator<(&'a str, &'a str)> for Attributes {
    fn from_iter<I: IntoIterator<Item = (&'a str, &'a str)>>(iter: I) -> Self {
        iter.into_iter()
            .fold(Self::new(), |attrs, (name, value)| attrs.with(name, value))
    }
}

/// Result of reading a layout's attributes.
#[derive(Debug, Clone, PartialEq)]
pub struct Inflated {
    pub config: RibbonConfig,
    pub text: String,
    /// Keep the ribbon hidden when the layout first attaches it.
    pub do_not_show_on_attach: bool,
}

/// Reads attributes on top of the palette defaults.
///
/// A fixed margin wins over a percentage margin given for the same edge.
pub fn inflate(attrs: &Attributes, colors: &Colors, density: f32) -> Result<Inflated> {
    let mut config = RibbonConfig {
        blocks_underlying: false,
        orphan: false,
        ..RibbonConfig::themed(colors, density)
    };
    let mut text = String::new();
    let mut do_not_show_on_attach = false;
    let mut margin_top_percent = None;
    let mut margin_bottom_percent = None;
    let mut margin_top_px = None;
    let mut margin_bottom_px = None;

    for (name, value) in attrs.iter() {
        match name {
            "progress-text" => text = value.to_string(),
            "show-delay" => config.delays.show_delay = parse_millis(name, value)?,
            "hide-delay" => config.delays.hide_delay = parse_millis(name, value)?,
            "border-color" => config.border_color = parse_color(name, value)?,
            "background-color" => config.background_color = parse_color(name, value)?,
            "text-color" => config.text_color = parse_color(name, value)?,
            "indeterminate" => config.indeterminate = parse_bool(name, value)?,
            "min" => config.min = parse_u32(name, value)?,
            "max" => config.max = parse_u32(name, value)?,
            "progress" => config.progress = parse_u32(name, value)?,
            "block-underlying-views" => config.blocks_underlying = parse_bool(name, value)?,
            "bar-style" => config.bar_style = parse_bar_style(name, value)?,
            "animation-duration" => config.animation.duration = parse_millis(name, value)?,
            "animation-type" => config.animation.kind = parse_animation(name, value)?,
            "text-beside-bar" => {
                config.text_position = if parse_bool(name, value)? {
                    TextPosition::Beside
                } else {
                    TextPosition::Under
                }
            }
            "dialogue-mode" => config.dialogue_mode = parse_bool(name, value)?,
            "border-thickness" => {
                config.border_size = parse_dimension(name, value, density)?.round() as u32
            }
            "text-size" => config.text_size = parse_dimension(name, value, density)?.round(),
            "padding" => {
                let px = parse_dimension(name, value, density)?.round() as u32;
                config.padding_top = px;
                config.padding_bottom = px;
            }
            "report-progress-as-max-percent" => {
                config.report_progress_as_max_percent = parse_bool(name, value)?
            }
            "elevation" => config.elevation = parse_dimension(name, value, density)?,
            "border-radius" => {
                let raw = parse_f32(name, value)?;
                if raw != 0.0 {
                    config.border_radius = SizeUnit::Dp.to_px(raw, density);
                }
            }
            "margin-top" => {
                margin_top_px = Some(parse_dimension(name, value, density)?.round() as u32)
            }
            "margin-bottom" => {
                margin_bottom_px = Some(parse_dimension(name, value, density)?.round() as u32)
            }
            "margin-top-percent" => margin_top_percent = Some(parse_u32(name, value)?),
            "margin-bottom-percent" => margin_bottom_percent = Some(parse_u32(name, value)?),
            "do-not-show-on-attach" => do_not_show_on_attach = parse_bool(name, value)?,
            "right-to-left" => config.right_to_left = parse_bool(name, value)?,
            _ => warn!(attribute = name, "ignoring unknown ribbon attribute"),
        }
    }

    config.margin_top = pick_margin(margin_top_px, margin_top_percent);
    config.margin_bottom = pick_margin(margin_bottom_px, margin_bottom_percent);

    Ok(Inflated {
        config: config.normalized(),
        text,
        do_not_show_on_attach,
    })
}

fn pick_margin(px: Option<u32>, percent: Option<u32>) -> Margin {
    match (px, percent) {
        (Some(px), _) => Margin::Px(px),
        (None, Some(pct)) => Margin::ParentPercent(pct),
        (None, None) => Margin::default(),
    }
}

fn parse_u32(name: &str, value: &str) -> Result<u32> {
    value
        .parse()
        .map_err(|_| Error::attribute(name, value, "a non-negative integer"))
}

fn parse_f32(name: &str, value: &str) -> Result<f32> {
    value
        .parse::<f32>()
        .ok()
        .filter(|v| v.is_finite() && *v >= 0.0)
        .ok_or_else(|| Error::attribute(name, value, "a non-negative number"))
}

fn parse_millis(name: &str, value: &str) -> Result<Duration> {
    let ms = value
        .parse::<u64>()
        .map_err(|_| Error::attribute(name, value, "milliseconds"))?;
    Ok(Duration::from_millis(ms))
}

fn parse_bool(name: &str, value: &str) -> Result<bool> {
    match value {
        "true" | "1" => Ok(true),
        "false" | "0" => Ok(false),
        _ => Err(Error::attribute(name, value, "true or false")),
    }
}

fn parse_bar_style(name: &str, value: &str) -> Result<BarStyle> {
    match value {
        "circular" | "round" | "0" => Ok(BarStyle::Circular),
        "linear" | "horizontal" | "1" => Ok(BarStyle::Linear),
        _ => Err(Error::attribute(name, value, "circular or linear")),
    }
}

fn parse_animation(name: &str, value: &str) -> Result<AnimationType> {
    match value {
        "none" => Ok(AnimationType::None),
        "fade" => Ok(AnimationType::Fade),
        "scale" => Ok(AnimationType::Scale),
        "scale-fade" => Ok(AnimationType::ScaleFade),
        _ => value
            .parse::<i64>()
            .map(AnimationType::from_raw)
            .map_err(|_| Error::attribute(name, value, "none, fade, scale or scale-fade")),
    }
}

/// Parses `12dp`, `14sp`, `3px` or a bare pixel count into physical pixels.
pub fn parse_dimension(name: &str, value: &str, density: f32) -> Result<f32> {
    let (number, unit) = if let Some(n) = value.strip_suffix("dp") {
        (n, SizeUnit::Dp)
    } else if let Some(n) = value.strip_suffix("sp") {
        (n, SizeUnit::Sp)
    } else if let Some(n) = value.strip_suffix("px") {
        (n, SizeUnit::Px)
    } else {
        (value, SizeUnit::Px)
    };
    let number = number
        .trim()
        .parse::<f32>()
        .ok()
        .filter(|v| v.is_finite() && *v >= 0.0)
        .ok_or_else(|| Error::attribute(name, value, "a dimension such as 12dp, 14sp or 3px"))?;
    Ok(unit.to_px(number, density))
}

/// Parses `#RRGGBB` or `#AARRGGBB`.
pub fn parse_color(name: &str, value: &str) -> Result<Rgba> {
    let invalid = || Error::attribute(name, value, "#RRGGBB or #AARRGGBB");
    let hex = value.strip_prefix('#').ok_or_else(invalid)?;
    let raw = u32::from_str_radix(hex, 16).map_err(|_| invalid())?;
    match hex.len() {
        6 => Ok(Rgba::from_argb(0xff00_0000 | raw)),
        8 => Ok(Rgba::from_argb(raw)),
        _ => Err(invalid()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::THEME_LIGHT;

    #[test]
    fn reads_layout_source() {
        let attrs = Attributes::parse(
            "// loading ribbon\n\
             progress-text = Loading\n\
             show-delay = 250\n\
             animation-type = scale-fade\n\
             bar-style = linear\n\
             border-color = #80FF0000\n\
             padding = 8dp\n",
        )
        .unwrap();
        let inflated = inflate(&attrs, &THEME_LIGHT, 2.0).unwrap();

        assert_eq!(inflated.text, "Loading");
        assert_eq!(inflated.config.delays.show_delay, Duration::from_millis(250));
        assert_eq!(inflated.config.animation.kind, AnimationType::ScaleFade);
        assert_eq!(inflated.config.bar_style, BarStyle::Linear);
        assert_eq!(inflated.config.border_color, Rgba::new(255, 0, 0, 128));
        assert_eq!(inflated.config.padding_top, 16);
        assert!(!inflated.config.blocks_underlying);
        assert!(!inflated.do_not_show_on_attach);
    }

    #[test]
    fn fixed_margin_beats_percentage() {
        let attrs: Attributes = [
            ("margin-top-percent", "10"),
            ("margin-top", "12px"),
            ("margin-bottom-percent", "30"),
        ]
        .into_iter()
        .collect();
        let config = inflate(&attrs, &THEME_LIGHT, 1.0).unwrap().config;
        assert_eq!(config.margin_top, Margin::Px(12));
        assert_eq!(config.margin_bottom, Margin::ParentPercent(30));
    }

    #[test]
    fn malformed_values_are_errors() {
        for (name, value) in [
            ("min", "-3"),
            ("border-color", "red"),
            ("text-size", "big"),
            ("dialogue-mode", "yes"),
            ("bar-style", "triangle"),
        ] {
            let attrs = Attributes::new().with(name, value);
            let err = inflate(&attrs, &THEME_LIGHT, 1.0).unwrap_err();
            assert!(
                matches!(err, Error::Attribute { .. }),
                "{name} = {value} gave {err:?}"
            );
        }
    }

    #[test]
    fn unknown_attributes_are_ignored() {
        let attrs = Attributes::new().with("layout_width", "match_parent");
        assert!(inflate(&attrs, &THEME_LIGHT, 1.0).is_ok());
    }

    #[test]
    fn missing_separator_is_an_error() {
        assert!(Attributes::parse("show-delay 200").is_err());
    }
}
