use std::str::FromStr;

use tuirealm::ratatui::style::Color;

/// How the user asked the theme to be chosen: a fixed preset, or whatever
/// the operating system reports at startup.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Default)]
pub enum ThemeMode {
    Light,
    Dark,
    #[default]
    System,
}

impl ThemeMode {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
            Self::System => "system",
        }
    }

    /// Resolves the mode to a concrete preset. `System` queries the OS
    /// color scheme once; a missing or failing query falls back to light.
    pub fn resolve(self) -> ThemePreset {
        match self {
            Self::Light => ThemePreset::Light,
            Self::Dark => ThemePreset::Dark,
            Self::System => system_preset(),
        }
    }
}

impl FromStr for ThemeMode {
    type Err = ();

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "light" | "day" => Ok(Self::Light),
            "dark" | "night" => Ok(Self::Dark),
            "system" | "auto" => Ok(Self::System),
            _ => Err(()),
        }
    }
}

fn system_preset() -> ThemePreset {
    match dark_light::detect() {
        Ok(dark_light::Mode::Dark) => ThemePreset::Dark,
        _ => ThemePreset::Light,
    }
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, Default)]
pub enum ThemePreset {
    #[default]
    Light,
    Dark,
}

impl ThemePreset {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }

    pub const fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }

    /// Label for the theme-toggle control, naming the preset a toggle
    /// would switch to.
    pub const fn toggle_label(self) -> &'static str {
        match self {
            Self::Light => "Switch to Dark Mode",
            Self::Dark => "Switch to Light Mode",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Theme {
    pub base: BasePalette,
    pub input: InputPalette,
    pub control: ControlPalette,
    pub interactive: InteractivePalette,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BasePalette {
    pub canvas: Color,
    pub surface: Color,
    pub text: Color,
    pub text_muted: Color,
    pub border: Color,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InputPalette {
    pub bg: Color,
    pub fg: Color,
    pub placeholder: Color,
    pub border: Color,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControlPalette {
    pub submit_bg: Color,
    pub submit_fg: Color,
    pub toggle_bg: Color,
    pub toggle_fg: Color,
    pub complete: Color,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InteractivePalette {
    pub selected_bg: Color,
    pub selected_marker: Color,
}

impl Theme {
    pub fn from_preset(preset: ThemePreset) -> Self {
        match preset {
            ThemePreset::Light => Self {
                base: BasePalette {
                    canvas: Color::Rgb(255, 255, 255),
                    surface: Color::Rgb(255, 255, 255),
                    text: Color::Rgb(51, 51, 51),
                    text_muted: Color::Rgb(119, 119, 119),
                    border: Color::Rgb(221, 221, 221),
                },
                input: InputPalette {
                    bg: Color::Rgb(255, 255, 255),
                    fg: Color::Rgb(0, 0, 0),
                    placeholder: Color::Rgb(85, 85, 85),
                    border: Color::Rgb(221, 221, 221),
                },
                control: ControlPalette {
                    submit_bg: Color::Rgb(76, 175, 80),
                    submit_fg: Color::Rgb(255, 255, 255),
                    toggle_bg: Color::Rgb(0, 123, 255),
                    toggle_fg: Color::Rgb(255, 255, 255),
                    complete: Color::Rgb(255, 82, 82),
                },
                interactive: InteractivePalette {
                    selected_bg: Color::Rgb(227, 237, 255),
                    selected_marker: Color::Rgb(0, 123, 255),
                },
            },
            ThemePreset::Dark => Self {
                base: BasePalette {
                    canvas: Color::Rgb(18, 18, 18),
                    surface: Color::Rgb(30, 30, 30),
                    text: Color::Rgb(255, 255, 255),
                    text_muted: Color::Rgb(136, 136, 136),
                    border: Color::Rgb(68, 68, 68),
                },
                input: InputPalette {
                    bg: Color::Rgb(30, 30, 30),
                    fg: Color::Rgb(255, 255, 255),
                    placeholder: Color::Rgb(136, 136, 136),
                    border: Color::Rgb(68, 68, 68),
                },
                control: ControlPalette {
                    submit_bg: Color::Rgb(76, 175, 80),
                    submit_fg: Color::Rgb(255, 255, 255),
                    toggle_bg: Color::Rgb(0, 123, 255),
                    toggle_fg: Color::Rgb(255, 255, 255),
                    complete: Color::Rgb(255, 82, 82),
                },
                interactive: InteractivePalette {
                    selected_bg: Color::Rgb(44, 44, 44),
                    selected_marker: Color::Rgb(0, 123, 255),
                },
            },
        }
    }

    /// Linear blend from `bg` toward `fg`, used for the row fade-in.
    /// Returns the full foreground when either side is not an RGB color,
    /// so non-truecolor palettes simply skip the ramp.
    pub fn fade(fg: Color, bg: Color, alpha: f32) -> Color {
        let (Color::Rgb(fr, fg_g, fb), Color::Rgb(br, bg_g, bb)) = (fg, bg) else {
            return fg;
        };
        let alpha = alpha.clamp(0.0, 1.0);
        let mix = |from: u8, to: u8| -> u8 {
            (f32::from(from) + (f32::from(to) - f32::from(from)) * alpha).round() as u8
        };
        Color::Rgb(mix(br, fr), mix(bg_g, fg_g), mix(bb, fb))
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::from_preset(ThemePreset::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_light_preset_palette() {
        let theme = Theme::from_preset(ThemePreset::Light);
        assert_eq!(theme.base.canvas, Color::Rgb(255, 255, 255));
        assert_eq!(theme.base.text, Color::Rgb(51, 51, 51));
        assert_eq!(theme.input.placeholder, Color::Rgb(85, 85, 85));
        assert_eq!(theme.control.complete, Color::Rgb(255, 82, 82));
    }

    #[test]
    fn test_dark_preset_palette() {
        let theme = Theme::from_preset(ThemePreset::Dark);
        assert_eq!(theme.base.canvas, Color::Rgb(18, 18, 18));
        assert_eq!(theme.base.surface, Color::Rgb(30, 30, 30));
        assert_eq!(theme.base.text, Color::Rgb(255, 255, 255));
        assert_eq!(theme.input.placeholder, Color::Rgb(136, 136, 136));
    }

    #[test]
    fn test_preset_toggle_round_trips() {
        assert_eq!(ThemePreset::Light.toggled(), ThemePreset::Dark);
        assert_eq!(ThemePreset::Dark.toggled(), ThemePreset::Light);
        assert_eq!(ThemePreset::Light.toggled().toggled(), ThemePreset::Light);
    }

    #[test]
    fn test_toggle_label_names_other_preset() {
        assert_eq!(ThemePreset::Light.toggle_label(), "Switch to Dark Mode");
        assert_eq!(ThemePreset::Dark.toggle_label(), "Switch to Light Mode");
    }

    #[test]
    fn test_theme_mode_parse() {
        assert_eq!(ThemeMode::from_str("light"), Ok(ThemeMode::Light));
        assert_eq!(ThemeMode::from_str("NIGHT"), Ok(ThemeMode::Dark));
        assert_eq!(ThemeMode::from_str(" system "), Ok(ThemeMode::System));
        assert_eq!(ThemeMode::from_str("auto"), Ok(ThemeMode::System));
        assert!(ThemeMode::from_str("sepia").is_err());
    }

    #[test]
    fn test_fixed_modes_resolve_without_os_query() {
        assert_eq!(ThemeMode::Light.resolve(), ThemePreset::Light);
        assert_eq!(ThemeMode::Dark.resolve(), ThemePreset::Dark);
    }

    #[test]
    fn test_fade_endpoints() {
        let fg = Color::Rgb(51, 51, 51);
        let bg = Color::Rgb(255, 255, 255);
        assert_eq!(Theme::fade(fg, bg, 0.0), bg);
        assert_eq!(Theme::fade(fg, bg, 1.0), fg);
    }

    #[test]
    fn test_fade_midpoint_is_between() {
        let mixed = Theme::fade(Color::Rgb(0, 0, 0), Color::Rgb(200, 200, 200), 0.5);
        assert_eq!(mixed, Color::Rgb(100, 100, 100));
    }

    #[test]
    fn test_fade_skips_non_rgb_colors() {
        assert_eq!(
            Theme::fade(Color::White, Color::Rgb(0, 0, 0), 0.3),
            Color::White
        );
    }
}
