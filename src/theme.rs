use ratatui::style::{Color, Modifier, Style};
use std::str::FromStr;

/// Built-in color schemes selectable with `--theme`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Theme {
    Dracula,
    Solarized,
    Gruvbox,
    EverforestLight,
}

impl Theme {
    pub fn config(self) -> ThemeConfig {
        match self {
            Theme::Dracula => dracula_theme(),
            Theme::Solarized => solarized_dark(),
            Theme::Gruvbox => gruvbox_theme(),
            Theme::EverforestLight => everforest_light_theme(),
        }
    }
}

impl FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "dracula" => Ok(Theme::Dracula),
            "solarized" | "solarized_dark" => Ok(Theme::Solarized),
            "gruvbox" => Ok(Theme::Gruvbox),
            "everforest_light" | "everforest" => Ok(Theme::EverforestLight),
            other => Err(format!(
                "unknown theme '{other}' (expected dracula, solarized, gruvbox, everforest_light)"
            )),
        }
    }
}

/// Complete theme configuration for ratatui
#[derive(Clone)]
pub struct ThemeConfig {
    pub text: Style,
    pub muted: Style,
    pub border: Style,
    pub border_selected: Style,
    pub title: Style,
    pub movie_title: Style,
    pub button: Style,
    pub button_selected: Style,
    pub notice: Style,
    pub alert_border: Style,
    pub error: Style,
}

fn build(
    bg: Color,
    panel: Color,
    fg: Color,
    dim: Color,
    accent: Color,
    highlight: Color,
    warn: Color,
) -> ThemeConfig {
    ThemeConfig {
        text: Style::default().fg(fg).bg(bg),
        muted: Style::default()
            .fg(dim)
            .bg(bg)
            .add_modifier(Modifier::ITALIC),
        border: Style::default().fg(dim),
        border_selected: Style::default().fg(accent),
        title: Style::default().fg(accent).add_modifier(Modifier::BOLD),
        movie_title: Style::default().fg(highlight).add_modifier(Modifier::BOLD),
        button: Style::default().fg(fg).bg(panel),
        button_selected: Style::default()
            .fg(bg)
            .bg(accent)
            .add_modifier(Modifier::BOLD),
        notice: Style::default()
            .fg(fg)
            .bg(panel)
            .add_modifier(Modifier::BOLD),
        alert_border: Style::default().fg(warn).add_modifier(Modifier::BOLD),
        error: Style::default().fg(warn).add_modifier(Modifier::BOLD),
    }
}

/// Returns a ThemeConfig based on the Solarized Dark color palette.
pub fn solarized_dark() -> ThemeConfig {
    let base03 = Color::Rgb(0, 43, 54);
    let base02 = Color::Rgb(7, 54, 66);
    let base01 = Color::Rgb(88, 110, 117);
    let base0 = Color::Rgb(131, 148, 150);
    let yellow = Color::Rgb(181, 137, 0);
    let red = Color::Rgb(220, 50, 47);
    let blue = Color::Rgb(38, 139, 210);

    build(base03, base02, base0, base01, blue, yellow, red)
}

/// Returns a ThemeConfig based on the Dracula color palette.
pub fn dracula_theme() -> ThemeConfig {
    let bg = Color::Rgb(40, 42, 54);
    let selection = Color::Rgb(68, 71, 90);
    let fg = Color::Rgb(248, 248, 242);
    let comment = Color::Rgb(98, 114, 164);
    let purple = Color::Rgb(189, 147, 249);
    let yellow = Color::Rgb(241, 250, 140);
    let red = Color::Rgb(255, 85, 85);

    build(bg, selection, fg, comment, purple, yellow, red)
}

/// Returns a ThemeConfig based on the Gruvbox Dark color palette.
pub fn gruvbox_theme() -> ThemeConfig {
    let bg0 = Color::Rgb(40, 40, 40);
    let bg2 = Color::Rgb(80, 73, 69);
    let fg1 = Color::Rgb(235, 219, 178);
    let gray = Color::Rgb(146, 131, 116);
    let orange = Color::Rgb(214, 93, 14);
    let yellow = Color::Rgb(215, 153, 33);
    let red = Color::Rgb(204, 36, 29);

    build(bg0, bg2, fg1, gray, orange, yellow, red)
}

/// Returns a ThemeConfig based on the Everforest Light color palette.
pub fn everforest_light_theme() -> ThemeConfig {
    let bg = Color::Rgb(253, 246, 227);
    let bg_view = Color::Rgb(243, 234, 211);
    let fg = Color::Rgb(92, 106, 114);
    let gray = Color::Rgb(147, 159, 149);
    let yellow = Color::Rgb(223, 160, 0);
    let green = Color::Rgb(141, 161, 1);
    let red = Color::Rgb(248, 85, 82);

    build(bg, bg_view, fg, gray, yellow, green, red)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_theme_names_parse() {
        assert_eq!("dracula".parse::<Theme>(), Ok(Theme::Dracula));
        assert_eq!("Gruvbox".parse::<Theme>(), Ok(Theme::Gruvbox));
        assert_eq!(
            "everforest_light".parse::<Theme>(),
            Ok(Theme::EverforestLight)
        );
        assert!("neon".parse::<Theme>().is_err());
    }
}
