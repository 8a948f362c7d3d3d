use std::io::IsTerminal;

use clap::{ValueEnum, builder::styling::Ansi256Color};
use comfy_table::Color as ComfyColor;
use crossterm::style::Color;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ColorMode {
  Always,
  Auto,
  Never,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ThemeMode {
  Dark,
  Light,
  Auto,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Theme {
  Dark,
  Light,
}

/// One color per output role.
#[derive(Debug, Clone, Copy)]
struct Palette {
  timestamp: Color,
  primary: Color,
  accent: Color,
  success: Color,
  label: Color,
  value: Color,
  muted: Color,
}

const fn rgb(r: u8, g: u8, b: u8) -> Color {
  Color::Rgb { r, g, b }
}

const DARK: Palette = Palette {
  timestamp: rgb(120, 150, 178),
  primary: rgb(152, 195, 121),
  accent: rgb(224, 108, 117),
  success: rgb(86, 182, 194),
  label: rgb(229, 192, 123),
  value: rgb(209, 154, 102),
  muted: rgb(127, 132, 142),
};

const LIGHT: Palette = Palette {
  timestamp: rgb(64, 86, 120),
  primary: rgb(56, 98, 48),
  accent: rgb(176, 48, 56),
  success: rgb(24, 112, 124),
  label: rgb(140, 96, 20),
  value: rgb(150, 80, 30),
  muted: rgb(110, 110, 110),
};

const PLAIN: Palette = Palette {
  timestamp: Color::Reset,
  primary: Color::Reset,
  accent: Color::Reset,
  success: Color::Reset,
  label: Color::Reset,
  value: Color::Reset,
  muted: Color::Reset,
};

pub struct Colors {
  palette: Palette,
}

pub trait IntoComfyColor {
  fn into_comfy(self) -> ComfyColor;
}

impl IntoComfyColor for Color {
  fn into_comfy(self) -> ComfyColor {
    match self {
      Color::Rgb { r, g, b } => ComfyColor::Rgb { r, g, b },
      Color::AnsiValue(val) => ComfyColor::AnsiValue(val),
      Color::Black => ComfyColor::Black,
      Color::DarkGrey => ComfyColor::DarkGrey,
      Color::Red => ComfyColor::Red,
      Color::DarkRed => ComfyColor::DarkRed,
      Color::Green => ComfyColor::Green,
      Color::DarkGreen => ComfyColor::DarkGreen,
      Color::Yellow => ComfyColor::Yellow,
      Color::DarkYellow => ComfyColor::DarkYellow,
      Color::Blue => ComfyColor::Blue,
      Color::DarkBlue => ComfyColor::DarkBlue,
      Color::Magenta => ComfyColor::Magenta,
      Color::DarkMagenta => ComfyColor::DarkMagenta,
      Color::Cyan => ComfyColor::Cyan,
      Color::DarkCyan => ComfyColor::DarkCyan,
      Color::White => ComfyColor::White,
      Color::Grey => ComfyColor::Grey,
      Color::Reset => ComfyColor::Reset,
    }
  }
}

impl Colors {
  pub const fn new(enabled: bool, theme: Theme) -> Self {
    let palette = match (enabled, theme) {
      (false, _) => PLAIN,
      (true, Theme::Dark) => DARK,
      (true, Theme::Light) => LIGHT,
    };
    Self { palette }
  }

  pub const fn timestamp(&self) -> Color {
    self.palette.timestamp
  }

  pub const fn primary(&self) -> Color {
    self.palette.primary
  }

  pub const fn accent(&self) -> Color {
    self.palette.accent
  }

  pub const fn success(&self) -> Color {
    self.palette.success
  }

  pub const fn label(&self) -> Color {
    self.palette.label
  }

  pub const fn value(&self) -> Color {
    self.palette.value
  }

  pub const fn muted(&self) -> Color {
    self.palette.muted
  }

  const fn to_clap(color: Color) -> Option<clap::builder::styling::Color> {
    use clap::builder::styling::{AnsiColor, Color as ClapColor, RgbColor};

    match color {
      Color::Rgb { r, g, b } => Some(ClapColor::Rgb(RgbColor(r, g, b))),
      Color::AnsiValue(val) => Some(ClapColor::Ansi256(Ansi256Color(val))),
      Color::Red | Color::DarkRed => Some(ClapColor::Ansi(AnsiColor::Red)),
      Color::Green | Color::DarkGreen => Some(ClapColor::Ansi(AnsiColor::Green)),
      Color::Yellow | Color::DarkYellow => Some(ClapColor::Ansi(AnsiColor::Yellow)),
      Color::Grey | Color::DarkGrey => Some(ClapColor::Ansi(AnsiColor::BrightBlack)),
      _ => None,
    }
  }

  pub const fn clap_styles() -> clap::builder::Styles {
    use clap::builder::styling::{Style, Styles};

    Styles::styled()
      .header(Style::new().bold().underline().fg_color(Self::to_clap(DARK.label)))
      .usage(Style::new().bold().fg_color(Self::to_clap(DARK.label)))
      .literal(Style::new().fg_color(Self::to_clap(DARK.primary)))
      .placeholder(Style::new().fg_color(Self::to_clap(DARK.muted)))
      .error(Style::new().bold().fg_color(Self::to_clap(DARK.accent)))
      .valid(Style::new().fg_color(Self::to_clap(DARK.success)))
      .invalid(Style::new().bold().fg_color(Self::to_clap(DARK.accent)))
  }
}

pub fn colors_enabled(mode: ColorMode) -> bool {
  match mode {
    ColorMode::Always => true,
    ColorMode::Never => false,
    ColorMode::Auto => std::io::stdout().is_terminal() && std::env::var_os("NO_COLOR").is_none(),
  }
}

pub fn detect_theme(mode: ThemeMode) -> Theme {
  match mode {
    ThemeMode::Dark => Theme::Dark,
    ThemeMode::Light => Theme::Light,
    ThemeMode::Auto => std::env::var("COLORFGBG")
      .ok()
      .as_deref()
      .and_then(theme_from_colorfgbg)
      .unwrap_or(Theme::Dark),
  }
}

/// `COLORFGBG` is `fg;bg` (sometimes `fg;default;bg`); background codes 8 and up are light.
fn theme_from_colorfgbg(value: &str) -> Option<Theme> {
  let bg = value.split(';').next_back()?.parse::<u8>().ok()?;
  Some(if bg >= 8 { Theme::Light } else { Theme::Dark })
}
