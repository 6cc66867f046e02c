use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::mail::BODY_PREVIEW_LENGTH;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub layout: LayoutConfig,
    pub alerts: AlertConfig,
    pub theme: ThemeConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Where the `/emails` API lives
    pub base_url: String,
    /// Per-request timeout
    pub timeout_secs: u64,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Date column width in characters
    pub date_width: usize,
    /// Sender column width in characters
    pub sender_width: usize,
    /// Body characters shown in a list row before "..."
    pub preview_length: usize,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct AlertConfig {
    /// Seconds an alert stays on screen
    pub ttl_secs: u64,
    /// Banners shown at once (newest first)
    pub max_visible: usize,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log file; the terminal belongs to the UI
    pub file: String,
    /// Filter directive, overridden by RUST_LOG
    pub level: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ThemeConfig {
    pub bg: String,
    pub bg_panel: String,
    pub fg: String,
    pub fg_muted: String,

    pub border: String,
    pub border_active: String,

    pub primary: String,
    pub secondary: String,

    pub success: String,
    pub error: String,

    pub selected_bg: String,
    pub unread: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8000".to_string(),
            timeout_secs: 10,
        }
    }
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            date_width: 6,
            sender_width: 24,
            preview_length: BODY_PREVIEW_LENGTH,
        }
    }
}

impl Default for AlertConfig {
    fn default() -> Self {
        Self {
            ttl_secs: 7,
            max_visible: 3,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        let file = dirs::cache_dir()
            .map(|p| p.join("webmail-tui/webmail-tui.log"))
            .unwrap_or_else(|| PathBuf::from("~/.cache/webmail-tui/webmail-tui.log"));
        Self {
            file: file.to_string_lossy().into_owned(),
            level: "info".to_string(),
        }
    }
}

impl LoggingConfig {
    pub fn path(&self) -> PathBuf {
        PathBuf::from(shellexpand::tilde(&self.file).into_owned())
    }
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            bg: "#1a1917".to_string(),
            bg_panel: "#262422".to_string(),
            fg: "#f7f7f5".to_string(),
            fg_muted: "#8c8985".to_string(),

            border: "#524f4c".to_string(),
            border_active: "#d4a366".to_string(), // primary

            primary: "#d4a366".to_string(),
            secondary: "#8fa5ae".to_string(),

            success: "#52c41a".to_string(),
            error: "#ff4d4f".to_string(),

            selected_bg: "#393634".to_string(),
            unread: "#d4a366".to_string(),
        }
    }
}

impl Config {
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .map(|p| p.join("webmail-tui/config.toml"))
            .unwrap_or_else(|| PathBuf::from("~/.config/webmail-tui/config.toml"))
    }

    /// Missing or broken config files fall back to defaults
    pub fn load(path: Option<&Path>) -> Self {
        let config_path = path
            .map(Path::to_path_buf)
            .unwrap_or_else(Self::default_path);

        if config_path.exists() {
            match std::fs::read_to_string(&config_path) {
                Ok(content) => match Self::parse(&content) {
                    Ok(config) => return config,
                    Err(e) => eprintln!("Config parse error: {}", e),
                },
                Err(e) => eprintln!("Config read error: {}", e),
            }
        }

        Self::default()
    }

    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }
}

impl ThemeConfig {
    pub fn bg(&self) -> ratatui::style::Color {
        parse_color(&self.bg)
    }
    pub fn bg_panel(&self) -> ratatui::style::Color {
        parse_color(&self.bg_panel)
    }
    pub fn fg(&self) -> ratatui::style::Color {
        parse_color(&self.fg)
    }
    pub fn fg_muted(&self) -> ratatui::style::Color {
        parse_color(&self.fg_muted)
    }
    pub fn border(&self) -> ratatui::style::Color {
        parse_color(&self.border)
    }
    pub fn border_active(&self) -> ratatui::style::Color {
        parse_color(&self.border_active)
    }
    pub fn primary(&self) -> ratatui::style::Color {
        parse_color(&self.primary)
    }
    pub fn secondary(&self) -> ratatui::style::Color {
        parse_color(&self.secondary)
    }
    pub fn success(&self) -> ratatui::style::Color {
        parse_color(&self.success)
    }
    pub fn error(&self) -> ratatui::style::Color {
        parse_color(&self.error)
    }
    pub fn selected_bg(&self) -> ratatui::style::Color {
        parse_color(&self.selected_bg)
    }
    pub fn unread(&self) -> ratatui::style::Color {
        parse_color(&self.unread)
    }
}

/// Parse color string to ratatui Color
pub fn parse_color(s: &str) -> ratatui::style::Color {
    use ratatui::style::Color;

    if let Some(hex) = s.strip_prefix('#') {
        if hex.len() == 6 && hex.is_ascii() {
            if let (Ok(r), Ok(g), Ok(b)) = (
                u8::from_str_radix(&hex[0..2], 16),
                u8::from_str_radix(&hex[2..4], 16),
                u8::from_str_radix(&hex[4..6], 16),
            ) {
                return Color::Rgb(r, g, b);
            }
        }
    }

    match s.to_lowercase().as_str() {
        "black" => Color::Black,
        "red" => Color::Red,
        "green" => Color::Green,
        "yellow" => Color::Yellow,
        "blue" => Color::Blue,
        "magenta" => Color::Magenta,
        "cyan" => Color::Cyan,
        "gray" | "grey" => Color::Gray,
        "darkgray" | "darkgrey" => Color::DarkGray,
        _ => Color::White,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use ratatui::style::Color;

    #[test]
    fn test_partial_config() {
        let config = Config::parse(
            r#"
            [server]
            base_url = "https://mail.example.com"

            [alerts]
            ttl_secs = 3
            "#,
        )
        .unwrap();
        assert_eq!(config.server.base_url, "https://mail.example.com");
        assert_eq!(config.server.timeout_secs, 10);
        assert_eq!(config.alerts.ttl_secs, 3);
        assert_eq!(config.alerts.max_visible, 3);
        assert_eq!(config.layout.preview_length, BODY_PREVIEW_LENGTH);
    }

    #[test]
    fn test_bad_config_is_error() {
        assert!(Config::parse("[server]\ntimeout_secs = \"soon\"").is_err());
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let config = Config::load(Some(Path::new("/nonexistent/webmail-tui.toml")));
        assert_eq!(config.server.base_url, "http://127.0.0.1:8000");
    }

    #[test]
    fn test_log_path_expands_tilde() {
        let logging = LoggingConfig {
            file: "~/mail.log".to_string(),
            ..LoggingConfig::default()
        };
        let path = logging.path();
        assert!(path.ends_with("mail.log"));
        if dirs::home_dir().is_some() {
            assert!(!path.to_string_lossy().starts_with('~'));
        }
    }

    #[test]
    fn test_parse_color() {
        assert_eq!(parse_color("#ff4d4f"), Color::Rgb(0xff, 0x4d, 0x4f));
        assert_eq!(parse_color("Cyan"), Color::Cyan);
        assert_eq!(parse_color("#xyz"), Color::White);
    }
}
