use anyhow::{anyhow, Context, Result};
use clap::Parser;
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::router::{self, Route};
use crate::theme::Theme;

pub const DEFAULT_API_URL: &str = "https://dragonball-api.com/api";
pub const DEFAULT_GEMINI_API_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.0-flash";

/// kiscope - Dragon Ball character browser
///
/// Terminal UI for searching the public Dragon Ball character database.
/// Configuration priority: CLI args > Environment variables > Config file > Defaults
#[derive(Parser, Debug, Default)]
#[command(name = "kiscope")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Dragon Ball character browser", long_about = None)]
pub struct CliArgs {
    /// Start on this route, e.g. /character/1 or kiscope://character/1
    pub route: Option<String>,

    /// TOML file with any of the settings below (snake_case keys)
    #[arg(short, long, env = "KISCOPE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Character database base URL
    #[arg(long, env = "KISCOPE_API_URL")]
    pub api_url: Option<String>,

    /// Characters requested per list fetch (1-1000)
    #[arg(long, env = "KISCOPE_PAGE_SIZE")]
    pub page_size: Option<u32>,

    /// HTTP request timeout in milliseconds (1000-60000)
    #[arg(long, env = "KISCOPE_HTTP_TIMEOUT_MS")]
    pub http_timeout_ms: Option<u64>,

    /// Search term run when the list screen opens (empty = whole page)
    #[arg(long, env = "KISCOPE_DEFAULT_SEARCH")]
    pub default_search: Option<String>,

    /// Fetch full records for search hits when there are at most this many (0-100)
    #[arg(long, env = "KISCOPE_EAGER_DETAIL_LIMIT")]
    pub eager_detail_limit: Option<usize>,

    /// Gemini API key (enables AI descriptions)
    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true)]
    pub gemini_api_key: Option<String>,

    /// Gemini model name
    #[arg(long, env = "KISCOPE_GEMINI_MODEL")]
    pub gemini_model: Option<String>,

    /// Gemini API base URL
    #[arg(long, env = "KISCOPE_GEMINI_API_URL")]
    pub gemini_api_url: Option<String>,

    /// BCP-47 language tag used for speech playback
    #[arg(long, env = "KISCOPE_SPEECH_LANGUAGE")]
    pub speech_language: Option<String>,

    /// Speech synthesizer program (default: say on macOS, espeak-ng elsewhere)
    #[arg(long, env = "KISCOPE_SPEECH_COMMAND")]
    pub speech_command: Option<String>,

    /// Target UI rendering FPS (1-120)
    #[arg(long, env = "KISCOPE_RENDER_FPS")]
    pub render_fps: Option<u32>,

    /// Color theme: capsule or mono
    #[arg(long, env = "KISCOPE_THEME")]
    pub theme: Option<String>,

    /// Log file path (the terminal is owned by the UI)
    #[arg(long, env = "KISCOPE_LOG_FILE")]
    pub log_file: Option<PathBuf>,
}

/// Settings accepted from the `--config` TOML file.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    pub api_url: Option<String>,
    pub page_size: Option<u32>,
    pub http_timeout_ms: Option<u64>,
    pub default_search: Option<String>,
    pub eager_detail_limit: Option<usize>,
    pub gemini_api_key: Option<String>,
    pub gemini_model: Option<String>,
    pub gemini_api_url: Option<String>,
    pub speech_language: Option<String>,
    pub speech_command: Option<String>,
    pub render_fps: Option<u32>,
    pub theme: Option<String>,
    pub log_file: Option<PathBuf>,
}

#[derive(Clone, Debug)]
pub struct Config {
    pub api_url: String,
    pub page_size: u32,
    pub http_timeout_ms: u64,
    pub default_search: String,
    pub eager_detail_limit: usize,
    pub gemini_api_key: Option<String>,
    pub gemini_model: String,
    pub gemini_api_url: String,
    pub speech_language: String,
    pub speech_command: Option<String>,
    pub render_fps: u32,
    pub theme: Theme,
    pub log_file: PathBuf,
    pub start_route: Route,
}

/// Validate that a value is within a given range (inclusive)
fn validate_in_range<T>(val: T, min: T, max: T, name: &str) -> Result<T>
where
    T: PartialOrd + std::fmt::Display + Copy,
{
    if val < min || val > max {
        Err(anyhow!("{name} must be in range [{min}, {max}], got {val}"))
    } else {
        Ok(val)
    }
}

/// Validate URL format (basic check)
fn validate_url(url: &str, name: &str) -> Result<()> {
    if url.is_empty() {
        return Err(anyhow!("{name} cannot be empty"));
    }
    if url.starts_with("http://") || url.starts_with("https://") {
        Ok(())
    } else {
        Err(anyhow!("{name} must start with http:// or https://"))
    }
}

pub fn read_config_file(path: &Path) -> Result<ConfigFile> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file {}", path.display()))?;
    toml::from_str(&raw).with_context(|| format!("Invalid config file {}", path.display()))
}

/// Load configuration from CLI args, environment variables and the optional config file
pub fn load() -> Result<Config> {
    let args = CliArgs::parse();
    let file = match &args.config {
        Some(path) => read_config_file(path)?,
        None => ConfigFile::default(),
    };
    resolve(args, file)
}

/// Merge CLI/env values over file values over defaults, then validate.
pub fn resolve(args: CliArgs, file: ConfigFile) -> Result<Config> {
    let api_url = args
        .api_url
        .or(file.api_url)
        .unwrap_or_else(|| DEFAULT_API_URL.to_string());
    validate_url(&api_url, "KISCOPE_API_URL")?;

    let gemini_api_url = args
        .gemini_api_url
        .or(file.gemini_api_url)
        .unwrap_or_else(|| DEFAULT_GEMINI_API_URL.to_string());
    validate_url(&gemini_api_url, "KISCOPE_GEMINI_API_URL")?;

    let page_size = args.page_size.or(file.page_size).unwrap_or(100);
    let page_size = validate_in_range(page_size, 1, 1000, "KISCOPE_PAGE_SIZE")?;

    let http_timeout_ms = args.http_timeout_ms.or(file.http_timeout_ms).unwrap_or(10_000);
    let http_timeout_ms =
        validate_in_range(http_timeout_ms, 1000, 60_000, "KISCOPE_HTTP_TIMEOUT_MS")?;

    let eager_detail_limit = args.eager_detail_limit.or(file.eager_detail_limit).unwrap_or(20);
    let eager_detail_limit =
        validate_in_range(eager_detail_limit, 0, 100, "KISCOPE_EAGER_DETAIL_LIMIT")?;
    // Never fan out past what one page can hold
    let eager_detail_limit = eager_detail_limit.min(page_size as usize);

    let render_fps = args.render_fps.or(file.render_fps).unwrap_or(30);
    let render_fps = validate_in_range(render_fps, 1, 120, "KISCOPE_RENDER_FPS")?;

    let theme = match args.theme.or(file.theme) {
        Some(name) => name.parse::<Theme>().map_err(|e| anyhow!(e))?,
        None => Theme::default(),
    };

    let start_route = match args.route {
        Some(raw) => router::parse(&raw).ok_or_else(|| anyhow!("Unrecognized route '{raw}'"))?,
        None => Route::List,
    };

    // Blank keys count as missing so `.env` placeholders don't enable the feature
    let gemini_api_key = args
        .gemini_api_key
        .or(file.gemini_api_key)
        .filter(|k| !k.trim().is_empty());

    Ok(Config {
        api_url,
        page_size,
        http_timeout_ms,
        default_search: args
            .default_search
            .or(file.default_search)
            .unwrap_or_else(|| "Goku".to_string()),
        eager_detail_limit,
        gemini_api_key,
        gemini_model: args
            .gemini_model
            .or(file.gemini_model)
            .unwrap_or_else(|| DEFAULT_GEMINI_MODEL.to_string()),
        gemini_api_url,
        speech_language: args
            .speech_language
            .or(file.speech_language)
            .unwrap_or_else(|| "es-ES".to_string()),
        speech_command: args.speech_command.or(file.speech_command),
        render_fps,
        theme,
        log_file: args
            .log_file
            .or(file.log_file)
            .unwrap_or_else(|| PathBuf::from("kiscope.log")),
        start_route,
    })
}

impl Config {
    /// Log the effective configuration (the API key is never printed)
    pub fn log_summary(&self) {
        log::info!("kiscope configuration:");
        log::info!("  API URL: {}", self.api_url);
        log::info!("  Page size: {}", self.page_size);
        log::info!("  HTTP timeout: {}ms", self.http_timeout_ms);
        log::info!("  Default search: {:?}", self.default_search);
        log::info!("  Eager detail limit: {}", self.eager_detail_limit);
        if self.gemini_api_key.is_some() {
            log::info!("  Gemini: configured ({})", self.gemini_model);
        } else {
            log::info!("  Gemini: not configured");
        }
        log::info!("  Speech language: {}", self.speech_language);
        log::info!("  Theme: {}", self.theme);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_when_nothing_is_set() {
        let cfg = resolve(CliArgs::default(), ConfigFile::default()).unwrap();
        assert_eq!(cfg.api_url, DEFAULT_API_URL);
        assert_eq!(cfg.page_size, 100);
        assert_eq!(cfg.default_search, "Goku");
        assert_eq!(cfg.eager_detail_limit, 20);
        assert_eq!(cfg.speech_language, "es-ES");
        assert_eq!(cfg.start_route, Route::List);
        assert!(cfg.gemini_api_key.is_none());
    }

    #[test]
    fn cli_beats_file() {
        let args = CliArgs {
            page_size: Some(50),
            ..Default::default()
        };
        let file: ConfigFile = toml::from_str(
            r#"
            page_size = 10
            default_search = "Vegeta"
            theme = "mono"
            "#,
        )
        .unwrap();
        let cfg = resolve(args, file).unwrap();
        assert_eq!(cfg.page_size, 50);
        assert_eq!(cfg.default_search, "Vegeta");
        assert_eq!(cfg.theme, Theme::Mono);
    }

    #[test]
    fn eager_limit_never_exceeds_page_size() {
        let args = CliArgs {
            page_size: Some(5),
            eager_detail_limit: Some(50),
            ..Default::default()
        };
        let cfg = resolve(args, ConfigFile::default()).unwrap();
        assert_eq!(cfg.eager_detail_limit, 5);
    }

    #[test]
    fn rejects_bad_values() {
        let bad_url = CliArgs {
            api_url: Some("ftp://example.com".into()),
            ..Default::default()
        };
        assert!(resolve(bad_url, ConfigFile::default()).is_err());

        let bad_size = CliArgs {
            page_size: Some(0),
            ..Default::default()
        };
        assert!(resolve(bad_size, ConfigFile::default()).is_err());

        let bad_route = CliArgs {
            route: Some("/planets/3".into()),
            ..Default::default()
        };
        assert!(resolve(bad_route, ConfigFile::default()).is_err());

        assert!(toml::from_str::<ConfigFile>("colour = \"red\"").is_err());
    }

    #[test]
    fn blank_key_counts_as_missing() {
        let args = CliArgs {
            gemini_api_key: Some("  ".into()),
            route: Some("/character/4".into()),
            ..Default::default()
        };
        let cfg = resolve(args, ConfigFile::default()).unwrap();
        assert!(cfg.gemini_api_key.is_none());
        assert_eq!(cfg.start_route, Route::Character { id: 4 });
    }
}
