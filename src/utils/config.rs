use anyhow::{Context, Result};
use serde::Deserialize;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::driver::traits::BrowserKind;
use crate::error::FixtureError;

pub const DEFAULT_BASE_URL: &str = "https://tutorialsninja.com/demo/";
pub const DEFAULT_REPORTS_DIR: &str = "reports";
pub const DEFAULT_CONFIG_FILE: &str = "storefront.yaml";

/// Video recording mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VideoMode {
    On,
    Off,
    #[default]
    RetainOnFailure,
}

impl VideoMode {
    /// Whether the context must be created with a recording directory
    pub fn records(self) -> bool {
        matches!(self, VideoMode::On | VideoMode::RetainOnFailure)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            VideoMode::On => "on",
            VideoMode::Off => "off",
            VideoMode::RetainOnFailure => "retain-on-failure",
        }
    }
}

impl FromStr for VideoMode {
    type Err = FixtureError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "on" => Ok(VideoMode::On),
            "off" => Ok(VideoMode::Off),
            "retain-on-failure" => Ok(VideoMode::RetainOnFailure),
            _ => Err(FixtureError::InvalidOption {
                option: "video",
                value: s.to_string(),
                expected: "on, off, retain-on-failure",
            }),
        }
    }
}

/// Screenshot capture mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScreenshotMode {
    On,
    Off,
    #[default]
    OnlyOnFailure,
}

impl ScreenshotMode {
    /// Whether a failed test gets a screenshot
    pub fn captures_on_failure(self) -> bool {
        matches!(self, ScreenshotMode::On | ScreenshotMode::OnlyOnFailure)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ScreenshotMode::On => "on",
            ScreenshotMode::Off => "off",
            ScreenshotMode::OnlyOnFailure => "only-on-failure",
        }
    }
}

impl FromStr for ScreenshotMode {
    type Err = FixtureError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "on" => Ok(ScreenshotMode::On),
            "off" => Ok(ScreenshotMode::Off),
            "only-on-failure" => Ok(ScreenshotMode::OnlyOnFailure),
            _ => Err(FixtureError::InvalidOption {
                option: "screenshot",
                value: s.to_string(),
                expected: "on, off, only-on-failure",
            }),
        }
    }
}

/// Action tracing mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TracingMode {
    On,
    Off,
    #[default]
    RetainOnFailure,
}

impl TracingMode {
    pub fn enabled(self) -> bool {
        matches!(self, TracingMode::On | TracingMode::RetainOnFailure)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TracingMode::On => "on",
            TracingMode::Off => "off",
            TracingMode::RetainOnFailure => "retain-on-failure",
        }
    }
}

impl FromStr for TracingMode {
    type Err = FixtureError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "on" => Ok(TracingMode::On),
            "off" => Ok(TracingMode::Off),
            "retain-on-failure" => Ok(TracingMode::RetainOnFailure),
            _ => Err(FixtureError::InvalidOption {
                option: "tracing",
                value: s.to_string(),
                expected: "on, off, retain-on-failure",
            }),
        }
    }
}

/// Options the resolver knows about
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigOption {
    Browser,
    Headed,
    BaseUrl,
    Video,
    Screenshot,
    Tracing,
}

impl ConfigOption {
    pub fn name(self) -> &'static str {
        match self {
            ConfigOption::Browser => "browser",
            ConfigOption::Headed => "headed",
            ConfigOption::BaseUrl => "base-url",
            ConfigOption::Video => "video",
            ConfigOption::Screenshot => "screenshot",
            ConfigOption::Tracing => "tracing",
        }
    }
}

/// A resolved option value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OptionValue {
    Text(String),
    Flag(bool),
}

impl OptionValue {
    pub fn as_text(&self) -> String {
        match self {
            OptionValue::Text(s) => s.clone(),
            OptionValue::Flag(b) => b.to_string(),
        }
    }
}

/// Explicit per-invocation overrides (command line)
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub browser: Option<String>,
    pub headed: Option<bool>,
    pub base_url: Option<String>,
    pub video: Option<String>,
    pub screenshot: Option<String>,
    pub tracing: Option<String>,
}

/// `headed` may be written as a YAML bool or as text
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum FlagValue {
    Bool(bool),
    Text(String),
}

impl FlagValue {
    pub fn coerce(&self) -> bool {
        match self {
            FlagValue::Bool(b) => *b,
            FlagValue::Text(s) => s.trim().eq_ignore_ascii_case("true"),
        }
    }
}

/// Store data the scenarios log in and shop with
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct StoreData {
    pub email: Option<String>,
    pub password: Option<String>,
    pub invalid_email: String,
    pub invalid_password: String,
    pub product_name: String,
    pub product_quantity: String,
    pub total_price: String,
}

impl Default for StoreData {
    fn default() -> Self {
        Self {
            email: None,
            password: None,
            invalid_email: "invalid_user@example.com".to_string(),
            invalid_password: "wrong-password".to_string(),
            product_name: "MacBook".to_string(),
            product_quantity: "2".to_string(),
            total_price: "$1,204.00".to_string(),
        }
    }
}

/// Static project defaults, read from `storefront.yaml`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct ProjectConfig {
    pub browser: Option<String>,
    pub headed: Option<FlagValue>,
    pub base_url: Option<String>,
    pub video: Option<String>,
    pub screenshot: Option<String>,
    pub tracing: Option<String>,
    pub reports_dir: Option<PathBuf>,
    pub store: StoreData,
}

impl ProjectConfig {
    /// Load the project file; a missing file yields the built-in defaults
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            log::debug!(
                "No project config at {}, using built-in defaults",
                path.display()
            );
            return Ok(Self::default());
        }

        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Self::from_yaml(&raw).with_context(|| format!("Failed to parse {}", path.display()))
    }

    pub fn from_yaml(raw: &str) -> Result<Self> {
        if raw.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(raw)?)
    }
}

/// Merges overrides over project defaults, one option at a time
pub struct ConfigResolver<'a> {
    overrides: &'a Overrides,
    defaults: &'a ProjectConfig,
}

impl<'a> ConfigResolver<'a> {
    pub fn new(overrides: &'a Overrides, defaults: &'a ProjectConfig) -> Self {
        Self {
            overrides,
            defaults,
        }
    }

    pub fn resolve(&self, option: ConfigOption) -> OptionValue {
        let o = self.overrides;
        let d = self.defaults;
        match option {
            ConfigOption::Headed => OptionValue::Flag(
                o.headed
                    .unwrap_or_else(|| d.headed.as_ref().map(FlagValue::coerce).unwrap_or(false)),
            ),
            ConfigOption::Browser => text(&o.browser, &d.browser, BrowserKind::default().as_str()),
            ConfigOption::BaseUrl => text(&o.base_url, &d.base_url, DEFAULT_BASE_URL),
            ConfigOption::Video => text(&o.video, &d.video, VideoMode::default().as_str()),
            ConfigOption::Screenshot => {
                text(&o.screenshot, &d.screenshot, ScreenshotMode::default().as_str())
            }
            ConfigOption::Tracing => text(&o.tracing, &d.tracing, TracingMode::default().as_str()),
        }
    }

    fn resolve_flag(&self, option: ConfigOption) -> bool {
        match self.resolve(option) {
            OptionValue::Flag(b) => b,
            OptionValue::Text(s) => FlagValue::Text(s).coerce(),
        }
    }
}

fn text(over: &Option<String>, default: &Option<String>, builtin: &str) -> OptionValue {
    OptionValue::Text(
        over.clone()
            .or_else(|| default.clone())
            .unwrap_or_else(|| builtin.to_string()),
    )
}

/// Fully resolved configuration for one run. Immutable once built.
#[derive(Debug, Clone)]
pub struct RunConfiguration {
    pub browser: BrowserKind,
    pub headed: bool,
    pub base_url: String,
    pub video: VideoMode,
    pub screenshot: ScreenshotMode,
    pub tracing: TracingMode,
    pub reports_dir: PathBuf,
}

impl RunConfiguration {
    /// Resolve every option, failing fast on values outside their enum
    pub fn resolve(overrides: &Overrides, defaults: &ProjectConfig) -> Result<Self> {
        let resolver = ConfigResolver::new(overrides, defaults);

        let browser: BrowserKind = resolver.resolve(ConfigOption::Browser).as_text().parse()?;
        let headed = resolver.resolve_flag(ConfigOption::Headed);
        let base_url = resolver.resolve(ConfigOption::BaseUrl).as_text();
        let video: VideoMode = resolver.resolve(ConfigOption::Video).as_text().parse()?;
        let screenshot: ScreenshotMode =
            resolver.resolve(ConfigOption::Screenshot).as_text().parse()?;
        let tracing: TracingMode = resolver.resolve(ConfigOption::Tracing).as_text().parse()?;

        Ok(Self {
            browser,
            headed,
            base_url,
            video,
            screenshot,
            tracing,
            reports_dir: defaults
                .reports_dir
                .clone()
                .unwrap_or_else(|| PathBuf::from(DEFAULT_REPORTS_DIR)),
        })
    }

    pub fn headless(&self) -> bool {
        !self.headed
    }
}

impl fmt::Display for RunConfiguration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "browser={} headed={} base_url={} video={} screenshot={} tracing={}",
            self.browser.as_str(),
            self.headed,
            self.base_url,
            self.video.as_str(),
            self.screenshot.as_str(),
            self.tracing.as_str()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_override_wins_over_project_default() {
        let project = ProjectConfig::from_yaml("browser: firefox\nvideo: off\n").unwrap();
        let overrides = Overrides {
            browser: Some("webkit".into()),
            ..Default::default()
        };

        let config = RunConfiguration::resolve(&overrides, &project).unwrap();
        assert_eq!(config.browser, BrowserKind::Webkit);
        assert_eq!(config.video, VideoMode::Off);
    }

    #[test]
    fn test_builtin_defaults_without_project_file() {
        let config =
            RunConfiguration::resolve(&Overrides::default(), &ProjectConfig::default()).unwrap();
        assert_eq!(config.browser, BrowserKind::Chromium);
        assert!(!config.headed);
        assert!(config.headless());
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.video, VideoMode::RetainOnFailure);
        assert_eq!(config.screenshot, ScreenshotMode::OnlyOnFailure);
        assert_eq!(config.tracing, TracingMode::RetainOnFailure);
        assert_eq!(config.reports_dir, PathBuf::from("reports"));
    }

    #[test]
    fn test_headed_text_default_is_coerced() {
        let project = ProjectConfig::from_yaml("headed: \"True\"\n").unwrap();
        let resolver_overrides = Overrides::default();
        let resolver = ConfigResolver::new(&resolver_overrides, &project);
        assert_eq!(resolver.resolve(ConfigOption::Headed), OptionValue::Flag(true));

        let project = ProjectConfig::from_yaml("headed: \"false\"\n").unwrap();
        let resolver = ConfigResolver::new(&resolver_overrides, &project);
        assert_eq!(resolver.resolve(ConfigOption::Headed), OptionValue::Flag(false));

        let project = ProjectConfig::from_yaml("headed: true\n").unwrap();
        let config = RunConfiguration::resolve(&resolver_overrides, &project).unwrap();
        assert!(config.headed);
    }

    #[test]
    fn test_unknown_browser_fails_fast() {
        let overrides = Overrides {
            browser: Some("unsupported-name".into()),
            ..Default::default()
        };
        let err = RunConfiguration::resolve(&overrides, &ProjectConfig::default()).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<FixtureError>(),
            Some(FixtureError::UnsupportedBrowser(name)) if name == "unsupported-name"
        ));
    }

    #[test]
    fn test_invalid_mode_is_rejected() {
        let overrides = Overrides {
            screenshot: Some("sometimes".into()),
            ..Default::default()
        };
        let err = RunConfiguration::resolve(&overrides, &ProjectConfig::default()).unwrap_err();
        assert!(err.to_string().contains("--screenshot"));
    }

    #[test]
    fn test_mode_predicates() {
        assert!(VideoMode::On.records());
        assert!(VideoMode::RetainOnFailure.records());
        assert!(!VideoMode::Off.records());
        assert!(ScreenshotMode::OnlyOnFailure.captures_on_failure());
        assert!(!ScreenshotMode::Off.captures_on_failure());
        assert!(TracingMode::On.enabled());
        assert!(!TracingMode::Off.enabled());
    }

    #[test]
    fn test_store_section_parses() {
        let project = ProjectConfig::from_yaml(
            "reports_dir: out\nstore:\n  email: a@b.c\n  password: pw\n  product_name: iPhone\n",
        )
        .unwrap();
        assert_eq!(project.reports_dir, Some(PathBuf::from("out")));
        assert_eq!(project.store.email.as_deref(), Some("a@b.c"));
        assert_eq!(project.store.product_name, "iPhone");
        assert_eq!(project.store.product_quantity, "2");
    }
}
