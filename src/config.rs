use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

/// Inline style applied to generated links.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct LinkStyle {
    pub color: String,
    pub text_decoration: String,
}

impl Default for LinkStyle {
    fn default() -> Self {
        Self {
            color: "#0066cc".to_string(),
            text_decoration: "underline".to_string(),
        }
    }
}

impl LinkStyle {
    /// Render as a `style` attribute value. Empty properties are left out.
    pub fn to_css(&self) -> String {
        let mut decls = Vec::new();
        if !self.color.is_empty() {
            decls.push(format!("color: {};", self.color));
        }
        if !self.text_decoration.is_empty() {
            decls.push(format!("text-decoration: {};", self.text_decoration));
        }
        decls.join(" ")
    }
}

/// Deferrals, in milliseconds.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Delays {
    /// Wait after the document is ready before the first full pass.
    pub initial_process: u64,
    /// Wait after a subtree is inserted before converting it.
    pub mutation_process: u64,
}

impl Default for Delays {
    fn default() -> Self {
        Self {
            initial_process: 500,
            mutation_process: 100,
        }
    }
}

impl Delays {
    pub fn initial(&self) -> Duration {
        Duration::from_millis(self.initial_process)
    }

    pub fn mutation(&self) -> Duration {
        Duration::from_millis(self.mutation_process)
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Token pattern. Matches are additionally required to sit on ASCII word
    /// boundaries.
    pub pattern: String,
    /// Prefix of every generated link target.
    pub base_url: String,
    /// Suffix of every generated link target.
    pub url_suffix: String,
    /// Link `title`; `{token}` is replaced by the matched token.
    pub title_template: String,
    /// Class marking elements whose text has already been converted.
    pub processed_class: String,
    /// Tags whose text content is never converted.
    pub excluded_tags: Vec<String>,
    pub link_style: LinkStyle,
    pub delays: Delays,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            pattern: "RJ[0-9]{6,}".to_string(),
            base_url: "https://www.dlsite.com/maniax/work/=/product_id/".to_string(),
            url_suffix: ".html".to_string(),
            title_template: "DLsiteで{token}を開く".to_string(),
            processed_class: "dlsite-rj-converted".to_string(),
            excluded_tags: ["a", "script", "style", "noscript"]
                .into_iter()
                .map(String::from)
                .collect(),
            link_style: LinkStyle::default(),
            delays: Delays::default(),
        }
    }
}

#[derive(Default, Clone)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    pub fn pattern(mut self, pattern: impl Into<String>) -> Self {
        self.config.pattern = pattern.into();
        self
    }

    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.config.base_url = url.into();
        self
    }

    pub fn processed_class(mut self, class: impl Into<String>) -> Self {
        self.config.processed_class = class.into();
        self
    }

    pub fn excluded_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.excluded_tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn link_style(mut self, style: LinkStyle) -> Self {
        self.config.link_style = style;
        self
    }

    pub fn delays(mut self, initial: Duration, mutation: Duration) -> Self {
        self.config.delays = Delays {
            initial_process: initial.as_millis() as u64,
            mutation_process: mutation.as_millis() as u64,
        };
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}

const CANDIDATE_NAMES: &[&str] = &[".rjlink.toml", "rjlink.toml"];

fn parse_config_str(s: &str, path: &Path) -> io::Result<Config> {
    let config = toml::from_str::<Config>(s).map_err(|e| {
        io::Error::new(
            io::ErrorKind::InvalidData,
            format!("invalid config {}: {e}", path.display()),
        )
    })?;
    // The pattern must compile.
    regex::Regex::new(&config.pattern).map_err(|e| {
        io::Error::new(
            io::ErrorKind::InvalidData,
            format!("invalid pattern in {}: {e}", path.display()),
        )
    })?;
    Ok(config)
}

fn read_config(path: &Path) -> io::Result<Config> {
    log::debug!("Reading config from: {}", path.display());
    let s = fs::read_to_string(path)?;
    let config = parse_config_str(&s, path)?;
    log::info!("Loaded config from: {}", path.display());
    Ok(config)
}

fn find_in_tree(start_dir: &Path) -> Option<PathBuf> {
    for dir in start_dir.ancestors() {
        for name in CANDIDATE_NAMES {
            let p = dir.join(name);
            if p.is_file() {
                return Some(p);
            }
        }
    }
    None
}

fn xdg_config_path() -> Option<PathBuf> {
    if let Ok(xdg) = env::var("XDG_CONFIG_HOME") {
        let p = Path::new(&xdg).join("rjlink").join("config.toml");
        if p.is_file() {
            return Some(p);
        }
    }
    let p = dirs::config_dir()?.join("rjlink").join("config.toml");
    p.is_file().then_some(p)
}

/// Load configuration with precedence:
/// 1) explicit path (error if unreadable/invalid)
/// 2) walk up from start_dir: .rjlink.toml, rjlink.toml
/// 3) XDG: $XDG_CONFIG_HOME/rjlink/config.toml or the platform config dir
/// 4) default config
pub fn load(explicit: Option<&Path>, start_dir: &Path) -> io::Result<(Config, Option<PathBuf>)> {
    if let Some(path) = explicit {
        let cfg = read_config(path)?;
        return Ok((cfg, Some(path.to_path_buf())));
    }

    if let Some(p) = find_in_tree(start_dir) {
        match read_config(&p) {
            Ok(cfg) => return Ok((cfg, Some(p))),
            Err(e) => log::warn!("Ignoring config {}: {}", p.display(), e),
        }
    }

    if let Some(p) = xdg_config_path() {
        match read_config(&p) {
            Ok(cfg) => return Ok((cfg, Some(p))),
            Err(e) => log::warn!("Ignoring config {}: {}", p.display(), e),
        }
    }

    log::debug!("No config file found, using defaults");
    Ok((Config::default(), None))
}
