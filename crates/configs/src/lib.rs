use anyhow::anyhow;
use anyhow::Result;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub booking: BookingSection,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    #[serde(default)]
    pub worker_threads: Option<usize>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { host: "127.0.0.1".into(), port: 8080, worker_threads: Some(4) }
    }
}

/// Where the document collections and the static booking page live.
#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
    #[serde(default = "default_menu_file")]
    pub menu_file: String,
    #[serde(default = "default_frontend_dir")]
    pub frontend_dir: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            menu_file: default_menu_file(),
            frontend_dir: default_frontend_dir(),
        }
    }
}

fn default_data_dir() -> String { "data".into() }
fn default_menu_file() -> String { "menu_items.json".into() }
fn default_frontend_dir() -> String { "frontend".into() }

impl StoreConfig {
    pub fn menu_path(&self) -> std::path::PathBuf {
        std::path::Path::new(&self.data_dir).join(&self.menu_file)
    }
}

/// Booking widget settings, mirroring the form's data attributes.
///
/// `availability` selects the capacity lookup source: `"off"`, `"sheet"`
/// (requires `sheetdb`) or `"api"` (search the primary `api` URL).
#[derive(Debug, Clone, Deserialize)]
pub struct BookingSection {
    #[serde(default)]
    pub api: String,
    #[serde(default)]
    pub sheetdb: String,
    #[serde(default = "default_availability")]
    pub availability: String,
    #[serde(default = "default_max_tables")]
    pub max_tables: i64,
    #[serde(default = "default_open_hour")]
    pub open_hour: i64,
    #[serde(default = "default_close_hour")]
    pub close_hour: i64,
    #[serde(default)]
    pub action: Option<String>,
    #[serde(default)]
    pub origin: Option<String>,
}

impl Default for BookingSection {
    fn default() -> Self {
        Self {
            api: String::new(),
            sheetdb: String::new(),
            availability: default_availability(),
            max_tables: default_max_tables(),
            open_hour: default_open_hour(),
            close_hour: default_close_hour(),
            action: None,
            origin: None,
        }
    }
}

fn default_availability() -> String { "off".into() }
fn default_max_tables() -> i64 { 12 }
fn default_open_hour() -> i64 { 18 }
fn default_close_hour() -> i64 { 23 }

pub fn load_default() -> Result<AppConfig> {
    let path = std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
    load_from_file(&path)
}

pub fn load_from_file(path: &str) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path)?;
    parse(&content)
}

pub fn parse(content: &str) -> Result<AppConfig> {
    let cfg: AppConfig = toml::from_str(content)?;
    Ok(cfg)
}

impl AppConfig {
    pub fn load_and_validate() -> Result<Self> {
        let mut cfg = load_default()?;
        cfg.normalize_and_validate()?;
        Ok(cfg)
    }

    pub fn normalize_and_validate(&mut self) -> Result<()> {
        self.server.normalize()?;
        self.store.normalize();
        self.booking.validate()?;
        Ok(())
    }
}

impl ServerConfig {
    fn normalize(&mut self) -> Result<()> {
        if self.host.trim().is_empty() {
            self.host = "127.0.0.1".to_string();
        }
        if self.port == 0 {
            return Err(anyhow!("server.port must be within 1..=65535"));
        }
        match self.worker_threads {
            Some(w) if w > 0 => {}
            _ => self.worker_threads = Some(4),
        }
        Ok(())
    }
}

impl StoreConfig {
    fn normalize(&mut self) {
        if self.data_dir.trim().is_empty() {
            self.data_dir = default_data_dir();
        }
        if self.menu_file.trim().is_empty() {
            self.menu_file = default_menu_file();
        }
        if self.frontend_dir.trim().is_empty() {
            self.frontend_dir = default_frontend_dir();
        }
    }
}

impl BookingSection {
    pub fn validate(&self) -> Result<()> {
        for (key, hour) in [("open_hour", self.open_hour), ("close_hour", self.close_hour)] {
            if !(0..=24).contains(&hour) {
                return Err(anyhow!("booking.{key} must be within 0..=24"));
            }
        }
        match self.availability.as_str() {
            "off" | "api" => Ok(()),
            "sheet" if !self.sheetdb.trim().is_empty() => Ok(()),
            "sheet" => Err(anyhow!("booking.availability = \"sheet\" requires booking.sheetdb")),
            other => Err(anyhow!("booking.availability must be off, sheet or api (got {other:?})")),
        }
    }
}
