pub mod settings;

pub use settings::Settings;

#[cfg(feature = "cli")]
use clap::Parser;
#[cfg(feature = "cli")]
use std::path::PathBuf;

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "vehicle-models-api")]
#[command(about = "HTTP API for vehicle model listings and discontinuation analysis")]
pub struct CliConfig {
    /// TOML settings file; values may reference ${ENV_VARS}
    #[arg(long, short = 'c')]
    pub config: Option<PathBuf>,

    #[arg(long)]
    pub host: Option<String>,

    #[arg(long)]
    pub port: Option<u16>,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON")]
    pub json_logs: bool,
}

#[cfg(feature = "cli")]
impl CliConfig {
    /// 預設值 < 設定檔 < 環境變數 < 命令列參數
    pub fn load_settings(&self) -> crate::utils::error::Result<Settings> {
        let mut settings = match &self.config {
            Some(path) => Settings::from_file(path)?,
            None => Settings::default(),
        };

        settings.apply_env()?;

        if let Some(host) = &self.host {
            settings.host = host.clone();
        }
        if let Some(port) = self.port {
            settings.port = port;
        }

        Ok(settings)
    }
}
