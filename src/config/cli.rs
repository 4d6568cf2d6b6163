use crate::config::toml_config::ValuerConfig;
use crate::domain::model::ArtworkField;
use crate::utils::error::{Result, ValuationError};
use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "art-valuer")]
#[command(about = "Estimate an artwork's auction value from comparable sales")]
pub struct CliConfig {
    #[arg(long, help = "Artist name (required)")]
    pub artist: Option<String>,

    #[arg(long)]
    pub title: Option<String>,

    #[arg(long)]
    pub medium: Option<String>,

    #[arg(long)]
    pub year: Option<String>,

    #[arg(long)]
    pub dimensions: Option<String>,

    #[arg(long)]
    pub condition: Option<String>,

    #[arg(long, help = "Exhibition history, provenance or style details")]
    pub description: Option<String>,

    #[arg(long = "set", value_name = "FIELD=VALUE", help = "Set any artwork field by name")]
    pub fields: Vec<String>,

    #[arg(long, help = "Path to a TOML config file")]
    pub config: Option<PathBuf>,

    #[arg(long, help = "Overrides service.api_key and GEMINI_API_KEY")]
    pub api_key: Option<String>,

    #[arg(long)]
    pub model: Option<String>,

    #[arg(long, help = "Print the valuation as JSON")]
    pub json: bool,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON")]
    pub log_json: bool,
}

impl CliConfig {
    /// 讀取配置檔（若有），再套用命令列覆寫
    pub fn load_config(&self) -> Result<ValuerConfig> {
        let mut config = match &self.config {
            Some(path) => ValuerConfig::from_file(path)?,
            None => ValuerConfig::from_env(),
        };

        if let Some(key) = &self.api_key {
            config.service.api_key = Some(key.clone());
        }
        if let Some(model) = &self.model {
            config.service.model = model.clone();
        }
        Ok(config)
    }

    /// 依固定欄位旗標與 `--set` 產生 (欄位, 值) 清單，順序即套用順序
    pub fn field_updates(&self) -> Result<Vec<(ArtworkField, String)>> {
        let named = [
            (ArtworkField::Artist, &self.artist),
            (ArtworkField::Title, &self.title),
            (ArtworkField::Medium, &self.medium),
            (ArtworkField::Year, &self.year),
            (ArtworkField::Dimensions, &self.dimensions),
            (ArtworkField::Condition, &self.condition),
            (ArtworkField::Description, &self.description),
        ];

        let mut updates: Vec<(ArtworkField, String)> = named
            .into_iter()
            .filter_map(|(field, value)| value.clone().map(|v| (field, v)))
            .collect();

        for entry in &self.fields {
            let (name, value) = entry.split_once('=').ok_or_else(|| {
                ValuationError::validation(format!("Expected FIELD=VALUE, got '{}'", entry))
            })?;
            updates.push((name.parse()?, value.to_string()));
        }

        Ok(updates)
    }
}
