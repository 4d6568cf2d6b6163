use crate::utils::error::ValuationError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 表單上的作品資料，除 artist 外皆可留空
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ArtworkData {
    pub artist: String,
    pub title: String,
    pub medium: String,
    pub year: String,
    pub dimensions: String,
    pub condition: String,
    pub description: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArtworkField {
    Artist,
    Title,
    Medium,
    Year,
    Dimensions,
    Condition,
    Description,
}

impl ArtworkField {
    pub const ALL: [ArtworkField; 7] = [
        ArtworkField::Artist,
        ArtworkField::Title,
        ArtworkField::Medium,
        ArtworkField::Year,
        ArtworkField::Dimensions,
        ArtworkField::Condition,
        ArtworkField::Description,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ArtworkField::Artist => "artist",
            ArtworkField::Title => "title",
            ArtworkField::Medium => "medium",
            ArtworkField::Year => "year",
            ArtworkField::Dimensions => "dimensions",
            ArtworkField::Condition => "condition",
            ArtworkField::Description => "description",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ArtworkField::Artist => "Artist Name",
            ArtworkField::Title => "Artwork Title",
            ArtworkField::Medium => "Medium",
            ArtworkField::Year => "Year",
            ArtworkField::Dimensions => "Dimensions",
            ArtworkField::Condition => "Condition",
            ArtworkField::Description => "Additional Context",
        }
    }
}

impl fmt::Display for ArtworkField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ArtworkField {
    type Err = ValuationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        ArtworkField::ALL
            .into_iter()
            .find(|field| field.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| {
                ValuationError::validation(format!(
                    "Unknown artwork field '{}'. Expected one of: {}",
                    wanted,
                    ArtworkField::ALL.map(|f| f.name()).join(", ")
                ))
            })
    }
}

impl ArtworkData {
    pub fn get(&self, field: ArtworkField) -> &str {
        match field {
            ArtworkField::Artist => &self.artist,
            ArtworkField::Title => &self.title,
            ArtworkField::Medium => &self.medium,
            ArtworkField::Year => &self.year,
            ArtworkField::Dimensions => &self.dimensions,
            ArtworkField::Condition => &self.condition,
            ArtworkField::Description => &self.description,
        }
    }

    pub fn set(&mut self, field: ArtworkField, value: impl Into<String>) {
        let slot = match field {
            ArtworkField::Artist => &mut self.artist,
            ArtworkField::Title => &mut self.title,
            ArtworkField::Medium => &mut self.medium,
            ArtworkField::Year => &mut self.year,
            ArtworkField::Dimensions => &mut self.dimensions,
            ArtworkField::Condition => &mut self.condition,
            ArtworkField::Description => &mut self.description,
        };
        *slot = value.into();
    }

    /// 依表單順序列出有填寫的欄位
    pub fn filled_fields(&self) -> impl Iterator<Item = (ArtworkField, &str)> + '_ {
        ArtworkField::ALL
            .into_iter()
            .map(move |field| (field, self.get(field)))
            .filter(|(_, value)| !value.trim().is_empty())
    }

    /// 只有空白也視為未填；原本的表單只檢查字串是否為空，這裡刻意更嚴格
    pub fn has_artist(&self) -> bool {
        !self.artist.trim().is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValuationResult {
    /// 0 表示未知
    pub estimate_low: f64,
    pub estimate_high: f64,
    pub currency: String,
    pub analysis: String,
    pub sources: Vec<Source>,
    pub generated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Source {
    pub title: String,
    pub uri: String,
}

/// 上游回傳的引用來源原始格式，欄位皆可能缺漏
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GroundingChunk {
    pub web: Option<WebChunk>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct WebChunk {
    pub uri: Option<String>,
    pub title: Option<String>,
}
