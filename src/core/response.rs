//! Gemini `generateContent` 回應的解析與正規化。
//!
//! 上游回應形狀不固定：數字可能是字串、JSON 可能包在 markdown 區塊內、
//! 引用來源可能缺欄位。這裡一律轉成固定的 `ValuationResult`。

use crate::domain::model::{GroundingChunk, Source, ValuationResult};
use crate::utils::error::{Result, ValuationError};
use chrono::Utc;
use regex::Regex;
use serde::Deserialize;
use serde_json::Value;
use url::Url;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GenerateContentResponse {
    pub candidates: Vec<Candidate>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Candidate {
    pub content: Option<Content>,
    pub grounding_metadata: Option<GroundingMetadata>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Content {
    pub parts: Vec<Part>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Part {
    pub text: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GroundingMetadata {
    pub grounding_chunks: Vec<GroundingChunk>,
}

/// 上游錯誤回應：`{"error": {"code", "message", "status"}}`
#[derive(Debug, Deserialize)]
pub struct ErrorEnvelope {
    pub error: ErrorBody,
}

#[derive(Debug, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub status: Option<String>,
}

impl GenerateContentResponse {
    /// 第一個候選的所有文字片段
    pub fn text(&self) -> Option<String> {
        let content = self.candidates.first()?.content.as_ref()?;
        let text: String = content
            .parts
            .iter()
            .filter_map(|part| part.text.as_deref())
            .collect();
        Some(text)
    }

    pub fn grounding_chunks(&self) -> &[GroundingChunk] {
        self.candidates
            .first()
            .and_then(|c| c.grounding_metadata.as_ref())
            .map(|m| m.grounding_chunks.as_slice())
            .unwrap_or(&[])
    }
}

/// 把上游回應轉成 `ValuationResult`
pub fn parse_valuation(
    response: &GenerateContentResponse,
    default_currency: &str,
) -> Result<ValuationResult> {
    let text = response
        .text()
        .ok_or_else(|| ValuationError::parse("the service returned no candidates"))?;

    let payload = extract_json_object(&text)?;

    let estimate_low = coerce_amount(payload.get("estimateLow"));
    let estimate_high = coerce_amount(payload.get("estimateHigh"));
    if estimate_low > 0.0 && estimate_high > 0.0 && estimate_high < estimate_low {
        tracing::warn!(
            "Upstream estimate range is inverted: low={} high={}",
            estimate_low,
            estimate_high
        );
    }

    let currency = payload
        .get("currency")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(str::to_uppercase)
        .unwrap_or_else(|| default_currency.to_string());

    let analysis = payload
        .get("analysis")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();

    Ok(ValuationResult {
        estimate_low,
        estimate_high,
        currency,
        analysis,
        sources: collect_sources(response.grounding_chunks()),
        generated_at: Utc::now(),
    })
}

/// 取出文字中第一個可解析的 JSON 物件；容許 ```json 區塊或前後夾雜說明文字
fn extract_json_object(text: &str) -> Result<serde_json::Map<String, Value>> {
    for (start, _) in text.match_indices('{') {
        let mut stream = serde_json::Deserializer::from_str(&text[start..]).into_iter::<Value>();
        if let Some(Ok(Value::Object(map))) = stream.next() {
            return Ok(map);
        }
    }

    Err(ValuationError::parse("no JSON object found in the model reply"))
}

/// 金額字串：可選的貨幣前綴（R、三碼代號或符號）加上單一數字，
/// 千分位可用空格或逗號，可有小數。其他寫法一律視為無法判讀。
const AMOUNT_PATTERN: &str = r"^(?:R|[A-Z]{3}|[$€£¥])?\s*([0-9]{1,3}(?:[ ,\x{00A0}\x{202F}][0-9]{3})+|[0-9]+)(?:\.([0-9]+))?$";

fn parse_amount_str(raw: &str) -> Option<f64> {
    let re = Regex::new(AMOUNT_PATTERN).ok()?;
    let caps = re.captures(raw.trim())?;

    let mut number: String = caps[1].chars().filter(char::is_ascii_digit).collect();
    if let Some(fraction) = caps.get(2) {
        number.push('.');
        number.push_str(fraction.as_str());
    }
    number.parse().ok()
}

/// 數字或金額字串轉為非負數；缺漏或無法判讀視為 0
fn coerce_amount(value: Option<&Value>) -> f64 {
    let amount = match value {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
        Some(Value::String(s)) => parse_amount_str(s).unwrap_or(0.0),
        _ => 0.0,
    };

    if amount.is_finite() && amount > 0.0 {
        amount
    } else {
        0.0
    }
}

/// 過濾掉缺 uri 或 uri 無效的引用，保持原順序、不去重
fn collect_sources(chunks: &[GroundingChunk]) -> Vec<Source> {
    chunks
        .iter()
        .filter_map(|chunk| {
            let web = chunk.web.as_ref()?;
            let uri = web.uri.as_deref()?.trim();
            let parsed = Url::parse(uri).ok()?;
            if !matches!(parsed.scheme(), "http" | "https") || parsed.host_str().is_none() {
                tracing::debug!("Dropping citation with unusable uri: {}", uri);
                return None;
            }

            let title = match web.title.as_deref().map(str::trim) {
                Some(t) if !t.is_empty() => t.to_string(),
                _ => parsed.host_str().unwrap_or(uri).to_string(),
            };

            Some(Source {
                title,
                uri: uri.to_string(),
            })
        })
        .collect()
}
