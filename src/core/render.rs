use crate::config::toml_config::MarketConfig;
use crate::domain::model::ValuationResult;
use std::fmt::Write;
use url::Url;

pub const UNKNOWN_ESTIMATE: &str = "N/A";

pub const DISCLAIMER: &str = "Disclaimer: This tool provides market estimations based on historical \
auction data. Valuations are for informational purposes only and do not constitute a formal \
appraisal for insurance or legal purposes. Actual sales prices may vary significantly based on \
market fluctuations and buyer demand.";

/// 整數金額，千分位用空格（en-ZA）；0 或負數顯示 N/A
pub fn format_estimate(amount: f64, currency: &str) -> String {
    if !amount.is_finite() || amount <= 0.0 {
        return UNKNOWN_ESTIMATE.to_string();
    }

    let digits = format!("{:.0}", amount.round());
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(' ');
        }
        grouped.push(ch);
    }

    let symbol = match currency {
        "ZAR" => "R",
        other => other,
    };
    format!("{} {}", symbol, grouped)
}

pub fn paragraphs(analysis: &str) -> Vec<&str> {
    analysis
        .split('\n')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .collect()
}

pub fn source_host(uri: &str) -> Option<String> {
    Url::parse(uri).ok()?.host_str().map(str::to_string)
}

/// 估價區間下方的市場說明
pub fn market_note(market: &MarketConfig) -> String {
    let venue = if market.auction_houses.is_empty() {
        format!("major auction houses in {}", market.region)
    } else {
        format!(
            "major auction houses in {} ({})",
            market.region,
            market.auction_houses.join(", ")
        )
    };
    format!(
        "Estimated for {}. Calculated based on artist secondary market performance and work quality.",
        venue
    )
}

/// CLI 輸出用的純文字版本
pub fn render_text(result: &ValuationResult, market: &MarketConfig) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "Auction Estimate Range");
    let _ = writeln!(
        out,
        "  {} - {}",
        format_estimate(result.estimate_low, &result.currency),
        format_estimate(result.estimate_high, &result.currency)
    );
    let _ = writeln!(out, "  {}", market_note(market));

    let _ = writeln!(out, "\nMarket Analysis");
    for paragraph in paragraphs(&result.analysis) {
        let _ = writeln!(out, "  {}\n", paragraph);
    }

    if !result.sources.is_empty() {
        let _ = writeln!(out, "Verified Auction Sources");
        for (idx, source) in result.sources.iter().enumerate() {
            let host = source_host(&source.uri).unwrap_or_default();
            let _ = writeln!(out, "  {}. {} [{}]", idx + 1, source.title, host);
            let _ = writeln!(out, "     {}", source.uri);
        }
        out.push('\n');
    }

    out.push_str(DISCLAIMER);
    out.push('\n');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::Source;
    use chrono::Utc;

    fn sample(low: f64, high: f64, analysis: &str, sources: Vec<Source>) -> ValuationResult {
        ValuationResult {
            estimate_low: low,
            estimate_high: high,
            currency: "ZAR".to_string(),
            analysis: analysis.to_string(),
            sources,
            generated_at: Utc::now(),
        }
    }

    #[test]
    fn test_format_estimate() {
        assert_eq!(format_estimate(50000.0, "ZAR"), "R 50 000");
        assert_eq!(format_estimate(120000.0, "ZAR"), "R 120 000");
        assert_eq!(format_estimate(1234567.6, "ZAR"), "R 1 234 568");
        assert_eq!(format_estimate(950.0, "USD"), "USD 950");
        assert_eq!(format_estimate(0.0, "ZAR"), "N/A");
        assert_eq!(format_estimate(-10.0, "ZAR"), "N/A");
        assert_eq!(format_estimate(f64::NAN, "ZAR"), "N/A");
    }

    #[test]
    fn test_paragraphs() {
        assert_eq!(paragraphs("Para1\nPara2"), vec!["Para1", "Para2"]);
        assert_eq!(paragraphs("A\n\n  B  \n"), vec!["A", "B"]);
        assert!(paragraphs("").is_empty());
    }

    #[test]
    fn test_source_host() {
        assert_eq!(
            source_host("https://www.straussart.co.za/lots/12").as_deref(),
            Some("www.straussart.co.za")
        );
        assert_eq!(source_host("nonsense"), None);
    }

    #[test]
    fn test_render_full_result() {
        let result = sample(
            50000.0,
            120000.0,
            "Para1\nPara2",
            vec![Source {
                title: "Strauss & Co Lot 12".to_string(),
                uri: "https://example.com/lot12".to_string(),
            }],
        );

        let text = render_text(&result, &MarketConfig::default());

        assert!(text.contains("R 50 000 - R 120 000"));
        assert!(text.contains("  Para1\n"));
        assert!(text.contains("  Para2\n"));
        assert!(text.contains("1. Strauss & Co Lot 12 [example.com]"));
        assert!(!text.contains("2. "));
        assert!(text.ends_with(&format!("{}\n", DISCLAIMER)));
    }

    #[test]
    fn test_market_note_lists_auction_houses() {
        let text = render_text(&sample(1.0, 2.0, "", vec![]), &MarketConfig::default());
        assert!(text.contains(
            "Estimated for major auction houses in South Africa (Strauss & Co, Stephan Welz, Aspire)."
        ));

        let market = MarketConfig {
            region: "Kenya".to_string(),
            currency: "KES".to_string(),
            auction_houses: vec![],
        };
        assert!(market_note(&market).starts_with("Estimated for major auction houses in Kenya."));
    }

    #[test]
    fn test_render_unknown_estimates_without_sources() {
        let text = render_text(&sample(0.0, 0.0, "", vec![]), &MarketConfig::default());

        assert!(text.contains("N/A - N/A"));
        assert!(!text.contains("R 0"));
        assert!(!text.contains("Verified Auction Sources"));
    }
}
