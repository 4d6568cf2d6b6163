use crate::domain::model::ArtworkData;
use crate::domain::ports::ConfigProvider;

/// 組出送給模型的提示，只包含有填寫的欄位
pub fn build_prompt<C: ConfigProvider + ?Sized>(data: &ArtworkData, config: &C) -> String {
    let details = data
        .filled_fields()
        .map(|(field, value)| format!("- {}: {}", field.label(), value.trim()))
        .collect::<Vec<_>>()
        .join("\n");

    let houses = if config.auction_houses().is_empty() {
        "major auction houses".to_string()
    } else {
        config.auction_houses().join(", ")
    };

    format!(
        "You are a specialist art market analyst for the {region} secondary market.\n\
         Estimate the current auction value of the following artwork.\n\n\
         Artwork details:\n{details}\n\n\
         Instructions:\n\
         1. Use Google Search to find real auction records and comparable sales for this artist \
         at {region} auction houses ({houses}).\n\
         2. Give a low and a high auction estimate in {currency}.\n\
         3. Write a concise market analysis covering the artist's secondary market performance, \
         comparable lots and how this work's medium, size and condition affect its value. \
         Separate paragraphs with a single newline.\n\
         4. Base every figure on the sources you found.\n\n\
         Respond with ONLY a JSON object of the form:\n\
         {{\"estimateLow\": number, \"estimateHigh\": number, \"currency\": \"{currency}\", \"analysis\": string}}\n\
         Use 0 for an estimate you cannot determine.",
        region = config.market_region(),
        details = details,
        houses = houses,
        currency = config.currency(),
    )
}
