use serde::{Deserialize, Serialize};

/// One catalog entry, as parsed from a single CSV data row.
///
/// Every attribute is a plain `String`, empty when the source row or the
/// source schema omitted it. Downstream code never sees an absent field.
/// Serde names match the spreadsheet header cells so the serialized payload
/// is identical to what the sheet exports.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Scent {
    #[serde(rename = "ID")]
    pub id: String,
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Family")]
    pub family: String,
    #[serde(rename = "Short Description")]
    pub short_description: String,
    #[serde(rename = "Top Notes")]
    pub top_notes: String,
    #[serde(rename = "Heart Notes")]
    pub heart_notes: String,
    #[serde(rename = "Base Notes")]
    pub base_notes: String,
    #[serde(rename = "Key Ingredients")]
    pub key_ingredients: String,
    #[serde(rename = "Origin Country")]
    pub origin_country: String,
    #[serde(rename = "Status")]
    pub status: String,
    #[serde(rename = "Notes")]
    pub notes: String,
    #[serde(rename = "Price 500ml")]
    pub price_500ml: String,
    #[serde(rename = "Price 150ml")]
    pub price_150ml: String,
    #[serde(rename = "Price 60ml")]
    pub price_60ml: String,
}

/// Split a semicolon-delimited list field into trimmed non-empty tokens.
pub fn split_notes(s: &str) -> Vec<&str> {
    s.split(';').map(str::trim).filter(|t| !t.is_empty()).collect()
}

/// Format a price cell as whole-dollar USD with thousands separators.
///
/// Empty cells render the `—` placeholder; non-numeric cells pass through
/// unchanged so sheet annotations like "TBD" stay visible.
pub fn format_usd(value: &str) -> String {
    let raw = value.trim();
    if raw.is_empty() {
        return "—".to_string();
    }
    let Ok(number) = raw.parse::<f64>() else {
        return value.to_string();
    };
    let rounded = number.round() as i64;
    let digits = rounded.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if rounded < 0 {
        format!("-${}", grouped)
    } else {
        format!("${}", grouped)
    }
}
