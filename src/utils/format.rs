//! Display formatting for feature names and values

/// Abbreviations expanded or corrected after title-casing
const ABBREVIATIONS: [(&str, &str); 3] = [
    ("Erc20", "ERC20"),
    ("Tnxs", "Transactions"),
    ("Tnx", "Transactions"),
];

/// Turn a schema feature name into a dashboard label.
///
/// Underscores become spaces, each word starts upper-case, and known
/// abbreviations are fixed up: `"ERC20_most_rec_token_type"` becomes
/// `"ERC20 Most Rec Token Type"`.
pub fn format_feature_name(name: &str) -> String {
    let spaced = name.replace('_', " ");
    let mut titled = String::with_capacity(spaced.len());
    let mut in_word = false;

    for ch in spaced.chars() {
        let is_word = ch.is_alphanumeric();
        if is_word && !in_word {
            titled.extend(ch.to_uppercase());
        } else {
            titled.push(ch);
        }
        in_word = is_word;
    }

    ABBREVIATIONS
        .iter()
        .fold(titled, |acc, (from, to)| acc.replace(from, to))
}

/// Format a raw feature value for display, picking the unit from the key
pub fn format_feature_value(key: &str, value: f64) -> String {
    if key.contains("ratio") || key.contains("Ratio") {
        return format!("{:.3}", value);
    }
    if key.contains("time") || key.contains("Time") || key.contains("Mins") {
        return format!("{:.1}h", value / 60.0);
    }
    if key.contains("Ether") || key.contains("ether") || key.contains("val") {
        return if value > 1000.0 {
            format!("{:.1}K", value / 1000.0)
        } else {
            format!("{:.2}", value)
        };
    }
    format!("{}", value.round() as i64)
}

/// Probability as a percentage with one decimal, e.g. `83.2%`
pub fn format_probability(probability: f64) -> String {
    format!("{:.1}%", probability * 100.0)
}
