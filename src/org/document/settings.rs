//! Document-local settings from `#+KEY: value` lines

use std::collections::BTreeMap;

/// Keyword values collected while parsing. A repeated key appends its value on a
/// new line instead of replacing the earlier one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BufferSettings {
    values: BTreeMap<String, String>,
}

impl BufferSettings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: &str, value: &str) {
        self.values
            .entry(key.to_string())
            .and_modify(|existing| {
                existing.push('\n');
                existing.push_str(value);
            })
            .or_insert_with(|| value.to_string());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// Value of `key` inside an `OPTIONS` string such as `"toc:t e:nil"`.
///
/// The last occurrence wins so that later `#+OPTIONS:` lines override defaults
/// they were appended to.
pub fn option_value<'a>(options: &'a str, key: &str) -> Option<&'a str> {
    options
        .split_whitespace()
        .filter_map(|field| field.split_once(':'))
        .filter(|(k, _)| *k == key)
        .map(|(_, v)| v)
        .last()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repeated_keys_append() {
        let mut settings = BufferSettings::new();
        settings.insert("HTML", "<div>");
        settings.insert("HTML", "</div>");
        settings.insert("TITLE", "T");
        assert_eq!(settings.get("HTML"), Some("<div>\n</div>"));
        assert_eq!(settings.get("TITLE"), Some("T"));
        assert_eq!(settings.get("AUTHOR"), None);
    }

    #[test]
    fn test_option_value() {
        let options = "toc:t e:t f:t\ntoc:nil";
        assert_eq!(option_value(options, "toc"), Some("nil"));
        assert_eq!(option_value(options, "e"), Some("t"));
        assert_eq!(option_value(options, "todo"), None);
    }
}
