use clap::ValueEnum;
use serde::Deserialize;

/// Languages available for popup labels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[value(alias = "english")]
    #[serde(alias = "english")]
    En,
    #[default]
    #[value(alias = "dutch")]
    #[serde(alias = "dutch")]
    Nl,
}

/// Static popup labels for one language
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Labels {
    pub website: &'static str,
    pub price: &'static str,
    pub free: &'static str,
    pub availability: &'static str,
}

const ENGLISH: Labels = Labels {
    website: "website",
    price: "price",
    free: "free",
    availability: "availability",
};

const DUTCH: Labels = Labels {
    website: "website",
    price: "prijs",
    free: "gratis",
    availability: "beschikbaarheid",
};

impl Language {
    pub fn labels(self) -> &'static Labels {
        match self {
            Language::En => &ENGLISH,
            Language::Nl => &DUTCH,
        }
    }

    /// Two-letter code, as sent in `accept-language`
    pub fn code(self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Nl => "nl",
        }
    }
}

/// Upper-case the first character of a label
pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels() {
        assert_eq!(Language::Nl.labels().price, "prijs");
        assert_eq!(Language::Nl.labels().availability, "beschikbaarheid");
        assert_eq!(Language::En.labels().free, "free");
        assert_eq!(Language::default(), Language::Nl);
    }

    #[test]
    fn test_language_from_config() {
        #[derive(Deserialize)]
        struct Wrapper {
            language: Language,
        }
        let w: Wrapper = toml::from_str(r#"language = "english""#).unwrap();
        assert_eq!(w.language, Language::En);
        let w: Wrapper = toml::from_str(r#"language = "nl""#).unwrap();
        assert_eq!(w.language, Language::Nl);
    }

    #[test]
    fn test_capitalize() {
        assert_eq!(capitalize("prijs"), "Prijs");
        assert_eq!(capitalize("ísland"), "Ísland");
        assert_eq!(capitalize(""), "");
    }
}
