//! Special-case recognizers that answer before any lookup
//!
//! Gibberish, pronunciation requests and weather questions are detected here
//! with literal keyword matching.

use regex::Regex;
use std::sync::OnceLock;

/// Outcome of inspecting a question for a weather request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WeatherQuery {
    /// No weather keyword present
    NotWeather,
    /// Weather keyword present but no "weather in <city>" pattern
    MissingCity,
    /// City extracted from the question (lowercase)
    City(String),
}

fn weather_city_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"weather in (\w+)").expect("weather pattern is valid"))
}

/// True when the text is too short or mostly non-alphabetic.
///
/// "Mostly" means the non-alphabetic character count exceeds half the total
/// (integer division), whitespace included.
pub fn is_gibberish(text: &str) -> bool {
    let total = text.chars().count();
    if total < 2 {
        return true;
    }
    let non_alpha = text.chars().filter(|c| !c.is_alphabetic()).count();
    non_alpha > total / 2
}

/// True when the text asks how to pronounce something
pub fn is_pronunciation_request(text: &str) -> bool {
    text.to_lowercase().contains("pronounce")
}

/// The word to pronounce: the question with "pronounce" and "how to" removed
pub fn pronunciation_target(text: &str) -> String {
    text.to_lowercase()
        .replace("pronounce", "")
        .replace("how to", "")
        .trim()
        .to_string()
}

/// Detect a weather question and pull out its city
pub fn extract_weather_city(text: &str) -> WeatherQuery {
    let lowered = text.to_lowercase();
    if !lowered.contains("weather") {
        return WeatherQuery::NotWeather;
    }

    match weather_city_pattern().captures(&lowered) {
        Some(caps) => WeatherQuery::City(caps[1].to_string()),
        None => WeatherQuery::MissingCity,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quickcheck_macros::quickcheck;

    #[test]
    fn test_short_text_is_gibberish() {
        assert!(is_gibberish(""));
        assert!(is_gibberish("a"));
        assert!(!is_gibberish("hi"));
    }

    #[test]
    fn test_mostly_symbols_is_gibberish() {
        assert!(is_gibberish("?!?!a"));
        assert!(is_gibberish("12345 abc"));
        assert!(!is_gibberish("what is rust"));
    }

    #[test]
    fn test_exactly_half_is_not_gibberish() {
        // 2 of 4 non-alphabetic: not more than half
        assert!(!is_gibberish("ab12"));
        assert!(is_gibberish("ab123"));
    }

    #[test]
    fn test_non_ascii_letters_count_as_alphabetic() {
        assert!(!is_gibberish("école"));
    }

    #[test]
    fn test_pronunciation_request() {
        assert!(is_pronunciation_request("How to PRONOUNCE quinoa"));
        assert!(!is_pronunciation_request("what is quinoa"));
        assert_eq!(pronunciation_target("How to pronounce quinoa"), "quinoa");
        assert_eq!(pronunciation_target("pronounce gif"), "gif");
    }

    #[test]
    fn test_weather_city_extraction() {
        assert_eq!(
            extract_weather_city("Weather in Paris"),
            WeatherQuery::City("paris".to_string())
        );
        assert_eq!(
            extract_weather_city("what's the weather in new york today"),
            WeatherQuery::City("new".to_string())
        );
        assert_eq!(extract_weather_city("weather today?"), WeatherQuery::MissingCity);
        assert_eq!(extract_weather_city("what is rust"), WeatherQuery::NotWeather);
    }

    #[quickcheck]
    fn prop_digit_strings_are_gibberish(n: u64) -> bool {
        is_gibberish(&n.to_string())
    }

    #[quickcheck]
    fn prop_alphabetic_words_are_not_gibberish(word: String) -> bool {
        let letters: String = word.chars().filter(|c| c.is_ascii_alphabetic()).collect();
        letters.len() < 2 || !is_gibberish(&letters)
    }
}
