use std::ops::RangeInclusive;

use common::config::SourceScript;

/// Unicode block of the script
pub fn block(script: SourceScript) -> RangeInclusive<char> {
    match script {
        SourceScript::Hebrew => '\u{0590}'..='\u{05FF}',
        SourceScript::Arabic => '\u{0600}'..='\u{06FF}',
        SourceScript::Cyrillic => '\u{0400}'..='\u{04FF}',
    }
}

/// Check if text has at least one char from the script's block
pub fn contains_source_script(text: &str, script: SourceScript) -> bool {
    let block = block(script);
    text.chars().any(|c| block.contains(&c))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains_source_script() {
        let table = [
            ("שלום", true),
            ("hello שלום world", true),
            ("hello", false),
            ("مرحبا", false),
            ("", false),
            ("   \n\t", false),
            ("123 !?", false),
        ];
        for (i, (text, expected)) in table.iter().enumerate() {
            assert_eq!(
                contains_source_script(text, SourceScript::Hebrew),
                *expected,
                "test table[{i}]"
            );
        }
    }

    #[test]
    fn test_other_scripts() {
        assert!(contains_source_script("مرحبا", SourceScript::Arabic));
        assert!(contains_source_script("привет", SourceScript::Cyrillic));
        assert!(!contains_source_script("שלום", SourceScript::Cyrillic));
    }
}
