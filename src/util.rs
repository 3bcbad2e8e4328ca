use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

pub fn format_weight(weight: f32) -> String {
    const UNITS: [&str; 4] = ["", "k", "M", "B"];

    let mut value = weight.max(0.0) as f64;
    let mut unit = 0usize;
    while value >= 1000.0 && unit < UNITS.len() - 1 {
        value /= 1000.0;
        unit += 1;
    }

    if unit == 0 {
        format!("{value:.0}")
    } else {
        format!("{value:.1}{}", UNITS[unit])
    }
}

/// Last whitespace-separated token, lowercased. Used as the surname key.
pub fn last_token(name: &str) -> Option<String> {
    name.split_whitespace().last().map(str::to_lowercase)
}

pub fn initials(name: &str) -> String {
    name.split_whitespace()
        .filter_map(|part| part.chars().next())
        .take(2)
        .flat_map(char::to_uppercase)
        .collect()
}

pub fn stable_pair(id: &str) -> (f32, f32) {
    let mut hasher = DefaultHasher::new();
    id.hash(&mut hasher);
    let hash = hasher.finish();

    let x = ((hash & 0xffff_ffff) as f64 / u32::MAX as f64) as f32;
    let y = (((hash >> 32) & 0xffff_ffff) as f64 / u32::MAX as f64) as f32;
    ((x * 2.0) - 1.0, (y * 2.0) - 1.0)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn initials_take_first_two_words() {
        assert_eq!(initials("ada mae lovelace"), "AM");
        assert_eq!(initials("Prince"), "P");
        assert_eq!(initials(""), "");
    }

    #[test]
    fn last_token_is_lowercased_surname() {
        assert_eq!(last_token("Bob  Smith "), Some("smith".to_owned()));
        assert_eq!(last_token("   "), None);
    }

    #[test]
    fn stable_pair_is_deterministic_and_bounded() {
        let first = stable_pair("p-17");
        assert_eq!(first, stable_pair("p-17"));
        assert!((-1.0..=1.0).contains(&first.0));
        assert!((-1.0..=1.0).contains(&first.1));
    }

    #[test]
    fn weights_format_with_suffixes() {
        assert_eq!(format_weight(950.0), "950");
        assert_eq!(format_weight(12_500.0), "12.5k");
        assert_eq!(format_weight(-4.0), "0");
    }
}
