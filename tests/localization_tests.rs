//! # Localization Tests
//!
//! Message lookup and formatting for both shipped languages.

use madplan::categorizer::Category;
use madplan::localization::{Language, Localizer};
use madplan::plan::Weekday;
use madplan::scaling::ScaleNote;
use std::collections::HashMap;

fn setup_localization(language: Language) -> Localizer {
    Localizer::new(language).expect("Failed to create localizer")
}

#[test]
fn test_every_day_and_category_has_a_label() {
    for language in [Language::Danish, Language::English] {
        let localizer = setup_localization(language);
        for day in Weekday::ALL {
            assert!(!localizer.t(day.message_key()).starts_with("Missing"));
        }
        for category in Category::ALL {
            assert!(!localizer.t(category.message_key()).starts_with("Missing"));
        }
        assert!(!localizer
            .t(ScaleNote::ZeroServings.message_key())
            .starts_with("Missing"));
    }
}

#[test]
fn test_danish_labels_match_plan_labels() {
    let localizer = setup_localization(Language::Danish);
    for day in Weekday::ALL {
        assert_eq!(localizer.t(day.message_key()), day.label());
    }
    for category in Category::ALL {
        assert_eq!(localizer.t(category.message_key()), category.label());
    }
}

#[test]
fn test_message_with_args() {
    let localizer = setup_localization(Language::English);

    let mut args = HashMap::new();
    args.insert("recipe", "Chili con carne");
    args.insert("count", "7");

    let message = localizer.get_message("recipe-added", Some(&args));
    assert!(message.contains("Chili con carne"));
    assert!(message.contains('7'));
}

#[test]
fn test_default_recipe_name_per_language() {
    let danish = setup_localization(Language::Danish);
    let english = setup_localization(Language::English);

    assert_eq!(
        danish.get_message_with_args("default-recipe-name", &[("day", "Onsdag")]),
        "Opskrift til Onsdag"
    );
    assert!(english
        .get_message_with_args("default-recipe-name", &[("day", "Wednesday")])
        .contains("Wednesday"));
}

#[test]
fn test_missing_key() {
    let localizer = setup_localization(Language::Danish);
    assert_eq!(localizer.t("no-such-key"), "Missing translation: no-such-key");
}

#[test]
fn test_language_codes() {
    assert_eq!("en".parse::<Language>().unwrap(), Language::English);
    assert_eq!("DA".parse::<Language>().unwrap(), Language::Danish);
    assert!("fr".parse::<Language>().is_err());
    assert_eq!(setup_localization(Language::English).language(), Language::English);
}
