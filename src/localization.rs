//! # Localization Module
//!
//! User-facing messages in Danish (default) and English, backed by Fluent
//! resources compiled into the binary from `locales/`.

use anyhow::Result;
use fluent_bundle::concurrent::FluentBundle;
use fluent_bundle::{FluentArgs, FluentResource, FluentValue};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use unic_langid::LanguageIdentifier;

const DANISH_RESOURCE: &str = include_str!("../locales/da/main.ftl");
const ENGLISH_RESOURCE: &str = include_str!("../locales/en/main.ftl");

/// Supported interface languages
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Language {
    #[default]
    Danish,
    English,
}

impl Language {
    pub fn code(&self) -> &'static str {
        match self {
            Language::Danish => "da",
            Language::English => "en",
        }
    }

    fn resource(&self) -> &'static str {
        match self {
            Language::Danish => DANISH_RESOURCE,
            Language::English => ENGLISH_RESOURCE,
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl FromStr for Language {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "da" | "da-dk" | "dansk" | "danish" => Ok(Language::Danish),
            "en" | "en-gb" | "en-us" | "english" => Ok(Language::English),
            other => Err(anyhow::anyhow!("Unsupported language '{}'", other)),
        }
    }
}

/// Localization manager for the planner
pub struct Localizer {
    language: Language,
    bundle: FluentBundle<FluentResource>,
}

impl fmt::Debug for Localizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Localizer")
            .field("language", &self.language)
            .finish()
    }
}

impl Localizer {
    /// Create a localizer for a language
    pub fn new(language: Language) -> Result<Self> {
        let locale: LanguageIdentifier = language.code().parse()?;
        let mut bundle = FluentBundle::new_concurrent(vec![locale]);
        // No bidi isolation marks around placeables
        bundle.set_use_isolating(false);

        let resource = FluentResource::try_new(language.resource().to_string()).map_err(
            |(_, errors)| anyhow::anyhow!("Failed to parse {} messages: {:?}", language, errors),
        )?;
        bundle
            .add_resource(resource)
            .map_err(|errors| anyhow::anyhow!("Failed to load {} messages: {:?}", language, errors))?;

        Ok(Self { language, bundle })
    }

    pub fn language(&self) -> Language {
        self.language
    }

    /// Get a localized message
    pub fn get_message(&self, key: &str, args: Option<&HashMap<&str, &str>>) -> String {
        let msg = match self.bundle.get_message(key) {
            Some(msg) => msg,
            None => return format!("Missing translation: {}", key),
        };

        let pattern = match msg.value() {
            Some(pattern) => pattern,
            None => return format!("Missing value for key: {}", key),
        };

        let fluent_args = args.map(|args| {
            args.iter()
                .map(|(k, v)| (*k, FluentValue::from(*v)))
                .collect::<FluentArgs>()
        });

        let mut errors = vec![];
        let value = self
            .bundle
            .format_pattern(pattern, fluent_args.as_ref(), &mut errors);
        if !errors.is_empty() {
            log::warn!("Errors formatting message '{}': {:?}", key, errors);
        }

        value.into_owned()
    }

    /// Get a localized message with simple string arguments
    pub fn get_message_with_args(&self, key: &str, args: &[(&str, &str)]) -> String {
        let args_map: HashMap<&str, &str> = args.iter().cloned().collect();
        self.get_message(key, Some(&args_map))
    }

    /// Convenience function to get a localized message
    pub fn t(&self, key: &str) -> String {
        self.get_message(key, None)
    }
}
