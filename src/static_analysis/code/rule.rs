//! Module for rules.

use crate::Config;
use anyhow::{bail, Context, Result};
use colored::Colorize;
use regex::{Regex, RegexBuilder};
use serde::{
    de::{self, Visitor},
    Deserialize, Deserializer,
};
use std::{fmt, fs::File};

/// Category rules used when no rule file is configured.
const DEFAULT_RULES: &str = include_str!("../../../rules.json");

/// Behavior category rule.
///
/// A file matches the category when its text matches the regular expression at least once.
/// Matching is case-insensitive.
#[derive(Debug, Deserialize)]
pub struct Rule {
    #[serde(deserialize_with = "deserialize_main_regex")]
    regex: Regex,
    label: String,
    #[serde(default)]
    description: String,
    #[serde(deserialize_with = "deserialize_file_regex")]
    #[serde(default)]
    include_file_regex: Option<Regex>,
    #[serde(deserialize_with = "deserialize_file_regex")]
    #[serde(default)]
    exclude_file_regex: Option<Regex>,
}

impl Rule {
    /// Gets the regex of the rule.
    pub fn regex(&self) -> &Regex {
        &self.regex
    }

    /// Gets the category label.
    pub fn label(&self) -> &str {
        self.label.as_str()
    }

    /// Gets the description of the category.
    pub fn description(&self) -> &str {
        self.description.as_str()
    }

    /// Returns if this rule has to be applied to the given file name.
    ///
    /// The file must match the include expression, if any, and must not match the exclude one.
    pub fn has_to_check(&self, filename: &str) -> bool {
        self.include_file_regex
            .as_ref()
            .map_or(true, |r| r.is_match(filename))
            && !self
                .exclude_file_regex
                .as_ref()
                .map_or(false, |r| r.is_match(filename))
    }
}

/// Regular expression serde visitor.
///
/// Builds case-insensitive expressions, since categories are keyword lists.
struct RegexVisitor;

impl<'de> Visitor<'de> for RegexVisitor {
    type Value = Regex;

    fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("a valid regular expression")
    }

    fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        RegexBuilder::new(value)
            .case_insensitive(true)
            .build()
            .map_err(E::custom)
    }
}

/// Deserializes the main regular expression of a rule.
fn deserialize_main_regex<'de, D>(deserializer: D) -> Result<Regex, D::Error>
where
    D: Deserializer<'de>,
{
    deserializer.deserialize_str(RegexVisitor)
}

/// Deserializes file regular expressions.
fn deserialize_file_regex<'de, D>(deserializer: D) -> Result<Option<Regex>, D::Error>
where
    D: Deserializer<'de>,
{
    /// Optional regular expression serde visitor.
    struct RegexOptionVisitor;

    impl<'de> Visitor<'de> for RegexOptionVisitor {
        type Value = Option<Regex>;

        fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
            formatter.write_str("a valid regular expression")
        }

        fn visit_some<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
        where
            D: Deserializer<'de>,
        {
            deserializer.deserialize_str(RegexVisitor).map(Some)
        }

        fn visit_none<E>(self) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(None)
        }
    }

    deserializer.deserialize_option(RegexOptionVisitor)
}

/// Loads the category rules, from the configured rule file or the built-in list.
///
/// The order of the list is the order in which categories are reported.
pub fn load_rules(config: &Config) -> Result<Vec<Rule>> {
    let format_error = || {
        format!(
            "rules must be objects with the following structure:\n{}\nOptional {} and {} \
             attributes can be added: regular expressions over the file name that select the \
             files the rule applies to.",
            "{\n\t\"label\": \"Category label\",\n\t\"description\": \"Long description for this \
             category\",\n\t\"regex\": \"keyword|other keyword\"\n}"
                .italic(),
            "include_file_regex".italic(),
            "exclude_file_regex".italic(),
        )
    };

    let rules: Vec<Rule> = match config.rules_json() {
        Some(path) => {
            let f = File::open(path)
                .with_context(|| format!("could not open the rule file {}", path.display()))?;
            serde_json::from_reader(f).with_context(format_error)?
        }
        None => serde_json::from_str(DEFAULT_RULES).with_context(format_error)?,
    };

    if let Some(rule) = rules.iter().find(|rule| rule.label().trim().is_empty()) {
        bail!(
            "the rule with the `{}` expression has an empty label",
            rule.regex()
        );
    }

    Ok(rules)
}
