//! Catalog completeness and formatting tests.

use fluent_syntax::ast::Entry;
use fluent_syntax::parser::parse;
use moana_i18n::{available_locales, Messages, DEFAULT_LOCALE};

fn catalog_keys(source: &str) -> Vec<String> {
    let resource = parse(source).expect("catalog parses");
    resource
        .body
        .into_iter()
        .filter_map(|entry| match entry {
            Entry::Message(message) => Some(message.id.name.to_string()),
            _ => None,
        })
        .collect()
}

#[test]
fn test_every_key_resolves_in_every_locale() {
    let keys = catalog_keys(include_str!("../locales/nl-NL/bot.ftl"));
    assert!(keys.len() > 50);

    for locale in available_locales() {
        let messages = Messages::new(locale).unwrap();
        for key in &keys {
            assert_ne!(&messages.get(key), key, "{locale} is missing {key}");
        }
    }
}

#[test]
fn test_default_locale_is_dutch() {
    let messages = Messages::new(DEFAULT_LOCALE).unwrap();
    assert_eq!(messages.get("no-permission"), "Geen permissie.");
    assert_eq!(messages.get("button-confirm-close"), "Bevestig sluiten");
}

#[test]
fn test_welcome_description_layout() {
    let messages = Messages::new(DEFAULT_LOCALE).unwrap();
    let text = messages.get_with_args("welcome-description", &[("count", "1234")]);
    assert_eq!(
        text,
        "Wij zijn blij u hier te vinden!\n\n> Wij hebben op het moment **1234** Discord leden!"
    );
}

#[test]
fn test_link_notice_mentions_member_and_minutes() {
    let messages = Messages::new("en-US").unwrap();
    let text = messages.get_with_args("notice-link-timeout", &[("member", "<@7>"), ("minutes", "5")]);
    assert_eq!(text, "<@7> has been muted for 5 minutes (links are not allowed).");
}

#[test]
fn test_unsupported_locale_fails() {
    assert!(Messages::new("fr-FR").is_err());
}
