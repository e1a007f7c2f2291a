//! # Mention Parser
//!
//! Extracts referenced-user identifiers from free-form message text.

use regex::Regex;
use std::sync::LazyLock;

/// Regex for the platform mention syntax, e.g. `<@U04ABC123>`.
static MENTION_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<@(\w+)>").expect("mention regex should compile"));

/// Returns every user id mentioned in `text`, in message order.
///
/// Duplicate mentions of the same user are preserved as duplicates; the
/// platform does not deduplicate and neither do we. A spot counts once per
/// spotter regardless of how many tags it carries, so this has no effect on
/// scoring. Returns an empty vec when nothing matches; never fails.
pub fn find_mentions(text: &str) -> Vec<String> {
    MENTION_REGEX
        .captures_iter(text)
        .map(|cap| cap[1].to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_mentions_yields_empty() {
        assert!(find_mentions("").is_empty());
        assert!(find_mentions("spotted everyone today!").is_empty());
        assert!(find_mentions("<@> not a mention, nor is <@ U1>").is_empty());
    }

    #[test]
    fn mentions_in_message_order() {
        let ids = find_mentions("caught <@U1AAA> and <@U2BBB> at the library");
        assert_eq!(ids, vec!["U1AAA", "U2BBB"]);
    }

    #[test]
    fn duplicates_are_preserved() {
        let ids = find_mentions("<@U1AAA> <@U1AAA>");
        assert_eq!(ids, vec!["U1AAA", "U1AAA"]);
    }
}
