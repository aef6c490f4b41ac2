//! Option value parsers shared by the subcommands

use bundle_core::{AppDistributionType, AppRunningControlRule};
use std::collections::BTreeSet;

/// Reason given for an integer option that does not parse.
pub const CORRECT_VALUE_HINT: &str = "option requires a correct value or note that\n\
the difference in expressions between short option and long option. ";

/// Strict `i32` parser for clap options.
pub fn strict_i32(value: &str) -> Result<i32, String> {
    value
        .trim()
        .parse::<i32>()
        .map_err(|_| CORRECT_VALUE_HINT.to_string())
}

/// Strict `u32` parser for clap options.
pub fn strict_u32(value: &str) -> Result<u32, String> {
    value
        .trim()
        .parse::<u32>()
        .map_err(|_| CORRECT_VALUE_HINT.to_string())
}

/// Cache size in bytes: a positive decimal with no leading zero.
pub fn cache_size(value: &str) -> Option<u64> {
    let first = value.chars().next()?;
    if first == '0' || !value.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    value.parse().ok()
}

/// Parse `appId:x,controlMessage:m;appId:y,controlMessage:n`.
///
/// Returns `None` when an entry lacks either key.
pub fn running_rules(value: &str) -> Option<Vec<AppRunningControlRule>> {
    const APP_ID: &str = "appId";
    const CONTROL_MESSAGE: &str = "controlMessage";

    let mut rules = Vec::new();
    for entry in value.split(';').filter(|entry| !entry.is_empty()) {
        let app_id_pos = entry.find(APP_ID)?;
        let message_pos = entry.find(CONTROL_MESSAGE)?;

        // appId:<id>,controlMessage:<message>
        let id_start = app_id_pos + APP_ID.len() + 1;
        let id_end = message_pos.checked_sub(1)?;
        let app_id = entry.get(id_start..id_end).unwrap_or_default();

        let message_start = entry[message_pos..]
            .find(':')
            .map(|offset| message_pos + offset + 1)?;

        rules.push(AppRunningControlRule {
            app_id: app_id.to_string(),
            control_message: entry[message_start..].to_string(),
        });
    }
    Some(rules)
}

/// Split a comma separated list, dropping empty items.
pub fn comma_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

/// Comma separated uids. `None` when an item is not an integer.
pub fn uid_list(value: &str) -> Option<Vec<i32>> {
    comma_list(value)
        .iter()
        .map(|item| item.parse().ok())
        .collect()
}

/// Comma separated distribution types, deduplicated and ordered.
///
/// `None` when an item is not a known type.
pub fn distribution_types(value: &str) -> Option<Vec<AppDistributionType>> {
    let mut types = BTreeSet::new();
    for item in comma_list(value) {
        let raw: i32 = item.parse().ok()?;
        types.insert(AppDistributionType::try_from(raw).ok()?);
    }
    Some(types.into_iter().collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strict_integers() {
        assert_eq!(strict_i32("100"), Ok(100));
        assert_eq!(strict_i32("-1"), Ok(-1));
        assert_eq!(strict_i32("10a"), Err(CORRECT_VALUE_HINT.to_string()));
        assert!(strict_i32("").is_err());
        assert_eq!(strict_u32("4294967295"), Ok(u32::MAX));
        assert!(strict_u32("-1").is_err());
    }

    #[test]
    fn test_cache_size() {
        assert_eq!(cache_size("1024"), Some(1024));
        assert_eq!(cache_size("0"), None);
        assert_eq!(cache_size("0100"), None);
        assert_eq!(cache_size("-5"), None);
        assert_eq!(cache_size("12k"), None);
        assert_eq!(cache_size(""), None);
    }

    #[test]
    fn test_running_rules() {
        let rules = running_rules("appId:id1,controlMessage:msg1;appId:id2,controlMessage:m:2")
            .unwrap();
        assert_eq!(rules.len(), 2);
        assert_eq!(rules[0].app_id, "id1");
        assert_eq!(rules[0].control_message, "msg1");
        assert_eq!(rules[1].app_id, "id2");
        assert_eq!(rules[1].control_message, "m:2");
    }

    #[test]
    fn test_running_rules_missing_key() {
        assert!(running_rules("appId:id1").is_none());
        assert!(running_rules("controlMessage:m").is_none());
        assert!(running_rules("appId:a,controlMessage:m;appId:b").is_none());
    }

    #[test]
    fn test_lists() {
        assert_eq!(comma_list("a, b,,c"), vec!["a", "b", "c"]);
        assert_eq!(uid_list("20010001,20010002"), Some(vec![20010001, 20010002]));
        assert_eq!(uid_list("1,x"), None);
    }

    #[test]
    fn test_distribution_types() {
        let types = distribution_types("3,1,3").unwrap();
        assert_eq!(
            types,
            vec![
                AppDistributionType::AppGallery,
                AppDistributionType::EnterpriseNormal
            ]
        );
        assert!(distribution_types("1,7").is_none());
        assert!(distribution_types("one").is_none());
    }
}
