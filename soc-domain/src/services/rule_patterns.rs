use std::collections::HashMap;

use crate::entities::{MailboxRule, RulePattern};
use crate::value_objects::{Severity, UserKey};

pub const PATTERN_MIN_USERS: usize = 2;
pub const PATTERN_HIGH_USERS: usize = 3;
pub const PATTERN_CRITICAL_USERS: usize = 5;
pub const AUTO_DELETE_PATTERN: &str = "Automatic deletion rule";

/// Finds mailbox-rule shapes shared across mailboxes.
///
/// Forwarding destinations are compared case-insensitively and each user
/// counts once per destination no matter how many of their rules hit it.
pub fn detect_rule_patterns(rules: &[MailboxRule]) -> Vec<RulePattern> {
    let mut destinations = UserGroups::default();
    let mut deleters = UserGroups::default();

    for rule in rules {
        let key = rule.user_key();
        for address in rule.normalized_destinations() {
            destinations.add(address, &key, &rule.user_principal_name);
        }
        if rule.deletes_messages() {
            deleters.add(AUTO_DELETE_PATTERN.to_string(), &key, &rule.user_principal_name);
        }
    }

    let mut patterns: Vec<RulePattern> = destinations
        .into_groups()
        .filter(|(_, users)| users.len() >= PATTERN_MIN_USERS)
        .map(|(address, users)| RulePattern {
            pattern: format!("Forwarding to {address}"),
            severity: forwarding_severity(users.len()),
            users,
        })
        .collect();

    patterns.extend(
        deleters
            .into_groups()
            .filter(|(_, users)| users.len() >= PATTERN_MIN_USERS)
            .map(|(pattern, users)| RulePattern {
                pattern,
                severity: deletion_severity(users.len()),
                users,
            }),
    );

    patterns.sort_by_key(|pattern| pattern.severity.rank());
    patterns
}

fn forwarding_severity(users: usize) -> Severity {
    if users >= PATTERN_CRITICAL_USERS {
        Severity::Critical
    } else if users >= PATTERN_HIGH_USERS {
        Severity::High
    } else {
        Severity::Medium
    }
}

fn deletion_severity(users: usize) -> Severity {
    if users >= PATTERN_CRITICAL_USERS {
        Severity::Critical
    } else {
        Severity::High
    }
}

// Groups keep first-seen order for both the group and its members.
#[derive(Default)]
struct UserGroups {
    order: Vec<String>,
    groups: HashMap<String, Group>,
}

#[derive(Default)]
struct Group {
    seen: Vec<UserKey>,
    users: Vec<String>,
}

impl UserGroups {
    fn add(&mut self, group: String, key: &UserKey, user_principal_name: &str) {
        if !self.groups.contains_key(&group) {
            self.order.push(group.clone());
        }
        let entry = self.groups.entry(group).or_default();
        if !entry.seen.contains(key) {
            entry.seen.push(key.clone());
            entry.users.push(user_principal_name.to_string());
        }
    }

    fn into_groups(mut self) -> impl Iterator<Item = (String, Vec<String>)> {
        let order = std::mem::take(&mut self.order);
        order.into_iter().filter_map(move |name| {
            self.groups
                .remove(&name)
                .map(|group| (name, group.users))
        })
    }
}
