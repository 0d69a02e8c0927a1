//! Property-based tests for the entry-set algebra.
//!
//! These verify the join/ordering invariants across many randomly generated
//! entry sets.

use proptest::prelude::*;

use crate::{Action, Entries, Entry, Scope};

/// Strategy for generating valid scopes.
fn scope_strategy() -> impl Strategy<Value = Scope> {
    "[a-z]{3,8}\\.(com|io|dev)(/[a-z]{2,6}){0,2}".prop_map(|s| Scope::parse(&s).unwrap())
}

/// Strategy for generating endpoint URLs.
fn url_strategy() -> impl Strategy<Value = String> {
    "https://[a-z]{3,8}\\.(com|io)/v[12]/"
}

/// Strategy for generating free-form flags.
fn flag_strategy() -> impl Strategy<Value = String> {
    "(version=[0-9]\\.[0-9]|trim|mirror)"
}

fn action_strategy() -> impl Strategy<Value = Action> {
    prop_oneof![
        Just(Action::Namespace),
        Just(Action::Index),
        Just(Action::Pull),
        Just(Action::Push),
    ]
}

fn entry_strategy() -> impl Strategy<Value = Entry> {
    (scope_strategy(), action_strategy()).prop_flat_map(|(scope, action)| {
        if action == Action::Namespace {
            prop::collection::vec("[a-z]{3,6}\\.com(/[a-z]{2,5}){0,2}", 0..3)
                .prop_map(move |args| Entry::new(scope.clone(), action, args))
                .boxed()
        } else {
            (url_strategy(), prop::collection::vec(flag_strategy(), 0..3))
                .prop_map(move |(url, flags)| {
                    let mut args = vec![url];
                    args.extend(flags);
                    Entry::new(scope.clone(), action, args)
                })
                .boxed()
        }
    })
}

/// Builds a valid set by inserting generated entries, skipping conflicts.
fn entries_strategy() -> impl Strategy<Value = Entries> {
    prop::collection::vec(entry_strategy(), 0..8).prop_map(|list| {
        let mut entries = Entries::new();
        for entry in list {
            let _ = entries.add(entry);
        }
        entries
    })
}

proptest! {
    #[test]
    fn join_is_idempotent(entries in entries_strategy()) {
        prop_assert_eq!(entries.join(&entries).unwrap(), entries);
    }

    #[test]
    fn join_commutes(a in entries_strategy(), b in entries_strategy()) {
        match (a.join(&b), b.join(&a)) {
            (Ok(ab), Ok(ba)) => prop_assert_eq!(ab, ba),
            (Err(_), Err(_)) => {}
            (ab, ba) => prop_assert!(false, "asymmetric join: {:?} vs {:?}", ab, ba),
        }
    }

    #[test]
    fn join_associates(
        a in entries_strategy(),
        b in entries_strategy(),
        c in entries_strategy(),
    ) {
        let left = a.join(&b).and_then(|ab| ab.join(&c));
        let right = b.join(&c).and_then(|bc| a.join(&bc));
        if let (Ok(left), Ok(right)) = (left, right) {
            prop_assert_eq!(left, right);
        }
    }

    #[test]
    fn iteration_is_sorted_and_deduped(entries in entries_strategy()) {
        let list: Vec<&Entry> = entries.iter().collect();
        prop_assert!(list.windows(2).all(|pair| pair[0] < pair[1]));
    }

    #[test]
    fn add_is_idempotent(entries in entries_strategy(), entry in entry_strategy()) {
        let mut once = entries.clone();
        if once.add(entry.clone()).is_ok() {
            let mut twice = once.clone();
            twice.add(entry).unwrap();
            prop_assert_eq!(once, twice);
        }
    }

    #[test]
    fn textual_form_round_trips(entries in entries_strategy()) {
        let parsed: Entries = entries.to_string().parse().unwrap();
        prop_assert_eq!(parsed, entries);
    }

    #[test]
    fn scope_contains_descendants_only(scope in scope_strategy(), tail in "[a-z]{2,6}") {
        prop_assert!(scope.contains(scope.as_str()));
        let descendant = format!("{}/{}", scope, tail);
        prop_assert!(scope.contains(&descendant));
        let non_descendant = format!("{}{}", scope, tail);
        prop_assert!(!scope.contains(&non_descendant));
    }
}
