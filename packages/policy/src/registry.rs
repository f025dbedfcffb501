//! The name → policy lookup table.
//!
//! Built once at startup. Unknown names are rejected here, at bind time,
//! so a call can never reach a half-configured policy at runtime.

use std::collections::HashMap;

use lazy_static::lazy_static;

use crate::builtin::{ExistingPathAll, ExistingPathFirst, FirstFound, MostFreeSpace};
use crate::{Category, PolicyRef};

static FIRST_FOUND: FirstFound = FirstFound;
static MOST_FREE_SPACE: MostFreeSpace = MostFreeSpace;
static EXISTING_PATH_ALL: ExistingPathAll = ExistingPathAll;
static EXISTING_PATH_FIRST: ExistingPathFirst = ExistingPathFirst;

lazy_static! {
    static ref POLICIES: HashMap<&'static str, PolicyRef> = {
        let mut m: HashMap<&'static str, PolicyRef> = HashMap::new();
        for policy in [
            &FIRST_FOUND as PolicyRef,
            &MOST_FREE_SPACE,
            &EXISTING_PATH_ALL,
            &EXISTING_PATH_FIRST,
        ] {
            m.insert(policy.name(), policy);
        }
        m
    };
}

/// Resolve a policy by registry name.
pub fn lookup(name: &str) -> Option<PolicyRef> {
    POLICIES.get(name).copied()
}

/// The built-in default for a category, used when neither a function
/// override nor a category default is configured.
pub fn default_for(category: Category) -> PolicyRef {
    match category {
        Category::Search => &FIRST_FOUND,
        Category::Create => &MOST_FREE_SPACE,
        Category::Action => &EXISTING_PATH_ALL,
    }
}

/// Every registered policy name, for diagnostics and usage text.
pub fn names() -> Vec<&'static str> {
    let mut names: Vec<&'static str> = POLICIES.keys().copied().collect();
    names.sort_unstable();
    names
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtins_resolve_by_name() {
        for name in ["ff", "mfs", "epall", "epff"] {
            let policy = lookup(name).unwrap();
            assert_eq!(policy.name(), name);
        }
        assert!(lookup("newest").is_none());
    }

    #[test]
    fn defaults_support_their_category() {
        for category in Category::ALL {
            assert!(default_for(category).supports(category));
        }
    }

    #[test]
    fn names_are_sorted() {
        assert_eq!(names(), vec!["epall", "epff", "ff", "mfs"]);
    }
}
