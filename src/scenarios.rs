//! Built-in scenario definitions embedded in the binary
//!
//! This module embeds the bundled scenario YAML files directly into the
//! binary, allowing users to use `--scenario bug-cache-sum` instead of
//! specifying a file path.

use std::collections::HashMap;
use std::sync::LazyLock;

/// Built-in scenario YAML definitions
pub static BUILTIN_SCENARIOS: LazyLock<HashMap<&'static str, &'static str>> =
    LazyLock::new(|| {
        let mut m = HashMap::new();

        m.insert(
            "bug-cache-sum",
            include_str!("../scenarios/bug-cache-sum.yaml"),
        );
        m.insert(
            "bug_cache_sum",
            include_str!("../scenarios/bug-cache-sum.yaml"),
        );
        m.insert("steady", include_str!("../scenarios/steady.yaml"));
        m.insert(
            "flaky-first-page",
            include_str!("../scenarios/flaky-first-page.yaml"),
        );

        m
    });

/// Get a built-in scenario by name
pub fn get_builtin(name: &str) -> Option<&'static str> {
    BUILTIN_SCENARIOS.get(name).copied()
}

/// Check if a name refers to a built-in scenario
pub fn is_builtin(name: &str) -> bool {
    BUILTIN_SCENARIOS.contains_key(name)
}

/// List all built-in scenario names (primary names only)
pub fn list_builtin() -> Vec<&'static str> {
    vec!["bug-cache-sum", "steady", "flaky-first-page"]
}
