//! Action name and namespace normalization.

/// Namespace used when a caller passes the `_` alias.
pub const DEFAULT_NAMESPACE: &str = "default";

/// Namespace alias for "the caller's default namespace".
pub const NAMESPACE_ALIAS: &str = "_";

/// Map a user-facing action name to its platform resource name.
///
/// Lower-cases and turns spaces into hyphens. Nothing else is touched, so
/// names the platform rejects come back as platform errors.
pub fn normalize(name: &str) -> String {
    name.to_lowercase().replace(' ', "-")
}

/// Resolve the `_` alias to the default namespace.
pub fn resolve_namespace(namespace: &str) -> &str {
    if namespace == NAMESPACE_ALIAS {
        DEFAULT_NAMESPACE
    } else {
        namespace
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_lowercases_and_hyphenates() {
        assert_eq!(normalize("My Action"), "my-action");
        assert_eq!(normalize("HELLO  World"), "hello--world");
        assert_eq!(normalize("already-fine"), "already-fine");
    }

    #[test]
    fn normalize_leaves_other_characters() {
        assert_eq!(normalize("a_b.c/D"), "a_b.c/d");
        assert_eq!(normalize("tab\there"), "tab\there");
    }

    #[test]
    fn normalize_is_idempotent_without_spaces_or_uppercase() {
        for s in ["My Action", " lead", "trail ", "ÄÖ Ü", "", "MiXeD CaSe  x", "a-b c"] {
            let once = normalize(s);
            assert_eq!(normalize(&once), once, "{s:?}");
            assert!(!once.contains(' '), "{s:?}");
            assert_eq!(once, once.to_lowercase(), "{s:?}");
        }
    }

    #[test]
    fn resolve_namespace_alias() {
        assert_eq!(resolve_namespace("_"), "default");
        assert_eq!(resolve_namespace("prod"), "prod");
        assert_eq!(resolve_namespace("__"), "__");
        assert_eq!(resolve_namespace(""), "");
    }
}
