//! Collection naming: singular entity type names to plural collection keys.
//!
//! Most names take a trailing "s". The few that don't are listed in
//! `IRREGULAR`, and both directions consult the same table so that
//! `singularize(&pluralize(name))` always gives `name` back.

/// Singular/plural pairs that don't follow the trailing "s" rule.
const IRREGULAR: &[(&str, &str)] = &[("body", "bodies"), ("category", "categories")];

/// Return the collection key for a type name (e.g. "body" yields "bodies").
pub fn pluralize(singular: &str) -> String {
    IRREGULAR
        .iter()
        .find(|(s, _)| *s == singular)
        .map(|(_, p)| (*p).to_string())
        .unwrap_or_else(|| format!("{singular}s"))
}

/// Return the type name for a collection key (e.g. "bodies" yields "body").
///
/// Returns `None` when `plural` is neither irregular nor ends in "s".
pub fn singularize(plural: &str) -> Option<String> {
    if let Some((s, _)) = IRREGULAR.iter().find(|(_, p)| *p == plural) {
        return Some((*s).to_string());
    }
    plural
        .strip_suffix('s')
        .filter(|stem| !stem.is_empty())
        .map(str::to_string)
}
