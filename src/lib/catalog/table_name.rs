use std::borrow::Cow;

pub(crate) fn table_name_with_prefix<'a>(table_name: &'a str, prefix: &str) -> Cow<'a, str> {
    if !prefix.is_empty() {
        return Cow::Owned(format!("{prefix}{table_name}"));
    }
    Cow::Borrowed(table_name)
}

/// Placeholder list for `IN (...)` conditions
pub(crate) fn placeholders(count: usize) -> String {
    vec!["?"; count].join(",")
}
