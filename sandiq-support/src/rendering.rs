//! Text rendering utilities for human-friendly error messages.
//!
//! Type names coming from [`std::any::type_name`] are long and noisy
//! (`alloc::sync::Arc<dyn my_app::logging::Logger>`). These helpers turn
//! them into something a person can scan in a terminal.

/// Shortens a fully qualified type name for display.
///
/// ```
/// use sandiq_support::rendering::shorten_type_name;
///
/// let short = shorten_type_name("my_app::services::user::UserService");
/// assert_eq!(short, "UserService");
///
/// let short = shorten_type_name("alloc::vec::Vec<alloc::sync::Arc<dyn my_app::Logger>>");
/// assert_eq!(short, "Vec<Arc<dyn Logger>>");
/// ```
pub fn shorten_type_name(full_name: &str) -> String {
    let mut result = String::with_capacity(full_name.len());
    let mut segment = String::new();
    let mut chars = full_name.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            ':' if chars.peek() == Some(&':') => {
                chars.next();
                segment.clear();
            }
            '<' | '>' | ',' | ' ' | '(' | ')' | '[' | ']' | '&' | ';' => {
                result.push_str(&segment);
                result.push(ch);
                segment.clear();
            }
            _ => segment.push(ch),
        }
    }

    result.push_str(&segment);
    result
}

/// Renders a resolution path, outermost first, with shortened names.
///
/// ```
/// use sandiq_support::rendering::render_path;
///
/// let path = ["app::FileSystem", "app::fs::UserFile", "dyn app::ErrorLogger"];
/// assert_eq!(render_path(&path), "FileSystem → UserFile → dyn ErrorLogger");
/// ```
pub fn render_path(path: &[impl AsRef<str>]) -> String {
    path.iter()
        .map(|name| shorten_type_name(name.as_ref()))
        .collect::<Vec<_>>()
        .join(" → ")
}

/// Renders a comma separated list of shortened type names.
pub fn render_list(names: &[impl AsRef<str>]) -> String {
    names
        .iter()
        .map(|name| shorten_type_name(name.as_ref()))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Picks the registered names closest to `requested`.
///
/// Scoring, highest first: identical short names (same type seen through a
/// different path), substring matches, then a shared prefix of at least
/// three characters. Results keep the order of `available` within a score.
pub fn suggest_similar(requested: &str, available: &[&str], max_suggestions: usize) -> Vec<String> {
    let requested_short = shorten_type_name(requested).to_lowercase();

    let mut scored: Vec<(&str, usize)> = available
        .iter()
        .filter(|&&name| name != requested)
        .filter_map(|&name| {
            let short = shorten_type_name(name).to_lowercase();

            if short == requested_short {
                return Some((name, 1000));
            }
            if short.contains(&requested_short) || requested_short.contains(&short) {
                return Some((name, 100));
            }

            let common = short
                .chars()
                .zip(requested_short.chars())
                .take_while(|(a, b)| a == b)
                .count();

            (common >= 3).then_some((name, common * 10))
        })
        .collect();

    scored.sort_by(|a, b| b.1.cmp(&a.1));
    scored.dedup_by(|a, b| a.0 == b.0);
    scored
        .into_iter()
        .take(max_suggestions)
        .map(|(name, _)| name.to_string())
        .collect()
}
