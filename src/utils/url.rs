/// Join URL segments with exactly one `/` between them.
///
/// Leading slashes of the base and trailing slashes of the last segment are kept.
pub fn join_url(base: &str, parts: &[&str]) -> String {
    let mut url = base.trim_end_matches('/').to_string();
    for part in parts {
        let trimmed = part.trim_start_matches('/');
        if trimmed.is_empty() {
            continue;
        }
        url.push('/');
        url.push_str(trimmed.trim_end_matches('/'));
    }
    if let Some(last) = parts.last() {
        if last.ends_with('/') && !url.ends_with('/') {
            url.push('/');
        }
    }
    url
}
