/// Give a bare domain an `https://` scheme; empty input has no website.
pub fn normalize_website(url: &str) -> Option<String> {
    if url.trim().is_empty() {
        return None;
    }

    if has_http_scheme(url) {
        Some(url.to_string())
    } else {
        Some(format!("https://{}", url))
    }
}

fn has_http_scheme(url: &str) -> bool {
    ["http://", "https://"].iter().any(|scheme| {
        url.get(..scheme.len())
            .is_some_and(|prefix| prefix.eq_ignore_ascii_case(scheme))
    })
}
