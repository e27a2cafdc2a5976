//! Small helpers shared by handlers

/// Public storefront URL for a restaurant slug
pub fn storefront_url(public_base_url: &str, slug: &str) -> String {
    format!("{}/restaurant/{slug}", public_base_url.trim_end_matches('/'))
}

/// Trimmed value, `None` when blank
pub fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn storefront_url_joins_base_and_slug() {
        assert_eq!(
            storefront_url("https://restauplus.com", "chez-ana"),
            "https://restauplus.com/restaurant/chez-ana"
        );
        assert_eq!(
            storefront_url("http://localhost:3000/", "x"),
            "http://localhost:3000/restaurant/x"
        );
    }

    #[test]
    fn non_empty_trims() {
        assert_eq!(non_empty(Some("  Ana ")), Some("Ana"));
        assert_eq!(non_empty(Some("   ")), None);
        assert_eq!(non_empty(None), None);
    }
}
