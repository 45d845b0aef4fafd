//! URL assembly for API endpoints.

/// Joins a base URL with path segments using single slashes.
///
/// A trailing empty segment produces a trailing slash, which the API uses
/// to address collection roots.
pub fn join(base: &str, segments: &[&str]) -> String {
    let mut url = base.trim_end_matches('/').to_string();
    for segment in segments {
        url.push('/');
        url.push_str(segment.trim_matches('/'));
    }
    url
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_segments() {
        assert_eq!(
            join("https://api.example.com/v0", &["scenes", "ortho", "abc"]),
            "https://api.example.com/v0/scenes/ortho/abc"
        );
    }

    #[test]
    fn test_join_trims_redundant_slashes() {
        assert_eq!(
            join("https://api.example.com/v0/", &["/scenes/", "ortho"]),
            "https://api.example.com/v0/scenes/ortho"
        );
    }

    #[test]
    fn test_trailing_empty_segment_keeps_slash() {
        assert_eq!(
            join("https://api.example.com/v0", &["scenes", "ortho", ""]),
            "https://api.example.com/v0/scenes/ortho/"
        );
    }
}
