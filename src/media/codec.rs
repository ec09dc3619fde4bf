//! Conversions between the persisted image-list representation and the
//! in-memory ordered list of storage-relative paths.
//!
//! The authoritative encoding is a JSON array of strings, but rows written by
//! earlier versions of the system may hold a bare comma-separated string.
//! Decoding tolerates both; the rest of the crate only ever sees `Vec<String>`.

/// Decodes a persisted image list. Never fails: unparseable input yields `[]`.
pub fn decode_image_list(raw: Option<&str>) -> Vec<String> {
    let Some(raw) = raw else {
        return Vec::new();
    };
    let raw = raw.trim();
    if raw.is_empty() {
        return Vec::new();
    }

    // Valid JSON that is not an array (null, a number, an object) decodes to
    // nothing; only a parse error falls through to the CSV path.
    if let Ok(parsed) = serde_json::from_str::<serde_json::Value>(raw) {
        return match parsed {
            serde_json::Value::Array(entries) => entries
                .iter()
                .filter_map(|entry| entry.as_str())
                .map(str::to_owned)
                .collect(),
            _ => Vec::new(),
        };
    }

    // Legacy rows: comma-separated, possibly with stray whitespace.
    raw.split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(str::to_owned)
        .collect()
}

/// Encodes an image list for persistence as a JSON array. Paths are written
/// verbatim; only storage-relative paths belong in the database.
pub fn encode_image_list(images: &[String]) -> String {
    serde_json::to_string(images).unwrap_or_else(|_| "[]".to_owned())
}

/// Rewrites a storage-relative path into a publicly resolvable URL. Applied
/// only when serving data, never before persistence.
pub fn to_public_url(path: Option<&str>, base: &str, fallback: &str) -> String {
    match path {
        None | Some("") => fallback.to_owned(),
        Some(path) if path.starts_with('/') => format!("{base}{path}"),
        Some(path) => path.to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_none_is_empty() {
        assert!(decode_image_list(None).is_empty());
        assert!(decode_image_list(Some("")).is_empty());
        assert!(decode_image_list(Some("   ")).is_empty());
    }

    #[test]
    fn decode_json_array() {
        assert_eq!(
            decode_image_list(Some(r#"["x","y"]"#)),
            vec!["x".to_owned(), "y".to_owned()]
        );
        assert!(decode_image_list(Some("[]")).is_empty());
    }

    #[test]
    fn decode_json_non_array_is_empty() {
        assert!(decode_image_list(Some("null")).is_empty());
        assert!(decode_image_list(Some("123")).is_empty());
        assert!(decode_image_list(Some("{}")).is_empty());
        assert!(decode_image_list(Some(r#""x""#)).is_empty());
    }

    #[test]
    fn decode_comma_separated_fallback() {
        assert_eq!(
            decode_image_list(Some("a,b,c")),
            vec!["a".to_owned(), "b".to_owned(), "c".to_owned()]
        );
        assert_eq!(
            decode_image_list(Some(" /p/one.png , ,/p/two.png ")),
            vec!["/p/one.png".to_owned(), "/p/two.png".to_owned()]
        );
    }

    #[test]
    fn encode_decode_round_trip() {
        let list = vec![
            "/productImages/a.png".to_owned(),
            "/productImages/b.jpg".to_owned(),
        ];
        assert_eq!(decode_image_list(Some(&encode_image_list(&list))), list);

        let empty: Vec<String> = Vec::new();
        assert_eq!(encode_image_list(&empty), "[]");
        assert_eq!(decode_image_list(Some(&encode_image_list(&empty))), empty);
    }

    #[test]
    fn public_url_rewriting() {
        let base = "http://localhost:3000";
        let fallback = "http://localhost:3000/placeholder.png";

        assert_eq!(to_public_url(None, base, fallback), fallback);
        assert_eq!(to_public_url(Some(""), base, fallback), fallback);
        assert_eq!(
            to_public_url(Some("/x.png"), base, fallback),
            "http://localhost:3000/x.png"
        );
        assert_eq!(
            to_public_url(Some("http://other/x.png"), base, fallback),
            "http://other/x.png"
        );
    }
}
