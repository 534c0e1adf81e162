pub mod artist;
pub mod show;
pub mod venue;

/// Genres are stored as a JSON array in a single text column.
pub fn encode_genres(genres: &[String]) -> String {
    serde_json::to_string(genres).unwrap_or_else(|_| "[]".to_string())
}

/// Decodes a stored genre column. Rows written before the JSON encoding
/// (plain comma separated text) are still readable.
pub fn decode_genres(raw: &str) -> Vec<String> {
    match serde_json::from_str::<Vec<String>>(raw) {
        Ok(genres) => genres,
        Err(_) => raw
            .split(',')
            .map(|genre| genre.trim().to_string())
            .filter(|genre| !genre.is_empty())
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_genres_json() {
        let raw = encode_genres(&["Jazz".to_string(), "Folk".to_string()]);
        assert_eq!(raw, r#"["Jazz","Folk"]"#);
        assert_eq!(decode_genres(&raw), vec!["Jazz", "Folk"]);
    }

    #[test]
    fn test_decode_genres_plain_text() {
        assert_eq!(decode_genres("Rock, Blues,"), vec!["Rock", "Blues"]);
        assert!(decode_genres("").is_empty());
    }
}
