use unicode_normalization::{char::is_combining_mark, UnicodeNormalization};

/// Lowercase, NFD-decompose and drop combining marks.
///
/// Every location and zone comparison goes through this, so "Ñuñoa" and
/// "nunoa" compare equal.
#[inline]
pub fn normalize(s: &str) -> String {
    s.to_lowercase()
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .collect()
}

/// Last comma-separated segment of a location, trimmed.
///
/// "Av. Apoquindo 3000, Las Condes" -> "Las Condes". An empty input yields "".
#[inline]
pub fn last_segment(location: &str) -> &str {
    location.rsplit(',').next().unwrap_or(location).trim()
}
