use std::fmt::Debug;
use crate::core::normalize::normalize;

/// Decides whether a free-text property location lies inside any of a
/// requirement's zones.
///
/// The scorer only relies on this yes/no answer, so a geo-index backed
/// implementation (bounding box, polygon containment) can replace the
/// substring one without touching the weighting logic.
pub trait LocationMatcher: Debug + Send + Sync {
    /// `zones` is never empty when called from the scorer.
    fn matches(&self, location: &str, zones: &[String]) -> bool;
}

/// Case and accent-insensitive substring containment
#[derive(Debug, Clone, Copy, Default)]
pub struct SubstringLocationMatcher;

impl LocationMatcher for SubstringLocationMatcher {
    fn matches(&self, location: &str, zones: &[String]) -> bool {
        let location = normalize(location);
        zones
            .iter()
            .any(|zone| location.contains(normalize(zone).as_str()))
    }
}
