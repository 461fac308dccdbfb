use rand::Rng;
use crate::core::normalize::last_segment;
use crate::models::{FuzzyLocation, Property};

/// Maximum jitter applied to each coordinate axis, in degrees
pub const MAX_JITTER_DEGREES: f64 = 0.005;

/// Approximate location for public display before a deal is brokered.
///
/// Shows only the broadest administrative unit (the last comma segment of
/// the location) and shifts each known coordinate by up to
/// [`MAX_JITTER_DEGREES`]. Jitter is drawn fresh on every call.
pub fn get_fuzzy_location(property: &Property) -> FuzzyLocation {
    get_fuzzy_location_with(property, &mut rand::thread_rng())
}

/// Same as [`get_fuzzy_location`] with a caller-supplied RNG
pub fn get_fuzzy_location_with<R: Rng + ?Sized>(property: &Property, rng: &mut R) -> FuzzyLocation {
    let comuna = match last_segment(&property.location) {
        "" => property.location.as_str(),
        segment => segment,
    };

    FuzzyLocation {
        display: format!("Sector Exclusivo en {}", comuna),
        lat: property.latitude.map(|lat| lat + jitter(rng)),
        lng: property.longitude.map(|lng| lng + jitter(rng)),
        is_exact: false,
    }
}

#[inline]
fn jitter<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    (rng.gen::<f64>() - 0.5) * (MAX_JITTER_DEGREES * 2.0)
}
