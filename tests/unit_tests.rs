// Unit tests for Canje Engine

use canje_engine::core::{
    distressed::{DistressedAnalyzer, MarketRate, MarketRateTable},
    fuzzy::{get_fuzzy_location, MAX_JITTER_DEGREES},
    normalize::normalize,
    scoring::{calculate_match_score, MatchScorer},
};
use canje_engine::models::{Property, PropertyStatus, PropertyType, Requirement, RequirementPriority};
use rust_decimal::Decimal;

fn create_property(location: &str, price: i64, bedrooms: i32, bathrooms: i32) -> Property {
    Property {
        id: "prop".to_string(),
        owner_id: "broker_a".to_string(),
        title: "Casa".to_string(),
        description: None,
        price: Decimal::from(price),
        currency: "CLP".to_string(),
        location: location.to_string(),
        latitude: None,
        longitude: None,
        property_type: PropertyType::House,
        bedrooms: Some(bedrooms),
        bathrooms: Some(bathrooms),
        square_meters: Some(120),
        status: PropertyStatus::Active,
        is_distressed: false,
        opportunity_score: None,
        internal_notes: None,
        created_at: None,
    }
}

fn create_requirement(zones: &[&str], budget: i64, min_bedrooms: i32, min_bathrooms: i32) -> Requirement {
    Requirement {
        id: "req".to_string(),
        user_id: "broker_b".to_string(),
        budget_max: Decimal::from(budget),
        currency: "CLP".to_string(),
        zone_interest: zones.iter().map(|z| z.to_string()).collect(),
        property_types: vec![PropertyType::House],
        min_bedrooms: Some(min_bedrooms),
        min_bathrooms: Some(min_bathrooms),
        min_square_meters: None,
        priority: RequirementPriority::High,
        is_active: true,
        exchange_notes: None,
    }
}

#[test]
fn test_normalize_matches_accented_comuna() {
    assert_eq!(normalize("ÑUÑOA"), normalize("nunoa"));
    assert_eq!(normalize("Conchalí"), "conchali");
}

#[test]
fn test_apoquindo_scenario_scores_90() {
    let property = create_property("Av. Apoquindo 3000, Las Condes", 500_000_000, 3, 2);
    let requirement = create_requirement(&["Las Condes", "Vitacura"], 500_000_000, 3, 2);

    assert_eq!(calculate_match_score(&property, &requirement), 40 + 30 + 10 + 10);
}

#[test]
fn test_zone_miss_scores_zero_regardless_of_other_fields() {
    let requirement = create_requirement(&["Vitacura", "Lo Barnechea"], 1_000_000_000, 0, 0);

    for location in ["Av. Apoquindo 3000, Las Condes", "Irarrázaval 2000, Ñuñoa", ""] {
        let property = create_property(location, 1, 10, 10);
        assert_eq!(calculate_match_score(&property, &requirement), 0, "location {:?}", location);
    }
}

#[test]
fn test_full_pass_with_open_zones_scores_60() {
    let property = create_property("Camino Real 10, Temuco", 80_000_000, 2, 1);
    let requirement = create_requirement(&[], 80_000_000, 2, 1);

    assert_eq!(calculate_match_score(&property, &requirement), 10 + 30 + 10 + 10);
}

#[test]
fn test_accented_zone_interest_matches() {
    let property = create_property("Irarrazaval 2000, Nunoa", 150_000_000, 1, 1);
    let requirement = create_requirement(&["Santiago", "Providencia", "Ñuñoa"], 150_000_000, 1, 0);

    assert_eq!(calculate_match_score(&property, &requirement), 90);
}

#[test]
fn test_negotiable_price_earns_partial_credit() {
    let property = create_property("Las Condes", 200_000_000, 3, 2);
    let requirement = create_requirement(&["Las Condes"], 190_000_000, 3, 2);

    let breakdown = MatchScorer::default().breakdown(&property, &requirement);
    assert_eq!(breakdown.price, 15);
    assert_eq!(breakdown.total(), 75);
}

#[test]
fn test_scoring_is_idempotent() {
    let property = create_property("Av. Vitacura 5000, Vitacura", 420_000_000, 4, 3);
    let requirement = create_requirement(&["vitacura"], 400_000_000, 5, 3);

    let first = calculate_match_score(&property, &requirement);
    let second = calculate_match_score(&property, &requirement);
    assert_eq!(first, second);
    assert_eq!(first, 40 + 15 + 0 + 10);
}

#[test]
fn test_fuzzy_location_moves_coordinates() {
    let (lat, lng) = (-33.4372, -70.6506);
    let mut property = create_property("Moneda 1000, Santiago", 1, 1, 1);
    property.latitude = Some(lat);
    property.longitude = Some(lng);

    let draws: Vec<_> = (0..200).map(|_| get_fuzzy_location(&property)).collect();

    let moved = draws
        .iter()
        .filter(|fuzzy| {
            let dlat = (fuzzy.lat.unwrap() - lat).abs();
            let dlng = (fuzzy.lng.unwrap() - lng).abs();
            assert!(dlat <= MAX_JITTER_DEGREES + 1e-9);
            assert!(dlng <= MAX_JITTER_DEGREES + 1e-9);
            dlat > 0.0 && dlng > 0.0
        })
        .count();

    // An exact hit on 0.5 from the RNG is the only way to stay put
    assert!(moved >= 198, "only {} of 200 draws moved", moved);
    assert_ne!(draws[0].lat, draws[1].lat);
    assert!(draws.iter().all(|fuzzy| fuzzy.display == "Sector Exclusivo en Santiago"));
}

#[test]
fn test_distressed_boundary_is_strict() {
    let analyzer = DistressedAnalyzer::default();

    // Las Condes trades at 95 UF/m²; 15% below is 80.75 UF/m²
    let mut at_threshold = create_property("Av. Apoquindo 3000, Las Condes", 0, 3, 2);
    at_threshold.currency = "UF".to_string();
    at_threshold.square_meters = Some(100);
    at_threshold.price = Decimal::from(8_075);
    assert!(!analyzer.analyze(&at_threshold).is_distressed);

    let mut past_threshold = at_threshold.clone();
    past_threshold.price = Decimal::new(807_405, 2);
    assert!(analyzer.analyze(&past_threshold).is_distressed);
}

#[test]
fn test_custom_market_table_is_used() {
    let table = MarketRateTable::new(vec![MarketRate::new("las condes", 200)], Decimal::from(10));
    let analyzer = DistressedAnalyzer::new(table, "UF", Decimal::from(40_000), Decimal::from(15));

    // 400,000,000 CLP / 40,000 = 10,000 UF over 100 m² = 100 UF/m², half of 200
    let mut property = create_property("Las Condes", 400_000_000, 3, 2);
    property.square_meters = Some(100);

    let analysis = analyzer.analyze(&property);
    assert_eq!(analysis.estimated_discount, 50);
    assert_eq!(analysis.market_value, Decimal::from(20_000));
    assert!(analysis.is_distressed);
}
