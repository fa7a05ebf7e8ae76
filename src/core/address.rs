use crate::models::AreaHint;

/// Derive a (city, state) hint from a geocoder's matched address
///
/// The address is split on commas and blank segments are dropped:
/// - 3+ segments: third-from-last and second-from-last
///   (`"4600 Silver Hill Rd, Washington, DC, 20233"` -> Washington, DC)
/// - 2 segments: first and second
/// - 1 segment: city only
/// - 0 segments: nothing
///
/// No gazetteer lookup is involved; the result is purely positional.
pub fn parse_area_hint(matched_address: &str) -> AreaHint {
    let parts: Vec<&str> = matched_address
        .split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .collect();

    let (city, state) = match parts.as_slice() {
        [] => (None, None),
        [city] => (Some(*city), None),
        [city, state] => (Some(*city), Some(*state)),
        [.., city, state, _] => (Some(*city), Some(*state)),
    };

    AreaHint {
        city: city.map(str::to_string),
        state: state.map(str::to_string),
    }
}
