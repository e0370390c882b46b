use shared_types::LocationParts;

/// Split `"City, State, Country"` into its parts.
///
/// Segments are separated by `", "`. Place names are not validated and
/// anything after the third segment is dropped.
pub fn split_location(text: &str) -> LocationParts {
    let mut segments = text
        .split(", ")
        .map(|s| s.trim().to_string())
        .map(|s| Some(s).filter(|s| !s.is_empty()));

    LocationParts {
        city: segments.next().flatten(),
        state: segments.next().flatten(),
        country: segments.next().flatten(),
    }
}
