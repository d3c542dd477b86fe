/// Index into `World::location`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct LocationId(pub u32);

/// Tags an entity as a clickable location pin.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Marker {
    pub location: LocationId,
}

impl Marker {
    pub fn new(location: LocationId) -> Self {
        Self { location }
    }
}
