use formats::ObjectType;
use serde::{Deserialize, Serialize};

pub const CONSTELLATIONS_LOCATION: &str = "./data/constellations.json";
pub const BRIGHT_OBJECTS_LOCATION: &str = "./data/objects.json";
pub const MESSIER_OBJECTS_LOCATION: &str = "./data/objects_messier.json";
pub const STARS_LOCATION: &str = "./data/starsHD.json";

/// The three catalogs a chart consumes. Declaration order is draw order:
/// later slots paint on top of earlier ones.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CatalogSlot {
    Constellations,
    Objects,
    Stars,
}

impl CatalogSlot {
    pub const ALL: [CatalogSlot; 3] = [
        CatalogSlot::Constellations,
        CatalogSlot::Objects,
        CatalogSlot::Stars,
    ];

    /// Queue priority; smaller loads first.
    pub fn priority(self) -> i32 {
        match self {
            CatalogSlot::Constellations => 0,
            CatalogSlot::Objects => 1,
            CatalogSlot::Stars => 2,
        }
    }

    /// Object type assumed for features without a `type` property.
    pub fn default_type(self) -> Option<ObjectType> {
        match self {
            CatalogSlot::Constellations => Some(ObjectType::Constellation),
            CatalogSlot::Objects => None,
            CatalogSlot::Stars => Some(ObjectType::Star),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            CatalogSlot::Constellations => "constellations",
            CatalogSlot::Objects => "objects",
            CatalogSlot::Stars => "stars",
        }
    }
}

impl std::fmt::Display for CatalogSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Which deep-sky list feeds the object slot.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectCatalog {
    #[default]
    Bright,
    Messier,
}

impl ObjectCatalog {
    pub fn location(self) -> &'static str {
        match self {
            ObjectCatalog::Bright => BRIGHT_OBJECTS_LOCATION,
            ObjectCatalog::Messier => MESSIER_OBJECTS_LOCATION,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slots_sort_in_draw_order() {
        let mut slots = vec![
            CatalogSlot::Stars,
            CatalogSlot::Constellations,
            CatalogSlot::Objects,
        ];
        slots.sort();
        assert_eq!(slots, CatalogSlot::ALL.to_vec());
        assert!(CatalogSlot::ALL
            .windows(2)
            .all(|w| w[0].priority() < w[1].priority()));
    }

    #[test]
    fn object_catalog_locations() {
        assert_eq!(ObjectCatalog::default().location(), BRIGHT_OBJECTS_LOCATION);
        assert_eq!(ObjectCatalog::Messier.location(), MESSIER_OBJECTS_LOCATION);
    }
}
