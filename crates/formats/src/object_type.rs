use serde::{Deserialize, Serialize};

/// Object classes the chart knows how to draw.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ObjectType {
    Star,
    Galaxy,
    OpenCluster,
    GlobularCluster,
    PlanetaryNebula,
    BrightNebula,
    Constellation,
    Sun,
    Moon,
}

impl ObjectType {
    pub const ALL: [ObjectType; 9] = [
        ObjectType::Star,
        ObjectType::Galaxy,
        ObjectType::OpenCluster,
        ObjectType::GlobularCluster,
        ObjectType::PlanetaryNebula,
        ObjectType::BrightNebula,
        ObjectType::Constellation,
        ObjectType::Sun,
        ObjectType::Moon,
    ];

    /// Deep-sky classes carried by the object catalog.
    pub const DEEP_SKY: [ObjectType; 5] = [
        ObjectType::Galaxy,
        ObjectType::OpenCluster,
        ObjectType::GlobularCluster,
        ObjectType::PlanetaryNebula,
        ObjectType::BrightNebula,
    ];

    /// Parses the `type` property used by the catalogs.
    ///
    /// Multiple stars collapse into `Star`. Types the chart does not draw
    /// (e.g. `Milky Way`) return `None`.
    pub fn from_catalog_name(name: &str) -> Option<Self> {
        match name.trim() {
            "Star" | "Double Star" | "Triple Star" => Some(ObjectType::Star),
            "Galaxy" => Some(ObjectType::Galaxy),
            "Open Cluster" => Some(ObjectType::OpenCluster),
            "Globular Cluster" => Some(ObjectType::GlobularCluster),
            "Planetary Nebula" => Some(ObjectType::PlanetaryNebula),
            "Bright Nebula" => Some(ObjectType::BrightNebula),
            "Constellation" => Some(ObjectType::Constellation),
            "Sun" => Some(ObjectType::Sun),
            "Moon" => Some(ObjectType::Moon),
            _ => None,
        }
    }

    pub fn catalog_name(self) -> &'static str {
        match self {
            ObjectType::Star => "Star",
            ObjectType::Galaxy => "Galaxy",
            ObjectType::OpenCluster => "Open Cluster",
            ObjectType::GlobularCluster => "Globular Cluster",
            ObjectType::PlanetaryNebula => "Planetary Nebula",
            ObjectType::BrightNebula => "Bright Nebula",
            ObjectType::Constellation => "Constellation",
            ObjectType::Sun => "Sun",
            ObjectType::Moon => "Moon",
        }
    }

    /// CSS-style class used on rendered symbols and labels.
    pub fn class_name(self) -> &'static str {
        match self {
            ObjectType::Star => "star",
            ObjectType::Galaxy => "galaxy",
            ObjectType::OpenCluster => "open-cluster",
            ObjectType::GlobularCluster => "globular-cluster",
            ObjectType::PlanetaryNebula => "planetary-nebula",
            ObjectType::BrightNebula => "bright-nebula",
            ObjectType::Constellation => "constellation",
            ObjectType::Sun => "sun",
            ObjectType::Moon => "moon",
        }
    }
}

impl std::fmt::Display for ObjectType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.catalog_name())
    }
}
