use formats::ObjectType;

/// Something that contributes drawables to one output group.
pub trait Layer {
    fn group(&self) -> LayerGroup;
}

/// Output groups, in paint order.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum LayerGroup {
    Lines,
    Constellations,
    Objects,
    Stars,
    Solar,
    Labels,
}

impl LayerGroup {
    pub const ALL: [LayerGroup; 6] = [
        LayerGroup::Lines,
        LayerGroup::Constellations,
        LayerGroup::Objects,
        LayerGroup::Stars,
        LayerGroup::Solar,
        LayerGroup::Labels,
    ];

    pub fn for_type(ty: ObjectType) -> Self {
        match ty {
            ObjectType::Constellation => LayerGroup::Constellations,
            ObjectType::Star => LayerGroup::Stars,
            ObjectType::Sun | ObjectType::Moon => LayerGroup::Solar,
            ObjectType::Galaxy
            | ObjectType::OpenCluster
            | ObjectType::GlobularCluster
            | ObjectType::PlanetaryNebula
            | ObjectType::BrightNebula => LayerGroup::Objects,
        }
    }

    pub fn class_name(self) -> &'static str {
        match self {
            LayerGroup::Lines => "lines",
            LayerGroup::Constellations => "constellations",
            LayerGroup::Objects => "objects",
            LayerGroup::Stars => "stars",
            LayerGroup::Solar => "solar",
            LayerGroup::Labels => "labels",
        }
    }
}
