use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Per-feature adjustments keyed by catalog id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Override {
    /// Replaces the catalog name on labels.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Draw the feature even when it is fainter than its type's cutoff.
    pub show: bool,
}

impl Override {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            show: false,
        }
    }

    pub fn shown(mut self) -> Self {
        self.show = true;
        self
    }
}

/// Name/visibility overrides, injected by the caller.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Overrides(BTreeMap<String, Override>);

const BRIGHT_STARS: [(&str, &str); 27] = [
    ("HIP24436", "Rigel"),
    ("HIP27989", "Betelgeuse"),
    ("HIP32349", "Sirius"),
    ("HIP37279", "Procyon"),
    ("HIP24608", "Capella"),
    ("HIP5447", "Mirach"),
    ("HIP14576", "Algol"),
    ("HIP21421", "Aldebaran"),
    ("HIP10826", "Mira"),
    ("HIP49669", "Regulus"),
    ("HIP57632", "Denebola"),
    ("HIP65474", "Spica"),
    ("HIP69673", "Arcturus"),
    ("HIP11767", "Polaris"),
    ("HIP54061", "Dubhe"),
    ("HIP62956", "Alioth"),
    ("HIP67301", "Alkaid"),
    ("HIP102098", "Deneb"),
    ("HIP91262", "Vega"),
    ("HIP97649", "Altair"),
    ("HIP36850", "Castor"),
    ("HIP37826", "Pollux"),
    ("HIP113368", "Fomalhaut"),
    ("HIP80763", "Antares"),
    ("HIP60718", "Acrux"),
    ("HIP30438", "Canopus"),
    ("HIP7588", "Achernar"),
];

impl Overrides {
    pub fn new() -> Self {
        Self::default()
    }

    /// Proper names for the brightest stars, keyed by Hipparcos id.
    pub fn bright_stars() -> Self {
        Self(
            BRIGHT_STARS
                .iter()
                .map(|(id, name)| (id.to_string(), Override::named(*name)))
                .collect(),
        )
    }

    pub fn insert(&mut self, id: impl Into<String>, entry: Override) {
        self.0.insert(id.into(), entry);
    }

    /// Entries from `other` win.
    pub fn extend(&mut self, other: Overrides) {
        self.0.extend(other.0);
    }

    pub fn get(&self, id: &str) -> Option<&Override> {
        self.0.get(id)
    }

    pub fn name_for(&self, id: &str) -> Option<&str> {
        self.0.get(id).and_then(|o| o.name.as_deref())
    }

    pub fn always_show(&self, id: &str) -> bool {
        self.0.get(id).is_some_and(|o| o.show)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn bright_star_names() {
        let o = Overrides::bright_stars();
        assert_eq!(o.len(), 27);
        assert_eq!(o.name_for("HIP32349"), Some("Sirius"));
        assert!(!o.always_show("HIP32349"));
        assert_eq!(o.name_for("HIP1"), None);
    }

    #[test]
    fn caller_entries_win() {
        let mut o = Overrides::bright_stars();
        let mut extra = Overrides::new();
        extra.insert("HIP32349", Override::named("Dog Star").shown());
        extra.insert("NGC7000", Override::default().shown());
        o.extend(extra);

        assert_eq!(o.name_for("HIP32349"), Some("Dog Star"));
        assert!(o.always_show("HIP32349"));
        assert!(o.always_show("NGC7000"));
        assert_eq!(o.name_for("NGC7000"), None);
    }

    #[test]
    fn deserializes_from_id_map() {
        let o: Overrides = serde_json::from_str(
            r#"{"M31": {"name": "Andromeda", "show": true}, "M42": {"show": true}}"#,
        )
        .unwrap();
        assert_eq!(o.get("M31"), Some(&Override::named("Andromeda").shown()));
        assert_eq!(o.get("M42"), Some(&Override::default().shown()));
    }
}
