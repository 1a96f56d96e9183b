/// A named point on the map.
#[derive(Debug, Clone, PartialEq)]
pub struct Feature {
    pub name: String,
    pub lon: f64,
    pub lat: f64,
}

/// Named point features that replay can move around.
#[derive(Debug, Default)]
pub struct FeatureLayer {
    features: Vec<Feature>,
}

impl FeatureLayer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Place a feature, replacing any existing one with the same name.
    pub fn add(&mut self, name: impl Into<String>, lon: f64, lat: f64) {
        let name = name.into();
        self.features.retain(|f| f.name != name);
        self.features.push(Feature { name, lon, lat });
    }

    pub fn get(&self, name: &str) -> Option<&Feature> {
        self.features.iter().find(|f| f.name == name)
    }

    pub fn position(&self, name: &str) -> Option<(f64, f64)> {
        self.get(name).map(|f| (f.lon, f.lat))
    }

    /// Move an existing feature. Returns false when no feature has that name.
    pub fn set_coordinates(&mut self, name: &str, lon: f64, lat: f64) -> bool {
        match self.features.iter_mut().find(|f| f.name == name) {
            Some(feature) => {
                feature.lon = lon;
                feature.lat = lat;
                true
            }
            None => false,
        }
    }
}
