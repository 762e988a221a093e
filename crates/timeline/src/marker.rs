use serde::{Deserialize, Serialize};

/// A labelled point on the timeline ruler.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Marker {
    pub id: String,
    pub time: f64,
    #[serde(default)]
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarkerPatch {
    pub time: Option<f64>,
    pub label: Option<String>,
    pub color: Option<String>,
}

impl MarkerPatch {
    pub fn apply_to(&self, marker: &Marker) -> Marker {
        Marker {
            id: marker.id.clone(),
            time: self.time.unwrap_or(marker.time).max(0.0),
            label: self.label.clone().unwrap_or_else(|| marker.label.clone()),
            color: self.color.clone().or_else(|| marker.color.clone()),
        }
    }
}
