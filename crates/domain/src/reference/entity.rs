use serde::{Deserialize, Serialize};

/// Top level of the geographic hierarchy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct City {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Zone {
    pub id: String,
    pub name: String,
    pub city_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ward {
    pub id: String,
    pub name: String,
    pub zone_id: String,
}

/// Leaf of the hierarchy: the actual work site.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub id: String,
    pub name: String,
    pub ward_id: String,
}

/// Which level of the hierarchy a record belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReferenceKind {
    City,
    Zone,
    Ward,
    Location,
}

impl ReferenceKind {
    /// Parse the plural path segment used by the HTTP API (`cities`, `zones`, ...).
    pub fn from_plural(segment: &str) -> Option<Self> {
        match segment {
            "cities" => Some(Self::City),
            "zones" => Some(Self::Zone),
            "wards" => Some(Self::Ward),
            "locations" => Some(Self::Location),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::City => "City",
            Self::Zone => "Zone",
            Self::Ward => "Ward",
            Self::Location => "Location",
        }
    }

    /// The level directly above this one, if any.
    pub fn parent(&self) -> Option<Self> {
        match self {
            Self::City => None,
            Self::Zone => Some(Self::City),
            Self::Ward => Some(Self::Zone),
            Self::Location => Some(Self::Ward),
        }
    }
}

impl std::fmt::Display for ReferenceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label().to_lowercase())
    }
}
