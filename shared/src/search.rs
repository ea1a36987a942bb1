//! Records handed to the core by the shell's search SDK.

use serde::{Deserialize, Serialize};

use crate::geo::Coordinate;
use crate::overlay::MarkerIcon;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub id: String,
    pub name: String,
    pub coordinate: Coordinate,
    #[serde(default)]
    pub address: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FavoriteRecord {
    pub id: String,
    pub name: String,
    pub coordinate: Coordinate,
}

impl FavoriteRecord {
    #[must_use]
    pub fn icon(&self) -> MarkerIcon {
        match self.id.as_str() {
            "home" => MarkerIcon::Home,
            "work" => MarkerIcon::Work,
            _ => MarkerIcon::Favorite,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchCategory {
    pub id: String,
    pub name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn favorite(id: &str) -> FavoriteRecord {
        FavoriteRecord {
            id: id.into(),
            name: id.to_uppercase(),
            coordinate: Coordinate::new(23.0, 72.5).unwrap(),
        }
    }

    #[test]
    fn test_favorite_icons_follow_id() {
        assert_eq!(favorite("home").icon(), MarkerIcon::Home);
        assert_eq!(favorite("work").icon(), MarkerIcon::Work);
        assert_eq!(favorite("gym").icon(), MarkerIcon::Favorite);
        assert_eq!(favorite("Home").icon(), MarkerIcon::Favorite);
    }

    #[test]
    fn test_search_result_address_is_optional() {
        let json = r#"{
            "id": "poi-1",
            "name": "Kankaria Lake",
            "coordinate": { "latitude": 23.006, "longitude": 72.601 }
        }"#;
        let result: SearchResult = serde_json::from_str(json).unwrap();
        assert_eq!(result.address, None);
        assert_eq!(result.coordinate.latitude(), 23.006);
    }
}
