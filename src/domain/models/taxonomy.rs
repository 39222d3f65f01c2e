use serde::{Deserialize, Serialize};

/// Ordered topic tree: categories, each with ordered subcategories.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Taxonomy {
    pub categories: Vec<Category>,
}

/// A named category and its subcategory names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub name: String,
    #[serde(default)]
    pub subcategories: Vec<String>,
}

impl Taxonomy {
    /// Parse the topics file format: `{"categories": [{"name": .., "subcategories": [..]}]}`.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Total number of subcategories across all categories.
    pub fn subcategory_count(&self) -> usize {
        self.categories.iter().map(|c| c.subcategories.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_preserves_order() {
        let json = r#"{
            "categories": [
                {"name": "Science", "subcategories": ["Physics", "Chemistry"]},
                {"name": "History", "subcategories": ["Antiquity"]}
            ]
        }"#;

        let taxonomy = Taxonomy::from_json(json).unwrap();

        assert_eq!(taxonomy.categories.len(), 2);
        assert_eq!(taxonomy.categories[0].name, "Science");
        assert_eq!(taxonomy.categories[0].subcategories, vec!["Physics", "Chemistry"]);
        assert_eq!(taxonomy.categories[1].name, "History");
        assert_eq!(taxonomy.subcategory_count(), 3);
    }

    #[test]
    fn test_missing_subcategories_defaults_to_empty() {
        let taxonomy = Taxonomy::from_json(r#"{"categories": [{"name": "Art"}]}"#).unwrap();
        assert!(taxonomy.categories[0].subcategories.is_empty());
    }

    #[test]
    fn test_missing_categories_is_an_error() {
        assert!(Taxonomy::from_json(r#"{"topics": []}"#).is_err());
    }
}
