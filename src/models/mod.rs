use serde::{Deserialize, Serialize};

/// A property listing as the API returns it
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Property {
    pub id: i64,
    pub address: String,
    pub price: f64,
    /// Area in square meters
    pub size: f64,
    #[serde(default)]
    pub description: Option<String>,
}

impl Property {
    /// Description with a missing value treated as empty
    pub fn description_or_empty(&self) -> &str {
        self.description.as_deref().unwrap_or("")
    }

    /// Write body carrying this record's fields, without the id
    pub fn to_draft(&self) -> PropertyDraft {
        PropertyDraft {
            address: self.address.clone(),
            price: self.price,
            size: self.size,
            description: self.description_or_empty().to_string(),
        }
    }
}

/// Body of a create or update request. The server owns the id.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PropertyDraft {
    pub address: String,
    pub price: f64,
    pub size: f64,
    #[serde(default)]
    pub description: String,
}

impl PropertyDraft {
    pub fn into_property(self, id: i64) -> Property {
        Property {
            id,
            address: self.address,
            price: self.price,
            size: self.size,
            description: Some(self.description),
        }
    }
}
