use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suburb {
    pub suburb_id: i64,
    pub suburb_name: String,
    pub postcode: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Layout {
    pub layout_id: i64,
    pub layout_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Agency {
    pub agency_id: i64,
    pub agency_name: String,
}

/// Primary and secondary schools share this shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct School {
    pub school_id: i64,
    pub school_name: String,
}

// ---------------------------------------------------------------------------
// Dimensions — Reference data snapshot used to populate selectors and labels
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimensions {
    pub suburbs: Vec<Suburb>,
    pub layouts: Vec<Layout>,
    pub agencies: Vec<Agency>,
    pub primary_schools: Vec<School>,
    pub secondary_schools: Vec<School>,
    pub available_years: Vec<i32>,
    pub available_postcodes: Vec<i32>,
    pub available_property_types: Vec<String>,
}

impl Dimensions {
    pub fn suburb_name(&self, suburb_id: i64) -> Option<&str> {
        self.suburbs
            .iter()
            .find(|s| s.suburb_id == suburb_id)
            .map(|s| s.suburb_name.as_str())
    }

    pub fn layout_name(&self, layout_id: i64) -> Option<&str> {
        self.layouts
            .iter()
            .find(|l| l.layout_id == layout_id)
            .map(|l| l.layout_name.as_str())
    }
}
