//! Normalized point-of-interest model
//!
//! These types are what the registry client hands to callers after the wire
//! envelope has been validated and unwrapped. They are never persisted.

use super::ids::PoiId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Scale factor of the registry's fixed-point coordinates
pub const COORDINATE_SCALE: f64 = 10_000_000.0;

/// Longitude/latitude pair in decimal degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LngLat {
    pub lng: f64,
    pub lat: f64,
}

/// Converts raw fixed-point registry coordinates into decimal degrees
///
/// `raw_x` is the longitude and `raw_y` the latitude, each scaled by 10^7.
///
/// ```
/// use tourmark::domain::place::convert_coordinates;
///
/// let point = convert_coordinates(1_270_000_000, 375_000_000);
/// assert_eq!(point.lng, 127.0);
/// assert_eq!(point.lat, 37.5);
/// ```
pub fn convert_coordinates(raw_x: i64, raw_y: i64) -> LngLat {
    LngLat {
        lng: raw_x as f64 / COORDINATE_SCALE,
        lat: raw_y as f64 / COORDINATE_SCALE,
    }
}

/// Coordinates in both representations
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    /// Fixed-point longitude as received
    pub raw_x: i64,
    /// Fixed-point latitude as received
    pub raw_y: i64,
    /// Derived decimal longitude
    pub lng: f64,
    /// Derived decimal latitude
    pub lat: f64,
}

impl Coordinates {
    /// Builds both representations from the raw fixed-point pair
    pub fn from_raw(raw_x: i64, raw_y: i64) -> Self {
        let LngLat { lng, lat } = convert_coordinates(raw_x, raw_y);
        Self {
            raw_x,
            raw_y,
            lng,
            lat,
        }
    }
}

/// Postal address with an optional secondary line
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    pub primary: String,
    pub secondary: Option<String>,
}

impl Address {
    /// Both lines joined by a single space
    pub fn full(&self) -> String {
        match &self.secondary {
            Some(line) => format!("{} {}", self.primary, line),
            None => self.primary.clone(),
        }
    }
}

/// A normalized point of interest
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointOfInterest {
    pub id: PoiId,
    /// Registry content type (e.g. `12` for attractions, `39` for restaurants)
    pub category_id: String,
    pub title: String,
    pub address: Address,
    pub coordinates: Option<Coordinates>,
    /// Image URLs, primary first
    pub images: Vec<String>,
    pub phone: Option<String>,
    /// `YYYYMMDDHHmmss`, may be absent or malformed
    pub last_modified: Option<String>,
    /// Free-text overview (detail responses only)
    pub overview: Option<String>,
}

impl PointOfInterest {
    /// Creates a record with only the mandatory fields set
    pub fn new(id: PoiId, title: impl Into<String>) -> Self {
        Self {
            id,
            category_id: String::new(),
            title: title.into(),
            address: Address::default(),
            coordinates: None,
            images: Vec::new(),
            phone: None,
            last_modified: None,
            overview: None,
        }
    }

    /// Set the category id
    pub fn with_category(mut self, category_id: impl Into<String>) -> Self {
        self.category_id = category_id.into();
        self
    }

    /// Set the last-modified timestamp string
    pub fn with_last_modified(mut self, last_modified: impl Into<String>) -> Self {
        self.last_modified = Some(last_modified.into());
        self
    }

    /// Set the coordinates from the raw fixed-point pair
    pub fn with_raw_coordinates(mut self, raw_x: i64, raw_y: i64) -> Self {
        self.coordinates = Some(Coordinates::from_raw(raw_x, raw_y));
        self
    }

    /// Set the address
    pub fn with_address(mut self, primary: impl Into<String>, secondary: Option<String>) -> Self {
        self.address = Address {
            primary: primary.into(),
            secondary,
        };
        self
    }
}

/// One page of normalized results with the registry's paging metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacePage {
    pub records: Vec<PointOfInterest>,
    /// Total number of matches reported by the registry, not `records.len()`
    pub total_count: u64,
    pub page_number: u32,
    pub page_size: u32,
}

/// Category-specific operating details (`detailIntro`)
///
/// The field set differs per category, so values are kept as a sorted map of
/// non-blank strings with accessors for the common keys.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperatingInfo {
    pub id: PoiId,
    pub category_id: String,
    pub fields: BTreeMap<String, String>,
}

impl OperatingInfo {
    /// Raw field lookup
    pub fn field(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(String::as_str)
    }

    /// Opening hours
    pub fn opening_hours(&self) -> Option<&str> {
        self.field("usetime")
            .or_else(|| self.field("opentimefood"))
            .or_else(|| self.field("usetimeculture"))
    }

    /// Closing days
    pub fn rest_days(&self) -> Option<&str> {
        self.field("restdate")
            .or_else(|| self.field("restdatefood"))
            .or_else(|| self.field("restdateculture"))
    }

    /// Parking information
    pub fn parking(&self) -> Option<&str> {
        self.field("parking")
            .or_else(|| self.field("parkingfood"))
            .or_else(|| self.field("parkingculture"))
    }

    /// Information desk contact
    pub fn info_center(&self) -> Option<&str> {
        self.field("infocenter")
            .or_else(|| self.field("infocenterfood"))
            .or_else(|| self.field("infocenterculture"))
    }
}

/// An image attached to a point of interest (`detailImage`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoiImage {
    pub origin_url: String,
    pub thumbnail_url: Option<String>,
    pub name: Option<String>,
}
