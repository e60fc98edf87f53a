use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// One row of the mobile food facility permit dataset.
///
/// Every field is optional: the dataset routinely omits keys or sends
/// `null`, and nothing is validated until a record is displayed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FoodTruckRecord {
    pub applicant: Option<String>,
    pub permit: Option<String>,
    pub locationdescription: Option<String>,
    pub fooditems: Option<String>,
    #[serde(
        default,
        deserialize_with = "text_or_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub latitude: Option<String>,
    #[serde(
        default,
        deserialize_with = "text_or_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub longitude: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub facilitytype: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

/// Coordinates arrive as numeric strings, but some mirrors send plain numbers.
fn text_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

fn present(field: &Option<String>) -> Option<&str> {
    field.as_deref().filter(|s| !s.is_empty())
}

impl FoodTruckRecord {
    pub fn name(&self) -> &str {
        self.applicant.as_deref().unwrap_or_default()
    }

    pub fn permit_id(&self) -> &str {
        self.permit.as_deref().unwrap_or_default()
    }

    pub fn location(&self) -> &str {
        self.locationdescription.as_deref().unwrap_or_default()
    }

    pub fn food_items(&self) -> &str {
        self.fooditems.as_deref().unwrap_or_default()
    }

    /// Whether the food items text mentions tacos, ignoring case.
    pub fn serves_tacos(&self) -> bool {
        self.fooditems
            .as_deref()
            .is_some_and(|items| items.to_lowercase().contains("taco"))
    }

    /// The three fields the details panel needs, if all are non-empty.
    pub fn details(&self) -> Option<TruckDetails> {
        Some(TruckDetails {
            name: present(&self.applicant)?.to_string(),
            location: present(&self.locationdescription)?.to_string(),
            food_type: present(&self.fooditems)?.to_string(),
        })
    }

    /// Parsed position, or `None` for absent, malformed, or placeholder coordinates.
    pub fn coordinate(&self) -> Option<GeoCoordinate> {
        let lat = self.latitude.as_deref()?.trim().parse::<f64>().ok()?;
        let lng = self.longitude.as_deref()?.trim().parse::<f64>().ok()?;
        // the dataset uses 0,0 for permits without a surveyed location
        if lat == 0.0 && lng == 0.0 {
            return None;
        }
        GeoCoordinate::new(lat, lng)
    }
}

/// Entry in the taco selector: label and selection value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TacoTruckSummary {
    pub name: String,
    pub permit: String,
}

impl From<&FoodTruckRecord> for TacoTruckSummary {
    fn from(record: &FoodTruckRecord) -> Self {
        Self {
            name: record.name().to_string(),
            permit: record.permit_id().to_string(),
        }
    }
}

/// What the details panel shows for a selected taco truck.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TruckDetails {
    pub name: String,
    pub location: String,
    pub food_type: String,
}

/// A WGS84 position in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoCoordinate {
    pub lat: f64,
    pub lng: f64,
}

impl GeoCoordinate {
    /// Rejects non-finite and out-of-range values.
    pub fn new(lat: f64, lng: f64) -> Option<Self> {
        let valid = lat.is_finite()
            && lng.is_finite()
            && (-90.0..=90.0).contains(&lat)
            && (-180.0..=180.0).contains(&lng);
        valid.then_some(Self { lat, lng })
    }
}

/// A truck that passed the proximity filter.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NearbyTruck {
    pub record: FoodTruckRecord,
    pub distance_km: f64,
}
