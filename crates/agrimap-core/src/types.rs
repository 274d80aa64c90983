//! Domain types for the rental-depot map pipeline.
//!
//! ## Observed wire shape from `GET /api/map/rental-locations`
//!
//! ### Machine counts
//! The portal transports every inventory count as a **JSON string**, not a
//! number. Example: `"tractor": "12"`, `"seeder": "0"`. Blank or malformed
//! strings occur in the upstream open-data feed and are parsed as `0`.
//!
//! ### `lat` / `lng`
//! JSON numbers or `null`. Most records arrive without coordinates and are
//! geocoded client-side from `address`; a record that already carries both
//! keeps them for the whole session — enrichment never overwrites.
//!
//! ### `phone` / `jibun`
//! Present but frequently the empty string. Both are normalised to `None`
//! on deserialization so callers never branch on `""`.

use serde::{Deserialize, Deserializer, Serialize};

/// A geographic point as produced by the geocoder.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

/// The eight machine-type inventory columns served by the portal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MachineType {
    Tractor,
    Cultivator,
    Manager,
    Rootcrop,
    Thresher,
    Seeder,
    RiceTransplanter,
    RiceHarvester,
}

impl MachineType {
    pub const ALL: [MachineType; 8] = [
        MachineType::Tractor,
        MachineType::Cultivator,
        MachineType::Manager,
        MachineType::Rootcrop,
        MachineType::Thresher,
        MachineType::Seeder,
        MachineType::RiceTransplanter,
        MachineType::RiceHarvester,
    ];

    /// Wire key as used by the portal JSON and CLI flags.
    #[must_use]
    pub fn key(self) -> &'static str {
        match self {
            MachineType::Tractor => "tractor",
            MachineType::Cultivator => "cultivator",
            MachineType::Manager => "manager",
            MachineType::Rootcrop => "rootcrop",
            MachineType::Thresher => "thresher",
            MachineType::Seeder => "seeder",
            MachineType::RiceTransplanter => "riceTransplanter",
            MachineType::RiceHarvester => "riceHarvester",
        }
    }

    /// Human-readable label for summaries and detail views.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            MachineType::Tractor => "Tractor",
            MachineType::Cultivator => "Power tiller",
            MachineType::Manager => "Field manager",
            MachineType::Rootcrop => "Root-crop harvester",
            MachineType::Thresher => "Thresher",
            MachineType::Seeder => "Seeder",
            MachineType::RiceTransplanter => "Rice transplanter",
            MachineType::RiceHarvester => "Rice harvester",
        }
    }
}

impl std::str::FromStr for MachineType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MachineType::ALL
            .into_iter()
            .find(|m| m.key() == s)
            .ok_or_else(|| format!("unknown machine type: {s}"))
    }
}

/// A filterable equipment key: one of the eight machine types, or the
/// `other` sentinel matching the free-text equipment field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EquipmentKey {
    Machine(MachineType),
    Other,
}

impl std::str::FromStr for EquipmentKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "other" {
            return Ok(EquipmentKey::Other);
        }
        s.parse::<MachineType>().map(EquipmentKey::Machine)
    }
}

/// One rental depot as served by `GET /api/map/rental-locations`.
///
/// `name` is the de facto unique key for the session — the upstream feed
/// provides no numeric id, so favorites and marker-detail lookups key on it.
/// Two depots sharing a name would collide; lookups resolve to the first
/// match.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocationRecord {
    pub name: String,

    /// Road-form address; geocoding input. May be blank, in which case the
    /// record is never submitted for geocoding.
    #[serde(default)]
    pub address: String,

    /// Legacy lot-number address.
    #[serde(default, deserialize_with = "blank_as_none")]
    pub jibun: Option<String>,

    #[serde(default, deserialize_with = "blank_as_none")]
    pub phone: Option<String>,

    #[serde(default)]
    pub lat: Option<f64>,

    #[serde(default)]
    pub lng: Option<f64>,

    #[serde(default)]
    pub tractor: String,
    #[serde(default)]
    pub cultivator: String,
    #[serde(default)]
    pub manager: String,
    #[serde(default)]
    pub rootcrop: String,
    #[serde(default)]
    pub thresher: String,
    #[serde(default)]
    pub seeder: String,
    #[serde(default, rename = "riceTransplanter")]
    pub rice_transplanter: String,
    #[serde(default, rename = "riceHarvester")]
    pub rice_harvester: String,

    /// Free-text description of uncategorised equipment.
    #[serde(default)]
    pub other: String,
}

impl LocationRecord {
    /// Parsed inventory count for one machine type. Blank or malformed wire
    /// strings count as zero.
    #[must_use]
    pub fn count(&self, machine: MachineType) -> u32 {
        let raw = match machine {
            MachineType::Tractor => &self.tractor,
            MachineType::Cultivator => &self.cultivator,
            MachineType::Manager => &self.manager,
            MachineType::Rootcrop => &self.rootcrop,
            MachineType::Thresher => &self.thresher,
            MachineType::Seeder => &self.seeder,
            MachineType::RiceTransplanter => &self.rice_transplanter,
            MachineType::RiceHarvester => &self.rice_harvester,
        };
        raw.trim().parse().unwrap_or(0)
    }

    /// Whether the free-text `other` field names any equipment.
    #[must_use]
    pub fn has_other_equipment(&self) -> bool {
        !self.other.trim().is_empty()
    }

    /// Both coordinates, when the record is renderable on the map.
    #[must_use]
    pub fn coordinates(&self) -> Option<Coordinates> {
        match (self.lat, self.lng) {
            (Some(lat), Some(lng)) => Some(Coordinates { lat, lng }),
            _ => None,
        }
    }

    /// A record enters the geocoding queue only when neither coordinate is
    /// present.
    #[must_use]
    pub fn needs_geocoding(&self) -> bool {
        self.lat.is_none() && self.lng.is_none()
    }

    /// Attaches coordinates if the record has none yet. Returns `false`
    /// without touching the record when coordinates are already present —
    /// coordinates are immutable for the session once set.
    pub fn attach_coordinates(&mut self, coords: Coordinates) -> bool {
        if self.needs_geocoding() {
            self.lat = Some(coords.lat);
            self.lng = Some(coords.lng);
            true
        } else {
            false
        }
    }
}

/// Deserializes a string field, mapping absent, `null`, and blank values to
/// `None`.
fn blank_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.trim().is_empty()))
}
