// Country of Origin Table
//
// Country-name normalization and representative shipping hubs used to derive
// a distance when the caller supplies none.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::utils::{contains_phrase, is_unknown, title_case};

/// Mean Earth radius used by `haversine_km`
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Canonical country → spellings, in matching order
const COUNTRY_KEYWORDS: &[(&str, &[&str])] = &[
    ("UK", &["united kingdom", "great britain", "britain", "england", "scotland", "wales", "uk"]),
    ("USA", &["united states of america", "united states", "america", "usa", "us"]),
    ("China", &["people's republic of china", "china", "prc"]),
    ("Germany", &["germany", "deutschland"]),
    ("France", &["france"]),
    ("Italy", &["italy", "italia"]),
    ("Japan", &["japan", "nippon"]),
    ("Ireland", &["ireland", "eire"]),
    ("Netherlands", &["netherlands", "holland"]),
    ("Canada", &["canada"]),
    ("Switzerland", &["switzerland"]),
    ("Australia", &["australia"]),
    ("Sweden", &["sweden"]),
    ("Finland", &["finland"]),
    ("Mexico", &["mexico"]),
    ("Indonesia", &["indonesia"]),
    ("India", &["india"]),
    ("Spain", &["spain", "espana"]),
    ("Poland", &["poland", "polska"]),
    ("Belgium", &["belgium"]),
    ("Denmark", &["denmark"]),
    ("Norway", &["norway"]),
    ("South Korea", &["south korea", "republic of korea", "korea"]),
    ("Thailand", &["thailand"]),
    ("Vietnam", &["vietnam", "viet nam"]),
    ("Turkey", &["turkey", "turkiye"]),
    ("Brazil", &["brazil"]),
];

/// Spellings that double as ordinary words ("gift for us", "roast turkey")
///
/// They count in explicit origin fields, never in a title guess.
const TITLE_AMBIGUOUS: &[&str] = &["us", "turkey"];

/// Representative city for a country
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OriginHub {
    pub city: String,
    pub lat: f64,
    pub lon: f64,
}

impl OriginHub {
    fn new(city: &str, lat: f64, lon: f64) -> Self {
        Self {
            city: city.to_string(),
            lat,
            lon,
        }
    }
}

/// Country normalization and hub lookup
#[derive(Debug, Clone, PartialEq)]
pub struct OriginTable {
    keywords: Vec<(String, Vec<String>)>,
    hubs: HashMap<String, OriginHub>,
}

impl Default for OriginTable {
    fn default() -> Self {
        let keywords = COUNTRY_KEYWORDS
            .iter()
            .map(|(country, words)| {
                (
                    country.to_string(),
                    words.iter().map(|w| w.to_string()).collect(),
                )
            })
            .collect();

        Self {
            keywords,
            hubs: hashmap! {
                "China" => OriginHub::new("Shanghai", 31.2304, 121.4737),
                "Germany" => OriginHub::new("Frankfurt", 50.1109, 8.6821),
                "USA" => OriginHub::new("San Francisco", 37.7749, -122.4194),
                "Japan" => OriginHub::new("Tokyo", 35.6895, 139.6917),
                "UK" => OriginHub::new("London", 51.509865, -0.118092),
                "Italy" => OriginHub::new("Castel San Giovanni", 45.0667, 9.4167),
                "India" => OriginHub::new("New Delhi", 28.6139, 77.2090),
                "South Korea" => OriginHub::new("Seoul", 37.5665, 126.9780),
                "Spain" => OriginHub::new("Madrid", 40.4168, -3.7038),
                "Poland" => OriginHub::new("Warsaw", 52.2297, 21.0122),
                "Netherlands" => OriginHub::new("Amsterdam", 52.3676, 4.9041),
                "Indonesia" => OriginHub::new("Jakarta", -6.2088, 106.8456),
                "France" => OriginHub::new("Paris", 48.8566, 2.3522),
                "Ireland" => OriginHub::new("Dublin", 53.3498, -6.2603),
                "Canada" => OriginHub::new("Ottawa", 45.4215, -75.6972),
                "Switzerland" => OriginHub::new("Bern", 46.9480, 7.4474),
                "Australia" => OriginHub::new("Sydney", -33.8688, 151.2093),
                "Sweden" => OriginHub::new("Stockholm", 59.3293, 18.0686),
                "Finland" => OriginHub::new("Helsinki", 60.1699, 24.9384),
                "Mexico" => OriginHub::new("Mexico City", 19.4326, -99.1332),
                "Belgium" => OriginHub::new("Brussels", 50.8503, 4.3517),
                "Denmark" => OriginHub::new("Copenhagen", 55.6761, 12.5683),
                "Norway" => OriginHub::new("Oslo", 59.9139, 10.7522),
                "Thailand" => OriginHub::new("Bangkok", 13.7563, 100.5018),
                "Vietnam" => OriginHub::new("Hanoi", 21.0285, 105.8542),
                "Turkey" => OriginHub::new("Ankara", 39.9334, 32.8597),
                "Brazil" => OriginHub::new("Sao Paulo", -23.5505, -46.6333),
            },
        }
    }
}

impl OriginTable {
    /// Canonical country name for free text ("united kingdom" → "UK")
    ///
    /// Unmatched text is title-cased and kept.
    pub fn normalize_country(&self, raw: &str) -> String {
        if is_unknown(raw) {
            return "Unknown".to_string();
        }
        match self.find_in_text(raw) {
            Some(country) => country.to_string(),
            None => title_case(raw.trim()),
        }
    }

    /// First country whose spelling appears as a whole word/phrase in `text`
    pub fn find_in_text(&self, text: &str) -> Option<&str> {
        self.keywords
            .iter()
            .find(|(_, words)| words.iter().any(|w| contains_phrase(text, w)))
            .map(|(country, _)| country.as_str())
    }

    /// Like `find_in_text`, but ignores spellings that are common words
    pub fn find_in_title(&self, title: &str) -> Option<&str> {
        self.keywords
            .iter()
            .find(|(_, words)| {
                words
                    .iter()
                    .filter(|w| !TITLE_AMBIGUOUS.contains(&w.as_str()))
                    .any(|w| contains_phrase(title, w))
            })
            .map(|(country, _)| country.as_str())
    }

    pub fn hub(&self, country: &str) -> Option<&OriginHub> {
        self.hubs.get(country)
    }

    /// Great-circle distance between two countries' hubs, if both are known
    pub fn hub_distance_km(&self, from: &str, to: &str) -> Option<f64> {
        let from = self.hub(from)?;
        let to = self.hub(to)?;
        Some(haversine_km(from.lat, from.lon, to.lat, to.lon))
    }

    pub fn with_hub_overrides(mut self, hubs: &HashMap<String, OriginHub>) -> Self {
        for (country, hub) in hubs {
            self.hubs.insert(country.clone(), hub.clone());
        }
        self
    }
}

/// Great-circle distance in km between two lat/lon points (degrees)
pub fn haversine_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let d_lat = (lat2 - lat1).to_radians();
    let d_lon = (lon2 - lon1).to_radians();
    let a = (d_lat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (d_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
    EARTH_RADIUS_KM * c
}
