//! Static lookup tables
//!
//! Built-in tables are immutable once constructed and are shared read-only
//! across estimations. An optional TOML file may override individual entries
//! at start-up; sections it leaves out keep the built-in values.

use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use tracing::info;

/// Helper macro for creating hashmaps with `String` keys
macro_rules! hashmap {
    ($($key:expr => $val:expr),* $(,)?) => {{
        let mut map = HashMap::new();
        $(map.insert($key.to_string(), $val);)*
        map
    }};
}

pub mod brands;
pub mod materials;
pub mod origins;
pub mod trust;

pub use brands::{BrandFact, BrandOverrides, BrandTable, IntelligenceHit};
pub use materials::{MaterialOverrides, MaterialTable, UNKNOWN_MATERIAL};
pub use origins::{haversine_km, OriginHub, OriginTable};
pub use trust::TrustTable;

/// All lookup tables used by one pipeline
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Tables {
    pub trust: TrustTable,
    pub materials: MaterialTable,
    pub origins: OriginTable,
    pub brands: BrandTable,
}

/// Tables TOML layout
///
/// ```toml
/// [trust]
/// shipping_panel = 65
///
/// [materials.recyclability]
/// Ceramic = 5
///
/// [brands.origins]
/// huel = { value = "UK", verified = true }
///
/// [hubs.Taiwan]
/// city = "Taipei"
/// lat = 25.033
/// lon = 121.5654
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TableOverrides {
    pub trust: HashMap<String, u32>,
    pub materials: MaterialOverrides,
    pub brands: BrandOverrides,
    pub hubs: HashMap<String, OriginHub>,
}

impl Tables {
    pub fn with_overrides(overrides: &TableOverrides) -> Self {
        let builtin = Self::default();
        Self {
            trust: builtin.trust.with_overrides(&overrides.trust),
            materials: builtin.materials.with_overrides(&overrides.materials),
            origins: builtin.origins.with_hub_overrides(&overrides.hubs),
            brands: builtin.brands.with_overrides(&overrides.brands),
        }
    }
}

/// Load tables, applying the overrides file when one is given
pub fn load_tables(path: Option<&Path>) -> eco_common::Result<Tables> {
    let Some(path) = path else {
        return Ok(Tables::default());
    };

    let content = std::fs::read_to_string(path).map_err(|e| {
        eco_common::Error::Config(format!("Read tables {} failed: {}", path.display(), e))
    })?;
    let overrides: TableOverrides = toml::from_str(&content)?;

    info!(
        "Table overrides loaded from {} ({} trust, {} material keyword, {} hub entries)",
        path.display(),
        overrides.trust.len(),
        overrides.materials.keywords.len(),
        overrides.hubs.len()
    );

    Ok(Tables::with_overrides(&overrides))
}
