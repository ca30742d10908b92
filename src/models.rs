//! DJI drone model lookup.
//!
//! The upstream engine reports a numeric product-type code; the ingestion
//! API wants a human-readable model name. The table is built once at
//! process start and shared read-only across connections, so no
//! synchronisation is needed.

use std::collections::HashMap;

/// Known DJI product-type codes.
const MODEL_NAMES: &[(i64, &str)] = &[
    (1, "Inspire 1"),
    (2, "Phantom 3 Series"),
    (3, "Phantom 3 Series Pro"),
    (4, "Phantom 3 Std"),
    (5, "M100"),
    (6, "ACEONE"),
    (7, "WKM"),
    (8, "NAZA"),
    (9, "A2"),
    (10, "A3"),
    (11, "Phantom 4"),
    (12, "MG1"),
    (14, "M600"),
    (15, "Phantom 3 4k"),
    (16, "Mavic Pro"),
    (17, "Inspire 2"),
    (18, "Phantom 4 Pro"),
    (20, "N2"),
    (21, "Spark"),
    (23, "M600 Pro"),
    (24, "Mavic Air"),
    (25, "M200"),
    (26, "Phantom 4 Series"),
    (27, "Phantom 4 Adv"),
    (28, "M210"),
    (30, "M210RTK"),
    (31, "A3_AG"),
    (32, "MG2"),
    (34, "MG1A"),
    (35, "Phantom 4 RTK"),
    (36, "Phantom 4 Pro V2.0"),
    (38, "MG1P"),
    (40, "MG1P-RTK"),
    (41, "Mavic 2"),
    (44, "M200 V2 Series"),
    (51, "Mavic 2 Enterprise"),
    (53, "Mavic Mini"),
    (58, "Mavic Air 2"),
    (59, "P4M"),
    (60, "M300 RTK"),
    (61, "FPV"),
    (63, "Mini 2"),
    (64, "AGRAS T10"),
    (65, "AGRAS T30"),
    (66, "Air 2S"),
    (67, "M30"),
    (68, "Mavic 3"),
    (69, "Mavic 2 Enterprise Advanced"),
    (70, "Mavic SE"),
    (73, "Mini 3 Pro"),
    (75, "Avata"),
    (76, "Inspire 3"),
    (77, "Mavic 3 Enterprise E/T/M"),
    (78, "Flycart 30"),
    (82, "AGRAS T25"),
    (83, "AGRAS T50"),
    (84, "Mavic 3 Pro"),
    (86, "Mavic 3 Classic"),
    (87, "Mini 3"),
    (88, "Mini 2 SE"),
    (89, "M350 RTK"),
    (90, "Air 3"),
    (91, "Matrice 3D/3TD"),
    (93, "Mini4 Pro"),
    (95, "T60"),
    (96, "T25P"),
    (240, "YUNEEC H480"),
];

/// Immutable product-type code to model name mapping.
#[derive(Debug)]
pub struct DroneModelTable {
    names: HashMap<i64, &'static str>,
}

impl DroneModelTable {
    /// Build the table from the known model codes.
    #[must_use]
    pub fn new() -> Self {
        Self {
            names: MODEL_NAMES.iter().copied().collect(),
        }
    }

    /// Resolve a code to its model name.
    ///
    /// Unknown codes are not an error; they resolve to a synthesized
    /// `Unknown<code>` label.
    #[must_use]
    pub fn resolve(&self, code: i64) -> String {
        self.names
            .get(&code)
            .map_or_else(|| format!("Unknown{code}"), |name| (*name).to_owned())
    }
}

impl Default for DroneModelTable {
    fn default() -> Self {
        Self::new()
    }
}
