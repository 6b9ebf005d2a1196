//! Land-use category schemes and the NLCD/USGS lookup tables that map onto them.
//!
//! The source `LU_INDEX` field holds 1-based codes: the first 20 entries are the
//! MODIS/IGBP classes, entries 21–40 the NLCD classes appended by WRF.

/// Land classes for particle dry deposition (Seinfeld & Pandis).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum SeinfeldLandUse {
    /// Evergreen needleleaf trees.
    Evergreen = 0,
    /// Deciduous broadleaf trees.
    Deciduous = 1,
    /// Grass.
    Grass = 2,
    /// Desert.
    Desert = 3,
    /// Shrubs and interrupted woodlands.
    Shrubs = 4,
}

/// Land classes for gas dry deposition (Wesely 1989).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum WeselyLandUse {
    /// Urban land.
    Urban = 0,
    /// Agricultural land.
    RangeAg = 1,
    /// Range land.
    Range = 2,
    /// Deciduous forest.
    Deciduous = 3,
    /// Coniferous forest.
    Coniferous = 4,
    /// Mixed forest including wetland.
    MixedForest = 5,
    /// Water, both salt and fresh.
    Water = 6,
    /// Barren land, mostly desert.
    Barren = 7,
    /// Nonforested wetland.
    Wetland = 8,
    /// Mixed agricultural and range land.
    RockyShrubs = 9,
}

impl From<SeinfeldLandUse> for f64 {
    fn from(c: SeinfeldLandUse) -> f64 {
        c as u8 as f64
    }
}

impl From<WeselyLandUse> for f64 {
    fn from(c: WeselyLandUse) -> f64 {
        c as u8 as f64
    }
}

/// Number of land-use codes covered by every table below.
pub const NLCD_CLASS_COUNT: usize = 40;

/// NLCD/USGS land classes to particle dry deposition classes.
pub const NLCD_SEINFELD: [SeinfeldLandUse; NLCD_CLASS_COUNT] = {
    use SeinfeldLandUse::*;
    [
        Evergreen, // Evergreen Needleleaf Forest
        Deciduous, // Evergreen Broadleaf Forest
        Evergreen, // Deciduous Needleleaf Forest
        Deciduous, // Deciduous Broadleaf Forest
        Deciduous, // Mixed Forest
        Shrubs,    // Closed Shrubland
        Shrubs,    // Open Shrubland
        Shrubs,    // Woody Savanna
        Grass,     // Savanna
        Grass,     // Grassland
        Grass,     // Permanent Wetland
        Grass,     // Cropland
        Desert,    // Urban and Built-Up
        Grass,     // Cropland / Natural Veg. Mosaic
        Desert,    // Permanent Snow
        Desert,    // Barren / Sparsely Vegetated
        Desert,    // IGBP Water
        Desert,    // Unclassified
        Desert,    // Fill Value
        Desert,    // Unclassified
        Desert,    // Open Water
        Desert,    // Perennial Ice/Snow
        Desert,    // Developed Open Space
        Desert,    // Developed Low Intensity
        Desert,    // Developed Medium Intensity
        Desert,    // Developed High Intensity
        Desert,    // Barren Land
        Deciduous, // Deciduous Forest
        Evergreen, // Evergreen Forest
        Deciduous, // Mixed Forest
        Shrubs,    // Dwarf Scrub
        Shrubs,    // Shrub/Scrub
        Grass,     // Grassland/Herbaceous
        Grass,     // Sedge/Herbaceous
        Desert,    // Lichens
        Desert,    // Moss
        Grass,     // Pasture/Hay
        Grass,     // Cultivated Crops
        Deciduous, // Woody Wetland
        Grass,     // Emergent Herbaceous Wetland
    ]
};

/// NLCD/USGS land classes to gas dry deposition classes.
pub const NLCD_WESELY: [WeselyLandUse; NLCD_CLASS_COUNT] = {
    use WeselyLandUse::*;
    [
        Coniferous,  // Evergreen Needleleaf Forest
        Deciduous,   // Evergreen Broadleaf Forest
        Coniferous,  // Deciduous Needleleaf Forest
        Deciduous,   // Deciduous Broadleaf Forest
        MixedForest, // Mixed Forest
        RockyShrubs, // Closed Shrubland
        RockyShrubs, // Open Shrubland
        RockyShrubs, // Woody Savanna
        Range,       // Savanna
        Range,       // Grassland
        Wetland,     // Permanent Wetland
        RangeAg,     // Cropland
        Urban,       // Urban and Built-Up
        RangeAg,     // Cropland / Natural Veg. Mosaic
        Barren,      // Permanent Snow
        Barren,      // Barren / Sparsely Vegetated
        Water,       // IGBP Water
        Barren,      // Unclassified
        Barren,      // Fill Value
        Barren,      // Unclassified
        Water,       // Open Water
        Barren,      // Perennial Ice/Snow
        Urban,       // Developed Open Space
        Urban,       // Developed Low Intensity
        Urban,       // Developed Medium Intensity
        Urban,       // Developed High Intensity
        Barren,      // Barren Land
        Deciduous,   // Deciduous Forest
        Coniferous,  // Evergreen Forest
        MixedForest, // Mixed Forest
        RockyShrubs, // Dwarf Scrub
        RockyShrubs, // Shrub/Scrub
        Range,       // Grassland/Herbaceous
        Range,       // Sedge/Herbaceous
        Barren,      // Lichens
        Barren,      // Moss
        RangeAg,     // Pasture/Hay
        RangeAg,     // Cultivated Crops
        Wetland,     // Woody Wetland
        Wetland,     // Emergent Herbaceous Wetland
    ]
};

/// Mean roughness length [m] per NLCD/USGS land class, from WRF's VEGPARM.TBL.
///
/// Unclassified and fill classes carry WRF's 999 sentinel.
pub const NLCD_Z0: [f64; NLCD_CLASS_COUNT] = [
    0.50, 0.50, 0.50, 0.50, 0.35, 0.03, 0.035, 0.03, 0.15, 0.11, //
    0.30, 0.10, 0.50, 0.095, 0.001, 0.01, 0.0001, 999.0, 999.0, 999.0, //
    0.0001, 0.001, 0.50, 0.70, 1.5, 2.0, 0.01, 0.50, 0.50, 0.35, //
    0.025, 0.03, 0.11, 0.20, 0.01, 0.01, 0.10, 0.06, 0.40, 0.20, //
];
