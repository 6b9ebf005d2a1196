//! WRF-CMAQ preprocessor: one lazy stream per air-quality model input.
//!
//! Every accessor builds a fresh producer chain starting at the configured
//! start time. Calling an accessor twice yields two independent streams;
//! streams are never shared between consumers.

use crate::config::PreprocessorConfig;
use crate::data::{GridReader, NetcdfReader};
use crate::error::{PrepError, Result};
use crate::grid::Grid;
use crate::landuse::{NLCD_SEINFELD, NLCD_WESELY, NLCD_Z0};
use crate::physics;
use crate::progress::{NoProgress, ProgressSink};
use crate::stream::{
    weighted_sum, Combined, GridStream, LookupTable, RawProducer, Remapped, TimeCursor,
    VariableGroup,
};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// Variable used to size the grid.
const EXTENT_VARIABLE: &str = "ALT";

/// The species composing each chemical aggregate.
#[derive(Debug, Clone, PartialEq)]
pub struct SpeciesGroups {
    /// Anthropogenic VOC.
    pub avoc: VariableGroup,
    /// Biogenic VOC.
    pub bvoc: VariableGroup,
    /// Anthropogenic secondary organic aerosol.
    pub asoa: VariableGroup,
    /// Biogenic secondary organic aerosol.
    pub bsoa: VariableGroup,
    /// Gas-phase nitrogen oxides.
    pub nox: VariableGroup,
    /// Particulate nitrate.
    pub pno: VariableGroup,
    /// Gas-phase sulfur oxides.
    pub sox: VariableGroup,
    /// Particulate sulfate.
    pub ps: VariableGroup,
    /// Gas-phase ammonia.
    pub nh3: VariableGroup,
    /// Particulate ammonium.
    pub pnh: VariableGroup,
    /// Total PM2.5 mass.
    pub total_pm25: VariableGroup,
}

impl Default for SpeciesGroups {
    /// Names written by the WRF-CMAQ post-processor, one variable per aggregate.
    fn default() -> Self {
        Self {
            avoc: VariableGroup::single("aVOC", "aVOC"),
            bvoc: VariableGroup::single("bVOC", "bVOC"),
            asoa: VariableGroup::single("aSOA", "aSOA"),
            bsoa: VariableGroup::single("bSOA", "bSOA"),
            nox: VariableGroup::single("NOx", "gNO"),
            pno: VariableGroup::single("pNO", "pNO"),
            sox: VariableGroup::single("SOx", "gS"),
            ps: VariableGroup::single("pS", "pS"),
            nh3: VariableGroup::single("NH3", "gNH"),
            pnh: VariableGroup::single("pNH", "pNH"),
            total_pm25: VariableGroup::single("TotalPM25", "TotalPM25"),
        }
    }
}

/// A physical quantity exposed by the preprocessor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Quantity {
    /// West-east wind.
    U,
    /// South-north wind.
    V,
    /// Vertical wind.
    W,
    /// Planetary boundary layer height.
    Pblh,
    /// Inverse air density.
    Alt,
    /// Layer height above ground.
    Height,
    /// Total pressure.
    Pressure,
    /// Air temperature.
    Temperature,
    /// Upward heat flux at the surface.
    SurfaceHeatFlux,
    /// Friction velocity.
    UStar,
    /// Hydroxyl radical.
    Ho,
    /// Hydrogen peroxide.
    H2o2,
    /// Rain water mixing ratio.
    QRain,
    /// Cloud water mixing ratio.
    QCloud,
    /// Cloud fraction.
    CloudFrac,
    /// Downwelling shortwave flux at the surface.
    SwDown,
    /// Downwelling longwave flux at the surface.
    Glw,
    /// Total downwelling radiation.
    RadiationDown,
    /// Seinfeld deposition land-use class.
    SeinfeldLandUse,
    /// Wesely deposition land-use class.
    WeselyLandUse,
    /// Roughness length.
    Z0,
    /// Anthropogenic VOC.
    Avoc,
    /// Biogenic VOC.
    Bvoc,
    /// Anthropogenic SOA.
    Asoa,
    /// Biogenic SOA.
    Bsoa,
    /// Gas-phase NOx.
    Nox,
    /// Particulate nitrate.
    Pno,
    /// Gas-phase SOx.
    Sox,
    /// Particulate sulfate.
    Ps,
    /// Ammonia.
    Nh3,
    /// Particulate ammonium.
    Pnh,
    /// Total PM2.5.
    TotalPm25,
}

impl Quantity {
    /// Every quantity, in output order.
    pub const ALL: [Quantity; 32] = [
        Quantity::U,
        Quantity::V,
        Quantity::W,
        Quantity::Pblh,
        Quantity::Alt,
        Quantity::Height,
        Quantity::Pressure,
        Quantity::Temperature,
        Quantity::SurfaceHeatFlux,
        Quantity::UStar,
        Quantity::Ho,
        Quantity::H2o2,
        Quantity::QRain,
        Quantity::QCloud,
        Quantity::CloudFrac,
        Quantity::SwDown,
        Quantity::Glw,
        Quantity::RadiationDown,
        Quantity::SeinfeldLandUse,
        Quantity::WeselyLandUse,
        Quantity::Z0,
        Quantity::Avoc,
        Quantity::Bvoc,
        Quantity::Asoa,
        Quantity::Bsoa,
        Quantity::Nox,
        Quantity::Pno,
        Quantity::Sox,
        Quantity::Ps,
        Quantity::Nh3,
        Quantity::Pnh,
        Quantity::TotalPm25,
    ];

    /// Command-line name.
    pub fn name(self) -> &'static str {
        match self {
            Quantity::U => "u",
            Quantity::V => "v",
            Quantity::W => "w",
            Quantity::Pblh => "pblh",
            Quantity::Alt => "alt",
            Quantity::Height => "height",
            Quantity::Pressure => "pressure",
            Quantity::Temperature => "temperature",
            Quantity::SurfaceHeatFlux => "heat-flux",
            Quantity::UStar => "ustar",
            Quantity::Ho => "ho",
            Quantity::H2o2 => "h2o2",
            Quantity::QRain => "qrain",
            Quantity::QCloud => "qcloud",
            Quantity::CloudFrac => "cloud-frac",
            Quantity::SwDown => "sw-down",
            Quantity::Glw => "glw",
            Quantity::RadiationDown => "radiation-down",
            Quantity::SeinfeldLandUse => "seinfeld-land-use",
            Quantity::WeselyLandUse => "wesely-land-use",
            Quantity::Z0 => "z0",
            Quantity::Avoc => "avoc",
            Quantity::Bvoc => "bvoc",
            Quantity::Asoa => "asoa",
            Quantity::Bsoa => "bsoa",
            Quantity::Nox => "nox",
            Quantity::Pno => "pno",
            Quantity::Sox => "sox",
            Quantity::Ps => "ps",
            Quantity::Nh3 => "nh3",
            Quantity::Pnh => "pnh",
            Quantity::TotalPm25 => "total-pm25",
        }
    }

    /// Physical unit of the grids.
    pub fn units(self) -> &'static str {
        match self {
            Quantity::U | Quantity::V | Quantity::W | Quantity::UStar => "m/s",
            Quantity::Pblh | Quantity::Height | Quantity::Z0 => "m",
            Quantity::Alt => "m3/kg",
            Quantity::Pressure => "Pa",
            Quantity::Temperature => "K",
            Quantity::SurfaceHeatFlux
            | Quantity::SwDown
            | Quantity::Glw
            | Quantity::RadiationDown => "W/m2",
            Quantity::Ho | Quantity::H2o2 => "ppmv",
            Quantity::QRain | Quantity::QCloud => "kg/kg",
            Quantity::CloudFrac => "fraction",
            Quantity::SeinfeldLandUse | Quantity::WeselyLandUse => "category",
            _ => "ug/m3",
        }
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Quantity {
    type Err = PrepError;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().to_lowercase().replace('_', "-");
        Quantity::ALL
            .into_iter()
            .find(|q| q.name() == wanted)
            .ok_or_else(|| PrepError::config(format!("unknown quantity '{}'", s)))
    }
}

/// Exposes WRF-CMAQ output as lazy streams of standardized quantities.
pub struct Preprocessor<R: GridReader> {
    config: PreprocessorConfig,
    reader: Arc<R>,
    species: SpeciesGroups,
    progress: Arc<dyn ProgressSink>,
}

impl<R: GridReader> fmt::Debug for Preprocessor<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Preprocessor")
            .field("config", &self.config)
            .field("species", &self.species)
            .finish()
    }
}

impl Preprocessor<NetcdfReader> {
    /// Preprocessor over NetCDF files.
    pub fn open(config: PreprocessorConfig) -> Self {
        Self::new(config, NetcdfReader::new())
    }
}

impl<R: GridReader + 'static> Preprocessor<R> {
    /// Create a preprocessor reading through `reader`.
    pub fn new(config: PreprocessorConfig, reader: R) -> Self {
        Self {
            config,
            reader: Arc::new(reader),
            species: SpeciesGroups::default(),
            progress: Arc::new(NoProgress),
        }
    }

    /// Send progress messages to `sink`.
    pub fn with_progress(mut self, sink: impl ProgressSink + 'static) -> Self {
        self.progress = Arc::new(sink);
        self
    }

    /// Use different species for the chemical aggregates.
    pub fn with_species(mut self, species: SpeciesGroups) -> Self {
        self.species = species;
        self
    }

    /// Active configuration.
    pub fn config(&self) -> &PreprocessorConfig {
        &self.config
    }

    /// Active species groups.
    pub fn species(&self) -> &SpeciesGroups {
        &self.species
    }

    /// Fresh stream of a stored variable.
    pub fn read(&self, variable: &str) -> GridStream {
        tracing::debug!("Building stream for {}", variable);
        Box::new(RawProducer::new(
            Arc::clone(&self.reader),
            self.config.source().clone(),
            variable,
            TimeCursor::new(*self.config.window()),
            Arc::clone(&self.progress),
        ))
    }

    /// Fresh stream of a weighted sum of stored variables.
    pub fn read_group(&self, group: &VariableGroup) -> GridStream {
        weighted_sum(group, |variable| self.read(variable))
    }

    /// Stream of `quantity`.
    pub fn stream(&self, quantity: Quantity) -> GridStream {
        match quantity {
            Quantity::U => self.u(),
            Quantity::V => self.v(),
            Quantity::W => self.w(),
            Quantity::Pblh => self.pblh(),
            Quantity::Alt => self.alt(),
            Quantity::Height => self.height(),
            Quantity::Pressure => self.pressure(),
            Quantity::Temperature => self.temperature(),
            Quantity::SurfaceHeatFlux => self.surface_heat_flux(),
            Quantity::UStar => self.ustar(),
            Quantity::Ho => self.ho(),
            Quantity::H2o2 => self.h2o2(),
            Quantity::QRain => self.qrain(),
            Quantity::QCloud => self.qcloud(),
            Quantity::CloudFrac => self.cloud_frac(),
            Quantity::SwDown => self.sw_down(),
            Quantity::Glw => self.glw(),
            Quantity::RadiationDown => self.radiation_down(),
            Quantity::SeinfeldLandUse => self.seinfeld_land_use(),
            Quantity::WeselyLandUse => self.wesely_land_use(),
            Quantity::Z0 => self.z0(),
            Quantity::Avoc => self.avoc(),
            Quantity::Bvoc => self.bvoc(),
            Quantity::Asoa => self.asoa(),
            Quantity::Bsoa => self.bsoa(),
            Quantity::Nox => self.nox(),
            Quantity::Pno => self.pno(),
            Quantity::Sox => self.sox(),
            Quantity::Ps => self.ps(),
            Quantity::Nh3 => self.nh3(),
            Quantity::Pnh => self.pnh(),
            Quantity::TotalPm25 => self.total_pm25(),
        }
    }

    fn extent(&self, index: usize) -> Result<usize> {
        let window = self.config.window();
        let path = self.config.source().expand(window.start());
        self.reader.dimension_length(&path, EXTENT_VARIABLE, index)
    }

    /// Number of grid cells in the west-east direction.
    pub fn nx(&self) -> Result<usize> {
        self.extent(3)
    }

    /// Number of grid cells in the south-north direction.
    pub fn ny(&self) -> Result<usize> {
        self.extent(2)
    }

    /// Number of vertical layers.
    pub fn nz(&self) -> Result<usize> {
        self.extent(1)
    }

    /// West-east wind speed [m/s].
    pub fn u(&self) -> GridStream {
        self.read("U")
    }

    /// South-north wind speed [m/s].
    pub fn v(&self) -> GridStream {
        self.read("V")
    }

    /// Below-above wind speed [m/s].
    pub fn w(&self) -> GridStream {
        self.read("W")
    }

    /// Planetary boundary layer height [m].
    pub fn pblh(&self) -> GridStream {
        self.read("PBLH")
    }

    /// Inverse air density [m³/kg].
    pub fn alt(&self) -> GridStream {
        self.read("ALT")
    }

    /// Layer heights above ground [m] from perturbation and base geopotential.
    pub fn height(&self) -> GridStream {
        Box::new(Combined::new(
            "height",
            vec![self.read("PH"), self.read("PHB")],
            |g: &[Grid]| physics::geopotential_to_height(&g[0], &g[1]),
        ))
    }

    /// Pressure [Pa]: baseline plus perturbation.
    pub fn pressure(&self) -> GridStream {
        Box::new(Combined::new(
            "pressure",
            vec![self.read("PB"), self.read("P")],
            |g: &[Grid]| physics::sum("pressure", g),
        ))
    }

    /// Ambient temperature [K] from perturbation potential temperature and pressure.
    pub fn temperature(&self) -> GridStream {
        Box::new(Combined::new(
            "temperature",
            vec![self.read("T"), self.pressure()],
            |g: &[Grid]| physics::temperature(&g[0], &g[1]),
        ))
    }

    /// Sensible heat flux at the surface [W/m²].
    pub fn surface_heat_flux(&self) -> GridStream {
        self.read("HFX")
    }

    /// Friction velocity [m/s].
    pub fn ustar(&self) -> GridStream {
        self.read("UST")
    }

    /// Hydroxyl radical concentration [ppmv].
    pub fn ho(&self) -> GridStream {
        self.read("oh")
    }

    /// Hydrogen peroxide concentration [ppmv].
    pub fn h2o2(&self) -> GridStream {
        self.read("h2o2")
    }

    /// Rain mass fraction [kg/kg].
    pub fn qrain(&self) -> GridStream {
        self.read("QRAIN")
    }

    /// Cloud water mass fraction [kg/kg].
    pub fn qcloud(&self) -> GridStream {
        self.read("QCLOUD")
    }

    /// Fraction of each cell filled with cloud [volume/volume].
    pub fn cloud_frac(&self) -> GridStream {
        self.read("CLDFRA")
    }

    /// Downwelling short wave radiation at ground level [W/m²].
    pub fn sw_down(&self) -> GridStream {
        self.read("SWDOWN")
    }

    /// Downwelling long wave radiation at ground level [W/m²].
    pub fn glw(&self) -> GridStream {
        self.read("GLW")
    }

    /// Total downwelling radiation at ground level [W/m²].
    pub fn radiation_down(&self) -> GridStream {
        Box::new(Combined::new(
            "radiation_down",
            vec![self.sw_down(), self.glw()],
            |g: &[Grid]| physics::sum("radiation_down", g),
        ))
    }

    /// Land use as particle dry deposition classes.
    pub fn seinfeld_land_use(&self) -> GridStream {
        Box::new(Remapped::new(
            self.read("LU_INDEX"),
            LookupTable::new("NLCD to Seinfeld", &NLCD_SEINFELD),
        ))
    }

    /// Land use as gas dry deposition classes.
    pub fn wesely_land_use(&self) -> GridStream {
        Box::new(Remapped::new(
            self.read("LU_INDEX"),
            LookupTable::new("NLCD to Wesely", &NLCD_WESELY),
        ))
    }

    /// Roughness length [m].
    pub fn z0(&self) -> GridStream {
        Box::new(Remapped::new(
            self.read("LU_INDEX"),
            LookupTable::new("NLCD roughness length", &NLCD_Z0),
        ))
    }

    /// Anthropogenic VOC [μg/m³].
    pub fn avoc(&self) -> GridStream {
        self.read_group(&self.species.avoc)
    }

    /// Biogenic VOC [μg/m³].
    pub fn bvoc(&self) -> GridStream {
        self.read_group(&self.species.bvoc)
    }

    /// Anthropogenic secondary organic aerosol [μg/m³].
    pub fn asoa(&self) -> GridStream {
        self.read_group(&self.species.asoa)
    }

    /// Biogenic secondary organic aerosol [μg/m³].
    pub fn bsoa(&self) -> GridStream {
        self.read_group(&self.species.bsoa)
    }

    /// Gas-phase nitrogen oxides [μg/m³].
    pub fn nox(&self) -> GridStream {
        self.read_group(&self.species.nox)
    }

    /// Particulate nitrate [μg/m³].
    pub fn pno(&self) -> GridStream {
        self.read_group(&self.species.pno)
    }

    /// Gas-phase sulfur oxides [μg/m³].
    pub fn sox(&self) -> GridStream {
        self.read_group(&self.species.sox)
    }

    /// Particulate sulfate [μg/m³].
    pub fn ps(&self) -> GridStream {
        self.read_group(&self.species.ps)
    }

    /// Gas-phase ammonia [μg/m³].
    pub fn nh3(&self) -> GridStream {
        self.read_group(&self.species.nh3)
    }

    /// Particulate ammonium [μg/m³].
    pub fn pnh(&self) -> GridStream {
        self.read_group(&self.species.pnh)
    }

    /// Total PM2.5 mass [μg/m³].
    pub fn total_pm25(&self) -> GridStream {
        self.read_group(&self.species.total_pm25)
    }
}
