use crate::core::io::control::sections::DEFAULT_PROPERTIES;
use crate::core::io::control::styles::{ChargeStyle, CutoffStyle, LengthUnits, MixingRule, RunType, VdwStyle};
use crate::core::units::Quantity;
use thiserror::Error;

pub const DEFAULT_CUTOFF: f64 = 12.0;
pub const DEFAULT_EWALD_ACCURACY: f64 = 1e-5;
pub const DEFAULT_RCUT_MIN: f64 = 1.0;
pub const DEFAULT_THERMAL_STAT_FREQ: u64 = 1000;
pub const DEFAULT_VOL_STAT_FREQ: u64 = 100;
pub const DEFAULT_PROP_FREQ: u64 = 500;
pub const DEFAULT_COORD_FREQ: u64 = 5000;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum ConfigError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),
}

/// Run-level settings of a control file.
///
/// Per-box settings hold either one entry, applied to every box, or one entry
/// per box. Dimensioned values keep their units until the control file is
/// generated.
#[derive(Debug, Clone, PartialEq)]
pub struct RunConfig {
    pub run_name: Option<String>,
    pub run_type: RunType,
    pub run_length: u64,
    pub temperature: Vec<Quantity>,
    pub pressure: Option<Vec<Quantity>>,
    /// Per species; `None` for species that are not inserted.
    pub chemical_potentials: Option<Vec<Option<Quantity>>>,

    pub vdw_style: VdwStyle,
    pub cutoff_style: CutoffStyle,
    pub vdw_cutoffs: Vec<Vec<Quantity>>,
    pub charge_style: ChargeStyle,
    pub charge_cutoffs: Vec<Quantity>,
    pub ewald_accuracy: f64,
    pub dsf_damping: Option<f64>,
    pub mixing_rule: MixingRule,
    /// `("type_a type_b", "epsilon sigma")` pairs for [`MixingRule::Custom`].
    pub custom_mixing: Vec<(String, String)>,

    pub seeds: Option<[i64; 2]>,
    pub rcut_min: Quantity,
    pub pair_energy: bool,
    pub max_molecules: Option<Vec<usize>>,

    pub thermal_stat_freq: u64,
    pub vol_stat_freq: u64,
    pub units: LengthUnits,
    pub prop_freq: u64,
    pub coord_freq: u64,
    pub steps_per_sweep: Option<u64>,
    pub block_avg_freq: Option<u64>,
    pub properties: Vec<String>,
    pub verbose_log: Option<bool>,
}

impl RunConfig {
    pub fn builder() -> RunConfigBuilder {
        RunConfigBuilder::new()
    }
}

#[derive(Default)]
pub struct RunConfigBuilder {
    run_name: Option<String>,
    run_type: Option<RunType>,
    run_length: Option<u64>,
    temperature: Option<Vec<Quantity>>,
    pressure: Option<Vec<Quantity>>,
    chemical_potentials: Option<Vec<Option<Quantity>>>,
    vdw_style: Option<VdwStyle>,
    cutoff_style: Option<CutoffStyle>,
    vdw_cutoffs: Option<Vec<Vec<Quantity>>>,
    charge_style: Option<ChargeStyle>,
    charge_cutoffs: Option<Vec<Quantity>>,
    ewald_accuracy: Option<f64>,
    dsf_damping: Option<f64>,
    mixing_rule: Option<MixingRule>,
    custom_mixing: Vec<(String, String)>,
    seeds: Option<[i64; 2]>,
    rcut_min: Option<Quantity>,
    pair_energy: Option<bool>,
    max_molecules: Option<Vec<usize>>,
    thermal_stat_freq: Option<u64>,
    vol_stat_freq: Option<u64>,
    units: Option<LengthUnits>,
    prop_freq: Option<u64>,
    coord_freq: Option<u64>,
    steps_per_sweep: Option<u64>,
    block_avg_freq: Option<u64>,
    properties: Option<Vec<String>>,
    verbose_log: Option<bool>,
}

impl RunConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn run_name(mut self, name: impl Into<String>) -> Self {
        self.run_name = Some(name.into());
        self
    }
    pub fn run_type(mut self, run_type: RunType) -> Self {
        self.run_type = Some(run_type);
        self
    }
    pub fn run_length(mut self, length: u64) -> Self {
        self.run_length = Some(length);
        self
    }
    /// One temperature for every box.
    pub fn temperature(mut self, temperature: Quantity) -> Self {
        self.temperature = Some(vec![temperature]);
        self
    }
    pub fn temperatures(mut self, temperatures: Vec<Quantity>) -> Self {
        self.temperature = Some(temperatures);
        self
    }
    /// One pressure for every box.
    pub fn pressure(mut self, pressure: Quantity) -> Self {
        self.pressure = Some(vec![pressure]);
        self
    }
    pub fn pressures(mut self, pressures: Vec<Quantity>) -> Self {
        self.pressure = Some(pressures);
        self
    }
    pub fn chemical_potentials(mut self, potentials: Vec<Option<Quantity>>) -> Self {
        self.chemical_potentials = Some(potentials);
        self
    }
    pub fn vdw_style(mut self, style: VdwStyle) -> Self {
        self.vdw_style = Some(style);
        self
    }
    pub fn cutoff_style(mut self, style: CutoffStyle) -> Self {
        self.cutoff_style = Some(style);
        self
    }
    /// Cutoff distances applied to every box: one value, or inner and outer
    /// for `cut_switch`.
    pub fn vdw_cutoff(mut self, cutoffs: Vec<Quantity>) -> Self {
        self.vdw_cutoffs = Some(vec![cutoffs]);
        self
    }
    pub fn vdw_cutoffs(mut self, cutoffs: Vec<Vec<Quantity>>) -> Self {
        self.vdw_cutoffs = Some(cutoffs);
        self
    }
    pub fn charge_style(mut self, style: ChargeStyle) -> Self {
        self.charge_style = Some(style);
        self
    }
    pub fn charge_cutoff(mut self, cutoff: Quantity) -> Self {
        self.charge_cutoffs = Some(vec![cutoff]);
        self
    }
    pub fn charge_cutoffs(mut self, cutoffs: Vec<Quantity>) -> Self {
        self.charge_cutoffs = Some(cutoffs);
        self
    }
    pub fn ewald_accuracy(mut self, accuracy: f64) -> Self {
        self.ewald_accuracy = Some(accuracy);
        self
    }
    pub fn dsf_damping(mut self, damping: f64) -> Self {
        self.dsf_damping = Some(damping);
        self
    }
    pub fn mixing_rule(mut self, rule: MixingRule) -> Self {
        self.mixing_rule = Some(rule);
        self
    }
    pub fn custom_mixing_pair(mut self, atom_types: impl Into<String>, parameters: impl Into<String>) -> Self {
        self.custom_mixing.push((atom_types.into(), parameters.into()));
        self
    }
    pub fn seeds(mut self, seeds: [i64; 2]) -> Self {
        self.seeds = Some(seeds);
        self
    }
    pub fn rcut_min(mut self, rcut_min: Quantity) -> Self {
        self.rcut_min = Some(rcut_min);
        self
    }
    pub fn pair_energy(mut self, enabled: bool) -> Self {
        self.pair_energy = Some(enabled);
        self
    }
    pub fn max_molecules(mut self, max_molecules: Vec<usize>) -> Self {
        self.max_molecules = Some(max_molecules);
        self
    }
    pub fn thermal_stat_freq(mut self, freq: u64) -> Self {
        self.thermal_stat_freq = Some(freq);
        self
    }
    pub fn vol_stat_freq(mut self, freq: u64) -> Self {
        self.vol_stat_freq = Some(freq);
        self
    }
    pub fn units(mut self, units: LengthUnits) -> Self {
        self.units = Some(units);
        self
    }
    pub fn prop_freq(mut self, freq: u64) -> Self {
        self.prop_freq = Some(freq);
        self
    }
    pub fn coord_freq(mut self, freq: u64) -> Self {
        self.coord_freq = Some(freq);
        self
    }
    pub fn steps_per_sweep(mut self, steps: u64) -> Self {
        self.steps_per_sweep = Some(steps);
        self
    }
    pub fn block_avg_freq(mut self, freq: u64) -> Self {
        self.block_avg_freq = Some(freq);
        self
    }
    pub fn properties(mut self, properties: Vec<String>) -> Self {
        self.properties = Some(properties);
        self
    }
    pub fn verbose_log(mut self, enabled: bool) -> Self {
        self.verbose_log = Some(enabled);
        self
    }

    pub fn build(self) -> Result<RunConfig, ConfigError> {
        Ok(RunConfig {
            run_name: self.run_name,
            run_type: self.run_type.ok_or(ConfigError::MissingParameter("run_type"))?,
            run_length: self
                .run_length
                .ok_or(ConfigError::MissingParameter("run_length"))?,
            temperature: self
                .temperature
                .ok_or(ConfigError::MissingParameter("temperature"))?,
            pressure: self.pressure,
            chemical_potentials: self.chemical_potentials,
            vdw_style: self.vdw_style.unwrap_or(VdwStyle::Lj),
            cutoff_style: self.cutoff_style.unwrap_or(CutoffStyle::CutTail),
            vdw_cutoffs: self
                .vdw_cutoffs
                .unwrap_or_else(|| vec![vec![Quantity::angstrom(DEFAULT_CUTOFF)]]),
            charge_style: self.charge_style.unwrap_or(ChargeStyle::Ewald),
            charge_cutoffs: self
                .charge_cutoffs
                .unwrap_or_else(|| vec![Quantity::angstrom(DEFAULT_CUTOFF)]),
            ewald_accuracy: self.ewald_accuracy.unwrap_or(DEFAULT_EWALD_ACCURACY),
            dsf_damping: self.dsf_damping,
            mixing_rule: self.mixing_rule.unwrap_or(MixingRule::Lb),
            custom_mixing: self.custom_mixing,
            seeds: self.seeds,
            rcut_min: self
                .rcut_min
                .unwrap_or(Quantity::angstrom(DEFAULT_RCUT_MIN)),
            pair_energy: self.pair_energy.unwrap_or(true),
            max_molecules: self.max_molecules,
            thermal_stat_freq: self.thermal_stat_freq.unwrap_or(DEFAULT_THERMAL_STAT_FREQ),
            vol_stat_freq: self.vol_stat_freq.unwrap_or(DEFAULT_VOL_STAT_FREQ),
            units: self.units.unwrap_or(LengthUnits::Steps),
            prop_freq: self.prop_freq.unwrap_or(DEFAULT_PROP_FREQ),
            coord_freq: self.coord_freq.unwrap_or(DEFAULT_COORD_FREQ),
            steps_per_sweep: self.steps_per_sweep,
            block_avg_freq: self.block_avg_freq,
            properties: self
                .properties
                .unwrap_or_else(|| DEFAULT_PROPERTIES.iter().map(|p| p.to_string()).collect()),
            verbose_log: self.verbose_log,
        })
    }
}
