use crate::cli::WriteArgs;
use crate::error::{CliError, Result};
use mcsetup::core::io::control::styles::{
    ChargeStyle, CutoffStyle, LengthUnits, MixingRule, RunType, VdwStyle,
};
use mcsetup::core::models::simbox::SimBox;
use mcsetup::core::models::species::Species;
use mcsetup::core::models::system::System;
use mcsetup::core::moves::ensemble::Ensemble;
use mcsetup::core::moves::fields::FieldValue;
use mcsetup::core::moves::moveset::MoveSet;
use mcsetup::core::units::Quantity;
use mcsetup::workflows::config::{self as core_config, RunConfig};
use nalgebra::Matrix3;
use serde::Deserialize;
use std::path::Path;
use tracing::debug;

/// A scalar or a list of the same type; scalars apply to every box.
#[derive(Deserialize, Debug, Clone)]
#[serde(untagged)]
enum OneOrMany<T> {
    One(T),
    Many(Vec<T>),
}

impl<T> OneOrMany<T> {
    fn into_vec(self) -> Vec<T> {
        match self {
            Self::One(v) => vec![v],
            Self::Many(v) => v,
        }
    }
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields)]
struct PartialSpecies {
    name: Option<String>,
    #[serde(rename = "n-atoms")]
    n_atoms: Option<usize>,
    #[serde(rename = "n-bonds")]
    n_bonds: Option<usize>,
}

/// Geometry in Å (angles in degrees when `lengths` holds six values), plus the molecule
/// counts of one box.
#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields)]
struct PartialBox {
    lengths: Option<Vec<f64>>,
    matrix: Option<[[f64; 3]; 3]>,
    #[serde(rename = "n-particles")]
    n_particles: Option<usize>,
    #[serde(rename = "mols-in-box")]
    mols_in_box: Option<Vec<usize>>,
    #[serde(rename = "mols-to-add")]
    mols_to_add: Option<Vec<usize>>,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(deny_unknown_fields)]
struct PartialRestriction {
    #[serde(rename = "box")]
    box_number: usize,
    species: usize,
    #[serde(rename = "type")]
    kind: String,
    values: Vec<String>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
struct PartialRunSection {
    #[serde(rename = "run-name")]
    run_name: Option<String>,
    #[serde(rename = "run-type")]
    run_type: Option<RunType>,
    #[serde(rename = "run-length")]
    run_length: Option<u64>,
    temperature: Option<OneOrMany<String>>,
    pressure: Option<OneOrMany<String>>,
    #[serde(rename = "chemical-potentials")]
    chemical_potentials: Option<Vec<String>>,
    #[serde(rename = "vdw-style")]
    vdw_style: Option<VdwStyle>,
    #[serde(rename = "cutoff-style")]
    cutoff_style: Option<CutoffStyle>,
    #[serde(rename = "vdw-cutoff")]
    vdw_cutoff: Option<OneOrMany<String>>,
    #[serde(rename = "vdw-cutoffs")]
    vdw_cutoffs: Option<Vec<Vec<String>>>,
    #[serde(rename = "charge-style")]
    charge_style: Option<ChargeStyle>,
    #[serde(rename = "charge-cutoff")]
    charge_cutoff: Option<OneOrMany<String>>,
    #[serde(rename = "ewald-accuracy")]
    ewald_accuracy: Option<f64>,
    #[serde(rename = "dsf-damping")]
    dsf_damping: Option<f64>,
    #[serde(rename = "mixing-rule")]
    mixing_rule: Option<MixingRule>,
    #[serde(rename = "custom-mixing")]
    custom_mixing: Option<Vec<(String, String)>>,
    seeds: Option<[i64; 2]>,
    #[serde(rename = "rcut-min")]
    rcut_min: Option<String>,
    #[serde(rename = "pair-energy")]
    pair_energy: Option<bool>,
    #[serde(rename = "max-molecules")]
    max_molecules: Option<Vec<usize>>,
    #[serde(rename = "thermal-stat-freq")]
    thermal_stat_freq: Option<u64>,
    #[serde(rename = "vol-stat-freq")]
    vol_stat_freq: Option<u64>,
    units: Option<LengthUnits>,
    #[serde(rename = "prop-freq")]
    prop_freq: Option<u64>,
    #[serde(rename = "coord-freq")]
    coord_freq: Option<u64>,
    #[serde(rename = "steps-per-sweep")]
    steps_per_sweep: Option<u64>,
    #[serde(rename = "block-avg-freq")]
    block_avg_freq: Option<u64>,
    properties: Option<Vec<String>>,
    #[serde(rename = "verbose-log")]
    verbose_log: Option<bool>,
}

/// A run description as read from TOML, before validation.
///
/// `[run]` and `[moves]` stay raw until merge time so that `--set` overrides
/// can target any of their keys.
#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
pub struct PartialRunDescription {
    ensemble: Option<String>,
    #[serde(default)]
    species: Vec<PartialSpecies>,
    #[serde(default)]
    boxes: Vec<PartialBox>,
    #[serde(default)]
    run: toml::Table,
    #[serde(default)]
    moves: toml::Table,
    #[serde(default, rename = "restricted-insertion")]
    restricted_insertions: Vec<PartialRestriction>,
}

/// Everything `write_input` needs.
#[derive(Debug)]
pub struct RunDescription {
    pub system: System,
    pub moves: MoveSet,
    pub run: RunConfig,
}

impl PartialRunDescription {
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading run description from file: {:?}", path);
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })
    }

    /// Builds the system, move set and run settings, with `args` taking
    /// precedence over the file.
    pub fn merge_with_cli(mut self, args: &WriteArgs) -> Result<RunDescription> {
        self.apply_set_values(&args.set_values)?;

        let ensemble = self.ensemble()?;
        let species = self.build_species()?;
        let system = self.build_system(&species)?;
        let moves = self.build_moves(ensemble, &species)?;

        let mut run: PartialRunSection = toml::Value::Table(std::mem::take(&mut self.run))
            .try_into()
            .map_err(|e: toml::de::Error| CliError::Config(format!("Invalid [run] section: {}", e)))?;
        if let Some(name) = &args.run_name {
            run.run_name = Some(name.clone());
        }
        if let Some(seeds) = &args.seeds {
            let [first, second] = seeds[..] else {
                return Err(CliError::Argument(format!(
                    "--seeds expects exactly 2 values, found {}",
                    seeds.len()
                )));
            };
            run.seeds = Some([first, second]);
        }

        Ok(RunDescription {
            system,
            moves,
            run: Self::build_run_config(run)?,
        })
    }

    /// Builds only the move set; boxes and run settings are not required.
    pub fn into_move_set(mut self, set_values: &[String]) -> Result<MoveSet> {
        self.apply_set_values(set_values)?;
        let ensemble = self.ensemble()?;
        let species = self.build_species()?;
        self.build_moves(ensemble, &species)
    }

    fn ensemble(&self) -> Result<Ensemble> {
        let name = self
            .ensemble
            .as_deref()
            .ok_or_else(|| CliError::Config("`ensemble` is required.".to_string()))?;
        Ok(name.parse::<Ensemble>()?)
    }

    fn build_species(&self) -> Result<Vec<Species>> {
        if self.species.is_empty() {
            return Err(CliError::Config(
                "At least one [[species]] entry is required.".to_string(),
            ));
        }
        self.species
            .iter()
            .enumerate()
            .map(|(i, s)| {
                let n_atoms = s.n_atoms.ok_or_else(|| {
                    CliError::Config(format!("species {} requires `n-atoms`", i + 1))
                })?;
                let name = s.name.clone().unwrap_or_else(|| format!("species{}", i + 1));
                Ok(Species::new(name, n_atoms, s.n_bonds.unwrap_or(0)))
            })
            .collect()
    }

    fn build_system(&self, species: &[Species]) -> Result<System> {
        let n_species = species.len();
        let mut boxes = Vec::with_capacity(self.boxes.len());
        for (i, partial) in self.boxes.iter().enumerate() {
            let mut simbox = match (&partial.lengths, &partial.matrix) {
                (Some(_), Some(_)) => {
                    return Err(CliError::Config(format!(
                        "box {} sets both `lengths` and `matrix`",
                        i + 1
                    )));
                }
                (Some(lengths), None) => match lengths[..] {
                    [x, y, z] => SimBox::from_lengths([x, y, z]),
                    [x, y, z, alpha, beta, gamma] => {
                        SimBox::from_lengths_and_angles([x, y, z, alpha, beta, gamma])
                    }
                    _ => {
                        return Err(CliError::Config(format!(
                            "box {} `lengths` must hold 3 lengths or 3 lengths and 3 angles, found {} values",
                            i + 1,
                            lengths.len()
                        )));
                    }
                },
                (None, Some(rows)) => {
                    let flat: Vec<f64> = rows.iter().flatten().copied().collect();
                    SimBox::from_matrix(Matrix3::from_row_slice(&flat))
                }
                (None, None) => {
                    return Err(CliError::Config(format!(
                        "box {} requires `lengths` or `matrix`",
                        i + 1
                    )));
                }
            }?;
            if let Some(n) = partial.n_particles {
                simbox = simbox.with_particles(n);
            }
            boxes.push(simbox);
        }

        let mut builder = System::builder()
            .boxes(boxes)
            .mols_in_boxes(box_counts(&self.boxes, n_species, |b| b.mols_in_box.as_ref()))
            .mols_to_add(box_counts(&self.boxes, n_species, |b| b.mols_to_add.as_ref()));
        for s in species {
            builder = builder.species(s.clone());
        }
        Ok(builder.build()?)
    }

    fn build_moves(&self, ensemble: Ensemble, species: &[Species]) -> Result<MoveSet> {
        let mut moves = MoveSet::new(ensemble, species)?;
        for (name, value) in &self.moves {
            debug!("Applying move setting {} = {}", name, value);
            moves.set_field(name, FieldValue::try_from(value.clone())?)?;
        }

        if !self.restricted_insertions.is_empty() {
            let (n_boxes, n_species) = (moves.n_boxes(), moves.n_species());
            let mut types: Vec<Vec<Option<String>>> = vec![vec![None; n_species]; n_boxes];
            let mut values: Vec<Vec<Option<Vec<Quantity>>>> = vec![vec![None; n_species]; n_boxes];
            for r in &self.restricted_insertions {
                if !(1..=n_boxes).contains(&r.box_number) || !(1..=n_species).contains(&r.species) {
                    return Err(CliError::Config(format!(
                        "restricted insertion for box {} species {} is outside {} box(es) and {} species",
                        r.box_number, r.species, n_boxes, n_species
                    )));
                }
                let (ibox, isp) = (r.box_number - 1, r.species - 1);
                types[ibox][isp] = Some(r.kind.clone());
                values[ibox][isp] = Some(
                    r.values
                        .iter()
                        .map(|v| quantity("restricted-insertion.values", v))
                        .collect::<Result<_>>()?,
                );
            }
            moves.add_restricted_insertions(species, &types, &values)?;
        }
        Ok(moves)
    }

    fn build_run_config(run: PartialRunSection) -> Result<RunConfig> {
        let mut builder = RunConfig::builder();
        if let Some(name) = run.run_name {
            builder = builder.run_name(name);
        }
        if let Some(run_type) = run.run_type {
            builder = builder.run_type(run_type);
        }
        if let Some(length) = run.run_length {
            builder = builder.run_length(length);
        }
        if let Some(t) = run.temperature {
            builder = builder.temperatures(quantities("run.temperature", t.into_vec())?);
        }
        if let Some(p) = run.pressure {
            builder = builder.pressures(quantities("run.pressure", p.into_vec())?);
        }
        if let Some(mu) = run.chemical_potentials {
            let potentials = mu
                .iter()
                .map(|v| match v.trim() {
                    "none" => Ok(None),
                    other => quantity("run.chemical-potentials", other).map(Some),
                })
                .collect::<Result<Vec<_>>>()?;
            builder = builder.chemical_potentials(potentials);
        }
        if let Some(style) = run.vdw_style {
            builder = builder.vdw_style(style);
        }
        if let Some(style) = run.cutoff_style {
            builder = builder.cutoff_style(style);
        }
        match (run.vdw_cutoff, run.vdw_cutoffs) {
            (Some(_), Some(_)) => {
                return Err(CliError::Config(
                    "Set either `vdw-cutoff` or `vdw-cutoffs`, not both.".to_string(),
                ));
            }
            (Some(all), None) => {
                builder = builder.vdw_cutoff(quantities("run.vdw-cutoff", all.into_vec())?);
            }
            (None, Some(per_box)) => {
                let rows = per_box
                    .into_iter()
                    .map(|row| quantities("run.vdw-cutoffs", row))
                    .collect::<Result<Vec<_>>>()?;
                builder = builder.vdw_cutoffs(rows);
            }
            (None, None) => {}
        }
        if let Some(style) = run.charge_style {
            builder = builder.charge_style(style);
        }
        if let Some(cutoffs) = run.charge_cutoff {
            builder = builder.charge_cutoffs(quantities("run.charge-cutoff", cutoffs.into_vec())?);
        }
        if let Some(accuracy) = run.ewald_accuracy {
            builder = builder.ewald_accuracy(accuracy);
        }
        if let Some(damping) = run.dsf_damping {
            builder = builder.dsf_damping(damping);
        }
        if let Some(rule) = run.mixing_rule {
            builder = builder.mixing_rule(rule);
        }
        for (types, params) in run.custom_mixing.unwrap_or_default() {
            builder = builder.custom_mixing_pair(types, params);
        }
        if let Some(seeds) = run.seeds {
            builder = builder.seeds(seeds);
        }
        if let Some(rcut) = run.rcut_min {
            builder = builder.rcut_min(quantity("run.rcut-min", &rcut)?);
        }
        if let Some(enabled) = run.pair_energy {
            builder = builder.pair_energy(enabled);
        }
        if let Some(max) = run.max_molecules {
            builder = builder.max_molecules(max);
        }
        if let Some(freq) = run.thermal_stat_freq {
            builder = builder.thermal_stat_freq(freq);
        }
        if let Some(freq) = run.vol_stat_freq {
            builder = builder.vol_stat_freq(freq);
        }
        if let Some(units) = run.units {
            builder = builder.units(units);
        }
        if let Some(freq) = run.prop_freq {
            builder = builder.prop_freq(freq);
        }
        if let Some(freq) = run.coord_freq {
            builder = builder.coord_freq(freq);
        }
        if let Some(steps) = run.steps_per_sweep {
            builder = builder.steps_per_sweep(steps);
        }
        if let Some(freq) = run.block_avg_freq {
            builder = builder.block_avg_freq(freq);
        }
        if let Some(properties) = run.properties {
            builder = builder.properties(properties);
        }
        if let Some(enabled) = run.verbose_log {
            builder = builder.verbose_log(enabled);
        }

        builder.build().map_err(|e: core_config::ConfigError| {
            CliError::Config(format!("{} (set it under [run])", e))
        })
    }

    /// Applies `KEY=VALUE` overrides. Keys are `ensemble`, `run.<key>` or
    /// `moves.<field>`; values are read as TOML, falling back to a plain string.
    fn apply_set_values(&mut self, set_values: &[String]) -> Result<()> {
        for kv_pair in set_values {
            let (key, value_str) = kv_pair.split_once('=').ok_or_else(|| {
                CliError::Config(format!(
                    "Invalid --set format: '{}'. Expected KEY=VALUE.",
                    kv_pair
                ))
            })?;
            let key = key.trim();
            let value = parse_set_value(value_str);

            match key.split_once('.') {
                None if key == "ensemble" => {
                    self.ensemble = Some(value_str.trim().to_string());
                }
                Some(("run", field)) if !field.is_empty() => {
                    self.run.insert(field.to_string(), value);
                }
                Some(("moves", field)) if !field.is_empty() => {
                    self.moves.insert(field.to_string(), value);
                }
                _ => {
                    return Err(CliError::Config(format!(
                        "Unsupported configuration key for --set: '{}'",
                        key
                    )));
                }
            }
        }
        Ok(())
    }
}

/// Per-box molecule counts; boxes that leave them out hold none.
fn box_counts(
    boxes: &[PartialBox],
    n_species: usize,
    pick: impl Fn(&PartialBox) -> Option<&Vec<usize>>,
) -> Vec<Vec<usize>> {
    boxes
        .iter()
        .map(|b| pick(b).cloned().unwrap_or_else(|| vec![0; n_species]))
        .collect()
}

fn parse_set_value(raw: &str) -> toml::Value {
    let raw = raw.trim();
    toml::from_str::<toml::Table>(&format!("value = {raw}"))
        .ok()
        .and_then(|mut table| table.remove("value"))
        .unwrap_or_else(|| toml::Value::String(raw.to_string()))
}

fn quantity(key: &str, raw: &str) -> Result<Quantity> {
    raw.parse()
        .map_err(|e| CliError::Config(format!("Invalid value for `{}`: {}", key, e)))
}

fn quantities(key: &str, raw: Vec<String>) -> Result<Vec<Quantity>> {
    raw.iter().map(|v| quantity(key, v)).collect()
}
