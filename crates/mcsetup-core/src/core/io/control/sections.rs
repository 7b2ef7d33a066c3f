//! Builders for the individual sections of a control file.
//!
//! Every builder takes plain engine-unit values (Å, K, bar, kJ/mol) that have
//! already been stripped of their units, and checks the constraints that belong
//! to its own section.

use super::error::ControlFileError;
use super::format::{Section, format_float, spaced};
use super::styles::{ChargeStyle, CutoffStyle, LengthUnits, MixingRule, RunType, VdwStyle};
use crate::core::models::simbox::{BoxShape, SimBox};
use crate::core::moves::ensemble::Ensemble;
use phf::phf_set;

/// Thermodynamic properties the engine can report.
pub static SUPPORTED_PROPERTIES: phf::Set<&'static str> = phf_set! {
    "energy_total",
    "energy_lj",
    "energy_elec",
    "energy_intra",
    "energy_inter",
    "energy_intravdw",
    "energy_intraq",
    "energy_angle",
    "energy_dihedral",
    "energy_recip",
    "energy_self",
    "enthalpy",
    "pressure",
    "pressure_xx",
    "pressure_yy",
    "pressure_zz",
    "volume",
    "nmols",
    "density",
    "mass_density",
};

/// Properties written when none are requested.
pub const DEFAULT_PROPERTIES: [&str; 8] = [
    "energy_total",
    "energy_intra",
    "energy_inter",
    "enthalpy",
    "pressure",
    "volume",
    "nmols",
    "mass_density",
];

pub fn run_name(name: &str) -> Section {
    Section::new("Run_Name").line(format!("{name}.out"))
}

pub fn sim_type(ensemble: Ensemble) -> Section {
    Section::new("Sim_Type").line(ensemble.sim_type())
}

pub fn nbr_species(n_species: usize) -> Section {
    Section::new("Nbr_Species").line(n_species.to_string())
}

/// One line per box. `cutoffs[i]` holds the cutoff distances of box `i`: one
/// value, or inner and outer for [`CutoffStyle::CutSwitch`].
pub fn vdw_style(
    style: VdwStyle,
    cutoff_style: CutoffStyle,
    cutoffs: &[Vec<f64>],
) -> Result<Section, ControlFileError> {
    let mut lines = Vec::with_capacity(cutoffs.len());
    for box_cutoffs in cutoffs {
        if style == VdwStyle::None {
            lines.push(VdwStyle::None.to_string());
            continue;
        }
        if box_cutoffs.len() != cutoff_style.n_cutoffs() {
            let reason = if cutoff_style == CutoffStyle::CutSwitch {
                "cutoff style 'cut_switch' requires an inner and outer cutoff".to_string()
            } else {
                format!(
                    "cutoff style '{cutoff_style}' requires a single cutoff, found {}",
                    box_cutoffs.len()
                )
            };
            return Err(ControlFileError::invalid("vdw_cutoff", reason));
        }
        check_positive("vdw_cutoff", box_cutoffs)?;
        if let [inner, outer] = box_cutoffs.as_slice() {
            if inner >= outer {
                return Err(ControlFileError::invalid(
                    "vdw_cutoff",
                    format!("inner cutoff {inner} must be smaller than outer cutoff {outer}"),
                ));
            }
        }
        let values: Vec<String> = box_cutoffs.iter().map(|&c| format_float(c)).collect();
        lines.push(format!("{style} {cutoff_style} {}", values.join(" ")));
    }
    Ok(Section::new("VDW_Style").lines(lines))
}

/// One line per box. Ewald summation needs `ewald_accuracy`; the damped
/// shifted force method takes an optional `dsf_damping`.
pub fn charge_style(
    style: ChargeStyle,
    cutoffs: &[f64],
    ewald_accuracy: Option<f64>,
    dsf_damping: Option<f64>,
) -> Result<Section, ControlFileError> {
    if !matches!(style, ChargeStyle::None) {
        check_positive("charge_cutoff", cutoffs)?;
    }
    let lines = cutoffs
        .iter()
        .map(|&cutoff| {
            let cutoff = format_float(cutoff);
            match style {
                ChargeStyle::None => Ok("none".to_string()),
                ChargeStyle::Cut => Ok(format!("coul cut {cutoff}")),
                ChargeStyle::Ewald => {
                    let accuracy = ewald_accuracy.ok_or_else(|| {
                        ControlFileError::MissingParameter(
                            "ewald_accuracy is required for the 'ewald' charge style".to_string(),
                        )
                    })?;
                    if accuracy <= 0.0 {
                        return Err(ControlFileError::invalid(
                            "ewald_accuracy",
                            format!("must be positive, found {accuracy}"),
                        ));
                    }
                    Ok(format!("coul ewald {cutoff} {}", format_float(accuracy)))
                }
                ChargeStyle::Dsf => Ok(match dsf_damping {
                    Some(damping) => format!("coul dsf {cutoff} {}", format_float(damping)),
                    None => format!("coul dsf {cutoff}"),
                }),
            }
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Section::new("Charge_Style").lines(lines))
}

/// `custom_pairs` holds `("type_a type_b", "epsilon sigma")` entries and is
/// only used with [`MixingRule::Custom`].
pub fn mixing_rule(rule: MixingRule, custom_pairs: &[(String, String)]) -> Result<Section, ControlFileError> {
    let section = Section::new("Mixing_Rule").line(rule.to_string());
    if rule != MixingRule::Custom {
        return Ok(section);
    }
    if custom_pairs.is_empty() {
        return Err(ControlFileError::MissingParameter(
            "Custom mixing rule requested but no mixing parameters provided".to_string(),
        ));
    }
    Ok(section.lines(custom_pairs.iter().map(|(types, params)| format!("{types} {params}"))))
}

pub fn seed_info(seeds: [i64; 2]) -> Result<Section, ControlFileError> {
    if let Some(seed) = seeds.iter().find(|&&s| s <= 0) {
        return Err(ControlFileError::invalid(
            "seeds",
            format!("seeds must be positive integers, found {seed}"),
        ));
    }
    Ok(Section::new("Seed_Info").line(format!("{} {}", seeds[0], seeds[1])))
}

pub fn rcutoff_low(rcut_min: f64) -> Result<Section, ControlFileError> {
    if rcut_min < 0.0 {
        return Err(ControlFileError::invalid(
            "rcut_min",
            format!("must be non-negative, found {rcut_min}"),
        ));
    }
    Ok(Section::new("Rcutoff_Low").line(format_float(rcut_min)))
}

pub fn pair_energy(enabled: bool) -> Section {
    Section::new("Pair_Energy").line(enabled.to_string())
}

/// One `<species>.mcf <max molecules>` line per species.
pub fn molecule_files(entries: &[(String, usize)]) -> Section {
    Section::new("Molecule_Files").lines(
        entries
            .iter()
            .map(|(mcf, max_molecules)| format!("{mcf} {max_molecules}")),
    )
}

/// Writes the number of boxes followed by each box's shape and dimensions.
/// A cell matrix is written as three lines holding the cell vectors as columns.
pub fn box_info(boxes: &[SimBox]) -> Section {
    let mut lines = vec![boxes.len().to_string()];
    for (ibox, simbox) in boxes.iter().enumerate() {
        if ibox > 0 {
            lines.push(String::new());
        }
        let shape = simbox.shape();
        lines.push(shape.to_string());
        let m = simbox.matrix();
        match shape {
            BoxShape::Cubic => lines.push(format_float(m[(0, 0)])),
            BoxShape::Orthogonal => lines.push(
                [m[(0, 0)], m[(1, 1)], m[(2, 2)]]
                    .map(format_float)
                    .join(" "),
            ),
            BoxShape::CellMatrix => {
                for col in 0..3 {
                    lines.push((0..3).map(|row| format_float(m[(row, col)])).collect::<Vec<_>>().join(" "));
                }
            }
        }
    }
    Section::new("Box_Info").lines(lines)
}

pub fn temperature_info(temperatures: &[f64]) -> Result<Section, ControlFileError> {
    if let Some(&t) = temperatures.iter().find(|&&t| t <= 0.0) {
        return Err(ControlFileError::invalid(
            "temperature",
            format!("must be positive, found {t} K"),
        ));
    }
    Ok(Section::new("Temperature_Info").lines(temperatures.iter().map(|&t| format_float(t))))
}

pub fn pressure_info(pressures: &[f64]) -> Section {
    Section::new("Pressure_Info").lines(pressures.iter().map(|&p| format_float(p)))
}

/// Chemical potentials in kJ/mol; `None` marks a species that is not inserted.
pub fn chemical_potential_info(potentials: &[Option<f64>]) -> Section {
    Section::new("Chemical_Potential_Info").line(spaced(
        potentials
            .iter()
            .map(|mu| mu.map_or_else(|| "none".to_string(), format_float)),
    ))
}

/// Chooses how each box is initialised: built from scratch when it starts
/// empty, read from `box{n}.in.xyz` otherwise, with molecules added on top
/// when `mols_to_add` asks for more.
pub fn start_type(mols_in_boxes: &[Vec<usize>], mols_to_add: &[Vec<usize>]) -> Section {
    let lines = mols_in_boxes.iter().zip(mols_to_add).enumerate().map(|(ibox, (existing, to_add))| {
        let xyz = format!("box{}.in.xyz", ibox + 1);
        if existing.iter().all(|&n| n == 0) {
            format!("make_config {}", join(to_add))
        } else if to_add.iter().any(|&n| n > 0) {
            format!("add_to_config {} {xyz} {}", join(existing), join(to_add))
        } else {
            format!("read_config {} {xyz}", join(existing))
        }
    });
    Section::new("Start_Type").lines(lines.collect::<Vec<_>>())
}

/// The volume-statistics frequency is written only for ensembles with volume moves.
pub fn run_type(run_type: RunType, thermal_stat_freq: u64, vol_stat_freq: Option<u64>) -> Section {
    let line = match vol_stat_freq {
        Some(vol) => format!("{run_type} {thermal_stat_freq} {vol}"),
        None => format!("{run_type} {thermal_stat_freq} "),
    };
    Section::new("Run_Type").line(line)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimulationLength {
    pub units: LengthUnits,
    pub prop_freq: u64,
    pub coord_freq: u64,
    pub run_length: u64,
    pub steps_per_sweep: Option<u64>,
    pub block_avg_freq: Option<u64>,
}

pub fn simulation_length_info(length: &SimulationLength) -> Result<Section, ControlFileError> {
    for (name, value) in [("prop_freq", length.prop_freq), ("coord_freq", length.coord_freq)] {
        if value == 0 {
            return Err(ControlFileError::invalid(name, "must be a positive integer"));
        }
    }
    let mut section = Section::new("Simulation_Length_Info")
        .line(format!("units {}", length.units))
        .line(format!("prop_freq {}", length.prop_freq))
        .line(format!("coord_freq {}", length.coord_freq))
        .line(format!("run {}", length.run_length));
    if let Some(steps) = length.steps_per_sweep {
        section = section.line(format!("steps_per_sweep {steps}"));
    }
    if let Some(block) = length.block_avg_freq {
        section = section.line(format!("block_averages {block}"));
    }
    Ok(section)
}

/// One `Property_Info` list per box, all listing the same properties.
pub fn property_info<S: AsRef<str>>(properties: &[S], n_boxes: usize) -> Result<Section, ControlFileError> {
    if let Some(bad) = properties.iter().find(|p| !SUPPORTED_PROPERTIES.contains(p.as_ref())) {
        let mut supported: Vec<_> = SUPPORTED_PROPERTIES.iter().copied().collect();
        supported.sort_unstable();
        return Err(ControlFileError::invalid(
            "property",
            format!("'{}'. Supported properties are: {}", bad.as_ref(), supported.join(", ")),
        ));
    }
    let mut lines = Vec::new();
    for ibox in 0..n_boxes {
        if ibox > 0 {
            lines.push(String::new());
            lines.push(format!("# Property_Info {}", ibox + 1));
        }
        lines.extend(properties.iter().map(|p| p.as_ref().to_string()));
    }
    Ok(Section::new("Property_Info 1").lines(lines))
}

pub fn fragment_files() -> Section {
    Section::new("Fragment_Files")
}

pub fn verbose_logfile(enabled: bool) -> Section {
    Section::new("Verbose_Logfile").line(enabled.to_string())
}

pub fn cbmc_info(n_insert: u32, n_dihed: u32, rcut: &[f64]) -> Section {
    Section::new("CBMC_Info")
        .line(format!("kappa_ins {n_insert}"))
        .line(format!("kappa_dih {n_dihed}"))
        .line(format!(
            "rcut_cbmc {}",
            rcut.iter().map(|&r| format_float(r)).collect::<Vec<_>>().join(" ")
        ))
}

fn join(counts: &[usize]) -> String {
    counts.iter().map(usize::to_string).collect::<Vec<_>>().join(" ")
}

fn check_positive(field: &str, values: &[f64]) -> Result<(), ControlFileError> {
    match values.iter().find(|&&v| v <= 0.0) {
        Some(v) => Err(ControlFileError::invalid(field, format!("must be positive, found {v}"))),
        None => Ok(()),
    }
}
