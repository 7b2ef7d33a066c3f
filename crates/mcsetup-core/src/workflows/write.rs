use super::config::RunConfig;
use super::error::WorkflowError;
use crate::core::io::control::ControlFile;
use crate::core::io::control::ControlFileError;
use crate::core::io::control::moves::MoveBlock;
use crate::core::io::control::sections::{self, SimulationLength};
use crate::core::io::traits::EngineInputFile;
use crate::core::models::system::System;
use crate::core::moves::ensemble::Ensemble;
use crate::core::moves::moveset::MoveSet;
use crate::core::units::{self, Dimension, Quantity};
use rand::Rng;
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument};

const SEED_RANGE: std::ops::Range<i64> = 1..100_000_000;
const GCMC_MAX_MOLECULES_BUFFER: usize = 2000;

/// Generates the control file for `system` and `moves` without touching the
/// filesystem.
///
/// Every input is validated before any text is produced, so a failure never
/// yields a partial file.
///
/// # Errors
///
/// Returns a [`WorkflowError`] describing the first invalid input.
#[instrument(skip_all, name = "generate_input")]
pub fn generate_input(system: &System, moves: &MoveSet, config: &RunConfig) -> Result<String, WorkflowError> {
    let (_, file) = render(system, moves, config)?;
    Ok(file.into_string())
}

/// Generates the control file and writes it to `<dir>/<run_name>.inp`.
///
/// # Return
///
/// The path of the written file.
///
/// # Errors
///
/// Returns a [`WorkflowError`] if validation fails or the file cannot be written.
#[instrument(skip_all, name = "write_input", fields(dir = %dir.display()))]
pub fn write_input(
    dir: &Path,
    system: &System,
    moves: &MoveSet,
    config: &RunConfig,
) -> Result<PathBuf, WorkflowError> {
    let (run_name, file) = render(system, moves, config)?;
    let path = dir.join(format!("{run_name}.inp"));
    file.write_to_path(&path).map_err(|source| WorkflowError::File {
        path: path.clone(),
        source,
    })?;
    info!(path = %path.display(), "Wrote control file.");
    Ok(path)
}

/// Resolves the run name of a new run; without a name the ensemble's short
/// name is used.
pub fn resolve_run_name(name: Option<&str>, ensemble: Ensemble) -> Result<String, ControlFileError> {
    name.map_or_else(|| Ok(ensemble.name().to_string()), sanitize_run_name)
}

/// Normalizes a run name: whitespace becomes `_`, and only ASCII alphanumerics,
/// `_` and `.` are accepted.
pub fn sanitize_run_name(name: &str) -> Result<String, ControlFileError> {
    let normalized: String = name
        .trim()
        .chars()
        .map(|c| if c.is_whitespace() { '_' } else { c })
        .collect();
    if normalized.is_empty() {
        return Err(ControlFileError::invalid("run_name", "must not be empty"));
    }
    if let Some(bad) = normalized
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || *c == '_' || *c == '.'))
    {
        return Err(ControlFileError::invalid(
            "run_name",
            format!("'{name}' contains '{bad}'; only letters, digits, '_' and '.' are allowed"),
        ));
    }
    Ok(normalized)
}

fn render(system: &System, moves: &MoveSet, config: &RunConfig) -> Result<(String, ControlFile), WorkflowError> {
    let ensemble = moves.ensemble();
    check_consistency(system, moves)?;
    let n_boxes = ensemble.n_boxes();
    let run_name = resolve_run_name(config.run_name.as_deref(), ensemble)?;
    debug!(%ensemble, %run_name, "Validating run configuration.");

    if config.run_length == 0 {
        return Err(ControlFileError::invalid("run_length", "must be a positive integer").into());
    }

    let temperatures = per_box(&config.temperature, n_boxes, "temperature")?
        .iter()
        .map(|q| units::validate(q, Dimension::Temperature, "temperature"))
        .collect::<Result<Vec<_>, _>>()?;

    let pressures = if ensemble.requires_pressure() {
        let given = config.pressure.as_ref().ok_or_else(|| {
            ControlFileError::MissingParameter(format!("pressure is required for the '{ensemble}' ensemble"))
        })?;
        Some(
            per_box(given, n_boxes, "pressure")?
                .iter()
                .map(|q| units::validate(q, Dimension::Pressure, "pressure"))
                .collect::<Result<Vec<_>, _>>()?,
        )
    } else {
        if config.pressure.is_some() {
            debug!("Ignoring pressure for the '{}' ensemble.", ensemble);
        }
        None
    };

    let chemical_potentials = if ensemble.has_insertions() {
        Some(chemical_potentials(config.chemical_potentials.as_deref(), moves)?)
    } else {
        None
    };

    let vdw_cutoffs = per_box(&config.vdw_cutoffs, n_boxes, "vdw_cutoff")?
        .iter()
        .map(|cutoffs| {
            cutoffs
                .iter()
                .map(|q| units::validate(q, Dimension::Length, "vdw_cutoff"))
                .collect::<Result<Vec<_>, _>>()
        })
        .collect::<Result<Vec<_>, _>>()?;
    let charge_cutoffs = per_box(&config.charge_cutoffs, n_boxes, "charge_cutoff")?
        .iter()
        .map(|q| units::validate(q, Dimension::Length, "charge_cutoff"))
        .collect::<Result<Vec<_>, _>>()?;
    let rcut_min = units::validate(&config.rcut_min, Dimension::Length, "rcut_min")?;

    check_restrictions_fit(system, moves)?;
    let molecule_files = molecule_files(system, moves, config.max_molecules.as_deref())?;
    let seeds = config.seeds.unwrap_or_else(|| {
        let mut rng = rand::thread_rng();
        let seeds = [rng.gen_range(SEED_RANGE), rng.gen_range(SEED_RANGE)];
        debug!(?seeds, "Generated random seeds.");
        seeds
    });

    let mut file = ControlFile::from_sections(&[
        sections::run_name(&run_name),
        sections::sim_type(ensemble),
        sections::nbr_species(system.n_species()),
        sections::vdw_style(config.vdw_style, config.cutoff_style, &vdw_cutoffs)?,
        sections::charge_style(
            config.charge_style,
            &charge_cutoffs,
            Some(config.ewald_accuracy),
            config.dsf_damping,
        )?,
        sections::mixing_rule(config.mixing_rule, &config.custom_mixing)?,
        sections::seed_info(seeds)?,
        sections::rcutoff_low(rcut_min)?,
        sections::pair_energy(config.pair_energy),
        sections::molecule_files(&molecule_files),
        sections::box_info(system.boxes()),
        sections::temperature_info(&temperatures)?,
    ]);
    if let Some(pressures) = &pressures {
        file.push_section(&sections::pressure_info(pressures));
    }
    if let Some(potentials) = &chemical_potentials {
        file.push_section(&sections::chemical_potential_info(potentials));
    }
    file.push_str(&MoveBlock::from_moveset(moves).to_string());

    let vol_stat_freq = ensemble.has_volume_moves().then_some(config.vol_stat_freq);
    let length = SimulationLength {
        units: config.units,
        prop_freq: config.prop_freq,
        coord_freq: config.coord_freq,
        run_length: config.run_length,
        steps_per_sweep: config.steps_per_sweep,
        block_avg_freq: config.block_avg_freq,
    };
    for section in [
        sections::start_type(system.mols_in_boxes(), system.mols_to_add()),
        sections::run_type(config.run_type, config.thermal_stat_freq, vol_stat_freq),
        sections::simulation_length_info(&length)?,
        sections::property_info(&config.properties, n_boxes)?,
        sections::fragment_files(),
    ] {
        file.push_section(&section);
    }
    if let Some(verbose) = config.verbose_log {
        file.push_section(&sections::verbose_logfile(verbose));
    }
    file.push_section(&sections::cbmc_info(
        moves.cbmc_n_insert(),
        moves.cbmc_n_dihed(),
        moves.cbmc_rcut(),
    ));

    Ok((run_name, file))
}

fn check_consistency(system: &System, moves: &MoveSet) -> Result<(), WorkflowError> {
    if system.n_boxes() != moves.n_boxes() {
        return Err(WorkflowError::Inconsistent(format!(
            "the '{}' ensemble needs {} box(es) but the system has {}",
            moves.ensemble(),
            moves.n_boxes(),
            system.n_boxes()
        )));
    }
    if system.n_species() != moves.n_species() {
        return Err(WorkflowError::Inconsistent(format!(
            "the move set covers {} species but the system has {}",
            moves.n_species(),
            system.n_species()
        )));
    }
    Ok(())
}

/// Expands a one-entry list to every box, or checks it has one entry per box.
fn per_box<'a, T>(values: &'a [T], n_boxes: usize, field: &str) -> Result<Vec<&'a T>, ControlFileError> {
    match values.len() {
        1 => Ok(vec![&values[0]; n_boxes]),
        n if n == n_boxes => Ok(values.iter().collect()),
        n => Err(ControlFileError::invalid(
            field,
            format!("expected 1 or {n_boxes} values, found {n}"),
        )),
    }
}

fn chemical_potentials(given: Option<&[Option<Quantity>]>, moves: &MoveSet) -> Result<Vec<Option<f64>>, ControlFileError> {
    let insertable = moves.insertable();
    let Some(given) = given else {
        if insertable.iter().any(|&ins| ins) {
            return Err(ControlFileError::MissingParameter(
                "chemical_potentials are required for insertable species in the 'gcmc' ensemble".to_string(),
            ));
        }
        return Ok(vec![None; insertable.len()]);
    };
    if given.len() != insertable.len() {
        return Err(ControlFileError::invalid(
            "chemical_potentials",
            format!("expected {} values, found {}", insertable.len(), given.len()),
        ));
    }
    given
        .iter()
        .zip(insertable)
        .enumerate()
        .map(|(isp, (mu, &ins))| match (mu, ins) {
            (None, true) => Err(ControlFileError::MissingParameter(format!(
                "chemical potential for insertable species {}",
                isp + 1
            ))),
            (Some(mu), _) => Ok(Some(units::validate(mu, Dimension::MolarEnergy, "chemical_potentials")?)),
            (None, false) => Ok(None),
        })
        .collect()
}

fn check_restrictions_fit(system: &System, moves: &MoveSet) -> Result<(), ControlFileError> {
    let Some(grid) = moves.restricted_insertions() else {
        return Ok(());
    };
    for (ibox, (row, simbox)) in grid.iter().zip(system.boxes()).enumerate() {
        for (isp, restriction) in row.iter().enumerate() {
            if let Some(restriction) = restriction {
                if !restriction.fits_in(simbox) {
                    return Err(ControlFileError::RestrictedInsertion(format!(
                        "'{restriction}' for species {} does not fit in box {}: the bound must not exceed {}",
                        isp + 1,
                        ibox + 1,
                        restriction.bound_limit(simbox)
                    )));
                }
            }
        }
    }
    Ok(())
}

fn molecule_files(
    system: &System,
    moves: &MoveSet,
    max_molecules: Option<&[usize]>,
) -> Result<Vec<(String, usize)>, ControlFileError> {
    let species = system.species();
    let maxima = match max_molecules {
        Some(list) if list.len() != species.len() => {
            return Err(ControlFileError::invalid(
                "max_molecules",
                format!(
                    "Length of list specified ({}) does not match the number of species ({})",
                    list.len(),
                    species.len()
                ),
            ));
        }
        Some(list) => list.to_vec(),
        None => (0..species.len())
            .map(|isp| {
                let buffer = if moves.ensemble() == Ensemble::Gcmc && moves.insertable()[isp] {
                    GCMC_MAX_MOLECULES_BUFFER
                } else {
                    0
                };
                system.total_molecules(isp) + buffer
            })
            .collect(),
    };
    Ok(species.iter().map(|s| s.mcf_file()).zip(maxima).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::io::control::format::{SEPARATOR, format_float};
    use crate::core::io::control::styles::{ChargeStyle, CutoffStyle, MixingRule, RunType};
    use crate::core::models::simbox::SimBox;
    use crate::core::models::species::Species;
    use tempfile::tempdir;

    fn methane() -> Species {
        Species::new("methane", 1, 0)
    }

    fn ethane() -> Species {
        Species::new("ethane", 8, 7)
    }

    fn cubic(length: f64) -> SimBox {
        SimBox::from_lengths([length; 3]).unwrap()
    }

    fn base_config() -> crate::workflows::config::RunConfigBuilder {
        RunConfig::builder()
            .run_type(RunType::Equilibration)
            .run_length(500)
            .temperature(Quantity::kelvin(300.0))
            .seeds([1, 2])
    }

    fn nvt_methane() -> (System, MoveSet) {
        let system = System::builder()
            .simbox(cubic(30.0))
            .species(methane())
            .mols_to_add(vec![vec![100]])
            .build()
            .unwrap();
        let moves = MoveSet::new(Ensemble::Nvt, system.species()).unwrap();
        (system, moves)
    }

    fn gemc_pair() -> (System, MoveSet) {
        let system = System::builder()
            .boxes(vec![cubic(50.0), cubic(50.0)])
            .species(ethane())
            .species(methane())
            .mols_to_add(vec![vec![10, 0], vec![0, 10]])
            .build()
            .unwrap();
        let moves = MoveSet::new(Ensemble::Gemc, system.species()).unwrap();
        (system, moves)
    }

    fn gcmc_pair() -> (System, MoveSet) {
        let system = System::builder()
            .simbox(cubic(30.0))
            .species(ethane())
            .species(methane())
            .mols_to_add(vec![vec![0, 10]])
            .build()
            .unwrap();
        let moves = MoveSet::new(Ensemble::Gcmc, system.species()).unwrap();
        (system, moves)
    }

    #[test]
    fn generate_input_produces_complete_nvt_file() {
        let (system, moves) = nvt_methane();
        let text = generate_input(&system, &moves, &base_config().build().unwrap()).unwrap();

        let section = |name: &str, body: &str| format!("# {name}\n{body}{SEPARATOR}\n\n");
        let expected = [
            section("Run_Name", "nvt.out\n"),
            section("Sim_Type", "nvt_mc\n"),
            section("Nbr_Species", "1\n"),
            section("VDW_Style", "lj cut_tail 12.0\n"),
            section("Charge_Style", "coul ewald 12.0 1e-05\n"),
            section("Mixing_Rule", "lb\n"),
            section("Seed_Info", "1 2\n"),
            section("Rcutoff_Low", "1.0\n"),
            section("Pair_Energy", "true\n"),
            section("Molecule_Files", "methane.mcf 100\n"),
            section("Box_Info", "1\ncubic\n30.0\n"),
            section("Temperature_Info", "300.0\n"),
            "# Move_Probability_Info\n\n".to_string(),
            section(
                "Prob_Translation",
                &format!("{}\n2.0 \n", format_float(moves.prob_translate())),
            ),
            format!("# Done_Probability_Info\n{SEPARATOR}\n\n"),
            section("Start_Type", "make_config 100\n"),
            section("Run_Type", "equilibration 1000 \n"),
            section(
                "Simulation_Length_Info",
                "units steps\nprop_freq 500\ncoord_freq 5000\nrun 500\n",
            ),
            section(
                "Property_Info 1",
                "energy_total\nenergy_intra\nenergy_inter\nenthalpy\npressure\nvolume\nnmols\nmass_density\n",
            ),
            section("Fragment_Files", ""),
            section("CBMC_Info", "kappa_ins 10\nkappa_dih 10\nrcut_cbmc 6.0\n"),
        ]
        .concat();

        assert_eq!(text, expected);
    }

    #[test]
    fn generate_input_writes_two_box_sections_for_gemc() {
        let (system, moves) = gemc_pair();
        let text = generate_input(&system, &moves, &base_config().build().unwrap()).unwrap();

        assert!(text.contains("# Run_Name\ngemc.out\n"));
        assert!(text.contains("# Sim_Type\ngemc\n"));
        assert!(text.contains("# Box_Info\n2\ncubic\n50.0\n\ncubic\n50.0\n"));
        assert!(text.contains("# Temperature_Info\n300.0\n300.0\n"));
        assert!(text.contains("# VDW_Style\nlj cut_tail 12.0\nlj cut_tail 12.0\n"));
        assert!(text.contains("# Molecule_Files\nethane.mcf 10\nmethane.mcf 10\n"));
        assert!(text.contains("# Start_Type\nmake_config 10 0\nmake_config 0 10\n"));
        assert!(text.contains("# Run_Type\nequilibration 1000 100\n"));
        assert!(text.contains("# Prob_Swap\n0.1\ncbmc cbmc \nprob_swap_species 0.5 0.5 \nprob_swap_from_box 0.5 0.5 \n"));
        assert!(text.contains("# Property_Info 1\n"));
        assert!(text.contains("\n\n# Property_Info 2\n"));
        assert!(!text.contains("# Pressure_Info"));
        assert!(!text.contains("# Chemical_Potential_Info"));
        assert!(text.contains("rcut_cbmc 6.0 6.0\n"));
    }

    #[test]
    fn generate_input_requires_and_broadcasts_pressure_for_npt_ensembles() {
        let system = System::builder()
            .boxes(vec![cubic(50.0), cubic(50.0)])
            .species(methane())
            .build()
            .unwrap();
        let moves = MoveSet::new(Ensemble::GemcNpt, system.species()).unwrap();

        let missing = generate_input(&system, &moves, &base_config().build().unwrap());
        assert!(matches!(
            missing,
            Err(WorkflowError::ControlFile(ControlFileError::MissingParameter(_)))
        ));

        let config = base_config().pressure(Quantity::bar(1.0)).build().unwrap();
        let text = generate_input(&system, &moves, &config).unwrap();
        assert!(text.contains("# Pressure_Info\n1.0\n1.0\n"));

        let config = base_config()
            .pressures(vec![Quantity::bar(2.0), Quantity::bar(10.0)])
            .build()
            .unwrap();
        let text = generate_input(&system, &moves, &config).unwrap();
        assert!(text.contains("# Pressure_Info\n2.0\n10.0\n"));
    }

    #[test]
    fn generate_input_rejects_pressure_with_wrong_dimension() {
        let system = System::builder().simbox(cubic(30.0)).species(methane()).build().unwrap();
        let moves = MoveSet::new(Ensemble::Npt, system.species()).unwrap();
        let config = base_config().pressure(Quantity::kelvin(1.0)).build().unwrap();
        assert!(matches!(
            generate_input(&system, &moves, &config),
            Err(WorkflowError::Unit(_))
        ));
    }

    #[test]
    fn generate_input_gcmc_needs_chemical_potentials_for_insertable_species() {
        let (system, moves) = gcmc_pair();
        let missing = generate_input(&system, &moves, &base_config().build().unwrap());
        assert!(matches!(
            missing,
            Err(WorkflowError::ControlFile(ControlFileError::MissingParameter(_)))
        ));

        let partial = base_config()
            .chemical_potentials(vec![None, Some(Quantity::kj_per_mol(10.0))])
            .build()
            .unwrap();
        assert!(generate_input(&system, &moves, &partial).is_err());
    }

    #[test]
    fn generate_input_gcmc_writes_potentials_and_buffered_max_molecules() {
        let (system, mut moves) = gcmc_pair();
        moves.set_insertable(&[false, true]).unwrap();
        let config = base_config()
            .chemical_potentials(vec![None, Some(Quantity::kj_per_mol(10.0))])
            .build()
            .unwrap();
        let text = generate_input(&system, &moves, &config).unwrap();

        assert!(text.contains("# Chemical_Potential_Info\nnone 10.0 \n"));
        assert!(text.contains("# Molecule_Files\nethane.mcf 0\nmethane.mcf 2010\n"));
        assert!(text.contains("# Prob_Insertion\n0.1\nnone cbmc \n"));
        assert!(text.contains("# Prob_Deletion\n0.1\n"));
    }

    #[test]
    fn generate_input_rejects_restriction_that_does_not_fit() {
        let (system, mut moves) = gcmc_pair();
        let species = system.species().to_vec();
        moves
            .add_restricted_insertions(
                &species,
                &[vec![None, Some("sphere")]],
                &[vec![None, Some(vec![Quantity::angstrom(20.0)])]],
            )
            .unwrap();
        let config = base_config()
            .chemical_potentials(vec![Some(Quantity::kj_per_mol(-5.0)), Some(Quantity::kj_per_mol(10.0))])
            .build()
            .unwrap();
        let err = generate_input(&system, &moves, &config).unwrap_err();
        assert!(err.to_string().starts_with("Restricted insertion"));

        moves
            .add_restricted_insertions(
                &species,
                &[vec![None, Some("sphere")]],
                &[vec![None, Some(vec![Quantity::angstrom(10.0)])]],
            )
            .unwrap();
        let text = generate_input(&system, &moves, &config).unwrap();
        assert!(text.contains("\nrestricted_insertion sphere 10.0\n"));
    }

    #[test]
    fn generate_input_validates_explicit_max_molecules_length() {
        let (system, moves) = gemc_pair();
        let config = base_config().max_molecules(vec![100]).build().unwrap();
        let err = generate_input(&system, &moves, &config).unwrap_err();
        assert!(err.to_string().contains("Length of list specified"));

        let config = base_config().max_molecules(vec![100, 200]).build().unwrap();
        let text = generate_input(&system, &moves, &config).unwrap();
        assert!(text.contains("# Molecule_Files\nethane.mcf 100\nmethane.mcf 200\n"));
    }

    #[test]
    fn generate_input_writes_optional_styles() {
        let (system, moves) = nvt_methane();
        let config = base_config()
            .cutoff_style(CutoffStyle::CutSwitch)
            .vdw_cutoff(vec![Quantity::angstrom(12.0), Quantity::angstrom(15.0)])
            .charge_style(ChargeStyle::Dsf)
            .dsf_damping(0.2)
            .mixing_rule(MixingRule::Geometric)
            .verbose_log(true)
            .steps_per_sweep(10)
            .build()
            .unwrap();
        let text = generate_input(&system, &moves, &config).unwrap();

        assert!(text.contains("# VDW_Style\nlj cut_switch 12.0 15.0\n"));
        assert!(text.contains("# Charge_Style\ncoul dsf 12.0 0.2\n"));
        assert!(text.contains("# Mixing_Rule\ngeometric\n"));
        assert!(text.contains("# Verbose_Logfile\ntrue\n"));
        assert!(text.contains("steps_per_sweep 10\n"));
    }

    #[test]
    fn generate_input_rejects_bad_cutoff_arity_before_writing_anything() {
        let (system, moves) = nvt_methane();
        let config = base_config().cutoff_style(CutoffStyle::CutSwitch).build().unwrap();
        let err = generate_input(&system, &moves, &config).unwrap_err();
        assert!(err.to_string().contains("requires an inner and outer cutoff"));
    }

    #[test]
    fn generate_input_generates_positive_seeds_when_absent() {
        let (system, moves) = nvt_methane();
        let config = RunConfig::builder()
            .run_type(RunType::Equilibration)
            .run_length(500)
            .temperature(Quantity::kelvin(300.0))
            .build()
            .unwrap();
        let text = generate_input(&system, &moves, &config).unwrap();
        let seeds: Vec<i64> = text
            .split("# Seed_Info\n")
            .nth(1)
            .and_then(|rest| rest.lines().next())
            .unwrap()
            .split_whitespace()
            .map(|s| s.parse().unwrap())
            .collect();
        assert_eq!(seeds.len(), 2);
        assert!(seeds.iter().all(|s| SEED_RANGE.contains(s)));
    }

    #[test]
    fn generate_input_rejects_mismatched_system_and_moveset() {
        let (system, _) = nvt_methane();
        let moves = MoveSet::new(Ensemble::Gemc, system.species()).unwrap();
        assert!(matches!(
            generate_input(&system, &moves, &base_config().build().unwrap()),
            Err(WorkflowError::Inconsistent(_))
        ));
    }

    #[test]
    fn resolve_run_name_normalizes_whitespace_and_rejects_symbols() {
        assert_eq!(resolve_run_name(None, Ensemble::GemcNpt).unwrap(), "gemc_npt");
        assert_eq!(resolve_run_name(Some("my run.1"), Ensemble::Nvt).unwrap(), "my_run.1");
        assert!(resolve_run_name(Some("bad/name"), Ensemble::Nvt).is_err());
        assert!(resolve_run_name(Some("   "), Ensemble::Nvt).is_err());
    }

    #[test]
    fn write_input_creates_named_file_in_directory() {
        let dir = tempdir().unwrap();
        let (system, moves) = nvt_methane();
        let config = base_config().run_name("methane nvt").build().unwrap();

        let path = write_input(dir.path(), &system, &moves, &config).unwrap();

        assert_eq!(path, dir.path().join("methane_nvt.inp"));
        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(written, generate_input(&system, &moves, &config).unwrap());
        assert!(written.starts_with("# Run_Name\nmethane_nvt.out\n"));
    }

    #[test]
    fn write_input_reports_path_of_unwritable_target() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("no_such_dir");
        let (system, moves) = nvt_methane();
        let err = write_input(&missing, &system, &moves, &base_config().build().unwrap()).unwrap_err();
        match err {
            WorkflowError::File { path, .. } => assert_eq!(path, missing.join("nvt.inp")),
            other => panic!("unexpected error: {other}"),
        }
    }
}
