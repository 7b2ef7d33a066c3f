use super::error::ControlFileError;
use super::format::{SEPARATOR, Section, format_float, spaced, spaced_floats};
use crate::core::moves::moveset::MoveSet;
use crate::core::moves::restricted::{RestrictedInsertion, RestrictionGrid};
use crate::core::units::Quantity;
use std::fmt;
use std::str::FromStr;

const BLOCK_HEADER: &str = "# Move_Probability_Info";
const BLOCK_FOOTER: &str = "# Done_Probability_Info";
const DELETION_HEADER: &str = "Prob_Deletion";
const RESTRICTED_KEYWORD: &str = "restricted_insertion";
const UNRESTRICTED: &str = "none";
const SWAP_SPECIES_KEYWORD: &str = "prob_swap_species";
const SWAP_FROM_BOX_KEYWORD: &str = "prob_swap_from_box";

/// Move classes that may appear in the move-probability block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MoveKind {
    Translate,
    Rotate,
    Angle,
    Dihedral,
    Regrow,
    Volume,
    Insert,
    Swap,
}

impl MoveKind {
    pub const ALL: [MoveKind; 8] = [
        Self::Translate,
        Self::Rotate,
        Self::Angle,
        Self::Dihedral,
        Self::Regrow,
        Self::Volume,
        Self::Insert,
        Self::Swap,
    ];

    pub fn keyword(self) -> &'static str {
        match self {
            Self::Translate => "translate",
            Self::Rotate => "rotate",
            Self::Angle => "angle",
            Self::Dihedral => "dihed",
            Self::Regrow => "regrow",
            Self::Volume => "volume",
            Self::Insert => "insert",
            Self::Swap => "swap",
        }
    }

    pub fn header(self) -> &'static str {
        match self {
            Self::Translate => "Prob_Translation",
            Self::Rotate => "Prob_Rotation",
            Self::Angle => "Prob_Angle",
            Self::Dihedral => "Prob_Dihedral",
            Self::Regrow => "Prob_Regrowth",
            Self::Volume => "Prob_Volume",
            Self::Insert => "Prob_Insertion",
            Self::Swap => "Prob_Swap",
        }
    }

    pub fn from_header(header: &str) -> Result<Self, ControlFileError> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.header() == header)
            .ok_or_else(|| invalid_key(header))
    }
}

impl fmt::Display for MoveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

impl FromStr for MoveKind {
    type Err = ControlFileError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.keyword() == s)
            .ok_or_else(|| invalid_key(s))
    }
}

fn invalid_key(key: &str) -> ControlFileError {
    let supported: Vec<_> = MoveKind::ALL.iter().map(|k| k.keyword()).collect();
    ControlFileError::InvalidMoveKey {
        key: key.to_string(),
        supported: supported.join(", "),
    }
}

/// One sub-section of the move-probability block. Lengths are in Å, angles in
/// degrees and volumes in Å³.
#[derive(Debug, Clone, PartialEq)]
pub enum MoveEntry {
    Translate {
        probability: f64,
        max_displacement: Vec<Vec<f64>>,
    },
    Rotate {
        probability: f64,
        max_rotation: Vec<Vec<f64>>,
    },
    Angle {
        probability: f64,
    },
    Dihedral {
        probability: f64,
        max_rotation: Vec<f64>,
    },
    Regrow {
        probability: f64,
        species_weights: Vec<f64>,
    },
    Volume {
        probability: f64,
        max_change: Vec<f64>,
    },
    /// Insertion; deletion mirrors its probability. `restrictions` is indexed
    /// `[box][species]` and is empty when no restrictions were registered.
    Insert {
        probability: f64,
        insertable: Vec<bool>,
        restrictions: RestrictionGrid,
    },
    Swap {
        probability: f64,
        insertable: Vec<bool>,
        restrictions: RestrictionGrid,
        species_weights: Option<Vec<f64>>,
        from_box_weights: Option<Vec<f64>>,
    },
}

impl MoveEntry {
    pub fn kind(&self) -> MoveKind {
        match self {
            Self::Translate { .. } => MoveKind::Translate,
            Self::Rotate { .. } => MoveKind::Rotate,
            Self::Angle { .. } => MoveKind::Angle,
            Self::Dihedral { .. } => MoveKind::Dihedral,
            Self::Regrow { .. } => MoveKind::Regrow,
            Self::Volume { .. } => MoveKind::Volume,
            Self::Insert { .. } => MoveKind::Insert,
            Self::Swap { .. } => MoveKind::Swap,
        }
    }

    pub fn probability(&self) -> f64 {
        match *self {
            Self::Translate { probability, .. }
            | Self::Rotate { probability, .. }
            | Self::Angle { probability }
            | Self::Dihedral { probability, .. }
            | Self::Regrow { probability, .. }
            | Self::Volume { probability, .. }
            | Self::Insert { probability, .. }
            | Self::Swap { probability, .. } => probability,
        }
    }

    fn sections(&self) -> Vec<Section> {
        let section = Section::new(self.kind().header()).line(format_float(self.probability()));
        match self {
            Self::Translate { max_displacement: rows, .. } | Self::Rotate { max_rotation: rows, .. } => {
                vec![section.lines(rows.iter().map(|row| spaced_floats(row)))]
            }
            Self::Angle { .. } => vec![section],
            Self::Dihedral { max_rotation: values, .. } | Self::Regrow { species_weights: values, .. } => {
                vec![section.line(spaced_floats(values))]
            }
            Self::Volume { max_change, .. } => {
                vec![section.lines(max_change.iter().map(|&v| format_float(v)))]
            }
            Self::Insert {
                probability,
                insertable,
                restrictions,
            } => vec![
                section
                    .line(insertion_methods(insertable))
                    .lines(restricted_lines(restrictions)),
                Section::new(DELETION_HEADER).line(format_float(*probability)),
            ],
            Self::Swap {
                insertable,
                restrictions,
                species_weights,
                from_box_weights,
                ..
            } => {
                let mut section = section
                    .line(insertion_methods(insertable))
                    .lines(restricted_lines(restrictions));
                if let Some(weights) = species_weights {
                    section = section.line(format!("{SWAP_SPECIES_KEYWORD} {}", spaced_floats(weights)));
                }
                if let Some(weights) = from_box_weights {
                    section = section.line(format!("{SWAP_FROM_BOX_KEYWORD} {}", spaced_floats(weights)));
                }
                vec![section]
            }
        }
    }
}

fn insertion_methods(insertable: &[bool]) -> String {
    spaced(insertable.iter().map(|&ins| if ins { "cbmc" } else { "none" }))
}

/// One line per species of each box, box-major. Species without a region get
/// an explicit `none` so positions survive a round trip.
fn restricted_lines(grid: &RestrictionGrid) -> impl Iterator<Item = String> + '_ {
    grid.iter().flatten().map(|slot| match slot {
        Some(restriction) => {
            let values: Vec<String> = restriction.values().iter().map(|v| format!("{v:.1}")).collect();
            format!("{RESTRICTED_KEYWORD} {} {}", restriction.kind(), values.join(" "))
        }
        None => format!("{RESTRICTED_KEYWORD} {UNRESTRICTED}"),
    })
}

/// The `# Move_Probability_Info` block: at most one entry per move class, in
/// insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MoveBlock {
    entries: Vec<MoveEntry>,
}

impl MoveBlock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the block for a move set. Only classes with a positive
    /// probability are included.
    pub fn from_moveset(moves: &MoveSet) -> Self {
        let restrictions: RestrictionGrid = moves
            .restricted_insertions()
            .map(<[_]>::to_vec)
            .unwrap_or_default();

        let candidates = [
            MoveEntry::Translate {
                probability: moves.prob_translate(),
                max_displacement: moves.max_translate().to_vec(),
            },
            MoveEntry::Rotate {
                probability: moves.prob_rotate(),
                max_rotation: moves.max_rotate().to_vec(),
            },
            MoveEntry::Angle {
                probability: moves.prob_angle(),
            },
            MoveEntry::Dihedral {
                probability: moves.prob_dihedral(),
                max_rotation: moves.max_dihedral().to_vec(),
            },
            MoveEntry::Regrow {
                probability: moves.prob_regrow(),
                species_weights: moves.prob_regrow_species().to_vec(),
            },
            MoveEntry::Volume {
                probability: moves.prob_volume(),
                max_change: moves.max_volume().to_vec(),
            },
            MoveEntry::Insert {
                probability: moves.prob_insert(),
                insertable: moves.insertable().to_vec(),
                restrictions: restrictions.clone(),
            },
            MoveEntry::Swap {
                probability: moves.prob_swap(),
                insertable: moves.insertable().to_vec(),
                restrictions,
                species_weights: Some(moves.prob_swap_species().to_vec()),
                from_box_weights: Some(moves.prob_swap_from_box().to_vec()),
            },
        ];

        Self {
            entries: candidates.into_iter().filter(|e| e.probability() > 0.0).collect(),
        }
    }

    /// Appends an entry.
    ///
    /// # Errors
    ///
    /// Returns [`ControlFileError::Malformed`] if the block already has an entry
    /// of the same class.
    pub fn push(&mut self, entry: MoveEntry) -> Result<(), ControlFileError> {
        if self.entries.iter().any(|e| e.kind() == entry.kind()) {
            return Err(ControlFileError::Malformed(format!(
                "duplicate {} section",
                entry.kind().header()
            )));
        }
        self.entries.push(entry);
        Ok(())
    }

    pub fn entries(&self) -> &[MoveEntry] {
        &self.entries
    }

    pub fn kinds(&self) -> Vec<MoveKind> {
        self.entries.iter().map(MoveEntry::kind).collect()
    }

    /// Looks up an entry by its move keyword (`translate`, `dihed`, ...).
    ///
    /// # Errors
    ///
    /// Returns [`ControlFileError::InvalidMoveKey`] for keywords outside the
    /// supported set.
    pub fn get(&self, keyword: &str) -> Result<Option<&MoveEntry>, ControlFileError> {
        let kind: MoveKind = keyword.parse()?;
        Ok(self.entries.iter().find(|e| e.kind() == kind))
    }

    /// Parses the first move-probability block found in `text`.
    ///
    /// # Errors
    ///
    /// - [`ControlFileError::InvalidMoveKey`] for an unknown `# Prob_*` header.
    /// - [`ControlFileError::Malformed`] if the block is missing, unterminated or
    ///   has unreadable values.
    pub fn parse(text: &str) -> Result<Self, ControlFileError> {
        let mut lines = text
            .lines()
            .skip_while(|line| line.trim() != BLOCK_HEADER)
            .skip(1);

        let mut block = Self::new();
        let mut current: Option<(String, Vec<String>)> = None;
        loop {
            let Some(line) = lines.next() else {
                return Err(ControlFileError::Malformed(format!(
                    "'{BLOCK_HEADER}' block is missing or has no '{BLOCK_FOOTER}'"
                )));
            };
            let line = line.trim();
            if line == BLOCK_FOOTER {
                break;
            }
            if let Some(header) = line.strip_prefix("# ") {
                if let Some((open, _)) = &current {
                    return Err(ControlFileError::Malformed(format!(
                        "section '{open}' is not closed before '{header}'"
                    )));
                }
                current = Some((header.trim().to_string(), Vec::new()));
            } else if line.starts_with('!') {
                if let Some((header, body)) = current.take() {
                    if header != DELETION_HEADER {
                        block.push(parse_entry(&header, &body)?)?;
                    }
                }
            } else if !line.is_empty() {
                match current.as_mut() {
                    Some((_, body)) => body.push(line.to_string()),
                    None => {
                        return Err(ControlFileError::Malformed(format!(
                            "unexpected line '{line}' outside a probability section"
                        )));
                    }
                }
            }
        }
        Ok(block)
    }
}

impl fmt::Display for MoveBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{BLOCK_HEADER}")?;
        writeln!(f)?;
        for section in self.entries.iter().flat_map(MoveEntry::sections) {
            write!(f, "{section}")?;
        }
        writeln!(f, "{BLOCK_FOOTER}")?;
        writeln!(f, "{SEPARATOR}")?;
        writeln!(f)
    }
}

fn parse_entry(header: &str, body: &[String]) -> Result<MoveEntry, ControlFileError> {
    let kind = MoveKind::from_header(header)?;
    let (first, rest) = body
        .split_first()
        .ok_or_else(|| ControlFileError::Malformed(format!("{header} has no probability")))?;
    let probability = parse_float(header, first)?;

    let entry = match kind {
        MoveKind::Translate => MoveEntry::Translate {
            probability,
            max_displacement: parse_rows(header, rest)?,
        },
        MoveKind::Rotate => MoveEntry::Rotate {
            probability,
            max_rotation: parse_rows(header, rest)?,
        },
        MoveKind::Angle => MoveEntry::Angle { probability },
        MoveKind::Dihedral => MoveEntry::Dihedral {
            probability,
            max_rotation: parse_single_row(header, rest)?,
        },
        MoveKind::Regrow => MoveEntry::Regrow {
            probability,
            species_weights: parse_single_row(header, rest)?,
        },
        MoveKind::Volume => MoveEntry::Volume {
            probability,
            max_change: rest
                .iter()
                .map(|line| parse_float(header, line))
                .collect::<Result<_, _>>()?,
        },
        MoveKind::Insert | MoveKind::Swap => {
            let (methods, extra) = rest
                .split_first()
                .ok_or_else(|| ControlFileError::Malformed(format!("{header} has no insertion methods")))?;
            let insertable = methods
                .split_whitespace()
                .map(|token| match token {
                    "cbmc" => Ok(true),
                    "none" => Ok(false),
                    other => Err(ControlFileError::Malformed(format!(
                        "{header}: unknown insertion method '{other}'"
                    ))),
                })
                .collect::<Result<Vec<_>, _>>()?;

            let mut slots = Vec::new();
            let mut species_weights = None;
            let mut from_box_weights = None;
            for line in extra {
                let (keyword, values) = line.split_once(' ').unwrap_or((line.as_str(), ""));
                match keyword {
                    RESTRICTED_KEYWORD => slots.push(parse_restriction(header, values)?),
                    SWAP_SPECIES_KEYWORD if kind == MoveKind::Swap => {
                        species_weights = Some(parse_floats(header, values)?)
                    }
                    SWAP_FROM_BOX_KEYWORD if kind == MoveKind::Swap => {
                        from_box_weights = Some(parse_floats(header, values)?)
                    }
                    _ => {
                        return Err(ControlFileError::Malformed(format!(
                            "{header}: unexpected line '{line}'"
                        )));
                    }
                }
            }

            let restrictions = restriction_grid(header, slots, insertable.len())?;
            if kind == MoveKind::Insert {
                MoveEntry::Insert {
                    probability,
                    insertable,
                    restrictions,
                }
            } else {
                MoveEntry::Swap {
                    probability,
                    insertable,
                    restrictions,
                    species_weights,
                    from_box_weights,
                }
            }
        }
    };
    Ok(entry)
}

fn parse_float(header: &str, token: &str) -> Result<f64, ControlFileError> {
    token
        .trim()
        .parse()
        .map_err(|_| ControlFileError::Malformed(format!("{header}: '{token}' is not a number")))
}

fn parse_floats(header: &str, line: &str) -> Result<Vec<f64>, ControlFileError> {
    line.split_whitespace().map(|t| parse_float(header, t)).collect()
}

fn parse_rows(header: &str, lines: &[String]) -> Result<Vec<Vec<f64>>, ControlFileError> {
    lines.iter().map(|line| parse_floats(header, line)).collect()
}

fn parse_single_row(header: &str, lines: &[String]) -> Result<Vec<f64>, ControlFileError> {
    match lines {
        [line] => parse_floats(header, line),
        _ => Err(ControlFileError::Malformed(format!(
            "{header} expects exactly one line of per-species values, found {}",
            lines.len()
        ))),
    }
}

fn parse_restriction(header: &str, tokens: &str) -> Result<Option<RestrictedInsertion>, ControlFileError> {
    let mut tokens = tokens.split_whitespace();
    let kind = tokens
        .next()
        .ok_or_else(|| ControlFileError::Malformed(format!("{header}: restricted insertion has no type")))?;
    if kind == UNRESTRICTED {
        return match tokens.next() {
            None => Ok(None),
            Some(extra) => Err(ControlFileError::Malformed(format!(
                "{header}: unexpected value '{extra}' after '{UNRESTRICTED}'"
            ))),
        };
    }
    let values = tokens
        .map(|t| parse_float(header, t).map(Quantity::angstrom))
        .collect::<Result<Vec<_>, _>>()?;
    RestrictedInsertion::from_parts(kind, &values)
        .map(Some)
        .map_err(|e| ControlFileError::Malformed(format!("{header}: {e}")))
}

/// Regroups the positional restriction lines into `[box][species]` rows.
fn restriction_grid(
    header: &str,
    slots: Vec<Option<RestrictedInsertion>>,
    n_species: usize,
) -> Result<RestrictionGrid, ControlFileError> {
    if slots.is_empty() {
        return Ok(Vec::new());
    }
    if n_species == 0 || slots.len() % n_species != 0 {
        return Err(ControlFileError::Malformed(format!(
            "{header}: {} restricted insertion lines do not cover {n_species} species per box",
            slots.len()
        )));
    }
    Ok(slots.chunks(n_species).map(<[_]>::to_vec).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::species::Species;
    use crate::core::moves::ensemble::Ensemble;

    fn rendered(block: &MoveBlock) -> String {
        block.to_string()
    }

    #[test]
    fn move_kind_parses_keywords_and_rejects_others() {
        assert_eq!("dihed".parse::<MoveKind>().unwrap(), MoveKind::Dihedral);
        let err = "dihedral".parse::<MoveKind>().unwrap_err();
        match err {
            ControlFileError::InvalidMoveKey { key, supported } => {
                assert_eq!(key, "dihedral");
                assert_eq!(supported, "translate, rotate, angle, dihed, regrow, volume, insert, swap");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn render_writes_translation_and_rotation_rows_with_trailing_spaces() {
        let mut block = MoveBlock::new();
        block
            .push(MoveEntry::Translate {
                probability: 0.33,
                max_displacement: vec![vec![2.0]],
            })
            .unwrap();
        block
            .push(MoveEntry::Rotate {
                probability: 0.33,
                max_rotation: vec![vec![30.0, 15.0]],
            })
            .unwrap();
        let text = rendered(&block);
        assert!(text.starts_with("# Move_Probability_Info\n\n# Prob_Translation\n0.33\n2.0 \n!"));
        assert!(text.contains("# Prob_Rotation\n0.33\n30.0 15.0 \n"));
        assert!(text.ends_with(&format!("# Done_Probability_Info\n{SEPARATOR}\n\n")));
    }

    #[test]
    fn render_writes_volume_values_one_per_line() {
        let mut block = MoveBlock::new();
        block
            .push(MoveEntry::Volume {
                probability: 0.005,
                max_change: vec![500.0, 5000.0],
            })
            .unwrap();
        assert!(rendered(&block).contains("# Prob_Volume\n0.005\n500.0\n5000.0\n"));
    }

    #[test]
    fn render_follows_insertion_with_mirrored_deletion() {
        let mut block = MoveBlock::new();
        block
            .push(MoveEntry::Insert {
                probability: 0.1,
                insertable: vec![false, true],
                restrictions: vec![vec![None, Some(RestrictedInsertion::Sphere { radius: 10.0 })]],
            })
            .unwrap();
        let text = rendered(&block);
        assert!(text.contains(
            "# Prob_Insertion\n0.1\nnone cbmc \nrestricted_insertion none\nrestricted_insertion sphere 10.0\n!"
        ));
        assert!(text.contains("# Prob_Deletion\n0.1\n"));
    }

    #[test]
    fn render_writes_swap_weights() {
        let mut block = MoveBlock::new();
        block
            .push(MoveEntry::Swap {
                probability: 0.1,
                insertable: vec![true, true],
                restrictions: Vec::new(),
                species_weights: Some(vec![0.5, 0.5]),
                from_box_weights: Some(vec![0.5, 0.5]),
            })
            .unwrap();
        assert!(rendered(&block).contains(
            "# Prob_Swap\n0.1\ncbmc cbmc \nprob_swap_species 0.5 0.5 \nprob_swap_from_box 0.5 0.5 \n"
        ));
    }

    #[test]
    fn render_writes_interface_restriction_with_both_bounds() {
        let mut block = MoveBlock::new();
        block
            .push(MoveEntry::Insert {
                probability: 0.2,
                insertable: vec![true],
                restrictions: vec![vec![Some(RestrictedInsertion::Interface { z_min: 10.0, z_max: 20.0 })]],
            })
            .unwrap();
        assert!(rendered(&block).contains("\nrestricted_insertion interface 10.0 20.0\n"));
    }

    #[test]
    fn restriction_lines_keep_species_position() {
        let sphere = Some(RestrictedInsertion::Sphere { radius: 5.0 });
        let first_only = MoveEntry::Insert {
            probability: 0.1,
            insertable: vec![true, true],
            restrictions: vec![vec![sphere, None]],
        };
        let second_only = MoveEntry::Insert {
            probability: 0.1,
            insertable: vec![true, true],
            restrictions: vec![vec![None, sphere]],
        };
        let render = |entry: MoveEntry| {
            let mut block = MoveBlock::new();
            block.push(entry).unwrap();
            block.to_string()
        };

        let first_text = render(first_only.clone());
        let second_text = render(second_only.clone());
        assert_ne!(first_text, second_text);
        assert!(first_text.contains("cbmc cbmc \nrestricted_insertion sphere 5.0\nrestricted_insertion none\n!"));
        assert!(second_text.contains("cbmc cbmc \nrestricted_insertion none\nrestricted_insertion sphere 5.0\n!"));

        assert_eq!(MoveBlock::parse(&first_text).unwrap().entries(), &[first_only]);
        assert_eq!(MoveBlock::parse(&second_text).unwrap().entries(), &[second_only]);
    }

    #[test]
    fn swap_restrictions_are_written_per_box() {
        let mut block = MoveBlock::new();
        block
            .push(MoveEntry::Swap {
                probability: 0.1,
                insertable: vec![true, true],
                restrictions: vec![
                    vec![None, None],
                    vec![None, Some(RestrictedInsertion::Cylinder { radius: 4.0 })],
                ],
                species_weights: None,
                from_box_weights: None,
            })
            .unwrap();
        let text = block.to_string();
        assert!(text.contains(
            "cbmc cbmc \nrestricted_insertion none\nrestricted_insertion none\nrestricted_insertion none\nrestricted_insertion cylinder 4.0\n"
        ));
        assert_eq!(MoveBlock::parse(&text).unwrap(), block);
    }

    #[test]
    fn parse_rejects_restriction_lines_not_matching_species_count() {
        let text = format!(
            "# Move_Probability_Info\n# Prob_Insertion\n0.1\ncbmc cbmc \nrestricted_insertion sphere 5.0\n{SEPARATOR}\n# Done_Probability_Info\n"
        );
        assert!(matches!(MoveBlock::parse(&text), Err(ControlFileError::Malformed(_))));
    }

    #[test]
    fn push_rejects_duplicate_move_class() {
        let mut block = MoveBlock::new();
        block.push(MoveEntry::Angle { probability: 0.1 }).unwrap();
        assert!(matches!(
            block.push(MoveEntry::Angle { probability: 0.2 }),
            Err(ControlFileError::Malformed(_))
        ));
    }

    #[test]
    fn from_moveset_skips_zero_probability_classes() {
        let species = [Species::new("methane", 1, 0)];
        let moves = MoveSet::new(Ensemble::Nvt, &species).unwrap();
        let block = MoveBlock::from_moveset(&moves);

        assert_eq!(block.kinds(), vec![MoveKind::Translate]);
        assert!(block.get("volume").unwrap().is_none());
        assert!(block.get("translate").unwrap().is_some());
    }

    #[test]
    fn from_moveset_includes_gemc_swaps_and_volume() {
        let species = [Species::new("methane", 1, 0)];
        let moves = MoveSet::new(Ensemble::Gemc, &species).unwrap();
        let block = MoveBlock::from_moveset(&moves);

        let kinds = block.kinds();
        assert!(kinds.contains(&MoveKind::Volume));
        assert!(kinds.contains(&MoveKind::Swap));
        assert!(!kinds.contains(&MoveKind::Insert));
    }

    #[test]
    fn parse_reads_back_rendered_block() {
        let species = [Species::new("ethane", 8, 7), Species::new("methane", 1, 0)];
        let mut moves = MoveSet::new(Ensemble::Gcmc, &species).unwrap();
        moves
            .add_restricted_insertions(
                &species,
                &[vec![None, Some("sphere")]],
                &[vec![None, Some(vec![Quantity::angstrom(10.0)])]],
            )
            .unwrap();
        let block = MoveBlock::from_moveset(&moves);
        let parsed = MoveBlock::parse(&block.to_string()).unwrap();

        assert_eq!(parsed, block);
        assert_eq!(parsed.to_string(), block.to_string());
    }

    #[test]
    fn parse_ignores_text_around_the_block() {
        let text = format!(
            "# Run_Name\nnvt.out\n{SEPARATOR}\n\n# Move_Probability_Info\n\n# Prob_Angle\n0.5\n{SEPARATOR}\n\n# Done_Probability_Info\n{SEPARATOR}\n\n# Start_Type\n"
        );
        let parsed = MoveBlock::parse(&text).unwrap();
        assert_eq!(parsed.entries(), &[MoveEntry::Angle { probability: 0.5 }]);
    }

    #[test]
    fn parse_rejects_unknown_probability_header() {
        let text = format!(
            "# Move_Probability_Info\n\n# Prob_Teleport\n0.5\n{SEPARATOR}\n\n# Done_Probability_Info\n{SEPARATOR}\n"
        );
        assert!(matches!(
            MoveBlock::parse(&text),
            Err(ControlFileError::InvalidMoveKey { key, .. }) if key == "Prob_Teleport"
        ));
    }

    #[test]
    fn parse_rejects_missing_block_and_unterminated_block() {
        assert!(matches!(
            MoveBlock::parse("# Run_Name\nnvt.out\n"),
            Err(ControlFileError::Malformed(_))
        ));
        assert!(matches!(
            MoveBlock::parse("# Move_Probability_Info\n\n# Prob_Angle\n0.5\n"),
            Err(ControlFileError::Malformed(_))
        ));
    }

    #[test]
    fn parse_rejects_non_numeric_probability() {
        let text = format!(
            "# Move_Probability_Info\n# Prob_Angle\nhigh\n{SEPARATOR}\n# Done_Probability_Info\n"
        );
        assert!(matches!(MoveBlock::parse(&text), Err(ControlFileError::Malformed(_))));
    }
}
