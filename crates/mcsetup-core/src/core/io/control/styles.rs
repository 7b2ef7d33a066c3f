use super::error::ControlFileError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

macro_rules! keyword_enum {
    (
        $(#[$meta:meta])*
        $name:ident, $field:literal {
            $($variant:ident => $keyword:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(rename_all = "snake_case")]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn keyword(self) -> &'static str {
                match self {
                    $($name::$variant => $keyword),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.keyword())
            }
        }

        impl FromStr for $name {
            type Err = ControlFileError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let lowered = s.trim().to_ascii_lowercase();
                Self::ALL
                    .iter()
                    .copied()
                    .find(|v| v.keyword() == lowered)
                    .ok_or_else(|| {
                        let supported: Vec<_> = Self::ALL.iter().map(|v| v.keyword()).collect();
                        ControlFileError::invalid(
                            $field,
                            format!("'{}'. Supported options are: {}", s, supported.join(", ")),
                        )
                    })
            }
        }
    };
}

keyword_enum! {
    /// Van der Waals interaction model.
    VdwStyle, "vdw_style" {
        Lj => "lj",
        None => "none",
    }
}

keyword_enum! {
    /// Treatment of the Lennard-Jones interaction at the cutoff.
    CutoffStyle, "cutoff_style" {
        Cut => "cut",
        CutTail => "cut_tail",
        CutSwitch => "cut_switch",
        CutShift => "cut_shift",
    }
}

keyword_enum! {
    /// Electrostatics model.
    ChargeStyle, "charge_style" {
        Ewald => "ewald",
        Cut => "cut",
        Dsf => "dsf",
        None => "none",
    }
}

keyword_enum! {
    /// Rule combining per-atom Lennard-Jones parameters into pair parameters.
    MixingRule, "mixing_rule" {
        Lb => "lb",
        Geometric => "geometric",
        Custom => "custom",
    }
}

keyword_enum! {
    RunType, "run type" {
        Equilibration => "equilibration",
        Production => "production",
    }
}

keyword_enum! {
    /// Unit in which run length and output frequencies are counted.
    LengthUnits, "units" {
        Steps => "steps",
        Sweeps => "sweeps",
        Minutes => "minutes",
    }
}

impl CutoffStyle {
    /// Number of cutoff distances the style takes per box.
    pub fn n_cutoffs(self) -> usize {
        match self {
            Self::CutSwitch => 2,
            _ => 1,
        }
    }
}
