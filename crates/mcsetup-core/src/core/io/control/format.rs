use std::fmt;

/// Line that closes every section of a control file.
pub const SEPARATOR: &str =
    "!------------------------------------------------------------------------------";

/// Formats a float the way the engine's reference input files print them:
/// shortest round-trip digits, a trailing `.0` on integral values, and a
/// signed two-digit exponent in scientific notation (`1e-05`, `1e+16`).
pub fn format_float(value: f64) -> String {
    let repr = format!("{value:?}");
    match repr.split_once('e') {
        Some((mantissa, exponent)) => {
            let (sign, digits) = match exponent.strip_prefix('-') {
                Some(digits) => ('-', digits),
                None => ('+', exponent),
            };
            format!("{mantissa}e{sign}{digits:0>2}")
        }
        None => repr,
    }
}

/// Joins tokens with each one followed by a single space, e.g. `"none cbmc "`.
pub fn spaced<I, T>(tokens: I) -> String
where
    I: IntoIterator<Item = T>,
    T: fmt::Display,
{
    tokens.into_iter().map(|t| format!("{t} ")).collect()
}

/// Joins floats with each one followed by a single space.
pub fn spaced_floats(values: &[f64]) -> String {
    spaced(values.iter().map(|&v| format_float(v)))
}

/// A `# Name` header with its body lines, closed by [`SEPARATOR`] and a blank line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    name: String,
    lines: Vec<String>,
}

impl Section {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            lines: Vec::new(),
        }
    }

    pub fn line(mut self, line: impl Into<String>) -> Self {
        self.lines.push(line.into());
        self
    }

    pub fn lines<I, L>(mut self, lines: I) -> Self
    where
        I: IntoIterator<Item = L>,
        L: Into<String>,
    {
        self.lines.extend(lines.into_iter().map(Into::into));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn body(&self) -> &[String] {
        &self.lines
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "# {}", self.name)?;
        for line in &self.lines {
            writeln!(f, "{line}")?;
        }
        writeln!(f, "{SEPARATOR}")?;
        writeln!(f)
    }
}
