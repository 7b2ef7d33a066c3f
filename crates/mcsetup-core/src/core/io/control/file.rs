use super::error::ControlFileError;
use super::format::Section;
use crate::core::io::traits::EngineInputFile;
use std::fmt;
use std::io::{BufRead, Read, Write};

/// Text of a complete control file.
///
/// The text is held verbatim so that files read from disk can be patched and
/// written back without disturbing sections this crate does not interpret.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ControlFile {
    text: String,
}

impl ControlFile {
    pub fn from_sections<'a, I>(sections: I) -> Self
    where
        I: IntoIterator<Item = &'a Section>,
    {
        let text = sections.into_iter().map(Section::to_string).collect();
        Self { text }
    }

    /// Appends pre-rendered text, such as the move-probability block.
    pub fn push_str(&mut self, text: &str) {
        self.text.push_str(text);
    }

    pub fn push_section(&mut self, section: &Section) {
        self.text.push_str(&section.to_string());
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn into_string(self) -> String {
        self.text
    }
}

impl From<String> for ControlFile {
    fn from(text: String) -> Self {
        Self { text }
    }
}

impl fmt::Display for ControlFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl EngineInputFile for ControlFile {
    type Error = ControlFileError;

    fn read_from(reader: &mut impl BufRead) -> Result<Self, Self::Error> {
        let mut text = String::new();
        reader.read_to_string(&mut text)?;
        Ok(Self { text })
    }

    fn write_to(&self, writer: &mut impl Write) -> Result<(), Self::Error> {
        writer.write_all(self.text.as_bytes())?;
        Ok(())
    }
}
