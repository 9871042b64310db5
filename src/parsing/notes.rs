//! Plain text files loaded as report lines.

use std::io::BufRead;

use crate::parsing::{FileFormat, Loaded, ParseError, RecordParser};
use crate::utils::validation::check_record_limit;

pub struct NotesParser;

impl RecordParser for NotesParser {
    fn format(&self) -> FileFormat {
        FileFormat::Text
    }

    fn parse(&self, reader: &mut dyn BufRead) -> Result<Loaded, ParseError> {
        let mut lines = Vec::new();
        for line in reader.lines() {
            if check_record_limit(lines.len()).is_some() {
                return Err(ParseError::TooManyRecords(lines.len()));
            }
            lines.push(line?.trim_end().to_string());
        }
        Ok(Loaded::Lines(lines))
    }
}
