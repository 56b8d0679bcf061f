use crate::prelude::{Date, Observation, ParsingError};
use log::{debug, trace};
use strum_macros::{Display, EnumString};

use std::{
    io::{BufRead, BufReader, Read},
    str::FromStr,
};

/// Known [Column]s of a PSA results table.
/// Header labels are matched case insensitively and
/// possible units, like "PSA (ng/mL)", are ignored.
#[derive(Debug, Copy, Clone, PartialEq, EnumString, Display)]
#[strum(ascii_case_insensitive)]
pub enum Column {
    /// Sampling date
    #[strum(to_string = "Date", serialize = "Day")]
    Date,
    /// Measured value
    #[strum(to_string = "PSA", serialize = "Value", serialize = "Result")]
    Value,
    /// Recording source
    #[strum(to_string = "Physician", serialize = "Doctor", serialize = "Source")]
    Source,
}

impl Column {
    fn from_label(label: &str) -> Option<Self> {
        let label = match label.find('(') {
            Some(offset) => &label[..offset],
            None => label,
        };
        Self::from_str(label.trim()).ok()
    }
}

/// Column indexes resolved from the header line
#[derive(Debug, Copy, Clone)]
struct Layout {
    delimiter: char,
    date: usize,
    value: usize,
    source: Option<usize>,
}

impl Layout {
    fn parse(header: &str) -> Result<Self, ParsingError> {
        let delimiter = if header.contains(';') {
            ';'
        } else if header.contains('\t') {
            '\t'
        } else {
            ','
        };

        let (mut date, mut value, mut source) = (None, None, None);

        for (index, label) in split_fields(header, delimiter).iter().enumerate() {
            match Column::from_label(label) {
                Some(Column::Date) if date.is_none() => date = Some(index),
                Some(Column::Value) if value.is_none() => value = Some(index),
                Some(Column::Source) if source.is_none() => source = Some(index),
                _ => trace!("ignored column \"{}\"", label),
            }
        }

        Ok(Self {
            delimiter,
            date: date.ok_or(ParsingError::MissingDateColumn)?,
            value: value.ok_or(ParsingError::MissingValueColumn)?,
            source,
        })
    }

    fn min_fields(&self) -> usize {
        self.date.max(self.value) + 1
    }
}

/// Splits a delimited line, honoring double quoted fields.
fn split_fields(line: &str, delimiter: char) -> Vec<String> {
    let mut fields = Vec::with_capacity(4);
    let mut field = String::with_capacity(16);
    let mut quoted = false;

    for c in line.chars() {
        if c == '"' {
            quoted = !quoted;
        } else if c == delimiter && !quoted {
            fields.push(field.trim().to_string());
            field.clear();
        } else {
            field.push(c);
        }
    }

    fields.push(field.trim().to_string());
    fields
}

/// Parses a value cell: blank and not-a-number markers are missing values.
fn parse_value(content: &str, line: usize) -> Result<Option<f64>, ParsingError> {
    match content {
        "" | "-" | "NA" | "N/A" | "na" | "n/a" => return Ok(None),
        _ => {},
    }

    let value = content.parse::<f64>().or(Err(ParsingError::BadValue {
        line,
        content: content.to_string(),
    }))?;

    if value.is_nan() {
        Ok(None)
    } else if value.is_infinite() {
        Err(ParsingError::BadValue {
            line,
            content: content.to_string(),
        })
    } else if value < 0.0 {
        Err(ParsingError::NegativeValue { line, value })
    } else {
        Ok(Some(value))
    }
}

/// Parses all [Observation]s from a delimited text input.
/// The first meaningful line is the header. Blank lines
/// and lines starting with '#' are skipped.
pub(crate) fn parse_observations<R: Read>(
    reader: &mut BufReader<R>,
    default_source: &str,
) -> Result<Vec<Observation>, ParsingError> {
    let mut layout: Option<Layout> = None;
    let mut observations = Vec::with_capacity(32);

    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        let line_number = index + 1;

        // spreadsheet exports may start with a byte order mark
        let line = if index == 0 {
            line.trim_start_matches('\u{feff}').to_string()
        } else {
            line
        };

        let content = line.trim();
        if content.is_empty() || content.starts_with('#') {
            continue;
        }

        let layout = match layout {
            Some(layout) => layout,
            None => {
                let parsed = Layout::parse(content)?;
                debug!("{:?}", parsed);
                layout = Some(parsed);
                continue;
            },
        };

        let fields = split_fields(&line, layout.delimiter);

        if fields.len() < layout.min_fields() {
            return Err(ParsingError::MissingFields {
                line: line_number,
                expected: layout.min_fields(),
            });
        }

        let date = Date::from_str(&fields[layout.date]).or(Err(ParsingError::BadDate {
            line: line_number,
            content: fields[layout.date].clone(),
        }))?;

        let value = parse_value(&fields[layout.value], line_number)?;

        let source = layout
            .source
            .and_then(|index| fields.get(index))
            .filter(|source| !source.is_empty())
            .map(|source| source.as_str())
            .unwrap_or(default_source);

        observations.push(Observation {
            date,
            value,
            source: source.to_string(),
        });
    }

    if layout.is_none() {
        return Err(ParsingError::EmptyInput);
    }

    debug!("parsed {} observations", observations.len());
    Ok(observations)
}
