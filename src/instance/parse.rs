//! Text format reader.
//!
//! ```text
//! n wmax
//! profit_1 weight_1
//! ...
//! profit_n weight_n
//! ```
//!
//! Values are whitespace separated. Blank lines are skipped. The line order
//! of the items defines their 1-based index.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::str::FromStr;

use super::types::Instance;
use crate::error::{KnapsackError, Result};

impl Instance {
    /// Parses an instance from a sequence of text lines.
    ///
    /// # Errors
    ///
    /// [`KnapsackError::Format`] if the header or an item line is not two
    /// numbers, if the item count is not a non-negative whole number, or if
    /// the number of item lines differs from the declared count. Negative
    /// values surface as [`KnapsackError::InfeasibleInput`].
    pub fn from_lines<I, S>(lines: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut rows = lines
            .into_iter()
            .enumerate()
            .map(|(i, l)| (i + 1, l))
            .filter(|(_, l)| !l.as_ref().trim().is_empty());

        let (header_line, header) = rows
            .next()
            .ok_or_else(|| KnapsackError::format(1, "missing header line"))?;
        let (count, capacity) = parse_pair(header_line, header.as_ref())?;
        if count < 0.0 || count.fract() != 0.0 {
            return Err(KnapsackError::format(
                header_line,
                format!("item count must be a non-negative integer, got {count}"),
            ));
        }
        let declared = count as usize;

        let mut items = Vec::with_capacity(declared.min(1 << 16));
        let mut last_line = header_line;
        for (line_no, row) in rows {
            if items.len() == declared {
                return Err(KnapsackError::format(
                    line_no,
                    format!("more item lines than the declared count {declared}"),
                ));
            }
            items.push(parse_pair(line_no, row.as_ref())?);
            last_line = line_no;
        }

        if items.len() != declared {
            return Err(KnapsackError::format(
                last_line,
                format!(
                    "declared {declared} items but found {} item lines",
                    items.len()
                ),
            ));
        }

        Instance::new(capacity, items)
    }

    /// Reads an instance from any buffered reader.
    pub fn load<R: BufRead>(reader: R) -> Result<Self> {
        let lines = reader.lines().collect::<std::io::Result<Vec<String>>>()?;
        Self::from_lines(lines)
    }

    /// Reads an instance file.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        Self::load(BufReader::new(file))
    }
}

impl FromStr for Instance {
    type Err = KnapsackError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_lines(s.lines())
    }
}

fn parse_pair(line_no: usize, line: &str) -> Result<(f64, f64)> {
    let mut tokens = line.split_whitespace();
    let (Some(a), Some(b), None) = (tokens.next(), tokens.next(), tokens.next()) else {
        return Err(KnapsackError::format(
            line_no,
            format!("expected two numbers, got {:?}", line.trim()),
        ));
    };
    Ok((parse_number(line_no, a)?, parse_number(line_no, b)?))
}

fn parse_number(line_no: usize, token: &str) -> Result<f64> {
    match token.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(KnapsackError::format(
            line_no,
            format!("{token:?} is not a finite number"),
        )),
    }
}
