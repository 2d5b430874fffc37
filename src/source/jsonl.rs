//! Local JSON Lines source - one record object per line.

use super::RecordSource;
use crate::record::Record;
use anyhow::{Context, Result};
use std::fs::File;
use std::io::{BufRead, BufReader, Lines};
use std::path::{Path, PathBuf};

pub struct JsonlSource {
    path: PathBuf,
    lines: Lines<BufReader<File>>,
    line_no: usize,
}

impl JsonlSource {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file =
            File::open(&path).with_context(|| format!("Failed to open input: {:?}", path))?;

        Ok(Self {
            path,
            lines: BufReader::new(file).lines(),
            line_no: 0,
        })
    }
}

impl Iterator for JsonlSource {
    type Item = Result<Record>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let line = self.lines.next()?;
            self.line_no += 1;

            let line = match line {
                Ok(line) => line,
                Err(e) => {
                    return Some(Err::<Record, _>(e).with_context(|| {
                        format!("Failed to read {:?} at line {}", self.path, self.line_no)
                    }))
                }
            };

            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }

            return Some(serde_json::from_str(trimmed).with_context(|| {
                format!("Invalid record in {:?} at line {}", self.path, self.line_no)
            }));
        }
    }
}

impl RecordSource for JsonlSource {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}
