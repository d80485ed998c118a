//! Labelled text tables
//!
//! Loads a headed CSV (or TSV, by extension) with one text column, one 0/1
//! label column and an optional column used to split train and test rows.

use crate::core::{validate_labels, NBSVMError, Result};
use ::csv::{ReaderBuilder, StringRecord};
use log::debug;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// Raw documents with their labels, in file order
#[derive(Debug, Clone, PartialEq)]
pub struct TextTable {
    pub texts: Vec<String>,
    pub labels: Vec<u8>,
    /// Values of the split column, when one was requested
    pub groups: Option<Vec<String>>,
}

impl TextTable {
    /// Read `path`; a `.tsv` extension switches the delimiter to tab
    pub fn from_path<P: AsRef<Path>>(
        path: P,
        text_column: &str,
        label_column: &str,
        split_column: Option<&str>,
    ) -> Result<Self> {
        let path = path.as_ref();
        let is_tsv = path.extension().map(|e| e == "tsv").unwrap_or(false);
        let delimiter = if is_tsv { b'\t' } else { b',' };

        let file = File::open(path).map_err(NBSVMError::IoError)?;
        Self::from_reader(
            BufReader::new(file),
            delimiter,
            text_column,
            label_column,
            split_column,
        )
    }

    pub fn from_reader<R: Read>(
        reader: R,
        delimiter: u8,
        text_column: &str,
        label_column: &str,
        split_column: Option<&str>,
    ) -> Result<Self> {
        let mut rdr = ReaderBuilder::new()
            .delimiter(delimiter)
            .has_headers(true)
            .from_reader(reader);

        let headers = rdr.headers()?.clone();
        let text_idx = column_index(&headers, text_column)?;
        let label_idx = column_index(&headers, label_column)?;
        let split_idx = split_column
            .map(|name| column_index(&headers, name))
            .transpose()?;

        let mut texts = Vec::new();
        let mut labels = Vec::new();
        let mut groups = split_idx.map(|_| Vec::new());

        for (row, result) in rdr.records().enumerate() {
            let record = result?;
            texts.push(record.get(text_idx).unwrap_or("").to_string());
            labels.push(parse_label(record.get(label_idx).unwrap_or(""), row + 1)?);
            if let (Some(idx), Some(groups)) = (split_idx, groups.as_mut()) {
                groups.push(record.get(idx).unwrap_or("").to_string());
            }
        }

        if texts.is_empty() {
            return Err(NBSVMError::EmptyDataset);
        }
        validate_labels(&labels)?;
        debug!(
            "Loaded {} documents from columns {:?} / {:?}",
            texts.len(),
            text_column,
            label_column
        );

        Ok(Self {
            texts,
            labels,
            groups,
        })
    }

    pub fn len(&self) -> usize {
        self.texts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.texts.is_empty()
    }
}

fn column_index(headers: &StringRecord, name: &str) -> Result<usize> {
    headers
        .iter()
        .position(|h| h == name)
        .ok_or_else(|| NBSVMError::InvalidDataset(format!("column {name:?} not found")))
}

fn parse_label(raw: &str, row: usize) -> Result<u8> {
    let value = raw.trim().parse::<f64>().map_err(|_| {
        NBSVMError::ParseError(format!("row {row}: label {raw:?} is not a number"))
    })?;
    if value == 0.0 {
        Ok(0)
    } else if value == 1.0 {
        Ok(1)
    } else {
        Err(NBSVMError::InvalidLabel(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::Builder;

    const REVIEWS: &str = "text,sentiment,year\n\
        \"great movie, loved it\",1,2019\n\
        awful plot,0,2019\n\
        fine acting,1,2020\n";

    #[test]
    fn test_from_reader() {
        let table =
            TextTable::from_reader(REVIEWS.as_bytes(), b',', "text", "sentiment", None).unwrap();
        assert_eq!(table.len(), 3);
        assert_eq!(table.texts[0], "great movie, loved it");
        assert_eq!(table.labels, vec![1, 0, 1]);
        assert_eq!(table.groups, None);
    }

    #[test]
    fn test_split_column_is_kept_as_strings() {
        let table =
            TextTable::from_reader(REVIEWS.as_bytes(), b',', "text", "sentiment", Some("year"))
                .unwrap();
        assert_eq!(
            table.groups.unwrap(),
            vec!["2019".to_string(), "2019".to_string(), "2020".to_string()]
        );
    }

    #[test]
    fn test_missing_column() {
        let result = TextTable::from_reader(REVIEWS.as_bytes(), b',', "review", "sentiment", None);
        assert!(matches!(result, Err(NBSVMError::InvalidDataset(_))));

        let result =
            TextTable::from_reader(REVIEWS.as_bytes(), b',', "text", "sentiment", Some("split"));
        assert!(matches!(result, Err(NBSVMError::InvalidDataset(_))));
    }

    #[test]
    fn test_bad_labels() {
        let data = "text,label\nhello there,2\n";
        assert!(matches!(
            TextTable::from_reader(data.as_bytes(), b',', "text", "label", None),
            Err(NBSVMError::InvalidLabel(l)) if l == 2.0
        ));

        let data = "text,label\nhello there,pos\n";
        assert!(matches!(
            TextTable::from_reader(data.as_bytes(), b',', "text", "label", None),
            Err(NBSVMError::ParseError(_))
        ));

        // float-formatted labels are accepted
        let data = "text,label\nhello there,1.0\nbye now,0.0\n";
        let table = TextTable::from_reader(data.as_bytes(), b',', "text", "label", None).unwrap();
        assert_eq!(table.labels, vec![1, 0]);
    }

    #[test]
    fn test_header_only_is_empty() {
        let data = "text,label\n";
        assert!(matches!(
            TextTable::from_reader(data.as_bytes(), b',', "text", "label", None),
            Err(NBSVMError::EmptyDataset)
        ));
    }

    #[test]
    fn test_from_path_tsv() {
        let mut file = Builder::new().suffix(".tsv").tempfile().unwrap();
        write!(file, "text\tlabel\ngood stuff\t1\nbad stuff\t0\n").unwrap();
        file.flush().unwrap();

        let table = TextTable::from_path(file.path(), "text", "label", None).unwrap();
        assert_eq!(table.texts, vec!["good stuff", "bad stuff"]);
        assert_eq!(table.labels, vec![1, 0]);
    }
}
