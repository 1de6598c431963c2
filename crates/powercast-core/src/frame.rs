//! Timestamp-indexed tables of optional floats.
//!
//! A [`Frame`] is the unit of data passed between pipeline stages: an index of
//! naive timestamps (the household dataset records local wall-clock time) and
//! an ordered list of named [`Series`]. Missing readings are `None`.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// The seven numeric quantities recorded by the household meter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Measurement {
    /// Household global minute-averaged active power (kilowatt)
    GlobalActivePower,
    /// Household global minute-averaged reactive power (kilowatt)
    GlobalReactivePower,
    /// Minute-averaged voltage (volt)
    Voltage,
    /// Household global minute-averaged current intensity (ampere)
    GlobalIntensity,
    /// Kitchen sub-metering (watt-hour of active energy)
    SubMetering1,
    /// Laundry room sub-metering (watt-hour of active energy)
    SubMetering2,
    /// Water heater and air conditioner sub-metering (watt-hour of active energy)
    SubMetering3,
}

impl Measurement {
    /// All measurements in dataset column order.
    pub const ALL: [Measurement; 7] = [
        Measurement::GlobalActivePower,
        Measurement::GlobalReactivePower,
        Measurement::Voltage,
        Measurement::GlobalIntensity,
        Measurement::SubMetering1,
        Measurement::SubMetering2,
        Measurement::SubMetering3,
    ];

    /// Returns the column name used in the dataset files.
    pub fn as_str(&self) -> &'static str {
        match self {
            Measurement::GlobalActivePower => "Global_active_power",
            Measurement::GlobalReactivePower => "Global_reactive_power",
            Measurement::Voltage => "Voltage",
            Measurement::GlobalIntensity => "Global_intensity",
            Measurement::SubMetering1 => "Sub_metering_1",
            Measurement::SubMetering2 => "Sub_metering_2",
            Measurement::SubMetering3 => "Sub_metering_3",
        }
    }
}

impl fmt::Display for Measurement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Measurement {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Measurement::ALL
            .into_iter()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| Error::missing_column(s))
    }
}

/// A named column of optional values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Series {
    name: String,
    values: Vec<Option<f64>>,
}

impl Series {
    /// Creates a series from a name and its values.
    pub fn new(name: impl Into<String>, values: Vec<Option<f64>>) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }

    /// Creates a series where every value is present.
    pub fn from_values(name: impl Into<String>, values: impl IntoIterator<Item = f64>) -> Self {
        Self::new(name, values.into_iter().map(Some).collect())
    }

    /// Returns the column name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the values, `None` marking a missing reading.
    pub fn values(&self) -> &[Option<f64>] {
        &self.values
    }

    /// Returns the values mutably.
    pub fn values_mut(&mut self) -> &mut [Option<f64>] {
        &mut self.values
    }

    /// Number of values, missing ones included.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the series holds no values at all.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Number of missing values.
    pub fn missing_count(&self) -> usize {
        self.values.iter().filter(|v| v.is_none()).count()
    }

    /// Iterates over the present values, skipping missing ones.
    pub fn present(&self) -> impl Iterator<Item = f64> + '_ {
        self.values.iter().flatten().copied()
    }
}

/// A timestamp index plus equally long named columns.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    index: Vec<NaiveDateTime>,
    columns: Vec<Series>,
}

impl Frame {
    /// Creates a frame with the given index and no columns.
    pub fn new(index: Vec<NaiveDateTime>) -> Self {
        Self {
            index,
            columns: Vec::new(),
        }
    }

    /// Creates a frame from an index and columns, checking their shape.
    pub fn with_columns(index: Vec<NaiveDateTime>, columns: Vec<Series>) -> Result<Self> {
        let mut frame = Self::new(index);
        for column in columns {
            frame.push_column(column)?;
        }
        Ok(frame)
    }

    /// Returns the timestamp index.
    pub fn index(&self) -> &[NaiveDateTime] {
        &self.index
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// Whether the frame has no rows.
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Number of columns.
    pub fn width(&self) -> usize {
        self.columns.len()
    }

    /// Returns `(rows, columns)`.
    pub fn shape(&self) -> (usize, usize) {
        (self.len(), self.width())
    }

    /// Returns all columns in order.
    pub fn columns(&self) -> &[Series] {
        &self.columns
    }

    /// Returns the column names in order.
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(Series::name).collect()
    }

    /// Whether a column with this name exists.
    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c.name == name)
    }

    /// Looks up a column by name.
    pub fn column(&self, name: &str) -> Result<&Series> {
        self.columns
            .iter()
            .find(|c| c.name == name)
            .ok_or_else(|| Error::missing_column(name))
    }

    /// Looks up a column by name, mutably.
    pub fn column_mut(&mut self, name: &str) -> Result<&mut Series> {
        self.columns
            .iter_mut()
            .find(|c| c.name == name)
            .ok_or_else(|| Error::missing_column(name))
    }

    /// Iterates over the columns mutably.
    pub fn columns_mut(&mut self) -> impl Iterator<Item = &mut Series> {
        self.columns.iter_mut()
    }

    /// Appends a column.
    ///
    /// Fails if its length differs from the index or its name is taken.
    pub fn push_column(&mut self, column: Series) -> Result<()> {
        if column.len() != self.index.len() {
            return Err(Error::validation_field(
                column.name.clone(),
                format!(
                    "column has {} values but the index has {} rows",
                    column.len(),
                    self.index.len()
                ),
            ));
        }
        if self.has_column(&column.name) {
            return Err(Error::validation_field(
                column.name.clone(),
                "duplicate column name",
            ));
        }
        self.columns.push(column);
        Ok(())
    }

    /// Missing-value count for every column, in column order.
    pub fn missing_counts(&self) -> Vec<(String, usize)> {
        self.columns
            .iter()
            .map(|c| (c.name.clone(), c.missing_count()))
            .collect()
    }

    /// Total number of missing cells.
    pub fn total_missing(&self) -> usize {
        self.columns.iter().map(Series::missing_count).sum()
    }

    /// Keeps only the rows whose mask entry is `true`.
    ///
    /// A mask shorter than the frame drops the unmatched tail.
    pub fn filter_rows(&self, mask: &[bool]) -> Frame {
        let keep = |i: usize| mask.get(i).copied().unwrap_or(false);
        let index = self
            .index
            .iter()
            .enumerate()
            .filter(|(i, _)| keep(*i))
            .map(|(_, ts)| *ts)
            .collect();
        let columns = self
            .columns
            .iter()
            .map(|c| Series {
                name: c.name.clone(),
                values: c
                    .values
                    .iter()
                    .enumerate()
                    .filter(|(i, _)| keep(*i))
                    .map(|(_, v)| *v)
                    .collect(),
            })
            .collect();
        Frame { index, columns }
    }

    /// Drops every row that has a missing value in any column.
    pub fn drop_missing_rows(&self) -> Frame {
        let mask: Vec<bool> = (0..self.len())
            .map(|row| self.columns.iter().all(|c| c.values[row].is_some()))
            .collect();
        self.filter_rows(&mask)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn ts(minute: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2007, 1, 1)
            .unwrap()
            .and_hms_opt(0, minute, 0)
            .unwrap()
    }

    fn sample() -> Frame {
        Frame::with_columns(
            vec![ts(0), ts(1), ts(2)],
            vec![
                Series::new("a", vec![Some(1.0), None, Some(3.0)]),
                Series::new("b", vec![Some(4.0), Some(5.0), None]),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_measurement_names_roundtrip() {
        for m in Measurement::ALL {
            assert_eq!(m.as_str().parse::<Measurement>().unwrap(), m);
        }
        assert!("Date".parse::<Measurement>().is_err());
    }

    #[test]
    fn test_push_column_length_mismatch() {
        let mut frame = Frame::new(vec![ts(0), ts(1)]);
        let err = frame
            .push_column(Series::from_values("x", [1.0]))
            .unwrap_err();
        assert!(err.to_string().contains("1 values"));
    }

    #[test]
    fn test_push_column_duplicate_name() {
        let mut frame = sample();
        let err = frame
            .push_column(Series::from_values("a", [0.0, 0.0, 0.0]))
            .unwrap_err();
        assert!(err.to_string().contains("duplicate"));
    }

    #[test]
    fn test_missing_counts() {
        let frame = sample();
        assert_eq!(
            frame.missing_counts(),
            vec![("a".to_string(), 1), ("b".to_string(), 1)]
        );
        assert_eq!(frame.total_missing(), 2);
    }

    #[test]
    fn test_drop_missing_rows_keeps_complete_rows() {
        let frame = sample().drop_missing_rows();
        assert_eq!(frame.shape(), (1, 2));
        assert_eq!(frame.index(), &[ts(0)]);
        assert_eq!(frame.column("b").unwrap().values(), &[Some(4.0)]);
    }

    #[test]
    fn test_column_lookup_missing() {
        let frame = sample();
        assert!(matches!(
            frame.column("zzz"),
            Err(Error::MissingColumn { .. })
        ));
    }

    #[test]
    fn test_series_present_skips_missing() {
        let s = Series::new("x", vec![None, Some(2.0), Some(3.0), None]);
        assert_eq!(s.present().collect::<Vec<_>>(), vec![2.0, 3.0]);
        assert_eq!(s.missing_count(), 2);
    }
}
