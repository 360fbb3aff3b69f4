//! Source table loading and merging
//!
//! Each source CSV is read through polars, its periods are normalised to the
//! configured frequency and its value columns are cast to `f64`. The sources
//! are then joined on period into a [`MacroFrame`].

use crate::config::{DataConfig, SourceConfig};
use crate::error::{InflationError, Result};
use chrono::{Datelike, NaiveDate, NaiveDateTime};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use statrs::statistics::Statistics;
use std::collections::{BTreeSet, HashMap, HashSet};
use std::fs::File;
use std::io::Cursor;
use std::path::Path;
use tracing::{debug, info};

/// Format used for the merged time column
pub const PERIOD_FORMAT: &str = "%Y-%m-%d";

/// How periods present in only some sources are handled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JoinKind {
    /// Keep periods present in every source
    #[default]
    Inner,
    /// Keep the periods of the first source
    Left,
    /// Keep periods present in any source
    Outer,
}

/// Period granularity used to align sources
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    Daily,
    #[default]
    Monthly,
    Quarterly,
    Annual,
}

impl Frequency {
    /// Map a date to the first day of its period
    pub fn normalize(&self, date: NaiveDate) -> NaiveDate {
        let (year, month) = (date.year(), date.month());
        let normalized = match self {
            Frequency::Daily => Some(date),
            Frequency::Monthly => NaiveDate::from_ymd_opt(year, month, 1),
            Frequency::Quarterly => NaiveDate::from_ymd_opt(year, (month - 1) / 3 * 3 + 1, 1),
            Frequency::Annual => NaiveDate::from_ymd_opt(year, 1, 1),
        };
        normalized.unwrap_or(date)
    }
}

/// Parse a period from its textual form
pub fn parse_period(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    if text.len() == 4 && text.chars().all(|c| c.is_ascii_digit()) {
        return text
            .parse::<i32>()
            .ok()
            .and_then(|year| NaiveDate::from_ymd_opt(year, 1, 1));
    }

    for format in ["%Y-%m-%d", "%Y/%m/%d", "%d/%m/%Y", "%d-%m-%Y"] {
        if let Ok(date) = NaiveDate::parse_from_str(text, format) {
            return Some(date);
        }
    }

    for format in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(datetime) = NaiveDateTime::parse_from_str(text, format) {
            return Some(datetime.date());
        }
    }

    // Month-level forms carry no day
    let with_day = [
        (format!("{}-01", text), "%Y-%m-%d"),
        (format!("{}/01", text), "%Y/%m/%d"),
        (format!("01-{}", text), "%d-%b-%Y"),
        (format!("01-{}", text), "%d-%B-%Y"),
        (format!("01 {}", text), "%d %b %Y"),
        (format!("01 {}", text), "%d %B %Y"),
    ];
    with_day
        .iter()
        .find_map(|(candidate, format)| NaiveDate::parse_from_str(candidate, format).ok())
}

/// One source table with normalised periods and numeric value columns
#[derive(Debug, Clone, PartialEq)]
pub struct SourceTable {
    /// Source label
    pub name: String,
    /// Periods, unique and ascending
    pub periods: Vec<NaiveDate>,
    /// Value columns aligned with `periods`
    pub columns: Vec<(String, Vec<Option<f64>>)>,
}

impl SourceTable {
    /// Build a source table, sorting rows by period and rejecting duplicates
    pub fn new(
        name: &str,
        periods: Vec<NaiveDate>,
        columns: Vec<(String, Vec<Option<f64>>)>,
    ) -> Result<Self> {
        if periods.is_empty() {
            return Err(InflationError::DataLoad(format!(
                "source '{}' is empty",
                name
            )));
        }
        if let Some((column, _)) = columns.iter().find(|(_, v)| v.len() != periods.len()) {
            return Err(InflationError::DataLoad(format!(
                "source '{}': column '{}' length doesn't match the time column",
                name, column
            )));
        }

        let mut order: Vec<usize> = (0..periods.len()).collect();
        order.sort_by_key(|&i| periods[i]);
        if let Some(pair) = order.windows(2).find(|w| periods[w[0]] == periods[w[1]]) {
            return Err(InflationError::DataLoad(format!(
                "source '{}': period {} appears more than once",
                name,
                periods[pair[0]].format(PERIOD_FORMAT)
            )));
        }

        Ok(Self {
            name: name.to_string(),
            periods: order.iter().map(|&i| periods[i]).collect(),
            columns: columns
                .into_iter()
                .map(|(column, values)| (column, order.iter().map(|&i| values[i]).collect()))
                .collect(),
        })
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.periods.len()
    }

    /// Whether the table has no rows
    pub fn is_empty(&self) -> bool {
        self.periods.is_empty()
    }
}

/// Summary statistics for one column
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnSummary {
    pub column: String,
    pub count: usize,
    pub missing: usize,
    pub mean: f64,
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
}

/// Merged dataset indexed by period
#[derive(Debug, Clone)]
pub struct MacroFrame {
    /// Time column (ISO dates) followed by `Float64` value columns
    df: DataFrame,
    /// Name of the time column
    time_column: String,
    /// Parsed periods, ascending
    periods: Vec<NaiveDate>,
}

impl MacroFrame {
    /// Create a frame from periods and value columns
    pub fn from_columns(
        time_column: &str,
        periods: Vec<NaiveDate>,
        columns: Vec<(String, Vec<Option<f64>>)>,
    ) -> Result<Self> {
        let labels: Vec<String> = periods
            .iter()
            .map(|p| p.format(PERIOD_FORMAT).to_string())
            .collect();

        let mut series = Vec::with_capacity(columns.len() + 1);
        series.push(Series::new(time_column, labels));
        for (name, values) in columns {
            if name == time_column {
                return Err(InflationError::DataLoad(format!(
                    "value column '{}' clashes with the time column",
                    name
                )));
            }
            let values: Vec<Option<f64>> = values
                .into_iter()
                .map(|v| v.filter(|x| x.is_finite()))
                .collect();
            series.push(Series::new(&name, values));
        }

        let df = DataFrame::new(series)?;

        Ok(Self {
            df,
            time_column: time_column.to_string(),
            periods,
        })
    }

    /// Get the DataFrame
    pub fn dataframe(&self) -> &DataFrame {
        &self.df
    }

    /// Get the time column name
    pub fn time_column(&self) -> &str {
        &self.time_column
    }

    /// Get the periods
    pub fn periods(&self) -> &[NaiveDate] {
        &self.periods
    }

    /// Number of rows
    pub fn height(&self) -> usize {
        self.df.height()
    }

    /// Check if the frame is empty
    pub fn is_empty(&self) -> bool {
        self.df.height() == 0
    }

    /// Value column names, excluding the time column
    pub fn column_names(&self) -> Vec<String> {
        self.df
            .get_column_names()
            .into_iter()
            .filter(|name| *name != self.time_column)
            .map(|name| name.to_string())
            .collect()
    }

    /// Whether a value column exists
    pub fn has_column(&self, name: &str) -> bool {
        name != self.time_column && self.df.get_column_names().contains(&name)
    }

    /// Values of one column; `None` marks a missing observation
    pub fn column(&self, name: &str) -> Result<Vec<Option<f64>>> {
        if !self.has_column(name) {
            return Err(InflationError::Validation(format!(
                "Column '{}' not found",
                name
            )));
        }
        let col = self.df.column(name)?;
        Ok(col.f64()?.into_iter().collect())
    }

    /// Present values of one column, skipping missing observations
    pub fn column_values(&self, name: &str) -> Result<Vec<f64>> {
        Ok(self.column(name)?.into_iter().flatten().collect())
    }

    /// Add or replace a value column
    pub fn with_column(&self, name: &str, values: Vec<Option<f64>>) -> Result<Self> {
        if name == self.time_column {
            return Err(InflationError::Validation(format!(
                "Cannot overwrite the time column '{}'",
                name
            )));
        }
        let mut df = self.df.clone();
        df.with_column(Series::new(name, values))?;

        Ok(Self {
            df,
            time_column: self.time_column.clone(),
            periods: self.periods.clone(),
        })
    }

    /// Get a slice of the rows from start to end index
    pub fn slice(&self, start: usize, end: Option<usize>) -> Result<Self> {
        let end = end.unwrap_or(self.height()).min(self.height());
        if start > end {
            return Err(InflationError::InvalidParameter(format!(
                "Slice start {} is past end {}",
                start, end
            )));
        }

        Ok(Self {
            df: self.df.slice(start as i64, end - start),
            time_column: self.time_column.clone(),
            periods: self.periods[start..end].to_vec(),
        })
    }

    /// Descriptive statistics of one column
    pub fn describe(&self, name: &str) -> Result<ColumnSummary> {
        let values = self.column_values(name)?;
        let missing = self.height() - values.len();
        if values.is_empty() {
            return Err(InflationError::Validation(format!(
                "Column '{}' has no observations",
                name
            )));
        }

        Ok(ColumnSummary {
            column: name.to_string(),
            count: values.len(),
            missing,
            mean: values.iter().mean(),
            std_dev: if values.len() > 1 { values.iter().std_dev() } else { 0.0 },
            min: values.iter().copied().fold(f64::INFINITY, f64::min),
            max: values.iter().copied().fold(f64::NEG_INFINITY, f64::max),
        })
    }

    /// Write the merged data as CSV
    pub fn write_csv<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let mut file = File::create(path)?;
        let mut df = self.df.clone();
        CsvWriter::new(&mut file).has_header(true).finish(&mut df)?;
        Ok(())
    }

    /// Merged data as CSV bytes
    pub fn to_csv_bytes(&self) -> Result<Vec<u8>> {
        let mut buffer = Vec::new();
        let mut df = self.df.clone();
        CsvWriter::new(&mut buffer).has_header(true).finish(&mut df)?;
        Ok(buffer)
    }
}

/// Data loader for source tables and uploads
#[derive(Debug)]
pub struct DataLoader;

impl DataLoader {
    /// Load and merge every configured source
    pub fn load(config: &DataConfig) -> Result<MacroFrame> {
        let sources = config
            .sources
            .iter()
            .map(|source| Self::load_source(source, config))
            .collect::<Result<Vec<_>>>()?;

        let frame = Self::merge(sources, config.join, &config.time_column)?;
        info!(
            rows = frame.height(),
            columns = frame.column_names().len(),
            join = ?config.join,
            "merged source tables"
        );
        Ok(frame)
    }

    /// Load a single pre-merged CSV file
    pub fn from_csv<P: AsRef<Path>>(
        path: P,
        time_column: Option<&str>,
        frequency: Frequency,
    ) -> Result<MacroFrame> {
        let path = path.as_ref();
        let mut source = SourceConfig::new("merged data", path);
        source.time_column = time_column.map(|c| c.to_string());
        let config = DataConfig {
            frequency,
            time_column: time_column.unwrap_or("period").to_string(),
            ..DataConfig::default()
        };

        let table = Self::load_source(&source, &config)?;
        Self::merge(vec![table], JoinKind::Inner, &config.time_column)
    }

    /// Read a CSV file into a DataFrame
    pub fn read_csv<P: AsRef<Path>>(path: P) -> Result<DataFrame> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| {
            InflationError::DataLoad(format!("cannot open {}: {}", path.display(), e))
        })?;
        CsvReader::new(file)
            .infer_schema(Some(1000))
            .has_header(true)
            .finish()
            .map_err(|e| {
                InflationError::DataLoad(format!("cannot parse {}: {}", path.display(), e))
            })
    }

    /// Read an uploaded CSV file
    pub fn read_upload<P: AsRef<Path>>(path: P) -> Result<DataFrame> {
        let df = Self::read_csv(path)?;
        Self::ensure_rows(df, "uploaded file")
    }

    /// Read an uploaded CSV from memory
    pub fn read_upload_bytes(bytes: &[u8]) -> Result<DataFrame> {
        let df = CsvReader::new(Cursor::new(bytes.to_vec()))
            .infer_schema(Some(1000))
            .has_header(true)
            .finish()
            .map_err(|e| InflationError::DataLoad(format!("cannot parse upload: {}", e)))?;
        Self::ensure_rows(df, "uploaded file")
    }

    fn ensure_rows(df: DataFrame, label: &str) -> Result<DataFrame> {
        if df.height() == 0 {
            return Err(InflationError::DataLoad(format!("{} has no rows", label)));
        }
        Ok(df)
    }

    /// Load one source table
    pub fn load_source(source: &SourceConfig, config: &DataConfig) -> Result<SourceTable> {
        let df = Self::read_csv(&source.path)?;
        if df.height() == 0 {
            return Err(InflationError::DataLoad(format!(
                "source '{}' ({}) is empty",
                source.name,
                source.path.display()
            )));
        }

        let table = Self::table_from_dataframe(&df, source, config)?;
        debug!(
            source = %source.name,
            rows = table.len(),
            columns = table.columns.len(),
            "loaded source table"
        );
        Ok(table)
    }

    /// Convert a DataFrame into a source table
    pub fn table_from_dataframe(
        df: &DataFrame,
        source: &SourceConfig,
        config: &DataConfig,
    ) -> Result<SourceTable> {
        let time_column = match &source.time_column {
            Some(name) => Self::find_column(df, name).ok_or_else(|| {
                InflationError::DataLoad(format!(
                    "source '{}' is missing the time column '{}'",
                    source.name, name
                ))
            })?,
            None => Self::detect_time_column(df).ok_or_else(|| {
                InflationError::DataLoad(format!(
                    "source '{}' has no recognisable time column",
                    source.name
                ))
            })?,
        };

        let periods = Self::parse_periods(df.column(&time_column)?, &source.name)?
            .into_iter()
            .map(|p| config.frequency.normalize(p))
            .collect::<Vec<_>>();

        let selected: Vec<String> = match &source.columns {
            Some(columns) => columns
                .iter()
                .map(|c| {
                    Self::find_column(df, c).ok_or_else(|| {
                        InflationError::DataLoad(format!(
                            "source '{}' is missing column '{}'",
                            source.name, c
                        ))
                    })
                })
                .collect::<Result<_>>()?,
            None => df
                .get_column_names()
                .into_iter()
                .filter(|name| *name != time_column)
                .map(|name| name.to_string())
                .collect(),
        };
        if selected.is_empty() {
            return Err(InflationError::DataLoad(format!(
                "source '{}' has no value columns",
                source.name
            )));
        }

        let mut columns = Vec::with_capacity(selected.len());
        for name in selected {
            let values = Self::numeric_values(df.column(&name)?, &source.name)?;
            let merged_name = source.rename.get(&name).cloned().unwrap_or(name);

            if config.non_negative.contains(&merged_name) {
                if let Some((row, v)) = values
                    .iter()
                    .enumerate()
                    .find_map(|(i, v)| v.filter(|x| *x < 0.0).map(|x| (i, x)))
                {
                    return Err(InflationError::DataLoad(format!(
                        "source '{}': column '{}' has negative value {} at row {}",
                        source.name,
                        merged_name,
                        v,
                        row + 1
                    )));
                }
            }
            columns.push((merged_name, values));
        }

        SourceTable::new(&source.name, periods, columns)
    }

    /// Join source tables on period
    pub fn merge(
        sources: Vec<SourceTable>,
        join: JoinKind,
        time_column: &str,
    ) -> Result<MacroFrame> {
        if sources.is_empty() {
            return Err(InflationError::DataLoad(
                "no data sources configured".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        for source in &sources {
            for (name, _) in &source.columns {
                if name == time_column || !seen.insert(name.clone()) {
                    return Err(InflationError::DataLoad(format!(
                        "column '{}' from source '{}' is already defined; rename it",
                        name, source.name
                    )));
                }
            }
        }

        let periods: Vec<NaiveDate> = match join {
            JoinKind::Inner => {
                let mut common: BTreeSet<NaiveDate> = sources[0].periods.iter().copied().collect();
                for source in &sources[1..] {
                    let other: BTreeSet<NaiveDate> = source.periods.iter().copied().collect();
                    common = common.intersection(&other).copied().collect();
                }
                common.into_iter().collect()
            }
            JoinKind::Left => sources[0].periods.clone(),
            JoinKind::Outer => sources
                .iter()
                .flat_map(|s| s.periods.iter().copied())
                .collect::<BTreeSet<_>>()
                .into_iter()
                .collect(),
        };

        if periods.is_empty() {
            return Err(InflationError::DataLoad(
                "source tables share no common period".to_string(),
            ));
        }

        let mut columns = Vec::new();
        for source in sources {
            let index: HashMap<NaiveDate, usize> = source
                .periods
                .iter()
                .enumerate()
                .map(|(i, p)| (*p, i))
                .collect();

            for (name, values) in source.columns {
                let aligned = periods
                    .iter()
                    .map(|p| index.get(p).and_then(|&i| values[i]))
                    .collect();
                columns.push((name, aligned));
            }
        }

        MacroFrame::from_columns(time_column, periods, columns)
    }

    /// Find a column by exact name, then case-insensitively
    pub(crate) fn find_column(df: &DataFrame, name: &str) -> Option<String> {
        let names = df.get_column_names();
        names
            .iter()
            .find(|n| **n == name)
            .or_else(|| names.iter().find(|n| n.eq_ignore_ascii_case(name)))
            .map(|n| n.to_string())
    }

    /// Detect the time column in a DataFrame
    fn detect_time_column(df: &DataFrame) -> Option<String> {
        let column_names = df.get_column_names();

        // Look for common time column names
        for hint in ["period", "date", "time", "month", "year"] {
            for name in &column_names {
                if name.to_lowercase().contains(hint) {
                    return Some(name.to_string());
                }
            }
        }

        // If not found, use the first column if it looks like a date/time
        df.get_columns()
            .first()
            .filter(|c| c.dtype().is_temporal())
            .map(|c| c.name().to_string())
    }

    /// Parse a time column into dates
    fn parse_periods(col: &Series, source: &str) -> Result<Vec<NaiveDate>> {
        let invalid = |row: usize, value: String| {
            InflationError::DataLoad(format!(
                "source '{}': cannot parse period '{}' at row {}",
                source,
                value,
                row + 1
            ))
        };
        let epoch = NaiveDate::from_ymd_opt(1970, 1, 1)
            .ok_or_else(|| InflationError::DataLoad("invalid epoch".to_string()))?;

        match col.dtype() {
            DataType::Utf8 => col
                .utf8()?
                .into_iter()
                .enumerate()
                .map(|(i, v)| {
                    let text = v.unwrap_or("");
                    parse_period(text).ok_or_else(|| invalid(i, text.to_string()))
                })
                .collect(),
            DataType::Date => col
                .date()?
                .into_iter()
                .enumerate()
                .map(|(i, v)| {
                    v.and_then(|days| epoch.checked_add_signed(chrono::Duration::days(days as i64)))
                        .ok_or_else(|| invalid(i, format!("{:?}", v)))
                })
                .collect(),
            DataType::Datetime(unit, _) => {
                let per_day: i64 = match unit {
                    TimeUnit::Nanoseconds => 86_400_000_000_000,
                    TimeUnit::Microseconds => 86_400_000_000,
                    TimeUnit::Milliseconds => 86_400_000,
                };
                col.datetime()?
                    .into_iter()
                    .enumerate()
                    .map(|(i, v)| {
                        v.and_then(|ts| {
                            epoch.checked_add_signed(chrono::Duration::days(ts.div_euclid(per_day)))
                        })
                        .ok_or_else(|| invalid(i, format!("{:?}", v)))
                    })
                    .collect()
            }
            dtype if dtype.is_integer() => col
                .cast(&DataType::Int64)?
                .i64()?
                .into_iter()
                .enumerate()
                .map(|(i, v)| {
                    v.filter(|year| (1000..=9999).contains(year))
                        .and_then(|year| NaiveDate::from_ymd_opt(year as i32, 1, 1))
                        .ok_or_else(|| invalid(i, format!("{:?}", v)))
                })
                .collect(),
            dtype => Err(InflationError::DataLoad(format!(
                "source '{}': time column '{}' has unsupported type {}",
                source,
                col.name(),
                dtype
            ))),
        }
    }

    /// Convert a column to `f64` values; empty cells and NaN become `None`
    pub(crate) fn numeric_values(col: &Series, source: &str) -> Result<Vec<Option<f64>>> {
        let values: Vec<Option<f64>> = match col.dtype() {
            DataType::Utf8 => col
                .utf8()?
                .into_iter()
                .enumerate()
                .map(|(i, v)| match v.map(|s| s.trim().replace(',', "")) {
                    None => Ok(None),
                    Some(s) if s.is_empty() || s.eq_ignore_ascii_case("nan") => Ok(None),
                    Some(s) => s.parse::<f64>().map(Some).map_err(|_| {
                        InflationError::DataLoad(format!(
                            "{}: non-numeric value '{}' in column '{}' at row {}",
                            source,
                            s,
                            col.name(),
                            i + 1
                        ))
                    }),
                })
                .collect::<Result<_>>()?,
            dtype if dtype.is_numeric() => col
                .cast(&DataType::Float64)?
                .f64()?
                .into_iter()
                .collect(),
            dtype => {
                return Err(InflationError::DataLoad(format!(
                    "{}: column '{}' has non-numeric type {}",
                    source,
                    col.name(),
                    dtype
                )))
            }
        };

        Ok(values
            .into_iter()
            .map(|v| v.filter(|x| x.is_finite()))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn parses_common_period_forms() {
        assert_eq!(parse_period("2020-03-31"), Some(date(2020, 3, 31)));
        assert_eq!(parse_period("2020/03/31"), Some(date(2020, 3, 31)));
        assert_eq!(parse_period("31/03/2020"), Some(date(2020, 3, 31)));
        assert_eq!(parse_period("2020-03-31 00:00:00"), Some(date(2020, 3, 31)));
        assert_eq!(parse_period("2020-03"), Some(date(2020, 3, 1)));
        assert_eq!(parse_period("Mar-2020"), Some(date(2020, 3, 1)));
        assert_eq!(parse_period("March 2020"), Some(date(2020, 3, 1)));
        assert_eq!(parse_period("2020"), Some(date(2020, 1, 1)));
        assert_eq!(parse_period("not a date"), None);
        assert_eq!(parse_period(""), None);
    }

    #[test]
    fn normalizes_to_frequency() {
        let d = date(2021, 8, 17);
        assert_eq!(Frequency::Daily.normalize(d), d);
        assert_eq!(Frequency::Monthly.normalize(d), date(2021, 8, 1));
        assert_eq!(Frequency::Quarterly.normalize(d), date(2021, 7, 1));
        assert_eq!(Frequency::Annual.normalize(d), date(2021, 1, 1));
    }

    #[test]
    fn source_table_sorts_and_rejects_duplicates() {
        let table = SourceTable::new(
            "t",
            vec![date(2020, 2, 1), date(2020, 1, 1)],
            vec![("x".to_string(), vec![Some(2.0), Some(1.0)])],
        )
        .unwrap();
        assert_eq!(table.periods, vec![date(2020, 1, 1), date(2020, 2, 1)]);
        assert_eq!(table.columns[0].1, vec![Some(1.0), Some(2.0)]);

        let duplicate = SourceTable::new(
            "t",
            vec![date(2020, 1, 1), date(2020, 1, 1)],
            vec![("x".to_string(), vec![Some(2.0), Some(1.0)])],
        );
        assert!(matches!(duplicate, Err(InflationError::DataLoad(_))));
    }

    #[test]
    fn frame_column_access() {
        let frame = MacroFrame::from_columns(
            "period",
            vec![date(2020, 1, 1), date(2020, 2, 1), date(2020, 3, 1)],
            vec![("cpi".to_string(), vec![Some(1.0), None, Some(f64::NAN)])],
        )
        .unwrap();

        assert_eq!(frame.height(), 3);
        assert_eq!(frame.column_names(), vec!["cpi".to_string()]);
        assert_eq!(frame.column("cpi").unwrap(), vec![Some(1.0), None, None]);
        assert!(frame.column("period").is_err());
        assert!(frame.column("missing").is_err());

        let sliced = frame.slice(1, None).unwrap();
        assert_eq!(sliced.height(), 2);
        assert_eq!(sliced.periods()[0], date(2020, 2, 1));
    }
}
