//! Example datasets.
//!
//! Two tables are known by name:
//!
//! - `Salaries`: nine-month academic salaries for faculty members (rank,
//!   discipline, years since PhD, years of service, sex, salary), as
//!   distributed in the R `carData` package.
//! - `gapminder`: life expectancy, population and GDP per capita by country,
//!   every five years from 1952 to 2007, as in the R `gapminder` package.
//!
//! The crate bundles synthetic offline samples of both: the same columns,
//! factor levels and marginal counts, with made-up values. They keep tests and
//! demos self-contained but are not the published data. Point a
//! [`Source::Dir`] at `Salaries.csv` and `gapminder.csv` exported from the R
//! packages to work with the real tables.

use std::path::{Path, PathBuf};

use crate::data::DataFrame;
use crate::error::{Error, Result};

const SALARIES_CSV: &str = include_str!("../data/salaries.csv");
const GAPMINDER_CSV: &str = include_str!("../data/gapminder.csv");

/// Registry entry for a bundled dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DatasetInfo {
    /// Identifier accepted by [`load`].
    pub name: &'static str,
    /// R package that publishes the real table.
    pub package: &'static str,
    /// One-line description.
    pub description: &'static str,
}

const REGISTRY: [DatasetInfo; 2] = [
    DatasetInfo {
        name: "Salaries",
        package: "carData",
        description: "Salaries for professors (rank, discipline, experience, sex); bundled copy is a synthetic sample",
    },
    DatasetInfo {
        name: "gapminder",
        package: "gapminder",
        description: "Life expectancy, population and GDP per capita by country and year; bundled copy is a synthetic sample",
    },
];

/// All bundled datasets.
#[must_use]
pub fn available() -> &'static [DatasetInfo] {
    &REGISTRY
}

/// Where named datasets are read from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Source {
    /// Synthetic samples compiled into the crate.
    #[default]
    Bundled,
    /// `<dir>/<name>.csv`, e.g. `Salaries.csv` written by R's `write.csv`.
    Dir(PathBuf),
}

impl Source {
    /// Directory source when `dir` is set, bundled samples otherwise.
    #[must_use]
    pub fn from_dir(dir: Option<&Path>) -> Self {
        dir.map_or(Source::Bundled, |d| Source::Dir(d.to_path_buf()))
    }

    /// Load a dataset by name (case-insensitive). Factor levels are put in
    /// their canonical order whichever source the rows come from.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownDataset`] for unregistered names, and I/O or
    /// CSV errors when a directory file is missing or malformed.
    pub fn load(&self, name: &str) -> Result<DataFrame> {
        let info = lookup(name)?;
        let raw = match self {
            Source::Bundled => DataFrame::from_csv_str(bundled_csv(info.name))?,
            Source::Dir(dir) => DataFrame::from_csv_path(dir.join(format!("{}.csv", info.name)))?,
        };
        let frame = canonical_levels(info.name, raw)?;
        log::debug!(
            "loaded dataset {} from {self:?}: {} rows x {} columns",
            info.name,
            frame.nrow(),
            frame.ncol()
        );
        Ok(frame)
    }
}

/// Load a bundled dataset by name (case-insensitive).
///
/// # Errors
///
/// Returns [`Error::UnknownDataset`] for unregistered names.
pub fn load(name: &str) -> Result<DataFrame> {
    Source::Bundled.load(name)
}

fn lookup(name: &str) -> Result<&'static DatasetInfo> {
    REGISTRY.iter().find(|d| d.name.eq_ignore_ascii_case(name)).ok_or_else(|| {
        Error::UnknownDataset {
            name: name.to_string(),
            available: REGISTRY.iter().map(|d| d.name).collect::<Vec<_>>().join(", "),
        }
    })
}

/// Load a user-supplied CSV file.
pub fn load_csv(path: impl AsRef<Path>) -> Result<DataFrame> {
    let path = path.as_ref();
    let frame = DataFrame::from_csv_path(path)?;
    log::debug!("loaded {}: {} rows x {} columns", path.display(), frame.nrow(), frame.ncol());
    Ok(frame)
}

fn bundled_csv(name: &str) -> &'static str {
    if name == "Salaries" {
        SALARIES_CSV
    } else {
        GAPMINDER_CSV
    }
}

fn canonical_levels(name: &str, frame: DataFrame) -> Result<DataFrame> {
    if name == "Salaries" {
        frame
            .relevel("rank", &["AsstProf", "AssocProf", "Prof"])?
            .relevel("discipline", &["A", "B"])?
            .relevel("sex", &["Female", "Male"])
    } else {
        frame.relevel("continent", &["Africa", "Americas", "Asia", "Europe", "Oceania"])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_salaries_shape() {
        let df = load("Salaries").unwrap();
        assert_eq!(df.nrow(), 397);
        assert_eq!(
            df.column_names(),
            vec!["rank", "discipline", "yrs.since.phd", "yrs.service", "sex", "salary"]
        );
    }

    #[test]
    fn test_salaries_factor_order() {
        let df = load("salaries").unwrap();
        assert_eq!(df.factor("rank").unwrap().levels(), &["AsstProf", "AssocProf", "Prof"]);
        assert_eq!(df.factor("sex").unwrap().levels(), &["Female", "Male"]);
        assert_eq!(df.factor("discipline").unwrap().levels(), &["A", "B"]);
    }

    #[test]
    fn test_salaries_marginal_counts() {
        let df = load("Salaries").unwrap();
        let count = |col: &str, level: &str| df.filter_eq(col, level).unwrap().nrow();
        assert_eq!(count("rank", "AsstProf"), 67);
        assert_eq!(count("rank", "AssocProf"), 64);
        assert_eq!(count("rank", "Prof"), 266);
        assert_eq!(count("sex", "Female"), 39);
        assert_eq!(count("discipline", "B"), 216);
    }

    #[test]
    fn test_gapminder_shape() {
        let df = load("gapminder").unwrap();
        assert_eq!(df.nrow() % 12, 0);
        assert_eq!(df.distinct_levels("continent").unwrap().len(), 5);
        let years = df.numeric("year").unwrap();
        assert!(years.iter().all(|&y| (1952.0..=2007.0).contains(&y)));
    }

    #[test]
    fn test_unknown_dataset() {
        let err = load("mtcars").unwrap_err();
        assert!(matches!(err, Error::UnknownDataset { .. }));
        assert!(err.to_string().contains("gapminder"));
    }

    #[test]
    fn test_available() {
        let names: Vec<_> = available().iter().map(|d| d.name).collect();
        assert_eq!(names, vec!["Salaries", "gapminder"]);
        assert!(available().iter().all(|d| d.description.contains("synthetic")));
    }

    #[test]
    fn test_dir_source_reads_exported_csv() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("Salaries.csv"),
            "\"rownames\",\"rank\",\"discipline\",\"yrs.since.phd\",\"yrs.service\",\"sex\",\"salary\"\n\
             \"1\",\"Prof\",\"B\",19,18,\"Male\",139750\n\
             \"2\",\"AsstProf\",\"B\",4,3,\"Male\",79750\n\
             \"3\",\"Prof\",\"A\",18,18,\"Female\",129000\n",
        )
        .unwrap();

        let source = Source::from_dir(Some(dir.path()));
        let df = source.load("salaries").unwrap();
        assert_eq!(df.nrow(), 3);
        assert_eq!(df.numeric("salary").unwrap()[0], 139_750.0);
        // canonical order even though AssocProf never occurs
        assert_eq!(df.factor("rank").unwrap().levels(), &["AsstProf", "AssocProf", "Prof"]);
        assert_eq!(df.factor("sex").unwrap().label(2), "Female");
    }

    #[test]
    fn test_dir_source_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = Source::Dir(dir.path().to_path_buf()).load("gapminder").unwrap_err();
        assert!(matches!(err, Error::Io(_)));
        assert_eq!(Source::from_dir(None), Source::Bundled);
    }
}
