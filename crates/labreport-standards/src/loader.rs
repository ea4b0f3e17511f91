use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;

use csv::ReaderBuilder;
use tracing::debug;

use labreport_model::{CanonicalParameterSet, Parameter};

use crate::error::StandardsError;
use crate::paths::parameters_path;

const PARAMETER_COLUMN: &str = "Parameter";
const CATEGORY_COLUMN: &str = "Category";
const ORDER_COLUMN: &str = "Order";

const BUILTIN_ORIGIN: &str = "<builtin>/parameters/Parameters.csv";
const BUILTIN_PARAMETERS: &str = include_str!("../../../standards/parameters/Parameters.csv");

/// The parameter list compiled into the binary.
pub fn builtin_parameter_set() -> Result<CanonicalParameterSet, StandardsError> {
    parse_parameter_set(BUILTIN_PARAMETERS.as_bytes(), Path::new(BUILTIN_ORIGIN))
}

/// Loads the parameter list from the standards directory, falling back to
/// the built-in copy when no file is present there.
pub fn load_default_parameter_set() -> Result<CanonicalParameterSet, StandardsError> {
    let path = parameters_path();
    if path.is_file() {
        return load_parameter_set(&path);
    }
    debug!(path = %path.display(), "standards file not found, using built-in parameters");
    builtin_parameter_set()
}

/// Uses `explicit` when given, otherwise [`load_default_parameter_set`].
pub fn resolve_parameter_set(
    explicit: Option<&Path>,
) -> Result<CanonicalParameterSet, StandardsError> {
    match explicit {
        Some(path) => load_parameter_set(path),
        None => load_default_parameter_set(),
    }
}

pub fn load_parameter_set(path: &Path) -> Result<CanonicalParameterSet, StandardsError> {
    let file = std::fs::File::open(path).map_err(|e| StandardsError::io(path, e))?;
    let set = parse_parameter_set(file, path)?;
    debug!(path = %path.display(), parameters = set.len(), "loaded parameter set");
    Ok(set)
}

/// Parses a `Parameter[,Category][,Order]` CSV.
///
/// When an `Order` column is present rows are sorted by it (stable);
/// otherwise file order is the declared order.
pub fn parse_parameter_set<R: Read>(
    reader: R,
    origin: &Path,
) -> Result<CanonicalParameterSet, StandardsError> {
    let rows = read_csv_rows(reader, origin)?;
    let mut entries: Vec<(Option<u32>, Parameter)> = Vec::with_capacity(rows.len());
    for (idx, row) in rows.iter().enumerate() {
        let Some(name) = row.get(PARAMETER_COLUMN) else {
            return Err(StandardsError::MissingColumn {
                path: origin.to_path_buf(),
                column: PARAMETER_COLUMN.to_string(),
            });
        };
        let mut parameter = Parameter::new(name.clone());
        if let Some(category) = row.get(CATEGORY_COLUMN).filter(|c| !c.is_empty()) {
            parameter = parameter.with_category(category.clone());
        }
        let order = match row.get(ORDER_COLUMN).filter(|o| !o.is_empty()) {
            Some(raw) => Some(raw.parse::<u32>().map_err(|_| StandardsError::InvalidOrder {
                path: origin.to_path_buf(),
                row: idx + 1,
                value: raw.clone(),
            })?),
            None => None,
        };
        entries.push((order, parameter));
    }
    if entries.iter().all(|(order, _)| order.is_some()) {
        entries.sort_by_key(|(order, _)| *order);
    }
    CanonicalParameterSet::new(entries.into_iter().map(|(_, p)| p).collect()).map_err(|source| {
        StandardsError::InvalidSet {
            path: origin.to_path_buf(),
            source,
        }
    })
}

fn read_csv_rows<R: Read>(
    reader: R,
    origin: &Path,
) -> Result<Vec<BTreeMap<String, String>>, StandardsError> {
    let mut reader = ReaderBuilder::new().has_headers(true).from_reader(reader);
    let headers = reader
        .headers()
        .map_err(|e| StandardsError::csv(origin, &e))?
        .clone();
    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| StandardsError::csv(origin, &e))?;
        let mut row = BTreeMap::new();
        for (idx, value) in record.iter().enumerate() {
            let key = headers
                .get(idx)
                .unwrap_or("")
                .trim_matches('\u{feff}')
                .trim()
                .to_string();
            row.insert(key, value.trim().to_string());
        }
        rows.push(row);
    }
    Ok(rows)
}
