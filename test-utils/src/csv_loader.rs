use std::error::Error;
use std::path::Path;

use csv::ReaderBuilder;
use num_enum::TryFromPrimitive;

use common::TableColumn;

/// Returns the header and every row of a table as raw text fields.
pub fn load_raw(file_path: impl AsRef<Path>) -> Result<Vec<Vec<String>>, Box<dyn Error>> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(false)
        .from_path(file_path)?;
    let mut data = Vec::new();

    for result in rdr.records() {
        let record = result?;
        data.push(record.iter().map(str::to_string).collect());
    }

    Ok(data)
}

/// Returns the data rows of a table, header excluded.
pub fn load_csv(file_path: impl AsRef<Path>) -> Result<Vec<Vec<f64>>, Box<dyn Error>> {
    let mut rdr = ReaderBuilder::new().has_headers(true).from_path(file_path)?;
    let mut data = Vec::new();

    for result in rdr.records() {
        let record = result?;
        let row = record
            .iter()
            .map(|s| s.parse::<f64>())
            .collect::<Result<Vec<f64>, _>>()?;
        data.push(row);
    }

    Ok(data)
}

/// Returns the selected columns of every data row, in the requested order.
pub fn load_csv_columns(
    file_path: impl AsRef<Path>,
    columns: &[TableColumn],
) -> Result<Vec<Vec<f64>>, Box<dyn Error>> {
    if columns.is_empty() {
        return Err("No columns provided".into());
    }

    load_csv(file_path)?
        .into_iter()
        .map(|row| {
            columns
                .iter()
                .map(|&column| {
                    row.get(usize::from(column))
                        .copied()
                        .ok_or_else(|| format!("Column {:?} missing", column).into())
                })
                .collect::<Result<Vec<f64>, Box<dyn Error>>>()
        })
        .collect()
}

/// Resolves a column from its position in the header.
pub fn column_at(index: usize) -> Result<TableColumn, Box<dyn Error>> {
    TableColumn::try_from_primitive(index)
        .map_err(|_| format!("Column index {} out of bounds", index).into())
}
