use num_enum::TryFromPrimitive;

/// Columns of the motion table, in output order.
#[repr(usize)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, TryFromPrimitive)]
pub enum TableColumn {
    AccelerationX,
    AccelerationY,
    AccelerationZ,
    GyroX,
    GyroY,
    GyroZ,
}

impl TableColumn {
    pub const ALL: [TableColumn; 6] = [
        TableColumn::AccelerationX,
        TableColumn::AccelerationY,
        TableColumn::AccelerationZ,
        TableColumn::GyroX,
        TableColumn::GyroY,
        TableColumn::GyroZ,
    ];

    /// Header label of the column.
    pub fn name(&self) -> &'static str {
        match self {
            TableColumn::AccelerationX => "AccelerationX",
            TableColumn::AccelerationY => "AccelerationY",
            TableColumn::AccelerationZ => "AccelerationZ",
            TableColumn::GyroX => "GyroX",
            TableColumn::GyroY => "GyroY",
            TableColumn::GyroZ => "GyroZ",
        }
    }

    /// Header labels of every column.
    pub fn header() -> [&'static str; 6] {
        Self::ALL.map(|column| column.name())
    }
}

impl From<TableColumn> for usize {
    fn from(value: TableColumn) -> Self {
        value as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_order() {
        assert_eq!(
            TableColumn::header().join(","),
            "AccelerationX,AccelerationY,AccelerationZ,GyroX,GyroY,GyroZ"
        );
    }

    #[test]
    fn test_column_index_round_trip() {
        for (idx, column) in TableColumn::ALL.iter().enumerate() {
            assert_eq!(usize::from(*column), idx);
            assert_eq!(TableColumn::try_from(idx).unwrap(), *column);
        }
        assert!(TableColumn::try_from(6usize).is_err());
    }
}
