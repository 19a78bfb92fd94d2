use crate::common::Identifier;

#[derive(Debug, Clone, PartialEq)]
pub enum DataType {
    /// `varchar(10)`, `decimal(10, 2)`, `bigint`, `string`, ...
    Named {
        name: Identifier,
        parameters: Vec<TypeParameter>,
    },
    /// `ARRAY<T>` or `ARRAY(T)`
    Array(Box<DataType>),
    /// `MAP<K, V>` or `MAP(K, V)`
    Map(Box<DataType>, Box<DataType>),
    /// `ROW(name T, ...)` or Hive's `STRUCT<name: T, ...>`
    Row(Vec<RowField>),
    DateTime {
        kind: DateTimeKind,
        precision: Option<String>,
        with_time_zone: bool,
    },
    DoublePrecision,
    Interval {
        from: IntervalField,
        to: Option<IntervalField>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum TypeParameter {
    Number(String),
    Type(DataType),
}

#[derive(Debug, Clone, PartialEq)]
pub struct RowField {
    pub name: Option<Identifier>,
    pub data_type: DataType,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateTimeKind {
    Time,
    Timestamp,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntervalField {
    Year,
    Month,
    Day,
    Hour,
    Minute,
    Second,
}
