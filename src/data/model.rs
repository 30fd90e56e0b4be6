use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

// ---------------------------------------------------------------------------
// Value – a single cell of the record table
// ---------------------------------------------------------------------------

/// A dynamically-typed cell value mirroring the common dataframe dtypes.
/// Grouping compares cells, so `Value` must be `Eq` despite holding floats.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    String(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    Null,
}

// -- Manual Eq/Ord: floats compare by `total_cmp` --

impl Eq for Value {}

impl PartialOrd for Value {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Value {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        use Value::*;
        fn discriminant(v: &Value) -> u8 {
            match v {
                Null => 0,
                Bool(_) => 1,
                Integer(_) => 2,
                Float(_) => 3,
                String(_) => 4,
            }
        }
        let da = discriminant(self);
        let db = discriminant(other);
        if da != db {
            return da.cmp(&db);
        }
        match (self, other) {
            (Null, Null) => std::cmp::Ordering::Equal,
            (Bool(a), Bool(b)) => a.cmp(b),
            (Integer(a), Integer(b)) => a.cmp(b),
            (Float(a), Float(b)) => a.total_cmp(b),
            (String(a), String(b)) => a.cmp(b),
            _ => std::cmp::Ordering::Equal,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::String(s) => write!(f, "{s}"),
            Value::Integer(i) => write!(f, "{i}"),
            Value::Float(v) => write!(f, "{v}"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Null => write!(f, "<null>"),
        }
    }
}

impl Value {
    /// Interpret the value as an `f64`; `None` for text, booleans and nulls.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(v) => Some(*v),
            Value::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// Infer a typed value from a raw text cell.
    pub fn infer(s: &str) -> Value {
        if s.is_empty() {
            return Value::Null;
        }
        if let Ok(i) = s.parse::<i64>() {
            return Value::Integer(i);
        }
        if let Ok(f) = s.parse::<f64>() {
            return Value::Float(f);
        }
        if s == "true" || s == "false" {
            return Value::Bool(s == "true");
        }
        Value::String(s.to_string())
    }
}

// ---------------------------------------------------------------------------
// Field – the named columns the dashboard understands
// ---------------------------------------------------------------------------

/// A named column of the customer table that selectors can refer to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Field {
    Balance,
    Age,
    Duration,
    Job,
    Marital,
    Education,
    /// Binary purchase outcome.
    #[serde(rename = "y")]
    Outcome,
}

impl Field {
    pub const ALL: [Field; 7] = [
        Field::Balance,
        Field::Age,
        Field::Duration,
        Field::Job,
        Field::Marital,
        Field::Education,
        Field::Outcome,
    ];

    /// Column name in the source file.
    pub fn column(self) -> &'static str {
        match self {
            Field::Balance => "balance",
            Field::Age => "age",
            Field::Duration => "duration",
            Field::Job => "job",
            Field::Marital => "marital",
            Field::Education => "education",
            Field::Outcome => "y",
        }
    }

    /// Whether histograms of this field are binned rather than counted per category.
    pub fn is_numeric(self) -> bool {
        matches!(self, Field::Balance | Field::Age | Field::Duration)
    }

    /// Column name with its first letter upper-cased, used for axis labels.
    pub fn capitalized(self) -> String {
        let name = self.column();
        let mut chars = name.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column())
    }
}

// ---------------------------------------------------------------------------
// Record – one row of the table
// ---------------------------------------------------------------------------

/// A single customer record: column_name → value.
#[derive(Debug, Clone, Default)]
pub struct Record {
    pub fields: BTreeMap<String, Value>,
}

impl Record {
    /// Value of a known field, `Null` if the row has no such cell.
    pub fn get(&self, field: Field) -> &Value {
        static NULL: Value = Value::Null;
        self.fields.get(field.column()).unwrap_or(&NULL)
    }
}

// ---------------------------------------------------------------------------
// RecordTable – the complete loaded dataset
// ---------------------------------------------------------------------------

/// The full parsed table.
/// Never mutated after construction; shared behind an `Arc`.
#[derive(Debug, Clone)]
pub struct RecordTable {
    /// All rows in file order.
    pub records: Vec<Record>,
    /// Column names in file order.
    pub column_names: Vec<String>,
}

impl RecordTable {
    /// Wrap loaded rows. `column_names` keeps the header order.
    pub fn new(column_names: Vec<String>, records: Vec<Record>) -> Self {
        RecordTable {
            records,
            column_names,
        }
    }

    /// Required columns that are absent from the header.
    pub fn missing_fields(&self) -> Vec<Field> {
        Field::ALL
            .into_iter()
            .filter(|f| !self.column_names.iter().any(|c| c == f.column()))
            .collect()
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
