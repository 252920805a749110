/// One typed cell as read from the spreadsheet. Mirrors the subset of cell
/// kinds the import cares about; anything else (errors, durations) maps to
/// `Empty` at the codec boundary.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Cell {
    #[default]
    Empty,
    Int(i64),
    Float(f64),
    Text(String),
    Bool(bool),
}

impl Cell {
    pub fn is_empty(&self) -> bool {
        match self {
            Cell::Empty => true,
            Cell::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    /// Typed integer read: native ints, integral floats, then a string parse.
    /// Returns `None` on failure instead of erroring; the decoder substitutes.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Cell::Int(i) => Some(*i),
            Cell::Float(f) if f.fract() == 0.0 => Some(*f as i64),
            Cell::Text(s) => s.trim().parse::<i64>().ok(),
            _ => None,
        }
    }

    /// String read; numeric cells stringify so a numeric "name" column still
    /// imports rather than degrading to the default.
    pub fn as_text(&self) -> Option<String> {
        match self {
            Cell::Text(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
            Cell::Int(i) => Some(i.to_string()),
            Cell::Float(f) => {
                if f.fract() == 0.0 {
                    Some((*f as i64).to_string())
                } else {
                    Some(f.to_string())
                }
            }
            Cell::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }
}

/// One data line of the import sheet, positionally: id, name, location,
/// humidity. Ephemeral; exists only for the duration of one import pass.
#[derive(Debug, Clone, Default)]
pub struct SourceRow {
    pub id: Cell,
    pub name: Cell,
    pub location: Cell,
    pub humidity: Cell,
}
