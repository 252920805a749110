use crate::domain::plant::PlantFields;
use crate::domain::sync::row::SourceRow;

pub const DEFAULT_NAME: &str = "Sem Nome";
pub const DEFAULT_LOCATION: &str = "Sem Local";

/// A decoded input row: the fields to persist plus the identity the row
/// declared, if it declared a usable one.
#[derive(Debug, Clone, PartialEq)]
pub struct PlantCandidate {
    /// Strictly positive, or absent. The store never assigns non-positive
    /// ids, so 0, negatives and unparseable cells all mean "no identity".
    pub declared_id: Option<i32>,
    pub fields: PlantFields,
}

/// Decodes one raw row into a candidate. Never fails: malformed cells
/// degrade to defaults so one bad row cannot abort the batch.
pub fn decode(row: &SourceRow) -> PlantCandidate {
    let declared_id = if row.id.is_empty() {
        None
    } else {
        row.id
            .as_int()
            .and_then(|v| i32::try_from(v).ok())
            .filter(|v| *v > 0)
    };

    let name = row
        .name
        .as_text()
        .unwrap_or_else(|| DEFAULT_NAME.to_string());
    let location = row
        .location
        .as_text()
        .unwrap_or_else(|| DEFAULT_LOCATION.to_string());
    let required_humidity = row
        .humidity
        .as_int()
        .and_then(|v| i32::try_from(v).ok())
        .unwrap_or(0);

    PlantCandidate {
        declared_id,
        fields: PlantFields {
            name,
            location,
            required_humidity,
        },
    }
}
