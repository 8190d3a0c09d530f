//! Tabular encoding of a snapshot.
//!
//! One row per snapshot. Fields that contain the delimiter, a quote, or a
//! line break are wrapped in quotes with inner quotes doubled, so a row
//! always stays on one line.

use vantage_types::Snapshot;

use crate::error::PersistError;

/// Header row of the tabular log.
pub const CSV_HEADER: &str = "timestamp,x,y,z,health,hunger,biome,dimension,blockUnderCrosshair,isNight,movementVector,inventoryCounts,lastEvent";

/// Quote a field if it contains `,`, `"`, or a line break.
pub fn escape(field: &str) -> String {
    let needs_quotes = field.contains([',', '"', '\n', '\r']);
    if needs_quotes {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_owned()
    }
}

/// Encode one row (without the line terminator).
///
/// The movement vector is written as `dx,dy,dz`, the inventory summary and
/// the newest event as compact JSON. A missing event is an empty field.
pub fn encode_row(timestamp: &str, snapshot: &Snapshot) -> Result<String, PersistError> {
    let movement = format!(
        "{},{},{}",
        snapshot.movement_vector.dx, snapshot.movement_vector.dy, snapshot.movement_vector.dz
    );
    let inventory = serde_json::to_string(&snapshot.inventory)?;
    let last_event = snapshot
        .last_event()
        .map(serde_json::to_string)
        .transpose()?
        .unwrap_or_default();

    let fields = [
        escape(timestamp),
        snapshot.x.to_string(),
        snapshot.y.to_string(),
        snapshot.z.to_string(),
        snapshot.health.to_string(),
        snapshot.hunger.to_string(),
        escape(&snapshot.biome),
        escape(&snapshot.dimension),
        escape(snapshot.block_under_crosshair.as_deref().unwrap_or_default()),
        snapshot.is_night.to_string(),
        escape(&movement),
        escape(&inventory),
        escape(&last_event),
    ];
    Ok(fields.join(","))
}
