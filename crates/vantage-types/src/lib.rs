//! Shared type definitions for the Vantage state service.
//!
//! Everything a reader can receive from the state store lives here: the
//! point-in-time [`Snapshot`], its embedded movement and inventory values,
//! and the [`GameEvent`] records kept in the store's recent-event buffer.
//! Types flow downstream to `TypeScript` via `ts-rs` for dashboard clients.
//!
//! # Modules
//!
//! - [`enums`] -- The fixed event vocabulary
//! - [`events`] -- Event records, drafts, and the restricted detail values
//! - [`snapshot`] -- Snapshot, movement, and inventory value types

pub mod enums;
pub mod events;
pub mod snapshot;

// Re-export all public types at crate root for convenience.
pub use enums::EventType;
pub use events::{DetailValue, Details, EventDraft, GameEvent};
pub use snapshot::{
    InventoryFull, InventorySummary, InventoryView, MovementVector, SlotItem, Snapshot,
};

#[cfg(test)]
mod tests {
    //! Binding generation for the wire types.

    #[test]
    fn export_bindings() {
        // ts-rs writes the `.ts` files into `bindings/` relative to the
        // crate root when `export_all` runs.
        use ts_rs::TS;

        let _ = crate::enums::EventType::export_all();
        let _ = crate::events::DetailValue::export_all();
        let _ = crate::events::GameEvent::export_all();
        let _ = crate::snapshot::MovementVector::export_all();
        let _ = crate::snapshot::InventorySummary::export_all();
        let _ = crate::snapshot::SlotItem::export_all();
        let _ = crate::snapshot::InventoryFull::export_all();
        let _ = crate::snapshot::InventoryView::export_all();
        let _ = crate::snapshot::Snapshot::export_all();
    }
}
