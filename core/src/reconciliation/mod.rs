pub mod behavior;
pub mod converter;
pub mod gate;
pub mod payload;
pub mod reconciler;
pub mod row_changes;

pub use behavior::find_behavior;
pub use converter::build_snapshot;
pub use gate::{can_locate, LocateEligibility};
pub use payload::{build_locate_payload, LocatePayload};
pub use reconciler::{historical_snapshots_as_is, reconcile_snapshots};
pub use row_changes::{RowChangeAccumulator, RowOverride};
