use crate::connector::{ConnectionMode, ConnectorKind, DelegateSelection};

/// Submit-control gate for the final wizard step. Disabled while a save call
/// is in flight, and when the connection mode demands an in-cluster delegate
/// but no selector tags have been chosen.
pub fn save_enabled(
    in_flight: bool,
    kind: ConnectorKind,
    mode: ConnectionMode,
    selection: &DelegateSelection,
) -> bool {
    if in_flight {
        return false;
    }
    if kind.needs_delegate_selection(mode) && selection.is_empty() {
        return false;
    }
    true
}
