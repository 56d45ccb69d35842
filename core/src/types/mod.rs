//! Typed records for the HTM Vault wire format.
//!
//! The backend serves camelCase JSON and historically blurs "absent" and
//! empty string for optional fields. These types pin one convention:
//! optionals are `Option<String>`, an empty string on the wire
//! deserializes to `None`, and `None` is omitted from request bodies.

pub mod device;
pub mod reference;
pub mod work_order;

pub use device::{DeviceEdits, DeviceRecord, NewDevice, ServiceStatus};
pub use reference::{departments_for, models_for, FacilityDepartments, ManufacturerModels};
pub use work_order::{
    AwaitStatus, CompletionStatus, NewWorkOrder, SortOrder, WorkOrderEdits, WorkOrderRecord,
    WorkOrderSummary, WorkOrderType,
};

use serde::de::IntoDeserializer;
use serde::{Deserialize, Deserializer};


/// Deserialize an optional string field, folding the backend's empty
/// strings into `None`.
pub(crate) fn empty_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.is_empty()))
}


/// Deserialize an optional enum field the backend encodes as either a
/// variant name or an empty string.
pub(crate) fn empty_variant_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    match value.filter(|s| !s.is_empty()) {
        None => Ok(None),
        Some(s) => T::deserialize(s.into_deserializer()).map(Some),
    }
}
