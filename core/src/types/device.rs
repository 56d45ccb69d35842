use serde::{Deserialize, Serialize};

use super::empty_as_none;


/// Whether a device is active in the inventory or has been retired
/// (soft-deleted). Retired devices can be reactivated.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ServiceStatus {
    InService,
    Retired,
}

impl ServiceStatus {
    /// Short label suitable for display.
    pub fn label(&self) -> &'static str {
        match self {
            ServiceStatus::InService => "in service",
            ServiceStatus::Retired => "retired",
        }
    }

    pub fn is_in_service(&self) -> bool {
        matches!(self, ServiceStatus::InService)
    }
}


/// A device record as served by the backend.
///
/// The maintenance-schedule dates are computed server-side and absent for
/// devices with no preventative-maintenance requirement.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DeviceRecord {
    pub control_number: String,
    pub serial_number: String,
    pub manufacturer: String,
    pub model: String,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub manufacture_date: Option<String>,
    pub service_status: ServiceStatus,
    pub facility_name: String,
    pub assigned_department: String,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub compliance_through_date: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub last_pm_completion_date: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub next_pm_due_date: Option<String>,
    pub maintenance_frequency_in_months: u32,
    pub inventory_add_date: String,
    pub added_by_id: String,
    pub added_by_name: String,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub notes: Option<String>,
}


/// Request body for adding a device to the inventory. The backend
/// assigns the control number and audit fields.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NewDevice {
    pub serial_number: String,
    pub manufacturer: String,
    pub model: String,
    pub facility_name: String,
    pub assigned_department: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manufacture_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}


/// Request body for updating an existing device. Carries the full
/// editable field set; the control number selects the record.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DeviceEdits {
    pub control_number: String,
    pub serial_number: String,
    pub manufacturer: String,
    pub model: String,
    pub facility_name: String,
    pub assigned_department: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manufacture_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}
