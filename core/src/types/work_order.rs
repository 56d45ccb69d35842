use std::fmt;

use serde::{Deserialize, Serialize};

use super::{empty_as_none, empty_variant_as_none};


/// The kind of maintenance a work order tracks.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WorkOrderType {
    Repair,
    PreventativeMaintenance,
    AcceptanceTesting,
}

impl WorkOrderType {
    /// All types, in the order forms offer them.
    pub fn all() -> [WorkOrderType; 3] {
        [
            WorkOrderType::Repair,
            WorkOrderType::PreventativeMaintenance,
            WorkOrderType::AcceptanceTesting,
        ]
    }

    pub fn label(&self) -> &'static str {
        match self {
            WorkOrderType::Repair => "Repair",
            WorkOrderType::PreventativeMaintenance => "Preventative Maintenance",
            WorkOrderType::AcceptanceTesting => "Acceptance Testing",
        }
    }
}


/// Work-order lifecycle state: open until explicitly closed.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CompletionStatus {
    Open,
    Closed,
}

impl CompletionStatus {
    pub fn is_open(&self) -> bool {
        matches!(self, CompletionStatus::Open)
    }

    pub fn label(&self) -> &'static str {
        match self {
            CompletionStatus::Open => "Open",
            CompletionStatus::Closed => "Closed",
        }
    }
}


/// Why an open work order is on hold, if it is.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AwaitStatus {
    AwaitingParts,
    AwaitingRepair,
}

impl AwaitStatus {
    pub fn all() -> [AwaitStatus; 2] {
        [AwaitStatus::AwaitingParts, AwaitStatus::AwaitingRepair]
    }

    pub fn label(&self) -> &'static str {
        match self {
            AwaitStatus::AwaitingParts => "Awaiting Parts",
            AwaitStatus::AwaitingRepair => "Awaiting Repair",
        }
    }
}


/// Sort order for a device's work-order list. The backend default is
/// newest first.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SortOrder {
    #[default]
    Descending,
    Ascending,
}

impl SortOrder {
    /// Wire value used in the `order` query parameter.
    pub fn as_str(&self) -> &str {
        match self {
            SortOrder::Descending => "DESCENDING",
            SortOrder::Ascending => "ASCENDING",
        }
    }

    /// Parse a user-supplied order name, case-insensitively.
    pub fn parse(s: &str) -> Result<SortOrder, String> {
        match s.to_ascii_lowercase().as_str() {
            "descending" => Ok(SortOrder::Descending),
            "ascending" => Ok(SortOrder::Ascending),
            _ => Err(format!(
                "Unknown sort order '{}' (expected ascending or descending)",
                s
            )),
        }
    }

    pub fn toggled(&self) -> SortOrder {
        match self {
            SortOrder::Descending => SortOrder::Ascending,
            SortOrder::Ascending => SortOrder::Descending,
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}


/// A full work-order record as served by the backend. Closure fields are
/// absent while the work order remains open.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WorkOrderRecord {
    pub work_order_id: String,
    pub work_order_type: WorkOrderType,
    pub control_number: String,
    pub serial_number: String,
    pub completion_status: CompletionStatus,
    #[serde(
        default,
        deserialize_with = "empty_variant_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub await_status: Option<AwaitStatus>,
    pub manufacturer: String,
    pub model: String,
    pub facility_name: String,
    pub assigned_department: String,
    pub problem_reported: String,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub problem_found: Option<String>,
    pub created_by_id: String,
    pub created_by_name: String,
    pub creation_date_time: String,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub closed_by_id: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub closed_by_name: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub closed_date_time: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub summary: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub completion_date_time: Option<String>,
}


/// One row of a device's work-order list.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WorkOrderSummary {
    pub work_order_id: String,
    pub work_order_type: WorkOrderType,
    pub work_order_completion_status: CompletionStatus,
    pub creation_date_time: String,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub completion_date_time: Option<String>,
}


/// Request body for opening a work order against a device.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NewWorkOrder {
    pub control_number: String,
    pub work_order_type: WorkOrderType,
    pub problem_reported: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub problem_found: Option<String>,
}


/// Request body for editing an open work order.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WorkOrderEdits {
    pub work_order_id: String,
    pub work_order_type: WorkOrderType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub work_order_await_status: Option<AwaitStatus>,
    pub problem_reported: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub problem_found: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completion_date_time: Option<String>,
}


#[cfg(test)]
mod tests {
    use super::*;

    fn open_work_order_json() -> &'static str {
        r#"{
            "workOrderId": "WR0123456789",
            "workOrderType": "REPAIR",
            "controlNumber": "1234",
            "serialNumber": "SN-445",
            "completionStatus": "OPEN",
            "awaitStatus": "AWAITING_PARTS",
            "manufacturer": "Monitor Co.",
            "model": "Their Best Monitor",
            "facilityName": "General Hospital",
            "assignedDepartment": "ICU",
            "problemReported": "does not power on",
            "problemFound": "",
            "createdById": "an employee id",
            "createdByName": "an employee name",
            "creationDateTime": "2023-03-29T10:21:04",
            "closedById": "",
            "closedByName": "",
            "closedDateTime": "",
            "summary": "",
            "completionDateTime": ""
        }"#
    }

    #[test]
    fn open_work_order_from_wire() {
        let wo: WorkOrderRecord = serde_json::from_str(open_work_order_json()).unwrap();
        assert_eq!(wo.work_order_id, "WR0123456789");
        assert_eq!(wo.work_order_type, WorkOrderType::Repair);
        assert!(wo.completion_status.is_open());
        assert_eq!(wo.await_status, Some(AwaitStatus::AwaitingParts));
        // Empty-string closure fields fold to None on an open record.
        assert_eq!(wo.closed_by_id, None);
        assert_eq!(wo.summary, None);
        assert_eq!(wo.completion_date_time, None);
    }

    #[test]
    fn blank_await_status_on_wire_is_none() {
        let json = open_work_order_json().replace("AWAITING_PARTS", "");
        let wo: WorkOrderRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(wo.await_status, None);
    }

    #[test]
    fn work_order_round_trip() {
        let wo: WorkOrderRecord = serde_json::from_str(open_work_order_json()).unwrap();
        let json = serde_json::to_string(&wo).unwrap();
        let back: WorkOrderRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, wo);
    }

    #[test]
    fn summary_from_wire() {
        let json = r#"{
            "workOrderId": "WR0000000001",
            "workOrderType": "PREVENTATIVE_MAINTENANCE",
            "workOrderCompletionStatus": "CLOSED",
            "creationDateTime": "2023-01-05T08:00:00",
            "completionDateTime": "2023-01-06T11:30:00"
        }"#;
        let summary: WorkOrderSummary = serde_json::from_str(json).unwrap();
        assert_eq!(
            summary.work_order_type,
            WorkOrderType::PreventativeMaintenance
        );
        assert!(!summary.work_order_completion_status.is_open());
        assert_eq!(
            summary.completion_date_time.as_deref(),
            Some("2023-01-06T11:30:00")
        );
    }

    #[test]
    fn enum_wire_names() {
        assert_eq!(
            serde_json::to_string(&WorkOrderType::AcceptanceTesting).unwrap(),
            "\"ACCEPTANCE_TESTING\""
        );
        assert_eq!(
            serde_json::to_string(&AwaitStatus::AwaitingRepair).unwrap(),
            "\"AWAITING_REPAIR\""
        );
        assert_eq!(
            serde_json::to_string(&CompletionStatus::Closed).unwrap(),
            "\"CLOSED\""
        );
    }

    #[test]
    fn sort_order_default_and_parse() {
        assert_eq!(SortOrder::default(), SortOrder::Descending);
        assert_eq!(SortOrder::parse("ascending").unwrap(), SortOrder::Ascending);
        assert_eq!(SortOrder::parse("DESCENDING").unwrap(), SortOrder::Descending);
        assert!(SortOrder::parse("sideways").is_err());
        assert_eq!(SortOrder::Ascending.toggled(), SortOrder::Descending);
        assert_eq!(SortOrder::Descending.as_str(), "DESCENDING");
    }

    #[test]
    fn new_work_order_serialization() {
        let request = NewWorkOrder {
            control_number: "1234".into(),
            work_order_type: WorkOrderType::Repair,
            problem_reported: "alarm fault".into(),
            problem_found: None,
        };
        let json = serde_json::to_string(&request).unwrap();
        assert!(json.contains("\"workOrderType\":\"REPAIR\""));
        assert!(!json.contains("problemFound"));
    }

    #[test]
    fn work_order_edits_serialization() {
        let edits = WorkOrderEdits {
            work_order_id: "WR0123456789".into(),
            work_order_type: WorkOrderType::Repair,
            work_order_await_status: Some(AwaitStatus::AwaitingParts),
            problem_reported: "does not power on".into(),
            problem_found: Some("failed power supply".into()),
            summary: None,
            completion_date_time: None,
        };
        let json = serde_json::to_string(&edits).unwrap();
        assert!(json.contains("\"workOrderAwaitStatus\":\"AWAITING_PARTS\""));
        assert!(!json.contains("summary"));
        assert!(!json.contains("completionDateTime"));
    }
}
