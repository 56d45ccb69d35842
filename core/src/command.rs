//! Typed CLI commands.
//!
//! One variant per backend operation, plus [`Command::Tui`] for the
//! interactive front end. Produced by [`crate::cli::parse_args`] and
//! consumed by the `vault` binary's dispatcher.

use crate::types::{AwaitStatus, SortOrder, WorkOrderType};


/// A fully parsed invocation of the `vault` binary.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// `vault device add ...`
    DeviceAdd {
        serial_number: String,
        manufacturer: String,
        model: String,
        facility: String,
        department: String,
        manufacture_date: Option<String>,
        notes: Option<String>,
    },
    /// `vault device get <control-number>`
    DeviceGet { control_number: String },
    /// `vault device update <control-number> ...`
    DeviceUpdate {
        control_number: String,
        serial_number: String,
        manufacturer: String,
        model: String,
        facility: String,
        department: String,
        manufacture_date: Option<String>,
        notes: Option<String>,
    },
    /// `vault device retire <control-number>`
    DeviceRetire { control_number: String },
    /// `vault device reactivate <control-number>`
    DeviceReactivate { control_number: String },
    /// `vault device search <criteria...>`
    DeviceSearch { criteria: String },
    /// `vault device workorders <control-number> [--order <o>]`
    DeviceWorkOrders {
        control_number: String,
        order: Option<SortOrder>,
    },
    /// `vault workorder create <control-number> ...`
    WorkOrderCreate {
        control_number: String,
        work_order_type: WorkOrderType,
        problem_reported: String,
        problem_found: Option<String>,
    },
    /// `vault workorder get <id>`
    WorkOrderGet { work_order_id: String },
    /// `vault workorder update <id> ...`
    WorkOrderUpdate {
        work_order_id: String,
        work_order_type: WorkOrderType,
        await_status: Option<AwaitStatus>,
        problem_reported: String,
        problem_found: Option<String>,
        summary: Option<String>,
        completion_date_time: Option<String>,
    },
    /// `vault workorder close <id>`
    WorkOrderClose { work_order_id: String },
    /// `vault refs manufacturers`
    RefsManufacturers,
    /// `vault refs facilities`
    RefsFacilities,
    /// `vault tui`
    Tui,
    /// `vault help`
    Help,
}
