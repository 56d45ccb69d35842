//! View rendering for each page.
//!
//! Every function takes domain data plus a width and produces a
//! `Vec<String>` of lines. Views do not own data or perform I/O — the
//! page controllers read records out of their stores and hand them in.

use htm_vault_core::types::{DeviceRecord, WorkOrderRecord, WorkOrderSummary};

use crate::forms::{FieldKind, FormState};
use crate::render::{self, field_row, Panel, Table, BOLD, CYAN, DIM, RESET};


/// Render an optional field the one canonical way: absent is an empty
/// cell, never the string "null".
fn opt(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or("")
}


// ---------------------------------------------------------------------------
// Device views
// ---------------------------------------------------------------------------

/// The full device record panel.
pub fn device_detail(device: &DeviceRecord, width: usize) -> Vec<String> {
    let rows = vec![
        field_row("Control Number", &device.control_number),
        field_row("Serial Number", &device.serial_number),
        field_row("Manufacturer", &device.manufacturer),
        field_row("Model", &device.model),
        field_row("Manufacture Date", opt(&device.manufacture_date)),
        field_row("Service Status", device.service_status.label()),
        field_row("Facility", &device.facility_name),
        field_row("Department", &device.assigned_department),
        field_row("Compliance Through", opt(&device.compliance_through_date)),
        field_row("Last PM Completed", opt(&device.last_pm_completion_date)),
        field_row("Next PM Due", opt(&device.next_pm_due_date)),
        field_row(
            "PM Frequency (months)",
            &device.maintenance_frequency_in_months.to_string(),
        ),
        field_row("Added to Inventory", &device.inventory_add_date),
        field_row("Added By", &device.added_by_name),
        field_row("Notes", opt(&device.notes)),
    ];
    Panel::render(
        &format!("Device {}", device.control_number),
        &rows,
        width,
    )
}

/// The work-order list under a device. An explicit placeholder line
/// distinguishes "none exist" from "still loading".
pub fn work_orders_table(
    work_orders: &[WorkOrderSummary],
    selected: usize,
    _width: usize,
) -> Vec<String> {
    if work_orders.is_empty() {
        return vec![format!("{}No work orders found{}", DIM, RESET)];
    }

    let mut table = Table::new(vec!["Work Order", "Type", "Status", "Created", "Completed"]);
    for work_order in work_orders {
        table.add_row(vec![
            work_order.work_order_id.clone(),
            work_order.work_order_type.label().to_string(),
            work_order.work_order_completion_status.label().to_string(),
            work_order.creation_date_time.clone(),
            opt(&work_order.completion_date_time).to_string(),
        ]);
    }
    table.render(Some(selected))
}

/// A search-results table of matching devices.
pub fn search_results(devices: &[DeviceRecord], selected: usize, _width: usize) -> Vec<String> {
    if devices.is_empty() {
        return vec![format!("{}No matching devices{}", DIM, RESET)];
    }

    let mut table = Table::new(vec![
        "Control #", "Serial #", "Manufacturer", "Model", "Facility", "Status",
    ]);
    for device in devices {
        table.add_row(vec![
            device.control_number.clone(),
            device.serial_number.clone(),
            device.manufacturer.clone(),
            device.model.clone(),
            device.facility_name.clone(),
            device.service_status.label().to_string(),
        ]);
    }
    table.render(Some(selected))
}


// ---------------------------------------------------------------------------
// Work-order views
// ---------------------------------------------------------------------------

/// The full work-order record panel.
pub fn work_order_detail(work_order: &WorkOrderRecord, width: usize) -> Vec<String> {
    let await_label = work_order
        .await_status
        .map(|a| a.label())
        .unwrap_or("");
    let rows = vec![
        field_row("Work Order", &work_order.work_order_id),
        field_row("Type", work_order.work_order_type.label()),
        field_row("Status", work_order.completion_status.label()),
        field_row("Await Status", await_label),
        field_row("Control Number", &work_order.control_number),
        field_row("Serial Number", &work_order.serial_number),
        field_row("Manufacturer", &work_order.manufacturer),
        field_row("Model", &work_order.model),
        field_row("Facility", &work_order.facility_name),
        field_row("Department", &work_order.assigned_department),
        field_row("Problem Reported", &work_order.problem_reported),
        field_row("Problem Found", opt(&work_order.problem_found)),
        field_row("Created By", &work_order.created_by_name),
        field_row("Created", &work_order.creation_date_time),
        field_row("Completed", opt(&work_order.completion_date_time)),
        field_row("Closed By", opt(&work_order.closed_by_name)),
        field_row("Closed", opt(&work_order.closed_date_time)),
        field_row("Summary", opt(&work_order.summary)),
    ];
    Panel::render(
        &format!("Work Order {}", work_order.work_order_id),
        &rows,
        width,
    )
}


// ---------------------------------------------------------------------------
// Form view
// ---------------------------------------------------------------------------

/// Render a form: one line per field, the focused one marked. Select
/// fields show their current choice and how many options are on offer.
pub fn form(form: &FormState, title: &str, width: usize) -> Vec<String> {
    let mut rows = Vec::with_capacity(form.fields().len());
    for (index, field) in form.fields().iter().enumerate() {
        let marker = if index == form.focus_index() { ">" } else { " " };
        let required = if field.required { "*" } else { " " };

        let value = match &field.kind {
            FieldKind::Text => {
                if index == form.focus_index() {
                    format!("{}_", field.value)
                } else {
                    field.value.clone()
                }
            }
            FieldKind::Select(options) => {
                let shown = if field.value.is_empty() {
                    format!("{}(select){}", DIM, RESET)
                } else {
                    field.value.clone()
                };
                format!("{} {}({} options){}", shown, DIM, options.len(), RESET)
            }
        };

        rows.push(format!(
            "{}{} {}{}  {}",
            marker,
            required,
            render::pad_right(field.label, 20),
            ":",
            value
        ));
    }
    rows.push(String::new());
    rows.push(format!(
        "{}tab: next field   space: cycle choice   enter: submit   esc: cancel{}",
        DIM, RESET
    ));
    Panel::render(title, &rows, width)
}


// ---------------------------------------------------------------------------
// Chrome
// ---------------------------------------------------------------------------

/// Top header line: app name, page label, connection hint.
pub fn header(page_label: &str, base_url: &str, width: usize) -> Vec<String> {
    let line = format!(
        "{}{}HTM Vault{} | {} | {}{}{}",
        BOLD, CYAN, RESET, page_label, DIM, base_url, RESET
    );
    let separator: String = std::iter::repeat(render::BOX_H).take(width).collect();
    vec![line, separator]
}

/// Bottom hint line for the current page's keys.
pub fn key_hints(hints: &[(&str, &str)]) -> String {
    let parts: Vec<String> = hints
        .iter()
        .map(|(key, action)| format!("{}{}{} {}", BOLD, key, RESET, action))
        .collect();
    format!("{}{}{}", DIM, parts.join("   "), RESET)
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::forms::{FormField, FormState};
    use htm_vault_core::types::{
        CompletionStatus, ServiceStatus, WorkOrderType,
    };

    fn sample_device() -> DeviceRecord {
        DeviceRecord {
            control_number: "1234".into(),
            serial_number: "SN-445".into(),
            manufacturer: "Monitor Co.".into(),
            model: "Their Best Monitor".into(),
            manufacture_date: None,
            service_status: ServiceStatus::InService,
            facility_name: "General Hospital".into(),
            assigned_department: "ICU".into(),
            compliance_through_date: None,
            last_pm_completion_date: None,
            next_pm_due_date: None,
            maintenance_frequency_in_months: 12,
            inventory_add_date: "2022-01-04".into(),
            added_by_id: "id".into(),
            added_by_name: "Pat Jones".into(),
            notes: None,
        }
    }

    #[test]
    fn device_detail_includes_key_fields() {
        let lines = device_detail(&sample_device(), 80);
        let joined = lines.join("\n");
        assert!(joined.contains("Device 1234"));
        assert!(joined.contains("SN-445"));
        assert!(joined.contains("in service"));
        assert!(joined.contains("Pat Jones"));
        // Absent optional renders as empty, not "null".
        assert!(!joined.contains("null"));
    }

    #[test]
    fn empty_work_order_list_has_placeholder() {
        let lines = work_orders_table(&[], 0, 80);
        assert_eq!(lines.len(), 1);
        assert!(lines[0].contains("No work orders found"));
    }

    #[test]
    fn work_orders_table_lists_rows() {
        let summaries = vec![WorkOrderSummary {
            work_order_id: "WR0000000001".into(),
            work_order_type: WorkOrderType::Repair,
            work_order_completion_status: CompletionStatus::Open,
            creation_date_time: "2023-03-29T10:21:04".into(),
            completion_date_time: None,
        }];
        let lines = work_orders_table(&summaries, 0, 80);
        let joined = lines.join("\n");
        assert!(joined.contains("WR0000000001"));
        assert!(joined.contains("Repair"));
        assert!(joined.contains("Open"));
    }

    #[test]
    fn search_results_empty_and_filled() {
        assert!(search_results(&[], 0, 80)[0].contains("No matching devices"));
        let lines = search_results(&[sample_device()], 0, 80);
        assert!(lines.join("\n").contains("1234"));
    }

    #[test]
    fn form_marks_focused_field() {
        let state = FormState::new(vec![
            FormField::text("serial", "Serial Number", true),
            FormField::text("notes", "Notes", false),
        ]);
        let lines = form(&state, "Add Device", 80);
        let joined = lines.join("\n");
        assert!(joined.contains("Add Device"));
        // Focused first field carries the marker and cursor.
        assert!(joined.contains(">* Serial Number"));
        assert!(joined.contains('_'));
    }

    #[test]
    fn header_names_the_page() {
        let lines = header("device", "http://localhost:3000/", 40);
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("HTM Vault"));
        assert!(lines[0].contains("device"));
    }
}
