//! Page controllers.
//!
//! One controller per page: search, add device, device detail, work
//! order detail. Each controller owns a [`DataStore`] created for that
//! page's lifetime and registers a redraw listener at construction;
//! fetch and submit methods write results into the store and rendering
//! picks them up on the next frame. Controllers never render — they
//! only move data.

use std::cell::Cell;
use std::rc::Rc;

use htm_vault_core::store::DataStore;
use htm_vault_core::types::{
    departments_for, models_for, AwaitStatus, DeviceEdits, DeviceRecord, FacilityDepartments,
    ManufacturerModels, NewDevice, NewWorkOrder, SortOrder, WorkOrderEdits, WorkOrderRecord,
    WorkOrderSummary, WorkOrderType,
};
use htm_vault_core::VaultClient;

use crate::forms::{FormField, FormState};


/// Store keys shared between fetch methods and renderers. Each page uses
/// its own store, so the names only need to be unique within a page.
pub mod keys {
    pub const DEVICE: &str = "device";
    pub const WORK_ORDERS: &str = "workOrders";
    pub const WORK_ORDER: &str = "workOrder";
    pub const SEARCH_RESULTS: &str = "searchResults";
    pub const MANUFACTURERS_AND_MODELS: &str = "manufacturersAndModels";
    pub const FACILITIES_AND_DEPARTMENTS: &str = "facilitiesAndDepartments";
}


/// Build a page store whose writes set the shared redraw flag.
fn page_store(dirty: &Rc<Cell<bool>>) -> Rc<DataStore> {
    let store = Rc::new(DataStore::new());
    let flag = Rc::clone(dirty);
    store.add_change_listener(move || flag.set(true));
    store
}


// ---------------------------------------------------------------------------
// Search page
// ---------------------------------------------------------------------------

/// Free-text device search, the landing page.
pub struct SearchPage {
    store: Rc<DataStore>,
    pub criteria: String,
    pub selected: usize,
    /// Whether keyboard focus is on the result list rather than the
    /// criteria input.
    pub results_focused: bool,
}


impl SearchPage {
    pub fn new(dirty: &Rc<Cell<bool>>) -> Self {
        SearchPage {
            store: page_store(dirty),
            criteria: String::new(),
            selected: 0,
            results_focused: false,
        }
    }

    pub fn store(&self) -> &DataStore {
        &self.store
    }

    /// Run the search and store the results.
    pub fn submit(&mut self, client: &VaultClient) -> Result<(), String> {
        let devices = client
            .search_devices(&self.criteria)
            .map_err(|e| e.to_string())?;
        self.selected = 0;
        self.results_focused = !devices.is_empty();
        self.store.set(keys::SEARCH_RESULTS, devices);
        Ok(())
    }

    pub fn results(&self) -> Option<Rc<Vec<DeviceRecord>>> {
        self.store.get(keys::SEARCH_RESULTS)
    }

    pub fn select_next(&mut self) {
        if let Some(results) = self.results() {
            if self.selected + 1 < results.len() {
                self.selected += 1;
            }
        }
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    /// Control number of the highlighted result, for navigation.
    pub fn selected_control_number(&self) -> Option<String> {
        self.results()?
            .get(self.selected)
            .map(|d| d.control_number.clone())
    }
}


// ---------------------------------------------------------------------------
// Add-device page
// ---------------------------------------------------------------------------

/// The add-device form with its cascading dropdowns.
pub struct AddDevicePage {
    store: Rc<DataStore>,
    pub form: FormState,
}


impl AddDevicePage {
    pub fn new(dirty: &Rc<Cell<bool>>) -> Self {
        AddDevicePage {
            store: page_store(dirty),
            form: device_form(None, &[], &[]),
        }
    }

    pub fn store(&self) -> &DataStore {
        &self.store
    }

    /// Fetch both reference lists and seed the manufacturer and facility
    /// dropdowns. Models and departments stay empty until a parent
    /// selection is made.
    pub fn load(&mut self, client: &VaultClient) -> Result<(), String> {
        let manufacturers = client
            .get_manufacturers_and_models()
            .map_err(|e| e.to_string())?;
        self.store.set(keys::MANUFACTURERS_AND_MODELS, manufacturers);

        let facilities = client
            .get_facilities_and_departments()
            .map_err(|e| e.to_string())?;
        self.store.set(keys::FACILITIES_AND_DEPARTMENTS, facilities);

        if let Some(list) = self.manufacturers() {
            let options = list.iter().map(|m| m.manufacturer.clone()).collect();
            self.form.set_options(fields::MANUFACTURER, options);
        }
        if let Some(list) = self.facilities() {
            let options = list.iter().map(|f| f.facility.clone()).collect();
            self.form.set_options(fields::FACILITY, options);
        }
        Ok(())
    }

    pub fn manufacturers(&self) -> Option<Rc<Vec<ManufacturerModels>>> {
        self.store.get(keys::MANUFACTURERS_AND_MODELS)
    }

    pub fn facilities(&self) -> Option<Rc<Vec<FacilityDepartments>>> {
        self.store.get(keys::FACILITIES_AND_DEPARTMENTS)
    }

    /// Cascade dependent dropdowns after a selection change.
    pub fn on_field_changed(&mut self, name: &str) {
        cascade(
            &mut self.form,
            name,
            self.store.get(keys::MANUFACTURERS_AND_MODELS),
            self.store.get(keys::FACILITIES_AND_DEPARTMENTS),
        );
    }

    /// Validate and submit the form. On success the new device record is
    /// returned for navigation to its page.
    pub fn submit(&mut self, client: &VaultClient) -> Result<DeviceRecord, String> {
        let missing = self.form.missing_required();
        if !missing.is_empty() {
            return Err(format!("Required: {}", missing.join(", ")));
        }
        let request = new_device_from_form(&self.form);
        let device = client.add_device(&request).map_err(|e| e.to_string())?;
        self.store.set(keys::DEVICE, device.clone());
        Ok(device)
    }
}


// ---------------------------------------------------------------------------
// Device page
// ---------------------------------------------------------------------------

/// What the device page is showing besides the record itself.
pub enum DeviceMode {
    Viewing,
    /// The inline update-device form.
    UpdateForm(FormState),
    /// The inline create-work-order form.
    WorkOrderForm(FormState),
}


/// One device: record, work-order list, and the inline forms.
pub struct DevicePage {
    store: Rc<DataStore>,
    control_number: String,
    pub order: SortOrder,
    pub mode: DeviceMode,
    pub selected_work_order: usize,
}


impl DevicePage {
    pub fn new(control_number: &str, order: SortOrder, dirty: &Rc<Cell<bool>>) -> Self {
        DevicePage {
            store: page_store(dirty),
            control_number: control_number.to_string(),
            order,
            mode: DeviceMode::Viewing,
            selected_work_order: 0,
        }
    }

    pub fn store(&self) -> &DataStore {
        &self.store
    }

    pub fn control_number(&self) -> &str {
        &self.control_number
    }

    /// Fetch the device, its work orders, and the reference lists,
    /// storing each as it arrives so partially loaded pages still
    /// render what they have.
    pub fn load(&self, client: &VaultClient) -> Result<(), String> {
        log::debug!("loading device page for {}", self.control_number);
        let device = client
            .get_device(&self.control_number)
            .map_err(|e| e.to_string())?;
        self.store.set(keys::DEVICE, device);

        let work_orders = client
            .get_device_work_orders(&self.control_number, self.order)
            .map_err(|e| e.to_string())?;
        self.store.set(keys::WORK_ORDERS, work_orders);

        let manufacturers = client
            .get_manufacturers_and_models()
            .map_err(|e| e.to_string())?;
        self.store.set(keys::MANUFACTURERS_AND_MODELS, manufacturers);

        let facilities = client
            .get_facilities_and_departments()
            .map_err(|e| e.to_string())?;
        self.store.set(keys::FACILITIES_AND_DEPARTMENTS, facilities);
        Ok(())
    }

    pub fn device(&self) -> Option<Rc<DeviceRecord>> {
        self.store.get(keys::DEVICE)
    }

    pub fn work_orders(&self) -> Option<Rc<Vec<WorkOrderSummary>>> {
        self.store.get(keys::WORK_ORDERS)
    }

    /// Retire and update apply to in-service devices only.
    pub fn can_modify(&self) -> bool {
        self.device()
            .map(|d| d.service_status.is_in_service())
            .unwrap_or(false)
    }

    /// Reactivate applies to retired devices only.
    pub fn can_reactivate(&self) -> bool {
        self.device()
            .map(|d| !d.service_status.is_in_service())
            .unwrap_or(false)
    }

    /// Open the update form, pre-populated from the stored record with
    /// both cascades resolved to the current selections.
    pub fn begin_update(&mut self) -> Result<(), String> {
        let device = self.device().ok_or("Device is still loading")?;
        let manufacturers = self
            .store
            .get::<Vec<ManufacturerModels>>(keys::MANUFACTURERS_AND_MODELS)
            .ok_or("Reference lists are still loading")?;
        let facilities = self
            .store
            .get::<Vec<FacilityDepartments>>(keys::FACILITIES_AND_DEPARTMENTS)
            .ok_or("Reference lists are still loading")?;

        self.mode = DeviceMode::UpdateForm(device_form(
            Some(&device),
            &manufacturers,
            &facilities,
        ));
        Ok(())
    }

    /// Open the create-work-order form.
    pub fn begin_work_order(&mut self) {
        self.mode = DeviceMode::WorkOrderForm(work_order_form(None));
    }

    /// Drop whichever inline form is open, back to the record view.
    pub fn cancel_form(&mut self) {
        self.mode = DeviceMode::Viewing;
    }

    /// The form currently open, if any.
    pub fn form_mut(&mut self) -> Option<&mut FormState> {
        match &mut self.mode {
            DeviceMode::Viewing => None,
            DeviceMode::UpdateForm(form) | DeviceMode::WorkOrderForm(form) => Some(form),
        }
    }

    /// Cascade dependent dropdowns after a selection change in the
    /// update form.
    pub fn on_field_changed(&mut self, name: &str) {
        let manufacturers = self.store.get(keys::MANUFACTURERS_AND_MODELS);
        let facilities = self.store.get(keys::FACILITIES_AND_DEPARTMENTS);
        if let DeviceMode::UpdateForm(form) = &mut self.mode {
            cascade(form, name, manufacturers, facilities);
        }
    }

    /// Submit the update form and store the refreshed record.
    pub fn submit_update(&mut self, client: &VaultClient) -> Result<(), String> {
        let form = match &self.mode {
            DeviceMode::UpdateForm(form) => form,
            _ => return Err("No update in progress".into()),
        };
        let missing = form.missing_required();
        if !missing.is_empty() {
            return Err(format!("Required: {}", missing.join(", ")));
        }
        let edits = device_edits_from_form(&self.control_number, form);
        let device = client.update_device(&edits).map_err(|e| e.to_string())?;
        self.store.set(keys::DEVICE, device);
        self.mode = DeviceMode::Viewing;
        Ok(())
    }

    /// Submit the create-work-order form and store the refreshed list.
    pub fn submit_work_order(&mut self, client: &VaultClient) -> Result<(), String> {
        let form = match &self.mode {
            DeviceMode::WorkOrderForm(form) => form,
            _ => return Err("No work order in progress".into()),
        };
        let missing = form.missing_required();
        if !missing.is_empty() {
            return Err(format!("Required: {}", missing.join(", ")));
        }
        let request = new_work_order_from_form(&self.control_number, form)?;
        let work_orders = client
            .create_work_order(&request, self.order)
            .map_err(|e| e.to_string())?;
        self.store.set(keys::WORK_ORDERS, work_orders);
        self.mode = DeviceMode::Viewing;
        Ok(())
    }

    /// Retire the device and store the updated record.
    pub fn retire(&self, client: &VaultClient) -> Result<(), String> {
        let device = client
            .retire_device(&self.control_number)
            .map_err(|e| e.to_string())?;
        self.store.set(keys::DEVICE, device);
        Ok(())
    }

    /// Return the device to service and store the updated record.
    pub fn reactivate(&self, client: &VaultClient) -> Result<(), String> {
        let device = client
            .reactivate_device(&self.control_number)
            .map_err(|e| e.to_string())?;
        self.store.set(keys::DEVICE, device);
        Ok(())
    }

    /// Flip the work-order sort order and refetch the list.
    pub fn toggle_order(&mut self, client: &VaultClient) -> Result<(), String> {
        self.order = self.order.toggled();
        let work_orders = client
            .get_device_work_orders(&self.control_number, self.order)
            .map_err(|e| e.to_string())?;
        self.selected_work_order = 0;
        self.store.set(keys::WORK_ORDERS, work_orders);
        Ok(())
    }

    pub fn select_next(&mut self) {
        if let Some(work_orders) = self.work_orders() {
            if self.selected_work_order + 1 < work_orders.len() {
                self.selected_work_order += 1;
            }
        }
    }

    pub fn select_prev(&mut self) {
        self.selected_work_order = self.selected_work_order.saturating_sub(1);
    }

    /// Id of the highlighted work order, for navigation.
    pub fn selected_work_order_id(&self) -> Option<String> {
        self.work_orders()?
            .get(self.selected_work_order)
            .map(|w| w.work_order_id.clone())
    }
}


// ---------------------------------------------------------------------------
// Work-order page
// ---------------------------------------------------------------------------

/// One work order with its inline edit form.
pub struct WorkOrderPage {
    store: Rc<DataStore>,
    work_order_id: String,
    pub form: Option<FormState>,
}


impl WorkOrderPage {
    pub fn new(work_order_id: &str, dirty: &Rc<Cell<bool>>) -> Self {
        WorkOrderPage {
            store: page_store(dirty),
            work_order_id: work_order_id.to_string(),
            form: None,
        }
    }

    pub fn store(&self) -> &DataStore {
        &self.store
    }

    pub fn work_order_id(&self) -> &str {
        &self.work_order_id
    }

    pub fn load(&self, client: &VaultClient) -> Result<(), String> {
        log::debug!("loading work order page for {}", self.work_order_id);
        let work_order = client
            .get_work_order(&self.work_order_id)
            .map_err(|e| e.to_string())?;
        self.store.set(keys::WORK_ORDER, work_order);
        Ok(())
    }

    pub fn work_order(&self) -> Option<Rc<WorkOrderRecord>> {
        self.store.get(keys::WORK_ORDER)
    }

    /// Closed work orders are read-only.
    pub fn can_modify(&self) -> bool {
        self.work_order()
            .map(|w| w.completion_status.is_open())
            .unwrap_or(false)
    }

    /// Open the edit form pre-populated from the stored record.
    pub fn begin_edit(&mut self) -> Result<(), String> {
        let work_order = self.work_order().ok_or("Work order is still loading")?;
        if !work_order.completion_status.is_open() {
            return Err("Closed work orders cannot be edited".into());
        }
        self.form = Some(work_order_form(Some(&work_order)));
        Ok(())
    }

    pub fn cancel_edit(&mut self) {
        self.form = None;
    }

    /// Submit the edit form and store the refreshed record.
    pub fn submit_edit(&mut self, client: &VaultClient) -> Result<(), String> {
        let form = self.form.as_ref().ok_or("No edit in progress")?;
        let missing = form.missing_required();
        if !missing.is_empty() {
            return Err(format!("Required: {}", missing.join(", ")));
        }
        let edits = work_order_edits_from_form(&self.work_order_id, form)?;
        let work_order = client
            .update_work_order(&edits)
            .map_err(|e| e.to_string())?;
        self.store.set(keys::WORK_ORDER, work_order);
        self.form = None;
        Ok(())
    }

    /// Close the work order and store the final record.
    pub fn close(&mut self, client: &VaultClient) -> Result<(), String> {
        let work_order = client
            .close_work_order(&self.work_order_id)
            .map_err(|e| e.to_string())?;
        self.store.set(keys::WORK_ORDER, work_order);
        self.form = None;
        Ok(())
    }
}


// ---------------------------------------------------------------------------
// Form construction and request building
// ---------------------------------------------------------------------------

/// Field names shared by the device and work-order forms.
pub mod fields {
    pub const SERIAL: &str = "serial";
    pub const MANUFACTURER: &str = "manufacturer";
    pub const MODEL: &str = "model";
    pub const FACILITY: &str = "facility";
    pub const DEPARTMENT: &str = "department";
    pub const DATE: &str = "date";
    pub const NOTES: &str = "notes";

    pub const TYPE: &str = "type";
    pub const AWAIT: &str = "await";
    pub const REPORTED: &str = "reported";
    pub const FOUND: &str = "found";
    pub const SUMMARY: &str = "summary";
    pub const COMPLETED: &str = "completed";
}


/// Build the add/update device form. With a `device`, values are
/// pre-populated and the dependent dropdowns are narrowed to the current
/// manufacturer's models and the current facility's departments.
fn device_form(
    device: Option<&DeviceRecord>,
    manufacturers: &[ManufacturerModels],
    facilities: &[FacilityDepartments],
) -> FormState {
    let manufacturer_options: Vec<String> =
        manufacturers.iter().map(|m| m.manufacturer.clone()).collect();
    let facility_options: Vec<String> = facilities.iter().map(|f| f.facility.clone()).collect();

    let (model_options, department_options) = match device {
        Some(d) => (
            models_for(manufacturers, &d.manufacturer).to_vec(),
            departments_for(facilities, &d.facility_name).to_vec(),
        ),
        None => (Vec::new(), Vec::new()),
    };

    let mut form = FormState::new(vec![
        FormField::text(fields::SERIAL, "Serial Number", true),
        FormField::select(fields::MANUFACTURER, "Manufacturer", manufacturer_options, true),
        FormField::select(fields::MODEL, "Model", model_options, true),
        FormField::select(fields::FACILITY, "Facility", facility_options, true),
        FormField::select(fields::DEPARTMENT, "Department", department_options, true),
        FormField::text(fields::DATE, "Manufacture Date", false),
        FormField::text(fields::NOTES, "Notes", false),
    ]);

    if let Some(d) = device {
        form.set_value(fields::SERIAL, &d.serial_number);
        form.set_value(fields::MANUFACTURER, &d.manufacturer);
        form.set_value(fields::MODEL, &d.model);
        form.set_value(fields::FACILITY, &d.facility_name);
        form.set_value(fields::DEPARTMENT, &d.assigned_department);
        form.set_value(fields::DATE, d.manufacture_date.as_deref().unwrap_or(""));
        form.set_value(fields::NOTES, d.notes.as_deref().unwrap_or(""));
    }
    form
}

/// Build the create/edit work-order form, pre-populated when editing.
fn work_order_form(work_order: Option<&WorkOrderRecord>) -> FormState {
    let type_options: Vec<String> = WorkOrderType::all()
        .iter()
        .map(|t| t.label().to_string())
        .collect();
    // Leading blank keeps the await status optional.
    let mut await_options = vec![String::new()];
    await_options.extend(AwaitStatus::all().iter().map(|a| a.label().to_string()));

    let mut form = match work_order {
        None => FormState::new(vec![
            FormField::select(fields::TYPE, "Type", type_options, true),
            FormField::text(fields::REPORTED, "Problem Reported", true),
            FormField::text(fields::FOUND, "Problem Found", false),
        ]),
        Some(_) => FormState::new(vec![
            FormField::select(fields::TYPE, "Type", type_options, true),
            FormField::select(fields::AWAIT, "Await Status", await_options, false),
            FormField::text(fields::REPORTED, "Problem Reported", true),
            FormField::text(fields::FOUND, "Problem Found", false),
            FormField::text(fields::SUMMARY, "Summary", false),
            FormField::text(fields::COMPLETED, "Completion Date/Time", false),
        ]),
    };

    if let Some(w) = work_order {
        form.set_value(fields::TYPE, w.work_order_type.label());
        form.set_value(
            fields::AWAIT,
            w.await_status.map(|a| a.label()).unwrap_or(""),
        );
        form.set_value(fields::REPORTED, &w.problem_reported);
        form.set_value(fields::FOUND, w.problem_found.as_deref().unwrap_or(""));
        form.set_value(fields::SUMMARY, w.summary.as_deref().unwrap_or(""));
        form.set_value(
            fields::COMPLETED,
            w.completion_date_time.as_deref().unwrap_or(""),
        );
    }
    form
}

/// Refill the model or department options after a parent selection
/// change, clearing a selection the new options no longer contain.
fn cascade(
    form: &mut FormState,
    changed: &str,
    manufacturers: Option<Rc<Vec<ManufacturerModels>>>,
    facilities: Option<Rc<Vec<FacilityDepartments>>>,
) {
    match changed {
        fields::MANUFACTURER => {
            if let Some(list) = manufacturers {
                let models = models_for(&list, form.value(fields::MANUFACTURER)).to_vec();
                form.set_options(fields::MODEL, models);
            }
        }
        fields::FACILITY => {
            if let Some(list) = facilities {
                let departments = departments_for(&list, form.value(fields::FACILITY)).to_vec();
                form.set_options(fields::DEPARTMENT, departments);
            }
        }
        _ => {}
    }
}

fn work_order_type_from_label(label: &str) -> Result<WorkOrderType, String> {
    WorkOrderType::all()
        .into_iter()
        .find(|t| t.label() == label)
        .ok_or_else(|| format!("Unknown work order type '{}'", label))
}

fn await_status_from_label(label: &str) -> Option<AwaitStatus> {
    AwaitStatus::all().into_iter().find(|a| a.label() == label)
}

/// Assemble the add-device request from a validated form.
fn new_device_from_form(form: &FormState) -> NewDevice {
    NewDevice {
        serial_number: form.value(fields::SERIAL).to_string(),
        manufacturer: form.value(fields::MANUFACTURER).to_string(),
        model: form.value(fields::MODEL).to_string(),
        facility_name: form.value(fields::FACILITY).to_string(),
        assigned_department: form.value(fields::DEPARTMENT).to_string(),
        manufacture_date: form.optional_value(fields::DATE),
        notes: form.optional_value(fields::NOTES),
    }
}

/// Assemble the update-device request from a validated form.
fn device_edits_from_form(control_number: &str, form: &FormState) -> DeviceEdits {
    DeviceEdits {
        control_number: control_number.to_string(),
        serial_number: form.value(fields::SERIAL).to_string(),
        manufacturer: form.value(fields::MANUFACTURER).to_string(),
        model: form.value(fields::MODEL).to_string(),
        facility_name: form.value(fields::FACILITY).to_string(),
        assigned_department: form.value(fields::DEPARTMENT).to_string(),
        manufacture_date: form.optional_value(fields::DATE),
        notes: form.optional_value(fields::NOTES),
    }
}

/// Assemble the create-work-order request from a validated form.
fn new_work_order_from_form(
    control_number: &str,
    form: &FormState,
) -> Result<NewWorkOrder, String> {
    Ok(NewWorkOrder {
        control_number: control_number.to_string(),
        work_order_type: work_order_type_from_label(form.value(fields::TYPE))?,
        problem_reported: form.value(fields::REPORTED).to_string(),
        problem_found: form.optional_value(fields::FOUND),
    })
}

/// Assemble the update-work-order request from a validated form.
fn work_order_edits_from_form(
    work_order_id: &str,
    form: &FormState,
) -> Result<WorkOrderEdits, String> {
    Ok(WorkOrderEdits {
        work_order_id: work_order_id.to_string(),
        work_order_type: work_order_type_from_label(form.value(fields::TYPE))?,
        work_order_await_status: await_status_from_label(form.value(fields::AWAIT)),
        problem_reported: form.value(fields::REPORTED).to_string(),
        problem_found: form.optional_value(fields::FOUND),
        summary: form.optional_value(fields::SUMMARY),
        completion_date_time: form.optional_value(fields::COMPLETED),
    })
}


#[cfg(test)]
mod tests {
    use super::*;
    use htm_vault_core::types::{CompletionStatus, ServiceStatus};

    fn sample_device() -> DeviceRecord {
        DeviceRecord {
            control_number: "1234".into(),
            serial_number: "SN-445".into(),
            manufacturer: "Monitor Co.".into(),
            model: "Their Best Monitor".into(),
            manufacture_date: Some("2021-06-15".into()),
            service_status: ServiceStatus::InService,
            facility_name: "General Hospital".into(),
            assigned_department: "ICU".into(),
            compliance_through_date: None,
            last_pm_completion_date: None,
            next_pm_due_date: None,
            maintenance_frequency_in_months: 12,
            inventory_add_date: "2022-01-04".into(),
            added_by_id: "id".into(),
            added_by_name: "name".into(),
            notes: None,
        }
    }

    fn sample_manufacturers() -> Vec<ManufacturerModels> {
        vec![
            ManufacturerModels {
                manufacturer: "Monitor Co.".into(),
                models: vec!["Their Best Monitor".into(), "Their OK Monitor".into()],
            },
            ManufacturerModels {
                manufacturer: "Defib Co.".into(),
                models: vec!["Their Defibrillator".into()],
            },
        ]
    }

    fn sample_facilities() -> Vec<FacilityDepartments> {
        vec![FacilityDepartments {
            facility: "General Hospital".into(),
            departments: vec!["ICU".into(), "ER".into()],
        }]
    }

    fn sample_work_order() -> WorkOrderRecord {
        WorkOrderRecord {
            work_order_id: "WR0000000001".into(),
            work_order_type: WorkOrderType::Repair,
            control_number: "1234".into(),
            serial_number: "SN-445".into(),
            completion_status: CompletionStatus::Open,
            await_status: Some(AwaitStatus::AwaitingParts),
            manufacturer: "Monitor Co.".into(),
            model: "Their Best Monitor".into(),
            facility_name: "General Hospital".into(),
            assigned_department: "ICU".into(),
            problem_reported: "does not power on".into(),
            problem_found: None,
            created_by_id: "id".into(),
            created_by_name: "name".into(),
            creation_date_time: "2023-03-29T10:21:04".into(),
            closed_by_id: None,
            closed_by_name: None,
            closed_date_time: None,
            summary: None,
            completion_date_time: None,
        }
    }

    #[test]
    fn store_writes_set_the_redraw_flag() {
        let dirty = Rc::new(Cell::new(false));
        let page = DevicePage::new("1234", SortOrder::Descending, &dirty);
        assert!(!dirty.get());

        page.store().set(keys::DEVICE, sample_device());
        assert!(dirty.get());

        // Every write notifies again, even with an identical value.
        dirty.set(false);
        page.store().set(keys::DEVICE, sample_device());
        assert!(dirty.get());
    }

    #[test]
    fn device_page_visibility_follows_service_status() {
        let dirty = Rc::new(Cell::new(false));
        let page = DevicePage::new("1234", SortOrder::Descending, &dirty);
        // Nothing loaded yet: no actions apply.
        assert!(!page.can_modify());
        assert!(!page.can_reactivate());

        page.store().set(keys::DEVICE, sample_device());
        assert!(page.can_modify());
        assert!(!page.can_reactivate());

        let mut retired = sample_device();
        retired.service_status = ServiceStatus::Retired;
        page.store().set(keys::DEVICE, retired);
        assert!(!page.can_modify());
        assert!(page.can_reactivate());
    }

    #[test]
    fn begin_update_prepopulates_and_narrows_cascades() {
        let dirty = Rc::new(Cell::new(false));
        let mut page = DevicePage::new("1234", SortOrder::Descending, &dirty);
        page.store().set(keys::DEVICE, sample_device());
        page.store()
            .set(keys::MANUFACTURERS_AND_MODELS, sample_manufacturers());
        page.store()
            .set(keys::FACILITIES_AND_DEPARTMENTS, sample_facilities());

        page.begin_update().unwrap();
        let form = match &page.mode {
            DeviceMode::UpdateForm(form) => form.clone(),
            _ => panic!("expected update form"),
        };
        assert_eq!(form.value(fields::SERIAL), "SN-445");
        assert_eq!(form.value(fields::MANUFACTURER), "Monitor Co.");
        assert_eq!(form.value(fields::MODEL), "Their Best Monitor");
        assert_eq!(form.value(fields::DATE), "2021-06-15");
        assert_eq!(form.value(fields::NOTES), "");
    }

    #[test]
    fn begin_update_requires_loaded_reference_lists() {
        let dirty = Rc::new(Cell::new(false));
        let mut page = DevicePage::new("1234", SortOrder::Descending, &dirty);
        page.store().set(keys::DEVICE, sample_device());
        let err = page.begin_update().unwrap_err();
        assert!(err.contains("still loading"));
    }

    #[test]
    fn manufacturer_change_cascades_to_models() {
        let dirty = Rc::new(Cell::new(false));
        let mut page = DevicePage::new("1234", SortOrder::Descending, &dirty);
        page.store().set(keys::DEVICE, sample_device());
        page.store()
            .set(keys::MANUFACTURERS_AND_MODELS, sample_manufacturers());
        page.store()
            .set(keys::FACILITIES_AND_DEPARTMENTS, sample_facilities());
        page.begin_update().unwrap();

        if let Some(form) = page.form_mut() {
            form.set_value(fields::MANUFACTURER, "Defib Co.");
        }
        page.on_field_changed(fields::MANUFACTURER);

        let form = match &page.mode {
            DeviceMode::UpdateForm(form) => form,
            _ => unreachable!(),
        };
        // The old model is not offered by the new manufacturer.
        assert_eq!(form.value(fields::MODEL), "");
        let mut probe = form.clone();
        probe.set_value(fields::MODEL, "Their Defibrillator");
        probe.set_options(fields::MODEL, vec!["Their Defibrillator".into()]);
        assert_eq!(probe.value(fields::MODEL), "Their Defibrillator");
    }

    #[test]
    fn work_order_selection_and_navigation() {
        let dirty = Rc::new(Cell::new(false));
        let mut page = DevicePage::new("1234", SortOrder::Descending, &dirty);
        page.store().set(
            keys::WORK_ORDERS,
            vec![
                WorkOrderSummary {
                    work_order_id: "WR1".into(),
                    work_order_type: WorkOrderType::Repair,
                    work_order_completion_status: CompletionStatus::Open,
                    creation_date_time: "2023-01-01T00:00:00".into(),
                    completion_date_time: None,
                },
                WorkOrderSummary {
                    work_order_id: "WR2".into(),
                    work_order_type: WorkOrderType::Repair,
                    work_order_completion_status: CompletionStatus::Closed,
                    creation_date_time: "2023-01-02T00:00:00".into(),
                    completion_date_time: Some("2023-01-03T00:00:00".into()),
                },
            ],
        );

        assert_eq!(page.selected_work_order_id().as_deref(), Some("WR1"));
        page.select_next();
        assert_eq!(page.selected_work_order_id().as_deref(), Some("WR2"));
        page.select_next();
        assert_eq!(page.selected_work_order_id().as_deref(), Some("WR2"));
        page.select_prev();
        assert_eq!(page.selected_work_order_id().as_deref(), Some("WR1"));
    }

    #[test]
    fn add_device_request_applies_optional_convention() {
        let mut form = device_form(None, &sample_manufacturers(), &sample_facilities());
        form.set_value(fields::SERIAL, "SN-9");
        form.set_value(fields::MANUFACTURER, "Defib Co.");
        form.set_options(fields::MODEL, vec!["Their Defibrillator".into()]);
        form.set_value(fields::MODEL, "Their Defibrillator");
        form.set_value(fields::FACILITY, "General Hospital");
        form.set_options(fields::DEPARTMENT, vec!["ER".into()]);
        form.set_value(fields::DEPARTMENT, "ER");
        form.set_value(fields::DATE, "   ");

        let request = new_device_from_form(&form);
        assert_eq!(request.serial_number, "SN-9");
        // Whitespace-only input is absent, not an empty string.
        assert_eq!(request.manufacture_date, None);
        assert_eq!(request.notes, None);
    }

    #[test]
    fn work_order_edit_form_round_trips_record() {
        let record = sample_work_order();
        let form = work_order_form(Some(&record));
        assert_eq!(form.value(fields::TYPE), "Repair");
        assert_eq!(form.value(fields::AWAIT), "Awaiting Parts");
        assert_eq!(form.value(fields::REPORTED), "does not power on");

        let edits = work_order_edits_from_form("WR0000000001", &form).unwrap();
        assert_eq!(edits.work_order_type, WorkOrderType::Repair);
        assert_eq!(edits.work_order_await_status, Some(AwaitStatus::AwaitingParts));
        assert_eq!(edits.problem_found, None);
        assert_eq!(edits.summary, None);
    }

    #[test]
    fn blank_await_selection_means_no_status() {
        let mut form = work_order_form(Some(&sample_work_order()));
        form.set_value(fields::AWAIT, "");
        let edits = work_order_edits_from_form("WR1", &form).unwrap();
        assert_eq!(edits.work_order_await_status, None);
    }

    #[test]
    fn closed_work_order_cannot_be_edited() {
        let dirty = Rc::new(Cell::new(false));
        let mut page = WorkOrderPage::new("WR0000000001", &dirty);
        let mut record = sample_work_order();
        record.completion_status = CompletionStatus::Closed;
        page.store().set(keys::WORK_ORDER, record);

        assert!(!page.can_modify());
        let err = page.begin_edit().unwrap_err();
        assert!(err.contains("Closed"));
    }

    #[test]
    fn open_work_order_edit_flow() {
        let dirty = Rc::new(Cell::new(false));
        let mut page = WorkOrderPage::new("WR0000000001", &dirty);
        page.store().set(keys::WORK_ORDER, sample_work_order());

        assert!(page.can_modify());
        page.begin_edit().unwrap();
        assert!(page.form.is_some());
        page.cancel_edit();
        assert!(page.form.is_none());
    }

    #[test]
    fn new_work_order_requires_a_known_type() {
        let form = work_order_form(None);
        let err = new_work_order_from_form("1234", &form).unwrap_err();
        assert!(err.contains("Unknown work order type"));
    }

    #[test]
    fn search_page_selection() {
        let dirty = Rc::new(Cell::new(false));
        let mut page = SearchPage::new(&dirty);
        assert!(page.results().is_none());
        assert!(page.selected_control_number().is_none());

        page.store().set(
            keys::SEARCH_RESULTS,
            vec![sample_device(), {
                let mut second = sample_device();
                second.control_number = "5678".into();
                second
            }],
        );
        assert_eq!(page.selected_control_number().as_deref(), Some("1234"));
        page.select_next();
        assert_eq!(page.selected_control_number().as_deref(), Some("5678"));
        page.select_next();
        assert_eq!(page.selected_control_number().as_deref(), Some("5678"));
    }

    #[test]
    fn each_page_gets_its_own_store() {
        let dirty = Rc::new(Cell::new(false));
        let search = SearchPage::new(&dirty);
        let device = DevicePage::new("1234", SortOrder::Descending, &dirty);

        search.store().set(keys::SEARCH_RESULTS, Vec::<DeviceRecord>::new());
        assert!(search.store().contains(keys::SEARCH_RESULTS));
        assert!(!device.store().contains(keys::SEARCH_RESULTS));
    }
}
