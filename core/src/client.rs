//! REST client for the HTM Vault backend.
//!
//! [`VaultClient`] issues blocking JSON calls and unwraps the backend's
//! response envelopes: every success body carries one named top-level
//! field (`device`, `workOrders`, ...) and every failure body carries
//! `error_message`. Mutating calls resolve a bearer token *before* any
//! request is built, so an unauthenticated caller fails locally with an
//! operation-specific message.

use std::path::Path;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::auth::TokenProvider;
use crate::config::ClientConfig;
use crate::error::ClientError;
use crate::types::{
    DeviceEdits, DeviceRecord, FacilityDepartments, ManufacturerModels, NewDevice, NewWorkOrder,
    SortOrder, WorkOrderEdits, WorkOrderRecord, WorkOrderSummary,
};


// ---------------------------------------------------------------------------
// Response envelopes
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
struct DeviceEnvelope {
    device: DeviceRecord,
}

#[derive(Deserialize)]
struct DevicesEnvelope {
    devices: Vec<DeviceRecord>,
}

#[derive(Deserialize)]
struct WorkOrderEnvelope {
    #[serde(rename = "workOrder")]
    work_order: WorkOrderRecord,
}

#[derive(Deserialize)]
struct WorkOrdersEnvelope {
    #[serde(rename = "workOrders")]
    work_orders: Vec<WorkOrderSummary>,
}

#[derive(Deserialize)]
struct ManufacturersEnvelope {
    #[serde(rename = "manufacturersAndModels")]
    manufacturers_and_models: Vec<ManufacturerModels>,
}

#[derive(Deserialize)]
struct FacilitiesEnvelope {
    #[serde(rename = "facilitiesAndDepartments")]
    facilities_and_departments: Vec<FacilityDepartments>,
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error_message: String,
}


/// Extract the failure message for a non-success response: the
/// `error_message` field when the body carries one, otherwise the HTTP
/// reason phrase.
fn normalize_error(body: &str, reason: Option<&str>) -> String {
    match serde_json::from_str::<ErrorEnvelope>(body) {
        Ok(envelope) => envelope.error_message,
        Err(_) => reason.unwrap_or("request failed").to_string(),
    }
}


// ---------------------------------------------------------------------------
// VaultClient
// ---------------------------------------------------------------------------

/// Blocking client for the HTM Vault REST API.
pub struct VaultClient {
    http: reqwest::blocking::Client,
    base_url: String,
    tokens: TokenProvider,
}


impl VaultClient {
    /// Build a client from loaded configuration.
    pub fn new(config: &ClientConfig, config_dir: &Path) -> Result<Self, ClientError> {
        let tokens = TokenProvider::new(config.token_path(config_dir));
        Self::with_parts(&config.api_base_url, tokens)
    }

    /// Build a client from a base URL and an explicit token provider.
    pub fn with_parts(base_url: &str, tokens: TokenProvider) -> Result<Self, ClientError> {
        let http = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()?;
        let mut base_url = base_url.to_string();
        if !base_url.ends_with('/') {
            base_url.push('/');
        }
        Ok(VaultClient {
            http,
            base_url,
            tokens,
        })
    }

    /// The normalized base URL this client targets.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Whether a bearer token is currently available.
    pub fn is_logged_in(&self) -> bool {
        self.tokens.is_logged_in()
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Send a prepared request and unwrap the response: failure statuses
    /// become `Api` errors with the normalized message, success bodies
    /// decode into the expected envelope.
    fn execute<T: DeserializeOwned>(
        &self,
        request: reqwest::blocking::RequestBuilder,
        context: &str,
    ) -> Result<T, ClientError> {
        let response = request.send()?;
        let status = response.status();
        let body = response.text()?;

        if !status.is_success() {
            let message = normalize_error(&body, status.canonical_reason());
            log::error!("{} failed ({}): {}", context, status.as_u16(), message);
            return Err(ClientError::Api {
                status: status.as_u16(),
                message,
            });
        }

        serde_json::from_str(&body).map_err(|e| {
            log::error!("{}: unexpected response shape: {}", context, e);
            ClientError::Decode(format!("{}: {}", context, e))
        })
    }

    // -----------------------------------------------------------------------
    // Devices
    // -----------------------------------------------------------------------

    /// Fetch one device by control number.
    pub fn get_device(&self, control_number: &str) -> Result<DeviceRecord, ClientError> {
        log::debug!("GET devices/{}", control_number);
        let request = self.http.get(self.url(&format!("devices/{}", control_number)));
        let envelope: DeviceEnvelope = self.execute(request, "get device")?;
        Ok(envelope.device)
    }

    /// Search the inventory by free-text criteria.
    pub fn search_devices(&self, criteria: &str) -> Result<Vec<DeviceRecord>, ClientError> {
        log::debug!("GET devices/search q={:?}", criteria);
        let request = self
            .http
            .get(self.url("devices/search"))
            .query(&[("q", criteria)]);
        let envelope: DevicesEnvelope = self.execute(request, "search devices")?;
        Ok(envelope.devices)
    }

    /// Add a new device to the inventory.
    pub fn add_device(&self, device: &NewDevice) -> Result<DeviceRecord, ClientError> {
        let token = self
            .tokens
            .token_or_err("Only authenticated users can add devices.")?;
        log::debug!("POST devices serial={}", device.serial_number);
        let request = self
            .http
            .post(self.url("devices"))
            .bearer_auth(token)
            .json(device);
        let envelope: DeviceEnvelope = self.execute(request, "add device")?;
        Ok(envelope.device)
    }

    /// Update an existing device's editable fields.
    pub fn update_device(&self, edits: &DeviceEdits) -> Result<DeviceRecord, ClientError> {
        let token = self
            .tokens
            .token_or_err("Only authenticated users can update devices.")?;
        log::debug!("PUT devices/{}", edits.control_number);
        let request = self
            .http
            .put(self.url(&format!("devices/{}", edits.control_number)))
            .bearer_auth(token)
            .json(edits);
        let envelope: DeviceEnvelope = self.execute(request, "update device")?;
        Ok(envelope.device)
    }

    /// Retire (soft-delete) a device. The backend refuses while open
    /// work orders exist.
    pub fn retire_device(&self, control_number: &str) -> Result<DeviceRecord, ClientError> {
        let token = self
            .tokens
            .token_or_err("Only authenticated users can retire devices.")?;
        log::debug!("DELETE devices/{}", control_number);
        let request = self
            .http
            .delete(self.url(&format!("devices/{}", control_number)))
            .bearer_auth(token);
        let envelope: DeviceEnvelope = self.execute(request, "retire device")?;
        Ok(envelope.device)
    }

    /// Return a retired device to service.
    pub fn reactivate_device(&self, control_number: &str) -> Result<DeviceRecord, ClientError> {
        let token = self
            .tokens
            .token_or_err("Only authenticated users can reactivate devices.")?;
        log::debug!("PUT devices/reactivate/{}", control_number);
        let request = self
            .http
            .put(self.url(&format!("devices/reactivate/{}", control_number)))
            .bearer_auth(token)
            .json(&serde_json::json!({ "controlNumber": control_number }));
        let envelope: DeviceEnvelope = self.execute(request, "reactivate device")?;
        Ok(envelope.device)
    }

    // -----------------------------------------------------------------------
    // Work orders
    // -----------------------------------------------------------------------

    /// Fetch a device's work-order summaries in the given order.
    pub fn get_device_work_orders(
        &self,
        control_number: &str,
        order: SortOrder,
    ) -> Result<Vec<WorkOrderSummary>, ClientError> {
        log::debug!("GET devices/{}/workOrders order={}", control_number, order);
        let request = self
            .http
            .get(self.url(&format!("devices/{}/workOrders", control_number)))
            .query(&[("order", order.as_str())]);
        let envelope: WorkOrdersEnvelope = self.execute(request, "get device work orders")?;
        Ok(envelope.work_orders)
    }

    /// Open a work order against a device. Returns the device's
    /// refreshed summary list in the requested order.
    pub fn create_work_order(
        &self,
        work_order: &NewWorkOrder,
        order: SortOrder,
    ) -> Result<Vec<WorkOrderSummary>, ClientError> {
        let token = self
            .tokens
            .token_or_err("Only authenticated users can create work orders.")?;
        log::debug!("POST workOrders device={}", work_order.control_number);
        let request = self
            .http
            .post(self.url("workOrders"))
            .query(&[("order", order.as_str())])
            .bearer_auth(token)
            .json(work_order);
        let envelope: WorkOrdersEnvelope = self.execute(request, "create work order")?;
        Ok(envelope.work_orders)
    }

    /// Fetch one work order by id.
    pub fn get_work_order(&self, work_order_id: &str) -> Result<WorkOrderRecord, ClientError> {
        log::debug!("GET workOrders/{}", work_order_id);
        let request = self
            .http
            .get(self.url(&format!("workOrders/{}", work_order_id)));
        let envelope: WorkOrderEnvelope = self.execute(request, "get work order")?;
        Ok(envelope.work_order)
    }

    /// Update an open work order's editable fields.
    pub fn update_work_order(
        &self,
        edits: &WorkOrderEdits,
    ) -> Result<WorkOrderRecord, ClientError> {
        let token = self
            .tokens
            .token_or_err("Only authenticated users can update work orders.")?;
        log::debug!("PUT workOrders/{}", edits.work_order_id);
        let request = self
            .http
            .put(self.url(&format!("workOrders/{}", edits.work_order_id)))
            .bearer_auth(token)
            .json(edits);
        let envelope: WorkOrderEnvelope = self.execute(request, "update work order")?;
        Ok(envelope.work_order)
    }

    /// Close an open work order.
    pub fn close_work_order(&self, work_order_id: &str) -> Result<WorkOrderRecord, ClientError> {
        let token = self
            .tokens
            .token_or_err("Only authenticated users can close work orders.")?;
        log::debug!("PUT workOrders/close/{}", work_order_id);
        let request = self
            .http
            .put(self.url(&format!("workOrders/close/{}", work_order_id)))
            .bearer_auth(token)
            .json(&serde_json::json!({ "workOrderId": work_order_id }));
        let envelope: WorkOrderEnvelope = self.execute(request, "close work order")?;
        Ok(envelope.work_order)
    }

    // -----------------------------------------------------------------------
    // Reference lists
    // -----------------------------------------------------------------------

    /// Fetch the manufacturer → models reference list.
    pub fn get_manufacturers_and_models(
        &self,
    ) -> Result<Vec<ManufacturerModels>, ClientError> {
        log::debug!("GET manufacturersAndModels");
        let request = self.http.get(self.url("manufacturersAndModels"));
        let envelope: ManufacturersEnvelope =
            self.execute(request, "get manufacturers and models")?;
        Ok(envelope.manufacturers_and_models)
    }

    /// Fetch the facility → departments reference list.
    pub fn get_facilities_and_departments(
        &self,
    ) -> Result<Vec<FacilityDepartments>, ClientError> {
        log::debug!("GET facilitiesAndDepartments");
        let request = self.http.get(self.url("facilitiesAndDepartments"));
        let envelope: FacilitiesEnvelope =
            self.execute(request, "get facilities and departments")?;
        Ok(envelope.facilities_and_departments)
    }
}
