//! Vault CLI — the command-line entry point for the HTM Vault client.
//!
//! # Usage
//!
//! ```text
//! vault device get 1234
//! vault device search infusion pump
//! vault workorder create 1234 --type repair --reported "does not power on"
//! vault refs manufacturers
//! vault tui
//! ```
//!
//! Non-TUI commands run one backend call and print the result, as text
//! or as pretty JSON with `--json`.

use std::process;

use htm_vault_core::cli::{parse_args, usage};
use htm_vault_core::command::Command;
use htm_vault_core::config::{resolve_config_dir, ClientConfig};
use htm_vault_core::types::{
    DeviceEdits, DeviceRecord, NewDevice, NewWorkOrder, WorkOrderEdits, WorkOrderRecord,
    WorkOrderSummary,
};
use htm_vault_core::VaultClient;


fn main() {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();
    let mut arg_refs: Vec<&str> = args[1..].iter().map(|s| s.as_str()).collect();
    let json_output = arg_refs.iter().any(|a| *a == "--json");
    arg_refs.retain(|a| *a != "--json");

    let cmd = match parse_args(&arg_refs) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("vault: {}", e);
            process::exit(1);
        }
    };

    if matches!(cmd, Command::Help) {
        println!("{}", usage());
        return;
    }

    let config_dir = resolve_config_dir();
    log::debug!("using config dir {}", config_dir.display());

    let config = match ClientConfig::load(&config_dir) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("vault: {}", e);
            process::exit(1);
        }
    };

    let client = match VaultClient::new(&config, &config_dir) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("vault: {}", e);
            process::exit(1);
        }
    };

    // Tui is handled directly — hand the client to the terminal UI.
    if matches!(cmd, Command::Tui) {
        match vault_tui::tui::Tui::new(client) {
            Ok(mut tui) => {
                if let Err(e) = tui.run() {
                    eprintln!("vault tui: {}", e);
                    process::exit(1);
                }
            }
            Err(e) => {
                eprintln!("vault tui: failed to start: {}", e);
                process::exit(1);
            }
        }
        return;
    }

    if let Err(e) = execute(&client, &config, cmd, json_output) {
        eprintln!("vault: {}", e);
        process::exit(1);
    }
}


/// Run one backend call and print its result.
fn execute(
    client: &VaultClient,
    config: &ClientConfig,
    cmd: Command,
    json: bool,
) -> Result<(), String> {
    match cmd {
        Command::DeviceAdd {
            serial_number,
            manufacturer,
            model,
            facility,
            department,
            manufacture_date,
            notes,
        } => {
            let request = NewDevice {
                serial_number,
                manufacturer,
                model,
                facility_name: facility,
                assigned_department: department,
                manufacture_date,
                notes,
            };
            let device = client.add_device(&request).map_err(|e| e.to_string())?;
            print_device(&device, json)
        }
        Command::DeviceGet { control_number } => {
            let device = client
                .get_device(&control_number)
                .map_err(|e| e.to_string())?;
            print_device(&device, json)
        }
        Command::DeviceUpdate {
            control_number,
            serial_number,
            manufacturer,
            model,
            facility,
            department,
            manufacture_date,
            notes,
        } => {
            let edits = DeviceEdits {
                control_number,
                serial_number,
                manufacturer,
                model,
                facility_name: facility,
                assigned_department: department,
                manufacture_date,
                notes,
            };
            let device = client.update_device(&edits).map_err(|e| e.to_string())?;
            print_device(&device, json)
        }
        Command::DeviceRetire { control_number } => {
            let device = client
                .retire_device(&control_number)
                .map_err(|e| e.to_string())?;
            print_device(&device, json)
        }
        Command::DeviceReactivate { control_number } => {
            let device = client
                .reactivate_device(&control_number)
                .map_err(|e| e.to_string())?;
            print_device(&device, json)
        }
        Command::DeviceSearch { criteria } => {
            let devices = client
                .search_devices(&criteria)
                .map_err(|e| e.to_string())?;
            print_devices(&devices, json)
        }
        Command::DeviceWorkOrders {
            control_number,
            order,
        } => {
            let order = order.unwrap_or(config.default_order);
            let work_orders = client
                .get_device_work_orders(&control_number, order)
                .map_err(|e| e.to_string())?;
            print_work_orders(&work_orders, json)
        }
        Command::WorkOrderCreate {
            control_number,
            work_order_type,
            problem_reported,
            problem_found,
        } => {
            let request = NewWorkOrder {
                control_number,
                work_order_type,
                problem_reported,
                problem_found,
            };
            let work_orders = client
                .create_work_order(&request, config.default_order)
                .map_err(|e| e.to_string())?;
            print_work_orders(&work_orders, json)
        }
        Command::WorkOrderGet { work_order_id } => {
            let work_order = client
                .get_work_order(&work_order_id)
                .map_err(|e| e.to_string())?;
            print_work_order(&work_order, json)
        }
        Command::WorkOrderUpdate {
            work_order_id,
            work_order_type,
            await_status,
            problem_reported,
            problem_found,
            summary,
            completion_date_time,
        } => {
            let edits = WorkOrderEdits {
                work_order_id,
                work_order_type,
                work_order_await_status: await_status,
                problem_reported,
                problem_found,
                summary,
                completion_date_time,
            };
            let work_order = client
                .update_work_order(&edits)
                .map_err(|e| e.to_string())?;
            print_work_order(&work_order, json)
        }
        Command::WorkOrderClose { work_order_id } => {
            let work_order = client
                .close_work_order(&work_order_id)
                .map_err(|e| e.to_string())?;
            print_work_order(&work_order, json)
        }
        Command::RefsManufacturers => {
            let list = client
                .get_manufacturers_and_models()
                .map_err(|e| e.to_string())?;
            if json {
                println!("{}", to_pretty(&list)?);
            } else {
                for entry in &list {
                    println!("{}: {}", entry.manufacturer, entry.models.join(", "));
                }
            }
            Ok(())
        }
        Command::RefsFacilities => {
            let list = client
                .get_facilities_and_departments()
                .map_err(|e| e.to_string())?;
            if json {
                println!("{}", to_pretty(&list)?);
            } else {
                for entry in &list {
                    println!("{}: {}", entry.facility, entry.departments.join(", "));
                }
            }
            Ok(())
        }
        Command::Tui | Command::Help => unreachable!("handled in main"),
    }
}


// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

fn to_pretty<T: serde::Serialize>(value: &T) -> Result<String, String> {
    serde_json::to_string_pretty(value).map_err(|e| e.to_string())
}

fn opt(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or("")
}

fn print_device(device: &DeviceRecord, json: bool) -> Result<(), String> {
    if json {
        println!("{}", to_pretty(device)?);
        return Ok(());
    }
    println!("Control Number:     {}", device.control_number);
    println!("Serial Number:      {}", device.serial_number);
    println!("Manufacturer:       {}", device.manufacturer);
    println!("Model:              {}", device.model);
    println!("Manufacture Date:   {}", opt(&device.manufacture_date));
    println!("Service Status:     {}", device.service_status.label());
    println!("Facility:           {}", device.facility_name);
    println!("Department:         {}", device.assigned_department);
    println!("Compliance Through: {}", opt(&device.compliance_through_date));
    println!("Last PM Completed:  {}", opt(&device.last_pm_completion_date));
    println!("Next PM Due:        {}", opt(&device.next_pm_due_date));
    println!("PM Frequency:       {} months", device.maintenance_frequency_in_months);
    println!("Added:              {} by {}", device.inventory_add_date, device.added_by_name);
    println!("Notes:              {}", opt(&device.notes));
    Ok(())
}

fn print_devices(devices: &[DeviceRecord], json: bool) -> Result<(), String> {
    if json {
        println!("{}", to_pretty(&devices)?);
        return Ok(());
    }
    if devices.is_empty() {
        println!("No matching devices");
        return Ok(());
    }
    for device in devices {
        println!(
            "{}  {}  {} {}  {}  {}",
            device.control_number,
            device.serial_number,
            device.manufacturer,
            device.model,
            device.facility_name,
            device.service_status.label(),
        );
    }
    Ok(())
}

fn print_work_order(work_order: &WorkOrderRecord, json: bool) -> Result<(), String> {
    if json {
        println!("{}", to_pretty(work_order)?);
        return Ok(());
    }
    println!("Work Order:       {}", work_order.work_order_id);
    println!("Type:             {}", work_order.work_order_type.label());
    println!("Status:           {}", work_order.completion_status.label());
    println!(
        "Await Status:     {}",
        work_order.await_status.map(|a| a.label()).unwrap_or("")
    );
    println!("Device:           {} ({})", work_order.control_number, work_order.serial_number);
    println!("Problem Reported: {}", work_order.problem_reported);
    println!("Problem Found:    {}", opt(&work_order.problem_found));
    println!("Created:          {} by {}", work_order.creation_date_time, work_order.created_by_name);
    println!("Completed:        {}", opt(&work_order.completion_date_time));
    println!("Closed:           {}", opt(&work_order.closed_date_time));
    println!("Summary:          {}", opt(&work_order.summary));
    Ok(())
}

fn print_work_orders(work_orders: &[WorkOrderSummary], json: bool) -> Result<(), String> {
    if json {
        println!("{}", to_pretty(&work_orders)?);
        return Ok(());
    }
    if work_orders.is_empty() {
        println!("No work orders found");
        return Ok(());
    }
    for work_order in work_orders {
        println!(
            "{}  {}  {}  created {}  completed {}",
            work_order.work_order_id,
            work_order.work_order_type.label(),
            work_order.work_order_completion_status.label(),
            work_order.creation_date_time,
            opt(&work_order.completion_date_time),
        );
    }
    Ok(())
}
