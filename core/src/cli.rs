//! CLI argument parsing.
//!
//! Hand-rolled parser from argument slices to [`Command`] values.
//! Arguments are expected WITHOUT the program name (i.e. `args` should be
//! `["device", "get", "1234"]`, not `["vault", "device", ...]`).

use crate::command::Command;
use crate::types::{AwaitStatus, SortOrder, WorkOrderType};


/// Parse CLI arguments into a typed [`Command`].
pub fn parse_args(args: &[&str]) -> Result<Command, String> {
    if args.is_empty() {
        return Err("No command specified. Run 'vault help' for usage.".into());
    }

    match args[0] {
        "device" => parse_device(args),
        "workorder" => parse_work_order(args),
        "refs" => parse_refs(args),
        "tui" => Ok(Command::Tui),
        "help" | "--help" | "-h" => Ok(Command::Help),
        _ => Err(format!("Unknown command: '{}'", args[0])),
    }
}


/// Usage text for `vault help` and parse failures.
pub fn usage() -> &'static str {
    "Usage: vault <command>

  device add --serial <sn> --manufacturer <m> --model <mo> \\
             --facility <f> --department <d> [--date <yyyy-mm-dd>] [--notes <text>]
  device get <control-number>
  device update <control-number> --serial <sn> --manufacturer <m> --model <mo> \\
             --facility <f> --department <d> [--date <yyyy-mm-dd>] [--notes <text>]
  device retire <control-number>
  device reactivate <control-number>
  device search <criteria...>
  device workorders <control-number> [--order ascending|descending]

  workorder create <control-number> --type <t> --reported <text> [--found <text>]
  workorder get <id>
  workorder update <id> --type <t> --reported <text> [--await parts|repair]
             [--found <text>] [--summary <text>] [--completed <datetime>]
  workorder close <id>

  refs manufacturers
  refs facilities

  tui
  help

Work order types: repair, preventative-maintenance, acceptance-testing.
Add --json to any non-tui command for raw JSON output."
}


// ---------------------------------------------------------------------------
// Sub-parsers
// ---------------------------------------------------------------------------

/// `vault device <subcommand> ...`
fn parse_device(args: &[&str]) -> Result<Command, String> {
    if args.len() < 2 {
        return Err(
            "Usage: vault device <add|get|update|retire|reactivate|search|workorders>".into(),
        );
    }
    match args[1] {
        "add" => parse_device_add(args),
        "get" => one_id(args, "Usage: vault device get <control-number>")
            .map(|control_number| Command::DeviceGet { control_number }),
        "update" => parse_device_update(args),
        "retire" => one_id(args, "Usage: vault device retire <control-number>")
            .map(|control_number| Command::DeviceRetire { control_number }),
        "reactivate" => one_id(args, "Usage: vault device reactivate <control-number>")
            .map(|control_number| Command::DeviceReactivate { control_number }),
        "search" => parse_device_search(args),
        "workorders" => parse_device_work_orders(args),
        _ => Err(format!("Unknown device subcommand: '{}'", args[1])),
    }
}

/// `vault device add --serial <sn> --manufacturer <m> --model <mo>
///  --facility <f> --department <d> [--date <d>] [--notes <n>]`
fn parse_device_add(args: &[&str]) -> Result<Command, String> {
    let fields = parse_device_fields(&args[2..], "device add")?;
    Ok(Command::DeviceAdd {
        serial_number: fields.serial_number,
        manufacturer: fields.manufacturer,
        model: fields.model,
        facility: fields.facility,
        department: fields.department,
        manufacture_date: fields.manufacture_date,
        notes: fields.notes,
    })
}

/// `vault device update <control-number> --serial <sn> ...`
fn parse_device_update(args: &[&str]) -> Result<Command, String> {
    if args.len() < 3 || args[2].starts_with("--") {
        return Err("Usage: vault device update <control-number> --serial <sn> ...".into());
    }
    let control_number = args[2].to_string();
    let fields = parse_device_fields(&args[3..], "device update")?;
    Ok(Command::DeviceUpdate {
        control_number,
        serial_number: fields.serial_number,
        manufacturer: fields.manufacturer,
        model: fields.model,
        facility: fields.facility,
        department: fields.department,
        manufacture_date: fields.manufacture_date,
        notes: fields.notes,
    })
}

/// `vault device search <criteria...>` — remaining words join into one
/// criteria string.
fn parse_device_search(args: &[&str]) -> Result<Command, String> {
    if args.len() < 3 {
        return Err("Usage: vault device search <criteria...>".into());
    }
    Ok(Command::DeviceSearch {
        criteria: args[2..].join(" "),
    })
}

/// `vault device workorders <control-number> [--order <o>]`
fn parse_device_work_orders(args: &[&str]) -> Result<Command, String> {
    if args.len() < 3 {
        return Err("Usage: vault device workorders <control-number> [--order <o>]".into());
    }
    let control_number = args[2].to_string();
    let mut order = None;

    let rest = &args[3..];
    let mut i = 0;
    while i < rest.len() {
        match rest[i] {
            "--order" => {
                i += 1;
                order = Some(SortOrder::parse(take_arg(rest, i, "--order")?.as_str())?);
            }
            other => return Err(format!("Unknown flag for device workorders: '{}'", other)),
        }
        i += 1;
    }
    Ok(Command::DeviceWorkOrders {
        control_number,
        order,
    })
}

/// `vault workorder <subcommand> ...`
fn parse_work_order(args: &[&str]) -> Result<Command, String> {
    if args.len() < 2 {
        return Err("Usage: vault workorder <create|get|update|close>".into());
    }
    match args[1] {
        "create" => parse_work_order_create(args),
        "get" => one_id(args, "Usage: vault workorder get <id>")
            .map(|work_order_id| Command::WorkOrderGet { work_order_id }),
        "update" => parse_work_order_update(args),
        "close" => one_id(args, "Usage: vault workorder close <id>")
            .map(|work_order_id| Command::WorkOrderClose { work_order_id }),
        _ => Err(format!("Unknown workorder subcommand: '{}'", args[1])),
    }
}

/// `vault workorder create <control-number> --type <t> --reported <text>
///  [--found <text>]`
fn parse_work_order_create(args: &[&str]) -> Result<Command, String> {
    if args.len() < 3 || args[2].starts_with("--") {
        return Err(
            "Usage: vault workorder create <control-number> --type <t> --reported <text>".into(),
        );
    }
    let control_number = args[2].to_string();
    let mut work_order_type = None;
    let mut problem_reported = None;
    let mut problem_found = None;

    let rest = &args[3..];
    let mut i = 0;
    while i < rest.len() {
        match rest[i] {
            "--type" => {
                i += 1;
                work_order_type = Some(parse_work_order_type(take_arg(rest, i, "--type")?.as_str())?);
            }
            "--reported" => {
                i += 1;
                problem_reported = Some(take_arg(rest, i, "--reported")?);
            }
            "--found" => {
                i += 1;
                problem_found = Some(take_arg(rest, i, "--found")?);
            }
            other => return Err(format!("Unknown flag for workorder create: '{}'", other)),
        }
        i += 1;
    }

    Ok(Command::WorkOrderCreate {
        control_number,
        work_order_type: work_order_type.ok_or("workorder create requires --type")?,
        problem_reported: problem_reported.ok_or("workorder create requires --reported")?,
        problem_found,
    })
}

/// `vault workorder update <id> --type <t> --reported <text> [--await <a>]
///  [--found <text>] [--summary <text>] [--completed <datetime>]`
fn parse_work_order_update(args: &[&str]) -> Result<Command, String> {
    if args.len() < 3 || args[2].starts_with("--") {
        return Err("Usage: vault workorder update <id> --type <t> --reported <text> ...".into());
    }
    let work_order_id = args[2].to_string();
    let mut work_order_type = None;
    let mut await_status = None;
    let mut problem_reported = None;
    let mut problem_found = None;
    let mut summary = None;
    let mut completion_date_time = None;

    let rest = &args[3..];
    let mut i = 0;
    while i < rest.len() {
        match rest[i] {
            "--type" => {
                i += 1;
                work_order_type = Some(parse_work_order_type(take_arg(rest, i, "--type")?.as_str())?);
            }
            "--await" => {
                i += 1;
                await_status = Some(parse_await_status(take_arg(rest, i, "--await")?.as_str())?);
            }
            "--reported" => {
                i += 1;
                problem_reported = Some(take_arg(rest, i, "--reported")?);
            }
            "--found" => {
                i += 1;
                problem_found = Some(take_arg(rest, i, "--found")?);
            }
            "--summary" => {
                i += 1;
                summary = Some(take_arg(rest, i, "--summary")?);
            }
            "--completed" => {
                i += 1;
                completion_date_time = Some(take_arg(rest, i, "--completed")?);
            }
            other => return Err(format!("Unknown flag for workorder update: '{}'", other)),
        }
        i += 1;
    }

    Ok(Command::WorkOrderUpdate {
        work_order_id,
        work_order_type: work_order_type.ok_or("workorder update requires --type")?,
        await_status,
        problem_reported: problem_reported.ok_or("workorder update requires --reported")?,
        problem_found,
        summary,
        completion_date_time,
    })
}

/// `vault refs <manufacturers|facilities>`
fn parse_refs(args: &[&str]) -> Result<Command, String> {
    if args.len() < 2 {
        return Err("Usage: vault refs <manufacturers|facilities>".into());
    }
    match args[1] {
        "manufacturers" => Ok(Command::RefsManufacturers),
        "facilities" => Ok(Command::RefsFacilities),
        _ => Err(format!("Unknown refs subcommand: '{}'", args[1])),
    }
}


// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

struct DeviceFields {
    serial_number: String,
    manufacturer: String,
    model: String,
    facility: String,
    department: String,
    manufacture_date: Option<String>,
    notes: Option<String>,
}

/// Shared flag set for `device add` and `device update`.
fn parse_device_fields(rest: &[&str], context: &str) -> Result<DeviceFields, String> {
    let mut serial_number = None;
    let mut manufacturer = None;
    let mut model = None;
    let mut facility = None;
    let mut department = None;
    let mut manufacture_date = None;
    let mut notes = None;

    let mut i = 0;
    while i < rest.len() {
        match rest[i] {
            "--serial" => {
                i += 1;
                serial_number = Some(take_arg(rest, i, "--serial")?);
            }
            "--manufacturer" => {
                i += 1;
                manufacturer = Some(take_arg(rest, i, "--manufacturer")?);
            }
            "--model" => {
                i += 1;
                model = Some(take_arg(rest, i, "--model")?);
            }
            "--facility" => {
                i += 1;
                facility = Some(take_arg(rest, i, "--facility")?);
            }
            "--department" => {
                i += 1;
                department = Some(take_arg(rest, i, "--department")?);
            }
            "--date" => {
                i += 1;
                manufacture_date = Some(take_arg(rest, i, "--date")?);
            }
            "--notes" => {
                i += 1;
                notes = Some(take_arg(rest, i, "--notes")?);
            }
            other => return Err(format!("Unknown flag for {}: '{}'", context, other)),
        }
        i += 1;
    }

    Ok(DeviceFields {
        serial_number: serial_number.ok_or_else(|| format!("{} requires --serial", context))?,
        manufacturer: manufacturer.ok_or_else(|| format!("{} requires --manufacturer", context))?,
        model: model.ok_or_else(|| format!("{} requires --model", context))?,
        facility: facility.ok_or_else(|| format!("{} requires --facility", context))?,
        department: department.ok_or_else(|| format!("{} requires --department", context))?,
        manufacture_date,
        notes,
    })
}

/// Extract the single positional id for two-word subcommands.
fn one_id(args: &[&str], usage: &str) -> Result<String, String> {
    if args.len() < 3 {
        return Err(usage.to_string());
    }
    Ok(args[2].to_string())
}

/// Fetch the value following a flag, or report the flag that is missing one.
fn take_arg(rest: &[&str], i: usize, flag: &str) -> Result<String, String> {
    rest.get(i)
        .map(|s| s.to_string())
        .ok_or_else(|| format!("{} requires a value", flag))
}

fn parse_work_order_type(s: &str) -> Result<WorkOrderType, String> {
    match s.to_ascii_lowercase().as_str() {
        "repair" => Ok(WorkOrderType::Repair),
        "preventative-maintenance" | "pm" => Ok(WorkOrderType::PreventativeMaintenance),
        "acceptance-testing" | "at" => Ok(WorkOrderType::AcceptanceTesting),
        _ => Err(format!(
            "Unknown work order type '{}' (expected repair, preventative-maintenance, or acceptance-testing)",
            s
        )),
    }
}

fn parse_await_status(s: &str) -> Result<AwaitStatus, String> {
    match s.to_ascii_lowercase().as_str() {
        "parts" | "awaiting-parts" => Ok(AwaitStatus::AwaitingParts),
        "repair" | "awaiting-repair" => Ok(AwaitStatus::AwaitingRepair),
        _ => Err(format!(
            "Unknown await status '{}' (expected parts or repair)",
            s
        )),
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_args_is_an_error() {
        assert!(parse_args(&[]).is_err());
    }

    #[test]
    fn unknown_command_is_an_error() {
        let err = parse_args(&["playlist"]).unwrap_err();
        assert!(err.contains("playlist"));
    }

    #[test]
    fn parse_tui_and_help() {
        assert_eq!(parse_args(&["tui"]).unwrap(), Command::Tui);
        assert_eq!(parse_args(&["help"]).unwrap(), Command::Help);
        assert_eq!(parse_args(&["--help"]).unwrap(), Command::Help);
    }

    #[test]
    fn parse_device_get() {
        assert_eq!(
            parse_args(&["device", "get", "1234"]).unwrap(),
            Command::DeviceGet {
                control_number: "1234".into()
            }
        );
        assert!(parse_args(&["device", "get"]).is_err());
    }

    #[test]
    fn parse_device_add_full() {
        let cmd = parse_args(&[
            "device",
            "add",
            "--serial",
            "SN-1",
            "--manufacturer",
            "Monitor Co.",
            "--model",
            "Their Best Monitor",
            "--facility",
            "General Hospital",
            "--department",
            "ICU",
            "--date",
            "2021-06-15",
            "--notes",
            "loaner",
        ])
        .unwrap();
        assert_eq!(
            cmd,
            Command::DeviceAdd {
                serial_number: "SN-1".into(),
                manufacturer: "Monitor Co.".into(),
                model: "Their Best Monitor".into(),
                facility: "General Hospital".into(),
                department: "ICU".into(),
                manufacture_date: Some("2021-06-15".into()),
                notes: Some("loaner".into()),
            }
        );
    }

    #[test]
    fn parse_device_add_requires_serial() {
        let err = parse_args(&[
            "device",
            "add",
            "--manufacturer",
            "Monitor Co.",
            "--model",
            "M1",
            "--facility",
            "F",
            "--department",
            "D",
        ])
        .unwrap_err();
        assert!(err.contains("--serial"));
    }

    #[test]
    fn parse_device_update_requires_control_number() {
        let err = parse_args(&["device", "update", "--serial", "SN-1"]).unwrap_err();
        assert!(err.contains("Usage"));

        let cmd = parse_args(&[
            "device",
            "update",
            "1234",
            "--serial",
            "SN-1",
            "--manufacturer",
            "M",
            "--model",
            "Mo",
            "--facility",
            "F",
            "--department",
            "D",
        ])
        .unwrap();
        match cmd {
            Command::DeviceUpdate {
                control_number,
                manufacture_date,
                notes,
                ..
            } => {
                assert_eq!(control_number, "1234");
                assert_eq!(manufacture_date, None);
                assert_eq!(notes, None);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn parse_device_search_joins_words() {
        assert_eq!(
            parse_args(&["device", "search", "infusion", "pump"]).unwrap(),
            Command::DeviceSearch {
                criteria: "infusion pump".into()
            }
        );
    }

    #[test]
    fn parse_device_workorders_with_order() {
        assert_eq!(
            parse_args(&["device", "workorders", "1234", "--order", "ascending"]).unwrap(),
            Command::DeviceWorkOrders {
                control_number: "1234".into(),
                order: Some(SortOrder::Ascending),
            }
        );
        assert_eq!(
            parse_args(&["device", "workorders", "1234"]).unwrap(),
            Command::DeviceWorkOrders {
                control_number: "1234".into(),
                order: None,
            }
        );
        assert!(parse_args(&["device", "workorders", "1234", "--order", "sideways"]).is_err());
    }

    #[test]
    fn parse_work_order_create() {
        let cmd = parse_args(&[
            "workorder",
            "create",
            "1234",
            "--type",
            "pm",
            "--reported",
            "scheduled maintenance due",
        ])
        .unwrap();
        assert_eq!(
            cmd,
            Command::WorkOrderCreate {
                control_number: "1234".into(),
                work_order_type: WorkOrderType::PreventativeMaintenance,
                problem_reported: "scheduled maintenance due".into(),
                problem_found: None,
            }
        );
    }

    #[test]
    fn parse_work_order_create_requires_type_and_reported() {
        let err =
            parse_args(&["workorder", "create", "1234", "--reported", "x"]).unwrap_err();
        assert!(err.contains("--type"));
        let err = parse_args(&["workorder", "create", "1234", "--type", "repair"]).unwrap_err();
        assert!(err.contains("--reported"));
    }

    #[test]
    fn parse_work_order_update_with_await() {
        let cmd = parse_args(&[
            "workorder",
            "update",
            "WR0000000001",
            "--type",
            "repair",
            "--reported",
            "does not power on",
            "--await",
            "parts",
            "--summary",
            "ordered PSU",
        ])
        .unwrap();
        match cmd {
            Command::WorkOrderUpdate {
                await_status,
                summary,
                completion_date_time,
                ..
            } => {
                assert_eq!(await_status, Some(AwaitStatus::AwaitingParts));
                assert_eq!(summary.as_deref(), Some("ordered PSU"));
                assert_eq!(completion_date_time, None);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn parse_work_order_close() {
        assert_eq!(
            parse_args(&["workorder", "close", "WR0000000001"]).unwrap(),
            Command::WorkOrderClose {
                work_order_id: "WR0000000001".into()
            }
        );
    }

    #[test]
    fn parse_refs() {
        assert_eq!(
            parse_args(&["refs", "manufacturers"]).unwrap(),
            Command::RefsManufacturers
        );
        assert_eq!(
            parse_args(&["refs", "facilities"]).unwrap(),
            Command::RefsFacilities
        );
        assert!(parse_args(&["refs", "departments"]).is_err());
    }

    #[test]
    fn flag_missing_value_is_reported() {
        let err = parse_args(&["device", "workorders", "1234", "--order"]).unwrap_err();
        assert!(err.contains("--order"));
    }

    #[test]
    fn work_order_type_aliases() {
        assert_eq!(
            parse_work_order_type("REPAIR").unwrap(),
            WorkOrderType::Repair
        );
        assert_eq!(
            parse_work_order_type("at").unwrap(),
            WorkOrderType::AcceptanceTesting
        );
        assert!(parse_work_order_type("calibration").is_err());
    }
}
