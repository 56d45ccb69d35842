use serde::{Deserialize, Serialize};


/// A manufacturer and the device models it offers. The add/update device
/// forms cascade from this: picking a manufacturer narrows the model
/// options to its `models` list.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ManufacturerModels {
    pub manufacturer: String,
    pub models: Vec<String>,
}


/// A facility and its departments, cascading the same way as
/// [`ManufacturerModels`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FacilityDepartments {
    pub facility: String,
    pub departments: Vec<String>,
}


/// Find the model list for a manufacturer, or an empty slice when the
/// selection is not in the reference list.
pub fn models_for<'a>(list: &'a [ManufacturerModels], manufacturer: &str) -> &'a [String] {
    list.iter()
        .find(|entry| entry.manufacturer == manufacturer)
        .map(|entry| entry.models.as_slice())
        .unwrap_or(&[])
}

/// Find the department list for a facility, or an empty slice.
pub fn departments_for<'a>(list: &'a [FacilityDepartments], facility: &str) -> &'a [String] {
    list.iter()
        .find(|entry| entry.facility == facility)
        .map(|entry| entry.departments.as_slice())
        .unwrap_or(&[])
}


#[cfg(test)]
mod tests {
    use super::*;

    fn manufacturers() -> Vec<ManufacturerModels> {
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

    #[test]
    fn manufacturer_models_round_trip() {
        let list = manufacturers();
        let json = serde_json::to_string(&list).unwrap();
        let back: Vec<ManufacturerModels> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, list);
    }

    #[test]
    fn models_for_known_manufacturer() {
        let list = manufacturers();
        let models = models_for(&list, "Monitor Co.");
        assert_eq!(models.len(), 2);
        assert_eq!(models[0], "Their Best Monitor");
    }

    #[test]
    fn models_for_unknown_manufacturer_is_empty() {
        let list = manufacturers();
        assert!(models_for(&list, "Nobody Inc.").is_empty());
    }

    #[test]
    fn departments_for_facility() {
        let list = vec![FacilityDepartments {
            facility: "General Hospital".into(),
            departments: vec!["ICU".into(), "ER".into()],
        }];
        assert_eq!(departments_for(&list, "General Hospital"), ["ICU", "ER"]);
        assert!(departments_for(&list, "Elsewhere").is_empty());
    }
}
