//! Validation of extracted records.
//!
//! Two independent checks live here:
//!
//! - [`equipment`]: controlled-vocabulary checks on equipment classes and
//!   types, reported as findings under an [`EquipmentPolicy`]
//! - record schemas: every new domain record is checked against an embedded
//!   JSON Schema (draft 7) before it is merged onto a template
//!
//! # Embedded Schemas
//!
//! Schemas are embedded at compile time from the `schemas/` directory:
//! `facility.json`, `location.json`, `space.json`, `equipment.json`.

pub mod equipment;
pub mod vocabulary;

pub use equipment::{render_report, EquipmentPolicy, EquipmentValidator};
pub use vocabulary::EquipmentVocabulary;

use jsonschema::Validator;
use once_cell::sync::Lazy;
use serde_json::Value;

use crate::models::{Domain, Row};

static FACILITY_SCHEMA: Lazy<Validator> =
    Lazy::new(|| compile(include_str!("../../schemas/facility.json")));
static LOCATION_SCHEMA: Lazy<Validator> =
    Lazy::new(|| compile(include_str!("../../schemas/location.json")));
static SPACE_SCHEMA: Lazy<Validator> =
    Lazy::new(|| compile(include_str!("../../schemas/space.json")));
static EQUIPMENT_SCHEMA: Lazy<Validator> =
    Lazy::new(|| compile(include_str!("../../schemas/equipment.json")));

fn compile(raw: &str) -> Validator {
    let schema: Value = serde_json::from_str(raw).expect("Invalid embedded schema");
    jsonschema::draft7::new(&schema).expect("Invalid embedded schema")
}

fn schema_for(domain: Domain) -> &'static Validator {
    match domain {
        Domain::Facility => &FACILITY_SCHEMA,
        Domain::Location => &LOCATION_SCHEMA,
        Domain::Space => &SPACE_SCHEMA,
        Domain::Equipment => &EQUIPMENT_SCHEMA,
    }
}

/// Validate a JSON value against a schema.
///
/// # Returns
/// * `Ok(())` when valid
/// * `Err(Vec<String>)` with one message per violation
///
/// # Example
/// ```ignore
/// use serde_json::json;
/// use onboard::validation::validate;
///
/// let schema = json!({
///     "type": "object",
///     "required": ["name*"],
/// });
/// assert!(validate(&schema, &json!({ "name*": "Tower" })).is_ok());
/// assert!(validate(&schema, &json!({})).is_err());
/// ```
pub fn validate(schema: &Value, data: &Value) -> Result<(), Vec<String>> {
    let validator =
        jsonschema::draft7::new(schema).map_err(|e| vec![format!("Invalid schema: {}", e)])?;
    collect_errors(&validator, data)
}

/// Validate a new record against its domain's embedded schema.
pub fn validate_record(domain: Domain, record: &Row) -> Result<(), Vec<String>> {
    collect_errors(schema_for(domain), &Value::Object(record.clone()))
}

/// Quick check against a domain schema.
pub fn is_valid_record(domain: Domain, record: &Row) -> bool {
    schema_for(domain).is_valid(&Value::Object(record.clone()))
}

fn collect_errors(validator: &Validator, data: &Value) -> Result<(), Vec<String>> {
    let errors: Vec<String> = validator.iter_errors(data).map(|e| e.to_string()).collect();

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
