use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::types::FieldType;

pub const MAX_CUSTOM_FIELDS: usize = 3;
pub const CUSTOM_FIELD_PREFIX: &str = "custom_";

/// One column definition of the item table for a document type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDef {
    pub id: String,
    pub name: String,
    pub field_type: FieldType,
    pub required: bool,
    pub position: u32,
    pub enabled: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,
}

impl FieldDef {
    pub fn is_custom(&self) -> bool {
        self.id.starts_with(CUSTOM_FIELD_PREFIX)
    }
}

/// The ordered item-table schema for one document type: the fixed built-in
/// columns plus up to [`MAX_CUSTOM_FIELDS`] user-added ones. Persisted as a
/// single JSON blob per document type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldSchema {
    pub fields: Vec<FieldDef>,
}

impl Default for FieldSchema {
    fn default() -> Self {
        let builtin = |id: &str, name: &str, field_type, required, position| FieldDef {
            id: id.to_string(),
            name: name.to_string(),
            field_type,
            required,
            position,
            enabled: true,
            options: Vec::new(),
        };

        FieldSchema {
            fields: vec![
                builtin("description", "Description", FieldType::Text, true, 0),
                builtin("quantity", "Quantity", FieldType::Number, true, 1),
                builtin("unit_price", "Unit Price", FieldType::Number, true, 2),
                builtin("tax", "Tax %", FieldType::Number, false, 3),
            ],
        }
    }
}

impl FieldSchema {
    pub fn enabled_fields(&self) -> impl Iterator<Item = &FieldDef> {
        self.fields.iter().filter(|f| f.enabled)
    }

    pub fn custom_fields(&self) -> impl Iterator<Item = &FieldDef> {
        self.fields.iter().filter(|f| f.is_custom())
    }

    pub fn field(&self, id: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|f| f.id == id)
    }

    /// Appends a custom field. Rejected beyond the custom-field cap and for
    /// names that collide case-insensitively with an existing field.
    pub fn add_custom(
        &mut self,
        name: &str,
        field_type: FieldType,
        required: bool,
        options: Vec<String>,
    ) -> AppResult<()> {
        let name = name.trim();
        if name.is_empty() {
            return Err(AppError::validation("Field name cannot be empty."));
        }
        if self.custom_fields().count() >= MAX_CUSTOM_FIELDS {
            return Err(AppError::validation(format!(
                "At most {MAX_CUSTOM_FIELDS} custom fields are allowed."
            )));
        }
        if self
            .fields
            .iter()
            .any(|f| f.name.eq_ignore_ascii_case(name))
        {
            return Err(AppError::validation(format!(
                "A field named \"{name}\" already exists."
            )));
        }

        let position = self.fields.iter().map(|f| f.position + 1).max().unwrap_or(0);
        self.fields.push(FieldDef {
            id: self.next_custom_id(),
            name: name.to_string(),
            field_type,
            required,
            position,
            enabled: true,
            options,
        });
        Ok(())
    }

    /// Removes a field by id. Only custom fields may be removed; built-ins
    /// are fixed and can merely be disabled.
    pub fn remove(&mut self, id: &str) -> AppResult<()> {
        let field = self
            .field(id)
            .ok_or(AppError::NotFound("template field"))?;
        if !field.is_custom() {
            return Err(AppError::validation(
                "Built-in fields cannot be removed, only disabled.",
            ));
        }
        self.fields.retain(|f| f.id != id);
        Ok(())
    }

    pub fn set_enabled(&mut self, id: &str, enabled: bool) {
        if let Some(field) = self.fields.iter_mut().find(|f| f.id == id) {
            field.enabled = enabled;
        }
    }

    fn next_custom_id(&self) -> String {
        let max = self
            .custom_fields()
            .filter_map(|f| f.id[CUSTOM_FIELD_PREFIX.len()..].parse::<u32>().ok())
            .max()
            .unwrap_or(0);
        format!("{CUSTOM_FIELD_PREFIX}{}", max + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_schema_has_builtins_only() {
        let schema = FieldSchema::default();
        assert_eq!(schema.fields.len(), 4);
        assert_eq!(schema.custom_fields().count(), 0);
        assert!(schema.fields.iter().all(|f| f.enabled));
    }

    #[test]
    fn fourth_custom_field_is_rejected() {
        let mut schema = FieldSchema::default();
        for name in ["Color", "Weight", "Serial"] {
            schema
                .add_custom(name, FieldType::Text, false, Vec::new())
                .unwrap();
        }
        let err = schema
            .add_custom("Origin", FieldType::Text, false, Vec::new())
            .unwrap_err();
        assert!(err.is_validation());
        assert_eq!(schema.custom_fields().count(), MAX_CUSTOM_FIELDS);
    }

    #[test]
    fn duplicate_name_is_rejected_case_insensitively() {
        let mut schema = FieldSchema::default();
        schema
            .add_custom("Color", FieldType::Text, false, Vec::new())
            .unwrap();
        assert!(
            schema
                .add_custom("COLOR", FieldType::Text, false, Vec::new())
                .unwrap_err()
                .is_validation()
        );
        // collides with a built-in as well
        assert!(
            schema
                .add_custom("quantity", FieldType::Number, false, Vec::new())
                .unwrap_err()
                .is_validation()
        );
    }

    #[test]
    fn builtin_removal_is_rejected_custom_removal_succeeds() {
        let mut schema = FieldSchema::default();
        schema
            .add_custom("Color", FieldType::Select, false, vec!["red".into()])
            .unwrap();
        let custom_id = schema.custom_fields().next().unwrap().id.clone();

        assert!(schema.remove("description").unwrap_err().is_validation());
        schema.remove(&custom_id).unwrap();
        assert_eq!(schema.custom_fields().count(), 0);
    }

    #[test]
    fn custom_ids_do_not_repeat_after_removal() {
        let mut schema = FieldSchema::default();
        schema
            .add_custom("A", FieldType::Text, false, Vec::new())
            .unwrap();
        schema
            .add_custom("B", FieldType::Text, false, Vec::new())
            .unwrap();
        schema.remove("custom_1").unwrap();
        schema
            .add_custom("C", FieldType::Text, false, Vec::new())
            .unwrap();
        assert!(schema.field("custom_3").is_some());
    }

    #[test]
    fn disabling_a_builtin_keeps_it_in_the_schema() {
        let mut schema = FieldSchema::default();
        schema.set_enabled("tax", false);
        assert_eq!(schema.enabled_fields().count(), 3);
        assert!(schema.field("tax").is_some());
    }
}
