use crate::models::{Property, PropertyDraft};
use anyhow::{bail, Context, Result};

pub const ADD_LABEL: &str = "Add property";
pub const UPDATE_LABEL: &str = "Update property";

/// Editable field of the main form
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Address,
    Price,
    Size,
    Description,
}

impl FormField {
    pub fn parse(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "address" => Some(Self::Address),
            "price" => Some(Self::Price),
            "size" => Some(Self::Size),
            "description" => Some(Self::Description),
            _ => None,
        }
    }
}

/// Main form. Fields hold text as typed; `staged_id` selects the mode:
/// `None` creates, `Some(id)` updates that record.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PropertyForm {
    pub staged_id: Option<i64>,
    pub address: String,
    pub price: String,
    pub size: String,
    pub description: String,
}

impl PropertyForm {
    pub fn submit_label(&self) -> &'static str {
        if self.staged_id.is_some() {
            UPDATE_LABEL
        } else {
            ADD_LABEL
        }
    }

    pub fn set(&mut self, field: FormField, value: impl Into<String>) {
        let value = value.into();
        match field {
            FormField::Address => self.address = value,
            FormField::Price => self.price = value,
            FormField::Size => self.size = value,
            FormField::Description => self.description = value,
        }
    }

    /// Load a fetched record into the form and switch to update mode
    pub fn fill_from(&mut self, property: &Property) {
        self.staged_id = Some(property.id);
        self.address = property.address.clone();
        self.price = property.price.to_string();
        self.size = property.size.to_string();
        self.description = property.description_or_empty().to_string();
    }

    /// Build the request body. Price and size must be finite numbers.
    pub fn to_draft(&self) -> Result<PropertyDraft> {
        let price = parse_number("Price", &self.price)?;
        let size = parse_number("Size", &self.size)?;

        Ok(PropertyDraft {
            address: self.address.clone(),
            price,
            size,
            description: self.description.clone(),
        })
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

fn parse_number(label: &str, raw: &str) -> Result<f64> {
    let value = raw
        .trim()
        .parse::<f64>()
        .with_context(|| format!("{} is not a number: {:?}", label, raw))?;
    if !value.is_finite() {
        bail!("{} is not a finite number: {:?}", label, raw);
    }
    Ok(value)
}

/// Everything the page shows
#[derive(Debug, Clone, Default)]
pub struct ViewState {
    pub form: PropertyForm,
    /// Text typed into the lookup-for-edit form
    pub edit_lookup: String,
    /// Text typed into the lookup-for-delete form
    pub delete_lookup: String,
    /// Rendered listing markup, replaced wholesale on each render
    pub listing: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn staged_id_drives_label() {
        let mut form = PropertyForm::default();
        assert_eq!(form.submit_label(), ADD_LABEL);

        form.fill_from(&Property {
            id: 4,
            address: "Pine Rd".to_string(),
            price: 350000.0,
            size: 95.5,
            description: None,
        });
        assert_eq!(form.staged_id, Some(4));
        assert_eq!(form.submit_label(), UPDATE_LABEL);
        assert_eq!(form.price, "350000");
        assert_eq!(form.size, "95.5");
        assert_eq!(form.description, "");

        form.reset();
        assert_eq!(form, PropertyForm::default());
    }

    #[test]
    fn draft_parses_numbers() {
        let mut form = PropertyForm::default();
        form.set(FormField::Address, "Oak Ave");
        form.set(FormField::Price, " 200000 ");
        form.set(FormField::Size, "80");

        let draft = form.to_draft().unwrap();
        assert_eq!(draft.price, 200000.0);
        assert_eq!(draft.size, 80.0);
        assert_eq!(draft.description, "");

        form.set(FormField::Size, "eighty");
        assert!(form.to_draft().is_err());
    }

    #[test]
    fn draft_rejects_non_finite_numbers() {
        let mut form = PropertyForm::default();
        form.set(FormField::Address, "Oak Ave");
        form.set(FormField::Size, "80");

        for raw in ["NaN", "inf", "-infinity"] {
            form.set(FormField::Price, raw);
            assert!(form.to_draft().is_err(), "price {:?} accepted", raw);
        }

        form.set(FormField::Price, "200000");
        form.set(FormField::Size, "inf");
        assert!(form.to_draft().is_err());
    }

    #[test]
    fn field_names_parse() {
        assert_eq!(FormField::parse("Price"), Some(FormField::Price));
        assert_eq!(FormField::parse("rooms"), None);
    }
}
