use serde::Serialize;

use crate::errors::ValidationError;
use crate::models::{FieldEdit, FlagField, TextField, TextKind};

/// Everything the user has entered so far. Starts out empty.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormState {
    pub company: String,
    pub typename: String,
    pub cpu_brand: String,
    pub gpu_brand: String,
    pub inches: String,
    pub weight: String,
    pub touchscreen: bool,
    pub ips: bool,
    pub fullhd: bool,
    pub os: String,
    pub ram: String,
}

/// Body of the POST sent to the prediction service.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionRequest {
    pub company: String,
    pub typename: String,
    pub cpu_brand: String,
    pub gpu_brand: String,
    pub inches: f64,
    pub weight: f64,
    pub touchscreen: bool,
    pub ips: bool,
    pub fullhd: bool,
    pub os: String,
    pub ram: String,
}

const TEXT_FIELDS: [TextField; 8] = [
    TextField::Company,
    TextField::TypeName,
    TextField::CpuBrand,
    TextField::GpuBrand,
    TextField::Inches,
    TextField::Weight,
    TextField::Os,
    TextField::Ram,
];

impl FormState {
    pub fn text(&self, field: TextField) -> &str {
        match field {
            TextField::Company => &self.company,
            TextField::TypeName => &self.typename,
            TextField::CpuBrand => &self.cpu_brand,
            TextField::GpuBrand => &self.gpu_brand,
            TextField::Inches => &self.inches,
            TextField::Weight => &self.weight,
            TextField::Os => &self.os,
            TextField::Ram => &self.ram,
        }
    }

    fn text_mut(&mut self, field: TextField) -> &mut String {
        match field {
            TextField::Company => &mut self.company,
            TextField::TypeName => &mut self.typename,
            TextField::CpuBrand => &mut self.cpu_brand,
            TextField::GpuBrand => &mut self.gpu_brand,
            TextField::Inches => &mut self.inches,
            TextField::Weight => &mut self.weight,
            TextField::Os => &mut self.os,
            TextField::Ram => &mut self.ram,
        }
    }

    pub fn flag(&self, field: FlagField) -> bool {
        match field {
            FlagField::Touchscreen => self.touchscreen,
            FlagField::Ips => self.ips,
            FlagField::FullHd => self.fullhd,
        }
    }

    fn flag_mut(&mut self, field: FlagField) -> &mut bool {
        match field {
            FlagField::Touchscreen => &mut self.touchscreen,
            FlagField::Ips => &mut self.ips,
            FlagField::FullHd => &mut self.fullhd,
        }
    }

    /// Replaces exactly one field. No validation happens here.
    pub fn apply(&mut self, edit: FieldEdit) {
        match edit {
            FieldEdit::Text(field, value) => *self.text_mut(field) = value,
            FieldEdit::Flag(field, value) => *self.flag_mut(field) = value,
        }
    }

    /// Value-in, value-out variant of [`FormState::apply`].
    pub fn with(mut self, edit: FieldEdit) -> Self {
        self.apply(edit);
        self
    }

    /// Checks every control constraint and returns all violations, in form order.
    pub fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();
        for field in TEXT_FIELDS {
            let raw = self.text(field).trim();
            let label = field.label();
            if raw.is_empty() {
                errors.push(ValidationError::Required(label));
                continue;
            }
            match field.kind() {
                TextKind::Select(options) => {
                    if !options.contains(&raw) {
                        errors.push(ValidationError::UnknownOption {
                            field: label,
                            value: raw.to_string(),
                        });
                    }
                }
                TextKind::Number(bounds) => match parse_number(raw) {
                    None => errors.push(ValidationError::NotANumber {
                        field: label,
                        value: raw.to_string(),
                    }),
                    Some(value) if !bounds.contains(value) => {
                        errors.push(ValidationError::OutOfRange {
                            field: label,
                            min: bounds.min,
                            max: bounds.max,
                        })
                    }
                    Some(value) if !bounds.on_step(value) => {
                        errors.push(ValidationError::OffStep {
                            field: label,
                            min: bounds.min,
                            step: bounds.step,
                        })
                    }
                    Some(_) => {}
                },
            }
        }
        errors
    }

    /// Builds the request body, or every reason the form cannot be sent yet.
    pub fn to_request(&self) -> Result<PredictionRequest, Vec<ValidationError>> {
        let errors = self.validate();
        if !errors.is_empty() {
            return Err(errors);
        }
        // validate() guarantees both parse to finite numbers
        let inches = parse_number(self.inches.trim()).unwrap_or(f64::NAN);
        let weight = parse_number(self.weight.trim()).unwrap_or(f64::NAN);
        Ok(PredictionRequest {
            company: self.company.trim().to_string(),
            typename: self.typename.trim().to_string(),
            cpu_brand: self.cpu_brand.trim().to_string(),
            gpu_brand: self.gpu_brand.trim().to_string(),
            inches,
            weight,
            touchscreen: self.touchscreen,
            ips: self.ips,
            fullhd: self.fullhd,
            os: self.os.trim().to_string(),
            ram: self.ram.trim().to_string(),
        })
    }
}

/// Parses a numeric input, refusing anything that is not a finite number.
pub fn parse_number(raw: &str) -> Option<f64> {
    raw.parse::<f64>().ok().filter(|v| v.is_finite())
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn dell_notebook() -> FormState {
        FormState {
            company: "Dell".into(),
            typename: "Notebook".into(),
            cpu_brand: "Intel i5".into(),
            gpu_brand: "Intel".into(),
            inches: "15.6".into(),
            weight: "2.1".into(),
            touchscreen: false,
            ips: true,
            fullhd: true,
            os: "Windows 10".into(),
            ram: "8".into(),
        }
    }

    #[test]
    fn new_form_is_empty() {
        let form = FormState::default();
        assert!(form.company.is_empty());
        assert!(!form.touchscreen && !form.ips && !form.fullhd);
        assert_eq!(form.validate().len(), 8);
    }

    #[test]
    fn edit_replaces_only_its_field() {
        let before = dell_notebook();
        let after = before
            .clone()
            .with(FieldEdit::Text(TextField::Company, "HP".into()));
        assert_eq!(after.company, "HP");
        assert_eq!(
            FormState { company: before.company.clone(), ..after.clone() },
            before
        );

        let after = before.clone().with(FieldEdit::Flag(FlagField::Touchscreen, true));
        assert!(after.touchscreen);
        assert_eq!(FormState { touchscreen: false, ..after }, before);
    }

    #[test]
    fn edits_to_different_fields_commute() {
        let edits = [
            FieldEdit::Text(TextField::Company, "Asus".into()),
            FieldEdit::Text(TextField::Inches, "14".into()),
            FieldEdit::Flag(FlagField::Ips, true),
            FieldEdit::Text(TextField::Ram, "16".into()),
        ];
        let forward = edits
            .iter()
            .cloned()
            .fold(FormState::default(), FormState::with);
        let backward = edits
            .iter()
            .rev()
            .cloned()
            .fold(FormState::default(), FormState::with);
        assert_eq!(forward, backward);
    }

    #[test]
    fn last_write_to_a_field_wins() {
        let form = FormState::default()
            .with(FieldEdit::Text(TextField::Os, "Linux".into()))
            .with(FieldEdit::Flag(FlagField::FullHd, true))
            .with(FieldEdit::Text(TextField::Os, "macOS".into()))
            .with(FieldEdit::Flag(FlagField::FullHd, false));
        assert_eq!(form.os, "macOS");
        assert!(!form.fullhd);
    }

    #[test]
    fn complete_form_builds_request() {
        let request = dell_notebook().to_request().expect("valid form");
        assert_eq!(request.inches, 15.6);
        assert_eq!(request.weight, 2.1);
        assert_eq!(request.ram, "8");

        let body = serde_json::to_value(&request).unwrap();
        assert_eq!(body["inches"], serde_json::json!(15.6));
        assert_eq!(body["touchscreen"], serde_json::json!(false));
        assert_eq!(body["cpu_brand"], serde_json::json!("Intel i5"));
        assert_eq!(body.as_object().unwrap().len(), 11);
    }

    #[test]
    fn empty_required_field_blocks_request() {
        let form = dell_notebook().with(FieldEdit::Text(TextField::GpuBrand, String::new()));
        let errors = form.to_request().unwrap_err();
        assert_eq!(errors, vec![ValidationError::Required("GPU Brand")]);
    }

    #[test]
    fn numeric_constraints_are_enforced() {
        let form = dell_notebook()
            .with(FieldEdit::Text(TextField::Inches, "9.9".into()))
            .with(FieldEdit::Text(TextField::Weight, "abc".into()));
        let errors = form.validate();
        assert!(matches!(errors[0], ValidationError::OutOfRange { field: "Inches", .. }));
        assert!(matches!(errors[1], ValidationError::NotANumber { field: "Weight", .. }));

        let form = dell_notebook().with(FieldEdit::Text(TextField::Weight, "2.15".into()));
        assert!(matches!(form.validate()[0], ValidationError::OffStep { .. }));

        let form = dell_notebook().with(FieldEdit::Text(TextField::Inches, "inf".into()));
        assert!(matches!(form.validate()[0], ValidationError::NotANumber { .. }));
    }

    #[test]
    fn unknown_option_is_rejected() {
        let form = dell_notebook().with(FieldEdit::Text(TextField::Company, "Commodore".into()));
        assert!(matches!(
            form.validate().as_slice(),
            [ValidationError::UnknownOption { field: "Company", .. }]
        ));
    }
}
