use chrono::{DateTime, Local};

use crate::options::{
    COMPANIES, CPU_BRANDS, GPU_BRANDS, INCHES_BOUNDS, NumberBounds, OPERATING_SYSTEMS, RAM_SIZES,
    TYPE_NAMES, WEIGHT_BOUNDS,
};

/// Form fields holding text: the select boxes and the two numeric inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextField {
    Company,
    TypeName,
    CpuBrand,
    GpuBrand,
    Inches,
    Weight,
    Os,
    Ram,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FlagField {
    Touchscreen,
    Ips,
    FullHd,
}

/// What kind of control renders a text field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TextKind {
    Select(&'static [&'static str]),
    Number(NumberBounds),
}

impl TextField {
    pub fn label(self) -> &'static str {
        match self {
            TextField::Company => "Company",
            TextField::TypeName => "Type Name",
            TextField::CpuBrand => "CPU Brand",
            TextField::GpuBrand => "GPU Brand",
            TextField::Inches => "Inches",
            TextField::Weight => "Weight",
            TextField::Os => "Operating System",
            TextField::Ram => "RAM (GB)",
        }
    }

    /// Prompt shown while a select box has nothing chosen.
    pub fn placeholder(self) -> &'static str {
        match self {
            TextField::Company => "Select Company",
            TextField::TypeName => "Select Type",
            TextField::CpuBrand => "Select CPU Brand",
            TextField::GpuBrand => "Select GPU Brand",
            TextField::Os => "Select OS",
            TextField::Ram => "Select RAM",
            TextField::Inches => "10 - 20",
            TextField::Weight => "0.5 - 10",
        }
    }

    pub fn kind(self) -> TextKind {
        match self {
            TextField::Company => TextKind::Select(COMPANIES),
            TextField::TypeName => TextKind::Select(TYPE_NAMES),
            TextField::CpuBrand => TextKind::Select(CPU_BRANDS),
            TextField::GpuBrand => TextKind::Select(GPU_BRANDS),
            TextField::Os => TextKind::Select(OPERATING_SYSTEMS),
            TextField::Ram => TextKind::Select(RAM_SIZES),
            TextField::Inches => TextKind::Number(INCHES_BOUNDS),
            TextField::Weight => TextKind::Number(WEIGHT_BOUNDS),
        }
    }
}

impl FlagField {
    pub fn label(self) -> &'static str {
        match self {
            FlagField::Touchscreen => "Touchscreen",
            FlagField::Ips => "IPS",
            FlagField::FullHd => "Full HD",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Text(TextField),
    Flag(FlagField),
}

impl Field {
    pub fn label(self) -> &'static str {
        match self {
            Field::Text(f) => f.label(),
            Field::Flag(f) => f.label(),
        }
    }
}

/// Fields in the order they appear on screen.
pub const FORM_ORDER: [Field; 11] = [
    Field::Text(TextField::Company),
    Field::Text(TextField::TypeName),
    Field::Text(TextField::CpuBrand),
    Field::Text(TextField::GpuBrand),
    Field::Text(TextField::Inches),
    Field::Text(TextField::Weight),
    Field::Flag(FlagField::Touchscreen),
    Field::Flag(FlagField::Ips),
    Field::Flag(FlagField::FullHd),
    Field::Text(TextField::Os),
    Field::Text(TextField::Ram),
];

/// A single edit coming from a form control.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldEdit {
    Text(TextField, String),
    Flag(FlagField, bool),
}

/// Where keyboard input goes: one of the form rows or the submit button.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum FocusArea {
    Field(Field),
    Submit,
}

impl FocusArea {
    pub const COUNT: usize = FORM_ORDER.len() + 1;

    pub fn from_index(index: usize) -> Self {
        FORM_ORDER
            .get(index)
            .copied()
            .map(FocusArea::Field)
            .unwrap_or(FocusArea::Submit)
    }
}

/// A settled price, already converted to the display currency.
#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    pub base_price: f64,
    pub local_price: f64,
    pub settled_at: DateTime<Local>,
}

impl Prediction {
    /// The result panel is only drawn for a non-zero price.
    pub fn is_displayable(&self) -> bool {
        self.local_price.is_finite() && self.local_price != 0.0
    }
}

/// Request lifecycle. `Submitting` is the only state in which the form is busy.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Phase {
    #[default]
    Idle,
    Submitting {
        seq: u64,
    },
    Succeeded,
    Failed {
        reason: String,
    },
}
