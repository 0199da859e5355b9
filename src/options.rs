// Option sets offered by the form. Values are sent to the service verbatim.

pub const COMPANIES: &[&str] = &[
    "Dell", "Lenovo", "HP", "Asus", "Acer", "MSI", "Toshiba", "Apple", "Other",
];

pub const TYPE_NAMES: &[&str] = &[
    "Notebook",
    "Gaming",
    "Ultrabook",
    "2 in 1 Convertible",
    "Workstation",
    "Netbook",
];

pub const CPU_BRANDS: &[&str] = &[
    "Intel i7",
    "Intel i5",
    "Low-end Intel",
    "Intel i3",
    "Other AMD",
    "AMD Ryzen",
];

pub const GPU_BRANDS: &[&str] = &["Intel", "Nvidia GeForce", "AMD", "Nvidia Quadro"];

pub const OPERATING_SYSTEMS: &[&str] = &[
    "Windows 10",
    "No OS",
    "Linux",
    "Windows 7",
    "Chrome OS",
    "macOS",
    "Android",
];

pub const RAM_SIZES: &[&str] = &["2", "4", "8", "16", "32", "64"];

/// Bounds of a numeric input, mirroring `min`/`max`/`step` on an HTML number field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NumberBounds {
    pub min: f64,
    pub max: f64,
    pub step: f64,
}

pub const INCHES_BOUNDS: NumberBounds = NumberBounds { min: 10.0, max: 20.0, step: 0.1 };
pub const WEIGHT_BOUNDS: NumberBounds = NumberBounds { min: 0.5, max: 10.0, step: 0.1 };

impl NumberBounds {
    /// True when `value` lies on the step grid anchored at `min`.
    pub fn on_step(&self, value: f64) -> bool {
        let steps = (value - self.min) / self.step;
        (steps - steps.round()).abs() < 1e-6
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }

    /// Moves `value` by `direction` steps, snapping to the grid and clamping to the bounds.
    pub fn nudge(&self, value: Option<f64>, direction: i32) -> f64 {
        let next = match value {
            Some(v) if v.is_finite() => {
                let steps = ((v - self.min) / self.step).round() + f64::from(direction);
                self.min + steps * self.step
            }
            _ => self.min,
        };
        next.clamp(self.min, self.max)
    }
}

/// Every option set with the label shown for it, in form order.
pub fn catalog() -> [(&'static str, &'static [&'static str]); 6] {
    [
        ("Company", COMPANIES),
        ("Type Name", TYPE_NAMES),
        ("CPU Brand", CPU_BRANDS),
        ("GPU Brand", GPU_BRANDS),
        ("Operating System", OPERATING_SYSTEMS),
        ("RAM (GB)", RAM_SIZES),
    ]
}
