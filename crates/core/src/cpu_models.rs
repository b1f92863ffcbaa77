//! CPU power presets for the submission form

/// Label recorded when no preset was chosen
pub const CUSTOM_CPU_MODEL: &str = "Custom";

/// Marker in the default notes that a preset replaces
pub const ADJUST_NOTE_MARKER: &str = "ADJUST FOR YOUR HARDWARE";

/// A CPU with its estimated draw per core
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CpuModel {
    pub model: &'static str,
    /// Watts per core under load
    pub watts: f64,
}

const fn cpu(model: &'static str, watts: f64) -> CpuModel {
    CpuModel { model, watts }
}

pub const CPU_MODELS: &[CpuModel] = &[
    cpu("Apple M1", 2.5),
    cpu("Apple M2", 2.8),
    cpu("Apple M3", 3.0),
    cpu("Intel Core i5-1135G7", 7.0),
    cpu("Intel Core i7-12700K", 15.8),
    cpu("Intel Xeon Platinum 8380", 6.8),
    cpu("AMD Ryzen 7 5800X", 13.1),
    cpu("AMD Ryzen 9 7950X", 10.6),
    cpu("AMD EPYC 7763", 4.4),
];

/// Look up a preset by name, ignoring case. `"Custom"` has no preset.
pub fn find_cpu_model(model: &str) -> Option<&'static CpuModel> {
    let model = model.trim();
    CPU_MODELS.iter().find(|c| c.model.eq_ignore_ascii_case(model))
}

/// Notes after choosing `preset`: the generic placeholder note is replaced,
/// anything the user wrote is kept.
pub fn preset_notes(notes: &str, preset: &CpuModel) -> String {
    if notes.contains(ADJUST_NOTE_MARKER) {
        format!(
            "Using {} ({}W) - Adjust other values as needed",
            preset.model, preset.watts
        )
    } else {
        notes.to_string()
    }
}
