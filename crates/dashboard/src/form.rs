//! Submission form fields as typed, validated input

use greenbench_core::cpu_models::{find_cpu_model, preset_notes, CUSTOM_CPU_MODEL};
use greenbench_core::validation::{parse_non_negative, parse_timeout};
use greenbench_core::{find_region, FormData};

/// Raw text of every form input
#[derive(Debug, Clone, PartialEq)]
pub struct FormFields {
    pub repo_url: String,
    pub entrypoint: String,
    pub cpu_watt: String,
    pub ram_watt: String,
    pub baseline_watt: String,
    pub timeout: String,
    pub notes: String,
    pub region: String,
    pub co2_rate: String,
    pub cpu_model: String,
}

impl Default for FormFields {
    fn default() -> Self {
        let defaults = FormData::default();
        Self {
            repo_url: String::new(),
            entrypoint: String::new(),
            cpu_watt: defaults.cpu_watt.to_string(),
            ram_watt: defaults.ram_watt.to_string(),
            baseline_watt: defaults.baseline_watt.to_string(),
            timeout: defaults.timeout.to_string(),
            notes: defaults.notes,
            region: defaults.egrid_region,
            co2_rate: defaults.co2_rate.to_string(),
            cpu_model: defaults
                .cpu_model
                .unwrap_or_else(|| CUSTOM_CPU_MODEL.to_string()),
        }
    }
}

impl FormFields {
    /// Display name of the selected region, if it is a known one
    pub fn region_name(&self) -> Option<String> {
        find_region(&self.region).map(|r| r.name.to_string())
    }

    /// Pick a grid region; its carbon intensity fills the CO₂ rate field
    pub fn select_region(&mut self, id: &str) {
        self.region = id.to_string();
        if let Some(region) = find_region(id) {
            self.co2_rate = region.co2_rate.to_string();
        }
    }

    /// Pick a CPU model; a preset fills the wattage and retires the placeholder note
    pub fn select_cpu_model(&mut self, model: &str) {
        self.cpu_model = model.to_string();
        if let Some(preset) = find_cpu_model(model) {
            self.cpu_watt = preset.watts.to_string();
            self.notes = preset_notes(&self.notes, preset);
        }
    }

    pub fn parse(&self) -> Result<FormData, String> {
        let form = FormData {
            repo_url: self.repo_url.trim().to_string(),
            entrypoint: self.entrypoint.trim().to_string(),
            cpu_watt: parse_non_negative(&self.cpu_watt, "CPU watt per core").map_err(|e| e.to_string())?,
            ram_watt: parse_non_negative(&self.ram_watt, "RAM watt per GB").map_err(|e| e.to_string())?,
            baseline_watt: parse_non_negative(&self.baseline_watt, "Baseline watt")
                .map_err(|e| e.to_string())?,
            timeout: parse_timeout(&self.timeout).map_err(|e| e.to_string())?,
            notes: self.notes.clone(),
            egrid_region: self.region.trim().to_string(),
            co2_rate: parse_non_negative(&self.co2_rate, "CO₂ rate").map_err(|e| e.to_string())?,
            cpu_model: Some(self.cpu_model.trim().to_string()).filter(|m| !m.is_empty()),
        };

        form.validate().map_err(|e| e.to_string())?;
        Ok(form)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled() -> FormFields {
        FormFields {
            repo_url: "https://github.com/acme/widgets".to_string(),
            entrypoint: "main.py".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_defaults_parse() {
        let form = filled().parse().unwrap();
        assert_eq!(form.cpu_watt, 2.5);
        assert_eq!(form.ram_watt, 0.15);
        assert_eq!(form.baseline_watt, 0.3);
        assert_eq!(form.timeout, 60);
        assert_eq!(form.egrid_region, "CAMX");
        assert_eq!(form.co2_rate, 0.225);
        assert_eq!(form.cpu_model.as_deref(), Some("Custom"));
    }

    #[test]
    fn test_rejects_bad_input() {
        assert!(FormFields::default().parse().is_err());

        let mut fields = filled();
        fields.cpu_watt = "-1".to_string();
        assert!(fields.parse().is_err());

        let mut fields = filled();
        fields.timeout = "0".to_string();
        assert!(fields.parse().is_err());

        let mut fields = filled();
        fields.co2_rate = "lots".to_string();
        assert!(fields.parse().is_err());
    }

    #[test]
    fn test_region_selection() {
        let mut fields = filled();
        fields.select_region("NYUP");

        assert_eq!(fields.region_name().as_deref(), Some("NPCC Upstate NY"));
        assert_eq!(fields.parse().unwrap().co2_rate, 0.124);

        fields.select_region("ZZZZ");
        assert!(fields.region_name().is_none());
        assert_eq!(fields.co2_rate, "0.124");
    }

    #[test]
    fn test_cpu_model_selection() {
        let mut fields = filled();
        fields.select_cpu_model("Apple M3");

        let form = fields.parse().unwrap();
        assert_eq!(form.cpu_watt, 3.0);
        assert_eq!(form.cpu_model.as_deref(), Some("Apple M3"));
        assert_eq!(form.notes, "Using Apple M3 (3W) - Adjust other values as needed");

        // Back to custom keeps the chosen wattage
        fields.select_cpu_model("Custom");
        assert_eq!(fields.parse().unwrap().cpu_watt, 3.0);
    }
}
