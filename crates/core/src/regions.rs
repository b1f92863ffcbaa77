//! eGRID subregions and their carbon intensity
//!
//! Rates are CO2 output emission rates from the EPA eGRID2022 release,
//! converted from lb/MWh to kg/kWh.

/// An electricity-grid subregion
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridRegion {
    /// eGRID subregion acronym, e.g. `"CAMX"`
    pub id: &'static str,
    pub name: &'static str,
    /// kg CO2 per kWh
    pub co2_rate: f64,
}

/// Region preselected for new submissions
pub const DEFAULT_REGION: GridRegion = GridRegion {
    id: "CAMX",
    name: "WECC California",
    co2_rate: 0.225,
};

const fn region(id: &'static str, name: &'static str, co2_rate: f64) -> GridRegion {
    GridRegion { id, name, co2_rate }
}

pub const EGRID_REGIONS: &[GridRegion] = &[
    region("AKGD", "ASCC Alaska Grid", 0.477),
    region("AKMS", "ASCC Miscellaneous", 0.225),
    region("AZNM", "WECC Southwest", 0.352),
    DEFAULT_REGION,
    region("ERCT", "ERCOT All", 0.350),
    region("FRCC", "FRCC All", 0.369),
    region("HIMS", "HICC Miscellaneous", 0.524),
    region("HIOA", "HICC Oahu", 0.714),
    region("MROE", "MRO East", 0.671),
    region("MROW", "MRO West", 0.425),
    region("NEWE", "NPCC New England", 0.243),
    region("NWPP", "WECC Northwest", 0.273),
    region("NYCW", "NPCC NYC/Westchester", 0.401),
    region("NYLI", "NPCC Long Island", 0.544),
    region("NYUP", "NPCC Upstate NY", 0.124),
    region("PRMS", "Puerto Rico Miscellaneous", 0.723),
    region("RFCE", "RFC East", 0.298),
    region("RFCM", "RFC Michigan", 0.552),
    region("RFCW", "RFC West", 0.454),
    region("RMPA", "WECC Rockies", 0.510),
    region("SPNO", "SPP North", 0.435),
    region("SPSO", "SPP South", 0.429),
    region("SRMV", "SERC Mississippi Valley", 0.338),
    region("SRMW", "SERC Midwest", 0.671),
    region("SRSO", "SERC South", 0.389),
    region("SRTV", "SERC Tennessee Valley", 0.402),
    region("SRVC", "SERC Virginia/Carolina", 0.282),
];

/// Look up a region by acronym, ignoring case and surrounding whitespace
pub fn find_region(id: &str) -> Option<&'static GridRegion> {
    let id = id.trim();
    EGRID_REGIONS.iter().find(|r| r.id.eq_ignore_ascii_case(id))
}

/// All regions, cleanest grid first
pub fn carbon_ranking() -> Vec<&'static GridRegion> {
    let mut regions: Vec<_> = EGRID_REGIONS.iter().collect();
    regions.sort_by(|a, b| a.co2_rate.total_cmp(&b.co2_rate));
    regions
}
