use serde::Serialize;

use super::error::ConfigurationError;

/// Residential property tax for one municipality, as a fraction of assessed
/// value per year.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Jurisdiction {
    pub city: &'static str,
    pub property_tax_rate: f64,
}

pub static JURISDICTIONS: &[Jurisdiction] = &[
    Jurisdiction {
        city: "Burnaby",
        property_tax_rate: 0.0031,
    },
    Jurisdiction {
        city: "Coquitlam",
        property_tax_rate: 0.0034,
    },
    Jurisdiction {
        city: "Kelowna",
        property_tax_rate: 0.0041,
    },
    Jurisdiction {
        city: "Nanaimo",
        property_tax_rate: 0.0055,
    },
    Jurisdiction {
        city: "New Westminster",
        property_tax_rate: 0.0039,
    },
    Jurisdiction {
        city: "North Vancouver",
        property_tax_rate: 0.0027,
    },
    Jurisdiction {
        city: "Richmond",
        property_tax_rate: 0.0029,
    },
    Jurisdiction {
        city: "Surrey",
        property_tax_rate: 0.0033,
    },
    Jurisdiction {
        city: "Vancouver",
        property_tax_rate: 0.00256116,
    },
    Jurisdiction {
        city: "Victoria",
        property_tax_rate: 0.0049,
    },
    Jurisdiction {
        city: "West Vancouver",
        property_tax_rate: 0.0021,
    },
];

/// Looks up a city by name, ignoring case and surrounding whitespace.
pub fn find_jurisdiction(city: &str) -> Result<&'static Jurisdiction, ConfigurationError> {
    let wanted = city.trim();
    JURISDICTIONS
        .iter()
        .find(|j| j.city.eq_ignore_ascii_case(wanted))
        .ok_or_else(|| ConfigurationError::UnsupportedJurisdiction(wanted.to_string()))
}

pub fn property_tax_rate(city: &str) -> Result<f64, ConfigurationError> {
    find_jurisdiction(city).map(|j| j.property_tax_rate)
}
