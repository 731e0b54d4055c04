//! The pool service record that drives one report.
//!
//! Records arrive from the storage layer as camelCase JSON. Every field is
//! optional on the wire: a missing key or an explicit `null` simply renders as
//! a blank underline on the printed form.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A single record value as supplied by the storage layer.
///
/// Numbers keep their JSON representation so that they print exactly as
/// stored, without locale formatting or float noise.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Number(serde_json::Number),
    Text(String),
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(number) => write!(f, "{number}"),
            Self::Text(text) => f.write_str(text),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        Self::Number(value.into())
    }
}

impl From<u64> for FieldValue {
    fn from(value: u64) -> Self {
        Self::Number(value.into())
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        // Non-finite numbers have no JSON form; treat them as absent text.
        serde_json::Number::from_f64(value)
            .map(Self::Number)
            .unwrap_or_else(|| Self::Text(String::new()))
    }
}

/// Identifies one printable field of a [`PoolRecord`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FieldKey {
    HomeOwnerName,
    Phone,
    Address,
    City,
    State,
    ZipCode,
    Length,
    Width,
    Gallons,
    HowManyInlets,
    HowManySkimmers,
    HowManyLadders,
    HowManySteps,
    FilterBrand,
    FilterModel,
    FilterSerial,
    PumpBrand,
    PumpModel,
    PumpSerial,
    HeaterBrandNg,
    HeaterModelNg,
    HeaterSerialNg,
    HeaterBrandCbms,
    HeaterModelCbms,
    HeaterSerialCbms,
    PoolCleanerBrand,
    PoolCleanerModel,
    PoolCleanerSerial,
}

/// Pool service record as stored by the back-end.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PoolRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub home_owner_name: Option<FieldValue>,
    pub phone: Option<FieldValue>,
    pub address: Option<FieldValue>,
    pub city: Option<FieldValue>,
    pub state: Option<FieldValue>,
    pub zip_code: Option<FieldValue>,
    pub length: Option<FieldValue>,
    pub width: Option<FieldValue>,
    pub gallons: Option<FieldValue>,
    pub how_many_inlets: Option<FieldValue>,
    pub how_many_skimmers: Option<FieldValue>,
    pub how_many_ladders: Option<FieldValue>,
    pub how_many_steps: Option<FieldValue>,
    pub filter_brand: Option<FieldValue>,
    pub filter_model: Option<FieldValue>,
    pub filter_serial: Option<FieldValue>,
    pub pump_brand: Option<FieldValue>,
    pub pump_model: Option<FieldValue>,
    pub pump_serial: Option<FieldValue>,
    #[serde(rename = "heaterBrandNG")]
    pub heater_brand_ng: Option<FieldValue>,
    #[serde(rename = "heaterModelNG")]
    pub heater_model_ng: Option<FieldValue>,
    #[serde(rename = "heaterSerialNG")]
    pub heater_serial_ng: Option<FieldValue>,
    #[serde(rename = "heaterBrandCBMS")]
    pub heater_brand_cbms: Option<FieldValue>,
    #[serde(rename = "heaterModelCBMS")]
    pub heater_model_cbms: Option<FieldValue>,
    #[serde(rename = "heaterSerialCBMS")]
    pub heater_serial_cbms: Option<FieldValue>,
    pub pool_cleaner_brand: Option<FieldValue>,
    pub pool_cleaner_model: Option<FieldValue>,
    pub pool_cleaner_serial: Option<FieldValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

impl PoolRecord {
    /// Parses a record from the storage layer's JSON representation.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Returns the raw value stored for `key`, if any.
    pub fn get(&self, key: FieldKey) -> Option<&FieldValue> {
        let slot = match key {
            FieldKey::HomeOwnerName => &self.home_owner_name,
            FieldKey::Phone => &self.phone,
            FieldKey::Address => &self.address,
            FieldKey::City => &self.city,
            FieldKey::State => &self.state,
            FieldKey::ZipCode => &self.zip_code,
            FieldKey::Length => &self.length,
            FieldKey::Width => &self.width,
            FieldKey::Gallons => &self.gallons,
            FieldKey::HowManyInlets => &self.how_many_inlets,
            FieldKey::HowManySkimmers => &self.how_many_skimmers,
            FieldKey::HowManyLadders => &self.how_many_ladders,
            FieldKey::HowManySteps => &self.how_many_steps,
            FieldKey::FilterBrand => &self.filter_brand,
            FieldKey::FilterModel => &self.filter_model,
            FieldKey::FilterSerial => &self.filter_serial,
            FieldKey::PumpBrand => &self.pump_brand,
            FieldKey::PumpModel => &self.pump_model,
            FieldKey::PumpSerial => &self.pump_serial,
            FieldKey::HeaterBrandNg => &self.heater_brand_ng,
            FieldKey::HeaterModelNg => &self.heater_model_ng,
            FieldKey::HeaterSerialNg => &self.heater_serial_ng,
            FieldKey::HeaterBrandCbms => &self.heater_brand_cbms,
            FieldKey::HeaterModelCbms => &self.heater_model_cbms,
            FieldKey::HeaterSerialCbms => &self.heater_serial_cbms,
            FieldKey::PoolCleanerBrand => &self.pool_cleaner_brand,
            FieldKey::PoolCleanerModel => &self.pool_cleaner_model,
            FieldKey::PoolCleanerSerial => &self.pool_cleaner_serial,
        };
        slot.as_ref()
    }

    /// Returns the printable text for `key`; absent values print as an empty string.
    pub fn text(&self, key: FieldKey) -> String {
        self.get(key).map(ToString::to_string).unwrap_or_default()
    }

    /// Returns the owner's name as used in artifact names and titles.
    pub fn owner_name(&self) -> String {
        self.text(FieldKey::HomeOwnerName)
    }
}
