//! The report's document schema as data.
//!
//! Section order, field grouping, label text and legend strings are part of
//! the printed form's contract; the composer renders them verbatim.

use crate::layout::Field;
use crate::record::{FieldKey, PoolRecord};

use FieldKey::*;

/// Where a field's value comes from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldSource {
    Record(FieldKey),
    /// Always printed empty, left for hand-filling.
    Blank,
}

/// One label in a field row.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FieldSpec<'a> {
    pub label: &'a str,
    pub source: FieldSource,
}

impl<'a> FieldSpec<'a> {
    pub const fn record(label: &'a str, key: FieldKey) -> Self {
        Self {
            label,
            source: FieldSource::Record(key),
        }
    }

    pub const fn blank(label: &'a str) -> Self {
        Self {
            label,
            source: FieldSource::Blank,
        }
    }

    /// Resolves the spec against a record into a drawable field.
    pub fn resolve(&self, record: &PoolRecord) -> Field {
        match self.source {
            FieldSource::Record(key) => Field::new(self.label, record.text(key)),
            FieldSource::Blank => Field::blank(self.label),
        }
    }
}

/// A row within a section.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RowSpec<'a> {
    /// Fields sharing one row, in equal columns.
    Fields(&'a [FieldSpec<'a>]),
    /// A plain option list or explanatory line.
    Legend(&'a str),
}

/// A titled group of rows.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SectionSpec<'a> {
    pub title: &'a str,
    pub rows: &'a [RowSpec<'a>],
}

const fn equipment_row<'a>(brand_label: &'a str, brand: FieldKey, model: FieldKey, serial: FieldKey) -> [FieldSpec<'a>; 3] {
    [
        FieldSpec::record(brand_label, brand),
        FieldSpec::record("Model", model),
        FieldSpec::record("Serial #", serial),
    ]
}

const OWNER_ROW: &[FieldSpec<'static>] = &[
    FieldSpec::record("Homeowner's Name", HomeOwnerName),
    FieldSpec::record("Phone", Phone),
];
const ADDRESS_ROW: &[FieldSpec<'static>] = &[FieldSpec::record("Address", Address)];
const LOCALITY_ROW: &[FieldSpec<'static>] = &[
    FieldSpec::record("City", City),
    FieldSpec::record("State", State),
    FieldSpec::record("Zip", ZipCode),
];

const DIMENSIONS_ROW: &[FieldSpec<'static>] = &[
    FieldSpec::record("Length", Length),
    FieldSpec::record("Width", Width),
    FieldSpec::blank("Round"),
    FieldSpec::record("Gallons", Gallons),
];
const INLETS_ROW: &[FieldSpec<'static>] = &[
    FieldSpec::record("How Many Inlets?", HowManyInlets),
    FieldSpec::record("How Many Skimmers?", HowManySkimmers),
];
const LADDERS_ROW: &[FieldSpec<'static>] = &[
    FieldSpec::record("How Many Ladders?", HowManyLadders),
    FieldSpec::record("How Many Steps?", HowManySteps),
];

const FILTER_ROW: &[FieldSpec<'static>] =
    &equipment_row("Filter Brand", FilterBrand, FilterModel, FilterSerial);
const PUMP_ROW: &[FieldSpec<'static>] = &equipment_row("Pump Brand", PumpBrand, PumpModel, PumpSerial);
const HEATER_NG_ROW: &[FieldSpec<'static>] =
    &equipment_row("Heater Brand (NG)", HeaterBrandNg, HeaterModelNg, HeaterSerialNg);
const HEATER_CBMS_ROW: &[FieldSpec<'static>] = &equipment_row(
    "Heater Brand (CBMS)",
    HeaterBrandCbms,
    HeaterModelCbms,
    HeaterSerialCbms,
);
const CLEANER_ROW: &[FieldSpec<'static>] = &equipment_row(
    "Pool Cleaner Brand",
    PoolCleanerBrand,
    PoolCleanerModel,
    PoolCleanerSerial,
);

pub const ADDITIONS_LEGEND: &str = "Additions:  Diving Board   Sliding Board   Above Ground Deck";
pub const FILTER_LEGEND: &str = "Type of Filter:  Sand   D.E. (Diatomaceous Earth)   Cartridge";
pub const PUMP_LEGEND: &str =
    "Type of Pump (Horse Power):  3/4 HP   1 HP   1-1/2 HP   2 HP   2-1/2 HP   3 HP";
pub const HEATER_LEGEND: &str = "Type of Heater:  Natural Gas   Propane   Electric Heat Pump";
pub const FEEDER_LEGEND: &str = "Type of Chemical Feeder:  Chlorine   Bromine   Mineral Salt";
pub const CLEANER_LEGEND: &str =
    "Type of Automatic Pool Cleaner:  Pressure-Side   Suction-Side   Robotic";

/// The pool report's sections, in print order.
pub const POOL_SECTIONS: &[SectionSpec<'static>] = &[
    SectionSpec {
        title: "Homeowner Information",
        rows: &[
            RowSpec::Fields(OWNER_ROW),
            RowSpec::Fields(ADDRESS_ROW),
            RowSpec::Fields(LOCALITY_ROW),
        ],
    },
    SectionSpec {
        title: "Size & Stats",
        rows: &[
            RowSpec::Fields(DIMENSIONS_ROW),
            RowSpec::Fields(INLETS_ROW),
            RowSpec::Legend(ADDITIONS_LEGEND),
            RowSpec::Fields(LADDERS_ROW),
        ],
    },
    SectionSpec {
        title: "Equipment",
        rows: &[
            RowSpec::Legend(FILTER_LEGEND),
            RowSpec::Fields(FILTER_ROW),
            RowSpec::Legend(PUMP_LEGEND),
            RowSpec::Fields(PUMP_ROW),
            RowSpec::Legend(HEATER_LEGEND),
            RowSpec::Fields(HEATER_NG_ROW),
            RowSpec::Legend(FEEDER_LEGEND),
            RowSpec::Fields(HEATER_CBMS_ROW),
            RowSpec::Legend(CLEANER_LEGEND),
            RowSpec::Fields(CLEANER_ROW),
        ],
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sections_follow_print_order() {
        let titles: Vec<_> = POOL_SECTIONS.iter().map(|section| section.title).collect();
        assert_eq!(
            titles,
            ["Homeowner Information", "Size & Stats", "Equipment"]
        );
    }

    #[test]
    fn every_record_field_is_printed_once() {
        let mut keys: Vec<FieldKey> = POOL_SECTIONS
            .iter()
            .flat_map(|section| section.rows.iter())
            .filter_map(|row| match row {
                RowSpec::Fields(fields) => Some(fields.iter()),
                RowSpec::Legend(_) => None,
            })
            .flatten()
            .filter_map(|field| match field.source {
                FieldSource::Record(key) => Some(key),
                FieldSource::Blank => None,
            })
            .collect();
        let total = keys.len();
        keys.sort_by_key(|key| format!("{key:?}"));
        keys.dedup();
        assert_eq!(total, 28);
        assert_eq!(keys.len(), 28);
    }

    #[test]
    fn blank_source_ignores_record() {
        let record = PoolRecord {
            length: Some(32_i64.into()),
            ..PoolRecord::default()
        };
        assert_eq!(DIMENSIONS_ROW[0].resolve(&record).value, "32");
        assert_eq!(DIMENSIONS_ROW[2].resolve(&record), Field::blank("Round"));
    }
}
