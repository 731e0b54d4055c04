#![allow(dead_code)]

use std::cell::Cell;
use std::rc::Rc;

use pool_report::assets::{AssetFetcher, FetchResponse};
use pool_report::{AssetError, PoolRecord};

pub const SCENARIO_RECORD: &str = r#"{
    "id": "rec-1",
    "homeOwnerName": "Jane Doe",
    "phone": 5551234,
    "address": "1 Elm St",
    "city": "Metropolis",
    "state": "NY",
    "zipCode": 10001,
    "length": 32,
    "width": 16,
    "gallons": 18000,
    "howManyInlets": 2,
    "howManySkimmers": 1,
    "howManyLadders": 1,
    "howManySteps": 2,
    "filterBrand": "Hayward",
    "filterModel": "X200",
    "filterSerial": "F123",
    "pumpBrand": "Pentair",
    "pumpModel": "SuperFlo",
    "pumpSerial": "P-77",
    "heaterBrandNG": null,
    "poolCleanerBrand": "Polaris"
}"#;

pub fn scenario_record() -> PoolRecord {
    PoolRecord::from_json(SCENARIO_RECORD).expect("scenario record parses")
}

/// A `width` x `height` PNG.
pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let image = image::DynamicImage::ImageRgb8(image::RgbImage::new(width, height));
    let mut bytes = Vec::new();
    image
        .write_to(&mut bytes, image::ImageOutputFormat::Png)
        .expect("encode png");
    bytes
}

/// Simulates a network error for every request.
pub struct FailingFetcher;

impl AssetFetcher for FailingFetcher {
    fn fetch(&self, url: &str) -> Result<FetchResponse, AssetError> {
        Err(AssetError::Fetch {
            url: url.to_owned(),
            message: "connection refused".to_owned(),
        })
    }
}

/// Serves the same body for every request and counts calls.
pub struct StaticFetcher {
    pub response: FetchResponse,
    pub calls: Rc<Cell<usize>>,
}

impl StaticFetcher {
    pub fn png(width: u32, height: u32) -> Self {
        Self {
            response: FetchResponse::ok(Some("image/png"), png_bytes(width, height)),
            calls: Rc::new(Cell::new(0)),
        }
    }
}

impl AssetFetcher for StaticFetcher {
    fn fetch(&self, _url: &str) -> Result<FetchResponse, AssetError> {
        self.calls.set(self.calls.get() + 1);
        Ok(self.response.clone())
    }
}
