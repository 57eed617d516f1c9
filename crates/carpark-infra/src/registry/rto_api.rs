//! RTO vehicle information API (RapidAPI)

use async_trait::async_trait;
use carpark_domain::Plate;
use carpark_types::{Error, Result, VehicleDetails};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::VehicleRegistry;

pub const DEFAULT_RTO_HOST: &str = "rto-vehicle-information-verification-india.p.rapidapi.com";

const VEHICLE_INFO_PATH: &str = "/api/v1/rc/vehicleinfo";

const CONSENT_TEXT: &str =
    "I hear by declare my consent agreement for fetching my information via AITAN Labs API";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

#[derive(Debug, Serialize)]
struct VehicleInfoRequest<'a> {
    reg_no: &'a str,
    consent: &'a str,
    consent_text: &'a str,
}

/// Response body; the API wraps its status envelope in an outer `result`
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum VehicleInfoResponse {
    Wrapped { result: VehicleInfoEnvelope },
    Bare(VehicleInfoEnvelope),
}

impl VehicleInfoResponse {
    fn into_envelope(self) -> VehicleInfoEnvelope {
        match self {
            Self::Wrapped { result } | Self::Bare(result) => result,
        }
    }
}

#[derive(Debug, Deserialize)]
struct VehicleInfoEnvelope {
    status_code: u16,
    #[serde(default)]
    result: Option<VehicleInfo>,
}

/// Registration record as the API names its fields
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct VehicleInfo {
    owner_name: Option<String>,
    state: Option<String>,
    pincode: Option<String>,
    chassis_number: Option<String>,
    engine_number: Option<String>,
    color: Option<String>,
    reg_date: Option<String>,
    vehicle_class_desc: Option<String>,
    fuel_descr: Option<String>,
    vehicle_manufacturer_name: Option<String>,
    model: Option<String>,
}

impl From<VehicleInfo> for VehicleDetails {
    fn from(info: VehicleInfo) -> Self {
        Self {
            owner_name: info.owner_name.unwrap_or_default(),
            state: info.state.unwrap_or_default(),
            pincode: info.pincode.unwrap_or_default(),
            chassis_number: info.chassis_number.unwrap_or_default(),
            engine_number: info.engine_number.unwrap_or_default(),
            color: info.color.unwrap_or_default(),
            reg_date: info.reg_date.unwrap_or_default(),
            vehicle_class: info.vehicle_class_desc.unwrap_or_default(),
            fuel_type: info.fuel_descr.unwrap_or_default(),
            vehicle_manufacturer: info.vehicle_manufacturer_name.unwrap_or_default(),
            model: info.model.unwrap_or_default(),
        }
    }
}

fn details_from(response: VehicleInfoResponse) -> Option<VehicleDetails> {
    let envelope = response.into_envelope();
    match (envelope.status_code, envelope.result) {
        (200, Some(info)) => Some(info.into()),
        (status, _) => {
            tracing::warn!(status, "Vehicle registry returned no usable result");
            None
        }
    }
}

pub struct RtoApiRegistry {
    client: reqwest::Client,
    api_key: String,
    host: String,
    base_url: String,
}

impl RtoApiRegistry {
    pub fn new(api_key: String, host: Option<String>) -> Result<Self> {
        let host = host.unwrap_or_else(|| DEFAULT_RTO_HOST.to_string());
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| Error::Registry(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_key,
            base_url: format!("https://{host}"),
            host,
        })
    }

    /// Override the scheme and authority requests go to (proxies, tests)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn url(&self) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), VEHICLE_INFO_PATH)
    }
}

#[async_trait]
impl VehicleRegistry for RtoApiRegistry {
    fn name(&self) -> &'static str {
        "rto-api"
    }

    async fn lookup(&self, plate: &Plate) -> Result<Option<VehicleDetails>> {
        let request = VehicleInfoRequest {
            reg_no: plate.as_str(),
            consent: "Y",
            consent_text: CONSENT_TEXT,
        };

        let response = self
            .client
            .post(self.url())
            .header("x-rapidapi-key", &self.api_key)
            .header("x-rapidapi-host", &self.host)
            .json(&request)
            .send()
            .await
            .map_err(|e| Error::Registry(format!("request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Registry(format!("HTTP error! status: {status}")));
        }

        let body: VehicleInfoResponse = response
            .json()
            .await
            .map_err(|e| Error::Registry(format!("unreadable response: {e}")))?;

        Ok(details_from(body))
    }
}
