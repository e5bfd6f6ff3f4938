use smarty_rust_sdk::sdk::authentication::SecretKeyCredential;
use smarty_rust_sdk::sdk::batch::Batch;
use smarty_rust_sdk::sdk::options::{Options, OptionsBuilder};
use smarty_rust_sdk::us_street_api::client::USStreetAddressClient;
use smarty_rust_sdk::us_street_api::lookup::{Lookup, MatchStrategy};
use crate::address::AddressFields;
use crate::config::{SmartyConfig, Strategy};
use crate::error::VerifyError;

/// The parts of an address submitted for standardization.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StandardizeRequest {
    pub street: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip_code: Option<String>,
}

impl From<AddressFields> for StandardizeRequest {
    fn from(fields: AddressFields) -> Self {
        fn present(value: Option<String>) -> Option<String> {
            value.filter(|s| !s.trim().is_empty())
        }

        Self {
            street: present(fields.street),
            city: present(fields.city),
            state: present(fields.state),
            zip_code: present(fields.zip),
        }
    }
}

/// One standardized match returned by the service.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Candidate {
    pub street: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub analysis: Analysis,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Analysis {
    /// "Y" when USPS confirmed the delivery point
    pub dpv_match_code: String,
}

impl Analysis {
    pub fn is_deliverable(&self) -> bool {
        self.dpv_match_code == "Y"
    }
}

/// An address standardization service.
///
/// Each call is a single round trip; failures to reach the service come back as `Err`.
#[allow(async_fn_in_trait)]
pub trait StreetVerifier {
    async fn standardize(&self, request: StandardizeRequest) -> Result<Vec<Candidate>, VerifyError>;
}

/// [`StreetVerifier`] backed by the Smarty US Street API.
pub struct SmartyClient {
    client: USStreetAddressClient,
    max_candidates: u8,
    strategy: Strategy,
}

impl SmartyClient {
    pub fn new(config: &SmartyConfig) -> Result<Self, VerifyError> {
        let client = USStreetAddressClient::new(Self::options(config))
            .map_err(|e| VerifyError::Client(Box::new(e)))?;
        Ok(
            Self {
                client,
                max_candidates: config.max_candidates,
                strategy: config.strategy,
            }
        )
    }

    fn authentication(config: &SmartyConfig) -> Box<SecretKeyCredential> {
        SecretKeyCredential::new(
            config.auth_id.clone(),
            config.auth_token.clone(),
        )
    }

    fn options(config: &SmartyConfig) -> Options {
        // the sdk retries on its own unless told otherwise
        OptionsBuilder::new(Some(Self::authentication(config)))
            .with_license(&config.license)
            .with_retries(0)
            .build()
    }

    fn lookup(&self, request: StandardizeRequest) -> Lookup {
        Lookup {
            street: request.street.unwrap_or_default(),
            city: request.city.unwrap_or_default(),
            state: request.state.unwrap_or_default(),
            zipcode: request.zip_code.unwrap_or_default(),
            max_candidates: i64::from(self.max_candidates),
            match_strategy: match self.strategy {
                Strategy::Strict => MatchStrategy::Strict,
                Strategy::Invalid => MatchStrategy::Invalid,
                Strategy::Enhanced => MatchStrategy::Enhanced,
            },
            ..Default::default()
        }
    }
}

impl StreetVerifier for SmartyClient {
    async fn standardize(&self, request: StandardizeRequest) -> Result<Vec<Candidate>, VerifyError> {
        let mut batch = Batch::default();
        batch.push(self.lookup(request))
            .map_err(|e| VerifyError::Batch(Box::new(e)))?;
        self.client.send(&mut batch).await
            .map_err(|e| VerifyError::Transport(Box::new(e)))?;

        let lookup = batch.records().into_iter().next()
            .ok_or(VerifyError::EmptyBatch)?
            .clone();
        log::debug!("smarty returned [{}] candidates", lookup.results.len());

        Ok(
            lookup.results.iter()
                .map(|candidate| Candidate {
                    street: candidate.delivery_line_1.clone(),
                    city: candidate.components.city_name.clone(),
                    state: candidate.components.state_abbreviation.clone(),
                    zip_code: candidate.components.zipcode.clone(),
                    analysis: Analysis {
                        dpv_match_code: candidate.analysis.dpv_match_code.clone(),
                    },
                })
                .collect()
        )
    }
}
