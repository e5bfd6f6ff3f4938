use crate::address::{Address, AddressInput, US};
use crate::error::VerifyError;
use crate::smarty::{Candidate, StandardizeRequest, StreetVerifier};

/// What the service made of an address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerificationOutcome {
    pub verified: bool,
    pub matched: Option<Address>,
    pub suggestions: Option<Vec<Address>>,
}

impl VerificationOutcome {
    fn unmatched() -> Self {
        Self { verified: false, matched: None, suggestions: None }
    }

    fn deliverable(address: Address) -> Self {
        Self { verified: true, matched: Some(address), suggestions: None }
    }

    fn suggest(suggestions: Vec<Address>) -> Self {
        Self { verified: false, matched: None, suggestions: Some(suggestions) }
    }
}

impl From<Candidate> for Address {
    fn from(candidate: Candidate) -> Self {
        Self {
            street: candidate.street,
            city: candidate.city,
            state: candidate.state,
            zip: candidate.zip_code,
            country: US.to_string(),
        }
    }
}

/// Verify an address against the service.
///
/// An address is valid only when the service returns exactly one match and
/// that match is DPV confirmed. A single unconfirmed match, or several matches,
/// come back as suggestions.
#[tracing::instrument(level = "debug", skip_all)]
pub async fn verify<V: StreetVerifier>(verifier: &V, input: &AddressInput) -> Result<VerificationOutcome, VerifyError> {
    let request = StandardizeRequest::from(input.clone().into_fields());
    log::debug!("standardizing {:?}", request);
    let mut candidates = verifier.standardize(request).await?;

    Ok(match candidates.len() {
        0 => VerificationOutcome::unmatched(),
        1 => {
            let candidate = candidates.remove(0);
            if candidate.analysis.is_deliverable() {
                VerificationOutcome::deliverable(candidate.into())
            } else {
                log::debug!("single match is not deliverable: dpv [{}]", candidate.analysis.dpv_match_code);
                VerificationOutcome::suggest(vec![candidate.into()])
            }
        }
        n => {
            log::debug!("address is ambiguous, [{}] matches", n);
            VerificationOutcome::suggest(candidates.into_iter().map(Address::from).collect())
        }
    })
}
