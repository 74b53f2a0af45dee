use thiserror::Error;

use crate::query::ApiVariant;

/// User-facing message for a fødselsnummer of the wrong length (or missing).
pub const FNR_LENGTH_MESSAGE: &str = "Fødselsnummer må være 11 siffer";
/// User-facing message for a fødselsnummer containing non-digits.
pub const FNR_DIGITS_MESSAGE: &str = "Fødselsnummer må inneholde kun tall";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// fnr missing, non-string, wrong length, or containing non-digits.
    #[error("{0}")]
    InvalidNationalId(&'static str),

    /// inntektsaar missing, non-integer, or outside `[2000, max]`.
    #[error("Inntektsår må være mellom 2000 og {0}")]
    InvalidYear(i32),
}

/// Failure kinds of the single upstream call, mapped from HTTP status.
///
/// The `Display` strings double as the fallback messages crossing the
/// trust boundary when the upstream body carried none.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UpstreamError {
    #[error("{}", .0.as_deref().unwrap_or("Ugyldig forespørsel"))]
    BadRequest(Option<String>),

    #[error("Ikke tilgang")]
    Unauthorized,

    #[error("{}", .0.as_deref().unwrap_or("Fant ikke ressurs"))]
    NotFound(Option<String>),

    #[error("{}", .0.as_deref().unwrap_or("Ingen kontakt med baksystemet"))]
    Unavailable(Option<String>),
}

/// Deployment misconfiguration for the selected upstream variant.
/// Distinct from [`UpstreamError`]: this is never the upstream's fault.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("base URL is not configured for the {0} API")]
    MissingBaseUrl(ApiVariant),

    #[error("audience is not configured for the {0} API")]
    MissingAudience(ApiVariant),
}

/// On-behalf-of token exchange failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenError {
    #[error("token exchange failed: {0}")]
    Exchange(String),
}

/// A 2xx upstream payload that matched none of the known shapes.
#[derive(Debug, Error)]
pub enum NormalizeError {
    #[error("unexpected upstream payload: {0}")]
    Malformed(#[from] serde_json::Error),
}
