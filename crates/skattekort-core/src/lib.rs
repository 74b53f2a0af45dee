//! Skattekort domain model — the parts of the lookup service that do not
//! touch the network: query validation, the canonical display model, and
//! the upstream response normalizer.

pub mod error;
pub mod model;
pub mod normalize;
pub mod query;

pub use error::{ConfigError, NormalizeError, TokenError, UpstreamError, ValidationError};
pub use model::{Forskuddstrekk, NormalizedSkattekort, Resultat, Tilleggsopplysning, Trekkode};
pub use normalize::normalize;
pub use query::{validate, ApiVariant, HentSkattekortRequest, SkattekortQuery};
