//! Upstream response normalization.
//!
//! The upstream contract has gone through three incompatible shapes over
//! the years, and no response carries a version tag. Detection is purely
//! structural; [`UpstreamPayload::detect`] documents the match order,
//! which must stay stable because the array shapes overlap structurally.

use serde::Deserialize;
use serde_json::Value;

use crate::error::NormalizeError;
use crate::model::{
    Forskuddstrekk, NormalizedSkattekort, Resultat, Tilleggsopplysning, Trekkode,
};

/// One person in the person-nested shape.
#[derive(Debug, Clone, Deserialize)]
pub struct SkattekortPerson {
    #[serde(default)]
    pub navn: Option<String>,
    #[serde(default)]
    pub arbeidsgiver: Vec<Arbeidsgiver>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Arbeidsgiver {
    pub arbeidsgiveridentifikator: Arbeidsgiveridentifikator,
    #[serde(default)]
    pub arbeidstaker: Vec<Arbeidstaker>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Arbeidsgiveridentifikator {
    pub organisasjonsnummer: String,
}

/// One employee record; also the element type of the flat-array shape.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Arbeidstaker {
    pub inntektsaar: i32,
    pub arbeidstakeridentifikator: String,
    pub resultat_paa_forespoersel: Resultat,
    #[serde(default)]
    pub skattekort: Option<Skattekort>,
    #[serde(default)]
    pub tilleggsopplysning: Option<Vec<Tilleggsopplysning>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Skattekort {
    #[serde(default)]
    pub utstedt_dato: Option<String>,
    #[serde(default)]
    pub skattekortidentifikator: Option<i64>,
    #[serde(default)]
    pub forskuddstrekk: Option<Vec<Forskuddstrekk>>,
}

/// The earliest upstream shape: one flat object with inline sub-objects
/// and differently-named withholding fields.
#[derive(Debug, Clone, Deserialize)]
pub struct LegacySkattekort {
    pub arbeidstaker: LegacyArbeidstaker,
    pub inntektsaar: i32,
    pub arbeidsgiver: LegacyArbeidsgiver,
    #[serde(default)]
    pub skattekort: Option<LegacyTrekk>,
    #[serde(default)]
    pub tilleggsopplysninger: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LegacyArbeidstaker {
    pub fnr: String,
    #[serde(default)]
    pub navn: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LegacyArbeidsgiver {
    pub organisasjonsnummer: String,
    #[serde(default)]
    pub organisasjonsnavn: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LegacyTrekk {
    #[serde(default)]
    pub prosentsats: Option<f64>,
    #[serde(default)]
    pub tabellnummer: Option<String>,
    #[serde(default)]
    pub trekkgrunn: Option<String>,
    #[serde(default)]
    pub frikort: Option<bool>,
}

/// The upstream payload, discriminated structurally.
#[derive(Debug, Clone)]
pub enum UpstreamPayload {
    Canonical(Vec<NormalizedSkattekort>),
    PersonNested(Vec<SkattekortPerson>),
    FlatRecords(Vec<Arbeidstaker>),
    LegacySingle(LegacySkattekort),
}

impl UpstreamPayload {
    /// Structural shape detection; first match wins and the order must not
    /// change:
    ///
    /// 1. non-empty array whose first element has `overskrift` — already
    ///    canonical, passed through (this is what makes [`normalize`]
    ///    idempotent on its own output);
    /// 2. non-empty array whose first element has `arbeidsgiver` — the
    ///    person-nested shape;
    /// 3. any other array — flat employee records;
    /// 4. anything else — the legacy single-object shape.
    pub fn detect(value: Value) -> Result<Self, NormalizeError> {
        if let Value::Array(items) = &value {
            let first = items.first();
            if first.is_some_and(|v| v.get("overskrift").is_some()) {
                return Ok(Self::Canonical(serde_json::from_value(value)?));
            }
            if first.is_some_and(|v| v.get("arbeidsgiver").is_some()) {
                return Ok(Self::PersonNested(serde_json::from_value(value)?));
            }
            return Ok(Self::FlatRecords(serde_json::from_value(value)?));
        }
        Ok(Self::LegacySingle(serde_json::from_value(value)?))
    }
}

/// Map any supported upstream payload to the canonical display model.
/// An empty upstream result set yields an empty list, never an error.
pub fn normalize(value: Value) -> Result<Vec<NormalizedSkattekort>, NormalizeError> {
    let entries = match UpstreamPayload::detect(value)? {
        UpstreamPayload::Canonical(entries) => entries,
        UpstreamPayload::PersonNested(persons) => {
            let mut entries = Vec::new();
            for person in persons {
                let navn = person.navn.as_deref().unwrap_or("Ukjent navn").to_string();
                for arbeidsgiver in person.arbeidsgiver {
                    let orgnr = arbeidsgiver.arbeidsgiveridentifikator.organisasjonsnummer;
                    for arbeidstaker in arbeidsgiver.arbeidstaker {
                        entries.push(entry(
                            format!("Skattekort for {navn}"),
                            Some(format!("Arbeidsgiver: {orgnr}")),
                            arbeidstaker,
                        ));
                    }
                }
            }
            entries
        }
        UpstreamPayload::FlatRecords(records) => records
            .into_iter()
            .map(|record| {
                let overskrift = format!("Skattekort for {}", record.arbeidstakeridentifikator);
                entry(overskrift, None, record)
            })
            .collect(),
        UpstreamPayload::LegacySingle(dto) => vec![legacy_entry(dto)],
    };
    Ok(entries)
}

fn entry(
    overskrift: String,
    under_overskrift: Option<String>,
    record: Arbeidstaker,
) -> NormalizedSkattekort {
    let kort = record.skattekort.unwrap_or_default();
    NormalizedSkattekort {
        overskrift,
        under_overskrift,
        inntektsaar: record.inntektsaar,
        resultat: record.resultat_paa_forespoersel,
        utstedt_dato: kort.utstedt_dato,
        skattekort_id: kort.skattekortidentifikator,
        forskuddstrekk: kort.forskuddstrekk.unwrap_or_default(),
        tilleggsopplysning: record.tilleggsopplysning,
    }
}

fn legacy_entry(dto: LegacySkattekort) -> NormalizedSkattekort {
    let subjekt = dto
        .arbeidstaker
        .navn
        .unwrap_or_else(|| dto.arbeidstaker.fnr.clone());
    NormalizedSkattekort {
        overskrift: format!("Skattekort for {subjekt}"),
        under_overskrift: Some(format!(
            "Arbeidsgiver: {}",
            dto.arbeidsgiver.organisasjonsnummer
        )),
        inntektsaar: dto.inntektsaar,
        // A legacy payload is only ever emitted for a delivered card.
        resultat: Resultat::SkattekortopplysningerOK,
        utstedt_dato: None,
        skattekort_id: None,
        forskuddstrekk: dto.skattekort.map(legacy_forskuddstrekk).unwrap_or_default(),
        tilleggsopplysning: dto
            .tilleggsopplysninger
            .and_then(|raw| parse_code::<Tilleggsopplysning>(&raw))
            .map(|code| vec![code]),
    }
}

/// Translate the legacy flat withholding fields into a tagged instruction.
/// Priority: exemption card, then table, then plain percent.
fn legacy_forskuddstrekk(kort: LegacyTrekk) -> Vec<Forskuddstrekk> {
    let trekkode = kort.trekkgrunn.as_deref().and_then(parse_code::<Trekkode>);
    if kort.frikort == Some(true) {
        return vec![Forskuddstrekk::Frikort {
            trekkode,
            frikortbeloep: None,
        }];
    }
    if kort.tabellnummer.is_some() {
        return vec![Forskuddstrekk::Trekktabell {
            trekkode,
            tabellnummer: kort.tabellnummer,
            prosentsats: kort.prosentsats,
            antall_maaneder_for_trekk: None,
        }];
    }
    if kort.prosentsats.is_some() {
        return vec![Forskuddstrekk::Trekkprosent {
            trekkode,
            prosentsats: kort.prosentsats,
            antall_maaneder_for_trekk: None,
        }];
    }
    Vec::new()
}

/// Parse a bare code string against a closed code enum; unknown codes are
/// dropped rather than rejected.
fn parse_code<T: serde::de::DeserializeOwned>(raw: &str) -> Option<T> {
    serde_json::from_value(Value::String(raw.to_string())).ok()
}
