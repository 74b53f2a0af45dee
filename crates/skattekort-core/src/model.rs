//! Canonical skattekort display model.
//!
//! Field and code names follow the Norwegian upstream contract; the
//! serialized camelCase form is what the frontend renders, regardless of
//! which upstream shape the data arrived in.

use serde::{Deserialize, Serialize};

/// Outcome of a lookup for one employee record (`resultatPaaForespoersel`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Resultat {
    IkkeSkattekort,
    VurderArbeidstillatelse,
    IkkeTrekkplikt,
    SkattekortopplysningerOK,
    UgyldigOrganisasjonsnummer,
    UgyldigFoedselsEllerDnummer,
    UtgaattDnummerSkattekortForFoedselsnummerErLevert,
}

/// Withholding-reason code attached to every instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Trekkode {
    LoennFraHovedarbeidsgiver,
    LoennFraBiarbeidsgiver,
    LoennFraNAV,
    Pensjon,
    PensjonFraNAV,
    LoennTilUtenrikstjenestemann,
    LoennKunTrygdeavgiftTilUtenlandskBorger,
    LoennKunTrygdeavgiftTilUtenlandskBorgerSomGrensegjenger,
    UfoeretrygdFraNAV,
    UfoereytelserFraAndre,
    Introduksjonsstoenad,
}

/// Supplementary-condition code on a tax card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Tilleggsopplysning {
    OppholdPaaSvalbard,
    Kildeskattpensjonist,
    OppholdITiltakssone,
    KildeskattPaaLoenn,
}

/// One withholding instruction, discriminated on the wire by `type`.
///
/// Sub-fields the upstream did not send are simply absent, never an error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Forskuddstrekk {
    /// Exemption card; withholding only above the threshold amount.
    Frikort {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        trekkode: Option<Trekkode>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        frikortbeloep: Option<i64>,
    },
    /// Table-based withholding, optionally with a percent fallback.
    #[serde(rename_all = "camelCase")]
    Trekktabell {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        trekkode: Option<Trekkode>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        tabellnummer: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        prosentsats: Option<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        antall_maaneder_for_trekk: Option<u32>,
    },
    /// Flat percent withholding.
    #[serde(rename_all = "camelCase")]
    Trekkprosent {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        trekkode: Option<Trekkode>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        prosentsats: Option<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        antall_maaneder_for_trekk: Option<u32>,
    },
}

/// One canonical display entry, whichever upstream shape it came from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedSkattekort {
    pub overskrift: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub under_overskrift: Option<String>,
    pub inntektsaar: i32,
    pub resultat: Resultat,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub utstedt_dato: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skattekort_id: Option<i64>,
    #[serde(default)]
    pub forskuddstrekk: Vec<Forskuddstrekk>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tilleggsopplysning: Option<Vec<Tilleggsopplysning>>,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn resultat_uses_upstream_wire_names() {
        assert_eq!(
            serde_json::to_value(Resultat::SkattekortopplysningerOK).unwrap(),
            json!("skattekortopplysningerOK")
        );
        assert_eq!(
            serde_json::to_value(Resultat::UgyldigFoedselsEllerDnummer).unwrap(),
            json!("ugyldigFoedselsEllerDnummer")
        );
    }

    #[test]
    fn trekkode_uses_upstream_wire_names() {
        assert_eq!(
            serde_json::to_value(Trekkode::LoennFraNAV).unwrap(),
            json!("loennFraNAV")
        );
    }

    #[test]
    fn forskuddstrekk_is_discriminated_by_type() {
        let trekk: Forskuddstrekk = serde_json::from_value(json!({
            "type": "Trekktabell",
            "trekkode": "loennFraHovedarbeidsgiver",
            "tabellnummer": "7100",
            "prosentsats": 34.0
        }))
        .unwrap();
        assert!(matches!(
            trekk,
            Forskuddstrekk::Trekktabell {
                trekkode: Some(Trekkode::LoennFraHovedarbeidsgiver),
                ..
            }
        ));
    }

    #[test]
    fn forskuddstrekk_tolerates_missing_subfields() {
        let trekk: Forskuddstrekk =
            serde_json::from_value(json!({ "type": "Frikort" })).unwrap();
        assert_eq!(
            trekk,
            Forskuddstrekk::Frikort {
                trekkode: None,
                frikortbeloep: None
            }
        );
    }

    #[test]
    fn entry_omits_absent_optionals_when_serialized() {
        let entry = NormalizedSkattekort {
            overskrift: "Skattekort for 12345678901".into(),
            under_overskrift: None,
            inntektsaar: 2025,
            resultat: Resultat::IkkeSkattekort,
            utstedt_dato: None,
            skattekort_id: None,
            forskuddstrekk: vec![],
            tilleggsopplysning: None,
        };
        assert_eq!(
            serde_json::to_value(&entry).unwrap(),
            json!({
                "overskrift": "Skattekort for 12345678901",
                "inntektsaar": 2025,
                "resultat": "ikkeSkattekort",
                "forskuddstrekk": []
            })
        );
    }
}
