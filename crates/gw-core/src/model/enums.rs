//! Fixed tag and value vocabularies.
//!
//! Matching is case-sensitive. Values outside a vocabulary are kept verbatim in
//! [`Enumerated::Unrecognized`] so nothing read from the file is lost.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A closed set of GEDCOM spellings.
pub trait Vocabulary: Sized + Copy + 'static {
    /// Exact GEDCOM spelling of this value.
    fn gedcom(self) -> &'static str;

    /// Human-readable name.
    fn display(self) -> &'static str;

    /// Every member of the vocabulary, in declaration order.
    fn all() -> &'static [Self];

    /// Case-sensitive lookup of a GEDCOM spelling.
    fn from_gedcom(raw: &str) -> Option<Self> {
        Self::all().iter().copied().find(|value| value.gedcom() == raw)
    }
}

macro_rules! vocabulary {
    (
        $(#[$meta:meta])*
        $name:ident { $($variant:ident => ($gedcom:literal, $display:literal)),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        pub enum $name {
            $($variant),+
        }

        impl Vocabulary for $name {
            fn gedcom(self) -> &'static str {
                match self {
                    $(Self::$variant => $gedcom),+
                }
            }

            fn display(self) -> &'static str {
                match self {
                    $(Self::$variant => $display),+
                }
            }

            fn all() -> &'static [Self] {
                &[$(Self::$variant),+]
            }
        }
    };
}

vocabulary! {
    /// Event tags valid directly under an individual record.
    IndividualEventType {
        Adoption => ("ADOP", "Adoption"),
        AdultChristening => ("CHRA", "Christening (Adult)"),
        Arrival => ("ARVL", "Arrival"),
        Baptism => ("BAPM", "Baptism"),
        BarMitzvah => ("BARM", "Bar Mitzvah"),
        BasMitzvah => ("BASM", "Bas Mitzvah"),
        Birth => ("BIRT", "Birth"),
        Blessing => ("BLES", "Blessing"),
        Burial => ("BURI", "Burial"),
        Census => ("CENS", "Census"),
        Christening => ("CHR", "Christening"),
        Confirmation => ("CONF", "Confirmation"),
        Cremation => ("CREM", "Cremation"),
        Death => ("DEAT", "Death"),
        Emigration => ("EMIG", "Emigration"),
        Event => ("EVEN", "Event"),
        FirstCommunion => ("FCOM", "First Communion"),
        Graduation => ("GRAD", "Graduation"),
        Immigration => ("IMMI", "Immigration"),
        Naturalization => ("NATU", "Naturalization"),
        Ordination => ("ORDN", "Ordination"),
        Probate => ("PROB", "Probate"),
        Retirement => ("RETI", "Retirement"),
        Will => ("WILL", "Will"),
    }
}

vocabulary! {
    /// Event tags valid directly under a family record.
    FamilyEventType {
        Annulment => ("ANUL", "Annulment"),
        Census => ("CENS", "Census"),
        Divorce => ("DIV", "Divorce"),
        DivorceFiled => ("DIVF", "Divorce filed"),
        Engagement => ("ENGA", "Engagement"),
        Event => ("EVEN", "Event"),
        Marriage => ("MARR", "Marriage"),
        MarriageBann => ("MARB", "Marriage bann"),
        MarriageContract => ("MARC", "Marriage contract"),
        MarriageLicense => ("MARL", "Marriage license"),
        MarriageSettlement => ("MARS", "Marriage settlement"),
    }
}

vocabulary! {
    /// Attribute tags valid directly under an individual record.
    IndividualAttributeType {
        CasteName => ("CAST", "Caste"),
        PhysicalDescription => ("DSCR", "Physical description"),
        ScholasticAchievement => ("EDUC", "Education"),
        NationalIdNumber => ("IDNO", "National ID number"),
        NationalOrTribalOrigin => ("NATI", "National or tribal origin"),
        CountOfChildren => ("NCHI", "Number of children"),
        CountOfMarriages => ("NMR", "Number of marriages"),
        Occupation => ("OCCU", "Occupation"),
        Possessions => ("PROP", "Possessions"),
        ReligiousAffiliation => ("RELI", "Religious affiliation"),
        Residence => ("RESI", "Residence"),
        SocialSecurityNumber => ("SSN", "Social security number"),
        NobilityTitle => ("TITL", "Nobility title"),
        Fact => ("FACT", "Fact"),
    }
}

vocabulary! {
    Sex {
        Male => ("M", "Male"),
        Female => ("F", "Female"),
        Unknown => ("U", "Unknown"),
    }
}

vocabulary! {
    /// `PEDI` values on a child-to-family link.
    Pedigree {
        Adopted => ("adopted", "Adopted"),
        Birth => ("birth", "Birth"),
        Foster => ("foster", "Foster"),
        Sealing => ("sealing", "Sealing"),
    }
}

vocabulary! {
    /// `ADOP` values naming which parent adopted.
    AdoptedBy {
        Husband => ("HUSB", "Adopted by husband"),
        Wife => ("WIFE", "Adopted by wife"),
        Both => ("BOTH", "Adopted by both"),
    }
}

vocabulary! {
    /// `RESN` values.
    Restriction {
        Confidential => ("confidential", "Confidential"),
        Locked => ("locked", "Locked"),
        Privacy => ("privacy", "Privacy"),
    }
}

vocabulary! {
    /// `QUAY` values on a citation.
    Certainty {
        Unreliable => ("0", "Unreliable evidence"),
        Questionable => ("1", "Questionable reliability"),
        Secondary => ("2", "Secondary evidence"),
        Direct => ("3", "Direct and primary evidence"),
    }
}

vocabulary! {
    /// `STAT` values on a child-to-family link.
    ChildLinkageStatus {
        Challenged => ("challenged", "Challenged"),
        Disproven => ("disproven", "Disproven"),
        Proven => ("proven", "Proven"),
    }
}

vocabulary! {
    /// LDS ordinance tags valid directly under an individual record.
    LdsOrdinanceType {
        Baptism => ("BAPL", "LDS baptism"),
        Confirmation => ("CONL", "LDS confirmation"),
        Endowment => ("ENDL", "LDS endowment"),
        ChildSealing => ("SLGC", "LDS child sealing"),
    }
}

/// A vocabulary value, or the raw text when the file used something else.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Enumerated<T> {
    Known(T),
    Unrecognized(String),
}

impl<T: Vocabulary> Enumerated<T> {
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        T::from_gedcom(raw).map_or_else(|| Self::Unrecognized(raw.to_string()), Self::Known)
    }

    #[must_use]
    pub fn known(&self) -> Option<T> {
        match self {
            Self::Known(value) => Some(*value),
            Self::Unrecognized(_) => None,
        }
    }

    /// The text as written in the file.
    #[must_use]
    pub fn as_gedcom(&self) -> &str {
        match self {
            Self::Known(value) => value.gedcom(),
            Self::Unrecognized(raw) => raw,
        }
    }
}

/// Known values print their human-readable name, unrecognised ones their raw text.
impl<T: Vocabulary> fmt::Display for Enumerated<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Known(value) => f.write_str(value.display()),
            Self::Unrecognized(raw) => f.write_str(raw),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{
        Enumerated, FamilyEventType, IndividualAttributeType, IndividualEventType, Pedigree, Sex,
        Vocabulary,
    };

    #[test]
    fn tag_lookup_is_case_sensitive() {
        assert_eq!(
            IndividualEventType::from_gedcom("BIRT"),
            Some(IndividualEventType::Birth)
        );
        assert_eq!(IndividualEventType::from_gedcom("birt"), None);
        assert_eq!(Pedigree::from_gedcom("adopted"), Some(Pedigree::Adopted));
        assert_eq!(Pedigree::from_gedcom("ADOPTED"), None);
    }

    #[test]
    fn vocabularies_have_expected_sizes() {
        assert_eq!(IndividualEventType::all().len(), 24);
        assert_eq!(FamilyEventType::all().len(), 11);
        assert_eq!(IndividualAttributeType::all().len(), 14);
    }

    #[test]
    fn unknown_values_are_preserved() {
        let sex: Enumerated<Sex> = Enumerated::parse("X");
        assert_eq!(sex, Enumerated::Unrecognized("X".to_string()));
        assert_eq!(sex.as_gedcom(), "X");
        assert_eq!(sex.known(), None);

        let known: Enumerated<Sex> = Enumerated::parse("F");
        assert_eq!(known.known(), Some(Sex::Female));
        assert_eq!(known.as_gedcom(), "F");
    }

    #[test]
    fn display_uses_readable_names() {
        let known: Enumerated<IndividualEventType> = Enumerated::parse("CHRA");
        assert_eq!(known.to_string(), "Christening (Adult)");
        let raw: Enumerated<Pedigree> = Enumerated::parse("step");
        assert_eq!(raw.to_string(), "step");
    }
}
