//! Domain enums. Each is stored as a TEXT column holding its snake_case label.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
#[error("invalid {kind} value: {value}")]
pub struct ParseEnumError {
    pub kind: &'static str,
    pub value: String,
}

macro_rules! text_enum {
    (
        $(#[$meta:meta])*
        $name:ident, $kind:literal {
            $($variant:ident => $value:literal, $label:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(rename_all = "snake_case")]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $value),+
                }
            }

            /// Human-readable label
            pub fn label(&self) -> &'static str {
                match self {
                    $($name::$variant => $label),+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = ParseEnumError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($value => Ok($name::$variant),)+
                    other => Err(ParseEnumError { kind: $kind, value: other.to_string() }),
                }
            }
        }

        impl sqlx::Type<sqlx::Postgres> for $name {
            fn type_info() -> sqlx::postgres::PgTypeInfo {
                <&str as sqlx::Type<sqlx::Postgres>>::type_info()
            }

            fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
                <&str as sqlx::Type<sqlx::Postgres>>::compatible(ty)
            }
        }

        impl<'r> sqlx::Decode<'r, sqlx::Postgres> for $name {
            fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
                let s = <&str as sqlx::Decode<sqlx::Postgres>>::decode(value)?;
                Ok(s.parse()?)
            }
        }

        impl<'q> sqlx::Encode<'q, sqlx::Postgres> for $name {
            fn encode_by_ref(&self, buf: &mut sqlx::postgres::PgArgumentBuffer) -> sqlx::encode::IsNull {
                <&str as sqlx::Encode<sqlx::Postgres>>::encode(self.as_str(), buf)
            }
        }
    };
}

text_enum! {
    Gender, "gender" {
        Male => "male", "Male",
        Female => "female", "Female",
    }
}

text_enum! {
    MaritalStatus, "marital status" {
        Single => "single", "Single",
        Married => "married", "Married",
        Divorced => "divorced", "Divorced",
        Widowed => "widowed", "Widowed",
    }
}

text_enum! {
    SalaryPeriod, "salary period" {
        Monthly => "monthly", "Monthly",
        Yearly => "yearly", "Yearly",
    }
}

text_enum! {
    EventType, "event type" {
        Marriage => "marriage", "Marriage",
        Divorce => "divorce", "Divorce",
        Birth => "birth", "Birth",
        Death => "death", "Death",
        Conversion => "conversion", "Conversion",
        Hajj => "hajj", "Hajj",
        Umrah => "umrah", "Umrah",
        Education => "education", "Education",
        Employment => "employment", "Employment",
        Other => "other", "Other",
    }
}

text_enum! {
    BusinessCategory, "business category" {
        Restaurant => "restaurant", "Restaurant",
        Grocery => "grocery", "Grocery",
        Clothing => "clothing", "Clothing",
        Electronics => "electronics", "Electronics",
        Automotive => "automotive", "Automotive",
        Healthcare => "healthcare", "Healthcare",
        Education => "education", "Education",
        RealEstate => "real_estate", "Real Estate",
        Construction => "construction", "Construction",
        ProfessionalServices => "professional_services", "Professional Services",
        Retail => "retail", "Retail",
        Wholesale => "wholesale", "Wholesale",
        Manufacturing => "manufacturing", "Manufacturing",
        Transportation => "transportation", "Transportation",
        Hospitality => "hospitality", "Hospitality",
        BeautySalon => "beauty_salon", "Beauty Salon",
        HalalMeat => "halal_meat", "Halal Meat",
        IslamicFinance => "islamic_finance", "Islamic Finance",
        Bookstore => "bookstore", "Bookstore",
        Other => "other", "Other",
    }
}

text_enum! {
    MasjidType, "masjid type" {
        Masjid => "masjid", "Masjid",
        Musalla => "musalla", "Musalla",
    }
}

text_enum! {
    EducationType, "education type" {
        HighSchool => "high_school", "High School",
        Diploma => "diploma", "Diploma",
        Associate => "associate", "Associate",
        Bachelors => "bachelors", "Bachelors",
        Masters => "masters", "Masters",
        Phd => "phd", "PhD",
        Professional => "professional", "Professional",
        Vocational => "vocational", "Vocational",
        Hifz => "hifz", "Hifz",
        Aalim => "aalim", "Aalim",
        Mufti => "mufti", "Mufti",
        Qari => "qari", "Qari",
        Arabic => "arabic", "Arabic",
        IslamicStudies => "islamic_studies", "Islamic Studies",
        Shariah => "shariah", "Shariah",
        Hadith => "hadith", "Hadith",
        Tafseer => "tafseer", "Tafseer",
        Fiqh => "fiqh", "Fiqh",
        OtherIslamic => "other_islamic", "Other Islamic",
        Other => "other", "Other",
    }
}

text_enum! {
    EducationCategory, "education category" {
        Formal => "formal", "Formal",
        Islamic => "islamic", "Islamic",
    }
}

text_enum! {
    MenuFileType, "menu file type" {
        Pdf => "pdf", "PDF",
        Image => "image", "Image",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_round_trip_through_from_str() {
        for category in BusinessCategory::ALL {
            assert_eq!(category.as_str().parse::<BusinessCategory>().unwrap(), *category);
        }
        assert_eq!(BusinessCategory::ALL.len(), 20);
    }

    #[test]
    fn serde_uses_snake_case_labels() {
        let json = serde_json::to_string(&BusinessCategory::RealEstate).unwrap();
        assert_eq!(json, "\"real_estate\"");
        let parsed: EducationType = serde_json::from_str("\"other_islamic\"").unwrap();
        assert_eq!(parsed, EducationType::OtherIslamic);
    }

    #[test]
    fn unknown_value_is_rejected() {
        let err = "widower".parse::<MaritalStatus>().unwrap_err();
        assert_eq!(err.to_string(), "invalid marital status value: widower");
    }
}
