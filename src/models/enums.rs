use crate::db::StoreError;
use serde::{Deserialize, Serialize};

/// Macro to generate enum with as_str + std::str::FromStr pattern
macro_rules! str_enum {
    ($name:ident { $($variant:ident => $s:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $s),+
                }
            }

            pub const ALL: &'static [$name] = &[$(Self::$variant),+];
        }

        impl std::str::FromStr for $name {
            type Err = StoreError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($s => Ok(Self::$variant)),+,
                    _ => Err(StoreError::InvalidEnum {
                        field: stringify!($name).into(),
                        value: s.into(),
                    }),
                }
            }
        }
    };
}

str_enum!(PlanTier {
    Silver => "Silver",
    Gold => "Gold",
    Platinum => "Platinum",
    Kgomo => "Kgomo",
    BudgetBuster => "Budget Buster",
    Catering => "Catering",
    Tombstone => "Tombstone",
    Black => "Black",
    Pearl => "Pearl",
    Ivory => "Ivory",
    AfterTears => "After Tears",
});

str_enum!(DocumentKind {
    IdCopy => "id_copy",
    ProofOfAddress => "proof_of_address",
});

str_enum!(SignatureRole {
    Holder => "holder",
    Office => "office",
});

str_enum!(ConsentDocType {
    IdCopy => "ID Copy",
    ProofOfPayment => "Proof of Payment",
    PolicyCertificate => "Policy Certificate",
    Other => "Other",
});

str_enum!(UploadStatus {
    Empty => "empty",
    Uploading => "uploading",
    Uploaded => "uploaded",
    PendingVerification => "pending_verification",
    Verified => "verified",
    Rejected => "rejected",
});

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn plan_tier_round_trip() {
        for tier in PlanTier::ALL {
            assert_eq!(PlanTier::from_str(tier.as_str()).unwrap(), *tier);
        }
        assert_eq!(PlanTier::ALL.len(), 11);
    }

    #[test]
    fn plan_tier_rejects_unknown() {
        let err = PlanTier::from_str("Diamond").unwrap_err();
        assert!(err.to_string().contains("PlanTier"));
    }

    #[test]
    fn document_kind_round_trip() {
        for (variant, s) in [
            (DocumentKind::IdCopy, "id_copy"),
            (DocumentKind::ProofOfAddress, "proof_of_address"),
        ] {
            assert_eq!(variant.as_str(), s);
            assert_eq!(DocumentKind::from_str(s).unwrap(), variant);
        }
    }

    #[test]
    fn signature_role_round_trip() {
        assert_eq!(SignatureRole::from_str("holder").unwrap(), SignatureRole::Holder);
        assert_eq!(SignatureRole::from_str("office").unwrap(), SignatureRole::Office);
    }

    #[test]
    fn upload_status_round_trip() {
        for status in UploadStatus::ALL {
            assert_eq!(UploadStatus::from_str(status.as_str()).unwrap(), *status);
        }
    }

    #[test]
    fn consent_doc_type_round_trip() {
        for dt in ConsentDocType::ALL {
            assert_eq!(ConsentDocType::from_str(dt.as_str()).unwrap(), *dt);
        }
    }
}
