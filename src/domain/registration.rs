//! Registration submission model and validation rules.

use super::multipart::{FormData, UploadedFile};
use bytes::Bytes;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;
use thiserror::Error;

pub const MAX_PAYMENT_PROOF_BYTES: usize = 5 * 1024 * 1024;
pub const ALLOWED_PAYMENT_PROOF_TYPES: [&str; 4] =
    ["image/jpeg", "image/png", "image/jpg", "application/pdf"];

/// Form field carrying the optional payment proof upload.
pub const PAYMENT_PROOF_FIELD: &str = "paymentProof";
/// Storage prefix for payment proof objects.
pub const PAYMENT_PROOF_PREFIX: &str = "payment-proofs";
const TEXT_PART_CONTENT_TYPE: &str = "text/plain";

pub const DEFAULT_ID_PREFIX: &str = "NRYLI2025";
const ID_TIMESTAMP_DIGITS: usize = 8;

pub const MIN_AGE: i64 = 15;
pub const MAX_AGE: i64 = 35;

const DEFAULT_DIETARY_PREFERENCE: &str = "None";
const EMAIL_PATTERN: &str = r"^[^\s@]+@[^\s@]+\.[^\s@]+$";

/// Required form fields, in the order they are checked.
pub const REQUIRED_FIELDS: [&str; 13] = [
    "delegateType",
    "surname",
    "firstName",
    "institution",
    "institutionAddress",
    "institutionContact",
    "institutionEmail",
    "regionCluster",
    "delegateContact",
    "delegateEmail",
    "age",
    "tshirtSize",
    "paymentOption",
];

/// A rejected submission. The display text is what the client sees.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("File size exceeds 5MB limit")]
    FileTooLarge { size: usize },
    #[error("Invalid file type. Only JPG, PNG, and PDF are allowed.")]
    UnsupportedFileType { content_type: String },
    #[error("Missing required field: {0}")]
    MissingField(&'static str),
    #[error("Age must be between 15 and 35")]
    AgeOutOfRange,
    #[error("Invalid institution email format")]
    InvalidInstitutionEmail,
    #[error("Invalid delegate email format")]
    InvalidDelegateEmail,
}

/// `{prefix}-{last 8 digits of the millisecond timestamp}`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RegistrationId(String);

impl RegistrationId {
    pub fn from_millis(prefix: &str, millis: i64) -> Self {
        let digits = millis.unsigned_abs().to_string();
        let tail = &digits[digits.len().saturating_sub(ID_TIMESTAMP_DIGITS)..];
        Self(format!("{}-{}", prefix, tail))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RegistrationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RegistrationStatus {
    Pending,
}

/// Row persisted for every accepted submission. Field names are the table
/// columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Registration {
    pub registration_id: RegistrationId,
    pub delegate_type: String,
    pub surname: String,
    pub first_name: String,
    pub middle_initial: Option<String>,
    pub institution: String,
    pub institution_address: String,
    pub institution_contact: String,
    pub institution_email: String,
    pub region_cluster: String,
    pub delegate_contact: String,
    pub delegate_email: String,
    pub age: u8,
    pub tshirt_size: String,
    pub dietary_preferences: String,
    pub dietary_comments: Option<String>,
    pub payment_option: String,
    pub payment_proof_url: Option<String>,
    pub transaction_ref: Option<String>,
    pub status: RegistrationStatus,
}

/// A payment proof that passed validation, ready for upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentProof {
    pub key: String,
    pub content_type: String,
    pub data: Bytes,
}

impl PaymentProof {
    pub fn prepare(
        file: &UploadedFile,
        registration_id: &RegistrationId,
        millis: i64,
    ) -> Result<Self, ValidationError> {
        validate_payment_proof(file)?;
        Ok(Self {
            key: payment_proof_key(registration_id, millis, &file.file_name),
            content_type: file.content_type.clone(),
            data: file.data.clone(),
        })
    }

    /// Extract and validate the payment proof carried by `form`, if any.
    ///
    /// A non-empty `paymentProof` sent as a plain text part has no file type
    /// and is rejected like any other unsupported upload.
    pub fn from_form(
        form: &FormData,
        registration_id: &RegistrationId,
        millis: i64,
    ) -> Result<Option<Self>, ValidationError> {
        if let Some(file) = form.file(PAYMENT_PROOF_FIELD) {
            return Self::prepare(file, registration_id, millis).map(Some);
        }
        match form.field(PAYMENT_PROOF_FIELD) {
            Some(value) if !value.is_empty() => Err(ValidationError::UnsupportedFileType {
                content_type: TEXT_PART_CONTENT_TYPE.to_string(),
            }),
            _ => Ok(None),
        }
    }
}

pub fn validate_payment_proof(file: &UploadedFile) -> Result<(), ValidationError> {
    if file.size() > MAX_PAYMENT_PROOF_BYTES {
        return Err(ValidationError::FileTooLarge { size: file.size() });
    }
    if !ALLOWED_PAYMENT_PROOF_TYPES.contains(&file.content_type.as_str()) {
        return Err(ValidationError::UnsupportedFileType {
            content_type: file.content_type.clone(),
        });
    }
    Ok(())
}

/// Storage key for a payment proof. Browsers on some platforms send a full
/// client path as the filename; only its last component is kept.
pub fn payment_proof_key(registration_id: &RegistrationId, millis: i64, file_name: &str) -> String {
    let base_name = file_name
        .rsplit(|c: char| c == '/' || c == '\\')
        .next()
        .unwrap_or(file_name);
    format!(
        "{}/{}-{}-{}",
        PAYMENT_PROOF_PREFIX, registration_id, millis, base_name
    )
}

/// Validated and normalized form fields, before an ID and proof URL are
/// attached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationDraft {
    pub delegate_type: String,
    pub surname: String,
    pub first_name: String,
    pub middle_initial: Option<String>,
    pub institution: String,
    pub institution_address: String,
    pub institution_contact: String,
    pub institution_email: String,
    pub region_cluster: String,
    pub delegate_contact: String,
    pub delegate_email: String,
    pub age: u8,
    pub tshirt_size: String,
    pub dietary_preferences: String,
    pub dietary_comments: Option<String>,
    pub payment_option: String,
    pub transaction_ref: Option<String>,
}

impl RegistrationDraft {
    pub fn from_form(form: &FormData) -> Result<Self, ValidationError> {
        if let Some(missing) = REQUIRED_FIELDS
            .into_iter()
            .find(|name| form.field(name).map_or(true, |value| value.trim().is_empty()))
        {
            return Err(ValidationError::MissingField(missing));
        }

        let required = |name: &str| {
            form.field(name)
                .map(str::trim)
                .unwrap_or_default()
                .to_string()
        };

        let age = parse_leading_int(&required("age"))
            .filter(|age| (MIN_AGE..=MAX_AGE).contains(age))
            .and_then(|age| u8::try_from(age).ok())
            .ok_or(ValidationError::AgeOutOfRange)?;

        let institution_email = required("institutionEmail");
        if !is_valid_email(&institution_email) {
            return Err(ValidationError::InvalidInstitutionEmail);
        }
        let delegate_email = required("delegateEmail");
        if !is_valid_email(&delegate_email) {
            return Err(ValidationError::InvalidDelegateEmail);
        }

        Ok(Self {
            delegate_type: required("delegateType"),
            surname: required("surname"),
            first_name: required("firstName"),
            middle_initial: optional(form, "middleInitial"),
            institution: required("institution"),
            institution_address: required("institutionAddress"),
            institution_contact: required("institutionContact"),
            institution_email: institution_email.to_lowercase(),
            region_cluster: required("regionCluster"),
            delegate_contact: required("delegateContact"),
            delegate_email: delegate_email.to_lowercase(),
            age,
            tshirt_size: required("tshirtSize"),
            dietary_preferences: optional(form, "dietaryPreferences")
                .unwrap_or_else(|| DEFAULT_DIETARY_PREFERENCE.to_string()),
            dietary_comments: optional(form, "dietaryComments"),
            payment_option: required("paymentOption"),
            transaction_ref: optional(form, "transactionRef"),
        })
    }

    pub fn into_registration(
        self,
        registration_id: RegistrationId,
        payment_proof_url: Option<String>,
    ) -> Registration {
        Registration {
            registration_id,
            delegate_type: self.delegate_type,
            surname: self.surname,
            first_name: self.first_name,
            middle_initial: self.middle_initial,
            institution: self.institution,
            institution_address: self.institution_address,
            institution_contact: self.institution_contact,
            institution_email: self.institution_email,
            region_cluster: self.region_cluster,
            delegate_contact: self.delegate_contact,
            delegate_email: self.delegate_email,
            age: self.age,
            tshirt_size: self.tshirt_size,
            dietary_preferences: self.dietary_preferences,
            dietary_comments: self.dietary_comments,
            payment_option: self.payment_option,
            payment_proof_url,
            transaction_ref: self.transaction_ref,
            status: RegistrationStatus::Pending,
        }
    }
}

fn optional(form: &FormData, name: &str) -> Option<String> {
    form.field(name)
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

pub fn is_valid_email(value: &str) -> bool {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL
        .get_or_init(|| Regex::new(EMAIL_PATTERN).unwrap())
        .is_match(value)
}

/// Leading optional sign and digits, ignoring surrounding whitespace and any
/// trailing text: `"20 years"` is 20, `"abc"` is `None`.
pub fn parse_leading_int(value: &str) -> Option<i64> {
    let value = value.trim_start();
    let (sign, rest) = match value.as_bytes().first() {
        Some(b'-') => (-1, &value[1..]),
        Some(b'+') => (1, &value[1..]),
        _ => (1, value),
    };
    let digits_end = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    rest[..digits_end].parse::<i64>().ok().map(|n| sign * n)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete_form() -> FormData {
        let mut form = FormData::default();
        for (name, value) in [
            ("delegateType", "Student"),
            ("surname", " Dela Cruz "),
            ("firstName", "Juan"),
            ("institution", "Northern Youth Institute"),
            ("institutionAddress", "Baguio City"),
            ("institutionContact", "074-123-4567"),
            ("institutionEmail", "Registrar@NYI.edu.ph"),
            ("regionCluster", "CAR"),
            ("delegateContact", "0917-000-0000"),
            ("delegateEmail", " Juan.DelaCruz@Example.com "),
            ("age", "21"),
            ("tshirtSize", "M"),
            ("paymentOption", "GCash"),
        ] {
            form.insert_field(name, value);
        }
        form
    }

    fn proof(content_type: &str, size: usize) -> UploadedFile {
        UploadedFile {
            file_name: "receipt.png".to_string(),
            content_type: content_type.to_string(),
            data: Bytes::from(vec![0u8; size]),
        }
    }

    #[test]
    fn test_registration_id_uses_last_eight_digits() {
        let id = RegistrationId::from_millis(DEFAULT_ID_PREFIX, 1_735_689_600_123);
        assert_eq!(id.as_str(), "NRYLI2025-89600123");
    }

    #[test]
    fn test_registration_id_short_timestamp() {
        let id = RegistrationId::from_millis("EVT", 4_213);
        assert_eq!(id.to_string(), "EVT-4213");
    }

    #[test]
    fn test_payment_proof_key() {
        let id = RegistrationId::from_millis(DEFAULT_ID_PREFIX, 1_735_689_600_123);
        assert_eq!(
            payment_proof_key(&id, 1_735_689_600_123, "receipt.png"),
            "payment-proofs/NRYLI2025-89600123-1735689600123-receipt.png"
        );
    }

    #[test]
    fn test_payment_proof_key_strips_client_path() {
        let id = RegistrationId::from_millis("X", 1);
        assert_eq!(
            payment_proof_key(&id, 1, r"C:\fakepath\receipt.pdf"),
            "payment-proofs/X-1-1-receipt.pdf"
        );
        assert_eq!(
            payment_proof_key(&id, 1, "../../etc/passwd"),
            "payment-proofs/X-1-1-passwd"
        );
    }

    #[test]
    fn test_payment_proof_size_limit() {
        assert!(validate_payment_proof(&proof("image/png", MAX_PAYMENT_PROOF_BYTES)).is_ok());
        let err = validate_payment_proof(&proof("image/png", MAX_PAYMENT_PROOF_BYTES + 1))
            .unwrap_err();
        assert_eq!(err.to_string(), "File size exceeds 5MB limit");
    }

    #[test]
    fn test_payment_proof_size_checked_before_type() {
        let err = validate_payment_proof(&proof("text/plain", MAX_PAYMENT_PROOF_BYTES + 1))
            .unwrap_err();
        assert!(matches!(err, ValidationError::FileTooLarge { .. }));
    }

    #[test]
    fn test_payment_proof_types() {
        for content_type in ALLOWED_PAYMENT_PROOF_TYPES {
            assert!(validate_payment_proof(&proof(content_type, 10)).is_ok());
        }
        let err = validate_payment_proof(&proof("image/gif", 10)).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid file type. Only JPG, PNG, and PDF are allowed."
        );
    }

    #[test]
    fn test_payment_proof_from_form() {
        let id = RegistrationId::from_millis("NRYLI2025", 1_735_689_600_123);

        assert_eq!(PaymentProof::from_form(&complete_form(), &id, 1).unwrap(), None);

        let mut form = complete_form();
        form.insert_field(PAYMENT_PROOF_FIELD, "");
        assert_eq!(PaymentProof::from_form(&form, &id, 1).unwrap(), None);

        form.insert_field(PAYMENT_PROOF_FIELD, "not-a-file");
        let err = PaymentProof::from_form(&form, &id, 1).unwrap_err();
        assert!(matches!(err, ValidationError::UnsupportedFileType { .. }));
        assert_eq!(
            err.to_string(),
            "Invalid file type. Only JPG, PNG, and PDF are allowed."
        );

        form.insert_file(
            PAYMENT_PROOF_FIELD,
            UploadedFile {
                file_name: "receipt.png".to_string(),
                content_type: "image/png".to_string(),
                data: Bytes::from_static(b"png"),
            },
        );
        let proof = PaymentProof::from_form(&form, &id, 1).unwrap().unwrap();
        assert_eq!(proof.content_type, "image/png");
    }

    #[test]
    fn test_draft_normalizes_fields() {
        let draft = RegistrationDraft::from_form(&complete_form()).unwrap();

        assert_eq!(draft.surname, "Dela Cruz");
        assert_eq!(draft.institution_email, "registrar@nyi.edu.ph");
        assert_eq!(draft.delegate_email, "juan.delacruz@example.com");
        assert_eq!(draft.age, 21);
        assert_eq!(draft.dietary_preferences, "None");
        assert_eq!(draft.middle_initial, None);
        assert_eq!(draft.dietary_comments, None);
        assert_eq!(draft.transaction_ref, None);
    }

    #[test]
    fn test_draft_keeps_optional_fields() {
        let mut form = complete_form();
        form.insert_field("middleInitial", " P ");
        form.insert_field("dietaryPreferences", "Vegetarian");
        form.insert_field("dietaryComments", "  ");
        form.insert_field("transactionRef", "GC-0001");

        let draft = RegistrationDraft::from_form(&form).unwrap();
        assert_eq!(draft.middle_initial.as_deref(), Some("P"));
        assert_eq!(draft.dietary_preferences, "Vegetarian");
        assert_eq!(draft.dietary_comments, None);
        assert_eq!(draft.transaction_ref.as_deref(), Some("GC-0001"));
    }

    #[test]
    fn test_missing_fields_reported_in_order() {
        let mut form = complete_form();
        form.insert_field("tshirtSize", "   ");
        form.insert_field("surname", "");
        assert_eq!(
            RegistrationDraft::from_form(&form).unwrap_err(),
            ValidationError::MissingField("surname")
        );

        let err = RegistrationDraft::from_form(&FormData::default()).unwrap_err();
        assert_eq!(err.to_string(), "Missing required field: delegateType");
    }

    #[test]
    fn test_age_bounds() {
        for (age, ok) in [
            ("14", false),
            ("15", true),
            ("35", true),
            ("36", false),
            ("-20", false),
            ("twenty", false),
            ("20 years", true),
            ("99999999999999999999", false),
        ] {
            let mut form = complete_form();
            form.insert_field("age", age);
            let result = RegistrationDraft::from_form(&form);
            assert_eq!(result.is_ok(), ok, "age {:?}", age);
            if !ok {
                assert_eq!(result.unwrap_err(), ValidationError::AgeOutOfRange);
            }
        }
    }

    #[test]
    fn test_email_checks() {
        let mut form = complete_form();
        form.insert_field("institutionEmail", "registrar@nyi");
        form.insert_field("delegateEmail", "not an email");
        assert_eq!(
            RegistrationDraft::from_form(&form).unwrap_err(),
            ValidationError::InvalidInstitutionEmail
        );

        let mut form = complete_form();
        form.insert_field("delegateEmail", "juan@@example.com");
        assert_eq!(
            RegistrationDraft::from_form(&form).unwrap_err().to_string(),
            "Invalid delegate email format"
        );
    }

    #[test]
    fn test_is_valid_email() {
        assert!(is_valid_email("a@b.co"));
        assert!(is_valid_email("first.last+tag@sub.example.org"));
        assert!(!is_valid_email("a b@c.d"));
        assert!(!is_valid_email("a@b"));
        assert!(!is_valid_email("@b.c"));
    }

    #[test]
    fn test_parse_leading_int() {
        assert_eq!(parse_leading_int("  42"), Some(42));
        assert_eq!(parse_leading_int("+7"), Some(7));
        assert_eq!(parse_leading_int("-3x"), Some(-3));
        assert_eq!(parse_leading_int("3.9"), Some(3));
        assert_eq!(parse_leading_int(""), None);
        assert_eq!(parse_leading_int("-"), None);
    }

    #[test]
    fn test_into_registration_serializes_as_columns() {
        let draft = RegistrationDraft::from_form(&complete_form()).unwrap();
        let id = RegistrationId::from_millis(DEFAULT_ID_PREFIX, 12_345_678);
        let registration =
            draft.into_registration(id, Some("https://cdn/payment-proofs/x.png".to_string()));

        let value = serde_json::to_value(&registration).unwrap();
        assert_eq!(value["registration_id"], "NRYLI2025-12345678");
        assert_eq!(value["status"], "pending");
        assert_eq!(value["age"], 21);
        assert_eq!(value["middle_initial"], serde_json::Value::Null);
        assert_eq!(value["payment_proof_url"], "https://cdn/payment-proofs/x.png");
        assert_eq!(value["dietary_preferences"], "None");
    }
}
