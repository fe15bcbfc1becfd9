mod memory;
mod store;

pub use memory::MemoryUserStore;
pub use store::{PgUserStore, UserStore};

use serde::Serialize;
use sqlx::FromRow;
use time::{Date, OffsetDateTime};

/// A registered donor as held in the store. The hash never leaves this layer;
/// wire types carry their own field subsets.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub email: String,
    pub password_hash: String,
    pub username: String,
    pub mobile: String,
    pub blood_group: String,
    pub hometown: String,
    pub last_donation: Option<Date>,
    pub created_at: OffsetDateTime,
}

/// Fields supplied at registration. `last_donation` starts out absent.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub password_hash: String,
    pub username: String,
    pub mobile: String,
    pub blood_group: String,
    pub hometown: String,
}

/// Public donor-list projection. No email, no password material.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Donor {
    pub username: String,
    #[serde(rename = "blood")]
    pub blood_group: String,
    pub mobile: String,
    #[serde(rename = "lastDonation", with = "iso_date")]
    pub last_donation: Option<Date>,
}

/// Serde helper for optional `YYYY-MM-DD` values. An empty string and an
/// absent field both mean "no date".
pub mod iso_date {
    use serde::{Deserialize, Deserializer, Serializer};
    use time::{format_description::FormatItem, macros::format_description, Date};

    const FORMAT: &[FormatItem<'static>] = format_description!("[year]-[month]-[day]");

    pub fn serialize<S>(value: &Option<Date>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(date) => {
                let formatted = date.format(FORMAT).map_err(serde::ser::Error::custom)?;
                serializer.serialize_some(&formatted)
            }
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Date>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        match raw.as_deref() {
            None | Some("") => Ok(None),
            Some(s) => Date::parse(s, FORMAT)
                .map(Some)
                .map_err(serde::de::Error::custom),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    #[test]
    fn donor_serializes_public_fields_only() {
        let donor = Donor {
            username: "Anika".into(),
            blood_group: "A-".into(),
            mobile: "01811111111".into(),
            last_donation: Some(date!(2025 - 12 - 24)),
        };

        let json = serde_json::to_value(&donor).unwrap();
        assert_eq!(json["username"], "Anika");
        assert_eq!(json["blood"], "A-");
        assert_eq!(json["mobile"], "01811111111");
        assert_eq!(json["lastDonation"], "2025-12-24");
        assert!(json.get("email").is_none());
        assert!(json.get("password_hash").is_none());
    }

    #[test]
    fn donor_without_donation_serializes_null() {
        let donor = Donor {
            username: "Anika".into(),
            blood_group: "A-".into(),
            mobile: "01811111111".into(),
            last_donation: None,
        };

        let json = serde_json::to_value(&donor).unwrap();
        assert!(json["lastDonation"].is_null());
    }

    #[derive(serde::Deserialize)]
    struct DateHolder {
        #[serde(default, with = "iso_date")]
        value: Option<Date>,
    }

    #[test]
    fn iso_date_parses_and_treats_empty_as_absent() {
        let parsed: DateHolder = serde_json::from_str(r#"{"value":"2026-01-15"}"#).unwrap();
        assert_eq!(parsed.value, Some(date!(2026 - 01 - 15)));

        let empty: DateHolder = serde_json::from_str(r#"{"value":""}"#).unwrap();
        assert_eq!(empty.value, None);

        let missing: DateHolder = serde_json::from_str("{}").unwrap();
        assert_eq!(missing.value, None);
    }

    #[test]
    fn iso_date_rejects_garbage() {
        let result: Result<DateHolder, _> = serde_json::from_str(r#"{"value":"next tuesday"}"#);
        assert!(result.is_err());
    }
}
