use serde::{Deserialize, Serialize};
use time::Date;

use crate::users::{iso_date, User};

/// Wire form of the signed-in donor's record. The password hash stays in the
/// store layer.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileData {
    pub email: String,
    pub username: String,
    pub mobile: String,
    pub blood_group: String,
    pub hometown: String,
    #[serde(with = "iso_date")]
    pub last_donation: Option<Date>,
}

impl From<User> for ProfileData {
    fn from(user: User) -> Self {
        Self {
            email: user.email,
            username: user.username,
            mobile: user.mobile,
            blood_group: user.blood_group,
            hometown: user.hometown,
            last_donation: user.last_donation,
        }
    }
}

/// Mutable profile fields. Blood group is fixed at registration and has no
/// update path; submitted values for it are ignored.
#[derive(Debug, Deserialize)]
pub struct UpdateProfileForm {
    pub username: String,
    pub mobile: String,
    pub hometown: String,
    #[serde(rename = "lastDonation", default, with = "iso_date")]
    pub last_donation: Option<Date>,
}
