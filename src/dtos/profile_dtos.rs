use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::profile::{Profile, ProfileFields};
use crate::models::user::Role;

/// Body `PUT /api/profile`
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpsertProfileIn {
    pub user_id: Uuid,
    pub role: Role,
    #[validate(length(min = 1, max = 16, message = "Username max character is 16"))]
    pub username: String,
    pub name: String,
    #[validate(length(max = 15, message = "Phone number max character is 15"))]
    pub phone: String,
    pub address: String,
    pub city: String,
    pub country: String,
    #[serde(default)]
    pub post_code: Option<i32>,
    pub biography: String,
    pub interest: String,
    pub skills: String,
}

impl UpsertProfileIn {
    pub fn fields(&self) -> ProfileFields {
        ProfileFields {
            username: self.username.trim().to_string(),
            name: self.name.trim().to_string(),
            phone: self.phone.trim().to_string(),
            address: self.address.trim().to_string(),
            city: self.city.trim().to_string(),
            country: self.country.trim().to_string(),
            post_code: self.post_code,
            biography: self.biography.trim().to_string(),
            interest: self.interest.trim().to_string(),
            skills: self.skills.trim().to_string(),
        }
    }
}

/// Response `GET /api/profile`: profile boleh kosong, role selalu ada.
#[derive(Debug, Serialize, Deserialize)]
pub struct ProfileOut {
    pub profile: Option<Profile>,
    pub role: Role,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(username: &str, phone: &str) -> UpsertProfileIn {
        UpsertProfileIn {
            user_id: Uuid::new_v4(),
            role: Role::Investor,
            username: username.into(),
            name: "Ayu".into(),
            phone: phone.into(),
            address: "Jl. Merdeka 1".into(),
            city: "Bandung".into(),
            country: "Indonesia".into(),
            post_code: Some(40111),
            biography: "Angel investor".into(),
            interest: "agritech".into(),
            skills: "finance".into(),
        }
    }

    #[test]
    fn username_and_phone_limits() {
        assert!(input("ayu_invest", "0812345678").validate().is_ok());

        let err = input(&"u".repeat(17), &"1".repeat(16)).validate().unwrap_err();
        let fields = err.field_errors();
        assert!(fields.contains_key("username"));
        assert!(fields.contains_key("phone"));
    }

    #[test]
    fn role_uses_upper_case_on_the_wire() {
        let json = serde_json::to_value(input("ayu", "1")).unwrap();
        assert_eq!(json["role"], "INVESTOR");
        assert_eq!(json["postCode"], 40111);
    }
}
