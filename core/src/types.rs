//! Domain DTOs for the users API.
//!
//! # Design
//! These types mirror the remote service's JSON but are defined independently
//! of the mock-server crate; integration tests catch schema drift. Unknown
//! keys in responses are ignored. `UserPatch` doubles as the update request
//! body and as the partial payload the service echoes back on create/update.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Address {
    pub street: String,
    pub city: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suite: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zipcode: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Company {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub catch_phrase: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bs: Option<String>,
}

/// A user record as held by the store.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    pub id: u64,
    pub name: String,
    pub email: String,
    pub phone: String,
    #[serde(default)]
    pub username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<Address>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<Company>,
}

/// Request payload for creating a user.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub phone: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
}

impl NewUser {
    /// The supplied username, or the name lower-cased with all whitespace
    /// removed when none (or an empty one) was given.
    pub fn effective_username(&self) -> String {
        match self.username.as_deref() {
            Some(username) if !username.is_empty() => username.to_string(),
            _ => derive_username(&self.name),
        }
    }
}

/// `"Jane Doe"` -> `"janedoe"`.
pub fn derive_username(name: &str) -> String {
    name.chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

/// A partial user. Only the fields present are serialized or applied.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<Address>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<Company>,
}

impl UserPatch {
    /// Overwrite the fields of `user` that are present in the patch.
    /// `id` is never applied; the record keeps its identity.
    pub fn apply_to(self, user: &mut User) {
        if let Some(name) = self.name {
            user.name = name;
        }
        if let Some(email) = self.email {
            user.email = email;
        }
        if let Some(phone) = self.phone {
            user.phone = phone;
        }
        if let Some(username) = self.username {
            user.username = username;
        }
        if let Some(website) = self.website {
            user.website = Some(website);
        }
        if let Some(address) = self.address {
            user.address = Some(address);
        }
        if let Some(company) = self.company {
            user.company = Some(company);
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == UserPatch::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> User {
        User {
            id: 3,
            name: "A".to_string(),
            email: "a@x.com".to_string(),
            phone: "555".to_string(),
            username: "a".to_string(),
            website: None,
            address: None,
            company: None,
        }
    }

    #[test]
    fn derive_username_strips_whitespace_and_lowercases() {
        assert_eq!(derive_username("Jane Doe"), "janedoe");
        assert_eq!(derive_username("  Mary\tAnn  SMITH "), "maryannsmith");
        assert_eq!(derive_username(""), "");
    }

    #[test]
    fn effective_username_prefers_non_empty_input() {
        let mut input = NewUser {
            name: "Jane Doe".to_string(),
            email: "jane@x.com".to_string(),
            phone: "1".to_string(),
            username: Some("jd".to_string()),
        };
        assert_eq!(input.effective_username(), "jd");
        input.username = Some(String::new());
        assert_eq!(input.effective_username(), "janedoe");
        input.username = None;
        assert_eq!(input.effective_username(), "janedoe");
    }

    #[test]
    fn patch_preserves_absent_fields() {
        let mut u = user();
        let patch: UserPatch = serde_json::from_str(r#"{"name":"B"}"#).unwrap();
        patch.apply_to(&mut u);
        assert_eq!(u.id, 3);
        assert_eq!(u.name, "B");
        assert_eq!(u.email, "a@x.com");
    }

    #[test]
    fn patch_never_changes_id() {
        let mut u = user();
        let patch = UserPatch {
            id: Some(11),
            ..UserPatch::default()
        };
        patch.apply_to(&mut u);
        assert_eq!(u.id, 3);
    }

    #[test]
    fn patch_serializes_only_present_fields() {
        let patch = UserPatch {
            phone: Some("123".to_string()),
            ..UserPatch::default()
        };
        let json = serde_json::to_value(&patch).unwrap();
        assert_eq!(json, serde_json::json!({ "phone": "123" }));
        assert!(UserPatch::default().is_empty());
        assert!(!patch.is_empty());
    }

    #[test]
    fn user_ignores_unknown_keys_and_reads_camel_case_company() {
        let raw = r#"{
            "id": 1, "name": "Leanne Graham", "username": "Bret",
            "email": "Sincere@april.biz", "phone": "1-770-736-8031",
            "address": {"street": "Kulas Light", "suite": "Apt. 556", "city": "Gwenborough",
                        "zipcode": "92998-3874", "geo": {"lat": "-37.3159", "lng": "81.1496"}},
            "company": {"name": "Romaguera-Crona", "catchPhrase": "Multi-layered", "bs": "harness"}
        }"#;
        let u: User = serde_json::from_str(raw).unwrap();
        assert_eq!(u.address.unwrap().suite.as_deref(), Some("Apt. 556"));
        assert_eq!(u.company.unwrap().catch_phrase.as_deref(), Some("Multi-layered"));
        assert!(u.website.is_none());
    }

    #[test]
    fn new_user_omits_missing_username() {
        let input = NewUser {
            name: "Jane".to_string(),
            email: "j@x.com".to_string(),
            phone: "1".to_string(),
            username: None,
        };
        let json = serde_json::to_value(&input).unwrap();
        assert!(json.get("username").is_none());
    }
}
