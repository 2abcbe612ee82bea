//! Data model for the users fixture API
//!
//! Field names follow the wire format of the JSONPlaceholder-style
//! `/users` resource. `catchPhrase` is the only camelCase leaf.

use serde::{Deserialize, Serialize};

/// A user record as served by `/users`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: u64,
    pub name: String,
    pub username: String,
    pub email: String,
    pub address: Address,
    pub phone: String,
    pub website: String,
    pub company: Company,
}

/// Postal address with geolocation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    pub street: String,
    pub suite: String,
    pub city: String,
    pub zipcode: String,
    pub geo: Geo,
}

/// Coordinates as decimal-degree strings, as the fixture serves them
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Geo {
    pub lat: String,
    pub lng: String,
}

/// Employer record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Company {
    pub name: String,
    #[serde(rename = "catchPhrase")]
    pub catch_phrase: String,
    pub bs: String,
}

/// Payload for create and update calls
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewUser {
    pub name: String,
    pub username: String,
    pub email: String,
}

/// Query-string filter for `GET /users`
///
/// Serialized into request query parameters by the client and parsed
/// back out of them by the fixture service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl UserFilter {
    /// Filter by exact username
    pub fn by_username(username: impl Into<String>) -> Self {
        Self {
            username: Some(username.into()),
            ..Default::default()
        }
    }

    /// Filter by exact display name
    pub fn by_name(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Default::default()
        }
    }

    /// Whether a user matches every set field
    pub fn matches(&self, user: &User) -> bool {
        self.username.as_deref().map_or(true, |u| user.username == u)
            && self.name.as_deref().map_or(true, |n| user.name == n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const USER_ONE: &str = r#"{
        "id": 1,
        "name": "Leanne Graham",
        "username": "Bret",
        "email": "Sincere@april.biz",
        "address": {
            "street": "Kulas Light",
            "suite": "Apt. 556",
            "city": "Gwenborough",
            "zipcode": "92998-3874",
            "geo": {"lat": "-37.3159", "lng": "81.1496"}
        },
        "phone": "1-770-736-8031 x56442",
        "website": "hildegard.org",
        "company": {
            "name": "Romaguera-Crona",
            "catchPhrase": "Multi-layered client-server neural-net",
            "bs": "harness real-time e-markets"
        }
    }"#;

    #[test]
    fn parses_full_user_record() {
        let user: User = serde_json::from_str(USER_ONE).unwrap();

        assert_eq!(user.id, 1);
        assert_eq!(user.name, "Leanne Graham");
        assert_eq!(user.username, "Bret");
        assert_eq!(user.address.city, "Gwenborough");
        assert_eq!(user.address.geo.lat, "-37.3159");
        assert_eq!(user.company.catch_phrase, "Multi-layered client-server neural-net");
    }

    #[test]
    fn company_serializes_catch_phrase_as_camel_case() {
        let company = Company {
            name: "Romaguera-Crona".to_string(),
            catch_phrase: "Multi-layered client-server neural-net".to_string(),
            bs: "harness real-time e-markets".to_string(),
        };

        let json = serde_json::to_value(&company).unwrap();
        assert!(json.get("catchPhrase").is_some());
        assert!(json.get("catch_phrase").is_none());
    }

    #[test]
    fn filter_matches_only_set_fields() {
        let user: User = serde_json::from_str(USER_ONE).unwrap();

        assert!(UserFilter::default().matches(&user));
        assert!(UserFilter::by_username("Bret").matches(&user));
        assert!(UserFilter::by_name("Leanne Graham").matches(&user));
        assert!(!UserFilter::by_username("Antonette").matches(&user));

        let both = UserFilter {
            username: Some("Bret".to_string()),
            name: Some("Ervin Howell".to_string()),
        };
        assert!(!both.matches(&user));
    }

    #[test]
    fn empty_filter_serializes_without_keys() {
        let json = serde_json::to_value(UserFilter::default()).unwrap();
        assert_eq!(json, serde_json::json!({}));
    }
}
