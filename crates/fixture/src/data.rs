//! Canned users dataset mirroring the upstream fixture
//!
//! Ten records with ids 1 through 10. User 1 is the well-known Leanne
//! Graham record the contract suite pins its field assertions to.

use once_cell::sync::Lazy;
use vigil_client::User;

/// Raw dataset as served by the upstream fixture's `/users`
const CANNED_USERS: &str = include_str!("users.json");

static DATASET: Lazy<Vec<User>> = Lazy::new(|| {
    serde_json::from_str(CANNED_USERS).expect("embedded users dataset must parse")
});

/// All canned users, in id order
pub fn dataset() -> &'static [User] {
    &DATASET
}

/// Id the fixture assigns to a created user
pub fn next_id() -> u64 {
    DATASET.len() as u64 + 1
}
