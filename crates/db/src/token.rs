//! User authentication token.
//!
//! Authentication token is passed to an API server to identify
//! a user that executes the request.
//!
//! Each user holds at most one token (enforced by a unique constraint
//! on the user identifier), and the token key is regenerated on every
//! successful login together with the client fingerprint it is bound to.

use rand::{thread_rng, RngCore};
use sea_orm::{entity::prelude::*, ActiveValue};

/// Count of random bytes in a token key.
const KEY_BYTES: usize = 20;

/// Token key length in its hex-encoded form.
pub const KEY_LENGTH: usize = KEY_BYTES * 2;

/// Hex-encoded length of the stored client IP address hash.
pub const IP_HASH_LENGTH: usize = 128;

/// Authentication token model.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "authentication_tokens")]
pub struct Model {
    /// Unique authentication token identifier.
    #[sea_orm(primary_key)]
    pub id: i64,

    /// Related user identifier. Unique, one token per user.
    pub user_id: i64,

    /// Authentication token key string value.
    pub key: String,

    /// User agent presented by the client on the last login.
    pub user_agent: Option<String>,

    /// Hex-encoded SHA-512 hash of the client IP address
    /// presented on the last login. Raw addresses are never stored.
    pub ip_address_hash: Option<String>,

    /// Authentication token creation timestamp.
    pub created_at: TimeDateTime,
}

/// Authentication token model relations.
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id"
    )]
    User,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Generate a new random token key.
///
/// ## Example
///
/// ```
/// use db::token::{generate_key, KEY_LENGTH};
///
/// let key = generate_key();
/// assert_eq!(key.len(), KEY_LENGTH);
/// assert!(key.chars().all(|c| c.is_ascii_hexdigit()));
/// ```
pub fn generate_key() -> String {
    let mut bytes = [0u8; KEY_BYTES];
    thread_rng().fill_bytes(&mut bytes);

    hex::encode(bytes)
}

/// Cycle an existing token: regenerate its key and rebind the
/// client fingerprint it was issued to.
///
/// This function returns both an [`ActiveModel`] carrying the update
/// and the new key string value. The previous key stops authenticating
/// as soon as the update is persisted.
pub fn cycle(
    model: Model,
    ip_address_hash: Option<String>,
    user_agent: Option<String>,
) -> (ActiveModel, String) {
    let key = generate_key();

    let mut active: ActiveModel = model.into();
    active.key = ActiveValue::Set(key.clone());
    active.ip_address_hash = ActiveValue::Set(ip_address_hash);
    active.user_agent = ActiveValue::Set(user_agent);

    (active, key)
}
