//! Registered user.
//!
//! User accounts are provisioned out of band by the identity provider
//! sync, so there is no self-registration route. Phone number is the
//! primary login identifier, email is an optional secondary one.

use sea_orm::entity::prelude::*;

/// User model.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,

    /// E.164 phone number the user logs in with.
    pub phone_number: String,

    /// Optional email address, also usable as a login identifier.
    pub email: Option<String>,

    /// Argon2 PHC password hash. Users without a set password
    /// cannot log in until one is provisioned.
    pub password: Option<String>,

    /// Inactive users keep their records but cannot authenticate.
    pub is_active: bool,

    pub created_at: TimeDateTime,
}

/// User model relations.
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_one = "super::token::Entity")]
    Token,

    #[sea_orm(has_many = "super::fax::Entity")]
    Faxes,
}

impl Related<super::token::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Token.def()
    }
}

impl Related<super::fax::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Faxes.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
