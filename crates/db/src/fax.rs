//! Fax record.
//!
//! A fax record is created either by a user submitting an outbound fax
//! or by the telephony provider pushing an inbound one, and afterwards
//! is mutated only by the lifecycle operations: the send job, the
//! status callback handler and the receive job. Records are never
//! deleted in normal operation.
//!
//! Two distinct status fields are tracked: `status` is the provider-level
//! lifecycle value (`queued`, `sending`, `delivered`, `failed`, ...),
//! while `fax_status` is the provider's fax-protocol-specific status.
//! Both are overwritten verbatim from provider callbacks.

use sea_orm::{entity::prelude::*, ActiveValue};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Default status value of a newly created fax record.
pub const STATUS_QUEUED: &str = "queued";

/// Fax record model.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "faxes")]
pub struct Model {
    /// Unique fax record identifier.
    #[sea_orm(primary_key, auto_increment = false)]
    pub uuid: Uuid,

    /// User that submitted the fax, absent for inbound records.
    pub created_by: Option<i64>,

    pub direction: Direction,

    /// E.164 number the fax is sent from.
    pub from_number: String,

    /// E.164 number the fax is sent to.
    pub to_number: String,

    /// Provider-assigned sid. Set at most once: present from creation
    /// for inbound faxes, assigned after a successful send request for
    /// outbound ones, never reset.
    pub sid: Option<String>,

    /// Provider-level lifecycle status.
    pub status: String,

    /// Provider fax-protocol status.
    pub fax_status: String,

    /// Human-readable error description from the last failed callback.
    pub error_message: Option<String>,

    /// Object store key the fax media is stored under.
    pub content_key: Option<String>,

    /// Raw provider callback payloads, retained in arrival order for audit.
    pub twilio_metadata: Json,

    pub created_at: TimeDateTime,
}

/// Fax transmission direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(Some(16))")]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    #[sea_orm(string_value = "outbound")]
    Outbound,
    #[sea_orm(string_value = "inbound")]
    Inbound,
}

/// Fax record model relations.
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::CreatedBy",
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

/// Deterministic object store key for a fax record's media.
pub fn content_key(uuid: Uuid) -> String {
    format!("{uuid}-content.pdf")
}

/// Build a new outbound fax record for a user submission.
///
/// The record starts in the `queued` status with no provider sid;
/// the sid is assigned later by the send job.
pub fn new_outbound(
    created_by: i64,
    from_number: String,
    to_number: String,
) -> (ActiveModel, Uuid) {
    let uuid = Uuid::new_v4();

    (
        ActiveModel {
            uuid: ActiveValue::Set(uuid),
            created_by: ActiveValue::Set(Some(created_by)),
            direction: ActiveValue::Set(Direction::Outbound),
            from_number: ActiveValue::Set(from_number),
            to_number: ActiveValue::Set(to_number),
            sid: ActiveValue::Set(None),
            status: ActiveValue::Set(String::from(STATUS_QUEUED)),
            fax_status: ActiveValue::Set(String::from(STATUS_QUEUED)),
            error_message: ActiveValue::Set(None),
            content_key: ActiveValue::Set(Some(content_key(uuid))),
            twilio_metadata: ActiveValue::Set(Json::Array(Vec::new())),
            created_at: ActiveValue::Set(crate::now()),
        },
        uuid,
    )
}

/// Build a new inbound fax record from a provider webhook payload.
///
/// Inbound records carry their provider sid from creation, and the
/// raw payload becomes the first audit metadata entry.
pub fn new_inbound(
    sid: String,
    from_number: String,
    to_number: String,
    status: String,
    fax_status: String,
    payload: Json,
) -> (ActiveModel, Uuid) {
    let uuid = Uuid::new_v4();

    (
        ActiveModel {
            uuid: ActiveValue::Set(uuid),
            created_by: ActiveValue::Set(None),
            direction: ActiveValue::Set(Direction::Inbound),
            from_number: ActiveValue::Set(from_number),
            to_number: ActiveValue::Set(to_number),
            sid: ActiveValue::Set(Some(sid)),
            status: ActiveValue::Set(status),
            fax_status: ActiveValue::Set(fax_status),
            error_message: ActiveValue::Set(None),
            content_key: ActiveValue::Set(None),
            twilio_metadata: ActiveValue::Set(Json::Array(vec![payload])),
            created_at: ActiveValue::Set(crate::now()),
        },
        uuid,
    )
}
