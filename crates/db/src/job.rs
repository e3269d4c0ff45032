//! Background fax job.
//!
//! Jobs are enqueued in the same transaction as the fax mutation that
//! requires them, so a committed record is always accompanied by its
//! pending work. Workers claim `new` jobs with a skip-locked row lock
//! and mark them `completed` or `failed`; failed jobs are left for
//! manual reconciliation and are never retried automatically.

use sea_orm::{entity::prelude::*, ActiveValue};
use serde::Serialize;
use uuid::Uuid;

/// Fax job model.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "jobs")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,

    /// Fax record this job operates on.
    pub fax_uuid: Uuid,

    pub kind: Kind,

    pub status: Status,

    pub created_at: TimeDateTime,
}

/// Fax job kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize)]
#[sea_orm(rs_type = "i16", db_type = "SmallInteger")]
#[serde(rename_all = "snake_case")]
pub enum Kind {
    #[sea_orm(num_value = 0)]
    SendFax,
    #[sea_orm(num_value = 1)]
    ReceiveFax,
}

/// Fax job processing status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize)]
#[sea_orm(rs_type = "i16", db_type = "SmallInteger")]
#[serde(rename_all = "snake_case")]
pub enum Status {
    #[sea_orm(num_value = 0)]
    New,
    #[sea_orm(num_value = 1)]
    Completed,
    #[sea_orm(num_value = 2)]
    Failed,
}

/// Fax job model relations.
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::fax::Entity",
        from = "Column::FaxUuid",
        to = "super::fax::Column::Uuid"
    )]
    Fax,
}

impl Related<super::fax::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Fax.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Build a new pending job for the provided fax record.
pub fn enqueue(fax_uuid: Uuid, kind: Kind) -> ActiveModel {
    ActiveModel {
        fax_uuid: ActiveValue::Set(fax_uuid),
        kind: ActiveValue::Set(kind),
        status: ActiveValue::Set(Status::New),
        created_at: ActiveValue::Set(crate::now()),
        ..Default::default()
    }
}
