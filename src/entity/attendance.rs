//! 考勤记录实体
//!
//! `date` 为当天 UTC 零点的时间戳，`records` 为 JSON 数组文本。

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "attendance")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub class_id: i64,
    pub date: i64,
    #[sea_orm(column_type = "Text")]
    pub records: String,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::classes::Entity",
        from = "Column::ClassId",
        to = "super::classes::Column::Id"
    )]
    Class,
}

impl Related<super::classes::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Class.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_attendance_record(
        self,
    ) -> crate::errors::Result<crate::models::attendance::entities::AttendanceRecord> {
        use crate::models::attendance::entities::{AttendanceEntry, AttendanceRecord};

        let records: Vec<AttendanceEntry> = serde_json::from_str(&self.records)?;
        Ok(AttendanceRecord {
            id: self.id,
            class_id: self.class_id,
            date: crate::utils::dates::timestamp_to_date(self.date),
            records,
            created_at: super::ts_to_datetime(self.created_at),
            updated_at: super::ts_to_datetime(self.updated_at),
        })
    }
}
