//! 考勤存储操作

use super::SeaOrmStorage;
use crate::entity::attendance::{ActiveModel, Column, Entity as Attendance};
use crate::errors::{Result, SchoolError};
use crate::models::attendance::entities::{AttendanceEntry, AttendancePage, AttendanceRecord};
use crate::utils::dates::date_to_timestamp;
use chrono::NaiveDate;
use sea_orm::sea_query::OnConflict;
use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set};

impl SeaOrmStorage {
    /// 查找某班级某天的考勤记录
    pub async fn get_attendance_impl(
        &self,
        class_id: i64,
        date: NaiveDate,
    ) -> Result<Option<AttendanceRecord>> {
        let result = Attendance::find()
            .filter(Column::ClassId.eq(class_id))
            .filter(Column::Date.eq(date_to_timestamp(date)))
            .one(&self.db)
            .await
            .map_err(|e| SchoolError::database_operation(format!("查询考勤记录失败: {e}")))?;

        result.map(|m| m.into_attendance_record()).transpose()
    }

    /// 插入或整体替换考勤记录
    ///
    /// 单条 `INSERT ... ON CONFLICT (class_id, date) DO UPDATE` 语句完成，
    /// 失败时原记录保持不变。替换时保留 `created_at`。
    pub async fn upsert_attendance_impl(
        &self,
        class_id: i64,
        date: NaiveDate,
        records: Vec<AttendanceEntry>,
    ) -> Result<AttendanceRecord> {
        let now = chrono::Utc::now().timestamp();
        let records = serde_json::to_string(&records)?;

        let model = ActiveModel {
            class_id: Set(class_id),
            date: Set(date_to_timestamp(date)),
            records: Set(records),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        Attendance::insert(model)
            .on_conflict(
                OnConflict::columns([Column::ClassId, Column::Date])
                    .update_columns([Column::Records, Column::UpdatedAt])
                    .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await
            .map_err(|e| SchoolError::database_operation(format!("保存考勤记录失败: {e}")))?;

        self.get_attendance_impl(class_id, date)
            .await?
            .ok_or_else(|| SchoolError::database_operation("保存后未找到考勤记录"))
    }

    /// 按日期倒序分页列出考勤记录，超出范围的页返回空列表
    pub async fn list_attendance_page_impl(
        &self,
        class_id: i64,
        page: i64,
        size: i64,
    ) -> Result<AttendancePage> {
        let page = page.max(1) as u64;
        let size = size.max(1) as u64;

        let paginator = Attendance::find()
            .filter(Column::ClassId.eq(class_id))
            .order_by_desc(Column::Date)
            .paginate(&self.db, size);

        let total = paginator
            .num_items()
            .await
            .map_err(|e| SchoolError::database_operation(format!("查询考勤总数失败: {e}")))?;
        let pages = paginator
            .num_pages()
            .await
            .map_err(|e| SchoolError::database_operation(format!("查询考勤页数失败: {e}")))?;
        // 超出范围的页不查询，避免偏移量溢出
        let rows = if page > pages {
            Vec::new()
        } else {
            paginator
                .fetch_page(page - 1)
                .await
                .map_err(|e| SchoolError::database_operation(format!("查询考勤列表失败: {e}")))?
        };

        let items = rows
            .into_iter()
            .map(|m| m.into_attendance_record())
            .collect::<Result<Vec<_>>>()?;

        Ok(AttendancePage {
            items,
            total: total as i64,
            total_pages: pages as i64,
        })
    }

    /// 某班级的全部考勤记录，按日期倒序
    pub async fn list_attendance_for_class_impl(
        &self,
        class_id: i64,
    ) -> Result<Vec<AttendanceRecord>> {
        let rows = Attendance::find()
            .filter(Column::ClassId.eq(class_id))
            .order_by_desc(Column::Date)
            .all(&self.db)
            .await
            .map_err(|e| SchoolError::database_operation(format!("查询考勤记录失败: {e}")))?;

        rows.into_iter()
            .map(|m| m.into_attendance_record())
            .collect()
    }
}
