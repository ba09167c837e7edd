//! 教师存储操作

use super::SeaOrmStorage;
use crate::entity::instructors::{Column, Entity as Instructors};
use crate::errors::{Result, SchoolError};
use crate::models::{
    PaginationInfo,
    instructors::{
        entities::Instructor, requests::InstructorListQuery, responses::InstructorListResponse,
    },
};
use crate::utils::escape_like_pattern;
use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder};

impl SeaOrmStorage {
    pub async fn get_instructor_by_id_impl(&self, id: i64) -> Result<Option<Instructor>> {
        let result = Instructors::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| SchoolError::database_operation(format!("查询教师失败: {e}")))?;

        Ok(result.map(|m| m.into_instructor()))
    }

    /// 通过关联用户获取教师档案
    pub async fn get_instructor_by_user_id_impl(&self, user_id: i64) -> Result<Option<Instructor>> {
        let result = Instructors::find()
            .filter(Column::UserId.eq(user_id))
            .one(&self.db)
            .await
            .map_err(|e| SchoolError::database_operation(format!("查询教师失败: {e}")))?;

        Ok(result.map(|m| m.into_instructor()))
    }

    /// 分页列出教师
    pub async fn list_instructors_with_pagination_impl(
        &self,
        query: InstructorListQuery,
    ) -> Result<InstructorListResponse> {
        let page = query.page.unwrap_or(1).max(1) as u64;
        let size = query.size.unwrap_or(10).clamp(1, 100) as u64;

        let mut select = Instructors::find();

        if let Some(ref search) = query.search
            && !search.trim().is_empty()
        {
            let escaped = escape_like_pattern(search.trim());
            select = select.filter(Column::Name.contains(&escaped));
        }

        let paginator = select
            .order_by_asc(Column::Name)
            .paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(|e| SchoolError::database_operation(format!("查询教师总数失败: {e}")))?;
        let pages = paginator
            .num_pages()
            .await
            .map_err(|e| SchoolError::database_operation(format!("查询教师页数失败: {e}")))?;
        let instructors = if page > pages {
            Vec::new()
        } else {
            paginator
                .fetch_page(page - 1)
                .await
                .map_err(|e| SchoolError::database_operation(format!("查询教师列表失败: {e}")))?
        };

        Ok(InstructorListResponse {
            items: instructors
                .into_iter()
                .map(|m| m.into_instructor())
                .collect(),
            pagination: PaginationInfo {
                page: page as i64,
                page_size: size as i64,
                total: total as i64,
                total_pages: pages as i64,
            },
        })
    }
}
