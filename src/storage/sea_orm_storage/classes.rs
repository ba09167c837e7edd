//! 班级存储操作

use std::collections::HashMap;

use super::SeaOrmStorage;
use crate::entity::class_students::{Column as RosterColumn, Entity as ClassStudents};
use crate::entity::classes::{Column, Entity as Classes};
use crate::entity::instructors::Entity as Instructors;
use crate::entity::students::Entity as Students;
use crate::errors::{Result, SchoolError};
use crate::models::{
    PaginationInfo,
    classes::{
        entities::{Class, ClassDetail},
        requests::ClassListQuery,
        responses::ClassListResponse,
    },
    students::entities::Student,
};
use crate::utils::escape_like_pattern;
use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder};

impl SeaOrmStorage {
    /// 通过 ID 获取班级
    pub async fn get_class_by_id_impl(&self, class_id: i64) -> Result<Option<Class>> {
        let result = Classes::find_by_id(class_id)
            .one(&self.db)
            .await
            .map_err(|e| SchoolError::database_operation(format!("查询班级失败: {e}")))?;

        Ok(result.map(|m| m.into_class()))
    }

    /// 获取班级详情：任课教师 + 按名单顺序排列的学生
    pub async fn get_class_detail_impl(&self, class_id: i64) -> Result<Option<ClassDetail>> {
        let Some((class, instructor)) = Classes::find_by_id(class_id)
            .find_also_related(Instructors)
            .one(&self.db)
            .await
            .map_err(|e| SchoolError::database_operation(format!("查询班级失败: {e}")))?
        else {
            return Ok(None);
        };

        let mut rosters = self.load_rosters(&[class_id]).await?;

        Ok(Some(ClassDetail {
            class: class.into_class(),
            instructor: instructor.map(|m| m.into_instructor()),
            students: rosters.remove(&class_id).unwrap_or_default(),
        }))
    }

    /// 列出全部班级详情，按班级名称排序
    pub async fn list_class_details_impl(&self) -> Result<Vec<ClassDetail>> {
        let classes = Classes::find()
            .find_also_related(Instructors)
            .order_by_asc(Column::Name)
            .all(&self.db)
            .await
            .map_err(|e| SchoolError::database_operation(format!("查询班级列表失败: {e}")))?;

        let ids: Vec<i64> = classes.iter().map(|(c, _)| c.id).collect();
        let mut rosters = self.load_rosters(&ids).await?;

        Ok(classes
            .into_iter()
            .map(|(class, instructor)| ClassDetail {
                students: rosters.remove(&class.id).unwrap_or_default(),
                instructor: instructor.map(|m| m.into_instructor()),
                class: class.into_class(),
            })
            .collect())
    }

    // 按班级分组加载名单，组内保持 position 顺序
    async fn load_rosters(&self, class_ids: &[i64]) -> Result<HashMap<i64, Vec<Student>>> {
        let mut rosters: HashMap<i64, Vec<Student>> = HashMap::new();
        if class_ids.is_empty() {
            return Ok(rosters);
        }

        let rows = ClassStudents::find()
            .filter(RosterColumn::ClassId.is_in(class_ids.iter().copied()))
            .order_by_asc(RosterColumn::ClassId)
            .order_by_asc(RosterColumn::Position)
            .order_by_asc(RosterColumn::Id)
            .find_also_related(Students)
            .all(&self.db)
            .await
            .map_err(|e| SchoolError::database_operation(format!("查询班级名单失败: {e}")))?;

        for (row, student) in rows {
            if let Some(student) = student {
                rosters
                    .entry(row.class_id)
                    .or_default()
                    .push(student.into_student());
            }
        }

        Ok(rosters)
    }

    /// 分页列出班级
    pub async fn list_classes_with_pagination_impl(
        &self,
        query: ClassListQuery,
    ) -> Result<ClassListResponse> {
        let page = query.page.unwrap_or(1).max(1) as u64;
        let size = query.size.unwrap_or(10).clamp(1, 100) as u64;

        let mut select = Classes::find();

        // 教师筛选
        if let Some(instructor_id) = query.instructor_id {
            select = select.filter(Column::InstructorId.eq(instructor_id));
        }

        // 搜索条件
        if let Some(ref search) = query.search
            && !search.trim().is_empty()
        {
            let escaped = escape_like_pattern(search.trim());
            select = select.filter(Column::Name.contains(&escaped));
        }

        // 排序
        select = select.order_by_asc(Column::Name);

        // 分页查询
        let paginator = select.paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(|e| SchoolError::database_operation(format!("查询班级总数失败: {e}")))?;

        let pages = paginator
            .num_pages()
            .await
            .map_err(|e| SchoolError::database_operation(format!("查询班级页数失败: {e}")))?;

        let classes = if page > pages {
            Vec::new()
        } else {
            paginator
                .fetch_page(page - 1)
                .await
                .map_err(|e| SchoolError::database_operation(format!("查询班级列表失败: {e}")))?
        };

        Ok(ClassListResponse {
            items: classes.into_iter().map(|m| m.into_class()).collect(),
            pagination: PaginationInfo {
                page: page as i64,
                page_size: size as i64,
                total: total as i64,
                total_pages: pages as i64,
            },
        })
    }
}
