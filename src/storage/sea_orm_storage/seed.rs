//! 初始数据导入

use std::collections::{HashMap, HashSet};

use super::SeaOrmStorage;
use crate::entity::{class_students, classes, instructors, students, users};
use crate::errors::{Result, SchoolError};
use crate::models::seed::SeedData;
use sea_orm::{ActiveModelTrait, DatabaseTransaction, Set, TransactionTrait};
use tracing::{info, warn};

impl SeaOrmStorage {
    /// 在单个事务中导入用户、教师、学生与班级，任一步失败则整体回滚
    pub async fn import_seed_impl(&self, data: SeedData) -> Result<()> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| SchoolError::database_operation(format!("开启事务失败: {e}")))?;

        if let Err(e) = write_seed(&txn, &data).await {
            if let Err(rollback_err) = txn.rollback().await {
                warn!("回滚初始数据导入失败: {}", rollback_err);
            }
            return Err(e);
        }

        txn.commit()
            .await
            .map_err(|e| SchoolError::database_operation(format!("提交事务失败: {e}")))?;

        info!(
            "初始数据导入完成: {} 个用户, {} 名教师, {} 名学生, {} 个班级",
            data.users.len(),
            data.instructors.len(),
            data.students.len(),
            data.classes.len()
        );
        Ok(())
    }
}

async fn write_seed(txn: &DatabaseTransaction, data: &SeedData) -> Result<()> {
    let now = chrono::Utc::now().timestamp();

    let mut user_ids: HashMap<String, i64> = HashMap::new();
    for user in &data.users {
        let username = user.username.trim().to_lowercase();
        let model = users::ActiveModel {
            username: Set(username.clone()),
            password_hash: Set(user.password.clone()),
            role: Set(user.role.to_string()),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(txn)
        .await
        .map_err(|e| SchoolError::seed(format!("导入用户 {username} 失败: {e}")))?;
        user_ids.insert(username, model.id);
    }

    let mut instructor_ids = HashSet::new();
    for instructor in &data.instructors {
        let user_id = match &instructor.username {
            Some(name) => Some(
                *user_ids
                    .get(&name.trim().to_lowercase())
                    .ok_or_else(|| SchoolError::seed(format!("教师关联的用户不存在: {name}")))?,
            ),
            None => None,
        };

        instructors::ActiveModel {
            id: Set(instructor.id),
            name: Set(instructor.name.clone()),
            contact: Set(instructor.contact.clone()),
            address: Set(instructor.address.clone()),
            image: Set(instructor.image.clone()),
            user_id: Set(user_id),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(txn)
        .await
        .map_err(|e| SchoolError::seed(format!("导入教师 {} 失败: {e}", instructor.id)))?;
        instructor_ids.insert(instructor.id);
    }

    let mut student_ids = HashSet::new();
    for student in &data.students {
        students::ActiveModel {
            id: Set(student.id),
            name: Set(student.name.clone()),
            parent_contact: Set(student.parent_contact.clone()),
            address: Set(student.address.clone()),
            image: Set(student.image.clone()),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(txn)
        .await
        .map_err(|e| SchoolError::seed(format!("导入学生 {} 失败: {e}", student.id)))?;
        student_ids.insert(student.id);
    }

    for class in &data.classes {
        if !instructor_ids.contains(&class.instructor_id) {
            return Err(SchoolError::seed(format!(
                "班级 {} 的教师不存在: {}",
                class.name, class.instructor_id
            )));
        }

        classes::ActiveModel {
            id: Set(class.id),
            name: Set(class.name.clone()),
            subject: Set(class.subject.clone()),
            schedule: Set(class.schedule.clone()),
            room: Set(class.room.clone()),
            capacity: Set(class.capacity),
            description: Set(class.description.clone()),
            instructor_id: Set(class.instructor_id),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(txn)
        .await
        .map_err(|e| SchoolError::seed(format!("导入班级 {} 失败: {e}", class.name)))?;

        for (position, student_id) in class.student_ids.iter().enumerate() {
            if !student_ids.contains(student_id) {
                return Err(SchoolError::seed(format!(
                    "班级 {} 的学生不存在: {student_id}",
                    class.name
                )));
            }

            class_students::ActiveModel {
                class_id: Set(class.id),
                student_id: Set(*student_id),
                position: Set(position as i32),
                ..Default::default()
            }
            .insert(txn)
            .await
            .map_err(|e| SchoolError::seed(format!("导入班级名单失败: {e}")))?;
        }
    }

    Ok(())
}
