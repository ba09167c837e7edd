pub mod get;
pub mod list;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::instructors::requests::InstructorQueryParams;
use crate::storage::Storage;

pub const INSTRUCTORS_PATH: &str = "/api/v1/instructors";

pub struct InstructorService {
    storage: Option<Arc<dyn Storage>>,
}

impl InstructorService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> Arc<dyn Storage> {
        if let Some(storage) = &self.storage {
            storage.clone()
        } else {
            request
                .app_data::<actix_web::web::Data<Arc<dyn Storage>>>()
                .expect("Storage not found in app data")
                .get_ref()
                .clone()
        }
    }

    pub async fn list_instructors(
        &self,
        request: &HttpRequest,
        query: InstructorQueryParams,
    ) -> ActixResult<HttpResponse> {
        list::list_instructors(self, request, query).await
    }

    pub async fn get_instructor(
        &self,
        request: &HttpRequest,
        id: i64,
    ) -> ActixResult<HttpResponse> {
        get::get_instructor(self, request, id).await
    }
}
