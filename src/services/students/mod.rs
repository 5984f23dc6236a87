pub mod create;
pub mod get;
pub mod photo;
pub mod update;

use actix_multipart::Multipart;
use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use crate::models::students::requests::{
    CreateStudentRequest, StudentListQuery, UpdateStudentRequest,
};
use crate::models::users::entities::{User, UserRole};

super::lazy_service! {
    StudentService
}

/// 管理员、教师或学生本人
pub(crate) fn can_view_student(user: &User, student_id: i64) -> bool {
    user.is_admin() || user.role == UserRole::Tutor || user.id == student_id
}

impl StudentService {
    pub async fn create_student(
        &self,
        req: CreateStudentRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_student(self, req, request).await
    }

    pub async fn list_students(
        &self,
        query: StudentListQuery,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        get::list_students(self, query, request).await
    }

    pub async fn get_student(&self, id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        get::get_student(self, id, request).await
    }

    pub async fn update_student(
        &self,
        id: i64,
        req: UpdateStudentRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        update::update_student(self, id, req, request).await
    }

    pub async fn delete_student(&self, id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        update::delete_student(self, id, request).await
    }

    // 上传头像（管理员或本人）
    pub async fn upload_photo(
        &self,
        id: i64,
        payload: Multipart,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        photo::upload_photo(self, id, payload, request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::users::entities::UserStatus;

    fn user(id: i64, role: UserRole) -> User {
        let now = chrono::Utc::now();
        User {
            id,
            username: format!("user{id}"),
            email: format!("user{id}@example.com"),
            password_hash: String::new(),
            role,
            status: UserStatus::Active,
            last_login: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_student_visibility() {
        assert!(can_view_student(&user(1, UserRole::Admin), 9));
        assert!(can_view_student(&user(2, UserRole::Tutor), 9));
        assert!(can_view_student(&user(9, UserRole::Student), 9));
        assert!(!can_view_student(&user(8, UserRole::Student), 9));
    }
}
