pub mod create;
pub mod delete;
pub mod get;
pub mod members;
pub mod update;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use crate::models::classes::requests::{
    ClassListQuery, CreateClassRequest, EnrollStudentsRequest, UpdateClassRequest,
};

super::lazy_service! {
    /// 班级与选课关系
    ClassService
}

impl ClassService {
    // 获取班级列表
    pub async fn list_classes(
        &self,
        query: ClassListQuery,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        get::list_classes(self, query, request).await
    }

    // 创建班级
    pub async fn create_class(
        &self,
        class_data: CreateClassRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_class(self, class_data, request).await
    }

    // 获取班级详情
    pub async fn get_class(&self, class_id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        get::get_class(self, class_id, request).await
    }

    // 更新班级信息
    pub async fn update_class(
        &self,
        class_id: i64,
        update_data: UpdateClassRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        update::update_class(self, class_id, update_data, request).await
    }

    // 删除班级
    pub async fn delete_class(
        &self,
        class_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        delete::delete_class(self, class_id, request).await
    }

    pub async fn list_students(
        &self,
        class_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        members::list_students(self, class_id, request).await
    }

    pub async fn enroll_students(
        &self,
        class_id: i64,
        enroll: EnrollStudentsRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        members::enroll_students(self, class_id, enroll, request).await
    }

    pub async fn unenroll_student(
        &self,
        class_id: i64,
        student_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        members::unenroll_student(self, class_id, student_id, request).await
    }
}
