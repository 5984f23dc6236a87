use actix_multipart::Multipart;
use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::TutorService;
use crate::models::{ApiResponse, ErrorCode, students::responses::PhotoResponse};
use crate::services::uploads::{self, UploadRules};
use crate::services::{current_user, forbidden, not_found, storage_error};

pub async fn upload_photo(
    service: &TutorService,
    id: i64,
    payload: Multipart,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };
    if !user.is_admin() && user.id != id {
        return Ok(forbidden("You can only change your own photo"));
    }

    let storage = service.get_storage(request)?;
    let previous = match storage.get_tutor_profile(id).await {
        Ok(Some(profile)) => profile.photo_path,
        Ok(None) => return Ok(not_found(ErrorCode::TutorNotFound, "Tutor not found")),
        Err(e) => return Ok(storage_error(e, "Failed to load tutor")),
    };

    let (file, _) = match uploads::receive_single_file(payload, &UploadRules::photo()).await {
        Ok(received) => received,
        Err(resp) => return Ok(resp),
    };

    let photo_path = file.relative_path();
    match storage.update_tutor_photo(id, &photo_path).await {
        Ok(true) => {
            if let Some(previous) = previous {
                uploads::remove_relative(&previous);
            }
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                PhotoResponse {
                    url: file.url(),
                    photo_path,
                },
                "Photo uploaded successfully",
            )))
        }
        Ok(false) => {
            file.discard();
            Ok(not_found(ErrorCode::TutorNotFound, "Tutor not found"))
        }
        Err(e) => {
            file.discard();
            Ok(storage_error(e, "Failed to save photo"))
        }
    }
}
