//! 上传文件的落盘、读取与静态访问
//!
//! 文件按类别存放在 `{upload.dir}/{kind}/` 下，文件名为随机 UUID 加原扩展名。

use std::collections::HashMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use actix_multipart::Multipart;
use actix_web::{HttpResponse, Result as ActixResult, http::header};
use futures_util::{StreamExt, TryStreamExt};
use tracing::{error, warn};
use uuid::Uuid;

use crate::config::AppConfig;
use crate::errors::TutorHubError;
use crate::models::{ApiResponse, ErrorCode};
use crate::utils::file_magic::{extension_of, mime_for_extension, validate_magic_bytes};

pub const PHOTOS: &str = "photos";
pub const MATERIALS: &str = "materials";

const KINDS: &[&str] = &[PHOTOS, MATERIALS];
const MAX_TEXT_FIELD: usize = 64 * 1024;

/// 单次上传的校验规则
pub struct UploadRules<'a> {
    pub kind: &'static str,
    pub allowed_types: &'a [String],
    pub max_size: usize,
}

impl UploadRules<'static> {
    pub fn photo() -> Self {
        let config = AppConfig::get();
        Self {
            kind: PHOTOS,
            allowed_types: &config.upload.photo_allowed_types,
            max_size: config.upload.photo_max_size,
        }
    }

    pub fn material() -> Self {
        let config = AppConfig::get();
        Self {
            kind: MATERIALS,
            allowed_types: &config.upload.allowed_types,
            max_size: config.upload.max_size,
        }
    }
}

#[derive(Debug, Clone)]
pub struct StoredFile {
    pub kind: &'static str,
    pub original_name: String,
    pub stored_name: String,
    pub size: usize,
    pub mime_type: String,
}

impl StoredFile {
    /// 相对上传根目录的路径，如 `photos/<uuid>.png`
    pub fn relative_path(&self) -> String {
        format!("{}/{}", self.kind, self.stored_name)
    }

    pub fn url(&self) -> String {
        public_url(self.kind, &self.stored_name)
    }

    /// 后续校验失败时删除已落盘的文件
    pub fn discard(&self) {
        remove_stored(self.kind, &self.stored_name);
    }
}

/// 解析后的 multipart 表单：至多一个 `file` 字段，其余为文本字段
#[derive(Debug, Default)]
pub struct UploadForm {
    pub file: Option<StoredFile>,
    pub fields: HashMap<String, String>,
}

impl UploadForm {
    pub fn text(&self, name: &str) -> Option<&str> {
        self.fields
            .get(name)
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
    }
}

#[derive(Debug)]
pub enum UploadError {
    MissingFile,
    MultipleFiles,
    TypeNotAllowed,
    ContentMismatch,
    TooLarge(usize),
    Malformed(String),
    Io(TutorHubError),
}

impl UploadError {
    pub fn into_response(self) -> HttpResponse {
        let (code, message) = match self {
            UploadError::MissingFile => (ErrorCode::FileNotFound, "No file found in upload payload".to_string()),
            UploadError::MultipleFiles => (
                ErrorCode::BadRequest,
                "Only one file can be uploaded at a time".to_string(),
            ),
            UploadError::TypeNotAllowed => (ErrorCode::FileTypeNotAllowed, "File type not allowed".to_string()),
            UploadError::ContentMismatch => (
                ErrorCode::FileTypeNotAllowed,
                "File content does not match its extension".to_string(),
            ),
            UploadError::TooLarge(max) => (
                ErrorCode::FileSizeExceeded,
                format!("File size exceeds the limit of {max} bytes"),
            ),
            UploadError::Malformed(msg) => (ErrorCode::BadRequest, format!("Malformed upload: {msg}")),
            UploadError::Io(e) => {
                error!("Upload failed: {}", e);
                return HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::FileUploadFailed,
                    "Failed to store uploaded file",
                ));
            }
        };
        HttpResponse::UnprocessableEntity().json(ApiResponse::error_empty(code, message))
    }
}

fn kind_dir(kind: &str) -> PathBuf {
    PathBuf::from(&AppConfig::get().upload.dir).join(kind)
}

/// 接收 multipart 表单并把 `file` 字段落盘
///
/// 扩展名白名单、魔术字节与大小都在写入过程中校验，失败时删除半成品。
pub async fn receive_upload(
    mut payload: Multipart,
    rules: &UploadRules<'_>,
) -> Result<UploadForm, UploadError> {
    let dir = kind_dir(rules.kind);
    fs::create_dir_all(&dir).map_err(|e| UploadError::Io(e.into()))?;

    let mut form = UploadForm::default();
    if let Err(e) = read_fields(&mut payload, rules, &dir, &mut form).await {
        // 文件字段之后的字段出错时，已落盘的文件同样要删除
        if let Some(file) = form.file.take() {
            file.discard();
        }
        return Err(e);
    }

    Ok(form)
}

async fn read_fields(
    payload: &mut Multipart,
    rules: &UploadRules<'_>,
    dir: &Path,
    form: &mut UploadForm,
) -> Result<(), UploadError> {
    while let Some(mut field) = payload
        .try_next()
        .await
        .map_err(|e| UploadError::Malformed(e.to_string()))?
    {
        let content_disposition = field.content_disposition().cloned();
        let name = content_disposition
            .as_ref()
            .and_then(|cd| cd.get_name())
            .unwrap_or_default()
            .to_string();

        if name != "file" {
            let mut value = Vec::new();
            while let Some(chunk) = field.next().await {
                let data = chunk.map_err(|e| UploadError::Malformed(e.to_string()))?;
                if value.len() + data.len() > MAX_TEXT_FIELD {
                    return Err(UploadError::Malformed(format!("field {name} is too long")));
                }
                value.extend_from_slice(&data);
            }
            let text = String::from_utf8(value)
                .map_err(|_| UploadError::Malformed(format!("field {name} is not UTF-8")))?;
            form.fields.insert(name, text);
            continue;
        }

        if form.file.is_some() {
            return Err(UploadError::MultipleFiles);
        }

        let original_name = content_disposition
            .as_ref()
            .and_then(|cd| cd.get_filename())
            .map(|s| s.to_string())
            .unwrap_or_default();
        let extension = extension_of(&original_name).ok_or(UploadError::TypeNotAllowed)?;
        if !rules
            .allowed_types
            .iter()
            .any(|t| t.eq_ignore_ascii_case(&extension))
        {
            return Err(UploadError::TypeNotAllowed);
        }

        let stored_name = format!("{}{}", Uuid::new_v4(), extension);
        let path = dir.join(&stored_name);
        let mut file = fs::File::create(&path).map_err(|e| UploadError::Io(e.into()))?;

        let cleanup = |err: UploadError| {
            let _ = fs::remove_file(&path);
            err
        };

        let mut size = 0usize;
        let mut first_chunk = true;
        while let Some(chunk) = field.next().await {
            let data = chunk.map_err(|e| cleanup(UploadError::Malformed(e.to_string())))?;
            if first_chunk {
                first_chunk = false;
                if !validate_magic_bytes(&data, &extension) {
                    return Err(cleanup(UploadError::ContentMismatch));
                }
            }
            size += data.len();
            if size > rules.max_size {
                return Err(cleanup(UploadError::TooLarge(rules.max_size)));
            }
            file.write_all(&data)
                .map_err(|e| cleanup(UploadError::Io(e.into())))?;
        }
        if size == 0 {
            return Err(cleanup(UploadError::ContentMismatch));
        }

        form.file = Some(StoredFile {
            kind: rules.kind,
            original_name,
            stored_name,
            size,
            mime_type: mime_for_extension(&extension).to_string(),
        });
    }

    Ok(())
}

/// 静态访问地址
pub fn public_url(kind: &str, stored_name: &str) -> String {
    format!("/api/v1/storage/{kind}/{stored_name}")
}

/// 已存储文件的绝对路径；类别未知或文件名含路径成分时返回 None
pub fn stored_path(kind: &str, file_name: &str) -> Option<PathBuf> {
    if !KINDS.contains(&kind) || !is_safe_file_name(file_name) {
        return None;
    }
    Some(kind_dir(kind).join(file_name))
}

fn is_safe_file_name(name: &str) -> bool {
    !name.is_empty()
        && !name.starts_with('.')
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_'))
}

/// 尽力删除，失败只记录日志
pub fn remove_stored(kind: &str, file_name: &str) {
    if let Some(path) = stored_path(kind, file_name)
        && let Err(e) = fs::remove_file(&path)
    {
        warn!("Failed to remove stored file {}: {}", path.display(), e);
    }
}

/// 按 `kind/file` 形式的相对路径删除
pub fn remove_relative(relative_path: &str) {
    if let Some((kind, file_name)) = relative_path.split_once('/') {
        remove_stored(kind, file_name);
    }
}

/// 接收只含一个文件的上传，任何失败都已转换为响应
pub async fn receive_single_file(
    payload: Multipart,
    rules: &UploadRules<'_>,
) -> Result<(StoredFile, UploadForm), HttpResponse> {
    let mut form = receive_upload(payload, rules)
        .await
        .map_err(UploadError::into_response)?;
    match form.file.take() {
        Some(file) => Ok((file, form)),
        None => Err(UploadError::MissingFile.into_response()),
    }
}

/// 读取已存储的文件；`download_name` 存在时以附件形式返回
pub fn serve_stored(
    kind: &str,
    file_name: &str,
    download_name: Option<&str>,
) -> ActixResult<HttpResponse> {
    let Some(path) = stored_path(kind, file_name) else {
        return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::FileNotFound,
            "File not found",
        )));
    };

    let data = match fs::read(&path) {
        Ok(data) => data,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::FileNotFound,
                "File not found",
            )));
        }
        Err(e) => {
            error!("Failed to read {}: {}", path.display(), e);
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    "File read failed",
                )),
            );
        }
    };

    let content_type = extension_of(file_name)
        .map(|ext| mime_for_extension(&ext))
        .unwrap_or("application/octet-stream");

    let mut response = HttpResponse::Ok();
    response.insert_header((header::CONTENT_TYPE, content_type));
    if let Some(name) = download_name {
        let name = name.replace(['"', '\\', '\r', '\n'], "_");
        response.insert_header((
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{name}\""),
        ));
    }
    Ok(response.body(data))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn multipart(body: Vec<u8>) -> Multipart {
        use actix_web::http::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
        use actix_web::web::Bytes;

        let mut headers = HeaderMap::new();
        headers.insert(
            CONTENT_TYPE,
            HeaderValue::from_static("multipart/form-data; boundary=tutorhub-boundary"),
        );
        let stream = futures_util::stream::once(async move {
            Ok::<_, actix_web::error::PayloadError>(Bytes::from(body))
        });
        Multipart::new(&headers, stream)
    }

    #[actix_web::test]
    async fn test_bad_field_after_file_removes_stored_file() {
        let marker = Uuid::new_v4().to_string();
        let mut body = Vec::new();
        body.extend_from_slice(
            b"--tutorhub-boundary\r\n\
              Content-Disposition: form-data; name=\"file\"; filename=\"me.png\"\r\n\
              Content-Type: image/png\r\n\r\n",
        );
        body.extend_from_slice(b"\x89PNG\r\n\x1a\n");
        body.extend_from_slice(marker.as_bytes());
        body.extend_from_slice(
            b"\r\n--tutorhub-boundary\r\n\
              Content-Disposition: form-data; name=\"caption\"\r\n\r\n",
        );
        body.extend_from_slice(&[0xff, 0xfe, 0xfd]);
        body.extend_from_slice(b"\r\n--tutorhub-boundary--\r\n");

        let allowed = vec![".png".to_string()];
        let rules = UploadRules {
            kind: PHOTOS,
            allowed_types: &allowed,
            max_size: 1024,
        };
        let err = receive_upload(multipart(body), &rules).await.unwrap_err();
        assert!(matches!(err, UploadError::Malformed(_)));

        let leftover = fs::read_dir(kind_dir(PHOTOS))
            .unwrap()
            .filter_map(|entry| entry.ok())
            .filter_map(|entry| fs::read(entry.path()).ok())
            .any(|data| data.windows(marker.len()).any(|w| w == marker.as_bytes()));
        assert!(!leftover);
    }

    #[test]
    fn test_safe_file_names() {
        assert!(is_safe_file_name("3f1c.png"));
        assert!(is_safe_file_name("a_b-c.pdf"));
        assert!(!is_safe_file_name("../secret"));
        assert!(!is_safe_file_name("..%2fsecret"));
        assert!(!is_safe_file_name(".env"));
        assert!(!is_safe_file_name("dir/file.png"));
        assert!(!is_safe_file_name(""));
    }

    #[test]
    fn test_stored_path_rejects_unknown_kind() {
        assert!(stored_path("photos", "x.png").is_some());
        assert!(stored_path("config", "x.png").is_none());
        assert!(stored_path("photos", "../x.png").is_none());
    }

    #[test]
    fn test_remove_relative_ignores_malformed_paths() {
        // 不含分隔符或类别非法时什么都不做
        remove_relative("no-separator");
        remove_relative("config/../../etc/passwd");
    }

    #[test]
    fn test_upload_error_statuses() {
        use actix_web::http::StatusCode;
        assert_eq!(
            UploadError::TooLarge(10).into_response().status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            UploadError::Io(TutorHubError::file_operation("disk full"))
                .into_response()
                .status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_public_url() {
        assert_eq!(public_url(PHOTOS, "a.png"), "/api/v1/storage/photos/a.png");
    }
}
