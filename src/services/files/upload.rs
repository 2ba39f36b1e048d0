use actix_multipart::Multipart;
use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use futures_util::TryStreamExt;
use futures_util::stream::StreamExt;
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;
use tracing::{error, info};
use uuid::Uuid;

use super::FileService;
use crate::errors::PortalError;
use crate::middlewares::RequireJWT;
use crate::models::{ApiResponse, ErrorCode, files::responses::FileUploadResponse};
use crate::storage::NewFile;
use crate::utils::file_magic::{content_type_for, extension_of};
use crate::utils::validate_magic_bytes;

/// 已写入磁盘、尚未登记的文档
struct StagedFile {
    original_name: String,
    storage_key: String,
    extension: String,
    size: i64,
}

fn upload_failed(message: &str) -> HttpResponse {
    HttpResponse::InternalServerError()
        .json(ApiResponse::error_empty(ErrorCode::FileUploadFailed, message))
}

fn rejected(code: ErrorCode, message: &str) -> HttpResponse {
    HttpResponse::BadRequest().json(ApiResponse::error_empty(code, message))
}

/// 扩展名是否在允许列表中，比较时忽略大小写
fn is_allowed_extension(extension: &str, allowed: &[String]) -> bool {
    allowed.iter().any(|t| t.eq_ignore_ascii_case(extension))
}

pub async fn handle_upload(
    service: &FileService,
    req: &HttpRequest,
    mut payload: Multipart,
) -> ActixResult<HttpResponse> {
    let user_id = match RequireJWT::extract_user_id(req) {
        Some(id) => id,
        None => {
            return Ok(HttpResponse::Unauthorized()
                .json(ApiResponse::error_empty(ErrorCode::Unauthorized, "用户未登录")));
        }
    };

    let config = service.get_config();
    let upload_dir = &config.upload.dir;
    let max_size = config.upload.max_size;
    let allowed_types = &config.upload.allowed_types;

    let user_dir = Path::new(upload_dir).join(user_id.to_string());
    if let Err(e) = fs::create_dir_all(&user_dir) {
        error!("{}", PortalError::file_operation(format!("{e}")));
        return Ok(upload_failed("创建上传目录失败"));
    }

    let mut staged: Option<StagedFile> = None;

    while let Ok(Some(mut field)) = payload.try_next().await {
        let content_disposition = field.content_disposition();
        let name = content_disposition
            .and_then(|cd| cd.get_name())
            .unwrap_or_default()
            .to_string();

        if name != "file" {
            continue;
        }
        if let Some(ref file) = staged {
            let _ = fs::remove_file(Path::new(upload_dir).join(&file.storage_key));
            return Ok(rejected(
                ErrorCode::MultifileUploadNotAllowed,
                "每次只能上传一个文件",
            ));
        }

        let original_name = content_disposition
            .and_then(|cd| cd.get_filename())
            .map(|s| s.trim().to_string())
            .unwrap_or_default();

        let extension = match extension_of(&original_name) {
            Some(ext) if is_allowed_extension(&ext, allowed_types) => ext,
            _ => {
                return Ok(rejected(
                    ErrorCode::FileTypeNotAllowed,
                    &format!("只允许上传 {} 格式的文档", allowed_types.join(", ")),
                ));
            }
        };

        let storage_key = format!(
            "{}/{}-{}{}",
            user_id,
            chrono::Utc::now().timestamp(),
            Uuid::new_v4(),
            extension
        );
        let file_path = Path::new(upload_dir).join(&storage_key);
        let mut f = match File::create(&file_path) {
            Ok(file) => file,
            Err(e) => {
                error!("{}", PortalError::file_operation(format!("{e}")));
                return Ok(upload_failed("文件创建失败"));
            }
        };

        let mut total_size: usize = 0;
        let mut first_chunk = true;
        while let Some(chunk) = field.next().await {
            let data = match chunk {
                Ok(data) => data,
                Err(e) => {
                    let _ = fs::remove_file(&file_path);
                    return Err(e.into());
                }
            };

            // 第一个 chunk 时验证魔术字节
            if first_chunk {
                first_chunk = false;
                if !validate_magic_bytes(&data, &extension) {
                    let _ = fs::remove_file(&file_path);
                    return Ok(rejected(
                        ErrorCode::FileTypeNotAllowed,
                        "文件内容与扩展名不匹配",
                    ));
                }
            }

            total_size += data.len();
            if total_size > max_size {
                let _ = fs::remove_file(&file_path);
                return Ok(rejected(
                    ErrorCode::FileSizeExceeded,
                    &format!("文件大小超过 {} 字节的限制", max_size),
                ));
            }
            if let Err(e) = f.write_all(&data) {
                let _ = fs::remove_file(&file_path);
                error!("{}", PortalError::file_operation(format!("{e}")));
                return Ok(upload_failed("文件写入失败"));
            }
        }

        if total_size == 0 {
            let _ = fs::remove_file(&file_path);
            return Ok(rejected(ErrorCode::FileUploadFailed, "文件内容为空"));
        }

        staged = Some(StagedFile {
            original_name,
            storage_key,
            extension,
            size: total_size as i64,
        });
    }

    let Some(staged) = staged else {
        return Ok(rejected(ErrorCode::FileNotFound, "请求中没有找到文件"));
    };

    let token = Uuid::new_v4().to_string();
    let storage = service.get_storage(req);
    let record = NewFile {
        token: &token,
        original_name: &staged.original_name,
        storage_key: &staged.storage_key,
        file_size: staged.size,
        content_type: content_type_for(&staged.extension),
        user_id,
    };

    match storage.create_file(record).await {
        Ok(file) => {
            info!(
                "User {} uploaded {} ({} bytes)",
                user_id, file.original_name, file.file_size
            );
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                FileUploadResponse {
                    url: config.document_url(&file.token),
                    token: file.token,
                    file_name: file.original_name,
                    size: file.file_size,
                    content_type: file.content_type,
                    uploaded_at: file.uploaded_at,
                },
                "文档上传成功",
            )))
        }
        Err(e) => {
            let _ = fs::remove_file(Path::new(upload_dir).join(&staged.storage_key));
            error!("{}", e.format_simple());
            Ok(upload_failed("保存文件记录失败"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allowed_extension_ignores_case() {
        let allowed = vec![".pdf".to_string(), ".DOCX".to_string()];
        assert!(is_allowed_extension(".pdf", &allowed));
        assert!(is_allowed_extension(".docx", &allowed));
        assert!(!is_allowed_extension(".exe", &allowed));
    }
}
