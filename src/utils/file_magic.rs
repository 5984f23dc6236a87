use std::path::Path;

/// 提取小写扩展名（包含点号，如 ".pdf"），无扩展名时返回 `None`
pub fn extension_of(file_name: &str) -> Option<String> {
    Path::new(file_name)
        .extension()
        .and_then(|s| s.to_str())
        .filter(|s| !s.is_empty())
        .map(|s| format!(".{}", s.to_lowercase()))
}

/// 根据扩展名推断 MIME 类型
pub fn mime_for_extension(extension: &str) -> &'static str {
    match extension {
        ".png" => "image/png",
        ".jpg" | ".jpeg" => "image/jpeg",
        ".webp" => "image/webp",
        ".gif" => "image/gif",
        ".pdf" => "application/pdf",
        ".doc" => "application/msword",
        ".docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        ".xls" => "application/vnd.ms-excel",
        ".xlsx" => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        ".ppt" => "application/vnd.ms-powerpoint",
        ".pptx" => "application/vnd.openxmlformats-officedocument.presentationml.presentation",
        ".zip" => "application/zip",
        ".txt" => "text/plain; charset=utf-8",
        ".md" => "text/markdown; charset=utf-8",
        _ => "application/octet-stream",
    }
}

/// 验证文件内容的魔术字节是否与扩展名匹配
///
/// # Arguments
/// * `data` - 文件内容的前几个字节
/// * `extension` - 文件扩展名（包含点号，如 ".png"）
pub fn validate_magic_bytes(data: &[u8], extension: &str) -> bool {
    if data.is_empty() {
        return false;
    }

    match extension.to_lowercase().as_str() {
        // 图片（头像与资料）
        ".png" => data.starts_with(&[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A]),
        ".jpg" | ".jpeg" => data.starts_with(&[0xFF, 0xD8, 0xFF]),
        ".gif" => data.starts_with(b"GIF87a") || data.starts_with(b"GIF89a"),
        ".webp" => data.len() >= 12 && &data[0..4] == b"RIFF" && &data[8..12] == b"WEBP",

        // 文档
        ".pdf" => data.starts_with(b"%PDF"),
        ".doc" | ".xls" | ".ppt" => {
            // OLE Compound Document
            data.starts_with(&[0xD0, 0xCF, 0x11, 0xE0, 0xA1, 0xB1, 0x1A, 0xE1])
        }
        ".docx" | ".xlsx" | ".pptx" | ".zip" => data.starts_with(&[0x50, 0x4B, 0x03, 0x04]),

        // 纯文本不检查
        ".txt" | ".md" | ".csv" => true,

        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_png_magic() {
        let png_header = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];
        assert!(validate_magic_bytes(&png_header, ".png"));
        assert!(validate_magic_bytes(&png_header, ".PNG"));
        assert!(!validate_magic_bytes(&png_header, ".jpg"));
    }

    #[test]
    fn test_office_documents() {
        let zip_header = [0x50, 0x4B, 0x03, 0x04, 0x14, 0x00];
        assert!(validate_magic_bytes(&zip_header, ".docx"));
        assert!(validate_magic_bytes(&zip_header, ".pptx"));
        assert!(!validate_magic_bytes(&zip_header, ".pdf"));
        assert!(validate_magic_bytes(b"%PDF-1.7", ".pdf"));
    }

    #[test]
    fn test_rejects_empty_and_unknown() {
        assert!(!validate_magic_bytes(&[], ".txt"));
        assert!(!validate_magic_bytes(b"MZ\x90\x00", ".exe"));
    }

    #[test]
    fn test_extension_of() {
        assert_eq!(extension_of("Algebra Notes.PDF").as_deref(), Some(".pdf"));
        assert_eq!(extension_of("photo.jpeg").as_deref(), Some(".jpeg"));
        assert_eq!(extension_of("README"), None);
        assert_eq!(mime_for_extension(".pdf"), "application/pdf");
    }
}
