//! Uploaded files
//!
//! Multipart forms are read into text fields plus image parts. Images are
//! written under `UPLOAD_DIR/<category>/` and referenced by their public path
//! (`/uploads/<category>/<name>`), which is what the records store.

use std::collections::HashMap;
use std::path::{Component, Path, PathBuf};

use axum::extract::Multipart;
use chrono::Utc;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::utils::errors::{AppError, AppResult};

/// URL prefix the upload directory is served under
pub const PUBLIC_PREFIX: &str = "/uploads";

const IMAGE_EXTENSIONS: [&str; 6] = ["png", "jpg", "jpeg", "gif", "webp", "bmp"];

#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// A parsed multipart request
#[derive(Debug, Default)]
pub struct MultipartForm {
    fields: Map<String, Value>,
    files: HashMap<String, UploadedFile>,
}

impl MultipartForm {
    /// Drain `multipart`, enforcing the image-only and size rules on every
    /// file part. File parts with no content are treated as absent.
    pub async fn read(mut multipart: Multipart, max_bytes: usize) -> AppResult<Self> {
        let mut form = MultipartForm::default();

        while let Some(mut field) = multipart.next_field().await? {
            let Some(name) = field.name().map(str::to_string) else {
                continue;
            };

            let Some(file_name) = field.file_name().map(str::to_string) else {
                let text = field.text().await?;
                form.fields.insert(name, Value::String(text));
                continue;
            };

            let content_type = field.content_type().map(str::to_string);

            let mut bytes = Vec::new();
            while let Some(chunk) = field.chunk().await? {
                if bytes.len() + chunk.len() > max_bytes {
                    return Err(AppError::Upload(format!(
                        "File '{}' exceeds the {} byte limit",
                        file_name, max_bytes
                    )));
                }
                bytes.extend_from_slice(&chunk);
            }

            if bytes.is_empty() {
                debug!("Skipping empty file part '{}'", name);
                continue;
            }

            let content_type = image_content_type(content_type.as_deref(), &file_name).ok_or_else(|| {
                AppError::Upload(format!("File '{}' is not an image; only images are allowed", file_name))
            })?;

            form.files.insert(
                name,
                UploadedFile {
                    file_name,
                    content_type,
                    bytes,
                },
            );
        }

        Ok(form)
    }

    pub fn take_file(&mut self, name: &str) -> Option<UploadedFile> {
        self.files.remove(name)
    }

    pub fn require_file(&mut self, name: &str) -> AppResult<UploadedFile> {
        self.take_file(name)
            .ok_or_else(|| AppError::Upload(format!("'{}' file is required", name)))
    }

    /// Deserialize the text fields into a request payload.
    pub fn payload<T: DeserializeOwned>(&self) -> AppResult<T> {
        serde_json::from_value(Value::Object(self.fields.clone()))
            .map_err(|e| AppError::BadRequest(format!("Invalid form data: {}", e)))
    }
}

fn image_content_type(declared: Option<&str>, file_name: &str) -> Option<String> {
    match declared {
        Some(ct) if ct.starts_with("image/") => Some(ct.to_string()),
        Some(ct) if ct != "application/octet-stream" => None,
        _ => {
            let ext = Path::new(file_name).extension()?.to_str()?.to_ascii_lowercase();
            IMAGE_EXTENSIONS
                .contains(&ext.as_str())
                .then(|| format!("image/{}", if ext == "jpg" { "jpeg" } else { ext.as_str() }))
        }
    }
}

/// Keeps ASCII alphanumerics, `.`, `-` and `_`; everything else becomes `_`.
fn sanitize_file_name(name: &str) -> String {
    let base = Path::new(name)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("file");

    let cleaned: String = base
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') { c } else { '_' })
        .collect();

    let cleaned = cleaned.trim_start_matches('.');
    if cleaned.is_empty() {
        "file".to_string()
    } else {
        cleaned.chars().take(100).collect()
    }
}

/// Disk storage for uploaded images
#[derive(Debug, Clone)]
pub struct UploadStore {
    root: PathBuf,
    max_bytes: usize,
}

impl UploadStore {
    pub fn new(root: impl Into<PathBuf>, max_bytes: usize) -> Self {
        Self {
            root: root.into(),
            max_bytes,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn max_bytes(&self) -> usize {
        self.max_bytes
    }

    pub async fn ensure_root(&self) -> AppResult<()> {
        tokio::fs::create_dir_all(&self.root).await?;
        Ok(())
    }

    pub async fn read_form(&self, multipart: Multipart) -> AppResult<MultipartForm> {
        MultipartForm::read(multipart, self.max_bytes).await
    }

    /// Write `file` under `category` and return its public path.
    pub async fn save(&self, category: &str, file: &UploadedFile) -> AppResult<String> {
        let dir = self.root.join(category);
        tokio::fs::create_dir_all(&dir).await?;

        let name = format!(
            "{}-{}-{}",
            Utc::now().timestamp_millis(),
            &Uuid::new_v4().simple().to_string()[..8],
            sanitize_file_name(&file.file_name)
        );
        tokio::fs::write(dir.join(&name), &file.bytes).await?;

        let public = format!("{}/{}/{}", PUBLIC_PREFIX, category, name);
        info!("📁 Stored {} ({} bytes, {})", public, file.bytes.len(), file.content_type);
        Ok(public)
    }

    /// Map a public path back to disk; `None` for anything outside the root.
    fn resolve(&self, public_path: &str) -> Option<PathBuf> {
        let relative = Path::new(public_path.strip_prefix(PUBLIC_PREFIX)?.trim_start_matches('/'));
        if relative.as_os_str().is_empty() || !relative.components().all(|c| matches!(c, Component::Normal(_))) {
            return None;
        }
        Some(self.root.join(relative))
    }

    /// Best-effort delete. Missing files and foreign paths are logged, not raised.
    pub async fn remove(&self, public_path: &str) {
        let Some(path) = self.resolve(public_path) else {
            warn!("Refusing to delete '{}': not an upload path", public_path);
            return;
        };

        match tokio::fs::remove_file(&path).await {
            Ok(()) => info!("🗑️ Removed {}", public_path),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("Upload {} already gone", public_path)
            }
            Err(e) => warn!("Could not remove {}: {}", public_path, e),
        }
    }

    pub async fn remove_all<'a>(&self, public_paths: impl IntoIterator<Item = &'a str>) {
        for path in public_paths {
            self.remove(path).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn png(name: &str) -> UploadedFile {
        UploadedFile {
            file_name: name.to_string(),
            content_type: "image/png".to_string(),
            bytes: vec![0x89, b'P', b'N', b'G'],
        }
    }

    #[test]
    fn file_names_are_sanitized() {
        assert_eq!(sanitize_file_name("../../etc/passwd"), "passwd");
        assert_eq!(sanitize_file_name("my photo (1).png"), "my_photo__1_.png");
        assert_eq!(sanitize_file_name(".hidden"), "hidden");
        assert_eq!(sanitize_file_name(""), "file");
    }

    #[test]
    fn only_images_pass() {
        assert_eq!(image_content_type(Some("image/jpeg"), "a.jpg").as_deref(), Some("image/jpeg"));
        assert_eq!(image_content_type(Some("application/pdf"), "a.pdf"), None);
        assert_eq!(image_content_type(Some("text/plain"), "a.png"), None);
        assert_eq!(image_content_type(None, "scan.JPG").as_deref(), Some("image/jpeg"));
        assert_eq!(image_content_type(Some("application/octet-stream"), "a.exe"), None);
    }

    #[tokio::test]
    async fn save_then_remove() {
        let dir = tempfile::tempdir().unwrap();
        let store = UploadStore::new(dir.path(), 1024);

        let public = store.save("drivers", &png("face.png")).await.unwrap();
        assert!(public.starts_with("/uploads/drivers/"));
        assert!(public.ends_with("-face.png"));

        let on_disk = store.resolve(&public).unwrap();
        assert_eq!(tokio::fs::read(&on_disk).await.unwrap().len(), 4);

        store.remove(&public).await;
        assert!(!on_disk.exists());

        // second removal is a no-op
        store.remove(&public).await;
    }

    #[test]
    fn paths_outside_the_root_do_not_resolve() {
        let store = UploadStore::new("/srv/uploads", 1024);
        assert!(store.resolve("/uploads/../secrets.txt").is_none());
        assert!(store.resolve("/etc/passwd").is_none());
        assert!(store.resolve("/uploads/").is_none());
        assert_eq!(
            store.resolve("/uploads/vehicles/a.png"),
            Some(PathBuf::from("/srv/uploads/vehicles/a.png"))
        );
    }
}
