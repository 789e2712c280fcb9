//! Input validation utilities

use regex::Regex;
use std::sync::OnceLock;

use crate::models::media::MediaType;

const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "webp"];
const VIDEO_EXTENSIONS: &[&str] = &["mp4", "mov", "avi", "webm"];

/// Validate username
pub fn validate_username(username: &str) -> Result<(), String> {
    if username.is_empty() {
        return Err("Username is required".to_string());
    }

    if username.len() < 3 {
        return Err("Username must be at least 3 characters long".to_string());
    }

    if username.len() > 32 {
        return Err("Username must be at most 32 characters long".to_string());
    }

    static USERNAME_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = USERNAME_REGEX
        .get_or_init(|| Regex::new(r"^[a-zA-Z0-9_]+$").expect("Failed to compile username regex"));

    if !regex.is_match(username) {
        return Err("Username can only contain letters, numbers, and underscores".to_string());
    }

    Ok(())
}

/// Validate email
pub fn validate_email(email: &str) -> Result<(), String> {
    if email.is_empty() {
        return Err("Email is required".to_string());
    }

    if email.len() > 254 {
        return Err("Email must be at most 254 characters long".to_string());
    }

    static EMAIL_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = EMAIL_REGEX.get_or_init(|| {
        Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$")
            .expect("Failed to compile email regex")
    });

    if !regex.is_match(email) {
        return Err("Invalid email format".to_string());
    }

    Ok(())
}

/// Validate password
pub fn validate_password(password: &str) -> Result<(), String> {
    if password.is_empty() {
        return Err("Password is required".to_string());
    }

    if password.len() < 8 {
        return Err("Password must be at least 8 characters long".to_string());
    }

    if password.len() > 128 {
        return Err("Password must be at most 128 characters long".to_string());
    }

    Ok(())
}

/// Classify an upload as image or video from its extension and MIME type.
/// Anything outside the allowed set is rejected.
pub fn validate_file_type(file_name: &str, mime_type: &str) -> Result<MediaType, String> {
    let extension = file_name
        .rsplit('.')
        .next()
        .filter(|ext| *ext != file_name)
        .map(str::to_lowercase)
        .ok_or_else(|| "Unsupported file type".to_string())?;

    if IMAGE_EXTENSIONS.contains(&extension.as_str()) && mime_type.starts_with("image/") {
        return Ok(MediaType::Image);
    }

    if VIDEO_EXTENSIONS.contains(&extension.as_str()) && mime_type.starts_with("video/") {
        return Ok(MediaType::Video);
    }

    Err("Unsupported file type".to_string())
}

/// Validate upload size against the configured cap
pub fn validate_file_size(size: usize, max_bytes: usize) -> Result<(), String> {
    if size > max_bytes {
        return Err(format!(
            "File too large. Maximum size is {} bytes",
            max_bytes
        ));
    }

    Ok(())
}

/// Resolve pagination parameters, rejecting out-of-range values.
/// Defaults: page 1, page size 20.
pub fn validate_pagination(page: Option<u32>, page_size: Option<u32>) -> Result<(u32, u32), String> {
    let page = page.unwrap_or(1);
    let page_size = page_size.unwrap_or(20);

    if page < 1 {
        return Err("page must be at least 1".to_string());
    }

    if !(1..=100).contains(&page_size) {
        return Err("pageSize must be between 1 and 100".to_string());
    }

    Ok((page, page_size))
}
