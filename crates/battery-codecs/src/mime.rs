//! MIME type lookup for file parts.

use std::path::Path;

/// Fallback content type for files of unknown type.
pub const OCTET_STREAM: &str = "application/octet-stream";

/// Resolves the MIME type of a file.
pub trait MimeTypeResolver: Send + Sync {
	/// Returns the MIME type of `path`, or `None` if unknown.
	fn mime_type(&self, path: &Path) -> Option<String>;
}

/// Resolver guessing from the file extension.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use battery_codecs::mime::{GuessMimeTypeResolver, MimeTypeResolver};
///
/// let resolver = GuessMimeTypeResolver;
/// assert_eq!(resolver.mime_type(Path::new("photo.png")).as_deref(), Some("image/png"));
/// assert_eq!(resolver.mime_type(Path::new("blob")), None);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct GuessMimeTypeResolver;

impl MimeTypeResolver for GuessMimeTypeResolver {
	fn mime_type(&self, path: &Path) -> Option<String> {
		mime_guess::from_path(path).first().map(|mime| mime.to_string())
	}
}
