//! Static pages and library bundle relay.
//!
//! Only fixed, allow-listed files are served; request paths never reach the
//! filesystem directly.

use std::io::ErrorKind;
use std::path::Path;
use tracing::debug;

use crate::error::ApiError;
use crate::libraries::{Library, LibraryChecker};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Landing,
    App,
}

impl Page {
    pub fn file_name(self) -> &'static str {
        match self {
            Page::Landing => "landing.html",
            Page::App => "index.html",
        }
    }
}

pub async fn read_page(root: &Path, page: Page) -> Result<Vec<u8>, ApiError> {
    let path = root.join(page.file_name());
    match tokio::fs::read(&path).await {
        Ok(bytes) => Ok(bytes),
        Err(e) if e.kind() == ErrorKind::NotFound => Err(ApiError::not_found(
            "Not found",
            format!("The page {} was not found", page.file_name()),
        )),
        Err(e) => Err(e.into()),
    }
}

/// Bytes of an allow-listed bundle, or a 404 telling the operator how to
/// install it.
pub async fn read_bundle(checker: &LibraryChecker, file: &str) -> Result<Vec<u8>, ApiError> {
    let library = Library::from_bundle_file(file).ok_or_else(|| {
        ApiError::not_found(
            "Library not found",
            format!(
                "{} is not a known library bundle. Known libraries: {}",
                file,
                Library::allowed_list()
            ),
        )
    })?;

    let path = checker.locate_bundle(library).ok_or_else(|| {
        ApiError::not_found(
            "Library not found",
            format!(
                "The {} library is not installed. Please run \"{}\" to install it.",
                library.bundle_file(),
                library.install_command()
            ),
        )
    })?;

    debug!(path = %path.display(), "serving library bundle");
    Ok(tokio::fs::read(&path).await?)
}
