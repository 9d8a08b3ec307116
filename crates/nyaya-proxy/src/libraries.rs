//! Presence checks for the optional client-side export libraries.
//!
//! Each library can be installed with npm (`node_modules/<name>`) or dropped
//! by hand into `libs/`. Either location counts. Nothing is cached: every
//! check stats the filesystem again.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Library {
    Docx,
    Jspdf,
    Html2canvas,
}

impl Library {
    pub const ALL: [Library; 3] = [Library::Docx, Library::Jspdf, Library::Html2canvas];

    pub fn name(self) -> &'static str {
        match self {
            Library::Docx => "docx",
            Library::Jspdf => "jspdf",
            Library::Html2canvas => "html2canvas",
        }
    }

    /// Browser bundle file name served under `/libs/`.
    pub fn bundle_file(self) -> &'static str {
        match self {
            Library::Docx => "docx.js",
            Library::Jspdf => "jspdf.umd.min.js",
            Library::Html2canvas => "html2canvas.min.js",
        }
    }

    pub fn from_bundle_file(file: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|lib| lib.bundle_file() == file)
    }

    /// Directory npm installs the package into.
    pub fn package_dir(self) -> PathBuf {
        Path::new("node_modules").join(self.name())
    }

    /// Hand-placed copy of the bundle.
    pub fn manual_bundle(self) -> PathBuf {
        Path::new("libs").join(self.bundle_file())
    }

    /// Bundle shipped inside the npm package.
    pub fn package_bundle(self) -> PathBuf {
        self.package_dir().join("dist").join(self.bundle_file())
    }

    pub fn install_command(self) -> String {
        format!("npm install {}", self.name())
    }

    pub fn allowed_list() -> String {
        Self::ALL
            .iter()
            .map(|lib| lib.name())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for Library {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Library {name} is not in the allowed list: {allowed}")]
pub struct UnknownLibrary {
    pub name: String,
    allowed: String,
}

impl UnknownLibrary {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            allowed: Library::allowed_list(),
        }
    }
}

impl FromStr for Library {
    type Err = UnknownLibrary;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|lib| lib.name() == s)
            .ok_or_else(|| UnknownLibrary::new(s))
    }
}

/// Library name to presence flag, serialized as a JSON object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct LibraryAvailability(BTreeMap<Library, bool>);

impl LibraryAvailability {
    #[cfg(test)]
    pub fn is_available(&self, library: Library) -> bool {
        self.0.get(&library).copied().unwrap_or(false)
    }

    pub fn missing(&self) -> Vec<Library> {
        self.0
            .iter()
            .filter(|(_, present)| !**present)
            .map(|(lib, _)| *lib)
            .collect()
    }

    #[cfg(test)]
    pub fn iter(&self) -> impl Iterator<Item = (Library, bool)> + '_ {
        self.0.iter().map(|(lib, present)| (*lib, *present))
    }
}

#[derive(Debug, Clone)]
pub struct LibraryChecker {
    root: PathBuf,
}

impl LibraryChecker {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn is_installed(&self, library: Library) -> bool {
        self.root.join(library.package_dir()).exists()
            || self.root.join(library.manual_bundle()).exists()
    }

    pub fn check_libraries(&self) -> LibraryAvailability {
        LibraryAvailability(
            Library::ALL
                .into_iter()
                .map(|lib| (lib, self.is_installed(lib)))
                .collect(),
        )
    }

    pub fn list_missing(&self) -> Vec<Library> {
        self.check_libraries().missing()
    }

    /// First existing bundle file for `library`, npm copy preferred.
    pub fn locate_bundle(&self, library: Library) -> Option<PathBuf> {
        [library.package_bundle(), library.manual_bundle()]
            .into_iter()
            .map(|rel| self.root.join(rel))
            .find(|path| path.is_file())
    }
}
