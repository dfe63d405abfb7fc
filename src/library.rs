//! Tagged image catalog with case-insensitive search
//!
//! Images are stored either with an absolute path or relative to the library
//! root. Relative entries follow the root when it moves, which is how a whole
//! library can be carried between machines.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::fmt;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use tracing::{debug, error, info, warn};
use walkdir::WalkDir;

use crate::constants::library::IMAGE_EXTENSIONS;
use crate::persistence::Persistence;

/// String that sorts and searches without regard to case
///
/// Ordering compares the lowercase forms first and falls back to the exact
/// text, so `"Hello" < "heLLo"` and sorting stays stable. Equality is exact.
#[derive(Debug, Clone)]
pub struct CaseOptionalString {
    value: String,
    lower: String,
}

impl CaseOptionalString {
    pub fn new(value: impl Into<String>) -> Self {
        let value = value.into();
        let lower = value.to_lowercase();
        Self { value, lower }
    }

    pub fn as_str(&self) -> &str {
        &self.value
    }

    pub fn lower(&self) -> &str {
        &self.lower
    }

    /// Byte offset of `needle` in the lowercase form, ignoring case
    pub fn find(&self, needle: &CaseOptionalString) -> Option<usize> {
        self.lower.find(&needle.lower)
    }

    pub fn substring(&self, needle: &CaseOptionalString) -> bool {
        self.find(needle).is_some()
    }
}

impl PartialEq for CaseOptionalString {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl Eq for CaseOptionalString {}

impl Ord for CaseOptionalString {
    fn cmp(&self, other: &Self) -> Ordering {
        self.lower
            .cmp(&other.lower)
            .then_with(|| self.value.cmp(&other.value))
    }
}

impl PartialOrd for CaseOptionalString {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for CaseOptionalString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

impl From<&str> for CaseOptionalString {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageInfo {
    pub name: String,
    pub file_path: PathBuf,
    pub tags: Vec<String>,
    /// Set when `file_path` was made relative to the library root
    pub is_relative: bool,
}

impl ImageInfo {
    fn name_and_tags(&self) -> impl Iterator<Item = CaseOptionalString> + '_ {
        std::iter::once(CaseOptionalString::new(self.name.as_str()))
            .chain(self.tags.iter().map(|t| CaseOptionalString::new(t.as_str())))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageLibraryState {
    pub library_root: PathBuf,
    pub images: Vec<ImageInfo>,
}

/// Images matched by a search, in library order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageSearchResults {
    filenames: Vec<PathBuf>,
    query: String,
    matched_tags: Vec<CaseOptionalString>,
}

impl ImageSearchResults {
    /// Matched files, resolved against the library root
    pub fn filenames(&self) -> &[PathBuf] {
        &self.filenames
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    /// Unique tags (or image names) that produced the match, sorted
    pub fn matched_tags(&self) -> &[CaseOptionalString] {
        &self.matched_tags
    }
}

/// Outcome of comparing the library against the files under its root
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LibraryUpdateResults {
    pub added: Vec<PathBuf>,
    /// (old stored path, new stored path)
    pub moved: Vec<(PathBuf, PathBuf)>,
    pub removed: Vec<PathBuf>,
}

impl LibraryUpdateResults {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.moved.is_empty() && self.removed.is_empty()
    }

    /// One-line status message, e.g. "Library changes detected! Added 2 images."
    pub fn summary(&self) -> String {
        let mut message = String::from("Library changes detected!");
        for (verb, count) in [
            ("Added", self.added.len()),
            ("Moved", self.moved.len()),
            ("Removed", self.removed.len()),
        ] {
            if count > 0 {
                message.push_str(&format!(" {} {} images.", verb, count));
            }
        }
        message
    }
}

pub struct ImageLibrary {
    state: ImageLibraryState,
    persistence: Option<Rc<dyn Persistence>>,
}

impl ImageLibrary {
    /// Load the library from persistence
    pub fn new(persistence: Rc<dyn Persistence>) -> Self {
        let state = persistence.load_image_library();
        debug!(images = state.images.len(), root = %state.library_root.display(), "Loaded image library");
        Self {
            state,
            persistence: Some(persistence),
        }
    }

    /// Wrap an in-memory library that is never saved
    #[cfg(test)]
    pub fn from_state(state: ImageLibraryState) -> Self {
        Self { state, persistence: None }
    }

    pub fn state(&self) -> &ImageLibraryState {
        &self.state
    }

    pub fn library_root(&self) -> &Path {
        &self.state.library_root
    }

    /// Unique tags, optionally with image names mixed in, sorted
    pub fn all_tags(&self, include_names: bool) -> Vec<CaseOptionalString> {
        let mut tags = BTreeSet::new();
        for image in &self.state.images {
            if include_names && !image.name.is_empty() {
                tags.insert(CaseOptionalString::new(image.name.as_str()));
            }
            for tag in &image.tags {
                tags.insert(CaseOptionalString::new(tag.as_str()));
            }
        }
        tags.into_iter().collect()
    }

    /// Stored paths; relative entries are not resolved
    pub fn all_filenames(&self) -> Vec<PathBuf> {
        self.state.images.iter().map(|i| i.file_path.clone()).collect()
    }

    pub fn search(&self, query: &str) -> ImageSearchResults {
        if query.is_empty() {
            return self.results(self.state.images.iter().collect(), query, self.all_tags(false));
        }

        let needle = CaseOptionalString::new(query);
        if self.all_tags(true).binary_search(&needle).is_ok() {
            return self.exact_match_search(needle);
        }
        self.partial_match_search(needle)
    }

    fn exact_match_search(&self, needle: CaseOptionalString) -> ImageSearchResults {
        let matched: Vec<&ImageInfo> = self
            .state
            .images
            .iter()
            .filter(|image| image.name_and_tags().any(|t| t == needle))
            .collect();
        let tags = if matched.is_empty() { Vec::new() } else { vec![needle.clone()] };
        self.results(matched, needle.as_str(), tags)
    }

    fn partial_match_search(&self, needle: CaseOptionalString) -> ImageSearchResults {
        let mut matched = Vec::new();
        let mut tags = BTreeSet::new();
        for image in &self.state.images {
            let mut image_matched = false;
            for tag in image.name_and_tags().filter(|t| t.substring(&needle)) {
                image_matched = true;
                tags.insert(tag);
            }
            if image_matched {
                matched.push(image);
            }
        }
        self.results(matched, needle.as_str(), tags.into_iter().collect())
    }

    fn results(
        &self,
        images: Vec<&ImageInfo>,
        query: &str,
        matched_tags: Vec<CaseOptionalString>,
    ) -> ImageSearchResults {
        ImageSearchResults {
            filenames: images.iter().map(|i| self.resolve(&i.file_path)).collect(),
            query: query.to_string(),
            matched_tags,
        }
    }

    fn resolve(&self, file_path: &Path) -> PathBuf {
        absolute_path(&self.state.library_root, file_path)
    }

    /// Entry stored at `file_path`, or resolving to it (as search results do)
    fn find(&self, file_path: &Path) -> Option<&ImageInfo> {
        self.state
            .images
            .iter()
            .find(|i| i.file_path == file_path || self.resolve(&i.file_path) == file_path)
    }

    pub fn name(&self, file_path: &Path) -> Option<String> {
        self.find(file_path).map(|i| i.name.clone())
    }

    /// Sorted unique tags of the image stored at `file_path`
    pub fn tags(&self, file_path: &Path) -> Vec<CaseOptionalString> {
        let Some(image) = self.find(file_path) else {
            return Vec::new();
        };
        let tags: BTreeSet<CaseOptionalString> =
            image.tags.iter().map(|t| CaseOptionalString::new(t.as_str())).collect();
        tags.into_iter().collect()
    }

    pub fn add_image(&mut self, file_path: impl Into<PathBuf>, name: &str, tags: &[String]) {
        let file_path = file_path.into();
        debug!(path = %file_path.display(), name = name, "Adding image to library");
        self.state.images.push(ImageInfo {
            name: name.to_string(),
            is_relative: file_path.is_relative(),
            file_path,
            tags: tags.to_vec(),
        });
    }

    /// Repoint the entry stored exactly at `from`; false when there is none
    pub fn move_image(&mut self, from: &Path, to: impl Into<PathBuf>) -> bool {
        let Some(image) = self.state.images.iter_mut().find(|i| i.file_path == from) else {
            return false;
        };
        let to = to.into();
        image.is_relative = to.is_relative();
        image.file_path = to;
        true
    }

    /// Remove the entry stored exactly at `file_path`; false when there is none
    pub fn delete_image(&mut self, file_path: &Path) -> bool {
        let before = self.state.images.len();
        self.state.images.retain(|i| i.file_path != file_path);
        before != self.state.images.len()
    }

    /// Change the root, rewriting every path to be as relative to it as possible
    pub fn set_library_root(&mut self, root: impl Into<PathBuf>) {
        let root = root.into();
        let old_root = std::mem::replace(&mut self.state.library_root, root);
        for image in &mut self.state.images {
            let absolute = absolute_path(&old_root, &image.file_path);
            image.file_path = most_relative_path(&self.state.library_root, &absolute);
            image.is_relative = image.file_path.is_relative();
        }
        info!(root = %self.state.library_root.display(), "Library root set");
    }

    /// Change the root only; relative entries move with it
    pub fn move_library_root(&mut self, root: impl Into<PathBuf>) {
        self.state.library_root = root.into();
        info!(root = %self.state.library_root.display(), "Library root moved");
    }

    /// Make every entry absolute and forget the root
    pub fn remove_library_root(&mut self) {
        let old_root = std::mem::take(&mut self.state.library_root);
        for image in &mut self.state.images {
            image.file_path = absolute_path(&old_root, &image.file_path);
            image.is_relative = false;
        }
        info!("Library root removed");
    }

    pub fn clear_library(&mut self) {
        self.state = ImageLibraryState::default();
    }

    pub fn save_library(&self) {
        let Some(persistence) = &self.persistence else {
            warn!("Image library has no persistence, not saving");
            return;
        };
        if let Err(e) = persistence.save_image_library(&self.state) {
            error!(error = ?e, "Failed to save image library");
        }
    }

    /// Reconcile the library with the image files found under the root
    ///
    /// New files are added relative to the root. An entry whose file vanished
    /// is re-pointed at a new file with the same file name if there is one,
    /// otherwise it is reported removed and only dropped when `delete_missing`.
    pub fn detect_library_changes(&mut self, delete_missing: bool) -> LibraryUpdateResults {
        let mut results = LibraryUpdateResults::default();
        let root = self.state.library_root.clone();
        if root.as_os_str().is_empty() || !root.is_dir() {
            debug!(root = %root.display(), "No library root to scan");
            return results;
        }

        let mut found = collect_image_files(&root);
        found.sort();

        let known: BTreeSet<PathBuf> =
            self.state.images.iter().map(|i| self.resolve(&i.file_path)).collect();
        let mut new_files: Vec<PathBuf> = found.into_iter().filter(|f| !known.contains(f)).collect();

        let mut missing = Vec::new();
        for image in &mut self.state.images {
            if absolute_path(&root, &image.file_path).exists() {
                continue;
            }
            let file_name = image.file_path.file_name().map(|n| n.to_os_string());
            let replacement = new_files
                .iter()
                .position(|f| f.file_name().map(|n| n.to_os_string()) == file_name);
            match replacement {
                Some(position) => {
                    let new_path = most_relative_path(&root, &new_files.remove(position));
                    debug!(from = %image.file_path.display(), to = %new_path.display(), "Image moved");
                    results.moved.push((image.file_path.clone(), new_path.clone()));
                    image.is_relative = new_path.is_relative();
                    image.file_path = new_path;
                }
                None => missing.push(image.file_path.clone()),
            }
        }

        if delete_missing {
            self.state.images.retain(|i| !missing.contains(&i.file_path));
        }
        results.removed = missing;

        for file in new_files {
            let stored = most_relative_path(&root, &file);
            let name = title_name(&stored);
            self.add_image(stored.clone(), &name, &[]);
            results.added.push(stored);
        }

        if !results.is_empty() {
            info!(
                added = results.added.len(),
                moved = results.moved.len(),
                removed = results.removed.len(),
                "Image library changed on disk"
            );
        }
        results
    }
}

/// `file_path` itself when absolute, else joined onto `root`
pub fn absolute_path(root: &Path, file_path: &Path) -> PathBuf {
    if file_path.is_absolute() {
        file_path.to_path_buf()
    } else {
        root.join(file_path)
    }
}

/// `file_path` relative to `root` when it lies under it, else unchanged
pub fn most_relative_path(root: &Path, file_path: &Path) -> PathBuf {
    if root.as_os_str().is_empty() || file_path.is_relative() {
        return file_path.to_path_buf();
    }
    match file_path.strip_prefix(root) {
        Ok(relative) if !relative.as_os_str().is_empty() => relative.to_path_buf(),
        _ => file_path.to_path_buf(),
    }
}

const TITLE_EXCEPTIONS: &[&str] = &[
    "a", "an", "and", "as", "at", "but", "by", "for", "if", "in", "nor", "of", "off", "on", "or",
    "per", "so", "the", "to", "up", "via", "yet",
];

/// Display name derived from a file name: `the-fall_of-rome.jpg` becomes `The Fall of Rome`
pub fn title_name(file_path: &Path) -> String {
    let stem = file_path
        .file_stem()
        .map(|s| s.to_string_lossy().replace(['-', '_'], " "))
        .unwrap_or_default();
    let words: Vec<&str> = stem.split_whitespace().collect();
    let last = words.len().saturating_sub(1);

    words
        .iter()
        .enumerate()
        .map(|(index, word)| {
            if index == 0 || index == last || !TITLE_EXCEPTIONS.contains(word) {
                capitalize(word)
            } else {
                word.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Image files below `root`; symbolic links are listed but never followed
fn collect_image_files(root: &Path) -> Vec<PathBuf> {
    let mut found = Vec::new();
    for entry in WalkDir::new(root) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!(path = %root.display(), error = %e, "Failed to read library directory");
                continue;
            }
        };
        if entry.file_type().is_file() && is_image_file(entry.path()) {
            found.push(entry.into_path());
        }
    }
    found
}

fn is_image_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| IMAGE_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::testing::MemoryPersistence;
    use std::fs;
    use tempfile::tempdir;

    const LIB_ROOT: &str = "/test/";
    const NONLIB_ROOT: &str = "/test2/";

    fn image(name: &str, path: &str, tags: &[&str], is_relative: bool) -> ImageInfo {
        ImageInfo {
            name: name.to_string(),
            file_path: PathBuf::from(path),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            is_relative,
        }
    }

    fn test_library() -> ImageLibrary {
        ImageLibrary::from_state(ImageLibraryState {
            library_root: PathBuf::from(LIB_ROOT),
            images: vec![
                image("corgi", "/test/corgi.jpg", &["dog", "cute", "short"], false),
                image("great dane", "great_dane.jpg", &["dog", "cute", "tall"], true),
                image("capybara", "/test2/capy.jpg", &["rodent", "cute", "short"], false),
                // "Stall" collides with "tall" on partial matches
                image("Bathroom", "/test/but-why.jpg", &["gender", "neutral", "Stall"], false),
            ],
        })
    }

    fn strings(tags: &[CaseOptionalString]) -> Vec<&str> {
        tags.iter().map(|t| t.as_str()).collect()
    }

    fn paths(items: &[&str]) -> Vec<PathBuf> {
        items.iter().map(PathBuf::from).collect()
    }

    #[test]
    fn test_case_optional_string_ordering() {
        let hello = CaseOptionalString::new("Hello");
        assert_eq!(hello.lower(), "hello");
        assert_eq!(hello.cmp(&CaseOptionalString::new("Hello")), Ordering::Equal);
        assert!(hello < CaseOptionalString::new("heLLo"));
        assert_ne!(hello, CaseOptionalString::new("heLLo"));
        assert!(hello > CaseOptionalString::new("heL"));
        assert!(hello > CaseOptionalString::new("Goodbye"));
    }

    #[test]
    fn test_case_optional_string_find() {
        let text = CaseOptionalString::new("Hello World");
        assert_eq!(text.find(&"heLLo woRld".into()), Some(0));
        assert_eq!(text.find(&"woRld".into()), Some(6));
        assert_eq!(text.find(&"O".into()), Some(4));
        assert_eq!(text.find(&"abc".into()), None);
        assert!(text.substring(&"World".into()));
    }

    #[test]
    fn test_all_tags_sorted() {
        let library = test_library();
        assert_eq!(
            strings(&library.all_tags(false)),
            vec!["cute", "dog", "gender", "neutral", "rodent", "short", "Stall", "tall"]
        );
        assert_eq!(
            strings(&library.all_tags(true)),
            vec![
                "Bathroom", "capybara", "corgi", "cute", "dog", "gender", "great dane", "neutral",
                "rodent", "short", "Stall", "tall"
            ]
        );
    }

    #[test]
    fn test_all_filenames_not_resolved() {
        let library = test_library();
        assert_eq!(
            library.all_filenames(),
            paths(&["/test/corgi.jpg", "great_dane.jpg", "/test2/capy.jpg", "/test/but-why.jpg"])
        );
    }

    #[test]
    fn test_full_word_searches() {
        let library = test_library();

        let result = library.search("dog");
        assert_eq!(strings(result.matched_tags()), vec!["dog"]);
        assert_eq!(result.filenames(), paths(&["/test/corgi.jpg", "/test/great_dane.jpg"]));

        let result = library.search("tall");
        assert_eq!(strings(result.matched_tags()), vec!["tall"]);
        assert_eq!(result.filenames(), paths(&["/test/great_dane.jpg"]));

        let result = library.search("capybara");
        assert_eq!(strings(result.matched_tags()), vec!["capybara"]);
        assert_eq!(result.filenames(), paths(&["/test2/capy.jpg"]));

        let result = library.search("notgonnafindit");
        assert!(result.matched_tags().is_empty());
        assert!(result.filenames().is_empty());
    }

    #[test]
    fn test_partial_word_searches() {
        let library = test_library();

        let result = library.search("do");
        assert_eq!(strings(result.matched_tags()), vec!["dog"]);
        assert_eq!(result.filenames(), paths(&["/test/corgi.jpg", "/test/great_dane.jpg"]));

        let result = library.search("tal");
        assert_eq!(strings(result.matched_tags()), vec!["Stall", "tall"]);
        assert_eq!(result.filenames(), paths(&["/test/great_dane.jpg", "/test/but-why.jpg"]));

        let result = library.search("capy");
        assert_eq!(strings(result.matched_tags()), vec!["capybara"]);

        let result = library.search("");
        assert_eq!(
            strings(result.matched_tags()),
            vec!["cute", "dog", "gender", "neutral", "rodent", "short", "Stall", "tall"]
        );
        assert_eq!(
            result.filenames(),
            paths(&["/test/corgi.jpg", "/test/great_dane.jpg", "/test2/capy.jpg", "/test/but-why.jpg"])
        );
    }

    #[test]
    fn test_deduplicating_search() {
        let result = test_library().search("c");
        assert_eq!(strings(result.matched_tags()), vec!["capybara", "corgi", "cute"]);
        assert_eq!(
            result.filenames(),
            paths(&["/test/corgi.jpg", "/test/great_dane.jpg", "/test2/capy.jpg"])
        );
    }

    #[test]
    fn test_case_insensitive_searches() {
        let library = test_library();

        let result = library.search("stall");
        assert_eq!(strings(result.matched_tags()), vec!["Stall"]);
        assert_eq!(result.filenames(), paths(&["/test/but-why.jpg"]));

        let result = library.search("bath");
        assert_eq!(strings(result.matched_tags()), vec!["Bathroom"]);
        assert_eq!(result.filenames(), paths(&["/test/but-why.jpg"]));
    }

    #[test]
    fn test_remove_root() {
        let mut library = test_library();
        library.remove_library_root();
        assert_eq!(
            library.all_filenames(),
            paths(&["/test/corgi.jpg", "/test/great_dane.jpg", "/test2/capy.jpg", "/test/but-why.jpg"])
        );
        assert_eq!(library.library_root(), Path::new(""));
        assert!(library.state().images.iter().all(|i| !i.is_relative));
    }

    #[test]
    fn test_move_root() {
        let mut library = test_library();
        library.move_library_root(NONLIB_ROOT);

        assert_eq!(
            library.search("").filenames(),
            paths(&["/test/corgi.jpg", "/test2/great_dane.jpg", "/test2/capy.jpg", "/test/but-why.jpg"])
        );
        assert_eq!(
            library.all_filenames(),
            paths(&["/test/corgi.jpg", "great_dane.jpg", "/test2/capy.jpg", "/test/but-why.jpg"])
        );
        assert_eq!(library.library_root(), Path::new(NONLIB_ROOT));
    }

    #[test]
    fn test_set_root() {
        let mut library = test_library();
        library.set_library_root(NONLIB_ROOT);

        assert_eq!(
            library.all_filenames(),
            paths(&["/test/corgi.jpg", "/test/great_dane.jpg", "capy.jpg", "/test/but-why.jpg"])
        );
        assert_eq!(library.library_root(), Path::new(NONLIB_ROOT));
        assert!(library.state().images[2].is_relative);
        assert!(!library.state().images[1].is_relative);
    }

    #[test]
    fn test_add_image() {
        let mut library = test_library();
        library.add_image("new-image.png", "New Thing", &["tag_test".to_string()]);

        assert_eq!(
            library.all_filenames(),
            paths(&[
                "/test/corgi.jpg",
                "great_dane.jpg",
                "/test2/capy.jpg",
                "/test/but-why.jpg",
                "new-image.png"
            ])
        );
        let result = library.search("");
        assert_eq!(
            strings(result.matched_tags()),
            vec!["cute", "dog", "gender", "neutral", "rodent", "short", "Stall", "tag_test", "tall"]
        );
        assert_eq!(result.filenames()[4], PathBuf::from("/test/new-image.png"));
        assert_eq!(library.name(Path::new("new-image.png")), Some("New Thing".to_string()));
    }

    #[test]
    fn test_move_image_requires_exact_path() {
        let mut library = test_library();
        assert!(!library.move_image(Path::new("capy.jpg"), "moved-image.png"));
        assert_eq!(library.all_filenames()[2], PathBuf::from("/test2/capy.jpg"));

        assert!(library.move_image(Path::new("/test2/capy.jpg"), "moved-image.png"));
        assert_eq!(library.all_filenames()[2], PathBuf::from("moved-image.png"));
        assert_eq!(library.search("").filenames()[2], PathBuf::from("/test/moved-image.png"));
        assert_eq!(library.name(Path::new("moved-image.png")), Some("capybara".to_string()));
    }

    #[test]
    fn test_delete_image_requires_exact_path() {
        let mut library = test_library();
        assert!(!library.delete_image(Path::new("capy.jpg")));
        assert_eq!(library.all_filenames().len(), 4);

        assert!(library.delete_image(Path::new("/test2/capy.jpg")));
        assert_eq!(
            library.all_filenames(),
            paths(&["/test/corgi.jpg", "great_dane.jpg", "/test/but-why.jpg"])
        );
        assert_eq!(
            strings(&library.all_tags(false)),
            vec!["cute", "dog", "gender", "neutral", "short", "Stall", "tall"]
        );
    }

    #[test]
    fn test_name_and_tags_lookup() {
        let library = test_library();
        assert_eq!(library.name(Path::new("/test/corgi.jpg")), Some("corgi".to_string()));
        assert_eq!(library.name(Path::new("/test/nope.jpg")), None);
        // Search results hand out resolved paths
        assert_eq!(library.name(Path::new("/test/great_dane.jpg")), Some("great dane".to_string()));
        assert_eq!(strings(&library.tags(Path::new("/test/but-why.jpg"))), vec!["gender", "neutral", "Stall"]);
        assert!(library.tags(Path::new("/test/nope.jpg")).is_empty());
    }

    #[test]
    fn test_title_name() {
        assert_eq!(title_name(Path::new("/x/the-fall_of-rome.jpg")), "The Fall of Rome");
        assert_eq!(title_name(Path::new("what-it-is-for.png")), "What It Is For");
        assert_eq!(title_name(Path::new("corgi.jpg")), "Corgi");
    }

    #[test]
    fn test_summary_message() {
        let results = LibraryUpdateResults {
            added: paths(&["a.png", "b.png"]),
            moved: vec![],
            removed: paths(&["c.png"]),
        };
        assert_eq!(results.summary(), "Library changes detected! Added 2 images. Removed 1 images.");
        assert!(LibraryUpdateResults::default().is_empty());
    }

    #[test]
    fn test_detect_library_changes() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("dogs")).unwrap();
        fs::write(root.join("kept.png"), b"x").unwrap();
        fs::write(root.join("dogs").join("moved.jpg"), b"x").unwrap();
        fs::write(root.join("fresh-catch.gif"), b"x").unwrap();
        fs::write(root.join("notes.txt"), b"x").unwrap();

        let mut library = ImageLibrary::from_state(ImageLibraryState {
            library_root: root.to_path_buf(),
            images: vec![
                image("Kept", "kept.png", &["keep"], true),
                image("Moved", "moved.jpg", &["dog"], true),
                image("Gone", "gone.png", &[], true),
            ],
        });

        let results = library.detect_library_changes(false);
        assert_eq!(results.added, paths(&["fresh-catch.gif"]));
        assert_eq!(
            results.moved,
            vec![(PathBuf::from("moved.jpg"), PathBuf::from("dogs/moved.jpg"))]
        );
        assert_eq!(results.removed, paths(&["gone.png"]));

        // Missing entries are only reported
        assert_eq!(library.all_filenames().len(), 4);
        assert_eq!(library.name(Path::new("fresh-catch.gif")), Some("Fresh Catch".to_string()));
        assert_eq!(strings(&library.tags(Path::new("dogs/moved.jpg"))), vec!["dog"]);

        let results = library.detect_library_changes(true);
        assert!(results.added.is_empty() && results.moved.is_empty());
        assert_eq!(results.removed, paths(&["gone.png"]));
        assert_eq!(library.all_filenames().len(), 3);

        assert!(library.detect_library_changes(true).is_empty());
    }

    #[test]
    #[cfg(unix)]
    fn test_detect_skips_symlinked_directories() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("pics")).unwrap();
        fs::write(root.join("pics").join("a.png"), b"x").unwrap();
        // Directory cycle back to the library root
        std::os::unix::fs::symlink(root, root.join("pics").join("loop")).unwrap();

        let mut library = ImageLibrary::from_state(ImageLibraryState {
            library_root: root.to_path_buf(),
            images: Vec::new(),
        });

        let results = library.detect_library_changes(false);
        assert_eq!(results.added, paths(&["pics/a.png"]));
        assert_eq!(library.all_filenames().len(), 1);
    }

    #[test]
    fn test_detect_without_root_is_noop() {
        let mut library = test_library();
        library.remove_library_root();
        assert!(library.detect_library_changes(true).is_empty());
        assert_eq!(library.all_filenames().len(), 4);
    }

    #[test]
    fn test_save_library_uses_persistence() {
        let persistence = Rc::new(MemoryPersistence::default());
        let mut library = ImageLibrary::new(persistence.clone());
        library.add_image("/abs/a.png", "A", &[]);
        library.save_library();

        assert_eq!(persistence.library_saves.get(), 1);
        assert_eq!(persistence.library.borrow().images.len(), 1);

        library.clear_library();
        assert!(library.all_filenames().is_empty());
    }
}
