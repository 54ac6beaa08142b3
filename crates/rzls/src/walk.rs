use camino::Utf8Path;
use camino::Utf8PathBuf;
use ignore::WalkBuilder;

/// Extensions of the documents `rzls` understands.
const DOCUMENT_EXTENSIONS: [&str; 2] = ["razor", "cshtml"];

pub fn is_document(path: &Utf8Path) -> bool {
    path.extension()
        .is_some_and(|extension| DOCUMENT_EXTENSIONS.contains(&extension))
}

/// Walk the given paths and collect the Razor documents among them.
///
/// Files named explicitly are kept whatever their extension; directories
/// are walked recursively with `.gitignore` rules respected and hidden
/// entries skipped.
///
/// Returns a sorted, deduplicated list of absolute paths.
pub fn walk_documents(paths: &[Utf8PathBuf]) -> Vec<Utf8PathBuf> {
    let mut files = Vec::new();

    for path in paths {
        if path.is_file() {
            files.push(dunce_utf8(path).unwrap_or_else(|_| path.clone()));
            continue;
        }

        if !path.is_dir() {
            tracing::warn!(%path, "Skipping path that does not exist");
            continue;
        }

        let walker = WalkBuilder::new(path.as_std_path())
            .standard_filters(true)
            .hidden(true)
            .build();

        for entry in walker.filter_map(Result::ok) {
            if !entry.file_type().is_some_and(|ft| ft.is_file()) {
                continue;
            }
            let Some(utf8) = Utf8Path::from_path(entry.path()) else {
                continue;
            };
            if is_document(utf8) {
                files.push(dunce_utf8(utf8).unwrap_or_else(|_| utf8.to_owned()));
            }
        }
    }

    files.sort();
    files.dedup();
    files
}

fn dunce_utf8(path: &Utf8Path) -> std::io::Result<Utf8PathBuf> {
    let canonical = dunce::canonicalize(path.as_std_path())?;
    Utf8PathBuf::from_path_buf(canonical)
        .map_err(|_| std::io::Error::new(std::io::ErrorKind::InvalidData, "non-UTF-8 path"))
}
