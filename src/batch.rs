use crate::catalog::AssetCatalog;
use crate::codec::ImageCodec;
use crate::constants::{IMAGE_EXTENSION, PROGRESS_BAR_TEMPLATE};
use crate::emitter::write_manifest;
use crate::error::{ResizerError, Result};
use crate::naming::{clean_name, detect_density, file_name_of, Density};
use crate::planner::{plan, SourceDensity};
use crate::processing::{resize_file_at_path, ResizeOptions};
use crate::{error, info, verbose};
use indicatif::{ProgressBar, ProgressStyle};
use std::collections::BTreeMap;
use std::ffi::OsStr;
use std::fs::File;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Outcome of a directory run. Failures are collected, never fatal.
#[derive(Debug, Default)]
pub struct BatchReport {
    /// Sources selected for processing.
    pub sources: usize,
    /// Sources whose three variants were all written.
    pub processed: usize,
    pub variants: usize,
    pub manifests: usize,
    pub failures: Vec<ResizerError>,
}

impl BatchReport {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    /// `Err(ResizerError::Batch)` when anything failed.
    pub fn into_result(self) -> Result<Self> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(ResizerError::Batch {
                failed: self.failures.len(),
                total: self.sources,
            })
        }
    }

    fn record_failure(&mut self, err: ResizerError) {
        error!("{}", err);
        self.failures.push(err);
    }
}

pub fn is_image_file(path: &Path) -> bool {
    path.extension()
        .and_then(|s| s.to_str())
        .map(|ext| ext.eq_ignore_ascii_case(IMAGE_EXTENSION))
        .unwrap_or(false)
}

fn is_hidden(name: &OsStr) -> bool {
    name.to_string_lossy().starts_with('.')
}

/// Collects qualifying image files under `root`, sorted by file name.
///
/// Hidden entries below the root are skipped. Entries that cannot be read are
/// returned as errors alongside the files that could.
pub fn collect_image_files(root: &Path, recursive: bool) -> (Vec<PathBuf>, Vec<ResizerError>) {
    let mut image_files = Vec::new();
    let mut errors = Vec::new();

    let walker = if recursive {
        WalkDir::new(root)
    } else {
        WalkDir::new(root).max_depth(1)
    };

    let entries = walker
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| {
            let hidden = e.depth() > 0 && is_hidden(e.file_name());
            if hidden {
                verbose!("Skipping hidden {}", e.path().display());
            }
            !hidden
        });

    for entry in entries {
        match entry {
            Ok(entry) => {
                let path = entry.path();
                if path.is_file() && is_image_file(path) {
                    image_files.push(path.to_path_buf());
                }
            }
            Err(source) => errors.push(ResizerError::DirectoryRead {
                path: source
                    .path()
                    .map(Path::to_path_buf)
                    .unwrap_or_else(|| root.to_path_buf()),
                source,
            }),
        }
    }

    (image_files, errors)
}

fn density_rank(density: Density) -> u8 {
    match density {
        Density::X3 => 2,
        Density::X2 => 1,
        Density::Unmarked => 0,
    }
}

/// File name of `path` as text, for name parsing only.
fn name_of(path: &Path) -> String {
    file_name_of(&path.to_string_lossy()).to_string()
}

fn density_of(path: &Path) -> Density {
    detect_density(&name_of(path))
}

fn read_dimensions<C: ImageCodec + ?Sized>(codec: &C, path: &Path) -> Option<(u32, u32)> {
    let mut file = File::open(path).ok()?;
    codec.dimensions(&mut file).ok()
}

/// True when `triple` has exactly the size a run over `double` writes for
/// its @3x variant.
fn is_upscale_of<C: ImageCodec + ?Sized>(codec: &C, triple: &Path, double: &Path) -> bool {
    let (Some(triple_size), Some((width, height))) =
        (read_dimensions(codec, triple), read_dimensions(codec, double))
    else {
        return false;
    };
    plan(SourceDensity::Double, width, height)
        .map(|plan| {
            let upscale = &plan.variants()[0];
            (upscale.width, upscale.height) == triple_size
        })
        .unwrap_or(false)
}

/// Picks the source among files sharing one base name, given in name order.
fn pick_source<C: ImageCodec + ?Sized>(codec: &C, candidates: Vec<PathBuf>) -> Option<PathBuf> {
    let mut densest: Option<&PathBuf> = None;
    for path in &candidates {
        let denser = densest.map_or(true, |kept| {
            density_rank(density_of(path)) > density_rank(density_of(kept))
        });
        if denser {
            densest = Some(path);
        }
    }
    let densest = densest?;

    let double = candidates.iter().find(|path| density_of(path) == Density::X2);
    let chosen = match double {
        Some(double)
            if density_of(densest) == Density::X3 && is_upscale_of(codec, densest, double) =>
        {
            verbose!("{} was generated from {}", densest.display(), double.display());
            double
        }
        _ => densest,
    };

    for path in candidates.iter().filter(|path| *path != chosen) {
        verbose!("Skipping {} in favour of {}", path.display(), chosen.display());
    }
    Some(chosen.clone())
}

/// Groups `files` by containing directory and keeps one source per base name.
///
/// Files sharing a base name in one directory would write the same outputs,
/// so only the densest (`@3x`, then `@2x`, then unmarked) is kept. On a tie
/// the first file in name order wins. An `@3x` that is exactly the upscale
/// of the `@2x` next to it came from an earlier run, so the `@2x` is kept.
pub fn select_sources<C: ImageCodec + ?Sized>(
    codec: &C,
    files: Vec<PathBuf>,
) -> BTreeMap<PathBuf, Vec<PathBuf>> {
    let mut groups: BTreeMap<PathBuf, BTreeMap<String, Vec<PathBuf>>> = BTreeMap::new();

    for path in files {
        let dir = path.parent().map(Path::to_path_buf).unwrap_or_default();
        let base = clean_name(&name_of(&path));
        groups
            .entry(dir)
            .or_default()
            .entry(base)
            .or_default()
            .push(path);
    }

    groups
        .into_iter()
        .map(|(dir, bases)| {
            let mut sources: Vec<_> = bases
                .into_values()
                .filter_map(|candidates| pick_source(codec, candidates))
                .collect();
            sources.sort();
            (dir, sources)
        })
        .collect()
}

fn create_progress_bar(len: usize) -> ProgressBar {
    if crate::logger::is_quiet() {
        return ProgressBar::hidden();
    }
    let pb = ProgressBar::new(len as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template(PROGRESS_BAR_TEMPLATE)
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );
    pb
}

/// Resizes every selected PNG under `root` and writes one manifest per
/// directory.
///
/// Processing continues past failures; each is printed as it happens and
/// collected in the returned report.
pub fn scan_dir<C: ImageCodec + ?Sized>(
    codec: &C,
    root: &Path,
    options: &ResizeOptions,
) -> BatchReport {
    info!("🚀 Scanning directory: {}", root.display());

    let mut report = BatchReport::default();
    let (image_files, walk_errors) = collect_image_files(root, options.recursive);
    for err in walk_errors {
        report.record_failure(err);
    }

    let groups = select_sources(codec, image_files);
    report.sources = groups.values().map(Vec::len).sum();
    if report.sources == 0 {
        crate::warn!("No PNG files found in {}", root.display());
        return report;
    }
    info!("📊 Found {} source files", report.sources);

    let progress = create_progress_bar(report.sources);

    for (dir, sources) in &groups {
        let mut catalog = AssetCatalog::new();

        for source in sources {
            match resize_file_at_path(codec, source, options) {
                Ok(assets) => {
                    report.processed += 1;
                    report.variants += assets.len();
                    catalog.extend(assets);
                }
                Err(err) => report.record_failure(err),
            }
            progress.inc(1);
        }

        if options.emit_manifest && !catalog.is_empty() {
            match write_manifest(&catalog, dir) {
                Ok(_) => report.manifests += 1,
                Err(err) => report.record_failure(err),
            }
        }
    }

    progress.finish_and_clear();
    info!(
        "\n📊 Processed {} of {} files, wrote {} variants and {} manifests",
        report.processed, report.sources, report.variants, report.manifests
    );

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::tests::FakeCodec;
    use crate::planner::UnmarkedPolicy;
    use std::fs;
    use tempfile::TempDir;

    fn write_fake(dir: &Path, name: &str, width: u32, height: u32) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, FakeCodec::contents(width, height)).unwrap();
        path
    }

    fn read_catalog(dir: &Path) -> AssetCatalog {
        serde_json::from_str(&fs::read_to_string(dir.join("Contents.json")).unwrap()).unwrap()
    }

    #[test]
    fn test_is_image_file() {
        assert!(is_image_file(Path::new("logo.png")));
        assert!(is_image_file(Path::new("icon@3x.PNG")));
        assert!(is_image_file(Path::new("icon@3x.PnG")));
        assert!(!is_image_file(Path::new("photo.jpg")));
        assert!(!is_image_file(Path::new("notes.txt")));
        assert!(!is_image_file(Path::new("png")));
        assert!(!is_image_file(Path::new(".png")));
    }

    #[test]
    fn test_collect_image_files_recursive() {
        let temp_dir = TempDir::new().unwrap();
        let subdir = temp_dir.path().join("subdir");
        fs::create_dir(&subdir).unwrap();
        fs::write(temp_dir.path().join("b@3x.png"), "").unwrap();
        fs::write(temp_dir.path().join("a@2x.PNG"), "").unwrap();
        fs::write(temp_dir.path().join("notes.txt"), "").unwrap();
        fs::write(subdir.join("nested.png"), "").unwrap();

        let (files, errors) = collect_image_files(temp_dir.path(), true);
        assert!(errors.is_empty());
        assert_eq!(
            files,
            vec![
                temp_dir.path().join("a@2x.PNG"),
                temp_dir.path().join("b@3x.png"),
                subdir.join("nested.png"),
            ]
        );
    }

    #[test]
    fn test_collect_image_files_non_recursive() {
        let temp_dir = TempDir::new().unwrap();
        let subdir = temp_dir.path().join("subdir");
        fs::create_dir(&subdir).unwrap();
        fs::write(temp_dir.path().join("top.png"), "").unwrap();
        fs::write(subdir.join("nested.png"), "").unwrap();

        let (files, _) = collect_image_files(temp_dir.path(), false);
        assert_eq!(files, vec![temp_dir.path().join("top.png")]);
    }

    #[test]
    fn test_collect_image_files_skips_hidden() {
        let temp_dir = TempDir::new().unwrap();
        let hidden = temp_dir.path().join(".cache");
        fs::create_dir(&hidden).unwrap();
        fs::write(hidden.join("cached.png"), "").unwrap();
        fs::write(temp_dir.path().join(".hidden@3x.png"), "").unwrap();

        let (files, _) = collect_image_files(temp_dir.path(), true);
        assert!(files.is_empty());
    }

    #[test]
    fn test_collect_image_files_missing_root() {
        let temp_dir = TempDir::new().unwrap();
        let (files, errors) = collect_image_files(&temp_dir.path().join("gone"), true);
        assert!(files.is_empty());
        assert_eq!(errors.len(), 1);
        assert!(errors[0].to_string().starts_with("Directory Reading Error: "));
    }

    #[test]
    fn test_select_sources_prefers_densest() {
        let files = vec![
            PathBuf::from("icons/logo.png"),
            PathBuf::from("icons/logo@2x.png"),
            PathBuf::from("icons/logo@3x.png"),
            PathBuf::from("icons/photo@2x.png"),
            PathBuf::from("other/logo.png"),
        ];

        let groups = select_sources(&FakeCodec::new(), files);

        assert_eq!(groups.len(), 2);
        assert_eq!(
            groups[Path::new("icons")],
            vec![
                PathBuf::from("icons/logo@3x.png"),
                PathBuf::from("icons/photo@2x.png"),
            ]
        );
        assert_eq!(groups[Path::new("other")], vec![PathBuf::from("other/logo.png")]);
    }

    #[test]
    fn test_select_sources_tie_keeps_first() {
        let files = vec![
            PathBuf::from("d/icon@3x.PNG"),
            PathBuf::from("d/icon@3x.png"),
        ];
        let groups = select_sources(&FakeCodec::new(), files);
        assert_eq!(groups[Path::new("d")], vec![PathBuf::from("d/icon@3x.PNG")]);
    }

    #[test]
    fn test_select_sources_keeps_double_over_its_upscale() {
        let temp_dir = TempDir::new().unwrap();
        let double = write_fake(temp_dir.path(), "photo@2x.png", 200, 100);
        write_fake(temp_dir.path(), "photo@3x.png", 300, 150);
        write_fake(temp_dir.path(), "photo.png", 100, 50);

        let files = vec![
            temp_dir.path().join("photo.png"),
            double.clone(),
            temp_dir.path().join("photo@3x.png"),
        ];
        let groups = select_sources(&FakeCodec::new(), files);

        assert_eq!(groups[temp_dir.path()], vec![double]);
    }

    #[test]
    fn test_select_sources_keeps_distinct_triple() {
        let temp_dir = TempDir::new().unwrap();
        write_fake(temp_dir.path(), "photo@2x.png", 200, 100);
        let triple = write_fake(temp_dir.path(), "photo@3x.png", 310, 155);

        let files = vec![temp_dir.path().join("photo@2x.png"), triple.clone()];
        let groups = select_sources(&FakeCodec::new(), files);

        assert_eq!(groups[temp_dir.path()], vec![triple]);
    }

    #[test]
    fn test_scan_dir_writes_variants_and_manifest() {
        let temp_dir = TempDir::new().unwrap();
        write_fake(temp_dir.path(), "logo@3x.png", 300, 300);

        let report = scan_dir(&FakeCodec::new(), temp_dir.path(), &ResizeOptions::default());

        assert!(report.is_success());
        assert_eq!((report.sources, report.processed), (1, 1));
        assert_eq!(report.variants, 3);
        assert_eq!(report.manifests, 1);

        let read = |name: &str| fs::read_to_string(temp_dir.path().join(name)).unwrap();
        assert_eq!(read("logo@3x.png"), FakeCodec::contents(300, 300));
        assert_eq!(read("logo@2x.png"), FakeCodec::contents(198, 198));
        assert_eq!(read("logo.png"), FakeCodec::contents(99, 99));

        let catalog = read_catalog(temp_dir.path());
        let scales: Vec<_> = catalog.images.iter().map(|i| i.scale.as_str()).collect();
        assert_eq!(scales, vec!["3x", "2x", "1x"]);
    }

    #[test]
    fn test_scan_dir_manifest_per_directory() {
        let temp_dir = TempDir::new().unwrap();
        let subdir = temp_dir.path().join("nested");
        fs::create_dir(&subdir).unwrap();
        write_fake(temp_dir.path(), "a@2x.png", 20, 20);
        write_fake(temp_dir.path(), "b@3x.png", 30, 30);
        write_fake(&subdir, "c@3x.png", 30, 30);

        let report = scan_dir(&FakeCodec::new(), temp_dir.path(), &ResizeOptions::default());

        assert!(report.is_success());
        assert_eq!(report.manifests, 2);
        assert_eq!(read_catalog(temp_dir.path()).images.len(), 6);
        let nested = read_catalog(&subdir);
        let names: Vec<_> = nested.images.iter().map(|i| i.filename.as_str()).collect();
        assert_eq!(names, vec!["c@3x.png", "c@2x.png", "c.png"]);
    }

    #[test]
    fn test_scan_dir_continues_after_failure() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("broken@3x.png"), b"").unwrap();
        write_fake(temp_dir.path(), "good@3x.png", 30, 30);

        let report = scan_dir(&FakeCodec::new(), temp_dir.path(), &ResizeOptions::default());

        assert_eq!(report.sources, 2);
        assert_eq!(report.processed, 1);
        assert_eq!(report.failures.len(), 1);
        assert!(matches!(report.failures[0], ResizerError::Decode { .. }));
        assert!(temp_dir.path().join("good.png").exists());

        let catalog = read_catalog(temp_dir.path());
        assert!(catalog.images.iter().all(|i| i.filename.starts_with("good")));

        let err = report.into_result().unwrap_err();
        assert_eq!(err.to_string(), "1 failures while processing 2 source files");
    }

    #[test]
    fn test_scan_dir_without_manifest_or_recursion() {
        let temp_dir = TempDir::new().unwrap();
        let subdir = temp_dir.path().join("nested");
        fs::create_dir(&subdir).unwrap();
        write_fake(temp_dir.path(), "a@3x.png", 30, 30);
        write_fake(&subdir, "b@3x.png", 30, 30);

        let options = ResizeOptions::new(false, false, UnmarkedPolicy::AssumeTriple);
        let report = scan_dir(&FakeCodec::new(), temp_dir.path(), &options);

        assert_eq!(report.sources, 1);
        assert_eq!(report.manifests, 0);
        assert!(!temp_dir.path().join("Contents.json").exists());
        assert!(!subdir.join("b.png").exists());
    }

    #[test]
    fn test_scan_dir_rerun_is_stable() {
        let temp_dir = TempDir::new().unwrap();
        write_fake(temp_dir.path(), "logo@3x.png", 300, 300);
        let codec = FakeCodec::new();

        scan_dir(&codec, temp_dir.path(), &ResizeOptions::default());
        let report = scan_dir(&codec, temp_dir.path(), &ResizeOptions::default());

        assert_eq!(report.sources, 1);
        let read = |name: &str| fs::read_to_string(temp_dir.path().join(name)).unwrap();
        assert_eq!(read("logo@3x.png"), FakeCodec::contents(300, 300));
        assert_eq!(read("logo@2x.png"), FakeCodec::contents(198, 198));
        assert_eq!(read("logo.png"), FakeCodec::contents(99, 99));
    }

    #[test]
    fn test_scan_dir_rerun_keeps_double_source() {
        let temp_dir = TempDir::new().unwrap();
        write_fake(temp_dir.path(), "photo@2x.png", 200, 200);
        let codec = FakeCodec::new();
        let read = |name: &str| fs::read_to_string(temp_dir.path().join(name)).unwrap();

        for _ in 0..3 {
            let report = scan_dir(&codec, temp_dir.path(), &ResizeOptions::default());
            assert!(report.is_success());
            assert_eq!(report.sources, 1);

            assert_eq!(read("photo@3x.png"), FakeCodec::contents(300, 300));
            assert_eq!(read("photo@2x.png"), FakeCodec::contents(200, 200));
            assert_eq!(read("photo.png"), FakeCodec::contents(100, 100));
            assert_eq!(read_catalog(temp_dir.path()).images.len(), 3);
        }
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_scan_dir_non_utf8_directory() {
        use std::os::unix::ffi::OsStrExt;

        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path().join(OsStr::from_bytes(b"d\xff"));
        fs::create_dir(&dir).unwrap();
        write_fake(&dir, "logo@3x.png", 30, 30);

        let report = scan_dir(&FakeCodec::new(), temp_dir.path(), &ResizeOptions::default());

        assert!(report.is_success(), "{:?}", report.failures);
        assert_eq!(report.manifests, 1);
        assert!(dir.join("Contents.json").exists());
        assert_eq!(
            fs::read_to_string(dir.join("logo@2x.png")).unwrap(),
            FakeCodec::contents(19, 19)
        );
        assert!(dir.join("logo.png").exists());

        let names: Vec<_> = read_catalog(&dir)
            .images
            .into_iter()
            .map(|i| i.filename)
            .collect();
        assert_eq!(names, vec!["logo@3x.png", "logo@2x.png", "logo.png"]);
    }

    #[test]
    fn test_scan_dir_all_failed_leaves_previous_manifest() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("Contents.json"), "previous").unwrap();
        fs::write(temp_dir.path().join("broken@3x.png"), b"").unwrap();

        let report = scan_dir(&FakeCodec::new(), temp_dir.path(), &ResizeOptions::default());

        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.manifests, 0);
        assert_eq!(
            fs::read_to_string(temp_dir.path().join("Contents.json")).unwrap(),
            "previous"
        );
    }

    #[test]
    fn test_scan_dir_empty_directory() {
        let temp_dir = TempDir::new().unwrap();
        let report = scan_dir(&FakeCodec::new(), temp_dir.path(), &ResizeOptions::default());
        assert!(report.is_success());
        assert_eq!(report.sources, 0);
        assert!(report.into_result().is_ok());
    }
}
