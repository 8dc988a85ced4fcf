//! End-to-end install/remove tests against a mock package server.

use std::collections::VecDeque;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use bpm_core::io::place::Elevation;
use bpm_core::ops::{self, Context, InstallError, InstallOutcome, Layout, RemoveOutcome};
use bpm_core::{
    AssumeYes, Catalog, Confirm, InstalledRegistry, NoElevation, NullReporter, Placement,
    Reporter, Transport,
};
use bpm_schema::{Constraint, InstalledEntry, PackageName, PackageRecord, Version};
use mockito::{Mock, Server, ServerGuard};
use tempfile::TempDir;

struct TestEnv {
    _dir: TempDir,
    bin_dir: PathBuf,
    tmp_dir: PathBuf,
    registry_path: PathBuf,
}

impl TestEnv {
    fn new() -> Self {
        let dir = TempDir::new().expect("failed to create temp dir");
        let bin_dir = dir.path().join("bin");
        std::fs::create_dir_all(&bin_dir).unwrap();
        Self {
            tmp_dir: dir.path().join("home").join("tmp"),
            registry_path: dir.path().join("home").join("installed.json"),
            bin_dir,
            _dir: dir,
        }
    }

    fn layout(&self, server: &ServerGuard) -> Layout {
        Layout {
            bin_base: format!("{}/bin", server.url()),
            bin_dir: self.bin_dir.clone(),
            tmp_dir: self.tmp_dir.clone(),
        }
    }

    fn registry(&self) -> InstalledRegistry {
        InstalledRegistry::load(&self.registry_path)
    }

    fn seed_registry(&self, entries: &[(&str, &str)]) {
        let mut reg = self.registry();
        reg.update(|r| {
            for (name, version) in entries {
                r.upsert(entry(name, version));
            }
        })
        .unwrap();
    }
}

fn entry(name: &str, version: &str) -> InstalledEntry {
    InstalledEntry::new(PackageName::new(name), Version::new(version))
}

async fn artifact(server: &mut ServerGuard, name: &str, version: &str, body: &str) -> Mock {
    server
        .mock("GET", format!("/bin/{name}/{version}/{name}").as_str())
        .with_status(200)
        .with_body(body)
        .expect(1)
        .create_async()
        .await
}

/// Answers prompts from a script, recording every question.
#[derive(Default)]
struct Scripted {
    answers: Mutex<VecDeque<bool>>,
    asked: Mutex<Vec<String>>,
}

impl Scripted {
    fn new(answers: &[bool]) -> Self {
        Self {
            answers: Mutex::new(answers.iter().copied().collect()),
            asked: Mutex::default(),
        }
    }
}

impl Confirm for Scripted {
    fn confirm(&self, prompt: &str) -> bool {
        self.asked.lock().unwrap().push(prompt.to_string());
        self.answers.lock().unwrap().pop_front().unwrap_or(true)
    }
}

/// Keeps warnings and errors, drops everything else.
#[derive(Default)]
struct Recorder {
    warnings: Mutex<Vec<String>>,
    errors: Mutex<Vec<String>>,
}

impl Reporter for Recorder {
    fn downloading(&self, _: &PackageName, _: &Version, _: u64, _: Option<u64>) {}
    fn installing(&self, _: &PackageName, _: &Version) {}
    fn removing(&self, _: &PackageName) {}
    fn done(&self, _: &PackageName, _: &Version, _: &str) {}
    fn failed(&self, _: &PackageName, _: &Version, _: &str) {}
    fn info(&self, _: &str) {}
    fn success(&self, _: &str) {}
    fn warning(&self, msg: &str) {
        self.warnings.lock().unwrap().push(msg.to_string());
    }
    fn error(&self, msg: &str) {
        self.errors.lock().unwrap().push(msg.to_string());
    }
}

/// Performs the privileged copy itself, creating missing directories.
#[derive(Default)]
struct FakeElevation {
    copies: Mutex<Vec<PathBuf>>,
}

impl Elevation for FakeElevation {
    fn copy(&self, src: &Path, dest: &Path) -> io::Result<()> {
        self.copies.lock().unwrap().push(dest.to_path_buf());
        std::fs::create_dir_all(dest.parent().unwrap())?;
        std::fs::copy(src, dest).map(|_| ())
    }

    fn remove(&self, path: &Path) -> io::Result<()> {
        std::fs::remove_file(path)
    }
}

#[tokio::test]
async fn test_install_records_dependency_first() {
    let env = TestEnv::new();
    let mut server = Server::new_async().await;
    let dep = artifact(&mut server, "libb", "latest", "libb-binary").await;
    let main = artifact(&mut server, "toola", "latest", "toola-binary").await;

    let catalog = Catalog::from_records(vec![
        PackageRecord::new("toola", "1.0.0", &["libb"]),
        PackageRecord::new("libb", "0.3.0", &[]),
    ]);
    let transport = Transport::new().unwrap();
    let layout = env.layout(&server);
    let ctx = Context {
        transport: &transport,
        layout: &layout,
        confirm: &AssumeYes,
        elevation: &NoElevation,
        reporter: &NullReporter,
    };

    let mut registry = env.registry();
    let outcome = ops::install(&ctx, &catalog, &mut registry, "toola", &Constraint::Latest)
        .await
        .unwrap();

    assert!(matches!(
        outcome,
        InstallOutcome::Installed {
            placement: Placement::Direct,
            updated: false,
            ..
        }
    ));
    dep.assert_async().await;
    main.assert_async().await;

    assert_eq!(
        env.registry().entries(),
        &[entry("libb", "latest"), entry("toola", "latest")]
    );
    assert_eq!(
        std::fs::read_to_string(env.bin_dir.join("toola")).unwrap(),
        "toola-binary"
    );
    assert!(env.bin_dir.join("libb").exists());
}

#[tokio::test]
async fn test_installed_dependency_is_skipped() {
    let env = TestEnv::new();
    env.seed_registry(&[("libb", "0.1")]);
    let mut server = Server::new_async().await;
    let dep = server
        .mock("GET", "/bin/libb/latest/libb")
        .expect(0)
        .create_async()
        .await;
    let _main = artifact(&mut server, "toola", "latest", "x").await;

    let catalog = Catalog::from_records(vec![PackageRecord::new("toola", "1", &["libb"])]);
    let transport = Transport::new().unwrap();
    let layout = env.layout(&server);
    let ctx = Context {
        transport: &transport,
        layout: &layout,
        confirm: &AssumeYes,
        elevation: &NoElevation,
        reporter: &NullReporter,
    };

    let mut registry = env.registry();
    ops::install(&ctx, &catalog, &mut registry, "toola", &Constraint::Latest)
        .await
        .unwrap();

    dep.assert_async().await;
    assert_eq!(registry.get("libb").unwrap().version, "0.1");
}

#[tokio::test]
async fn test_reinstall_updates_entry_in_place() {
    let env = TestEnv::new();
    env.seed_registry(&[("first", "1"), ("tool", "1.0"), ("last", "1")]);
    let mut server = Server::new_async().await;
    let _m = artifact(&mut server, "tool", "2.0", "v2").await;

    let catalog = Catalog::from_records(vec![
        PackageRecord::new("tool", "1.0", &[]),
        PackageRecord::new("tool", "2.0", &[]),
    ]);
    let transport = Transport::new().unwrap();
    let layout = env.layout(&server);
    let ctx = Context {
        transport: &transport,
        layout: &layout,
        confirm: &AssumeYes,
        elevation: &NoElevation,
        reporter: &NullReporter,
    };

    let mut registry = env.registry();
    let outcome = ops::install(
        &ctx,
        &catalog,
        &mut registry,
        "tool",
        &Constraint::parse(">1.0"),
    )
    .await
    .unwrap();

    assert!(matches!(
        outcome,
        InstallOutcome::Installed { updated: true, ref version, .. } if version == "2.0"
    ));
    let names: Vec<_> = env
        .registry()
        .entries()
        .iter()
        .map(|e| e.name.to_string())
        .collect();
    assert_eq!(names, vec!["first", "tool", "last"]);
    assert_eq!(env.registry().get("tool").unwrap().version, "2.0");
}

#[tokio::test]
async fn test_failed_download_leaves_registry_untouched() {
    let env = TestEnv::new();
    env.seed_registry(&[("existing", "3.1")]);
    let before = std::fs::read(&env.registry_path).unwrap();

    let mut server = Server::new_async().await;
    let _m = server
        .mock("GET", "/bin/tool/latest/tool")
        .with_status(404)
        .create_async()
        .await;

    let catalog = Catalog::from_records(Vec::new());
    let transport = Transport::new().unwrap();
    let layout = env.layout(&server);
    let ctx = Context {
        transport: &transport,
        layout: &layout,
        confirm: &AssumeYes,
        elevation: &NoElevation,
        reporter: &NullReporter,
    };

    let mut registry = env.registry();
    let err = ops::install(&ctx, &catalog, &mut registry, "tool", &Constraint::Latest)
        .await
        .unwrap_err();

    assert!(matches!(err, InstallError::DownloadFailed { .. }));
    assert_eq!(std::fs::read(&env.registry_path).unwrap(), before);
    assert_eq!(registry.len(), 1);
    assert!(!env.bin_dir.join("tool").exists());
    let leftovers = std::fs::read_dir(&env.tmp_dir).unwrap().count();
    assert_eq!(leftovers, 0);
}

#[tokio::test]
async fn test_failed_dependency_aborts_parent() {
    let env = TestEnv::new();
    let mut server = Server::new_async().await;
    let _dep = server
        .mock("GET", "/bin/libb/latest/libb")
        .with_status(500)
        .create_async()
        .await;
    let parent = server
        .mock("GET", "/bin/toola/latest/toola")
        .expect(0)
        .create_async()
        .await;

    let catalog = Catalog::from_records(vec![PackageRecord::new("toola", "1", &["libb"])]);
    let transport = Transport::new().unwrap();
    let layout = env.layout(&server);
    let ctx = Context {
        transport: &transport,
        layout: &layout,
        confirm: &AssumeYes,
        elevation: &NoElevation,
        reporter: &NullReporter,
    };

    let mut registry = env.registry();
    let err = ops::install(&ctx, &catalog, &mut registry, "toola", &Constraint::Latest)
        .await
        .unwrap_err();

    match err {
        InstallError::DependencyFailed {
            package,
            dependency,
            source,
        } => {
            assert_eq!(package, "toola");
            assert_eq!(dependency, "libb");
            assert!(matches!(*source, InstallError::DownloadFailed { .. }));
        }
        other => panic!("unexpected error: {other}"),
    }
    parent.assert_async().await;
    assert!(registry.is_empty());
}

#[tokio::test]
async fn test_dependency_cycle_is_detected() {
    let env = TestEnv::new();
    let server = Server::new_async().await;

    let catalog = Catalog::from_records(vec![
        PackageRecord::new("a", "1", &["b"]),
        PackageRecord::new("b", "1", &["a"]),
    ]);
    let transport = Transport::new().unwrap();
    let layout = env.layout(&server);
    let ctx = Context {
        transport: &transport,
        layout: &layout,
        confirm: &AssumeYes,
        elevation: &NoElevation,
        reporter: &NullReporter,
    };

    let mut registry = env.registry();
    let err = ops::install(&ctx, &catalog, &mut registry, "a", &Constraint::Latest)
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "Dependency cycle: a -> b -> a");
    assert!(registry.is_empty());
}

#[tokio::test]
async fn test_declined_dependency_stops_install() {
    let env = TestEnv::new();
    let server = Server::new_async().await;

    let catalog = Catalog::from_records(vec![PackageRecord::new("toola", "1", &["libb"])]);
    let transport = Transport::new().unwrap();
    let layout = env.layout(&server);
    let confirm = Scripted::new(&[false]);
    let ctx = Context {
        transport: &transport,
        layout: &layout,
        confirm: &confirm,
        elevation: &NoElevation,
        reporter: &NullReporter,
    };

    let mut registry = env.registry();
    let err = ops::install(&ctx, &catalog, &mut registry, "toola", &Constraint::Latest)
        .await
        .unwrap_err();

    assert!(matches!(err, InstallError::DependencyDeclined { .. }));
    assert_eq!(confirm.asked.lock().unwrap().len(), 1);
    assert!(!env.registry_path.exists());
}

#[tokio::test]
async fn test_declined_install_is_cancelled() {
    let env = TestEnv::new();
    let mut server = Server::new_async().await;
    let m = server
        .mock("GET", "/bin/tool/latest/tool")
        .expect(0)
        .create_async()
        .await;

    let transport = Transport::new().unwrap();
    let layout = env.layout(&server);
    let confirm = Scripted::new(&[false]);
    let ctx = Context {
        transport: &transport,
        layout: &layout,
        confirm: &confirm,
        elevation: &NoElevation,
        reporter: &NullReporter,
    };

    let mut registry = env.registry();
    let outcome = ops::install(
        &ctx,
        &Catalog::default(),
        &mut registry,
        "tool",
        &Constraint::Latest,
    )
    .await
    .unwrap();

    assert_eq!(outcome, InstallOutcome::Cancelled);
    m.assert_async().await;
    assert!(registry.is_empty());
}

#[tokio::test]
async fn test_elevated_placement_fallback() {
    let env = TestEnv::new();
    let mut server = Server::new_async().await;
    let _m = artifact(&mut server, "tool", "latest", "payload").await;

    let transport = Transport::new().unwrap();
    let mut layout = env.layout(&server);
    layout.bin_dir = env.bin_dir.join("protected");
    let elevation = FakeElevation::default();
    let ctx = Context {
        transport: &transport,
        layout: &layout,
        confirm: &AssumeYes,
        elevation: &elevation,
        reporter: &NullReporter,
    };

    let mut registry = env.registry();
    let outcome = ops::install(
        &ctx,
        &Catalog::default(),
        &mut registry,
        "tool",
        &Constraint::Latest,
    )
    .await
    .unwrap();

    assert!(matches!(
        outcome,
        InstallOutcome::Installed {
            placement: Placement::Elevated,
            ..
        }
    ));
    assert_eq!(
        *elevation.copies.lock().unwrap(),
        vec![layout.bin_dir.join("tool")]
    );
    assert!(env.registry().contains("tool"));
}

#[tokio::test]
async fn test_failed_placement_leaves_registry_untouched() {
    let env = TestEnv::new();
    let mut server = Server::new_async().await;
    let _m = artifact(&mut server, "tool", "latest", "payload").await;

    let transport = Transport::new().unwrap();
    let mut layout = env.layout(&server);
    layout.bin_dir = env.bin_dir.join("protected");
    let ctx = Context {
        transport: &transport,
        layout: &layout,
        confirm: &AssumeYes,
        elevation: &NoElevation,
        reporter: &NullReporter,
    };

    let mut registry = env.registry();
    let err = ops::install(
        &ctx,
        &Catalog::default(),
        &mut registry,
        "tool",
        &Constraint::Latest,
    )
    .await
    .unwrap_err();

    assert!(matches!(err, InstallError::InstallFailed { .. }));
    assert!(!env.registry_path.exists());
}

#[tokio::test]
async fn test_rejects_path_like_names() {
    let env = TestEnv::new();
    let server = Server::new_async().await;
    let transport = Transport::new().unwrap();
    let layout = env.layout(&server);
    let ctx = Context {
        transport: &transport,
        layout: &layout,
        confirm: &AssumeYes,
        elevation: &NoElevation,
        reporter: &NullReporter,
    };

    let mut registry = env.registry();
    let err = ops::install(
        &ctx,
        &Catalog::default(),
        &mut registry,
        "../etc/passwd",
        &Constraint::Latest,
    )
    .await
    .unwrap_err();
    assert!(matches!(err, InstallError::Name(_)));
}

#[tokio::test]
async fn test_remove_with_missing_binary_drops_entry() {
    let env = TestEnv::new();
    env.seed_registry(&[("ghost", "1.0"), ("kept", "2.0")]);
    let server = Server::new_async().await;
    let transport = Transport::new().unwrap();
    let layout = env.layout(&server);
    let recorder = Recorder::default();
    let ctx = Context {
        transport: &transport,
        layout: &layout,
        confirm: &AssumeYes,
        elevation: &NoElevation,
        reporter: &recorder,
    };

    let mut registry = env.registry();
    let outcome = ops::remove(&ctx, &mut registry, "ghost").unwrap();

    assert_eq!(
        outcome,
        RemoveOutcome::Removed {
            file_deleted: false,
            entry: Some(entry("ghost", "1.0")),
        }
    );
    assert_eq!(env.registry().entries(), &[entry("kept", "2.0")]);

    let warnings = recorder.warnings.lock().unwrap();
    assert_eq!(warnings.len(), 1);
    assert!(warnings[0].starts_with("File not found, nothing to delete: "));
    assert!(warnings[0].ends_with("ghost"));
    assert!(recorder.errors.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_remove_deletes_binary_and_entry() {
    let env = TestEnv::new();
    env.seed_registry(&[("tool", "1.0")]);
    std::fs::write(env.bin_dir.join("tool"), "bin").unwrap();
    let server = Server::new_async().await;
    let transport = Transport::new().unwrap();
    let layout = env.layout(&server);
    let ctx = Context {
        transport: &transport,
        layout: &layout,
        confirm: &AssumeYes,
        elevation: &NoElevation,
        reporter: &NullReporter,
    };

    let mut registry = env.registry();
    let outcome = ops::remove(&ctx, &mut registry, "tool").unwrap();

    assert!(matches!(
        outcome,
        RemoveOutcome::Removed {
            file_deleted: true,
            ..
        }
    ));
    assert!(!env.bin_dir.join("tool").exists());
    assert!(env.registry().is_empty());
}

#[tokio::test]
async fn test_remove_unknown_package_still_persists() {
    let env = TestEnv::new();
    let server = Server::new_async().await;
    let transport = Transport::new().unwrap();
    let layout = env.layout(&server);
    let ctx = Context {
        transport: &transport,
        layout: &layout,
        confirm: &AssumeYes,
        elevation: &NoElevation,
        reporter: &NullReporter,
    };

    let mut registry = env.registry();
    let outcome = ops::remove(&ctx, &mut registry, "nothing").unwrap();

    assert_eq!(outcome, RemoveOutcome::NothingToRemove);
    assert_eq!(std::fs::read_to_string(&env.registry_path).unwrap(), "[]");
}

#[tokio::test]
async fn test_catalog_tolerates_unreachable_source() {
    let mut server = Server::new_async().await;
    let _m = server
        .mock("GET", "/packages.json")
        .with_status(200)
        .with_body(r#"[{"name":"jq","version":"1.7","deps":[]}]"#)
        .create_async()
        .await;

    let sources = vec![
        "http://127.0.0.1:1/packages.json".to_string(),
        format!("{}/packages.json", server.url()),
    ];
    let transport = Transport::new().unwrap();
    let catalog = Catalog::fetch(&transport, &sources, &NullReporter).await;

    assert_eq!(catalog.records(), &[PackageRecord::new("jq", "1.7", &[])]);
    assert_eq!(catalog.failed_sources().len(), 1);
    assert_eq!(catalog.failed_sources()[0].url, sources[0]);
}
