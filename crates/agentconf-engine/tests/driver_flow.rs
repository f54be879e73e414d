//! End-to-end driver flows over local working trees

use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use agentconf_domain::{
    Artifact, ManifestStore, PackageConfiguration, PackageManifest, StoreError,
    VariableDeclaration, VariableType,
};
use agentconf_engine::{
    LocalManifestStore, PackageJob, PackageOutcome, RunConfig, SynthesisDriver,
};
use agentconf_providers::{AnalysisError, DeclarationAnalyzer};
use tempfile::TempDir;

/// Returns the same declarations for every artifact
struct FixedAnalyzer {
    declarations: Vec<VariableDeclaration>,
}

impl FixedAnalyzer {
    fn returning(declarations: Vec<VariableDeclaration>) -> Arc<Self> {
        Arc::new(Self { declarations })
    }

    fn empty() -> Arc<Self> {
        Self::returning(Vec::new())
    }
}

#[async_trait]
impl DeclarationAnalyzer for FixedAnalyzer {
    fn id(&self) -> &str {
        "fixed"
    }

    async fn extract(
        &self,
        _artifact: &Artifact,
        _known: Option<&PackageConfiguration>,
    ) -> Result<Vec<VariableDeclaration>, AnalysisError> {
        Ok(self.declarations.clone())
    }
}

/// Store whose writes always fail
struct ReadOnlyStore {
    inner: LocalManifestStore,
}

#[async_trait]
impl ManifestStore for ReadOnlyStore {
    async fn get_manifest(&self, package: &str) -> Result<Option<PackageManifest>, StoreError> {
        self.inner.get_manifest(package).await
    }

    async fn put_manifest(
        &self,
        _package: &str,
        _manifest: &PackageManifest,
        _message: &str,
    ) -> Result<(), StoreError> {
        Err(StoreError::Backend("write rejected".to_string()))
    }
}

fn api_key_decl() -> VariableDeclaration {
    VariableDeclaration {
        name: "API_KEY".to_string(),
        var_type: VariableType::String,
        description: "service API key".to_string(),
        required: Some(true),
        default_value: None,
    }
}

fn run_config() -> RunConfig {
    RunConfig {
        batch_delay: Duration::ZERO,
        ..RunConfig::default()
    }
}

fn write_package(root: &Path, manifest: Option<&str>) {
    fs::create_dir_all(root.join("src")).unwrap();
    fs::write(root.join("src/index.js"), "const k = process.env.API_KEY;").unwrap();
    if let Some(manifest) = manifest {
        fs::write(root.join("package.json"), manifest).unwrap();
    }
}

#[tokio::test]
async fn discovery_updates_manifest_and_bumps_patch_version() {
    let temp = TempDir::new().unwrap();
    write_package(
        temp.path(),
        Some(r#"{"name":"sample","version":"1.2.3","main":"src/index.js"}"#),
    );

    let store = Arc::new(LocalManifestStore::new());
    store.register("sample", temp.path().to_path_buf());

    let driver = SynthesisDriver::new(
        FixedAnalyzer::returning(vec![api_key_decl()]),
        store.clone(),
        run_config(),
    );
    let summary = driver
        .run(&[PackageJob {
            name: "sample".to_string(),
            root: temp.path().to_path_buf(),
        }])
        .await;

    assert_eq!(summary.updated(), 1);
    assert_eq!(
        summary.reports[0].outcome,
        PackageOutcome::Updated {
            version: "1.2.4".to_string(),
            added: 1,
        }
    );

    let written: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(temp.path().join("package.json")).unwrap())
            .unwrap();
    assert_eq!(written["version"], "1.2.4");
    assert_eq!(written["main"], "src/index.js");
    assert_eq!(
        written["agentConfig"]["parameters"]["API_KEY"]["type"],
        "string"
    );
    assert_eq!(
        written["agentConfig"]["parameters"]["API_KEY"]["required"],
        true
    );
}

#[tokio::test]
async fn rediscovered_declarations_leave_the_package_unchanged() {
    let temp = TempDir::new().unwrap();
    write_package(
        temp.path(),
        Some(
            r#"{
                "name": "sample",
                "version": "1.2.3",
                "agentConfig": {
                    "pluginType": "agent/v1",
                    "parameters": {
                        "API_KEY": {
                            "type": "string",
                            "description": "service API key",
                            "required": true
                        }
                    }
                }
            }"#,
        ),
    );

    let store = Arc::new(LocalManifestStore::new());
    store.register("sample", temp.path().to_path_buf());

    let driver = SynthesisDriver::new(
        FixedAnalyzer::returning(vec![api_key_decl()]),
        store,
        run_config(),
    );
    let summary = driver
        .run(&[PackageJob {
            name: "sample".to_string(),
            root: temp.path().to_path_buf(),
        }])
        .await;

    assert_eq!(summary.unchanged(), 1);

    // Version must not move when nothing changed
    let written: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(temp.path().join("package.json")).unwrap())
            .unwrap();
    assert_eq!(written["version"], "1.2.3");
}

#[tokio::test]
async fn zero_discoveries_classify_as_skipped() {
    let temp = TempDir::new().unwrap();
    write_package(temp.path(), Some(r#"{"name":"sample","version":"1.0.0"}"#));

    let store = Arc::new(LocalManifestStore::new());
    store.register("sample", temp.path().to_path_buf());

    let driver = SynthesisDriver::new(FixedAnalyzer::empty(), store, run_config());
    let summary = driver
        .run(&[PackageJob {
            name: "sample".to_string(),
            root: temp.path().to_path_buf(),
        }])
        .await;

    assert_eq!(summary.skipped(), 1);
}

#[tokio::test]
async fn one_failure_never_aborts_the_run() {
    let temp = TempDir::new().unwrap();
    let good_root = temp.path().join("good");
    write_package(&good_root, Some(r#"{"name":"good","version":"0.1.0"}"#));

    let store = Arc::new(LocalManifestStore::new());
    store.register("good", good_root.clone());

    let driver = SynthesisDriver::new(
        FixedAnalyzer::returning(vec![api_key_decl()]),
        store,
        run_config(),
    );
    let summary = driver
        .run(&[
            PackageJob {
                name: "broken".to_string(),
                root: temp.path().join("does-not-exist"),
            },
            PackageJob {
                name: "good".to_string(),
                root: good_root,
            },
        ])
        .await;

    assert_eq!(summary.failed(), 1);
    assert_eq!(summary.updated(), 1);
    assert!(matches!(
        summary.reports[0].outcome,
        PackageOutcome::Failed { .. }
    ));
}

#[tokio::test]
async fn persistence_failure_classifies_as_failed() {
    let temp = TempDir::new().unwrap();
    write_package(temp.path(), Some(r#"{"name":"sample","version":"1.0.0"}"#));

    let inner = LocalManifestStore::new();
    inner.register("sample", temp.path().to_path_buf());
    let store = Arc::new(ReadOnlyStore { inner });

    let driver = SynthesisDriver::new(
        FixedAnalyzer::returning(vec![api_key_decl()]),
        store,
        run_config(),
    );
    let summary = driver
        .run(&[PackageJob {
            name: "sample".to_string(),
            root: temp.path().to_path_buf(),
        }])
        .await;

    assert_eq!(summary.failed(), 1);
}

#[tokio::test]
async fn missing_manifest_is_created_with_initial_version_bumped() {
    let temp = TempDir::new().unwrap();
    write_package(temp.path(), None);

    let store = Arc::new(LocalManifestStore::new());
    store.register("sample", temp.path().to_path_buf());

    let driver = SynthesisDriver::new(
        FixedAnalyzer::returning(vec![api_key_decl()]),
        store,
        run_config(),
    );
    let summary = driver
        .run(&[PackageJob {
            name: "sample".to_string(),
            root: temp.path().to_path_buf(),
        }])
        .await;

    assert_eq!(summary.updated(), 1);
    let written: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(temp.path().join("package.json")).unwrap())
            .unwrap();
    assert_eq!(written["version"], "0.1.1");
    assert_eq!(written["name"], "sample");
}

#[tokio::test]
async fn limit_caps_the_number_of_processed_packages() {
    let temp = TempDir::new().unwrap();
    let first = temp.path().join("first");
    let second = temp.path().join("second");
    write_package(&first, Some(r#"{"name":"first","version":"1.0.0"}"#));
    write_package(&second, Some(r#"{"name":"second","version":"1.0.0"}"#));

    let store = Arc::new(LocalManifestStore::new());
    store.register("first", first.clone());
    store.register("second", second.clone());

    let config = RunConfig {
        limit: Some(1),
        ..run_config()
    };
    let driver = SynthesisDriver::new(
        FixedAnalyzer::returning(vec![api_key_decl()]),
        store,
        config,
    );
    let summary = driver
        .run(&[
            PackageJob {
                name: "first".to_string(),
                root: first,
            },
            PackageJob {
                name: "second".to_string(),
                root: second,
            },
        ])
        .await;

    assert_eq!(summary.reports.len(), 1);
    assert_eq!(summary.reports[0].package, "first");
}
