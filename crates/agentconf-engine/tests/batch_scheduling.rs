//! Batch coordinator scheduling behavior under paused time

use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::time::Instant;

use agentconf_domain::{Artifact, PackageConfiguration, VariableDeclaration, VariableType};
use agentconf_engine::{BatchCoordinator, Extractor, DEFAULT_MAX_ARTIFACT_BYTES};
use agentconf_providers::{AnalysisError, DeclarationAnalyzer};

/// Records every call with its virtual timestamp; paths containing "bad"
/// fail, everything else yields one declaration named after the path.
struct RecordingAnalyzer {
    calls: Mutex<Vec<(PathBuf, Instant)>>,
}

impl RecordingAnalyzer {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            calls: Mutex::new(Vec::new()),
        })
    }

    fn call_times(&self) -> Vec<Instant> {
        self.calls.lock().unwrap().iter().map(|(_, t)| *t).collect()
    }

    fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl DeclarationAnalyzer for RecordingAnalyzer {
    fn id(&self) -> &str {
        "recording"
    }

    async fn extract(
        &self,
        artifact: &Artifact,
        _known: Option<&PackageConfiguration>,
    ) -> Result<Vec<VariableDeclaration>, AnalysisError> {
        self.calls
            .lock()
            .unwrap()
            .push((artifact.path.clone(), Instant::now()));

        if artifact.path.to_string_lossy().contains("bad") {
            return Err(AnalysisError::NetworkError("connection refused".to_string()));
        }

        Ok(vec![VariableDeclaration {
            name: format!("VAR_{}", artifact.path.display()).replace(['/', '.'], "_"),
            var_type: VariableType::String,
            description: "discovered".to_string(),
            required: None,
            default_value: None,
        }])
    }
}

fn artifacts(count: usize) -> Vec<Artifact> {
    (0..count)
        .map(|i| Artifact {
            path: PathBuf::from(format!("file{:02}.js", i)),
            content: format!("process.env.VAR_{}", i),
        })
        .collect()
}

fn coordinator(analyzer: Arc<RecordingAnalyzer>, batch_size: usize, delay: Duration) -> BatchCoordinator {
    let extractor = Extractor::new(analyzer, DEFAULT_MAX_ARTIFACT_BYTES);
    BatchCoordinator::new(extractor, batch_size, delay)
}

#[tokio::test(start_paused = true)]
async fn twelve_artifacts_run_as_three_batches() {
    let analyzer = RecordingAnalyzer::new();
    let delay = Duration::from_secs(2);
    let coordinator = coordinator(analyzer.clone(), 5, delay);

    let declarations = coordinator.run(&artifacts(12), None).await;

    assert_eq!(analyzer.call_count(), 12);
    assert_eq!(declarations.len(), 12);

    // Calls within a batch share a virtual timestamp; batches are separated
    // by exactly the configured delay.
    let times = analyzer.call_times();
    let mut waves: Vec<(Instant, usize)> = Vec::new();
    for t in times {
        match waves.last_mut() {
            Some((wave, count)) if *wave == t => *count += 1,
            _ => waves.push((t, 1)),
        }
    }
    let sizes: Vec<usize> = waves.iter().map(|(_, count)| *count).collect();
    assert_eq!(sizes, vec![5, 5, 2]);
    assert_eq!(waves[1].0 - waves[0].0, delay);
    assert_eq!(waves[2].0 - waves[1].0, delay);
}

#[tokio::test(start_paused = true)]
async fn single_batch_has_no_delay() {
    let analyzer = RecordingAnalyzer::new();
    let coordinator = coordinator(analyzer.clone(), 5, Duration::from_secs(2));

    let start = Instant::now();
    coordinator.run(&artifacts(4), None).await;

    assert_eq!(analyzer.call_count(), 4);
    assert_eq!(Instant::now(), start);
}

#[tokio::test(start_paused = true)]
async fn failed_extraction_degrades_to_zero_declarations() {
    let analyzer = RecordingAnalyzer::new();
    let coordinator = coordinator(analyzer.clone(), 5, Duration::from_secs(2));

    let mut set = artifacts(2);
    set.push(Artifact {
        path: PathBuf::from("bad_gateway.js"),
        content: "process.env.UNREACHABLE".to_string(),
    });

    let declarations = coordinator.run(&set, None).await;

    assert_eq!(analyzer.call_count(), 3);
    assert_eq!(declarations.len(), 2);
    assert!(declarations.iter().all(|d| !d.name.contains("bad")));
}

#[tokio::test(start_paused = true)]
async fn oversized_artifacts_are_never_sent() {
    let analyzer = RecordingAnalyzer::new();
    let extractor = Extractor::new(analyzer.clone(), 64);
    let coordinator = BatchCoordinator::new(extractor, 5, Duration::from_secs(2));

    let set = vec![
        Artifact {
            path: PathBuf::from("small.js"),
            content: "short".to_string(),
        },
        Artifact {
            path: PathBuf::from("huge.js"),
            content: "x".repeat(1024),
        },
    ];

    let declarations = coordinator.run(&set, None).await;

    assert_eq!(analyzer.call_count(), 1);
    assert_eq!(declarations.len(), 1);
    assert_eq!(declarations[0].name, "VAR_small_js");
}

#[tokio::test(start_paused = true)]
async fn empty_artifact_list_yields_nothing() {
    let analyzer = RecordingAnalyzer::new();
    let coordinator = coordinator(analyzer.clone(), 5, Duration::from_secs(2));

    let declarations = coordinator.run(&[], None).await;
    assert_eq!(analyzer.call_count(), 0);
    assert!(declarations.is_empty());
}
