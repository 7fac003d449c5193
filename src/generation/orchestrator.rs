//! Generation orchestration - sequences filtering, resolution, naming,
//! rendering and writing for every eligible endpoint

use std::path::PathBuf;
use std::sync::Arc;

use crate::core::error::{Error, Result};
use crate::generation::filter::{self, EligibilityPolicy, Selection};
use crate::generation::{
    Artifact, ArtifactKind, ArtifactRenderer, ArtifactSink, SpecDocument, ViewModel, naming,
    resolver,
};

/// Knobs that change what a run produces
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineOptions {
    /// Provider prefix of generated type names, e.g. `vault`
    pub provider_name: String,
    /// Render a doc stub next to every code artifact
    pub emit_docs: bool,
    /// Record failing endpoints and continue instead of aborting
    pub keep_going: bool,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            provider_name: "vault".to_string(),
            emit_docs: true,
            keep_going: false,
        }
    }
}

/// An endpoint skipped in keep-going mode
#[derive(Debug)]
pub struct EndpointFailure {
    pub path: String,
    pub kind: ArtifactKind,
    pub error: Error,
}

/// Outcome of a completed run
#[derive(Debug, Default)]
pub struct RunReport {
    /// Files written, in write order
    pub written: Vec<PathBuf>,
    /// Always empty unless the run was keep-going
    pub failures: Vec<EndpointFailure>,
}

impl RunReport {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Runs generation over a whole specification document.
///
/// Endpoints are processed one at a time in ascending path order. By default
/// the first error aborts the run and is returned as is; files written for
/// earlier endpoints stay on disk. Regenerating is idempotent, so a failed
/// run can simply be repeated once the input is fixed.
pub struct Pipeline {
    renderer: Arc<dyn ArtifactRenderer>,
    sink: Arc<dyn ArtifactSink>,
    options: PipelineOptions,
}

impl Pipeline {
    pub fn new(
        renderer: Arc<dyn ArtifactRenderer>,
        sink: Arc<dyn ArtifactSink>,
        options: PipelineOptions,
    ) -> Self {
        Self {
            renderer,
            sink,
            options,
        }
    }

    /// Generate every endpoint `policy` selects from `spec`.
    pub fn run(&self, spec: &SpecDocument, policy: &EligibilityPolicy) -> Result<RunReport> {
        let selection = filter::select(spec, policy);
        tracing::info!(
            endpoints = selection.len(),
            title = %spec.title,
            "Starting generation"
        );

        let mut report = RunReport::default();
        for selected in selection {
            let outcome = self
                .render_endpoint(selected)
                .and_then(|artifacts| self.write_all(&artifacts, &mut report.written));

            match outcome {
                Ok(()) => {}
                Err(error) if self.options.keep_going => {
                    tracing::error!(
                        path = %selected.endpoint.path,
                        kind = %selected.kind,
                        "Skipping endpoint: {error}"
                    );
                    report.failures.push(EndpointFailure {
                        path: selected.endpoint.path.clone(),
                        kind: selected.kind,
                        error,
                    });
                }
                Err(error) => return Err(error),
            }
        }

        tracing::info!(
            written = report.written.len(),
            failed = report.failures.len(),
            "Generation finished"
        );
        Ok(report)
    }

    /// Render the code artifact and, if enabled, its doc stub.
    ///
    /// Nothing is written here, so an endpoint that fails to render leaves
    /// no files behind.
    pub fn render_endpoint(&self, selected: Selection<'_>) -> Result<Vec<Artifact>> {
        let endpoint = selected.endpoint;
        let parameters = resolver::resolve(endpoint)?;
        let names = naming::derive(&endpoint.path, selected.kind)?;
        tracing::debug!(
            path = %endpoint.path,
            kind = %selected.kind,
            parameters = parameters.len(),
            "Resolved endpoint"
        );

        let mut kinds = vec![selected.kind];
        if self.options.emit_docs {
            kinds.push(ArtifactKind::Doc);
        }

        kinds
            .into_iter()
            .map(|kind| {
                let view = ViewModel::new(
                    endpoint,
                    selected.kind,
                    &names,
                    &parameters,
                    &self.options.provider_name,
                );
                Ok(Artifact {
                    kind,
                    subject: selected.kind,
                    endpoint: endpoint.path.clone(),
                    content: self.renderer.render(&view, kind)?,
                })
            })
            .collect()
    }

    fn write_all(&self, artifacts: &[Artifact], written: &mut Vec<PathBuf>) -> Result<()> {
        for artifact in artifacts {
            let target = self.sink.write(artifact)?;
            tracing::debug!(
                path = %artifact.endpoint,
                kind = %artifact.kind,
                target = %target.display(),
                "Wrote artifact"
            );
            written.push(target);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::{
        Capabilities, DeclaredParameter, EndpointDescriptor, MediaType, ParameterLocation,
        RequestBody, Schema,
    };
    use std::sync::Mutex;
    use tracing_test::traced_test;

    /// Renders a line per parameter so tests can see what reached the template
    struct ListingRenderer;

    impl ArtifactRenderer for ListingRenderer {
        fn render(&self, view: &ViewModel, kind: ArtifactKind) -> Result<String> {
            let names: Vec<&str> = view.parameters.iter().map(|p| p.name.as_str()).collect();
            Ok(format!("{kind} {} [{}]", view.endpoint, names.join(",")))
        }
    }

    struct FailingRenderer;

    impl ArtifactRenderer for FailingRenderer {
        fn render(&self, _view: &ViewModel, kind: ArtifactKind) -> Result<String> {
            match kind {
                ArtifactKind::Doc => Err(Error::template("doc template is broken")),
                _ => Ok(String::new()),
            }
        }
    }

    #[derive(Default)]
    struct MemorySink {
        artifacts: Mutex<Vec<Artifact>>,
    }

    impl ArtifactSink for MemorySink {
        fn write(&self, artifact: &Artifact) -> Result<PathBuf> {
            self.artifacts.lock().unwrap().push(artifact.clone());
            Ok(PathBuf::from(format!("{}:{}", artifact.kind, artifact.endpoint)))
        }
    }

    fn endpoint(path: &str, body_type: &str) -> EndpointDescriptor {
        let body_schema = Schema {
            properties: [("setting".to_string(), Schema::of_type(body_type))]
                .into_iter()
                .collect(),
            ..Schema::of_type("object")
        };
        EndpointDescriptor {
            path: path.to_string(),
            description: None,
            parameters: vec![DeclaredParameter {
                name: "name".to_string(),
                description: None,
                location: ParameterLocation::Path,
                required: true,
                schema: Schema::of_type("string"),
            }],
            request_body: Some(RequestBody {
                content: [(
                    "application/json".to_string(),
                    MediaType {
                        schema: Some(body_schema),
                    },
                )]
                .into_iter()
                .collect(),
            }),
            capabilities: Capabilities {
                supports_read: true,
                supports_write: true,
                supports_delete: true,
            },
        }
    }

    fn spec(endpoints: Vec<EndpointDescriptor>) -> SpecDocument {
        SpecDocument {
            version: "3.0.2".to_string(),
            title: "HashiCorp Vault API".to_string(),
            endpoints,
        }
    }

    fn prefix_policy() -> EligibilityPolicy {
        EligibilityPolicy::Prefix {
            prefixes: vec!["/transform/".to_string()],
            kind: ArtifactKind::Resource,
        }
    }

    fn pipeline(sink: Arc<MemorySink>, options: PipelineOptions) -> Pipeline {
        Pipeline::new(Arc::new(ListingRenderer), sink, options)
    }

    #[test]
    fn test_run_writes_code_then_doc_in_path_order() {
        let sink = Arc::new(MemorySink::default());
        let spec = spec(vec![
            endpoint("/transform/template/{name}", "string"),
            endpoint("/transform/role/{name}", "string"),
        ]);

        let report = pipeline(sink.clone(), PipelineOptions::default())
            .run(&spec, &prefix_policy())
            .unwrap();

        assert!(report.is_success());
        let written: Vec<(ArtifactKind, String)> = sink
            .artifacts
            .lock()
            .unwrap()
            .iter()
            .map(|a| (a.kind, a.endpoint.clone()))
            .collect();
        assert_eq!(
            written,
            vec![
                (ArtifactKind::Resource, "/transform/role/{name}".to_string()),
                (ArtifactKind::Doc, "/transform/role/{name}".to_string()),
                (ArtifactKind::Resource, "/transform/template/{name}".to_string()),
                (ArtifactKind::Doc, "/transform/template/{name}".to_string()),
            ]
        );
        assert_eq!(report.written.len(), 4);
    }

    #[test]
    fn test_run_without_docs() {
        let sink = Arc::new(MemorySink::default());
        let options = PipelineOptions {
            emit_docs: false,
            ..Default::default()
        };

        pipeline(sink.clone(), options)
            .run(&spec(vec![endpoint("/transform/role/{name}", "string")]), &prefix_policy())
            .unwrap();

        let artifacts = sink.artifacts.lock().unwrap();
        assert_eq!(artifacts.len(), 1);
        assert_eq!(artifacts[0].content, "resource /transform/role/{name} [name,setting]");
    }

    #[test]
    fn test_run_aborts_on_first_failure() {
        let sink = Arc::new(MemorySink::default());
        let spec = spec(vec![
            endpoint("/transform/alphabet/{name}", "string"),
            endpoint("/transform/role/{name}", "object"),
            endpoint("/transform/template/{name}", "string"),
        ]);

        let err = pipeline(sink.clone(), PipelineOptions::default())
            .run(&spec, &prefix_policy())
            .unwrap_err();

        assert!(matches!(err, Error::UnsupportedParameterType { ref path, .. } if path == "/transform/role/{name}"));
        let artifacts = sink.artifacts.lock().unwrap();
        assert_eq!(artifacts.len(), 2);
        assert!(artifacts.iter().all(|a| a.endpoint == "/transform/alphabet/{name}"));
    }

    #[test]
    #[traced_test]
    fn test_run_keep_going_records_failures() {
        let sink = Arc::new(MemorySink::default());
        let options = PipelineOptions {
            keep_going: true,
            ..Default::default()
        };
        let spec = spec(vec![
            endpoint("/transform/role/{name}", "object"),
            endpoint("/transform/template/{name}", "string"),
        ]);

        let report = pipeline(sink.clone(), options)
            .run(&spec, &prefix_policy())
            .unwrap();

        assert!(!report.is_success());
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].path, "/transform/role/{name}");
        assert_eq!(report.written.len(), 2);
        assert!(logs_contain("Skipping endpoint"));
    }

    #[test]
    fn test_render_failure_writes_nothing_for_endpoint() {
        let sink = Arc::new(MemorySink::default());
        let pipeline = Pipeline::new(
            Arc::new(FailingRenderer),
            sink.clone(),
            PipelineOptions::default(),
        );

        let err = pipeline
            .run(&spec(vec![endpoint("/transform/role/{name}", "string")]), &prefix_policy())
            .unwrap_err();

        assert!(matches!(err, Error::Template(_)));
        assert!(sink.artifacts.lock().unwrap().is_empty());
    }

    #[test]
    fn test_run_rejects_parameter_named_path() {
        let sink = Arc::new(MemorySink::default());
        let mut mounts = endpoint("/sys/mounts/{path}", "string");
        mounts.parameters[0].name = "path".to_string();
        let policy = EligibilityPolicy::Prefix {
            prefixes: vec!["/sys/".to_string()],
            kind: ArtifactKind::Resource,
        };

        let err = pipeline(sink.clone(), PipelineOptions::default())
            .run(&spec(vec![mounts]), &policy)
            .unwrap_err();

        assert!(matches!(
            err,
            Error::ReservedParameterName { ref path, ref parameter }
                if path == "/sys/mounts/{path}" && parameter == "path"
        ));
        assert!(sink.artifacts.lock().unwrap().is_empty());
    }

    #[test]
    fn test_run_rejects_relative_path_segments() {
        let sink = Arc::new(MemorySink::default());
        let err = pipeline(sink.clone(), PipelineOptions::default())
            .run(
                &spec(vec![endpoint("/transform/../../etc/{name}", "string")]),
                &prefix_policy(),
            )
            .unwrap_err();

        assert!(matches!(err, Error::SpecParse(_)));
        assert!(sink.artifacts.lock().unwrap().is_empty());
    }

    #[test]
    fn test_run_with_no_eligible_endpoints() {
        let sink = Arc::new(MemorySink::default());
        let report = pipeline(sink.clone(), PipelineOptions::default())
            .run(&spec(vec![endpoint("/sys/mounts", "string")]), &EligibilityPolicy::default())
            .unwrap();

        assert!(report.written.is_empty());
        assert!(report.is_success());
    }
}
