#![deny(warnings)]

pub mod config;
pub mod error;
pub mod normalization;
pub mod wire;

pub use jobwire_types;

use crate::{
    config::ConverterConfig,
    wire::{Conversion, DocumentAssembler, WireDocument},
};
use jobwire_types::jobs::Job;

pub use crate::{
    error::{Error, ErrorKind},
    normalization::{semantic_equals, SemanticEq, TagString},
};

/// Converts the job to the wire document used to create or update the job on the remote
/// scheduler.
pub fn to_wire_document(
    job: &Job,
    config: &ConverterConfig,
) -> Result<Conversion<WireDocument>, Error> {
    DocumentAssembler::new(config).assemble(job)
}

/// Converts the wire document returned by the remote scheduler to the job.
pub fn from_wire_document(
    document: &WireDocument,
    config: &ConverterConfig,
) -> Result<Conversion<Job>, Error> {
    DocumentAssembler::new(config).disassemble(document)
}

#[cfg(test)]
pub mod tests {
    use jobwire_types::jobs::{
        Command, Job, JobOption, LogLimit, NodeFilter, Notification, Orchestrator,
    };

    pub struct MockJobBuilder {
        job: Job,
    }

    impl MockJobBuilder {
        pub fn create<N: Into<String>>(name: N) -> Self {
            Self {
                job: Job {
                    name: name.into(),
                    ..Default::default()
                },
            }
        }

        pub fn with_group<G: Into<String>>(mut self, group: G) -> Self {
            self.job.group_name = Some(group.into());
            self
        }

        pub fn with_project<P: Into<String>>(mut self, project: P) -> Self {
            self.job.project_name = Some(project.into());
            self
        }

        pub fn with_description<D: Into<String>>(mut self, description: D) -> Self {
            self.job.description = description.into();
            self
        }

        pub fn with_tags<T: Into<String>>(mut self, tags: T) -> Self {
            self.job.tags = Some(tags.into());
            self
        }

        pub fn with_schedule<S: Into<String>>(mut self, schedule: S) -> Self {
            self.job.schedule = Some(schedule.into());
            self
        }

        pub fn with_command(mut self, command: Command) -> Self {
            self.job.commands.push(command);
            self
        }

        pub fn with_option(mut self, option: JobOption) -> Self {
            self.job.options.push(option);
            self
        }

        pub fn with_node_filter(mut self, node_filter: NodeFilter) -> Self {
            self.job.node_filter = Some(node_filter);
            self
        }

        pub fn with_notification(mut self, notification: Notification) -> Self {
            self.job.notifications.push(notification);
            self
        }

        pub fn with_orchestrator(mut self, orchestrator: Orchestrator) -> Self {
            self.job.orchestrator = Some(orchestrator);
            self
        }

        pub fn with_log_limit(mut self, log_limit: LogLimit) -> Self {
            self.job.log_limit = Some(log_limit);
            self
        }

        pub fn build(self) -> Job {
            self.job
        }
    }

    mod conversion {
        use super::MockJobBuilder;
        use crate::{
            config::{ConverterConfig, MapEncoding, ScriptInterpreterShape},
            from_wire_document, semantic_equals, to_wire_document, ErrorKind, TagString,
        };
        use jobwire_types::jobs::{
            Command, ErrorHandler, Job, JobOption, JobReference, JobReferenceDispatch,
            JobReferenceNodeFilter, LogLimit, NodeFilter, Notification, NotificationType,
            Orchestrator, OrchestratorSort, Plugin, ScriptInterpreter, StepDefinition,
            WebhookNotification,
        };
        use serde_json::json;

        fn full_job() -> Job {
            let job = MockJobBuilder::create("release")
                .with_group("ops/releases")
                .with_project("infra")
                .with_description("Builds and ships a release.")
                .with_tags("Release, CI")
                .with_schedule("0 0 4 1 * ? *")
                .with_command(Command {
                    step: StepDefinition {
                        description: Some("Build".to_string()),
                        inline_script: Some("make release".to_string()),
                        script_interpreter: Some(ScriptInterpreter {
                            invocation_string: "bash -eu".to_string(),
                            args_quoted: true,
                        }),
                        ..Default::default()
                    },
                    error_handlers: vec![ErrorHandler {
                        step: StepDefinition {
                            shell_command: Some("make clean".to_string()),
                            ..Default::default()
                        },
                        keep_going_on_success: true,
                    }],
                })
                .with_command(Command {
                    step: StepDefinition {
                        job_references: vec![JobReference {
                            project_name: Some("qa".to_string()),
                            child_nodes: true,
                            node_filter: Some(JobReferenceNodeFilter {
                                filter: Some("tags: qa".to_string()),
                                dispatch: Some(JobReferenceDispatch {
                                    thread_count: Some(3),
                                    ..Default::default()
                                }),
                            }),
                            ..JobReference::named("acceptance")
                        }],
                        ..Default::default()
                    },
                    error_handlers: vec![],
                })
                .with_command(Command {
                    step: StepDefinition {
                        step_plugins: vec![Plugin::new(
                            "copyfile",
                            [("source", "dist/app.tar.gz"), ("destination", "/opt/app")],
                        )],
                        ..Default::default()
                    },
                    error_handlers: vec![],
                })
                .with_option(JobOption {
                    value_choices: vec!["minor".to_string(), "major".to_string()],
                    require_predefined_choice: true,
                    ..JobOption::named("bump")
                })
                .with_option(JobOption {
                    obscure_input: true,
                    exposed_to_scripts: true,
                    storage_path: Some("keys/release/token".to_string()),
                    ..JobOption::named("token")
                })
                .with_node_filter(NodeFilter {
                    filter_query: Some("tags: build".to_string()),
                    exclude_query: Some("status: offline".to_string()),
                    exclude_precedence: true,
                })
                .with_notification(Notification::email(
                    NotificationType::OnSuccess,
                    ["release@example.com"],
                ))
                .with_notification(Notification {
                    notification_type: Some(NotificationType::OnFailure),
                    webhook: vec![WebhookNotification {
                        urls: vec!["https://hooks.example.com/release".to_string()],
                        format: Some("json".to_string()),
                        http_method: Some("post".to_string()),
                    }],
                    plugin: vec![Plugin::new("PagerDuty", [("severity", "critical")])],
                    ..Default::default()
                })
                .with_orchestrator(Orchestrator::HighestLowest {
                    attribute: "load".to_string(),
                    sort: OrchestratorSort::Lowest,
                })
                .with_log_limit(LogLimit {
                    output: "50MB".to_string(),
                    action: Some("halt".to_string()),
                    status: Some("failed".to_string()),
                })
                .build();

            Job {
                uuid: Some("3c1d1f9e-5e55-4b7a-9f0e-2f6d0e0b8c11".to_string()),
                allow_concurrent_executions: true,
                log_level: Some("DEBUG".to_string()),
                timeout: Some("1h".to_string()),
                retry: Some("2".to_string()),
                time_zone: Some("Europe/Berlin".to_string()),
                node_filter_editable: true,
                nodes_selected_by_default: Some(false),
                continue_on_error: true,
                command_ordering_strategy: Some("step-first".to_string()),
                max_thread_count: Some(4),
                rank_attribute: Some("rank".to_string()),
                rank_order: Some("ascending".to_string()),
                success_on_empty_node_filter: true,
                ..job
            }
        }

        #[test]
        fn round_trips_jobs_with_every_config() -> anyhow::Result<()> {
            let job = full_job();
            for script_interpreter_shape in
                [ScriptInterpreterShape::Current, ScriptInterpreterShape::Legacy]
            {
                for plugin_config_encoding in [MapEncoding::Json, MapEncoding::Xml] {
                    let config = ConverterConfig {
                        script_interpreter_shape,
                        plugin_config_encoding,
                        skip_invalid_elements: false,
                    };

                    let wire = to_wire_document(&job, &config)?;
                    assert!(wire.diagnostics.is_empty());

                    let read = from_wire_document(&wire.value, &config)?;
                    assert!(read.diagnostics.is_empty());
                    assert!(semantic_equals(&read.value, &job));
                }
            }

            Ok(())
        }

        #[test]
        fn round_trips_empty_strings() -> anyhow::Result<()> {
            let config = ConverterConfig::default();
            let job = MockJobBuilder::create("cleanup")
                .with_group("")
                .with_command(Command {
                    step: StepDefinition {
                        description: Some(String::new()),
                        shell_command: Some("./cleanup.sh".to_string()),
                        ..Default::default()
                    },
                    error_handlers: vec![],
                })
                .with_option(JobOption {
                    label: Some(String::new()),
                    ..JobOption::named("age")
                })
                .with_notification(Notification::email(
                    NotificationType::OnStart,
                    ["ops@example.com", " dev@example.com"],
                ))
                .with_log_limit(LogLimit {
                    output: "10MB".to_string(),
                    action: Some(String::new()),
                    status: None,
                })
                .build();

            let wire = to_wire_document(&job, &config)?.value;
            assert!(wire.get("group").is_none());
            assert!(wire.get("loglimitAction").is_none());
            assert_eq!(
                wire["notification"]["onstart"]["email"]["recipients"],
                json!("ops@example.com,dev@example.com")
            );

            let read = from_wire_document(&wire, &config)?.value;
            assert_eq!(read.group_name, None);
            assert!(semantic_equals(&read, &job));

            Ok(())
        }

        #[test]
        fn produces_deterministic_output() -> anyhow::Result<()> {
            let job = full_job();
            let config = ConverterConfig::default();

            let first = serde_json::to_vec(&to_wire_document(&job, &config)?.value)?;
            let second = serde_json::to_vec(&to_wire_document(&job.clone(), &config)?.value)?;
            assert_eq!(first, second);

            // Plugin configuration keys are always sorted.
            let wire = String::from_utf8(first)?;
            assert!(wire.contains(
                r#""configuration":{"destination":"/opt/app","source":"dist/app.tar.gz"}"#
            ));

            Ok(())
        }

        #[test]
        fn enforces_cardinality() -> anyhow::Result<()> {
            let config = ConverterConfig::default();
            let job_with_references = |count: usize| {
                MockJobBuilder::create("chain")
                    .with_command(Command {
                        step: StepDefinition {
                            job_references: (0..count)
                                .map(|index| JobReference::named(format!("step-{index}")))
                                .collect(),
                            ..Default::default()
                        },
                        error_handlers: vec![],
                    })
                    .build()
            };

            assert!(to_wire_document(&job_with_references(0), &config).is_ok());
            assert!(to_wire_document(&job_with_references(1), &config).is_ok());

            let error = to_wire_document(&job_with_references(2), &config).unwrap_err();
            assert_eq!(error.kind(), ErrorKind::StructuralViolation);
            assert_eq!(
                error.to_string(),
                "`job.command[0]` cannot have more than 1 `job` block(s), found 2."
            );

            Ok(())
        }

        #[test]
        fn enforces_option_invariants() -> anyhow::Result<()> {
            let config = ConverterConfig::default();
            let option = JobOption {
                storage_path: Some("keys/db/password".to_string()),
                ..JobOption::named("password")
            };

            let job = MockJobBuilder::create("db").with_option(option.clone()).build();
            let error = to_wire_document(&job, &config).unwrap_err();
            assert_eq!(error.kind(), ErrorKind::StructuralViolation);
            assert_eq!(error.path(), "job.option[0].storage_path");

            let job = MockJobBuilder::create("db")
                .with_option(JobOption {
                    obscure_input: true,
                    ..option
                })
                .build();
            assert!(to_wire_document(&job, &config).is_ok());

            Ok(())
        }

        #[test]
        fn ignores_notification_order_and_tag_case() -> anyhow::Result<()> {
            let on_failure = Notification::email(NotificationType::OnFailure, ["ops@example.com"]);
            let on_success = Notification::email(NotificationType::OnSuccess, ["dev@example.com"]);
            assert!(semantic_equals(
                &vec![on_failure.clone(), on_success.clone()],
                &vec![on_success, on_failure]
            ));
            assert!(semantic_equals(
                &TagString("Test,Terraform"),
                &TagString("terraform,test")
            ));

            Ok(())
        }

        #[test]
        fn converts_minimal_job() -> anyhow::Result<()> {
            let job = MockJobBuilder::create("hello")
                .with_command(Command::shell("echo hi"))
                .build();

            let wire = to_wire_document(&job, &ConverterConfig::default())?.value;
            assert_eq!(wire["sequence"]["commands"], json!([{ "exec": "echo hi" }]));
            for key in ["options", "schedule", "notification", "orchestrator"] {
                assert!(wire.get(key).is_none(), "unexpected `{key}` key");
            }

            Ok(())
        }

        #[test]
        fn round_trips_schedule() -> anyhow::Result<()> {
            let config = ConverterConfig::default();
            let job = MockJobBuilder::create("noon")
                .with_schedule("0 0 12 ? * * *")
                .build();

            let wire = to_wire_document(&job, &config)?.value;
            assert_eq!(wire["schedule"]["time"]["hour"], json!("12"));
            assert_eq!(wire["schedule"]["month"]["day"], json!("?"));
            assert_eq!(wire["schedule"]["weekDay"]["day"], json!("*"));

            let read = from_wire_document(&wire, &config)?.value;
            assert_eq!(read.schedule.as_deref(), Some("0 0 12 ? * * *"));

            Ok(())
        }

        #[test]
        fn fails_for_truncated_plugin_configuration() {
            let wire = json!({
                "name": "notify",
                "sequence": { "commands": [] },
                "notification": {
                    "onfailure": {
                        "plugin": {
                            "type": "HttpNotification",
                            "configuration": "<configuration><entry key=\"url\" value=\"https://example.com\"/>"
                        }
                    }
                }
            });

            let error = from_wire_document(&wire, &ConverterConfig::default()).unwrap_err();
            assert_eq!(error.kind(), ErrorKind::MalformedWireInput);
            assert_eq!(
                error.to_string(),
                "`job.notification.onfailure.plugin.configuration`: malformed map: stream ended before the closing `</configuration>` marker."
            );
        }
    }
}
