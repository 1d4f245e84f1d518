//! Typed tool arguments.
//!
//! The engine hands over a loosely-shaped JSON mapping; [`ToolArguments::parse`]
//! turns it into exactly one typed variant per tool, applying field defaults and
//! the per-turn default namespace. Nothing downstream of parsing looks at raw JSON.

use serde::{Deserialize, Deserializer};
use serde_json::{json, Map, Value};

use crate::domain::cluster::ResourceKind;
use crate::domain::foundation::ValidationError;

use super::ToolName;

pub const DEFAULT_TAIL_LINES: u32 = 100;
pub const MAX_TAIL_LINES: u32 = 10_000;
pub const DEFAULT_EVENT_LIMIT: u32 = 50;
pub const MAX_EVENT_LIMIT: u32 = 1_000;
pub const DEFAULT_SEARCH_RESULTS: u32 = 3;
pub const MAX_SEARCH_RESULTS: u32 = 50;

/// Arguments shared by the namespaced list tools.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ListArgs {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub namespace: String,
    #[serde(default)]
    pub label_selector: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PodLogsArgs {
    pub pod_name: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub namespace: String,
    #[serde(default)]
    pub container: Option<String>,
    #[serde(default = "default_tail_lines")]
    pub tail_lines: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct EventsArgs {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub namespace: String,
    #[serde(default)]
    pub field_selector: Option<String>,
    #[serde(default = "default_event_limit")]
    pub limit: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SearchArgs {
    pub query: String,
    #[serde(default = "default_search_results")]
    pub n_results: u32,
}

/// Arguments for any of the delete tools.
///
/// The engine names the resource through a kind-specific field
/// (`pod_name`, `secret_name`, ...); parsing folds that into `name`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteArgs {
    pub kind: ResourceKind,
    pub name: String,
    pub namespace: String,
    pub grace_period_seconds: Option<i64>,
}

#[derive(Deserialize)]
struct DeleteCommon {
    #[serde(default, deserialize_with = "null_as_empty")]
    namespace: String,
    #[serde(default)]
    grace_period_seconds: Option<i64>,
}

// Engines often send `"namespace": null` for "use the default".
fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

fn default_tail_lines() -> u32 {
    DEFAULT_TAIL_LINES
}

fn default_event_limit() -> u32 {
    DEFAULT_EVENT_LIMIT
}

fn default_search_results() -> u32 {
    DEFAULT_SEARCH_RESULTS
}

/// Validated, fully-resolved arguments for one tool call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolArguments {
    GetNamespaces,
    GetPods(ListArgs),
    GetPodLogs(PodLogsArgs),
    GetDeployments(ListArgs),
    GetServices(ListArgs),
    GetEvents(EventsArgs),
    GetClusterInfo,
    SearchRunbooks(SearchArgs),
    Delete(DeleteArgs),
}

impl ToolArguments {
    /// Validates `raw` against the schema of `tool`.
    ///
    /// Missing or blank namespaces resolve to `default_namespace`. Fails
    /// with a [`ValidationError`] on a missing required field, a wrong
    /// type, or an out-of-range number.
    pub fn parse(
        tool: ToolName,
        raw: &Map<String, Value>,
        default_namespace: &str,
    ) -> Result<Self, ValidationError> {
        let args = match tool {
            ToolName::GetNamespaces => Self::GetNamespaces,
            ToolName::GetClusterInfo => Self::GetClusterInfo,
            ToolName::GetPods => Self::GetPods(list_args(tool, raw, default_namespace)?),
            ToolName::GetDeployments => {
                Self::GetDeployments(list_args(tool, raw, default_namespace)?)
            }
            ToolName::GetServices => Self::GetServices(list_args(tool, raw, default_namespace)?),
            ToolName::GetPodLogs => {
                let mut args: PodLogsArgs = decode(tool, raw)?;
                require_non_empty("pod_name", &args.pod_name)?;
                check_range("tail_lines", args.tail_lines, MAX_TAIL_LINES)?;
                resolve_namespace(&mut args.namespace, default_namespace);
                Self::GetPodLogs(args)
            }
            ToolName::GetEvents => {
                let mut args: EventsArgs = decode(tool, raw)?;
                check_range("limit", args.limit, MAX_EVENT_LIMIT)?;
                resolve_namespace(&mut args.namespace, default_namespace);
                Self::GetEvents(args)
            }
            ToolName::SearchRunbooks => {
                let args: SearchArgs = decode(tool, raw)?;
                require_non_empty("query", &args.query)?;
                check_range("n_results", args.n_results, MAX_SEARCH_RESULTS)?;
                Self::SearchRunbooks(args)
            }
            ToolName::DeletePod => delete_args(tool, ResourceKind::Pod, raw, default_namespace)?,
            ToolName::DeleteDeployment => {
                delete_args(tool, ResourceKind::Deployment, raw, default_namespace)?
            }
            ToolName::DeleteService => {
                delete_args(tool, ResourceKind::Service, raw, default_namespace)?
            }
            ToolName::DeleteStatefulSet => {
                delete_args(tool, ResourceKind::StatefulSet, raw, default_namespace)?
            }
            ToolName::DeleteDaemonSet => {
                delete_args(tool, ResourceKind::DaemonSet, raw, default_namespace)?
            }
            ToolName::DeleteConfigMap => {
                delete_args(tool, ResourceKind::ConfigMap, raw, default_namespace)?
            }
            ToolName::DeleteSecret => {
                delete_args(tool, ResourceKind::Secret, raw, default_namespace)?
            }
        };
        Ok(args)
    }

    /// The namespace the call operates on, if it is namespaced.
    pub fn namespace(&self) -> Option<&str> {
        match self {
            Self::GetNamespaces | Self::GetClusterInfo | Self::SearchRunbooks(_) => None,
            Self::GetPods(a) | Self::GetDeployments(a) | Self::GetServices(a) => {
                Some(&a.namespace)
            }
            Self::GetPodLogs(a) => Some(&a.namespace),
            Self::GetEvents(a) => Some(&a.namespace),
            Self::Delete(a) => Some(&a.namespace),
        }
    }

    /// Renders the resolved arguments as a plain mapping for the audit record.
    ///
    /// Field names match the tool schema, defaults included.
    pub fn to_map(&self) -> Map<String, Value> {
        let value = match self {
            Self::GetNamespaces | Self::GetClusterInfo => json!({}),
            Self::GetPods(a) | Self::GetDeployments(a) | Self::GetServices(a) => json!({
                "namespace": a.namespace,
                "label_selector": a.label_selector,
            }),
            Self::GetPodLogs(a) => json!({
                "pod_name": a.pod_name,
                "namespace": a.namespace,
                "container": a.container,
                "tail_lines": a.tail_lines,
            }),
            Self::GetEvents(a) => json!({
                "namespace": a.namespace,
                "field_selector": a.field_selector,
                "limit": a.limit,
            }),
            Self::SearchRunbooks(a) => json!({
                "query": a.query,
                "n_results": a.n_results,
            }),
            Self::Delete(a) => {
                let mut map = Map::new();
                map.insert(a.kind.name_field().to_string(), json!(a.name));
                map.insert("namespace".to_string(), json!(a.namespace));
                if a.kind.supports_grace_period() {
                    map.insert(
                        "grace_period_seconds".to_string(),
                        json!(a.grace_period_seconds),
                    );
                }
                Value::Object(map)
            }
        };

        match value {
            Value::Object(map) => map,
            _ => Map::new(),
        }
    }
}

fn decode<T: serde::de::DeserializeOwned>(
    tool: ToolName,
    raw: &Map<String, Value>,
) -> Result<T, ValidationError> {
    serde_json::from_value(Value::Object(raw.clone()))
        .map_err(|e| ValidationError::invalid_arguments(tool.as_str(), e.to_string()))
}

fn list_args(
    tool: ToolName,
    raw: &Map<String, Value>,
    default_namespace: &str,
) -> Result<ListArgs, ValidationError> {
    let mut args: ListArgs = decode(tool, raw)?;
    resolve_namespace(&mut args.namespace, default_namespace);
    Ok(args)
}

fn delete_args(
    tool: ToolName,
    kind: ResourceKind,
    raw: &Map<String, Value>,
    default_namespace: &str,
) -> Result<ToolArguments, ValidationError> {
    let field = kind.name_field();
    let name = match raw.get(field) {
        Some(Value::String(name)) => name.clone(),
        Some(other) => {
            return Err(ValidationError::invalid_format(
                field,
                format!("expected a string, got {}", other),
            ))
        }
        None => {
            return Err(ValidationError::invalid_arguments(
                tool.as_str(),
                format!("missing field `{}`", field),
            ))
        }
    };
    require_non_empty(field, &name)?;

    let mut common: DeleteCommon = decode(tool, raw)?;
    resolve_namespace(&mut common.namespace, default_namespace);

    let grace_period_seconds = if kind.supports_grace_period() {
        common.grace_period_seconds
    } else {
        None
    };
    if let Some(grace) = grace_period_seconds {
        if grace < 0 {
            return Err(ValidationError::out_of_range(
                "grace_period_seconds",
                0,
                i64::MAX,
                grace,
            ));
        }
    }

    Ok(ToolArguments::Delete(DeleteArgs {
        kind,
        name,
        namespace: common.namespace,
        grace_period_seconds,
    }))
}

fn resolve_namespace(namespace: &mut String, default_namespace: &str) {
    if namespace.trim().is_empty() {
        *namespace = default_namespace.to_string();
    }
}

fn require_non_empty(field: &str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::empty_field(field));
    }
    Ok(())
}

fn check_range(field: &str, value: u32, max: u32) -> Result<(), ValidationError> {
    if value == 0 || value > max {
        return Err(ValidationError::out_of_range(
            field,
            1,
            i64::from(max),
            i64::from(value),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(m) => m,
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn get_pods_uses_explicit_namespace() {
        let args = ToolArguments::parse(
            ToolName::GetPods,
            &map(json!({"namespace": "kube-system"})),
            "default",
        )
        .unwrap();

        assert_eq!(args.namespace(), Some("kube-system"));
    }

    #[test]
    fn missing_namespace_falls_back_to_default() {
        let args = ToolArguments::parse(ToolName::GetServices, &Map::new(), "payments").unwrap();
        assert_eq!(args.namespace(), Some("payments"));
    }

    #[test]
    fn null_namespace_falls_back_to_default() {
        let args = ToolArguments::parse(
            ToolName::GetEvents,
            &map(json!({"namespace": null})),
            "monitoring",
        )
        .unwrap();
        assert_eq!(args.namespace(), Some("monitoring"));
    }

    #[test]
    fn pod_logs_applies_tail_lines_default() {
        let args = ToolArguments::parse(
            ToolName::GetPodLogs,
            &map(json!({"pod_name": "web-1"})),
            "default",
        )
        .unwrap();

        match args {
            ToolArguments::GetPodLogs(a) => {
                assert_eq!(a.tail_lines, DEFAULT_TAIL_LINES);
                assert_eq!(a.namespace, "default");
                assert!(a.container.is_none());
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn pod_logs_without_pod_name_is_rejected() {
        let err = ToolArguments::parse(ToolName::GetPodLogs, &Map::new(), "default").unwrap_err();
        assert!(matches!(err, ValidationError::InvalidArguments { .. }));
    }

    #[test]
    fn wrong_type_is_rejected() {
        let err = ToolArguments::parse(
            ToolName::GetEvents,
            &map(json!({"limit": "lots"})),
            "default",
        )
        .unwrap_err();
        assert!(matches!(err, ValidationError::InvalidArguments { .. }));
    }

    #[test]
    fn zero_results_is_out_of_range() {
        let err = ToolArguments::parse(
            ToolName::SearchRunbooks,
            &map(json!({"query": "crashloop", "n_results": 0})),
            "default",
        )
        .unwrap_err();
        assert!(matches!(err, ValidationError::OutOfRange { .. }));
    }

    #[test]
    fn blank_query_is_empty_field() {
        let err = ToolArguments::parse(
            ToolName::SearchRunbooks,
            &map(json!({"query": "  "})),
            "default",
        )
        .unwrap_err();
        assert_eq!(err, ValidationError::empty_field("query"));
    }

    #[test]
    fn delete_pod_reads_kind_specific_name_field() {
        let args = ToolArguments::parse(
            ToolName::DeletePod,
            &map(json!({"pod_name": "web-1", "grace_period_seconds": 10})),
            "shop",
        )
        .unwrap();

        assert_eq!(
            args,
            ToolArguments::Delete(DeleteArgs {
                kind: ResourceKind::Pod,
                name: "web-1".to_string(),
                namespace: "shop".to_string(),
                grace_period_seconds: Some(10),
            })
        );
    }

    #[test]
    fn delete_secret_ignores_grace_period() {
        let args = ToolArguments::parse(
            ToolName::DeleteSecret,
            &map(json!({"secret_name": "db-creds", "grace_period_seconds": 10})),
            "default",
        )
        .unwrap();

        match args {
            ToolArguments::Delete(a) => assert_eq!(a.grace_period_seconds, None),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn delete_with_non_string_name_is_invalid_format() {
        let err = ToolArguments::parse(
            ToolName::DeleteDeployment,
            &map(json!({"deployment_name": 42})),
            "default",
        )
        .unwrap_err();
        assert!(matches!(err, ValidationError::InvalidFormat { .. }));
    }

    #[test]
    fn negative_grace_period_is_rejected() {
        let err = ToolArguments::parse(
            ToolName::DeletePod,
            &map(json!({"pod_name": "web-1", "grace_period_seconds": -1})),
            "default",
        )
        .unwrap_err();
        assert!(matches!(err, ValidationError::OutOfRange { .. }));
    }

    #[test]
    fn to_map_includes_resolved_defaults() {
        let args = ToolArguments::parse(
            ToolName::GetPods,
            &map(json!({"namespace": "kube-system"})),
            "default",
        )
        .unwrap();

        let rendered = args.to_map();
        assert_eq!(rendered["namespace"], "kube-system");
        assert_eq!(rendered["label_selector"], Value::Null);
    }

    #[test]
    fn delete_to_map_uses_kind_specific_field() {
        let args = ToolArguments::parse(
            ToolName::DeleteConfigMap,
            &map(json!({"configmap_name": "settings"})),
            "default",
        )
        .unwrap();

        let rendered = args.to_map();
        assert_eq!(rendered["configmap_name"], "settings");
        assert!(!rendered.contains_key("grace_period_seconds"));
    }
}
