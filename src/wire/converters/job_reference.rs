use crate::{
    error::Error,
    wire::{
        converters::{optional_object, WireBlock},
        field_mapper::{read_fields, write_fields, Accessor, FieldMapping, Presence},
        ConversionContext, FieldPath,
    },
};
use jobwire_types::jobs::{JobReference, JobReferenceDispatch, JobReferenceNodeFilter};
use serde_json::{Map, Value};

const NODE_FILTER: &str = "nodefilters";
const DISPATCH: &str = "dispatch";

static JOB_REFERENCE_FIELDS: &[FieldMapping<JobReference>] = &[
    FieldMapping::new(
        "name",
        "name",
        Presence::NonEmpty,
        Accessor::OptStr(|r| &r.name, |r| &mut r.name),
    ),
    FieldMapping::new(
        "group_name",
        "group",
        Presence::NonEmpty,
        Accessor::OptStr(|r| &r.group_name, |r| &mut r.group_name),
    ),
    FieldMapping::new(
        "uuid",
        "uuid",
        Presence::NonEmpty,
        Accessor::OptStr(|r| &r.uuid, |r| &mut r.uuid),
    ),
    FieldMapping::new(
        "project_name",
        "project",
        Presence::NonEmpty,
        Accessor::OptStr(|r| &r.project_name, |r| &mut r.project_name),
    ),
    FieldMapping::new(
        "args",
        "args",
        Presence::NonEmpty,
        Accessor::OptStr(|r| &r.args, |r| &mut r.args),
    ),
    FieldMapping::new(
        "run_for_each_node",
        "nodeStep",
        Presence::NonEmpty,
        Accessor::Bool(|r| &r.run_for_each_node, |r| &mut r.run_for_each_node),
    ),
    FieldMapping::new(
        "child_nodes",
        "childNodes",
        Presence::NonEmpty,
        Accessor::Bool(|r| &r.child_nodes, |r| &mut r.child_nodes),
    ),
    FieldMapping::new(
        "fail_on_disable",
        "failOnDisable",
        Presence::NonEmpty,
        Accessor::Bool(|r| &r.fail_on_disable, |r| &mut r.fail_on_disable),
    ),
    FieldMapping::new(
        "ignore_notifications",
        "ignoreNotifications",
        Presence::NonEmpty,
        Accessor::Bool(|r| &r.ignore_notifications, |r| &mut r.ignore_notifications),
    ),
    FieldMapping::new(
        "import_options",
        "importOptions",
        Presence::NonEmpty,
        Accessor::Bool(|r| &r.import_options, |r| &mut r.import_options),
    ),
];

static NODE_FILTER_FIELDS: &[FieldMapping<JobReferenceNodeFilter>] = &[FieldMapping::new(
    "filter",
    "filter",
    Presence::NonEmpty,
    Accessor::OptStr(|f| &f.filter, |f| &mut f.filter),
)];

static DISPATCH_FIELDS: &[FieldMapping<JobReferenceDispatch>] = &[
    FieldMapping::new(
        "thread_count",
        "threadcount",
        Presence::NonNull,
        Accessor::Int(|d| &d.thread_count, |d| &mut d.thread_count),
    ),
    FieldMapping::new(
        "keep_going",
        "keepgoing",
        Presence::NonEmpty,
        Accessor::Bool(|d| &d.keep_going, |d| &mut d.keep_going),
    ),
    FieldMapping::new(
        "rank_attribute",
        "rankAttribute",
        Presence::NonEmpty,
        Accessor::OptStr(|d| &d.rank_attribute, |d| &mut d.rank_attribute),
    ),
    FieldMapping::new(
        "rank_order",
        "rankOrder",
        Presence::NonEmpty,
        Accessor::OptStr(|d| &d.rank_order, |d| &mut d.rank_order),
    ),
];

impl WireBlock for JobReference {
    const BLOCK: &'static str = "job";

    fn to_wire(
        &self,
        cx: &mut ConversionContext,
        path: &FieldPath,
    ) -> Result<Option<Map<String, Value>>, Error> {
        if !is_identified(self) {
            cx.skip(path, "job reference must have either `name` or `uuid`.")?;
            return Ok(None);
        }

        let encoding = cx.config.plugin_config_encoding;
        let mut wire = Map::new();
        write_fields(JOB_REFERENCE_FIELDS, self, &mut wire, encoding);

        if let Some(node_filter) = &self.node_filter {
            let mut wire_node_filter = Map::new();
            write_fields(NODE_FILTER_FIELDS, node_filter, &mut wire_node_filter, encoding);
            if let Some(dispatch) = &node_filter.dispatch {
                let mut wire_dispatch = Map::new();
                write_fields(DISPATCH_FIELDS, dispatch, &mut wire_dispatch, encoding);
                wire_node_filter.insert(DISPATCH.to_string(), Value::Object(wire_dispatch));
            }
            wire.insert(NODE_FILTER.to_string(), Value::Object(wire_node_filter));
        }

        Ok(Some(wire))
    }

    fn from_wire(
        wire: &Map<String, Value>,
        cx: &mut ConversionContext,
        path: &FieldPath,
    ) -> Result<Option<Self>, Error> {
        let mut job_reference = JobReference::default();
        read_fields(JOB_REFERENCE_FIELDS, wire, &mut job_reference, path)?;

        if let Some(wire_node_filter) = optional_object(wire, NODE_FILTER, path)? {
            let path = path.child(NODE_FILTER);
            let mut node_filter = JobReferenceNodeFilter::default();
            read_fields(NODE_FILTER_FIELDS, wire_node_filter, &mut node_filter, &path)?;
            if let Some(wire_dispatch) = optional_object(wire_node_filter, DISPATCH, &path)? {
                let mut dispatch = JobReferenceDispatch::default();
                read_fields(
                    DISPATCH_FIELDS,
                    wire_dispatch,
                    &mut dispatch,
                    &path.child(DISPATCH),
                )?;
                node_filter.dispatch = Some(dispatch);
            }
            job_reference.node_filter = Some(node_filter);
        }

        if !is_identified(&job_reference) {
            cx.skip(path, "job reference must have either `name` or `uuid`.")?;
            return Ok(None);
        }

        Ok(Some(job_reference))
    }
}

fn is_identified(job_reference: &JobReference) -> bool {
    [&job_reference.name, &job_reference.uuid]
        .into_iter()
        .flatten()
        .any(|value| !value.trim().is_empty())
}
