use crate::{
    error::Error,
    wire::{
        converters::{at_most_one, object, optional_object, optional_value, WireBlock},
        field_mapper::{
            read_fields, write_fields, Accessor, FieldMapping, ListEncoding, Presence,
        },
        ConversionContext, FieldPath,
    },
};
use itertools::Itertools;
use jobwire_types::jobs::{
    EmailNotification, Notification, NotificationType, Plugin, WebhookNotification,
};
use serde_json::{Map, Value};

const EMAIL: &str = "email";
const WEBHOOK: &str = "webhook";
const PLUGIN: &str = "plugin";

static EMAIL_FIELDS: &[FieldMapping<EmailNotification>] = &[
    FieldMapping::new(
        "recipients",
        "recipients",
        Presence::NonEmpty,
        Accessor::List(|e| &e.recipients, |e| &mut e.recipients, ListEncoding::Joined),
    ),
    FieldMapping::new(
        "subject",
        "subject",
        Presence::NonEmpty,
        Accessor::OptStr(|e| &e.subject, |e| &mut e.subject),
    ),
    FieldMapping::new(
        "attach_log",
        "attachLog",
        Presence::NonEmpty,
        Accessor::Bool(|e| &e.attach_log, |e| &mut e.attach_log),
    ),
    FieldMapping::new(
        "attach_log_inline",
        "attachLogInline",
        Presence::NonEmpty,
        Accessor::Bool(|e| &e.attach_log_inline, |e| &mut e.attach_log_inline),
    ),
];

// Webhook fields are flattened into the notification object.
static WEBHOOK_FIELDS: &[FieldMapping<WebhookNotification>] = &[
    FieldMapping::new(
        "urls",
        "urls",
        Presence::NonEmpty,
        Accessor::List(|w| &w.urls, |w| &mut w.urls, ListEncoding::Joined),
    ),
    FieldMapping::new(
        "format",
        "format",
        Presence::NonEmpty,
        Accessor::OptStr(|w| &w.format, |w| &mut w.format),
    ),
    FieldMapping::new(
        "http_method",
        "httpMethod",
        Presence::NonEmpty,
        Accessor::OptStr(|w| &w.http_method, |w| &mut w.http_method),
    ),
];

/// Returns the wire key of the notification trigger: `on_failure` → `onfailure`.
fn trigger_key(notification_type: NotificationType) -> String {
    notification_type.as_str().replace('_', "")
}

fn parse_trigger_key(key: &str) -> Option<NotificationType> {
    NotificationType::ALL
        .into_iter()
        .find(|notification_type| trigger_key(*notification_type) == key)
}

fn is_blank(items: &[String]) -> bool {
    items.iter().all(|item| item.trim().is_empty())
}

/// Recipients and URLs are sent as a single comma-joined string, so items can't contain commas.
fn check_joined_items(items: &[String], path: &FieldPath) -> Result<(), Error> {
    match items.iter().position(|item| item.contains(',')) {
        Some(index) => Err(Error::invariant(
            path.index(index),
            "list item can't contain a comma.",
        )),
        None => Ok(()),
    }
}

/// Converts notifications to the wire object keyed by the trigger. Returns `None` if there is
/// nothing to emit.
pub(crate) fn notifications_to_wire(
    notifications: &[Notification],
    cx: &mut ConversionContext,
    path: &FieldPath,
) -> Result<Option<Map<String, Value>>, Error> {
    let counts = notifications
        .iter()
        .filter_map(|notification| notification.notification_type)
        .counts();
    if let Some((notification_type, found)) = counts
        .into_iter()
        .filter(|(_, found)| *found > 1)
        .min_by_key(|(notification_type, _)| *notification_type)
    {
        return Err(Error::TooManyNestedBlocks {
            block: format!("{notification_type} notification"),
            parent: path.to_string(),
            max: 1,
            found,
        });
    }

    let mut wire = Map::new();
    for (index, notification) in notifications.iter().enumerate() {
        let path = path.index(index);
        let Some(notification_type) = notification.notification_type else {
            cx.skip(&path, "notification type is missing.")?;
            continue;
        };

        let mut wire_notification = Map::new();
        let encoding = cx.config.plugin_config_encoding;
        if let Some(email) = at_most_one(&notification.email, EMAIL, &path)? {
            if is_blank(&email.recipients) {
                cx.skip(&path.child(EMAIL), "email recipients are missing.")?;
            } else {
                check_joined_items(&email.recipients, &path.child(EMAIL).child("recipients"))?;
                let mut wire_email = Map::new();
                write_fields(EMAIL_FIELDS, email, &mut wire_email, encoding);
                wire_notification.insert(EMAIL.to_string(), Value::Object(wire_email));
            }
        }

        if let Some(webhook) = at_most_one(&notification.webhook, WEBHOOK, &path)? {
            if is_blank(&webhook.urls) {
                cx.skip(&path.child(WEBHOOK), "webhook URLs are missing.")?;
            } else {
                check_joined_items(&webhook.urls, &path.child(WEBHOOK).child("urls"))?;
                write_fields(WEBHOOK_FIELDS, webhook, &mut wire_notification, encoding);
            }
        }

        if let Some(plugin) = at_most_one(&notification.plugin, PLUGIN, &path)? {
            if let Some(plugin) = plugin.to_wire(cx, &path.child(PLUGIN))? {
                wire_notification.insert(PLUGIN.to_string(), Value::Object(plugin));
            }
        }

        wire.insert(
            trigger_key(notification_type),
            Value::Object(wire_notification),
        );
    }

    Ok(if wire.is_empty() { None } else { Some(wire) })
}

/// Reads notifications from the wire object keyed by the trigger.
pub(crate) fn notifications_from_wire(
    value: &Value,
    cx: &mut ConversionContext,
    path: &FieldPath,
) -> Result<Vec<Notification>, Error> {
    let mut notifications = vec![];
    for (key, wire_notification) in object(value, path)? {
        let path = path.child(key);
        let Some(notification_type) = parse_trigger_key(key) else {
            cx.skip(&path, format!("unknown notification trigger `{key}`."))?;
            continue;
        };

        let wire_notification = object(wire_notification, &path)?;
        let mut notification = Notification {
            notification_type: Some(notification_type),
            ..Default::default()
        };

        if let Some(wire_email) = optional_object(wire_notification, EMAIL, &path)? {
            let mut email = EmailNotification::default();
            read_fields(EMAIL_FIELDS, wire_email, &mut email, &path.child(EMAIL))?;
            if email.recipients.is_empty() {
                cx.skip(&path.child(EMAIL), "email recipients are missing.")?;
            } else {
                notification.email.push(email);
            }
        }

        if WEBHOOK_FIELDS
            .iter()
            .any(|field| optional_value(wire_notification, field.wire_name).is_some())
        {
            let mut webhook = WebhookNotification::default();
            read_fields(WEBHOOK_FIELDS, wire_notification, &mut webhook, &path)?;
            if webhook.urls.is_empty() {
                cx.skip(&path.child("urls"), "webhook URLs are missing.")?;
            } else {
                notification.webhook.push(webhook);
            }
        }

        let plugin_path = path.child(PLUGIN);
        match optional_value(wire_notification, PLUGIN) {
            None => {}
            Some(Value::Array(plugins)) => {
                for (index, plugin) in plugins.iter().enumerate() {
                    let plugin_path = plugin_path.index(index);
                    notification.plugin.extend(Plugin::from_wire(
                        object(plugin, &plugin_path)?,
                        cx,
                        &plugin_path,
                    )?);
                }
            }
            Some(plugin) => {
                notification.plugin.extend(Plugin::from_wire(
                    object(plugin, &plugin_path)?,
                    cx,
                    &plugin_path,
                )?);
            }
        }

        notifications.push(notification);
    }

    Ok(notifications)
}
