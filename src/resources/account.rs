use crate::filter::FilterKind;
use crate::resource::{ActionEffect, ResourceDescriptor};
use crate::validation::FieldRules;

pub fn notification_settings() -> ResourceDescriptor {
    ResourceDescriptor::new("notification_settings")
        .owned_by("user_id")
        .filter("channel", FilterKind::Equals)
        .filter("type", FilterKind::Equals)
        .filter("is_enabled", FilterKind::Boolean)
        .sortable(&["channel", "type"])
        .order_by("channel asc, type asc")
        .field(FieldRules::new("channel").required().one_of(&["email", "push", "sms"]))
        .field(
            FieldRules::new("type")
                .required()
                .string_max(100)
                .unique_within("notification_settings", &["user_id", "channel"]),
        )
        .field(FieldRules::new("is_enabled").boolean())
        .field(FieldRules::new("timezone").timezone())
}

pub fn sync_logs() -> ResourceDescriptor {
    ResourceDescriptor::new("sync_logs")
        .owned_by("user_id")
        .filter("status", FilterKind::Equals)
        .filter("source", FilterKind::Equals)
        .filter("records_processed", FilterKind::Range)
        .filter("started_at", FilterKind::DateRange)
        .sortable(&["started_at", "finished_at", "records_processed", "created_at"])
        .field(FieldRules::new("source").required().string_max(100))
        .field(FieldRules::new("status").required().one_of(&["pending", "running", "completed", "failed"]))
        .field(FieldRules::new("started_at").date())
        .field(FieldRules::new("finished_at").date().after_or_equal("started_at"))
        .field(FieldRules::new("records_processed").integer().min(0.0))
        .field(FieldRules::new("error_message").string_max(2000))
        .status_timestamp("status", "running", "started_at")
        .status_timestamp("status", "completed", "finished_at")
        .status_timestamp("status", "failed", "finished_at")
        .duration_minutes("duration_minutes", "started_at", "finished_at")
}

pub fn reports() -> ResourceDescriptor {
    ResourceDescriptor::new("reports")
        .owned_by("user_id")
        .filter("type", FilterKind::Equals)
        .filter("format", FilterKind::Equals)
        .filter("generated_at", FilterKind::DateRange)
        .search(&["title"])
        .sortable(&["title", "generated_at", "created_at"])
        .field(FieldRules::new("title").required().string_max(255))
        .field(FieldRules::new("type").required().one_of(&["activity", "impact", "events"]))
        .field(FieldRules::new("format").one_of(&["pdf", "csv"]))
        .field(FieldRules::new("period_start").date())
        .field(FieldRules::new("period_end").date().after_or_equal("period_start"))
        .hidden(&["file_path"])
        .action("generate", ActionEffect::Touch("generated_at".to_string()), "Report generation started")
        .action("download", ActionEffect::Acknowledge, "Report download started")
}
