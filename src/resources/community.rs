use crate::filter::FilterKind;
use crate::resource::{ActionEffect, ResourceDescriptor};
use crate::validation::FieldRules;

pub fn organizations() -> ResourceDescriptor {
    ResourceDescriptor::new("organizations")
        .filter("type", FilterKind::Equals)
        .filter("is_verified", FilterKind::Boolean)
        .search(&["name", "description"])
        .sortable(&["name", "created_at"])
        .order_by("name asc")
        .field(FieldRules::new("name").required().string_max(255).unique("organizations"))
        .field(FieldRules::new("description").string_max(2000))
        .field(FieldRules::new("type").required().one_of(&["nonprofit", "company", "government", "community"]))
        .field(FieldRules::new("email").email())
        .field(FieldRules::new("website").url())
        .field(FieldRules::new("is_verified").boolean())
        .count("events_count", "events", "organization_id")
}

pub fn events() -> ResourceDescriptor {
    ResourceDescriptor::new("events")
        .filter("status", FilterKind::Equals)
        .filter("venue_id", FilterKind::Equals)
        .filter("organization_id", FilterKind::Equals)
        .filter("is_free", FilterKind::Boolean)
        .filter("price", FilterKind::Range)
        .filter("starts_at", FilterKind::DateRange)
        .search(&["title", "description"])
        .sortable(&["title", "starts_at", "price", "likes_count", "created_at"])
        .order_by("starts_at asc")
        .field(FieldRules::new("title").required().string_max(255))
        .field(FieldRules::new("description").string_max(5000))
        .field(FieldRules::new("venue_id").integer().exists("venues"))
        .field(FieldRules::new("organization_id").integer().exists("organizations"))
        .field(FieldRules::new("starts_at").required().date())
        .field(FieldRules::new("ends_at").date().after_or_equal("starts_at"))
        .field(FieldRules::new("status").one_of(&["draft", "published", "cancelled"]))
        .field(FieldRules::new("published_at").date())
        .field(FieldRules::new("price").numeric().min(0.0))
        .field(FieldRules::new("capacity").integer().min(0.0))
        .field(FieldRules::new("is_free").boolean())
        .status_timestamp("status", "published", "published_at")
        .duration_minutes("duration_minutes", "starts_at", "ends_at")
        .belongs_to("venue", "venue_id", "venues", &["id", "name", "address"])
        .belongs_to("organization", "organization_id", "organizations", &["id", "name", "type"])
        .action("like", ActionEffect::Increment("likes_count".to_string()), "Event liked successfully")
}
