use crate::filter::FilterKind;
use crate::resource::ResourceDescriptor;
use crate::validation::FieldRules;

pub const ACHIEVEMENT_CATEGORIES: &[&str] = &["sustainability", "social", "exploration", "engagement", "special"];

pub fn achievements() -> ResourceDescriptor {
    ResourceDescriptor::new("achievements")
        .filter("category", FilterKind::Equals)
        .filter("is_active", FilterKind::Boolean)
        .filter("points", FilterKind::Range)
        .filter("created_at", FilterKind::DateRange)
        .search(&["name", "description"])
        .sortable(&["name", "points", "created_at"])
        .order_by("name asc")
        .field(FieldRules::new("name").required().string_max(255).unique("achievements"))
        .field(FieldRules::new("description").string_max(1000))
        .field(FieldRules::new("category").required().one_of(ACHIEVEMENT_CATEGORIES))
        .field(FieldRules::new("points").integer().min(0.0))
        .field(FieldRules::new("icon").string_max(255))
        .field(FieldRules::new("color").hex_color())
        .field(FieldRules::new("is_active").boolean())
        .count("usage_count", "user_achievements", "achievement_id")
}

pub fn user_achievements() -> ResourceDescriptor {
    ResourceDescriptor::new("user_achievements")
        .owned_by("user_id")
        .filter("status", FilterKind::Equals)
        .filter("achievement_id", FilterKind::Equals)
        .filter("unlocked_at", FilterKind::DateRange)
        .sortable(&["unlocked_at", "progress", "created_at"])
        .field(
            FieldRules::new("achievement_id")
                .required()
                .integer()
                .exists("achievements")
                .unique_within("user_achievements", &["user_id"]),
        )
        .field(FieldRules::new("status").required().one_of(&["locked", "in_progress", "unlocked"]))
        .field(FieldRules::new("progress").integer().min(0.0).max(100.0))
        .field(FieldRules::new("unlocked_at").date())
        .status_timestamp("status", "unlocked", "unlocked_at")
        .belongs_to("achievement", "achievement_id", "achievements", &["id", "name", "category", "points", "icon"])
}

pub fn challenges() -> ResourceDescriptor {
    ResourceDescriptor::new("challenges")
        .filter("difficulty", FilterKind::Equals)
        .filter("is_active", FilterKind::Boolean)
        .filter("points", FilterKind::Range)
        .filter("starts_at", FilterKind::DateRange)
        .search(&["name", "description"])
        .sortable(&["name", "points", "starts_at", "ends_at"])
        .order_by("starts_at desc")
        .field(FieldRules::new("name").required().string_max(255))
        .field(FieldRules::new("description").string_max(2000))
        .field(FieldRules::new("difficulty").required().one_of(&["easy", "medium", "hard"]))
        .field(FieldRules::new("points").integer().min(0.0))
        .field(FieldRules::new("starts_at").required().date())
        .field(FieldRules::new("ends_at").date().after_or_equal("starts_at"))
        .field(FieldRules::new("is_active").boolean())
        .count("participants_count", "user_challenges", "challenge_id")
}

pub fn user_challenges() -> ResourceDescriptor {
    ResourceDescriptor::new("user_challenges")
        .owned_by("user_id")
        .filter("status", FilterKind::Equals)
        .filter("challenge_id", FilterKind::Equals)
        .filter("completed_at", FilterKind::DateRange)
        .sortable(&["progress", "started_at", "completed_at", "created_at"])
        .field(
            FieldRules::new("challenge_id")
                .required()
                .integer()
                .exists("challenges")
                .unique_within("user_challenges", &["user_id"]),
        )
        .field(FieldRules::new("status").required().one_of(&["pending", "active", "completed", "abandoned"]))
        .field(FieldRules::new("progress").integer().min(0.0).max(100.0))
        .field(FieldRules::new("started_at").date())
        .field(FieldRules::new("completed_at").date().after_or_equal("started_at"))
        .status_timestamp("status", "active", "started_at")
        .status_timestamp("status", "completed", "completed_at")
        .duration_minutes("duration_minutes", "started_at", "completed_at")
        .belongs_to("challenge", "challenge_id", "challenges", &["id", "name", "difficulty", "points"])
}
