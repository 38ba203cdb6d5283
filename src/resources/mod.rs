// Resource catalog served under /api/v1
pub mod account;
pub mod community;
pub mod gamification;
pub mod places;
pub mod taxonomy;

use crate::resource::ResourceRegistry;

pub fn catalog() -> ResourceRegistry {
    ResourceRegistry::new()
        .register(gamification::achievements())
        .register(gamification::user_achievements())
        .register(gamification::challenges())
        .register(gamification::user_challenges())
        .register(taxonomy::categories())
        .register(taxonomy::tags())
        .register(taxonomy::aliases())
        .register(places::countries())
        .register(places::cities())
        .register(places::venues())
        .register(community::organizations())
        .register(community::events())
        .register(account::notification_settings())
        .register(account::sync_logs())
        .register(account::reports())
}
