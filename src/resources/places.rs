use crate::filter::FilterKind;
use crate::resource::ResourceDescriptor;
use crate::validation::FieldRules;

pub fn countries() -> ResourceDescriptor {
    ResourceDescriptor::new("countries")
        .search(&["name", "code"])
        .sortable(&["name", "code"])
        .order_by("name asc")
        .field(FieldRules::new("name").required().string_max(255).unique("countries"))
        .field(FieldRules::new("code").required().string_max(3).unique("countries"))
        .field(FieldRules::new("timezone").timezone())
        .count("cities_count", "cities", "country_id")
        .guard_delete("cities", "country_id", "No se puede eliminar el país porque tiene ciudades asociadas")
}

pub fn cities() -> ResourceDescriptor {
    ResourceDescriptor::new("cities")
        .filter("country_id", FilterKind::Equals)
        .filter("population", FilterKind::Range)
        .search(&["name"])
        .sortable(&["name", "population"])
        .order_by("name asc")
        .field(FieldRules::new("name").required().string_max(255))
        .field(FieldRules::new("slug").required().string_max(255).unique_within("cities", &["country_id"]))
        .field(FieldRules::new("country_id").required().integer().exists("countries"))
        .field(FieldRules::new("timezone").timezone())
        .field(FieldRules::new("latitude").numeric().min(-90.0).max(90.0))
        .field(FieldRules::new("longitude").numeric().min(-180.0).max(180.0))
        .field(FieldRules::new("population").integer().min(0.0))
        .belongs_to("country", "country_id", "countries", &["id", "name", "code"])
        .guard_delete("venues", "city_id", "No se puede eliminar la ciudad porque tiene lugares asociados")
}

pub fn venues() -> ResourceDescriptor {
    ResourceDescriptor::new("venues")
        .filter("city_id", FilterKind::Equals)
        .filter("is_active", FilterKind::Boolean)
        .filter("capacity", FilterKind::Range)
        .search(&["name", "address", "description"])
        .sortable(&["name", "capacity", "created_at"])
        .order_by("name asc")
        .field(FieldRules::new("name").required().string_max(255))
        .field(FieldRules::new("description").string_max(2000))
        .field(FieldRules::new("address").string_max(500))
        .field(FieldRules::new("city_id").integer().exists("cities"))
        .field(FieldRules::new("capacity").integer().min(0.0))
        .field(FieldRules::new("website").url())
        .field(FieldRules::new("email").email())
        .field(FieldRules::new("phone").string_max(50))
        .field(FieldRules::new("latitude").numeric().min(-90.0).max(90.0))
        .field(FieldRules::new("longitude").numeric().min(-180.0).max(180.0))
        .field(FieldRules::new("is_active").boolean())
        .belongs_to("city", "city_id", "cities", &["id", "name", "slug"])
        .count("events_count", "events", "venue_id")
}
