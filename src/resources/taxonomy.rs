use crate::filter::FilterKind;
use crate::resource::ResourceDescriptor;
use crate::validation::FieldRules;

pub const CATEGORY_HAS_CHILDREN: &str = "No se puede eliminar la categoría porque tiene subcategorías";

pub fn categories() -> ResourceDescriptor {
    ResourceDescriptor::new("categories")
        .filter("parent_id", FilterKind::Equals)
        .filter("is_active", FilterKind::Boolean)
        .search(&["name", "description"])
        .sortable(&["name", "sort_order", "created_at"])
        .order_by("sort_order asc, name asc")
        .field(FieldRules::new("name").required().string_max(255))
        .field(FieldRules::new("slug").string_max(255).unique("categories"))
        .field(FieldRules::new("description").string_max(1000))
        .field(FieldRules::new("parent_id").integer().exists("categories"))
        .field(FieldRules::new("color").hex_color())
        .field(FieldRules::new("icon").string_max(255))
        .field(FieldRules::new("sort_order").integer().min(0.0))
        .field(FieldRules::new("is_active").boolean())
        .count("children_count", "categories", "parent_id")
        .belongs_to("parent", "parent_id", "categories", &["id", "name", "slug"])
        .guard_delete("categories", "parent_id", CATEGORY_HAS_CHILDREN)
}

pub fn tags() -> ResourceDescriptor {
    ResourceDescriptor::new("tags")
        .filter("is_featured", FilterKind::Boolean)
        .search(&["name"])
        .sortable(&["name", "created_at"])
        .order_by("name asc")
        .field(FieldRules::new("name").required_on_update().string_max(100).unique("tags"))
        .field(FieldRules::new("slug").string_max(100).unique("tags"))
        .field(FieldRules::new("color").hex_color())
        .field(FieldRules::new("is_featured").boolean())
}

pub fn aliases() -> ResourceDescriptor {
    ResourceDescriptor::new("aliases")
        .filter("aliasable_type", FilterKind::Equals)
        .filter("aliasable_id", FilterKind::Equals)
        .search(&["name"])
        .sortable(&["name", "created_at"])
        .order_by("name asc")
        .field(
            FieldRules::new("name")
                .required()
                .string_max(255)
                .unique_within("aliases", &["aliasable_type", "aliasable_id"]),
        )
        .field(FieldRules::new("aliasable_type").required().one_of(&["venue", "organization", "city", "event"]))
        .field(FieldRules::new("aliasable_id").required().integer())
}
