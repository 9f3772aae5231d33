use crate::core::db::MenuItem;

/// A menu item once it sits inside a section; the category lives on the section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionItem {
    pub id: i64,
    pub name: String,
    pub price: String,
    pub description: String,
    pub image: String,
}

/// Display grouping of menu items sharing a category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionGroup {
    /// Capitalized category label.
    pub name: String,
    pub items: Vec<SectionItem>,
}

impl SectionItem {
    /// Resolve the stored image reference against `base`, the way the menu
    /// images are served (`<base>/<image>?raw=true`).
    pub fn image_url(&self, base: &str) -> String {
        format!("{}/{}?raw=true", base.trim_end_matches('/'), self.image)
    }
}

impl From<&MenuItem> for SectionItem {
    fn from(item: &MenuItem) -> Self {
        Self {
            id: item.id,
            name: item.name.clone(),
            price: item.price.clone(),
            description: item.description.clone(),
            image: item.image.clone(),
        }
    }
}

/// Uppercase the first character and leave the rest untouched.
pub fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Group items by capitalized category.
///
/// Sections appear in the order their category is first seen and items keep
/// their input order.
pub fn group_by_category(items: &[MenuItem]) -> Vec<SectionGroup> {
    let mut sections: Vec<SectionGroup> = Vec::new();
    for item in items {
        let name = capitalize(&item.category);
        match sections.iter_mut().find(|section| section.name == name) {
            Some(section) => section.items.push(SectionItem::from(item)),
            None => sections.push(SectionGroup {
                name,
                items: vec![SectionItem::from(item)],
            }),
        }
    }
    sections
}
