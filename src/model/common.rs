use std::fmt;

/// Synthetic row identifier assigned by the store on insert.
pub type Id = i32;

/// Folder under the image root that holds uploads for one entity type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFolder {
    Category,
    Subcategory,
}

impl ImageFolder {
    pub fn as_str(&self) -> &'static str {
        match self {
            ImageFolder::Category => "Category",
            ImageFolder::Subcategory => "Subcategory",
        }
    }
}

impl fmt::Display for ImageFolder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Treats an absent and an empty string the same way.
pub fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}
