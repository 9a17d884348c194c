/// Magento product visibility, stored as a single code per product
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Visibility {
    NotVisible,
    InCatalog,
    InSearch,
    Both,
}

impl Visibility {
    pub fn code(&self) -> u8 {
        match self {
            Self::NotVisible => 1,
            Self::InCatalog => 2,
            Self::InSearch => 3,
            Self::Both => 4,
        }
    }

    pub fn from_code(code: i64) -> Option<Self> {
        Some(match code {
            1 => Self::NotVisible,
            2 => Self::InCatalog,
            3 => Self::InSearch,
            4 => Self::Both,
            _ => return None,
        })
    }

    /// Code which denotes exactly the given combination of flags
    pub fn from_flags(in_catalog: bool, in_search: bool) -> Self {
        match (in_catalog, in_search) {
            (true, true) => Self::Both,
            (true, false) => Self::InCatalog,
            (false, true) => Self::InSearch,
            (false, false) => Self::NotVisible,
        }
    }
}

impl Default for Visibility {
    fn default() -> Self {
        Self::Both
    }
}
