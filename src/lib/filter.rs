use crate::catalog::{Product, Visibility};
use crate::sync::{SyncConfig, VisibilityMode};
use smallvec::{smallvec, SmallVec};

/// Declarative product collection filter
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProductFilter {
    saleable_only: bool,
    visibility: Option<SmallVec<[Visibility; 2]>>,
}

impl ProductFilter {
    pub fn new(saleable_only: bool, visibility: Option<SmallVec<[Visibility; 2]>>) -> Self {
        Self {
            saleable_only,
            visibility,
        }
    }

    pub fn saleable_only(&self) -> bool {
        self.saleable_only
    }

    pub fn visibility(&self) -> Option<&[Visibility]> {
        self.visibility.as_deref()
    }

    /// Magento visibility code denoting exactly the filtered combination
    pub fn visibility_code(&self) -> Option<u8> {
        self.visibility.as_ref().map(|visibility| {
            Visibility::from_flags(
                visibility.contains(&Visibility::InCatalog),
                visibility.contains(&Visibility::InSearch),
            )
            .code()
        })
    }

    pub fn matches(&self, product: &Product) -> bool {
        if self.saleable_only && !product.is_saleable() {
            return false;
        }

        match self.visibility_code() {
            Some(code) => product.visibility().code() == code,
            None => true,
        }
    }
}

pub struct FilterBuilder;

impl FilterBuilder {
    pub fn build(config: &SyncConfig) -> ProductFilter {
        ProductFilter::new(
            config.saleable_only(),
            match config.visibility() {
                VisibilityMode::InCatalog => Some(smallvec![Visibility::InCatalog]),
                VisibilityMode::InSearch => Some(smallvec![Visibility::InSearch]),
                VisibilityMode::Both => {
                    Some(smallvec![Visibility::InCatalog, Visibility::InSearch])
                }
                VisibilityMode::Unset => None,
            },
        )
    }
}
