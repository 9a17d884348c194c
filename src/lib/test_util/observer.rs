use crate::catalog::Product;
use crate::sync::PageObserver;
use std::sync::{Arc, Mutex};

/// Records product ids of every page it is notified about
#[derive(Default, Clone)]
pub struct PageObserverSpy {
    pages: Arc<Mutex<Vec<(String, Vec<usize>)>>>,
}

impl PageObserverSpy {
    pub fn pages(&self) -> Vec<(String, Vec<usize>)> {
        self.pages.lock().unwrap().clone()
    }
}

impl PageObserver for PageObserverSpy {
    fn after_page_fetch(&self, pipeline: &str, page: &mut Vec<Product>) {
        self.pages.lock().unwrap().push((
            pipeline.to_owned(),
            page.iter().map(Product::entity_id).collect(),
        ));
    }
}
