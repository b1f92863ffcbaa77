//! Browser-side state store backed by `window.localStorage`

use greenbench_core::error::{Error, Result};
use greenbench_core::{MemoryStore, StateStore};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::JsValue;

/// `localStorage` when the browser grants it, a shared in-memory map otherwise.
///
/// Clones share the same underlying storage.
#[derive(Clone)]
pub enum BrowserStore {
    Local(web_sys::Storage),
    Memory(Rc<RefCell<MemoryStore>>),
}

impl BrowserStore {
    pub fn open() -> Self {
        let storage = web_sys::window().and_then(|w| w.local_storage().ok().flatten());
        match storage {
            Some(storage) => BrowserStore::Local(storage),
            None => {
                tracing::warn!("localStorage unavailable, results will not survive a reload");
                BrowserStore::Memory(Rc::new(RefCell::new(MemoryStore::new())))
            }
        }
    }
}

impl StateStore for BrowserStore {
    fn get(&self, key: &str) -> Option<String> {
        match self {
            BrowserStore::Local(storage) => match storage.get_item(key) {
                Ok(value) => value,
                Err(e) => {
                    tracing::warn!("Failed to read {}: {}", key, js_message(&e));
                    None
                }
            },
            BrowserStore::Memory(memory) => memory.borrow().get(key),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match self {
            BrowserStore::Local(storage) => {
                storage
                    .set_item(key, value)
                    .map_err(|e| Error::StorageError {
                        key: key.to_string(),
                        message: js_message(&e),
                    })
            }
            BrowserStore::Memory(memory) => memory.borrow_mut().set(key, value),
        }
    }
}

/// Quota and security errors arrive as DOMException objects
fn js_message(value: &JsValue) -> String {
    value
        .as_string()
        .unwrap_or_else(|| format!("{:?}", value))
}
