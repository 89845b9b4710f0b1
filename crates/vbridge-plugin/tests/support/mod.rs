#![allow(dead_code)]

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use anyhow::Result;
use tempfile::TempDir;
use vbridge_config::MemoryBackend;
use vbridge_events::PropertyDispatcher;
use vbridge_natives::LibrarySearchPath;
use vbridge_plugin::{
    BridgeComponent, ComponentError, ComponentFactory, ComponentManager, ComponentParams,
    HostHandles, ServerInfo,
};
use vbridge_test_support::fixtures::{plugin_binary, temp_dir};

#[derive(Debug)]
pub struct FakeBridge {
    pub params: ComponentParams,
}

impl BridgeComponent for FakeBridge {
    fn name(&self) -> &str {
        "fake videobridge"
    }
}

#[derive(Default)]
pub struct FakeFactory {
    pub fail: AtomicBool,
    pub built: Mutex<Vec<ComponentParams>>,
}

impl ComponentFactory for FakeFactory {
    fn create(&self, params: &ComponentParams) -> Result<Arc<dyn BridgeComponent>, ComponentError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(ComponentError::Construction {
                reason: "bundle missing".to_string(),
            });
        }
        self.built.lock().expect("factory lock").push(params.clone());
        Ok(Arc::new(FakeBridge {
            params: params.clone(),
        }))
    }
}

#[derive(Default)]
pub struct RecordingManager {
    pub refuse_add: AtomicBool,
    pub refuse_remove: AtomicBool,
    pub registered: Mutex<Vec<String>>,
    pub removals: Mutex<Vec<String>>,
}

impl RecordingManager {
    pub fn registered(&self) -> Vec<String> {
        self.registered.lock().expect("manager lock").clone()
    }

    pub fn removals(&self) -> Vec<String> {
        self.removals.lock().expect("manager lock").clone()
    }
}

impl ComponentManager for RecordingManager {
    fn add_component(
        &self,
        subdomain: &str,
        _component: Arc<dyn BridgeComponent>,
    ) -> Result<(), ComponentError> {
        if self.refuse_add.load(Ordering::SeqCst) {
            return Err(ComponentError::refused("add_component", subdomain, "conflict"));
        }
        self.registered
            .lock()
            .expect("manager lock")
            .push(subdomain.to_string());
        Ok(())
    }

    fn remove_component(&self, subdomain: &str) -> Result<(), ComponentError> {
        self.removals
            .lock()
            .expect("manager lock")
            .push(subdomain.to_string());
        if self.refuse_remove.load(Ordering::SeqCst) {
            return Err(ComponentError::refused("remove_component", subdomain, "unknown"));
        }
        self.registered
            .lock()
            .expect("manager lock")
            .retain(|existing| existing != subdomain);
        Ok(())
    }
}

/// A host with in-memory collaborators and a scratch plugin directory.
pub struct TestHost {
    pub temp: TempDir,
    pub binary: PathBuf,
    pub manager: Arc<RecordingManager>,
    pub factory: Arc<FakeFactory>,
    pub dispatcher: PropertyDispatcher,
    pub backend: Arc<MemoryBackend>,
    pub search_path: Arc<LibrarySearchPath>,
    pub properties: BTreeMap<String, String>,
}

impl TestHost {
    pub fn new() -> Result<Self> {
        let temp = temp_dir("vbridge-plugin-")?;
        let binary = plugin_binary(temp.path(), "videobridge.so")?;
        Ok(Self {
            temp,
            binary,
            manager: Arc::new(RecordingManager::default()),
            factory: Arc::new(FakeFactory::default()),
            dispatcher: PropertyDispatcher::new(),
            backend: Arc::new(MemoryBackend::new()),
            search_path: Arc::new(LibrarySearchPath::with_base(Vec::new())),
            properties: BTreeMap::new(),
        })
    }

    pub fn with_property(mut self, key: &str, value: &str) -> Self {
        self.properties.insert(key.to_string(), value.to_string());
        self
    }

    pub fn handles(&self) -> HostHandles {
        HostHandles::new(
            ServerInfo {
                hostname: "xmpp01".to_string(),
                xmpp_domain: "example.org".to_string(),
            },
            self.manager.clone(),
            Arc::new(self.properties.clone()),
            self.dispatcher.clone(),
            self.backend.clone(),
            &self.binary,
        )
        .with_search_path(Arc::clone(&self.search_path))
    }

    pub fn native_dir(&self) -> PathBuf {
        self.temp.path().join("lib").join("native")
    }
}
