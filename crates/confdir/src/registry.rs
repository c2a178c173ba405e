//! Filename → registration table.
//!
//! Registration is generic over the caller's struct type, but the table has
//! to hold many different types at once.  Each handle is therefore wrapped in
//! a private [`ConfigTarget`] trait object that knows how to read YAML into
//! its struct and write the struct back out.
//!
//! Loading merges the file onto the struct's serialized form and decodes the
//! result, so a field that `Serialize` leaves out (`#[serde(skip)]`,
//! `skip_serializing`, a `skip_serializing_if` that fires) would come back as
//! its deserialize default.  Before merging, the target is round-tripped and
//! compared with itself; a mismatch is reported instead of silently resetting
//! those fields.
//!
//! Entries keep registration order.  Re-registering a filename replaces the
//! record but keeps its original slot.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_yaml::Value;

use crate::options::RegisterOptions;

/// Shared handle to a caller-owned config struct.
///
/// The caller keeps one clone to read the values; the loader keeps another
/// so it can fill the struct in place on load and read it on save.
pub type Shared<T> = Rc<RefCell<T>>;

/// Failure inside a target, before the loader attaches path context.
#[derive(Debug)]
pub(crate) enum TargetError {
    /// The caller holds a conflicting borrow of the struct.
    Busy,
    /// The struct could not be turned into YAML.
    Encode(serde_yaml::Error),
    /// The YAML could not be parsed or did not fit the struct.
    Decode(serde_yaml::Error),
    /// The current value does not come back unchanged from its own YAML.
    Lossy,
}

/// Type-erased view of a registered struct.
pub(crate) trait ConfigTarget {
    /// Overlays the YAML document in `content` onto the current value.
    fn apply_yaml(&self, content: &str) -> Result<(), TargetError>;
    /// Serializes the current value.
    fn to_yaml(&self) -> Result<String, TargetError>;
}

struct TypedTarget<T> {
    target: Shared<T>,
}

impl<T> ConfigTarget for TypedTarget<T>
where
    T: Serialize + DeserializeOwned + PartialEq,
{
    fn apply_yaml(&self, content: &str) -> Result<(), TargetError> {
        if is_blank_document(content) {
            return Ok(());
        }

        let incoming: Value = serde_yaml::from_str(content).map_err(TargetError::Decode)?;
        if incoming.is_null() {
            // Empty document: nothing to apply.
            return Ok(());
        }

        let mut target = self.target.try_borrow_mut().map_err(|_| TargetError::Busy)?;
        let mut merged = serde_yaml::to_value(&*target).map_err(TargetError::Encode)?;
        let rebuilt: T = serde_yaml::from_value(merged.clone()).map_err(|_| TargetError::Lossy)?;
        if rebuilt != *target {
            return Err(TargetError::Lossy);
        }

        overlay(&mut merged, incoming);
        *target = serde_yaml::from_value(merged).map_err(TargetError::Decode)?;
        Ok(())
    }

    fn to_yaml(&self) -> Result<String, TargetError> {
        let target = self.target.try_borrow().map_err(|_| TargetError::Busy)?;
        serde_yaml::to_string(&*target).map_err(TargetError::Encode)
    }
}

/// `true` when `content` holds nothing but whitespace and comments.
fn is_blank_document(content: &str) -> bool {
    content.lines().all(|line| {
        let line = line.trim();
        line.is_empty() || line.starts_with('#')
    })
}

/// Applies `incoming` onto `base`.
///
/// Mappings merge key by key (recursively); any other value replaces `base`.
pub(crate) fn overlay(base: &mut Value, incoming: Value) {
    match (base, incoming) {
        (Value::Mapping(base_map), Value::Mapping(incoming_map)) => {
            for (key, value) in incoming_map {
                match base_map.get_mut(&key) {
                    Some(existing) => overlay(existing, value),
                    None => {
                        base_map.insert(key, value);
                    }
                }
            }
        }
        (base, incoming) => *base = incoming,
    }
}

/// One registered file.
pub(crate) struct Registration {
    pub(crate) filename: String,
    pub(crate) target: Box<dyn ConfigTarget>,
    pub(crate) options: RegisterOptions,
}

/// Ordered table of registered config files.
#[derive(Default)]
pub struct Registry {
    entries: Vec<Registration>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `target` under `filename`, replacing any earlier registration.
    ///
    /// `T` must read back its own YAML unchanged for loads to succeed; see the
    /// module docs.
    pub fn register<T>(
        &mut self,
        filename: impl Into<String>,
        target: Shared<T>,
        options: RegisterOptions,
    ) where
        T: Serialize + DeserializeOwned + PartialEq + 'static,
    {
        let registration = Registration {
            filename: filename.into(),
            target: Box::new(TypedTarget { target }),
            options,
        };

        match self
            .entries
            .iter()
            .position(|e| e.filename == registration.filename)
        {
            Some(idx) => self.entries[idx] = registration,
            None => self.entries.push(registration),
        }
    }

    pub fn is_registered(&self, filename: &str) -> bool {
        self.get(filename).is_some()
    }

    /// Registered filenames in registration order.
    pub fn filenames(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.filename.as_str())
    }

    /// Policy of a registered file.
    pub fn options(&self, filename: &str) -> Option<&RegisterOptions> {
        self.get(filename).map(|e| &e.options)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub(crate) fn get(&self, filename: &str) -> Option<&Registration> {
        self.entries.iter().find(|e| e.filename == filename)
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &Registration> {
        self.entries.iter()
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.entries.iter().map(|e| (&e.filename, &e.options)))
            .finish()
    }
}
