//! Owned handle over a parsed `project.pbxproj`

use std::borrow::Cow;

use asset_fs::{NormalizedPath, io};

use super::parser::parse_document;
use super::value::{Entry, PbxObject, PbxString, Value};
use super::writer::write_document;
use crate::{Error, Result};

const FORMAT: &str = "pbxproj";

/// A loaded Xcode project file.
///
/// The `objects` table is held apart from the other root keys so rows can be
/// looked up and edited by id. Nothing is written until [`XcodeProject::save`].
#[derive(Debug, Clone)]
pub struct XcodeProject {
    header: String,
    root: PbxObject,
    objects: PbxObject,
    trailer: String,
}

impl XcodeProject {
    pub fn parse(source: &str) -> Result<Self> {
        let mut doc = parse_document(source)?;

        let objects = match doc.root.get_mut("objects") {
            Some(Value::Object(objects)) => std::mem::take(objects),
            Some(_) => return Err(Error::structure(FORMAT, "`objects` is not a dictionary")),
            None => return Err(Error::structure(FORMAT, "missing `objects` table")),
        };
        if doc.root.get_str("rootObject").is_none() {
            return Err(Error::structure(FORMAT, "missing `rootObject`"));
        }

        Ok(Self {
            header: doc.header,
            root: doc.root,
            objects,
            trailer: doc.trailer,
        })
    }

    pub fn load(path: &NormalizedPath) -> Result<Self> {
        let content = io::read_text(path)?;
        Self::parse(&content)
    }

    /// Write the project back, returning whether the file changed.
    pub fn save(&self, path: &NormalizedPath) -> Result<bool> {
        let written = io::write_text_if_changed(path, &self.to_pbxproj())?;
        if written {
            tracing::debug!(path = %path, "saved Xcode project");
        } else {
            tracing::trace!(path = %path, "Xcode project unchanged");
        }
        Ok(written)
    }

    pub fn to_pbxproj(&self) -> String {
        write_document(&self.header, &self.root, &self.objects, &self.trailer)
    }

    /// Id of the `PBXProject` object.
    pub fn root_object_id(&self) -> Result<Cow<'_, str>> {
        self.root
            .get_str("rootObject")
            .ok_or_else(|| Error::structure(FORMAT, "missing `rootObject`"))
    }

    /// The `PBXProject` object itself.
    pub fn project_object(&self) -> Result<&PbxObject> {
        let id = self.root_object_id()?;
        self.object(&id).ok_or_else(|| {
            Error::structure(FORMAT, format!("root object `{}` is not in `objects`", id))
        })
    }

    pub fn objects(&self) -> &PbxObject {
        &self.objects
    }

    pub fn object(&self, id: &str) -> Option<&PbxObject> {
        self.objects.get_object(id)
    }

    pub fn object_mut(&mut self, id: &str) -> Option<&mut PbxObject> {
        self.objects.get_object_mut(id)
    }

    /// Comment written after the object's id, usually its display name.
    pub fn object_comment(&self, id: &str) -> Option<&str> {
        self.objects.entry(id).and_then(|e| e.key_comment.as_deref())
    }

    /// All objects of one class, in file order.
    pub fn objects_by_isa<'a>(
        &'a self,
        isa: &'a str,
    ) -> impl Iterator<Item = (&'a str, &'a PbxObject)> + 'a {
        self.objects.iter().filter_map(move |(id, entry)| {
            let object = entry.value.as_object()?;
            (object.isa().as_deref() == Some(isa)).then_some((id, object))
        })
    }

    pub fn insert_object(&mut self, id: &str, comment: &str, object: PbxObject) {
        self.objects.insert_entry(Entry {
            key: PbxString::new(id),
            key_comment: Some(comment.to_string()),
            value: Value::Object(object),
            value_comment: None,
        });
    }

    pub fn remove_object(&mut self, id: &str) -> Option<PbxObject> {
        match self.objects.remove(id)?.value {
            Value::Object(object) => Some(object),
            _ => None,
        }
    }

    /// A fresh 24 character id not used by any object.
    pub fn generate_id(&self) -> String {
        loop {
            let id: String = uuid::Uuid::new_v4()
                .simple()
                .to_string()
                .to_ascii_uppercase()
                .chars()
                .take(24)
                .collect();
            if !self.objects.contains_key(&id) {
                return id;
            }
        }
    }
}
