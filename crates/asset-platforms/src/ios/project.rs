//! Resources group and build phase edits on an [`XcodeProject`]

use asset_content::{Element, PbxObject, Value, XcodeProject};
use asset_fs::NormalizedPath;

use crate::Result;

const FORMAT: &str = "pbxproj";
const RESOURCES: &str = "Resources";

fn structure_error(message: impl Into<String>) -> asset_content::Error {
    asset_content::Error::structure(FORMAT, message)
}

/// `lastKnownFileType` Xcode assigns to a file extension.
pub fn last_known_file_type(extension: &str) -> &'static str {
    match extension.to_ascii_lowercase().as_str() {
        "png" => "image.png",
        "jpg" | "jpeg" => "image.jpeg",
        "gif" => "image.gif",
        "pdf" => "image.pdf",
        "mp3" => "audio.mp3",
        "wav" => "audio.wav",
        "json" => "text.json",
        "txt" => "text",
        "html" | "htm" => "text.html",
        _ => "file",
    }
}

/// The group holding bundled resources.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourcesGroup {
    pub id: String,
    /// The group's own `path`, when it maps to a folder
    pub path: Option<String>,
}

impl ResourcesGroup {
    /// Folder on disk the group's files live in.
    pub fn directory(&self, source_dir: &NormalizedPath) -> NormalizedPath {
        source_dir.join(self.path.as_deref().unwrap_or(RESOURCES))
    }

    fn file_reference(&self, file_name: &str, extension: &str) -> PbxObject {
        let object = PbxObject::new()
            .with("isa", Value::string("PBXFileReference"))
            .with("lastKnownFileType", Value::string(last_known_file_type(extension)));
        let object = match self.path {
            Some(_) => object.with("path", Value::string(file_name)),
            None => object
                .with("name", Value::string(file_name))
                .with("path", Value::string(&format!("{}/{}", RESOURCES, file_name))),
        };
        object.with("sourceTree", Value::string("<group>"))
    }
}

fn is_resources_group(group: &PbxObject) -> bool {
    match group.get_str("name") {
        Some(name) => name == RESOURCES,
        None => group.get_str("path").as_deref() == Some(RESOURCES),
    }
}

/// Find the Resources group, if the project has one.
pub fn find_resources_group(project: &XcodeProject) -> Option<ResourcesGroup> {
    project
        .objects_by_isa("PBXGroup")
        .find(|(_, group)| is_resources_group(group))
        .map(|(id, group)| ResourcesGroup {
            id: id.to_string(),
            path: group
                .get_str("path")
                .map(|p| p.into_owned())
                .filter(|p| !p.is_empty()),
        })
}

/// Find the Resources group, creating it under the main group if missing.
pub fn ensure_resources_group(project: &mut XcodeProject) -> Result<ResourcesGroup> {
    if let Some(group) = find_resources_group(project) {
        return Ok(group);
    }

    let main_group = project
        .project_object()?
        .get_str("mainGroup")
        .map(|id| id.into_owned())
        .ok_or_else(|| structure_error("project has no mainGroup"))?;

    let id = project.generate_id();
    project.insert_object(
        &id,
        RESOURCES,
        PbxObject::new()
            .with("isa", Value::string("PBXGroup"))
            .with("children", Value::Array(Vec::new()))
            .with("name", Value::string(RESOURCES))
            .with("sourceTree", Value::string("<group>")),
    );
    push_element(project, &main_group, "children", Element::reference(&id, RESOURCES))?;
    tracing::debug!(group = %id, "created Resources group");

    Ok(ResourcesGroup { id, path: None })
}

/// First target of the project.
pub fn primary_target(project: &XcodeProject) -> Result<String> {
    project
        .project_object()?
        .get_array("targets")
        .and_then(|targets| targets.first())
        .and_then(Element::as_str)
        .map(|id| id.into_owned())
        .ok_or_else(|| structure_error("project has no targets").into())
}

/// The target's Copy Bundle Resources phase, created if missing.
pub fn ensure_resources_phase(project: &mut XcodeProject, target_id: &str) -> Result<String> {
    let target = project
        .object(target_id)
        .ok_or_else(|| structure_error(format!("target {} not found", target_id)))?;

    let existing = target
        .get_array("buildPhases")
        .into_iter()
        .flatten()
        .filter_map(Element::as_str)
        .find(|id| {
            project
                .object(id)
                .and_then(PbxObject::isa)
                .is_some_and(|isa| isa == "PBXResourcesBuildPhase")
        })
        .map(|id| id.into_owned());
    if let Some(id) = existing {
        return Ok(id);
    }

    let id = project.generate_id();
    project.insert_object(
        &id,
        RESOURCES,
        PbxObject::new()
            .with("isa", Value::string("PBXResourcesBuildPhase"))
            .with("buildActionMask", Value::string("2147483647"))
            .with("files", Value::Array(Vec::new()))
            .with("runOnlyForDeploymentPostprocessing", Value::string("0")),
    );
    push_element(project, target_id, "buildPhases", Element::reference(&id, RESOURCES))?;
    tracing::debug!(phase = %id, "created Resources build phase");
    Ok(id)
}

/// Append to an array of an object, creating the array if needed.
fn push_element(project: &mut XcodeProject, id: &str, key: &str, element: Element) -> Result<()> {
    let object = project
        .object_mut(id)
        .ok_or_else(|| structure_error(format!("object {} not found", id)))?;
    if object.get_array(key).is_none() {
        object.insert(key, Value::Array(Vec::new()), None);
    }
    if let Some(items) = object.get_array_mut(key) {
        items.push(element);
    }
    Ok(())
}

/// Comments of the group's children, in order.
pub fn group_children(project: &XcodeProject, group: &ResourcesGroup) -> Vec<String> {
    project
        .object(&group.id)
        .and_then(|g| g.get_array("children"))
        .map(|children| {
            children
                .iter()
                .filter_map(|child| child.comment.clone())
                .collect()
        })
        .unwrap_or_default()
}

fn build_file_comment(file_name: &str) -> String {
    format!("{} in {}", file_name, RESOURCES)
}

/// Reference `file_name` from the group and the resources phase.
///
/// A file already in the group (matched by its comment) is left alone.
/// Returns whether the project changed.
pub fn add_resource(
    project: &mut XcodeProject,
    group: &ResourcesGroup,
    phase_id: &str,
    file_name: &str,
    extension: &str,
) -> Result<bool> {
    if group_children(project, group).iter().any(|c| c == file_name) {
        return Ok(false);
    }

    let file_ref = project.generate_id();
    project.insert_object(&file_ref, file_name, group.file_reference(file_name, extension));

    let build_file = project.generate_id();
    project.insert_object(
        &build_file,
        &build_file_comment(file_name),
        PbxObject::new()
            .with("isa", Value::string("PBXBuildFile"))
            .with_reference("fileRef", &file_ref, file_name),
    );

    push_element(project, &group.id, "children", Element::reference(&file_ref, file_name))?;
    push_element(
        project,
        phase_id,
        "files",
        Element::reference(&build_file, &build_file_comment(file_name)),
    )?;
    Ok(true)
}

/// Remove `file_name` from the group, its build files from every resources
/// phase, and the file reference itself. Returns whether anything was removed.
pub fn remove_resource(project: &mut XcodeProject, group: &ResourcesGroup, file_name: &str) -> bool {
    let mut file_refs = Vec::new();
    if let Some(children) = project
        .object_mut(&group.id)
        .and_then(|g| g.get_array_mut("children"))
    {
        children.retain(|child| {
            if child.comment.as_deref() != Some(file_name) {
                return true;
            }
            if let Some(id) = child.as_str() {
                file_refs.push(id.into_owned());
            }
            false
        });
    }
    if file_refs.is_empty() {
        return false;
    }

    let build_files: Vec<String> = project
        .objects_by_isa("PBXBuildFile")
        .filter(|(_, build)| {
            build
                .get_str("fileRef")
                .is_some_and(|r| file_refs.iter().any(|f| *f == r))
        })
        .map(|(id, _)| id.to_string())
        .collect();
    let phases: Vec<String> = project
        .objects_by_isa("PBXResourcesBuildPhase")
        .map(|(id, _)| id.to_string())
        .collect();

    for phase in &phases {
        if let Some(files) = project
            .object_mut(phase)
            .and_then(|p| p.get_array_mut("files"))
        {
            files.retain(|f| {
                f.as_str()
                    .is_none_or(|id| !build_files.iter().any(|b| *b == id))
            });
        }
    }
    for id in build_files.iter().chain(&file_refs) {
        project.remove_object(id);
    }
    true
}

/// `INFOPLIST_FILE` of the target's first build configuration that sets it.
pub fn info_plist_setting(project: &XcodeProject, target_id: &str) -> Option<String> {
    let list_id = project.object(target_id)?.get_str("buildConfigurationList")?;
    let configurations = project.object(&list_id)?.get_array("buildConfigurations")?;

    configurations
        .iter()
        .filter_map(Element::as_str)
        .filter_map(|id| {
            project
                .object(&id)?
                .get_object("buildSettings")?
                .get_str("INFOPLIST_FILE")
                .map(|value| value.into_owned())
        })
        .next()
        .map(|value| {
            value
                .strip_prefix("$(SRCROOT)/")
                .unwrap_or(&value)
                .to_string()
        })
}
