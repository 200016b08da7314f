//! Serializer producing the layout Xcode itself writes

use std::collections::BTreeMap;

use super::value::{Element, Entry, PbxObject, Value};

/// Object classes Xcode writes on a single line.
const INLINE_ISAS: [&str; 2] = ["PBXBuildFile", "PBXFileReference"];

pub(crate) fn write_document(
    header: &str,
    root: &PbxObject,
    objects: &PbxObject,
    trailer: &str,
) -> String {
    let mut out = String::with_capacity(16 * 1024);
    out.push_str(header);
    out.push_str("{\n");

    for (key, entry) in root.iter() {
        out.push('\t');
        write_key(&mut out, entry);
        out.push_str(" = ");
        if key == "objects" {
            write_objects_table(&mut out, objects);
        } else {
            write_value(&mut out, &entry.value, 1, false);
        }
        write_comment(&mut out, entry.value_comment.as_deref());
        out.push_str(";\n");
    }

    out.push('}');
    out.push_str(trailer);
    out
}

fn write_objects_table(out: &mut String, objects: &PbxObject) {
    let mut sections: BTreeMap<String, Vec<&Entry>> = BTreeMap::new();
    let mut unsectioned = Vec::new();

    for (_, entry) in objects.iter() {
        match entry.value.as_object().and_then(PbxObject::isa) {
            Some(isa) => sections.entry(isa.into_owned()).or_default().push(entry),
            None => unsectioned.push(entry),
        }
    }

    out.push_str("{\n");
    for (isa, entries) in &sections {
        let inline = INLINE_ISAS.contains(&isa.as_str());
        out.push_str(&format!("\n/* Begin {} section */\n", isa));
        for entry in entries {
            write_table_row(out, entry, inline);
        }
        out.push_str(&format!("/* End {} section */\n", isa));
    }
    for entry in unsectioned {
        write_table_row(out, entry, false);
    }
    out.push('\t');
    out.push('}');
}

fn write_table_row(out: &mut String, entry: &Entry, inline: bool) {
    indent(out, 2);
    write_key(out, entry);
    out.push_str(" = ");
    write_value(out, &entry.value, 2, inline);
    write_comment(out, entry.value_comment.as_deref());
    out.push_str(";\n");
}

fn write_key(out: &mut String, entry: &Entry) {
    entry.key.write_to(out);
    write_comment(out, entry.key_comment.as_deref());
}

fn write_comment(out: &mut String, comment: Option<&str>) {
    if let Some(comment) = comment {
        out.push_str(" /* ");
        out.push_str(comment);
        out.push_str(" */");
    }
}

fn indent(out: &mut String, depth: usize) {
    for _ in 0..depth {
        out.push('\t');
    }
}

fn write_value(out: &mut String, value: &Value, depth: usize, inline: bool) {
    match value {
        Value::String(s) => s.write_to(out),
        Value::Array(items) => write_array(out, items, depth, inline),
        Value::Object(object) => write_object(out, object, depth, inline),
    }
}

fn write_array(out: &mut String, items: &[Element], depth: usize, inline: bool) {
    if inline {
        out.push('(');
        for item in items {
            write_value(out, &item.value, depth, true);
            write_comment(out, item.comment.as_deref());
            out.push_str(", ");
        }
        out.push(')');
        return;
    }

    out.push_str("(\n");
    for item in items {
        indent(out, depth + 1);
        write_value(out, &item.value, depth + 1, false);
        write_comment(out, item.comment.as_deref());
        out.push_str(",\n");
    }
    indent(out, depth);
    out.push(')');
}

fn write_object(out: &mut String, object: &PbxObject, depth: usize, inline: bool) {
    if inline {
        out.push('{');
        for (_, entry) in object.iter() {
            write_key(out, entry);
            out.push_str(" = ");
            write_value(out, &entry.value, depth, true);
            write_comment(out, entry.value_comment.as_deref());
            out.push_str("; ");
        }
        out.push('}');
        return;
    }

    out.push_str("{\n");
    for (_, entry) in object.iter() {
        indent(out, depth + 1);
        write_key(out, entry);
        out.push_str(" = ");
        write_value(out, &entry.value, depth + 1, false);
        write_comment(out, entry.value_comment.as_deref());
        out.push_str(";\n");
    }
    indent(out, depth);
    out.push('}');
}
