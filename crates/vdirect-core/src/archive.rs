// ── Local source files ──
//
// Reads template sources and workflow archives from disk. A workflow
// archive is a zip whose `workflow.xml` names the workflow template.

use std::io::{Cursor, Read};
use std::path::Path;

use bytes::Bytes;
use quick_xml::events::Event;
use quick_xml::reader::Reader;
use zip::ZipArchive;
use zip::result::ZipError;

use crate::error::CoreError;

const DESCRIPTOR: &str = "workflow.xml";

/// A workflow template archive ready for upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkflowArchive {
    /// Workflow template name from `workflow.xml`.
    pub name: String,
    pub data: Bytes,
}

/// Read a configuration template source file.
pub fn read_template_source(path: &Path) -> Result<Bytes, CoreError> {
    std::fs::read(path)
        .map(Bytes::from)
        .map_err(|e| local_error(path, format!("unable to read template file ({e})")))
}

/// Read a workflow archive and extract its template name.
pub fn read_workflow_archive(path: &Path) -> Result<WorkflowArchive, CoreError> {
    let data = std::fs::read(path)
        .map(Bytes::from)
        .map_err(|e| local_error(path, format!("unable to read archive file ({e})")))?;
    let name = workflow_name(&data).map_err(|message| local_error(path, message))?;
    Ok(WorkflowArchive { name, data })
}

/// Name of the workflow template packed in `archive`.
pub fn workflow_name(archive: &[u8]) -> Result<String, String> {
    let mut zip = ZipArchive::new(Cursor::new(archive))
        .map_err(|e| format!("archive is not a valid zip file ({e})"))?;

    let mut descriptor = match zip.by_name(DESCRIPTOR) {
        Ok(entry) => entry,
        Err(ZipError::FileNotFound) => {
            return Err(format!("archive not valid, must contain {DESCRIPTOR}"));
        }
        Err(e) => return Err(format!("unable to read {DESCRIPTOR} ({e})")),
    };

    let mut xml = String::new();
    descriptor
        .read_to_string(&mut xml)
        .map_err(|e| format!("unable to read {DESCRIPTOR} ({e})"))?;

    name_attribute(&xml)
}

/// `name` attribute of the `workflow` root element.
fn name_attribute(xml: &str) -> Result<String, String> {
    let mut reader = Reader::from_str(xml);
    loop {
        match reader.read_event() {
            Ok(Event::Start(element) | Event::Empty(element)) => {
                if element.local_name().as_ref() != b"workflow" {
                    return Err(format!("{DESCRIPTOR} root element must be <workflow>"));
                }
                let attribute = element
                    .try_get_attribute("name")
                    .map_err(|e| format!("{DESCRIPTOR} parsing failed ({e})"))?
                    .ok_or_else(|| format!("{DESCRIPTOR} must contain name attribute"))?;
                let value = attribute
                    .unescape_value()
                    .map_err(|e| format!("{DESCRIPTOR} parsing failed ({e})"))?;
                return Ok(value.into_owned());
            }
            Ok(Event::Eof) => return Err(format!("{DESCRIPTOR} has no <workflow> element")),
            Err(e) => return Err(format!("{DESCRIPTOR} parsing failed ({e})")),
            Ok(_) => {}
        }
    }
}

fn local_error(path: &Path, message: String) -> CoreError {
    CoreError::LocalIo {
        path: path.display().to_string(),
        message,
    }
}
