//! Structural schema profiles for supported manifest formats.
//!
//! Validation here is structural, not a full XSD run: the rules cover
//! the shape the verification engine relies on. Violations are
//! collected and reported through the validity check; they never stop
//! entry extraction.

use crate::digest::ChecksumAlgorithm;

use super::xml::XmlElement;

/// The METS namespace, which doubles as the format version marker.
pub const METS_NS: &str = "http://www.loc.gov/METS/";
/// The XLink namespace used by `FLocat` location references.
pub const XLINK_NS: &str = "http://www.w3.org/1999/xlink";

/// A structural schema for one manifest format version.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchemaProfile {
    /// Namespace identifying the format.
    pub namespace: &'static str,
    /// Short profile name for diagnostics.
    pub name: &'static str,
}

const METS_PROFILE: SchemaProfile = SchemaProfile {
    namespace: METS_NS,
    name: "METS",
};

/// Selects the schema profile matching the document's declared
/// namespace, or `None` when the format is unrecognized.
#[must_use]
pub fn profile_for(root: &XmlElement) -> Option<SchemaProfile> {
    (root.namespace.as_deref() == Some(METS_NS)).then_some(METS_PROFILE)
}

/// Validates the document against a profile, returning every violation.
#[must_use]
pub fn validate(root: &XmlElement, profile: SchemaProfile) -> Vec<String> {
    let mut violations = Vec::new();

    if root.local_name != "mets" {
        violations.push(format!(
            "root element must be '{}:mets', found '{}'",
            profile.name, root.local_name
        ));
    }

    let file_secs: Vec<&XmlElement> = root.children_named(METS_NS, "fileSec").collect();
    match file_secs.len() {
        0 => {
            violations.push("manifest has no fileSec".to_owned());
            return violations;
        }
        1 => {}
        n => violations.push(format!("manifest has {n} fileSec elements, expected one")),
    }

    let file_sec = file_secs[0];
    if file_sec.children_named(METS_NS, "fileGrp").next().is_none() {
        violations.push("fileSec has no fileGrp".to_owned());
    }

    for file in file_sec.descendants_named(METS_NS, "file") {
        let id = file.attr("ID").unwrap_or("<no ID>");
        if file.attr("ID").is_none() {
            violations.push("file element is missing its ID attribute".to_owned());
        }

        let locations: Vec<&XmlElement> = file.children_named(METS_NS, "FLocat").collect();
        if locations.is_empty() {
            violations.push(format!("file '{id}' has no FLocat"));
        }
        for location in locations {
            if location.attr_ns(XLINK_NS, "href").is_none() {
                violations.push(format!("FLocat of file '{id}' is missing xlink:href"));
            }
            if location.attr("LOCTYPE").is_none() {
                violations.push(format!("FLocat of file '{id}' is missing LOCTYPE"));
            }
        }

        match (file.attr("CHECKSUM"), file.attr("CHECKSUMTYPE")) {
            (Some(_), Some(kind)) => {
                if ChecksumAlgorithm::from_declared(kind).is_none() {
                    violations.push(format!(
                        "file '{id}' declares unsupported CHECKSUMTYPE '{kind}'"
                    ));
                }
            }
            (Some(_), None) => {
                violations.push(format!("file '{id}' has CHECKSUM without CHECKSUMTYPE"));
            }
            (None, Some(_)) => {
                violations.push(format!("file '{id}' has CHECKSUMTYPE without CHECKSUM"));
            }
            (None, None) => {
                violations.push(format!("file '{id}' declares no checksum"));
            }
        }
    }

    violations
}
