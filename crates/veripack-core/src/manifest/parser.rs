//! Manifest lookup, parsing, and entry extraction.

use std::fmt;
use std::io::BufReader;

use regex::Regex;

use crate::Result;
use crate::VerifyError;
use crate::accessor::FileListing;
use crate::accessor::PackageAccessor;
use crate::digest::ChecksumAlgorithm;
use crate::types::RelPath;

use super::schema;
use super::xml::XmlElement;
use super::xml::parse_tree;

/// How the manifest file is identified at the package root.
#[derive(Debug, Clone)]
pub enum ManifestLocator {
    /// A literal root-level file name.
    Name(String),
    /// A regular expression matched against root-level file names.
    /// Exactly one file must match.
    Pattern(String),
}

impl ManifestLocator {
    fn describe(&self) -> &str {
        match self {
            Self::Name(name) | Self::Pattern(name) => name,
        }
    }
}

/// A checksum declaration on a file entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeclaredChecksum {
    /// The declared algorithm.
    pub algorithm: ChecksumAlgorithm,
    /// The declared hex digest, as written in the manifest.
    pub value: String,
}

/// A structural defect on one manifest entry.
///
/// Defects never abort a run; they surface as findings in every check
/// that would otherwise have processed the entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryDefect {
    /// The entry declares no file location.
    MissingLocation,
    /// The entry declares no checksum value.
    MissingChecksum,
    /// The entry declares no checksum algorithm.
    MissingAlgorithm,
    /// The entry declares an algorithm outside the supported set.
    UnsupportedAlgorithm(String),
    /// The declared location escapes the package root.
    PathTraversal(String),
}

impl fmt::Display for EntryDefect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingLocation => f.write_str("missing file location"),
            Self::MissingChecksum => f.write_str("missing checksum value"),
            Self::MissingAlgorithm => f.write_str("missing checksum algorithm"),
            Self::UnsupportedAlgorithm(name) => {
                write!(f, "unsupported checksum algorithm '{name}'")
            }
            Self::PathTraversal(reason) => write!(f, "location escapes the package root: {reason}"),
        }
    }
}

/// One referenced data object, extracted in document order.
#[derive(Debug, Clone)]
pub struct FileEntry {
    /// Identifier declared in the manifest, for report traceability.
    pub id: Option<String>,
    /// The location reference exactly as declared.
    pub href: Option<String>,
    /// The resolved root-relative path; absent when the location is
    /// missing or escapes the root.
    pub path: Option<RelPath>,
    /// The declared checksum; absent when malformed.
    pub checksum: Option<DeclaredChecksum>,
    /// Structural defects found on this entry.
    pub defects: Vec<EntryDefect>,
}

impl FileEntry {
    /// What to call this entry in findings: its path, else its declared
    /// location, else its identifier.
    #[must_use]
    pub fn subject(&self) -> String {
        if let Some(path) = &self.path {
            return path.as_str().to_owned();
        }
        if let Some(href) = &self.href {
            return href.clone();
        }
        self.id
            .clone()
            .unwrap_or_else(|| "<unidentified entry>".to_owned())
    }

    /// Joined human-readable defect description.
    #[must_use]
    pub fn describe_defects(&self) -> String {
        let parts: Vec<String> = self.defects.iter().map(ToString::to_string).collect();
        parts.join("; ")
    }
}

/// A parsed manifest: immutable after parse, discarded at end of run.
#[derive(Debug, Clone)]
pub struct Manifest {
    /// Root-relative path the manifest was found at.
    pub path: RelPath,
    /// The document's declared namespace, when present.
    pub namespace: Option<String>,
    /// Structural schema violations; empty means schema-valid.
    pub schema_violations: Vec<String>,
    /// Referenced file entries in document order.
    pub entries: Vec<FileEntry>,
}

impl Manifest {
    /// Whether the manifest passed structural schema validation.
    #[must_use]
    pub fn is_schema_valid(&self) -> bool {
        self.schema_violations.is_empty()
    }
}

/// Finds the manifest among the root-level files of the package.
///
/// A literal name must exist exactly; a pattern must match exactly one
/// root-level file name.
///
/// # Errors
///
/// [`VerifyError::ManifestNotFound`] when nothing matches,
/// [`VerifyError::ManifestAmbiguous`] when a pattern matches more than
/// one file, [`VerifyError::InvalidPattern`] for a bad expression.
pub fn locate(listing: &FileListing, locator: &ManifestLocator) -> Result<RelPath> {
    let root_level = listing.files.iter().filter(|p| p.is_root_level());

    match locator {
        ManifestLocator::Name(name) => root_level
            .into_iter()
            .find(|p| p.as_str() == name)
            .cloned()
            .ok_or_else(|| VerifyError::ManifestNotFound {
                pattern: name.clone(),
            }),
        ManifestLocator::Pattern(pattern) => {
            let regex = Regex::new(pattern).map_err(|source| VerifyError::InvalidPattern {
                pattern: pattern.clone(),
                source,
            })?;
            let matches: Vec<&RelPath> =
                root_level.filter(|p| regex.is_match(p.as_str())).collect();
            match matches.as_slice() {
                [] => Err(VerifyError::ManifestNotFound {
                    pattern: pattern.clone(),
                }),
                [single] => Ok((*single).clone()),
                many => Err(VerifyError::ManifestAmbiguous {
                    pattern: pattern.clone(),
                    matches: many.iter().map(|p| p.as_str().to_owned()).collect(),
                }),
            }
        }
    }
}

/// Locates, parses, and schema-validates the manifest, extracting its
/// file entries.
///
/// Schema violations do not stop extraction, so the remaining checks
/// can still run over whatever entries are recoverable. Only lookup
/// failures and malformed XML are fatal.
///
/// # Errors
///
/// Lookup errors from [`locate`], or [`VerifyError::WellFormedness`]
/// when the document is not parseable XML.
pub fn parse(
    accessor: &dyn PackageAccessor,
    listing: &FileListing,
    locator: &ManifestLocator,
) -> Result<Manifest> {
    let path = locate(listing, locator)?;

    let stream = accessor.open(&path)?;
    let root = parse_tree(BufReader::new(stream)).map_err(|message| {
        VerifyError::WellFormedness {
            manifest: path.as_str().to_owned(),
            message,
        }
    })?;

    let schema_violations = match schema::profile_for(&root) {
        Some(profile) => schema::validate(&root, profile),
        None => vec![format!(
            "unrecognized manifest format: root element '{}' in namespace '{}' (expected {} in {}); \
             lookup name was '{}'",
            root.local_name,
            root.namespace.as_deref().unwrap_or("<none>"),
            "mets",
            schema::METS_NS,
            locator.describe(),
        )],
    };

    let entries = extract_entries(accessor, &root);

    Ok(Manifest {
        path,
        namespace: root.namespace.clone(),
        schema_violations,
        entries,
    })
}

fn extract_entries(accessor: &dyn PackageAccessor, root: &XmlElement) -> Vec<FileEntry> {
    let mut entries = Vec::new();

    for file_sec in root.children_named(schema::METS_NS, "fileSec") {
        for file in file_sec.descendants_named(schema::METS_NS, "file") {
            let id = file.attr("ID").map(str::to_owned);
            let checksum_value = file.attr("CHECKSUM");
            let checksum_kind = file.attr("CHECKSUMTYPE");

            let locations: Vec<_> = file.children_named(schema::METS_NS, "FLocat").collect();
            if locations.is_empty() {
                entries.push(build_entry(
                    accessor,
                    id.clone(),
                    None,
                    checksum_value,
                    checksum_kind,
                ));
                continue;
            }
            for location in locations {
                let href = location.attr_ns(schema::XLINK_NS, "href");
                entries.push(build_entry(
                    accessor,
                    id.clone(),
                    href,
                    checksum_value,
                    checksum_kind,
                ));
            }
        }
    }

    entries
}

fn build_entry(
    accessor: &dyn PackageAccessor,
    id: Option<String>,
    href: Option<&str>,
    checksum_value: Option<&str>,
    checksum_kind: Option<&str>,
) -> FileEntry {
    let mut defects = Vec::new();

    let path = match href {
        None => {
            defects.push(EntryDefect::MissingLocation);
            None
        }
        Some(href) => match accessor.resolve(href) {
            Ok(path) => Some(path),
            Err(err) => {
                defects.push(EntryDefect::PathTraversal(err.to_string()));
                None
            }
        },
    };

    let checksum = match (checksum_value, checksum_kind) {
        (Some(value), Some(kind)) => match ChecksumAlgorithm::from_declared(kind) {
            Some(algorithm) => Some(DeclaredChecksum {
                algorithm,
                value: value.to_owned(),
            }),
            None => {
                defects.push(EntryDefect::UnsupportedAlgorithm(kind.to_owned()));
                None
            }
        },
        (Some(_), None) => {
            defects.push(EntryDefect::MissingAlgorithm);
            None
        }
        (None, Some(_)) => {
            defects.push(EntryDefect::MissingChecksum);
            None
        }
        (None, None) => {
            defects.push(EntryDefect::MissingChecksum);
            defects.push(EntryDefect::MissingAlgorithm);
            None
        }
    };

    FileEntry {
        id,
        href: href.map(str::to_owned),
        path,
        checksum,
        defects,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::accessor::DirAccessor;
    use crate::test_utils::manifest_xml;
    use std::fs;
    use tempfile::TempDir;

    fn dir_package(manifest_name: &str, manifest: &str) -> (TempDir, DirAccessor) {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join(manifest_name), manifest).unwrap();
        let accessor = DirAccessor::new(temp.path()).unwrap();
        (temp, accessor)
    }

    #[test]
    fn literal_lookup_finds_manifest() {
        let doc = manifest_xml(&[("data/a.txt", "MD5", "00")]);
        let (_temp, accessor) = dir_package("mets.xml", &doc);
        let listing = accessor.list_files().unwrap();

        let manifest = parse(
            &accessor,
            &listing,
            &ManifestLocator::Name("mets.xml".to_owned()),
        )
        .unwrap();
        assert_eq!(manifest.path.as_str(), "mets.xml");
        assert_eq!(manifest.entries.len(), 1);
        assert!(manifest.is_schema_valid());
    }

    #[test]
    fn literal_lookup_missing_is_fatal() {
        let (_temp, accessor) = dir_package("other.xml", "<x/>");
        let listing = accessor.list_files().unwrap();
        let err = locate(&listing, &ManifestLocator::Name("mets.xml".to_owned())).unwrap_err();
        assert!(matches!(err, VerifyError::ManifestNotFound { .. }));
    }

    #[test]
    fn pattern_lookup_requires_exactly_one_match() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("mets-1.xml"), "<x/>").unwrap();
        fs::write(temp.path().join("mets-2.xml"), "<x/>").unwrap();
        let accessor = DirAccessor::new(temp.path()).unwrap();
        let listing = accessor.list_files().unwrap();

        let locator = ManifestLocator::Pattern("^mets-.*\\.xml$".to_owned());
        let err = locate(&listing, &locator).unwrap_err();
        assert!(matches!(err, VerifyError::ManifestAmbiguous { .. }));

        fs::remove_file(temp.path().join("mets-2.xml")).unwrap();
        let listing = accessor.list_files().unwrap();
        assert_eq!(locate(&listing, &locator).unwrap().as_str(), "mets-1.xml");
    }

    #[test]
    fn pattern_only_matches_root_level_names() {
        let temp = TempDir::new().unwrap();
        fs::create_dir(temp.path().join("sub")).unwrap();
        fs::write(temp.path().join("sub/mets.xml"), "<x/>").unwrap();
        let accessor = DirAccessor::new(temp.path()).unwrap();
        let listing = accessor.list_files().unwrap();

        let err = locate(&listing, &ManifestLocator::Pattern("mets".to_owned())).unwrap_err();
        assert!(matches!(err, VerifyError::ManifestNotFound { .. }));
    }

    #[test]
    fn invalid_pattern_is_reported() {
        let (_temp, accessor) = dir_package("mets.xml", "<x/>");
        let listing = accessor.list_files().unwrap();
        let err = locate(&listing, &ManifestLocator::Pattern("[unclosed".to_owned())).unwrap_err();
        assert!(matches!(err, VerifyError::InvalidPattern { .. }));
    }

    #[test]
    fn malformed_xml_is_fatal() {
        let (_temp, accessor) = dir_package("mets.xml", "<mets><unclosed></mets>");
        let listing = accessor.list_files().unwrap();
        let err = parse(
            &accessor,
            &listing,
            &ManifestLocator::Name("mets.xml".to_owned()),
        )
        .unwrap_err();
        assert!(matches!(err, VerifyError::WellFormedness { .. }));
    }

    #[test]
    fn schema_violations_do_not_stop_extraction() {
        // Missing LOCTYPE: schema-invalid, but the href is still there.
        let doc = format!(
            r#"<mets xmlns="{}" xmlns:xlink="{}">
  <fileSec><fileGrp>
    <file ID="f1" CHECKSUM="00" CHECKSUMTYPE="MD5">
      <FLocat xlink:href="data/a.txt"/>
    </file>
  </fileGrp></fileSec>
</mets>"#,
            schema::METS_NS,
            schema::XLINK_NS
        );
        let (_temp, accessor) = dir_package("mets.xml", &doc);
        let listing = accessor.list_files().unwrap();

        let manifest = parse(
            &accessor,
            &listing,
            &ManifestLocator::Name("mets.xml".to_owned()),
        )
        .unwrap();
        assert!(!manifest.is_schema_valid());
        assert_eq!(manifest.entries.len(), 1);
        assert_eq!(
            manifest.entries[0].path.as_ref().unwrap().as_str(),
            "data/a.txt"
        );
    }

    #[test]
    fn malformed_entries_carry_defects() {
        let doc = format!(
            r#"<mets xmlns="{}" xmlns:xlink="{}">
  <fileSec><fileGrp>
    <file ID="no-location" CHECKSUM="00" CHECKSUMTYPE="MD5"/>
    <file ID="no-checksum">
      <FLocat LOCTYPE="URL" xlink:href="data/a.txt"/>
    </file>
    <file ID="bad-alg" CHECKSUM="00" CHECKSUMTYPE="CRC32">
      <FLocat LOCTYPE="URL" xlink:href="data/b.txt"/>
    </file>
    <file ID="escape" CHECKSUM="00" CHECKSUMTYPE="MD5">
      <FLocat LOCTYPE="URL" xlink:href="../../outside.txt"/>
    </file>
  </fileGrp></fileSec>
</mets>"#,
            schema::METS_NS,
            schema::XLINK_NS
        );
        let (_temp, accessor) = dir_package("mets.xml", &doc);
        let listing = accessor.list_files().unwrap();

        let manifest = parse(
            &accessor,
            &listing,
            &ManifestLocator::Name("mets.xml".to_owned()),
        )
        .unwrap();
        assert_eq!(manifest.entries.len(), 4);

        let by_id = |id: &str| {
            manifest
                .entries
                .iter()
                .find(|e| e.id.as_deref() == Some(id))
                .unwrap()
        };
        assert!(by_id("no-location")
            .defects
            .contains(&EntryDefect::MissingLocation));
        assert!(by_id("no-checksum")
            .defects
            .contains(&EntryDefect::MissingChecksum));
        assert!(by_id("no-checksum")
            .defects
            .contains(&EntryDefect::MissingAlgorithm));
        assert!(matches!(
            by_id("bad-alg").defects.as_slice(),
            [EntryDefect::UnsupportedAlgorithm(kind)] if kind == "CRC32"
        ));
        assert!(matches!(
            by_id("escape").defects.as_slice(),
            [EntryDefect::PathTraversal(_)]
        ));
        assert!(by_id("escape").path.is_none());
    }

    #[test]
    fn entries_keep_document_order() {
        let doc = manifest_xml(&[
            ("data/z.txt", "MD5", "00"),
            ("data/a.txt", "MD5", "11"),
            ("data/m.txt", "MD5", "22"),
        ]);
        let (_temp, accessor) = dir_package("mets.xml", &doc);
        let listing = accessor.list_files().unwrap();

        let manifest = parse(
            &accessor,
            &listing,
            &ManifestLocator::Name("mets.xml".to_owned()),
        )
        .unwrap();
        let order: Vec<&str> = manifest
            .entries
            .iter()
            .map(|e| e.path.as_ref().unwrap().as_str())
            .collect();
        assert_eq!(order, vec!["data/z.txt", "data/a.txt", "data/m.txt"]);
    }
}
