//! Contents.json data model for an app-icon asset catalog set
//!
//! Mirrors the subset of Apple's asset catalog schema used by a single-size
//! (1024x1024) universal app icon with light, dark and tinted appearances.
//! Output is formatted the way Xcode writes it (`"key" : value`, two-space
//! indent) so regenerating the set produces no diff in version control.

use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::ser::{Formatter, PrettyFormatter};
use std::io;
use std::path::Path;

/// Root structure of a Contents.json file
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct ContentsFile {
    /// One entry per appearance variant
    pub images: Vec<ImageEntry>,

    /// Versioning and authorship information
    pub info: Info,
}

/// Individual image entry within the icon set
///
/// Field order is the serialization order.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct ImageEntry {
    /// Appearance qualifiers; absent for the default (light) icon
    #[serde(skip_serializing_if = "Option::is_none")]
    pub appearances: Option<Vec<Appearance>>,

    pub filename: String,

    /// The device type (e.g. "universal", "iphone", "ipad")
    pub idiom: String,

    /// Target platform (e.g. "ios", "macos")
    pub platform: String,

    /// Pixel size, e.g. "1024x1024"
    pub size: String,
}

/// A single appearance qualifier, e.g. `{"appearance": "luminosity", "value": "dark"}`
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Appearance {
    pub appearance: String,
    pub value: String,
}

/// Luminosity variants supported by iOS 18 app icons
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Luminosity {
    Dark,
    Tinted,
}

impl Luminosity {
    pub fn as_str(self) -> &'static str {
        match self {
            Luminosity::Dark => "dark",
            Luminosity::Tinted => "tinted",
        }
    }
}

/// Versioning and authorship information for the asset catalog
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Info {
    /// The application or tool that authored the asset catalog
    pub author: String,

    /// The format version of the asset catalog (always 1)
    pub version: u8,
}

impl ContentsFile {
    /// Creates an empty Contents.json structure with the specified author
    pub fn new(author: String) -> Self {
        Self {
            images: Vec::new(),
            info: Info { author, version: 1 },
        }
    }

    /// Adds an image entry to the contents file
    pub fn add_image(&mut self, image: ImageEntry) {
        self.images.push(image);
    }

    /// Serializes in Xcode's layout
    pub fn to_xcode_json(&self) -> Result<String> {
        let mut buf = Vec::new();
        let mut ser = serde_json::Serializer::with_formatter(&mut buf, XcodeFormatter::new());
        self.serialize(&mut ser)
            .context("Failed to serialize Contents.json")?;
        String::from_utf8(buf).context("Contents.json is not valid UTF-8")
    }
}

impl Default for ContentsFile {
    /// The manifest for the light/dark/tinted 1024px icon set
    fn default() -> Self {
        let mut contents = ContentsFile::new("xcode".to_string());
        contents.add_image(ImageEntry::universal_ios("AppIcon-1024.png"));
        contents.add_image(
            ImageEntry::universal_ios("AppIcon-Dark-1024.png").with_luminosity(Luminosity::Dark),
        );
        contents.add_image(
            ImageEntry::universal_ios("AppIcon-Tinted-1024.png")
                .with_luminosity(Luminosity::Tinted),
        );
        contents
    }
}

impl ImageEntry {
    /// Creates an entry with every field given explicitly
    pub fn new(filename: String, idiom: String, platform: String, size: String) -> Self {
        Self {
            appearances: None,
            filename,
            idiom,
            platform,
            size,
        }
    }

    /// Creates a universal iOS 1024x1024 entry
    pub fn universal_ios(filename: &str) -> Self {
        Self::new(
            filename.to_string(),
            "universal".to_string(),
            "ios".to_string(),
            "1024x1024".to_string(),
        )
    }

    /// Adds a luminosity appearance qualifier
    ///
    /// # Returns
    /// Self for method chaining
    pub fn with_luminosity(mut self, luminosity: Luminosity) -> Self {
        self.appearances
            .get_or_insert_with(Vec::new)
            .push(Appearance {
                appearance: "luminosity".to_string(),
                value: luminosity.as_str().to_string(),
            });
        self
    }
}

/// Pretty printer that separates keys from values with `" : "`
struct XcodeFormatter<'a> {
    inner: PrettyFormatter<'a>,
}

impl<'a> XcodeFormatter<'a> {
    fn new() -> Self {
        Self {
            inner: PrettyFormatter::with_indent(b"  "),
        }
    }
}

impl Formatter for XcodeFormatter<'_> {
    fn begin_array<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.inner.begin_array(writer)
    }

    fn end_array<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.inner.end_array(writer)
    }

    fn begin_array_value<W: ?Sized + io::Write>(
        &mut self,
        writer: &mut W,
        first: bool,
    ) -> io::Result<()> {
        self.inner.begin_array_value(writer, first)
    }

    fn end_array_value<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.inner.end_array_value(writer)
    }

    fn begin_object<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.inner.begin_object(writer)
    }

    fn end_object<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.inner.end_object(writer)
    }

    fn begin_object_key<W: ?Sized + io::Write>(
        &mut self,
        writer: &mut W,
        first: bool,
    ) -> io::Result<()> {
        self.inner.begin_object_key(writer, first)
    }

    fn begin_object_value<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        writer.write_all(b" : ")
    }

    fn end_object_value<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.inner.end_object_value(writer)
    }
}

/// Writes `contents` as `Contents.json` inside `dir`, replacing any existing file
///
/// # Errors
/// Returns an error if:
/// - JSON serialization fails
/// - `dir` does not exist or is not writable
pub fn write_contents_json(dir: &Path, contents: &ContentsFile) -> Result<()> {
    let json = contents.to_xcode_json()?;
    let path = dir.join("Contents.json");
    std::fs::write(&path, json)
        .with_context(|| format!("Failed to write {}", path.display()))
}
