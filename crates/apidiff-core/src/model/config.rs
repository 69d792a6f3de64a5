use std::path::{Path, PathBuf};

/// Minimum member visibility included in a comparison
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AccessModifier {
    Public,
    #[default]
    Protected,
    Package,
    Private,
}

impl AccessModifier {
    /// Spelling understood by the comparison engine
    pub fn as_str(&self) -> &'static str {
        match self {
            AccessModifier::Public => "public",
            AccessModifier::Protected => "protected",
            AccessModifier::Package => "package",
            AccessModifier::Private => "private",
        }
    }
}

/// Options handed to the external comparison engine for one release pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComparisonConfig {
    /// Where the HTML report is written
    pub html_output: PathBuf,
    /// Members below this visibility are not compared
    pub access_modifier: AccessModifier,
    /// Omit unchanged members from the report
    pub output_only_modifications: bool,
    /// Report only binary-incompatible changes
    pub output_only_binary_incompatible: bool,
    /// Classes present on one side only do not fail the run
    pub ignore_missing_classes: bool,
    /// An old side with no artifacts does not fail the run
    pub ignore_missing_old_version: bool,
    /// A new side with no artifacts does not fail the run
    pub ignore_missing_new_version: bool,
    pub semantic_versioning: bool,
    pub html_stylesheet: Option<PathBuf>,
    pub title: String,
    /// Also write the engine's XML description (and schema) next to the HTML
    pub create_schema_file: bool,
}

impl ComparisonConfig {
    /// Fixed report options for one pair
    ///
    /// Modifications only, protected and above, missing classes tolerated,
    /// missing release sides fatal, no semantic-version inference.
    pub fn for_pair(
        html_output: impl Into<PathBuf>,
        html_stylesheet: Option<PathBuf>,
        title: impl Into<String>,
    ) -> Self {
        Self {
            html_output: html_output.into(),
            access_modifier: AccessModifier::Protected,
            output_only_modifications: true,
            output_only_binary_incompatible: false,
            ignore_missing_classes: true,
            ignore_missing_old_version: false,
            ignore_missing_new_version: false,
            semantic_versioning: false,
            html_stylesheet,
            title: title.into(),
            create_schema_file: true,
        }
    }

    /// Path of the XML description written next to the HTML report
    pub fn xml_companion(&self) -> PathBuf {
        self.html_output.with_extension("xml")
    }

    /// Path of the XML schema written next to the HTML report
    pub fn schema_companion(&self) -> PathBuf {
        self.html_output.with_extension("xsd")
    }

    pub fn html_output(&self) -> &Path {
        &self.html_output
    }
}

/// Report title naming the product and both versions
pub fn report_title(product: &str, old_version: &str, new_version: &str) -> String {
    format!(
        "Changes in {} APIs from {} to {}",
        product, old_version, new_version
    )
}
